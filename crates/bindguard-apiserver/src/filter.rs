//! Pod scheduler check for pod binding requests
//!
//! When hybrid scheduling is enabled, a `create` on `pods/binding` is only
//! let through if the pod's scheduler is not one of the host cluster's
//! schedulers. Otherwise two schedulers would race to place the same pod.
//!
//! Per request:
//! 1. disabled config forwards immediately
//! 2. missing [`RequestInfo`] fails with 500
//! 3. anything other than a pod binding create is forwarded untouched
//! 4. the body is buffered and decoded into a Binding
//! 5. bindings without namespace or name are forwarded
//! 6. the pod is looked up and its scheduler checked against the host set
//!
//! Decode and lookup failures produce a negotiated 500 Status, a conflict a
//! 405 Status. In neither case is the inner service called.

use crate::classifier::is_create_pod_binding_request;
use crate::policy::{conflict_message, evaluate, Decision};
use crate::request_info::RequestInfo;
use crate::resolver::LookupContext;
use crate::response::status_failure;
use crate::{ApiError, FilterState};
use axum::body::{to_bytes, Body};
use axum::extract::Request;
use axum::http::header::ACCEPT;
use axum::response::Response;
use bindguard_core::scheduler_name;
use futures_util::future::BoxFuture;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tower::{Layer, Service};
use tracing::{debug, error, info, warn};

/// Scheduler check configuration
#[derive(Debug, Clone)]
pub struct FilterConfig {
    /// Largest binding body that will be buffered
    pub max_body_bytes: usize,
    /// Upper bound on the pod lookup, on top of request cancellation
    pub lookup_timeout: Option<Duration>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 3 * 1024 * 1024,
            lookup_timeout: None,
        }
    }
}

impl FilterState {
    /// Decide what to do with a pod binding payload
    pub async fn decide(&self, ctx: &LookupContext, payload: &[u8]) -> Decision {
        let binding = match self.decoder.decode(payload) {
            Ok(binding) => binding,
            Err(e) => {
                warn!("Rejecting undecodable binding: {}", e);
                return Decision::ErrorInternal {
                    message: e.to_string(),
                };
            }
        };

        let namespace = binding.metadata.namespace.as_deref().unwrap_or_default();
        let name = binding.metadata.name.as_deref().unwrap_or_default();
        if namespace.is_empty() || name.is_empty() {
            debug!("Binding has no namespace or name, skipping scheduler check");
            return Decision::Forward;
        }

        let pod = match self.resolver.resolve(ctx, namespace, name).await {
            Ok(pod) => pod,
            Err(e) => {
                return Decision::ErrorInternal {
                    message: e.to_string(),
                }
            }
        };

        let scheduler = scheduler_name(&pod);
        let decision = evaluate(scheduler, &self.config.host_schedulers);
        match &decision {
            Decision::RejectConflict { .. } => warn!(
                "Refusing binding of pod {}/{}: scheduler '{}' is reserved for the host cluster",
                namespace, name, scheduler
            ),
            _ => info!(
                "Allowing binding of pod {}/{} to node {} (scheduler '{}')",
                namespace,
                name,
                binding.target.name.as_deref().unwrap_or_default(),
                scheduler
            ),
        }
        decision
    }

    /// Check a request, returning it for forwarding or the response to send instead
    pub async fn check(&self, config: &FilterConfig, req: Request) -> Result<Request, Response> {
        let accept = req.headers().get(ACCEPT).cloned();

        let Some(info) = req.extensions().get::<RequestInfo>() else {
            error!("Request info is missing for {}", req.uri().path());
            let err = ApiError::Internal("request info is missing".to_string());
            return Err(status_failure(&err, accept.as_ref()));
        };

        if !is_create_pod_binding_request(info) {
            return Ok(req);
        }

        let mut ctx = LookupContext::new();
        if let Some(token) = req.extensions().get::<CancellationToken>() {
            ctx = ctx.with_cancellation(token.clone());
        }
        if let Some(timeout) = config.lookup_timeout {
            ctx = ctx.with_timeout(timeout);
        }

        let (parts, body) = req.into_parts();
        let payload = match to_bytes(body, config.max_body_bytes).await {
            Ok(payload) => payload,
            Err(e) => {
                warn!("Failed to read binding body: {}", e);
                let err = ApiError::Internal(format!("failed to read request body: {}", e));
                return Err(status_failure(&err, accept.as_ref()));
            }
        };

        match decision_error(self.decide(&ctx, &payload).await) {
            // The body was consumed above, hand the buffered copy on
            None => Ok(Request::from_parts(parts, Body::from(payload))),
            Some(err) => Err(status_failure(&err, accept.as_ref())),
        }
    }
}

/// Error response for decisions that stop the request
fn decision_error(decision: Decision) -> Option<ApiError> {
    match decision {
        Decision::Forward => None,
        Decision::RejectConflict { scheduler } => {
            Some(ApiError::MethodNotAllowed(conflict_message(&scheduler)))
        }
        Decision::ErrorInternal { message } => Some(ApiError::Internal(message)),
    }
}

/// Layer applying the pod scheduler check
#[derive(Clone)]
pub struct PodSchedulerCheckLayer {
    state: Arc<FilterState>,
    config: Arc<FilterConfig>,
}

impl PodSchedulerCheckLayer {
    pub fn new(state: Arc<FilterState>) -> Self {
        Self::with_config(state, FilterConfig::default())
    }

    pub fn with_config(state: Arc<FilterState>, config: FilterConfig) -> Self {
        if state.config.enabled {
            let mut schedulers: Vec<&str> =
                state.config.host_schedulers.iter().map(String::as_str).collect();
            schedulers.sort_unstable();
            info!(
                "Pod scheduler check enabled, host schedulers: [{}]",
                schedulers.join(", ")
            );
        } else {
            debug!("Pod scheduler check disabled");
        }

        Self {
            state,
            config: Arc::new(config),
        }
    }
}

impl<S> Layer<S> for PodSchedulerCheckLayer {
    type Service = PodSchedulerCheck<S>;

    fn layer(&self, inner: S) -> Self::Service {
        PodSchedulerCheck {
            inner,
            state: self.state.clone(),
            config: self.config.clone(),
        }
    }
}

/// Service produced by [`PodSchedulerCheckLayer`]
#[derive(Clone)]
pub struct PodSchedulerCheck<S> {
    inner: S,
    state: Arc<FilterState>,
    config: Arc<FilterConfig>,
}

impl<S> Service<Request> for PodSchedulerCheck<S>
where
    S: Service<Request, Response = Response> + Clone + Send + 'static,
    S::Future: Send + 'static,
    S::Error: Send + 'static,
{
    type Response = Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Response, S::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request) -> Self::Future {
        if !self.state.config.enabled {
            return Box::pin(self.inner.call(req));
        }

        // Use the service that was driven to readiness, leave a fresh clone behind
        let clone = self.inner.clone();
        let mut inner = std::mem::replace(&mut self.inner, clone);
        let state = self.state.clone();
        let config = self.config.clone();

        Box::pin(async move {
            match state.check(&config, req).await {
                Ok(req) => inner.call(req).await,
                Err(response) => Ok(response),
            }
        })
    }
}
