use crate::filter::{FilterConfig, PodSchedulerCheckLayer};
use crate::request_info::RequestInfoLayer;
use crate::FilterState;
use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Wrap an API router with the pod scheduler check
///
/// Requests pass through tracing, then request info resolution, then the
/// scheduler check before reaching `router`'s handlers.
pub fn guard(router: Router, state: Arc<FilterState>, config: FilterConfig) -> Router {
    router
        .layer(PodSchedulerCheckLayer::with_config(state, config))
        .layer(RequestInfoLayer)
        .layer(TraceLayer::new_for_http())
}
