//! API module
//!
//! Assembles a service's routes, build info and middleware into one app.

pub mod middleware;

use axum::{middleware as axum_middleware, routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::info::{self, BuildInfo};

/// Build the application router
///
/// `api` and the info endpoint are mounted under `context_path` (empty for
/// the root); `/health` always sits at the root.
pub fn build_app(api: Router, context_path: &str, build_info: BuildInfo) -> Router {
    let mounted = api.merge(info::router(build_info));

    let app = if context_path.is_empty() {
        Router::new().merge(mounted)
    } else {
        Router::new().nest(context_path, mounted)
    };

    // Axum layers run in reverse order: context -> logging -> handler
    app.route("/health", get(health_check))
        .layer(axum_middleware::from_fn(middleware::logging_middleware))
        .layer(axum_middleware::from_fn(middleware::context_middleware))
        .layer(TraceLayer::new_for_http())
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}
