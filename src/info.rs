//! Build info
//!
//! Static application metadata, computed once at start-up.

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use chrono::NaiveDateTime;
use serde::Serialize;

use crate::services::ServiceKind;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildInfo {
    pub name: String,
    pub artifact_id: String,
    pub version: String,
    pub started_at: String,
    pub context_path: String,
}

impl BuildInfo {
    pub fn new(service: ServiceKind, context_path: &str, started_at: NaiveDateTime) -> Self {
        Self {
            name: service.name().to_string(),
            artifact_id: format!("{}-{}", env!("CARGO_PKG_NAME"), service.name()),
            version: env!("CARGO_PKG_VERSION").to_string(),
            started_at: started_at.format("%Y-%m-%d %H:%M:%S").to_string(),
            context_path: if context_path.is_empty() {
                "/".to_string()
            } else {
                context_path.to_string()
            },
        }
    }
}

/// `GET /actuator/info`
pub fn router(info: BuildInfo) -> Router {
    Router::new()
        .route("/actuator/info", get(build_info))
        .with_state(Arc::new(info))
}

async fn build_info(State(info): State<Arc<BuildInfo>>) -> Json<BuildInfo> {
    Json(info.as_ref().clone())
}
