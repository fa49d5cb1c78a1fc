//! Health check endpoints
//!
//! - /health, /healthz - liveness probe
//! - /version          - build information for deployment verification

use hyper::{Method, StatusCode};
use serde::Serialize;
use std::sync::Arc;

use crate::routes::format::json_response;
use crate::routes::{Access, BoxBody, RequestContext, RouteDef};
use crate::server::AppState;
use crate::types::Result;

/// Health response
#[derive(Serialize)]
pub struct HealthResponse {
    /// Overall health status (true if the service is running)
    pub healthy: bool,
    /// Service version
    pub version: &'static str,
    /// Uptime in seconds
    pub uptime: u64,
    /// Current timestamp
    pub timestamp: String,
    /// Operating mode
    pub mode: &'static str,
    /// Node identifier
    pub node_id: String,
    /// Database this instance serves
    pub database: String,
}

/// Version info for deployment verification
#[derive(Serialize)]
pub struct VersionResponse {
    pub version: &'static str,
    pub git_commit: &'static str,
    pub build_timestamp: &'static str,
}

pub fn routes() -> Vec<RouteDef> {
    vec![
        RouteDef {
            method: Method::GET,
            pattern: "/health",
            access: Access::Public,
            handler: |ctx, state| Box::pin(health_check(ctx, state)),
        },
        RouteDef {
            method: Method::GET,
            pattern: "/healthz",
            access: Access::Public,
            handler: |ctx, state| Box::pin(health_check(ctx, state)),
        },
        RouteDef {
            method: Method::GET,
            pattern: "/version",
            access: Access::Public,
            handler: |ctx, state| Box::pin(version_info(ctx, state)),
        },
    ]
}

async fn health_check(
    _ctx: RequestContext,
    state: Arc<AppState>,
) -> Result<hyper::Response<BoxBody>> {
    let response = HealthResponse {
        healthy: true,
        version: env!("CARGO_PKG_VERSION"),
        uptime: state.started_at.elapsed().as_secs(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        mode: if state.args.dev_mode {
            "development"
        } else {
            "production"
        },
        node_id: state.args.node_id.to_string(),
        database: state.args.mongodb_db.clone(),
    };

    Ok(json_response(StatusCode::OK, &response))
}

async fn version_info(
    _ctx: RequestContext,
    _state: Arc<AppState>,
) -> Result<hyper::Response<BoxBody>> {
    let response = VersionResponse {
        version: env!("CARGO_PKG_VERSION"),
        git_commit: env!("GIT_COMMIT_SHORT"),
        build_timestamp: env!("BUILD_TIMESTAMP"),
    };

    Ok(json_response(StatusCode::OK, &response))
}
