//! Health check endpoints
//!
//! - `/` - plain-text banner kept for existing clients
//! - `/health` - liveness, 200 whenever the process is serving
//! - `/ready` - readiness, 503 while the MongoDB deployment is unreachable
//! - `/version` - build metadata captured by `build.rs`

use bytes::Bytes;
use http_body_util::Full;
use hyper::{Response, StatusCode};
use serde::Serialize;
use tracing::warn;

use super::{json_response, text_response};
use crate::server::AppState;

pub const ROOT_BANNER: &str = "The InnSpot server is running";

#[derive(Serialize)]
pub struct HealthResponse {
    pub healthy: bool,
    pub version: &'static str,
    /// Seconds since startup
    pub uptime: u64,
    /// Active storage backend: `mongodb` or `memory`
    pub store: &'static str,
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionResponse {
    pub version: &'static str,
    pub commit: &'static str,
    pub commit_full: &'static str,
    pub build_time: &'static str,
    pub service: &'static str,
}

pub fn root_banner() -> Response<Full<Bytes>> {
    text_response(StatusCode::OK, ROOT_BANNER)
}

fn build_health_response(state: &AppState, error: Option<String>) -> HealthResponse {
    HealthResponse {
        healthy: error.is_none(),
        version: env!("CARGO_PKG_VERSION"),
        uptime: state.started_at.elapsed().as_secs(),
        store: state.rooms.backend(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        error,
    }
}

/// Liveness probe: always 200 while the service runs
pub fn health_check(state: &AppState) -> Response<Full<Bytes>> {
    json_response(StatusCode::OK, &build_health_response(state, None))
}

/// Readiness probe: pings MongoDB when one is configured
pub async fn readiness_check(state: &AppState) -> Response<Full<Bytes>> {
    let error = match &state.mongo {
        Some(mongo) => match mongo.ping().await {
            Ok(()) => None,
            Err(e) => {
                warn!("Readiness check failed: {}", e);
                Some(e.client_message())
            }
        },
        None => None,
    };

    let status = if error.is_none() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    json_response(status, &build_health_response(state, error))
}

pub fn version_info() -> Response<Full<Bytes>> {
    let response = VersionResponse {
        version: env!("CARGO_PKG_VERSION"),
        commit: option_env!("GIT_COMMIT_SHORT").unwrap_or("unknown"),
        commit_full: option_env!("GIT_COMMIT_FULL").unwrap_or("unknown"),
        build_time: option_env!("BUILD_TIMESTAMP").unwrap_or("unknown"),
        service: "innspot",
    };
    json_response(StatusCode::OK, &response)
}
