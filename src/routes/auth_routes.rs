//! Token cookie issue and logout
//!
//! `POST /jwt` signs the posted identity into the `accessToken` cookie,
//! `POST /logout` expires it. Both answer `{ "success": true }`.

use bytes::Bytes;
use hyper::header::{HeaderValue, SET_COOKIE};
use hyper::StatusCode;
use tracing::debug;

use super::{json_response, parse_json, HttpResult};
use crate::auth::TokenRequest;
use crate::server::AppState;
use crate::types::InnspotError;

fn success_with_cookie(cookie: String) -> HttpResult {
    let value = HeaderValue::from_str(&cookie)
        .map_err(|e| InnspotError::Internal(format!("Invalid cookie header: {}", e)))?;

    let mut response = json_response(StatusCode::OK, &serde_json::json!({ "success": true }));
    response.headers_mut().insert(SET_COOKIE, value);
    Ok(response)
}

/// POST /jwt
pub async fn handle_issue_token(state: &AppState, body: &Bytes) -> HttpResult {
    let request: TokenRequest = parse_json(body)?;
    let cookie = state.auth.issue_token(request)?;
    success_with_cookie(cookie)
}

/// POST /logout
pub async fn handle_logout(state: &AppState, body: &Bytes) -> HttpResult {
    if !body.is_empty() {
        debug!("Logout requested by {}", String::from_utf8_lossy(body));
    }
    success_with_cookie(state.auth.clear_token())
}
