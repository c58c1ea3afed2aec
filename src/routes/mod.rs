//! HTTP routes for InnSpot
//!
//! Handlers return `HttpResult`; `server::dispatch` turns the error side into
//! a JSON error response, so no handler builds its own error bodies.

pub mod auth_routes;
pub mod bookings;
pub mod health;
pub mod rooms;

pub use auth_routes::{handle_issue_token, handle_logout};
pub use bookings::{
    handle_create_booking, handle_delete_booking, handle_list_bookings, handle_update_booking,
};
pub use health::{health_check, readiness_check, root_banner, version_info};
pub use rooms::{handle_cancel_room, handle_get_room, handle_list_rooms, handle_update_room};

use bytes::Bytes;
use http_body_util::{BodyExt, Full, LengthLimitError, Limited};
use hyper::body::Body;
use hyper::header::{HeaderValue, CONTENT_TYPE};
use hyper::{Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::types::InnspotError;

/// Largest request body accepted
pub const MAX_BODY_BYTES: usize = 64 * 1024;

pub type HttpResult = Result<Response<Full<Bytes>>, InnspotError>;

/// Serialize `body` as a JSON response
pub fn json_response<T: Serialize + ?Sized>(status: StatusCode, body: &T) -> Response<Full<Bytes>> {
    let json = serde_json::to_vec(body).unwrap_or_else(|_| b"{}".to_vec());
    with_content_type(status, json, "application/json")
}

pub fn text_response(status: StatusCode, text: impl Into<String>) -> Response<Full<Bytes>> {
    with_content_type(status, text.into(), "text/plain; charset=utf-8")
}

/// `{ "error": <kind>, "message": <text> }` with the mapped status.
/// Server-side errors carry only a generic message.
pub fn error_response(err: &InnspotError) -> Response<Full<Bytes>> {
    let body = serde_json::json!({
        "error": err.kind(),
        "message": err.client_message(),
    });
    json_response(err.status_code(), &body)
}

pub fn empty_response(status: StatusCode) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(Bytes::new()));
    *response.status_mut() = status;
    response
}

fn with_content_type(
    status: StatusCode,
    body: impl Into<Bytes>,
    content_type: &'static str,
) -> Response<Full<Bytes>> {
    let mut response = Response::new(Full::new(body.into()));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
    response
}

/// Buffer a request body, rejecting anything over [`MAX_BODY_BYTES`]
pub async fn read_body<B>(body: B) -> Result<Bytes, InnspotError>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    match Limited::new(body, MAX_BODY_BYTES).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(e) if e.downcast_ref::<LengthLimitError>().is_some() => Err(
            InnspotError::BadRequest(format!("Request body exceeds {} bytes", MAX_BODY_BYTES)),
        ),
        Err(e) => Err(InnspotError::BadRequest(format!("Failed to read body: {}", e))),
    }
}

/// Decode a JSON request body
pub fn parse_json<T: DeserializeOwned>(body: &Bytes) -> Result<T, InnspotError> {
    serde_json::from_slice(body).map_err(|e| InnspotError::BadRequest(format!("Invalid JSON: {}", e)))
}

/// Percent-decode a single path segment
pub fn path_param(segment: &str) -> Result<String, InnspotError> {
    let decoded = urlencoding::decode(segment)
        .map_err(|_| InnspotError::BadRequest("Path parameter is not valid UTF-8".into()))?;
    if decoded.is_empty() {
        return Err(InnspotError::BadRequest("Empty path parameter".into()));
    }
    Ok(decoded.into_owned())
}
