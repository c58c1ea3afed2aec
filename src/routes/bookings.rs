//! Booking endpoints
//!
//! Only `GET /bookings/:email` is gated: the cookie identity must equal the
//! path email. Create, delete and update are open.

use bytes::Bytes;
use hyper::header::HeaderMap;
use hyper::StatusCode;

use super::{json_response, parse_json, path_param, HttpResult};
use crate::server::AppState;
use crate::types::{Booking, BookingPatch};

/// POST /bookings
pub async fn handle_create_booking(state: &AppState, body: &Bytes) -> HttpResult {
    let booking: Booking = parse_json(body)?;
    let ack = state.bookings.create(booking).await?;
    Ok(json_response(StatusCode::OK, &ack))
}

/// GET /bookings/:email
pub async fn handle_list_bookings(state: &AppState, email: &str, headers: &HeaderMap) -> HttpResult {
    let caller = state.auth.verify(headers)?;
    let bookings = state
        .bookings
        .list_by_owner(&path_param(email)?, &caller)
        .await?;
    Ok(json_response(StatusCode::OK, &bookings))
}

/// DELETE /bookings/:id
pub async fn handle_delete_booking(state: &AppState, id: &str) -> HttpResult {
    let ack = state.bookings.delete_by_id(&path_param(id)?).await?;
    Ok(json_response(StatusCode::OK, &ack))
}

/// PATCH /bookings/:id
pub async fn handle_update_booking(state: &AppState, id: &str, body: &Bytes) -> HttpResult {
    let patch: BookingPatch = parse_json(body)?;
    let ack = state
        .bookings
        .update_by_id(&path_param(id)?, &patch)
        .await?;
    Ok(json_response(StatusCode::OK, &ack))
}
