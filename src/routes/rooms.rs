//! Room endpoints

use bytes::Bytes;
use hyper::StatusCode;

use super::{empty_response, json_response, parse_json, path_param, HttpResult};
use crate::server::AppState;
use crate::types::{AvailabilityUpdate, InnspotError, RoomListQuery};

/// GET /rooms?sort=asc|desc
pub async fn handle_list_rooms(state: &AppState, query: Option<&str>) -> HttpResult {
    let query: RoomListQuery = serde_urlencoded::from_str(query.unwrap_or(""))
        .map_err(|e| InnspotError::BadRequest(format!("Invalid query: {}", e)))?;

    let rooms = state.rooms.list_available(query.direction()?).await?;
    Ok(json_response(StatusCode::OK, &rooms))
}

/// GET /rooms/:id, answering 200 with an empty body when nothing matches
pub async fn handle_get_room(state: &AppState, id: &str) -> HttpResult {
    match state.rooms.get_by_id(&path_param(id)?).await? {
        Some(room) => Ok(json_response(StatusCode::OK, &room)),
        None => Ok(empty_response(StatusCode::OK)),
    }
}

/// PATCH /rooms/:id
pub async fn handle_update_room(state: &AppState, id: &str, body: &Bytes) -> HttpResult {
    let update: AvailabilityUpdate = parse_json(body)?;
    let ack = state
        .rooms
        .set_availability_by_id(&path_param(id)?, update.status()?)
        .await?;
    Ok(json_response(StatusCode::OK, &ack))
}

/// PATCH /cancelRoom/:number
pub async fn handle_cancel_room(state: &AppState, number: &str, body: &Bytes) -> HttpResult {
    let update: AvailabilityUpdate = parse_json(body)?;
    let ack = state
        .rooms
        .set_availability_by_room_number(&path_param(number)?, update.status()?)
        .await?;
    Ok(json_response(StatusCode::OK, &ack))
}
