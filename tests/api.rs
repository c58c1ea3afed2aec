//! End-to-end HTTP behavior against the in-memory stores

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::header::{COOKIE, ORIGIN, SET_COOKIE};
use hyper::{Method, Request, Response, StatusCode};
use serde_json::{json, Value};
use std::net::SocketAddr;

use innspot::config::Args;
use innspot::server::{dispatch, AppState};
use innspot::store::MemoryRoomStore;

const ROOM_A: &str = "65a1f0c2e4b0a1b2c3d4e501";
const ROOM_B: &str = "65a1f0c2e4b0a1b2c3d4e502";
const ROOM_C: &str = "65a1f0c2e4b0a1b2c3d4e503";
const ROOM_D: &str = "65a1f0c2e4b0a1b2c3d4e504";
const MISSING_ID: &str = "65a1f0c2e4b0a1b2c3d4e5ff";

fn state() -> AppState {
    let rooms = MemoryRoomStore::from_seed_json(
        &json!([
            { "_id": ROOM_A, "roomNumber": 101, "status": "Available", "pricePerNight": 120.0, "roomType": "Deluxe" },
            { "_id": ROOM_B, "roomNumber": 102, "status": "Available", "pricePerNight": 80.0 },
            { "_id": ROOM_C, "roomNumber": 103, "status": "Booked", "pricePerNight": 60.0 },
            { "_id": ROOM_D, "roomNumber": 104, "status": "Available", "pricePerNight": 200.0 }
        ])
        .to_string(),
    )
    .unwrap();
    AppState::in_memory(Args::for_dev(), rooms).unwrap()
}

fn addr() -> SocketAddr {
    "127.0.0.1:40000".parse().unwrap()
}

async fn send(
    state: &AppState,
    method: Method,
    uri: &str,
    body: Option<Value>,
    cookie: Option<&str>,
) -> Response<Full<Bytes>> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }
    let body = body.map(|v| v.to_string()).unwrap_or_default();
    let req = builder.body(Full::new(Bytes::from(body))).unwrap();
    dispatch(state, addr(), req).await
}

async fn json_body(response: Response<Full<Bytes>>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Log in as `email` and return the `Cookie` header value
async fn login(state: &AppState, email: &str) -> String {
    let response = send(state, Method::POST, "/jwt", Some(json!({ "email": email })), None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let set_cookie = response.headers().get(SET_COOKIE).unwrap().to_str().unwrap();
    set_cookie.split(';').next().unwrap().to_string()
}

fn prices(rooms: &Value) -> Vec<f64> {
    rooms
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["pricePerNight"].as_f64().unwrap())
        .collect()
}

#[tokio::test]
async fn root_reports_running() {
    let state = state();
    let response = send(&state, Method::GET, "/", None, None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"The InnSpot server is running");
}

#[tokio::test]
async fn listing_returns_only_available_rooms_sorted() {
    let state = state();

    let asc = json_body(send(&state, Method::GET, "/rooms?sort=asc", None, None).await).await;
    assert_eq!(prices(&asc), vec![80.0, 120.0, 200.0]);
    assert!(asc
        .as_array()
        .unwrap()
        .iter()
        .all(|r| r["status"] == "Available"));

    let desc = json_body(send(&state, Method::GET, "/rooms?sort=desc", None, None).await).await;
    assert_eq!(prices(&desc), vec![200.0, 120.0, 80.0]);

    let default = json_body(send(&state, Method::GET, "/rooms", None, None).await).await;
    assert_eq!(prices(&default), vec![200.0, 120.0, 80.0]);

    let bad = send(&state, Method::GET, "/rooms?sort=sideways", None, None).await;
    assert_eq!(bad.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn room_lookup() {
    let state = state();

    let found = json_body(send(&state, Method::GET, &format!("/rooms/{}", ROOM_A), None, None).await).await;
    assert_eq!(found["_id"], ROOM_A);
    assert_eq!(found["roomNumber"], 101);
    assert_eq!(found["roomType"], "Deluxe");

    let missing = send(&state, Method::GET, &format!("/rooms/{}", MISSING_ID), None, None).await;
    assert_eq!(missing.status(), StatusCode::OK);
    assert!(missing.headers().get("content-type").is_none());
    let bytes = missing.into_body().collect().await.unwrap().to_bytes();
    assert!(bytes.is_empty());

    let malformed = send(&state, Method::GET, "/rooms/not-an-id", None, None).await;
    assert_eq!(malformed.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn booking_a_room_removes_it_from_listing() {
    let state = state();
    let uri = format!("/rooms/{}", ROOM_A);

    let first = json_body(
        send(&state, Method::PATCH, &uri, Some(json!({ "availability": "Booked" })), None).await,
    )
    .await;
    assert_eq!(first["matchedCount"], 1);
    assert_eq!(first["modifiedCount"], 1);

    let second = json_body(
        send(&state, Method::PATCH, &uri, Some(json!({ "availability": "Booked" })), None).await,
    )
    .await;
    assert_eq!(second["matchedCount"], 1);
    assert_eq!(second["modifiedCount"], 0);

    let rooms = json_body(send(&state, Method::GET, "/rooms", None, None).await).await;
    assert!(rooms.as_array().unwrap().iter().all(|r| r["_id"] != ROOM_A));

    let unknown = send(&state, Method::PATCH, &uri, Some(json!({ "availability": "Cleaning" })), None).await;
    assert_eq!(unknown.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn cancel_room_by_number() {
    let state = state();

    let ack = json_body(
        send(
            &state,
            Method::PATCH,
            "/cancelRoom/103",
            Some(json!({ "availability": "Available" })),
            None,
        )
        .await,
    )
    .await;
    assert_eq!(ack["modifiedCount"], 1);

    let rooms = json_body(send(&state, Method::GET, "/rooms?sort=asc", None, None).await).await;
    assert_eq!(prices(&rooms), vec![60.0, 80.0, 120.0, 200.0]);

    let none = json_body(
        send(
            &state,
            Method::PATCH,
            "/cancelRoom/999",
            Some(json!({ "availability": "Available" })),
            None,
        )
        .await,
    )
    .await;
    assert_eq!(none["matchedCount"], 0);
}

#[tokio::test]
async fn create_then_list_own_bookings() {
    let state = state();

    let created = send(
        &state,
        Method::POST,
        "/bookings",
        Some(json!({
            "userEmail": "a@x.com",
            "checkInDate": "2024-01-01",
            "checkOutDate": "2024-01-03",
            "totalDays": 2,
            "totalPrice": 200
        })),
        None,
    )
    .await;
    assert_eq!(created.status(), StatusCode::OK);
    let ack = json_body(created).await;
    assert_eq!(ack["acknowledged"], true);
    let id = ack["insertedId"].as_str().unwrap().to_string();

    let cookie = login(&state, "a@x.com").await;
    let listed = send(&state, Method::GET, "/bookings/a@x.com", None, Some(&cookie)).await;
    assert_eq!(listed.status(), StatusCode::OK);
    let bookings = json_body(listed).await;
    let bookings = bookings.as_array().unwrap();
    assert_eq!(bookings.len(), 1);
    assert_eq!(bookings[0]["_id"], id.as_str());
    assert_eq!(bookings[0]["checkOutDate"], "2024-01-03");
    assert_eq!(bookings[0]["totalDays"], 2);

    let encoded = send(&state, Method::GET, "/bookings/a%40x.com", None, Some(&cookie)).await;
    assert_eq!(json_body(encoded).await.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn booking_payload_round_trips_unchanged() {
    let state = state();
    let payload = json!({
        "userEmail": "a@x.com",
        "userName": "Ann",
        "checkInDate": "2024-01-01",
        "checkOutDate": "2024-01-03",
        "totalDays": "2",
        "totalPrice": 200,
        "roomNumber": 101,
        "guests": [{ "name": "Ann" }, { "name": "Bo" }]
    });

    let created = send(&state, Method::POST, "/bookings", Some(payload.clone()), None).await;
    assert_eq!(created.status(), StatusCode::OK);
    let id = json_body(created).await["insertedId"].as_str().unwrap().to_string();

    let fractional = send(
        &state,
        Method::POST,
        "/bookings",
        Some(json!({ "userEmail": "b@x.com", "totalDays": 2.5 })),
        None,
    )
    .await;
    assert_eq!(fractional.status(), StatusCode::OK);

    let cookie = login(&state, "a@x.com").await;
    let listed = json_body(send(&state, Method::GET, "/bookings/a@x.com", None, Some(&cookie)).await).await;

    let mut expected = payload;
    expected["_id"] = json!(id);
    assert_eq!(listed, json!([expected]));
    assert!(listed[0]["totalPrice"].is_u64());
    assert!(listed[0]["totalDays"].is_string());
}

#[tokio::test]
async fn owner_gate() {
    let state = state();
    send(
        &state,
        Method::POST,
        "/bookings",
        Some(json!({ "userEmail": "b@x.com", "totalPrice": 99 })),
        None,
    )
    .await;

    let anonymous = send(&state, Method::GET, "/bookings/b@x.com", None, None).await;
    assert_eq!(anonymous.status(), StatusCode::UNAUTHORIZED);

    let forged = send(
        &state,
        Method::GET,
        "/bookings/b@x.com",
        None,
        Some("accessToken=not.a.token"),
    )
    .await;
    assert_eq!(forged.status(), StatusCode::UNAUTHORIZED);

    let cookie = login(&state, "a@x.com").await;
    let other = send(&state, Method::GET, "/bookings/b@x.com", None, Some(&cookie)).await;
    assert_eq!(other.status(), StatusCode::FORBIDDEN);
    let body = json_body(other).await;
    assert_eq!(body["error"], "forbidden");
    assert!(body.get("userEmail").is_none());
    assert!(!body.to_string().contains("totalPrice"));
}

#[tokio::test]
async fn token_cookie_attributes() {
    let state = state();

    let issued = send(&state, Method::POST, "/jwt", Some(json!({ "email": " a@x.com " })), None).await;
    let cookie = issued.headers().get(SET_COOKIE).unwrap().to_str().unwrap().to_string();
    assert!(cookie.starts_with("accessToken="));
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("Max-Age=86400"));
    assert_eq!(json_body(issued).await, json!({ "success": true }));

    let invalid = send(&state, Method::POST, "/jwt", Some(json!({ "email": "nobody" })), None).await;
    assert_eq!(invalid.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let logout = send(&state, Method::POST, "/logout", Some(json!({ "email": "a@x.com" })), None).await;
    assert_eq!(logout.status(), StatusCode::OK);
    let cleared = logout.headers().get(SET_COOKIE).unwrap().to_str().unwrap();
    assert!(cleared.starts_with("accessToken=;"));
    assert!(cleared.contains("Max-Age=0"));
}

#[tokio::test]
async fn delete_and_update_bookings() {
    let state = state();

    let missing = json_body(
        send(&state, Method::DELETE, &format!("/bookings/{}", MISSING_ID), None, None).await,
    )
    .await;
    assert_eq!(missing["deletedCount"], 0);

    let ack = json_body(
        send(
            &state,
            Method::POST,
            "/bookings",
            Some(json!({ "userEmail": "a@x.com", "userName": "Ann", "totalDays": 1 })),
            None,
        )
        .await,
    )
    .await;
    let uri = format!("/bookings/{}", ack["insertedId"].as_str().unwrap());

    let updated = json_body(
        send(&state, Method::PATCH, &uri, Some(json!({ "totalDays": 3, "totalPrice": 300 })), None)
            .await,
    )
    .await;
    assert_eq!(updated["matchedCount"], 1);
    assert_eq!(updated["modifiedCount"], 1);

    let empty = send(&state, Method::PATCH, &uri, Some(json!({})), None).await;
    assert_eq!(empty.status(), StatusCode::BAD_REQUEST);

    let cookie = login(&state, "a@x.com").await;
    let bookings = json_body(send(&state, Method::GET, "/bookings/a@x.com", None, Some(&cookie)).await).await;
    assert_eq!(bookings[0]["totalDays"], 3);
    assert_eq!(bookings[0]["userName"], "Ann");

    let deleted = json_body(send(&state, Method::DELETE, &uri, None, None).await).await;
    assert_eq!(deleted["deletedCount"], 1);

    let bookings = json_body(send(&state, Method::GET, "/bookings/a@x.com", None, Some(&cookie)).await).await;
    assert!(bookings.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn unknown_routes_and_methods() {
    let state = state();

    let missing = send(&state, Method::GET, "/nowhere", None, None).await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);

    let wrong = send(&state, Method::DELETE, "/rooms", None, None).await;
    assert_eq!(wrong.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(wrong.headers().get("allow").unwrap(), "GET");

    let garbage = Request::builder()
        .method(Method::POST)
        .uri("/bookings")
        .body(Full::new(Bytes::from_static(b"{not json")))
        .unwrap();
    let response = dispatch(&state, addr(), garbage).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn cors_for_allowed_origins() {
    let state = state();

    let preflight = Request::builder()
        .method(Method::OPTIONS)
        .uri("/bookings")
        .header(ORIGIN, "http://localhost:5173")
        .body(Full::new(Bytes::new()))
        .unwrap();
    let response = dispatch(&state, addr(), preflight).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(
        response.headers().get("access-control-allow-origin").unwrap(),
        "http://localhost:5173"
    );
    assert_eq!(
        response.headers().get("access-control-allow-credentials").unwrap(),
        "true"
    );

    let foreign = Request::builder()
        .method(Method::GET)
        .uri("/rooms")
        .header(ORIGIN, "https://elsewhere.example")
        .body(Full::new(Bytes::new()))
        .unwrap();
    let response = dispatch(&state, addr(), foreign).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get("access-control-allow-origin").is_none());
}

#[tokio::test]
async fn health_probes() {
    let state = state();

    let health = json_body(send(&state, Method::GET, "/health", None, None).await).await;
    assert_eq!(health["healthy"], true);
    assert_eq!(health["store"], "memory");

    let ready = send(&state, Method::GET, "/ready", None, None).await;
    assert_eq!(ready.status(), StatusCode::OK);

    let version = json_body(send(&state, Method::GET, "/version", None, None).await).await;
    assert_eq!(version["service"], "innspot");
}
