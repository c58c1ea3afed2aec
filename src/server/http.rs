//! HTTP server implementation
//!
//! hyper http1 over `TokioIo`, one task per connection. All requests go
//! through [`dispatch`], which routes, translates errors into JSON and adds
//! CORS and request-id headers.

use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Body;
use hyper::header::{
    HeaderMap, HeaderName, HeaderValue, ACCESS_CONTROL_ALLOW_CREDENTIALS,
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    ACCESS_CONTROL_MAX_AGE, ALLOW, ORIGIN, VARY,
};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::auth::{AuthGate, JwtValidator};
use crate::config::Args;
use crate::db::MongoClient;
use crate::routes::{self, empty_response, error_response, read_body, HttpResult};
use crate::services::{BookingService, RoomService};
use crate::store::{
    BookingStore, MemoryBookingStore, MemoryRoomStore, MongoBookingStore, MongoRoomStore,
    RoomStore,
};
use crate::types::InnspotError;

const REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Endpoints that change data without checking the caller
pub const UNAUTHENTICATED_WRITES: &[&str] = &[
    "PATCH /rooms/:id",
    "PATCH /cancelRoom/:number",
    "POST /bookings",
    "DELETE /bookings/:id",
    "PATCH /bookings/:id",
];

/// Shared application state
pub struct AppState {
    pub args: Args,
    /// Present when running against MongoDB; closed on shutdown
    pub mongo: Option<MongoClient>,
    pub auth: AuthGate,
    pub rooms: RoomService,
    pub bookings: BookingService,
    pub cors_origins: Vec<String>,
    pub started_at: Instant,
}

impl AppState {
    fn build(
        args: Args,
        mongo: Option<MongoClient>,
        rooms: Arc<dyn RoomStore>,
        bookings: Arc<dyn BookingStore>,
    ) -> Result<Self, InnspotError> {
        let secret = args
            .jwt_secret()
            .ok_or_else(|| InnspotError::Config("JWT_SECRET is not set".into()))?;
        let jwt = JwtValidator::new(secret, args.jwt_expiry_seconds)?;

        Ok(Self {
            auth: AuthGate::new(jwt, args.cookie_secure),
            rooms: RoomService::new(rooms),
            bookings: BookingService::new(bookings),
            cors_origins: args.cors_origin_list(),
            started_at: Instant::now(),
            mongo,
            args,
        })
    }

    /// State backed by the `rooms` and `bookings` collections
    pub async fn with_mongo(args: Args, mongo: MongoClient) -> Result<Self, InnspotError> {
        let rooms = Arc::new(MongoRoomStore::new(&mongo).await?);
        let bookings = Arc::new(MongoBookingStore::new(&mongo).await?);
        Self::build(args, Some(mongo), rooms, bookings)
    }

    /// State backed by in-memory stores, starting with `rooms` and no bookings
    pub fn in_memory(args: Args, rooms: MemoryRoomStore) -> Result<Self, InnspotError> {
        Self::build(
            args,
            None,
            Arc::new(rooms),
            Arc::new(MemoryBookingStore::new()),
        )
    }

    fn allowed_origin(&self, headers: &HeaderMap) -> Option<HeaderValue> {
        let origin = headers.get(ORIGIN)?;
        let value = origin.to_str().ok()?.trim_end_matches('/');
        self.cors_origins
            .iter()
            .any(|allowed| allowed == value)
            .then(|| origin.clone())
    }
}

/// Serve until Ctrl+C or SIGTERM, then close the MongoDB client
pub async fn run(state: Arc<AppState>) -> Result<(), InnspotError> {
    let listener = TcpListener::bind(state.args.listen).await?;
    info!("InnSpot listening on {}", state.args.listen);

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accepted = listener.accept() => match accepted {
                Ok((stream, addr)) => {
                    let state = Arc::clone(&state);
                    tokio::spawn(async move {
                        let io = TokioIo::new(stream);

                        let service = service_fn(move |req| {
                            let state = Arc::clone(&state);
                            async move { Ok::<_, Infallible>(dispatch(&state, addr, req).await) }
                        });

                        if let Err(err) = http1::Builder::new()
                            .serve_connection(io, service)
                            .await
                        {
                            debug!("Error serving connection from {}: {:?}", addr, err);
                        }
                    });
                }
                Err(e) => {
                    error!("Error accepting connection: {:?}", e);
                }
            },
            _ = &mut shutdown => break,
        }
    }

    info!("Stopped accepting connections");
    if let Some(mongo) = state.mongo.clone() {
        mongo.shutdown().await;
    }
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match tokio::signal::ctrl_c().await {
            Ok(()) => info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Methods served on a path, `None` when the path is unknown
fn allowed_methods(segments: &[&str]) -> Option<&'static str> {
    match segments {
        [""] | ["health"] | ["ready"] | ["version"] => Some("GET"),
        ["jwt"] | ["logout"] | ["bookings"] => Some("POST"),
        ["rooms"] => Some("GET"),
        ["rooms", id] if !id.is_empty() => Some("GET, PATCH"),
        ["cancelRoom", n] if !n.is_empty() => Some("PATCH"),
        ["bookings", key] if !key.is_empty() => Some("GET, PATCH, DELETE"),
        _ => None,
    }
}

/// Route one request and produce its response. Never fails: errors become
/// JSON error responses.
pub async fn dispatch<B>(state: &AppState, addr: SocketAddr, req: Request<B>) -> Response<Full<Bytes>>
where
    B: Body<Data = Bytes>,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    let request_id = Uuid::new_v4();
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let query = req.uri().query().map(str::to_string);
    let origin = state.allowed_origin(req.headers());

    info!("[{}] {} {} ({})", addr, method, path, request_id);

    let segments: Vec<&str> = path.trim_matches('/').split('/').collect();

    let mut response = match allowed_methods(&segments) {
        None => error_response(&InnspotError::NotFound(format!("No route for {}", path))),
        Some(allow) if method == Method::OPTIONS => preflight_response(allow),
        Some(allow) if !allow.split(", ").any(|m| m == method.as_str()) => {
            let mut response = error_response(&InnspotError::MethodNotAllowed(format!(
                "{} is not supported on {}",
                method, path
            )));
            response
                .headers_mut()
                .insert(ALLOW, HeaderValue::from_static(allow));
            response
        }
        Some(_) => {
            let (parts, body) = req.into_parts();
            let result = match read_body(body).await {
                Ok(body) => {
                    route(state, &method, &segments, query.as_deref(), &parts.headers, &body).await
                }
                Err(e) => Err(e),
            };

            match result {
                Ok(response) => response,
                Err(e) => {
                    if e.is_server_error() {
                        error!("[{}] {} {} failed: {}", request_id, method, path, e);
                    } else {
                        debug!("[{}] {} {} rejected: {}", request_id, method, path, e);
                    }
                    error_response(&e)
                }
            }
        }
    };

    let headers = response.headers_mut();
    if let Ok(id) = HeaderValue::from_str(&request_id.to_string()) {
        headers.insert(REQUEST_ID, id);
    }
    if let Some(origin) = origin {
        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, origin);
        headers.insert(
            ACCESS_CONTROL_ALLOW_CREDENTIALS,
            HeaderValue::from_static("true"),
        );
        headers.insert(VARY, HeaderValue::from_static("Origin"));
    }
    response
}

async fn route(
    state: &AppState,
    method: &Method,
    segments: &[&str],
    query: Option<&str>,
    headers: &HeaderMap,
    body: &Bytes,
) -> HttpResult {
    match (method, segments) {
        (&Method::GET, [""]) => Ok(routes::root_banner()),
        (&Method::GET, ["health"]) => Ok(routes::health_check(state)),
        (&Method::GET, ["ready"]) => Ok(routes::readiness_check(state).await),
        (&Method::GET, ["version"]) => Ok(routes::version_info()),

        (&Method::POST, ["jwt"]) => routes::handle_issue_token(state, body).await,
        (&Method::POST, ["logout"]) => routes::handle_logout(state, body).await,

        (&Method::GET, ["rooms"]) => routes::handle_list_rooms(state, query).await,
        (&Method::GET, ["rooms", id]) => routes::handle_get_room(state, id).await,
        (&Method::PATCH, ["rooms", id]) => routes::handle_update_room(state, id, body).await,
        (&Method::PATCH, ["cancelRoom", number]) => {
            routes::handle_cancel_room(state, number, body).await
        }

        (&Method::POST, ["bookings"]) => routes::handle_create_booking(state, body).await,
        (&Method::GET, ["bookings", email]) => {
            routes::handle_list_bookings(state, email, headers).await
        }
        (&Method::DELETE, ["bookings", id]) => routes::handle_delete_booking(state, id).await,
        (&Method::PATCH, ["bookings", id]) => {
            routes::handle_update_booking(state, id, body).await
        }

        _ => {
            warn!("Unrouted {} /{}", method, segments.join("/"));
            Err(InnspotError::NotFound("No such route".into()))
        }
    }
}

fn preflight_response(allow: &'static str) -> Response<Full<Bytes>> {
    let mut response = empty_response(StatusCode::NO_CONTENT);
    let headers = response.headers_mut();
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(allow),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type"),
    );
    headers.insert(ACCESS_CONTROL_MAX_AGE, HeaderValue::from_static("86400"));
    response
}
