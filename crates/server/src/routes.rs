use std::any::Any;
use std::path::Path;

use axum::{
    extract::Request,
    http::{header, Method},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any as AnyOrigin, CorsLayer},
    services::ServeDir,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{debug, Level};

use common::types::{Health, Ping};

use crate::errors::JsonApiError;
use crate::state::ServerState;

pub mod auth;
pub mod employees;

pub async fn health() -> Json<Health> {
    Json(Health::ok())
}

pub async fn api_test() -> Json<Ping> {
    Json(Ping { message: "API is working" })
}

async fn not_found() -> JsonApiError {
    JsonApiError::not_found("Route not found")
}

/// Any origin; the methods and headers the frontend uses.
pub fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AnyOrigin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

/// Log method and URI, plus the first 20 characters of any Authorization header.
async fn log_request(req: Request, next: Next) -> Response {
    let authz = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(|v| format!("{}...", v.chars().take(20).collect::<String>()));
    debug!(method = %req.method(), uri = %req.uri(), authorization = authz.as_deref().unwrap_or("-"), "incoming request");
    next.run(req).await
}

/// Panics inside handlers become a generic JSON 500.
fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };
    JsonApiError::internal(format!("handler panicked: {detail}")).into_response()
}

/// Build the full application router: public, token-protected and static routes.
pub fn build_router(state: ServerState, uploads_dir: &Path, cors: CorsLayer) -> Router {
    // Public routes (health + auth entry points)
    let public = Router::new()
        .route("/health", get(health))
        .route("/api/test", get(api_test))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout));

    // Routes that need a valid bearer token or auth cookie
    let protected = Router::new()
        .route("/api/auth/me", get(auth::me).put(auth::update_me).delete(auth::delete_me))
        .route("/api/employees", get(employees::list).post(employees::create))
        .route(
            "/api/employees/:id",
            get(employees::get_one).put(employees::update).delete(employees::remove),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_bearer_token));

    public
        .merge(protected)
        .nest_service("/uploads", ServeDir::new(uploads_dir))
        .fallback(not_found)
        .with_state(state)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(middleware::from_fn(log_request))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
