use axum::{
    extract::{rejection::JsonRejection, Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
    Extension, Json,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use models::Record;
use serde_json::Value;
use service::auth::domain::{AuthSession, Claims, LoginInput, RegisterInput};

use crate::errors::JsonApiError;
use crate::state::ServerState;

pub const AUTH_COOKIE: &str = "auth_token";

fn session_cookie(token: String) -> Cookie<'static> {
    let mut cookie = Cookie::new(AUTH_COOKIE, token);
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_secure(false);
    cookie.set_same_site(SameSite::Lax);
    cookie
}

fn removal_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::from(AUTH_COOKIE);
    cookie.set_path("/");
    cookie
}

/// `POST /api/auth/register` → 201 `{token, user}`
pub async fn register(
    State(state): State<ServerState>,
    jar: CookieJar,
    payload: Result<Json<RegisterInput>, JsonRejection>,
) -> Result<(StatusCode, CookieJar, Json<AuthSession>), JsonApiError> {
    let Json(input) = payload?;
    let session = state.auth.register(input).await?;
    let jar = jar.add(session_cookie(session.token.clone()));
    Ok((StatusCode::CREATED, jar, Json(session)))
}

/// `POST /api/auth/login` → 200 `{token, user}`
pub async fn login(
    State(state): State<ServerState>,
    jar: CookieJar,
    payload: Result<Json<LoginInput>, JsonRejection>,
) -> Result<(CookieJar, Json<AuthSession>), JsonApiError> {
    let Json(input) = payload?;
    let session = state.auth.login(input).await?;
    let jar = jar.add(session_cookie(session.token.clone()));
    Ok((jar, Json(session)))
}

pub async fn logout(jar: CookieJar) -> (CookieJar, StatusCode) {
    (jar.remove(removal_cookie()), StatusCode::NO_CONTENT)
}

pub async fn me(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Record>, JsonApiError> {
    Ok(Json(state.auth.profile(&claims.sub).await?))
}

pub async fn update_me(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Record>, JsonApiError> {
    let Json(body) = payload?;
    let patch = Record::from_value(body)?;
    Ok(Json(state.auth.update_profile(&claims.sub, patch).await?))
}

pub async fn delete_me(
    State(state): State<ServerState>,
    Extension(claims): Extension<Claims>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<Value>), JsonApiError> {
    state.auth.delete_account(&claims.sub).await?;
    Ok((jar.remove(removal_cookie()), Json(serde_json::json!({"message": "Account deleted"}))))
}

/// Middleware: require `Authorization: Bearer <token>` or the `auth_token`
/// cookie. Verified claims are added to the request extensions.
pub async fn require_bearer_token(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, JsonApiError> {
    let path = req.uri().path().to_string();
    let token = match req.headers().get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        Some(h) => match h.strip_prefix("Bearer ") {
            Some(t) => t.trim().to_string(),
            None => {
                tracing::warn!(path = %path, "invalid Authorization format (expect Bearer)");
                return Err(JsonApiError::unauthorized("Invalid Authorization format"));
            }
        },
        None => match CookieJar::from_headers(req.headers()).get(AUTH_COOKIE) {
            Some(c) if !c.value().is_empty() => c.value().to_string(),
            _ => {
                tracing::warn!(path = %path, "missing Authorization header and auth_token cookie");
                return Err(JsonApiError::unauthorized("No token provided"));
            }
        },
    };

    match state.auth.verify_token(&token) {
        Ok(claims) => {
            req.extensions_mut().insert(claims);
            Ok(next.run(req).await)
        }
        Err(e) => {
            tracing::warn!(path = %path, err = %e, "token validation failed");
            Err(e.into())
        }
    }
}
