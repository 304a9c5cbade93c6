mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use common::TestApp;
use serde_json::json;

#[tokio::test]
async fn health_and_test_endpoints() -> anyhow::Result<()> {
    let t = TestApp::new().await?;
    let (status, _, body) = t.send("GET", "/health", None, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok", "message": "Server is running"}));

    let (status, _, body) = t.send("GET", "/api/test", None, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"message": "API is working"}));

    let (status, _, body) = t.send("GET", "/api/nope", None, None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Not Found");
    t.cleanup().await;
    Ok(())
}

#[tokio::test]
async fn cors_preflight_allows_any_origin() -> anyhow::Result<()> {
    let t = TestApp::new().await?;
    let req = Request::builder()
        .method("OPTIONS")
        .uri("/api/employees")
        .header(header::ORIGIN, "http://localhost:3000")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "authorization,content-type")
        .body(Body::empty())?;
    let (status, headers, _) = t.send_raw(req).await?;
    assert!(status.is_success());
    assert_eq!(headers.get(header::ACCESS_CONTROL_ALLOW_ORIGIN).and_then(|v| v.to_str().ok()), Some("*"));
    t.cleanup().await;
    Ok(())
}

#[tokio::test]
async fn register_login_and_me() -> anyhow::Result<()> {
    let t = TestApp::new().await?;

    let (status, headers, body) = t
        .send(
            "POST",
            "/api/auth/register",
            None,
            Some(json!({"username": "alice", "email": "alice@example.com", "password": "password123", "role": "hr"})),
        )
        .await?;
    assert_eq!(status, StatusCode::CREATED);
    assert!(headers.get(header::SET_COOKIE).is_some());
    assert!(body["token"].is_string());
    assert!(body["user"]["_id"].is_string());
    assert_eq!(body["user"]["role"], "hr");
    assert!(body["user"].get("password").is_none());

    // Password is stored hashed on disk
    let users_file = tokio::fs::read_to_string(t.cfg.storage.data_dir.join("users.json")).await?;
    assert!(!users_file.contains("password123"));
    assert!(users_file.contains("$argon2"));

    let (status, headers, body) = t
        .send("POST", "/api/auth/login", None, Some(json!({"email": "alice@example.com", "password": "password123"})))
        .await?;
    assert_eq!(status, StatusCode::OK);
    let cookie = headers
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .map(|c| c.split(';').next().unwrap_or_default().to_string())
        .expect("auth cookie");
    assert!(cookie.starts_with("auth_token="));
    let token = body["token"].as_str().expect("token").to_string();

    let (status, _, me) = t.send("GET", "/api/auth/me", Some(&token), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["username"], "alice");
    assert!(me.get("password").is_none());

    // Cookie works in place of the Authorization header
    let req = Request::builder().uri("/api/auth/me").header(header::COOKIE, cookie).body(Body::empty())?;
    let (status, _, me) = t.send_raw(req).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["email"], "alice@example.com");

    let (status, _, _) = t.send("POST", "/api/auth/logout", None, None).await?;
    assert_eq!(status, StatusCode::NO_CONTENT);
    t.cleanup().await;
    Ok(())
}

#[tokio::test]
async fn register_validation_and_duplicates() -> anyhow::Result<()> {
    let t = TestApp::new().await?;

    let (status, _, body) = t
        .send("POST", "/api/auth/register", None, Some(json!({"email": "x@example.com", "password": "password123"})))
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].is_string());

    let (status, _, _) = t
        .send("POST", "/api/auth/register", None, Some(json!({"username": "x", "email": "x@example.com", "password": "123"})))
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    t.register("bob").await?;
    let (status, _, body) = t
        .send("POST", "/api/auth/register", None, Some(json!({"username": "bob2", "email": "bob@example.com", "password": "password123"})))
        .await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "User already exists");

    let req = Request::builder()
        .method("POST")
        .uri("/api/auth/register")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))?;
    let (status, _, body) = t.send_raw(req).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Bad Request");
    t.cleanup().await;
    Ok(())
}

#[tokio::test]
async fn login_rejects_bad_credentials() -> anyhow::Result<()> {
    let t = TestApp::new().await?;
    t.register("carol").await?;
    let (status, _, _) = t
        .send("POST", "/api/auth/login", None, Some(json!({"email": "carol@example.com", "password": "wrong-pass"})))
        .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, _, _) = t
        .send("POST", "/api/auth/login", None, Some(json!({"email": "nobody@example.com", "password": "password123"})))
        .await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    t.cleanup().await;
    Ok(())
}

#[tokio::test]
async fn protected_routes_need_a_valid_token() -> anyhow::Result<()> {
    let t = TestApp::new().await?;
    for uri in ["/api/auth/me", "/api/employees"] {
        let (status, _, _) = t.send("GET", uri, None, None).await?;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
        let (status, _, _) = t.send("GET", uri, Some("not-a-jwt"), None).await?;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
    }
    let req = Request::builder().uri("/api/employees").header(header::AUTHORIZATION, "Token abc").body(Body::empty())?;
    let (status, _, _) = t.send_raw(req).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    t.cleanup().await;
    Ok(())
}

#[tokio::test]
async fn update_and_delete_own_account() -> anyhow::Result<()> {
    let t = TestApp::new().await?;
    let token = t.register("dave").await?;

    let (status, _, me) = t
        .send("PUT", "/api/auth/me", Some(&token), Some(json!({"phone": "555", "password": "newpassword"})))
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["phone"], "555");
    assert!(me.get("password").is_none());

    let (status, _, _) = t
        .send("POST", "/api/auth/login", None, Some(json!({"email": "dave@example.com", "password": "newpassword"})))
        .await?;
    assert_eq!(status, StatusCode::OK);

    let (status, _, _) = t.send("PUT", "/api/auth/me", Some(&token), Some(json!(["not", "an", "object"]))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _, _) = t.send("DELETE", "/api/auth/me", Some(&token), None).await?;
    assert_eq!(status, StatusCode::OK);
    let (status, _, _) = t.send("GET", "/api/auth/me", Some(&token), None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    t.cleanup().await;
    Ok(())
}
