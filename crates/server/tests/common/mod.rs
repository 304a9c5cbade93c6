#![allow(dead_code)]

use std::path::PathBuf;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use configs::AppConfig;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

pub struct TestApp {
    pub app: Router,
    pub root: PathBuf,
    pub cfg: AppConfig,
}

impl TestApp {
    pub async fn new() -> anyhow::Result<Self> {
        let root = std::env::temp_dir().join(format!("server_it_{}", Uuid::new_v4()));
        let mut cfg = AppConfig::default();
        cfg.storage.data_dir = root.join("data");
        cfg.storage.uploads_dir = root.join("uploads");
        cfg.auth.jwt_secret = "test-secret".into();
        let app = server::startup::build_app(&cfg).await?;
        Ok(Self { app, root, cfg })
    }

    /// Send a request; returns status, headers and the JSON body (`Null` when empty).
    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> anyhow::Result<(StatusCode, axum::http::HeaderMap, Value)> {
        let mut req = Request::builder().method(method).uri(uri);
        if let Some(t) = token {
            req = req.header(header::AUTHORIZATION, format!("Bearer {t}"));
        }
        let req = match body {
            Some(b) => req.header(header::CONTENT_TYPE, "application/json").body(Body::from(serde_json::to_vec(&b)?))?,
            None => req.body(Body::empty())?,
        };
        self.send_raw(req).await
    }

    pub async fn send_raw(&self, req: Request<Body>) -> anyhow::Result<(StatusCode, axum::http::HeaderMap, Value)> {
        let resp = self.app.clone().oneshot(req).await?;
        let status = resp.status();
        let headers = resp.headers().clone();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await?;
        let json = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap_or(Value::Null) };
        Ok((status, headers, json))
    }

    /// Register a fresh user and return its token.
    pub async fn register(&self, username: &str) -> anyhow::Result<String> {
        let body = serde_json::json!({
            "username": username,
            "email": format!("{username}@example.com"),
            "password": "password123"
        });
        let (status, _, json) = self.send("POST", "/api/auth/register", None, Some(body)).await?;
        anyhow::ensure!(status == StatusCode::CREATED, "register returned {status}: {json}");
        json["token"].as_str().map(str::to_string).ok_or_else(|| anyhow::anyhow!("no token in {json}"))
    }

    pub async fn cleanup(self) {
        let _ = tokio::fs::remove_dir_all(&self.root).await;
    }
}
