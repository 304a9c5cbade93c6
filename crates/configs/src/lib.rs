use std::path::PathBuf;

use anyhow::{anyhow, Result};
use serde::Deserialize;

pub const DEFAULT_PORT: u16 = 5001;
pub const DEV_JWT_SECRET: &str = "dev-secret-change-me";

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: default_host(), port: DEFAULT_PORT, worker_threads: None }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "default_uploads_dir")]
    pub uploads_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { data_dir: default_data_dir(), uploads_dir: default_uploads_dir() }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    #[serde(default = "default_token_ttl_hours")]
    pub token_ttl_hours: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self { jwt_secret: default_jwt_secret(), token_ttl_hours: default_token_ttl_hours() }
    }
}

impl AuthConfig {
    pub fn uses_dev_secret(&self) -> bool {
        self.jwt_secret == DEV_JWT_SECRET
    }
}

fn default_host() -> String { "0.0.0.0".into() }
fn default_port() -> u16 { DEFAULT_PORT }
fn default_data_dir() -> PathBuf { PathBuf::from("data") }
fn default_uploads_dir() -> PathBuf { PathBuf::from("uploads") }
fn default_jwt_secret() -> String { DEV_JWT_SECRET.into() }
fn default_token_ttl_hours() -> i64 { 24 }

/// Load `CONFIG_PATH` (default `config.toml`). A missing file yields defaults.
pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    match std::fs::read_to_string(&path) {
        Ok(content) => parse(&content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(AppConfig::default()),
        Err(e) => Err(anyhow!("cannot read {path}: {e}")),
    }
}

pub fn parse(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    /// File (or defaults), then environment overrides, then validation.
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default()?;
        cfg.apply_env(|key| std::env::var(key).ok())?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Apply `HOST`, `PORT`, `DATA_DIR`, `UPLOADS_DIR`, `JWT_SECRET`, `TOKEN_TTL_HOURS`.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .trim()
                .parse()
                .map_err(|_| anyhow!("PORT must be a number in 1..=65535, got {port:?}"))?;
        }
        if let Some(dir) = lookup("DATA_DIR") {
            self.storage.data_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup("UPLOADS_DIR") {
            self.storage.uploads_dir = PathBuf::from(dir);
        }
        if let Some(secret) = lookup("JWT_SECRET") {
            self.auth.jwt_secret = secret;
        }
        if let Some(ttl) = lookup("TOKEN_TTL_HOURS") {
            self.auth.token_ttl_hours = ttl
                .trim()
                .parse()
                .map_err(|_| anyhow!("TOKEN_TTL_HOURS must be an integer, got {ttl:?}"))?;
        }
        Ok(())
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        if self.auth.jwt_secret.trim().is_empty() {
            return Err(anyhow!("auth.jwt_secret must not be empty"));
        }
        if self.auth.token_ttl_hours <= 0 {
            return Err(anyhow!("auth.token_ttl_hours must be positive"));
        }
        if self.storage.data_dir.as_os_str().is_empty() {
            self.storage.data_dir = default_data_dir();
        }
        if self.storage.uploads_dir.as_os_str().is_empty() {
            self.storage.uploads_dir = default_uploads_dir();
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = default_host();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        if self.worker_threads == Some(0) {
            self.worker_threads = None;
        }
        Ok(())
    }
}
