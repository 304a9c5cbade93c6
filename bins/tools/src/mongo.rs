//! MongoDB connection-string helpers for `db-check`.
//!
//! The server never talks to MongoDB; this only answers "is the configured
//! host accepting TCP connections", which is what operators need before
//! switching storage backends.

use std::time::Duration;

use thiserror::Error;
use tokio::net::TcpStream;

pub const DEFAULT_MONGODB_URI: &str = "mongodb://127.0.0.1:27017/EmpDB_123";
pub const DEFAULT_PORT: u16 = 27017;
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Error, PartialEq, Eq)]
pub enum UriError {
    #[error("unsupported scheme (expected mongodb://)")]
    Scheme,
    #[error("mongodb+srv:// needs DNS SRV resolution, which this check does not do")]
    Srv,
    #[error("no host in connection string")]
    NoHost,
    #[error("invalid port {0:?}")]
    Port(String),
}

#[derive(Debug, Error)]
pub enum CheckError {
    #[error("connection refused: {0}")]
    Refused(#[source] std::io::Error),
    #[error("timed out after {0:?}")]
    Timeout(Duration),
    #[error("connect failed: {0}")]
    Io(#[source] std::io::Error),
}

/// First host of a `mongodb://` connection string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MongoTarget {
    pub host: String,
    pub port: u16,
}

impl MongoTarget {
    pub fn addr(&self) -> String {
        if self.host.contains(':') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }
}

/// Replace `user:password@` with `***:***@` for logging.
pub fn mask_credentials(uri: &str) -> String {
    let Some(scheme_end) = uri.find("://") else {
        return uri.to_string();
    };
    let rest = &uri[scheme_end + 3..];
    let authority_end = rest.find(['/', '?']).unwrap_or(rest.len());
    let authority = &rest[..authority_end];
    match authority.rfind('@') {
        Some(at) if authority[..at].contains(':') => {
            format!("{}://***:***@{}", &uri[..scheme_end], &rest[at + 1..])
        }
        _ => uri.to_string(),
    }
}

pub fn parse_target(uri: &str) -> Result<MongoTarget, UriError> {
    let rest = if let Some(r) = uri.strip_prefix("mongodb://") {
        r
    } else if uri.starts_with("mongodb+srv://") {
        return Err(UriError::Srv);
    } else {
        return Err(UriError::Scheme);
    };
    let authority = &rest[..rest.find(['/', '?']).unwrap_or(rest.len())];
    let hosts = authority.rsplit_once('@').map(|(_, h)| h).unwrap_or(authority);
    let first = hosts.split(',').next().unwrap_or_default().trim();
    if first.is_empty() {
        return Err(UriError::NoHost);
    }

    let (host, port) = if let Some(v6) = first.strip_prefix('[') {
        let (host, after) = v6.split_once(']').ok_or(UriError::NoHost)?;
        (host, after.strip_prefix(':'))
    } else {
        match first.split_once(':') {
            Some((h, p)) => (h, Some(p)),
            None => (first, None),
        }
    };
    if host.is_empty() {
        return Err(UriError::NoHost);
    }
    let port = match port {
        Some(p) => p.parse::<u16>().map_err(|_| UriError::Port(p.to_string()))?,
        None => DEFAULT_PORT,
    };
    Ok(MongoTarget { host: host.to_string(), port })
}

/// Open (and immediately drop) a TCP connection to the target.
pub async fn check_reachable(target: &MongoTarget, timeout: Duration) -> Result<(), CheckError> {
    match tokio::time::timeout(timeout, TcpStream::connect(target.addr())).await {
        Err(_) => Err(CheckError::Timeout(timeout)),
        Ok(Err(e)) if e.kind() == std::io::ErrorKind::ConnectionRefused => Err(CheckError::Refused(e)),
        Ok(Err(e)) => Err(CheckError::Io(e)),
        Ok(Ok(_stream)) => Ok(()),
    }
}

pub const TROUBLESHOOTING: &[&str] = &[
    "1. Make sure MongoDB is installed on your system",
    "2. Check if MongoDB service is running",
    "   - On Windows: Open Services app and look for MongoDB service",
    "   - On Linux/Mac: Run \"sudo systemctl status mongodb\" or \"brew services list\"",
    "3. Try using MongoDB Atlas instead (cloud-hosted option)",
    "   - Set MONGODB_URI in your .env file to the Atlas connection string",
];
