use serde::Serialize;

#[derive(Serialize, Debug)]
pub struct Health {
    pub status: &'static str,
    pub message: &'static str,
}

impl Health {
    pub fn ok() -> Self {
        Self { status: "ok", message: "Server is running" }
    }
}

/// Body of `GET /api/test`.
#[derive(Serialize, Debug)]
pub struct Ping {
    pub message: &'static str,
}
