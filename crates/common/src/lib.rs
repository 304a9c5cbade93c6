//! Shared helpers used by every crate in the workspace: logging setup,
//! small response types and filesystem bootstrap checks.

pub mod types;
pub mod utils;
pub mod env;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_type_ok() {
        let h = types::Health::ok();
        assert_eq!(h.status, "ok");
        assert_eq!(h.message, "Server is running");
    }
}
