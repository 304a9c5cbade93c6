//! Service layer: file-backed persistence and business operations.
//! - `storage`: whole-file JSON Record Store and the generic collection accessor.
//! - `file`: typed `users` / `employees` accessors.
//! - `auth`: registration, login, tokens and profile maintenance.
//! - `runtime`: startup bootstrap of directories and collection files.

pub mod errors;
pub mod auth;
pub mod runtime;
pub mod storage;
pub mod file;
pub mod pagination;
