//! Record model shared by the store, the services and the HTTP layer.

pub mod errors;
pub mod record;
pub mod user;
pub mod employee;

pub use record::Record;
