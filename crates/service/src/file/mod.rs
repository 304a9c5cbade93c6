//! Typed accessors for the two collections the server persists.

pub mod users;
pub mod employees;

pub use employees::EmployeeStore;
pub use users::UserStore;
