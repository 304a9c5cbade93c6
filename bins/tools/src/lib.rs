//! Operator tools that run outside the server: a file store smoke test and
//! a MongoDB reachability check.

pub mod mongo;
pub mod smoke;
