//! Storage abstractions for service layer
//!
//! Whole-file JSON persistence: one array file per collection, read and
//! rewritten on every operation. Single process, single writer.

pub mod record_store;
pub mod collection;

pub use collection::Collection;
pub use record_store::{Ensured, RecordStore, StoreError};
