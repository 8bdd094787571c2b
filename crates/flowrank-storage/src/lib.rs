//! Storage abstraction for node record sets.
//!
//! The engine consumes and produces an in-memory record set; this crate
//! moves that set in and out of a backing store.
//!
//! # Modules
//!
//! - [`error`]: StorageError enum with all failure modes
//! - [`types`]: RecordSet and its on-disk Layout
//! - [`traits`]: RecordStore trait definition
//! - [`json`]: JsonFileStore, reads one JSON file and writes another
//! - [`memory`]: InMemoryStore for tests and library callers

pub mod error;
pub mod json;
pub mod memory;
pub mod traits;
pub mod types;

// Re-export key types for ergonomic use.
pub use error::StorageError;
pub use json::JsonFileStore;
pub use memory::InMemoryStore;
pub use traits::RecordStore;
pub use types::{Layout, RecordSet};
