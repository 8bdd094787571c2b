pub mod config;
pub mod error;
pub mod graph;
pub mod id;
pub mod node;
pub mod validate;

// Re-export commonly used types
pub use config::{FlowConfig, StageTable, TierBand};
pub use error::{CoreError, RecordError};
pub use graph::{DanglingRef, DependencyGraph};
pub use id::NodeId;
pub use node::{NodeRecord, Signal};
pub use validate::{check_records, decode_records, validate_values};
