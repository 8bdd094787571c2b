//! The [`RecordStore`] trait defining the storage contract for record sets.
//!
//! A store hands out the whole record set at the start of a run and takes
//! the updated set back at the end. The trait is synchronous: a run is a
//! single batch with exclusive ownership of the set.

use crate::error::StorageError;
use crate::types::RecordSet;

/// The storage contract for node record sets.
pub trait RecordStore {
    /// Loads and validates the full record set.
    fn load(&self) -> Result<RecordSet, StorageError>;

    /// Persists the record set, keeping the layout it was loaded with.
    fn save(&mut self, set: &RecordSet) -> Result<(), StorageError>;
}
