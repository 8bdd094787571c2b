//! In-memory implementation of [`RecordStore`].
//!
//! [`InMemoryStore`] holds the input document as a JSON value and keeps the
//! last saved document, with the same validation and layout handling as the
//! file backend.

use serde_json::Value;

use crate::error::StorageError;
use crate::traits::RecordStore;
use crate::types::RecordSet;

#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    input: Value,
    saved: Option<Value>,
}

impl InMemoryStore {
    /// A store whose `load` decodes `input`.
    pub fn new(input: Value) -> Self {
        InMemoryStore { input, saved: None }
    }

    /// The document written by the last `save`, if any.
    pub fn saved(&self) -> Option<&Value> {
        self.saved.as_ref()
    }
}

impl RecordStore for InMemoryStore {
    fn load(&self) -> Result<RecordSet, StorageError> {
        RecordSet::from_value(self.input.clone())
    }

    fn save(&mut self, set: &RecordSet) -> Result<(), StorageError> {
        self.saved = Some(set.to_value()?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn save_keeps_layout_and_does_not_touch_input() {
        let input = json!({"nodes": [{"id": "a", "sector": "Ops", "signal": "Awake"}], "rev": 7});
        let mut store = InMemoryStore::new(input.clone());
        assert!(store.saved().is_none());

        let mut set = store.load().unwrap();
        set.nodes[0].energy = Some(12);
        store.save(&set).unwrap();

        let saved = store.saved().unwrap();
        assert_eq!(saved["rev"], json!(7));
        assert_eq!(saved["nodes"][0]["energy"], json!(12));
        assert_eq!(store.load().unwrap().nodes[0].energy, None);
    }

    #[test]
    fn default_store_has_unsupported_layout() {
        assert!(matches!(
            InMemoryStore::default().load(),
            Err(StorageError::Layout { .. })
        ));
    }
}
