//! Record sets and their JSON layouts.

use flowrank_core::{decode_records, NodeRecord};
use serde_json::{Map, Value};

use crate::error::StorageError;

/// Key holding the records in the object layout.
pub const NODES_KEY: &str = "nodes";

/// How the records sit in the stored JSON document.
#[derive(Debug, Clone, PartialEq)]
pub enum Layout {
    /// A top-level array of records.
    Array,
    /// An object with a `nodes` array. Holds every other key of the object.
    Envelope(Map<String, Value>),
}

/// A loaded record set plus the layout needed to write it back.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordSet {
    pub layout: Layout,
    pub nodes: Vec<NodeRecord>,
}

impl RecordSet {
    /// A record set in the array layout.
    pub fn new(nodes: Vec<NodeRecord>) -> Self {
        RecordSet {
            layout: Layout::Array,
            nodes,
        }
    }

    /// Validates and decodes a stored JSON document.
    pub fn from_value(value: Value) -> Result<Self, StorageError> {
        let (layout, items) = match value {
            Value::Array(items) => (Layout::Array, items),
            Value::Object(mut obj) => match obj.remove(NODES_KEY) {
                Some(Value::Array(items)) => (Layout::Envelope(obj), items),
                Some(_) => {
                    return Err(StorageError::Layout {
                        reason: format!("'{NODES_KEY}' must be an array"),
                    })
                }
                None => {
                    return Err(StorageError::Layout {
                        reason: format!("object has no '{NODES_KEY}' array"),
                    })
                }
            },
            other => {
                return Err(StorageError::Layout {
                    reason: format!("expected an array or object, got {}", kind(&other)),
                })
            }
        };
        let nodes = decode_records(items)?;
        Ok(RecordSet { layout, nodes })
    }

    /// Encodes the record set in its original layout.
    pub fn to_value(&self) -> Result<Value, StorageError> {
        let nodes = serde_json::to_value(&self.nodes)?;
        Ok(match &self.layout {
            Layout::Array => nodes,
            Layout::Envelope(rest) => {
                let mut obj = rest.clone();
                obj.insert(NODES_KEY.to_string(), nodes);
                Value::Object(obj)
            }
        })
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
