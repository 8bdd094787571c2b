//! Input shape validation for node record sets.
//!
//! Validation runs before any computation and collects every problem in the
//! set instead of stopping at the first, so an operator can fix a data file
//! in one pass. Two entry points exist:
//!
//! - [`validate_values`] checks raw JSON objects, catching shape errors
//!   (missing `id`, non-list `dependsOn`, unknown `signal`) that typed
//!   decoding would report one at a time and without record context.
//! - [`check_records`] checks already-typed records built by library
//!   callers, covering the invariants the type system cannot express.
//!
//! [`decode_records`] combines the first with typed decoding.

use std::collections::HashSet;

use serde_json::Value;

use crate::error::{CoreError, RecordError};
use crate::node::{NodeRecord, Signal};

/// Largest accepted `timePressure`.
pub const MAX_TIME_PRESSURE: u8 = 10;

/// Validates raw JSON records.
///
/// Returns `Err` with every problem found, in record order.
pub fn validate_values(values: &[Value]) -> Result<(), Vec<RecordError>> {
    let mut errors = Vec::new();
    let mut seen_ids: HashSet<&str> = HashSet::new();

    for (index, value) in values.iter().enumerate() {
        let Some(obj) = value.as_object() else {
            errors.push(RecordError::new(index, None, "record", "must be a JSON object"));
            continue;
        };

        let id = match obj.get("id") {
            None => {
                errors.push(RecordError::new(index, None, "id", "missing"));
                None
            }
            Some(Value::String(s)) if s.trim().is_empty() => {
                errors.push(RecordError::new(index, None, "id", "must not be empty"));
                None
            }
            Some(Value::String(s)) => {
                if !seen_ids.insert(s.as_str()) {
                    errors.push(RecordError::new(index, Some(s), "id", "duplicate id"));
                }
                Some(s.as_str())
            }
            Some(_) => {
                errors.push(RecordError::new(index, None, "id", "must be a string"));
                None
            }
        };
        let mut push = |field: &str, message: &str| {
            errors.push(RecordError::new(index, id, field, message));
        };

        match obj.get("sector") {
            Some(Value::String(_)) => {}
            None => push("sector", "missing"),
            Some(_) => push("sector", "must be a string"),
        }

        match obj.get("signal") {
            Some(Value::String(s)) if Signal::parse(s).is_some() => {}
            Some(Value::String(s)) => push(
                "signal",
                &format!("unknown stage '{s}', expected one of Seed, Awake, Wiring, Live, Echo, Archive"),
            ),
            None => push("signal", "missing"),
            Some(_) => push("signal", "must be a string"),
        }

        match obj.get("dependsOn") {
            None | Some(Value::Null) => {}
            Some(Value::Array(items)) => {
                if items.iter().any(|v| !v.is_string()) {
                    push("dependsOn", "entries must be node id strings");
                }
            }
            Some(_) => push("dependsOn", "must be a list of node ids"),
        }

        match obj.get("tier") {
            None | Some(Value::Null) | Some(Value::String(_)) => {}
            Some(_) => push("tier", "must be a string or null"),
        }

        for flag in ["foundational", "done"] {
            match obj.get(flag) {
                None | Some(Value::Null) | Some(Value::Bool(_)) => {}
                Some(_) => push(flag, "must be a boolean"),
            }
        }

        match obj.get("timePressure") {
            None | Some(Value::Null) => {}
            Some(v) => match v.as_u64() {
                Some(n) if n <= u64::from(MAX_TIME_PRESSURE) => {}
                _ => push("timePressure", "must be an integer between 0 and 10"),
            },
        }

        match obj.get("strategyBase") {
            None | Some(Value::Null) => {}
            Some(v) => match v.as_f64() {
                Some(n) if n.is_finite() && n >= 0.0 => {}
                _ => push("strategyBase", "must be a non-negative number"),
            },
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates typed records.
///
/// Checks id presence and uniqueness, the `timePressure` range and the
/// `strategyBase` domain.
pub fn check_records(records: &[NodeRecord]) -> Result<(), Vec<RecordError>> {
    let mut errors = Vec::new();
    let mut seen_ids: HashSet<&str> = HashSet::new();

    for (index, record) in records.iter().enumerate() {
        let id = Some(record.id.as_str()).filter(|s| !s.trim().is_empty());
        match id {
            None => errors.push(RecordError::new(index, None, "id", "must not be empty")),
            Some(id) if !seen_ids.insert(id) => {
                errors.push(RecordError::new(index, Some(id), "id", "duplicate id"))
            }
            Some(_) => {}
        }
        if record.time_pressure > MAX_TIME_PRESSURE {
            errors.push(RecordError::new(
                index,
                id,
                "timePressure",
                "must be an integer between 0 and 10",
            ));
        }
        if let Some(base) = record.strategy_base {
            if !(base.is_finite() && base >= 0.0) {
                errors.push(RecordError::new(
                    index,
                    id,
                    "strategyBase",
                    "must be a non-negative number",
                ));
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates raw JSON records, then decodes them.
///
/// Nothing is decoded unless the whole set passes validation.
pub fn decode_records(values: Vec<Value>) -> Result<Vec<NodeRecord>, CoreError> {
    validate_values(&values).map_err(CoreError::Validation)?;
    values
        .into_iter()
        .map(|v| serde_json::from_value(prepare(v)).map_err(CoreError::from))
        .collect()
}

/// Computed fields, overwritten by every run.
const OUTPUT_SCORES: [&str; 3] = ["energy", "priority", "flow"];
const OUTPUT_TIER: &str = "flowTier";

/// Prepares a validated object for typed decoding.
///
/// Explicit nulls on optional inputs are removed so they decode as absent.
/// Stale outputs that do not fit their field (a score outside 0..=100, a
/// non-string tier) are dropped; a run overwrites them anyway.
fn prepare(mut value: Value) -> Value {
    if let Some(obj) = value.as_object_mut() {
        for key in ["dependsOn", "foundational", "done", "timePressure", "strategyBase"] {
            if obj.get(key).is_some_and(Value::is_null) {
                obj.remove(key);
            }
        }
        for key in OUTPUT_SCORES {
            let fits = obj
                .get(key)
                .is_some_and(|v| v.as_u64().is_some_and(|n| n <= 100));
            if !fits {
                obj.remove(key);
            }
        }
        if !obj.get(OUTPUT_TIER).is_some_and(Value::is_string) {
            obj.remove(OUTPUT_TIER);
        }
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(errors: &[RecordError]) -> Vec<(usize, &str)> {
        errors.iter().map(|e| (e.index, e.field.as_str())).collect()
    }

    #[test]
    fn valid_set_passes_and_decodes() {
        let values = vec![
            json!({"id": "k", "sector": "Core", "signal": "Wiring", "dependsOn": [], "foundational": true, "timePressure": 3}),
            json!({"id": "t", "sector": "Transport", "signal": "Live", "dependsOn": ["k"], "tier": null, "timePressure": 1}),
        ];
        let records = decode_records(values).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].depends_on, vec!["k"]);
        assert!(records[1].tier.is_none());
    }

    #[test]
    fn missing_id_rejected() {
        let values = vec![json!({"sector": "Core", "signal": "Live"})];
        let errors = validate_values(&values).unwrap_err();
        assert_eq!(fields(&errors), vec![(0, "id")]);
    }

    #[test]
    fn non_list_depends_on_rejected() {
        let values = vec![json!({"id": "a", "sector": "Ops", "signal": "Live", "dependsOn": "b"})];
        let errors = validate_values(&values).unwrap_err();
        assert_eq!(fields(&errors), vec![(0, "dependsOn")]);
        assert_eq!(errors[0].id.as_deref(), Some("a"));
    }

    #[test]
    fn collects_every_problem() {
        let values = vec![
            json!("not an object"),
            json!({"id": "a", "sector": 3, "signal": "Dormant", "dependsOn": [1]}),
            json!({"id": "a", "sector": "Ops", "signal": "Live", "timePressure": 11, "foundational": "yes"}),
        ];
        let errors = validate_values(&values).unwrap_err();
        assert_eq!(
            fields(&errors),
            vec![
                (0, "record"),
                (1, "sector"),
                (1, "signal"),
                (1, "dependsOn"),
                (2, "id"),
                (2, "foundational"),
                (2, "timePressure"),
            ]
        );
    }

    #[test]
    fn negative_or_fractional_time_pressure_rejected() {
        for tp in [json!(-1), json!(2.5), json!("3")] {
            let values = vec![json!({"id": "a", "sector": "Ops", "signal": "Live", "timePressure": tp})];
            assert!(validate_values(&values).is_err());
        }
    }

    #[test]
    fn decode_refuses_when_any_record_invalid() {
        let values = vec![
            json!({"id": "ok", "sector": "Ops", "signal": "Live"}),
            json!({"id": "", "sector": "Ops", "signal": "Live"}),
        ];
        match decode_records(values) {
            Err(CoreError::Validation(errors)) => assert_eq!(errors.len(), 1),
            other => panic!("expected validation failure, got {other:?}"),
        }
    }

    #[test]
    fn unfit_stale_outputs_are_dropped_before_decoding() {
        let values = vec![
            json!({"id": "a", "sector": "Ops", "signal": "Live", "energy": 300, "flow": 55.5, "flowTier": 3, "priority": 42}),
            json!({"id": "b", "sector": "Ops", "signal": "Live", "energy": -1, "priority": null, "flow": "80", "flowTier": "active"}),
        ];
        let records = decode_records(values).unwrap();

        assert_eq!(records[0].energy, None);
        assert_eq!(records[0].flow, None);
        assert_eq!(records[0].flow_tier, None);
        assert_eq!(records[0].priority, Some(42));
        assert!(!records[0].extra.contains_key("energy"));

        assert_eq!(records[1].energy, None);
        assert_eq!(records[1].priority, None);
        assert_eq!(records[1].flow, None);
        assert_eq!(records[1].flow_tier.as_deref(), Some("active"));
    }

    #[test]
    fn typed_records_checked_for_duplicates_and_range() {
        let mut dup = NodeRecord::new("a", "Ops", Signal::Live);
        dup.time_pressure = 12;
        let records = vec![NodeRecord::new("a", "Ops", Signal::Live), dup];
        let errors = check_records(&records).unwrap_err();
        assert_eq!(fields(&errors), vec![(1, "id"), (1, "timePressure")]);
    }
}
