//! Writes computed scores back onto node records.

use std::collections::HashMap;

use flowrank_core::NodeRecord;

use crate::engine::NodeScore;

/// Sets `energy`, `priority`, `flow` and `flowTier` on every record that has
/// a score with the same id. Records without a score are left untouched.
///
/// Returns the number of records written.
pub fn apply_scores(records: &mut [NodeRecord], scores: &[NodeScore]) -> usize {
    let by_id: HashMap<&str, &NodeScore> = scores.iter().map(|s| (s.id.as_str(), s)).collect();
    let mut written = 0;
    for record in records.iter_mut() {
        if let Some(score) = by_id.get(record.id.as_str()) {
            record.energy = Some(score.energy);
            record.priority = Some(score.priority);
            record.flow = Some(score.flow);
            record.flow_tier = Some(score.flow_tier.clone());
            written += 1;
        }
    }
    written
}
