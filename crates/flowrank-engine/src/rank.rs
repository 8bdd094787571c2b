//! Ranking of scored records.

use std::cmp::Reverse;

use flowrank_core::NodeRecord;

/// Orders records by flow (descending), then priority (descending), then id.
/// Unscored records sort last.
pub fn rank(records: &[NodeRecord]) -> Vec<&NodeRecord> {
    let mut ranked: Vec<&NodeRecord> = records.iter().collect();
    ranked.sort_by(|a, b| {
        (Reverse(a.flow), Reverse(a.priority), &a.id).cmp(&(Reverse(b.flow), Reverse(b.priority), &b.id))
    });
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowrank_core::Signal;

    fn scored(id: &str, flow: Option<u8>, priority: Option<u8>) -> NodeRecord {
        let mut r = NodeRecord::new(id, "Ops", Signal::Live);
        r.flow = flow;
        r.priority = priority;
        r
    }

    #[test]
    fn orders_by_flow_then_priority_then_id() {
        let records = vec![
            scored("d", None, None),
            scored("c", Some(50), Some(40)),
            scored("b", Some(50), Some(60)),
            scored("a", Some(50), Some(60)),
            scored("e", Some(90), Some(10)),
        ];
        let ids: Vec<&str> = rank(&records).iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["e", "a", "b", "c", "d"]);
    }
}
