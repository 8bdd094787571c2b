//! Flow Index and flow tier classification.
//!
//! ```text
//! flow = round(energy * energyWeight + priority * priorityWeight)
//! ```
//!
//! clamped to 0..=100, then matched against the configured tier bands from
//! highest to lowest. Band lower bounds are inclusive; upper bounds are
//! exclusive except for the top band, which includes 100.

use flowrank_core::{FlowConfig, TierBand};

use crate::normalize::to_score;

/// Combines normalized energy and priority into a Flow Index.
pub fn flow_index(energy: f64, priority: f64, config: &FlowConfig) -> u8 {
    to_score(energy * config.energy_weight + priority * config.priority_weight)
}

/// Tier bands prepared for lookup, highest first.
#[derive(Debug, Clone)]
pub struct TierClassifier<'c> {
    bands: Vec<&'c TierBand>,
}

impl<'c> TierClassifier<'c> {
    pub fn new(config: &'c FlowConfig) -> Self {
        TierClassifier {
            bands: config.sorted_bands(),
        }
    }

    /// The tier id for `score`. Falls back to the lowest band, which a
    /// validated configuration never needs.
    pub fn classify(&self, score: u8) -> &'c str {
        let band: Option<&'c TierBand> = self
            .bands
            .iter()
            .copied()
            .find(|band| band.contains(score))
            .or_else(|| self.bands.last().copied());
        band.map(|b| b.id.as_str()).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flow_uses_weight_pair() {
        let cfg = FlowConfig::default();
        assert_eq!(flow_index(100.0, 100.0, &cfg), 100);
        assert_eq!(flow_index(0.0, 0.0, &cfg), 0);
        // 0.35 * 40 + 0.65 * 80 = 66
        assert_eq!(flow_index(40.0, 80.0, &cfg), 66);

        let even = FlowConfig {
            energy_weight: 0.4,
            priority_weight: 0.6,
            ..FlowConfig::default()
        };
        // 0.4 * 40 + 0.6 * 80 = 64
        assert_eq!(flow_index(40.0, 80.0, &even), 64);
    }

    #[test]
    fn default_band_boundaries() {
        let cfg = FlowConfig::default();
        let tiers = TierClassifier::new(&cfg);
        assert_eq!(tiers.classify(100), "critical");
        assert_eq!(tiers.classify(80), "critical");
        assert_eq!(tiers.classify(79), "active");
        assert_eq!(tiers.classify(60), "active");
        assert_eq!(tiers.classify(59), "supporting");
        assert_eq!(tiers.classify(40), "supporting");
        assert_eq!(tiers.classify(39), "dormant");
        assert_eq!(tiers.classify(20), "dormant");
        assert_eq!(tiers.classify(19), "future");
        assert_eq!(tiers.classify(0), "future");
    }

    #[test]
    fn every_score_gets_exactly_one_tier() {
        let cfg = FlowConfig::default();
        for score in 0..=100u8 {
            let matching = cfg.tier_bands.iter().filter(|b| b.contains(score)).count();
            assert_eq!(matching, 1, "score {score}");
        }
    }

    #[test]
    fn unmatched_score_falls_back_to_lowest() {
        // Not a valid config; exercises the fallback only.
        let cfg = FlowConfig {
            tier_bands: vec![TierBand::new("high", 50, 100), TierBand::new("low", 10, 50)],
            ..FlowConfig::default()
        };
        assert_eq!(TierClassifier::new(&cfg).classify(3), "low");
    }
}
