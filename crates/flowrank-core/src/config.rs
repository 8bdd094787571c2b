//! Rule configuration for a flow computation run.
//!
//! [`FlowConfig`] gathers every tunable constant the calculators use: stage
//! tables, sector weights, tier boosts, guardrail values, the flow weight
//! pair and the tier bands. One config object is built per run and passed
//! by reference to each calculator.
//!
//! Every top-level field has a default, so a JSON config file only needs to
//! name the values it overrides. Tables and maps given in a file replace the
//! default table wholesale.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::node::Signal;

/// Tolerance for the energy/priority weight pair summing to one.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-9;

// ---------------------------------------------------------------------------
// Stage table
// ---------------------------------------------------------------------------

/// One value per lifecycle stage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct StageTable {
    pub seed: f64,
    pub awake: f64,
    pub wiring: f64,
    pub live: f64,
    pub echo: f64,
    pub archive: f64,
}

impl StageTable {
    #[inline]
    pub fn get(&self, signal: Signal) -> f64 {
        match signal {
            Signal::Seed => self.seed,
            Signal::Awake => self.awake,
            Signal::Wiring => self.wiring,
            Signal::Live => self.live,
            Signal::Echo => self.echo,
            Signal::Archive => self.archive,
        }
    }

    fn values(&self) -> [f64; 6] {
        [self.seed, self.awake, self.wiring, self.live, self.echo, self.archive]
    }
}

// ---------------------------------------------------------------------------
// Tier bands
// ---------------------------------------------------------------------------

/// A flow tier band covering `[min, max)`, or `[min, 100]` for the top band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierBand {
    pub id: String,
    pub min: u8,
    pub max: u8,
}

impl TierBand {
    pub fn new(id: impl Into<String>, min: u8, max: u8) -> Self {
        TierBand {
            id: id.into(),
            min,
            max,
        }
    }

    /// Whether `score` falls in this band. The upper bound is exclusive
    /// except for a band ending at 100.
    #[inline]
    pub fn contains(&self, score: u8) -> bool {
        score >= self.min && (score < self.max || (self.max == 100 && score == 100))
    }
}

// ---------------------------------------------------------------------------
// FlowConfig
// ---------------------------------------------------------------------------

/// All tunable constants of the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FlowConfig {
    /// Energy baseline per lifecycle stage.
    pub energy_baseline: StageTable,
    /// Upper bound of the dependent-count usage bonus.
    pub usage_bonus_cap: f64,
    /// Energy multiplier for Echo-stage or done nodes.
    pub cooldown_factor: f64,

    /// Strategy base for nodes that do not declare one.
    pub default_strategy_base: f64,
    /// Sector name to strategy multiplier.
    pub sector_weights: IndexMap<String, f64>,
    /// Multiplier for sectors missing from `sector_weights`.
    pub default_sector_weight: f64,
    /// Multiplier applied to `ln(1 + dependents)`.
    pub centrality_scale: f64,
    /// Priority stage score per lifecycle stage.
    pub priority_stage: StageTable,
    /// Declared tier name to flat priority boost.
    pub tier_boosts: IndexMap<String, f64>,

    /// Minimum priority of foundational nodes.
    pub foundational_floor: u8,
    /// A dependency's priority may sit at most this far below a dependent's.
    pub ancestor_margin: u8,
    /// Cap on ancestor relaxation passes. `None` means one pass per node.
    pub max_relaxation_passes: Option<usize>,

    pub energy_weight: f64,
    pub priority_weight: f64,
    /// Flow tier bands; order in the file does not matter.
    pub tier_bands: Vec<TierBand>,
}

impl Default for FlowConfig {
    fn default() -> Self {
        FlowConfig {
            energy_baseline: StageTable {
                seed: 30.0,
                awake: 60.0,
                wiring: 75.0,
                live: 90.0,
                echo: 50.0,
                archive: 10.0,
            },
            usage_bonus_cap: 10.0,
            cooldown_factor: 0.8,
            default_strategy_base: 25.0,
            sector_weights: IndexMap::from([
                ("Core".to_string(), 1.6),
                ("Transport".to_string(), 1.4),
                ("Web.Rest".to_string(), 1.4),
                ("Ops".to_string(), 1.25),
                ("AI/Agents".to_string(), 1.15),
            ]),
            default_sector_weight: 1.0,
            centrality_scale: 6.0,
            priority_stage: StageTable {
                seed: 0.0,
                awake: 8.0,
                wiring: 14.0,
                live: 6.0,
                echo: 2.0,
                archive: 0.0,
            },
            tier_boosts: IndexMap::from([
                ("Platform".to_string(), 8.0),
                ("Prod-Critical".to_string(), 6.0),
                ("Internal".to_string(), 4.0),
            ]),
            foundational_floor: 70,
            ancestor_margin: 5,
            max_relaxation_passes: None,
            energy_weight: 0.35,
            priority_weight: 0.65,
            tier_bands: vec![
                TierBand::new("critical", 80, 100),
                TierBand::new("active", 60, 80),
                TierBand::new("supporting", 40, 60),
                TierBand::new("dormant", 20, 40),
                TierBand::new("future", 0, 20),
            ],
        }
    }
}

impl FlowConfig {
    /// Parses a (possibly partial) JSON config and validates it.
    pub fn from_json_str(json: &str) -> Result<Self, CoreError> {
        let config: FlowConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Sector multiplier, falling back to `default_sector_weight`.
    pub fn sector_weight(&self, sector: &str) -> f64 {
        self.sector_weights
            .get(sector)
            .copied()
            .unwrap_or(self.default_sector_weight)
    }

    /// Flat boost for a declared tier; unknown or absent tiers boost nothing.
    pub fn tier_boost(&self, tier: Option<&str>) -> f64 {
        tier.and_then(|t| self.tier_boosts.get(t).copied())
            .unwrap_or(0.0)
    }

    /// Relaxation cap for a graph of `node_count` nodes. Always at least 1.
    pub fn relaxation_cap(&self, node_count: usize) -> usize {
        self.max_relaxation_passes.unwrap_or(node_count).max(1)
    }

    /// Tier bands ordered from highest to lowest.
    pub fn sorted_bands(&self) -> Vec<&TierBand> {
        let mut bands: Vec<&TierBand> = self.tier_bands.iter().collect();
        bands.sort_by(|a, b| b.min.cmp(&a.min));
        bands
    }

    /// Checks that the configuration can only produce scores in 0..=100 and
    /// that every flow index maps to exactly one tier.
    pub fn validate(&self) -> Result<(), CoreError> {
        for (name, w) in [
            ("energyWeight", self.energy_weight),
            ("priorityWeight", self.priority_weight),
        ] {
            if !w.is_finite() || !(0.0..=1.0).contains(&w) {
                return Err(CoreError::config(format!("{name} must be within [0, 1], got {w}")));
            }
        }
        let sum = self.energy_weight + self.priority_weight;
        if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(CoreError::config(format!(
                "energyWeight + priorityWeight must equal 1, got {sum}"
            )));
        }

        if self.foundational_floor > 100 {
            return Err(CoreError::config(format!(
                "foundationalFloor must be at most 100, got {}",
                self.foundational_floor
            )));
        }
        if !(self.cooldown_factor > 0.0 && self.cooldown_factor <= 1.0) {
            return Err(CoreError::config(format!(
                "cooldownFactor must be within (0, 1], got {}",
                self.cooldown_factor
            )));
        }
        if self.max_relaxation_passes == Some(0) {
            return Err(CoreError::config("maxRelaxationPasses must be at least 1"));
        }

        let scalars = [
            ("usageBonusCap", self.usage_bonus_cap),
            ("defaultStrategyBase", self.default_strategy_base),
            ("defaultSectorWeight", self.default_sector_weight),
            ("centralityScale", self.centrality_scale),
        ];
        for (name, v) in scalars {
            check_non_negative(name, v)?;
        }
        for v in self.energy_baseline.values() {
            check_non_negative("energyBaseline", v)?;
        }
        for v in self.priority_stage.values() {
            check_non_negative("priorityStage", v)?;
        }
        for (sector, &w) in &self.sector_weights {
            check_non_negative(&format!("sectorWeights[{sector}]"), w)?;
        }
        for (tier, &b) in &self.tier_boosts {
            check_non_negative(&format!("tierBoosts[{tier}]"), b)?;
        }

        self.validate_bands()
    }

    fn validate_bands(&self) -> Result<(), CoreError> {
        let bands = self.sorted_bands();
        let (Some(top), Some(bottom)) = (bands.first(), bands.last()) else {
            return Err(CoreError::config("tierBands must not be empty"));
        };
        if top.max != 100 {
            return Err(CoreError::config(format!(
                "highest tier band '{}' must end at 100, ends at {}",
                top.id, top.max
            )));
        }
        if bottom.min != 0 {
            return Err(CoreError::config(format!(
                "lowest tier band '{}' must start at 0, starts at {}",
                bottom.id, bottom.min
            )));
        }
        for band in &bands {
            if band.min >= band.max {
                return Err(CoreError::config(format!(
                    "tier band '{}' is empty: [{}, {})",
                    band.id, band.min, band.max
                )));
            }
        }
        for pair in bands.windows(2) {
            let (upper, lower) = (pair[0], pair[1]);
            if lower.max != upper.min {
                return Err(CoreError::config(format!(
                    "tier bands '{}' and '{}' are not contiguous: {} != {}",
                    lower.id, upper.id, lower.max, upper.min
                )));
            }
        }
        let mut seen = std::collections::HashSet::new();
        for band in &bands {
            if !seen.insert(band.id.as_str()) {
                return Err(CoreError::config(format!("duplicate tier band id '{}'", band.id)));
            }
        }
        Ok(())
    }
}

fn check_non_negative(name: &str, v: f64) -> Result<(), CoreError> {
    if v.is_finite() && v >= 0.0 {
        Ok(())
    } else {
        Err(CoreError::config(format!("{name} must be finite and non-negative, got {v}")))
    }
}
