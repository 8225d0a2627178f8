//! Fixed horizon table.
//!
//! Returns the same figures for every record. Kept for parity with existing
//! dashboards until a calibrated per-window formula is agreed.

use crate::domain::{
    ConfigError, FixedHorizonEntry, FixedHorizonTable, Horizon, HorizonPrediction,
    HorizonSettings,
};
use crate::ports::{HorizonContext, HorizonModel};

#[derive(Debug, Clone)]
pub struct FixedHorizonModel {
    /// Indexed by `Horizon::index`
    entries: [FixedHorizonEntry; 3],
}

impl FixedHorizonModel {
    /// # Errors
    /// Returns `ConfigError::InvalidHorizon` if a window is missing.
    pub fn new(table: &FixedHorizonTable) -> Result<Self, ConfigError> {
        HorizonSettings::Fixed(table.clone()).validate()?;

        let entry = |h: Horizon| {
            table
                .entries
                .get(&h)
                .copied()
                .ok_or_else(|| ConfigError::InvalidHorizon {
                    horizon: h.to_string(),
                    reason: "missing entry".to_string(),
                })
        };

        Ok(Self {
            entries: [
                entry(Horizon::Days30)?,
                entry(Horizon::Days60)?,
                entry(Horizon::Days90)?,
            ],
        })
    }
}

impl HorizonModel for FixedHorizonModel {
    fn name(&self) -> &'static str {
        "fixed"
    }

    fn predict(&self, horizon: Horizon, ctx: &HorizonContext<'_>) -> HorizonPrediction {
        let entry = self.entries[horizon.index()];
        let tier = ctx.tiers.classify(entry.risk_score);

        HorizonPrediction {
            risk_level: tier.label.clone(),
            tier: tier.level,
            risk_score: entry.risk_score,
            cost_impact: entry.cost_impact,
            roi_value: entry.roi_value,
        }
    }
}
