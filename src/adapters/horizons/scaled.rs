//! Time-scaled horizon model.
//!
//! Per window:
//! - window score = composite score x `risk_scale`, capped at the ceiling
//! - cost impact = intervention spend for the window score's tier
//! - ROI value = annual cost x days / 365 x success rate of that tier
//!
//! ROI is an estimate of avoided cost; it does not depend on the cost impact.

use crate::domain::{
    ConfigError, Horizon, HorizonPrediction, HorizonSettings, ScaledHorizonTable, ScaledWindow,
};
use crate::ports::{HorizonContext, HorizonModel};

const DAYS_PER_YEAR: f64 = 365.0;

#[derive(Debug, Clone)]
pub struct ScaledHorizonModel {
    /// Indexed by `Horizon::index`
    windows: [ScaledWindow; 3],
}

impl ScaledHorizonModel {
    /// # Errors
    /// Returns `ConfigError::InvalidHorizon` if a window is missing or out of range.
    pub fn new(table: &ScaledHorizonTable) -> Result<Self, ConfigError> {
        HorizonSettings::Scaled(table.clone()).validate()?;

        let window = |h: Horizon| {
            table
                .windows
                .get(&h)
                .copied()
                .ok_or_else(|| ConfigError::InvalidHorizon {
                    horizon: h.to_string(),
                    reason: "missing window".to_string(),
                })
        };

        Ok(Self {
            windows: [
                window(Horizon::Days30)?,
                window(Horizon::Days60)?,
                window(Horizon::Days90)?,
            ],
        })
    }
}

impl HorizonModel for ScaledHorizonModel {
    fn name(&self) -> &'static str {
        "scaled"
    }

    fn predict(&self, horizon: Horizon, ctx: &HorizonContext<'_>) -> HorizonPrediction {
        let window = &self.windows[horizon.index()];

        let risk_score = (ctx.score.value() * window.risk_scale).clamp(0.0, ctx.ceiling);
        let tier = ctx.tiers.classify(risk_score);
        let idx = usize::from(tier.level.as_u8()) - 1;

        let window_cost = ctx.annual_cost as f64 * f64::from(horizon.days()) / DAYS_PER_YEAR;
        let roi_value = (window_cost * window.success_rate[idx]).round().max(0.0) as u64;

        HorizonPrediction {
            risk_level: tier.label.clone(),
            tier: tier.level,
            risk_score,
            cost_impact: window.intervention_cost[idx],
            roi_value,
        }
    }
}
