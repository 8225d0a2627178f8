//! Engine configuration.
//!
//! Every table the engine consults is injected through `EngineConfig`.
//! Nothing in the calculators reads a literal that a recalibration might
//! need to change, except the factor bracket tables.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{
    ComorbidityRule, ConditionWeightTable, ConfigError, Horizon, RiskTier, TierTable,
};

/// Hard upper bound on the composite score.
pub const DEFAULT_SCORE_CEILING: f64 = 0.95;

/// Score to annual cost mapping: `round(base_cost * (1 + score * risk_multiplier))`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CostModel {
    pub base_cost: f64,
    pub risk_multiplier: f64,
    /// Portion of annual cost addressable by care management
    pub preventable_portion: f64,
}

impl Default for CostModel {
    fn default() -> Self {
        Self {
            base_cost: 15_000.0,
            risk_multiplier: 4.0,
            preventable_portion: 0.60,
        }
    }
}

impl CostModel {
    /// # Errors
    /// Returns `ConfigError::InvalidCostModel` for negative or non-finite terms.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.base_cost.is_finite() || self.base_cost < 0.0 {
            return Err(ConfigError::InvalidCostModel(format!(
                "baseCost must be a non-negative number, got {}",
                self.base_cost
            )));
        }
        if !self.risk_multiplier.is_finite() || self.risk_multiplier < 0.0 {
            return Err(ConfigError::InvalidCostModel(format!(
                "riskMultiplier must be a non-negative number, got {}",
                self.risk_multiplier
            )));
        }
        if !(0.0..=1.0).contains(&self.preventable_portion) {
            return Err(ConfigError::InvalidCostModel(format!(
                "preventablePortion must be within [0, 1], got {}",
                self.preventable_portion
            )));
        }
        Ok(())
    }
}

/// One row of the fixed horizon table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FixedHorizonEntry {
    pub risk_score: f64,
    pub cost_impact: u64,
    pub roi_value: u64,
}

/// Input-independent horizon figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixedHorizonTable {
    pub entries: BTreeMap<Horizon, FixedHorizonEntry>,
}

impl Default for FixedHorizonTable {
    fn default() -> Self {
        let entries = [
            (Horizon::Days30, 0.15, 250, 1200),
            (Horizon::Days60, 0.35, 750, 2800),
            (Horizon::Days90, 0.65, 1800, 4500),
        ]
        .into_iter()
        .map(|(h, risk_score, cost_impact, roi_value)| {
            (
                h,
                FixedHorizonEntry {
                    risk_score,
                    cost_impact,
                    roi_value,
                },
            )
        })
        .collect();
        Self { entries }
    }
}

/// Parameters for one time-scaled window. Arrays are indexed by tier level - 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaledWindow {
    /// Factor applied to the composite score for this window
    pub risk_scale: f64,
    /// Intervention spend for the window, per tier
    pub intervention_cost: [u64; 5],
    /// Expected fraction of window cost avoided, per tier
    pub success_rate: [f64; 5],
}

/// Time-scaled horizon parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScaledHorizonTable {
    pub windows: BTreeMap<Horizon, ScaledWindow>,
}

impl Default for ScaledHorizonTable {
    fn default() -> Self {
        let windows = [
            (
                Horizon::Days30,
                ScaledWindow {
                    risk_scale: 0.85,
                    intervention_cost: [0, 400, 800, 1200, 1500],
                    success_rate: [0.055, 0.15, 0.325, 0.40, 0.50],
                },
            ),
            (
                Horizon::Days60,
                ScaledWindow {
                    risk_scale: 1.0,
                    intervention_cost: [0, 700, 1400, 2000, 2800],
                    success_rate: [0.175, 0.325, 0.45, 0.55, 0.65],
                },
            ),
            (
                Horizon::Days90,
                ScaledWindow {
                    risk_scale: 1.15,
                    intervention_cost: [0, 1000, 2000, 3000, 4000],
                    success_rate: [0.275, 0.425, 0.525, 0.70, 0.80],
                },
            ),
        ]
        .into_iter()
        .collect();
        Self { windows }
    }
}

/// Which horizon model the engine uses, with its parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "lowercase")]
pub enum HorizonSettings {
    Fixed(FixedHorizonTable),
    Scaled(ScaledHorizonTable),
}

impl Default for HorizonSettings {
    fn default() -> Self {
        Self::Scaled(ScaledHorizonTable::default())
    }
}

impl HorizonSettings {
    /// # Errors
    /// Returns `ConfigError::InvalidHorizon` if a window is missing or a
    /// parameter is out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |h: Horizon, reason: String| ConfigError::InvalidHorizon {
            horizon: h.to_string(),
            reason,
        };

        match self {
            Self::Fixed(table) => {
                for h in Horizon::ALL {
                    let entry = table
                        .entries
                        .get(&h)
                        .ok_or_else(|| invalid(h, "missing entry".to_string()))?;
                    if !(0.0..=1.0).contains(&entry.risk_score) {
                        return Err(invalid(
                            h,
                            format!("riskScore {} outside [0, 1]", entry.risk_score),
                        ));
                    }
                }
            }
            Self::Scaled(table) => {
                for h in Horizon::ALL {
                    let window = table
                        .windows
                        .get(&h)
                        .ok_or_else(|| invalid(h, "missing window".to_string()))?;
                    if !window.risk_scale.is_finite() || window.risk_scale <= 0.0 {
                        return Err(invalid(
                            h,
                            format!("riskScale must be positive, got {}", window.risk_scale),
                        ));
                    }
                    if let Some(rate) = window
                        .success_rate
                        .iter()
                        .find(|r| !(0.0..=1.0).contains(*r))
                    {
                        return Err(invalid(h, format!("successRate {rate} outside [0, 1]")));
                    }
                }
            }
        }
        Ok(())
    }
}

/// Complete, immutable engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    pub condition_weights: ConditionWeightTable,
    pub comorbidity: ComorbidityRule,
    pub tiers: TierTable,
    pub score_ceiling: f64,
    pub cost: CostModel,
    pub horizons: HorizonSettings,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            condition_weights: ConditionWeightTable::default(),
            comorbidity: ComorbidityRule::default(),
            tiers: TierTable::default(),
            score_ceiling: DEFAULT_SCORE_CEILING,
            cost: CostModel::default(),
            horizons: HorizonSettings::default(),
        }
    }
}

impl EngineConfig {
    /// Replace or add the weight for one condition.
    pub fn override_weight(&mut self, condition: impl Into<String>, weight: f64) -> &mut Self {
        self.condition_weights.set(condition, weight);
        self
    }

    /// Replace the tier table.
    ///
    /// # Errors
    /// Returns a `ConfigError` if the new tiers do not partition [0, 1).
    pub fn override_tier_boundaries(
        &mut self,
        tiers: Vec<RiskTier>,
    ) -> Result<&mut Self, ConfigError> {
        self.tiers = TierTable::new(tiers)?;
        Ok(self)
    }

    /// Builder-style variant of [`Self::override_weight`].
    #[must_use]
    pub fn with_weight(mut self, condition: impl Into<String>, weight: f64) -> Self {
        self.override_weight(condition, weight);
        self
    }

    /// Check every table. Called once when an engine is built.
    ///
    /// # Errors
    /// Returns the first `ConfigError` found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.condition_weights.validate()?;
        self.comorbidity.validate()?;
        if !self.score_ceiling.is_finite()
            || self.score_ceiling <= 0.0
            || self.score_ceiling >= 1.0
        {
            return Err(ConfigError::InvalidCeiling(self.score_ceiling));
        }
        self.cost.validate()?;
        self.horizons.validate()?;
        Ok(())
    }
}
