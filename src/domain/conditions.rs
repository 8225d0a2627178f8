//! Condition risk table and comorbidity rule.
//!
//! Names are matched exactly. A name missing from the table is scored at the
//! table's default weight, and the lookup reports that it did so, so callers
//! can spot typos instead of silently under-scoring a member.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Weight applied to any condition not listed in the table.
pub const DEFAULT_CONDITION_WEIGHT: f64 = 0.05;

/// Outcome of a single condition lookup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConditionWeight {
    /// Weight listed in the table
    Listed(f64),
    /// Name absent from the table; the default weight was substituted
    Defaulted(f64),
}

impl ConditionWeight {
    #[must_use]
    pub fn value(self) -> f64 {
        match self {
            Self::Listed(w) | Self::Defaulted(w) => w,
        }
    }

    #[must_use]
    pub fn is_defaulted(self) -> bool {
        matches!(self, Self::Defaulted(_))
    }
}

/// Condition name to weight mapping.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConditionWeightTable {
    #[serde(default)]
    pub weights: BTreeMap<String, f64>,

    #[serde(default = "default_condition_weight")]
    pub default_weight: f64,
}

fn default_condition_weight() -> f64 {
    DEFAULT_CONDITION_WEIGHT
}

impl Default for ConditionWeightTable {
    fn default() -> Self {
        let weights = [
            ("Diabetes Type 2", 0.15),
            ("Diabetes", 0.15),
            ("CHF", 0.18),
            ("Heart Disease", 0.18),
            ("COPD", 0.12),
            ("CKD", 0.14),
            ("Kidney Disease", 0.14),
            ("Hypertension", 0.08),
            ("High Blood Pressure", 0.08),
            ("Cancer", 0.10),
            ("High Cholesterol", 0.05),
        ]
        .into_iter()
        .map(|(name, w)| (name.to_string(), w))
        .collect();

        Self {
            weights,
            default_weight: DEFAULT_CONDITION_WEIGHT,
        }
    }
}

impl ConditionWeightTable {
    /// Look up the weight for a condition name.
    #[must_use]
    pub fn lookup(&self, condition: &str) -> ConditionWeight {
        match self.weights.get(condition) {
            Some(&w) => ConditionWeight::Listed(w),
            None => ConditionWeight::Defaulted(self.default_weight),
        }
    }

    /// Insert or replace the weight for one condition.
    pub fn set(&mut self, condition: impl Into<String>, weight: f64) {
        self.weights.insert(condition.into(), weight);
    }

    /// Check every weight, including the default, lies in [0, 1].
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidWeight` for the first offending entry.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let entries = self
            .weights
            .iter()
            .map(|(name, &w)| (name.as_str(), w))
            .chain(std::iter::once(("<default>", self.default_weight)));

        for (name, value) in entries {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidWeight {
                    name: name.to_string(),
                    value,
                });
            }
        }
        Ok(())
    }
}

/// Multiplier applied to summed condition weights when conditions co-occur.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ComorbidityRule {
    /// Multiplier for exactly two conditions
    pub pair_multiplier: f64,
    /// Condition count at which `multi_multiplier` applies
    pub multi_threshold: usize,
    /// Multiplier for `multi_threshold` or more conditions
    pub multi_multiplier: f64,
}

impl Default for ComorbidityRule {
    fn default() -> Self {
        Self {
            pair_multiplier: 1.15,
            multi_threshold: 3,
            multi_multiplier: 1.30,
        }
    }
}

impl ComorbidityRule {
    /// Multiplier for a member with `count` distinct conditions.
    #[must_use]
    pub fn multiplier(&self, count: usize) -> f64 {
        if count >= self.multi_threshold {
            self.multi_multiplier
        } else if count == 2 {
            self.pair_multiplier
        } else {
            1.0
        }
    }

    /// # Errors
    /// Returns `ConfigError::InvalidWeight` when a multiplier is below 1 or
    /// the threshold would shadow the pair rule.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("pairMultiplier", self.pair_multiplier),
            ("multiMultiplier", self.multi_multiplier),
        ] {
            if !value.is_finite() || value < 1.0 {
                return Err(ConfigError::InvalidWeight {
                    name: name.to_string(),
                    value,
                });
            }
        }
        if self.multi_threshold < 3 {
            return Err(ConfigError::InvalidWeight {
                name: "multiThreshold".to_string(),
                value: self.multi_threshold as f64,
            });
        }
        Ok(())
    }
}
