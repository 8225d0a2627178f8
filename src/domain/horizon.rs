//! Prediction horizon types.
//!
//! Each horizon is an independent view of the same record. Nothing here
//! models how risk evolves between windows.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::TierLevel;

/// Fixed future window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Horizon {
    #[serde(rename = "30-day")]
    Days30,
    #[serde(rename = "60-day")]
    Days60,
    #[serde(rename = "90-day")]
    Days90,
}

impl Horizon {
    pub const ALL: [Horizon; 3] = [Self::Days30, Self::Days60, Self::Days90];

    #[must_use]
    pub fn days(self) -> u32 {
        match self {
            Self::Days30 => 30,
            Self::Days60 => 60,
            Self::Days90 => 90,
        }
    }

    /// Position in [`Horizon::ALL`].
    #[must_use]
    pub fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub fn key(self) -> &'static str {
        match self {
            Self::Days30 => "30-day",
            Self::Days60 => "60-day",
            Self::Days90 => "90-day",
        }
    }
}

impl std::fmt::Display for Horizon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// Risk, cost and ROI for one horizon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HorizonPrediction {
    /// Tier label, e.g. `Medium`
    pub risk_level: String,
    pub tier: TierLevel,
    pub risk_score: f64,
    /// Intervention spend for the window
    pub cost_impact: u64,
    /// Expected savings for the window
    pub roi_value: u64,
}

/// Predictions keyed by horizon, serialized as `{"30-day": ..., ...}`.
pub type HorizonPredictions = BTreeMap<Horizon, HorizonPrediction>;
