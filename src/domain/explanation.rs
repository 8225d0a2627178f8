//! Factor attribution types.

use serde::{Deserialize, Serialize};

use super::Factor;

/// Whether a factor pushes the score up or down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    IncreasesRisk,
    DecreasesRisk,
}

impl Direction {
    #[must_use]
    pub fn of(contribution: f64) -> Self {
        if contribution < 0.0 {
            Self::DecreasesRisk
        } else {
            Self::IncreasesRisk
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IncreasesRisk => write!(f, "increases risk"),
            Self::DecreasesRisk => write!(f, "decreases risk"),
        }
    }
}

/// One explanation line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attribution {
    pub factor: Factor,
    /// Human-readable driver, e.g. `Age 70` or `CHF + COPD`
    pub detail: String,
    /// Share of the composite score; entries sum to the composite
    pub contribution: f64,
    /// Sub-score before any ceiling scaling
    pub raw_contribution: f64,
    /// Part of the contribution every member receives regardless of inputs
    #[serde(default)]
    pub baseline: f64,
    pub direction: Direction,
}

impl Attribution {
    /// Member-specific part of the contribution, used for ranking.
    #[must_use]
    pub fn driver(&self) -> f64 {
        self.contribution - self.baseline
    }
}

/// Ranked attribution of a composite score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Explanation {
    pub score: f64,
    /// Sorted by descending |driver|, ties by factor priority
    pub entries: Vec<Attribution>,
    pub summary: String,
}

impl Explanation {
    /// Sum of all contributions.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.entries.iter().map(|e| e.contribution).sum()
    }

    /// The largest contributor, if any.
    #[must_use]
    pub fn primary(&self) -> Option<&Attribution> {
        self.entries.first()
    }
}
