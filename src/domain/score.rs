//! Composite score and its itemized breakdown.

use serde::{Deserialize, Serialize};

use super::DEFAULT_SCORE_CEILING;

/// The five scored factors, in tie-break priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Factor {
    Demographic,
    Condition,
    Utilization,
    Medication,
    Vitals,
}

impl Factor {
    /// All factors in priority order.
    pub const ALL: [Factor; 5] = [
        Self::Demographic,
        Self::Condition,
        Self::Utilization,
        Self::Medication,
        Self::Vitals,
    ];

    /// Tie-break rank; lower ranks first.
    #[must_use]
    pub fn priority(self) -> u8 {
        self as u8
    }
}

impl std::fmt::Display for Factor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Demographic => write!(f, "demographic"),
            Self::Condition => write!(f, "condition"),
            Self::Utilization => write!(f, "utilization"),
            Self::Medication => write!(f, "medication"),
            Self::Vitals => write!(f, "vitals"),
        }
    }
}

/// Composite risk score, clamped to `[0, ceiling]` at construction.
///
/// Deserialized values are clamped to `[0, DEFAULT_SCORE_CEILING]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct CompositeRiskScore(f64);

impl CompositeRiskScore {
    /// Clamp a raw factor total. Non-finite totals clamp to 0.
    #[must_use]
    pub fn clamped(raw: f64, ceiling: f64) -> Self {
        if raw.is_nan() {
            return Self(0.0);
        }
        Self(raw.clamp(0.0, ceiling))
    }

    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl From<f64> for CompositeRiskScore {
    fn from(raw: f64) -> Self {
        Self::clamped(raw, DEFAULT_SCORE_CEILING)
    }
}

impl From<CompositeRiskScore> for f64 {
    fn from(score: CompositeRiskScore) -> Self {
        score.0
    }
}

impl std::fmt::Display for CompositeRiskScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}", self.0)
    }
}

/// Itemized sub-scores produced by the aggregator.
///
/// This is the single source of every per-factor number: the composite and
/// the explanation are both derived from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskBreakdown {
    pub demographic: f64,
    pub condition: f64,
    pub utilization: f64,
    pub medication: f64,
    pub vitals: f64,

    /// Unclamped sum of the five factors
    pub raw_total: f64,

    pub composite: CompositeRiskScore,

    /// Conditions scored at the default weight because the table lacks them
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub defaulted_conditions: Vec<String>,
}

impl RiskBreakdown {
    /// Sub-score for one factor.
    #[must_use]
    pub fn factor(&self, factor: Factor) -> f64 {
        match factor {
            Factor::Demographic => self.demographic,
            Factor::Condition => self.condition,
            Factor::Utilization => self.utilization,
            Factor::Medication => self.medication,
            Factor::Vitals => self.vitals,
        }
    }

    /// Whether the ceiling truncated the raw total.
    #[must_use]
    pub fn is_capped(&self) -> bool {
        self.raw_total > self.composite.value()
    }
}
