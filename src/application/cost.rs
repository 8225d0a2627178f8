//! Annual cost prediction and intervention economics.

use serde::{Deserialize, Serialize};

use crate::domain::{CostModel, RiskTier, TierLevel};

/// `round(base_cost * (1 + score * risk_multiplier))`. Negative or NaN scores count as 0.
#[must_use]
pub fn predict_cost(score: f64, model: &CostModel) -> u64 {
    let score = score.max(0.0);
    (model.base_cost * (1.0 + score * model.risk_multiplier)).round() as u64
}

/// Expected return of enrolling one member in the tier's care-management program.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterventionEstimate {
    pub tier: TierLevel,
    pub tier_name: String,
    /// Predicted annual cost without intervention
    pub baseline_cost: u64,
    pub intervention_cost: u64,
    /// Portion of baseline cost addressable by the program
    pub preventable_cost: u64,
    pub expected_savings: u64,
    /// Savings minus intervention cost; negative when the program loses money
    pub net_benefit: i64,
    /// Net benefit over intervention cost, in percent; absent for free programs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roi_percent: Option<f64>,
}

impl InterventionEstimate {
    #[must_use]
    pub fn compute(tier: &RiskTier, baseline_cost: u64, model: &CostModel) -> Self {
        let economics = tier.economics();

        let preventable = baseline_cost as f64 * model.preventable_portion;
        let savings = preventable * economics.reduction_rate;
        let net = savings - economics.annual_cost as f64;

        let roi_percent = (economics.annual_cost > 0)
            .then(|| (net / economics.annual_cost as f64 * 1000.0).round() / 10.0);

        Self {
            tier: tier.level,
            tier_name: tier.name.clone(),
            baseline_cost,
            intervention_cost: economics.annual_cost,
            preventable_cost: preventable.round() as u64,
            expected_savings: savings.round() as u64,
            net_benefit: net.round() as i64,
            roi_percent,
        }
    }
}
