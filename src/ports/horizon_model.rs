//! Horizon model port: Trait for per-window risk, cost and ROI projection.

use crate::domain::{CompositeRiskScore, Horizon, HorizonPrediction, TierTable};

/// Inputs shared by every horizon of one record.
#[derive(Debug, Clone, Copy)]
pub struct HorizonContext<'a> {
    /// Composite score of the record
    pub score: CompositeRiskScore,
    /// Predicted annual cost for that score
    pub annual_cost: u64,
    /// Score ceiling, so window scores stay within the composite range
    pub ceiling: f64,
    /// Tier table used to label window scores
    pub tiers: &'a TierTable,
}

/// Trait for horizon projection.
///
/// Implementations must be pure: each horizon is computed from the context
/// alone, independently of the other horizons.
pub trait HorizonModel: Send + Sync + std::fmt::Debug {
    /// Model name for logs (`fixed`, `scaled`).
    fn name(&self) -> &'static str;

    /// Project one horizon.
    fn predict(&self, horizon: Horizon, ctx: &HorizonContext<'_>) -> HorizonPrediction;
}
