//! Domain layer: Core business types and logic.
//!
//! This module contains pure Rust types with no I/O.
//! All types are serializable; tables validate themselves on construction.

mod conditions;
mod config;
mod error;
mod explanation;
mod horizon;
mod member;
mod score;
mod tier;

pub use conditions::{
    ComorbidityRule, ConditionWeight, ConditionWeightTable, DEFAULT_CONDITION_WEIGHT,
};
pub use config::{
    CostModel, EngineConfig, FixedHorizonEntry, FixedHorizonTable, HorizonSettings,
    ScaledHorizonTable, ScaledWindow, DEFAULT_SCORE_CEILING,
};
pub use error::ConfigError;
pub use explanation::{Attribution, Direction, Explanation};
pub use horizon::{Horizon, HorizonPrediction, HorizonPredictions};
pub use member::{Gender, MemberRecord, Vitals};
pub use score::{CompositeRiskScore, Factor, RiskBreakdown};
pub use tier::{InterventionEconomics, RiskTier, TierLevel, TierTable};
