//! Configuration errors.
//!
//! Every variant is detected when an `EngineConfig` is loaded or validated,
//! before any member is scored.

/// Errors raised by malformed engine configuration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("Tier table is empty")]
    EmptyTierTable,

    #[error("Tier {name} has invalid bounds [{min}, {max})")]
    InvalidTierBounds { name: String, min: f64, max: f64 },

    #[error("Lowest tier {name} starts at {min}, expected 0")]
    LowestTierNotAtZero { name: String, min: f64 },

    #[error("Top tier {name} ends at {max}, expected at least 1")]
    TopTierBelowOne { name: String, max: f64 },

    #[error("Gap between tier {lower} (ends {lower_max}) and tier {upper} (starts {upper_min})")]
    TierGap {
        lower: String,
        lower_max: f64,
        upper: String,
        upper_min: f64,
    },

    #[error("Tier {lower} (ends {lower_max}) overlaps tier {upper} (starts {upper_min})")]
    TierOverlap {
        lower: String,
        lower_max: f64,
        upper: String,
        upper_min: f64,
    },

    #[error("Tier levels must increase with score: {lower} is level {lower_level}, {upper} is level {upper_level}")]
    NonMonotonicTiers {
        lower: String,
        lower_level: u8,
        upper: String,
        upper_level: u8,
    },

    #[error("Tier level {0} appears more than once")]
    DuplicateTierLevel(u8),

    #[error("Weight for {name} must be within [0, 1], got {value}")]
    InvalidWeight { name: String, value: f64 },

    #[error("Score ceiling must be within (0, 1), got {0}")]
    InvalidCeiling(f64),

    #[error("Invalid cost model: {0}")]
    InvalidCostModel(String),

    #[error("Invalid horizon parameters for {horizon}: {reason}")]
    InvalidHorizon { horizon: String, reason: String },

    #[error("Failed to read configuration: {0}")]
    Read(String),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}
