//! # Riskscope
//!
//! Deterministic, explainable health-risk scoring for members and patients.
//!
//! This crate provides:
//! - Per-factor sub-scores (demographic, condition, utilization, medication, vitals)
//! - A bounded composite score and its classification into five ordered tiers
//! - Annual cost prediction and intervention economics
//! - Factor attribution explaining which inputs drove the score
//! - 30/60/90-day horizon views of the same record
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core business types (MemberRecord, RiskTier, Explanation, Horizons)
//! - `ports`: Trait definitions for pluggable pieces (config sources, horizon models)
//! - `adapters`: Concrete implementations (JSON config file, horizon models, log sanitizer)
//! - `application`: Factor calculators, aggregation and the `RiskEngine` facade

pub mod adapters;
pub mod application;
pub mod domain;
pub mod ports;

pub use application::{Assessment, RiskEngine};
pub use domain::{
    CompositeRiskScore, ConfigError, EngineConfig, Explanation, MemberRecord, RiskBreakdown,
    RiskTier, TierLevel,
};

use ports::ConfigSource;

/// Build an engine with the horizon model its configuration selects.
///
/// # Errors
/// Returns a `ConfigError` if any table is invalid.
pub fn engine_from_config(config: EngineConfig) -> std::result::Result<RiskEngine, ConfigError> {
    let horizon_model = adapters::horizons::from_settings(&config.horizons)?;
    RiskEngine::new(config, horizon_model)
}

/// Load configuration from a source and build an engine.
///
/// # Errors
/// Returns the source's `ConfigError`, or a validation error.
pub fn engine_from_source(
    source: &impl ConfigSource,
) -> std::result::Result<RiskEngine, ConfigError> {
    tracing::debug!("Loading engine config from {}", source.describe());
    engine_from_config(source.load()?)
}

/// Result type for Riskscope operations
pub type Result<T> = std::result::Result<T, RiskscopeError>;

/// Main error type for Riskscope
#[derive(Debug, thiserror::Error)]
pub enum RiskscopeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid member record: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
