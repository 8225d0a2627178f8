//! Adapters layer: Concrete implementations of ports.
//!
//! - `config`: built-in, JSON-file and environment configuration sources
//! - `horizons`: fixed and time-scaled horizon models
//! - `sanitize`: identifier filtering for logs

pub mod config;
pub mod horizons;
pub mod sanitize;

pub use config::{DefaultConfig, EnvOverlay, JsonConfigFile};
pub use horizons::{FixedHorizonModel, ScaledHorizonModel};
