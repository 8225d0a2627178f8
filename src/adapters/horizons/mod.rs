//! Horizon adapters: Implementations of HorizonModel.
//!
//! - `fixed`: input-independent placeholder figures per window
//! - `scaled`: window score, intervention spend and expected savings derived
//!   from the composite score and the annual cost prediction

mod fixed;
mod scaled;

use std::sync::Arc;

use crate::domain::{ConfigError, HorizonSettings};
use crate::ports::HorizonModel;

pub use fixed::FixedHorizonModel;
pub use scaled::ScaledHorizonModel;

/// Build the horizon model selected by configuration.
///
/// # Errors
/// Returns `ConfigError::InvalidHorizon` if the settings are incomplete.
pub fn from_settings(settings: &HorizonSettings) -> Result<Arc<dyn HorizonModel>, ConfigError> {
    let model: Arc<dyn HorizonModel> = match settings {
        HorizonSettings::Fixed(table) => Arc::new(FixedHorizonModel::new(table)?),
        HorizonSettings::Scaled(table) => Arc::new(ScaledHorizonModel::new(table)?),
    };
    Ok(model)
}
