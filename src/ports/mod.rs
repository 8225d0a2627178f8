//! Ports layer: Trait definitions for pluggable pieces.
//!
//! Following Hexagonal Architecture, these traits define the boundaries
//! between the scoring core and the parts a deployment may swap out
//! (where configuration comes from, how horizons are projected).

mod config_source;
mod horizon_model;

pub use config_source::ConfigSource;
pub use horizon_model::{HorizonContext, HorizonModel};
