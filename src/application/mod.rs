//! Application layer: Calculators and the engine facade.
//!
//! Factor calculators, the aggregator and the explanation generator are
//! free functions over domain types; `RiskEngine` binds them to one
//! validated configuration.

mod aggregate;
mod cost;
mod engine;
mod explain;
mod factors;
mod population;

pub use cost::InterventionEstimate;
pub use engine::{Assessment, RiskEngine};
pub use population::PopulationSummary;
