//! Config source port: Trait for loading engine configuration.

use crate::domain::{ConfigError, EngineConfig};

/// Anything that can produce an `EngineConfig`.
///
/// Sources are consulted once, before the engine is built. A source that
/// fails must fail with a `ConfigError`; scoring never starts on a
/// half-loaded configuration.
pub trait ConfigSource {
    /// Short description for logs, e.g. a file path.
    fn describe(&self) -> String;

    /// Load the configuration.
    ///
    /// # Errors
    /// Returns `ConfigError::Read` or `ConfigError::Parse` if the source is
    /// unreadable or malformed, or any validation error from the tables.
    fn load(&self) -> Result<EngineConfig, ConfigError>;
}
