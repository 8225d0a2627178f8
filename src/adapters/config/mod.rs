//! Config adapters: Implementations of ConfigSource.
//!
//! - `DefaultConfig`: the built-in tables
//! - `JsonConfigFile`: an `EngineConfig` serialized as JSON on disk
//! - `EnvOverlay`: best-effort environment overrides on top of another source

use std::path::{Path, PathBuf};

use crate::domain::{
    ConfigError, EngineConfig, FixedHorizonTable, HorizonSettings, ScaledHorizonTable,
};
use crate::ports::ConfigSource;

/// Environment variable overriding the weight of unlisted conditions.
pub const DEFAULT_CONDITION_WEIGHT_ENV: &str = "RISKSCOPE_DEFAULT_CONDITION_WEIGHT";

/// Environment variable selecting the horizon model (`fixed` or `scaled`).
pub const HORIZON_MODEL_ENV: &str = "RISKSCOPE_HORIZON_MODEL";

/// Built-in configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultConfig;

impl ConfigSource for DefaultConfig {
    fn describe(&self) -> String {
        "built-in defaults".to_string()
    }

    fn load(&self) -> Result<EngineConfig, ConfigError> {
        Ok(EngineConfig::default())
    }
}

/// JSON configuration file.
///
/// Any field left out of the file keeps its built-in default. The tier
/// table is validated while parsing.
#[derive(Debug, Clone)]
pub struct JsonConfigFile {
    path: PathBuf,
}

impl JsonConfigFile {
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl ConfigSource for JsonConfigFile {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> Result<EngineConfig, ConfigError> {
        let content = std::fs::read_to_string(&self.path)
            .map_err(|e| ConfigError::Read(format!("{}: {e}", self.path.display())))?;
        let config: EngineConfig = serde_json::from_str(&content)
            .map_err(|e| ConfigError::Parse(format!("{}: {e}", self.path.display())))?;
        config.validate()?;

        tracing::info!(
            "Loaded engine config from {:?} ({} condition weights, {} tiers)",
            self.path,
            config.condition_weights.weights.len(),
            config.tiers.tiers().len()
        );
        Ok(config)
    }
}

/// Applies environment overrides to the configuration of an inner source.
///
/// Unparseable values are ignored with a warning, matching how the rest of
/// the crate treats optional tuning knobs.
#[derive(Debug, Clone)]
pub struct EnvOverlay<S> {
    inner: S,
}

impl<S: ConfigSource> EnvOverlay<S> {
    #[must_use]
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    fn apply(config: &mut EngineConfig, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(v) = lookup(DEFAULT_CONDITION_WEIGHT_ENV) {
            match v.trim().parse::<f64>() {
                Ok(x) if x.is_finite() => config.condition_weights.default_weight = x,
                _ => tracing::warn!("Ignoring unparseable {DEFAULT_CONDITION_WEIGHT_ENV}={v:?}"),
            }
        }

        if let Some(v) = lookup(HORIZON_MODEL_ENV) {
            // Switching models resets parameters; keeping the same model keeps the file's table.
            match v.trim() {
                "fixed" => {
                    if !matches!(config.horizons, HorizonSettings::Fixed(_)) {
                        config.horizons = HorizonSettings::Fixed(FixedHorizonTable::default());
                    }
                }
                "scaled" => {
                    if !matches!(config.horizons, HorizonSettings::Scaled(_)) {
                        config.horizons = HorizonSettings::Scaled(ScaledHorizonTable::default());
                    }
                }
                _ => tracing::warn!("Ignoring unknown {HORIZON_MODEL_ENV}={v:?}"),
            }
        }
    }

    fn load_with(
        &self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<EngineConfig, ConfigError> {
        let mut config = self.inner.load()?;
        Self::apply(&mut config, lookup);
        config.validate()?;
        Ok(config)
    }
}

impl<S: ConfigSource> ConfigSource for EnvOverlay<S> {
    fn describe(&self) -> String {
        format!("{} + environment", self.inner.describe())
    }

    fn load(&self) -> Result<EngineConfig, ConfigError> {
        self.load_with(|name| std::env::var(name).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DEFAULT_SCORE_CEILING;
    use std::collections::HashMap;

    fn temp_config(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "riskscope-{}-{name}.json",
            std::process::id()
        ));
        std::fs::write(&path, content).expect("Should write temp config");
        path
    }

    #[test]
    fn test_json_file_round_trip_of_overrides() {
        let path = temp_config(
            "weights",
            r#"{"conditionWeights": {"weights": {"CHF": 0.3}, "defaultWeight": 0.02}}"#,
        );

        let config = JsonConfigFile::new(&path).load().expect("Should load config");
        assert!((config.condition_weights.lookup("CHF").value() - 0.3).abs() < f64::EPSILON);
        assert!((config.condition_weights.lookup("Asthma").value() - 0.02).abs() < f64::EPSILON);

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let err = JsonConfigFile::new("/nonexistent/riskscope.json")
            .load()
            .expect_err("Should fail to read");
        assert!(matches!(err, ConfigError::Read(_)));
    }

    #[test]
    fn test_malformed_tiers_are_parse_errors() {
        let path = temp_config(
            "gap",
            r##"{"tiers": [
                {"level": 1, "name": "LOW", "label": "Low", "color": "#fff", "icon": "l",
                 "minScore": 0.0, "maxScore": 0.4, "description": "d"},
                {"level": 5, "name": "HIGH", "label": "High", "color": "#000", "icon": "h",
                 "minScore": 0.5, "maxScore": 1.0, "description": "d"}
            ]}"##,
        );

        let err = JsonConfigFile::new(&path).load().expect_err("Should reject gap");
        assert!(matches!(err, ConfigError::Parse(msg) if msg.contains("Gap")));

        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_env_overlay() {
        let vars: HashMap<&str, &str> = [
            ("RISKSCOPE_SCORE_CEILING", "0.9"),
            (DEFAULT_CONDITION_WEIGHT_ENV, "not-a-number"),
            (HORIZON_MODEL_ENV, "fixed"),
        ]
        .into_iter()
        .collect();

        let config = EnvOverlay::new(DefaultConfig)
            .load_with(|name| vars.get(name).map(|v| (*v).to_string()))
            .expect("Should load overlay");

        // The ceiling is not an environment knob.
        assert!((config.score_ceiling - DEFAULT_SCORE_CEILING).abs() < f64::EPSILON);
        assert!((config.condition_weights.default_weight - 0.05).abs() < f64::EPSILON);
        assert!(matches!(config.horizons, HorizonSettings::Fixed(_)));
    }

    #[test]
    fn test_env_overlay_still_validates() {
        let err = EnvOverlay::new(DefaultConfig)
            .load_with(|name| (name == DEFAULT_CONDITION_WEIGHT_ENV).then(|| "1.5".to_string()))
            .expect_err("Should reject default weight above 1");
        assert!(matches!(err, ConfigError::InvalidWeight { value, .. } if value == 1.5));
    }
}
