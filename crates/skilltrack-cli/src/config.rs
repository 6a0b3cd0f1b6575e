//! CLI configuration loaded from `skilltrack.toml`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use skilltrack_core::scoring::ScoringConfig;

/// Default config file looked up in the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "skilltrack.toml";

fn default_plan_limit() -> usize {
    20
}

/// Top-level skilltrack configuration. Every field has a default, so the
/// file itself is optional.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkilltrackConfig {
    /// Scoring engine tunables.
    #[serde(default)]
    pub scoring: ScoringConfigToml,
    /// Default size of the daily review plan.
    #[serde(default = "default_plan_limit")]
    pub plan_limit: usize,
}

impl Default for SkilltrackConfig {
    fn default() -> Self {
        Self {
            scoring: ScoringConfigToml::default(),
            plan_limit: default_plan_limit(),
        }
    }
}

/// TOML shape of the scoring tunables; falls back to the engine defaults
/// field by field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScoringConfigToml {
    #[serde(default)]
    pub learning_rate: Option<f64>,
    #[serde(default)]
    pub max_delta_scale: Option<f64>,
    #[serde(default)]
    pub time_budget_secs: Option<f64>,
}

impl SkilltrackConfig {
    /// Load config from an explicit path, or from `skilltrack.toml` if it
    /// exists, or fall back to the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default = Path::new(DEFAULT_CONFIG_PATH);
                if default.exists() {
                    Self::from_file(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config from {}", path.display()))?;
        let config: SkilltrackConfig =
            toml::from_str(&content).context("failed to parse config TOML")?;
        Ok(config)
    }

    /// Materialize the engine config, applying any overrides.
    pub fn scoring_config(&self) -> ScoringConfig {
        let defaults = ScoringConfig::default();
        ScoringConfig {
            learning_rate: self.scoring.learning_rate.unwrap_or(defaults.learning_rate),
            max_delta_scale: self
                .scoring
                .max_delta_scale
                .unwrap_or(defaults.max_delta_scale),
            time_budget_secs: self
                .scoring
                .time_budget_secs
                .unwrap_or(defaults.time_budget_secs),
        }
    }
}

/// Resolve a possibly-cli-supplied config path into a loaded config.
pub fn load(config: Option<PathBuf>) -> Result<SkilltrackConfig> {
    SkilltrackConfig::load(config.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_when_no_file() {
        let config = SkilltrackConfig::load(None).unwrap();
        assert_eq!(config.plan_limit, 20);
        let scoring = config.scoring_config();
        assert_eq!(scoring.learning_rate, 0.1);
        assert_eq!(scoring.max_delta(), 1.0);
    }

    #[test]
    fn partial_toml_overrides_only_named_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("skilltrack.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "plan_limit = 10\n\n[scoring]\ntime_budget_secs = 900.0").unwrap();

        let config = SkilltrackConfig::load(Some(&path)).unwrap();
        assert_eq!(config.plan_limit, 10);
        let scoring = config.scoring_config();
        assert_eq!(scoring.time_budget_secs, 900.0);
        assert_eq!(scoring.learning_rate, 0.1);
    }

    #[test]
    fn malformed_toml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("skilltrack.toml");
        std::fs::write(&path, "plan_limit = \"many\"").unwrap();
        assert!(SkilltrackConfig::load(Some(&path)).is_err());
    }
}
