use serde::{Deserialize, Serialize};

use crate::error::ArcadeError;
use crate::scores::DEFAULT_STORAGE_KEY;

/// Arcade-wide settings, loaded from `arcade.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArcadeConfig {
    /// localStorage key holding the score table.
    pub storage_key: String,
    /// Score file used by native builds.
    pub scores_path: String,
    /// Seed for game randomness. Unset means a fresh seed per run.
    pub seed: Option<u64>,
}

impl Default for ArcadeConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            scores_path: "arcade-scores.json".to_string(),
            seed: None,
        }
    }
}

impl ArcadeConfig {
    /// Load config from `ARCADE_CONFIG` or `config/arcade.toml`, falling back
    /// to defaults.
    pub fn load() -> Self {
        if let Ok(path) = std::env::var("ARCADE_CONFIG")
            && let Ok(contents) = std::fs::read_to_string(&path)
        {
            match Self::from_toml_str(&contents) {
                Ok(config) => return config,
                Err(e) => tracing::warn!(path = %path, error = %e, "Ignoring arcade config"),
            }
        }
        if let Ok(contents) = std::fs::read_to_string("config/arcade.toml") {
            match Self::from_toml_str(&contents) {
                Ok(config) => return config,
                Err(e) => tracing::warn!(error = %e, "Ignoring config/arcade.toml"),
            }
        }
        Self::default()
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ArcadeError> {
        let config: Self =
            toml::from_str(contents).map_err(|e| ArcadeError::Config(e.to_string()))?;
        if config.storage_key.trim().is_empty() {
            return Err(ArcadeError::Config("storage_key must not be empty".to_string()));
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_page_storage_key() {
        assert_eq!(ArcadeConfig::default().storage_key, "miniGamesScores");
    }

    #[test]
    fn partial_toml_keeps_other_defaults() {
        let config = ArcadeConfig::from_toml_str("seed = 42").unwrap();
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.storage_key, "miniGamesScores");
    }

    #[test]
    fn empty_storage_key_rejected() {
        assert!(matches!(
            ArcadeConfig::from_toml_str("storage_key = \"  \""),
            Err(ArcadeError::Config(_))
        ));
    }

    #[test]
    fn malformed_toml_rejected() {
        assert!(ArcadeConfig::from_toml_str("seed = [").is_err());
    }

    #[test]
    fn shipped_config_matches_defaults() {
        let config = ArcadeConfig::from_toml_str(include_str!("../../../config/arcade.toml")).unwrap();
        assert_eq!(config, ArcadeConfig::default());
    }
}
