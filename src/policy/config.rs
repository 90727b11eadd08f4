//! Tree configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::limits::GenerationLimit;
use super::ConfigError;
use crate::canonical::canonical_hash_hex;

/// Controls how far the sandclock tree reaches around its root.
///
/// ## Parameters
///
/// - `include_siblings`: show the root's siblings
/// - `include_ancestor_siblings`: show siblings of every expanded ancestor
/// - `max_ancestor_generations`: ancestor generations to follow (`-1` = all)
/// - `max_descendant_generations`: descendant generations to follow (`-1` = all)
/// - `dynamic_generation_limits`: give unused budget of one direction to the other
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    /// Whether to include siblings of the root.
    pub include_siblings: bool,
    /// Whether to include siblings of ancestors.
    pub include_ancestor_siblings: bool,
    /// Maximum ancestor generations.
    pub max_ancestor_generations: GenerationLimit,
    /// Maximum descendant generations.
    pub max_descendant_generations: GenerationLimit,
    /// Whether to redistribute unused generation budget.
    pub dynamic_generation_limits: bool,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            include_siblings: true,
            include_ancestor_siblings: true,
            max_ancestor_generations: GenerationLimit::Unlimited,
            max_descendant_generations: GenerationLimit::Unlimited,
            dynamic_generation_limits: false,
        }
    }
}

impl TreeConfig {
    /// Set both generation limits from their integer form (`-1` = unlimited).
    pub fn with_generation_limits(mut self, ancestors: i64, descendants: i64) -> Result<Self, ConfigError> {
        self.max_ancestor_generations = GenerationLimit::try_from(ancestors)?;
        self.max_descendant_generations = GenerationLimit::try_from(descendants)?;
        Ok(self)
    }

    /// Parse a JSON configuration. Missing keys take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Compute a hash of the configuration parameters.
    pub fn params_hash(&self) -> String {
        canonical_hash_hex(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TreeConfig::default();
        assert!(config.include_siblings);
        assert!(config.include_ancestor_siblings);
        assert!(config.max_ancestor_generations.is_unlimited());
        assert!(config.max_descendant_generations.is_unlimited());
        assert!(!config.dynamic_generation_limits);
    }

    #[test]
    fn test_json_uses_integer_limits() {
        let config = TreeConfig::from_json_str(
            r#"{"max_ancestor_generations": 3, "max_descendant_generations": -1, "include_siblings": false}"#,
        )
        .unwrap();

        assert_eq!(config.max_ancestor_generations, GenerationLimit::Max(3));
        assert_eq!(config.max_descendant_generations, GenerationLimit::Unlimited);
        assert!(!config.include_siblings);
        assert!(config.include_ancestor_siblings);

        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["max_descendant_generations"], -1);
    }

    #[test]
    fn test_json_rejects_bad_limit() {
        let result = TreeConfig::from_json_str(r#"{"max_ancestor_generations": -5}"#);
        assert!(matches!(result, Err(ConfigError::Json(_))));
    }

    #[test]
    fn test_params_hash_changes() {
        let config1 = TreeConfig::default();
        let config2 = TreeConfig::default().with_generation_limits(2, 2).unwrap();

        assert_eq!(config1.params_hash(), TreeConfig::default().params_hash());
        assert_ne!(config1.params_hash(), config2.params_hash());
    }
}
