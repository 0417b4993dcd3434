use std::f64::consts::FRAC_1_SQRT_2;
use std::path::Path;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::ismcts::error::SearchError;

/// Exploration constant used when none is given: sqrt(2) / 2.
pub const DEFAULT_EXPLORATION: f64 = FRAC_1_SQRT_2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchConfig {
    /// Determinize/select/expand/simulate/backpropagate cycles per search
    pub iterations: usize,
    /// UCB exploration constant
    pub exploration: f64,
    /// Fixed seed for reproducible searches, fresh entropy when absent
    pub seed: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            iterations: 1000,
            exploration: DEFAULT_EXPLORATION,
            seed: None,
        }
    }
}

impl SearchConfig {
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_exploration(mut self, exploration: f64) -> Self {
        self.exploration = exploration;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<(), SearchError> {
        if self.iterations == 0 {
            return Err(SearchError::InvalidConfig(
                "iterations must be at least 1".to_string(),
            ));
        }
        validate_exploration(self.exploration)
    }

    pub fn from_json(json: &str) -> Result<Self, SearchError> {
        let config: SearchConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SearchError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

pub(crate) fn validate_exploration(exploration: f64) -> Result<(), SearchError> {
    if !exploration.is_finite() || exploration <= 0.0 {
        return Err(SearchError::InvalidConfig(format!(
            "exploration must be a positive number, got {exploration}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    #[test]
    fn test_default_config() {
        let config = SearchConfig::default();
        assert_eq!(config.iterations, 1000);
        assert!((config.exploration - 2f64.sqrt() / 2.0).abs() < 1e-12);
        assert_eq!(config.seed, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builders() {
        let config = SearchConfig::default()
            .with_iterations(50)
            .with_exploration(1.5)
            .with_seed(7);
        assert_eq!(config.iterations, 50);
        assert_eq!(config.exploration, 1.5);
        assert_eq!(config.seed, Some(7));
    }

    #[test]
    fn test_from_json() {
        let config = SearchConfig::from_json(r#"{"iterations": 250, "seed": 42}"#).unwrap();
        assert_eq!(config.iterations, 250);
        assert_eq!(config.exploration, DEFAULT_EXPLORATION);
        assert_eq!(config.seed, Some(42));
    }

    #[test]
    fn test_from_json_rejects_invalid() {
        assert!(matches!(
            SearchConfig::from_json(r#"{"iterations": 0}"#),
            Err(SearchError::InvalidConfig(_))
        ));
        assert!(matches!(
            SearchConfig::from_json(r#"{"exploration": -1.0}"#),
            Err(SearchError::InvalidConfig(_))
        ));
        assert!(matches!(
            SearchConfig::from_json("not json"),
            Err(SearchError::Json(_))
        ));
    }

    #[test]
    fn test_from_missing_file() {
        assert!(matches!(
            SearchConfig::from_file("/nonexistent/search.json"),
            Err(SearchError::Io(_))
        ));
    }

    #[test]
    fn test_seeded_rng() {
        let config = SearchConfig::default().with_seed(3);
        let a: u64 = config.rng().gen();
        let b: u64 = config.rng().gen();
        assert_eq!(a, b);
    }
}
