use crate::Result;
use minigym::Continous;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Stopping rule and discount of a dynamic programming solver.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    pub theta: Continous,
    pub gamma: Continous,
    pub max_iterations: Option<usize>,
}

impl SweepConfig {
    fn with_gamma(gamma: Continous) -> Self {
        Self {
            gamma,
            ..Default::default()
        }
    }
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            theta: 1e-4,
            gamma: 1.,
            max_iterations: Some(10_000),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct McConfig {
    pub episodes: usize,
    pub gamma: Continous,
    pub seed: u64,
    pub max_episode_steps: Option<usize>,
}

impl Default for McConfig {
    fn default() -> Self {
        Self {
            episodes: 100_000,
            gamma: 1.,
            seed: 2718,
            max_episode_steps: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BanditConfig {
    pub k: usize,
    pub runs: usize,
    pub steps: usize,
    pub seed: u64,
    pub epsilon: Continous,
    pub ucb_c: Continous,
    pub tau: Continous,
}

impl Default for BanditConfig {
    fn default() -> Self {
        Self {
            k: 10,
            runs: 2000,
            steps: 1000,
            seed: 2718,
            epsilon: 0.1,
            ucb_c: 2.,
            tau: 0.1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub policy_evaluation: SweepConfig,
    pub policy_iteration: SweepConfig,
    pub value_iteration: SweepConfig,
    pub mc_control: McConfig,
    pub bandit: BanditConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            policy_evaluation: SweepConfig::default(),
            policy_iteration: SweepConfig::with_gamma(0.9),
            value_iteration: SweepConfig::default(),
            mc_control: McConfig::default(),
            bandit: BanditConfig::default(),
        }
    }
}

impl Config {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_json(&fs::read_to_string(path)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RlError;
    use assertor::*;

    #[test]
    fn empty_file_gives_the_defaults() {
        let config = Config::from_json("{}").unwrap();

        assert_eq!(config, Config::default());
        assert_eq!(config.policy_iteration.gamma, 0.9);
        assert_eq!(config.value_iteration.gamma, 1.);
    }

    #[test]
    fn partial_sections_keep_the_other_defaults() {
        let config = Config::from_json(
            r#"{ "value_iteration": { "gamma": 0.5 }, "mc_control": { "episodes": 10 } }"#,
        )
        .unwrap();

        assert_eq!(config.value_iteration.gamma, 0.5);
        assert_eq!(config.value_iteration.theta, 1e-4);
        assert_eq!(config.mc_control.episodes, 10);
        assert_eq!(config.mc_control.seed, 2718);
        assert_eq!(config.bandit, BanditConfig::default());
    }

    #[test]
    fn bad_json_is_reported() {
        let err = Config::from_json("{ not json").unwrap_err();

        assert_that!(matches!(err, RlError::Json(_))).is_true();
    }

    #[test]
    fn missing_file_is_reported() {
        let err = Config::from_file("/definitely/not/here.json").unwrap_err();

        assert_that!(matches!(err, RlError::Io(_))).is_true();
    }
}
