//! Configuration of [`QLearning`](super::QLearning).
use crate::explorer::EpsilonGreedy;
use anyhow::Result;
use gridmdp_core::error::{check_discount_factor, MdpError};
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`QLearning`](super::QLearning).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct QLearningConfig {
    /// Discount factor, in `(0, 1]`.
    pub gamma: f64,

    /// The number of episodes.
    pub max_iterations: usize,

    /// Learning rate, in `(0, 1]`.
    pub alpha: f64,

    /// Exploration strategy.
    pub explorer: EpsilonGreedy,

    /// Episodes are cut after this many steps if set.
    pub max_steps_per_episode: Option<usize>,

    /// Seed of the random number generator used for exploration.
    pub seed: u64,
}

impl Default for QLearningConfig {
    fn default() -> Self {
        Self {
            gamma: 0.9,
            max_iterations: 1000,
            alpha: 0.1,
            explorer: EpsilonGreedy::default(),
            max_steps_per_episode: None,
            seed: 42,
        }
    }
}

impl QLearningConfig {
    /// Sets the discount factor.
    pub fn gamma(mut self, v: f64) -> Self {
        self.gamma = v;
        self
    }

    /// Sets the number of episodes.
    pub fn max_iterations(mut self, v: usize) -> Self {
        self.max_iterations = v;
        self
    }

    /// Sets the learning rate.
    pub fn alpha(mut self, v: f64) -> Self {
        self.alpha = v;
        self
    }

    /// Sets the explorer.
    pub fn explorer(mut self, v: EpsilonGreedy) -> Self {
        self.explorer = v;
        self
    }

    /// Sets the maximum number of steps in an episode.
    pub fn max_steps_per_episode(mut self, v: Option<usize>) -> Self {
        self.max_steps_per_episode = v;
        self
    }

    /// Sets the random seed.
    pub fn seed(mut self, v: u64) -> Self {
        self.seed = v;
        self
    }

    pub(crate) fn check(&self) -> Result<(), MdpError> {
        check_discount_factor(self.gamma)?;
        if !(self.alpha > 0.0 && self.alpha <= 1.0) {
            return Err(MdpError::InvalidConfig(format!(
                "alpha must be in (0, 1], got {}",
                self.alpha
            )));
        }
        if self.max_steps_per_episode == Some(0) {
            return Err(MdpError::InvalidConfig(
                "max_steps_per_episode must be positive".to_string(),
            ));
        }
        self.explorer.check()
    }

    /// Constructs [`QLearningConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`QLearningConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}
