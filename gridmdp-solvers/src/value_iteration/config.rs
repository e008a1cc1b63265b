//! Configuration of [`ValueIteration`](super::ValueIteration).
use crate::greedy::Norm;
use anyhow::Result;
use gridmdp_core::error::{check_discount_factor, MdpError};
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// Configuration of [`ValueIteration`](super::ValueIteration).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct ValueIterationConfig {
    /// Discount factor, in `(0, 1]`.
    pub gamma: f64,

    /// The maximum number of sweeps over the state space.
    pub max_iterations: usize,

    /// Iteration stops once the change of the value function is below this value.
    pub tolerance: f64,

    /// Norm measuring the change of the value function.
    pub norm: Norm,
}

impl Default for ValueIterationConfig {
    fn default() -> Self {
        Self {
            gamma: 0.9,
            max_iterations: 100,
            tolerance: 1e-4,
            norm: Norm::L1,
        }
    }
}

impl ValueIterationConfig {
    /// Sets the discount factor.
    pub fn gamma(mut self, v: f64) -> Self {
        self.gamma = v;
        self
    }

    /// Sets the maximum number of sweeps.
    pub fn max_iterations(mut self, v: usize) -> Self {
        self.max_iterations = v;
        self
    }

    /// Sets the convergence tolerance.
    pub fn tolerance(mut self, v: f64) -> Self {
        self.tolerance = v;
        self
    }

    /// Sets the norm of the convergence check.
    pub fn norm(mut self, v: Norm) -> Self {
        self.norm = v;
        self
    }

    pub(crate) fn check(&self) -> Result<(), MdpError> {
        check_discount_factor(self.gamma)?;
        if !(self.tolerance >= 0.0) {
            return Err(MdpError::InvalidConfig(format!(
                "tolerance must be non-negative, got {}",
                self.tolerance
            )));
        }
        Ok(())
    }

    /// Constructs [`ValueIterationConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`ValueIterationConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempdir::TempDir;

    #[test]
    fn test_serde_value_iteration_config() -> Result<()> {
        let config = ValueIterationConfig::default()
            .gamma(0.95)
            .max_iterations(500)
            .norm(Norm::Max);

        let dir = TempDir::new("value_iteration_config")?;
        let path = dir.path().join("value_iteration.yaml");
        config.save(&path)?;
        let config_ = ValueIterationConfig::load(&path)?;
        assert_eq!(config, config_);
        Ok(())
    }

    #[test]
    fn test_check() {
        assert!(ValueIterationConfig::default().check().is_ok());
        assert_eq!(
            ValueIterationConfig::default().gamma(0.0).check(),
            Err(MdpError::InvalidDiscountFactor(0.0))
        );
        assert!(ValueIterationConfig::default().tolerance(-1.0).check().is_err());
    }
}
