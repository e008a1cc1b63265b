//! Configuration of [`PolicyIteration`](super::PolicyIteration).
use crate::greedy::Norm;
use anyhow::Result;
use gridmdp_core::error::{check_discount_factor, MdpError};
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    io::{BufReader, Write},
    path::Path,
};

/// How the policy is initialized before the first evaluation.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
pub enum InitialPolicy {
    /// The given action in every state.
    Fixed(usize),

    /// An action drawn uniformly at random for every state.
    Random,
}

impl Default for InitialPolicy {
    fn default() -> Self {
        Self::Fixed(0)
    }
}

/// Configuration of [`PolicyIteration`](super::PolicyIteration).
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct PolicyIterationConfig {
    /// Discount factor, in `(0, 1]`.
    pub gamma: f64,

    /// The maximum number of outer (evaluation + improvement) iterations.
    pub max_iterations: usize,

    /// Policy evaluation stops once the change of the value function is below this value.
    pub eval_tolerance: f64,

    /// The maximum number of sweeps in one policy evaluation.
    pub max_eval_iterations: usize,

    /// The number of consecutive outer iterations without a policy change that ends the run.
    pub stable_window: usize,

    /// Norm measuring the change of the value function.
    pub norm: Norm,

    /// Initial policy.
    pub initial_policy: InitialPolicy,

    /// Seed of the random number generator used by [`InitialPolicy::Random`].
    pub seed: u64,
}

impl Default for PolicyIterationConfig {
    fn default() -> Self {
        Self {
            gamma: 0.9,
            max_iterations: 100,
            eval_tolerance: 1e-4,
            max_eval_iterations: 1000,
            stable_window: 15,
            norm: Norm::L1,
            initial_policy: InitialPolicy::default(),
            seed: 42,
        }
    }
}

impl PolicyIterationConfig {
    /// Sets the discount factor.
    pub fn gamma(mut self, v: f64) -> Self {
        self.gamma = v;
        self
    }

    /// Sets the maximum number of outer iterations.
    pub fn max_iterations(mut self, v: usize) -> Self {
        self.max_iterations = v;
        self
    }

    /// Sets the tolerance of policy evaluation.
    pub fn eval_tolerance(mut self, v: f64) -> Self {
        self.eval_tolerance = v;
        self
    }

    /// Sets the maximum number of sweeps in one policy evaluation.
    pub fn max_eval_iterations(mut self, v: usize) -> Self {
        self.max_eval_iterations = v;
        self
    }

    /// Sets the length of the stability window.
    pub fn stable_window(mut self, v: usize) -> Self {
        self.stable_window = v;
        self
    }

    /// Sets the norm of the evaluation convergence check.
    pub fn norm(mut self, v: Norm) -> Self {
        self.norm = v;
        self
    }

    /// Sets the initial policy.
    pub fn initial_policy(mut self, v: InitialPolicy) -> Self {
        self.initial_policy = v;
        self
    }

    /// Sets the random seed.
    pub fn seed(mut self, v: u64) -> Self {
        self.seed = v;
        self
    }

    pub(crate) fn check(&self) -> Result<(), MdpError> {
        check_discount_factor(self.gamma)?;
        if !(self.eval_tolerance >= 0.0) {
            return Err(MdpError::InvalidConfig(format!(
                "eval_tolerance must be non-negative, got {}",
                self.eval_tolerance
            )));
        }
        if self.max_eval_iterations == 0 {
            return Err(MdpError::InvalidConfig(
                "max_eval_iterations must be positive".to_string(),
            ));
        }
        // a single unchanged iteration can be a floating-point coincidence
        if self.stable_window < 2 {
            return Err(MdpError::InvalidConfig(format!(
                "stable_window must be at least 2, got {}",
                self.stable_window
            )));
        }
        Ok(())
    }

    /// Constructs [`PolicyIterationConfig`] from YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let rdr = BufReader::new(file);
        let b = serde_yaml::from_reader(rdr)?;
        Ok(b)
    }

    /// Saves [`PolicyIterationConfig`].
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        file.write_all(serde_yaml::to_string(&self)?.as_bytes())?;
        Ok(())
    }
}
