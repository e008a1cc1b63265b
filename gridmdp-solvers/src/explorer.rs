//! Exploration strategy of Q-learning.
use crate::greedy::argmax;
use gridmdp_core::error::MdpError;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Epsilon-greedy explorer.
///
/// With probability epsilon a uniformly random action is taken, otherwise the
/// action with the largest Q-value (the lowest index among ties). Epsilon moves
/// linearly from `eps_start` to `eps_final` over `final_episode` episodes and
/// stays at `eps_final` afterwards. The default keeps epsilon at 0.8.
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone)]
pub struct EpsilonGreedy {
    /// Epsilon at the first episode.
    pub eps_start: f64,

    /// Epsilon from `final_episode` on.
    pub eps_final: f64,

    /// The episode at which `eps_final` is reached.
    pub final_episode: usize,
}

impl Default for EpsilonGreedy {
    fn default() -> Self {
        Self::constant(0.8)
    }
}

impl EpsilonGreedy {
    /// Constructs an explorer with a fixed epsilon.
    pub fn constant(eps: f64) -> Self {
        Self {
            eps_start: eps,
            eps_final: eps,
            final_episode: 0,
        }
    }

    /// Set the epsilon value at the start.
    pub fn eps_start(mut self, v: f64) -> Self {
        self.eps_start = v;
        self
    }

    /// Set the epsilon value at the final episode.
    pub fn eps_final(mut self, v: f64) -> Self {
        self.eps_final = v;
        self
    }

    /// Set the episode at which epsilon reaches its final value.
    pub fn final_episode(mut self, v: usize) -> Self {
        self.final_episode = v;
        self
    }

    /// Epsilon of the given episode, counted from zero.
    pub fn epsilon(&self, episode: usize) -> f64 {
        if episode >= self.final_episode {
            self.eps_final
        } else {
            let frac = episode as f64 / self.final_episode as f64;
            self.eps_start + (self.eps_final - self.eps_start) * frac
        }
    }

    /// Takes an action based on the Q-values of the current state.
    pub fn action<R: Rng>(&self, qs: &[f64], eps: f64, rng: &mut R) -> usize {
        if rng.gen::<f64>() < eps {
            rng.gen_range(0..qs.len())
        } else {
            argmax(qs)
        }
    }

    pub(crate) fn check(&self) -> Result<(), MdpError> {
        let valid = |v: f64| (0.0..=1.0).contains(&v);
        if valid(self.eps_start) && valid(self.eps_final) {
            Ok(())
        } else {
            Err(MdpError::InvalidConfig(format!(
                "epsilon must be in [0, 1], got {} -> {}",
                self.eps_start, self.eps_final
            )))
        }
    }
}
