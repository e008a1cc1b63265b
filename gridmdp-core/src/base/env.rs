//! Environment.
use super::{Info, Step, TransitionModel};
use anyhow::Result;

/// Represents an environment with finite state and action spaces.
///
/// States are identified by `0..n_states()` and actions by `0..n_actions()`.
/// Every action is available in every state.
pub trait Env {
    /// Configurations.
    type Config: Clone;

    /// Builds an environment with a given random seed.
    fn build(config: &Self::Config, seed: i64) -> Result<Self>
    where
        Self: Sized;

    /// The number of states.
    fn n_states(&self) -> usize;

    /// The number of actions.
    fn n_actions(&self) -> usize;
}

/// An environment exposing its dynamics, used by model-based solvers.
pub trait ModelBasedEnv: Env {
    /// Returns the transition model.
    ///
    /// The model is expected to have `n_states() x n_actions()` entries whose
    /// probabilities sum to one. Solvers assume this without checking.
    fn transition_model(&self) -> &TransitionModel;
}

/// An environment that can only be sampled, used by model-free solvers.
pub trait EpisodicEnv: Env {
    /// Information in the [`Step`] object.
    type Info: Info;

    /// Starts a new episode and returns the initial state.
    fn reset(&mut self) -> Result<usize>;

    /// Performs an environment step with the given action.
    ///
    /// Fails when no episode is active, i.e., before the first [`reset`] or
    /// after a terminal step.
    ///
    /// [`reset`]: EpisodicEnv::reset
    fn step(&mut self, act: usize) -> Result<Step<Self>>
    where
        Self: Sized;
}
