//! Evaluate [`Policy`] by rollouts.
use crate::{record::Record, EpisodicEnv, Policy};
use anyhow::Result;
mod default_evaluator;
pub use default_evaluator::{DefaultEvaluator, EPISODE_RETURN, TERMINATION_RATE};

/// Evaluate [`Policy`].
pub trait Evaluator<E: EpisodicEnv> {
    /// Evaluate [`Policy`], returning statistics in a [`Record`].
    fn evaluate<P: Policy>(&mut self, policy: &mut P) -> Result<Record>;
}
