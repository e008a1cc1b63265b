//! Environment step.
use super::EpisodicEnv;

/// Additional information returned with a [`Step`].
pub trait Info {}

impl Info for () {}

/// Outcome of taking an action in an [`EpisodicEnv`].
pub struct Step<E: EpisodicEnv> {
    /// Action taken.
    pub act: usize,

    /// State reached by the action.
    pub next_state: usize,

    /// Reward.
    pub reward: f64,

    /// Flag denoting if the reached state is terminal.
    pub is_terminated: bool,

    /// Information defined by the environment.
    pub info: E::Info,
}

impl<E: EpisodicEnv> Step<E> {
    /// Constructs a [`Step`] object.
    pub fn new(act: usize, next_state: usize, reward: f64, is_terminated: bool, info: E::Info) -> Self {
        Step {
            act,
            next_state,
            reward,
            is_terminated,
            info,
        }
    }
}
