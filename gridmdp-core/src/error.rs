//! Errors in the library.
use thiserror::Error;

/// Errors in the library.
#[derive(Error, Debug, PartialEq)]
pub enum MdpError {
    /// Record key error.
    #[error("Record key error: {0}")]
    RecordKeyError(String),

    /// Record value type error.
    #[error("Record value type error: {0}")]
    RecordValueTypeError(String),

    /// The discount factor is outside of `(0, 1]`.
    #[error("Discount factor must be in (0, 1], got {0}")]
    InvalidDiscountFactor(f64),

    /// A configuration value is out of its valid range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A state index is not smaller than the number of states.
    #[error("State {state} is out of range (n_states = {n_states})")]
    StateOutOfRange {
        /// The offending state.
        state: usize,
        /// The number of states.
        n_states: usize,
    },

    /// An action index is not smaller than the number of actions.
    #[error("Action {action} is out of range (n_actions = {n_actions})")]
    ActionOutOfRange {
        /// The offending action.
        action: usize,
        /// The number of actions.
        n_actions: usize,
    },

    /// Transition probabilities of a state-action pair do not sum to one.
    #[error("Probabilities of state {state}, action {action} sum to {sum}")]
    InvalidProbabilities {
        /// State of the pair.
        state: usize,
        /// Action of the pair.
        action: usize,
        /// The actual sum.
        sum: f64,
    },

    /// A grid layout could not be parsed.
    #[error("Invalid layout: {0}")]
    InvalidLayout(String),

    /// `step()` was called without an active episode.
    #[error("No active episode, call reset() first")]
    EpisodeNotStarted,
}

/// Checks that a discount factor lies in `(0, 1]`.
pub fn check_discount_factor(gamma: f64) -> Result<(), MdpError> {
    if gamma > 0.0 && gamma <= 1.0 {
        Ok(())
    } else {
        Err(MdpError::InvalidDiscountFactor(gamma))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_discount_factor() {
        assert!(check_discount_factor(1.0).is_ok());
        assert!(check_discount_factor(0.5).is_ok());
        assert_eq!(
            check_discount_factor(0.0),
            Err(MdpError::InvalidDiscountFactor(0.0))
        );
        assert!(check_discount_factor(1.01).is_err());
        assert!(check_discount_factor(f64::NAN).is_err());
    }
}
