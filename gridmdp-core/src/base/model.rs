//! Transition model of a finite MDP.
use crate::error::MdpError;
use serde::{Deserialize, Serialize};

/// One outcome of taking an action in a state.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct Transition {
    /// Probability of this outcome, `p(next_state | state, action)`.
    pub probability: f64,

    /// The state reached.
    pub next_state: usize,

    /// Reward of reaching `next_state`.
    pub reward: f64,

    /// Flag denoting if `next_state` is terminal.
    pub is_terminal: bool,
}

impl Transition {
    /// Constructs a [`Transition`].
    pub fn new(probability: f64, next_state: usize, reward: f64, is_terminal: bool) -> Self {
        Self {
            probability,
            next_state,
            reward,
            is_terminal,
        }
    }
}

/// Dense table of transitions keyed by `(state, action)`.
///
/// Entries are stored row-major, i.e., the transitions of `(s, a)` are at
/// `s * n_actions + a`. A freshly created model has no outcomes for any pair;
/// environments fill it with [`TransitionModel::set`].
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionModel {
    n_states: usize,
    n_actions: usize,
    table: Vec<Vec<Transition>>,
}

impl TransitionModel {
    /// Creates an empty model.
    pub fn new(n_states: usize, n_actions: usize) -> Self {
        Self {
            n_states,
            n_actions,
            table: vec![Vec::new(); n_states * n_actions],
        }
    }

    /// The number of states.
    pub fn n_states(&self) -> usize {
        self.n_states
    }

    /// The number of actions.
    pub fn n_actions(&self) -> usize {
        self.n_actions
    }

    fn index(&self, s: usize, a: usize) -> Result<usize, MdpError> {
        if s >= self.n_states {
            return Err(MdpError::StateOutOfRange {
                state: s,
                n_states: self.n_states,
            });
        }
        if a >= self.n_actions {
            return Err(MdpError::ActionOutOfRange {
                action: a,
                n_actions: self.n_actions,
            });
        }
        Ok(s * self.n_actions + a)
    }

    /// Sets the outcomes of taking action `a` in state `s`.
    pub fn set(&mut self, s: usize, a: usize, transitions: Vec<Transition>) -> Result<(), MdpError> {
        let ix = self.index(s, a)?;
        if let Some(t) = transitions.iter().find(|t| t.next_state >= self.n_states) {
            return Err(MdpError::StateOutOfRange {
                state: t.next_state,
                n_states: self.n_states,
            });
        }
        self.table[ix] = transitions;
        Ok(())
    }

    /// Returns the outcomes of taking action `a` in state `s`.
    ///
    /// # Panics
    ///
    /// Panics if `s` or `a` is out of range.
    #[inline]
    pub fn get(&self, s: usize, a: usize) -> &[Transition] {
        debug_assert!(s < self.n_states && a < self.n_actions);
        &self.table[s * self.n_actions + a]
    }

    /// Expected one-step return of taking `a` in `s`,
    /// `Σ p · (r + gamma · values[next_state])`.
    ///
    /// This is the Bellman backup shared by value iteration and policy iteration.
    /// The terminal flag does not cut the bootstrap; terminal states are expected
    /// to self-loop with zero reward so their value stays at zero.
    #[inline]
    pub fn action_value(&self, s: usize, a: usize, values: &[f64], gamma: f64) -> f64 {
        self.get(s, a)
            .iter()
            .map(|t| t.probability * (t.reward + gamma * values[t.next_state]))
            .sum()
    }

    /// Action values of all actions in state `s`, written into `out`.
    pub fn action_values(&self, s: usize, values: &[f64], gamma: f64, out: &mut [f64]) {
        for (a, q) in out.iter_mut().enumerate().take(self.n_actions) {
            *q = self.action_value(s, a, values, gamma);
        }
    }

    /// Checks that the probabilities of every `(state, action)` pair sum to one
    /// within `tolerance`.
    pub fn validate(&self, tolerance: f64) -> Result<(), MdpError> {
        for s in 0..self.n_states {
            for a in 0..self.n_actions {
                let sum: f64 = self.get(s, a).iter().map(|t| t.probability).sum();
                if (sum - 1.0).abs() > tolerance {
                    return Err(MdpError::InvalidProbabilities {
                        state: s,
                        action: a,
                        sum,
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_state_model() -> TransitionModel {
        let mut model = TransitionModel::new(2, 2);
        model
            .set(
                0,
                0,
                vec![Transition::new(0.7, 0, 1.0, false), Transition::new(0.3, 1, 0.5, false)],
            )
            .unwrap();
        model.set(0, 1, vec![Transition::new(1.0, 1, 2.0, true)]).unwrap();
        model.set(1, 0, vec![Transition::new(1.0, 1, 0.0, true)]).unwrap();
        model.set(1, 1, vec![Transition::new(1.0, 1, 0.0, true)]).unwrap();
        model
    }

    #[test]
    fn test_action_value() {
        let model = two_state_model();
        let values = vec![10.0, 20.0];
        let q = model.action_value(0, 0, &values, 0.5);
        // 0.7 * (1 + 5) + 0.3 * (0.5 + 10)
        assert!((q - (4.2 + 3.15)).abs() < 1e-12);

        let mut qs = vec![0.0; 2];
        model.action_values(0, &values, 0.5, &mut qs);
        assert!((qs[1] - 12.0).abs() < 1e-12);
    }

    #[test]
    fn test_validate() {
        let mut model = two_state_model();
        assert!(model.validate(1e-9).is_ok());

        model.set(1, 1, vec![Transition::new(0.5, 1, 0.0, true)]).unwrap();
        assert_eq!(
            model.validate(1e-9),
            Err(MdpError::InvalidProbabilities {
                state: 1,
                action: 1,
                sum: 0.5
            })
        );
    }

    #[test]
    fn test_set_out_of_range() {
        let mut model = TransitionModel::new(2, 2);
        assert!(model.set(2, 0, vec![]).is_err());
        assert!(model.set(0, 2, vec![]).is_err());
        assert_eq!(
            model.set(0, 0, vec![Transition::new(1.0, 5, 0.0, false)]),
            Err(MdpError::StateOutOfRange {
                state: 5,
                n_states: 2
            })
        );
    }
}
