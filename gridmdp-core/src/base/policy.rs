//! Policy.
use anyhow::Result;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::{ops::Index, path::Path};

/// A policy on an environment.
///
/// Policy is a mapping from a state to an action.
pub trait Policy {
    /// Sample an action given a state.
    fn sample(&mut self, state: usize) -> usize;
}

/// A deterministic policy holding one action per state.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TabularPolicy(Vec<usize>);

impl TabularPolicy {
    /// A policy taking action `0` in all of `n_states` states.
    pub fn zeros(n_states: usize) -> Self {
        Self(vec![0; n_states])
    }

    /// The action taken in state `s`.
    pub fn action(&self, s: usize) -> usize {
        self.0[s]
    }

    /// Sets the action taken in state `s`.
    pub fn set_action(&mut self, s: usize, a: usize) {
        self.0[s] = a;
    }

    /// Actions of all states.
    pub fn actions(&self) -> &[usize] {
        &self.0
    }

    /// The number of states covered by the policy.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the policy covers no state.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Unwraps the actions.
    pub fn into_inner(self) -> Vec<usize> {
        self.0
    }
}

impl From<Vec<usize>> for TabularPolicy {
    fn from(actions: Vec<usize>) -> Self {
        Self(actions)
    }
}

impl Index<usize> for TabularPolicy {
    type Output = usize;

    fn index(&self, s: usize) -> &usize {
        &self.0[s]
    }
}

impl Policy for TabularPolicy {
    fn sample(&mut self, state: usize) -> usize {
        debug_assert!(
            state < self.0.len(),
            "state {} out of a policy over {} states",
            state,
            self.0.len()
        );
        self.0[state]
    }
}

/// A configurable object.
pub trait Configurable {
    /// Configuration.
    type Config: Clone + DeserializeOwned;

    /// Builds the object.
    fn build(config: Self::Config) -> Self;

    /// Build the object with the configuration in the yaml file of the given path.
    fn build_from_path(path: impl AsRef<Path>) -> Result<Self>
    where
        Self: Sized,
    {
        let file = std::fs::File::open(path)?;
        let rdr = std::io::BufReader::new(file);
        let config = serde_yaml::from_reader(rdr)?;
        Ok(Self::build(config))
    }
}
