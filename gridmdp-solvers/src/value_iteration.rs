//! Value iteration.
mod config;
use crate::{checked_model, greedy::max_with_argmax, Solution};
use anyhow::Result;
pub use config::ValueIterationConfig;
use gridmdp_core::{
    record::{Record, RecordValue, Recorder, DELTA},
    Configurable, ModelBasedEnv, TabularPolicy, TransitionModel,
};
use log::{debug, info};

/// Value iteration solver.
///
/// Starting from an all-zero value function, every sweep computes for each
/// state `s` the action values `Q(s, a) = Σ p · (r + γ · V_prev[s'])` from the
/// value function of the previous sweep, then sets `V[s] = max_a Q(s, a)` and
/// `policy[s] = argmax_a Q(s, a)` (lowest action on ties).
///
/// The solver stops when the change of the value function between two sweeps,
/// measured with [`ValueIterationConfig::norm`], falls below
/// [`ValueIterationConfig::tolerance`], and never runs more than
/// [`ValueIterationConfig::max_iterations`] sweeps.
///
/// A snapshot is written to the recorder before the first sweep (iteration 0)
/// and after every sweep, together with the change `delta`.
pub struct ValueIteration {
    config: ValueIterationConfig,
}

impl Configurable for ValueIteration {
    type Config = ValueIterationConfig;

    fn build(config: Self::Config) -> Self {
        Self { config }
    }
}

impl ValueIteration {
    /// Runs value iteration on `env`.
    ///
    /// Fails before any sweep if the configuration is invalid or the transition
    /// model does not match the environment.
    pub fn solve<E: ModelBasedEnv>(&self, env: &E, recorder: &mut dyn Recorder) -> Result<Solution> {
        self.config.check()?;
        let model = checked_model(env)?;
        let gamma = self.config.gamma;
        let n_states = model.n_states();

        let mut values = vec![0.0; n_states];
        let mut policy = TabularPolicy::zeros(n_states);
        recorder.write(Record::snapshot(0, &values, Some(policy.actions())));

        info!(
            "Start value iteration: {} states, {} actions, gamma = {}",
            n_states,
            model.n_actions(),
            gamma
        );

        let mut prev = values.clone();
        let mut iterations = 0;
        let mut converged = false;

        for k in 1..=self.config.max_iterations {
            bellman_optimality_sweep(model, gamma, &prev, &mut values, &mut policy);
            let delta = self.config.norm.distance(&prev, &values);
            iterations = k;

            let mut record = Record::snapshot(k, &values, Some(policy.actions()));
            record.insert(DELTA, RecordValue::Scalar(delta));
            recorder.write(record);
            debug!("Sweep {}: delta = {}", k, delta);

            if delta < self.config.tolerance {
                converged = true;
                break;
            }
            prev.copy_from_slice(&values);
        }

        if converged {
            info!("Value iteration converged after {} sweeps", iterations);
        } else {
            info!("Value iteration stopped at the budget of {} sweeps", iterations);
        }

        Ok(Solution {
            policy,
            values,
            iterations,
            converged,
        })
    }
}

/// Performs one synchronous Bellman optimality sweep.
///
/// Reads `prev` only and writes the new values and greedy actions of every
/// state into `values` and `policy`.
pub fn bellman_optimality_sweep(
    model: &TransitionModel,
    gamma: f64,
    prev: &[f64],
    values: &mut [f64],
    policy: &mut TabularPolicy,
) {
    let mut qs = vec![0.0; model.n_actions()];
    for s in 0..model.n_states() {
        model.action_values(s, prev, gamma, &mut qs);
        let (a, v) = max_with_argmax(&qs);
        values[s] = v;
        policy.set_action(s, a);
    }
}

/// Solves `env` with value iteration and returns the greedy policy.
///
/// Uses the default tolerance (`1e-4`, L1 norm).
pub fn value_iteration<E: ModelBasedEnv>(
    env: &E,
    gamma: f64,
    max_iterations: usize,
    recorder: &mut dyn Recorder,
) -> Result<TabularPolicy> {
    let config = ValueIterationConfig::default()
        .gamma(gamma)
        .max_iterations(max_iterations);
    ValueIteration::build(config)
        .solve(env, recorder)
        .map(|solution| solution.policy)
}
