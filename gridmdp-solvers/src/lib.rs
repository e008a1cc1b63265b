#![warn(missing_docs)]
//! Solvers of finite Markov decision processes.
//!
//! Three solvers are provided, each as a configurable struct and as a plain
//! function following `solve(env, gamma, max_iterations, recorder) -> policy`:
//!
//! * [`ValueIteration`] / [`value_iteration`]: synchronous Bellman optimality
//!   sweeps over the transition model.
//! * [`PolicyIteration`] / [`policy_iteration`]: alternating policy evaluation
//!   and greedy policy improvement over the transition model.
//! * [`QLearning`] / [`q_learning`]: model-free, epsilon-greedy temporal
//!   difference control using only `reset()` and `step()`.
//!
//! Solvers report snapshots to a [`Recorder`](gridmdp_core::record::Recorder)
//! before their loop and after every iteration.
mod explorer;
mod greedy;
mod policy_iteration;
mod q_learning;
mod solution;
mod value_iteration;

#[cfg(test)]
mod test_util;

pub use explorer::EpsilonGreedy;
pub use greedy::{argmax, max_with_argmax, Norm};
pub use policy_iteration::{
    evaluate_policy, improve_policy, policy_iteration, InitialPolicy, PolicyIteration,
    PolicyIterationConfig,
};
pub use q_learning::{q_learning, QLearning, QLearningConfig, EPISODE_LENGTH, EPSILON, Q_TABLE};
pub use solution::Solution;
pub use value_iteration::{
    bellman_optimality_sweep, value_iteration, ValueIteration, ValueIterationConfig,
};

use anyhow::Result;
use gridmdp_core::{error::MdpError, ModelBasedEnv, TransitionModel};

/// Returns the transition model of `env` after checking its shape.
pub(crate) fn checked_model<E: ModelBasedEnv>(env: &E) -> Result<&TransitionModel> {
    let model = env.transition_model();
    if model.n_states() != env.n_states() || model.n_actions() != env.n_actions() {
        return Err(MdpError::InvalidConfig(format!(
            "transition model is {}x{} but the environment has {} states and {} actions",
            model.n_states(),
            model.n_actions(),
            env.n_states(),
            env.n_actions()
        ))
        .into());
    }
    if model.n_actions() == 0 {
        return Err(MdpError::InvalidConfig("the environment has no action".to_string()).into());
    }
    Ok(model)
}
