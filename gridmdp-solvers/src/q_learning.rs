//! Q-learning.
mod config;
use crate::{greedy::max_with_argmax, Solution};
use anyhow::Result;
pub use config::QLearningConfig;
use gridmdp_core::{
    error::MdpError,
    record::{Record, RecordValue, Recorder},
    Configurable, EpisodicEnv, TabularPolicy, EPISODE_RETURN,
};
use log::{debug, info, trace};
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Key of the Q-table in the records of Q-learning.
pub const Q_TABLE: &str = "q_table";

/// Key of the number of steps of an episode.
pub const EPISODE_LENGTH: &str = "episode_length";

/// Key of the exploration rate used in an episode.
pub const EPSILON: &str = "epsilon";

/// Tabular Q-learning.
///
/// Learns from interaction only: each episode starts with
/// [`EpisodicEnv::reset`] and takes epsilon-greedy actions until a terminal
/// step, or until [`QLearningConfig::max_steps_per_episode`] steps if set.
/// After every step the visited entry is moved towards the TD target,
///
/// ```text
/// Q[s][a] += alpha * (r + gamma * max_a' Q[s'][a'] - Q[s][a])
/// ```
///
/// where the bootstrap term is left out on terminal steps. The value and the
/// greedy action of `s` are refreshed right after its update.
///
/// Runs exactly [`QLearningConfig::max_iterations`] episodes; there is no
/// convergence check.
pub struct QLearning {
    config: QLearningConfig,
}

impl Configurable for QLearning {
    type Config = QLearningConfig;

    fn build(config: Self::Config) -> Self {
        Self { config }
    }
}

/// Dense `n_states x n_actions` table of action values.
struct QTable {
    n_actions: usize,
    q: Vec<f64>,
}

impl QTable {
    fn new(n_states: usize, n_actions: usize) -> Self {
        Self {
            n_actions,
            q: vec![0.0; n_states * n_actions],
        }
    }

    fn row(&self, s: usize) -> &[f64] {
        &self.q[s * self.n_actions..(s + 1) * self.n_actions]
    }

    fn row_mut(&mut self, s: usize) -> &mut [f64] {
        &mut self.q[s * self.n_actions..(s + 1) * self.n_actions]
    }

    fn to_record_value(&self) -> RecordValue {
        let n_states = self.q.len() / self.n_actions;
        RecordValue::Array2(self.q.clone(), [n_states, self.n_actions])
    }
}

impl QLearning {
    /// Runs Q-learning with a random number generator seeded by
    /// [`QLearningConfig::seed`].
    pub fn solve<E: EpisodicEnv>(&self, env: &mut E, recorder: &mut dyn Recorder) -> Result<Solution> {
        let mut rng = StdRng::seed_from_u64(self.config.seed);
        self.solve_with_rng(env, recorder, &mut rng)
    }

    /// Runs Q-learning, drawing exploration decisions from `rng`.
    pub fn solve_with_rng<E: EpisodicEnv, R: Rng>(
        &self,
        env: &mut E,
        recorder: &mut dyn Recorder,
        rng: &mut R,
    ) -> Result<Solution> {
        self.config.check()?;
        let n_states = env.n_states();
        let n_actions = env.n_actions();
        if n_actions == 0 {
            return Err(MdpError::InvalidConfig("the environment has no action".to_string()).into());
        }
        let gamma = self.config.gamma;
        let alpha = self.config.alpha;
        let explorer = &self.config.explorer;

        let mut qtable = QTable::new(n_states, n_actions);
        let mut values = vec![0.0; n_states];
        let mut policy = TabularPolicy::zeros(n_states);

        let mut record = Record::snapshot(0, &values, Some(policy.actions()));
        record.insert(Q_TABLE, qtable.to_record_value());
        recorder.write(record);

        info!(
            "Start Q-learning: {} states, {} actions, gamma = {}, alpha = {}",
            n_states, n_actions, gamma, alpha
        );

        for episode in 1..=self.config.max_iterations {
            let eps = explorer.epsilon(episode - 1);
            let mut state = env.reset()?;
            check_state(state, n_states)?;
            let mut episode_return = 0.0;
            let mut episode_length = 0;

            loop {
                let act = explorer.action(qtable.row(state), eps, rng);
                let step = env.step(act)?;
                check_state(step.next_state, n_states)?;
                episode_return += step.reward;
                episode_length += 1;

                let target = if step.is_terminated {
                    step.reward
                } else {
                    step.reward + gamma * max_with_argmax(qtable.row(step.next_state)).1
                };
                let q = &mut qtable.row_mut(state)[act];
                *q += alpha * (target - *q);

                let (best, v) = max_with_argmax(qtable.row(state));
                values[state] = v;
                policy.set_action(state, best);
                trace!(
                    "Episode {}, step {}: s = {}, a = {}, r = {}, s' = {}",
                    episode,
                    episode_length,
                    state,
                    act,
                    step.reward,
                    step.next_state
                );

                if step.is_terminated {
                    break;
                }
                if let Some(max_steps) = self.config.max_steps_per_episode {
                    if episode_length >= max_steps {
                        debug!("Episode {} truncated at {} steps", episode, max_steps);
                        break;
                    }
                }
                state = step.next_state;
            }

            let mut record = Record::snapshot(episode, &values, Some(policy.actions()));
            record.insert(Q_TABLE, qtable.to_record_value());
            record.insert(EPISODE_RETURN, RecordValue::Scalar(episode_return));
            record.insert(EPISODE_LENGTH, RecordValue::Scalar(episode_length as f64));
            record.insert(EPSILON, RecordValue::Scalar(eps));
            recorder.write(record);
            debug!(
                "Episode {}: return = {}, length = {}, epsilon = {}",
                episode, episode_return, episode_length, eps
            );
        }

        info!("Q-learning finished {} episodes", self.config.max_iterations);

        Ok(Solution {
            policy,
            values,
            iterations: self.config.max_iterations,
            converged: false,
        })
    }
}

fn check_state(state: usize, n_states: usize) -> Result<(), MdpError> {
    if state < n_states {
        Ok(())
    } else {
        Err(MdpError::StateOutOfRange { state, n_states })
    }
}

/// Learns a policy for `env` with Q-learning and returns its greedy policy.
///
/// Uses the default learning rate (0.1), a constant epsilon of 0.8 and the
/// default seed. Episodes are not truncated, so every episode of `env` must
/// reach a terminal state.
pub fn q_learning<E: EpisodicEnv>(
    env: &mut E,
    gamma: f64,
    max_iterations: usize,
    recorder: &mut dyn Recorder,
) -> Result<TabularPolicy> {
    let config = QLearningConfig::default()
        .gamma(gamma)
        .max_iterations(max_iterations);
    QLearning::build(config)
        .solve(env, recorder)
        .map(|solution| solution.policy)
}
