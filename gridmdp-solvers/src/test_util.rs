//! Small environments for unit tests.
use anyhow::Result;
use gridmdp_core::{
    error::MdpError, Env, EpisodicEnv, ModelBasedEnv, Step, Transition, TransitionModel,
};

/// Configuration of [`Chain`].
#[derive(Clone, Debug)]
pub struct ChainConfig {
    pub n_states: usize,
    pub step_reward: f64,
    pub goal_reward: f64,
}

/// States `0..n` on a line; the last one is a terminal goal.
///
/// Action 0 moves left (bounded at 0), action 1 moves right, action 2 stays.
/// Moving costs `step_reward`; entering the goal adds `goal_reward`.
pub struct Chain {
    model: TransitionModel,
    state: Option<usize>,
}

pub const LEFT: usize = 0;
pub const RIGHT: usize = 1;
pub const STAY: usize = 2;

impl Env for Chain {
    type Config = ChainConfig;

    fn build(config: &ChainConfig, _seed: i64) -> Result<Self> {
        let n = config.n_states;
        let goal = n - 1;
        let mut model = TransitionModel::new(n, 3);
        for s in 0..n {
            for a in 0..3 {
                let t = if s == goal {
                    Transition::new(1.0, s, 0.0, true)
                } else {
                    let next = match a {
                        LEFT => s.saturating_sub(1),
                        RIGHT => s + 1,
                        _ => s,
                    };
                    let bonus = if next == goal { config.goal_reward } else { 0.0 };
                    Transition::new(1.0, next, config.step_reward + bonus, next == goal)
                };
                model.set(s, a, vec![t])?;
            }
        }
        Ok(Self { model, state: None })
    }

    fn n_states(&self) -> usize {
        self.model.n_states()
    }

    fn n_actions(&self) -> usize {
        self.model.n_actions()
    }
}

impl ModelBasedEnv for Chain {
    fn transition_model(&self) -> &TransitionModel {
        &self.model
    }
}

impl EpisodicEnv for Chain {
    type Info = ();

    fn reset(&mut self) -> Result<usize> {
        self.state = Some(0);
        Ok(0)
    }

    fn step(&mut self, act: usize) -> Result<Step<Self>> {
        let s = self.state.ok_or(MdpError::EpisodeNotStarted)?;
        let t = self.model.get(s, act)[0];
        self.state = if t.is_terminal { None } else { Some(t.next_state) };
        Ok(Step::new(act, t.next_state, t.reward, t.is_terminal, ()))
    }
}

pub fn chain(n_states: usize, step_reward: f64, goal_reward: f64) -> Chain {
    let config = ChainConfig {
        n_states,
        step_reward,
        goal_reward,
    };
    Chain::build(&config, 0).unwrap()
}

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}
