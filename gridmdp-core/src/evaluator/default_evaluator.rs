//! Default implementation of the [`Evaluator`] trait.
//!
//! This module provides a simple evaluator that runs a fixed number of episodes
//! and calculates the average return across all episodes.
use super::Evaluator;
use crate::{
    error::MdpError,
    record::Record,
    EpisodicEnv, Policy,
};
use anyhow::Result;

/// Key of the average undiscounted return in the evaluation record.
pub const EPISODE_RETURN: &str = "episode_return";

/// Key of the fraction of episodes that reached a terminal state.
pub const TERMINATION_RATE: &str = "termination_rate";

/// A default implementation of the [`Evaluator`] trait.
///
/// Runs `n_episodes` episodes and averages their undiscounted returns.
/// Each episode is cut after `max_steps` steps, so a policy that never
/// reaches a terminal state still gets evaluated.
///
/// # Examples
///
/// ```ignore
/// let env = GridWorld::build(&GridWorldConfig::world1(), 42)?;
/// let mut evaluator = DefaultEvaluator::new(env, 100, 200)?;
///
/// let record = evaluator.evaluate(&mut policy)?;
/// println!("Average return: {}", record.get_scalar("episode_return")?);
/// ```
pub struct DefaultEvaluator<E: EpisodicEnv> {
    /// The number of episodes to run during evaluation.
    n_episodes: usize,

    /// The maximum number of steps in an episode.
    max_steps: usize,

    /// The environment instance used for evaluation.
    env: E,
}

impl<E: EpisodicEnv> Evaluator<E> for DefaultEvaluator<E> {
    fn evaluate<P: Policy>(&mut self, policy: &mut P) -> Result<Record> {
        let mut r_total = 0f64;
        let mut n_terminated = 0usize;

        for _ in 0..self.n_episodes {
            let mut state = self.env.reset()?;

            for _ in 0..self.max_steps {
                let act = policy.sample(state);
                let step = self.env.step(act)?;
                r_total += step.reward;
                if step.is_terminated {
                    n_terminated += 1;
                    break;
                }
                state = step.next_state;
            }
        }

        let n = self.n_episodes as f64;
        Ok(Record::from_scalar(EPISODE_RETURN, r_total / n)
            .merge(Record::from_scalar(TERMINATION_RATE, n_terminated as f64 / n)))
    }
}

impl<E: EpisodicEnv> DefaultEvaluator<E> {
    /// Constructs a new [`DefaultEvaluator`].
    ///
    /// Both `n_episodes` and `max_steps` must be positive.
    pub fn new(env: E, n_episodes: usize, max_steps: usize) -> Result<Self> {
        if n_episodes == 0 || max_steps == 0 {
            return Err(MdpError::InvalidConfig(
                "n_episodes and max_steps of the evaluator must be positive".to_string(),
            )
            .into());
        }
        Ok(Self {
            n_episodes,
            max_steps,
            env,
        })
    }

    /// Gives back the environment.
    pub fn into_env(self) -> E {
        self.env
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Env, Step, TabularPolicy};

    /// A corridor `0 - 1 - 2` where state 2 is terminal. Action 1 moves right,
    /// action 0 stays. Every step costs one.
    struct Corridor {
        state: Option<usize>,
    }

    impl Env for Corridor {
        type Config = ();

        fn build(_config: &(), _seed: i64) -> Result<Self> {
            Ok(Self { state: None })
        }

        fn n_states(&self) -> usize {
            3
        }

        fn n_actions(&self) -> usize {
            2
        }
    }

    impl EpisodicEnv for Corridor {
        type Info = ();

        fn reset(&mut self) -> Result<usize> {
            self.state = Some(0);
            Ok(0)
        }

        fn step(&mut self, act: usize) -> Result<Step<Self>> {
            let s = self.state.ok_or(MdpError::EpisodeNotStarted)?;
            let next = if act == 1 { s + 1 } else { s };
            let done = next == 2;
            self.state = if done { None } else { Some(next) };
            Ok(Step::new(act, next, -1.0, done, ()))
        }
    }

    #[test]
    fn test_evaluate_reaching_goal() -> Result<()> {
        let env = Corridor::build(&(), 0)?;
        let mut evaluator = DefaultEvaluator::new(env, 3, 10)?;
        let mut policy = TabularPolicy::from(vec![1, 1, 1]);
        let record = evaluator.evaluate(&mut policy)?;
        assert_eq!(record.get_scalar(EPISODE_RETURN)?, -2.0);
        assert_eq!(record.get_scalar(TERMINATION_RATE)?, 1.0);
        Ok(())
    }

    #[test]
    fn test_evaluate_truncated() -> Result<()> {
        let env = Corridor::build(&(), 0)?;
        let mut evaluator = DefaultEvaluator::new(env, 2, 5)?;
        let mut policy = TabularPolicy::zeros(3);
        let record = evaluator.evaluate(&mut policy)?;
        assert_eq!(record.get_scalar(EPISODE_RETURN)?, -5.0);
        assert_eq!(record.get_scalar(TERMINATION_RATE)?, 0.0);
        Ok(())
    }

    #[test]
    fn test_new_rejects_zero_episodes() {
        let env = Corridor { state: None };
        assert!(DefaultEvaluator::new(env, 0, 10).is_err());
    }
}
