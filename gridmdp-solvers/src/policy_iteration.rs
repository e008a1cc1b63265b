//! Policy iteration.
mod config;
use crate::{checked_model, greedy::max_with_argmax, greedy::Norm, Solution};
use anyhow::Result;
pub use config::{InitialPolicy, PolicyIterationConfig};
use gridmdp_core::{
    error::MdpError,
    record::{Record, RecordValue, Recorder, DELTA, PHASE},
    Configurable, ModelBasedEnv, TabularPolicy, TransitionModel,
};
use log::{debug, info};
use rand::{rngs::StdRng, Rng, SeedableRng};

/// Policy iteration solver.
///
/// Every outer iteration consists of two phases:
///
/// 1. Policy evaluation: Bellman expectation sweeps under the current policy,
///    warm-started from the previous values, until the change falls below
///    [`PolicyIterationConfig::eval_tolerance`] or
///    [`PolicyIterationConfig::max_eval_iterations`] sweeps were done.
/// 2. Policy improvement: one-step lookahead over all actions with the
///    evaluated values. A state switches to its greedy action (lowest index on
///    ties) only if that action is strictly better than the current one, in
///    which case its value is raised to the greedy action value.
///
/// Because a state keeps its action on ties, the lowest-index rule only
/// decides between actions that strictly beat the current one. When several
/// actions share the optimal value, the result depends on
/// [`PolicyIterationConfig::initial_policy`]: starting from `Fixed(a)` keeps
/// `a` wherever it is already optimal.
///
/// The run ends after [`PolicyIterationConfig::stable_window`] consecutive
/// outer iterations without a policy change, or after
/// [`PolicyIterationConfig::max_iterations`] outer iterations.
///
/// Records: a snapshot with values and policy before the loop, then per outer
/// iteration a values-only snapshot after evaluation (`phase = "evaluation"`)
/// and a snapshot with values and policy after improvement
/// (`phase = "improvement"`).
pub struct PolicyIteration {
    config: PolicyIterationConfig,
}

impl Configurable for PolicyIteration {
    type Config = PolicyIterationConfig;

    fn build(config: Self::Config) -> Self {
        Self { config }
    }
}

impl PolicyIteration {
    /// Runs policy iteration with a random number generator seeded by
    /// [`PolicyIterationConfig::seed`].
    pub fn solve<E: ModelBasedEnv>(&self, env: &E, recorder: &mut dyn Recorder) -> Result<Solution> {
        let mut rng = StdRng::seed_from_u64(self.config.seed);
        self.solve_with_rng(env, recorder, &mut rng)
    }

    /// Runs policy iteration, drawing a random initial policy from `rng` if configured.
    pub fn solve_with_rng<E: ModelBasedEnv, R: Rng>(
        &self,
        env: &E,
        recorder: &mut dyn Recorder,
        rng: &mut R,
    ) -> Result<Solution> {
        self.config.check()?;
        let model = checked_model(env)?;
        let gamma = self.config.gamma;
        let n_states = model.n_states();

        let mut values = vec![0.0; n_states];
        let mut policy = self.initial_policy(model, rng)?;
        recorder.write(Record::snapshot(0, &values, Some(policy.actions())));

        info!(
            "Start policy iteration: {} states, {} actions, gamma = {}",
            n_states,
            model.n_actions(),
            gamma
        );

        let mut iterations = 0;
        let mut n_unchanged = 0;
        let mut converged = false;

        for k in 1..=self.config.max_iterations {
            iterations = k;

            let (n_sweeps, delta) = evaluate_policy(
                model,
                gamma,
                &policy,
                &mut values,
                self.config.eval_tolerance,
                self.config.max_eval_iterations,
                self.config.norm,
            );
            let mut record = Record::snapshot(k, &values, None);
            record.insert(PHASE, RecordValue::String("evaluation".to_string()));
            record.insert(DELTA, RecordValue::Scalar(delta));
            record.insert("eval_sweeps", RecordValue::Scalar(n_sweeps as f64));
            recorder.write(record);

            let n_changed = improve_policy(model, gamma, &mut values, &mut policy);
            let mut record = Record::snapshot(k, &values, Some(policy.actions()));
            record.insert(PHASE, RecordValue::String("improvement".to_string()));
            record.insert("changed_states", RecordValue::Scalar(n_changed as f64));
            recorder.write(record);

            debug!(
                "Iteration {}: {} evaluation sweeps (delta = {}), {} states changed",
                k, n_sweeps, delta, n_changed
            );

            if n_changed == 0 {
                n_unchanged += 1;
            } else {
                n_unchanged = 0;
            }
            if n_unchanged >= self.config.stable_window {
                converged = true;
                break;
            }
        }

        if converged {
            info!(
                "Policy iteration converged: policy stable for {} iterations, {} iterations in total",
                n_unchanged, iterations
            );
        } else {
            info!("Policy iteration stopped at the budget of {} iterations", iterations);
        }

        Ok(Solution {
            policy,
            values,
            iterations,
            converged,
        })
    }

    fn initial_policy<R: Rng>(&self, model: &TransitionModel, rng: &mut R) -> Result<TabularPolicy> {
        let n_actions = model.n_actions();
        let actions = match self.config.initial_policy {
            InitialPolicy::Fixed(a) if a >= n_actions => {
                return Err(MdpError::ActionOutOfRange {
                    action: a,
                    n_actions,
                }
                .into())
            }
            InitialPolicy::Fixed(a) => vec![a; model.n_states()],
            InitialPolicy::Random => (0..model.n_states())
                .map(|_| rng.gen_range(0..n_actions))
                .collect(),
        };
        Ok(TabularPolicy::from(actions))
    }
}

/// Evaluates `policy` in place, starting from the given `values`.
///
/// Performs synchronous Bellman expectation sweeps until the change of the
/// value function is below `tolerance` or `max_sweeps` sweeps were done.
/// Returns the number of sweeps and the change in the last sweep.
pub fn evaluate_policy(
    model: &TransitionModel,
    gamma: f64,
    policy: &TabularPolicy,
    values: &mut [f64],
    tolerance: f64,
    max_sweeps: usize,
    norm: Norm,
) -> (usize, f64) {
    let mut next = values.to_vec();
    let mut delta = f64::INFINITY;

    for sweep in 1..=max_sweeps {
        for (s, v) in next.iter_mut().enumerate() {
            *v = model.action_value(s, policy.action(s), values, gamma);
        }
        delta = norm.distance(values, &next);
        values.copy_from_slice(&next);
        if delta < tolerance {
            return (sweep, delta);
        }
    }

    (max_sweeps, delta)
}

/// Improves `policy` greedily with respect to `values`.
///
/// A state takes its greedy action only when that action is strictly better
/// than the current one; its value is then raised to the greedy action value.
/// Returns the number of states whose action changed.
pub fn improve_policy(
    model: &TransitionModel,
    gamma: f64,
    values: &mut [f64],
    policy: &mut TabularPolicy,
) -> usize {
    let mut qs = vec![0.0; model.n_actions()];
    let mut n_changed = 0;

    for s in 0..model.n_states() {
        // lookahead uses the evaluated values, not the ones raised in this pass
        model.action_values(s, values, gamma, &mut qs);
        let current = policy.action(s);
        let (best, q_best) = max_with_argmax(&qs);
        if q_best > qs[current] {
            policy.set_action(s, best);
            values[s] = q_best;
            n_changed += 1;
        }
    }

    n_changed
}

/// Solves `env` with policy iteration and returns the final policy.
///
/// Uses the default evaluation tolerance (`1e-4`), stability window (15) and
/// initial policy (action 0 everywhere).
pub fn policy_iteration<E: ModelBasedEnv>(
    env: &E,
    gamma: f64,
    max_iterations: usize,
    recorder: &mut dyn Recorder,
) -> Result<TabularPolicy> {
    let config = PolicyIterationConfig::default()
        .gamma(gamma)
        .max_iterations(max_iterations);
    PolicyIteration::build(config)
        .solve(env, recorder)
        .map(|solution| solution.policy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        test_util::{chain, init_logger, RIGHT, STAY},
        value_iteration::{ValueIteration, ValueIterationConfig},
    };
    use gridmdp_core::record::{BufferedRecorder, NullRecorder, POLICY, VALUES};

    #[test]
    fn test_zero_iterations_returns_initial_policy() -> Result<()> {
        let env = chain(4, -1.0, 0.0);
        let mut recorder = BufferedRecorder::new();
        let policy = policy_iteration(&env, 0.9, 0, &mut recorder)?;

        assert_eq!(policy, TabularPolicy::zeros(4));
        assert_eq!(recorder.len(), 1);
        Ok(())
    }

    #[test]
    fn test_agrees_with_value_iteration() -> Result<()> {
        init_logger();
        let env = chain(6, -1.0, 5.0);
        let pi = PolicyIteration::build(
            PolicyIterationConfig::default()
                .gamma(0.9)
                .eval_tolerance(1e-8)
                .stable_window(3),
        )
        .solve(&env, &mut NullRecorder::new())?;
        let vi = ValueIteration::build(
            ValueIterationConfig::default()
                .gamma(0.9)
                .max_iterations(1000)
                .tolerance(1e-8),
        )
        .solve(&env, &mut NullRecorder::new())?;

        assert!(pi.converged);
        assert_eq!(pi.policy, vi.policy);
        for (v, w) in pi.values.iter().zip(vi.values.iter()) {
            assert!((v - w).abs() < 1e-3, "{:?} vs {:?}", pi.values, vi.values);
        }
        Ok(())
    }

    #[test]
    fn test_stops_after_stable_window() -> Result<()> {
        let env = chain(3, -1.0, 0.0);
        let config = PolicyIterationConfig::default()
            .gamma(0.9)
            .initial_policy(InitialPolicy::Fixed(RIGHT))
            .stable_window(4);
        let solution = PolicyIteration::build(config).solve(&env, &mut NullRecorder::new())?;

        // already optimal, so every iteration is stable
        assert!(solution.converged);
        assert_eq!(solution.iterations, 4);
        Ok(())
    }

    #[test]
    fn test_records_evaluation_and_improvement() -> Result<()> {
        let env = chain(4, -1.0, 0.0);
        let mut recorder = BufferedRecorder::new();
        let config = PolicyIterationConfig::default().gamma(0.9).stable_window(2);
        let solution = PolicyIteration::build(config).solve(&env, &mut recorder)?;

        assert_eq!(recorder.len(), 1 + 2 * solution.iterations);
        let records = recorder.into_records();
        for pair in records[1..].chunks(2) {
            assert_eq!(pair[0].get_string(PHASE)?, "evaluation");
            assert!(pair[0].get_indices(POLICY).is_err());
            assert_eq!(pair[1].get_string(PHASE)?, "improvement");
            assert!(pair[1].get_indices(POLICY).is_ok());
            assert_eq!(pair[0].iteration(), pair[1].iteration());
        }
        Ok(())
    }

    #[test]
    fn test_values_never_regress() -> Result<()> {
        let env = chain(8, -1.0, 3.0);
        let mut recorder = BufferedRecorder::new();
        let config = PolicyIterationConfig::default()
            .gamma(0.95)
            .eval_tolerance(1e-10)
            .max_eval_iterations(10_000)
            .initial_policy(InitialPolicy::Fixed(STAY))
            .stable_window(2);
        PolicyIteration::build(config).solve(&env, &mut recorder)?;

        let improved = recorder
            .iter()
            .filter(|r| r.get_string(PHASE).map(|p| p == "improvement").unwrap_or(false))
            .map(|r| r.get_array1(VALUES))
            .collect::<Result<Vec<_>, _>>()?;
        assert!(improved.len() >= 2);
        for w in improved.windows(2) {
            for (before, after) in w[0].iter().zip(w[1].iter()) {
                assert!(after + 1e-6 >= *before, "{:?} -> {:?}", w[0], w[1]);
            }
        }
        Ok(())
    }

    #[test]
    fn test_random_initial_policy_is_reproducible() -> Result<()> {
        let env = chain(10, -1.0, 0.0);
        let config = PolicyIterationConfig::default()
            .initial_policy(InitialPolicy::Random)
            .max_iterations(0)
            .seed(3);
        let solver = PolicyIteration::build(config);
        let a = solver.solve(&env, &mut NullRecorder::new())?;
        let b = solver.solve(&env, &mut NullRecorder::new())?;
        assert_eq!(a.policy, b.policy);
        assert!(a.policy.actions().iter().all(|&act| act < 3));

        // and the final policy does not depend on it
        let config = PolicyIterationConfig::default()
            .gamma(0.9)
            .initial_policy(InitialPolicy::Random)
            .stable_window(2);
        let mut rng = StdRng::seed_from_u64(11);
        let random = PolicyIteration::build(config).solve_with_rng(&env, &mut NullRecorder::new(), &mut rng)?;
        let fixed = policy_iteration(&env, 0.9, 100, &mut NullRecorder::new())?;
        // the goal state keeps whatever action it started with
        assert_eq!(random.policy.actions()[..9], fixed.actions()[..9]);
        Ok(())
    }

    #[test]
    fn test_initial_action_out_of_range() {
        let env = chain(3, -1.0, 0.0);
        let config = PolicyIterationConfig::default().initial_policy(InitialPolicy::Fixed(3));
        let err = PolicyIteration::build(config)
            .solve(&env, &mut NullRecorder::new())
            .unwrap_err();
        assert_eq!(
            err.downcast_ref::<MdpError>(),
            Some(&MdpError::ActionOutOfRange {
                action: 3,
                n_actions: 3
            })
        );
    }

    #[test]
    fn test_evaluate_policy() {
        let env = chain(3, -1.0, 0.0);
        let policy = TabularPolicy::from(vec![RIGHT, RIGHT, RIGHT]);
        let mut values = vec![0.0; 3];
        let (n_sweeps, delta) = evaluate_policy(
            env.transition_model(),
            0.5,
            &policy,
            &mut values,
            1e-12,
            100,
            Norm::L1,
        );
        assert_eq!(values, vec![-1.5, -1.0, 0.0]);
        assert_eq!(delta, 0.0);
        assert!(n_sweeps <= 3);
    }
}
