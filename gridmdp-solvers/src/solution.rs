use gridmdp_core::TabularPolicy;

/// Result of a solver run.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    /// The greedy policy found.
    pub policy: TabularPolicy,

    /// The value function at the end of the run.
    pub values: Vec<f64>,

    /// The number of outer iterations (sweeps or episodes) performed.
    pub iterations: usize,

    /// Whether the solver stopped on its convergence criterion rather than
    /// on the iteration budget. Always `false` for Q-learning.
    pub converged: bool,
}
