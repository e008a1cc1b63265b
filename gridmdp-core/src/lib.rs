#![warn(missing_docs)]
//! Core components of tabular MDP solvers.
//!
//! This crate defines what the solvers in `gridmdp-solvers` consume and emit:
//!
//! * Environment traits: [`Env`], [`ModelBasedEnv`] for solvers that read the
//!   transition model directly, and [`EpisodicEnv`] for sample-based solvers.
//! * The transition model: [`Transition`] records stored in a dense
//!   [`TransitionModel`] keyed by `(state, action)`.
//! * [`TabularPolicy`], a deterministic mapping from states to actions.
//! * The [`record`] module, through which solvers report per-iteration snapshots
//!   of values and policies to an observer.
pub mod error;
pub mod record;

mod base;
pub use base::{
    Configurable, Env, EpisodicEnv, Info, ModelBasedEnv, Policy, Step, TabularPolicy, Transition,
    TransitionModel,
};

mod evaluator;
pub use evaluator::{DefaultEvaluator, Evaluator, EPISODE_RETURN, TERMINATION_RATE};
