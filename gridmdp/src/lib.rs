//! Tabular solvers of Markov decision processes on grid worlds.
//!
//! This crate re-exports the crates of the workspace:
//!
//! * [`core`] (`gridmdp-core`) provides environment traits, the transition
//!   model, tabular policies, the recording system and rollout evaluation.
//! * [`solvers`] (`gridmdp-solvers`) implements value iteration, policy
//!   iteration and Q-learning.
//! * [`grid_world`] (`gridmdp-grid-world`) is a grid world environment built
//!   from a text layout.
//!
//! ```
//! use gridmdp::{
//!     core::{record::NullRecorder, Env},
//!     grid_world::{GridWorld, GridWorldConfig, RIGHT},
//!     solvers::value_iteration,
//! };
//!
//! # fn main() -> anyhow::Result<()> {
//! let env = GridWorld::build(&GridWorldConfig::world1(), 42)?;
//! let policy = value_iteration(&env, 0.9, 100, &mut NullRecorder::new())?;
//! // next to the +1 exit
//! assert_eq!(policy.action(2), RIGHT);
//! # Ok(())
//! # }
//! ```
pub use gridmdp_core as core;
pub use gridmdp_grid_world as grid_world;
pub use gridmdp_solvers as solvers;
