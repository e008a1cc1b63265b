#![warn(missing_docs)]
//! Grid world environment for the solvers in `gridmdp-solvers`.
//!
//! A [`GridWorld`] is described by a [`GridWorldConfig`], whose layout lists
//! the rows of the grid as whitespace-separated cells:
//!
//! | token | cell |
//! |---|---|
//! | `_` | empty |
//! | `s` | start |
//! | `o` | obstacle |
//! | number | terminal, paying the number on entry |
//!
//! The environment implements both
//! [`ModelBasedEnv`](gridmdp_core::ModelBasedEnv), exposing the full transition
//! model, and [`EpisodicEnv`](gridmdp_core::EpisodicEnv) for learning from
//! sampled steps.
//!
//! ```
//! use gridmdp_core::{Env, EpisodicEnv};
//! use gridmdp_grid_world::{GridWorld, GridWorldConfig, RIGHT};
//!
//! let config = GridWorldConfig::default().layout(["s _ 1"]).step_reward(-0.1);
//! let mut env = GridWorld::build(&config, 42).unwrap();
//! let s = env.reset().unwrap();
//! let step = env.step(RIGHT).unwrap();
//! assert_eq!((s, step.next_state), (0, 1));
//! ```
mod config;
mod env;
mod layout;
mod render;

pub use config::{GridWorldConfig, WORLD_NAMES};
pub use env::{GridWorld, DOWN, LEFT, N_ACTIONS, RIGHT, UP};
pub use layout::{Cell, Layout};
pub use render::{render_policy, render_values};
