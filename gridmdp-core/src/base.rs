//! Core functionalities.
mod env;
mod model;
mod policy;
mod step;
pub use env::{Env, EpisodicEnv, ModelBasedEnv};
pub use model::{Transition, TransitionModel};
pub use policy::{Configurable, Policy, TabularPolicy};
pub use step::{Info, Step};
