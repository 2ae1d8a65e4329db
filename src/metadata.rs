//! Typed CD metadata: the user-authored album/track description that drives a
//! rip, and the ripping record the orchestrator folds back into it.

mod generate;
mod model;
mod parse;
mod validate;

pub use generate::{generate_schema, generate_template};
pub use model::*;
pub use parse::parse;
pub use validate::validate;
pub(crate) use validate::check_rules;
