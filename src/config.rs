//! Configuration loader and schema types.
//!
//! This module exposes the settings tree that drives the rip pipeline and
//! helpers to load it from disk, the environment, and CLI overrides.

mod load;
mod schema;
mod template;

pub use load::{default_config_path, resolve_config_path};
pub use schema::*;
pub use template::write_default_config;

#[cfg(test)]
mod tests;
