//! The rip orchestrator: builds an external ripper invocation from config,
//! executes it, collects produced files, runs the optional enrichment steps
//! (verification, spectrograms, level analysis, archival log) and folds
//! everything back into the metadata.
//!
//! One linear pipeline per invocation. Fatal errors abort; every
//! post-processing step is best-effort and degrades to a warning.

mod analysis;
mod backend;
mod drive;
pub(crate) mod exec;
mod files;
mod log;
mod orchestrate;
mod spectrogram;
mod verify;

pub use orchestrate::{dry_run, rip};

#[cfg(test)]
mod tests;
