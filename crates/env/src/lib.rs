//! Secret injection for vgm
//!
//! This crate turns a snapshotted [`Environment`](vgm_core::Environment) into
//! the environment of the wrapped command:
//!
//! 1. [`scanner`] extracts secret declarations, creating temp files for
//!    file-backed ones up front.
//! 2. [`injector`] acquires one token and resolves every declaration in order.
//! 3. [`materializer`] writes each resolved secret into the environment or into
//!    its temp file.
//! 4. [`launcher`] finds the command on `PATH` and replaces the current process
//!    with it, committing the environment in the same step.

pub mod injector;
pub mod launcher;
pub mod materializer;
pub mod scanner;

pub use injector::SecretInjector;
pub use launcher::Launcher;
pub use materializer::materialize;
pub use scanner::{scan, SecretDeclaration};
