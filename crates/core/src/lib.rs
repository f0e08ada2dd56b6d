//! Core domain types, errors, and constants for `vgm`.
//!
//! ## Key Components
//!
//! - **`errors`**: the primary `Error` enum and `Result` alias covering every
//!   fatal condition of a launch.
//! - **`types`**: the typed environment model. The process environment is
//!   classified once into plain values and secret references, and every later
//!   stage works on that model instead of the ambient environment.
//! - **`constants`**: declaration tags, environment variable names and Vault
//!   protocol constants.

pub mod constants;
pub mod errors;
pub mod types;

pub use self::{
    constants::*,
    errors::{Error, Result, ResultExt},
    types::*,
};
