//! Domain types for the secret-injection pipeline

pub mod environment;
pub mod secret;

pub use environment::{EnvValue, Environment};
pub use secret::{Materialization, SecretReference, VaultToken};
