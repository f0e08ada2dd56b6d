//! Vault collaborators for vgm
//!
//! Two seams, each a trait with an HTTP implementation:
//!
//! - [`TokenProvider`]: obtain one bearer token for the run. [`GatekeeperClient`]
//!   speaks the Vault Gatekeeper protocol, [`StaticToken`] wraps a token that
//!   is already known.
//! - [`SecretStore`]: read one key of one secret. [`VaultClient`] performs a
//!   single authenticated `GET <base>/v1/<path>`.
//!
//! Every call is blocking and made exactly once. There are no retries and no
//! request timeouts.

mod http;
mod store;
mod token;

pub use store::{SecretStore, VaultClient};
pub use token::{GatekeeperClient, StaticToken, TokenProvider};
