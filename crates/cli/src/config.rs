//! Launcher configuration
//!
//! vgm takes no flags for injection; everything is read from the environment
//! the wrapped command will run with.

use url::Url;
use vgm_core::constants::{
    DEFAULT_VAULT_ADDR, GATEKEEPER_ADDR_VAR, MESOS_TASK_ID_VAR, VAULT_ADDR_VAR, VAULT_TOKEN_VAR,
    VGM_ENV_ENABLED_VAR,
};
use vgm_core::{Environment, Error, Result, VaultToken};
use vgm_vault::{GatekeeperClient, StaticToken, TokenProvider};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LauncherConfig {
    /// Injection runs only when `VGM_ENV_ENABLED` is non-empty
    pub enabled: bool,
    pub vault_address: Option<String>,
    pub gatekeeper_address: Option<String>,
    pub task_id: Option<String>,
    pub vault_token: Option<String>,
}

impl LauncherConfig {
    /// Read the configuration from an environment snapshot
    pub fn from_environment(env: &Environment) -> Self {
        Self::from_lookup(|name| env.value_of(name).and_then(|v| v.into_string().ok()))
    }

    /// Read the configuration through a variable lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |name: &str| lookup(name).filter(|v| !v.is_empty());

        Self {
            enabled: var(VGM_ENV_ENABLED_VAR).is_some(),
            vault_address: var(VAULT_ADDR_VAR),
            gatekeeper_address: var(GATEKEEPER_ADDR_VAR),
            task_id: var(MESOS_TASK_ID_VAR),
            vault_token: var(VAULT_TOKEN_VAR),
        }
    }

    /// The Vault server, defaulting to a local agent
    pub fn vault_address(&self) -> Result<Url> {
        let raw = self.vault_address.as_deref().unwrap_or(DEFAULT_VAULT_ADDR);
        parse_address(VAULT_ADDR_VAR, raw)
    }

    /// Pick the token source: gatekeeper when configured, else `VAULT_TOKEN`
    ///
    /// A missing source is not an error here; it is reported when the token is
    /// requested.
    pub fn token_source(&self) -> Result<TokenSource> {
        if let Some(gatekeeper) = &self.gatekeeper_address {
            let gatekeeper = parse_address(GATEKEEPER_ADDR_VAR, gatekeeper)?;
            return Ok(match &self.task_id {
                Some(task_id) => TokenSource::Gatekeeper(GatekeeperClient::new(
                    gatekeeper,
                    self.vault_address()?,
                    task_id.clone(),
                )?),
                None => TokenSource::Unconfigured(format!(
                    "{GATEKEEPER_ADDR_VAR} is set but {MESOS_TASK_ID_VAR} is not"
                )),
            });
        }

        Ok(match &self.vault_token {
            Some(token) => TokenSource::Static(StaticToken::new(token.clone())),
            None => TokenSource::Unconfigured(format!(
                "neither {GATEKEEPER_ADDR_VAR} nor {VAULT_TOKEN_VAR} is set"
            )),
        })
    }
}

fn parse_address(variable: &str, raw: &str) -> Result<Url> {
    Url::parse(raw).map_err(|e| Error::configuration(format!("invalid {variable} '{raw}': {e}")))
}

/// Where the run's Vault token comes from
pub enum TokenSource {
    Gatekeeper(GatekeeperClient),
    Static(StaticToken),
    Unconfigured(String),
}

impl TokenProvider for TokenSource {
    fn acquire_token(&self) -> Result<VaultToken> {
        match self {
            TokenSource::Gatekeeper(client) => client.acquire_token(),
            TokenSource::Static(token) => token.acquire_token(),
            TokenSource::Unconfigured(reason) => Err(Error::token(reason.clone())),
        }
    }
}
