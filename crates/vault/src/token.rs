use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use url::Url;
use vgm_core::constants::{CUBBYHOLE_RESPONSE_PATH, GATEKEEPER_TOKEN_PATH, VAULT_TOKEN_HEADER};
use vgm_core::{Error, Result, VaultToken};

use crate::http::{build_client, describe_failure, with_path};

/// Source of the bearer token used for every secret read in a run
pub trait TokenProvider {
    /// Obtain a token. Called once per run; failure is fatal.
    fn acquire_token(&self) -> Result<VaultToken>;
}

/// A token that is already known, e.g. from `VAULT_TOKEN`
#[derive(Debug, Clone)]
pub struct StaticToken(VaultToken);

impl StaticToken {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(VaultToken::new(token))
    }
}

impl TokenProvider for StaticToken {
    fn acquire_token(&self) -> Result<VaultToken> {
        if self.0.as_str().is_empty() {
            return Err(Error::token("static token is empty"));
        }
        Ok(self.0.clone())
    }
}

#[derive(Serialize)]
struct TokenRequest<'a> {
    task_id: &'a str,
}

#[derive(Deserialize)]
struct TokenResponse {
    #[serde(default)]
    ok: bool,
    #[serde(default)]
    token: String,
    #[serde(default)]
    status: String,
    #[serde(default)]
    error: String,
}

#[derive(Deserialize)]
struct WrappedResponse {
    data: WrappedData,
}

#[derive(Deserialize)]
struct WrappedData {
    response: String,
}

#[derive(Deserialize)]
struct UnwrappedSecret {
    auth: AuthInfo,
}

#[derive(Deserialize)]
struct AuthInfo {
    client_token: String,
}

/// Vault Gatekeeper client
///
/// Gatekeeper hands a Mesos task a response-wrapped temporary token. The
/// client requests one for its task id and unwraps it through Vault's
/// cubbyhole to get the real client token.
pub struct GatekeeperClient {
    gatekeeper_address: Url,
    vault_address: Url,
    task_id: String,
    client: Client,
}

impl GatekeeperClient {
    pub fn new(gatekeeper_address: Url, vault_address: Url, task_id: impl Into<String>) -> Result<Self> {
        Ok(Self {
            gatekeeper_address,
            vault_address,
            task_id: task_id.into(),
            client: build_client()?,
        })
    }

    /// Ask gatekeeper for a wrapped temporary token
    fn request_temp_token(&self) -> Result<String> {
        let url = with_path(&self.gatekeeper_address, GATEKEEPER_TOKEN_PATH);
        tracing::debug!(url = %url, task_id = %self.task_id, "requesting temporary token");

        let response = self
            .client
            .post(url.clone())
            .json(&TokenRequest {
                task_id: &self.task_id,
            })
            .send()
            .map_err(|e| Error::token(format!("gatekeeper request to {url} failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| Error::token(format!("failed to read gatekeeper response: {e}")))?;
        let parsed: TokenResponse = serde_json::from_str(&body).map_err(|e| {
            Error::token(format!(
                "failed to parse gatekeeper response (status {status}): {e}"
            ))
        })?;

        if !parsed.ok {
            let reason = if parsed.error.is_empty() {
                parsed.status
            } else {
                parsed.error
            };
            return Err(Error::token(format!("gatekeeper refused task {}: {reason}", self.task_id)));
        }
        if parsed.token.is_empty() {
            return Err(Error::token("gatekeeper returned an empty token"));
        }

        Ok(parsed.token)
    }

    /// Exchange a wrapped temporary token for the client token it carries
    fn unwrap_token(&self, temp_token: &str) -> Result<VaultToken> {
        let url = with_path(&self.vault_address, CUBBYHOLE_RESPONSE_PATH);

        let response = self
            .client
            .get(url.clone())
            .header(VAULT_TOKEN_HEADER, temp_token)
            .send()
            .map_err(|e| Error::token(format!("vault request to {url} failed: {e}")))?;

        if !response.status().is_success() {
            return Err(Error::token(format!(
                "failed to unwrap token: {}",
                describe_failure(response)
            )));
        }

        let wrapped: WrappedResponse = response
            .text()
            .map_err(|e| Error::token(format!("failed to read unwrap response: {e}")))
            .and_then(|body| {
                serde_json::from_str(&body)
                    .map_err(|e| Error::token(format!("failed to parse unwrap response: {e}")))
            })?;
        let secret: UnwrappedSecret = serde_json::from_str(&wrapped.data.response)
            .map_err(|e| Error::token(format!("failed to parse wrapped secret: {e}")))?;

        if secret.auth.client_token.is_empty() {
            return Err(Error::token("unwrapped secret carries an empty client token"));
        }

        Ok(VaultToken::new(secret.auth.client_token))
    }
}

impl TokenProvider for GatekeeperClient {
    fn acquire_token(&self) -> Result<VaultToken> {
        let temp_token = self.request_temp_token()?;
        self.unwrap_token(&temp_token)
    }
}
