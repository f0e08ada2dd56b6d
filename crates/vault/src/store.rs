use reqwest::blocking::Client;
use serde_json::Value;
use url::Url;
use vgm_core::constants::{VAULT_API_PREFIX, VAULT_TOKEN_HEADER};
use vgm_core::{Error, Result, VaultToken};

use crate::http::{build_client, describe_failure, with_path};

/// Source of secret values
pub trait SecretStore {
    /// Read the string stored under `key` in the secret at `path`
    ///
    /// # Returns
    /// * `Ok(value)` - the value, guaranteed non-empty
    /// * `Err(Error::SecretStore)` - the lookup failed, the response was not
    ///   JSON, or the value was absent, not a string, or empty
    fn read_secret(&self, token: &VaultToken, path: &str, key: &str) -> Result<String>;
}

/// Vault HTTP API client performing one `GET /v1/<path>` per secret
pub struct VaultClient {
    address: Url,
    client: Client,
}

impl VaultClient {
    /// Create a client for the Vault server at `address`
    pub fn new(address: Url) -> Result<Self> {
        Ok(Self {
            address,
            client: build_client()?,
        })
    }

    fn secret_url(&self, path: &str) -> Url {
        with_path(&self.address, &format!("{VAULT_API_PREFIX}{path}"))
    }
}

impl SecretStore for VaultClient {
    fn read_secret(&self, token: &VaultToken, path: &str, key: &str) -> Result<String> {
        let url = self.secret_url(path);
        tracing::debug!(url = %url, "reading secret");

        let response = self
            .client
            .get(url)
            .header(VAULT_TOKEN_HEADER, token.as_str())
            .send()
            .map_err(|e| Error::secret_store(path, key, format!("vault request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(Error::secret_store(path, key, describe_failure(response)));
        }

        let body = response.text().map_err(|e| {
            Error::secret_store(path, key, format!("failed to read vault response: {e}"))
        })?;

        extract_value(&body, key).map_err(|message| Error::secret_store(path, key, message))
    }
}

/// Pull `data.<key>` out of a Vault read response
fn extract_value(body: &str, key: &str) -> std::result::Result<String, String> {
    let parsed: Value = serde_json::from_str(body)
        .map_err(|e| format!("failed to parse JSON response from vault: {e}"))?;

    match parsed.get("data").and_then(|data| data.get(key)) {
        Some(Value::String(value)) if value.is_empty() => Err("empty value".to_string()),
        Some(Value::String(value)) => Ok(value.clone()),
        Some(_) => Err(format!("value for key '{key}' is not a string")),
        None => Err(format!("no value for key '{key}' in vault response")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_string_value() {
        let value = extract_value(r#"{"data":{"password":"s3cr3t","user":"app"}}"#, "password");
        assert_eq!(value.as_deref(), Ok("s3cr3t"));
    }

    #[test]
    fn test_value_is_not_trimmed() {
        let value = extract_value(r#"{"data":{"cert":"  line\n"}}"#, "cert");
        assert_eq!(value.as_deref(), Ok("  line\n"));
    }

    #[test]
    fn test_rejects_missing_key() {
        let err = extract_value(r#"{"data":{"user":"app"}}"#, "password").unwrap_err();
        assert!(err.contains("no value for key 'password'"));
    }

    #[test]
    fn test_rejects_missing_data() {
        let err = extract_value(r#"{"errors":[]}"#, "password").unwrap_err();
        assert!(err.contains("no value"));
    }

    #[test]
    fn test_rejects_non_string_values() {
        for body in [
            r#"{"data":{"port":5432}}"#,
            r#"{"data":{"port":null}}"#,
            r#"{"data":{"port":{"nested":"x"}}}"#,
        ] {
            let err = extract_value(body, "port").unwrap_err();
            assert!(err.contains("not a string"), "{body}: {err}");
        }
    }

    #[test]
    fn test_rejects_empty_value() {
        let err = extract_value(r#"{"data":{"password":""}}"#, "password").unwrap_err();
        assert_eq!(err, "empty value");
    }

    #[test]
    fn test_rejects_invalid_json() {
        let err = extract_value("<html>bad gateway</html>", "password").unwrap_err();
        assert!(err.starts_with("failed to parse JSON response from vault"));
    }

    #[test]
    fn test_secret_url_uses_versioned_prefix() {
        let client = VaultClient::new(Url::parse("http://127.0.0.1:8200").unwrap()).unwrap();
        assert_eq!(
            client.secret_url("secret/app").as_str(),
            "http://127.0.0.1:8200/v1/secret/app"
        );
    }
}
