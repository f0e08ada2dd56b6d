use reqwest::blocking::{Client, Response};
use serde::Deserialize;
use url::Url;
use vgm_core::{Error, Result};

/// Build the blocking HTTP client shared by the Vault collaborators
///
/// The client has no request timeout: a hung collaborator blocks the launch.
pub(crate) fn build_client() -> Result<Client> {
    Client::builder()
        .timeout(None::<std::time::Duration>)
        .build()
        .map_err(|e| Error::configuration(format!("failed to build HTTP client: {e}")))
}

/// Replace the path of a base address, keeping scheme, host, port and query
pub(crate) fn with_path(base: &Url, path: &str) -> Url {
    let mut url = base.clone();
    url.set_path(path);
    url
}

/// Error payload Vault returns alongside non-success statuses
#[derive(Debug, Default, Deserialize)]
struct VaultErrors {
    #[serde(default)]
    errors: Vec<String>,
}

/// Describe a non-success response without echoing its body
pub(crate) fn describe_failure(response: Response) -> String {
    let status = response.status();
    let errors = response
        .text()
        .ok()
        .and_then(|body| serde_json::from_str::<VaultErrors>(&body).ok())
        .unwrap_or_default()
        .errors;

    if errors.is_empty() {
        format!("unexpected status {status}")
    } else {
        format!("unexpected status {status}: {}", errors.join("; "))
    }
}
