use serde_json::json;
use url::Url;
use vgm_core::{Error, Result, VaultToken};
use vgm_vault::{SecretStore, VaultClient};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Run a blocking lookup off the async runtime
async fn read(server: &MockServer, secret_path: &str, key: &str) -> Result<String> {
    let address = Url::parse(&server.uri()).unwrap();
    let secret_path = secret_path.to_string();
    let key = key.to_string();
    tokio::task::spawn_blocking(move || {
        let client = VaultClient::new(address)?;
        client.read_secret(&VaultToken::new("tok123"), &secret_path, &key)
    })
    .await
    .unwrap()
}

#[tokio::test]
async fn test_reads_secret_with_token_header() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/secret/app"))
        .and(header("X-Vault-Token", "tok123"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"data": {"password": "s3cr3t"}})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let secret = read(&server, "secret/app", "password").await.unwrap();
    assert_eq!(secret, "s3cr3t");
}

#[tokio::test]
async fn test_missing_key_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/secret/app"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"data": {"username": "app"}})),
        )
        .mount(&server)
        .await;

    let err = read(&server, "secret/app", "password").await.unwrap_err();
    match err {
        Error::SecretStore { path, key, message } => {
            assert_eq!(path, "secret/app");
            assert_eq!(key, "password");
            assert!(message.contains("no value"), "{message}");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_empty_value_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/secret/app"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": {"password": ""}})))
        .mount(&server)
        .await;

    let err = read(&server, "secret/app", "password").await.unwrap_err();
    assert!(err.to_string().ends_with("empty value"), "{err}");
}

#[tokio::test]
async fn test_non_json_body_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/secret/app"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = read(&server, "secret/app", "password").await.unwrap_err();
    assert!(
        err.to_string().contains("failed to parse JSON response from vault"),
        "{err}"
    );
}

#[tokio::test]
async fn test_permission_denied_reports_vault_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/secret/app"))
        .respond_with(
            ResponseTemplate::new(403).set_body_json(json!({"errors": ["permission denied"]})),
        )
        .mount(&server)
        .await;

    let err = read(&server, "secret/app", "password").await.unwrap_err();
    let message = err.to_string();
    assert!(message.contains("403"), "{message}");
    assert!(message.contains("permission denied"), "{message}");
}

#[tokio::test]
async fn test_unreachable_server_fails() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let address = Url::parse(&format!("http://127.0.0.1:{port}")).unwrap();
    let err = tokio::task::spawn_blocking(move || {
        VaultClient::new(address)?.read_secret(&VaultToken::new("tok123"), "secret/app", "password")
    })
    .await
    .unwrap()
    .unwrap_err();

    assert!(err.to_string().contains("vault request failed"), "{err}");
}
