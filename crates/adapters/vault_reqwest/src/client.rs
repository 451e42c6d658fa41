//! Vault HTTP client implementing the [`SecretsServer`] port.

use reqwest::Url;
use serde::Serialize;

use vaultlink_app::ports::SecretsServer;
use vaultlink_domain::config_entry::ConnectionConfig;
use vaultlink_domain::connection::{ConnectionInfo, PublishRequest};
use vaultlink_domain::error::SecretsServerError;
use vaultlink_domain::session::LoginResponse;

use crate::config::VaultClientConfig;
use crate::error::{VaultClientError, invalid_address, transport};

const VAULT_TOKEN_HEADER: &str = "X-Vault-Token";

#[derive(Serialize)]
struct LoginRequest<'a> {
    password: &'a str,
}

/// Stateless Vault client; cheap to clone.
#[derive(Debug, Clone)]
pub struct VaultHttpClient {
    http: reqwest::Client,
}

impl VaultHttpClient {
    /// Build a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`VaultClientError::Build`] if the HTTP client cannot be created.
    pub fn new(config: &VaultClientConfig) -> Result<Self, VaultClientError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(VaultClientError::Build)?;
        Ok(Self { http })
    }
}

/// Append `segments` to the configured address, percent-encoding each one.
fn endpoint(config: &ConnectionConfig, segments: &[&str]) -> Result<Url, SecretsServerError> {
    let mut url =
        Url::parse(config.base_address()).map_err(|_| invalid_address(&config.address))?;
    url.path_segments_mut()
        .map_err(|()| invalid_address(&config.address))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}

fn login_url(config: &ConnectionConfig) -> Result<Url, SecretsServerError> {
    endpoint(config, &["v1", "auth", "userpass", "login", &config.username])
}

fn publish_url(config: &ConnectionConfig) -> Result<Url, SecretsServerError> {
    endpoint(config, &["v1", "smarthomes", "data", &config.email])
}

/// Read the body, turning a non-success status into [`SecretsServerError::Status`].
async fn read_success(response: reqwest::Response) -> Result<String, SecretsServerError> {
    let status = response.status();
    let body = response.text().await.map_err(transport)?;
    if !status.is_success() {
        return Err(SecretsServerError::Status {
            status: status.as_u16(),
            body,
        });
    }
    Ok(body)
}

impl SecretsServer for VaultHttpClient {
    async fn login(&self, config: &ConnectionConfig) -> Result<LoginResponse, SecretsServerError> {
        let url = login_url(config)?;
        tracing::debug!(%url, "logging in to Vault");

        let response = self
            .http
            .post(url)
            .json(&LoginRequest {
                password: &config.password,
            })
            .send()
            .await
            .map_err(transport)?;

        let body = read_success(response).await?;
        serde_json::from_str(&body).map_err(SecretsServerError::Decode)
    }

    async fn publish(
        &self,
        config: &ConnectionConfig,
        client_token: &str,
        info: &ConnectionInfo,
    ) -> Result<(), SecretsServerError> {
        let url = publish_url(config)?;
        tracing::debug!(%url, "publishing connection info to Vault");

        let response = self
            .http
            .post(url)
            .header(VAULT_TOKEN_HEADER, client_token)
            .json(&PublishRequest { data: info })
            .send()
            .await
            .map_err(transport)?;

        read_success(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use vaultlink_domain::identity::AccessToken;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client() -> VaultHttpClient {
        VaultHttpClient::new(&VaultClientConfig::default()).unwrap()
    }

    fn config(address: &str) -> ConnectionConfig {
        ConnectionConfig {
            address: address.to_string(),
            username: "alice".to_string(),
            password: "hunter2".to_string(),
            email: "alice@example.com".to_string(),
        }
    }

    fn info() -> ConnectionInfo {
        ConnectionInfo {
            url: "https://home.example.com".to_string(),
            token: AccessToken::new("eyJ.jwt"),
        }
    }

    #[tokio::test]
    async fn should_login_with_password_in_body_and_username_in_path() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/auth/userpass/login/alice"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({ "password": "hunter2" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "request_id": "r1",
                "auth": { "client_token": "hvs.abc", "policies": ["default"] }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let login = client().login(&config(&server.uri())).await.unwrap();

        assert_eq!(login.auth.client_token, "hvs.abc");
        assert_eq!(login.request_id, "r1");
    }

    #[tokio::test]
    async fn should_trim_trailing_slash_from_address() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/auth/userpass/login/alice"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "auth": { "client_token": "hvs.abc" } })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let address = format!("{}/", server.uri());
        let login = client().login(&config(&address)).await.unwrap();
        assert_eq!(login.auth.client_token, "hvs.abc");
    }

    #[tokio::test]
    async fn should_return_status_error_when_login_is_forbidden() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/auth/userpass/login/alice"))
            .respond_with(
                ResponseTemplate::new(403).set_body_string(r#"{"errors":["permission denied"]}"#),
            )
            .mount(&server)
            .await;

        let err = client().login(&config(&server.uri())).await.unwrap_err();

        match err {
            SecretsServerError::Status { status, body } => {
                assert_eq!(status, 403);
                assert!(body.contains("permission denied"));
            }
            other => panic!("expected status error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn should_return_decode_error_when_body_lacks_client_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "auth": null })))
            .mount(&server)
            .await;

        let err = client().login(&config(&server.uri())).await.unwrap_err();
        assert!(matches!(err, SecretsServerError::Decode(_)));
    }

    #[tokio::test]
    async fn should_return_transport_error_when_server_is_unreachable() {
        let err = client()
            .login(&config("http://127.0.0.1:1"))
            .await
            .unwrap_err();
        assert!(matches!(err, SecretsServerError::Transport(_)));
    }

    #[tokio::test]
    async fn should_publish_url_and_token_with_vault_token_header() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/smarthomes/data/alice@example.com"))
            .and(header("X-Vault-Token", "hvs.abc"))
            .and(body_json(json!({
                "data": { "url": "https://home.example.com", "token": "eyJ.jwt" }
            })))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        client()
            .publish(&config(&server.uri()), "hvs.abc", &info())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn should_return_status_error_when_publish_fails() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/smarthomes/data/alice@example.com"))
            .respond_with(ResponseTemplate::new(500).set_body_string("internal error"))
            .mount(&server)
            .await;

        let err = client()
            .publish(&config(&server.uri()), "hvs.abc", &info())
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(500));
    }

    #[tokio::test]
    async fn should_keep_email_with_reserved_characters_in_one_path_segment() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/smarthomes/data/ops%23home@example.com"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let mut config = config(&server.uri());
        config.email = "ops#home@example.com".to_string();
        client().publish(&config, "hvs.abc", &info()).await.unwrap();

        let received = server.received_requests().await.unwrap();
        assert_eq!(received.len(), 1);
        assert_eq!(received[0].url.path(), "/v1/smarthomes/data/ops%23home@example.com");
    }

    #[tokio::test]
    async fn should_not_let_email_escape_its_publish_path() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/smarthomes/data/bob@example.com"))
            .respond_with(ResponseTemplate::new(204))
            .expect(0)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&server)
            .await;

        let mut config = config(&server.uri());
        config.email = "../data/bob@example.com?x=1".to_string();
        client().publish(&config, "hvs.abc", &info()).await.unwrap();

        let received = server.received_requests().await.unwrap();
        assert_eq!(
            received[0].url.path(),
            "/v1/smarthomes/data/..%2Fdata%2Fbob@example.com%3Fx=1"
        );
        assert_eq!(received[0].url.query(), None);
    }

    #[tokio::test]
    async fn should_encode_slash_in_username() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/auth/userpass/login/team%2Falice"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "auth": { "client_token": "hvs.abc" } })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let mut config = config(&server.uri());
        config.username = "team/alice".to_string();
        let login = client().login(&config).await.unwrap();
        assert_eq!(login.auth.client_token, "hvs.abc");
    }

    #[tokio::test]
    async fn should_keep_path_prefix_of_address() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/vault/v1/auth/userpass/login/alice"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "auth": { "client_token": "hvs.abc" } })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let address = format!("{}/vault/", server.uri());
        let login = client().login(&config(&address)).await.unwrap();
        assert_eq!(login.auth.client_token, "hvs.abc");
    }

    #[tokio::test]
    async fn should_return_transport_error_when_address_is_not_a_url() {
        let err = client()
            .login(&config("vault.example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, SecretsServerError::Transport(_)));
    }
}
