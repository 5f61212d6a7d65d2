//! Gateway for the remote authentication API.
//!
//! Four request/response operations against the configured base URL. Login
//! and registration write the returned identity into the `SessionStore`;
//! profile updates return the server's echo for the caller to merge; a
//! password change only reports its outcome and never touches the store.

use std::time::Duration;

use anyhow::Result;
use reqwest::{header, Client};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::auth::{Session, SessionStore, SessionUpdate};
use crate::config::Config;

use super::AuthError;

// ============================================================================
// Constants
// ============================================================================

/// Login endpoint path, fixed by the wire contract
const LOGIN_PATH: &str = "login";

/// Registration endpoint path, fixed by the wire contract
const REGISTER_PATH: &str = "register";

/// HTTP request timeout in seconds.
/// 30s allows for slow API responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct RegisterRequest<'a> {
    name: &'a str,
    email: &'a str,
    password: &'a str,
}

/// Identity returned by a successful login or registration.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    name: String,
    token: String,
}

#[derive(Debug, Serialize)]
struct ProfileRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ChangePasswordRequest<'a> {
    current_password: &'a str,
    new_password: &'a str,
}

/// Fields echoed back by a successful profile update. The server may omit
/// either field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl ProfileUpdate {
    /// Merge the server's echo with the submitted values into a store
    /// update. The server's value wins; the submitted value fills any field
    /// the server omitted.
    pub fn into_update(
        self,
        submitted_name: Option<&str>,
        submitted_email: Option<&str>,
    ) -> SessionUpdate {
        SessionUpdate {
            user_name: self.name.or_else(|| submitted_name.map(str::to_string)),
            user_email: self.email.or_else(|| submitted_email.map(str::to_string)),
        }
    }
}

// ============================================================================
// Client
// ============================================================================

/// Gateway client for the authentication API.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Debug, Clone)]
pub struct AuthClient {
    client: Client,
    config: Config,
}

impl AuthClient {
    /// Create a client over the given configuration.
    pub fn new(config: Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;
        Ok(Self { client, config })
    }

    /// Log in and cache the resulting session.
    ///
    /// The server echoes only `{name, token}`; the submitted email is what
    /// gets cached. The store is not mutated on failure.
    pub async fn login(
        &self,
        store: &SessionStore,
        email: &str,
        password: &str,
    ) -> Result<Session, AuthError> {
        let url = self.endpoint(LOGIN_PATH);
        debug!(url = %url, "Logging in");
        let response = self
            .post_token_request(&url, &LoginRequest { email, password })
            .await?;
        self.save_session(store, response, email)
    }

    /// Register a new account and cache the resulting session.
    ///
    /// The gateway sends the fields as given; trimming the name and
    /// lower-casing the email is the caller's submission policy (see
    /// `rules::validate::normalize_name` / `normalize_email`).
    pub async fn register(
        &self,
        store: &SessionStore,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<Session, AuthError> {
        let url = self.endpoint(REGISTER_PATH);
        debug!(url = %url, "Registering account");
        let response = self
            .post_token_request(
                &url,
                &RegisterRequest {
                    name,
                    email,
                    password,
                },
            )
            .await?;
        self.save_session(store, response, email)
    }

    /// Update the profile fields on the server.
    ///
    /// Returns the server's echo; the caller merges returned-or-submitted
    /// values into the store via [`ProfileUpdate::into_update`]. The store
    /// is never mutated here.
    pub async fn update_profile(
        &self,
        store: &SessionStore,
        name: Option<&str>,
        email: Option<&str>,
    ) -> Result<ProfileUpdate, AuthError> {
        let url = self.endpoint(&self.config.profile_path);
        let response = self
            .client
            .put(&url)
            .headers(self.auth_headers(store))
            .json(&ProfileRequest { name, email })
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        debug!(url = %url, status = %status, "Profile update response received");

        if !status.is_success() {
            return Err(AuthError::from_status(status, &text));
        }
        if text.trim().is_empty() {
            // Some deployments reply with an empty body; the submitted
            // values then stand in for the echo.
            return Ok(ProfileUpdate::default());
        }
        serde_json::from_str(&text)
            .map_err(|err| AuthError::InvalidResponse(format!("{}: {}", url, err)))
    }

    /// Change the account password. Reports the outcome only; the cached
    /// session is untouched on success and on failure.
    pub async fn change_password(
        &self,
        store: &SessionStore,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        let url = self.endpoint(&self.config.password_path);
        let response = self
            .client
            .post(&url)
            .headers(self.auth_headers(store))
            .json(&ChangePasswordRequest {
                current_password,
                new_password,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await?;
            debug!(url = %url, status = %status, "Password change rejected");
            return Err(AuthError::from_status(status, &text));
        }

        debug!(url = %url, status = %status, "Password changed");
        Ok(())
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Bearer header from the cached token. An unauthenticated store sends
    /// no header at all; the request still goes out and the server rejects
    /// it — there is no client-side short circuit.
    fn auth_headers(&self, store: &SessionStore) -> header::HeaderMap {
        let mut headers = header::HeaderMap::new();
        if let Some(token) = store.token() {
            match header::HeaderValue::from_str(&format!("Bearer {}", token)) {
                Ok(value) => {
                    headers.insert(header::AUTHORIZATION, value);
                }
                Err(_) => warn!("Cached token is not a valid header value"),
            }
        }
        headers
    }

    async fn post_token_request<B: Serialize>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<TokenResponse, AuthError> {
        let response = self.client.post(url).json(body).send().await?;

        let status = response.status();
        let text = response.text().await?;
        debug!(url = %url, status = %status, "Auth response received");

        if !status.is_success() {
            return Err(AuthError::from_status(status, &text));
        }
        serde_json::from_str(&text)
            .map_err(|err| AuthError::InvalidResponse(format!("{}: {}", url, err)))
    }

    fn save_session(
        &self,
        store: &SessionStore,
        response: TokenResponse,
        submitted_email: &str,
    ) -> Result<Session, AuthError> {
        let session = Session {
            token: response.token,
            user_name: response.name,
            user_email: submitted_email.to_string(),
        };
        store.save(&session).map_err(AuthError::Storage)?;
        Ok(session)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::validate::{validate_profile_update, ValidationError};
    use tempfile::TempDir;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(server_uri: &str) -> Config {
        Config {
            base_url: format!("{}/v1/auth", server_uri),
            ..Config::default()
        }
    }

    fn test_store() -> (TempDir, SessionStore) {
        let tmp = TempDir::new().expect("Failed to create temp dir");
        let store = SessionStore::open(tmp.path().join("session")).expect("Failed to open store");
        (tmp, store)
    }

    fn authenticated_store(token: &str) -> (TempDir, SessionStore) {
        let (tmp, store) = test_store();
        store
            .save(&Session {
                token: token.to_string(),
                user_name: "U".to_string(),
                user_email: "u@x.com".to_string(),
            })
            .unwrap();
        (tmp, store)
    }

    #[tokio::test]
    async fn test_login_caches_submitted_email_with_returned_identity() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/auth/login"))
            .and(body_json(
                serde_json::json!({"email": "u@x.com", "password": "secret"}),
            ))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"name": "U", "token": "T1"})),
            )
            .mount(&server)
            .await;

        let (_tmp, store) = test_store();
        let client = AuthClient::new(test_config(&server.uri())).unwrap();
        let session = client.login(&store, "u@x.com", "secret").await.unwrap();

        assert_eq!(session.user_name, "U");
        assert_eq!(session.user_email, "u@x.com");
        assert!(store.is_authenticated());
        assert_eq!(store.token().as_deref(), Some("T1"));
        assert_eq!(store.user_name().as_deref(), Some("U"));
        assert_eq!(store.user_email().as_deref(), Some("u@x.com"));
    }

    #[tokio::test]
    async fn test_failed_login_leaves_store_untouched() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/auth/login"))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_json(serde_json::json!({"message": "bad credentials"})),
            )
            .mount(&server)
            .await;

        let (_tmp, store) = test_store();
        let client = AuthClient::new(test_config(&server.uri())).unwrap();
        let err = client.login(&store, "u@x.com", "nope").await.unwrap_err();

        assert_eq!(err.status(), 401);
        assert_eq!(err.server_message(), Some("bad credentials"));
        assert!(!store.is_authenticated());
    }

    #[tokio::test]
    async fn test_register_sends_payload_and_caches_session() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/auth/register"))
            .and(body_json(serde_json::json!({
                "name": "New User",
                "email": "new@x.com",
                "password": "secret1"
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"name": "New User", "token": "T2"})),
            )
            .mount(&server)
            .await;

        let (_tmp, store) = test_store();
        let client = AuthClient::new(test_config(&server.uri())).unwrap();
        client
            .register(&store, "New User", "new@x.com", "secret1")
            .await
            .unwrap();

        assert_eq!(store.token().as_deref(), Some("T2"));
        assert_eq!(store.user_email().as_deref(), Some("new@x.com"));
    }

    #[tokio::test]
    async fn test_register_conflict_carries_server_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/auth/register"))
            .respond_with(
                ResponseTemplate::new(409)
                    .set_body_json(serde_json::json!({"message": "email already registered"})),
            )
            .mount(&server)
            .await;

        let (_tmp, store) = test_store();
        let client = AuthClient::new(test_config(&server.uri())).unwrap();
        let err = client
            .register(&store, "New User", "new@x.com", "secret1")
            .await
            .unwrap_err();

        assert_eq!(err.status(), 409);
        assert_eq!(err.server_message(), Some("email already registered"));
        assert!(!store.is_authenticated());
    }

    #[tokio::test]
    async fn test_update_profile_attaches_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/v1/auth/profile"))
            .and(header("authorization", "Bearer T9"))
            .and(body_json(serde_json::json!({"name": "New Name"})))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"name": "New Name"})),
            )
            .mount(&server)
            .await;

        let (_tmp, store) = authenticated_store("T9");
        let client = AuthClient::new(test_config(&server.uri())).unwrap();
        let echo = client
            .update_profile(&store, Some("New Name"), None)
            .await
            .unwrap();

        assert_eq!(echo.name.as_deref(), Some("New Name"));
        assert_eq!(echo.email, None);
        // The gateway never merges; the store still holds the old name.
        assert_eq!(store.user_name().as_deref(), Some("U"));

        store
            .update(&echo.into_update(Some("New Name"), None))
            .unwrap();
        assert_eq!(store.user_name().as_deref(), Some("New Name"));
        assert_eq!(store.user_email().as_deref(), Some("u@x.com"));
    }

    #[tokio::test]
    async fn test_update_profile_without_token_is_still_sent() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/v1/auth/profile"))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_json(serde_json::json!({"message": "missing token"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let (_tmp, store) = test_store();
        let client = AuthClient::new(test_config(&server.uri())).unwrap();
        let err = client
            .update_profile(&store, Some("X Y"), None)
            .await
            .unwrap_err();

        assert_eq!(err.status(), 401);
    }

    #[tokio::test]
    async fn test_update_profile_tolerates_empty_success_body() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/v1/auth/profile"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let (_tmp, store) = authenticated_store("T9");
        let client = AuthClient::new(test_config(&server.uri())).unwrap();
        let echo = client
            .update_profile(&store, None, Some("new@x.com"))
            .await
            .unwrap();

        assert_eq!(echo, ProfileUpdate::default());
        let update = echo.into_update(None, Some("new@x.com"));
        assert_eq!(update.user_email.as_deref(), Some("new@x.com"));
        assert_eq!(update.user_name, None);
    }

    #[tokio::test]
    async fn test_change_password_never_touches_store() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/auth/password"))
            .and(header("authorization", "Bearer T9"))
            .and(body_json(serde_json::json!({
                "currentPassword": "old-secret",
                "newPassword": "new-secret"
            })))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        Mock::given(method("POST"))
            .and(path("/v1/auth/password"))
            .and(body_json(serde_json::json!({
                "currentPassword": "wrong",
                "newPassword": "new-secret"
            })))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_json(serde_json::json!({"message": "current password incorrect"})),
            )
            .mount(&server)
            .await;

        let (_tmp, store) = authenticated_store("T9");
        let before = store.snapshot();
        let client = AuthClient::new(test_config(&server.uri())).unwrap();

        client
            .change_password(&store, "old-secret", "new-secret")
            .await
            .unwrap();
        assert_eq!(store.snapshot(), before);

        // A rejection leaves the store alone as well.
        let err = client
            .change_password(&store, "wrong", "new-secret")
            .await
            .unwrap_err();
        assert_eq!(err.status(), 401);
        assert_eq!(store.snapshot(), before);
    }

    #[tokio::test]
    async fn test_transport_failure_reads_as_status_zero() {
        // Nothing listens on port 1; the request never yields a status.
        let config = Config {
            base_url: "http://127.0.0.1:1/v1/auth".to_string(),
            ..Config::default()
        };
        let (_tmp, store) = test_store();
        let client = AuthClient::new(config).unwrap();
        let err = client.login(&store, "u@x.com", "secret").await.unwrap_err();

        assert!(matches!(err, AuthError::Transport(_)));
        assert_eq!(err.status(), 0);
        assert!(!store.is_authenticated());
    }

    #[tokio::test]
    async fn test_unchanged_profile_submission_never_reaches_gateway() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/v1/auth/profile"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let (_tmp, store) = authenticated_store("T9");

        // The form only calls the gateway once the submission precondition
        // passes; with unchanged trimmed fields it fails locally instead.
        let snapshot = store.snapshot().unwrap();
        let result = validate_profile_update("  U  ", "u@x.com", &snapshot);
        assert_eq!(result, Err(ValidationError::NoChanges));

        // MockServer verifies the zero-call expectation on drop.
        drop(server);
    }

    #[test]
    fn test_profile_echo_merge_prefers_server_values() {
        let echo = ProfileUpdate {
            name: Some("Server Name".to_string()),
            email: None,
        };
        let update = echo.into_update(Some("Local Name"), Some("local@x.com"));
        assert_eq!(update.user_name.as_deref(), Some("Server Name"));
        assert_eq!(update.user_email.as_deref(), Some("local@x.com"));
    }

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        let client = AuthClient::new(Config {
            base_url: "http://localhost:8080/v1/auth/".to_string(),
            ..Config::default()
        })
        .unwrap();
        assert_eq!(
            client.endpoint(LOGIN_PATH),
            "http://localhost:8080/v1/auth/login"
        );
    }
}
