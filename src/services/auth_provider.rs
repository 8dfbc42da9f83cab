use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::core::config::Settings;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct ProviderUser {
    pub(crate) id: String,
    #[serde(default)]
    pub(crate) email: Option<String>,
    #[serde(default)]
    pub(crate) role: Option<String>,
    #[serde(default)]
    pub(crate) created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct ProviderSession {
    pub(crate) access_token: String,
    #[serde(default = "default_token_type")]
    pub(crate) token_type: String,
    #[serde(default)]
    pub(crate) expires_in: i64,
    #[serde(default)]
    pub(crate) refresh_token: Option<String>,
    pub(crate) user: ProviderUser,
}

/// Sign-up yields a session right away, or only the user when the provider
/// waits for email confirmation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub(crate) enum SignUpOutcome {
    Session(ProviderSession),
    PendingConfirmation(ProviderUser),
}

impl SignUpOutcome {
    pub(crate) fn user(&self) -> &ProviderUser {
        match self {
            Self::Session(session) => &session.user,
            Self::PendingConfirmation(user) => user,
        }
    }
}

#[derive(Debug, Error)]
pub(crate) enum AuthProviderError {
    #[error("auth provider is not configured")]
    NotConfigured,
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("auth provider rate limit reached")]
    RateLimited,
    #[error("auth provider rejected the request ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("auth provider request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("auth provider returned an unexpected body: {0}")]
    Decode(String),
}

/// The auth operations the service needs from the hosted provider.
#[async_trait]
pub(crate) trait AuthProvider: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str)
        -> Result<ProviderSession, AuthProviderError>;

    async fn sign_up(&self, email: &str, password: &str)
        -> Result<SignUpOutcome, AuthProviderError>;

    async fn sign_out(&self, access_token: &str) -> Result<(), AuthProviderError>;

    async fn get_user(&self, access_token: &str) -> Result<ProviderUser, AuthProviderError>;
}

#[derive(Debug, Serialize)]
struct PasswordCredentials<'a> {
    email: &'a str,
    password: &'a str,
}

/// HTTP client for a GoTrue-compatible auth endpoint.
#[derive(Debug, Clone)]
pub(crate) struct AuthClient {
    client: Client,
    base_url: String,
    anon_key: String,
}

impl AuthClient {
    pub(crate) fn from_settings(settings: &Settings) -> anyhow::Result<Self> {
        let auth = settings.auth();
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(auth.request_timeout_seconds))
            .build()
            .context("Failed to build auth provider HTTP client")?;

        Ok(Self {
            client,
            base_url: auth.provider_url.trim_end_matches('/').to_string(),
            anon_key: auth.anon_key.clone(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<String, AuthProviderError> {
        if self.base_url.is_empty() {
            return Err(AuthProviderError::NotConfigured);
        }
        Ok(format!("{}/auth/v1/{path}", self.base_url))
    }

    async fn read_json<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, AuthProviderError> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(rejection(status, &body));
        }

        serde_json::from_str(&body).map_err(|err| AuthProviderError::Decode(err.to_string()))
    }
}

#[async_trait]
impl AuthProvider for AuthClient {
    async fn sign_in(
        &self,
        email: &str,
        password: &str,
    ) -> Result<ProviderSession, AuthProviderError> {
        let response = self
            .client
            .post(self.endpoint("token?grant_type=password")?)
            .header("apikey", &self.anon_key)
            .json(&PasswordCredentials { email, password })
            .send()
            .await?;

        Self::read_json(response).await
    }

    async fn sign_up(
        &self,
        email: &str,
        password: &str,
    ) -> Result<SignUpOutcome, AuthProviderError> {
        let response = self
            .client
            .post(self.endpoint("signup")?)
            .header("apikey", &self.anon_key)
            .json(&PasswordCredentials { email, password })
            .send()
            .await?;

        Self::read_json(response).await
    }

    async fn sign_out(&self, access_token: &str) -> Result<(), AuthProviderError> {
        let response = self
            .client
            .post(self.endpoint("logout")?)
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(rejection(status, &body))
    }

    async fn get_user(&self, access_token: &str) -> Result<ProviderUser, AuthProviderError> {
        let response = self
            .client
            .get(self.endpoint("user")?)
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await?;

        Self::read_json(response).await
    }
}

fn rejection(status: StatusCode, body: &str) -> AuthProviderError {
    let parsed = serde_json::from_str::<Value>(body).unwrap_or(Value::Null);
    let message = extract_error_message(&parsed).unwrap_or_else(|| body.trim().to_string());

    if status == StatusCode::TOO_MANY_REQUESTS {
        return AuthProviderError::RateLimited;
    }

    let invalid_grant = parsed.get("error").and_then(Value::as_str) == Some("invalid_grant")
        || parsed.get("error_code").and_then(Value::as_str) == Some("invalid_credentials");
    if invalid_grant {
        return AuthProviderError::InvalidCredentials;
    }

    AuthProviderError::Rejected { status: status.as_u16(), message }
}

fn extract_error_message(value: &Value) -> Option<String> {
    ["error_description", "msg", "message", "error"]
        .iter()
        .find_map(|key| value.get(*key).and_then(Value::as_str))
        .map(str::to_string)
}

fn default_token_type() -> String {
    "bearer".to_string()
}
