use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::config::Settings;

#[derive(Debug, Error)]
pub(crate) enum SecurityError {
    #[error("auth jwt secret is not configured")]
    MissingSecret,
    #[error("jwt decoding failed")]
    JwtDecoding,
    #[cfg(test)]
    #[error("jwt encoding failed")]
    JwtEncoding,
}

/// Access-token claims as issued by the hosted auth provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Claims {
    pub(crate) sub: String,
    pub(crate) exp: i64,
    #[serde(default)]
    pub(crate) aud: Option<String>,
    #[serde(default)]
    pub(crate) email: Option<String>,
    #[serde(default)]
    pub(crate) role: Option<String>,
    #[serde(default)]
    pub(crate) session_id: Option<String>,
}

pub(crate) fn verify_token(token: &str, settings: &Settings) -> Result<Claims, SecurityError> {
    let secret = &settings.auth().jwt_secret;
    if secret.is_empty() {
        return Err(SecurityError::MissingSecret);
    }

    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    validation.set_audience(&[settings.auth().jwt_audience.as_str()]);
    validation.required_spec_claims.insert("exp".to_string());
    validation.required_spec_claims.insert("sub".to_string());

    decode::<Claims>(token, &DecodingKey::from_secret(secret.as_bytes()), &validation)
        .map(|data| data.claims)
        .map_err(|_| SecurityError::JwtDecoding)
}

/// Mints a provider-shaped token signed with the configured secret.
#[cfg(test)]
pub(crate) fn create_access_token(
    subject: &str,
    email: &str,
    settings: &Settings,
    expires_in: time::Duration,
) -> Result<String, SecurityError> {
    use jsonwebtoken::{encode, EncodingKey, Header};

    let claims = Claims {
        sub: subject.to_string(),
        exp: (time::OffsetDateTime::now_utc() + expires_in).unix_timestamp(),
        aud: Some(settings.auth().jwt_audience.clone()),
        email: Some(email.to_string()),
        role: Some("authenticated".to_string()),
        session_id: None,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(settings.auth().jwt_secret.as_bytes()),
    )
    .map_err(|_| SecurityError::JwtEncoding)
}
