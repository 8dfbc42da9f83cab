use async_trait::async_trait;
use axum::extract::{FromRequestParts, State};
use axum::http::{header, request::Parts};

use crate::api::errors::ApiError;
use crate::core::{security, security::Claims, state::AppState};

/// A request carrying a valid provider access token.
pub(crate) struct CurrentUser {
    pub(crate) claims: Claims,
    pub(crate) access_token: String,
}

pub(crate) struct CurrentAdmin(pub(crate) CurrentUser);

/// Like [`CurrentUser`] but a missing header is not an error.
pub(crate) struct OptionalUser(pub(crate) Option<CurrentUser>);

impl CurrentUser {
    pub(crate) fn email(&self) -> Option<&str> {
        self.claims.email.as_deref()
    }

    pub(crate) fn is_admin(&self, state: &AppState) -> bool {
        state.settings().auth().is_admin_email(self.email())
    }
}

fn bearer_token(parts: &Parts) -> Option<Result<&str, ApiError>> {
    let value = parts.headers.get(header::AUTHORIZATION)?;
    Some(
        value
            .to_str()
            .ok()
            .and_then(|raw| raw.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(ApiError::Unauthorized("Invalid authentication credentials")),
    )
}

async fn authenticate(
    parts: &mut Parts,
    state: &AppState,
    token: String,
) -> Result<CurrentUser, ApiError> {
    let State(app_state) = State::<AppState>::from_request_parts(parts, state)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to access application state"))?;

    let claims = security::verify_token(&token, app_state.settings()).map_err(|err| {
        tracing::debug!(error = %err, "Rejected access token");
        ApiError::Unauthorized("Invalid authentication credentials")
    })?;

    Ok(CurrentUser { claims, access_token: token })
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)
            .ok_or(ApiError::Unauthorized("Invalid authentication credentials"))??
            .to_string();

        authenticate(parts, state, token).await
    }
}

#[async_trait]
impl FromRequestParts<AppState> for OptionalUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = bearer_token(parts) else {
            return Ok(OptionalUser(None));
        };
        let token = token?.to_string();

        authenticate(parts, state, token).await.map(|user| OptionalUser(Some(user)))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentAdmin {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = CurrentUser::from_request_parts(parts, state).await?;

        if user.is_admin(state) {
            Ok(CurrentAdmin(user))
        } else {
            Err(ApiError::Forbidden("Admin access required"))
        }
    }
}
