use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use crate::api::errors::ApiError;
use crate::api::guards::{CurrentUser, OptionalUser};
use crate::api::validation::{validate_password_len, validate_payload};
use crate::core::redis::RateLimit;
use crate::core::state::AppState;
use crate::schemas::auth::{
    Credentials, CurrentSessionResponse, SessionResponse, SignUpResponse, UserResponse,
};
use crate::services::auth_provider::AuthProvider;

const AUTH_RATE_LIMIT: RateLimit = RateLimit { max_attempts: 10, window_seconds: 60 };

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/sign-in", post(sign_in))
        .route("/sign-up", post(sign_up))
        .route("/sign-out", post(sign_out))
        .route("/session", get(session))
}

async fn sign_in(
    State(state): State<AppState>,
    Json(payload): Json<Credentials>,
) -> Result<Json<SessionResponse>, ApiError> {
    validate_payload(&payload)?;
    enforce_rate_limit(&state, "sign-in", &payload.email).await?;

    let session = state.auth().sign_in(payload.email.trim(), &payload.password).await?;
    let is_admin = state.settings().auth().is_admin_email(session.user.email.as_deref());
    tracing::info!(user_id = %session.user.id, "User signed in");

    Ok(Json(SessionResponse::from_provider(session, is_admin)))
}

async fn sign_up(
    State(state): State<AppState>,
    Json(payload): Json<Credentials>,
) -> Result<(StatusCode, Json<SignUpResponse>), ApiError> {
    validate_payload(&payload)?;
    validate_password_len(&payload.password)?;
    enforce_rate_limit(&state, "sign-up", &payload.email).await?;

    let outcome = state.auth().sign_up(payload.email.trim(), &payload.password).await?;
    let is_admin = state.settings().auth().is_admin_email(outcome.user().email.as_deref());
    tracing::info!(user_id = %outcome.user().id, "User signed up");

    Ok((StatusCode::CREATED, Json(SignUpResponse::from_outcome(outcome, is_admin))))
}

async fn sign_out(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<StatusCode, ApiError> {
    state.auth().sign_out(&user.access_token).await?;
    tracing::info!(user_id = %user.claims.sub, "User signed out");
    Ok(StatusCode::NO_CONTENT)
}

async fn session(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
) -> Json<CurrentSessionResponse> {
    let user = user.map(|user| UserResponse::from_claims(&user.claims, user.is_admin(&state)));
    Json(CurrentSessionResponse { user })
}

async fn enforce_rate_limit(state: &AppState, scope: &str, email: &str) -> Result<(), ApiError> {
    let allowed = state.redis().allow(scope, email, AUTH_RATE_LIMIT).await.unwrap_or_else(|err| {
        tracing::warn!(error = %err, scope, "Rate limit check failed; allowing request");
        true
    });

    if allowed {
        Ok(())
    } else {
        Err(ApiError::TooManyRequests("Too many attempts, try again later"))
    }
}
