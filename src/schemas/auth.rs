use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::security::Claims;
use crate::services::auth_provider::{ProviderSession, ProviderUser, SignUpOutcome};

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct Credentials {
    #[validate(email(message = "email must be a valid address"))]
    pub(crate) email: String,
    pub(crate) password: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct UserResponse {
    pub(crate) id: String,
    pub(crate) email: Option<String>,
    pub(crate) role: Option<String>,
    pub(crate) is_admin: bool,
}

impl UserResponse {
    pub(crate) fn from_provider(user: ProviderUser, is_admin: bool) -> Self {
        Self { id: user.id, email: user.email, role: user.role, is_admin }
    }

    pub(crate) fn from_claims(claims: &Claims, is_admin: bool) -> Self {
        Self {
            id: claims.sub.clone(),
            email: claims.email.clone(),
            role: claims.role.clone(),
            is_admin,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct SessionResponse {
    pub(crate) access_token: String,
    pub(crate) token_type: String,
    pub(crate) expires_in: i64,
    pub(crate) refresh_token: Option<String>,
    pub(crate) user: UserResponse,
}

impl SessionResponse {
    pub(crate) fn from_provider(session: ProviderSession, is_admin: bool) -> Self {
        Self {
            access_token: session.access_token,
            token_type: session.token_type,
            expires_in: session.expires_in,
            refresh_token: session.refresh_token,
            user: UserResponse::from_provider(session.user, is_admin),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct SignUpResponse {
    pub(crate) confirmation_required: bool,
    pub(crate) session: Option<SessionResponse>,
    pub(crate) user: UserResponse,
}

impl SignUpResponse {
    pub(crate) fn from_outcome(outcome: SignUpOutcome, is_admin: bool) -> Self {
        match outcome {
            SignUpOutcome::Session(session) => {
                let user = UserResponse::from_provider(session.user.clone(), is_admin);
                Self {
                    confirmation_required: false,
                    session: Some(SessionResponse::from_provider(session, is_admin)),
                    user,
                }
            }
            SignUpOutcome::PendingConfirmation(user) => Self {
                confirmation_required: true,
                session: None,
                user: UserResponse::from_provider(user, is_admin),
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct CurrentSessionResponse {
    pub(crate) user: Option<UserResponse>,
}
