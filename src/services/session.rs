use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{broadcast, RwLock};

use crate::services::auth_provider::{
    AuthProvider, AuthProviderError, ProviderUser, SignUpOutcome,
};

const EVENT_BUFFER: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum AuthEvent {
    Initialized(Option<ProviderUser>),
    SignedIn(ProviderUser),
    SignedOut,
}

#[derive(Debug, Error)]
pub(crate) enum SessionError {
    #[error("session context used before initialize")]
    NotInitialized,
    #[error(transparent)]
    Provider(#[from] AuthProviderError),
}

#[derive(Debug, Clone)]
struct ActiveSession {
    access_token: String,
    user: ProviderUser,
}

#[derive(Debug)]
enum SessionState {
    Uninitialized,
    SignedOut,
    SignedIn(ActiveSession),
}

/// Owned auth session for one client. Nothing is shared process-wide; each
/// caller builds its own context and tears it down by dropping it.
pub(crate) struct SessionContext<P> {
    provider: Arc<P>,
    state: RwLock<SessionState>,
    events: broadcast::Sender<AuthEvent>,
}

/// A listener registered with [`SessionContext::subscribe`].
pub(crate) struct SessionSubscription {
    receiver: broadcast::Receiver<AuthEvent>,
}

impl SessionSubscription {
    /// Waits for the next auth change. `None` once the context is gone.
    pub(crate) async fn next(&mut self) -> Option<AuthEvent> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "Session subscriber lagged behind auth events");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    pub(crate) fn try_next(&mut self) -> Option<AuthEvent> {
        self.receiver.try_recv().ok()
    }

    pub(crate) fn unsubscribe(self) {}
}

impl<P: AuthProvider> SessionContext<P> {
    pub(crate) fn new(provider: Arc<P>) -> Self {
        let (events, _) = broadcast::channel(EVENT_BUFFER);
        Self { provider, state: RwLock::new(SessionState::Uninitialized), events }
    }

    /// Restores a session from a previously issued access token. A token the
    /// provider no longer accepts leaves the context signed out.
    pub(crate) async fn initialize(
        &self,
        stored_access_token: Option<&str>,
    ) -> Result<Option<ProviderUser>, SessionError> {
        let restored = match stored_access_token {
            Some(token) => match self.provider.get_user(token).await {
                Ok(user) => Some(ActiveSession { access_token: token.to_string(), user }),
                Err(
                    AuthProviderError::Rejected { .. } | AuthProviderError::InvalidCredentials,
                ) => {
                    tracing::info!("Stored session is no longer valid");
                    None
                }
                Err(err) => return Err(err.into()),
            },
            None => None,
        };

        let user = restored.as_ref().map(|session| session.user.clone());
        *self.state.write().await = match restored {
            Some(session) => SessionState::SignedIn(session),
            None => SessionState::SignedOut,
        };
        self.emit(AuthEvent::Initialized(user.clone()));

        Ok(user)
    }

    pub(crate) async fn current_user(&self) -> Option<ProviderUser> {
        match &*self.state.read().await {
            SessionState::SignedIn(session) => Some(session.user.clone()),
            SessionState::Uninitialized | SessionState::SignedOut => None,
        }
    }

    pub(crate) async fn access_token(&self) -> Option<String> {
        match &*self.state.read().await {
            SessionState::SignedIn(session) => Some(session.access_token.clone()),
            SessionState::Uninitialized | SessionState::SignedOut => None,
        }
    }

    pub(crate) fn subscribe(&self) -> SessionSubscription {
        SessionSubscription { receiver: self.events.subscribe() }
    }

    pub(crate) fn subscriber_count(&self) -> usize {
        self.events.receiver_count()
    }

    pub(crate) async fn sign_in(
        &self,
        email: &str,
        password: &str,
    ) -> Result<ProviderUser, SessionError> {
        self.ensure_initialized().await?;

        let session = self.provider.sign_in(email, password).await?;
        let user = session.user.clone();
        *self.state.write().await = SessionState::SignedIn(ActiveSession {
            access_token: session.access_token,
            user: user.clone(),
        });
        self.emit(AuthEvent::SignedIn(user.clone()));

        Ok(user)
    }

    pub(crate) async fn sign_up(
        &self,
        email: &str,
        password: &str,
    ) -> Result<SignUpOutcome, SessionError> {
        self.ensure_initialized().await?;

        let outcome = self.provider.sign_up(email, password).await?;
        if let SignUpOutcome::Session(session) = &outcome {
            *self.state.write().await = SessionState::SignedIn(ActiveSession {
                access_token: session.access_token.clone(),
                user: session.user.clone(),
            });
            self.emit(AuthEvent::SignedIn(session.user.clone()));
        }

        Ok(outcome)
    }

    /// Clears the local session even when the provider call fails; the
    /// provider error is still returned.
    pub(crate) async fn sign_out(&self) -> Result<(), SessionError> {
        self.ensure_initialized().await?;

        let previous = std::mem::replace(&mut *self.state.write().await, SessionState::SignedOut);
        let SessionState::SignedIn(session) = previous else {
            return Ok(());
        };

        self.emit(AuthEvent::SignedOut);
        self.provider.sign_out(&session.access_token).await?;
        Ok(())
    }

    async fn ensure_initialized(&self) -> Result<(), SessionError> {
        match &*self.state.read().await {
            SessionState::Uninitialized => Err(SessionError::NotInitialized),
            SessionState::SignedOut | SessionState::SignedIn(_) => Ok(()),
        }
    }

    fn emit(&self, event: AuthEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }
}
