//! Authenticated session context.
//!
//! A single credential is shared by every controller and gateway. The state
//! lives in a `watch` channel so the UI can react to forced re-authentication.

use crate::gateway::{AuthGateway, LoginCredentials};
use console_core::{AuthUser, ConsoleError, ConsoleResult};
use secrecy::{ExposeSecret, SecretString};
use std::sync::Arc;
use tokio::sync::watch;

#[derive(Debug, Default)]
pub enum SessionState {
    #[default]
    Anonymous,
    Authenticated {
        token: SecretString,
        user: Option<AuthUser>,
    },
    /// The remote authority rejected the credential.
    Expired,
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated { .. })
    }
}

#[derive(Debug, Clone)]
pub struct Session {
    tx: Arc<watch::Sender<SessionState>>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(SessionState::Anonymous);
        Self { tx: Arc::new(tx) }
    }

    /// Session pre-initialized with a bearer token.
    pub fn with_token(token: impl Into<String>) -> Self {
        let session = Self::new();
        session.init(token, None);
        session
    }

    pub fn init(&self, token: impl Into<String>, user: Option<AuthUser>) {
        self.tx.send_replace(SessionState::Authenticated {
            token: SecretString::new(token.into().into_boxed_str()),
            user,
        });
    }

    /// Explicit logout.
    pub fn clear(&self) {
        self.tx.send_replace(SessionState::Anonymous);
    }

    /// Drop a rejected credential. No-op unless authenticated.
    pub fn expire(&self) {
        let expired = self.tx.send_if_modified(|state| {
            if state.is_authenticated() {
                *state = SessionState::Expired;
                true
            } else {
                false
            }
        });
        if expired {
            tracing::error!("Session expired; re-authentication required");
        }
    }

    /// Copy of the current bearer credential, if any.
    pub fn bearer(&self) -> Option<SecretString> {
        match &*self.tx.borrow() {
            SessionState::Authenticated { token, .. } => {
                Some(SecretString::new(token.expose_secret().into()))
            }
            _ => None,
        }
    }

    /// Fail with `Unauthorized` when no credential is held.
    pub fn require(&self) -> ConsoleResult<SecretString> {
        self.bearer().ok_or(ConsoleError::Unauthorized)
    }

    pub fn is_authenticated(&self) -> bool {
        self.tx.borrow().is_authenticated()
    }

    pub fn is_expired(&self) -> bool {
        matches!(&*self.tx.borrow(), SessionState::Expired)
    }

    pub fn user(&self) -> Option<AuthUser> {
        match &*self.tx.borrow() {
            SessionState::Authenticated { user, .. } => user.clone(),
            _ => None,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.tx.subscribe()
    }

    /// Exchange credentials for a token and initialize the session.
    pub async fn login<G>(&self, gateway: &G, credentials: &LoginCredentials) -> ConsoleResult<AuthUser>
    where
        G: AuthGateway + ?Sized,
    {
        let response = gateway.login(credentials).await?;
        tracing::info!(user = %response.user.email, "Logged in");
        self.init(response.token, Some(response.user.clone()));
        Ok(response.user)
    }

    /// Invalidate the credential remotely, then always drop it locally.
    pub async fn logout<G>(&self, gateway: &G) -> ConsoleResult<()>
    where
        G: AuthGateway + ?Sized,
    {
        let result = if self.is_authenticated() {
            gateway.logout().await
        } else {
            Ok(())
        };
        if let Err(err) = &result {
            tracing::warn!(error = %err, "Remote logout failed; clearing local session");
        }
        self.clear();
        result
    }
}
