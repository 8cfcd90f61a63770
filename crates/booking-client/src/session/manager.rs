//! Session manager
//!
//! Owns the in-memory session, keeps it in lockstep with the persistent
//! store and the agent's credential slot, and notifies subscribers after
//! each change. Within every operation the store write happens before
//! the in-memory update, so a crash between the two leaves storage
//! authoritative and the next hydrate repairs memory.

use super::store::{SessionStore, StoreError};
use super::{Session, SessionCallback, SessionEvent, TOKEN_KEY, USER_KEY};
use crate::agent::{AgentError, BookingAgent};
use crate::types::User;
use std::sync::Arc;
use thiserror::Error;

/// Session manager error types
#[derive(Debug, Error)]
pub enum SessionManagerError {
    /// Agent error
    #[error("Agent error: {0}")]
    Agent(#[from] AgentError),

    /// Session store error
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The operation needs an active session
    #[error("No active session")]
    NotAuthenticated,
}

/// Result type for session manager operations
pub type Result<T> = std::result::Result<T, SessionManagerError>;

/// Manages the authenticated session for the app
///
/// Constructed with an injected store and agent so the lifecycle is
/// testable without a UI runtime or a real backend.
///
/// # Example
///
/// ```rust,no_run
/// use booking_client::agent::BookingAgent;
/// use booking_client::session::{KvSessionStore, SessionManager};
/// use std::sync::Arc;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = Arc::new(KvSessionStore::open("sessions.db")?);
///     let agent = Arc::new(BookingAgent::new("https://api.clipbook.app"));
///
///     let mut manager = SessionManager::new(store, agent);
///     manager.hydrate().await;
///
///     if !manager.is_authenticated() {
///         manager.sign_in("a@b.com", "secret").await?;
///     }
///
///     Ok(())
/// }
/// ```
pub struct SessionManager {
    store: Arc<dyn SessionStore>,
    agent: Arc<BookingAgent>,
    session: Option<Session>,
    loading: bool,
    callbacks: Vec<SessionCallback>,
}

impl SessionManager {
    /// Create a manager over the given store and agent
    ///
    /// The manager starts in the loading state until [`hydrate`] runs.
    ///
    /// [`hydrate`]: SessionManager::hydrate
    pub fn new(store: Arc<dyn SessionStore>, agent: Arc<BookingAgent>) -> Self {
        Self {
            store,
            agent,
            session: None,
            loading: true,
            callbacks: Vec::new(),
        }
    }

    /// The agent this manager drives
    pub fn agent(&self) -> Arc<BookingAgent> {
        self.agent.clone()
    }

    /// The active session, if any
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// The signed-in user, if any
    pub fn current_user(&self) -> Option<&User> {
        self.session.as_ref().map(|s| &s.user)
    }

    /// Whether a session is active
    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    /// Whether hydration has not completed yet
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Register a callback for session lifecycle events
    pub fn on_session_event<F>(&mut self, callback: F)
    where
        F: Fn(SessionEvent, Option<&Session>) + Send + Sync + 'static,
    {
        self.callbacks.push(Arc::new(callback));
    }

    fn notify(&self, event: SessionEvent) {
        let snapshot = self.session.clone();
        for callback in &self.callbacks {
            callback(event, snapshot.as_ref());
        }
    }

    /// Restore a persisted session, if one exists
    ///
    /// Reads both entries in one call. Only a complete pair with a
    /// parseable user record authenticates; a half-present pair, a read
    /// failure, or an unreadable user entry all land in the ordinary
    /// logged-out state. Safe to call again at any time; a repeat run
    /// re-reads the store and converges on the same state.
    pub async fn hydrate(&mut self) {
        match self.store.get_many(&[TOKEN_KEY, USER_KEY]).await {
            Ok(values) => {
                let token = values.first().cloned().flatten();
                let user_json = values.get(1).cloned().flatten();

                if let (Some(token), Some(user_json)) = (token, user_json) {
                    match serde_json::from_str::<User>(&user_json) {
                        Ok(user) => {
                            self.agent.set_credential(Some(&token));
                            self.session = Some(Session::new(token, user));
                            tracing::debug!("session hydrated from store");
                        }
                        Err(e) => {
                            tracing::warn!(
                                "stored user entry is unreadable, treating as signed out: {}",
                                e
                            );
                            self.session = None;
                        }
                    }
                } else {
                    self.session = None;
                }
            }
            Err(e) => {
                tracing::warn!("session store read failed, treating as signed out: {}", e);
                self.session = None;
            }
        }

        // The loading flag drops exactly once per hydrate, after the
        // read resolves, whatever the outcome was.
        self.loading = false;
        self.notify(SessionEvent::Hydrated);
    }

    /// Sign in with email and password
    ///
    /// On success the pair of store entries is written first, then the
    /// agent credential, then the in-memory session. Any failure along
    /// the way leaves whatever session existed before completely
    /// untouched; nothing is retried.
    ///
    /// # Errors
    ///
    /// - `SessionManagerError::Agent` - The service rejected the
    ///   credentials or could not be reached
    /// - `SessionManagerError::Store` - The entries could not be
    ///   persisted
    pub async fn sign_in(&mut self, email: &str, password: &str) -> Result<Session> {
        let response = self.agent.create_session(email, password).await?;

        let user_json = serde_json::to_string(&response.user)?;
        self.store
            .set_many(&[(TOKEN_KEY, &response.token), (USER_KEY, &user_json)])
            .await?;

        self.agent.set_credential(Some(&response.token));

        let session = Session::new(response.token, response.user);
        self.session = Some(session.clone());
        tracing::debug!(user = %session.user.id, "signed in");
        self.notify(SessionEvent::SignedIn);

        Ok(session)
    }

    /// Sign out locally
    ///
    /// Removes both store entries, clears the agent credential, and
    /// clears the in-memory session. No remote call is made and the
    /// operation never fails; a store removal failure is logged and the
    /// next hydrate re-reads whatever is actually on disk.
    pub async fn sign_out(&mut self) {
        if let Err(e) = self.store.remove_many(&[TOKEN_KEY, USER_KEY]).await {
            tracing::warn!("failed to clear persisted session: {}", e);
        }

        self.agent.set_credential(None);
        self.session = None;
        tracing::debug!("signed out");
        self.notify(SessionEvent::SignedOut);
    }

    /// Replace the user half of the session after a profile edit
    ///
    /// Rewrites only the user entry; the token entry and the in-memory
    /// token are left byte for byte as they were. On a store failure
    /// the in-memory session is not touched.
    pub async fn update_user(&mut self, user: User) -> Result<()> {
        if self.session.is_none() {
            return Err(SessionManagerError::NotAuthenticated);
        }

        let user_json = serde_json::to_string(&user)?;
        self.store.set(USER_KEY, &user_json).await?;

        if let Some(session) = self.session.as_mut() {
            session.user = user;
        }
        self.notify(SessionEvent::UserUpdated);

        Ok(())
    }
}
