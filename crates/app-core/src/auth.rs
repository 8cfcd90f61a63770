//! Authentication service
//!
//! Orchestrates the session lifecycle for the screens: validates form
//! input before anything touches the network, maps credential
//! rejections to a dedicated error, and hands out the shared session
//! manager.

use crate::validation::{self, ValidationErrors};
use booking_client::agent::{AgentError, BookingAgent};
use booking_client::session::{
    KvSessionStore, Session, SessionEvent, SessionManager, SessionManagerError, SessionStore,
    StoreError,
};
use booking_client::types::User;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;

/// Default service endpoint
pub const DEFAULT_SERVICE_URL: &str = "https://api.clipbook.app";

/// Authentication error types
#[derive(Debug, Error)]
pub enum AuthError {
    /// Form input failed validation
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// The service rejected the email/password pair
    #[error("Incorrect email/password combination")]
    InvalidCredentials,

    /// Session error
    #[error("Session error: {0}")]
    Session(#[from] SessionManagerError),

    /// Agent error
    #[error("Agent error: {0}")]
    Agent(#[from] AgentError),

    /// Session store error
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

/// Result type for authentication operations
pub type Result<T> = std::result::Result<T, AuthError>;

/// Authentication service for the app
///
/// # Example
///
/// ```no_run
/// use app_core::auth::AuthService;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let auth = AuthService::new("sessions.db")?;
///     auth.hydrate().await;
///
///     if !auth.is_authenticated().await {
///         auth.sign_in("a@b.com", "secret").await?;
///     }
///
///     Ok(())
/// }
/// ```
pub struct AuthService {
    manager: Arc<RwLock<SessionManager>>,
}

impl AuthService {
    /// Open the session store at `db_path` against the default service
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Store` if the database cannot be opened.
    pub fn new(db_path: impl Into<String>) -> Result<Self> {
        Self::with_service(db_path, DEFAULT_SERVICE_URL)
    }

    /// Open the session store at `db_path` against a specific service
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Store` if the database cannot be opened.
    pub fn with_service(db_path: impl Into<String>, service_url: &str) -> Result<Self> {
        let store = KvSessionStore::open(db_path)?;
        let agent = Arc::new(BookingAgent::new(service_url));
        Ok(Self::from_parts(Arc::new(store), agent))
    }

    /// Build the service from already constructed parts
    pub fn from_parts(store: Arc<dyn SessionStore>, agent: Arc<BookingAgent>) -> Self {
        Self {
            manager: Arc::new(RwLock::new(SessionManager::new(store, agent))),
        }
    }

    /// Restore a persisted session if one exists
    pub async fn hydrate(&self) {
        self.manager.write().await.hydrate().await;
    }

    /// Whether hydration has not finished yet
    pub async fn is_loading(&self) -> bool {
        self.manager.read().await.is_loading()
    }

    /// Sign in with email and password
    ///
    /// # Errors
    ///
    /// - `AuthError::Validation` - The form input failed validation;
    ///   nothing was sent to the service
    /// - `AuthError::InvalidCredentials` - The service rejected the
    ///   email/password pair
    /// - `AuthError::Session` - The session could not be established
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session> {
        validation::validate_sign_in(email, password)?;

        match self.manager.write().await.sign_in(email, password).await {
            Ok(session) => {
                tracing::info!(user = %session.user.id, "user signed in");
                Ok(session)
            }
            Err(SessionManagerError::Agent(AgentError::InvalidCredentials)) => {
                Err(AuthError::InvalidCredentials)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Create a new account
    ///
    /// Registration does not sign the account in; the user signs in
    /// with the fresh credentials afterwards.
    ///
    /// # Errors
    ///
    /// - `AuthError::Validation` - The form input failed validation
    /// - `AuthError::Agent` - The service rejected the registration
    pub async fn sign_up(&self, name: &str, email: &str, password: &str) -> Result<User> {
        validation::validate_sign_up(name, email, password)?;

        let agent = self.manager.read().await.agent();
        let user = agent.register_account(name, email, password).await?;
        tracing::info!(user = %user.id, "account registered");
        Ok(user)
    }

    /// Sign out locally
    pub async fn sign_out(&self) {
        self.manager.write().await.sign_out().await;
        tracing::info!("user signed out");
    }

    /// The signed-in user, if any
    pub async fn current_user(&self) -> Option<User> {
        self.manager.read().await.current_user().cloned()
    }

    /// Whether a session is active
    pub async fn is_authenticated(&self) -> bool {
        self.manager.read().await.is_authenticated()
    }

    /// The agent carrying this service's credential
    pub async fn agent(&self) -> Arc<BookingAgent> {
        self.manager.read().await.agent()
    }

    /// Register a callback for session lifecycle events
    pub async fn on_session_event<F>(&self, callback: F)
    where
        F: Fn(SessionEvent, Option<&Session>) + Send + Sync + 'static,
    {
        self.manager.write().await.on_session_event(callback);
    }

    /// Shared handle to the underlying session manager
    pub fn session_manager(&self) -> Arc<RwLock<SessionManager>> {
        self.manager.clone()
    }
}
