//! Profile editing
//!
//! Validates the profile form, sends the update to the service, and
//! folds the returned user back into the active session without
//! touching the stored token.

use crate::validation::{self, ValidationErrors};
use booking_client::agent::AgentError;
use booking_client::session::{SessionManager, SessionManagerError};
use booking_client::types::{ProfileUpdateRequest, User};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;

/// Profile error types
#[derive(Debug, Error)]
pub enum ProfileError {
    /// Form input failed validation
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationErrors),

    /// Agent error
    #[error("Agent error: {0}")]
    Agent(#[from] AgentError),

    /// Session error
    #[error("Session error: {0}")]
    Session(#[from] SessionManagerError),
}

impl ProfileError {
    /// Message the screens show when the update fails
    ///
    /// Validation failures keep their field messages; everything else
    /// collapses into one generic line.
    pub fn user_message(&self) -> String {
        match self {
            ProfileError::Validation(errors) => errors.to_string(),
            _ => "An error occurred while updating your profile, please try again".to_string(),
        }
    }
}

/// Result type for profile operations
pub type Result<T> = std::result::Result<T, ProfileError>;

/// Profile service for the profile screen
pub struct ProfileService {
    manager: Arc<RwLock<SessionManager>>,
}

impl ProfileService {
    /// Create a profile service over the shared session manager
    pub fn new(manager: Arc<RwLock<SessionManager>>) -> Self {
        Self { manager }
    }

    /// Submit the profile form
    ///
    /// Empty password fields mean no password change and are left out
    /// of the request entirely. On success the session's user half is
    /// replaced with what the service returned; the token is untouched.
    ///
    /// # Errors
    ///
    /// - `ProfileError::Validation` - The form input failed validation;
    ///   nothing was sent to the service
    /// - `ProfileError::Agent` - The service rejected the update
    /// - `ProfileError::Session` - The updated user could not be folded
    ///   back into the session
    pub async fn update(
        &self,
        name: &str,
        email: &str,
        old_password: &str,
        password: &str,
        password_confirmation: &str,
    ) -> Result<User> {
        validation::validate_profile(name, email, old_password, password, password_confirmation)?;

        let request = ProfileUpdateRequest {
            name: name.to_string(),
            email: email.to_string(),
            old_password: optional(old_password),
            password: optional(password),
            password_confirmation: optional(password_confirmation),
        };

        let agent = self.manager.read().await.agent();
        let user = agent.update_profile(&request).await?;

        self.manager.write().await.update_user(user.clone()).await?;
        tracing::info!(user = %user.id, "profile updated");

        Ok(user)
    }
}

fn optional(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use booking_client::agent::BookingAgent;
    use booking_client::session::{MemorySessionStore, SessionStore, TOKEN_KEY};
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn signed_in_manager(server: &MockServer) -> Arc<RwLock<SessionManager>> {
        Mock::given(method("POST"))
            .and(path("/sessions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "token": "abc",
                "user": {
                    "id": "1",
                    "name": "Ana",
                    "email": "a@b.com",
                    "avatar_url": ""
                }
            })))
            .mount(server)
            .await;

        let mut manager = SessionManager::new(
            Arc::new(MemorySessionStore::new()),
            Arc::new(BookingAgent::new(server.uri())),
        );
        manager.hydrate().await;
        manager.sign_in("a@b.com", "secret").await.unwrap();

        Arc::new(RwLock::new(manager))
    }

    #[tokio::test]
    async fn test_update_without_password_change() {
        let server = MockServer::start().await;

        // The password block must be absent from the request body
        Mock::given(method("PUT"))
            .and(path("/profile"))
            .and(body_json(serde_json::json!({
                "name": "Ana Lima",
                "email": "ana@b.com"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "1",
                "name": "Ana Lima",
                "email": "ana@b.com",
                "avatar_url": ""
            })))
            .expect(1)
            .mount(&server)
            .await;

        let manager = signed_in_manager(&server).await;
        let profile = ProfileService::new(manager.clone());

        let user = profile
            .update("Ana Lima", "ana@b.com", "", "", "")
            .await
            .unwrap();

        assert_eq!(user.name, "Ana Lima");

        let guard = manager.read().await;
        let session = guard.session().unwrap();
        assert_eq!(session.user.name, "Ana Lima");
        assert_eq!(session.token, "abc");
    }

    #[tokio::test]
    async fn test_update_with_password_change_sends_the_block() {
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/profile"))
            .and(body_json(serde_json::json!({
                "name": "Ana",
                "email": "a@b.com",
                "old_password": "secret",
                "password": "hunter22",
                "password_confirmation": "hunter22"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "1",
                "name": "Ana",
                "email": "a@b.com",
                "avatar_url": ""
            })))
            .expect(1)
            .mount(&server)
            .await;

        let manager = signed_in_manager(&server).await;
        let profile = ProfileService::new(manager);

        profile
            .update("Ana", "a@b.com", "secret", "hunter22", "hunter22")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_update_validates_before_any_request() {
        let server = MockServer::start().await;
        let manager = signed_in_manager(&server).await;
        let profile = ProfileService::new(manager);

        // No PUT mock is mounted; a request would 404 and fail loudly
        let result = profile.update("", "a@b.com", "", "short", "short").await;

        match result {
            Err(ProfileError::Validation(errors)) => {
                assert!(errors.message_for("name").is_some());
                assert!(errors.message_for("old_password").is_some());
                assert!(errors.message_for("password").is_some());
            }
            other => panic!("Expected validation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_update_keeps_stored_token() {
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/profile"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "1",
                "name": "Ana Lima",
                "email": "a@b.com",
                "avatar_url": ""
            })))
            .mount(&server)
            .await;

        let store = Arc::new(MemorySessionStore::new());
        Mock::given(method("POST"))
            .and(path("/sessions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "token": "abc",
                "user": { "id": "1", "name": "Ana", "email": "a@b.com", "avatar_url": "" }
            })))
            .mount(&server)
            .await;

        let mut manager = SessionManager::new(
            store.clone(),
            Arc::new(BookingAgent::new(server.uri())),
        );
        manager.hydrate().await;
        manager.sign_in("a@b.com", "secret").await.unwrap();
        let manager = Arc::new(RwLock::new(manager));

        let profile = ProfileService::new(manager);
        profile
            .update("Ana Lima", "a@b.com", "", "", "")
            .await
            .unwrap();

        let stored_token = store.get(TOKEN_KEY).await.unwrap().unwrap();
        assert_eq!(stored_token, "abc");
    }

    #[tokio::test]
    async fn test_service_rejection_has_a_user_message() {
        let server = MockServer::start().await;

        Mock::given(method("PUT"))
            .and(path("/profile"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "status": "error",
                "message": "E-mail already in use"
            })))
            .mount(&server)
            .await;

        let manager = signed_in_manager(&server).await;
        let profile = ProfileService::new(manager);

        let error = profile
            .update("Ana", "taken@b.com", "", "", "")
            .await
            .unwrap_err();

        assert_eq!(
            error.user_message(),
            "An error occurred while updating your profile, please try again"
        );
    }
}
