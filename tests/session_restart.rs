//! Session Restart Tests
//!
//! Verifies that the sled-backed session store carries a signed-in
//! session across process restarts, and that hydration degrades to the
//! logged-out state when the persisted entries are unusable.

use std::sync::Arc;

use app_core::auth::AuthService;
use booking_client::agent::BookingAgent;
use booking_client::session::{KvSessionStore, SessionStore, TOKEN_KEY, USER_KEY};
use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_sign_in(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/sessions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "token": "abc",
            "user": {
                "id": "user-1",
                "name": "Ana",
                "email": "ana@example.com",
                "avatar_url": ""
            },
        })))
        .mount(server)
        .await;
}

/// Test that a signed-in session survives a restart
#[tokio::test]
async fn test_session_survives_restart() {
    let server = MockServer::start().await;
    mount_sign_in(&server).await;

    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("sessions.db").to_string_lossy().into_owned();

    // Phase 1: sign in and flush the store to disk
    {
        let store = Arc::new(KvSessionStore::open(db_path.clone()).unwrap());
        let auth =
            AuthService::from_parts(store.clone(), Arc::new(BookingAgent::new(server.uri())));
        auth.hydrate().await;
        auth.sign_in("ana@example.com", "secret").await.unwrap();
        assert!(auth.is_authenticated().await);
        store.flush().unwrap();
    }

    // Phase 2: restart and verify the session hydrates from disk
    {
        let store = Arc::new(KvSessionStore::open(db_path).unwrap());
        // Nothing listens on this port; restoring must not issue requests
        let agent = Arc::new(BookingAgent::new("http://127.0.0.1:9"));
        let auth = AuthService::from_parts(store, agent.clone());
        auth.hydrate().await;

        assert!(auth.is_authenticated().await);
        let user = auth.current_user().await.unwrap();
        assert_eq!(user.name, "Ana");
        assert_eq!(user.email, "ana@example.com");
        assert_eq!(agent.credential().as_deref(), Some("abc"));
    }
}

/// Test that a signed-out state persists across a restart
#[tokio::test]
async fn test_sign_out_persists_across_restart() {
    let server = MockServer::start().await;
    mount_sign_in(&server).await;

    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("sessions.db").to_string_lossy().into_owned();

    // Phase 1: sign in, then sign out again before shutting down
    {
        let store = Arc::new(KvSessionStore::open(db_path.clone()).unwrap());
        let auth =
            AuthService::from_parts(store.clone(), Arc::new(BookingAgent::new(server.uri())));
        auth.hydrate().await;
        auth.sign_in("ana@example.com", "secret").await.unwrap();
        auth.sign_out().await;
        store.flush().unwrap();
    }

    // Phase 2: restart and verify nothing came back
    {
        let store: Arc<dyn SessionStore> = Arc::new(KvSessionStore::open(db_path).unwrap());
        let auth = AuthService::from_parts(
            store.clone(),
            Arc::new(BookingAgent::new("http://127.0.0.1:9")),
        );
        auth.hydrate().await;

        assert!(!auth.is_loading().await);
        assert!(!auth.is_authenticated().await);
        let values = store.get_many(&[TOKEN_KEY, USER_KEY]).await.unwrap();
        assert_eq!(values, vec![None, None]);
    }
}

/// Test that hydration lands logged out when the stored profile is
/// unreadable
#[tokio::test]
async fn test_corrupt_user_entry_hydrates_logged_out() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("sessions.db").to_string_lossy().into_owned();

    {
        let store = KvSessionStore::open(db_path.clone()).unwrap();
        store
            .set_many(&[(TOKEN_KEY, "abc"), (USER_KEY, "not-json")])
            .await
            .unwrap();
        store.flush().unwrap();
    }

    let store: Arc<dyn SessionStore> = Arc::new(KvSessionStore::open(db_path).unwrap());
    let auth = AuthService::from_parts(store, Arc::new(BookingAgent::new("http://127.0.0.1:9")));
    auth.hydrate().await;

    assert!(!auth.is_loading().await);
    assert!(!auth.is_authenticated().await);
    assert_eq!(auth.current_user().await, None);
}
