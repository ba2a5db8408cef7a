//! Session persistence tests across store instances
//!
//! Run with: cargo test --test session_tests

use ragdesk::config::SessionConfig;
use ragdesk::session::{FileStore, KeyValueStore, Role, Scope, SessionStore, UserProfile, TOKEN_KEY, USER_INFO_KEY};
use tempfile::TempDir;

fn profile(username: &str, role: Role) -> UserProfile {
    UserProfile {
        id: format!("id_{}", username),
        username: username.to_string(),
        name: username.to_uppercase(),
        role,
        email: format!("{}@company.com", username),
        phone: String::new(),
        department: None,
        avatar: None,
    }
}

fn config(dir: &TempDir) -> SessionConfig {
    SessionConfig {
        dir: dir.path().to_path_buf(),
    }
}

#[tokio::test]
async fn test_remembered_session_survives_restart() {
    let dir = TempDir::new().unwrap();

    let store = SessionStore::from_config(&config(&dir)).await.unwrap();
    store.save("tok-1", true, &profile("admin", Role::Admin)).await.unwrap();
    drop(store);

    let reopened = SessionStore::from_config(&config(&dir)).await.unwrap();
    let session = reopened.snapshot().await.expect("restored on open");
    assert_eq!(session.token, "tok-1");
    assert_eq!(session.scope, Scope::Persistent);
    assert_eq!(session.role(), Role::Admin);
}

#[tokio::test]
async fn test_unremembered_session_ends_with_process() {
    let dir = TempDir::new().unwrap();

    let store = SessionStore::from_config(&config(&dir)).await.unwrap();
    store.save("tok-2", false, &profile("user", Role::User)).await.unwrap();
    assert_eq!(store.snapshot().await.unwrap().scope, Scope::Ephemeral);

    store.discard_ephemeral().await.unwrap();
    assert!(store.snapshot().await.is_none());

    let reopened = SessionStore::from_config(&config(&dir)).await.unwrap();
    assert!(reopened.load().await.unwrap().is_none());
}

#[tokio::test]
async fn test_slots_use_fixed_keys() {
    let dir = TempDir::new().unwrap();
    let store = SessionStore::from_config(&config(&dir)).await.unwrap();
    store.save("tok-3", true, &profile("user", Role::User)).await.unwrap();

    let raw = FileStore::open(dir.path()).unwrap();
    assert_eq!(raw.get(TOKEN_KEY).unwrap().as_deref(), Some("tok-3"));
    let stored: UserProfile = serde_json::from_str(&raw.get(USER_INFO_KEY).unwrap().unwrap()).unwrap();
    assert_eq!(stored.username, "user");
}

#[tokio::test]
async fn test_clear_wipes_both_scopes() {
    let dir = TempDir::new().unwrap();
    let store = SessionStore::from_config(&config(&dir)).await.unwrap();

    store.save("persisted", true, &profile("admin", Role::Admin)).await.unwrap();
    store.clear().await.unwrap();
    assert!(store.load().await.unwrap().is_none());

    let raw = FileStore::open(dir.path()).unwrap();
    assert!(raw.get(TOKEN_KEY).unwrap().is_none());
    assert!(raw.get(USER_INFO_KEY).unwrap().is_none());
}

#[tokio::test]
async fn test_clones_share_state() {
    let store = SessionStore::in_memory().await.unwrap();
    let clone = store.clone();

    store.save("shared", false, &profile("user", Role::User)).await.unwrap();
    assert!(clone.is_authenticated().await);

    clone.clear().await.unwrap();
    assert!(!store.is_authenticated().await);
}
