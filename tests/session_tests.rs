// tests/session_tests.rs

use std::sync::Arc;

use testhub::{
    auth::{AuthManager, HttpIdentityProvider, LocalIdentityProvider, SqliteStorage},
    config::Config,
    models::user::{SignUpRequest, UserUpdate},
    routes,
    state::AppState,
    store::MemoryStore,
};

async fn spawn_app() -> String {
    let config = Config {
        rust_log: "error".to_string(),
        bind_addr: "127.0.0.1:0".to_string(),
        jwt_secret: "session_test_secret".to_string(),
        jwt_expiration: 600,
        simulated_latency_ms: 0,
        allow_passwordless_sign_in: false,
        seed_fixtures: false,
        admin_email: None,
        admin_password: None,
    };

    let state = AppState {
        store: MemoryStore::new(config.simulated_latency()),
        identity: Arc::new(LocalIdentityProvider::from_config(&config)),
        config,
    };
    let app = routes::create_router(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    address
}

fn storage_url() -> (std::path::PathBuf, String) {
    let path = std::env::temp_dir().join(format!("testhub-session-{}.db", uuid::Uuid::new_v4()));
    let url = format!("sqlite://{}?mode=rwc", path.display());
    (path, url)
}

fn unique_email() -> String {
    format!("u_{}@example.com", &uuid::Uuid::new_v4().to_string()[..8])
}

#[tokio::test]
async fn session_survives_restart() {
    // Arrange
    let address = spawn_app().await;
    let (path, url) = storage_url();
    let email = unique_email();

    let storage = Arc::new(SqliteStorage::connect(&url).await.unwrap());
    let manager = AuthManager::new(Arc::new(HttpIdentityProvider::new(&address)), storage.clone());
    assert!(!manager.initialize().await.loading);

    let payload = manager
        .sign_up(SignUpRequest {
            email: email.clone(),
            password: Some("password123".to_string()),
            name: Some("Asha".to_string()),
            ..Default::default()
        })
        .await
        .expect("Sign-up failed");
    storage.close().await;

    // Act: a fresh manager over the same database file
    let storage = Arc::new(SqliteStorage::connect(&url).await.unwrap());
    let restarted = AuthManager::new(Arc::new(HttpIdentityProvider::new(&address)), storage.clone());
    let state = restarted.initialize().await;

    // Assert
    assert_eq!(state.user.map(|u| u.id), Some(payload.user.id));
    assert!(restarted.is_authenticated().await);

    storage.close().await;
    let _ = std::fs::remove_file(path);
}

#[tokio::test]
async fn failed_sign_in_keeps_storage_empty() {
    // Arrange: passwordless sign-in is off, so unknown emails are refused
    let address = spawn_app().await;
    let (path, url) = storage_url();
    let storage = Arc::new(SqliteStorage::connect(&url).await.unwrap());
    let manager = AuthManager::new(Arc::new(HttpIdentityProvider::new(&address)), storage.clone());
    manager.initialize().await;

    // Act
    let err = manager
        .sign_in(&unique_email(), Some("password123"))
        .await
        .unwrap_err();

    // Assert
    assert_eq!(err.kind(), "auth");
    assert!(!manager.is_authenticated().await);
    let reopened = AuthManager::new(Arc::new(HttpIdentityProvider::new(&address)), storage.clone());
    assert!(reopened.initialize().await.user.is_none());

    storage.close().await;
    let _ = std::fs::remove_file(path);
}

#[tokio::test]
async fn profile_update_and_sign_out() {
    // Arrange
    let address = spawn_app().await;
    let (path, url) = storage_url();
    let email = unique_email();
    let storage = Arc::new(SqliteStorage::connect(&url).await.unwrap());
    let manager = AuthManager::new(Arc::new(HttpIdentityProvider::new(&address)), storage.clone());
    manager.initialize().await;
    manager
        .sign_up(SignUpRequest {
            email: email.clone(),
            password: Some("password123".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    // Act
    let user = manager
        .update_profile(UserUpdate {
            designation: Some("Lecturer".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    // Assert: the stored pair reflects the update
    assert_eq!(user.designation.as_deref(), Some("Lecturer"));
    let reopened = AuthManager::new(Arc::new(HttpIdentityProvider::new(&address)), storage.clone());
    let restored = reopened.initialize().await;
    assert_eq!(
        restored.session.map(|s| s.user.designation),
        Some(Some("Lecturer".to_string()))
    );

    // Act: sign out clears memory and storage
    manager.sign_out().await;
    assert!(!manager.is_authenticated().await);
    let reopened = AuthManager::new(Arc::new(HttpIdentityProvider::new(&address)), storage.clone());
    assert!(reopened.initialize().await.user.is_none());

    storage.close().await;
    let _ = std::fs::remove_file(path);
}
