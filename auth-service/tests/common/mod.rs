#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use auth::Authenticator;
use auth::ManualClock;
use auth::SigningKey;
use auth::TokenCodec;
use auth_service::authentication::service::AuthService;
use auth_service::inbound::http::router::create_router;
use auth_service::repositories::InMemoryUserRepository;
use auth_service::user::models::CreateUserCommand;
use auth_service::user::models::EmailAddress;
use auth_service::user::models::Password;
use auth_service::user::models::Username;
use auth_service::user::ports::UserServicePort;
use auth_service::user::service::UserService;
use serde_json::json;
use serde_json::Value;

pub const TEST_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";
pub const TEST_PASSWORD: &str = "pass_word!";
pub const ADMIN_USERNAME: &str = "admin";

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub api_client: reqwest::Client,
    pub user_service: Arc<UserService<InMemoryUserRepository>>,
    pub clock: Arc<ManualClock>,
    /// Codec sharing the server's key and clock, for crafting tokens
    pub codec: TokenCodec,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        Self::spawn_with(true).await
    }

    pub async fn spawn_with(refresh_enabled: bool) -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let key = SigningKey::new(TEST_SECRET).expect("Test secret should be valid");
        let clock = Arc::new(ManualClock::default());
        let authenticator = Arc::new(
            Authenticator::with_clock(&key, clock.clone()).with_refresh_enabled(refresh_enabled),
        );

        let repository = Arc::new(InMemoryUserRepository::new());
        let auth_service = Arc::new(AuthService::new(
            Arc::clone(&repository),
            Arc::clone(&repository),
            authenticator,
        ));
        let user_service = Arc::new(UserService::new(repository));

        let router = create_router(
            auth_service,
            Arc::clone(&user_service),
            Duration::from_secs(30),
        );

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            port,
            api_client: reqwest::Client::new(),
            user_service,
            codec: TokenCodec::with_clock(&key, clock.clone()),
            clock,
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(&format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(&format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Helper to make DELETE request with Bearer token
    pub fn delete_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .delete(&format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    /// Helper to make PATCH request with Bearer token
    pub fn patch_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .patch(&format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    /// Helper to make PUT request with Bearer token
    pub fn put_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .put(&format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    /// Create the administrator the way the server does at startup, log in,
    /// and return its access token
    pub async fn admin_token(&self) -> String {
        let command = CreateUserCommand::new(
            Username::new(ADMIN_USERNAME.to_string()).unwrap(),
            EmailAddress::new("admin@example.com".to_string()).unwrap(),
            Password::new(TEST_PASSWORD.to_string()).unwrap(),
        );
        self.user_service
            .bootstrap_admin(command)
            .await
            .expect("Failed to create administrator");

        let response = self.login(ADMIN_USERNAME, TEST_PASSWORD).await;
        assert_eq!(response.status(), reqwest::StatusCode::OK);
        let body: Value = response.json().await.expect("Failed to parse response");
        body["data"]["access_token"]
            .as_str()
            .expect("access_token should be a string")
            .to_string()
    }

    /// Enable or disable an account through the administration API
    pub async fn set_enabled(
        &self,
        admin_token: &str,
        username: &str,
        enabled: bool,
    ) -> reqwest::Response {
        let path = format!("/api/admin/users/{}/enabled", username);
        self.put_authenticated(&path, admin_token)
            .json(&json!({ "enabled": enabled }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Register a user with the shared test password
    pub async fn register_user(&self, username: &str) -> reqwest::Response {
        self.post("/api/users")
            .json(&json!({
                "username": username,
                "email": format!("{}@example.com", username),
                "password": TEST_PASSWORD
            }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn login(&self, username: &str, password: &str) -> reqwest::Response {
        self.post("/api/auth/login")
            .json(&json!({
                "username": username,
                "password": password
            }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Register a user, log in, and return the `data` object of the login response
    pub async fn register_and_login(&self, username: &str) -> Value {
        self.register_user(username).await;
        let response = self.login(username, TEST_PASSWORD).await;
        assert_eq!(response.status(), reqwest::StatusCode::OK);

        let body: Value = response.json().await.expect("Failed to parse response");
        body["data"].clone()
    }

    /// Register a user, log in, and return the access token
    pub async fn access_token(&self, username: &str) -> String {
        self.register_and_login(username).await["access_token"]
            .as_str()
            .expect("access_token should be a string")
            .to_string()
    }
}
