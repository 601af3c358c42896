#![allow(dead_code)]

use std::sync::Arc;

use auth::Claims;
use auth::JwtHandler;
use auth::Role;
use auth::TokenService;
use auth::TokenSubject;
use chrono::Duration;
use chrono::Utc;
use enquiry_service::domain::enquiry::service::EnquiryService;
use enquiry_service::domain::user::models::CreateUserCommand;
use enquiry_service::domain::user::models::EmailAddress;
use enquiry_service::domain::user::models::UpdateProfileCommand;
use enquiry_service::domain::user::models::User;
use enquiry_service::domain::user::ports::UserServicePort;
use enquiry_service::domain::user::service::UserService;
use enquiry_service::inbound::http::router::create_router;
use enquiry_service::outbound::repositories::InMemoryEnquiryRepository;
use enquiry_service::outbound::repositories::InMemoryUserRepository;
use reqwest::Method;

pub const TEST_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

/// Test application that spawns a real server on in-memory storage
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub api_client: reqwest::Client,
    pub user_service: Arc<dyn UserServicePort>,
    pub token_service: Arc<TokenService>,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let user_service: Arc<dyn UserServicePort> =
            Arc::new(UserService::new(Arc::new(InMemoryUserRepository::new())));
        let enquiry_service = Arc::new(EnquiryService::new(Arc::new(
            InMemoryEnquiryRepository::new(),
        )));
        let token_service = Arc::new(TokenService::new(TEST_SECRET, auth::DEFAULT_ISSUER));

        let router = create_router(
            Arc::clone(&user_service),
            enquiry_service,
            Arc::clone(&token_service),
        );

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            port,
            api_client: reqwest::Client::builder()
                .build()
                .expect("Failed to create reqwest client"),
            user_service,
            token_service,
        }
    }

    pub fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        self.api_client
            .request(method, format!("{}{}", self.address, path))
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.request(Method::GET, path)
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.request(Method::POST, path)
    }

    pub fn put(&self, path: &str) -> reqwest::RequestBuilder {
        self.request(Method::PUT, path)
    }

    pub fn delete(&self, path: &str) -> reqwest::RequestBuilder {
        self.request(Method::DELETE, path)
    }

    pub fn options(&self, path: &str) -> reqwest::RequestBuilder {
        self.request(Method::OPTIONS, path)
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Helper to make POST request with Bearer token
    pub fn post_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.post(path).bearer_auth(token)
    }

    /// Token for a caller that exists only in the token.
    pub fn token_for(&self, role: Role) -> String {
        self.token_service
            .issue(&TokenSubject {
                user_id: uuid::Uuid::new_v4().to_string(),
                email: "caller@example.com".to_string(),
                username: "caller".to_string(),
                role,
            })
            .expect("Failed to issue token")
            .token
    }

    /// Correctly signed token carrying an arbitrary role string.
    pub fn token_with_raw_role(&self, role: &str) -> String {
        let claims = Claims::new(
            uuid::Uuid::new_v4(),
            "caller@example.com",
            "caller",
            role,
            auth::DEFAULT_ISSUER,
            Utc::now(),
            Duration::hours(1),
        );
        JwtHandler::new(TEST_SECRET)
            .encode(&claims)
            .expect("Failed to encode token")
    }

    /// Provision an account directly through the domain service.
    pub async fn seed_user(&self, email: &str, password: &str, role: Role) -> User {
        let command = CreateUserCommand::new(
            "Test".to_string(),
            "User".to_string(),
            EmailAddress::new(email.to_string()).expect("Invalid seed email"),
            password.to_string(),
            role,
        );
        self.user_service
            .create_user(command)
            .await
            .expect("Failed to seed user")
    }

    pub async fn deactivate(&self, user: &User) {
        self.user_service
            .update_profile(
                &user.id,
                UpdateProfileCommand {
                    is_active: Some(false),
                    ..Default::default()
                },
            )
            .await
            .expect("Failed to deactivate user");
    }
}
