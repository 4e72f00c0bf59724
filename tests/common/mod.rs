#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::routing::{get, post};
use fake::Fake;
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use http_body_util::BodyExt;
use physipro::modules::auth::controller as auth;
use physipro::modules::users::controller as users;
use physipro::physipro_auth::create_access_token;
use physipro::physipro_config::{EmailConfig, JwtConfig, PasswordConfig};
use physipro::physipro_core::UserType;
use physipro::physipro_core::password::hash_password_with_cost;
use physipro::physipro_db::InMemoryUserRepository;
use physipro::physipro_models::{NewUser, User, UserProfile};
use physipro::state::AppState;
use physipro::utils::email::{EmailService, RecordingMailer};
use tower::ServiceExt;
use uuid::Uuid;

pub const TEST_PASSWORD: &str = "senhaForte123";
pub const TEST_BCRYPT_COST: u32 = 4;

static SERIAL: AtomicU64 = AtomicU64::new(1);

pub struct TestApp {
    pub state: AppState,
    pub repo: Arc<InMemoryUserRepository>,
    pub mailer: Arc<RecordingMailer>,
}

pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "integration-test-secret-at-least-32-chars".to_string(),
        access_token_expiry: 3600,
        issuer: "physipro".to_string(),
    }
}

pub fn test_email_config() -> EmailConfig {
    EmailConfig {
        enabled: false,
        smtp_host: "localhost".to_string(),
        smtp_port: 1025,
        smtp_username: String::new(),
        smtp_password: String::new(),
        from_email: "noreply@physipro.com".to_string(),
        from_name: "PhysiPro".to_string(),
        frontend_url: "http://localhost:3000".to_string(),
    }
}

pub fn test_app() -> TestApp {
    let repo = Arc::new(InMemoryUserRepository::new());
    let mailer = Arc::new(RecordingMailer::new());

    let state = AppState::new(
        repo.clone(),
        EmailService::new(test_email_config(), mailer.clone()),
        test_jwt_config(),
        PasswordConfig {
            bcrypt_cost: TEST_BCRYPT_COST,
            reset_token_ttl: 3600,
        },
    );

    TestApp {
        state,
        repo,
        mailer,
    }
}

/// Unique email with a fake local part.
pub fn unique_email() -> String {
    let email: String = SafeEmail().fake();
    format!("{}.{}", SERIAL.fetch_add(1, Ordering::SeqCst), email).to_lowercase()
}

/// Eleven-digit CPF that never repeats within a test binary.
pub fn unique_cpf() -> String {
    format!("{:011}", 10_000_000_000u64 + SERIAL.fetch_add(1, Ordering::SeqCst))
}

pub fn fake_name() -> String {
    let name: String = Name().fake();
    format!("{} Teste", name)
}

impl TestApp {
    pub async fn seed_user(&self, user_type: UserType, trainer_id: Option<Uuid>) -> User {
        let password_hash = hash_password_with_cost(TEST_PASSWORD, TEST_BCRYPT_COST).unwrap();
        self.state
            .users
            .create(User::new(NewUser {
                name: fake_name(),
                email: unique_email(),
                cpf: unique_cpf(),
                password_hash,
                user_type,
                trainer_id,
                active: true,
            }))
            .await
            .unwrap()
    }

    pub async fn seed_admin(&self) -> User {
        self.seed_user(UserType::Admin, None).await
    }

    pub async fn seed_trainer(&self) -> User {
        self.seed_user(UserType::Trainer, None).await
    }

    pub async fn seed_student(&self, trainer: Option<&User>) -> User {
        self.seed_user(UserType::Student, trainer.map(|t| t.id)).await
    }

    pub async fn reload(&self, id: Uuid) -> Option<User> {
        self.state.users.find_by_id(id).await.unwrap()
    }

    pub fn token_for(&self, user: &User) -> String {
        create_access_token(user.id, &user.email, user.user_type, &self.state.jwt_config).unwrap()
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/auth/register", post(auth::register))
            .route("/auth/login", post(auth::login))
            .route("/auth/me", get(auth::me))
            .route("/auth/forgot-password", post(auth::forgot_password))
            .route("/auth/reset-password", post(auth::reset_password))
            .route("/auth/change-password", post(auth::change_password))
            .route("/users", get(users::list_users).post(users::create_user))
            .route("/users/profile", axum::routing::put(users::update_profile))
            .route(
                "/users/{id}",
                get(users::get_user)
                    .put(users::update_user)
                    .delete(users::delete_user),
            )
            .route("/users/{id}/deactivate", post(users::deactivate_user))
            .route("/users/{id}/reactivate", post(users::reactivate_user))
            .route("/trainers/{id}/students", get(users::list_students))
            .with_state(self.state.clone())
    }

    /// Sends a request through the handler stack and returns status and
    /// JSON body (`Value::Null` for empty bodies).
    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<serde_json::Value>,
    ) -> (StatusCode, serde_json::Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }
}

pub fn profile(user: &User) -> UserProfile {
    user.profile()
}

/// Pulls the raw reset token out of the last reset email sent to `email`.
pub fn reset_token_from_mail(app: &TestApp, email: &str) -> String {
    let mail = app
        .mailer
        .last_to(email)
        .expect("no email sent to this address");
    mail.text_body
        .split("token=")
        .nth(1)
        .and_then(|rest| rest.split_whitespace().next())
        .expect("reset link missing from email")
        .to_string()
}
