use std::sync::Arc;

use physipro_config::{EmailConfig, JwtConfig, PasswordConfig};
use physipro_db::{DynUserRepository, InMemoryUserRepository};

use crate::utils::email::EmailService;

#[derive(Clone)]
pub struct AppState {
    pub users: DynUserRepository,
    pub email: EmailService,
    pub jwt_config: JwtConfig,
    pub password_config: PasswordConfig,
}

impl AppState {
    pub fn new(
        users: DynUserRepository,
        email: EmailService,
        jwt_config: JwtConfig,
        password_config: PasswordConfig,
    ) -> Self {
        Self {
            users,
            email,
            jwt_config,
            password_config,
        }
    }
}

/// Builds state from the environment, backed by the in-memory store.
pub fn init_app_state() -> AppState {
    dotenvy::dotenv().ok();

    AppState::new(
        Arc::new(InMemoryUserRepository::new()),
        EmailService::from_config(EmailConfig::from_env()),
        JwtConfig::from_env(),
        PasswordConfig::from_env(),
    )
}
