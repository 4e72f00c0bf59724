use axum::{RequestPartsExt, extract::FromRequestParts, http::request::Parts};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use physipro_core::{AppError, UserType};
use physipro_models::UserProfile;
use uuid::Uuid;

use crate::modules::auth::service::AuthService;
use crate::state::AppState;

/// Extractor that validates the bearer token and loads the account it
/// names.
///
/// The wrapped profile is read from the store on every request, so a
/// deactivated account or a changed user type takes effect immediately
/// even while older tokens are still unexpired.
#[derive(Debug, Clone)]
pub struct AuthUser(pub UserProfile);

impl AuthUser {
    pub fn id(&self) -> Uuid {
        self.0.id
    }

    pub fn email(&self) -> &str {
        &self.0.email
    }

    pub fn user_type(&self) -> UserType {
        self.0.user_type
    }

    pub fn is_admin(&self) -> bool {
        self.0.user_type == UserType::Admin
    }

    pub fn is_trainer(&self) -> bool {
        self.0.user_type == UserType::Trainer
    }

    pub fn is_student(&self) -> bool {
        self.0.user_type == UserType::Student
    }

    pub fn profile(&self) -> &UserProfile {
        &self.0
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|rejection| {
                if rejection.is_missing() {
                    AppError::unauthorized("Authentication token missing")
                } else {
                    AppError::unauthorized("Invalid authorization header format")
                }
            })?;

        let user = AuthService::authenticate(state, bearer.token()).await?;

        Ok(AuthUser(user.profile()))
    }
}

/// Declares an extractor that wraps [`AuthUser`] and admits only the
/// listed user types.
#[macro_export]
macro_rules! require_user_type {
    ($name:ident, [$($user_type:expr),+ $(,)?]) => {
        #[derive(Debug, Clone)]
        pub struct $name(pub $crate::middleware::auth::AuthUser);

        impl axum::extract::FromRequestParts<$crate::state::AppState> for $name {
            type Rejection = physipro_core::AppError;

            async fn from_request_parts(
                parts: &mut axum::http::request::Parts,
                state: &$crate::state::AppState,
            ) -> Result<Self, Self::Rejection> {
                let auth_user = <$crate::middleware::auth::AuthUser as axum::extract::FromRequestParts<
                    $crate::state::AppState,
                >>::from_request_parts(parts, state)
                .await?;

                $crate::middleware::role::check_any_role(&auth_user, &[$($user_type),+])?;

                Ok($name(auth_user))
            }
        }
    };
}

require_user_type!(RequireAdmin, [UserType::Admin]);
require_user_type!(RequireStaff, [UserType::Admin, UserType::Trainer]);
