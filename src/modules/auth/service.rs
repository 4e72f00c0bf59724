use anyhow::anyhow;
use chrono::Utc;
use physipro_auth::{ResetToken, create_access_token, digest_reset_token, is_expired, verify_token};
use physipro_core::password::hash_password_with_cost;
use physipro_core::validation::{normalize_email, validate_dto};
use physipro_core::{AppError, ErrorCode, UserType, verify_password};
use physipro_models::{
    AuthResponse, ChangePasswordRequest, ForgotPasswordRequest, LoginRequest, NewUser,
    RegisterRequest, ResetPasswordRequest, User,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::modules::users::service::UserService;
use crate::state::AppState;

pub struct AuthService;

impl AuthService {
    /// Self-registration. Always creates an active STUDENT with no trainer.
    #[instrument(skip(state, dto), fields(email = %dto.email))]
    pub async fn register(state: &AppState, dto: RegisterRequest) -> Result<AuthResponse, AppError> {
        validate_dto(&dto)?;
        UserService::ensure_identity_available(state, &dto.email, &dto.cpf, None).await?;

        let password_hash = hash_password_with_cost(&dto.password, state.password_config.bcrypt_cost)?;
        let user = state
            .users
            .create(User::new(NewUser {
                name: dto.name,
                email: dto.email,
                cpf: dto.cpf,
                password_hash,
                user_type: UserType::Student,
                trainer_id: None,
                active: true,
            }))
            .await?;

        info!(user_id = %user.id, "User registered");

        if let Err(e) = state.email.send_welcome_email(&user.email, &user.name).await {
            warn!(user_id = %user.id, error = %e, "Failed to send welcome email");
        }

        Self::issue_auth_response(state, &user)
    }

    #[instrument(skip(state, dto), fields(email = %dto.email))]
    pub async fn login(state: &AppState, dto: LoginRequest) -> Result<AuthResponse, AppError> {
        validate_dto(&dto)?;

        let user = state
            .users
            .find_by_email(&normalize_email(&dto.email))
            .await?
            .ok_or_else(AppError::invalid_credentials)?;

        if !verify_password(&dto.password, &user.password_hash)? {
            warn!(user_id = %user.id, "Failed login attempt");
            return Err(AppError::invalid_credentials());
        }

        if !user.active {
            return Err(AppError::unauthorized("User account is inactive"));
        }

        info!(user_id = %user.id, "User logged in");
        Self::issue_auth_response(state, &user)
    }

    /// Resolves a bearer token to a live, active account.
    pub async fn authenticate(state: &AppState, token: &str) -> Result<User, AppError> {
        let claims = verify_token(token, &state.jwt_config)?;
        let user_id = claims.user_id()?;

        let user = state
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::unauthorized("Invalid or expired token"))?;

        if !user.active {
            return Err(AppError::unauthorized("User account is inactive"));
        }

        Ok(user)
    }

    /// Issues a reset token and emails it.
    ///
    /// Unknown and inactive accounts get the same `Ok(())` as real ones. A
    /// previous pending token is replaced. If delivery fails the new token
    /// is withdrawn.
    #[instrument(skip(state, dto))]
    pub async fn request_password_reset(
        state: &AppState,
        dto: ForgotPasswordRequest,
    ) -> Result<(), AppError> {
        validate_dto(&dto)?;

        let Some(mut user) = state.users.find_by_email(&normalize_email(&dto.email)).await? else {
            info!("Password reset requested for unknown email");
            return Ok(());
        };

        if !user.active {
            info!(user_id = %user.id, "Password reset requested for inactive account");
            return Ok(());
        }

        let reset = ResetToken::generate(state.password_config.reset_token_ttl)?;
        user.set_reset_token(reset.digest.clone(), reset.expires_at);
        let user = state.users.update(user).await?;

        let sent = state
            .email
            .send_password_reset_email(
                &user.email,
                &user.name,
                &reset.token,
                state.password_config.reset_token_ttl_minutes(),
            )
            .await;

        if let Err(e) = sent {
            warn!(user_id = %user.id, error = %e, "Reset email failed, withdrawing token");
            Self::withdraw_reset_token(state, user.id, &reset.digest).await?;
            return Err(AppError::internal(anyhow!(
                "Failed to send password reset email: {}",
                e.message()
            )));
        }

        info!(user_id = %user.id, expires_at = %reset.expires_at, "Password reset token issued");
        Ok(())
    }

    /// Consumes a reset token and sets a new password.
    #[instrument(skip(state, dto))]
    pub async fn reset_password(
        state: &AppState,
        dto: ResetPasswordRequest,
    ) -> Result<(), AppError> {
        validate_dto(&dto)?;

        let digest = digest_reset_token(&dto.token);
        let mut user = state
            .users
            .find_by_reset_token(&digest)
            .await?
            .ok_or_else(AppError::invalid_reset_token)?;

        let expired = user
            .reset_password_expires
            .is_none_or(|expires_at| is_expired(expires_at, Utc::now()));

        if expired {
            user.clear_reset_token();
            state.users.update(user).await?;
            return Err(AppError::reset_token_expired());
        }

        user.password_hash =
            hash_password_with_cost(&dto.new_password, state.password_config.bcrypt_cost)?;
        user.clear_reset_token();
        let user = state.users.update(user).await?;

        info!(user_id = %user.id, "Password reset completed");

        if let Err(e) = state
            .email
            .send_password_reset_confirmation(&user.email, &user.name)
            .await
        {
            warn!(user_id = %user.id, error = %e, "Failed to send reset confirmation");
        }

        Ok(())
    }

    /// Changes the actor's password after checking the current one. Any
    /// pending reset token is discarded.
    #[instrument(skip(state, dto))]
    pub async fn change_password(
        state: &AppState,
        user_id: Uuid,
        dto: ChangePasswordRequest,
    ) -> Result<(), AppError> {
        validate_dto(&dto)?;

        let mut user = state
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::user_not_found(user_id))?;

        if !verify_password(&dto.current_password, &user.password_hash)? {
            return Err(AppError::new(
                ErrorCode::InvalidCredentials,
                anyhow!("Current password is incorrect"),
            ));
        }

        if dto.current_password == dto.new_password {
            return Err(AppError::validation(
                "New password must be different from the current password",
            ));
        }

        user.password_hash =
            hash_password_with_cost(&dto.new_password, state.password_config.bcrypt_cost)?;
        user.clear_reset_token();
        state.users.update(user).await?;

        info!(%user_id, "Password changed");
        Ok(())
    }

    fn issue_auth_response(state: &AppState, user: &User) -> Result<AuthResponse, AppError> {
        let access_token =
            create_access_token(user.id, &user.email, user.user_type, &state.jwt_config)?;

        Ok(AuthResponse {
            user: user.profile(),
            access_token,
        })
    }

    /// Clears the pending token only if it is still the one we issued.
    async fn withdraw_reset_token(
        state: &AppState,
        user_id: Uuid,
        digest: &str,
    ) -> Result<(), AppError> {
        let Some(mut user) = state.users.find_by_id(user_id).await? else {
            return Ok(());
        };

        if user.reset_password_token.as_deref() == Some(digest) {
            user.clear_reset_token();
            state.users.update(user).await?;
        }
        Ok(())
    }
}
