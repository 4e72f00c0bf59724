use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use physipro_core::AppError;
use physipro_models::{
    AuthResponse, ChangePasswordRequest, ForgotPasswordRequest, LoginRequest, MessageResponse,
    RegisterRequest, ResetPasswordRequest, UserProfile,
};
use tracing::instrument;

use super::service::AuthService;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

pub const RESET_REQUESTED_MESSAGE: &str =
    "If an account exists for that email, a password reset link has been sent";

/// Register a new student account
#[instrument(skip_all)]
pub async fn register(
    State(state): State<AppState>,
    Json(dto): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AppError> {
    let response = AuthService::register(&state, dto).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    Json(dto): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AppError> {
    Ok(Json(AuthService::login(&state, dto).await?))
}

/// Profile of the authenticated account
pub async fn me(auth_user: AuthUser) -> Json<UserProfile> {
    Json(auth_user.0)
}

/// Responds identically whether or not the email is registered
#[instrument(skip_all)]
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(dto): Json<ForgotPasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    AuthService::request_password_reset(&state, dto).await?;
    Ok(Json(MessageResponse::new(RESET_REQUESTED_MESSAGE)))
}

#[instrument(skip_all)]
pub async fn reset_password(
    State(state): State<AppState>,
    Json(dto): Json<ResetPasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    AuthService::reset_password(&state, dto).await?;
    Ok(Json(MessageResponse::new(
        "Password has been reset successfully",
    )))
}

#[instrument(skip_all, fields(user_id = %auth_user.id()))]
pub async fn change_password(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(dto): Json<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    AuthService::change_password(&state, auth_user.id(), dto).await?;
    Ok(Json(MessageResponse::new("Password changed successfully")))
}
