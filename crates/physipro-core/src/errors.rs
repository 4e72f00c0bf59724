//! Application error type.
//!
//! Every fallible operation in PhysiPro returns [`AppError`], which pairs an
//! HTTP status with a stable machine-readable [`ErrorCode`] and a message
//! chain carried by [`anyhow::Error`].
//!
//! Rendered responses have the shape:
//!
//! ```json
//! { "message": "Email jane@physipro.com is already in use", "code": "EMAIL_ALREADY_EXISTS" }
//! ```
//!
//! Server-side failures (5xx) are logged with their full chain and rendered
//! with a generic message.

use std::fmt;

use anyhow::{Error, anyhow};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;
use uuid::Uuid;

/// Stable error codes exposed to API clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    ValidationError,
    NotFound,
    UserNotFound,
    Unauthorized,
    InvalidCredentials,
    Forbidden,
    Conflict,
    EmailAlreadyExists,
    CpfAlreadyExists,
    InvalidResetToken,
    ResetTokenExpired,
    InternalError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ValidationError => "VALIDATION_ERROR",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::UserNotFound => "USER_NOT_FOUND",
            ErrorCode::Unauthorized => "UNAUTHORIZED",
            ErrorCode::InvalidCredentials => "INVALID_CREDENTIALS",
            ErrorCode::Forbidden => "FORBIDDEN",
            ErrorCode::Conflict => "CONFLICT",
            ErrorCode::EmailAlreadyExists => "EMAIL_ALREADY_EXISTS",
            ErrorCode::CpfAlreadyExists => "CPF_ALREADY_EXISTS",
            ErrorCode::InvalidResetToken => "INVALID_RESET_TOKEN",
            ErrorCode::ResetTokenExpired => "RESET_TOKEN_EXPIRED",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        }
    }

    /// The HTTP status a code maps to.
    pub fn status(&self) -> StatusCode {
        match self {
            ErrorCode::ValidationError
            | ErrorCode::InvalidResetToken
            | ErrorCode::ResetTokenExpired => StatusCode::BAD_REQUEST,
            ErrorCode::NotFound | ErrorCode::UserNotFound => StatusCode::NOT_FOUND,
            ErrorCode::Unauthorized | ErrorCode::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ErrorCode::Forbidden => StatusCode::FORBIDDEN,
            ErrorCode::Conflict | ErrorCode::EmailAlreadyExists | ErrorCode::CpfAlreadyExists => {
                StatusCode::CONFLICT
            }
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub code: ErrorCode,
    pub error: Error,
}

impl AppError {
    pub fn new<E>(code: ErrorCode, err: E) -> Self
    where
        E: Into<Error>,
    {
        Self {
            status: code.status(),
            code,
            error: err.into(),
        }
    }

    pub fn message(&self) -> String {
        self.error.to_string()
    }

    pub fn is_server_error(&self) -> bool {
        self.status.is_server_error()
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationError, anyhow!(message.into()))
    }

    pub fn bad_request<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(ErrorCode::ValidationError, err)
    }

    pub fn not_found<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(ErrorCode::NotFound, err)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, anyhow!(message.into()))
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Forbidden, anyhow!(message.into()))
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Conflict, anyhow!(message.into()))
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(ErrorCode::InternalError, err)
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::internal(anyhow!(message.into()))
    }

    pub fn user_not_found(id: Uuid) -> Self {
        Self::new(
            ErrorCode::UserNotFound,
            anyhow!("User with ID {} not found", id),
        )
    }

    pub fn email_taken(email: &str) -> Self {
        Self::new(
            ErrorCode::EmailAlreadyExists,
            anyhow!("Email {} is already in use", email),
        )
    }

    pub fn cpf_taken(cpf: &str) -> Self {
        Self::new(
            ErrorCode::CpfAlreadyExists,
            anyhow!("CPF {} is already registered", cpf),
        )
    }

    pub fn invalid_credentials() -> Self {
        Self::new(
            ErrorCode::InvalidCredentials,
            anyhow!("Invalid email or password"),
        )
    }

    pub fn invalid_reset_token() -> Self {
        Self::new(
            ErrorCode::InvalidResetToken,
            anyhow!("Invalid or expired reset token"),
        )
    }

    pub fn reset_token_expired() -> Self {
        Self::new(
            ErrorCode::ResetTokenExpired,
            anyhow!("Password reset token has expired"),
        )
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.error)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = if self.is_server_error() {
            tracing::error!(code = %self.code, error = ?self.error, "Request failed");
            "Internal server error".to_string()
        } else {
            self.error.to_string()
        };

        let body = Json(json!({
            "message": message,
            "code": self.code,
        }));

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<Error>,
{
    fn from(err: E) -> Self {
        AppError::internal(err)
    }
}
