use physipro_auth::{Claims, create_access_token, verify_token};
use physipro_config::JwtConfig;
use physipro_core::{AppError, UserType};
use uuid::Uuid;

pub fn issue(
    user_id: Uuid,
    email: &str,
    user_type: UserType,
    jwt_config: &JwtConfig,
) -> Result<String, AppError> {
    create_access_token(user_id, email, user_type, jwt_config)
}

/// Verifies `token` and renders its claims as pretty JSON.
pub fn inspect(token: &str, jwt_config: &JwtConfig) -> Result<String, AppError> {
    let claims: Claims = verify_token(token.trim(), jwt_config)?;
    serde_json::to_string_pretty(&claims).map_err(AppError::internal)
}
