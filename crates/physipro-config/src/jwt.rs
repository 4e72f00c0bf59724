use std::env;

use crate::parse_seconds;

const DEFAULT_ACCESS_TOKEN_EXPIRY: i64 = 24 * 60 * 60;
pub const MAX_ACCESS_TOKEN_EXPIRY: i64 = 365 * 24 * 60 * 60;

#[derive(Clone, Debug)]
pub struct JwtConfig {
    pub secret: String,
    /// Seconds until an access token expires, at most
    /// [`MAX_ACCESS_TOKEN_EXPIRY`] when loaded from the environment.
    pub access_token_expiry: i64,
    pub issuer: String,
}

impl JwtConfig {
    pub fn from_env() -> Self {
        Self {
            secret: env::var("JWT_SECRET")
                .unwrap_or_else(|_| "your-secret-key-change-in-production".to_string()),
            access_token_expiry: parse_seconds(
                env::var("JWT_ACCESS_EXPIRY").ok(),
                DEFAULT_ACCESS_TOKEN_EXPIRY,
                MAX_ACCESS_TOKEN_EXPIRY,
            ),
            issuer: env::var("JWT_ISSUER").unwrap_or_else(|_| "physipro".to_string()),
        }
    }
}
