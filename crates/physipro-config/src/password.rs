use std::env;

use crate::parse_seconds;

/// bcrypt refuses costs outside this range.
const MIN_BCRYPT_COST: u32 = 4;
const MAX_BCRYPT_COST: u32 = 31;
const DEFAULT_BCRYPT_COST: u32 = 12;

const DEFAULT_RESET_TOKEN_TTL: i64 = 60 * 60;
pub const MAX_RESET_TOKEN_TTL: i64 = 30 * 24 * 60 * 60;

#[derive(Clone, Debug)]
pub struct PasswordConfig {
    pub bcrypt_cost: u32,
    /// Seconds a password-reset token stays valid.
    pub reset_token_ttl: i64,
}

impl PasswordConfig {
    pub fn from_env() -> Self {
        Self {
            bcrypt_cost: env::var("BCRYPT_COST")
                .ok()
                .and_then(|s| s.parse::<u32>().ok())
                .map(|cost| cost.clamp(MIN_BCRYPT_COST, MAX_BCRYPT_COST))
                .unwrap_or(DEFAULT_BCRYPT_COST),
            reset_token_ttl: parse_seconds(
                env::var("RESET_TOKEN_TTL").ok(),
                DEFAULT_RESET_TOKEN_TTL,
                MAX_RESET_TOKEN_TTL,
            ),
        }
    }

    pub fn reset_token_ttl_minutes(&self) -> i64 {
        (self.reset_token_ttl / 60).max(1)
    }
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            bcrypt_cost: DEFAULT_BCRYPT_COST,
            reset_token_ttl: DEFAULT_RESET_TOKEN_TTL,
        }
    }
}
