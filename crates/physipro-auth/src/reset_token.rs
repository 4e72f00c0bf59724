//! One-time password-reset tokens.
//!
//! The raw token goes to the user by email and is never stored. The
//! account keeps `digest` (SHA-256, hex) and `expires_at`; a confirmation
//! is matched by digesting the presented token.

use chrono::{DateTime, Duration, Utc};
use physipro_core::AppError;
use rand::RngCore;
use sha2::{Digest, Sha256};

const TOKEN_BYTES: usize = 32;

#[derive(Debug, Clone)]
pub struct ResetToken {
    /// Hex-encoded random token sent to the user.
    pub token: String,
    /// SHA-256 hex digest of `token`, safe to persist.
    pub digest: String,
    pub expires_at: DateTime<Utc>,
}

impl ResetToken {
    /// Generates a fresh token valid for `ttl_seconds` from now.
    ///
    /// # Errors
    ///
    /// Returns an internal error if the expiry falls outside the range
    /// `DateTime<Utc>` can represent.
    pub fn generate(ttl_seconds: i64) -> Result<Self, AppError> {
        Self::generate_at(Utc::now(), ttl_seconds)
    }

    pub fn generate_at(now: DateTime<Utc>, ttl_seconds: i64) -> Result<Self, AppError> {
        let expires_at = Duration::try_seconds(ttl_seconds)
            .and_then(|ttl| now.checked_add_signed(ttl))
            .ok_or_else(|| {
                AppError::internal_error(format!(
                    "Reset token TTL of {} seconds is out of range",
                    ttl_seconds
                ))
            })?;

        let mut bytes = [0u8; TOKEN_BYTES];
        rand::thread_rng().fill_bytes(&mut bytes);

        let token = hex::encode(bytes);
        let digest = digest_reset_token(&token);

        Ok(Self {
            token,
            digest,
            expires_at,
        })
    }
}

pub fn digest_reset_token(token: &str) -> String {
    hex::encode(Sha256::digest(token.trim().as_bytes()))
}

/// A token is dead from the instant of its expiry onwards.
pub fn is_expired(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now >= expires_at
}
