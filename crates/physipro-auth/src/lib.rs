//! # PhysiPro Auth
//!
//! Credential primitives for PhysiPro:
//!
//! - [`claims`]: The payload carried by bearer access tokens
//! - [`jwt`]: Access-token creation and verification (HS256)
//! - [`reset_token`]: One-time password-reset tokens and their stored digests
//!
//! # Token Lifecycles
//!
//! An **access token** is signed at login or registration and is valid
//! until `exp`. Verification checks signature, expiry and issuer only; the
//! caller is expected to reload the account to learn whether it still
//! exists and is active.
//!
//! A **reset token** is 32 random bytes, hex encoded. Only its SHA-256
//! digest is persisted, together with an expiry. Issuing a new one replaces
//! the previous digest, so at most one reset token per account is live.
//!
//! # Example
//!
//! ```ignore
//! use physipro_auth::{create_access_token, verify_token, ResetToken};
//! use physipro_config::JwtConfig;
//!
//! let config = JwtConfig::from_env();
//! let token = create_access_token(user_id, "ana@physipro.com", UserType::Trainer, &config)?;
//! let claims = verify_token(&token, &config)?;
//!
//! let reset = ResetToken::generate(3600)?;
//! // email `reset.token`, store `reset.digest` and `reset.expires_at`
//! ```

pub mod claims;
pub mod jwt;
pub mod reset_token;

pub use claims::Claims;
pub use jwt::{create_access_token, verify_token};
pub use reset_token::{ResetToken, digest_reset_token, is_expired};
