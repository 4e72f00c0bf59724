//! # PhysiPro Config
//!
//! Configuration structures loaded from environment variables:
//!
//! - [`jwt`]: Access-token signing configuration
//! - [`password`]: Password hashing cost and reset-token lifetime
//! - [`email`]: SMTP delivery configuration
//!
//! Binaries load `.env` with `dotenvy` before calling any `from_env`.
//!
//! # Example
//!
//! ```ignore
//! use physipro_config::{EmailConfig, JwtConfig, PasswordConfig};
//!
//! let jwt_config = JwtConfig::from_env();
//! let password_config = PasswordConfig::from_env();
//! let email_config = EmailConfig::from_env();
//! ```

pub mod email;
pub mod jwt;
pub mod password;

pub use email::EmailConfig;
pub use jwt::JwtConfig;
pub use password::PasswordConfig;

/// Parses a lifetime in seconds. Missing, unparsable or non-positive
/// values fall back to `default`; larger values are capped at `max`.
pub(crate) fn parse_seconds(raw: Option<String>, default: i64, max: i64) -> i64 {
    raw.and_then(|s| s.trim().parse::<i64>().ok())
        .filter(|seconds| *seconds > 0)
        .map(|seconds| seconds.min(max))
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_seconds_bounds() {
        assert_eq!(parse_seconds(None, 60, 120), 60);
        assert_eq!(parse_seconds(Some("90".into()), 60, 120), 90);
        assert_eq!(parse_seconds(Some(" 90 ".into()), 60, 120), 90);
        assert_eq!(parse_seconds(Some("0".into()), 60, 120), 60);
        assert_eq!(parse_seconds(Some("-5".into()), 60, 120), 60);
        assert_eq!(parse_seconds(Some("soon".into()), 60, 120), 60);
        assert_eq!(parse_seconds(Some(i64::MAX.to_string()), 60, 120), 120);
    }
}
