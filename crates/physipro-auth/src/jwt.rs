//! Access-token creation and verification.
//!
//! Tokens are HS256 JWTs signed with [`JwtConfig::secret`]. Verification
//! rejects a bad signature, an expired `exp` (with the default 60 second
//! leeway), or an `iss` other than [`JwtConfig::issuer`].

use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use physipro_config::JwtConfig;
use physipro_core::{AppError, UserType};

use crate::claims::Claims;

/// Creates a signed access token for the given account.
///
/// # Errors
///
/// Returns an internal error if the configured expiry is not positive,
/// if `exp` would overflow, or if encoding fails.
pub fn create_access_token(
    user_id: Uuid,
    email: &str,
    user_type: UserType,
    jwt_config: &JwtConfig,
) -> Result<String, AppError> {
    let now = Utc::now().timestamp();
    let (iat, exp) = usize::try_from(now)
        .ok()
        .zip(usize::try_from(jwt_config.access_token_expiry).ok())
        .filter(|(_, expiry)| *expiry > 0)
        .and_then(|(iat, expiry)| Some((iat, iat.checked_add(expiry)?)))
        .ok_or_else(|| {
            AppError::internal_error(format!(
                "Access token expiry of {} seconds is out of range",
                jwt_config.access_token_expiry
            ))
        })?;

    let claims = Claims {
        sub: user_id.to_string(),
        email: email.to_string(),
        user_type,
        iss: jwt_config.issuer.clone(),
        exp,
        iat,
    };

    encode_claims(&claims, jwt_config)
}

pub(crate) fn encode_claims(claims: &Claims, jwt_config: &JwtConfig) -> Result<String, AppError> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(jwt_config.secret.as_bytes()),
    )
    .map_err(|e| AppError::internal_error(format!("Failed to create token: {}", e)))
}

/// Verifies an access token and returns the embedded claims.
///
/// Every failure collapses to the same unauthorized error so callers
/// cannot distinguish a forged token from an expired one.
pub fn verify_token(token: &str, jwt_config: &JwtConfig) -> Result<Claims, AppError> {
    let mut validation = Validation::default();
    validation.set_issuer(&[jwt_config.issuer.as_str()]);

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_config.secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::unauthorized("Invalid or expired token"))
}
