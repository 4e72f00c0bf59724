use chrono::{Duration, Utc};
use physipro::physipro_auth::{
    ResetToken, create_access_token, digest_reset_token, is_expired, verify_token,
};
use physipro::physipro_config::JwtConfig;
use physipro::physipro_config::jwt::MAX_ACCESS_TOKEN_EXPIRY;
use physipro::physipro_config::password::MAX_RESET_TOKEN_TTL;
use physipro::physipro_core::{ErrorCode, UserType};
use uuid::Uuid;

fn get_test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "test_secret_key_for_testing_purposes".to_string(),
        access_token_expiry: 3600,
        issuer: "physipro".to_string(),
    }
}

#[test]
fn test_create_access_token_all_user_types() {
    let jwt_config = get_test_jwt_config();
    let user_id = Uuid::new_v4();

    for user_type in UserType::ALL {
        let token = create_access_token(user_id, "test@physipro.com", user_type, &jwt_config)
            .unwrap();
        let claims = verify_token(&token, &jwt_config).unwrap();

        assert_eq!(claims.user_type, user_type);
        assert_eq!(claims.user_id().unwrap(), user_id);
        assert_eq!(claims.email, "test@physipro.com");
        assert_eq!(claims.iss, "physipro");
    }
}

#[test]
fn test_token_expiry_matches_config() {
    let jwt_config = get_test_jwt_config();
    let token =
        create_access_token(Uuid::new_v4(), "test@physipro.com", UserType::Trainer, &jwt_config)
            .unwrap();

    let claims = verify_token(&token, &jwt_config).unwrap();

    assert_eq!(claims.exp - claims.iat, 3600);
}

#[test]
fn test_longest_configurable_expiry_is_usable() {
    let jwt_config = JwtConfig {
        access_token_expiry: MAX_ACCESS_TOKEN_EXPIRY,
        ..get_test_jwt_config()
    };
    let token = create_access_token(Uuid::new_v4(), "test@physipro.com", UserType::Admin, &jwt_config)
        .unwrap();

    let claims = verify_token(&token, &jwt_config).unwrap();
    assert_eq!((claims.exp - claims.iat) as i64, MAX_ACCESS_TOKEN_EXPIRY);
}

#[test]
fn test_oversized_expiry_is_an_error_not_a_panic() {
    let jwt_config = JwtConfig {
        access_token_expiry: i64::MAX,
        ..get_test_jwt_config()
    };
    let err = create_access_token(Uuid::new_v4(), "test@physipro.com", UserType::Admin, &jwt_config)
        .unwrap_err();

    assert_eq!(err.code, ErrorCode::InternalError);
}

#[test]
fn test_verify_token_wrong_secret() {
    let jwt_config = get_test_jwt_config();
    let token =
        create_access_token(Uuid::new_v4(), "test@physipro.com", UserType::Student, &jwt_config)
            .unwrap();

    let other = JwtConfig {
        secret: "a_completely_different_secret_value".to_string(),
        ..get_test_jwt_config()
    };
    let err = verify_token(&token, &other).unwrap_err();

    assert_eq!(err.code, ErrorCode::Unauthorized);
    assert_eq!(err.message(), "Invalid or expired token");
}

#[test]
fn test_verify_token_wrong_issuer() {
    let jwt_config = get_test_jwt_config();
    let token =
        create_access_token(Uuid::new_v4(), "test@physipro.com", UserType::Admin, &jwt_config)
            .unwrap();

    let other = JwtConfig {
        issuer: "someone-else".to_string(),
        ..get_test_jwt_config()
    };

    assert!(verify_token(&token, &other).is_err());
}

#[test]
fn test_verify_token_malformed() {
    let jwt_config = get_test_jwt_config();

    for token in ["", "invalid", "a.b.c", "Bearer abc"] {
        let err = verify_token(token, &jwt_config).unwrap_err();
        assert_eq!(err.code, ErrorCode::Unauthorized);
    }
}

#[test]
fn test_reset_token_shape() {
    let reset = ResetToken::generate(3600).unwrap();

    assert_eq!(reset.token.len(), 64);
    assert!(reset.token.chars().all(|c| c.is_ascii_hexdigit()));
    assert_eq!(reset.digest, digest_reset_token(&reset.token));
    assert_ne!(reset.digest, reset.token);
}

#[test]
fn test_reset_tokens_are_unique() {
    let first = ResetToken::generate(3600).unwrap();
    let second = ResetToken::generate(3600).unwrap();

    assert_ne!(first.token, second.token);
    assert_ne!(first.digest, second.digest);
}

#[test]
fn test_reset_token_expiry_boundary() {
    let now = Utc::now();
    let reset = ResetToken::generate_at(now, 3600).unwrap();

    assert_eq!(reset.expires_at, now + Duration::seconds(3600));
    assert!(!is_expired(reset.expires_at, now));
    assert!(!is_expired(reset.expires_at, now + Duration::seconds(3599)));
    assert!(is_expired(reset.expires_at, now + Duration::seconds(3600)));
}

#[test]
fn test_reset_token_ttl_bounds() {
    let now = Utc::now();
    let reset = ResetToken::generate_at(now, MAX_RESET_TOKEN_TTL).unwrap();
    assert_eq!(reset.expires_at, now + Duration::seconds(MAX_RESET_TOKEN_TTL));

    assert!(ResetToken::generate(i64::MAX).is_err());
}

#[test]
fn test_digest_ignores_surrounding_whitespace() {
    assert_eq!(digest_reset_token(" abc \n"), digest_reset_token("abc"));
}
