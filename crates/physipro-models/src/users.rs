//! User domain models and DTOs.
//!
//! [`User`] is the stored entity and carries credentials. Anything that
//! leaves the service is a [`UserProfile`], which drops the password hash
//! and the reset-token fields.

use chrono::{DateTime, Utc};
use physipro_core::UserType;
use physipro_core::serde::{deserialize_nullable_uuid, deserialize_optional_uuid};
use physipro_core::validation::{
    normalize_cpf, normalize_email, validate_cpf, validate_email_address, validate_name,
    validate_password_strength,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// A PhysiPro account.
///
/// `trainer_id` is only ever set on students and always points at a
/// trainer. `reset_password_token` holds a SHA-256 digest, never the raw
/// token, and is set together with `reset_password_expires`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub cpf: String,
    pub password_hash: String,
    pub user_type: UserType,
    pub active: bool,
    pub trainer_id: Option<Uuid>,
    pub reset_password_token: Option<String>,
    pub reset_password_expires: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Everything needed to build a [`User`]. Email and CPF are normalized by
/// [`User::new`].
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub cpf: String,
    pub password_hash: String,
    pub user_type: UserType,
    pub trainer_id: Option<Uuid>,
    pub active: bool,
}

impl User {
    pub fn new(new_user: NewUser) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: new_user.name.trim().to_string(),
            email: normalize_email(&new_user.email),
            cpf: normalize_cpf(&new_user.cpf),
            password_hash: new_user.password_hash,
            user_type: new_user.user_type,
            active: new_user.active,
            trainer_id: new_user.trainer_id,
            reset_password_token: None,
            reset_password_expires: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.user_type == UserType::Admin
    }

    pub fn is_trainer(&self) -> bool {
        self.user_type == UserType::Trainer
    }

    pub fn is_student(&self) -> bool {
        self.user_type == UserType::Student
    }

    /// True if this user is a student assigned to `trainer_id`.
    pub fn is_student_of(&self, trainer_id: Uuid) -> bool {
        self.is_student() && self.trainer_id == Some(trainer_id)
    }

    pub fn set_reset_token(&mut self, digest: String, expires_at: DateTime<Utc>) {
        self.reset_password_token = Some(digest);
        self.reset_password_expires = Some(expires_at);
        self.touch();
    }

    pub fn clear_reset_token(&mut self) {
        self.reset_password_token = None;
        self.reset_password_expires = None;
        self.touch();
    }

    pub fn has_pending_reset(&self) -> bool {
        self.reset_password_token.is_some()
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn profile(&self) -> UserProfile {
        UserProfile::from(self)
    }
}

/// Public view of a [`User`].
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub cpf: String,
    pub user_type: UserType,
    pub active: bool,
    pub trainer_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            cpf: user.cpf.clone(),
            user_type: user.user_type,
            active: user.active,
            trainer_id: user.trainer_id,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self::from(&user)
    }
}

/// DTO for creating a user on someone else's behalf.
///
/// Admins may create any type. Trainers may only create students, who are
/// then assigned to the creating trainer regardless of `trainer_id`.
#[derive(Deserialize, Debug, Clone, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserDto {
    #[validate(custom(function = "validate_name"))]
    pub name: String,
    #[validate(custom(function = "validate_email_address"))]
    pub email: String,
    #[validate(custom(function = "validate_cpf"))]
    pub cpf: String,
    #[validate(custom(function = "validate_password_strength"))]
    pub password: String,
    #[serde(default)]
    pub user_type: UserType,
    #[serde(default, deserialize_with = "deserialize_optional_uuid")]
    pub trainer_id: Option<Uuid>,
    pub active: Option<bool>,
}

/// DTO for an administrative update. Absent fields are left untouched.
///
/// `trainerId: null` unassigns a student; omitting the key keeps the
/// current trainer.
#[derive(Deserialize, Debug, Clone, Default, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserDto {
    #[validate(custom(function = "validate_name"))]
    pub name: Option<String>,
    #[validate(custom(function = "validate_email_address"))]
    pub email: Option<String>,
    #[validate(custom(function = "validate_cpf"))]
    pub cpf: Option<String>,
    #[validate(custom(function = "validate_password_strength"))]
    pub password: Option<String>,
    pub user_type: Option<UserType>,
    #[serde(default, deserialize_with = "deserialize_nullable_uuid")]
    pub trainer_id: Option<Option<Uuid>>,
}

/// DTO for a user editing their own account.
#[derive(Deserialize, Debug, Clone, Default, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileDto {
    #[validate(custom(function = "validate_name"))]
    pub name: Option<String>,
    #[validate(custom(function = "validate_email_address"))]
    pub email: Option<String>,
    #[validate(custom(function = "validate_cpf"))]
    pub cpf: Option<String>,
    #[validate(custom(function = "validate_password_strength"))]
    pub password: Option<String>,
    /// Required when `password` is present.
    pub current_password: Option<String>,
}

/// List filters. String filters are case-insensitive substring matches.
#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserFilter {
    pub name: Option<String>,
    pub email: Option<String>,
    pub user_type: Option<UserType>,
    #[serde(default, deserialize_with = "deserialize_optional_uuid")]
    pub trainer_id: Option<Uuid>,
    pub active: Option<bool>,
}

impl UserFilter {
    pub fn matches(&self, user: &User) -> bool {
        fn contains(haystack: &str, needle: &Option<String>) -> bool {
            match needle.as_deref().map(str::trim) {
                Some(n) if !n.is_empty() => haystack.to_lowercase().contains(&n.to_lowercase()),
                _ => true,
            }
        }

        contains(&user.name, &self.name)
            && contains(&user.email, &self.email)
            && self.user_type.is_none_or(|t| user.user_type == t)
            && self.trainer_id.is_none_or(|t| user.trainer_id == Some(t))
            && self.active.is_none_or(|a| user.active == a)
    }
}
