//! Role and ownership checks.
//!
//! Two kinds of rules live here:
//!
//! - **Role gates** ([`check_role`], [`check_any_role`], and the
//!   [`RequireAdmin`](crate::middleware::auth::RequireAdmin) /
//!   [`RequireStaff`](crate::middleware::auth::RequireStaff) extractors)
//!   look only at the actor's user type.
//! - **Ownership rules** ([`can_access_user`], [`can_manage_user`]) relate
//!   the actor to a target account through the trainer–student hierarchy.
//!
//! | Actor   | May create        | May view                    | May manage         |
//! |---------|-------------------|-----------------------------|--------------------|
//! | ADMIN   | any type          | anyone                      | anyone             |
//! | TRAINER | STUDENT           | self, own students          | own students       |
//! | STUDENT | nothing           | self                        | nobody             |
//!
//! Self-service edits go through the profile update, not "manage".

use physipro_core::{AppError, UserType};
use physipro_models::{User, UserProfile};

use crate::middleware::auth::AuthUser;

pub fn check_role(auth_user: &AuthUser, required: UserType) -> Result<(), AppError> {
    check_any_role(auth_user, &[required])
}

pub fn check_any_role(auth_user: &AuthUser, allowed: &[UserType]) -> Result<(), AppError> {
    if allowed.contains(&auth_user.user_type()) {
        Ok(())
    } else {
        Err(AppError::forbidden("Insufficient permissions"))
    }
}

/// Whether `registrar` may create an account of type `target`.
pub fn can_register_user_type(registrar: UserType, target: UserType) -> bool {
    match registrar {
        UserType::Admin => true,
        UserType::Trainer => target == UserType::Student,
        UserType::Student => false,
    }
}

/// Read access: admins see everyone, users see themselves, trainers see
/// their own students.
pub fn can_access_user(actor: &UserProfile, target: &User) -> bool {
    match actor.user_type {
        UserType::Admin => true,
        _ if actor.id == target.id => true,
        UserType::Trainer => target.is_student_of(actor.id),
        UserType::Student => false,
    }
}

/// Administrative write access (update, deactivate).
pub fn can_manage_user(actor: &UserProfile, target: &User) -> bool {
    match actor.user_type {
        UserType::Admin => true,
        UserType::Trainer => target.is_student_of(actor.id),
        UserType::Student => false,
    }
}

pub fn ensure_can_register(actor: &UserProfile, target: UserType) -> Result<(), AppError> {
    if can_register_user_type(actor.user_type, target) {
        Ok(())
    } else {
        Err(AppError::forbidden(format!(
            "{} users cannot create {} accounts",
            actor.user_type, target
        )))
    }
}

pub fn ensure_can_access(actor: &UserProfile, target: &User) -> Result<(), AppError> {
    if can_access_user(actor, target) {
        Ok(())
    } else {
        Err(AppError::forbidden("You do not have access to this user"))
    }
}

pub fn ensure_can_manage(actor: &UserProfile, target: &User) -> Result<(), AppError> {
    if can_manage_user(actor, target) {
        Ok(())
    } else {
        Err(AppError::forbidden("You are not allowed to modify this user"))
    }
}
