use anyhow::anyhow;
use physipro_core::password::hash_password_with_cost;
use physipro_core::validation::{normalize_cpf, normalize_email, validate_dto};
use physipro_core::{AppError, ErrorCode, UserType, verify_password};
use physipro_models::{
    CreateUserDto, NewUser, UpdateProfileDto, UpdateUserDto, User, UserFilter, UserProfile,
};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::middleware::role::{ensure_can_access, ensure_can_manage, ensure_can_register};
use crate::state::AppState;

pub struct UserService;

impl UserService {
    #[instrument(skip(state, actor), fields(actor_id = %actor.id))]
    pub async fn list_users(
        state: &AppState,
        actor: &UserProfile,
        filter: UserFilter,
    ) -> Result<Vec<UserProfile>, AppError> {
        ensure_admin(actor)?;

        let users = state.users.find_all(&filter).await?;
        Ok(users.iter().map(UserProfile::from).collect())
    }

    pub async fn get_user(
        state: &AppState,
        actor: &UserProfile,
        id: Uuid,
    ) -> Result<UserProfile, AppError> {
        let user = Self::load(state, id).await?;
        ensure_can_access(actor, &user)?;
        Ok(user.profile())
    }

    /// Creates an account on behalf of an admin or trainer.
    ///
    /// A trainer always becomes the trainer of the student it creates,
    /// whatever `trainer_id` the request carried.
    #[instrument(skip(state, actor, dto), fields(actor_id = %actor.id, user_type = %dto.user_type))]
    pub async fn create_user(
        state: &AppState,
        actor: &UserProfile,
        dto: CreateUserDto,
    ) -> Result<UserProfile, AppError> {
        ensure_can_register(actor, dto.user_type)?;
        validate_dto(&dto)?;

        let trainer_id = if actor.user_type == UserType::Trainer {
            Some(actor.id)
        } else {
            dto.trainer_id
        };
        let trainer_id = Self::resolve_trainer(state, None, dto.user_type, trainer_id).await?;

        Self::ensure_identity_available(state, &dto.email, &dto.cpf, None).await?;

        let password_hash =
            hash_password_with_cost(&dto.password, state.password_config.bcrypt_cost)?;
        let user = state
            .users
            .create(User::new(NewUser {
                name: dto.name,
                email: dto.email,
                cpf: dto.cpf,
                password_hash,
                user_type: dto.user_type,
                trainer_id,
                active: dto.active.unwrap_or(true),
            }))
            .await?;

        info!(user_id = %user.id, "User created");
        Ok(user.profile())
    }

    /// Administrative update. Only admins may change `user_type` or
    /// `trainer_id`; trainers may edit the other fields of their students.
    #[instrument(skip(state, actor, dto), fields(actor_id = %actor.id))]
    pub async fn update_user(
        state: &AppState,
        actor: &UserProfile,
        id: Uuid,
        dto: UpdateUserDto,
    ) -> Result<UserProfile, AppError> {
        validate_dto(&dto)?;

        let mut user = Self::load(state, id).await?;
        ensure_can_manage(actor, &user)?;

        let changes_hierarchy = dto.user_type.is_some() || dto.trainer_id.is_some();
        if changes_hierarchy && actor.user_type != UserType::Admin {
            return Err(AppError::forbidden(
                "Only administrators can change user type or trainer",
            ));
        }

        let user_type = dto.user_type.unwrap_or(user.user_type);
        if user_type != user.user_type {
            if actor.id == user.id {
                return Err(AppError::validation("You cannot change your own user type"));
            }
            ensure_can_register(actor, user_type)?;
            if user.is_trainer() && state.users.count_students_by_trainer(user.id).await? > 0 {
                return Err(AppError::conflict(
                    "Cannot change the type of a trainer with assigned students",
                ));
            }
        }

        let trainer_id = match dto.trainer_id {
            Some(requested) => requested,
            None if user_type == UserType::Student => user.trainer_id,
            None => None,
        };
        user.trainer_id =
            Self::resolve_trainer(state, Some(user.id), user_type, trainer_id).await?;
        user.user_type = user_type;

        Self::apply_identity_changes(state, &mut user, dto.name, dto.email, dto.cpf).await?;

        if let Some(password) = dto.password {
            user.password_hash =
                hash_password_with_cost(&password, state.password_config.bcrypt_cost)?;
            user.reset_password_token = None;
            user.reset_password_expires = None;
        }

        user.touch();
        let user = state.users.update(user).await?;

        info!(user_id = %user.id, "User updated");
        Ok(user.profile())
    }

    /// Self-service update. Changing the password requires the current one.
    #[instrument(skip(state, actor, dto), fields(actor_id = %actor.id))]
    pub async fn update_profile(
        state: &AppState,
        actor: &UserProfile,
        dto: UpdateProfileDto,
    ) -> Result<UserProfile, AppError> {
        validate_dto(&dto)?;

        let mut user = Self::load(state, actor.id).await?;

        if let Some(password) = &dto.password {
            let current = dto.current_password.as_deref().ok_or_else(|| {
                AppError::validation("Current password is required to set a new password")
            })?;

            if !verify_password(current, &user.password_hash)? {
                return Err(AppError::new(
                    ErrorCode::InvalidCredentials,
                    anyhow!("Current password is incorrect"),
                ));
            }

            user.password_hash =
                hash_password_with_cost(password, state.password_config.bcrypt_cost)?;
            user.reset_password_token = None;
            user.reset_password_expires = None;
        }

        Self::apply_identity_changes(state, &mut user, dto.name, dto.email, dto.cpf).await?;

        user.touch();
        let user = state.users.update(user).await?;

        info!(user_id = %user.id, "Profile updated");
        Ok(user.profile())
    }

    /// Soft-deactivates an account. Admin accounts are never deactivated.
    /// Deactivating an inactive account is a no-op.
    #[instrument(skip(state, actor), fields(actor_id = %actor.id))]
    pub async fn deactivate_user(
        state: &AppState,
        actor: &UserProfile,
        id: Uuid,
    ) -> Result<UserProfile, AppError> {
        let mut user = Self::load(state, id).await?;
        ensure_can_manage(actor, &user)?;

        if user.is_admin() {
            return Err(AppError::forbidden("Admin accounts cannot be deactivated"));
        }

        if !user.active {
            return Ok(user.profile());
        }

        user.active = false;
        user.touch();
        let user = state.users.update(user).await?;

        info!(user_id = %user.id, "User deactivated");
        Ok(user.profile())
    }

    #[instrument(skip(state, actor), fields(actor_id = %actor.id))]
    pub async fn reactivate_user(
        state: &AppState,
        actor: &UserProfile,
        id: Uuid,
    ) -> Result<UserProfile, AppError> {
        ensure_admin(actor)?;

        let mut user = Self::load(state, id).await?;
        if user.active {
            return Ok(user.profile());
        }

        user.active = true;
        user.touch();
        let user = state.users.update(user).await?;

        info!(user_id = %user.id, "User reactivated");
        Ok(user.profile())
    }

    /// Hard delete, admin only. A trainer with students must be emptied
    /// first; the repository checks this atomically with the removal.
    #[instrument(skip(state, actor), fields(actor_id = %actor.id))]
    pub async fn delete_user(
        state: &AppState,
        actor: &UserProfile,
        id: Uuid,
    ) -> Result<(), AppError> {
        ensure_admin(actor)?;

        if actor.id == id {
            return Err(AppError::validation("You cannot delete your own account"));
        }

        Self::load(state, id).await?;

        if !state.users.delete_if_no_students(id).await? {
            return Err(AppError::user_not_found(id));
        }

        info!(user_id = %id, "User deleted");
        Ok(())
    }

    /// Students of `trainer_id`, visible to admins and to that trainer.
    pub async fn list_students(
        state: &AppState,
        actor: &UserProfile,
        trainer_id: Uuid,
    ) -> Result<Vec<UserProfile>, AppError> {
        let trainer = Self::load(state, trainer_id).await?;
        if !trainer.is_trainer() {
            return Err(AppError::validation(format!(
                "User with ID {} is not a trainer",
                trainer_id
            )));
        }

        if actor.user_type != UserType::Admin && actor.id != trainer_id {
            return Err(AppError::forbidden(
                "You can only list your own students",
            ));
        }

        let students = state.users.find_students_by_trainer(trainer_id).await?;
        Ok(students.iter().map(UserProfile::from).collect())
    }

    /// Fails with the matching conflict if `email` or `cpf` belongs to an
    /// account other than `exclude_id`.
    pub(crate) async fn ensure_identity_available(
        state: &AppState,
        email: &str,
        cpf: &str,
        exclude_id: Option<Uuid>,
    ) -> Result<(), AppError> {
        let email = normalize_email(email);
        if state.users.email_exists(&email, exclude_id).await? {
            return Err(AppError::email_taken(&email));
        }

        let cpf = normalize_cpf(cpf);
        if state.users.cpf_exists(&cpf, exclude_id).await? {
            return Err(AppError::cpf_taken(&cpf));
        }

        Ok(())
    }

    async fn load(state: &AppState, id: Uuid) -> Result<User, AppError> {
        state
            .users
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::user_not_found(id))
    }

    /// Checks that `trainer_id` may be attached to an account of
    /// `user_type`.
    async fn resolve_trainer(
        state: &AppState,
        subject_id: Option<Uuid>,
        user_type: UserType,
        trainer_id: Option<Uuid>,
    ) -> Result<Option<Uuid>, AppError> {
        let Some(trainer_id) = trainer_id else {
            return Ok(None);
        };

        if user_type != UserType::Student {
            return Err(AppError::validation(
                "Only students can be assigned to a trainer",
            ));
        }

        // The account being written is never its own trainer, whatever
        // type it holds before the write.
        if subject_id == Some(trainer_id) {
            return Err(AppError::validation("The specified user is not a trainer"));
        }

        let trainer = state
            .users
            .find_by_id(trainer_id)
            .await?
            .ok_or_else(|| AppError::validation("Trainer not found"))?;

        if !trainer.is_trainer() {
            return Err(AppError::validation("The specified user is not a trainer"));
        }

        Ok(Some(trainer_id))
    }

    async fn apply_identity_changes(
        state: &AppState,
        user: &mut User,
        name: Option<String>,
        email: Option<String>,
        cpf: Option<String>,
    ) -> Result<(), AppError> {
        if let Some(name) = name {
            user.name = name.trim().to_string();
        }

        if let Some(email) = email {
            let email = normalize_email(&email);
            if email != user.email {
                if state.users.email_exists(&email, Some(user.id)).await? {
                    return Err(AppError::email_taken(&email));
                }
                user.email = email;
            }
        }

        if let Some(cpf) = cpf {
            let cpf = normalize_cpf(&cpf);
            if cpf != user.cpf {
                if state.users.cpf_exists(&cpf, Some(user.id)).await? {
                    return Err(AppError::cpf_taken(&cpf));
                }
                user.cpf = cpf;
            }
        }

        Ok(())
    }
}

fn ensure_admin(actor: &UserProfile) -> Result<(), AppError> {
    if actor.user_type == UserType::Admin {
        Ok(())
    } else {
        Err(AppError::forbidden("Insufficient permissions"))
    }
}
