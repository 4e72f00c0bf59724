use std::sync::Arc;

use async_trait::async_trait;
use physipro_core::AppError;
use physipro_models::{User, UserFilter};
use uuid::Uuid;

pub type DynUserRepository = Arc<dyn UserRepository>;

/// Storage operations for [`User`] accounts.
///
/// Implementations enforce email and CPF uniqueness on `create` and
/// `update`, returning `EMAIL_ALREADY_EXISTS` or `CPF_ALREADY_EXISTS`.
/// The same writes also enforce the trainer hierarchy against the stored
/// state: only a student may carry a `trainer_id`, it must name another
/// account of type TRAINER, and a trainer with assigned students keeps its
/// type. Lookups take already-normalized email and CPF values.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: User) -> Result<User, AppError>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    async fn find_by_cpf(&self, cpf: &str) -> Result<Option<User>, AppError>;

    /// Find the account holding a pending reset token with this digest.
    async fn find_by_reset_token(&self, digest: &str) -> Result<Option<User>, AppError>;

    async fn email_exists(&self, email: &str, exclude_id: Option<Uuid>) -> Result<bool, AppError>;

    async fn cpf_exists(&self, cpf: &str, exclude_id: Option<Uuid>) -> Result<bool, AppError>;

    /// Replace the stored account. Fails with `USER_NOT_FOUND` if absent.
    async fn update(&self, user: User) -> Result<User, AppError>;

    /// Hard delete. Returns whether a row was removed.
    async fn delete(&self, id: Uuid) -> Result<bool, AppError>;

    /// Hard delete that fails with `CONFLICT` while any student is still
    /// assigned to `id`. The check and the removal are one atomic step.
    async fn delete_if_no_students(&self, id: Uuid) -> Result<bool, AppError>;

    /// Matching accounts, newest first.
    async fn find_all(&self, filter: &UserFilter) -> Result<Vec<User>, AppError>;

    /// Students assigned to `trainer_id`, newest first.
    async fn find_students_by_trainer(&self, trainer_id: Uuid) -> Result<Vec<User>, AppError>;

    async fn count_students_by_trainer(&self, trainer_id: Uuid) -> Result<usize, AppError> {
        Ok(self.find_students_by_trainer(trainer_id).await?.len())
    }
}
