use std::collections::HashMap;

use async_trait::async_trait;
use physipro_core::AppError;
use physipro_models::{User, UserFilter, UserType};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use crate::repository::UserRepository;

/// Process-local [`UserRepository`] backed by a `HashMap`.
///
/// Uniqueness and hierarchy checks run under the same write lock as the
/// write they guard. Two concurrent registrations with the same email
/// cannot both succeed, and a student cannot be attached to a trainer
/// that is being deleted or demoted at the same moment.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(users: impl IntoIterator<Item = User>) -> Self {
        Self {
            users: RwLock::new(users.into_iter().map(|u| (u.id, u)).collect()),
        }
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

fn ensure_unique(users: &HashMap<Uuid, User>, candidate: &User) -> Result<(), AppError> {
    let others = move || users.values().filter(move |u| u.id != candidate.id);

    if others().any(|u| u.email == candidate.email) {
        return Err(AppError::email_taken(&candidate.email));
    }
    if others().any(|u| u.cpf == candidate.cpf) {
        return Err(AppError::cpf_taken(&candidate.cpf));
    }
    Ok(())
}

fn has_students(users: &HashMap<Uuid, User>, trainer_id: Uuid) -> bool {
    users
        .values()
        .any(|u| u.id != trainer_id && u.trainer_id == Some(trainer_id))
}

fn ensure_hierarchy(users: &HashMap<Uuid, User>, candidate: &User) -> Result<(), AppError> {
    if let Some(trainer_id) = candidate.trainer_id {
        if candidate.user_type != UserType::Student {
            return Err(AppError::validation(
                "Only students can be assigned to a trainer",
            ));
        }
        let Some(trainer) = users.get(&trainer_id) else {
            return Err(AppError::validation("Trainer not found"));
        };
        if trainer.id == candidate.id || !trainer.is_trainer() {
            return Err(AppError::validation("The specified user is not a trainer"));
        }
    }

    if candidate.user_type != UserType::Trainer && has_students(users, candidate.id) {
        return Err(AppError::conflict(
            "Cannot change the type of a trainer with assigned students",
        ));
    }
    Ok(())
}

fn newest_first(mut users: Vec<User>) -> Vec<User> {
    users.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    users
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> Result<User, AppError> {
        let mut users = self.users.write().await;
        ensure_unique(&users, &user)?;
        ensure_hierarchy(&users, &user)?;
        debug!(user_id = %user.id, user_type = %user.user_type, "Inserting user");
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_cpf(&self, cpf: &str) -> Result<Option<User>, AppError> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.cpf == cpf).cloned())
    }

    async fn find_by_reset_token(&self, digest: &str) -> Result<Option<User>, AppError> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|u| u.reset_password_token.as_deref() == Some(digest))
            .cloned())
    }

    async fn email_exists(&self, email: &str, exclude_id: Option<Uuid>) -> Result<bool, AppError> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .any(|u| u.email == email && Some(u.id) != exclude_id))
    }

    async fn cpf_exists(&self, cpf: &str, exclude_id: Option<Uuid>) -> Result<bool, AppError> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .any(|u| u.cpf == cpf && Some(u.id) != exclude_id))
    }

    async fn update(&self, user: User) -> Result<User, AppError> {
        let mut users = self.users.write().await;
        if !users.contains_key(&user.id) {
            return Err(AppError::user_not_found(user.id));
        }
        ensure_unique(&users, &user)?;
        ensure_hierarchy(&users, &user)?;
        users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        Ok(self.users.write().await.remove(&id).is_some())
    }

    async fn delete_if_no_students(&self, id: Uuid) -> Result<bool, AppError> {
        let mut users = self.users.write().await;
        if has_students(&users, id) {
            return Err(AppError::conflict(
                "Cannot delete trainer with assigned students",
            ));
        }
        Ok(users.remove(&id).is_some())
    }

    async fn find_all(&self, filter: &UserFilter) -> Result<Vec<User>, AppError> {
        let users = self.users.read().await;
        Ok(newest_first(
            users.values().filter(|u| filter.matches(u)).cloned().collect(),
        ))
    }

    async fn find_students_by_trainer(&self, trainer_id: Uuid) -> Result<Vec<User>, AppError> {
        let users = self.users.read().await;
        Ok(newest_first(
            users
                .values()
                .filter(|u| u.user_type == UserType::Student && u.trainer_id == Some(trainer_id))
                .cloned()
                .collect(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use physipro_core::ErrorCode;
    use physipro_models::NewUser;

    fn user(email: &str, cpf: &str, user_type: UserType, trainer_id: Option<Uuid>) -> User {
        User::new(NewUser {
            name: "Fulano de Tal".into(),
            email: email.into(),
            cpf: cpf.into(),
            password_hash: "$2b$04$hash".into(),
            user_type,
            trainer_id,
            active: true,
        })
    }

    #[tokio::test]
    async fn create_and_find() {
        let repo = InMemoryUserRepository::new();
        let created = repo
            .create(user("a@physipro.com", "11111111111", UserType::Admin, None))
            .await
            .unwrap();

        assert_eq!(repo.find_by_id(created.id).await.unwrap(), Some(created.clone()));
        assert_eq!(
            repo.find_by_email("a@physipro.com").await.unwrap().map(|u| u.id),
            Some(created.id)
        );
        assert_eq!(
            repo.find_by_cpf("11111111111").await.unwrap().map(|u| u.id),
            Some(created.id)
        );
        assert!(repo.find_by_id(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn create_rejects_duplicates() {
        let repo = InMemoryUserRepository::new();
        repo.create(user("a@physipro.com", "11111111111", UserType::Admin, None))
            .await
            .unwrap();

        let err = repo
            .create(user("a@physipro.com", "22222222222", UserType::Admin, None))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::EmailAlreadyExists);

        let err = repo
            .create(user("b@physipro.com", "11111111111", UserType::Admin, None))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::CpfAlreadyExists);
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn exists_checks_honor_exclusion() {
        let repo = InMemoryUserRepository::new();
        let a = repo
            .create(user("a@physipro.com", "11111111111", UserType::Admin, None))
            .await
            .unwrap();

        assert!(repo.email_exists("a@physipro.com", None).await.unwrap());
        assert!(!repo.email_exists("a@physipro.com", Some(a.id)).await.unwrap());
        assert!(repo.cpf_exists("11111111111", None).await.unwrap());
        assert!(!repo.cpf_exists("11111111111", Some(a.id)).await.unwrap());
    }

    #[tokio::test]
    async fn update_unknown_user_fails() {
        let repo = InMemoryUserRepository::new();
        let err = repo
            .update(user("a@physipro.com", "11111111111", UserType::Admin, None))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::UserNotFound);
    }

    #[tokio::test]
    async fn update_cannot_steal_email() {
        let repo = InMemoryUserRepository::new();
        repo.create(user("a@physipro.com", "11111111111", UserType::Admin, None))
            .await
            .unwrap();
        let mut b = repo
            .create(user("b@physipro.com", "22222222222", UserType::Trainer, None))
            .await
            .unwrap();

        b.email = "a@physipro.com".into();
        let err = repo.update(b).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::EmailAlreadyExists);
    }

    #[tokio::test]
    async fn reset_token_lookup() {
        let repo = InMemoryUserRepository::new();
        let mut a = user("a@physipro.com", "11111111111", UserType::Student, None);
        a.set_reset_token("deadbeef".into(), chrono::Utc::now());
        repo.create(a.clone()).await.unwrap();

        assert_eq!(
            repo.find_by_reset_token("deadbeef").await.unwrap().map(|u| u.id),
            Some(a.id)
        );
        assert!(repo.find_by_reset_token("cafebabe").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn listing_is_newest_first_and_filtered() {
        let trainer = user("t@physipro.com", "33333333333", UserType::Trainer, None);
        let mut older = user("s1@physipro.com", "44444444444", UserType::Student, Some(trainer.id));
        older.created_at -= Duration::hours(2);
        let mut newer = user("s2@physipro.com", "55555555555", UserType::Student, Some(trainer.id));
        newer.created_at -= Duration::hours(1);
        let loner = user("s3@physipro.com", "66666666666", UserType::Student, None);

        let repo = InMemoryUserRepository::with_users([
            trainer.clone(),
            older.clone(),
            newer.clone(),
            loner,
        ]);

        let students = repo.find_students_by_trainer(trainer.id).await.unwrap();
        assert_eq!(
            students.iter().map(|u| u.id).collect::<Vec<_>>(),
            vec![newer.id, older.id]
        );
        assert_eq!(repo.count_students_by_trainer(trainer.id).await.unwrap(), 2);

        let filter = UserFilter {
            user_type: Some(UserType::Student),
            ..Default::default()
        };
        assert_eq!(repo.find_all(&filter).await.unwrap().len(), 3);
        assert_eq!(repo.find_all(&UserFilter::default()).await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn delete_reports_removal() {
        let repo = InMemoryUserRepository::new();
        let a = repo
            .create(user("a@physipro.com", "11111111111", UserType::Admin, None))
            .await
            .unwrap();

        assert!(repo.delete(a.id).await.unwrap());
        assert!(!repo.delete(a.id).await.unwrap());
        assert!(repo.is_empty().await);
    }

    #[tokio::test]
    async fn delete_refuses_trainer_with_students() {
        let repo = InMemoryUserRepository::new();
        let trainer = repo
            .create(user("t@physipro.com", "33333333333", UserType::Trainer, None))
            .await
            .unwrap();
        let student = repo
            .create(user("s@physipro.com", "44444444444", UserType::Student, Some(trainer.id)))
            .await
            .unwrap();

        let err = repo.delete_if_no_students(trainer.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Conflict);
        assert!(repo.find_by_id(trainer.id).await.unwrap().is_some());

        assert!(repo.delete_if_no_students(student.id).await.unwrap());
        assert!(repo.delete_if_no_students(trainer.id).await.unwrap());
        assert!(!repo.delete_if_no_students(trainer.id).await.unwrap());
    }

    #[tokio::test]
    async fn writes_require_an_existing_trainer() {
        let repo = InMemoryUserRepository::new();
        let other = repo
            .create(user("o@physipro.com", "33333333333", UserType::Student, None))
            .await
            .unwrap();

        let err = repo
            .create(user("s@physipro.com", "44444444444", UserType::Student, Some(Uuid::new_v4())))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.message(), "Trainer not found");

        let err = repo
            .create(user("s@physipro.com", "44444444444", UserType::Student, Some(other.id)))
            .await
            .unwrap_err();
        assert_eq!(err.message(), "The specified user is not a trainer");

        let err = repo
            .create(user("t@physipro.com", "55555555555", UserType::Trainer, Some(other.id)))
            .await
            .unwrap_err();
        assert_eq!(err.message(), "Only students can be assigned to a trainer");
        assert_eq!(repo.len().await, 1);
    }

    #[tokio::test]
    async fn update_rejects_self_assignment() {
        let repo = InMemoryUserRepository::new();
        let mut trainer = repo
            .create(user("t@physipro.com", "33333333333", UserType::Trainer, None))
            .await
            .unwrap();

        trainer.user_type = UserType::Student;
        trainer.trainer_id = Some(trainer.id);
        let err = repo.update(trainer.clone()).await.unwrap_err();
        assert_eq!(err.message(), "The specified user is not a trainer");

        let stored = repo.find_by_id(trainer.id).await.unwrap().unwrap();
        assert_eq!(stored.user_type, UserType::Trainer);
        assert_eq!(stored.trainer_id, None);
    }

    #[tokio::test]
    async fn update_keeps_trainer_with_students() {
        let repo = InMemoryUserRepository::new();
        let mut trainer = repo
            .create(user("t@physipro.com", "33333333333", UserType::Trainer, None))
            .await
            .unwrap();
        repo.create(user("s@physipro.com", "44444444444", UserType::Student, Some(trainer.id)))
            .await
            .unwrap();

        trainer.user_type = UserType::Admin;
        let err = repo.update(trainer).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Conflict);
    }
}
