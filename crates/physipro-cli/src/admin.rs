use physipro_core::validation::{is_strong_password, is_valid_cpf, is_valid_email, is_valid_name};
use physipro_core::{AppError, UserType, password::hash_password_with_cost};
use physipro_models::{NewUser, User};

pub const DEFAULT_ADMIN_NAME: &str = "Admin User";
pub const DEFAULT_ADMIN_EMAIL: &str = "admin@physipro.com";
pub const DEFAULT_ADMIN_CPF: &str = "000.000.000-00";

#[derive(Debug, Clone)]
pub struct AdminSeed {
    pub name: String,
    pub email: String,
    pub cpf: String,
    pub password: String,
}

/// Validates the seed and returns an active ADMIN with a hashed password.
pub fn build_admin(seed: &AdminSeed, bcrypt_cost: u32) -> Result<User, AppError> {
    if !is_valid_name(&seed.name) {
        return Err(AppError::validation("Name must be between 3 and 100 characters"));
    }
    if !is_valid_email(&seed.email) {
        return Err(AppError::validation("Invalid email format"));
    }
    if !is_valid_cpf(&seed.cpf) {
        return Err(AppError::validation("CPF must contain 11 digits"));
    }
    if !is_strong_password(&seed.password) {
        return Err(AppError::validation(
            "Password must be at least 8 characters long and contain at least one letter and one number",
        ));
    }

    Ok(User::new(NewUser {
        name: seed.name.clone(),
        email: seed.email.clone(),
        cpf: seed.cpf.clone(),
        password_hash: hash_password_with_cost(&seed.password, bcrypt_cost)?,
        user_type: UserType::Admin,
        trainer_id: None,
        active: true,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use physipro_core::verify_password;

    fn seed(password: &str) -> AdminSeed {
        AdminSeed {
            name: DEFAULT_ADMIN_NAME.into(),
            email: DEFAULT_ADMIN_EMAIL.into(),
            cpf: DEFAULT_ADMIN_CPF.into(),
            password: password.into(),
        }
    }

    #[test]
    fn builds_active_admin() {
        let admin = build_admin(&seed("admin1234"), 4).unwrap();

        assert_eq!(admin.user_type, UserType::Admin);
        assert!(admin.active);
        assert_eq!(admin.cpf, "00000000000");
        assert!(verify_password("admin1234", &admin.password_hash).unwrap());
    }

    #[test]
    fn rejects_weak_password() {
        assert!(build_admin(&seed("admin"), 4).is_err());
    }
}
