//! Demo data generation.
//!
//! Produces trainers and students with fake names, sequential CPFs and
//! predictable emails. Every account shares one password hash.

use fake::Fake;
use fake::faker::name::en::Name;
use physipro_core::UserType;
use physipro_models::{NewUser, User};
use uuid::Uuid;

#[derive(Debug, Clone, Copy)]
pub struct SeedConfig {
    pub trainers: usize,
    pub students_per_trainer: usize,
    /// Students created without a trainer.
    pub unassigned_students: usize,
}

fn fake_name() -> String {
    let name: String = Name().fake();
    if name.trim().chars().count() < 3 {
        format!("{} Silva", name.trim())
    } else {
        name
    }
}

fn seed_cpf(serial: usize) -> String {
    // Offset keeps seeded CPFs away from the bootstrap admin's 000.000.000-00.
    format!("{:011}", 90_000_000_000usize + serial)
}

fn generate_user(
    user_type: UserType,
    trainer_id: Option<Uuid>,
    serial: usize,
    password_hash: &str,
) -> User {
    let prefix = match user_type {
        UserType::Admin => "admin",
        UserType::Trainer => "trainer",
        UserType::Student => "student",
    };

    User::new(NewUser {
        name: fake_name(),
        email: format!("{}{}@physipro.dev", prefix, serial),
        cpf: seed_cpf(serial),
        password_hash: password_hash.to_string(),
        user_type,
        trainer_id,
        active: true,
    })
}

/// Generates trainers first, then their students, then unassigned students.
pub fn generate(config: SeedConfig, password_hash: &str) -> Vec<User> {
    let total = config.trainers * (1 + config.students_per_trainer) + config.unassigned_students;
    let mut users = Vec::with_capacity(total);
    let mut serial = 0;

    let trainers: Vec<User> = (0..config.trainers)
        .map(|_| {
            serial += 1;
            generate_user(UserType::Trainer, None, serial, password_hash)
        })
        .collect();

    for trainer in &trainers {
        for _ in 0..config.students_per_trainer {
            serial += 1;
            users.push(generate_user(
                UserType::Student,
                Some(trainer.id),
                serial,
                password_hash,
            ));
        }
    }

    for _ in 0..config.unassigned_students {
        serial += 1;
        users.push(generate_user(UserType::Student, None, serial, password_hash));
    }

    users.splice(0..0, trainers);
    users
}
