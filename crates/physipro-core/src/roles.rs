use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Account class. Serialized as `"ADMIN"`, `"TRAINER"` or `"STUDENT"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserType {
    Admin,
    Trainer,
    #[default]
    Student,
}

impl UserType {
    pub const ALL: [UserType; 3] = [UserType::Admin, UserType::Trainer, UserType::Student];

    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::Admin => "ADMIN",
            UserType::Trainer => "TRAINER",
            UserType::Student => "STUDENT",
        }
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ADMIN" => Ok(UserType::Admin),
            "TRAINER" => Ok(UserType::Trainer),
            "STUDENT" => Ok(UserType::Student),
            other => Err(format!("Unknown user type: {}", other)),
        }
    }
}
