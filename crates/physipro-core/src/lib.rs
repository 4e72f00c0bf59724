//! # PhysiPro Core
//!
//! Core types, errors, and validation rules shared by every PhysiPro crate.
//!
//! - [`errors`]: Application error type with stable error codes and HTTP response conversion
//! - [`password`]: bcrypt password hashing and verification
//! - [`roles`]: The three account classes (`ADMIN`, `TRAINER`, `STUDENT`)
//! - [`serde`]: Deserializers for optional and nullable identifiers
//! - [`validation`]: Field rules for names, emails, CPFs, and passwords
//!
//! # Example
//!
//! ```ignore
//! use physipro_core::errors::AppError;
//! use physipro_core::password::{hash_password, verify_password};
//!
//! let hash = hash_password("secret123")?;
//! assert!(verify_password("secret123", &hash)?);
//!
//! let error = AppError::user_not_found(user_id);
//! ```

pub mod errors;
pub mod password;
pub mod roles;
pub mod serde;
pub mod validation;

pub use errors::{AppError, ErrorCode};
pub use password::{hash_password, verify_password};
pub use roles::UserType;
