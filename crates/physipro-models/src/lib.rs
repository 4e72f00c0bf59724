//! # PhysiPro Models
//!
//! Domain models and DTOs for PhysiPro.
//!
//! - [`users`]: The `User` entity, its public [`UserProfile`] projection,
//!   administrative DTOs and list filters
//! - [`auth`]: Registration, login and password-reset payloads
//!
//! JSON field names are camelCase on the wire (`userType`, `trainerId`,
//! `createdAt`).

pub mod auth;
pub mod users;

pub use auth::{
    AuthResponse, ChangePasswordRequest, ForgotPasswordRequest, LoginRequest, MessageResponse,
    RegisterRequest, ResetPasswordRequest,
};
pub use physipro_core::UserType;
pub use users::{
    CreateUserDto, NewUser, UpdateProfileDto, UpdateUserDto, User, UserFilter, UserProfile,
};
