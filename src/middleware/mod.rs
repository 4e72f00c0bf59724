//! Request extractors for authentication and authorization.
//!
//! - [`auth`]: [`AuthUser`](auth::AuthUser) and the role-gated extractors
//! - [`role`]: Role gates and trainer–student ownership rules
//!
//! # Authentication Flow
//!
//! 1. Client sends `Authorization: Bearer <token>`
//! 2. `AuthUser` verifies the token and reloads the account
//! 3. Missing, inactive or unknown accounts are rejected with 401
//! 4. Role extractors (`RequireAdmin`, `RequireStaff`) reject with 403
//!
//! # Example
//!
//! ```ignore
//! use physipro::middleware::auth::{AuthUser, RequireAdmin};
//!
//! async fn me(auth_user: AuthUser) -> Json<UserProfile> {
//!     Json(auth_user.0)
//! }
//!
//! async fn purge(RequireAdmin(admin): RequireAdmin) -> StatusCode {
//!     // only ADMIN accounts reach this point
//! }
//! ```

pub mod auth;
pub mod role;
