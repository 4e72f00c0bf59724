//! # PhysiPro Accounts
//!
//! User management for PhysiPro: registration, authentication,
//! authorization and administration of three account classes with a
//! trainer–student hierarchy.
//!
//! ## Architecture
//!
//! ```text
//! crates/
//! ├── physipro-core/    # AppError, bcrypt, field validation, UserType
//! ├── physipro-config/  # JwtConfig, PasswordConfig, EmailConfig
//! ├── physipro-auth/    # Access tokens and reset tokens
//! ├── physipro-models/  # User, UserProfile, DTOs
//! ├── physipro-db/      # UserRepository + in-memory store
//! └── physipro-cli/     # Operator CLI
//! src/
//! ├── middleware/       # AuthUser extractor, role and ownership rules
//! ├── modules/
//! │   ├── auth/         # register, login, password reset, change password
//! │   └── users/        # CRUD, activation, trainer rosters
//! └── utils/            # Email delivery
//! ```
//!
//! Each feature module has a `service.rs` holding the business rules and a
//! `controller.rs` with axum handlers that delegate to it. Mounting the
//! handlers on a router is left to the embedding application.
//!
//! ## Account Classes
//!
//! ```text
//! ADMIN    creates anyone, manages anyone, deletes accounts
//!   ↓
//! TRAINER  creates and manages own STUDENTs
//!   ↓
//! STUDENT  self-service only
//! ```
//!
//! ## Authentication
//!
//! Login and registration return an HS256 access token (default lifetime
//! 24 hours). Every authenticated request reloads the account, so
//! deactivation is effective immediately.
//!
//! Password resets use a one-time token emailed to the user. Only its
//! SHA-256 digest is stored, it expires after `RESET_TOKEN_TTL` seconds
//! (default 1 hour), and requesting a reset for an unknown email is
//! indistinguishable from a real request.
//!
//! ## Environment Variables
//!
//! ```bash
//! JWT_SECRET=your-secure-secret-key
//! JWT_ACCESS_EXPIRY=86400
//! RESET_TOKEN_TTL=3600
//! BCRYPT_COST=12
//! SMTP_ENABLED=false
//! FRONTEND_URL=http://localhost:3000
//! RUST_LOG=physipro=info
//! LOG_FORMAT=json
//! ```

pub mod logging;
pub mod middleware;
pub mod modules;
pub mod state;
pub mod utils;

// Re-export workspace crates for convenience
pub use physipro_auth;
pub use physipro_config;
pub use physipro_core;
pub use physipro_db;
pub use physipro_models;
