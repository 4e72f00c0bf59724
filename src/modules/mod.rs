pub mod auth;
pub mod users;

pub use self::auth::service::AuthService;
pub use self::users::service::UserService;
