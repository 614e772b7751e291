pub mod auth_service;
pub mod reaper;
pub mod user_service;

pub use auth_service::AuthService;
pub use reaper::Reaper;
pub use user_service::UserService;
