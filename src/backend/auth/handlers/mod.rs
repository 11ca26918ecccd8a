//! Admin auth HTTP handlers

pub mod types;
pub mod login;
pub mod logout;

pub use login::login;
pub use logout::logout;
pub use types::{LoginRequest, LogoutResponse};
