//! Identity-domain models: persisted users, login accounts, and redacted secrets.

pub mod login;
pub mod secret;
pub mod user;

pub use login::*;
pub use secret::*;
pub use user::*;
