pub mod permissions;
pub mod user;

pub use permissions::*;
pub use user::*;
