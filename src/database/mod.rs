pub mod schema;
pub mod seed;

pub use schema::*;
pub use seed::*;
