pub mod cookies;
pub mod errors;
pub mod models;

pub use cookies::*;
pub use errors::*;
pub use models::*;
