pub mod config;
pub mod custom_resource;
pub mod errors;
pub mod models;
pub mod services;

pub use config::*;
pub use custom_resource::*;
pub use errors::*;
pub use models::*;
pub use services::*;
