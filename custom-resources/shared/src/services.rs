pub mod cognito_service;
pub mod lambda_service;
pub mod response_service;

pub use cognito_service::*;
pub use lambda_service::*;
pub use response_service::*;
