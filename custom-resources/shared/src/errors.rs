use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Invalid resource properties: {0}")]
    InvalidProperties(String),

    #[error("User pool client not found: {0}")]
    ClientNotFound(String),

    #[error("Cognito error: {0}")]
    CognitoError(String),

    #[error("Lambda error: {0}")]
    LambdaError(String),

    #[error("Response delivery failed: {0}")]
    ResponseDeliveryFailed(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

impl From<serde_json::Error> for ProviderError {
    fn from(err: serde_json::Error) -> Self {
        ProviderError::SerializationError(err.to_string())
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        ProviderError::ResponseDeliveryFailed(err.to_string())
    }
}

pub type ProviderResult<T> = Result<T, ProviderError>;
