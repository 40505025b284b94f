use aws_sdk_lambda::{error::DisplayErrorContext, Client as LambdaClient};

use crate::{ProviderError, ProviderResult};

pub struct LambdaService {
    client: LambdaClient,
}

impl LambdaService {
    pub fn new(client: LambdaClient) -> Self {
        Self { client }
    }

    /// Publish a new version of a function and return its versioned ARN
    pub async fn publish_version(&self, function_name: &str) -> ProviderResult<String> {
        let output = self
            .client
            .publish_version()
            .function_name(function_name)
            .send()
            .await
            .map_err(|e| ProviderError::LambdaError(DisplayErrorContext(&e).to_string()))?;

        let function_arn = output.function_arn().ok_or_else(|| {
            ProviderError::LambdaError(format!("no FunctionArn returned for {}", function_name))
        })?;

        tracing::info!("Published version {:?} of {}", output.version(), function_name);
        Ok(function_arn.to_string())
    }
}
