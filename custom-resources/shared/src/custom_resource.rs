use rand::{distributions::Alphanumeric, Rng};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;

use crate::{ProviderError, ProviderResult};

/// Output attributes readable from the stack with `Fn::GetAtt`
pub type ResourceData = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequestType {
    Create,
    Update,
    Delete,
}

impl fmt::Display for RequestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RequestType::Create => "Create",
            RequestType::Update => "Update",
            RequestType::Delete => "Delete",
        };
        write!(f, "{}", name)
    }
}

/// Request sent by CloudFormation to a custom resource provider
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CustomResourceRequest {
    pub request_type: RequestType,
    #[serde(rename = "ResponseURL")]
    pub response_url: String,
    pub stack_id: String,
    pub request_id: String,
    pub resource_type: String,
    pub logical_resource_id: String,
    #[serde(default)]
    pub physical_resource_id: Option<String>,
    #[serde(default)]
    pub resource_properties: Value,
    #[serde(default)]
    pub old_resource_properties: Option<Value>,
    #[serde(default)]
    pub service_token: Option<String>,
}

impl CustomResourceRequest {
    /// Deserialize `ResourceProperties` into the provider's property struct
    pub fn properties<P: DeserializeOwned>(&self) -> ProviderResult<P> {
        serde_json::from_value(self.resource_properties.clone())
            .map_err(|e| ProviderError::InvalidProperties(e.to_string()))
    }

    /// Stack name is the second path segment of the stack ARN
    pub fn stack_name(&self) -> &str {
        self.stack_id.split('/').nth(1).unwrap_or(&self.stack_id)
    }

    /// Physical id reported back to CloudFormation.
    /// Creates get a fresh id, updates and deletes keep the existing one.
    pub fn physical_resource_id(&self) -> String {
        match (&self.request_type, &self.physical_resource_id) {
            (RequestType::Update | RequestType::Delete, Some(id)) => id.clone(),
            _ => format!(
                "{}_{}_{}",
                self.stack_name(),
                self.logical_resource_id,
                random_suffix(8)
            ),
        }
    }
}

fn random_suffix(len: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// Run `provision` for creates and updates. Deletes never touch the resource
/// and always succeed without data.
pub async fn dispatch<F, Fut>(request: &CustomResourceRequest, provision: F) -> ProviderResult<ResourceData>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = ProviderResult<ResourceData>>,
{
    match request.request_type {
        RequestType::Create | RequestType::Update => provision().await,
        RequestType::Delete => {
            tracing::info!("Delete custom resource");
            Ok(ResourceData::new())
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ResponseStatus {
    Success,
    Failed,
}

/// Body PUT to the pre-signed response URL
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CustomResourceResponse {
    pub status: ResponseStatus,
    pub reason: String,
    pub physical_resource_id: String,
    pub stack_id: String,
    pub request_id: String,
    pub logical_resource_id: String,
    pub no_echo: bool,
    pub data: ResourceData,
}

impl CustomResourceResponse {
    pub fn success(request: &CustomResourceRequest, log_stream: &str, data: ResourceData) -> Self {
        Self::new(
            request,
            ResponseStatus::Success,
            format!("See the details in CloudWatch Log Stream: {}", log_stream),
            data,
        )
    }

    pub fn failed(request: &CustomResourceRequest, reason: impl Into<String>) -> Self {
        Self::new(request, ResponseStatus::Failed, reason.into(), ResourceData::new())
    }

    /// Map a provisioning outcome to the response CloudFormation receives.
    /// Bad properties fail the resource; any other error still reports success
    /// without data, so a missing `Fn::GetAtt` attribute surfaces it in the stack.
    pub fn from_outcome(
        request: &CustomResourceRequest,
        log_stream: &str,
        outcome: ProviderResult<ResourceData>,
    ) -> Self {
        match outcome {
            Ok(data) => Self::success(request, log_stream, data),
            Err(e @ ProviderError::InvalidProperties(_)) => Self::failed(request, e.to_string()),
            Err(_) => Self::success(request, log_stream, ResourceData::new()),
        }
    }

    fn new(
        request: &CustomResourceRequest,
        status: ResponseStatus,
        reason: String,
        data: ResourceData,
    ) -> Self {
        Self {
            status,
            reason,
            physical_resource_id: request.physical_resource_id(),
            stack_id: request.stack_id.clone(),
            request_id: request.request_id.clone(),
            logical_resource_id: request.logical_resource_id.clone(),
            no_echo: false,
            data,
        }
    }
}
