use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

use crate::{EdgeError, EdgeResult};

/// One value of a header as CloudFront represents it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderEntry {
    /// Header name as sent on the wire; optional in events
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    pub value: String,
}

impl HeaderEntry {
    pub fn new(key: &str, value: impl Into<String>) -> Self {
        Self {
            key: Some(key.to_string()),
            value: value.into(),
        }
    }
}

/// Lower-cased header name to its values, in the order CloudFront received them
pub type Headers = HashMap<String, Vec<HeaderEntry>>;

/// Origin response handed to an origin-response trigger
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloudFrontResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<Headers>,
    /// Everything else (statusDescription, body, ...) passes through untouched
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CloudFrontConfig {
    #[serde(default)]
    pub distribution_domain_name: Option<String>,
    #[serde(default)]
    pub distribution_id: Option<String>,
    #[serde(default)]
    pub event_type: Option<String>,
    #[serde(default)]
    pub request_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloudFrontPayload {
    #[serde(default)]
    pub config: Option<CloudFrontConfig>,
    #[serde(default)]
    pub request: Option<Value>,
    #[serde(default)]
    pub response: Option<CloudFrontResponse>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloudFrontRecord {
    pub cf: CloudFrontPayload,
}

/// Lambda@Edge event; CloudFront always sends exactly one record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloudFrontEvent {
    #[serde(rename = "Records")]
    pub records: Vec<CloudFrontRecord>,
}

impl CloudFrontEvent {
    /// Take ownership of `Records[0].cf.response`
    pub fn into_origin_response(self) -> EdgeResult<CloudFrontResponse> {
        let record = self.records.into_iter().next().ok_or(EdgeError::MissingRecord)?;
        record.cf.response.ok_or(EdgeError::MissingResponse)
    }
}
