use aws_config::BehaviorVersion;
use aws_sdk_lambda::Client as LambdaClient;
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use tracing::{debug, error, info, warn};

use cfn_shared::{
    CustomResourceRequest, CustomResourceResponse, LambdaService, ProviderConfig, ProviderResult,
    PublishVersionProperties, ResourceData, ResponseSender, dispatch,
};

async fn function_handler(
    lambda: &LambdaService,
    sender: &ResponseSender,
    event: LambdaEvent<CustomResourceRequest>,
) -> Result<(), Error> {
    let (request, context) = event.into_parts();

    info!(
        "Received {} request for {} ({})",
        request.request_type, request.logical_resource_id, request.resource_type
    );
    match serde_json::to_string(&request) {
        Ok(json) => debug!("Full event JSON: {}", json),
        Err(e) => debug!("Failed to serialize event: {}", e),
    }

    let outcome = handle_request(lambda, &request).await;

    let response =
        CustomResourceResponse::from_outcome(&request, &context.env_config.log_stream, outcome);
    sender.send(&request.response_url, &response).await?;

    Ok(())
}

/// Published versions are left in place on delete; CloudFront may still reference them
async fn handle_request(
    lambda: &LambdaService,
    request: &CustomResourceRequest,
) -> ProviderResult<ResourceData> {
    let outcome = dispatch(request, || publish_headers_handler(lambda, request)).await;

    match &outcome {
        Ok(data) if !data.is_empty() => info!("Published edge handler version: {:?}", data),
        Ok(_) => {}
        Err(e) => error!("Failed to publish edge handler version: {}", e),
    }

    outcome
}

async fn publish_headers_handler(
    lambda: &LambdaService,
    request: &CustomResourceRequest,
) -> ProviderResult<ResourceData> {
    let props: PublishVersionProperties = request.properties()?;

    info!("Publishing new version of {}", props.function_name);
    let function_arn = lambda.publish_version(&props.function_name).await?;

    Ok(function_arn_data(function_arn))
}

fn function_arn_data(function_arn: String) -> ResourceData {
    let mut data = ResourceData::new();
    data.insert("FunctionArn".to_string(), function_arn);
    data
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let (provider_config, config_error) = ProviderConfig::from_env_or_default();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(provider_config.env_filter())
        .with_target(false)
        .without_time()
        .init();

    if let Some(e) = config_error {
        warn!("Invalid configuration, falling back to defaults: {}", e);
    }

    let config = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let lambda = LambdaService::new(LambdaClient::new(&config));
    let sender = ResponseSender::from_config(&provider_config);

    info!("Starting publish-opensearch-headers-handler Lambda function");

    run(service_fn(|event: LambdaEvent<CustomResourceRequest>| {
        function_handler(&lambda, &sender, event)
    }))
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_lambda::config::{BehaviorVersion, Config, Region};
    use cfn_shared::{ProviderError, ResponseStatus};

    // Never reaches AWS: the cases below return before any call is made
    fn offline_lambda() -> LambdaService {
        let config = Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .build();
        LambdaService::new(LambdaClient::from_conf(config))
    }

    fn request(request_type: &str, properties: serde_json::Value) -> CustomResourceRequest {
        serde_json::from_value(serde_json::json!({
            "RequestType": request_type,
            "ResponseURL": "https://cloudformation-custom-resource-response-useast1.s3.amazonaws.com/signed",
            "StackId": "arn:aws:cloudformation:us-east-1:123456789012:stack/opensearch/guid",
            "RequestId": "req-1",
            "ResourceType": "Custom::PublishOpensearchHeadersHandler",
            "LogicalResourceId": "HeadersHandlerVersion",
            "PhysicalResourceId": "opensearch_HeadersHandlerVersion_AbCdEfGh",
            "ResourceProperties": properties
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_delete_is_noop() {
        let req = request("Delete", serde_json::json!({"OpensearchHeadersHandler": "opensearch-headers"}));

        let data = handle_request(&offline_lambda(), &req).await.unwrap();

        assert!(data.is_empty());
    }

    #[tokio::test]
    async fn test_missing_function_name_fails_resource() {
        let req = request("Create", serde_json::json!({}));

        let outcome = handle_request(&offline_lambda(), &req).await;
        assert!(matches!(outcome, Err(ProviderError::InvalidProperties(_))));

        let response = CustomResourceResponse::from_outcome(&req, "stream", outcome);
        assert_eq!(response.status, ResponseStatus::Failed);
    }

    #[test]
    fn test_function_arn_data() {
        let data = function_arn_data(
            "arn:aws:lambda:us-east-1:123456789012:function:opensearch-headers:7".to_string(),
        );

        assert_eq!(
            data.get("FunctionArn").map(String::as_str),
            Some("arn:aws:lambda:us-east-1:123456789012:function:opensearch-headers:7")
        );
    }

    #[test]
    fn test_properties_from_event() {
        let request: CustomResourceRequest = serde_json::from_value(serde_json::json!({
            "RequestType": "Update",
            "ResponseURL": "https://example.com/response",
            "StackId": "arn:aws:cloudformation:us-east-1:123456789012:stack/opensearch/guid",
            "RequestId": "req-1",
            "ResourceType": "Custom::PublishOpensearchHeadersHandler",
            "LogicalResourceId": "HeadersHandlerVersion",
            "PhysicalResourceId": "opensearch_HeadersHandlerVersion_AbCdEfGh",
            "ResourceProperties": {
                "ServiceToken": "arn:aws:lambda:us-east-1:123456789012:function:publisher",
                "OpensearchHeadersHandler": "opensearch-headers"
            },
            "OldResourceProperties": {
                "OpensearchHeadersHandler": "opensearch-headers"
            }
        }))
        .unwrap();

        let props: PublishVersionProperties = request.properties().unwrap();
        assert_eq!(props.function_name, "opensearch-headers");
        assert!(request.old_resource_properties.is_some());
    }
}
