use aws_config::BehaviorVersion;
use aws_sdk_cognitoidentityprovider::Client as CognitoClient;
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use tracing::{debug, error, info, warn};

use cfn_shared::{
    ClientCredentials, ClientRetrievalProperties, CognitoService, CustomResourceRequest,
    CustomResourceResponse, ProviderConfig, ProviderResult, ResourceData, ResponseSender,
    dispatch,
};

async fn function_handler(
    cognito: &CognitoService,
    sender: &ResponseSender,
    provider_config: &ProviderConfig,
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

    let outcome = handle_request(cognito, &request, &provider_config.opensearch_client_prefix).await;

    let response =
        CustomResourceResponse::from_outcome(&request, &context.env_config.log_stream, outcome);
    sender.send(&request.response_url, &response).await?;

    Ok(())
}

async fn handle_request(
    cognito: &CognitoService,
    request: &CustomResourceRequest,
    prefix: &str,
) -> ProviderResult<ResourceData> {
    let outcome = dispatch(request, || retrieve_cognito_client(cognito, request, prefix)).await;

    match &outcome {
        Ok(data) if !data.is_empty() => info!("Successfully retrieved OpenSearch app client"),
        Ok(_) => {}
        Err(e) => error!("Failed to retrieve OpenSearch app client: {}", e),
    }

    outcome
}

async fn retrieve_cognito_client(
    cognito: &CognitoService,
    request: &CustomResourceRequest,
    prefix: &str,
) -> ProviderResult<ResourceData> {
    let props: ClientRetrievalProperties = request.properties()?;

    info!("Looking up '{}' app client in pool {}", prefix, props.user_pool_id);

    let credentials = cognito
        .find_client_credentials(&props.user_pool_id, prefix)
        .await?;

    Ok(credentials_data(credentials))
}

/// Attributes exposed to the stack; the secret is never logged
fn credentials_data(credentials: ClientCredentials) -> ResourceData {
    let mut data = ResourceData::new();
    data.insert("ClientId".to_string(), credentials.client_id);
    data.insert("ClientSecret".to_string(), credentials.client_secret);
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

    // Clients live for the whole execution environment and are reused across invocations
    let config = aws_config::load_defaults(BehaviorVersion::latest()).await;
    let cognito = CognitoService::new(CognitoClient::new(&config));
    let sender = ResponseSender::from_config(&provider_config);

    info!("Starting cognito-client-retrieval Lambda function");

    run(service_fn(|event: LambdaEvent<CustomResourceRequest>| {
        function_handler(&cognito, &sender, &provider_config, event)
    }))
    .await
}
