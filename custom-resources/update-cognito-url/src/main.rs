use aws_config::BehaviorVersion;
use aws_sdk_cognitoidentityprovider::Client as CognitoClient;
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use tracing::{debug, error, info, warn};

use cfn_shared::{
    CognitoService, CognitoUrlProperties, CustomResourceRequest, CustomResourceResponse,
    OAuthClientSettings, ProviderConfig, ProviderResult, ResourceData, ResponseSender, dispatch,
};

async fn function_handler(
    cognito: &CognitoService,
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

    let outcome = handle_request(cognito, &request).await;

    let response =
        CustomResourceResponse::from_outcome(&request, &context.env_config.log_stream, outcome);
    sender.send(&request.response_url, &response).await?;

    Ok(())
}

async fn handle_request(
    cognito: &CognitoService,
    request: &CustomResourceRequest,
) -> ProviderResult<ResourceData> {
    let outcome = dispatch(request, || update_cognito_url(cognito, request)).await;

    if let Err(e) = &outcome {
        error!("Failed to update Cognito callback URLs: {}", e);
    }

    outcome
}

async fn update_cognito_url(
    cognito: &CognitoService,
    request: &CustomResourceRequest,
) -> ProviderResult<ResourceData> {
    let props: CognitoUrlProperties = request.properties()?;
    let settings = settings_for(&props);

    info!("Callback URLs for client {}: {:?}", props.client_id, settings.callback_urls);
    info!("Logout URLs for client {}: {:?}", props.client_id, settings.logout_urls);

    cognito
        .update_oauth_settings(&props.user_pool_id, &props.client_id, &settings)
        .await?;
    info!("Successfully updated Cognito callback URLs");

    // Nothing to expose to the stack
    Ok(ResourceData::new())
}

fn settings_for(props: &CognitoUrlProperties) -> OAuthClientSettings {
    OAuthClientSettings::for_distribution(
        props.cloud_front_domain_name.trim_end_matches('/'),
        props.proxy_public_dns_name.trim_end_matches('/'),
    )
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
    let cognito = CognitoService::new(CognitoClient::new(&config));
    let sender = ResponseSender::from_config(&provider_config);

    info!("Starting update-cognito-url Lambda function");

    run(service_fn(|event: LambdaEvent<CustomResourceRequest>| {
        function_handler(&cognito, &sender, event)
    }))
    .await
}
