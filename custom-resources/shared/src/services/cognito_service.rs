use aws_sdk_cognitoidentityprovider::{
    error::DisplayErrorContext, types::OAuthFlowType, Client as CognitoClient,
};

use crate::{
    find_client_by_prefix, ClientCredentials, OAuthClientSettings, ProviderError, ProviderResult,
    UserPoolClientSummary,
};

pub struct CognitoService {
    client: CognitoClient,
}

impl CognitoService {
    pub fn new(client: CognitoClient) -> Self {
        Self { client }
    }

    /// List every app client of a user pool, following pagination
    pub async fn list_clients(&self, user_pool_id: &str) -> ProviderResult<Vec<UserPoolClientSummary>> {
        let mut clients = Vec::new();
        let mut next_token: Option<String> = None;

        loop {
            let page = self
                .client
                .list_user_pool_clients()
                .user_pool_id(user_pool_id)
                .max_results(60)
                .set_next_token(next_token.take())
                .send()
                .await
                .map_err(|e| ProviderError::CognitoError(DisplayErrorContext(&e).to_string()))?;

            clients.extend(page.user_pool_clients().iter().filter_map(|c| {
                Some(UserPoolClientSummary {
                    client_id: c.client_id()?.to_string(),
                    client_name: c.client_name().unwrap_or_default().to_string(),
                })
            }));

            match page.next_token() {
                Some(token) if !token.is_empty() => next_token = Some(token.to_string()),
                _ => break,
            }
        }

        tracing::info!("Found {} app clients in pool {}", clients.len(), user_pool_id);
        Ok(clients)
    }

    /// Locate the app client whose name starts with `prefix` and fetch its secret
    pub async fn find_client_credentials(
        &self,
        user_pool_id: &str,
        prefix: &str,
    ) -> ProviderResult<ClientCredentials> {
        let clients = self.list_clients(user_pool_id).await?;

        let client_id = find_client_by_prefix(&clients, prefix)
            .map(|c| c.client_id.clone())
            .ok_or_else(|| {
                ProviderError::ClientNotFound(format!(
                    "no client starting with '{}' in pool {}",
                    prefix, user_pool_id
                ))
            })?;

        tracing::info!("Using app client {} from pool {}", client_id, user_pool_id);

        let client_secret = self.client_secret(user_pool_id, &client_id).await?;

        Ok(ClientCredentials {
            client_id,
            client_secret,
        })
    }

    pub async fn client_secret(&self, user_pool_id: &str, client_id: &str) -> ProviderResult<String> {
        let output = self
            .client
            .describe_user_pool_client()
            .user_pool_id(user_pool_id)
            .client_id(client_id)
            .send()
            .await
            .map_err(|e| ProviderError::CognitoError(DisplayErrorContext(&e).to_string()))?;

        output
            .user_pool_client()
            .and_then(|c| c.client_secret())
            .map(str::to_string)
            .ok_or_else(|| {
                ProviderError::ClientNotFound(format!("client {} has no secret", client_id))
            })
    }

    /// Replace the hosted UI settings of an app client.
    /// Attributes not passed here are reset by Cognito.
    pub async fn update_oauth_settings(
        &self,
        user_pool_id: &str,
        client_id: &str,
        settings: &OAuthClientSettings,
    ) -> ProviderResult<()> {
        self.client
            .update_user_pool_client()
            .user_pool_id(user_pool_id)
            .client_id(client_id)
            .set_callback_urls(Some(settings.callback_urls.clone()))
            .set_logout_urls(Some(settings.logout_urls.clone()))
            .set_supported_identity_providers(Some(settings.supported_identity_providers.clone()))
            .allowed_o_auth_flows(OAuthFlowType::Code)
            .set_allowed_o_auth_scopes(Some(settings.allowed_scopes.clone()))
            .allowed_o_auth_flows_user_pool_client(true)
            .send()
            .await
            .map_err(|e| ProviderError::CognitoError(DisplayErrorContext(&e).to_string()))?;

        tracing::info!("Updated OAuth settings for client {} in pool {}", client_id, user_pool_id);
        Ok(())
    }
}
