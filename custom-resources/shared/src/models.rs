use serde::{Deserialize, Serialize};

/// Resource properties of the Cognito client retrieval resource
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientRetrievalProperties {
    #[serde(rename = "UserPoolId")]
    pub user_pool_id: String,
}

/// Resource properties of the Cognito callback URL resource
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CognitoUrlProperties {
    #[serde(rename = "UserPoolId")]
    pub user_pool_id: String,
    #[serde(rename = "ClientId")]
    pub client_id: String,
    #[serde(rename = "CloudFrontDistributionUrl")]
    pub cloud_front_domain_name: String,
    #[serde(rename = "EC2ProxyPublicDnsName")]
    pub proxy_public_dns_name: String,
}

/// Resource properties of the edge handler version publisher
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishVersionProperties {
    #[serde(rename = "OpensearchHeadersHandler")]
    pub function_name: String,
}

/// The fields of a Cognito app client we care about when listing a pool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserPoolClientSummary {
    pub client_id: String,
    pub client_name: String,
}

/// App client id and secret handed back to the stack
#[derive(Debug, Clone)]
pub struct ClientCredentials {
    pub client_id: String,
    pub client_secret: String,
}

/// Hosted UI settings applied to the OpenSearch Dashboards app client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthClientSettings {
    pub callback_urls: Vec<String>,
    pub logout_urls: Vec<String>,
    pub supported_identity_providers: Vec<String>,
    pub allowed_scopes: Vec<String>,
}

pub struct OAuthPaths;

impl OAuthPaths {
    pub const PARSE_AUTH: &'static str = "/parseauth";
    pub const DASHBOARDS_HOME: &'static str = "/_dashboards/app/home";
    pub const ROOT: &'static str = "/";
}

impl OAuthClientSettings {
    /// Settings for a dashboards deployment fronted by a CloudFront distribution
    /// and reachable directly through the EC2 proxy
    pub fn for_distribution(cloud_front_domain_name: &str, proxy_public_dns_name: &str) -> Self {
        let https = |host: &str, path: &str| format!("https://{}{}", host, path);

        Self {
            callback_urls: vec![
                https(cloud_front_domain_name, OAuthPaths::PARSE_AUTH),
                https(proxy_public_dns_name, OAuthPaths::DASHBOARDS_HOME),
            ],
            logout_urls: vec![
                https(cloud_front_domain_name, OAuthPaths::ROOT),
                https(proxy_public_dns_name, OAuthPaths::DASHBOARDS_HOME),
            ],
            supported_identity_providers: vec!["COGNITO".to_string()],
            allowed_scopes: ["openid", "email", "profile", "phone"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// First client whose name starts with `prefix`, ignoring case
pub fn find_client_by_prefix<'a>(
    clients: &'a [UserPoolClientSummary],
    prefix: &str,
) -> Option<&'a UserPoolClientSummary> {
    let prefix = prefix.to_lowercase();
    clients
        .iter()
        .find(|client| client.client_name.to_lowercase().starts_with(&prefix))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(id: &str, name: &str) -> UserPoolClientSummary {
        UserPoolClientSummary {
            client_id: id.to_string(),
            client_name: name.to_string(),
        }
    }

    #[test]
    fn test_find_client_by_prefix() {
        let clients = vec![
            client("web", "dashboard-web"),
            client("os-1", "AmazonOpenSearchService-domain-eu-west-1"),
            client("os-2", "amazonopensearchservice-other"),
        ];

        let found = find_client_by_prefix(&clients, "amazonopensearchservice").unwrap();
        assert_eq!(found.client_id, "os-1");
    }

    #[test]
    fn test_find_client_by_prefix_requires_prefix_match() {
        let clients = vec![client("x", "my-amazonopensearchservice")];

        assert!(find_client_by_prefix(&clients, "amazonopensearchservice").is_none());
        assert!(find_client_by_prefix(&[], "amazonopensearchservice").is_none());
    }

    #[test]
    fn test_oauth_settings_for_distribution() {
        let settings = OAuthClientSettings::for_distribution(
            "d111111abcdef8.cloudfront.net",
            "ec2-1-2-3-4.compute.amazonaws.com",
        );

        assert_eq!(
            settings.callback_urls,
            vec![
                "https://d111111abcdef8.cloudfront.net/parseauth",
                "https://ec2-1-2-3-4.compute.amazonaws.com/_dashboards/app/home",
            ]
        );
        assert_eq!(
            settings.logout_urls,
            vec![
                "https://d111111abcdef8.cloudfront.net/",
                "https://ec2-1-2-3-4.compute.amazonaws.com/_dashboards/app/home",
            ]
        );
        assert_eq!(settings.supported_identity_providers, vec!["COGNITO"]);
        assert_eq!(settings.allowed_scopes, vec!["openid", "email", "profile", "phone"]);
    }

    #[test]
    fn test_url_properties_parsing() {
        let json = r#"{
            "ServiceToken": "arn:aws:lambda:eu-west-1:123456789012:function:update-cognito-url",
            "UserPoolId": "eu-west-1_abc",
            "ClientId": "client",
            "CloudFrontDistributionUrl": "d111111abcdef8.cloudfront.net",
            "EC2ProxyPublicDnsName": "ec2-1-2-3-4.compute.amazonaws.com"
        }"#;

        let props: CognitoUrlProperties = serde_json::from_str(json).unwrap();
        assert_eq!(props.user_pool_id, "eu-west-1_abc");
        assert_eq!(props.proxy_public_dns_name, "ec2-1-2-3-4.compute.amazonaws.com");
    }
}
