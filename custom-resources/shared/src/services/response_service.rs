use reqwest::header::CONTENT_TYPE;
use std::time::Duration;

use crate::{CustomResourceResponse, ProviderConfig, ProviderError, ProviderResult};

/// Delivers custom resource responses to the pre-signed S3 URL CloudFormation waits on
pub struct ResponseSender {
    client: reqwest::Client,
}

impl ResponseSender {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    pub fn with_timeout(timeout: Duration) -> ProviderResult<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::new(client))
    }

    /// Sender for a Lambda's lifetime. Falls back to a default client instead
    /// of failing startup, which would leave the stack without a response.
    pub fn from_config(config: &ProviderConfig) -> Self {
        match Self::with_timeout(config.response_timeout) {
            Ok(sender) => sender,
            Err(e) => {
                tracing::warn!("Failed to build response client, using defaults: {}", e);
                Self::new(reqwest::Client::new())
            }
        }
    }

    /// PUT the response body. The URL is signed without a content type,
    /// so the header must be sent empty.
    pub async fn send(&self, response_url: &str, response: &CustomResourceResponse) -> ProviderResult<()> {
        let body = serde_json::to_string(response)?;

        tracing::info!(
            "Sending {:?} response for {} ({})",
            response.status,
            response.logical_resource_id,
            response.physical_resource_id
        );

        let result = self
            .client
            .put(response_url)
            .header(CONTENT_TYPE, "")
            .body(body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Failed to reach response URL: {}", e);
                ProviderError::ResponseDeliveryFailed(e.to_string())
            })?;

        let status = result.status();
        if !status.is_success() {
            let text = result.text().await.unwrap_or_default();
            return Err(ProviderError::ResponseDeliveryFailed(format!(
                "Response URL returned {}: {}",
                status, text
            )));
        }

        tracing::info!("Response delivered with status {}", status);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ResourceData, ResponseStatus};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    fn response() -> CustomResourceResponse {
        CustomResourceResponse {
            status: ResponseStatus::Success,
            reason: "See the details in CloudWatch Log Stream: stream".to_string(),
            physical_resource_id: "opensearch_CognitoClient_AbCdEfGh".to_string(),
            stack_id: "arn:aws:cloudformation:eu-west-1:123456789012:stack/opensearch/guid".to_string(),
            request_id: "req-1".to_string(),
            logical_resource_id: "CognitoClient".to_string(),
            no_echo: false,
            data: ResourceData::new(),
        }
    }

    fn sender() -> ResponseSender {
        let client = reqwest::Client::builder().no_proxy().build().unwrap();
        ResponseSender::new(client)
    }

    fn header_end(buf: &[u8]) -> Option<usize> {
        buf.windows(4).position(|w| w == b"\r\n\r\n")
    }

    /// Accept one request, answer with `status_line`, and return the raw request
    async fn serve_once(status_line: &'static str) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/signed-response?X-Amz-Signature=abc", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = Vec::new();
            let mut chunk = [0u8; 1024];

            loop {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                buf.extend_from_slice(&chunk[..n]);

                if let Some(end) = header_end(&buf) {
                    let head = String::from_utf8_lossy(&buf[..end]).to_lowercase();
                    let body_len = head
                        .lines()
                        .find_map(|line| line.strip_prefix("content-length:"))
                        .and_then(|len| len.trim().parse::<usize>().ok())
                        .unwrap_or(0);
                    if buf.len() >= end + 4 + body_len {
                        break;
                    }
                }
            }

            let reply = format!(
                "HTTP/1.1 {}\r\ncontent-length: 4\r\nconnection: close\r\n\r\ndone",
                status_line
            );
            socket.write_all(reply.as_bytes()).await.unwrap();
            String::from_utf8_lossy(&buf).to_string()
        });

        (url, handle)
    }

    #[tokio::test]
    async fn test_send_puts_json_with_empty_content_type() {
        let (url, server) = serve_once("200 OK").await;

        sender().send(&url, &response()).await.unwrap();

        let raw = server.await.unwrap();
        let (head, body) = raw.split_once("\r\n\r\n").unwrap();
        let head = head.to_lowercase();

        assert!(head.starts_with("put /signed-response?x-amz-signature=abc http/1.1"));
        assert!(head.lines().any(|line| line.trim_end() == "content-type:"));

        let sent: serde_json::Value = serde_json::from_str(body).unwrap();
        assert_eq!(sent["Status"], "SUCCESS");
        assert_eq!(sent["PhysicalResourceId"], "opensearch_CognitoClient_AbCdEfGh");
    }

    #[tokio::test]
    async fn test_send_rejects_error_status() {
        let (url, server) = serve_once("500 Internal Server Error").await;

        let result = sender().send(&url, &response()).await;
        server.await.unwrap();

        match result {
            Err(ProviderError::ResponseDeliveryFailed(msg)) => assert!(msg.contains("500")),
            other => panic!("expected delivery failure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_send_unreachable_url() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let url = format!("http://{}/signed-response", listener.local_addr().unwrap());
        drop(listener);

        let result = sender().send(&url, &response()).await;

        assert!(matches!(result, Err(ProviderError::ResponseDeliveryFailed(_))));
    }

    #[test]
    fn test_from_config_builds_sender() {
        let sender = ResponseSender::from_config(&ProviderConfig::default());

        assert!(format!("{:?}", sender.client).contains("Client"));
    }
}
