//! Telegram Bot API messaging client

use super::{AlertError, MessagingClient};
use crate::geolocation::GeoLocation;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

const API_BASE: &str = "https://api.telegram.org";

/// Messaging client backed by the Telegram Bot API
///
/// Recipients are chat ids; the credential is a bot token supplied via
/// configuration and embedded in the request path.
pub struct TelegramClient {
    client: Client,
    base_url: String,
    token: String,
}

/// Envelope the Bot API wraps every response in
#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    description: Option<String>,
}

impl TelegramClient {
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_base_url(API_BASE, token)
    }

    /// Point the client at a different API host (used by tests).
    pub fn with_base_url(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        TelegramClient {
            client: Client::builder()
                .timeout(Duration::from_secs(30))
                .build()
                .unwrap_or_default(),
            base_url: base_url.into(),
            token: token.into(),
        }
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.base_url, self.token, method)
    }

    async fn call(&self, method: &str, payload: serde_json::Value) -> Result<(), AlertError> {
        let response = self
            .client
            .post(self.method_url(method))
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            // The Bot API ships an error description in the body even on
            // non-2xx statuses.
            let detail = response
                .json::<ApiResponse>()
                .await
                .ok()
                .and_then(|r| r.description)
                .unwrap_or_else(|| format!("status {}", status));
            return Err(AlertError::Api(detail));
        }

        let body: ApiResponse = response.json().await?;
        if !body.ok {
            return Err(AlertError::Api(
                body.description
                    .unwrap_or_else(|| "unknown API error".to_string()),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl MessagingClient for TelegramClient {
    async fn send_message(&self, recipient_id: &str, text: &str) -> Result<(), AlertError> {
        self.call(
            "sendMessage",
            serde_json::json!({ "chat_id": recipient_id, "text": text }),
        )
        .await
    }

    async fn send_location(
        &self,
        recipient_id: &str,
        location: &GeoLocation,
    ) -> Result<(), AlertError> {
        self.call(
            "sendLocation",
            serde_json::json!({
                "chat_id": recipient_id,
                "latitude": location.latitude,
                "longitude": location.longitude,
            }),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_url_embeds_token() {
        let client = TelegramClient::new("123:abc");
        assert_eq!(
            client.method_url("sendMessage"),
            "https://api.telegram.org/bot123:abc/sendMessage"
        );
    }

    #[test]
    fn test_api_response_deserialization() {
        let ok: ApiResponse = serde_json::from_str(r#"{"ok":true,"result":{}}"#).unwrap();
        assert!(ok.ok);
        assert!(ok.description.is_none());

        let err: ApiResponse =
            serde_json::from_str(r#"{"ok":false,"description":"chat not found"}"#).unwrap();
        assert!(!err.ok);
        assert_eq!(err.description.as_deref(), Some("chat not found"));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_a_transport_error() {
        let client = TelegramClient::with_base_url("http://127.0.0.1:9", "token");
        let result = client.send_message("111", "hello").await;
        assert!(matches!(result, Err(AlertError::Http(_))));
    }
}
