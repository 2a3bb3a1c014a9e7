//! Sends signed events to this service's own webhook receivers.

use reqwest::Client;
use serde_json::Value;
use url::Url;

use crate::{
    app_error::{AppError, AppResult},
    infra::webhook_signer::sign_now,
};

/// Status and body returned by a receiver.
#[derive(Debug, Clone, PartialEq)]
pub struct LoopbackResponse {
    pub status: u16,
    /// Parsed JSON, or the raw text when the body is not JSON.
    pub body: Value,
}

/// Resolves a receiver path below `base`, keeping any path prefix the base
/// carries (`https://host/api` + `/webhook` → `https://host/api/webhook`).
fn receiver_url(base: &Url, path: &str) -> Result<Url, url::ParseError> {
    let mut base = base.clone();
    if !base.path().ends_with('/') {
        let prefixed = format!("{}/", base.path());
        base.set_path(&prefixed);
    }
    base.join(path.trim_start_matches('/'))
}

#[derive(Clone)]
pub struct WebhookLoopbackClient {
    client: Client,
    base_url: Url,
}

impl WebhookLoopbackClient {
    pub fn new(client: Client, base_url: Url) -> Self {
        Self { client, base_url }
    }

    /// Serializes `event`, signs it with `secret` and POSTs it to `path`.
    pub async fn deliver(&self, path: &str, event: &Value, secret: &str) -> AppResult<LoopbackResponse> {
        let url = receiver_url(&self.base_url, path)
            .map_err(|e| AppError::Internal(format!("Invalid loopback URL: {}", e)))?;
        let body = serde_json::to_string(event)
            .map_err(|e| AppError::Internal(format!("Failed to encode event: {}", e)))?;
        let signature = sign_now(secret, &body);

        tracing::debug!(url = %url, "Delivering test webhook");
        let response = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .header("Stripe-Signature", signature)
            .body(body)
            .send()
            .await
            .map_err(|e| AppError::Internal(format!("Loopback request failed: {}", e)))?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| AppError::Internal(format!("Failed to read loopback response: {}", e)))?;
        let body = serde_json::from_str(&text).unwrap_or(Value::String(text));

        Ok(LoopbackResponse { status, body })
    }
}
