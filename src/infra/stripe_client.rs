use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::collections::HashMap;

use crate::app_error::{AppError, AppResult};

const STRIPE_API_BASE: &str = "https://api.stripe.com/v1";

/// Parameters for a boleto payment intent, already in the processor's units.
#[derive(Debug, Clone)]
pub struct BoletoIntentParams<'a> {
    pub amount: i64,
    pub currency: &'a str,
    pub tax_id: &'a str,
    pub name: &'a str,
    pub email: &'a str,
    pub line1: &'a str,
    pub line2: &'a str,
    pub city: &'a str,
    pub state: &'a str,
    pub postal_code: &'a str,
    pub country: &'a str,
    pub description: &'a str,
    pub metadata: &'a HashMap<String, String>,
}

impl BoletoIntentParams<'_> {
    fn to_form(&self) -> Vec<(String, String)> {
        let mut params: Vec<(String, String)> = vec![
            ("amount".to_string(), self.amount.to_string()),
            ("currency".to_string(), self.currency.to_string()),
            ("payment_method_types[]".to_string(), "boleto".to_string()),
            ("payment_method_data[type]".to_string(), "boleto".to_string()),
            (
                "payment_method_data[boleto][tax_id]".to_string(),
                self.tax_id.to_string(),
            ),
            (
                "payment_method_data[billing_details][name]".to_string(),
                self.name.to_string(),
            ),
            (
                "payment_method_data[billing_details][email]".to_string(),
                self.email.to_string(),
            ),
            (
                "payment_method_data[billing_details][address][line1]".to_string(),
                self.line1.to_string(),
            ),
            (
                "payment_method_data[billing_details][address][line2]".to_string(),
                self.line2.to_string(),
            ),
            (
                "payment_method_data[billing_details][address][city]".to_string(),
                self.city.to_string(),
            ),
            (
                "payment_method_data[billing_details][address][state]".to_string(),
                self.state.to_string(),
            ),
            (
                "payment_method_data[billing_details][address][postal_code]".to_string(),
                self.postal_code.to_string(),
            ),
            (
                "payment_method_data[billing_details][address][country]".to_string(),
                self.country.to_string(),
            ),
            ("description".to_string(), self.description.to_string()),
            ("receipt_email".to_string(), self.email.to_string()),
            ("confirm".to_string(), "true".to_string()),
        ];

        let mut keys: Vec<&String> = self.metadata.keys().collect();
        keys.sort();
        for key in keys {
            params.push((format!("metadata[{}]", key), self.metadata[key].clone()));
        }
        params
    }
}

#[derive(Clone)]
pub struct StripeClient {
    client: Client,
    secret_key: SecretString,
}

impl StripeClient {
    pub fn new(secret_key: SecretString) -> Self {
        Self {
            client: super::http_client::build_client(),
            secret_key,
        }
    }

    fn auth_header(&self) -> String {
        use base64::Engine;
        let encoded = base64::engine::general_purpose::STANDARD
            .encode(format!("{}:", self.secret_key.expose_secret()));
        format!("Basic {}", encoded)
    }

    // ========================================================================
    // Payment Intents
    // ========================================================================

    /// Creates and confirms a boleto payment intent in one call.
    pub async fn create_payment_intent(
        &self,
        params: &BoletoIntentParams<'_>,
    ) -> AppResult<StripePaymentIntent> {
        let response = self
            .client
            .post(format!("{}/payment_intents", STRIPE_API_BASE))
            .header("Authorization", self.auth_header())
            .form(&params.to_form())
            .send()
            .await
            .map_err(|e| AppError::Processor(format!("Stripe request failed: {}", e)))?;

        self.handle_response(response).await
    }

    pub async fn retrieve_payment_intent(
        &self,
        intent_id: &str,
        expand_latest_charge: bool,
    ) -> AppResult<StripePaymentIntent> {
        let mut request = self
            .client
            .get(format!("{}/payment_intents/{}", STRIPE_API_BASE, intent_id))
            .header("Authorization", self.auth_header());
        if expand_latest_charge {
            request = request.query(&[("expand[]", "latest_charge")]);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::Processor(format!("Stripe request failed: {}", e)))?;

        self.handle_response(response).await
    }

    // ========================================================================
    // Webhook Signature Verification
    // ========================================================================

    /// Checks a `Stripe-Signature` header (`t=<ts>,v1=<hex>`) against the
    /// raw body. Timestamps further than `tolerance_secs` from now are
    /// rejected.
    pub fn verify_webhook_signature(
        payload: &str,
        signature_header: &str,
        webhook_secret: &str,
        tolerance_secs: i64,
    ) -> AppResult<()> {
        use hmac::{Hmac, Mac};
        use sha2::Sha256;

        // Parse signature header: "t=timestamp,v1=signature,..."
        let mut timestamp: Option<&str> = None;
        let mut signatures: Vec<&str> = Vec::new();

        for part in signature_header.split(',') {
            let Some((key, value)) = part.trim().split_once('=') else {
                continue;
            };
            match key {
                "t" => timestamp = Some(value),
                "v1" => signatures.push(value),
                _ => {}
            }
        }

        let timestamp = timestamp.ok_or_else(|| {
            AppError::InvalidSignature("Missing timestamp in signature".into())
        })?;

        if signatures.is_empty() {
            return Err(AppError::InvalidSignature("Missing signature".into()));
        }

        let signed_payload = format!("{}.{}", timestamp, payload);
        let mut mac = Hmac::<Sha256>::new_from_slice(webhook_secret.as_bytes())
            .map_err(|_| AppError::Internal("HMAC error".into()))?;
        mac.update(signed_payload.as_bytes());
        let expected = hex::encode(mac.finalize().into_bytes());

        if !signatures
            .iter()
            .any(|sig| constant_time_compare(sig, &expected))
        {
            return Err(AppError::InvalidSignature("Signature mismatch".into()));
        }

        let ts: i64 = timestamp
            .parse()
            .map_err(|_| AppError::InvalidSignature("Invalid timestamp".into()))?;
        let now = chrono::Utc::now().timestamp();
        if (now - ts).abs() > tolerance_secs {
            return Err(AppError::InvalidSignature(
                "Timestamp outside the tolerance zone".into(),
            ));
        }

        Ok(())
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    async fn handle_response<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> AppResult<T> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::Processor(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            tracing::error!(status = %status, body = %body, "Stripe API error");

            if let Ok(error) = serde_json::from_str::<StripeErrorResponse>(&body) {
                return Err(AppError::Processor(
                    error.error.message.unwrap_or(error.error.error_type),
                ));
            }

            return Err(AppError::Processor(format!(
                "Stripe API error: {} - {}",
                status, body
            )));
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(body = %body, error = %e, "Failed to parse Stripe response");
            AppError::Internal(format!("Failed to parse Stripe response: {}", e))
        })
    }
}

fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut result = 0u8;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }
    result == 0
}

// ============================================================================
// Stripe Types
// ============================================================================

/// A field Stripe returns either as an id or, when expanded, as the object.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Expandable<T> {
    Object(Box<T>),
    Id(String),
}

impl<T> Expandable<T> {
    pub fn as_object(&self) -> Option<&T> {
        match self {
            Expandable::Object(obj) => Some(obj),
            Expandable::Id(_) => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StripePaymentIntent {
    pub id: String,
    pub status: String,
    pub amount: i64,
    pub currency: String,
    pub receipt_email: Option<String>,
    pub created: i64,
    pub payment_method: Option<Expandable<StripeIdOnly>>,
    pub next_action: Option<StripeNextAction>,
    pub latest_charge: Option<Expandable<StripeCharge>>,
    /// Only present on older API versions.
    pub charges: Option<StripeList<StripeCharge>>,
}

impl StripePaymentIntent {
    /// Charges with the expanded latest charge first.
    pub fn charges(&self) -> Vec<StripeCharge> {
        let mut charges = Vec::new();
        if let Some(latest) = self.latest_charge.as_ref().and_then(Expandable::as_object) {
            charges.push(latest.clone());
        }
        if let Some(list) = &self.charges {
            for charge in &list.data {
                if !charges.iter().any(|c| c.id == charge.id) {
                    charges.push(charge.clone());
                }
            }
        }
        charges
    }

    pub fn payment_method_id(&self) -> Option<String> {
        self.payment_method.as_ref().map(|pm| match pm {
            Expandable::Id(id) => id.clone(),
            Expandable::Object(obj) => obj.id.clone(),
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StripeIdOnly {
    pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StripeNextAction {
    #[serde(rename = "type")]
    pub action_type: Option<String>,
    pub boleto_display_details: Option<StripeBoletoDetails>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StripeBoletoDetails {
    pub number: Option<String>,
    pub hosted_voucher_url: Option<String>,
    pub pdf: Option<String>,
    pub expires_at: Option<i64>,
    /// Not part of the documented display details; read when present.
    pub line: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StripeCharge {
    pub id: String,
    pub status: String,
    pub created: i64,
    pub payment_method_details: Option<StripePaymentMethodDetails>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StripePaymentMethodDetails {
    pub boleto: Option<StripeBoletoDetails>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StripeList<T> {
    pub data: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct StripeErrorResponse {
    error: StripeError,
}

#[derive(Debug, Deserialize)]
struct StripeError {
    #[serde(rename = "type")]
    error_type: String,
    message: Option<String>,
}
