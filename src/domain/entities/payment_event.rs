use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Processor event types this service reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    PaymentIntentSucceeded,
    PaymentIntentCanceled,
    CheckoutSessionCompleted,
    Other(String),
}

impl EventKind {
    pub fn as_str(&self) -> &str {
        match self {
            EventKind::PaymentIntentSucceeded => "payment_intent.succeeded",
            EventKind::PaymentIntentCanceled => "payment_intent.canceled",
            EventKind::CheckoutSessionCompleted => "checkout.session.completed",
            EventKind::Other(raw) => raw,
        }
    }

    /// Any `payment_intent.*` event, including ones without a dedicated variant.
    pub fn is_payment_intent(&self) -> bool {
        self.as_str().starts_with("payment_intent.")
    }
}

impl From<&str> for EventKind {
    fn from(raw: &str) -> Self {
        match raw {
            "payment_intent.succeeded" => EventKind::PaymentIntentSucceeded,
            "payment_intent.canceled" => EventKind::PaymentIntentCanceled,
            "checkout.session.completed" => EventKind::CheckoutSessionCompleted,
            other => EventKind::Other(other.to_string()),
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Webhook event envelope as delivered by the processor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub data: WebhookEventData,
    /// Some senders put metadata at the top level instead of on the object.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebhookEventData {
    #[serde(default)]
    pub object: Value,
}

impl WebhookEvent {
    pub fn kind(&self) -> EventKind {
        EventKind::from(self.event_type.as_str())
    }

    pub fn event_id(&self) -> &str {
        self.id.as_deref().unwrap_or("")
    }

    /// Metadata of the event object, falling back to top-level metadata when
    /// the object carries none.
    pub fn metadata(&self) -> Map<String, Value> {
        let object_metadata = self
            .data
            .object
            .get("metadata")
            .and_then(Value::as_object)
            .filter(|m| !m.is_empty());

        match object_metadata {
            Some(m) => m.clone(),
            None => self.metadata.clone().unwrap_or_default(),
        }
    }

    /// First non-empty metadata value among `keys`, rendered as text.
    pub fn metadata_value(&self, keys: &[&str]) -> Option<String> {
        let metadata = self.metadata();
        keys.iter().find_map(|key| match metadata.get(*key) {
            Some(Value::String(s)) if !s.trim().is_empty() => Some(s.clone()),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        })
    }

    /// `id` of the event object (payment intent or checkout session).
    pub fn object_id(&self) -> Option<&str> {
        self.data.object.get("id").and_then(Value::as_str)
    }
}
