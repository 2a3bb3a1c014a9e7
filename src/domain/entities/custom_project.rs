use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Payment status of a custom-software project, stored with the
/// capitalisation the back office expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString, strum::AsRefStr)]
pub enum ProjectPaymentStatus {
    #[strum(serialize = "Pendente")]
    Pending,
    #[strum(serialize = "Pago")]
    Paid,
    #[strum(serialize = "Cancelado")]
    Canceled,
}

impl ProjectPaymentStatus {
    /// Document field that records when the project entered this status.
    pub fn date_field(&self) -> Option<&'static str> {
        match self {
            ProjectPaymentStatus::Pending => None,
            ProjectPaymentStatus::Paid => Some("data_pagamento"),
            ProjectPaymentStatus::Canceled => Some("data_cancelamento"),
        }
    }
}

/// Document from the `software_personalizado` collection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomProject {
    #[serde(skip)]
    pub id: String,
    #[serde(rename = "clienteId", default)]
    pub client_id: String,
    #[serde(rename = "nomeProjeto", default)]
    pub project_name: String,
    #[serde(rename = "status_pagamento", default, skip_serializing_if = "Option::is_none")]
    pub payment_status: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Field update applied to a project when a payment event arrives.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectPaymentUpdate {
    pub status: ProjectPaymentStatus,
    /// ISO-8601 timestamp written to the status' date field.
    pub changed_at: String,
}

impl ProjectPaymentUpdate {
    /// Flattens the update into the document fields it touches.
    pub fn to_fields(&self) -> Map<String, Value> {
        let mut fields = Map::new();
        fields.insert(
            "status_pagamento".to_string(),
            Value::String(self.status.to_string()),
        );
        if let Some(date_field) = self.status.date_field() {
            fields.insert(date_field.to_string(), Value::String(self.changed_at.clone()));
        }
        fields
    }
}
