use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Invoice status as stored in a client's `faturas` array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString, strum::AsRefStr)]
pub enum InvoiceStatus {
    #[strum(serialize = "pendente")]
    Pending,
    #[strum(serialize = "pago")]
    Paid,
}

/// Client document from the `clientes` collection.
///
/// Only the arrays this service rewrites are typed. Contact fields and
/// anything else stay in `extra` untouched, whatever their stored type.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientRecord {
    #[serde(skip)]
    pub id: String,
    #[serde(default)]
    pub faturas: Vec<Invoice>,
    #[serde(default)]
    pub planos: Vec<Plan>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ClientRecord {
    pub fn find_invoice_mut(&mut self, invoice_id: &str) -> Option<&mut Invoice> {
        self.faturas.iter_mut().find(|f| f.has_id(invoice_id))
    }

    /// Linear scan for a plan granting the given service.
    pub fn has_plan_for_service(&self, service_id: &str) -> bool {
        self.planos
            .iter()
            .any(|p| p.service_id.as_deref() == Some(service_id))
    }
}

pub const INVOICE_PAID_ON_FIELD: &str = "dataPagamento";

/// Element of a client's `faturas` array.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    /// Usually text, but kept as stored so numeric ids survive a rewrite.
    #[serde(default)]
    pub id: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Invoice {
    /// Matches a text id, or a numeric id against its decimal form.
    pub fn has_id(&self, invoice_id: &str) -> bool {
        match &self.id {
            Value::String(id) => id == invoice_id,
            Value::Number(id) => id.to_string() == invoice_id,
            _ => false,
        }
    }

    pub fn is_paid(&self) -> bool {
        self.status.as_deref() == Some(InvoiceStatus::Paid.as_ref())
    }

    /// Payment date written by `mark_paid`, when it is text.
    pub fn paid_on(&self) -> Option<&str> {
        self.extra.get(INVOICE_PAID_ON_FIELD).and_then(Value::as_str)
    }

    /// Marks the invoice paid; the date is stored as `dd/mm/YYYY`.
    pub fn mark_paid(&mut self, paid_on: NaiveDate) {
        self.status = Some(InvoiceStatus::Paid.to_string());
        self.extra.insert(
            INVOICE_PAID_ON_FIELD.to_string(),
            Value::String(paid_on.format("%d/%m/%Y").to_string()),
        );
    }
}

pub const PLAN_JOINED_AT_FIELD: &str = "dataAdesao";

/// Element of a client's `planos` array: an entitlement granted after payment.
///
/// The enrolment date lives in `extra` under `dataAdesao`; other writers
/// store it as a timestamp.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    #[serde(rename = "servicoId", default, skip_serializing_if = "Option::is_none")]
    pub service_id: Option<String>,
    #[serde(rename = "servicoNome", default, skip_serializing_if = "Option::is_none")]
    pub service_name: Option<String>,
    #[serde(rename = "titulo", default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "tipo", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(rename = "downloadLink", default, skip_serializing_if = "Option::is_none")]
    pub download_link: Option<String>,
    /// Written as text by this service; older entries may hold a number.
    #[serde(rename = "valor", default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Value>,
    #[serde(rename = "numeroNota", default, skip_serializing_if = "Option::is_none")]
    pub invoice_number: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
