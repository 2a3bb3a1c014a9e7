//! Test data factories for creating valid test fixtures.
//!
//! Each factory function creates a complete, valid object with sensible defaults.
//! Use the closure parameter to override specific fields as needed.

use serde_json::{Map, Value, json};

use crate::{
    application::ports::payment_processor::{BoletoVoucher, PaymentIntentInfo},
    domain::entities::{
        amount::Centavos,
        catalog_project::CatalogProject,
        client::{ClientRecord, Invoice},
        custom_project::CustomProject,
        payment_event::{WebhookEvent, WebhookEventData},
    },
};

/// Create a test client with contact fields and no invoices or plans.
pub fn create_test_client(id: &str, overrides: impl FnOnce(&mut ClientRecord)) -> ClientRecord {
    let mut extra = Map::new();
    extra.insert("nome".to_string(), json!("favio"));
    extra.insert("email".to_string(), json!("favio@gmail.com"));
    extra.insert("cpfCnpj".to_string(), json!("18667894060"));
    extra.insert("telefone".to_string(), json!("11999999999"));
    let mut client = ClientRecord {
        id: id.to_string(),
        faturas: vec![],
        planos: vec![],
        extra,
    };
    overrides(&mut client);
    client
}

pub fn create_test_invoice(id: &str, status: &str) -> Invoice {
    let mut extra = Map::new();
    extra.insert("valor".to_string(), json!(100));
    extra.insert("vencimento".to_string(), json!("10/06/2025"));
    Invoice {
        id: json!(id),
        status: Some(status.to_string()),
        extra,
    }
}

/// Pending custom-software project.
pub fn create_test_custom_project(id: &str, client_id: &str, name: &str) -> CustomProject {
    let mut extra = Map::new();
    extra.insert("valor".to_string(), json!(2222));
    CustomProject {
        id: id.to_string(),
        client_id: client_id.to_string(),
        project_name: name.to_string(),
        payment_status: Some("Pendente".to_string()),
        extra,
    }
}

pub fn create_test_catalog_project(id: &str, service_id: &str, price: Value) -> CatalogProject {
    CatalogProject {
        id: id.to_string(),
        service_id: Some(service_id.to_string()),
        title: Some(format!("Projeto {}", service_id)),
        download_link: Some(format!("https://downloads.example.com/{}.zip", service_id)),
        price: Some(price),
        extra: Map::new(),
    }
}

/// Boleto intent waiting for the payer, with display details and no charge.
pub fn create_test_intent(
    id: &str,
    overrides: impl FnOnce(&mut PaymentIntentInfo),
) -> PaymentIntentInfo {
    let mut intent = PaymentIntentInfo {
        id: id.to_string(),
        status: "requires_action".to_string(),
        amount: Centavos(7320),
        currency: "brl".to_string(),
        receipt_email: Some("favio@gmail.com".to_string()),
        created: 1_747_312_200,
        payment_method: Some("pm_test_boleto".to_string()),
        boleto_display: Some(BoletoVoucher {
            number: Some("23790001246004987209031123456704799990000007320".to_string()),
            line: Some("23790.00124 60049.872090 31123.456704 7 99990000007320".to_string()),
            hosted_voucher_url: Some(format!("https://payments.stripe.com/boleto/voucher/{}", id)),
            pdf: Some(format!("https://payments.stripe.com/boleto/voucher/{}/pdf", id)),
            expires_at: Some(1_747_917_000),
        }),
        charges: vec![],
    };
    overrides(&mut intent);
    intent
}

/// Event whose object carries `metadata`.
pub fn create_test_event(event_type: &str, metadata: Value) -> WebhookEvent {
    WebhookEvent {
        id: Some("evt_test_1".to_string()),
        event_type: event_type.to_string(),
        data: WebhookEventData {
            object: json!({ "id": "pi_test_1", "metadata": metadata }),
        },
        metadata: None,
    }
}
