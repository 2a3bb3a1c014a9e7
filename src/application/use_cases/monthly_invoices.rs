use std::sync::Arc;

use chrono::{Local, NaiveDate};
use tracing::{info, instrument};

use crate::{
    app_error::{AppError, AppResult},
    domain::entities::payment_event::{EventKind, WebhookEvent},
    use_cases::clients::ClientRepo,
};

/// Outcome of a monthly-fee payment event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvoiceSettlement {
    /// The invoice was marked paid and the client's invoices rewritten.
    Settled { client_id: String, invoice_id: String },
    /// The invoice was already paid; nothing was written.
    AlreadyPaid { client_id: String, invoice_id: String },
    /// The event type is not handled by this flow.
    Ignored,
}

#[derive(Clone)]
pub struct MonthlyInvoiceUseCases {
    clients: Arc<dyn ClientRepo>,
}

impl MonthlyInvoiceUseCases {
    pub fn new(clients: Arc<dyn ClientRepo>) -> Self {
        Self { clients }
    }

    #[instrument(skip(self, event), fields(event_id = event.event_id(), event_type = %event.event_type))]
    pub async fn handle_event(&self, event: &WebhookEvent) -> AppResult<InvoiceSettlement> {
        if event.kind() != EventKind::PaymentIntentSucceeded {
            return Ok(InvoiceSettlement::Ignored);
        }

        let invoice_id = event.metadata_value(&["fatura_id"]);
        let client_id = event.metadata_value(&["cliente_id"]);
        let (Some(invoice_id), Some(client_id)) = (invoice_id, client_id) else {
            return Err(AppError::missing("Metadados incompletos"));
        };

        self.settle_invoice(&client_id, &invoice_id, Local::now().date_naive())
            .await
    }

    /// Marks one invoice of a client as paid on `paid_on`.
    pub async fn settle_invoice(
        &self,
        client_id: &str,
        invoice_id: &str,
        paid_on: NaiveDate,
    ) -> AppResult<InvoiceSettlement> {
        let mut client = self
            .clients
            .get_client(client_id)
            .await?
            .ok_or_else(|| AppError::not_found("Cliente não encontrado"))?;

        let invoice = client
            .find_invoice_mut(invoice_id)
            .ok_or_else(|| AppError::not_found("Fatura não encontrada"))?;

        if invoice.is_paid() {
            info!(client_id, invoice_id, "Invoice already paid, skipping rewrite");
            return Ok(InvoiceSettlement::AlreadyPaid {
                client_id: client_id.to_string(),
                invoice_id: invoice_id.to_string(),
            });
        }

        invoice.mark_paid(paid_on);
        self.clients.save_invoices(client_id, &client.faturas).await?;

        info!(client_id, invoice_id, "Invoice marked as paid");
        Ok(InvoiceSettlement::Settled {
            client_id: client_id.to_string(),
            invoice_id: invoice_id.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{
        InMemoryClientRepo, create_test_client, create_test_event, create_test_invoice,
    };
    use serde_json::json;

    fn paid_event(fatura_id: &str, cliente_id: &str) -> WebhookEvent {
        create_test_event(
            "payment_intent.succeeded",
            json!({ "fatura_id": fatura_id, "cliente_id": cliente_id }),
        )
    }

    fn repo_with_pending_invoice() -> Arc<InMemoryClientRepo> {
        Arc::new(InMemoryClientRepo::new().with_client(create_test_client("cli-1", |c| {
            c.faturas = vec![
                create_test_invoice("fat-1", "pendente"),
                create_test_invoice("fat-2", "pendente"),
            ];
        })))
    }

    #[tokio::test]
    async fn test_marks_invoice_paid() {
        let repo = repo_with_pending_invoice();
        let use_cases = MonthlyInvoiceUseCases::new(repo.clone());

        let outcome = use_cases.handle_event(&paid_event("fat-1", "cli-1")).await.unwrap();

        assert_eq!(
            outcome,
            InvoiceSettlement::Settled {
                client_id: "cli-1".into(),
                invoice_id: "fat-1".into()
            }
        );
        let client = repo.client("cli-1").unwrap();
        assert!(client.faturas[0].is_paid());
        assert_eq!(
            client.faturas[0].paid_on(),
            Some(Local::now().date_naive().format("%d/%m/%Y").to_string().as_str())
        );
        assert!(!client.faturas[1].is_paid());
        assert_eq!(repo.write_count(), 1);
    }

    #[tokio::test]
    async fn test_redelivery_keeps_original_payment_date() {
        let repo = repo_with_pending_invoice();
        let use_cases = MonthlyInvoiceUseCases::new(repo.clone());
        let first_day = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
        let later_day = NaiveDate::from_ymd_opt(2025, 6, 12).unwrap();

        use_cases.settle_invoice("cli-1", "fat-1", first_day).await.unwrap();
        let again = use_cases.settle_invoice("cli-1", "fat-1", later_day).await.unwrap();

        assert!(matches!(again, InvoiceSettlement::AlreadyPaid { .. }));
        let client = repo.client("cli-1").unwrap();
        assert_eq!(client.faturas[0].paid_on(), Some("10/06/2025"));
        assert_eq!(client.faturas.len(), 2);
        assert_eq!(repo.write_count(), 1);
    }

    #[tokio::test]
    async fn test_other_event_types_are_ignored() {
        let repo = repo_with_pending_invoice();
        let use_cases = MonthlyInvoiceUseCases::new(repo.clone());

        let event = create_test_event(
            "payment_intent.canceled",
            json!({ "fatura_id": "fat-1", "cliente_id": "cli-1" }),
        );
        let outcome = use_cases.handle_event(&event).await.unwrap();

        assert_eq!(outcome, InvoiceSettlement::Ignored);
        assert_eq!(repo.write_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_metadata() {
        let use_cases = MonthlyInvoiceUseCases::new(repo_with_pending_invoice());

        let event = create_test_event("payment_intent.succeeded", json!({ "fatura_id": "fat-1" }));
        let result = use_cases.handle_event(&event).await;

        match result {
            Err(AppError::InvalidField(msg)) => assert_eq!(msg, "Metadados incompletos"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unknown_client_and_invoice() {
        let use_cases = MonthlyInvoiceUseCases::new(repo_with_pending_invoice());

        match use_cases.handle_event(&paid_event("fat-1", "cli-404")).await {
            Err(AppError::NotFound(msg)) => assert_eq!(msg, "Cliente não encontrado"),
            other => panic!("unexpected: {other:?}"),
        }
        match use_cases.handle_event(&paid_event("fat-404", "cli-1")).await {
            Err(AppError::NotFound(msg)) => assert_eq!(msg, "Fatura não encontrada"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let repo = Arc::new(InMemoryClientRepo::new().failing());
        let use_cases = MonthlyInvoiceUseCases::new(repo);

        let result = use_cases.handle_event(&paid_event("fat-1", "cli-1")).await;
        assert!(matches!(result, Err(AppError::Store(_))));
    }
}
