use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Datelike, Local};
use rand::Rng;
use serde_json::Value;
use tracing::{info, instrument};

use crate::{
    app_error::{AppError, AppResult},
    application::helpers::timestamps::br_datetime,
    domain::entities::{
        catalog_project::CatalogProject,
        client::{PLAN_JOINED_AT_FIELD, Plan},
        payment_event::{EventKind, WebhookEvent},
    },
    use_cases::clients::ClientRepo,
};

pub const OPENCODE_PAYMENT_KIND: &str = "opencode";
pub const OPENCODE_PLAN_TITLE: &str = "Plano Open Code";
pub const OPENCODE_PLAN_KIND: &str = "unico";
pub const ACTIVE_PLAN_STATUS: &str = "ativo";

/// Read access to the `projetos` catalog.
#[async_trait]
pub trait ProjectCatalogRepo: Send + Sync {
    async fn find_by_service_id(&self, service_id: &str) -> AppResult<Option<CatalogProject>>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlanGrant {
    Granted { client_id: String, plan: Plan },
    /// The client already holds a plan for this service.
    AlreadyGranted { client_id: String, service_id: String },
    /// Wrong event type, or metadata marking another kind of payment.
    Ignored,
}

#[derive(Clone)]
pub struct OpencodeUseCases {
    clients: Arc<dyn ClientRepo>,
    catalog: Arc<dyn ProjectCatalogRepo>,
}

impl OpencodeUseCases {
    pub fn new(clients: Arc<dyn ClientRepo>, catalog: Arc<dyn ProjectCatalogRepo>) -> Self {
        Self { clients, catalog }
    }

    #[instrument(skip(self, event), fields(event_id = event.event_id(), event_type = %event.event_type))]
    pub async fn handle_event(&self, event: &WebhookEvent) -> AppResult<PlanGrant> {
        if !matches!(
            event.kind(),
            EventKind::CheckoutSessionCompleted | EventKind::PaymentIntentSucceeded
        ) {
            return Ok(PlanGrant::Ignored);
        }

        if let Some(kind) = event.metadata_value(&["tipo_pagamento"]) {
            if kind != OPENCODE_PAYMENT_KIND {
                info!(tipo_pagamento = %kind, "Payment is not an opencode purchase");
                return Ok(PlanGrant::Ignored);
            }
        }

        let service_id = event.metadata_value(&["servicoId", "projeto_id"]);
        let client_id = event.metadata_value(&["clienteId", "cliente_id"]);
        let (Some(service_id), Some(client_id)) = (service_id, client_id) else {
            return Err(AppError::missing("Metadados inválidos"));
        };

        self.grant_plan(&client_id, &service_id, Local::now()).await
    }

    /// Appends an opencode plan for `service_id` unless the client already
    /// has one.
    pub async fn grant_plan(
        &self,
        client_id: &str,
        service_id: &str,
        now: DateTime<Local>,
    ) -> AppResult<PlanGrant> {
        let client = self
            .clients
            .get_client(client_id)
            .await?
            .ok_or_else(|| AppError::not_found("Cliente não encontrado"))?;

        if client.has_plan_for_service(service_id) {
            info!(client_id, service_id, "Client already has this plan");
            return Ok(PlanGrant::AlreadyGranted {
                client_id: client_id.to_string(),
                service_id: service_id.to_string(),
            });
        }

        let project = self
            .catalog
            .find_by_service_id(service_id)
            .await?
            .ok_or_else(|| AppError::not_found("Projeto não encontrado"))?;

        let plan = opencode_plan(service_id, &project, now, random_invoice_suffix());
        let mut plans = client.planos;
        plans.push(plan.clone());
        self.clients.save_plans(client_id, &plans).await?;

        info!(
            client_id,
            service_id,
            invoice_number = plan.invoice_number.as_deref().unwrap_or_default(),
            "Opencode plan granted"
        );
        Ok(PlanGrant::Granted {
            client_id: client_id.to_string(),
            plan,
        })
    }
}

fn random_invoice_suffix() -> u32 {
    rand::thread_rng().gen_range(1000..=9999)
}

/// Plan entry for a purchased catalog project.
pub fn opencode_plan(
    service_id: &str,
    project: &CatalogProject,
    now: DateTime<Local>,
    invoice_suffix: u32,
) -> Plan {
    Plan {
        service_id: Some(service_id.to_string()),
        service_name: project.title.clone(),
        title: Some(OPENCODE_PLAN_TITLE.to_string()),
        kind: Some(OPENCODE_PLAN_KIND.to_string()),
        status: Some(ACTIVE_PLAN_STATUS.to_string()),
        download_link: project.download_link.clone(),
        price: Some(Value::String(project.price_label())),
        invoice_number: Some(format!("INV-{}-{}", invoice_suffix, now.year())),
        extra: [(PLAN_JOINED_AT_FIELD.to_string(), Value::String(br_datetime(now)))]
            .into_iter()
            .collect(),
    }
}
