use crate::{
    adapters::http::app_state::AppState,
    infra::{
        config::AppConfig, error::InfraError, firestore_persistence, http_client,
        loopback::WebhookLoopbackClient, stripe_payment_adapter::StripePaymentAdapter,
    },
    use_cases::{
        boleto::BoletoUseCases,
        clients::ClientRepo,
        custom_software::{CustomProjectRepo, CustomSoftwareUseCases},
        monthly_invoices::MonthlyInvoiceUseCases,
        opencode::{OpencodeUseCases, ProjectCatalogRepo},
    },
};
use std::fs::File;
use std::sync::Arc;
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub async fn init_app_state(config: AppConfig) -> anyhow::Result<AppState> {
    let firestore_arc = Arc::new(firestore_persistence(&config)?);

    let client_repo_arc = firestore_arc.clone() as Arc<dyn ClientRepo>;
    let project_repo_arc = firestore_arc.clone() as Arc<dyn CustomProjectRepo>;
    let catalog_repo_arc = firestore_arc.clone() as Arc<dyn ProjectCatalogRepo>;

    let processor = Arc::new(StripePaymentAdapter::new(config.stripe_secret_key.clone()));

    let boleto_use_cases = BoletoUseCases::new(
        processor,
        config.stripe_public_key.clone(),
        config.boleto_due_days,
    );
    let monthly_invoice_use_cases = MonthlyInvoiceUseCases::new(client_repo_arc.clone());
    let custom_software_use_cases = CustomSoftwareUseCases::new(project_repo_arc);
    let opencode_use_cases = OpencodeUseCases::new(client_repo_arc, catalog_repo_arc);

    let webhook_loopback = WebhookLoopbackClient::new(
        http_client::build_client(),
        config.self_base_url.clone(),
    );

    Ok(AppState {
        config: Arc::new(config),
        boleto_use_cases: Arc::new(boleto_use_cases),
        monthly_invoice_use_cases: Arc::new(monthly_invoice_use_cases),
        custom_software_use_cases: Arc::new(custom_software_use_cases),
        opencode_use_cases: Arc::new(opencode_use_cases),
        webhook_loopback: Arc::new(webhook_loopback),
    })
}

/// Pretty console logs, plus structured JSON logs when `log_file` is set.
pub fn init_tracing(log_file: Option<&str>) -> Result<(), InfraError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "boleto_backend=debug,tower_http=debug".into());

    let console_layer = fmt::layer()
        .with_target(false)
        .with_level(true)
        .pretty();

    let json_layer = match log_file {
        Some(path) => {
            let file = File::create(path).map_err(InfraError::LogFile)?;
            Some(
                fmt::layer()
                    .json()
                    .with_writer(file)
                    .with_current_span(true)
                    .with_span_list(true)
                    .boxed(),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(json_layer)
        .try_init()
        .ok();

    Ok(())
}
