use std::sync::Arc;

use crate::{
    application::use_cases::{
        boleto::BoletoUseCases, custom_software::CustomSoftwareUseCases,
        monthly_invoices::MonthlyInvoiceUseCases, opencode::OpencodeUseCases,
    },
    infra::{config::AppConfig, loopback::WebhookLoopbackClient},
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub boleto_use_cases: Arc<BoletoUseCases>,
    pub monthly_invoice_use_cases: Arc<MonthlyInvoiceUseCases>,
    pub custom_software_use_cases: Arc<CustomSoftwareUseCases>,
    pub opencode_use_cases: Arc<OpencodeUseCases>,
    pub webhook_loopback: Arc<WebhookLoopbackClient>,
}
