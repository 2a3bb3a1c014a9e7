//! Test app state builder for HTTP-level integration testing.
//!
//! This module provides `TestAppStateBuilder` which creates an `AppState`
//! backed by in-memory repositories and a stub payment processor.

use std::sync::Arc;

use secrecy::SecretString;
use url::Url;

use crate::{
    adapters::http::app_state::AppState,
    application::use_cases::{
        boleto::BoletoUseCases, custom_software::CustomSoftwareUseCases,
        monthly_invoices::MonthlyInvoiceUseCases, opencode::OpencodeUseCases,
    },
    infra::{config::AppConfig, http_client, loopback::WebhookLoopbackClient},
    test_utils::{
        InMemoryClientRepo, InMemoryCustomProjectRepo, InMemoryProjectCatalogRepo,
        StubPaymentProcessor,
    },
};

pub const TEST_WEBHOOK_SECRET: &str = "whsec_test_secret";
pub const TEST_PUBLIC_KEY: &str = "pk_test_123";

/// Configuration with fixed test secrets and test routes enabled.
pub fn test_config() -> AppConfig {
    let bind_addr = "127.0.0.1:5000".parse().unwrap();
    AppConfig {
        stripe_secret_key: SecretString::new("sk_test_123".into()),
        stripe_public_key: TEST_PUBLIC_KEY.to_string(),
        stripe_webhook_secret: SecretString::new(TEST_WEBHOOK_SECRET.into()),
        firebase_credentials: SecretString::new("".into()),
        firestore_database: "(default)".to_string(),
        bind_addr,
        self_base_url: crate::infra::config::default_self_base_url(bind_addr),
        cors_origin: None,
        enable_test_routes: true,
        webhook_tolerance_secs: 300,
        boleto_due_days: 7,
        log_file: None,
    }
}

/// Builder for creating `AppState` with in-memory mocks for testing.
///
/// # Example
///
/// ```ignore
/// let clients = Arc::new(InMemoryClientRepo::new().with_client(client));
/// let app_state = TestAppStateBuilder::new().with_clients(clients.clone()).build();
/// ```
pub struct TestAppStateBuilder {
    config: AppConfig,
    processor: Arc<StubPaymentProcessor>,
    clients: Arc<InMemoryClientRepo>,
    custom_projects: Arc<InMemoryCustomProjectRepo>,
    catalog: Arc<InMemoryProjectCatalogRepo>,
}

impl TestAppStateBuilder {
    pub fn new() -> Self {
        Self {
            config: test_config(),
            processor: Arc::new(StubPaymentProcessor::new()),
            clients: Arc::new(InMemoryClientRepo::new()),
            custom_projects: Arc::new(InMemoryCustomProjectRepo::new()),
            catalog: Arc::new(InMemoryProjectCatalogRepo::new()),
        }
    }

    pub fn with_processor(mut self, processor: Arc<StubPaymentProcessor>) -> Self {
        self.processor = processor;
        self
    }

    pub fn with_clients(mut self, clients: Arc<InMemoryClientRepo>) -> Self {
        self.clients = clients;
        self
    }

    pub fn with_custom_projects(mut self, projects: Arc<InMemoryCustomProjectRepo>) -> Self {
        self.custom_projects = projects;
        self
    }

    pub fn with_catalog(mut self, catalog: Arc<InMemoryProjectCatalogRepo>) -> Self {
        self.catalog = catalog;
        self
    }

    /// Points the test triggers at a running server.
    pub fn with_self_base_url(mut self, url: Url) -> Self {
        self.config.self_base_url = url;
        self
    }

    pub fn with_test_routes(mut self, enabled: bool) -> Self {
        self.config.enable_test_routes = enabled;
        self
    }

    pub fn build(self) -> AppState {
        let boleto_use_cases = BoletoUseCases::new(
            self.processor,
            self.config.stripe_public_key.clone(),
            self.config.boleto_due_days,
        );
        let webhook_loopback = WebhookLoopbackClient::new(
            http_client::build_client(),
            self.config.self_base_url.clone(),
        );

        AppState {
            boleto_use_cases: Arc::new(boleto_use_cases),
            monthly_invoice_use_cases: Arc::new(MonthlyInvoiceUseCases::new(self.clients.clone())),
            custom_software_use_cases: Arc::new(CustomSoftwareUseCases::new(self.custom_projects)),
            opencode_use_cases: Arc::new(OpencodeUseCases::new(self.clients, self.catalog)),
            webhook_loopback: Arc::new(webhook_loopback),
            config: Arc::new(self.config),
        }
    }
}

impl Default for TestAppStateBuilder {
    fn default() -> Self {
        Self::new()
    }
}
