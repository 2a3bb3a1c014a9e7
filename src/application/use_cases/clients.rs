use async_trait::async_trait;

use crate::{
    app_error::AppResult,
    domain::entities::client::{ClientRecord, Invoice, Plan},
};

/// Access to the `clientes` collection.
///
/// Invoices and plans are stored as arrays on the client document, so every
/// change is a read of the whole client followed by a rewrite of one array.
/// Nothing makes that pair atomic.
#[async_trait]
pub trait ClientRepo: Send + Sync {
    async fn get_client(&self, client_id: &str) -> AppResult<Option<ClientRecord>>;

    /// Replaces the `faturas` array of an existing client.
    async fn save_invoices(&self, client_id: &str, invoices: &[Invoice]) -> AppResult<()>;

    /// Replaces the `planos` array of an existing client.
    async fn save_plans(&self, client_id: &str, plans: &[Plan]) -> AppResult<()>;
}
