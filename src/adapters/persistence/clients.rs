use async_trait::async_trait;
use serde_json::Map;
use tracing::instrument;

use crate::{
    adapters::persistence::{CLIENTS_COLLECTION, FirestorePersistence, parse_document},
    app_error::{AppError, AppResult},
    domain::entities::client::{ClientRecord, Invoice, Plan},
    use_cases::clients::ClientRepo,
};

impl FirestorePersistence {
    async fn replace_client_array<T: serde::Serialize>(
        &self,
        client_id: &str,
        field: &str,
        items: &[T],
    ) -> AppResult<()> {
        let encoded = serde_json::to_value(items)
            .map_err(|e| AppError::Internal(format!("Failed to encode {}: {}", field, e)))?;
        let mut fields = Map::new();
        fields.insert(field.to_string(), encoded);
        self.client()
            .update_fields(CLIENTS_COLLECTION, client_id, &fields)
            .await
    }
}

#[async_trait]
impl ClientRepo for FirestorePersistence {
    #[instrument(skip(self))]
    async fn get_client(&self, client_id: &str) -> AppResult<Option<ClientRecord>> {
        let Some(doc) = self
            .client()
            .get_document(CLIENTS_COLLECTION, client_id)
            .await?
        else {
            return Ok(None);
        };
        let (id, mut client) = parse_document::<ClientRecord>(doc, "client")?;
        client.id = id;
        Ok(Some(client))
    }

    #[instrument(skip(self, invoices), fields(count = invoices.len()))]
    async fn save_invoices(&self, client_id: &str, invoices: &[Invoice]) -> AppResult<()> {
        self.replace_client_array(client_id, "faturas", invoices)
            .await
    }

    #[instrument(skip(self, plans), fields(count = plans.len()))]
    async fn save_plans(&self, client_id: &str, plans: &[Plan]) -> AppResult<()> {
        self.replace_client_array(client_id, "planos", plans).await
    }
}

