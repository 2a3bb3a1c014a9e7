use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::{
    app_error::{AppError, AppResult},
    infra::firestore::{Document, FirestoreClient},
};

pub mod catalog_projects;
pub mod clients;
pub mod custom_projects;

pub const CLIENTS_COLLECTION: &str = "clientes";
pub const CUSTOM_PROJECTS_COLLECTION: &str = "software_personalizado";
pub const CATALOG_PROJECTS_COLLECTION: &str = "projetos";

const MAX_JSON_LOG_LEN: usize = 200;

/// Deserializes a stored document into its typed form.
///
/// Documents are shared with other systems, so a shape mismatch is logged
/// with a truncated copy of the raw data and reported as a store error
/// rather than silently replaced by defaults (the caller may rewrite part
/// of the document afterwards).
pub fn parse_document<T: DeserializeOwned>(
    doc: Document,
    entity_type: &str,
) -> AppResult<(String, T)> {
    let raw = Value::Object(doc.fields);
    match serde_json::from_value::<T>(raw.clone()) {
        Ok(parsed) => Ok((doc.id, parsed)),
        Err(err) => {
            // Truncate raw JSON to prevent log bloat from large arrays
            let raw_str = raw.to_string();
            let truncated = if raw_str.len() > MAX_JSON_LOG_LEN {
                let cut = (0..=MAX_JSON_LOG_LEN)
                    .rev()
                    .find(|i| raw_str.is_char_boundary(*i))
                    .unwrap_or(0);
                format!("{}...", &raw_str[..cut])
            } else {
                raw_str
            };

            tracing::warn!(
                entity_type = entity_type,
                entity_id = %doc.id,
                raw_json = %truncated,
                error = %err,
                "Failed to parse stored document"
            );
            Err(AppError::Store(format!(
                "Malformed {} document {}",
                entity_type, doc.id
            )))
        }
    }
}

#[derive(Clone)]
pub struct FirestorePersistence {
    client: Arc<FirestoreClient>,
}

impl FirestorePersistence {
    pub fn new(client: Arc<FirestoreClient>) -> Self {
        FirestorePersistence { client }
    }

    pub fn client(&self) -> &FirestoreClient {
        &self.client
    }
}
