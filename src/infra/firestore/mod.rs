//! Minimal Firestore REST client: single-document reads and writes plus
//! equality queries, which is all the payment flows need.

pub mod auth;
pub mod value;

use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde_json::{Map, Value, json};

use crate::app_error::{AppError, AppResult};

use self::{
    auth::TokenProvider,
    value::{decode_fields, encode_fields, encode_value},
};

const FIRESTORE_API_BASE: &str = "https://firestore.googleapis.com/v1";

/// A document as plain JSON fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Last segment of the document name.
    pub id: String,
    pub fields: Map<String, Value>,
}

impl Document {
    fn from_api(raw: &Value) -> Option<Self> {
        let name = raw.get("name")?.as_str()?;
        Some(Self {
            id: name.rsplit('/').next().unwrap_or(name).to_string(),
            fields: decode_fields(raw.get("fields")),
        })
    }
}

pub struct FirestoreClient {
    client: Client,
    tokens: TokenProvider,
    /// `projects/{project}/databases/{database}/documents`
    documents_path: String,
}

impl FirestoreClient {
    pub fn new(client: Client, tokens: TokenProvider, database: &str) -> Self {
        let documents_path = format!(
            "projects/{}/databases/{}/documents",
            tokens.project_id(),
            database
        );
        Self {
            client,
            tokens,
            documents_path,
        }
    }

    fn url(&self, suffix: &str) -> String {
        format!("{}/{}{}", FIRESTORE_API_BASE, self.documents_path, suffix)
    }

    async fn request(&self, method: Method, url: String) -> AppResult<RequestBuilder> {
        let token = self.tokens.access_token().await?;
        Ok(self.client.request(method, url).bearer_auth(token))
    }

    pub async fn get_document(&self, collection: &str, id: &str) -> AppResult<Option<Document>> {
        let response = self
            .request(Method::GET, self.url(&format!("/{}/{}", collection, id)))
            .await?
            .send()
            .await
            .map_err(|e| AppError::Store(format!("Firestore request failed: {}", e)))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let body = Self::handle_response(response).await?;
        Ok(Document::from_api(&body))
    }

    /// Overwrites the given top-level fields of an existing document and
    /// leaves every other field untouched. Fails when the document is gone.
    pub async fn update_fields(
        &self,
        collection: &str,
        id: &str,
        fields: &Map<String, Value>,
    ) -> AppResult<()> {
        let mut query: Vec<(&str, String)> = fields
            .keys()
            .map(|k| ("updateMask.fieldPaths", field_path(k)))
            .collect();
        query.push(("currentDocument.exists", "true".to_string()));

        let response = self
            .request(Method::PATCH, self.url(&format!("/{}/{}", collection, id)))
            .await?
            .query(&query)
            .json(&json!({ "fields": encode_fields(fields) }))
            .send()
            .await
            .map_err(|e| AppError::Store(format!("Firestore request failed: {}", e)))?;

        Self::handle_response(response).await?;
        Ok(())
    }

    /// Adds a document with a generated id and returns that id.
    pub async fn create_document(
        &self,
        collection: &str,
        fields: &Map<String, Value>,
    ) -> AppResult<String> {
        let response = self
            .request(Method::POST, self.url(&format!("/{}", collection)))
            .await?
            .json(&json!({ "fields": encode_fields(fields) }))
            .send()
            .await
            .map_err(|e| AppError::Store(format!("Firestore request failed: {}", e)))?;

        let body = Self::handle_response(response).await?;
        Document::from_api(&body)
            .map(|doc| doc.id)
            .ok_or_else(|| AppError::Store("Created document has no name".into()))
    }

    /// Documents of `collection` whose fields equal every `(field, value)`.
    pub async fn query_equal(
        &self,
        collection: &str,
        filters: &[(&str, &str)],
        limit: Option<u32>,
    ) -> AppResult<Vec<Document>> {
        let response = self
            .request(Method::POST, self.url(":runQuery"))
            .await?
            .json(&structured_query(collection, filters, limit))
            .send()
            .await
            .map_err(|e| AppError::Store(format!("Firestore request failed: {}", e)))?;

        let body = Self::handle_response(response).await?;
        Ok(body
            .as_array()
            .map(|results| {
                results
                    .iter()
                    .filter_map(|r| r.get("document"))
                    .filter_map(Document::from_api)
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn handle_response(response: reqwest::Response) -> AppResult<Value> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::Store(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            tracing::error!(status = %status, body = %body, "Firestore API error");
            let message = serde_json::from_str::<Value>(&body)
                .ok()
                .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
                .unwrap_or_else(|| status.to_string());
            return Err(AppError::Store(message));
        }

        serde_json::from_str(&body)
            .map_err(|e| AppError::Store(format!("Failed to parse Firestore response: {}", e)))
    }
}

/// Quotes a top-level field name when it is not a plain identifier.
fn field_path(name: &str) -> String {
    let simple = name
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if simple {
        name.to_string()
    } else {
        format!("`{}`", name.replace('\\', "\\\\").replace('`', "\\`"))
    }
}

fn structured_query(collection: &str, filters: &[(&str, &str)], limit: Option<u32>) -> Value {
    let mut conditions: Vec<Value> = filters
        .iter()
        .map(|(field, value)| {
            json!({
                "fieldFilter": {
                    "field": { "fieldPath": field_path(field) },
                    "op": "EQUAL",
                    "value": encode_value(&Value::String(value.to_string())),
                }
            })
        })
        .collect();

    let mut query = json!({ "from": [{ "collectionId": collection }] });
    match conditions.len() {
        0 => {}
        1 => query["where"] = conditions.remove(0),
        _ => {
            query["where"] = json!({
                "compositeFilter": { "op": "AND", "filters": conditions }
            })
        }
    }
    if let Some(limit) = limit {
        query["limit"] = json!(limit);
    }
    json!({ "structuredQuery": query })
}
