use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Document from the `projetos` collection: a source-code product that can be
/// unlocked through the opencode flow.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogProject {
    #[serde(skip)]
    pub id: String,
    #[serde(rename = "servicoId", default, skip_serializing_if = "Option::is_none")]
    pub service_id: Option<String>,
    #[serde(rename = "titulo", default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "downloadLink", default, skip_serializing_if = "Option::is_none")]
    pub download_link: Option<String>,
    #[serde(rename = "preco", default, skip_serializing_if = "Option::is_none")]
    pub price: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CatalogProject {
    /// Price rendered the way plans store it: text, `"0"` when unset.
    pub fn price_label(&self) -> String {
        match &self.price {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => "0".to_string(),
        }
    }
}
