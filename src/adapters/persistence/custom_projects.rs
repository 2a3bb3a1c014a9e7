use async_trait::async_trait;
use serde_json::Value;
use tracing::instrument;

use crate::{
    adapters::persistence::{CUSTOM_PROJECTS_COLLECTION, FirestorePersistence, parse_document},
    app_error::{AppError, AppResult},
    domain::entities::custom_project::{CustomProject, ProjectPaymentUpdate},
    use_cases::custom_software::CustomProjectRepo,
};

#[async_trait]
impl CustomProjectRepo for FirestorePersistence {
    #[instrument(skip(self))]
    async fn find_by_client_and_name(
        &self,
        client_id: &str,
        project_name: &str,
    ) -> AppResult<Vec<CustomProject>> {
        let docs = self
            .client()
            .query_equal(
                CUSTOM_PROJECTS_COLLECTION,
                &[("clienteId", client_id), ("nomeProjeto", project_name)],
                None,
            )
            .await?;

        docs.into_iter()
            .map(|doc| {
                let (id, mut project) = parse_document::<CustomProject>(doc, "custom_project")?;
                project.id = id;
                Ok(project)
            })
            .collect()
    }

    #[instrument(skip(self, update), fields(status = %update.status))]
    async fn apply_payment_update(
        &self,
        project_id: &str,
        update: &ProjectPaymentUpdate,
    ) -> AppResult<()> {
        self.client()
            .update_fields(CUSTOM_PROJECTS_COLLECTION, project_id, &update.to_fields())
            .await
    }

    #[instrument(skip(self, project))]
    async fn create(&self, project: &CustomProject) -> AppResult<String> {
        let fields = match serde_json::to_value(project) {
            Ok(Value::Object(fields)) => fields,
            Ok(_) => return Err(AppError::Internal("Project did not encode to a map".into())),
            Err(e) => return Err(AppError::Internal(format!("Failed to encode project: {}", e))),
        };
        self.client()
            .create_document(CUSTOM_PROJECTS_COLLECTION, &fields)
            .await
    }
}
