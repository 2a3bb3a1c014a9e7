use async_trait::async_trait;
use tracing::instrument;

use crate::{
    adapters::persistence::{CATALOG_PROJECTS_COLLECTION, FirestorePersistence, parse_document},
    app_error::AppResult,
    domain::entities::catalog_project::CatalogProject,
    infra::firestore::Document,
    use_cases::opencode::ProjectCatalogRepo,
};

/// First match of a `servicoId` query, if any.
fn first_project(docs: Vec<Document>) -> AppResult<Option<CatalogProject>> {
    let Some(doc) = docs.into_iter().next() else {
        return Ok(None);
    };
    let (id, mut project) = parse_document::<CatalogProject>(doc, "catalog_project")?;
    project.id = id;
    Ok(Some(project))
}

#[async_trait]
impl ProjectCatalogRepo for FirestorePersistence {
    #[instrument(skip(self))]
    async fn find_by_service_id(&self, service_id: &str) -> AppResult<Option<CatalogProject>> {
        let docs = self
            .client()
            .query_equal(
                CATALOG_PROJECTS_COLLECTION,
                &[("servicoId", service_id)],
                Some(1),
            )
            .await?;

        first_project(docs)
    }
}
