use std::sync::Arc;

use async_trait::async_trait;
use chrono::Local;
use tracing::{info, instrument, warn};

use crate::{
    app_error::{AppError, AppResult},
    application::helpers::timestamps::iso_local,
    domain::entities::{
        custom_project::{CustomProject, ProjectPaymentStatus, ProjectPaymentUpdate},
        payment_event::{EventKind, WebhookEvent},
    },
};

/// Access to the `software_personalizado` collection.
#[async_trait]
pub trait CustomProjectRepo: Send + Sync {
    /// All projects matching both the client id and the project name.
    async fn find_by_client_and_name(
        &self,
        client_id: &str,
        project_name: &str,
    ) -> AppResult<Vec<CustomProject>>;

    async fn apply_payment_update(
        &self,
        project_id: &str,
        update: &ProjectPaymentUpdate,
    ) -> AppResult<()>;

    /// Stores a new project under a generated id and returns that id.
    async fn create(&self, project: &CustomProject) -> AppResult<String>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectPaymentOutcome {
    Updated {
        project_ids: Vec<String>,
        status: ProjectPaymentStatus,
    },
    /// A `payment_intent.*` event that does not change the payment status,
    /// or any other event type.
    Ignored,
}

#[derive(Clone)]
pub struct CustomSoftwareUseCases {
    projects: Arc<dyn CustomProjectRepo>,
}

impl CustomSoftwareUseCases {
    pub fn new(projects: Arc<dyn CustomProjectRepo>) -> Self {
        Self { projects }
    }

    #[instrument(skip(self, event), fields(event_id = event.event_id(), event_type = %event.event_type))]
    pub async fn handle_event(&self, event: &WebhookEvent) -> AppResult<ProjectPaymentOutcome> {
        let status = match event.kind() {
            EventKind::PaymentIntentSucceeded => ProjectPaymentStatus::Paid,
            EventKind::PaymentIntentCanceled => ProjectPaymentStatus::Canceled,
            other => {
                if other.is_payment_intent() {
                    info!(event_type = %other, "Payment intent event without status change");
                }
                return Ok(ProjectPaymentOutcome::Ignored);
            }
        };

        let client_id = event.metadata_value(&["projectId"]);
        let project_name = event.metadata_value(&["projectName"]);
        let (Some(client_id), Some(project_name)) = (client_id, project_name) else {
            return Err(AppError::missing("Metadados inválidos"));
        };

        let update = ProjectPaymentUpdate {
            status,
            changed_at: iso_local(Local::now()),
        };
        self.update_payment_status(&client_id, &project_name, &update)
            .await
    }

    /// Applies `update` to every project matching the pair.
    pub async fn update_payment_status(
        &self,
        client_id: &str,
        project_name: &str,
        update: &ProjectPaymentUpdate,
    ) -> AppResult<ProjectPaymentOutcome> {
        let matches = self
            .projects
            .find_by_client_and_name(client_id, project_name)
            .await?;

        if matches.is_empty() {
            return Err(AppError::not_found("Projeto não encontrado"));
        }
        if matches.len() > 1 {
            warn!(
                client_id,
                project_name,
                matches = matches.len(),
                "Several projects share client and name, updating all of them"
            );
        }

        let mut project_ids = Vec::with_capacity(matches.len());
        for project in matches {
            self.projects.apply_payment_update(&project.id, update).await?;
            info!(
                project_id = %project.id,
                status = %update.status,
                "Custom software payment status updated"
            );
            project_ids.push(project.id);
        }

        Ok(ProjectPaymentOutcome::Updated {
            project_ids,
            status: update.status,
        })
    }

    /// Returns the first project matching the pair, creating it from `seed`
    /// when none exists.
    #[instrument(skip(self, seed))]
    pub async fn ensure_project(
        &self,
        client_id: &str,
        project_name: &str,
        seed: CustomProject,
    ) -> AppResult<CustomProject> {
        let existing = self
            .projects
            .find_by_client_and_name(client_id, project_name)
            .await?;
        if let Some(project) = existing.into_iter().next() {
            return Ok(project);
        }

        let mut project = CustomProject {
            client_id: client_id.to_string(),
            project_name: project_name.to_string(),
            ..seed
        };
        project.id = self.projects.create(&project).await?;
        info!(project_id = %project.id, "Custom software project created");
        Ok(project)
    }

    /// Current `status_pagamento` of every project matching the pair.
    pub async fn payment_statuses(
        &self,
        client_id: &str,
        project_name: &str,
    ) -> AppResult<Vec<Option<String>>> {
        let projects = self
            .projects
            .find_by_client_and_name(client_id, project_name)
            .await?;
        Ok(projects.into_iter().map(|p| p.payment_status).collect())
    }
}
