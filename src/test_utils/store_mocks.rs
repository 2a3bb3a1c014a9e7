//! In-memory implementations of the document-store repository traits.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use tokio::sync::Barrier;

use crate::{
    app_error::{AppError, AppResult},
    application::use_cases::{
        clients::ClientRepo, custom_software::CustomProjectRepo, opencode::ProjectCatalogRepo,
    },
    domain::entities::{
        catalog_project::CatalogProject,
        client::{ClientRecord, Invoice, Plan},
        custom_project::{CustomProject, ProjectPaymentUpdate},
    },
};

fn unavailable() -> AppError {
    AppError::Store("document store unavailable".into())
}

// ============================================================================
// InMemoryClientRepo
// ============================================================================

#[derive(Default)]
pub struct InMemoryClientRepo {
    pub clients: Mutex<HashMap<String, ClientRecord>>,
    writes: Mutex<usize>,
    read_barrier: Option<Arc<Barrier>>,
    failing: bool,
}

impl InMemoryClientRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(self, client: ClientRecord) -> Self {
        self.clients
            .lock()
            .unwrap()
            .insert(client.id.clone(), client);
        self
    }

    /// Every `get_client` waits on `barrier` after taking its snapshot, so
    /// concurrent callers are guaranteed to read before anyone writes.
    pub fn with_read_barrier(mut self, barrier: Arc<Barrier>) -> Self {
        self.read_barrier = Some(barrier);
        self
    }

    /// Every call fails with a store error.
    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    pub fn client(&self, id: &str) -> Option<ClientRecord> {
        self.clients.lock().unwrap().get(id).cloned()
    }

    pub fn write_count(&self) -> usize {
        *self.writes.lock().unwrap()
    }

    fn write(&self, client_id: &str, apply: impl FnOnce(&mut ClientRecord)) -> AppResult<()> {
        if self.failing {
            return Err(unavailable());
        }
        let mut clients = self.clients.lock().unwrap();
        let client = clients
            .get_mut(client_id)
            .ok_or_else(|| AppError::not_found("Cliente não encontrado"))?;
        apply(client);
        *self.writes.lock().unwrap() += 1;
        Ok(())
    }
}

#[async_trait]
impl ClientRepo for InMemoryClientRepo {
    async fn get_client(&self, client_id: &str) -> AppResult<Option<ClientRecord>> {
        if self.failing {
            return Err(unavailable());
        }
        let snapshot = self.client(client_id);
        if let Some(barrier) = &self.read_barrier {
            barrier.wait().await;
        }
        Ok(snapshot)
    }

    async fn save_invoices(&self, client_id: &str, invoices: &[Invoice]) -> AppResult<()> {
        self.write(client_id, |c| c.faturas = invoices.to_vec())
    }

    async fn save_plans(&self, client_id: &str, plans: &[Plan]) -> AppResult<()> {
        self.write(client_id, |c| c.planos = plans.to_vec())
    }
}

// ============================================================================
// InMemoryCustomProjectRepo
// ============================================================================

#[derive(Default)]
pub struct InMemoryCustomProjectRepo {
    /// Kept in insertion order so query results are deterministic.
    pub projects: Mutex<Vec<CustomProject>>,
    updates: Mutex<usize>,
    failing: bool,
}

impl InMemoryCustomProjectRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_project(self, project: CustomProject) -> Self {
        self.projects.lock().unwrap().push(project);
        self
    }

    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    pub fn project(&self, id: &str) -> Option<CustomProject> {
        self.projects
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.id == id)
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.projects.lock().unwrap().len()
    }

    pub fn update_count(&self) -> usize {
        *self.updates.lock().unwrap()
    }
}

#[async_trait]
impl CustomProjectRepo for InMemoryCustomProjectRepo {
    async fn find_by_client_and_name(
        &self,
        client_id: &str,
        project_name: &str,
    ) -> AppResult<Vec<CustomProject>> {
        if self.failing {
            return Err(unavailable());
        }
        Ok(self
            .projects
            .lock()
            .unwrap()
            .iter()
            .filter(|p| p.client_id == client_id && p.project_name == project_name)
            .cloned()
            .collect())
    }

    async fn apply_payment_update(
        &self,
        project_id: &str,
        update: &ProjectPaymentUpdate,
    ) -> AppResult<()> {
        if self.failing {
            return Err(unavailable());
        }
        let mut projects = self.projects.lock().unwrap();
        let project = projects
            .iter_mut()
            .find(|p| p.id == project_id)
            .ok_or_else(|| AppError::not_found("Projeto não encontrado"))?;

        for (field, value) in update.to_fields() {
            if field == "status_pagamento" {
                project.payment_status = value.as_str().map(str::to_string);
            } else {
                project.extra.insert(field, value);
            }
        }
        *self.updates.lock().unwrap() += 1;
        Ok(())
    }

    async fn create(&self, project: &CustomProject) -> AppResult<String> {
        if self.failing {
            return Err(unavailable());
        }
        let mut projects = self.projects.lock().unwrap();
        let id = format!("proj-auto-{}", projects.len() + 1);
        let mut stored = project.clone();
        stored.id = id.clone();
        projects.push(stored);
        Ok(id)
    }
}

// ============================================================================
// InMemoryProjectCatalogRepo
// ============================================================================

#[derive(Default)]
pub struct InMemoryProjectCatalogRepo {
    pub projects: Mutex<Vec<CatalogProject>>,
}

impl InMemoryProjectCatalogRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_project(self, project: CatalogProject) -> Self {
        self.projects.lock().unwrap().push(project);
        self
    }
}

#[async_trait]
impl ProjectCatalogRepo for InMemoryProjectCatalogRepo {
    async fn find_by_service_id(&self, service_id: &str) -> AppResult<Option<CatalogProject>> {
        Ok(self
            .projects
            .lock()
            .unwrap()
            .iter()
            .find(|p| p.service_id.as_deref() == Some(service_id))
            .cloned())
    }
}
