//! # Workshop Service Crate
//!
//! The service facade between the menu/CLI layer and the persistence
//! gateway. It validates arguments before any store access, turns an absent
//! lookup result into a terminal "no such project" signal, and otherwise
//! forwards calls unchanged. Gateway errors pass through with their cause
//! intact.

use core_types::{NewProject, Project, ProjectUpdate};
use database::ProjectRepository;

pub mod error;

pub use error::ServiceError;

/// Provides the application-level operations on projects. One instance is
/// shared for the lifetime of the program; each call borrows a connection
/// from the underlying pool.
#[derive(Debug, Clone)]
pub struct ProjectService {
    repository: ProjectRepository,
}

impl ProjectService {
    /// Creates a new `ProjectService` over the given repository.
    pub fn new(repository: ProjectRepository) -> Self {
        Self { repository }
    }

    /// Validates and persists a new project with its materials, steps, and
    /// categories. Validation failures are reported immediately, before any
    /// store access.
    pub async fn add_project(&self, new_project: &NewProject) -> Result<Project, ServiceError> {
        new_project.validate()?;

        let project = self.repository.insert_project(new_project).await?;
        tracing::info!(
            project_id = project.project_id,
            name = %project.project_name,
            "project created"
        );
        Ok(project)
    }

    /// Fetches all projects with their associated materials, steps, and
    /// categories.
    pub async fn fetch_all_projects(&self) -> Result<Vec<Project>, ServiceError> {
        Ok(self.repository.fetch_all_projects().await?)
    }

    /// Fetches a project by id. A missing row is reported as
    /// [`ServiceError::NotFound`], distinct from any store failure.
    pub async fn fetch_project_by_id(&self, project_id: i32) -> Result<Project, ServiceError> {
        require_valid_id(project_id)?;

        self.repository
            .fetch_project_by_id(project_id)
            .await?
            .ok_or(ServiceError::NotFound(project_id))
    }

    /// Overwrites the scalar details of an existing project. Returns the
    /// number of rows affected; zero means the target did not exist, which
    /// the caller decides how to surface.
    pub async fn modify_project_details(&self, update: &ProjectUpdate) -> Result<u64, ServiceError> {
        update.validate()?;

        Ok(self.repository.update_project(update).await?)
    }

    /// Deletes a project and, through the store's cascades, its children.
    /// Returns the number of rows affected; zero is not an error here.
    pub async fn delete_project(&self, project_id: i32) -> Result<u64, ServiceError> {
        require_valid_id(project_id)?;

        Ok(self.repository.delete_project(project_id).await?)
    }
}

/// Rejects identifiers that cannot possibly name a row. Reported without
/// touching the store.
fn require_valid_id(project_id: i32) -> Result<(), ServiceError> {
    if project_id <= 0 {
        return Err(ServiceError::InvalidArgument(format!(
            "project ID must be positive, got {project_id}"
        )));
    }
    Ok(())
}
