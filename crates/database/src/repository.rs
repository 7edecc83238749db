use crate::DbError;
use core_types::{Category, Material, NewProject, Project, ProjectUpdate, Step};
use rust_decimal::Decimal;
use sqlx::postgres::{PgPool, Postgres};
use sqlx::{FromRow, Transaction};

/// The `ProjectRepository` provides a high-level, application-specific
/// interface to the database. It encapsulates all SQL queries, transaction
/// boundaries, and row-to-entity mapping for the project tables.
#[derive(Debug, Clone)]
pub struct ProjectRepository {
    pool: PgPool,
}

/// The scalar columns of a `project` row, before its children are attached.
#[derive(Debug, Clone, FromRow)]
struct ProjectRow {
    project_id: i32,
    project_name: String,
    estimated_hours: Option<Decimal>,
    actual_hours: Option<Decimal>,
    difficulty: Option<i32>,
    notes: Option<String>,
}

impl ProjectRepository {
    /// Creates a new `ProjectRepository` with a shared database connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts a project together with its materials, steps, and categories
    /// as a single all-or-nothing transaction.
    ///
    /// Generated keys are taken from `RETURNING` clauses on each insert, so
    /// ids are correct even with other writers on the pool. Steps receive a
    /// positional `step_order` of 1..n in submission order. Categories are
    /// resolved by name and reused when a row already exists.
    ///
    /// Returns the fully hydrated project carrying every generated id. Any
    /// failure rolls the whole transaction back; no partial project is left
    /// behind.
    pub async fn insert_project(&self, new_project: &NewProject) -> Result<Project, DbError> {
        let mut tx = self.pool.begin().await?;

        let project_id: i32 = sqlx::query_scalar(
            "INSERT INTO project (project_name, estimated_hours, actual_hours, difficulty, notes) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING project_id",
        )
        .bind(new_project.project_name())
        .bind(new_project.estimated_hours())
        .bind(new_project.actual_hours())
        .bind(new_project.difficulty())
        .bind(new_project.notes())
        .fetch_one(&mut *tx)
        .await?;

        let materials = Self::insert_materials(&mut tx, project_id, new_project).await?;
        let steps = Self::insert_steps(&mut tx, project_id, new_project).await?;
        let categories = Self::insert_categories(&mut tx, project_id, new_project).await?;

        tx.commit().await?;

        tracing::debug!(project_id, "inserted project aggregate");

        Ok(Project {
            project_id,
            project_name: new_project.project_name().to_string(),
            estimated_hours: new_project.estimated_hours(),
            actual_hours: new_project.actual_hours(),
            difficulty: new_project.difficulty(),
            notes: new_project.notes().map(str::to_string),
            materials,
            steps,
            categories,
        })
    }

    /// Inserts the material rows for a freshly inserted project, in the
    /// order they were submitted.
    async fn insert_materials(
        tx: &mut Transaction<'_, Postgres>,
        project_id: i32,
        new_project: &NewProject,
    ) -> Result<Vec<Material>, DbError> {
        let mut materials = Vec::with_capacity(new_project.materials().len());

        for material in new_project.materials() {
            let material_id: i32 = sqlx::query_scalar(
                "INSERT INTO material (project_id, material_name, num_required, cost) \
                 VALUES ($1, $2, $3, $4) \
                 RETURNING material_id",
            )
            .bind(project_id)
            .bind(material.material_name())
            .bind(material.num_required())
            .bind(material.cost())
            .fetch_one(&mut **tx)
            .await?;

            materials.push(Material {
                material_id,
                project_id,
                material_name: material.material_name().to_string(),
                num_required: material.num_required(),
                cost: material.cost(),
            });
        }

        Ok(materials)
    }

    /// Inserts the step rows for a freshly inserted project. The persisted
    /// `step_order` is the 1-based position in the submitted sequence.
    async fn insert_steps(
        tx: &mut Transaction<'_, Postgres>,
        project_id: i32,
        new_project: &NewProject,
    ) -> Result<Vec<Step>, DbError> {
        let mut steps = Vec::with_capacity(new_project.steps().len());

        for (index, step) in new_project.steps().iter().enumerate() {
            let step_order = index as i32 + 1;
            let step_id: i32 = sqlx::query_scalar(
                "INSERT INTO step (project_id, step_text, step_order) \
                 VALUES ($1, $2, $3) \
                 RETURNING step_id",
            )
            .bind(project_id)
            .bind(step.step_text())
            .bind(step_order)
            .fetch_one(&mut **tx)
            .await?;

            steps.push(Step {
                step_id,
                project_id,
                step_text: step.step_text().to_string(),
                step_order,
            });
        }

        Ok(steps)
    }

    /// Resolves each category by name, creating missing ones, and links them
    /// to the project.
    async fn insert_categories(
        tx: &mut Transaction<'_, Postgres>,
        project_id: i32,
        new_project: &NewProject,
    ) -> Result<Vec<Category>, DbError> {
        let mut categories = Vec::with_capacity(new_project.categories().len());

        for category in new_project.categories() {
            let category_id = Self::resolve_category_id(tx, category.category_name()).await?;

            // The pair is the primary key; re-linking the same category is a no-op.
            sqlx::query(
                "INSERT INTO project_category (project_id, category_id) \
                 VALUES ($1, $2) \
                 ON CONFLICT (project_id, category_id) DO NOTHING",
            )
            .bind(project_id)
            .bind(category_id)
            .execute(&mut **tx)
            .await?;

            categories.push(Category {
                category_id,
                category_name: category.category_name().to_string(),
            });
        }

        Ok(categories)
    }

    /// Returns the id for a category name, inserting the row if it does not
    /// exist yet.
    ///
    /// `ON CONFLICT DO NOTHING` makes the insert race-safe against other
    /// clients creating the same name concurrently: when the insert returns
    /// no row, the name already exists and a re-read picks up the winner's id.
    async fn resolve_category_id(
        tx: &mut Transaction<'_, Postgres>,
        category_name: &str,
    ) -> Result<i32, DbError> {
        let inserted: Option<i32> = sqlx::query_scalar(
            "INSERT INTO category (category_name) \
             VALUES ($1) \
             ON CONFLICT (category_name) DO NOTHING \
             RETURNING category_id",
        )
        .bind(category_name)
        .fetch_optional(&mut **tx)
        .await?;

        match inserted {
            Some(category_id) => Ok(category_id),
            None => {
                let category_id: i32 =
                    sqlx::query_scalar("SELECT category_id FROM category WHERE category_name = $1")
                        .bind(category_name)
                        .fetch_one(&mut **tx)
                        .await?;
                Ok(category_id)
            }
        }
    }

    /// Fetches all projects, ordered by id, each hydrated with its
    /// materials, steps, and categories.
    ///
    /// Read-only: no transaction is taken, so concurrent writers are
    /// tolerated at the store's default isolation level.
    pub async fn fetch_all_projects(&self) -> Result<Vec<Project>, DbError> {
        let rows: Vec<ProjectRow> = sqlx::query_as(
            "SELECT project_id, project_name, estimated_hours, actual_hours, difficulty, notes \
             FROM project \
             ORDER BY project_id",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut projects = Vec::with_capacity(rows.len());
        for row in rows {
            projects.push(self.hydrate(row).await?);
        }

        Ok(projects)
    }

    /// Fetches a single project by id, hydrated with its children.
    ///
    /// Returns `Ok(None)` when no such row exists; store failures surface
    /// as `Err` so callers can tell the two apart.
    pub async fn fetch_project_by_id(&self, project_id: i32) -> Result<Option<Project>, DbError> {
        let row: Option<ProjectRow> = sqlx::query_as(
            "SELECT project_id, project_name, estimated_hours, actual_hours, difficulty, notes \
             FROM project \
             WHERE project_id = $1",
        )
        .bind(project_id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(self.hydrate(row).await?)),
            None => Ok(None),
        }
    }

    /// Attaches the child collections to a project row.
    async fn hydrate(&self, row: ProjectRow) -> Result<Project, DbError> {
        let materials = self.fetch_materials_for_project(row.project_id).await?;
        let steps = self.fetch_steps_for_project(row.project_id).await?;
        let categories = self.fetch_categories_for_project(row.project_id).await?;

        Ok(Project {
            project_id: row.project_id,
            project_name: row.project_name,
            estimated_hours: row.estimated_hours,
            actual_hours: row.actual_hours,
            difficulty: row.difficulty,
            notes: row.notes,
            materials,
            steps,
            categories,
        })
    }

    async fn fetch_materials_for_project(&self, project_id: i32) -> Result<Vec<Material>, DbError> {
        let materials = sqlx::query_as::<_, Material>(
            "SELECT material_id, project_id, material_name, num_required, cost \
             FROM material \
             WHERE project_id = $1 \
             ORDER BY material_id",
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(materials)
    }

    async fn fetch_steps_for_project(&self, project_id: i32) -> Result<Vec<Step>, DbError> {
        let steps = sqlx::query_as::<_, Step>(
            "SELECT step_id, project_id, step_text, step_order \
             FROM step \
             WHERE project_id = $1 \
             ORDER BY step_order",
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(steps)
    }

    async fn fetch_categories_for_project(&self, project_id: i32) -> Result<Vec<Category>, DbError> {
        let categories = sqlx::query_as::<_, Category>(
            "SELECT c.category_id, c.category_name \
             FROM category c \
             JOIN project_category pc USING (category_id) \
             WHERE pc.project_id = $1 \
             ORDER BY c.category_id",
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(categories)
    }

    /// Overwrites the scalar fields of an existing project inside a
    /// transaction and returns the number of rows affected.
    ///
    /// Zero rows affected still commits cleanly; deciding whether a missing
    /// target is noteworthy is left to the caller.
    pub async fn update_project(&self, update: &ProjectUpdate) -> Result<u64, DbError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            "UPDATE project \
             SET project_name = $1, estimated_hours = $2, actual_hours = $3, \
                 difficulty = $4, notes = $5 \
             WHERE project_id = $6",
        )
        .bind(update.project_name())
        .bind(update.estimated_hours())
        .bind(update.actual_hours())
        .bind(update.difficulty())
        .bind(update.notes())
        .bind(update.project_id())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(result.rows_affected())
    }

    /// Deletes a project by id inside a transaction and returns the number
    /// of rows affected. Materials, steps, and category links are removed by
    /// the `ON DELETE CASCADE` constraints declared in the schema.
    pub async fn delete_project(&self, project_id: i32) -> Result<u64, DbError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("DELETE FROM project WHERE project_id = $1")
            .bind(project_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::debug!(project_id, rows = result.rows_affected(), "deleted project");

        Ok(result.rows_affected())
    }
}
