//! Integration tests for the project repository against a real database:
//! - Transactional insert of the full aggregate (materials, steps, categories)
//! - Hydrated fetches, ordering of children
//! - Category reuse across projects
//! - Cascade delete behaviour
//! - Rollback on mid-insert failure

use database::ProjectRepository;
use rust_decimal_macros::dec;
use sqlx::PgPool;

use core_types::{NewCategory, NewMaterial, NewProject, NewStep, ProjectUpdate};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn birdhouse() -> NewProject {
    let mut project = NewProject::new("Birdhouse")
        .with_estimated_hours(dec!(3.50))
        .with_difficulty(2);
    project.add_material(NewMaterial::new("Wood", 4, dec!(5.00)));
    project.add_step(NewStep::new("Cut wood"));
    project.add_step(NewStep::new("Assemble"));
    project.add_category(NewCategory::new("Woodworking"));
    project
}

async fn count(pool: &PgPool, table: &str) -> i64 {
    let row: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .unwrap_or_else(|e| panic!("{table} count query failed: {e}"));
    row.0
}

// ---------------------------------------------------------------------------
// Insert + fetch
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn insert_then_fetch_round_trips_the_aggregate(pool: PgPool) {
    let repo = ProjectRepository::new(pool);

    let inserted = repo.insert_project(&birdhouse()).await.unwrap();
    assert!(inserted.project_id > 0);

    let fetched = repo
        .fetch_project_by_id(inserted.project_id)
        .await
        .unwrap()
        .expect("inserted project should be fetchable");

    assert_eq!(fetched.project_name, "Birdhouse");
    assert_eq!(fetched.estimated_hours, Some(dec!(3.50)));
    assert_eq!(fetched.actual_hours, None);
    assert_eq!(fetched.difficulty, Some(2));

    assert_eq!(fetched.materials.len(), 1);
    assert_eq!(fetched.materials[0].material_name, "Wood");
    assert_eq!(fetched.materials[0].num_required, 4);
    assert_eq!(fetched.materials[0].cost, dec!(5.00));
    assert_eq!(fetched.materials[0].project_id, inserted.project_id);

    let orders: Vec<i32> = fetched.steps.iter().map(|s| s.step_order).collect();
    let texts: Vec<&str> = fetched.steps.iter().map(|s| s.step_text.as_str()).collect();
    assert_eq!(orders, vec![1, 2]);
    assert_eq!(texts, vec!["Cut wood", "Assemble"]);

    assert_eq!(fetched.categories.len(), 1);
    assert_eq!(fetched.categories[0].category_name, "Woodworking");
    assert!(fetched.categories[0].category_id > 0);

    // The value returned by insert already carries every generated id.
    assert_eq!(fetched, inserted);
}

#[sqlx::test(migrations = "./migrations")]
async fn insert_without_children_round_trips(pool: PgPool) {
    let repo = ProjectRepository::new(pool);

    let inserted = repo
        .insert_project(&NewProject::new("Bare project"))
        .await
        .unwrap();

    let fetched = repo
        .fetch_project_by_id(inserted.project_id)
        .await
        .unwrap()
        .unwrap();

    assert!(fetched.materials.is_empty());
    assert!(fetched.steps.is_empty());
    assert!(fetched.categories.is_empty());
    assert_eq!(fetched.estimated_hours, None);
    assert_eq!(fetched.difficulty, None);
}

#[sqlx::test(migrations = "./migrations")]
async fn step_order_is_positional_in_submission_order(pool: PgPool) {
    let repo = ProjectRepository::new(pool);

    let mut project = NewProject::new("Bookshelf");
    for text in ["Measure", "Saw", "Sand", "Stain", "Mount"] {
        project.add_step(NewStep::new(text));
    }

    let inserted = repo.insert_project(&project).await.unwrap();
    let orders: Vec<i32> = inserted.steps.iter().map(|s| s.step_order).collect();
    assert_eq!(orders, vec![1, 2, 3, 4, 5]);
}

#[sqlx::test(migrations = "./migrations")]
async fn fetch_all_orders_projects_by_id(pool: PgPool) {
    let repo = ProjectRepository::new(pool);

    let first = repo.insert_project(&birdhouse()).await.unwrap();
    let second = repo
        .insert_project(&NewProject::new("Planter box"))
        .await
        .unwrap();

    let all = repo.fetch_all_projects().await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].project_id, first.project_id);
    assert_eq!(all[1].project_id, second.project_id);
    assert_eq!(all[0].materials.len(), 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn fetch_missing_project_returns_none(pool: PgPool) {
    let repo = ProjectRepository::new(pool);
    assert!(repo.fetch_project_by_id(9999).await.unwrap().is_none());
}

// ---------------------------------------------------------------------------
// Category reuse
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn category_row_is_reused_across_projects(pool: PgPool) {
    let repo = ProjectRepository::new(pool.clone());

    let mut first = NewProject::new("Radio kit");
    first.add_category(NewCategory::new("Electronics"));
    let mut second = NewProject::new("LED lamp");
    second.add_category(NewCategory::new("Electronics"));

    let first = repo.insert_project(&first).await.unwrap();
    let second = repo.insert_project(&second).await.unwrap();

    // One shared row, one link per project.
    let category_rows: (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM category WHERE category_name = 'Electronics'")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(category_rows.0, 1);
    assert_eq!(count(&pool, "project_category").await, 2);

    assert_eq!(
        first.categories[0].category_id,
        second.categories[0].category_id
    );
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn update_overwrites_scalar_fields(pool: PgPool) {
    let repo = ProjectRepository::new(pool);

    let inserted = repo.insert_project(&birdhouse()).await.unwrap();

    let update = ProjectUpdate::new(inserted.project_id, "Birdhouse deluxe")
        .with_estimated_hours(dec!(4.25))
        .with_actual_hours(dec!(5.00))
        .with_difficulty(3)
        .with_notes("Added a perch");

    let rows = repo.update_project(&update).await.unwrap();
    assert_eq!(rows, 1);

    let fetched = repo
        .fetch_project_by_id(inserted.project_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(fetched.project_name, "Birdhouse deluxe");
    assert_eq!(fetched.estimated_hours, Some(dec!(4.25)));
    assert_eq!(fetched.actual_hours, Some(dec!(5.00)));
    assert_eq!(fetched.difficulty, Some(3));
    assert_eq!(fetched.notes.as_deref(), Some("Added a perch"));

    // Children are untouched by a scalar update.
    assert_eq!(fetched.materials.len(), 1);
    assert_eq!(fetched.steps.len(), 2);
}

#[sqlx::test(migrations = "./migrations")]
async fn update_of_missing_project_affects_no_rows(pool: PgPool) {
    let repo = ProjectRepository::new(pool.clone());

    let rows = repo
        .update_project(&ProjectUpdate::new(4242, "Ghost"))
        .await
        .unwrap();
    assert_eq!(rows, 0);
    assert_eq!(count(&pool, "project").await, 0);
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn delete_cascades_to_children_and_links(pool: PgPool) {
    let repo = ProjectRepository::new(pool.clone());

    let inserted = repo.insert_project(&birdhouse()).await.unwrap();

    let rows = repo.delete_project(inserted.project_id).await.unwrap();
    assert_eq!(rows, 1);

    assert!(
        repo.fetch_project_by_id(inserted.project_id)
            .await
            .unwrap()
            .is_none()
    );
    assert_eq!(count(&pool, "material").await, 0);
    assert_eq!(count(&pool, "step").await, 0);
    assert_eq!(count(&pool, "project_category").await, 0);

    // The shared category row survives the project that introduced it.
    assert_eq!(count(&pool, "category").await, 1);
}

#[sqlx::test(migrations = "./migrations")]
async fn delete_of_missing_project_affects_no_rows(pool: PgPool) {
    let repo = ProjectRepository::new(pool);
    let rows = repo.delete_project(4242).await.unwrap();
    assert_eq!(rows, 0);
}

// ---------------------------------------------------------------------------
// Rollback
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn failure_during_category_insert_rolls_back_everything(pool: PgPool) {
    let repo = ProjectRepository::new(pool.clone());

    // The second category name exceeds VARCHAR(128), so the failure lands
    // after the project, materials, steps, and first category are in.
    let mut project = birdhouse();
    project.add_category(NewCategory::new("x".repeat(200)));

    let result = repo.insert_project(&project).await;
    assert!(result.is_err());

    assert_eq!(count(&pool, "project").await, 0);
    assert_eq!(count(&pool, "material").await, 0);
    assert_eq!(count(&pool, "step").await, 0);
    assert_eq!(count(&pool, "category").await, 0);
    assert_eq!(count(&pool, "project_category").await, 0);
}
