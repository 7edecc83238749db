//! Integration tests for the service facade: argument validation happens
//! before the store is touched, and "not found" is distinguishable from
//! invalid input and from store failures.

use database::ProjectRepository;
use rust_decimal_macros::dec;
use service::{ProjectService, ServiceError};
use sqlx::PgPool;

use core_types::{NewMaterial, NewProject, ProjectUpdate};

fn service(pool: PgPool) -> ProjectService {
    ProjectService::new(ProjectRepository::new(pool))
}

#[sqlx::test(migrations = "../database/migrations")]
async fn add_project_rejects_invalid_difficulty_without_store_access(pool: PgPool) {
    let service = service(pool.clone());

    let invalid = NewProject::new("Treehouse").with_difficulty(9);
    let err = service.add_project(&invalid).await.unwrap_err();
    assert!(matches!(err, ServiceError::InvalidArgument(_)));

    // Nothing reached the store.
    let rows: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM project")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(rows.0, 0);
}

#[sqlx::test(migrations = "../database/migrations")]
async fn add_project_rejects_negative_material_quantity(pool: PgPool) {
    let service = service(pool);

    let mut invalid = NewProject::new("Treehouse");
    invalid.add_material(NewMaterial::new("Rope", -2, dec!(3.00)));

    let err = service.add_project(&invalid).await.unwrap_err();
    assert!(matches!(err, ServiceError::InvalidArgument(_)));
}

#[sqlx::test(migrations = "../database/migrations")]
async fn fetch_by_id_distinguishes_invalid_argument_from_not_found(pool: PgPool) {
    let service = service(pool);

    let err = service.fetch_project_by_id(0).await.unwrap_err();
    assert!(matches!(err, ServiceError::InvalidArgument(_)));

    let err = service.fetch_project_by_id(777).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(777)));
}

#[sqlx::test(migrations = "../database/migrations")]
async fn add_then_fetch_returns_the_hydrated_project(pool: PgPool) {
    let service = service(pool);

    let mut new_project = NewProject::new("Workbench").with_estimated_hours(dec!(12.345));
    new_project.add_material(NewMaterial::new("Plywood", 2, dec!(20.00)));

    let created = service.add_project(&new_project).await.unwrap();

    // Hours were normalized half-up before persistence.
    assert_eq!(created.estimated_hours, Some(dec!(12.35)));

    let fetched = service.fetch_project_by_id(created.project_id).await.unwrap();
    assert_eq!(fetched, created);
}

#[sqlx::test(migrations = "../database/migrations")]
async fn modify_validates_before_store_and_reports_missing_rows(pool: PgPool) {
    let service = service(pool);

    let err = service
        .modify_project_details(&ProjectUpdate::new(0, "Nameless"))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::InvalidArgument(_)));

    // A valid id that matches nothing commits cleanly and reports 0 rows.
    let rows = service
        .modify_project_details(&ProjectUpdate::new(555, "Ghost"))
        .await
        .unwrap();
    assert_eq!(rows, 0);
}

#[sqlx::test(migrations = "../database/migrations")]
async fn delete_validates_id_and_tolerates_missing_rows(pool: PgPool) {
    let service = service(pool);

    let err = service.delete_project(-1).await.unwrap_err();
    assert!(matches!(err, ServiceError::InvalidArgument(_)));

    let rows = service.delete_project(555).await.unwrap();
    assert_eq!(rows, 0);
}
