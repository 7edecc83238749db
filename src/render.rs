//! Text rendering for project listings and detail views.

use comfy_table::Table;
use core_types::Project;
use rust_decimal::Decimal;

fn optional_decimal(value: Option<Decimal>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".into())
}

fn optional_int(value: Option<i32>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".into())
}

/// Builds the summary table shown by the list operation.
pub fn project_table(projects: &[Project]) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        "ID",
        "Name",
        "Est. hours",
        "Actual hours",
        "Difficulty",
        "Materials",
        "Steps",
        "Categories",
    ]);

    for project in projects {
        table.add_row(vec![
            project.project_id.to_string(),
            project.project_name.clone(),
            optional_decimal(project.estimated_hours),
            optional_decimal(project.actual_hours),
            optional_int(project.difficulty),
            project.materials.len().to_string(),
            project.steps.len().to_string(),
            project
                .categories
                .iter()
                .map(|c| c.category_name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        ]);
    }

    table
}

/// Prints the full detail view of one project: scalar fields, then each
/// child collection in its stored order.
pub fn print_project_details(project: &Project) {
    println!("\nProject {}: {}", project.project_id, project.project_name);
    println!("  Estimated hours: {}", optional_decimal(project.estimated_hours));
    println!("  Actual hours:    {}", optional_decimal(project.actual_hours));
    println!("  Difficulty:      {}", optional_int(project.difficulty));
    println!(
        "  Notes:           {}",
        project.notes.as_deref().unwrap_or("-")
    );

    if !project.materials.is_empty() {
        let mut table = Table::new();
        table.set_header(vec!["ID", "Material", "Qty", "Cost"]);
        for material in &project.materials {
            table.add_row(vec![
                material.material_id.to_string(),
                material.material_name.clone(),
                material.num_required.to_string(),
                material.cost.to_string(),
            ]);
        }
        println!("\nMaterials:\n{table}");
    }

    if !project.steps.is_empty() {
        println!("\nSteps:");
        for step in &project.steps {
            println!("  {}. {}", step.step_order, step.step_text);
        }
    }

    if !project.categories.is_empty() {
        println!("\nCategories:");
        for category in &project.categories {
            println!("  [{}] {}", category.category_id, category.category_name);
        }
    }
}
