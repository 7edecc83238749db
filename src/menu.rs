//! The interactive menu loop. Collects user input, builds entity values,
//! invokes the service facade, and renders results as text. Malformed
//! numeric input is recovered here by reprompting; it never reaches the
//! service layer.

use crate::{input, render};
use core_types::{
    NewCategory, NewMaterial, NewProject, NewStep, ProjectUpdate, validate_difficulty,
};
use rust_decimal::Decimal;
use service::ProjectService;
use std::fmt::Display;
use std::io::{self, Write};

const OPERATIONS: &[&str] = &[
    "1) Add a project",
    "2) List all projects",
    "3) Update a project",
    "4) Delete a project",
    "5) Select a project",
    "0) Exit",
];

/// Runs the menu until the user exits or input ends.
pub async fn run(service: &ProjectService) -> anyhow::Result<()> {
    loop {
        print_operations();

        let selection = match prompt("Enter a menu selection") {
            Err(err) if err.kind() == io::ErrorKind::UnexpectedEof => {
                println!("\nExiting the application. Goodbye!");
                return Ok(());
            }
            Err(err) => return Err(err.into()),
            Ok(None) => -1,
            Ok(Some(text)) => match input::parse_int(&text) {
                Ok(value) => value,
                Err(err) => {
                    println!("\n{err}. Try again.");
                    continue;
                }
            },
        };

        let result = match selection {
            0 => {
                println!("Exiting the application. Goodbye!");
                return Ok(());
            }
            1 => create_project(service).await,
            2 => list_projects(service).await,
            3 => update_project(service).await,
            4 => delete_project(service).await,
            5 => select_project(service).await,
            other => {
                println!("\n{other} is not a valid selection. Try again.");
                Ok(())
            }
        };

        if let Err(err) = result {
            if let Some(io_err) = err.downcast_ref::<io::Error>() {
                if io_err.kind() == io::ErrorKind::UnexpectedEof {
                    println!("\nExiting the application. Goodbye!");
                    return Ok(());
                }
            }
            println!("\nError: {err}. Try again.");
        }
    }
}

fn print_operations() {
    println!("\nThese are the available selections. Press the Enter key to quit:");
    for line in OPERATIONS {
        println!("  {line}");
    }
}

// ---------------------------------------------------------------------------
// Prompting helpers
// ---------------------------------------------------------------------------

/// Prints a prompt and reads one line; a blank line means "no input".
pub(crate) fn prompt(label: &str) -> io::Result<Option<String>> {
    print!("{label}: ");
    io::stdout().flush()?;

    let mut line = String::new();
    let bytes = io::stdin().read_line(&mut line)?;
    if bytes == 0 {
        return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "end of input"));
    }
    Ok(input::non_blank(&line))
}

/// Prompts until a non-blank value is entered.
fn prompt_required(label: &str) -> anyhow::Result<String> {
    loop {
        match prompt(label)? {
            Some(value) => return Ok(value),
            None => println!("A value is required."),
        }
    }
}

/// Prompts for an optional decimal, reprompting on malformed input.
fn prompt_decimal(label: &str) -> anyhow::Result<Option<Decimal>> {
    loop {
        match prompt(label)? {
            None => return Ok(None),
            Some(text) => match input::parse_decimal(&text) {
                Ok(value) => return Ok(Some(value)),
                Err(err) => println!("{err}. Try again."),
            },
        }
    }
}

/// Prompts for an optional integer, reprompting on malformed input.
fn prompt_int(label: &str) -> anyhow::Result<Option<i32>> {
    loop {
        match prompt(label)? {
            None => return Ok(None),
            Some(text) => match input::parse_int(&text) {
                Ok(value) => return Ok(Some(value)),
                Err(err) => println!("{err}. Try again."),
            },
        }
    }
}

/// Prompts for an optional difficulty, reprompting until it is in range.
fn prompt_difficulty() -> anyhow::Result<Option<i32>> {
    loop {
        let difficulty = prompt_int("Enter the project difficulty (1-5)")?;
        match validate_difficulty(difficulty) {
            Ok(()) => return Ok(difficulty),
            Err(err) => println!("{err}. Try again."),
        }
    }
}

/// Asks for a y/n confirmation; anything but "y" declines.
pub(crate) fn confirm(label: &str) -> anyhow::Result<bool> {
    let answer = prompt(&format!("{label} (y/n)"))?;
    Ok(matches!(answer.as_deref(), Some("y") | Some("Y")))
}

fn display_or_dash<T: Display>(value: &Option<T>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "-".into(),
    }
}

// ---------------------------------------------------------------------------
// Menu operations
// ---------------------------------------------------------------------------

/// Collects a full project aggregate from the user and persists it.
async fn create_project(service: &ProjectService) -> anyhow::Result<()> {
    let name = prompt_required("Enter the project name")?;
    let estimated_hours = prompt_decimal("Enter the estimated hours")?;
    let actual_hours = prompt_decimal("Enter the actual hours")?;
    let difficulty = prompt_difficulty()?;
    let notes = prompt("Enter the project notes")?;

    let mut project = NewProject::new(name);
    if let Some(hours) = estimated_hours {
        project = project.with_estimated_hours(hours);
    }
    if let Some(hours) = actual_hours {
        project = project.with_actual_hours(hours);
    }
    if let Some(difficulty) = difficulty {
        project = project.with_difficulty(difficulty);
    }
    if let Some(notes) = notes {
        project = project.with_notes(notes);
    }

    collect_materials(&mut project)?;
    collect_steps(&mut project)?;
    collect_categories(&mut project)?;

    let created = service.add_project(&project).await?;
    println!(
        "\nYou have successfully created project {} ({}).",
        created.project_id, created.project_name
    );
    render::print_project_details(&created);
    Ok(())
}

/// Materials can be entered as one delimited line or one at a time.
fn collect_materials(project: &mut NewProject) -> anyhow::Result<()> {
    let batch = prompt(
        "Enter materials as 'name,qty,cost; ...' (leave blank to add them one at a time)",
    )?;

    if let Some(line) = batch {
        let (materials, errors) = input::parse_material_batch(&line);
        for error in &errors {
            println!("Skipped {error}");
        }
        for material in materials {
            println!(
                "Material added: {} x{} at {}",
                material.material_name(),
                material.num_required(),
                material.cost()
            );
            project.add_material(material);
        }
        return Ok(());
    }

    loop {
        let name = match prompt("Enter the material name (or type 'done' to finish)")? {
            None => break,
            Some(name) if name.eq_ignore_ascii_case("done") => break,
            Some(name) => name,
        };

        let num_required = match prompt_int(&format!("Enter the number required for \"{name}\""))? {
            Some(value) if value >= 0 => value,
            Some(_) => {
                println!("The quantity must not be negative.");
                continue;
            }
            None => {
                println!("A quantity is required.");
                continue;
            }
        };

        let cost = match prompt_decimal(&format!("Enter the cost for \"{name}\""))? {
            Some(value) if !value.is_sign_negative() => value,
            Some(_) => {
                println!("The cost must not be negative.");
                continue;
            }
            None => {
                println!("A cost is required.");
                continue;
            }
        };

        println!("Material added: {name} x{num_required} at {cost}");
        project.add_material(NewMaterial::new(name, num_required, cost));
    }
    Ok(())
}

/// Steps are persisted in the order entered; the stored order is positional.
fn collect_steps(project: &mut NewProject) -> anyhow::Result<()> {
    loop {
        let text = match prompt("Enter step description (or type 'done' to finish)")? {
            None => break,
            Some(text) if text.eq_ignore_ascii_case("done") => break,
            Some(text) => text,
        };
        println!("Step added: {text}");
        project.add_step(NewStep::new(text));
    }
    Ok(())
}

fn collect_categories(project: &mut NewProject) -> anyhow::Result<()> {
    loop {
        let name = match prompt("Enter category name (or type 'done' to finish)")? {
            None => break,
            Some(name) if name.eq_ignore_ascii_case("done") => break,
            Some(name) => name,
        };
        println!("Category added: {name}");
        project.add_category(NewCategory::new(name));
    }
    Ok(())
}

async fn list_projects(service: &ProjectService) -> anyhow::Result<()> {
    let projects = service.fetch_all_projects().await?;
    if projects.is_empty() {
        println!("\nThere are no projects yet.");
    } else {
        println!("\nProjects:\n{}", render::project_table(&projects));
    }
    Ok(())
}

/// Fetches the target project, prompts per field with the current value as
/// the default, and persists the merged result.
async fn update_project(service: &ProjectService) -> anyhow::Result<()> {
    list_projects(service).await?;

    let project_id = match prompt_int("Enter the project ID to update")? {
        Some(id) => id,
        None => {
            println!("No project selected. Returning to main menu.");
            return Ok(());
        }
    };

    let project = service.fetch_project_by_id(project_id).await?;
    let mut update = ProjectUpdate::from_project(&project);

    if let Some(name) = prompt(&format!("Enter new project name ({})", project.project_name))? {
        update = update.with_project_name(name);
    }

    if let Some(text) = prompt(&format!(
        "Enter new estimated hours ({})",
        display_or_dash(&project.estimated_hours)
    ))? {
        match input::parse_decimal(&text) {
            Ok(hours) => update = update.with_estimated_hours(hours),
            Err(_) => println!("Invalid decimal value for estimated hours. Keeping existing value."),
        }
    }

    if let Some(text) = prompt(&format!(
        "Enter new actual hours ({})",
        display_or_dash(&project.actual_hours)
    ))? {
        match input::parse_decimal(&text) {
            Ok(hours) => update = update.with_actual_hours(hours),
            Err(_) => println!("Invalid decimal value for actual hours. Keeping existing value."),
        }
    }

    if let Some(text) = prompt(&format!(
        "Enter new difficulty (1-5) ({})",
        display_or_dash(&project.difficulty)
    ))? {
        match input::parse_int(&text) {
            Ok(difficulty) if validate_difficulty(Some(difficulty)).is_ok() => {
                update = update.with_difficulty(difficulty);
            }
            Ok(_) => println!("Difficulty must be between 1 and 5. Keeping existing value."),
            Err(_) => println!("Invalid number for difficulty. Keeping existing value."),
        }
    }

    if let Some(notes) = prompt(&format!(
        "Enter new project notes ({})",
        project.notes.as_deref().unwrap_or("-")
    ))? {
        update = update.with_notes(notes);
    }

    let rows = service.modify_project_details(&update).await?;
    if rows == 0 {
        println!("Project with ID {project_id} no longer exists.");
    } else {
        println!("Project updated successfully.");
    }
    Ok(())
}

async fn delete_project(service: &ProjectService) -> anyhow::Result<()> {
    list_projects(service).await?;

    let project_id = match prompt_int("Enter the project ID to delete")? {
        Some(id) => id,
        None => {
            println!("No project selected. Returning to main menu.");
            return Ok(());
        }
    };

    if !confirm(&format!(
        "Are you sure you want to delete project with ID {project_id}?"
    ))? {
        println!("Deletion cancelled.");
        return Ok(());
    }

    let rows = service.delete_project(project_id).await?;
    if rows == 0 {
        println!("There is no project with ID {project_id}.");
    } else {
        println!("Project with ID {project_id} has been deleted.");
    }
    Ok(())
}

async fn select_project(service: &ProjectService) -> anyhow::Result<()> {
    list_projects(service).await?;

    let project_id = match prompt_int("Enter a project ID to view details")? {
        Some(id) => id,
        None => {
            println!("You need to enter a project ID.");
            return Ok(());
        }
    };

    let project = service.fetch_project_by_id(project_id).await?;
    render::print_project_details(&project);
    Ok(())
}
