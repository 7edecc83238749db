use clap::{Parser, Subcommand};
// Import database types directly from the database crate
use database::connection::{connect_with, run_migrations};
use database::repository::ProjectRepository;
use service::{ProjectService, ServiceError};
use std::time::Duration;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod input;
mod menu;
mod render;

/// The main entry point for the Workshop project tracker.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Load environment variables from the .env file, if one exists.
    let _ = dotenvy::dotenv();

    // Load pool settings; the connection string itself comes from DATABASE_URL.
    let config = configuration::load_config()?;

    // Initialize the database connection and run migrations
    let pool = connect_with(
        config.database.max_connections,
        Duration::from_secs(config.database.acquire_timeout_secs),
    )
    .await?;
    run_migrations(&pool).await?;

    let service = ProjectService::new(ProjectRepository::new(pool));

    // Parse command-line arguments
    let cli = Cli::parse();

    // Execute the appropriate command; the interactive menu is the default.
    match cli.command.unwrap_or(Commands::Menu) {
        Commands::Menu => menu::run(&service).await?,
        Commands::List => handle_list(&service).await?,
        Commands::Show(args) => handle_show(args, &service).await?,
        Commands::Delete(args) => handle_delete(args, &service).await?,
    }

    Ok(())
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// A console tracker for workshop projects, their materials, steps, and categories.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the interactive menu (the default).
    Menu,
    /// List all projects and exit.
    List,
    /// Show one project with its materials, steps, and categories.
    Show(ShowArgs),
    /// Delete a project and everything it owns.
    Delete(DeleteArgs),
}

#[derive(Parser)]
struct ShowArgs {
    /// The ID of the project to show.
    #[arg(long)]
    id: i32,
}

#[derive(Parser)]
struct DeleteArgs {
    /// The ID of the project to delete.
    #[arg(long)]
    id: i32,

    /// Skip the confirmation prompt.
    #[arg(long)]
    yes: bool,
}

// ==============================================================================
// Command Logic
// ==============================================================================

async fn handle_list(service: &ProjectService) -> anyhow::Result<()> {
    let projects = service.fetch_all_projects().await?;
    if projects.is_empty() {
        println!("There are no projects yet.");
    } else {
        println!("{}", render::project_table(&projects));
    }
    Ok(())
}

async fn handle_show(args: ShowArgs, service: &ProjectService) -> anyhow::Result<()> {
    match service.fetch_project_by_id(args.id).await {
        Ok(project) => {
            render::print_project_details(&project);
            Ok(())
        }
        Err(ServiceError::NotFound(id)) => {
            eprintln!("There is no project with ID {id}.");
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}

async fn handle_delete(args: DeleteArgs, service: &ProjectService) -> anyhow::Result<()> {
    if !args.yes
        && !menu::confirm(&format!(
            "Are you sure you want to delete project with ID {}?",
            args.id
        ))?
    {
        println!("Deletion cancelled.");
        return Ok(());
    }

    let rows = service.delete_project(args.id).await?;
    if rows == 0 {
        println!("There is no project with ID {}.", args.id);
    } else {
        println!("Project with ID {} has been deleted.", args.id);
    }
    Ok(())
}
