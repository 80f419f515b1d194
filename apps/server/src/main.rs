use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use rijschool_backend_api::{build_router, services::export, AppState};
use rijschool_backend_runtime::{seed, telemetry, BackendServices};
use rijschool_config::{load as load_config, AppConfig};
use rijschool_domain::Role;
use tokio::net::TcpListener;
use tracing::info;

#[derive(Parser)]
#[command(name = "rijschool-backend")]
#[command(about = "Driving school back office (serves HTTP by default)")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server (default)
    Serve,
    /// Create the default admin login, settings and instructor
    Seed,
    /// Add a back-office login to the user store
    CreateUser {
        #[arg(long)]
        email: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        password: String,
        /// ADMIN or INSTRUCTOR
        #[arg(long, default_value = "ADMIN")]
        role: String,
    },
    /// Write the student register as CSV to stdout or a file
    ExportStudents {
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    telemetry::init_tracing().context("failed to initialise tracing")?;
    let config = load_config().context("failed to load configuration")?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => run_server(&config).await,
        Commands::Seed => seed_data(&config).await,
        Commands::CreateUser {
            email,
            name,
            password,
            role,
        } => create_user(&config, &email, &name, &password, &role).await,
        Commands::ExportStudents { output } => export_students(&config, output).await,
    }
}

async fn initialise(config: &AppConfig) -> anyhow::Result<BackendServices> {
    BackendServices::initialise(config)
        .await
        .context("failed to initialise backend services")
}

async fn run_server(config: &AppConfig) -> anyhow::Result<()> {
    info!("starting rijschool backend");

    let services = initialise(config).await?;
    let state = AppState::new(
        services.db_pool.clone(),
        services.authenticator.clone(),
        services.notifier.clone(),
        services.uploads_dir.clone(),
    );
    let app = build_router(state);

    let address = format!("{}:{}", config.http.address, config.http.port);
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind http listener on {address}"))?;

    info!(%address, "http server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(rijschool_backend_runtime::shutdown_signal())
        .await
        .context("http server error")?;

    info!("backend shut down");
    Ok(())
}

async fn seed_data(config: &AppConfig) -> anyhow::Result<()> {
    let services = initialise(config).await?;
    let report = seed::seed_defaults(&services.db_pool).await?;

    println!("Database seeded:");
    if report.admin_created {
        println!(
            "- admin login {} / {}",
            seed::SEED_ADMIN_EMAIL,
            seed::SEED_ADMIN_PASSWORD
        );
    } else {
        println!("- admin login already present");
    }
    println!("- default price {} cents", report.default_price_cents);
    println!("- instructor {}", report.instructor);
    Ok(())
}

async fn create_user(
    config: &AppConfig,
    email: &str,
    name: &str,
    password: &str,
    role: &str,
) -> anyhow::Result<()> {
    let role: Role = role
        .trim()
        .to_uppercase()
        .parse()
        .with_context(|| format!("unknown role {role}"))?;

    let services = initialise(config).await?;
    let user = seed::create_user(&services.db_pool, email, name, password, role).await?;
    println!("Created {} user {} ({})", user.role, user.email, user.public_id);
    Ok(())
}

async fn export_students(config: &AppConfig, output: Option<PathBuf>) -> anyhow::Result<()> {
    let services = initialise(config).await?;
    let csv = export::export_students(&services.db_pool)
        .await
        .map_err(|error| anyhow::anyhow!("failed to export students: {error}"))?;

    match output {
        Some(path) => {
            tokio::fs::write(&path, csv)
                .await
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), "exported students");
        }
        None => println!("{csv}"),
    }
    Ok(())
}
