use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use rivals_client::SearchApiProvider;
use rivals_core::config::{DEFAULT_MAX_COMPETITORS, OnboardingConfig};
use rivals_core::traits::CompetitorStore;
use rivals_core::{OnboardingService, RemovalService, classify};
use rivals_db::{Database, DatabaseConfig};

#[derive(Parser)]
#[command(name = "rivals", version, about = "Track competitor apps per project")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Identify the store and bundle id of a listing URL (offline)
    Classify {
        /// App Store or Google Play listing URL
        url: String,
    },

    /// Onboard a competitor app into a project's roster
    Add {
        /// Owning project
        #[arg(short, long)]
        project: String,

        /// App Store or Google Play listing URL
        #[arg(short, long)]
        url: String,

        /// Maximum active competitors per project
        #[arg(long, env = "RIVALS_MAX_COMPETITORS", default_value_t = DEFAULT_MAX_COMPETITORS)]
        max_competitors: u32,

        /// Metadata lookup deadline in milliseconds
        #[arg(long, env = "RIVALS_METADATA_TIMEOUT_MS", default_value_t = 5000)]
        timeout_ms: u64,

        /// SearchAPI key (reads from SEARCHAPI_API_KEY env var if not provided)
        #[arg(long, env = "SEARCHAPI_API_KEY")]
        api_key: String,

        /// SearchAPI base URL
        #[arg(long, env = "SEARCHAPI_BASE_URL", default_value = "https://www.searchapi.io")]
        base_url: String,
    },

    /// List a project's active competitors, oldest first
    List {
        /// Owning project
        #[arg(short, long)]
        project: String,
    },

    /// Remove a competitor and cancel its pending crawls
    Remove {
        /// Owning project
        #[arg(short, long)]
        project: String,

        /// Competitor id
        #[arg(short, long)]
        id: Uuid,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Logs go to stderr so stdout stays machine-readable
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("rivals=info".parse()?))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Classify { url } => cmd_classify(&url)?,
        Commands::Add {
            project,
            url,
            max_competitors,
            timeout_ms,
            api_key,
            base_url,
        } => {
            if max_competitors == 0 || timeout_ms == 0 {
                anyhow::bail!("--max-competitors and --timeout-ms must be at least 1");
            }
            let config = OnboardingConfig::default()
                .with_max_competitors(max_competitors)
                .with_metadata_timeout(Duration::from_millis(timeout_ms));
            let provider = SearchApiProvider::with_base_url(&api_key, &base_url)
                .context("Failed to create metadata client")?;
            let db = connect_db().await?;
            cmd_add(&db, provider, &config, &project, &url).await?;
        }
        Commands::List { project } => {
            let db = connect_db().await?;
            cmd_list(&db, &project).await?;
        }
        Commands::Remove { project, id } => {
            let db = connect_db().await?;
            cmd_remove(&db, &project, id).await?;
        }
    }

    Ok(())
}

/// Connect to PostgreSQL using DATABASE_URL and apply migrations.
async fn connect_db() -> Result<Database> {
    let config = DatabaseConfig::from_env()?;
    let db = Database::connect(&config)
        .await
        .context("Failed to connect to database")?;
    db.migrate().await?;
    Ok(db)
}

fn cmd_classify(url: &str) -> Result<()> {
    let c = classify(url)?;
    println!("{}\t{}", c.platform, c.bundle_id);
    Ok(())
}

async fn cmd_add(
    db: &Database,
    provider: SearchApiProvider,
    config: &OnboardingConfig,
    project: &str,
    url: &str,
) -> Result<()> {
    let service = OnboardingService::new(db.competitor_repo(), provider, config);

    let onboarded = service.create(project, url).await?;

    tracing::info!(id = %onboarded.competitor.id, "Added {}", onboarded.competitor.name);
    println!("{}", serde_json::to_string_pretty(&onboarded.competitor)?);

    Ok(())
}

async fn cmd_list(db: &Database, project: &str) -> Result<()> {
    let competitors = db.competitor_repo().list_active(project).await?;

    if competitors.is_empty() {
        println!("No active competitors in project {project}");
        return Ok(());
    }

    for c in &competitors {
        println!(
            "  {} [{}] {} ({}), added {}",
            c.id,
            c.platform,
            c.name,
            c.bundle_id,
            c.created_at.format("%Y-%m-%d %H:%M:%S UTC"),
        );
    }

    println!("\nTotal: {} competitors", competitors.len());

    Ok(())
}

async fn cmd_remove(db: &Database, project: &str, id: Uuid) -> Result<()> {
    let service = RemovalService::new(db.competitor_repo(), db.crawl_repo());

    let removal = service.remove(project, id).await?;

    match removal.crawl_jobs_cancelled {
        Some(n) => println!("Removed {} ({n} crawl jobs cancelled)", removal.competitor_id),
        None => println!(
            "Removed {} (crawl cancellation failed, see logs)",
            removal.competitor_id
        ),
    }

    Ok(())
}
