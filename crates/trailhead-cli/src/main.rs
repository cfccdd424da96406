mod config;
mod generate_cmd;
mod history_cmd;
mod render;
mod serve_cmd;
mod show_cmd;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use uuid::Uuid;

use trailhead_core::generate::{GeminiClient, GenerationConfig};
use trailhead_core::session;
use trailhead_db::config::DbConfig;
use trailhead_db::pool;

#[derive(Parser)]
#[command(
    name = "trailhead",
    about = "Generate, browse, and persist AI learning roadmaps"
)]
struct Cli {
    /// Database URL (overrides TRAILHEAD_DATABASE_URL env var)
    #[arg(long, global = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a trailhead config file (no database required)
    Init {
        /// PostgreSQL connection URL
        #[arg(long, default_value = DbConfig::DEFAULT_URL)]
        db_url: String,
        /// Generation endpoint URL (defaults to the public endpoint)
        #[arg(long)]
        endpoint: Option<String>,
        /// Generation API key (can also be supplied via TRAILHEAD_API_KEY)
        #[arg(long)]
        api_key: Option<String>,
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
    /// Create the trailhead database and run migrations
    DbInit,
    /// Generate a roadmap for a topic, display it, and save it
    Generate {
        /// Topic to generate a roadmap for (e.g. "rust developer")
        topic: String,
        /// Use the detailed three-month prompt instead of the concise one
        #[arg(long)]
        detailed: bool,
        /// Acting user id (or set TRAILHEAD_USER_ID)
        #[arg(long)]
        user: Option<Uuid>,
    },
    /// List saved roadmaps, newest first
    History {
        /// Acting user id (or set TRAILHEAD_USER_ID)
        #[arg(long)]
        user: Option<Uuid>,
        /// Show at most this many entries
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Display a saved roadmap as a collapsible outline
    Show {
        /// Roadmap ID to display
        roadmap_id: String,
        /// Render every section collapsed (headers only)
        #[arg(long)]
        collapsed: bool,
    },
    /// Serve the read-only roadmap JSON API
    Serve {
        #[arg(long, default_value_t = 7878)]
        port: u16,
    },
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Execute the `trailhead init` command: write the config file.
fn cmd_init(
    db_url: &str,
    endpoint: Option<&str>,
    api_key: Option<&str>,
    force: bool,
) -> Result<()> {
    let path = config::config_path();

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}\nUse --force to overwrite.",
            path.display()
        );
    }

    let cfg = config::ConfigFile {
        database: config::DatabaseSection {
            url: db_url.to_string(),
        },
        generation: config::GenerationSection {
            endpoint: endpoint
                .unwrap_or(GenerationConfig::DEFAULT_ENDPOINT)
                .to_string(),
            api_key: api_key.unwrap_or_default().to_string(),
        },
    };

    config::save_config(&cfg)?;

    println!("Config written to {}", path.display());
    println!("  database.url = {db_url}");
    println!("  generation.endpoint = {}", cfg.generation.endpoint);
    if cfg.generation.api_key.is_empty() {
        println!(
            "No API key stored; set {} before generating.",
            GenerationConfig::API_KEY_ENV
        );
    }
    println!();
    println!("Next: run `trailhead db-init` to create and migrate the database.");

    Ok(())
}

/// Execute the `trailhead db-init` command: create database and migrate.
async fn cmd_db_init(cli_db_url: Option<&str>) -> Result<()> {
    let db = config::resolve_db(cli_db_url);

    println!("Initializing trailhead database...");
    pool::ensure_database_exists(&db).await?;

    let db_pool = pool::create_pool(&db).await?;
    pool::run_migrations(&db_pool).await?;
    db_pool.close().await;

    println!("trailhead db-init complete.");
    Ok(())
}

/// Resolve the acting user: `--user` flag, then the environment.
///
/// Identity is issued by the external provider; trailhead only carries it
/// to gate persistence reads and writes.
fn resolve_user(flag: Option<Uuid>) -> Result<Uuid> {
    if let Some(user) = flag {
        return Ok(user);
    }
    session::user_from_env().map(|u| u.0).with_context(|| {
        format!(
            "no user identity: pass --user or set {}",
            session::USER_ENV
        )
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init {
            db_url,
            endpoint,
            api_key,
            force,
        } => {
            cmd_init(&db_url, endpoint.as_deref(), api_key.as_deref(), force)?;
        }
        Commands::DbInit => {
            cmd_db_init(cli.database_url.as_deref()).await?;
        }
        Commands::Generate {
            topic,
            detailed,
            user,
        } => {
            let user_id = resolve_user(user)?;
            let client = GeminiClient::new(config::resolve_generation()?)?;

            let db = config::resolve_db(cli.database_url.as_deref());
            let db_pool = pool::create_pool(&db).await?;
            let result =
                generate_cmd::cmd_generate(&db_pool, &client, user_id, &topic, detailed).await;
            db_pool.close().await;
            result?;
        }
        Commands::History { user, limit } => {
            let user_id = resolve_user(user)?;
            let db = config::resolve_db(cli.database_url.as_deref());
            let db_pool = pool::create_pool(&db).await?;
            let result = history_cmd::cmd_history(&db_pool, user_id, limit).await;
            db_pool.close().await;
            result?;
        }
        Commands::Show {
            roadmap_id,
            collapsed,
        } => {
            let db = config::resolve_db(cli.database_url.as_deref());
            let db_pool = pool::create_pool(&db).await?;
            let result = show_cmd::cmd_show(&db_pool, &roadmap_id, collapsed).await;
            db_pool.close().await;
            result?;
        }
        Commands::Serve { port } => {
            let db = config::resolve_db(cli.database_url.as_deref());
            let db_pool = pool::create_pool(&db).await?;
            serve_cmd::cmd_serve(db_pool, port).await?;
        }
        Commands::Completions { shell } => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                "trailhead",
                &mut std::io::stdout(),
            );
        }
    }

    Ok(())
}
