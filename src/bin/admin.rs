//! CLI administration tool for tinylink.
//!
//! Inspects codes, sequences and records without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Convert between sequence values and codes (no database needed)
//! cargo run --bin admin -- code encode 62
//! cargo run --bin admin -- code decode 000010
//!
//! # Show the current value of a sequence
//! cargo run --bin admin -- sequence show
//!
//! # Inspect or soft-delete a record
//! cargo run --bin admin -- link show 000001
//! cargo run --bin admin -- link delete 1
//!
//! # Record counts
//! cargo run --bin admin -- stats
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! Database commands read the same environment as the server (`DATABASE_URL` or `DB_*`,
//! optional `REDIS_URL`).

use tinylink::config::{self, Config};
use tinylink::domain::codec;
use tinylink::domain::repositories::{SequenceRepository, ShortUrlRepository};
use tinylink::infrastructure::cache::{CacheService, RedisCache};
use tinylink::infrastructure::persistence::{PgSequenceRepository, PgShortUrlRepository};
use tinylink::server::connect_pool;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing tinylink.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert between sequence values and codes
    Code {
        #[command(subcommand)]
        action: CodeAction,
    },

    /// Inspect allocation sequences
    Sequence {
        #[command(subcommand)]
        action: SequenceAction,
    },

    /// Inspect and delete short URLs
    Link {
        #[command(subcommand)]
        action: LinkAction,
    },

    /// Show record counts
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum CodeAction {
    /// Print the code for a sequence value
    Encode { value: u64 },

    /// Print the sequence value behind a code
    Decode { code: String },
}

#[derive(Subcommand)]
enum SequenceAction {
    /// Show the last value handed out (defaults to SEQUENCE_NAME)
    Show { name: Option<String> },
}

#[derive(Subcommand)]
enum LinkAction {
    /// Show the active record for a code
    Show { code: String },

    /// Soft-delete a record by id, regardless of owner
    Delete {
        id: i64,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Code { action } => handle_code_action(action)?,
        Commands::Sequence { action } => {
            let (config, pool) = connect().await?;
            handle_sequence_action(action, &config, pool).await?
        }
        Commands::Link { action } => {
            let (config, pool) = connect().await?;
            handle_link_action(action, &config, pool).await?
        }
        Commands::Stats => {
            let (_, pool) = connect().await?;
            handle_stats(&pool).await?
        }
        Commands::Db { action } => {
            let (_, pool) = connect().await?;
            handle_db_action(action, &pool).await?
        }
    }

    Ok(())
}

/// Loads the server configuration and opens a pool with it.
async fn connect() -> Result<(Config, Arc<PgPool>)> {
    let config = config::load_from_env()?;
    let pool = connect_pool(&config).await?;
    Ok((config, Arc::new(pool)))
}

fn handle_code_action(action: CodeAction) -> Result<()> {
    match action {
        CodeAction::Encode { value } => {
            let code = codec::encode(value)?;
            println!("{} -> {}", value.to_string().bright_white(), code.cyan().bold());
        }
        CodeAction::Decode { code } => {
            let value = codec::decode(&code)?;
            println!("{} -> {}", code.cyan(), value.to_string().bright_white().bold());
        }
    }

    Ok(())
}

async fn handle_sequence_action(
    action: SequenceAction,
    config: &Config,
    pool: Arc<PgPool>,
) -> Result<()> {
    let repo = PgSequenceRepository::new(pool);

    match action {
        SequenceAction::Show { name } => {
            let name = name.unwrap_or_else(|| config.sequence_name.clone());
            println!("{}", "🔢 Sequence".bright_blue().bold());
            println!();

            let sequence = repo
                .current(&name)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to read sequence: {}", e))?;

            match sequence {
                Some(sequence) => {
                    let used = sequence.value as f64 / codec::CAPACITY as f64 * 100.0;
                    println!("  Name:       {}", sequence.name.cyan());
                    println!(
                        "  Last value: {}",
                        sequence.value.to_string().bright_white().bold()
                    );
                    if let Ok(code) = codec::encode(sequence.value) {
                        println!("  Last code:  {}", code.cyan());
                    }
                    println!("  Capacity:   {:.6}% used", used);
                }
                None => {
                    println!(
                        "  {}",
                        format!("Sequence '{}' has not issued any values", name).yellow()
                    );
                }
            }
            println!();
        }
    }

    Ok(())
}

async fn handle_link_action(action: LinkAction, config: &Config, pool: Arc<PgPool>) -> Result<()> {
    let repo = PgShortUrlRepository::new(pool);

    match action {
        LinkAction::Show { code } => {
            let record = repo
                .find_active_by_code(&code)
                .await
                .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
                .context("No active short URL with this code")?;

            println!("{}", "🔗 Short URL".bright_blue().bold());
            println!();
            println!("  ID:       {}", record.id.to_string().bright_black());
            println!("  Code:     {}", record.code.cyan().bold());
            println!("  Short:    {}", record.short_url(&config.base_url));
            println!("  Target:   {}", record.original_url.bright_white());
            println!(
                "  Owner:    {}",
                record.owner_id.as_deref().unwrap_or("(anonymous)")
            );
            println!(
                "  Visits:   {}",
                record.visit_count.to_string().bright_green().bold()
            );
            println!(
                "  Created:  {}",
                record.created_at.format("%Y-%m-%d %H:%M").to_string().bright_black()
            );
            println!();
        }
        LinkAction::Delete { id, yes } => {
            println!("{}", "🗑  Delete Short URL".bright_blue().bold());
            println!();

            let record = repo
                .find_active_by_id(id)
                .await
                .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
                .context("No active short URL with this id")?;

            println!("  Code:   {}", record.code.cyan());
            println!("  Target: {}", record.original_url.bright_white());
            println!();

            if !yes {
                let confirmed = Confirm::new()
                    .with_prompt("Delete this short URL?")
                    .default(false)
                    .interact()?;

                if !confirmed {
                    println!("{}", "❌ Cancelled".red());
                    return Ok(());
                }
            }

            let deleted = repo
                .soft_delete(id)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to delete: {}", e))?;

            if !deleted {
                println!("{}", "⚠️  Already deleted".yellow());
                return Ok(());
            }

            if let Some(redis_url) = &config.redis_url {
                match RedisCache::connect(redis_url, config.cache_ttl_seconds).await {
                    Ok(cache) => {
                        let _ = cache.mark_deleted(&record.code).await;
                    }
                    Err(e) => println!(
                        "{}",
                        format!("⚠️  Cache not updated ({}); entry expires by TTL", e)
                            .yellow()
                    ),
                }
            }

            println!("{}", "✅ Short URL deleted".green().bold());
            println!();
        }
    }

    Ok(())
}

/// Displays record counts and total visits.
async fn handle_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let (active, deleted, visits): (i64, i64, i64) = sqlx::query_as(
        r#"
        SELECT
            COUNT(*) FILTER (WHERE deleted_at IS NULL),
            COUNT(*) FILTER (WHERE deleted_at IS NOT NULL),
            COALESCE(SUM(visit_count), 0)::BIGINT
        FROM short_urls
        "#,
    )
    .fetch_one(pool)
    .await?;

    println!("  Active URLs:  {}", active.to_string().bright_green().bold());
    println!("  Deleted URLs: {}", deleted.to_string().bright_black());
    println!("  Visits:       {}", visits.to_string().bright_green().bold());
    println!();

    Ok(())
}

async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            println!("{}", "✅ Database connection OK".green().bold());
            println!("  PostgreSQL: {}", version.bright_white());
        }
    }

    Ok(())
}
