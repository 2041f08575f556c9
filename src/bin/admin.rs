//! CLI administration tool for snaplink.
//!
//! Inspects and creates links directly against the database, without going
//! through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Most recent links
//! cargo run --bin admin -- list --limit 20
//!
//! # One link, without counting a click
//! cargo run --bin admin -- show aZ3kP9
//!
//! # Create a link
//! cargo run --bin admin -- shorten example.com/page --base-url https://s.example.com
//!
//! # View statistics
//! cargo run --bin admin -- stats
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! Same as the server; `DATABASE_URL`, `PUBLIC_URL`, `SHORT_CODE_LENGTH` and
//! `CODE_MAX_ATTEMPTS` are the ones that matter here.

use snaplink::application::services::{LinkService, MAX_LIST_LIMIT};
use snaplink::config::{self, Config};
use snaplink::error::AppError;
use snaplink::infrastructure::persistence::{SqliteLinkRepository, connect, run_migrations};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use sqlx::SqlitePool;
use std::sync::Arc;

/// CLI tool for managing snaplink.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level commands.
#[derive(Subcommand)]
enum Commands {
    /// List the most recent links
    List {
        /// Number of links to show (1-100)
        #[arg(short, long, default_value_t = 20)]
        limit: i64,
    },

    /// Show one link without counting a click
    Show {
        /// Short code
        code: String,
    },

    /// Create a short link
    Shorten {
        /// Long URL; `https://` is assumed when no scheme is given
        url: String,

        /// Origin for the printed short URL (defaults to PUBLIC_URL)
        #[arg(short, long)]
        base_url: Option<String>,
    },

    /// Show statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = config::load_from_env()?;

    let pool = connect(&config.database_url, config.pool_settings())
        .await
        .context("Failed to connect to database")?;
    run_migrations(&pool)
        .await
        .context("Failed to run migrations")?;

    let service = link_service(&pool, &config);

    match cli.command {
        Commands::List { limit } => list_links(&service, &config, limit).await?,
        Commands::Show { code } => show_link(&service, &config, &code).await?,
        Commands::Shorten { url, base_url } => {
            let origin = base_url.unwrap_or_else(|| config.public_url.clone());
            shorten(&service, &url, &origin).await?
        }
        Commands::Stats => handle_stats(&pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool, &config).await?,
    }

    pool.close().await;

    Ok(())
}

fn link_service(pool: &SqlitePool, config: &Config) -> LinkService {
    let repository = Arc::new(SqliteLinkRepository::new(Arc::new(pool.clone())));

    LinkService::new(repository)
        .with_code_length(config.short_code_length)
        .with_max_attempts(config.code_max_attempts)
}

/// Prints the most recent links, newest first.
///
/// # Output Format
///
/// ```text
/// 📋 Recent links
///
///   Code     Clicks  Target
///   ──────────────────────────────────────────────────────────
///   aZ3kP9   12      https://example.com/some/page
/// ```
async fn list_links(service: &LinkService, config: &Config, limit: i64) -> Result<()> {
    if !(1..=MAX_LIST_LIMIT).contains(&limit) {
        anyhow::bail!("--limit must be between 1 and {MAX_LIST_LIMIT}, got {limit}");
    }

    println!("{}", "📋 Recent links".bright_blue().bold());
    println!();

    let links = service
        .list_recent(limit, &config.public_url)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list links: {}", e))?;

    if links.is_empty() {
        println!("{}", "  No links yet".yellow());
        println!();
        println!(
            "  Create one with: {} admin shorten <url>",
            "cargo run --bin".bright_cyan()
        );
        return Ok(());
    }

    println!(
        "  {:<10} {:<7} {}",
        "Code".bright_white().bold(),
        "Clicks".bright_white().bold(),
        "Target".bright_white().bold()
    );
    println!("  {}", "─".repeat(75).bright_black());

    for link in &links {
        println!(
            "  {:<10} {:<7} {}",
            link.code.cyan(),
            link.clicks.to_string().bright_green(),
            link.target
        );
    }

    println!();
    println!(
        "  Shown: {}",
        links.len().to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

/// Prints the details of one link.
async fn show_link(service: &LinkService, config: &Config, code: &str) -> Result<()> {
    let link = match service.get_link(code).await {
        Ok(link) => link,
        Err(AppError::NotFound { .. }) => {
            println!("{}", format!("❌ No link with code '{code}'").red());
            return Ok(());
        }
        Err(e) => return Err(anyhow::anyhow!("Database error: {}", e)),
    };

    println!("{}", "🔗 Link".bright_blue().bold());
    println!();
    println!("  Code:    {}", link.code.cyan());
    println!(
        "  Short:   {}",
        LinkService::short_url(&config.public_url, &link.code).bright_yellow()
    );
    println!("  Target:  {}", link.target);
    println!(
        "  Created: {}",
        link.created_at
            .format("%Y-%m-%d %H:%M:%S UTC")
            .to_string()
            .bright_black()
    );
    if link.is_unvisited() {
        println!("  Clicks:  {}", "never visited".bright_black());
    } else {
        println!(
            "  Clicks:  {}",
            link.clicks.to_string().bright_green().bold()
        );
    }
    println!();

    Ok(())
}

/// Creates a link through the same path the HTTP API uses.
async fn shorten(service: &LinkService, url: &str, origin: &str) -> Result<()> {
    match service.shorten(url, origin).await {
        Ok(short) => {
            println!("{}", "✅ Link created".green().bold());
            println!();
            println!("  Short:  {}", short.short_url.bright_yellow().bold());
            println!("  Code:   {}", short.code().cyan());
            println!("  Target: {}", short.link.target);
            println!();
            Ok(())
        }
        Err(e @ (AppError::EmptyInput | AppError::InvalidUrl { .. })) => {
            println!("{}", format!("❌ {e}").red());
            Ok(())
        }
        Err(e) => Err(anyhow::anyhow!("Failed to create link: {}", e)),
    }
}

/// Displays totals and the most visited link.
async fn handle_stats(pool: &SqlitePool) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let links_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM links")
        .fetch_one(pool)
        .await?;

    let clicks_count: i64 = sqlx::query_scalar("SELECT COALESCE(SUM(clicks), 0) FROM links")
        .fetch_one(pool)
        .await?;

    let top: Option<(String, i64)> =
        sqlx::query_as("SELECT code, clicks FROM links ORDER BY clicks DESC, id ASC LIMIT 1")
            .fetch_optional(pool)
            .await?;

    println!(
        "  Links:        {}",
        links_count.to_string().bright_green().bold()
    );
    println!(
        "  Clicks:       {}",
        clicks_count.to_string().bright_green().bold()
    );
    match top {
        Some((code, clicks)) if clicks > 0 => println!(
            "  Most visited: {} ({} clicks)",
            code.cyan(),
            clicks.to_string().bright_green()
        ),
        _ => println!("  Most visited: {}", "-".bright_black()),
    }
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &SqlitePool, config: &Config) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT sqlite_version()")
                .fetch_one(pool)
                .await?;
            let journal_mode: String = sqlx::query_scalar("PRAGMA journal_mode")
                .fetch_one(pool)
                .await?;
            let page_count: i64 = sqlx::query_scalar("PRAGMA page_count")
                .fetch_one(pool)
                .await?;
            let page_size: i64 = sqlx::query_scalar("PRAGMA page_size")
                .fetch_one(pool)
                .await?;

            println!("  Location:     {}", config.database_url.bright_white());
            println!("  SQLite:       {}", version.bright_white());
            println!("  Journal mode: {}", journal_mode.bright_white());
            println!(
                "  Size:         {} KiB",
                (page_count * page_size / 1024).to_string().bright_white()
            );
            println!();
        }
    }

    Ok(())
}
