//! CLI administration tool for category-shortener.
//!
//! Manages entries and inspects the database without going through the
//! HTTP API or its API key.
//!
//! # Usage
//!
//! ```bash
//! # Create an entry in the "blog" category
//! cargo run --bin admin -- entry create blog https://example.com/post --name "Launch post"
//!
//! # List entries of a category
//! cargo run --bin admin -- entry list blog
//!
//! # Show one entry with its click history
//! cargo run --bin admin -- entry show blog aB3xY9
//!
//! # Delete an entry
//! cargo run --bin admin -- entry delete blog aB3xY9
//!
//! # List categories
//! cargo run --bin admin -- categories
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (required): PostgreSQL connection string
//! - `SHORT_URL_LENGTH`, `SHORT_URL_POSSIBLE_CHARACTERS`,
//!   `MAX_GENERATION_ATTEMPTS`: same as the server

use category_shortener::application::services::ShortenerService;
use category_shortener::config::{self, PoolSettings};
use category_shortener::domain::entities::Entry;
use category_shortener::infrastructure::persistence::{PgEntryRepository, pool};
use category_shortener::utils::code_generator::CodeGenerator;
use category_shortener::utils::datetime::parse_timestamp;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;
use std::sync::Arc;

type Service = ShortenerService<PgEntryRepository>;

/// CLI tool for managing category-shortener.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Manage entries
    Entry {
        #[command(subcommand)]
        action: EntryAction,
    },

    /// List categories that hold entries
    Categories,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Entry management subcommands.
#[derive(Subcommand)]
enum EntryAction {
    /// Create an entry under a generated code
    Create {
        /// Category, e.g. "blog"
        url_type: String,

        /// Absolute target URL
        url: String,

        /// Display name
        #[arg(short, long)]
        name: Option<String>,

        /// Expiry, RFC 3339 or YYYY-MM-DDTHH:MM:SS (UTC)
        #[arg(short, long)]
        expires: Option<String>,
    },

    /// List entries of a category
    List { url_type: String },

    /// Show one entry with its click history
    Show { url_type: String, code: String },

    /// Delete an entry
    Delete {
        url_type: String,
        code: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;
    let pool = pool::connect(&database_url, &PoolSettings::default()).await?;

    let (length, alphabet) = config::load_code_settings()?;
    let generator =
        CodeGenerator::new(&alphabet, length).context("Invalid short code configuration")?;
    let service = ShortenerService::new(
        Arc::new(PgEntryRepository::new(Arc::new(pool.clone()))),
        generator,
    )
    .with_max_attempts(config::load_max_generation_attempts()?);

    match cli.command {
        Commands::Entry { action } => handle_entry_action(action, &service).await?,
        Commands::Categories => list_categories(&service).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

/// Dispatches entry management commands.
async fn handle_entry_action(action: EntryAction, service: &Service) -> Result<()> {
    match action {
        EntryAction::Create {
            url_type,
            url,
            name,
            expires,
        } => create_entry(service, url_type, url, name, expires).await,
        EntryAction::List { url_type } => list_entries(service, url_type).await,
        EntryAction::Show { url_type, code } => show_entry(service, url_type, code).await,
        EntryAction::Delete {
            url_type,
            code,
            yes,
        } => delete_entry(service, url_type, code, yes).await,
    }
}

async fn create_entry(
    service: &Service,
    url_type: String,
    url: String,
    name: Option<String>,
    expires: Option<String>,
) -> Result<()> {
    println!("{}", "🔗 Create Entry".bright_blue().bold());
    println!();

    let expiry_date = expires
        .as_deref()
        .map(|raw| parse_timestamp("expires", raw))
        .transpose()?;

    let code = service
        .create(&url_type, Some(&url), name, expiry_date)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create entry: {}", e))?;

    println!("{}", "✅ Entry created".green().bold());
    println!("  Category: {}", url_type.cyan());
    println!("  Code:     {}", code.bright_yellow().bold());
    println!("  Path:     /{}/{}", url_type, code);
    println!();

    Ok(())
}

/// Lists entries of one category.
///
/// # Output Format
///
/// ```text
///   Code       Clicks  Expires            URL
///   ───────────────────────────────────────────────────────────
///   aB3xY9     12      -                  https://example.com/post
/// ```
async fn list_entries(service: &Service, url_type: String) -> Result<()> {
    println!(
        "{} {}",
        "📋 Entries in".bright_blue().bold(),
        url_type.cyan().bold()
    );
    println!();

    let entries = service
        .get_all(&url_type)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list entries: {}", e))?;

    if entries.is_empty() {
        println!("{}", "  No entries found".yellow());
        return Ok(());
    }

    println!(
        "  {:<12} {:<7} {:<18} {}",
        "Code".bright_white().bold(),
        "Clicks".bright_white().bold(),
        "Expires".bright_white().bold(),
        "URL".bright_white().bold()
    );
    println!("  {}", "─".repeat(75).bright_black());

    for entry in &entries {
        println!(
            "  {:<12} {:<7} {:<18} {}",
            entry.short_code.cyan(),
            entry.click_count(),
            format_expiry(entry),
            entry.url
        );
    }

    println!();
    println!(
        "  Total: {}",
        entries.len().to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

async fn show_entry(service: &Service, url_type: String, code: String) -> Result<()> {
    let entry = service
        .get(&url_type, &code)
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    println!("{}", "🔎 Entry".bright_blue().bold());
    println!();
    println!("  Category: {}", entry.url_type.cyan());
    println!("  Code:     {}", entry.short_code.bright_yellow());
    println!("  URL:      {}", entry.url);
    println!(
        "  Name:     {}",
        entry.name.as_deref().unwrap_or("-").bright_white()
    );
    println!("  Expires:  {}", format_expiry(&entry));
    println!(
        "  Created:  {}",
        entry.created_at.format("%Y-%m-%d %H:%M:%S").to_string().bright_black()
    );
    println!(
        "  Clicks:   {}",
        entry.click_count().to_string().bright_white().bold()
    );

    for click in entry.click_dates.iter().rev().take(20) {
        println!("    {}", click.format("%Y-%m-%d %H:%M:%S").to_string().bright_black());
    }
    if entry.click_count() > 20 {
        println!("    {}", "…".bright_black());
    }
    println!();

    Ok(())
}

/// Deletes an entry after confirmation (default: No).
async fn delete_entry(
    service: &Service,
    url_type: String,
    code: String,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "🗑  Delete Entry".bright_blue().bold());
    println!();

    let entry = service
        .get(&url_type, &code)
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    println!("  Code: {}", entry.short_code.cyan());
    println!("  URL:  {}", entry.url);
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Delete this entry?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    service
        .delete(&url_type, &code)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to delete entry: {}", e))?;

    println!("{}", "✅ Entry deleted".green().bold());
    println!();

    Ok(())
}

async fn list_categories(service: &Service) -> Result<()> {
    println!("{}", "📂 Categories".bright_blue().bold());
    println!();

    let categories = service
        .list_categories()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list categories: {}", e))?;

    if categories.is_empty() {
        println!("{}", "  No categories found".yellow());
        return Ok(());
    }

    for category in &categories {
        let label = if category.is_empty() {
            "(global)".to_string()
        } else {
            category.clone()
        };
        println!("  {}", label.cyan());
    }
    println!();

    Ok(())
}

/// Dispatches database operation commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => check_database(pool).await,
    }
}

/// Checks connectivity and prints the server version and entry count.
async fn check_database(pool: &PgPool) -> Result<()> {
    println!("{}", "🔌 Checking database connection...".bright_blue());

    let version: String = sqlx::query_scalar("SELECT version()")
        .fetch_one(pool)
        .await
        .context("Database query failed")?;

    let entries: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM url_entries")
        .fetch_one(pool)
        .await?;

    println!("{}", "✅ Database connection OK".green().bold());
    println!("  Version: {}", version.bright_black());
    println!("  Entries: {}", entries.to_string().bright_white().bold());
    println!();

    Ok(())
}

fn format_expiry(entry: &Entry) -> ColoredString {
    match entry.expiry_date {
        Some(at) if entry.is_expired() => at.format("%Y-%m-%d %H:%M").to_string().red(),
        Some(at) => at.format("%Y-%m-%d %H:%M").to_string().normal(),
        None => "-".bright_black(),
    }
}
