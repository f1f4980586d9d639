//! CLI administration tool for the invoice dashboard.
//!
//! Provides commands for managing dashboard users and customers, viewing
//! invoice statistics, and performing database operations.
//!
//! # Usage
//!
//! ```bash
//! # Create a dashboard user (password prompted or generated)
//! cargo run --bin admin -- user create --email user@nextmail.com
//!
//! # List users
//! cargo run --bin admin -- user list
//!
//! # Add a customer that invoices can be issued to
//! cargo run --bin admin -- customer add --name "Lee Robinson" --email lee@robinson.com
//!
//! # View statistics
//! cargo run --bin admin -- stats
//!
//! # Apply migrations / check database connection
//! cargo run --bin admin -- db migrate
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (required): PostgreSQL connection string

use invoice_dashboard::domain::entities::format_currency;
use invoice_dashboard::domain::repositories::CustomerRepository;
use invoice_dashboard::infrastructure::persistence::{PgCustomerRepository, PgUserRepository};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::{Confirm, Input, Password};
use sqlx::PgPool;
use std::sync::Arc;

/// Minimum password length accepted by the login form.
const MIN_PASSWORD_LEN: usize = 6;

/// CLI tool for managing the invoice dashboard.
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
    /// Manage dashboard users
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Manage customers
    Customer {
        #[command(subcommand)]
        action: CustomerAction,
    },

    /// Show invoice statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Create a user who can sign in to the dashboard
    Create {
        #[arg(short, long)]
        name: Option<String>,

        #[arg(short, long)]
        email: Option<String>,

        /// Generate a random password instead of prompting for one
        #[arg(short, long)]
        generate: bool,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// List all users
    List,
}

#[derive(Subcommand)]
enum CustomerAction {
    /// Add a customer
    Add {
        #[arg(short, long)]
        name: String,

        #[arg(short, long)]
        email: String,

        #[arg(short, long, default_value = "")]
        image_url: String,
    },

    /// List all customers
    List,
}

#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,

    /// Apply pending migrations
    Migrate,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let pool = PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::User { action } => handle_user_action(action, &pool).await?,
        Commands::Customer { action } => handle_customer_action(action, &pool).await?,
        Commands::Stats => handle_stats(&pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

async fn handle_user_action(action: UserAction, pool: &PgPool) -> Result<()> {
    let repo = PgUserRepository::new(Arc::new(pool.clone()));

    match action {
        UserAction::Create {
            name,
            email,
            generate,
            yes,
        } => create_user(&repo, name, email, generate, yes).await,
        UserAction::List => list_users(&repo).await,
    }
}

/// Creates a dashboard user.
///
/// # Flow
///
/// 1. Prompt for name and email (or use provided)
/// 2. Prompt for a password or generate one
/// 3. Confirm creation (unless `--yes` flag)
/// 4. Hash the password with bcrypt and store the user
///
/// Only the bcrypt hash is stored. A generated password is displayed once.
async fn create_user(
    repo: &PgUserRepository,
    name: Option<String>,
    email: Option<String>,
    generate: bool,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "👤 Create User".bright_blue().bold());
    println!();

    let name = match name {
        Some(n) => n,
        None => Input::new().with_prompt("Name").interact_text()?,
    };

    let email = match email {
        Some(e) => e,
        None => Input::new().with_prompt("Email").interact_text()?,
    };

    let password = if generate {
        let generated = generate_password();
        println!("{}", "✨ Generated password".green());
        println!("  Password: {}", generated.bright_yellow().bold());
        println!(
            "{}",
            "⚠️  Save this password now! It can't be shown again."
                .red()
                .bold()
        );
        generated
    } else {
        Password::new()
            .with_prompt("Password")
            .with_confirmation("Repeat password", "Passwords don't match")
            .validate_with(|p: &String| -> Result<(), String> {
                if p.len() >= MIN_PASSWORD_LEN {
                    Ok(())
                } else {
                    Err(format!("Use at least {} characters", MIN_PASSWORD_LEN))
                }
            })
            .interact()?
    };

    println!();
    println!("  Name:  {}", name.cyan());
    println!("  Email: {}", email.cyan());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Create this user?")
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let hash = bcrypt::hash(&password, bcrypt::DEFAULT_COST).context("Failed to hash password")?;

    let id = repo
        .create(&name, &email, &hash)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create user: {}", e))?;

    println!();
    println!("{}", "✅ User created successfully!".green().bold());
    println!("  ID: {}", id.bright_black());
    println!();

    Ok(())
}

async fn list_users(repo: &PgUserRepository) -> Result<()> {
    println!("{}", "📋 Users".bright_blue().bold());
    println!();

    let users = repo
        .list()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list users: {}", e))?;

    if users.is_empty() {
        println!("{}", "  No users found".yellow());
        println!();
        println!(
            "  Create one with: {} admin user create",
            "cargo run --bin".bright_cyan()
        );
        return Ok(());
    }

    println!(
        "  {:<36} {:<24} {}",
        "ID".bright_white().bold(),
        "Name".bright_white().bold(),
        "Email".bright_white().bold()
    );
    println!("  {}", "─".repeat(90).bright_black());

    for user in &users {
        println!(
            "  {:<36} {:<24} {}",
            user.id.bright_black(),
            user.name.cyan(),
            user.email
        );
    }

    println!();
    println!("  Total: {}", users.len().to_string().bright_white().bold());
    println!();

    Ok(())
}

async fn handle_customer_action(action: CustomerAction, pool: &PgPool) -> Result<()> {
    let repo = PgCustomerRepository::new(Arc::new(pool.clone()));

    match action {
        CustomerAction::Add {
            name,
            email,
            image_url,
        } => {
            let id = repo
                .create(&name, &email, &image_url)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to add customer: {}", e))?;

            println!("{}", "✅ Customer added".green().bold());
            println!("  ID: {}", id.bright_black());
        }
        CustomerAction::List => {
            let customers = repo
                .list_all()
                .await
                .map_err(|e| anyhow::anyhow!("Failed to list customers: {}", e))?;

            println!("{}", "📋 Customers".bright_blue().bold());
            println!();

            for customer in &customers {
                println!(
                    "  {:<36} {:<24} {}",
                    customer.id.bright_black(),
                    customer.name.cyan(),
                    customer.email
                );
            }

            println!();
            println!(
                "  Total: {}",
                customers.len().to_string().bright_white().bold()
            );
        }
    }

    Ok(())
}

/// Displays invoice statistics.
///
/// Shows invoice, customer and user counts along with collected and pending totals.
async fn handle_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let invoices_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM invoices")
        .fetch_one(pool)
        .await?;

    let customers_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM customers")
        .fetch_one(pool)
        .await?;

    let users_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;

    let (paid, pending): (i64, i64) = sqlx::query_as(
        "SELECT
            COALESCE(SUM(CASE WHEN status = 'paid' THEN amount ELSE 0 END), 0)::bigint,
            COALESCE(SUM(CASE WHEN status = 'pending' THEN amount ELSE 0 END), 0)::bigint
         FROM invoices",
    )
    .fetch_one(pool)
    .await?;

    println!(
        "  Invoices:   {}",
        invoices_count.to_string().bright_green().bold()
    );
    println!(
        "  Customers:  {}",
        customers_count.to_string().bright_green().bold()
    );
    println!(
        "  Users:      {}",
        users_count.to_string().bright_green().bold()
    );
    println!("  Collected:  {}", format_currency(paid).bright_green().bold());
    println!("  Pending:    {}", format_currency(pending).yellow().bold());
    println!();

    Ok(())
}

async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            println!("  PostgreSQL: {}", version.bright_white());
            println!();
        }
        DbAction::Migrate => {
            sqlx::migrate!("./migrations")
                .run(pool)
                .await
                .context("Failed to run migrations")?;

            println!("{}", "✅ Migrations applied".green().bold());
        }
    }

    Ok(())
}

/// Generates a random password.
///
/// 20 characters from A-Z, a-z, 0-9.
fn generate_password() -> String {
    use rand::Rng;
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    const PASSWORD_LEN: usize = 20;

    let mut rng = rand::rng();

    (0..PASSWORD_LEN)
        .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
        .collect()
}
