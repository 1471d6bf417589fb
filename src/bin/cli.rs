use anyhow::Context;
use clap::{Parser, Subcommand};
use dotenvy::dotenv;

use coffeeshop::cli::{issue_token, reset_database, run_migrations};
use coffeeshop_config::AuthConfig;

#[derive(Parser)]
#[command(name = "coffeeshop-cli")]
#[command(about = "Coffee Shop CLI - Administrative tools for the drinks API", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Drop every drink and insert the seed drink
    ResetDb,
    /// Print a development access token signed with JWT_SECRET
    IssueToken {
        /// Subject (`sub` claim) of the token
        #[arg(short = 's', long, default_value = "dev-user")]
        subject: String,

        /// Permission to grant; repeat for several. Grants all when omitted
        #[arg(short = 'p', long = "permission")]
        permissions: Vec<String>,
    },
    /// Apply pending database migrations
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::IssueToken {
            subject,
            permissions,
        } => {
            let token = issue_token(&subject, permissions, &AuthConfig::from_env())
                .map_err(|e| e.error)?;
            println!("{}", token);
        }
        Commands::ResetDb => {
            let pool = connect().await?;
            let seeded = reset_database(&pool).await.map_err(|e| e.error)?;
            println!("✅ Database reset. Seeded drink #{}: {}", seeded.id, seeded.title);
            pool.close().await;
        }
        Commands::Migrate => {
            let pool = connect().await?;
            run_migrations(&pool)
                .await
                .context("Failed to run migrations")?;
            println!("✅ Migrations applied");
            pool.close().await;
        }
    }

    Ok(())
}

async fn connect() -> anyhow::Result<coffeeshop_db::SqlitePool> {
    let database_url = coffeeshop_db::database_url();
    coffeeshop_db::init_db_pool(&database_url)
        .await
        .with_context(|| format!("Failed to connect to {}", database_url))
}
