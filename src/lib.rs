pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;

use anyhow::{Context, Result};

use config::{Action, SeedConfig};
use db::seed::SeedOutcome;

// Parse CLI arguments and run the requested action
pub async fn run() -> Result<()> {
    let matches = config::cli().get_matches();
    let action = Action::from_matches(&matches);

    logging::init(action.log_level());

    match action {
        Action::Seed(config) => {
            let outcome = seed(&config).await?;
            println!("{}", outcome.message());
        }
        Action::HashPassword { password, .. } => {
            let hash = auth::hash_password(&password)?;
            println!("{}", hash);
        }
    }

    Ok(())
}

/// Connect to the configured database and ensure the bootstrap admin exists.
pub async fn seed(config: &SeedConfig) -> Result<SeedOutcome> {
    let pool = db::connect(&config.database_url)
        .await
        .context("Failed to initialize database")?;

    let outcome = db::seed::seed_admin(&pool, &config.password_hash)
        .await
        .context("Failed to seed admin account");

    pool.close().await;

    outcome
}
