// Command-line and environment configuration

use clap::{Arg, ArgMatches};

use crate::models::DEFAULT_PASSWORD_HASH;

pub const DEFAULT_DATABASE: &str = "rscms.db";
pub const DEFAULT_LOG_LEVEL: &str = "info";

pub const DATABASE_ENV: &str = "DATABASE_URL";
pub const PASSWORD_HASH_ENV: &str = "RSCMS_ADMIN_PASSWORD_HASH";
pub const LOG_LEVEL_ENV: &str = "RUST_LOG";

const GLOBAL_ARGS: [&str; 2] = ["database", "log_level"];

/// Resolved settings for a seeding run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedConfig {
    pub database_url: String,
    pub password_hash: String,
    pub log_level: String,
}

// What the binary was asked to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Seed(SeedConfig),
    HashPassword { password: String, log_level: String },
}

pub fn cli() -> clap::Command {
    clap::Command::new("rscms")
        .about("Ensure the rscms bootstrap admin account exists")
        .arg(
            Arg::new("database")
                .short('d')
                .long("database")
                .value_name("DATABASE")
                .global(true)
                .help("SQLite database path or sqlite: URL [env: DATABASE_URL, default: rscms.db]"),
        )
        .arg(
            Arg::new("password_hash")
                .long("password-hash")
                .value_name("HASH")
                .help("Precomputed password hash to store [env: RSCMS_ADMIN_PASSWORD_HASH]"),
        )
        .arg(
            Arg::new("log_level")
                .short('l')
                .long("log-level")
                .value_name("LEVEL")
                .global(true)
                .help("Log filter directive [env: RUST_LOG, default: info]"),
        )
        .subcommand(
            clap::Command::new("hash-password")
                .about("Print a bcrypt hash suitable for --password-hash")
                .arg(Arg::new("password").value_name("PASSWORD").required(true)),
        )
}

impl Action {
    pub fn from_matches(matches: &ArgMatches) -> Self {
        Self::resolve(matches, |key| std::env::var(key).ok())
    }

    // Flags win over environment, environment over defaults
    pub fn resolve(matches: &ArgMatches, env: impl Fn(&str) -> Option<String>) -> Self {
        // Global flags may be given after the subcommand
        let sub = matches.subcommand().map(|(_, sub)| sub);
        let flag = |id: &str| -> Option<String> {
            let global = GLOBAL_ARGS.iter().any(|g| *g == id);
            sub.filter(|_| global)
                .and_then(|s| s.get_one::<String>(id))
                .or_else(|| matches.get_one::<String>(id))
                .cloned()
        };
        let lookup = |id: &str, key: &str, default: &str| -> String {
            flag(id)
                .or_else(|| env(key).filter(|v| !v.is_empty()))
                .unwrap_or_else(|| default.to_string())
        };

        let log_level = lookup("log_level", LOG_LEVEL_ENV, DEFAULT_LOG_LEVEL);

        if let Some(sub) = matches.subcommand_matches("hash-password") {
            let password = sub
                .get_one::<String>("password")
                .cloned()
                .unwrap_or_default();
            return Action::HashPassword { password, log_level };
        }

        Action::Seed(SeedConfig {
            database_url: lookup("database", DATABASE_ENV, DEFAULT_DATABASE),
            password_hash: lookup("password_hash", PASSWORD_HASH_ENV, DEFAULT_PASSWORD_HASH),
            log_level,
        })
    }

    pub fn log_level(&self) -> &str {
        match self {
            Action::Seed(config) => &config.log_level,
            Action::HashPassword { log_level, .. } => log_level,
        }
    }
}
