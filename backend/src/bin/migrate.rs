//! Operator CLI for schema migrations: status listing, apply, and revert.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::env;
use std::io;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use backend::outbound::persistence::MigrationRunner;

/// `migrate` command arguments.
#[derive(Debug, Parser)]
#[command(
    name = "migrate",
    about = "Apply, revert, and inspect the database schema migration chain",
    version
)]
struct CliArgs {
    /// Database connection URL. Falls back to `DATABASE_URL` when omitted.
    #[arg(long = "database-url", value_name = "url")]
    database_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List every migration with its applied state.
    Status,
    /// Apply all pending migrations in version order.
    Apply,
    /// Revert applied migrations, newest first.
    Revert {
        /// Number of migrations to revert.
        #[arg(long, value_name = "n", default_value_t = 1, conflicts_with = "to")]
        steps: u32,
        /// Revert until this version is the newest applied migration.
        /// Accepts the version shown by `status` or the dashed directory
        /// prefix.
        #[arg(long, value_name = "version")]
        to: Option<String>,
    },
}

fn main() -> io::Result<()> {
    // Human-readable output for an operator terminal, not the JSON the
    // server emits.
    let _ = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();

    let args = CliArgs::try_parse().map_err(io::Error::other)?;
    let database_url = resolve_database_url(args.database_url)?;
    let mut runner = MigrationRunner::connect(&database_url)
        .map_err(|error| io::Error::other(format!("connect failed: {error}")))?;

    match args.command {
        Command::Status => {
            let entries = runner
                .status()
                .map_err(|error| io::Error::other(format!("status failed: {error}")))?;
            for entry in entries {
                let state = if entry.applied { "applied" } else { "pending" };
                let marker = if entry.irreversible {
                    "  (irreversible)"
                } else {
                    ""
                };
                // The version column is what `revert --to` accepts.
                println!(
                    "{state:<8} {version:<16} {name}{marker}",
                    version = entry.version,
                    name = entry.name
                );
            }
        }
        Command::Apply => {
            let applied = runner
                .apply_all()
                .map_err(|error| io::Error::other(format!("apply failed: {error}")))?;
            if applied.is_empty() {
                println!("no pending migrations");
            }
            for version in applied {
                println!("applied {version}");
            }
        }
        Command::Revert { steps, to } => {
            let reverted = match to {
                Some(target) => runner
                    .revert_to(&target)
                    .map_err(|error| io::Error::other(format!("revert failed: {error}")))?,
                None => {
                    let mut reverted = Vec::new();
                    for _ in 0..steps {
                        let version = runner.revert_one().map_err(|error| {
                            io::Error::other(format!("revert failed: {error}"))
                        })?;
                        reverted.push(version);
                    }
                    reverted
                }
            };
            for version in reverted {
                println!("reverted {version}");
            }
        }
    }

    Ok(())
}

fn resolve_database_url(from_args: Option<String>) -> io::Result<String> {
    from_args
        .or_else(|| env::var("DATABASE_URL").ok())
        .ok_or_else(|| {
            io::Error::other("database URL required: pass --database-url or set DATABASE_URL")
        })
}
