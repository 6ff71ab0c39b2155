use anyhow::{Context, Result};
use clap::{Arg, ArgAction, Command};
use secrecy::SecretString;

pub const ARG_DSN: &str = "dsn";
pub const ARG_IN_MEMORY: &str = "in-memory";
pub const ARG_MAX_CONNECTIONS: &str = "max-connections";
pub const ARG_SKIP_SCHEMA: &str = "skip-schema";

/// Where accounts are kept.
#[derive(Debug)]
pub enum Backend {
    Postgres {
        dsn: SecretString,
        max_connections: u32,
        apply_schema: bool,
    },
    Memory,
}

#[derive(Debug)]
pub struct Options {
    pub backend: Backend,
}

impl Options {
    /// Build the store options from validated CLI matches.
    ///
    /// # Errors
    /// Returns an error if neither `--dsn` nor `--in-memory` is present.
    pub fn parse(matches: &clap::ArgMatches) -> Result<Self> {
        if matches.get_flag(ARG_IN_MEMORY) {
            return Ok(Self {
                backend: Backend::Memory,
            });
        }

        let dsn = matches
            .get_one::<String>(ARG_DSN)
            .cloned()
            .context("missing required argument: --dsn")?;

        Ok(Self {
            backend: Backend::Postgres {
                dsn: SecretString::from(dsn),
                max_connections: matches
                    .get_one::<u32>(ARG_MAX_CONNECTIONS)
                    .copied()
                    .unwrap_or(5),
                apply_schema: !matches.get_flag(ARG_SKIP_SCHEMA),
            },
        })
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_DSN)
                .short('d')
                .long(ARG_DSN)
                .help("Database connection string")
                .env("LWS_AUTH_DSN")
                .required_unless_present(ARG_IN_MEMORY),
        )
        .arg(
            Arg::new(ARG_IN_MEMORY)
                .long(ARG_IN_MEMORY)
                .help("Keep accounts in process memory instead of Postgres (nothing is persisted)")
                .env("LWS_AUTH_IN_MEMORY")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new(ARG_MAX_CONNECTIONS)
                .long(ARG_MAX_CONNECTIONS)
                .help("Maximum number of pooled database connections")
                .default_value("5")
                .env("LWS_AUTH_MAX_CONNECTIONS")
                .value_parser(clap::value_parser!(u32).range(1..)),
        )
        .arg(
            Arg::new(ARG_SKIP_SCHEMA)
                .long(ARG_SKIP_SCHEMA)
                .help("Do not apply the bundled schema at startup")
                .env("LWS_AUTH_SKIP_SCHEMA")
                .action(ArgAction::SetTrue),
        )
}
