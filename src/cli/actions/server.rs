use crate::{
    api,
    auth::AuthenticationService,
    cli::commands::store::Backend,
    store::{AccountStore, MemoryAccountStore, PgAccountStore},
};
use anyhow::{Context, Result};
use secrecy::{ExposeSecret, SecretString};
use sqlx::postgres::PgPoolOptions;
use std::{sync::Arc, time::Duration};
use tracing::{info, warn};
use url::Url;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub backend: Backend,
}

/// Execute the server action.
///
/// The account store is built once here and closed after the server stops.
/// # Errors
/// Returns an error if the database is unreachable, the schema cannot be
/// applied, or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    match args.backend {
        Backend::Memory => {
            warn!("Using the in-memory account store; accounts are lost on shutdown");
            let store: Arc<dyn AccountStore> = Arc::new(MemoryAccountStore::new());
            api::new(args.port, Arc::new(AuthenticationService::new(store))).await
        }
        Backend::Postgres {
            dsn,
            max_connections,
            apply_schema,
        } => {
            info!("Connecting to {}", redact_dsn(&dsn));

            let pool = PgPoolOptions::new()
                .min_connections(1)
                .max_connections(max_connections)
                .max_lifetime(Duration::from_secs(60 * 2))
                .test_before_acquire(true)
                .connect(dsn.expose_secret())
                .await
                .context("Failed to connect to database")?;

            let pg_store = PgAccountStore::new(pool.clone());
            if apply_schema {
                pg_store.ensure_schema().await?;
            }

            let store: Arc<dyn AccountStore> = Arc::new(pg_store);
            let result = api::new(args.port, Arc::new(AuthenticationService::new(store))).await;

            pool.close().await;
            info!("Database pool closed");

            result
        }
    }
}

/// Render a DSN for logs with the password removed.
fn redact_dsn(dsn: &SecretString) -> String {
    match Url::parse(dsn.expose_secret()) {
        Ok(mut url) => {
            if url.password().is_some() {
                let _ = url.set_password(Some("***"));
            }
            url.to_string()
        }
        Err(_) => "<unparseable dsn>".to_string(),
    }
}
