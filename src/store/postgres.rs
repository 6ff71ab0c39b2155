//! PostgreSQL account store.
//!
//! Accounts live in `accounts` (email guarded by `UNIQUE (email)`), tokens in
//! `access_tokens`, one row per token, cascading on account delete. The schema
//! is bundled from `db/sql/01_lws_auth.sql`.

use anyhow::Context;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{postgres::PgRow, Connection, PgPool, Row};
use tracing::{debug, info_span, Instrument};
use uuid::Uuid;

use super::{AccountStore, StoreError};
use crate::auth::model::{AccessToken, Account};

pub const SCHEMA_SQL: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/db/sql/01_lws_auth.sql"
));

/// Name of the `UNIQUE (email)` constraint in the bundled schema.
const EMAIL_CONSTRAINT: &str = "accounts_email_key";

/// Translate a failed account insert.
///
/// Only a unique violation on [`EMAIL_CONSTRAINT`] is a duplicate email; any
/// other violation (an id collision included) is an unknown fault.
fn insert_error(email: &str, err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() && db_err.constraint() == Some(EMAIL_CONSTRAINT) {
            return StoreError::DuplicateKey(email.to_string());
        }
    }
    anyhow::Error::new(err)
        .context("failed to insert account")
        .into()
}

#[derive(Debug, Clone)]
pub struct PgAccountStore {
    pool: PgPool,
}

impl PgAccountStore {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Apply the bundled schema. Every statement is idempotent.
    ///
    /// # Errors
    /// Returns an error if any statement fails.
    pub async fn ensure_schema(&self) -> anyhow::Result<()> {
        let span = info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "DDL",
            db.statement = "01_lws_auth.sql"
        );
        sqlx::raw_sql(SCHEMA_SQL)
            .execute(&self.pool)
            .instrument(span)
            .await
            .context("failed to apply account schema")?;
        Ok(())
    }

    async fn load_tokens(&self, account_id: Uuid) -> anyhow::Result<Vec<AccessToken>> {
        let query = r"
            SELECT value, created_at, expires_at
            FROM access_tokens
            WHERE account_id = $1
            ORDER BY seq
        ";
        let span = info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query
        );
        let rows = sqlx::query(query)
            .bind(account_id)
            .fetch_all(&self.pool)
            .instrument(span)
            .await
            .context("failed to load access tokens")?;

        Ok(rows
            .into_iter()
            .map(|row| AccessToken {
                value: row.get("value"),
                created_at: row.get("created_at"),
                expires_at: row.get("expires_at"),
            })
            .collect())
    }

    async fn with_tokens(&self, row: Option<PgRow>) -> Result<Option<Account>, StoreError> {
        let Some(row) = row else {
            return Ok(None);
        };
        let id: Uuid = row.get("id");
        let tokens = self.load_tokens(id).await?;
        Ok(Some(Account {
            id,
            email: row.get("email"),
            password_credential: row.get("password_credential"),
            created_at: row.get("created_at"),
            tokens,
        }))
    }
}

#[async_trait]
impl AccountStore for PgAccountStore {
    async fn create_account(
        &self,
        email: &str,
        password_credential: &str,
    ) -> Result<Account, StoreError> {
        // Uniqueness comes from the constraint, so racing inserts cannot both succeed.
        let query = r"
            INSERT INTO accounts (id, email, password_credential, created_at)
            VALUES ($1, $2, $3, $4)
        ";
        let span = info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "INSERT",
            db.statement = query
        );
        let id = Uuid::new_v4();
        let created_at = Utc::now().timestamp();
        let result = sqlx::query(query)
            .bind(id)
            .bind(email)
            .bind(password_credential)
            .bind(created_at)
            .execute(&self.pool)
            .instrument(span)
            .await;

        result.map_err(|err| insert_error(email, err))?;
        Ok(Account {
            id,
            email: email.to_string(),
            password_credential: password_credential.to_string(),
            created_at,
            tokens: Vec::new(),
        })
    }

    async fn find_by_credentials(
        &self,
        email: &str,
        password_credential: &str,
    ) -> Result<Option<Account>, StoreError> {
        let query = r"
            SELECT id, email, password_credential, created_at
            FROM accounts
            WHERE email = $1 AND password_credential = $2
            LIMIT 1
        ";
        let span = info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query
        );
        let row = sqlx::query(query)
            .bind(email)
            .bind(password_credential)
            .fetch_optional(&self.pool)
            .instrument(span)
            .await
            .context("failed to lookup account by credentials")?;

        self.with_tokens(row).await
    }

    async fn append_token(
        &self,
        email: &str,
        token: AccessToken,
    ) -> Result<AccessToken, StoreError> {
        // A single INSERT ... SELECT adds a row; concurrent appends never overwrite each other.
        let query = r"
            INSERT INTO access_tokens (value, account_id, created_at, expires_at)
            SELECT $1, id, $3, $4
            FROM accounts
            WHERE email = $2
        ";
        let span = info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "INSERT",
            db.statement = query
        );
        let result = sqlx::query(query)
            .bind(&token.value)
            .bind(email)
            .bind(token.created_at)
            .bind(token.expires_at)
            .execute(&self.pool)
            .instrument(span)
            .await
            .context("failed to append access token")?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(token)
    }

    async fn find_by_valid_token(
        &self,
        token_value: &str,
        now: i64,
    ) -> Result<Option<Account>, StoreError> {
        // Value and expiry are checked on the same token row.
        let query = r"
            SELECT accounts.id, accounts.email, accounts.password_credential, accounts.created_at
            FROM access_tokens
            JOIN accounts ON accounts.id = access_tokens.account_id
            WHERE access_tokens.value = $1
              AND access_tokens.expires_at >= $2
            LIMIT 1
        ";
        let span = info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query
        );
        let row = sqlx::query(query)
            .bind(token_value)
            .bind(now)
            .fetch_optional(&self.pool)
            .instrument(span)
            .await
            .context("failed to lookup account by token")?;

        self.with_tokens(row).await
    }

    async fn delete_account(&self, email: &str) -> Result<(), StoreError> {
        // Tokens go with the account via ON DELETE CASCADE.
        let query = "DELETE FROM accounts WHERE email = $1";
        let span = info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "DELETE",
            db.statement = query
        );
        let result = sqlx::query(query)
            .bind(email)
            .execute(&self.pool)
            .instrument(span)
            .await
            .context("failed to delete account")?;

        debug!("deleted {} account rows", result.rows_affected());
        Ok(())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        let acquire_span = info_span!(
            "db.acquire",
            db.system = "postgresql",
            db.operation = "ACQUIRE"
        );
        let mut conn = self
            .pool
            .acquire()
            .instrument(acquire_span)
            .await
            .context("failed to acquire database connection")?;

        let ping_span = info_span!("db.ping", db.system = "postgresql", db.operation = "PING");
        conn.ping()
            .instrument(ping_span)
            .await
            .context("failed to ping database")?;
        Ok(())
    }
}
