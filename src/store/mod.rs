//! Account persistence.
//!
//! [`AccountStore`] is the only owner of durable state. Implementations must
//! provide two guarantees under concurrency:
//!
//! - **Unique email:** racing `create_account` calls for one email produce
//!   exactly one success; the rest fail with [`StoreError::DuplicateKey`].
//!   Uniqueness is enforced by the storage layer, never by a check-then-insert.
//! - **Atomic append:** `append_token` adds to the account's token sequence
//!   without replacing it, so parallel logins all end up stored.

use async_trait::async_trait;
use thiserror::Error;

use crate::auth::model::{AccessToken, Account};

pub mod memory;
pub mod postgres;

pub use memory::MemoryAccountStore;
pub use postgres::PgAccountStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("account {0} already exists")]
    DuplicateKey(String),
    #[error("account not found")]
    NotFound,
    #[error("{0:#}")]
    Unknown(#[from] anyhow::Error),
}

#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Insert a new account with an empty token sequence.
    async fn create_account(
        &self,
        email: &str,
        password_credential: &str,
    ) -> Result<Account, StoreError>;

    /// Exact match on email and credential.
    async fn find_by_credentials(
        &self,
        email: &str,
        password_credential: &str,
    ) -> Result<Option<Account>, StoreError>;

    /// Append one token to the account identified by `email`.
    async fn append_token(&self, email: &str, token: AccessToken)
        -> Result<AccessToken, StoreError>;

    /// Find the account owning a token with this value that has not expired at `now`.
    async fn find_by_valid_token(
        &self,
        token_value: &str,
        now: i64,
    ) -> Result<Option<Account>, StoreError>;

    /// Remove the account and all its tokens. Missing accounts are not an error.
    async fn delete_account(&self, email: &str) -> Result<(), StoreError>;

    async fn health_check(&self) -> Result<(), StoreError>;
}
