//! In-process account store.
//!
//! All mutations take the write lock for the whole map, so email uniqueness
//! and token appends are atomic with respect to each other. Nothing survives a
//! restart.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::{hash_map::Entry, HashMap};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use super::{AccountStore, StoreError};
use crate::auth::model::{AccessToken, Account};

#[derive(Debug, Default)]
pub struct MemoryAccountStore {
    accounts: RwLock<HashMap<String, Account>>,
}

impl MemoryAccountStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored accounts.
    pub async fn len(&self) -> usize {
        self.accounts.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.accounts.read().await.is_empty()
    }

    /// Snapshot of one account, including secrets and tokens.
    pub async fn get(&self, email: &str) -> Option<Account> {
        self.accounts.read().await.get(email).cloned()
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn create_account(
        &self,
        email: &str,
        password_credential: &str,
    ) -> Result<Account, StoreError> {
        let mut accounts = self.accounts.write().await;
        match accounts.entry(email.to_string()) {
            Entry::Occupied(_) => Err(StoreError::DuplicateKey(email.to_string())),
            Entry::Vacant(slot) => {
                let account = Account {
                    id: Uuid::new_v4(),
                    email: email.to_string(),
                    password_credential: password_credential.to_string(),
                    created_at: Utc::now().timestamp(),
                    tokens: Vec::new(),
                };
                debug!("memory store: created account {}", account.id);
                Ok(slot.insert(account).clone())
            }
        }
    }

    async fn find_by_credentials(
        &self,
        email: &str,
        password_credential: &str,
    ) -> Result<Option<Account>, StoreError> {
        let accounts = self.accounts.read().await;
        Ok(accounts
            .get(email)
            .filter(|account| account.password_credential == password_credential)
            .cloned())
    }

    async fn append_token(
        &self,
        email: &str,
        token: AccessToken,
    ) -> Result<AccessToken, StoreError> {
        let mut accounts = self.accounts.write().await;
        let account = accounts.get_mut(email).ok_or(StoreError::NotFound)?;
        account.tokens.push(token.clone());
        Ok(token)
    }

    async fn find_by_valid_token(
        &self,
        token_value: &str,
        now: i64,
    ) -> Result<Option<Account>, StoreError> {
        let accounts = self.accounts.read().await;
        Ok(accounts
            .values()
            .find(|account| {
                account
                    .tokens
                    .iter()
                    .any(|token| token.value == token_value && token.is_valid_at(now))
            })
            .cloned())
    }

    async fn delete_account(&self, email: &str) -> Result<(), StoreError> {
        if self.accounts.write().await.remove(email).is_none() {
            debug!("memory store: no account to delete");
        }
        Ok(())
    }

    async fn health_check(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
