//! Register, Login, AuthenticateToken and Dropout.
//!
//! The service keeps no per-request state; it only maps store outcomes onto
//! [`ResultCode`]. Login and AuthenticateToken use one generic `Forbidden`
//! message each so callers cannot tell which check failed.

use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

use super::{
    result::{ResultCode, RpcResult},
    token::TokenIssuer,
};
use crate::store::{AccountStore, StoreError};

pub const LOGIN_FORBIDDEN_MESSAGE: &str = "Login failed; please check your email or password";
pub const TOKEN_FORBIDDEN_MESSAGE: &str = "Access token expired or not found; please re-login";

#[derive(Clone)]
pub struct AuthenticationService {
    store: Arc<dyn AccountStore>,
    issuer: TokenIssuer,
}

impl AuthenticationService {
    #[must_use]
    pub fn new(store: Arc<dyn AccountStore>) -> Self {
        Self {
            store,
            issuer: TokenIssuer::new(),
        }
    }

    #[must_use]
    pub fn store(&self) -> &Arc<dyn AccountStore> {
        &self.store
    }

    #[instrument(skip(self, password_credential))]
    pub async fn register(&self, email: &str, password_credential: &str) -> RpcResult {
        match self.store.create_account(email, password_credential).await {
            Ok(account) => {
                info!("registered account {}", account.id);
                RpcResult::success()
            }
            Err(StoreError::DuplicateKey(email)) => {
                debug!("register conflict");
                RpcResult::failure(
                    ResultCode::Duplicate,
                    format!("User email {email} already exists"),
                )
            }
            Err(err) => {
                error!("Failed to register account: {err}");
                RpcResult::unknown(&err)
            }
        }
    }

    #[instrument(skip(self, password_credential))]
    pub async fn login(&self, email: &str, password_credential: &str) -> RpcResult {
        let account = match self
            .store
            .find_by_credentials(email, password_credential)
            .await
        {
            Ok(Some(account)) => account,
            Ok(None) => return RpcResult::failure(ResultCode::Forbidden, LOGIN_FORBIDDEN_MESSAGE),
            Err(err) => {
                error!("Failed to lookup credentials: {err}");
                return RpcResult::unknown(&err);
            }
        };

        let token = match self.issuer.issue(&account.email) {
            Ok(token) => token,
            Err(err) => {
                error!("Failed to issue access token: {err:#}");
                return RpcResult::unknown(&format!("{err:#}"));
            }
        };

        match self.store.append_token(&account.email, token).await {
            Ok(token) => {
                debug!("issued token expiring at {}", token.expires_at);
                RpcResult::success_with(&token)
            }
            // The account was dropped between lookup and append.
            Err(StoreError::NotFound) => {
                warn!("account removed during login");
                RpcResult::failure(ResultCode::Forbidden, LOGIN_FORBIDDEN_MESSAGE)
            }
            Err(err) => {
                error!("Failed to store access token: {err}");
                RpcResult::unknown(&err)
            }
        }
    }

    #[instrument(skip_all)]
    pub async fn authenticate_token(&self, token_value: &str) -> RpcResult {
        let now = Utc::now().timestamp();
        match self.store.find_by_valid_token(token_value, now).await {
            Ok(Some(account)) => RpcResult::success_with(&account.projection()),
            Ok(None) => RpcResult::failure(ResultCode::Forbidden, TOKEN_FORBIDDEN_MESSAGE),
            Err(err) => {
                error!("Failed to lookup access token: {err}");
                RpcResult::unknown(&err)
            }
        }
    }

    #[instrument(skip(self))]
    pub async fn dropout(&self, email: &str) -> RpcResult {
        match self.store.delete_account(email).await {
            Ok(()) => RpcResult::success(),
            Err(err) => {
                error!("Failed to delete account: {err}");
                RpcResult::unknown(&err)
            }
        }
    }
}

impl std::fmt::Debug for AuthenticationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthenticationService")
            .field("issuer", &self.issuer)
            .finish_non_exhaustive()
    }
}
