//! Account and token records shared by the store and the service.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Lifetime of an issued access token (20 minutes).
pub const TOKEN_TTL_SECONDS: i64 = 20 * 60;

/// Bearer credential issued on login.
///
/// Timestamps are unix epoch seconds so the wire format stays stable.
#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AccessToken {
    pub value: String,
    pub created_at: i64,
    pub expires_at: i64,
}

impl AccessToken {
    /// A token authenticates while `now <= expires_at`.
    #[must_use]
    pub const fn is_valid_at(&self, now: i64) -> bool {
        self.expires_at >= now
    }
}

/// Identity record owned by the store.
///
/// Never serialized to callers; use [`Account::projection`] instead.
#[derive(Clone, PartialEq, Eq)]
pub struct Account {
    pub id: Uuid,
    pub email: String,
    pub password_credential: String,
    pub created_at: i64,
    pub tokens: Vec<AccessToken>,
}

impl Account {
    #[must_use]
    pub fn projection(&self) -> AccountProjection {
        AccountProjection {
            id: self.id.to_string(),
            email: self.email.clone(),
            created_at: self.created_at,
        }
    }
}

impl std::fmt::Debug for Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Account")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("password_credential", &"***")
            .field("created_at", &self.created_at)
            .field("tokens", &self.tokens.len())
            .finish()
    }
}

/// Non-secret view of an account returned by token authentication.
#[derive(ToSchema, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AccountProjection {
    pub id: String,
    pub email: String,
    pub created_at: i64,
}
