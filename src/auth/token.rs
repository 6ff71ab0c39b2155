//! Opaque access token generation.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rand::{rngs::OsRng, RngCore};
use sha2::{Digest, Sha512};
use uuid::Uuid;

use super::model::{AccessToken, TOKEN_TTL_SECONDS};

/// Produces fresh, never-repeating token values.
///
/// The value is the hex SHA-512 digest of the issue time (nanoseconds), the
/// caller identity, a random UUID and 32 bytes from the OS random source.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenIssuer;

impl TokenIssuer {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Issue a token for `email` valid from now for 20 minutes.
    ///
    /// # Errors
    /// Returns an error if the OS random source fails.
    pub fn issue(&self, email: &str) -> Result<AccessToken> {
        self.issue_at(email, Utc::now())
    }

    /// Issue a token as if the current time were `now`.
    ///
    /// # Errors
    /// Returns an error if the OS random source fails.
    pub fn issue_at(&self, email: &str, now: DateTime<Utc>) -> Result<AccessToken> {
        let mut nonce = [0u8; 32];
        OsRng
            .try_fill_bytes(&mut nonce)
            .context("failed to generate access token nonce")?;

        let nanos = now
            .timestamp_nanos_opt()
            .unwrap_or_else(|| now.timestamp_micros());
        let seed = format!(
            "{nanos}/{email}/{}/{}",
            Uuid::new_v4(),
            hex::encode(nonce)
        );

        let mut hasher = Sha512::new();
        hasher.update(seed.as_bytes());
        let value = hex::encode(hasher.finalize());

        let created_at = now.timestamp();
        Ok(AccessToken {
            value,
            created_at,
            expires_at: created_at + TOKEN_TTL_SECONDS,
        })
    }
}
