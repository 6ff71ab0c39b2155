//! # lws-auth (account credentials and opaque access tokens)
//!
//! `lws-auth` registers accounts, checks login credentials, issues opaque
//! bearer tokens, validates presented tokens against their expiry and removes
//! accounts.
//!
//! ## Layout
//!
//! - [`store`]: the [`AccountStore`](store::AccountStore) persistence contract
//!   with Postgres and in-memory backends. Email uniqueness and token appends
//!   are atomic in the store, so the service needs no locks.
//! - [`auth`]: token issuing and the `Register` / `Login` / `AuthenticateToken`
//!   / `Dropout` operations, each answering with a `{ code, message, content }`
//!   envelope.
//! - [`api`]: JSON RPC endpoints over HTTP, health probe and `OpenAPI` document.
//! - [`cli`]: arguments, environment, telemetry and server bootstrap.
//!
//! ## Tokens
//!
//! Tokens carry no structure and live for 20 minutes. Login and token
//! authentication failures all return the same `Forbidden` answer so callers
//! cannot probe which emails exist.

pub mod api;
pub mod auth;
pub mod cli;
pub mod store;

#[allow(clippy::doc_markdown, clippy::needless_raw_string_hashes)]
pub mod built_info {
    include!(concat!(env!("OUT_DIR"), "/built.rs"));
}

pub const GIT_COMMIT_HASH: &str = match built_info::GIT_COMMIT_HASH {
    Some(hash) => hash,
    None => "unknown",
};
