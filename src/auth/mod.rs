//! Credential verification and the access token lifecycle.
//!
//! ## Tokens
//!
//! Tokens are opaque: a 128-character hex string with no embedded structure,
//! validated only by looking it up in the store. Each token expires 20 minutes
//! after it is issued. Expired tokens stay stored but never authenticate again.
//!
//! ## Results
//!
//! Every operation returns an [`RpcResult`] whose code is one of `Success`,
//! `Forbidden`, `Duplicate` or `Unknown`. Store errors are translated here and
//! nowhere else.

pub mod model;
pub mod result;
pub mod service;
pub mod token;

pub use model::{AccessToken, Account, AccountProjection, TOKEN_TTL_SECONDS};
pub use result::{ResultCode, RpcResult};
pub use service::AuthenticationService;
pub use token::TokenIssuer;
