//! Route handlers for the RPC surface.
//!
//! Every RPC call answers HTTP 200 with an [`RpcResult`](crate::auth::RpcResult)
//! envelope; the outcome lives in its `code`. Only a missing or malformed body
//! is rejected at the HTTP level (400).

pub mod authenticate;
pub mod dropout;
pub mod health;
pub mod login;
pub mod register;
pub mod types;
