//! Request bodies for the RPC endpoints.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(ToSchema, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password_credential: String,
}

#[derive(ToSchema, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password_credential: String,
}

#[derive(ToSchema, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticateRequest {
    /// Absent means the `Authorization` header is consulted instead.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_value: Option<String>,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct DropoutRequest {
    pub email: String,
}

// Credentials and tokens never reach the logs.
macro_rules! redacted_debug {
    ($name:ident { $($field:ident),* }) => {
        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.debug_struct(stringify!($name))
                    $(.field(stringify!($field), &self.$field))*
                    .finish_non_exhaustive()
            }
        }
    };
}

redacted_debug!(RegisterRequest { email });
redacted_debug!(LoginRequest { email });
redacted_debug!(AuthenticateRequest {});
