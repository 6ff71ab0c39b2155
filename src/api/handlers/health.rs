use axum::{
    extract::Extension,
    http::{HeaderMap, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, warn};
use utoipa::ToSchema;

use crate::{auth::AuthenticationService, GIT_COMMIT_HASH};

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct Health {
    commit: String,
    name: String,
    version: String,
    /// `ok` or `error`, from a round trip to the account store.
    store: String,
}

impl Health {
    fn new(store_ok: bool) -> Self {
        Self {
            commit: GIT_COMMIT_HASH.to_string(),
            name: env!("CARGO_PKG_NAME").to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            store: if store_ok { "ok" } else { "error" }.to_string(),
        }
    }

    /// `name:version:short-commit`, short commit empty when unknown.
    fn x_app(&self) -> String {
        let short = self.commit.get(..7).unwrap_or_default();
        format!("{}:{}:{short}", self.name, self.version)
    }
}

#[utoipa::path(
    get,
    path= "/health",
    responses (
        (status = 200, description = "Account store is reachable", body = Health),
        (status = 503, description = "Account store is unreachable", body = Health)
    ),
    tag= "health"
)]
// axum handler for health, also mounted for OPTIONS without a body
pub async fn health(
    method: Method,
    service: Extension<Arc<AuthenticationService>>,
) -> Response {
    let store_ok = match service.store().health_check().await {
        Ok(()) => true,
        Err(err) => {
            error!("Account store health check failed: {err}");
            false
        }
    };
    let health = Health::new(store_ok);

    let mut headers = HeaderMap::new();
    match HeaderValue::from_str(&health.x_app()) {
        Ok(value) => {
            headers.insert("X-App", value);
        }
        Err(err) => warn!("Skipping X-App header: {err}"),
    }

    let status = if store_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    if method == Method::GET {
        (status, headers, Json(health)).into_response()
    } else {
        (status, headers).into_response()
    }
}
