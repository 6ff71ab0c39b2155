use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;
use tracing::instrument;

use super::types::DropoutRequest;
use crate::auth::{AuthenticationService, RpcResult};

#[utoipa::path(
    post,
    path = "/v1/dropout",
    request_body = DropoutRequest,
    responses (
        (status = 200, description = "Account removed; unknown emails also succeed", body = RpcResult, content_type = "application/json"),
        (status = 400, description = "Missing payload"),
    ),
    tag = "auth"
)]
#[instrument(skip(service))]
pub async fn dropout(
    service: Extension<Arc<AuthenticationService>>,
    payload: Option<Json<DropoutRequest>>,
) -> impl IntoResponse {
    let Some(Json(request)) = payload else {
        return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response();
    };

    (StatusCode::OK, Json(service.dropout(&request.email).await)).into_response()
}
