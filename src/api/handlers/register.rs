use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;
use tracing::instrument;

use super::types::RegisterRequest;
use crate::auth::{AuthenticationService, RpcResult};

#[utoipa::path(
    post,
    path = "/v1/register",
    request_body = RegisterRequest,
    responses (
        (status = 200, description = "Success, or Duplicate when the email is taken, or Unknown on store failure", body = RpcResult, content_type = "application/json"),
        (status = 400, description = "Missing payload"),
    ),
    tag = "auth"
)]
#[instrument(skip_all)]
pub async fn register(
    service: Extension<Arc<AuthenticationService>>,
    payload: Option<Json<RegisterRequest>>,
) -> impl IntoResponse {
    let Some(Json(request)) = payload else {
        return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response();
    };

    let result = service
        .register(&request.email, &request.password_credential)
        .await;

    (StatusCode::OK, Json(result)).into_response()
}
