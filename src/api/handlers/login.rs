use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;
use tracing::instrument;

use super::types::LoginRequest;
use crate::auth::{AuthenticationService, RpcResult};

#[utoipa::path(
    post,
    path = "/v1/login",
    request_body = LoginRequest,
    responses (
        (status = 200, description = "Success with the access token as content, or Forbidden", body = RpcResult, content_type = "application/json"),
        (status = 400, description = "Missing payload"),
    ),
    tag = "auth"
)]
#[instrument(skip_all)]
pub async fn login(
    service: Extension<Arc<AuthenticationService>>,
    payload: Option<Json<LoginRequest>>,
) -> impl IntoResponse {
    let Some(Json(request)) = payload else {
        return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response();
    };

    let result = service
        .login(&request.email, &request.password_credential)
        .await;

    (StatusCode::OK, Json(result)).into_response()
}
