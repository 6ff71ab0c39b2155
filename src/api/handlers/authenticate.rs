use axum::{
    extract::Extension,
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tracing::instrument;

use super::types::AuthenticateRequest;
use crate::auth::{AuthenticationService, RpcResult};

#[utoipa::path(
    post,
    path = "/v1/authenticate",
    request_body(content = AuthenticateRequest, description = "Optional when an `Authorization: Bearer` header is sent"),
    params(
        ("Authorization" = Option<String>, Header, description = "Bearer access token")
    ),
    responses (
        (status = 200, description = "Success with the account projection as content, or Forbidden", body = RpcResult, content_type = "application/json"),
        (status = 400, description = "No token in body or header"),
    ),
    tag = "auth"
)]
#[instrument(skip_all)]
pub async fn authenticate(
    headers: HeaderMap,
    service: Extension<Arc<AuthenticationService>>,
    payload: Option<Json<AuthenticateRequest>>,
) -> impl IntoResponse {
    // A body token is looked up exactly as sent; the header is only a fallback.
    let Some(token) = payload
        .and_then(|Json(request)| request.token_value)
        .or_else(|| extract_bearer_token(&headers))
    else {
        return (StatusCode::BAD_REQUEST, "Missing token".to_string()).into_response();
    };

    (StatusCode::OK, Json(service.authenticate_token(&token).await)).into_response()
}

fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let trimmed = value.trim();
    let token = trimmed
        .strip_prefix("Bearer ")
        .or_else(|| trimmed.strip_prefix("bearer "))?
        .trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}
