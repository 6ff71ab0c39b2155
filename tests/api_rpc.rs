//! End-to-end tests of the RPC endpoints over the in-memory account store.
//!
//! Requests go straight into the axum router with `tower::ServiceExt::oneshot`,
//! so no socket or database is needed.

use anyhow::{Context, Result};
use axum::{
    body::{to_bytes, Body},
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        Method, Request, StatusCode,
    },
    Router,
};
use lws_auth::{
    api,
    auth::{AccessToken, AccountProjection, AuthenticationService, ResultCode, RpcResult},
    store::{AccountStore, MemoryAccountStore},
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

struct TestApp {
    router: Router,
    store: Arc<MemoryAccountStore>,
}

impl TestApp {
    fn new() -> Self {
        let store = Arc::new(MemoryAccountStore::new());
        let service = Arc::new(AuthenticationService::new(store.clone()));
        Self {
            router: api::app(service),
            store,
        }
    }

    async fn send(&self, request: Request<Body>) -> Result<(StatusCode, Vec<u8>)> {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .context("router failed")?;
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .context("failed to read body")?;
        Ok((status, body.to_vec()))
    }

    async fn call(&self, path: &str, payload: Value) -> Result<RpcResult> {
        let request = Request::builder()
            .method(Method::POST)
            .uri(path)
            .header(CONTENT_TYPE, "application/json")
            .body(Body::from(payload.to_string()))?;
        let (status, body) = self.send(request).await?;
        assert_eq!(status, StatusCode::OK);
        serde_json::from_slice(&body).context("response is not an RpcResult")
    }

    async fn register(&self, email: &str, password: &str) -> Result<RpcResult> {
        self.call(
            "/v1/register",
            json!({"email": email, "passwordCredential": password}),
        )
        .await
    }

    async fn login(&self, email: &str, password: &str) -> Result<RpcResult> {
        self.call(
            "/v1/login",
            json!({"email": email, "passwordCredential": password}),
        )
        .await
    }

    async fn authenticate(&self, token: &str) -> Result<RpcResult> {
        self.call("/v1/authenticate", json!({"tokenValue": token}))
            .await
    }
}

#[tokio::test]
async fn register_login_authenticate_dropout_flow() -> Result<()> {
    let app = TestApp::new();

    let registered = app.register("alice@example.com", "s3cret").await?;
    assert_eq!(registered.code, ResultCode::Success);
    assert!(registered.content.is_empty());

    let duplicate = app.register("alice@example.com", "other").await?;
    assert_eq!(duplicate.code, ResultCode::Duplicate);
    assert!(duplicate.message.contains("alice@example.com"));
    assert_eq!(app.store.len().await, 1);

    let login = app.login("alice@example.com", "s3cret").await?;
    assert_eq!(login.code, ResultCode::Success);
    let token: AccessToken = serde_json::from_str(&login.content)?;
    assert_eq!(token.expires_at - token.created_at, 20 * 60);

    let authenticated = app.authenticate(&token.value).await?;
    assert_eq!(authenticated.code, ResultCode::Success);
    let projection: AccountProjection = serde_json::from_str(&authenticated.content)?;
    assert_eq!(projection.email, "alice@example.com");
    assert!(!authenticated.content.contains("s3cret"));
    assert!(!authenticated.content.contains("tokens"));

    let dropout = app
        .call("/v1/dropout", json!({"email": "alice@example.com"}))
        .await?;
    assert_eq!(dropout.code, ResultCode::Success);
    assert!(app.store.is_empty().await);

    assert_eq!(
        app.authenticate(&token.value).await?.code,
        ResultCode::Forbidden
    );
    assert_eq!(
        app.login("alice@example.com", "s3cret").await?.code,
        ResultCode::Forbidden
    );
    Ok(())
}

#[tokio::test]
async fn envelope_has_code_message_and_content() -> Result<()> {
    let app = TestApp::new();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/v1/login")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({"email": "nobody@example.com", "passwordCredential": "x"}).to_string(),
        ))?;

    let (status, body) = app.send(request).await?;
    assert_eq!(status, StatusCode::OK);

    let value: Value = serde_json::from_slice(&body)?;
    assert_eq!(value["code"], "Forbidden");
    assert_eq!(
        value["message"],
        "Login failed; please check your email or password"
    );
    assert_eq!(value["content"], "");
    Ok(())
}

#[tokio::test]
async fn forbidden_answers_do_not_reveal_which_check_failed() -> Result<()> {
    let app = TestApp::new();
    app.register("alice@example.com", "s3cret").await?;

    let unknown_email = app.login("bob@example.com", "s3cret").await?;
    let wrong_password = app.login("alice@example.com", "wrong").await?;
    assert_eq!(unknown_email, wrong_password);

    let never_issued = app.authenticate("deadbeef").await?;
    assert_eq!(never_issued.code, ResultCode::Forbidden);

    let stored_tokens = app
        .store
        .get("alice@example.com")
        .await
        .map(|account| account.tokens.len());
    assert_eq!(stored_tokens, Some(0));
    Ok(())
}

#[tokio::test]
async fn expired_token_is_forbidden_even_though_stored() -> Result<()> {
    let app = TestApp::new();
    app.register("alice@example.com", "s3cret").await?;

    let now = chrono::Utc::now().timestamp();
    let expired = AccessToken {
        value: "expired-token".to_string(),
        created_at: now - 3600,
        expires_at: now - 2400,
    };
    app.store.append_token("alice@example.com", expired).await?;

    let result = app.authenticate("expired-token").await?;
    assert_eq!(result.code, ResultCode::Forbidden);
    assert_eq!(
        result.message,
        "Access token expired or not found; please re-login"
    );
    Ok(())
}

#[tokio::test]
async fn bearer_header_authenticates_without_body() -> Result<()> {
    let app = TestApp::new();
    app.register("alice@example.com", "s3cret").await?;
    let login = app.login("alice@example.com", "s3cret").await?;
    let token: AccessToken = serde_json::from_str(&login.content)?;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/v1/authenticate")
        .header(AUTHORIZATION, format!("Bearer {}", token.value))
        .body(Body::empty())?;
    let (status, body) = app.send(request).await?;
    assert_eq!(status, StatusCode::OK);

    let result: RpcResult = serde_json::from_slice(&body)?;
    assert_eq!(result.code, ResultCode::Success);
    Ok(())
}

#[tokio::test]
async fn body_token_is_matched_exactly_as_sent() -> Result<()> {
    let app = TestApp::new();
    app.register("alice@example.com", "s3cret").await?;
    let login = app.login("alice@example.com", "s3cret").await?;
    let token: AccessToken = serde_json::from_str(&login.content)?;

    let empty = app.authenticate("").await?;
    assert_eq!(empty.code, ResultCode::Forbidden);
    assert_eq!(
        empty.message,
        "Access token expired or not found; please re-login"
    );

    let padded = app.authenticate(&format!("  {}\n", token.value)).await?;
    assert_eq!(padded.code, ResultCode::Forbidden);

    assert!(app.authenticate(&token.value).await?.is_success());
    Ok(())
}

#[tokio::test]
async fn body_without_token_falls_back_to_bearer_header() -> Result<()> {
    let app = TestApp::new();
    app.register("alice@example.com", "s3cret").await?;
    let login = app.login("alice@example.com", "s3cret").await?;
    let token: AccessToken = serde_json::from_str(&login.content)?;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/v1/authenticate")
        .header(CONTENT_TYPE, "application/json")
        .header(AUTHORIZATION, format!("Bearer {}", token.value))
        .body(Body::from("{}"))?;
    let (status, body) = app.send(request).await?;
    assert_eq!(status, StatusCode::OK);
    let result: RpcResult = serde_json::from_slice(&body)?;
    assert_eq!(result.code, ResultCode::Success);

    let request = Request::builder()
        .method(Method::POST)
        .uri("/v1/authenticate")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from("{}"))?;
    let (status, _) = app.send(request).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn concurrent_logins_produce_independent_tokens() -> Result<()> {
    let app = TestApp::new();
    app.register("alice@example.com", "s3cret").await?;

    let (first, second) = tokio::join!(
        app.login("alice@example.com", "s3cret"),
        app.login("alice@example.com", "s3cret")
    );
    let first: AccessToken = serde_json::from_str(&first?.content)?;
    let second: AccessToken = serde_json::from_str(&second?.content)?;
    assert_ne!(first.value, second.value);

    assert!(app.authenticate(&first.value).await?.is_success());
    assert!(app.authenticate(&second.value).await?.is_success());
    Ok(())
}

#[tokio::test]
async fn concurrent_registrations_yield_one_success() -> Result<()> {
    let app = Arc::new(TestApp::new());
    let mut handles = Vec::new();
    for i in 0..8 {
        let app = app.clone();
        handles.push(tokio::spawn(async move {
            app.register("race@example.com", &format!("pw{i}")).await
        }));
    }

    let mut codes = Vec::new();
    for handle in handles {
        codes.push(handle.await??.code);
    }
    assert_eq!(
        codes.iter().filter(|code| **code == ResultCode::Success).count(),
        1
    );
    assert_eq!(
        codes
            .iter()
            .filter(|code| **code == ResultCode::Duplicate)
            .count(),
        7
    );
    assert_eq!(app.store.len().await, 1);
    Ok(())
}

#[tokio::test]
async fn dropout_of_unknown_email_succeeds() -> Result<()> {
    let app = TestApp::new();
    let result = app
        .call("/v1/dropout", json!({"email": "ghost@example.com"}))
        .await?;
    assert_eq!(result, RpcResult::success());
    Ok(())
}

#[tokio::test]
async fn missing_payload_is_bad_request() -> Result<()> {
    let app = TestApp::new();
    for path in ["/v1/register", "/v1/login", "/v1/authenticate", "/v1/dropout"] {
        let request = Request::builder()
            .method(Method::POST)
            .uri(path)
            .body(Body::empty())?;
        let (status, _) = app.send(request).await?;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{path}");
    }
    Ok(())
}

#[tokio::test]
async fn health_reports_store_and_request_id() -> Result<()> {
    let app = TestApp::new();
    let request = Request::builder()
        .method(Method::GET)
        .uri("/health")
        .body(Body::empty())?;
    let response = app.router.clone().oneshot(request).await?;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
    let x_app = response
        .headers()
        .get("X-App")
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(x_app.starts_with(concat!(env!("CARGO_PKG_NAME"), ":")));

    let body = to_bytes(response.into_body(), usize::MAX).await?;
    let health: Value = serde_json::from_slice(&body)?;
    assert_eq!(health["store"], "ok");
    assert_eq!(health["version"], env!("CARGO_PKG_VERSION"));
    Ok(())
}

#[tokio::test]
async fn openapi_document_is_served() -> Result<()> {
    let app = TestApp::new();
    let request = Request::builder()
        .method(Method::GET)
        .uri("/openapi.json")
        .body(Body::empty())?;
    let (status, body) = app.send(request).await?;
    assert_eq!(status, StatusCode::OK);

    let doc: Value = serde_json::from_slice(&body)?;
    assert!(doc["paths"]["/v1/login"].is_object());
    assert!(doc["paths"]["/v1/authenticate"].is_object());
    Ok(())
}
