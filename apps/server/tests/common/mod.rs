#![allow(dead_code)]

use std::time::Duration;

use axum::{
    body::{to_bytes, Body},
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tempfile::{tempdir, TempDir};
use tower::ServiceExt;

use onekaday_server::{api::app_router, build_state, config::Config};

pub struct TestApp {
    pub router: Router,
    _dir: TempDir,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Value,
}

pub fn test_config(dir: &TempDir) -> Config {
    Config {
        listen_addr: "127.0.0.1:0".parse().unwrap(),
        db_path: dir.path().join("test.db").to_string_lossy().to_string(),
        secret_key: b"test-secret-key-of-32-bytes-long".to_vec(),
        session_ttl: Duration::from_secs(3600),
        remember_ttl: Duration::from_secs(30 * 86_400),
        cookie_secure: false,
        cors_allow: vec!["*".to_string()],
        request_timeout: Duration::from_secs(30),
        page_size: 20,
        top_sources: 2,
    }
}

pub async fn spawn_app() -> TestApp {
    let dir = tempdir().unwrap();
    let config = test_config(&dir);
    let state = build_state(&config).await.unwrap();
    TestApp {
        router: app_router(state, &config),
        _dir: dir,
    }
}

impl TestApp {
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        headers: &[(header::HeaderName, String)],
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        for (name, value) in headers {
            builder = builder.header(name, value);
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).to_string())
            })
        };
        TestResponse {
            status,
            headers,
            body,
        }
    }

    /// Sends a request carrying a bearer token.
    pub async fn authed(
        &self,
        method: Method,
        uri: &str,
        token: &str,
        body: Option<Value>,
    ) -> TestResponse {
        self.send(
            method,
            uri,
            &[(header::AUTHORIZATION, format!("Bearer {token}"))],
            body,
        )
        .await
    }

    pub async fn register(&self, username: &str, password: &str) -> TestResponse {
        self.send(
            Method::POST,
            "/auth/register",
            &[],
            Some(json!({
                "username": username,
                "email": format!("{username}@example.com"),
                "password": password,
                "confirmPassword": password,
            })),
        )
        .await
    }

    pub async fn login(&self, identifier: &str, password: &str, remember: bool) -> TestResponse {
        self.send(
            Method::POST,
            "/auth/login",
            &[],
            Some(json!({
                "identifier": identifier,
                "password": password,
                "remember": remember,
            })),
        )
        .await
    }

    /// Registers a user and returns a bearer token for it.
    pub async fn user_token(&self, username: &str) -> String {
        let registered = self.register(username, "hunter22").await;
        assert_eq!(registered.status, StatusCode::CREATED);
        let login = self.login(username, "hunter22", false).await;
        assert_eq!(login.status, StatusCode::OK);
        login.body["accessToken"].as_str().unwrap().to_string()
    }
}

pub fn set_cookie(response: &TestResponse) -> String {
    response
        .headers
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}
