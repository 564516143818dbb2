use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use tempfile::TempDir;
use tower::ServiceExt;

use english_study_backend::db::Database;
use english_study_backend::services::{ProviderEndpoints, Providers};
use english_study_backend::state::AppState;

/// Nothing listens on this address, so every outbound provider call fails
/// immediately and the cascades fall through to their offline tiers.
const UNREACHABLE_BASE: &str = "http://127.0.0.1:9";

pub struct TestApp {
    pub router: Router,
    _db_dir: TempDir,
}

pub async fn create_test_app() -> TestApp {
    let db_dir = TempDir::new().expect("create temp dir");
    let db_path = db_dir.path().join("test.db");

    let db = Database::connect(&db_path).await.expect("open test database");
    let providers = Providers::new(ProviderEndpoints::all_pointing_at(UNREACHABLE_BASE));
    let state = AppState::new(db, providers);

    TestApp {
        router: english_study_backend::build_app(state),
        _db_dir: db_dir,
    }
}

impl TestApp {
    pub async fn get(&self, uri: &str, token: Option<&str>) -> Response {
        self.send("GET", uri, token, None).await
    }

    pub async fn post_json(
        &self,
        uri: &str,
        token: Option<&str>,
        body: serde_json::Value,
    ) -> Response {
        self.send("POST", uri, token, Some(body)).await
    }

    pub async fn put_json(
        &self,
        uri: &str,
        token: Option<&str>,
        body: serde_json::Value,
    ) -> Response {
        self.send("PUT", uri, token, Some(body)).await
    }

    pub async fn delete_json(
        &self,
        uri: &str,
        token: Option<&str>,
        body: serde_json::Value,
    ) -> Response {
        self.send("DELETE", uri, token, Some(body)).await
    }

    pub async fn delete(&self, uri: &str, token: Option<&str>) -> Response {
        self.send("DELETE", uri, token, None).await
    }

    /// Sends a body verbatim with a JSON content type; used to exercise the
    /// malformed-payload paths.
    pub async fn post_raw(&self, uri: &str, token: Option<&str>, body: &str) -> Response {
        let mut builder = Request::builder().method("POST").uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Token {token}"));
        }
        let request = builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();

        self.router.clone().oneshot(request).await.unwrap()
    }

    async fn send(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<serde_json::Value>,
    ) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Token {token}"));
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.router.clone().oneshot(request).await.unwrap()
    }
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read response body");
    serde_json::from_slice(&bytes).expect("response body is JSON")
}

/// Registers a user and logs in, returning the session token.
pub async fn register_and_login(app: &TestApp, username: &str, email: &str) -> String {
    let response = app
        .post_json(
            "/api/auth/register",
            None,
            serde_json::json!({
                "username": username,
                "email": email,
                "password": "pw123456",
            }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .post_json(
            "/api/auth/login",
            None,
            serde_json::json!({
                "username": username,
                "password": "pw123456",
            }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    body["token"].as_str().expect("login token").to_string()
}
