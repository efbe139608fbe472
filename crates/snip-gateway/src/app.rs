use std::path::Path;

use axum::routing::{get, post};
use axum::Router;
use tower_http::services::ServeFile;
use tower_http::trace::TraceLayer;

use crate::handlers::{health_handler, redirect_handler, shorten_handler};
use crate::state::AppState;

pub struct App;

impl App {
    /// Builds the HTTP router. `static_dir` must contain `index.html`.
    pub fn router(state: AppState, static_dir: &Path) -> Router {
        let index = static_dir.join("index.html");

        Router::new()
            .route_service("/", ServeFile::new(&index))
            .route_service("/index.html", ServeFile::new(&index))
            .route("/health", get(health_handler))
            .route("/api/shorten", post(shorten_handler))
            .route("/{code}", get(redirect_handler))
            .with_state(state)
            .layer(TraceLayer::new_for_http())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use axum::response::Response;
    use serde_json::{json, Value};
    use snip_core::{ShortCode, Shortener, ShortenerError};
    use snip_generator::Sha256Generator;
    use snip_shortener::ShortenerService;
    use snip_storage::InMemoryRepository;
    use std::sync::Arc;
    use tempfile::TempDir;
    use tower::ServiceExt;

    const BASE_URL: &str = "http://sho.rt";

    /// Every call fails as if the database were unreachable.
    struct UnavailableShortener;

    #[async_trait]
    impl Shortener for UnavailableShortener {
        async fn shorten(&self, _url: &str) -> Result<ShortCode, ShortenerError> {
            Err(ShortenerError::Storage("connection refused".to_string()))
        }

        async fn resolve(&self, _code: &str) -> Result<String, ShortenerError> {
            Err(ShortenerError::Storage("connection refused".to_string()))
        }
    }

    struct TestApp {
        router: Router,
        _static_dir: TempDir,
    }

    impl TestApp {
        fn new() -> Self {
            let service = ShortenerService::new(InMemoryRepository::new(), Sha256Generator::new());
            Self::with_shortener(Arc::new(service))
        }

        fn with_shortener(shortener: Arc<dyn Shortener>) -> Self {
            let static_dir = tempfile::tempdir().unwrap();
            std::fs::write(
                static_dir.path().join("index.html"),
                "<html><body>snip</body></html>",
            )
            .unwrap();

            let router = App::router(AppState::new(shortener, BASE_URL), static_dir.path());
            Self {
                router,
                _static_dir: static_dir,
            }
        }

        async fn send(&self, request: Request<Body>) -> Response {
            self.router.clone().oneshot(request).await.unwrap()
        }

        async fn shorten(&self, body: &str) -> Response {
            self.send(
                Request::post("/api/shorten")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
        }

        async fn get(&self, uri: &str) -> Response {
            self.send(Request::get(uri).body(Body::empty()).unwrap())
                .await
        }
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let app = TestApp::new();

        let response = app.get("/health").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, json!({"status": "ok"}));
    }

    #[tokio::test]
    async fn shorten_returns_code_and_short_url() {
        let app = TestApp::new();

        let response = app.shorten(r#"{"url": "example.com"}"#).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            json!({
                "message": "URL shortened successfully",
                "short_code": "mwyISoQ",
                "short_url": "http://sho.rt/mwyISoQ",
            })
        );
    }

    #[tokio::test]
    async fn shorten_is_idempotent_over_http() {
        let app = TestApp::new();

        let first = json_body(app.shorten(r#"{"url": "https://example.com"}"#).await).await;
        let second = json_body(app.shorten(r#"{"url": "https://example.com"}"#).await).await;

        assert_eq!(first["short_code"], second["short_code"]);
    }

    #[tokio::test]
    async fn shorten_rejects_malformed_bodies() {
        let app = TestApp::new();

        for body in ["not json", "{}", r#"{"url": 42}"#] {
            let response = app.shorten(body).await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body {body}");
            assert_eq!(
                json_body(response).await,
                json!({"error": "Invalid request body"})
            );
        }
    }

    #[tokio::test]
    async fn shorten_without_content_type_is_invalid_body() {
        let app = TestApp::new();

        let response = app
            .send(
                Request::post("/api/shorten")
                    .body(Body::from(r#"{"url": "example.com"}"#))
                    .unwrap(),
            )
            .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn shorten_rejects_empty_url() {
        let app = TestApp::new();

        let response = app.shorten(r#"{"url": ""}"#).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn redirect_to_original_url() {
        let app = TestApp::new();
        app.shorten(r#"{"url": "https://www.rust-lang.org"}"#).await;

        let response = app.get("/cWtG3nY").await;

        assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "https://www.rust-lang.org"
        );
    }

    #[tokio::test]
    async fn redirect_unknown_code_is_not_found() {
        let app = TestApp::new();

        let response = app.get("/doesNotExist").await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            json_body(response).await,
            json!({"error": "Short URL not found"})
        );
    }

    #[tokio::test]
    async fn redirect_invalid_code_is_bad_request() {
        let app = TestApp::new();

        let response = app.get("/bad.code").await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn shorten_rejects_url_unusable_as_location() {
        let app = TestApp::new();

        for body in [r#"{"url": "http://a\nb"}"#, r#"{"url": "http://a\u007fb"}"#] {
            let response = app.shorten(body).await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body {body}");
            assert_eq!(
                json_body(response).await,
                json!({"error": "URL contains characters not allowed in a redirect"})
            );
        }
    }

    #[tokio::test]
    async fn redirect_to_stored_url_with_control_characters_is_json_error() {
        let service = ShortenerService::new(InMemoryRepository::new(), Sha256Generator::new());
        let code = service.shorten("http://a\nb").await.unwrap();
        let app = TestApp::with_shortener(Arc::new(service));

        let response = app.get(&format!("/{code}")).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(response.headers().get(header::LOCATION).is_none());
        assert_eq!(
            json_body(response).await,
            json!({"error": "stored URL is not a valid redirect target"})
        );
    }

    #[tokio::test]
    async fn storage_failures_are_internal_errors() {
        let app = TestApp::with_shortener(Arc::new(UnavailableShortener));

        let response = app.get("/abc123").await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            json_body(response).await,
            json!({"error": "internal storage error"})
        );

        let response = app.shorten(r#"{"url": "example.com"}"#).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn index_page_is_served() {
        let app = TestApp::new();

        for uri in ["/", "/index.html"] {
            let response = app.get(uri).await;
            assert_eq!(response.status(), StatusCode::OK, "uri {uri}");

            let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            assert_eq!(&bytes[..], b"<html><body>snip</body></html>");
        }
    }
}
