pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post, put},
    Router,
};

use crate::auth::handlers as auth;
use crate::content::handlers as content;
use crate::cv::handlers as cv;
use crate::state::AppState;

/// Headroom for multipart framing on top of the file itself.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes + MULTIPART_OVERHEAD_BYTES;

    Router::new()
        .route("/health", get(health::health_handler))
        // Auth
        .route("/api/v1/auth/login", post(auth::handle_login))
        // CV
        .route("/api/v1/cv/status", get(cv::handle_status))
        .route(
            "/api/v1/cv/upload",
            post(cv::handle_upload).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/api/v1/cv", delete(cv::handle_delete))
        .route("/api/v1/cv/download", get(cv::handle_download))
        // Content
        .route(
            "/api/v1/projects",
            get(content::handle_list_projects).post(content::handle_create_project),
        )
        .route(
            "/api/v1/projects/:id",
            put(content::handle_update_project).delete(content::handle_delete_project),
        )
        .route(
            "/api/v1/experiences",
            get(content::handle_list_experiences).post(content::handle_create_experience),
        )
        .route(
            "/api/v1/experiences/:id",
            put(content::handle_update_experience).delete(content::handle_delete_experience),
        )
        .route(
            "/api/v1/education",
            get(content::handle_list_education).post(content::handle_create_education),
        )
        .route(
            "/api/v1/education/:id",
            put(content::handle_update_education).delete(content::handle_delete_education),
        )
        .route(
            "/api/v1/skills",
            get(content::handle_list_skills).post(content::handle_create_skill_category),
        )
        .route(
            "/api/v1/skills/:id",
            put(content::handle_update_skill_category)
                .delete(content::handle_delete_skill_category),
        )
        .route(
            "/api/v1/about",
            get(content::handle_get_about).put(content::handle_put_about),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
        response::Response,
    };
    use serde_json::Value;
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    use super::*;
    use crate::auth::token::TokenKeys;
    use crate::config::Config;
    use crate::cv::memory::{MemoryBlobStore, MemoryFileRegistry};
    use crate::cv::CvService;

    const BOUNDARY: &str = "portfolio-test-boundary";

    struct TestApp {
        router: Router,
        token: String,
    }

    /// CV storage is in memory; the pool is never dialled by these routes.
    fn test_app() -> TestApp {
        test_app_with(Config::for_tests())
    }

    fn test_app_with(config: Config) -> TestApp {
        let tokens = TokenKeys::new(&config.jwt_secret, config.jwt_expire_secs);
        let token = tokens.issue("admin").unwrap();
        let db = PgPoolOptions::new()
            .connect_lazy(&config.database_url)
            .unwrap();
        let cv = CvService::new(
            Arc::new(MemoryBlobStore::default()),
            Arc::new(MemoryFileRegistry::default()),
            config.max_upload_bytes,
        );
        let state = AppState {
            db,
            cv,
            tokens,
            config,
        };
        TestApp {
            router: build_router(state),
            token,
        }
    }

    impl TestApp {
        async fn send(&self, request: Request<Body>) -> Response {
            self.router.clone().oneshot(request).await.unwrap()
        }

        fn authed(&self, method: Method, uri: &str) -> axum::http::request::Builder {
            Request::builder()
                .method(method)
                .uri(uri)
                .header(header::AUTHORIZATION, format!("Bearer {}", self.token))
        }

        async fn upload(&self, filename: &str, content_type: &str, data: &[u8]) -> Response {
            let request = self
                .authed(Method::POST, "/api/v1/cv/upload")
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={BOUNDARY}"),
                )
                .body(Body::from(multipart_body("file", filename, content_type, data)))
                .unwrap();
            self.send(request).await
        }

        async fn status(&self) -> Value {
            let request = self
                .authed(Method::GET, "/api/v1/cv/status")
                .body(Body::empty())
                .unwrap();
            let response = self.send(request).await;
            assert_eq!(response.status(), StatusCode::OK);
            json_body(response).await
        }

        async fn download(&self) -> Response {
            let request = Request::get("/api/v1/cv/download")
                .body(Body::empty())
                .unwrap();
            self.send(request).await
        }
    }

    fn multipart_body(field: &str, filename: &str, content_type: &str, data: &[u8]) -> Vec<u8> {
        let mut body = format!(
            "--{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n\
             Content-Type: {content_type}\r\n\r\n"
        )
        .into_bytes();
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let app = test_app();
        let response = app
            .send(Request::get("/health").body(Body::empty()).unwrap())
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn test_status_requires_admin() {
        let app = test_app();
        let response = app
            .send(Request::get("/api/v1/cv/status").body(Body::empty()).unwrap())
            .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(json_body(response).await["error"]["code"], "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn test_forged_token_rejected() {
        let app = test_app();
        let forged = TokenKeys::new("some-other-secret", 600).issue("admin").unwrap();
        let response = app
            .send(
                Request::get("/api/v1/cv/status")
                    .header(header::AUTHORIZATION, format!("Bearer {forged}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_empty_status_and_download() {
        let app = test_app();
        let status = app.status().await;
        assert_eq!(status["exists"], false);
        assert!(status["cv"].is_null());

        let response = app.download().await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_upload_then_public_download() {
        let app = test_app();
        let pdf = b"%PDF-1.7\n%\xe2\xe3\xcf\xd3\nbody\n%%EOF";

        let response = app.upload("Sam Lee.pdf", "application/pdf", pdf).await;
        assert_eq!(response.status(), StatusCode::OK);
        let uploaded = json_body(response).await;
        assert_eq!(uploaded["filename"], "Sam Lee.pdf");
        assert_eq!(uploaded["size"], pdf.len());
        assert!(uploaded["fileId"].is_string());

        let status = app.status().await;
        assert_eq!(status["exists"], true);
        assert_eq!(status["cv"]["fileId"], uploaded["fileId"]);

        let response = app.download().await;
        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers().clone();
        assert_eq!(headers[header::CONTENT_TYPE], "application/pdf");
        assert_eq!(
            headers[header::CONTENT_DISPOSITION],
            "attachment; filename=\"Sam Lee.pdf\""
        );
        assert_eq!(headers[header::CONTENT_LENGTH], pdf.len().to_string().as_str());
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], &pdf[..]);
    }

    #[tokio::test]
    async fn test_upload_replaces_previous_cv() {
        let app = test_app();
        assert_eq!(
            app.upload("old.pdf", "application/pdf", b"%PDF-old").await.status(),
            StatusCode::OK
        );
        assert_eq!(
            app.upload("new.pdf", "application/pdf", b"%PDF-new").await.status(),
            StatusCode::OK
        );

        let body = to_bytes(app.download().await.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], b"%PDF-new");
        assert_eq!(app.status().await["cv"]["filename"], "new.pdf");
    }

    #[tokio::test]
    async fn test_non_pdf_upload_rejected() {
        let app = test_app();
        let response = app.upload("notes.txt", "text/plain", b"hello").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(app.status().await["exists"], false);
    }

    #[tokio::test]
    async fn test_upload_without_file_field_rejected() {
        let app = test_app();
        let request = app
            .authed(Method::POST, "/api/v1/cv/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(multipart_body(
                "attachment",
                "cv.pdf",
                "application/pdf",
                b"%PDF",
            )))
            .unwrap();
        let response = app.send(request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"]["message"], "No file provided");
    }

    #[tokio::test]
    async fn test_upload_requires_admin() {
        let app = test_app();
        let request = Request::post("/api/v1/cv/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(multipart_body("file", "cv.pdf", "application/pdf", b"%PDF")))
            .unwrap();
        assert_eq!(app.send(request).await.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(app.status().await["exists"], false);
    }

    #[tokio::test]
    async fn test_delete_lifecycle() {
        let app = test_app();
        let delete = || {
            app.authed(Method::DELETE, "/api/v1/cv")
                .body(Body::empty())
                .unwrap()
        };

        assert_eq!(app.send(delete()).await.status(), StatusCode::NOT_FOUND);

        app.upload("cv.pdf", "application/pdf", b"%PDF").await;
        assert_eq!(app.send(delete()).await.status(), StatusCode::OK);
        assert_eq!(app.status().await["exists"], false);
        assert_eq!(app.download().await.status(), StatusCode::NOT_FOUND);

        assert_eq!(app.send(delete()).await.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_content_writes_require_admin() {
        let app = test_app();
        let request = Request::post("/api/v1/projects")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"title":"x","description":"y"}"#))
            .unwrap();
        assert_eq!(app.send(request).await.status(), StatusCode::UNAUTHORIZED);

        let request = Request::delete(format!("/api/v1/skills/{}", uuid::Uuid::new_v4()))
            .body(Body::empty())
            .unwrap();
        assert_eq!(app.send(request).await.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_invalid_content_rejected_before_storage() {
        let app = test_app();
        let request = app
            .authed(Method::POST, "/api/v1/skills")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                r#"{"title":"Languages","skills":[{"name":"Rust","percentage":140}]}"#,
            ))
            .unwrap();
        let response = app.send(request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"]["code"], "VALIDATION_ERROR");
    }

    fn small_limit_app() -> TestApp {
        let mut config = Config::for_tests();
        config.max_upload_bytes = 1024;
        test_app_with(config)
    }

    #[tokio::test]
    async fn test_file_over_configured_limit_is_413() {
        let app = small_limit_app();
        let response = app
            .upload("cv.pdf", "application/pdf", &vec![b'x'; 40 * 1024])
            .await;
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(json_body(response).await["error"]["code"], "PAYLOAD_TOO_LARGE");
        assert_eq!(app.status().await["exists"], false);
    }

    #[tokio::test]
    async fn test_body_over_transport_limit_is_413() {
        let app = small_limit_app();
        let response = app
            .upload("cv.pdf", "application/pdf", &vec![b'x'; 200 * 1024])
            .await;
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(json_body(response).await["error"]["code"], "PAYLOAD_TOO_LARGE");
        assert_eq!(app.status().await["exists"], false);
    }

    #[tokio::test]
    async fn test_file_within_configured_limit_accepted() {
        let app = small_limit_app();
        let response = app.upload("cv.pdf", "application/pdf", &[b'x'; 1024]).await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}
