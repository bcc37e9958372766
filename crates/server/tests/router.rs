use std::path::PathBuf;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use sea_orm::DatabaseConnection;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use server::startup::{build_app, build_state};
use service::auth::domain::AuthUser;
use service::auth::token::issue_token;

const SECRET: &str = "router-test-secret-0123456789";

struct TestApp {
    router: Router,
    root: PathBuf,
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.root);
    }
}

/// Router over a disconnected database: only routes that fail before
/// touching the database, or never touch it, are exercised here.
fn app() -> TestApp {
    let root = std::env::temp_dir().join(format!("batik-router-{}", Uuid::new_v4()));
    for bucket in ["images", "documents", "products", "company"] {
        std::fs::create_dir_all(root.join(bucket)).unwrap();
    }
    let mut cfg = configs::AppConfig::default();
    cfg.storage.root = root.to_string_lossy().to_string();
    cfg.storage.max_upload_bytes = 1024;
    cfg.auth.jwt_secret = SECRET.into();
    let state = build_state(&cfg, DatabaseConnection::Disconnected);
    TestApp { router: build_app(state), root }
}

fn admin_token() -> String {
    let user = AuthUser { id: Uuid::new_v4(), email: "admin@batik.test".into(), name: "Admin".into() };
    issue_token(&user, SECRET, 1).unwrap().0
}

async fn send(app: &TestApp, req: Request<Body>) -> (StatusCode, Vec<u8>) {
    let res = app.router.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let body = res.into_body().collect().await.unwrap().to_bytes();
    (status, body.to_vec())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn admin(method: &str, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", admin_token()));
    match body {
        Some(v) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(v.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

const BOUNDARY: &str = "batik-form-boundary";

/// A text field, or a file field when `file` carries `(file_name, content_type)`.
struct Part<'a> {
    name: &'a str,
    file: Option<(&'a str, &'a str)>,
    data: Vec<u8>,
}

fn text_part<'a>(name: &'a str, value: &str) -> Part<'a> {
    Part { name, file: None, data: value.as_bytes().to_vec() }
}

fn file_part<'a>(file_name: &'a str, content_type: &'a str, data: Vec<u8>) -> Part<'a> {
    Part { name: "file", file: Some((file_name, content_type)), data }
}

fn upload(parts: Vec<Part<'_>>) -> Request<Body> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part.file {
            Some((file_name, content_type)) => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n",
                    part.name
                )
                .as_bytes(),
            ),
            None => body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", part.name).as_bytes(),
            ),
        }
        body.extend_from_slice(&part.data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    Request::builder()
        .method("POST")
        .uri("/admin/media")
        .header(header::AUTHORIZATION, format!("Bearer {}", admin_token()))
        .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"))
        .body(Body::from(body))
        .unwrap()
}

fn error_body(body: &[u8]) -> Value {
    let v: Value = serde_json::from_slice(body).expect("JSON error body");
    assert!(v["error"].is_string(), "missing error title in {v}");
    v
}

#[tokio::test]
async fn health_metrics_and_docs_are_public() {
    let app = app();
    let (status, body) = send(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    let v: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(v["status"], "ok");

    let (status, _) = send(&app, get("/metrics")).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, get("/api-docs/openapi.json")).await;
    assert_eq!(status, StatusCode::OK);
    let doc: Value = serde_json::from_slice(&body).unwrap();
    assert!(doc["paths"]["/api/products"].is_object());
}

#[tokio::test]
async fn admin_routes_require_a_valid_token() {
    let app = app();
    let (status, body) = send(&app, get("/admin/products")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let v: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(v["error"], "Unauthorized");

    let bad = Request::builder()
        .uri("/admin/products")
        .header(header::AUTHORIZATION, "Bearer not-a-jwt")
        .body(Body::empty())
        .unwrap();
    assert_eq!(send(&app, bad).await.0, StatusCode::UNAUTHORIZED);

    let user = AuthUser { id: Uuid::new_v4(), email: "a@b.test".into(), name: "A".into() };
    let (foreign, _) = issue_token(&user, "some-other-secret-value", 1).unwrap();
    let cookie = Request::builder()
        .uri("/admin/storage/images")
        .header(header::COOKIE, format!("auth_token={foreign}"))
        .body(Body::empty())
        .unwrap();
    assert_eq!(send(&app, cookie).await.0, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, get("/auth/me")).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn valid_token_reaches_handlers() {
    let app = app();
    // past the guard; the disconnected database then fails the query
    let (status, _) = send(&app, admin("GET", "/admin/products", None)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

    let (status, body) = send(&app, admin("GET", "/admin/storage/images", None)).await;
    assert_eq!(status, StatusCode::OK);
    let v: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(v, json!([]));

    let (status, _) = send(&app, admin("GET", "/admin/storage/videos", None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn storage_objects_are_served_and_transferred() {
    let app = app();
    std::fs::create_dir_all(app.root.join("products/kain")).unwrap();
    std::fs::write(app.root.join("products/kain/parang.png"), b"png-bytes").unwrap();

    let (status, body) = send(&app, get("/storage/products/kain/parang.png")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"png-bytes");

    let copy = json!({"from": "kain/parang.png", "to": "kain/parang-copy.png"});
    let (status, body) = send(&app, admin("POST", "/admin/storage/products/copy", Some(copy.clone()))).await;
    assert_eq!(status, StatusCode::OK);
    let v: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(v["path"], "kain/parang-copy.png");

    // destination now exists
    let (status, _) = send(&app, admin("POST", "/admin/storage/products/copy", Some(copy))).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let mv = json!({"from": "kain/parang-copy.png", "to": "arsip/parang.png"});
    let (status, _) = send(&app, admin("POST", "/admin/storage/products/move", Some(mv))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(app.root.join("products/arsip/parang.png").exists());
    assert!(!app.root.join("products/kain/parang-copy.png").exists());

    let (status, _) = send(&app, admin("DELETE", "/admin/storage/products/arsip/parang.png", None)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, admin("DELETE", "/admin/storage/products/arsip/parang.png", None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn bad_queries_fail_before_the_database() {
    let app = app();
    let (status, _) = send(&app, get("/api/products?sort=cheapest")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, get("/api/attributes/sizes")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, get("/api/settings/Bad%20Key")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn logout_clears_the_cookie() {
    let app = app();
    let req = Request::builder().method("POST").uri("/auth/logout").body(Body::empty()).unwrap();
    let res = app.router.clone().oneshot(req).await.unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    let cookie = res.headers().get(header::SET_COOKIE).unwrap().to_str().unwrap();
    assert!(cookie.starts_with("auth_token="));
}

#[tokio::test]
async fn malformed_requests_get_json_errors() {
    let app = app();

    let (status, body) = send(&app, admin("POST", "/admin/products", Some(json!({"name": "Kain"})))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let v = error_body(&body);
    assert_eq!(v["error"], "Validation Error");
    assert!(v["detail"].as_str().unwrap_or_default().contains("price"));

    let (status, body) = send(&app, admin("GET", "/admin/products/not-a-uuid", None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    error_body(&body);

    let (status, body) = send(&app, get("/api/products/parang/whatsapp?quantity=-1")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    error_body(&body);

    let (status, body) = send(&app, get("/api/products?min_price=murah")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    error_body(&body);

    let login = Request::builder()
        .method("POST")
        .uri("/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(&app, login).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    error_body(&body);

    let no_type = Request::builder()
        .method("POST")
        .uri("/auth/login")
        .body(Body::from("{}"))
        .unwrap();
    let (status, body) = send(&app, no_type).await;
    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    error_body(&body);
}

#[tokio::test]
async fn media_upload_form_is_validated() {
    let app = app();

    let (status, body) = send(&app, upload(vec![file_part("hero.png", "image/png", b"png".to_vec())])).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(error_body(&body)["detail"].as_str().unwrap_or_default().contains("bucket"));

    let (status, body) = send(&app, upload(vec![text_part("bucket", "images")])).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(error_body(&body)["detail"].as_str().unwrap_or_default().contains("file"));

    let (status, body) = send(&app, upload(vec![
        text_part("bucket", "videos"),
        file_part("clip.png", "image/png", b"png".to_vec()),
    ])).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    error_body(&body);

    let not_a_form = Request::builder()
        .method("POST")
        .uri("/admin/media")
        .header(header::AUTHORIZATION, format!("Bearer {}", admin_token()))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{}"))
        .unwrap();
    let (status, body) = send(&app, not_a_form).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    error_body(&body);
}

#[tokio::test]
async fn media_upload_enforces_type_and_size() {
    let app = app();

    let (status, body) = send(&app, upload(vec![
        text_part("bucket", "images"),
        file_part("katalog.pdf", "application/pdf", b"%PDF".to_vec()),
    ])).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    error_body(&body);

    // declared as an image but would be served as HTML
    let (status, body) = send(&app, upload(vec![
        text_part("bucket", "images"),
        file_part("evil.html", "image/png", b"<script>alert(1)</script>".to_vec()),
    ])).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    error_body(&body);

    // over storage.max_upload_bytes but inside the request body limit
    let (status, body) = send(&app, upload(vec![
        text_part("bucket", "products"),
        file_part("big.png", "image/png", vec![7u8; 2048]),
    ])).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    error_body(&body);

    // over the request body limit itself
    let (status, body) = send(&app, upload(vec![
        text_part("bucket", "products"),
        file_part("huge.png", "image/png", vec![7u8; 128 * 1024]),
    ])).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    error_body(&body);

    for bucket in ["images", "products"] {
        let left = std::fs::read_dir(app.root.join(bucket)).unwrap().count();
        assert_eq!(left, 0, "nothing stored in {bucket}");
    }
}

#[tokio::test]
async fn failed_media_insert_removes_the_stored_blob() {
    let app = app();
    let (status, body) = send(&app, upload(vec![
        text_part("bucket", "images"),
        text_part("prefix", "banner"),
        text_part("alt_text", "Banner utama"),
        file_part("hero.png", "image/png", b"png-bytes".to_vec()),
    ])).await;
    // the disconnected database refuses the media row
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    error_body(&body);
    let banner = app.root.join("images/banner");
    let left = std::fs::read_dir(&banner).map(|d| d.count()).unwrap_or(0);
    assert_eq!(left, 0);
}
