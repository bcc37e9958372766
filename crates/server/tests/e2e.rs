use std::net::SocketAddr;

use migration::MigratorTrait;
use reqwest::StatusCode;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use uuid::Uuid;

use server::startup::{build_app, build_state};
use service::auth::domain::RegisterInput;

struct TestApp {
    base_url: String,
    email: String,
    password: String,
}

fn db_tests_enabled() -> bool {
    std::env::var("SKIP_DB_TESTS").is_err() && std::env::var("DATABASE_URL").is_ok()
}

async fn start_server() -> anyhow::Result<TestApp> {
    let db = models::db::connect().await?;
    migration::Migrator::up(&db, None).await?;

    let mut cfg = configs::AppConfig::default();
    cfg.storage.root = std::env::temp_dir()
        .join(format!("batik-e2e-{}", Uuid::new_v4()))
        .to_string_lossy()
        .to_string();
    cfg.auth.jwt_secret = "e2e-secret-0123456789abcdef".into();
    let state = build_state(&cfg, db);
    state.store.ensure_buckets().await?;

    let email = format!("admin_{}@batik.test", Uuid::new_v4().simple());
    let password = "S3curePass!".to_string();
    state
        .auth
        .register(RegisterInput { email: email.clone(), name: "Admin".into(), password: password.clone() })
        .await?;

    let app = build_app(state);
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            eprintln!("server error: {}", e);
        }
    });

    Ok(TestApp { base_url: format!("http://{}", addr), email, password })
}

fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .build()
        .expect("reqwest client")
}

#[tokio::test]
async fn e2e_login_cookie_and_logout() -> anyhow::Result<()> {
    if !db_tests_enabled() { return Ok(()); }
    let app = start_server().await?;
    let c = client();

    let res = c
        .post(format!("{}/auth/login", app.base_url))
        .json(&json!({"email": app.email.to_uppercase(), "password": "wrong-password"}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = c
        .post(format!("{}/auth/login", app.base_url))
        .json(&json!({"email": app.email, "password": app.password}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));

    // cookie session carries over
    let me: Value = c.get(format!("{}/auth/me", app.base_url)).send().await?.json().await?;
    assert_eq!(me["email"], app.email.as_str());
    assert_eq!(c.get(format!("{}/admin/categories", app.base_url)).send().await?.status(), StatusCode::OK);

    let res = c.post(format!("{}/auth/logout", app.base_url)).send().await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    assert_eq!(c.get(format!("{}/admin/categories", app.base_url)).send().await?.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn e2e_catalog_flow() -> anyhow::Result<()> {
    if !db_tests_enabled() { return Ok(()); }
    let app = start_server().await?;
    let c = client();
    let res = c
        .post(format!("{}/auth/login", app.base_url))
        .json(&json!({"email": app.email, "password": app.password}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let tag = Uuid::new_v4().simple().to_string();
    let category_slug = format!("kain-{}", &tag[..8]);
    let res = c
        .post(format!("{}/admin/categories", app.base_url))
        .json(&json!({"name": format!("Kain {}", &tag[..8]), "slug": category_slug}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let category: Value = res.json().await?;

    let product_slug = format!("parang-{}", &tag[..8]);
    let res = c
        .post(format!("{}/admin/products", app.base_url))
        .json(&json!({
            "name": format!("Batik Parang {}", &tag[..8]),
            "slug": product_slug,
            "price": 250000,
            "stock": 3,
            "category_id": category["id"],
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let product: Value = res.json().await?;

    // same slug again
    let res = c
        .post(format!("{}/admin/products", app.base_url))
        .json(&json!({"name": "Duplicate", "slug": product_slug, "price": 1000}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let page: Value = c
        .get(format!("{}/api/products?category={}&in_stock=true", app.base_url, category_slug))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(page["total"], 1);
    assert_eq!(page["items"][0]["slug"], product_slug.as_str());

    let page: Value = c
        .get(format!("{}/api/products?category=no-such-{}", app.base_url, tag))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(page["total"], 0);

    let res = c
        .post(format!("{}/admin/products/{}/stock", app.base_url, product["id"].as_str().unwrap_or_default()))
        .json(&json!({"delta": -5}))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let res = c.get(format!("{}/admin/export/products.xlsx", app.base_url)).send().await?;
    assert_eq!(res.status(), StatusCode::OK);
    let bytes = res.bytes().await?;
    assert!(bytes.starts_with(b"PK"));

    let res = c
        .delete(format!("{}/admin/categories/{}", app.base_url, category["id"].as_str().unwrap_or_default()))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    let res = c
        .delete(format!("{}/admin/products/{}", app.base_url, product["id"].as_str().unwrap_or_default()))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    let res = c.get(format!("{}/api/products/{}", app.base_url, product_slug)).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}
