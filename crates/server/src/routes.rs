pub mod auth;
pub mod catalog;
pub mod content;
pub mod export;
pub mod media;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    response::IntoResponse,
    routing::{get, post, put},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    services::ServeDir,
    trace::{TraceLayer, DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, DefaultOnFailure},
};
use tracing::Level;
use utoipa::OpenApi;

use common::{metrics::encode_metrics, types::Health};

use crate::openapi::ApiDoc;
pub use auth::ServerState;

/// Room for multipart framing around the largest allowed file.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

pub async fn metrics() -> impl IntoResponse {
    encode_metrics()
}

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

fn admin_routes(state: &ServerState) -> Router<ServerState> {
    let upload_limit = DefaultBodyLimit::max(state.max_upload_bytes + MULTIPART_OVERHEAD);
    Router::new()
        .route("/admin/products", get(catalog::admin_list_products).post(catalog::admin_create_product))
        .route(
            "/admin/products/:id",
            get(catalog::admin_get_product).put(catalog::admin_update_product).delete(catalog::admin_delete_product),
        )
        .route("/admin/products/:id/stock", post(catalog::admin_adjust_stock))
        .route("/admin/categories", get(catalog::admin_list_categories).post(catalog::admin_create_category))
        .route(
            "/admin/categories/:id",
            get(catalog::admin_get_category).put(catalog::admin_update_category).delete(catalog::admin_delete_category),
        )
        .route("/admin/attributes/:kind", get(catalog::admin_list_attributes).post(catalog::admin_create_attribute))
        .route(
            "/admin/attributes/:kind/:id",
            get(catalog::admin_get_attribute).put(catalog::admin_update_attribute).delete(catalog::admin_delete_attribute),
        )
        .route("/admin/news", get(content::admin_list_news).post(content::admin_create_news))
        .route(
            "/admin/news/:id",
            get(content::admin_get_news).put(content::admin_update_news).delete(content::admin_delete_news),
        )
        .route("/admin/testimonials", get(content::admin_list_testimonials).post(content::admin_create_testimonial))
        .route(
            "/admin/testimonials/:id",
            get(content::admin_get_testimonial).put(content::admin_update_testimonial).delete(content::admin_delete_testimonial),
        )
        .route("/admin/company", get(content::admin_get_company).put(content::admin_put_company))
        .route("/admin/settings", get(content::admin_list_settings))
        .route("/admin/settings/:key", put(content::admin_put_setting).delete(content::admin_delete_setting))
        .route("/admin/media", get(media::list_media).post(media::upload_media).layer(upload_limit))
        .route("/admin/media/sync", post(media::sync_media))
        .route(
            "/admin/media/:id",
            get(media::get_media).patch(media::update_alt_text).delete(media::delete_media),
        )
        .route("/admin/storage/:bucket", get(media::list_objects))
        // `copy` and `move` share the wildcard with object deletes
        .route("/admin/storage/:bucket/*path", post(media::transfer_object).delete(media::delete_object))
        .route("/admin/export/products.xlsx", get(export::export_products))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::require_admin))
}

/// Build the full application router: storefront, auth, admin and static blobs.
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    let blobs = ServeDir::new(&state.storage_root);

    let public = Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .route("/api-docs/openapi.json", get(openapi_json))
        .route("/api/products", get(catalog::list_products))
        .route("/api/products/featured", get(catalog::featured_products))
        .route("/api/products/:slug", get(catalog::get_product))
        .route("/api/products/:slug/whatsapp", get(catalog::whatsapp_link))
        .route("/api/categories", get(catalog::list_categories))
        .route("/api/categories/:slug", get(catalog::get_category))
        .route("/api/attributes/:kind", get(catalog::list_attributes))
        .route("/api/news", get(content::list_published_news))
        .route("/api/news/:slug", get(content::get_published_news))
        .route("/api/testimonials", get(content::list_active_testimonials))
        .route("/api/company", get(content::get_company))
        .route("/api/settings/:key", get(content::get_setting))
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/me", get(auth::me))
        .nest_service("/storage", blobs);

    public
        .merge(admin_routes(&state))
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                // one INFO span per request with method and path
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(
                    DefaultOnRequest::new()
                        .level(Level::INFO),
                )
                // status code and latency
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_failure(
                    DefaultOnFailure::new()
                        .level(Level::ERROR),
                )
        )
}
