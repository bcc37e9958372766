use axum::{
    extract::State,
    http::header,
    response::IntoResponse,
};
use tracing::info;

use service::errors::ServiceError;
use service::{category_service, export, product_service};

use crate::errors::JsonApiError;
use crate::routes::auth::ServerState;

const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

#[utoipa::path(get, path = "/admin/export/products.xlsx", tag = "admin", responses((status = 200, description = "XLSX workbook", content_type = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet")))]
pub async fn export_products(State(state): State<ServerState>) -> Result<impl IntoResponse, JsonApiError> {
    let products = product_service::list_products(&state.db).await?;
    let categories = category_service::list_categories(&state.db).await?;
    let count = products.len();
    let bytes = tokio::task::spawn_blocking(move || export::export_products_xlsx(&products, &categories))
        .await
        .map_err(|e| ServiceError::Export(e.to_string()))??;
    info!(products = count, size = bytes.len(), "products exported");
    let filename = format!("products-{}.xlsx", chrono::Utc::now().format("%Y%m%d"));
    Ok((
        [
            (header::CONTENT_TYPE, XLSX_MIME.to_string()),
            (header::CONTENT_DISPOSITION, format!("attachment; filename=\"{filename}\"")),
        ],
        bytes,
    ))
}
