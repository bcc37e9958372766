//! Products, categories and attribute lookups: storefront reads and admin CRUD.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use common::types::Page;
use models::{category, product};
use service::attribute_service::{self, Attribute, AttributeInput, AttributeKind, AttributePatch};
use service::catalog::{apply_filter, ProductFilter, ProductSort};
use service::category_service::{self, CategoryInput, CategoryPatch};
use service::company_service;
use service::errors::ServiceError;
use service::pagination::Pagination;
use service::product_service::{self, ProductInput, ProductPatch};

use crate::errors::JsonApiError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::routes::auth::ServerState;

const FEATURED_DEFAULT: u64 = 8;

/// Storefront product query. Attribute filters take slugs.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProductQuery {
    pub category: Option<String>,
    pub color: Option<String>,
    pub cap_pattern: Option<String>,
    pub tiedye_pattern: Option<String>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    pub search: Option<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub in_stock: bool,
    pub sort: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl ProductQuery {
    fn pagination(&self) -> Pagination {
        let d = Pagination::default();
        Pagination { page: self.page.unwrap_or(d.page), per_page: self.per_page.unwrap_or(d.per_page) }
    }
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LimitQuery { pub limit: Option<u64> }

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct WhatsappQuery { pub quantity: Option<u32> }

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct WhatsappLink { pub url: String }

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DeleteProductQuery {
    #[serde(default)]
    pub purge_files: bool,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct StockAdjustment { pub delta: i32 }

/// `None` when the slug matches nothing, which empties the listing.
async fn resolve_attribute(state: &ServerState, kind: AttributeKind, slug: Option<&str>) -> Result<Option<Option<Uuid>>, ServiceError> {
    match slug.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(Some(None)),
        Some(s) => Ok(attribute_service::find_attribute_by_slug(&state.db, kind, s).await?.map(|a| Some(a.id))),
    }
}

async fn build_filter(state: &ServerState, q: &ProductQuery) -> Result<Option<ProductFilter>, JsonApiError> {
    let sort = match q.sort.as_deref() {
        Some(s) => s.parse::<ProductSort>().map_err(JsonApiError::bad_request)?,
        None => ProductSort::default(),
    };
    let category = match q.category.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        None => None,
        Some(slug) => match category_service::get_category_by_slug(&state.db, slug).await {
            Ok(c) => Some(c.id),
            Err(ServiceError::NotFound(_)) => return Ok(None),
            Err(e) => return Err(e.into()),
        },
    };
    let Some(color) = resolve_attribute(state, AttributeKind::Colors, q.color.as_deref()).await? else { return Ok(None) };
    let Some(cap_pattern) = resolve_attribute(state, AttributeKind::CapPatterns, q.cap_pattern.as_deref()).await? else { return Ok(None) };
    let Some(tiedye_pattern) = resolve_attribute(state, AttributeKind::TiedyePatterns, q.tiedye_pattern.as_deref()).await? else { return Ok(None) };
    Ok(Some(ProductFilter {
        category,
        color,
        cap_pattern,
        tiedye_pattern,
        min_price: q.min_price,
        max_price: q.max_price,
        search: q.search.clone(),
        featured_only: q.featured,
        in_stock_only: q.in_stock,
        sort,
    }))
}

#[utoipa::path(get, path = "/api/products", tag = "storefront", params(ProductQuery), responses((status = 200, description = "Filtered page of active products"), (status = 400, description = "Bad query")))]
pub async fn list_products(State(state): State<ServerState>, ApiQuery(q): ApiQuery<ProductQuery>) -> Result<Json<Page<product::Model>>, JsonApiError> {
    let page = q.pagination();
    let Some(filter) = build_filter(&state, &q).await? else {
        return Ok(Json(page.apply(Vec::new())));
    };
    let products = product_service::list_active_products(&state.db).await?;
    let filtered = apply_filter(products, &filter);
    Ok(Json(page.apply(filtered)))
}

#[utoipa::path(get, path = "/api/products/featured", tag = "storefront", params(LimitQuery), responses((status = 200, description = "Featured products")))]
pub async fn featured_products(State(state): State<ServerState>, ApiQuery(q): ApiQuery<LimitQuery>) -> Result<Json<Vec<product::Model>>, JsonApiError> {
    let limit = q.limit.unwrap_or(FEATURED_DEFAULT).min(50);
    Ok(Json(product_service::list_featured_products(&state.db, limit).await?))
}

async fn active_product_by_slug(state: &ServerState, slug: &str) -> Result<product::Model, JsonApiError> {
    let p = product_service::get_product_by_slug(&state.db, slug).await?;
    if !p.is_active {
        return Err(JsonApiError::not_found("product not found"));
    }
    Ok(p)
}

#[utoipa::path(get, path = "/api/products/{slug}", tag = "storefront", params(("slug" = String, Path, description = "Product slug")), responses((status = 200, description = "Product"), (status = 404, description = "Not Found")))]
pub async fn get_product(State(state): State<ServerState>, ApiPath(slug): ApiPath<String>) -> Result<Json<product::Model>, JsonApiError> {
    Ok(Json(active_product_by_slug(&state, &slug).await?))
}

#[utoipa::path(get, path = "/api/products/{slug}/whatsapp", tag = "storefront", params(("slug" = String, Path, description = "Product slug"), WhatsappQuery), responses((status = 200, description = "wa.me order link", body = WhatsappLink), (status = 400, description = "No WhatsApp number configured")))]
pub async fn whatsapp_link(
    State(state): State<ServerState>,
    ApiPath(slug): ApiPath<String>,
    ApiQuery(q): ApiQuery<WhatsappQuery>,
) -> Result<Json<WhatsappLink>, JsonApiError> {
    let product = active_product_by_slug(&state, &slug).await?;
    let company = company_service::get_company_info(&state.db)
        .await?
        .ok_or_else(|| JsonApiError::bad_request("company profile is not set"))?;
    let url = company_service::whatsapp_order_link(&company, &product, q.quantity.unwrap_or(1))?;
    Ok(Json(WhatsappLink { url }))
}

#[utoipa::path(get, path = "/api/categories", tag = "storefront", responses((status = 200, description = "Categories by name")))]
pub async fn list_categories(State(state): State<ServerState>) -> Result<Json<Vec<category::Model>>, JsonApiError> {
    Ok(Json(category_service::list_categories(&state.db).await?))
}

#[utoipa::path(get, path = "/api/categories/{slug}", tag = "storefront", params(("slug" = String, Path, description = "Category slug")), responses((status = 200, description = "Category"), (status = 404, description = "Not Found")))]
pub async fn get_category(State(state): State<ServerState>, ApiPath(slug): ApiPath<String>) -> Result<Json<category::Model>, JsonApiError> {
    Ok(Json(category_service::get_category_by_slug(&state.db, &slug).await?))
}

#[utoipa::path(get, path = "/api/attributes/{kind}", tag = "storefront", params(("kind" = String, Path, description = "colors | cap-patterns | tiedye-patterns")), responses((status = 200, description = "Attribute values"), (status = 404, description = "Unknown kind")))]
pub async fn list_attributes(State(state): State<ServerState>, ApiPath(kind): ApiPath<String>) -> Result<Json<Vec<Attribute>>, JsonApiError> {
    let kind: AttributeKind = kind.parse()?;
    Ok(Json(attribute_service::list_attributes(&state.db, kind).await?))
}

// ---- admin ----

#[utoipa::path(get, path = "/admin/products", tag = "admin", responses((status = 200, description = "All products, newest first")))]
pub async fn admin_list_products(State(state): State<ServerState>) -> Result<Json<Vec<product::Model>>, JsonApiError> {
    Ok(Json(product_service::list_products(&state.db).await?))
}

#[utoipa::path(post, path = "/admin/products", tag = "admin", responses((status = 201, description = "Created"), (status = 400, description = "Validation Error"), (status = 409, description = "Slug taken")))]
pub async fn admin_create_product(State(state): State<ServerState>, ApiJson(input): ApiJson<ProductInput>) -> Result<(StatusCode, Json<product::Model>), JsonApiError> {
    let created = product_service::create_product(&state.db, input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn admin_get_product(State(state): State<ServerState>, ApiPath(id): ApiPath<Uuid>) -> Result<Json<product::Model>, JsonApiError> {
    Ok(Json(product_service::get_product(&state.db, id).await?))
}

#[utoipa::path(put, path = "/admin/products/{id}", tag = "admin", params(("id" = Uuid, Path, description = "Product id")), responses((status = 200, description = "Updated"), (status = 404, description = "Not Found")))]
pub async fn admin_update_product(
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(patch): ApiJson<ProductPatch>,
) -> Result<Json<product::Model>, JsonApiError> {
    Ok(Json(product_service::update_product(&state.db, id, patch).await?))
}

#[utoipa::path(delete, path = "/admin/products/{id}", tag = "admin", params(("id" = Uuid, Path, description = "Product id"), DeleteProductQuery), responses((status = 204, description = "Deleted"), (status = 404, description = "Not Found")))]
pub async fn admin_delete_product(
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiQuery(q): ApiQuery<DeleteProductQuery>,
) -> Result<StatusCode, JsonApiError> {
    product_service::delete_product(&state.db, state.store.as_ref(), id, q.purge_files).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(post, path = "/admin/products/{id}/stock", tag = "admin", params(("id" = Uuid, Path, description = "Product id")), request_body = StockAdjustment, responses((status = 200, description = "New stock level"), (status = 400, description = "Would go below zero")))]
pub async fn admin_adjust_stock(
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(adj): ApiJson<StockAdjustment>,
) -> Result<Json<product::Model>, JsonApiError> {
    let updated = product_service::adjust_stock(&state.db, id, adj.delta).await?;
    info!(product_id = %id, delta = adj.delta, stock = updated.stock, "stock adjusted");
    Ok(Json(updated))
}

pub async fn admin_list_categories(State(state): State<ServerState>) -> Result<Json<Vec<category::Model>>, JsonApiError> {
    Ok(Json(category_service::list_categories(&state.db).await?))
}

#[utoipa::path(post, path = "/admin/categories", tag = "admin", responses((status = 201, description = "Created"), (status = 409, description = "Slug taken")))]
pub async fn admin_create_category(State(state): State<ServerState>, ApiJson(input): ApiJson<CategoryInput>) -> Result<(StatusCode, Json<category::Model>), JsonApiError> {
    Ok((StatusCode::CREATED, Json(category_service::create_category(&state.db, input).await?)))
}

pub async fn admin_get_category(State(state): State<ServerState>, ApiPath(id): ApiPath<Uuid>) -> Result<Json<category::Model>, JsonApiError> {
    Ok(Json(category_service::get_category(&state.db, id).await?))
}

pub async fn admin_update_category(
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(patch): ApiJson<CategoryPatch>,
) -> Result<Json<category::Model>, JsonApiError> {
    Ok(Json(category_service::update_category(&state.db, id, patch).await?))
}

#[utoipa::path(delete, path = "/admin/categories/{id}", tag = "admin", params(("id" = Uuid, Path, description = "Category id")), responses((status = 204, description = "Deleted; products keep existing uncategorized")))]
pub async fn admin_delete_category(State(state): State<ServerState>, ApiPath(id): ApiPath<Uuid>) -> Result<StatusCode, JsonApiError> {
    category_service::delete_category(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn admin_list_attributes(State(state): State<ServerState>, ApiPath(kind): ApiPath<String>) -> Result<Json<Vec<Attribute>>, JsonApiError> {
    let kind: AttributeKind = kind.parse()?;
    Ok(Json(attribute_service::list_attributes(&state.db, kind).await?))
}

#[utoipa::path(post, path = "/admin/attributes/{kind}", tag = "admin", params(("kind" = String, Path, description = "colors | cap-patterns | tiedye-patterns")), responses((status = 201, description = "Created"), (status = 400, description = "Validation Error")))]
pub async fn admin_create_attribute(
    State(state): State<ServerState>,
    ApiPath(kind): ApiPath<String>,
    ApiJson(input): ApiJson<AttributeInput>,
) -> Result<(StatusCode, Json<Attribute>), JsonApiError> {
    let kind: AttributeKind = kind.parse()?;
    Ok((StatusCode::CREATED, Json(attribute_service::create_attribute(&state.db, kind, input).await?)))
}

pub async fn admin_get_attribute(State(state): State<ServerState>, ApiPath((kind, id)): ApiPath<(String, Uuid)>) -> Result<Json<Attribute>, JsonApiError> {
    let kind: AttributeKind = kind.parse()?;
    Ok(Json(attribute_service::get_attribute(&state.db, kind, id).await?))
}

pub async fn admin_update_attribute(
    State(state): State<ServerState>,
    ApiPath((kind, id)): ApiPath<(String, Uuid)>,
    ApiJson(patch): ApiJson<AttributePatch>,
) -> Result<Json<Attribute>, JsonApiError> {
    let kind: AttributeKind = kind.parse()?;
    Ok(Json(attribute_service::update_attribute(&state.db, kind, id, patch).await?))
}

pub async fn admin_delete_attribute(State(state): State<ServerState>, ApiPath((kind, id)): ApiPath<(String, Uuid)>) -> Result<StatusCode, JsonApiError> {
    let kind: AttributeKind = kind.parse()?;
    attribute_service::delete_attribute(&state.db, kind, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
