//! News, testimonials, company profile and site settings.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use common::types::Page;
use models::{company_info, news, setting, testimonial};
use service::company_service::{self, CompanyInput};
use service::news_service::{self, NewsInput, NewsPatch};
use service::pagination::Pagination;
use service::testimonial_service::{self, TestimonialInput, TestimonialPatch};

use crate::errors::JsonApiError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::routes::auth::ServerState;

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct SettingValue {
    pub key: String,
    #[schema(value_type = Object)]
    pub value: Value,
}

impl From<setting::Model> for SettingValue {
    fn from(m: setting::Model) -> Self { Self { key: m.key, value: m.value } }
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct SettingWrite {
    #[schema(value_type = Object)]
    pub value: Value,
}

#[utoipa::path(get, path = "/api/news", tag = "storefront", params(PageQuery), responses((status = 200, description = "Published news, newest first")))]
pub async fn list_published_news(State(state): State<ServerState>, ApiQuery(q): ApiQuery<PageQuery>) -> Result<Json<Page<news::Model>>, JsonApiError> {
    let d = Pagination::default();
    let page = Pagination { page: q.page.unwrap_or(d.page), per_page: q.per_page.unwrap_or(d.per_page) };
    Ok(Json(news_service::list_published_news(&state.db, page).await?))
}

#[utoipa::path(get, path = "/api/news/{slug}", tag = "storefront", params(("slug" = String, Path, description = "News slug")), responses((status = 200, description = "Article"), (status = 404, description = "Not Found or unpublished")))]
pub async fn get_published_news(State(state): State<ServerState>, ApiPath(slug): ApiPath<String>) -> Result<Json<news::Model>, JsonApiError> {
    Ok(Json(news_service::get_news_by_slug(&state.db, &slug, true).await?))
}

#[utoipa::path(get, path = "/api/testimonials", tag = "storefront", responses((status = 200, description = "Active testimonials")))]
pub async fn list_active_testimonials(State(state): State<ServerState>) -> Result<Json<Vec<testimonial::Model>>, JsonApiError> {
    Ok(Json(testimonial_service::list_active_testimonials(&state.db).await?))
}

#[utoipa::path(get, path = "/api/company", tag = "storefront", responses((status = 200, description = "Company profile"), (status = 404, description = "Not configured yet")))]
pub async fn get_company(State(state): State<ServerState>) -> Result<Json<company_info::Model>, JsonApiError> {
    company_service::get_company_info(&state.db)
        .await?
        .map(Json)
        .ok_or_else(|| JsonApiError::not_found("company profile is not set"))
}

#[utoipa::path(get, path = "/api/settings/{key}", tag = "storefront", params(("key" = String, Path, description = "Setting key")), responses((status = 200, description = "Setting", body = SettingValue), (status = 404, description = "Not Found")))]
pub async fn get_setting(State(state): State<ServerState>, ApiPath(key): ApiPath<String>) -> Result<Json<SettingValue>, JsonApiError> {
    Ok(Json(state.settings.get_setting(&key).await?.into()))
}

// ---- admin ----

pub async fn admin_list_news(State(state): State<ServerState>) -> Result<Json<Vec<news::Model>>, JsonApiError> {
    Ok(Json(news_service::list_news(&state.db).await?))
}

#[utoipa::path(post, path = "/admin/news", tag = "admin", responses((status = 201, description = "Created"), (status = 409, description = "Slug taken")))]
pub async fn admin_create_news(State(state): State<ServerState>, ApiJson(input): ApiJson<NewsInput>) -> Result<(StatusCode, Json<news::Model>), JsonApiError> {
    Ok((StatusCode::CREATED, Json(news_service::create_news(&state.db, input).await?)))
}

pub async fn admin_get_news(State(state): State<ServerState>, ApiPath(id): ApiPath<Uuid>) -> Result<Json<news::Model>, JsonApiError> {
    Ok(Json(news_service::get_news(&state.db, id).await?))
}

#[utoipa::path(put, path = "/admin/news/{id}", tag = "admin", params(("id" = Uuid, Path, description = "News id")), responses((status = 200, description = "Updated"), (status = 404, description = "Not Found")))]
pub async fn admin_update_news(State(state): State<ServerState>, ApiPath(id): ApiPath<Uuid>, ApiJson(patch): ApiJson<NewsPatch>) -> Result<Json<news::Model>, JsonApiError> {
    Ok(Json(news_service::update_news(&state.db, id, patch).await?))
}

pub async fn admin_delete_news(State(state): State<ServerState>, ApiPath(id): ApiPath<Uuid>) -> Result<StatusCode, JsonApiError> {
    news_service::delete_news(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn admin_list_testimonials(State(state): State<ServerState>) -> Result<Json<Vec<testimonial::Model>>, JsonApiError> {
    Ok(Json(testimonial_service::list_testimonials(&state.db).await?))
}

pub async fn admin_create_testimonial(State(state): State<ServerState>, ApiJson(input): ApiJson<TestimonialInput>) -> Result<(StatusCode, Json<testimonial::Model>), JsonApiError> {
    Ok((StatusCode::CREATED, Json(testimonial_service::create_testimonial(&state.db, input).await?)))
}

pub async fn admin_get_testimonial(State(state): State<ServerState>, ApiPath(id): ApiPath<Uuid>) -> Result<Json<testimonial::Model>, JsonApiError> {
    Ok(Json(testimonial_service::get_testimonial(&state.db, id).await?))
}

pub async fn admin_update_testimonial(
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(patch): ApiJson<TestimonialPatch>,
) -> Result<Json<testimonial::Model>, JsonApiError> {
    Ok(Json(testimonial_service::update_testimonial(&state.db, id, patch).await?))
}

pub async fn admin_delete_testimonial(State(state): State<ServerState>, ApiPath(id): ApiPath<Uuid>) -> Result<StatusCode, JsonApiError> {
    testimonial_service::delete_testimonial(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// `null` before the profile has been saved once.
pub async fn admin_get_company(State(state): State<ServerState>) -> Result<Json<Option<company_info::Model>>, JsonApiError> {
    Ok(Json(company_service::get_company_info(&state.db).await?))
}

#[utoipa::path(put, path = "/admin/company", tag = "admin", responses((status = 200, description = "Saved"), (status = 400, description = "Validation Error")))]
pub async fn admin_put_company(State(state): State<ServerState>, ApiJson(input): ApiJson<CompanyInput>) -> Result<Json<company_info::Model>, JsonApiError> {
    Ok(Json(company_service::upsert_company_info(&state.db, input).await?))
}

pub async fn admin_list_settings(State(state): State<ServerState>) -> Result<Json<Vec<SettingValue>>, JsonApiError> {
    let items = state.settings.list_settings().await?;
    Ok(Json(items.into_iter().map(SettingValue::from).collect()))
}

#[utoipa::path(put, path = "/admin/settings/{key}", tag = "admin", params(("key" = String, Path, description = "Setting key")), request_body = SettingWrite, responses((status = 200, description = "Saved", body = SettingValue), (status = 400, description = "Invalid key")))]
pub async fn admin_put_setting(
    State(state): State<ServerState>,
    ApiPath(key): ApiPath<String>,
    ApiJson(body): ApiJson<SettingWrite>,
) -> Result<Json<SettingValue>, JsonApiError> {
    Ok(Json(state.settings.set_setting(&key, body.value).await?.into()))
}

pub async fn admin_delete_setting(State(state): State<ServerState>, ApiPath(key): ApiPath<String>) -> Result<StatusCode, JsonApiError> {
    state.settings.delete_setting(&key).await?;
    Ok(StatusCode::NO_CONTENT)
}
