//! Media library and raw bucket helpers.

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use models::media_library;
use service::media_service::{self, MediaUpload, SyncReport};
use service::storage::{Bucket, ObjectInfo, StoredObject};

use crate::errors::JsonApiError;
use crate::extract::{ApiJson, ApiMultipart, ApiPath, ApiQuery};
use crate::routes::auth::ServerState;

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BucketQuery {
    pub bucket: Option<String>,
}

#[derive(Debug, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PrefixQuery {
    pub prefix: Option<String>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct AltTextUpdate {
    pub alt_text: Option<String>,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct TransferRequest {
    pub from: String,
    pub to: String,
}

fn parse_bucket(raw: &str) -> Result<Bucket, JsonApiError> {
    Ok(raw.parse::<Bucket>()?)
}

fn multipart_error(e: axum::extract::multipart::MultipartError) -> JsonApiError {
    let status = e.status();
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        JsonApiError::new(status, "Payload Too Large", Some(e.body_text()))
    } else {
        JsonApiError::bad_request(e.body_text())
    }
}

#[utoipa::path(get, path = "/admin/media", tag = "admin", params(BucketQuery), responses((status = 200, description = "Tracked media, newest first")))]
pub async fn list_media(State(state): State<ServerState>, ApiQuery(q): ApiQuery<BucketQuery>) -> Result<Json<Vec<media_library::Model>>, JsonApiError> {
    let bucket = q.bucket.as_deref().filter(|b| !b.is_empty()).map(parse_bucket).transpose()?;
    Ok(Json(media_service::list_media(&state.db, bucket).await?))
}

pub async fn get_media(State(state): State<ServerState>, ApiPath(id): ApiPath<Uuid>) -> Result<Json<media_library::Model>, JsonApiError> {
    Ok(Json(media_service::get_media(&state.db, id).await?))
}

/// Multipart fields: `bucket`, optional `prefix` and `alt_text`, and `file`.
#[utoipa::path(post, path = "/admin/media", tag = "admin", responses((status = 201, description = "Stored and tracked"), (status = 400, description = "Bad form or file type"), (status = 413, description = "File too large")))]
pub async fn upload_media(State(state): State<ServerState>, ApiMultipart(mut form): ApiMultipart) -> Result<(StatusCode, Json<media_library::Model>), JsonApiError> {
    let mut bucket = None;
    let mut prefix = None;
    let mut alt_text = None;
    let mut file: Option<(String, Option<String>, Vec<u8>)> = None;

    while let Some(field) = form.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "bucket" => bucket = Some(parse_bucket(field.text().await.map_err(multipart_error)?.trim())?),
            "prefix" => prefix = Some(field.text().await.map_err(multipart_error)?),
            "alt_text" => alt_text = Some(field.text().await.map_err(multipart_error)?),
            "file" => {
                let name = field.file_name().unwrap_or("upload.bin").to_string();
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await.map_err(multipart_error)?;
                file = Some((name, content_type, bytes.to_vec()));
            }
            _ => {}
        }
    }

    let bucket = bucket.ok_or_else(|| JsonApiError::bad_request("bucket field required"))?;
    let (original_name, content_type, bytes) = file.ok_or_else(|| JsonApiError::bad_request("file field required"))?;
    // browsers send octet-stream for unknown types; let the extension decide
    let content_type = content_type.filter(|ct| ct != "application/octet-stream");
    let row = media_service::upload_media(
        &state.db,
        state.store.as_ref(),
        MediaUpload { bucket, prefix, original_name, content_type, alt_text, bytes },
    )
    .await?;
    Ok((StatusCode::CREATED, Json(row)))
}

#[utoipa::path(patch, path = "/admin/media/{id}", tag = "admin", params(("id" = Uuid, Path, description = "Media id")), request_body = AltTextUpdate, responses((status = 200, description = "Updated"), (status = 404, description = "Not Found")))]
pub async fn update_alt_text(
    State(state): State<ServerState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(body): ApiJson<AltTextUpdate>,
) -> Result<Json<media_library::Model>, JsonApiError> {
    Ok(Json(media_service::update_media_alt_text(&state.db, id, body.alt_text).await?))
}

#[utoipa::path(delete, path = "/admin/media/{id}", tag = "admin", params(("id" = Uuid, Path, description = "Media id")), responses((status = 204, description = "Deleted"), (status = 404, description = "Not Found")))]
pub async fn delete_media(State(state): State<ServerState>, ApiPath(id): ApiPath<Uuid>) -> Result<StatusCode, JsonApiError> {
    media_service::delete_media(&state.db, state.store.as_ref(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// One bucket with `?bucket=`, otherwise every bucket.
#[utoipa::path(post, path = "/admin/media/sync", tag = "admin", params(BucketQuery), responses((status = 200, description = "Per-bucket sync reports")))]
pub async fn sync_media(State(state): State<ServerState>, ApiQuery(q): ApiQuery<BucketQuery>) -> Result<Json<Vec<SyncReport>>, JsonApiError> {
    let reports = match q.bucket.as_deref().filter(|b| !b.is_empty()) {
        Some(raw) => vec![media_service::sync_bucket(&state.db, state.store.as_ref(), parse_bucket(raw)?).await?],
        None => media_service::sync_all_buckets(&state.db, state.store.as_ref()).await?,
    };
    info!(buckets = reports.len(), inserted = reports.iter().map(|r| r.inserted).sum::<usize>(), "media sync finished");
    Ok(Json(reports))
}

#[utoipa::path(get, path = "/admin/storage/{bucket}", tag = "admin", params(("bucket" = String, Path, description = "Bucket name"), PrefixQuery), responses((status = 200, description = "Objects sorted by path"), (status = 404, description = "Unknown bucket")))]
pub async fn list_objects(
    State(state): State<ServerState>,
    ApiPath(bucket): ApiPath<String>,
    ApiQuery(q): ApiQuery<PrefixQuery>,
) -> Result<Json<Vec<ObjectInfo>>, JsonApiError> {
    let bucket = parse_bucket(&bucket)?;
    Ok(Json(state.store.list(bucket, q.prefix.as_deref()).await?))
}

/// `POST /admin/storage/{bucket}/copy|move` with `{from, to}`.
#[utoipa::path(post, path = "/admin/storage/{bucket}/{op}", tag = "admin", params(("bucket" = String, Path, description = "Bucket name"), ("op" = String, Path, description = "copy | move")), request_body = TransferRequest, responses((status = 200, description = "Destination object"), (status = 404, description = "Source missing"), (status = 409, description = "Destination exists")))]
pub async fn transfer_object(
    State(state): State<ServerState>,
    ApiPath((bucket, op)): ApiPath<(String, String)>,
    ApiJson(req): ApiJson<TransferRequest>,
) -> Result<Json<StoredObject>, JsonApiError> {
    let bucket = parse_bucket(&bucket)?;
    let out = match op.as_str() {
        "copy" => state.store.copy(bucket, &req.from, &req.to).await?,
        "move" => state.store.move_object(bucket, &req.from, &req.to).await?,
        other => return Err(JsonApiError::not_found(format!("unknown storage operation '{other}'"))),
    };
    info!(%bucket, %op, from = %req.from, to = %out.path, "object transferred");
    Ok(Json(out))
}

#[utoipa::path(delete, path = "/admin/storage/{bucket}/{path}", tag = "admin", params(("bucket" = String, Path, description = "Bucket name"), ("path" = String, Path, description = "Object path")), responses((status = 204, description = "Deleted"), (status = 404, description = "Not Found")))]
pub async fn delete_object(State(state): State<ServerState>, ApiPath((bucket, path)): ApiPath<(String, String)>) -> Result<StatusCode, JsonApiError> {
    let bucket = parse_bucket(&bucket)?;
    if !state.store.delete(bucket, &path).await? {
        return Err(JsonApiError::not_found(format!("object not found: {path}")));
    }
    Ok(StatusCode::NO_CONTENT)
}
