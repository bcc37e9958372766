use std::path::PathBuf;
use std::sync::Arc;

use axum::{extract::{Request, State}, http::{header, StatusCode}, middleware::Next, response::Response, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use sea_orm::DatabaseConnection;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use service::auth::domain::{AuthUser, Claims, LoginInput};
use service::auth::errors::AuthError;
use service::auth::repo::SeaOrmAuthRepository;
use service::auth::token::AUTH_COOKIE;
use service::auth::AuthService;
use service::settings_service::SettingsStore;
use service::storage::BlobStore;

use crate::errors::JsonApiError;
use crate::extract::ApiJson;

/// Shared handler state. Cheap to clone.
#[derive(Clone)]
pub struct ServerState {
    pub db: DatabaseConnection,
    pub store: Arc<dyn BlobStore>,
    pub storage_root: PathBuf,
    pub max_upload_bytes: usize,
    pub settings: SettingsStore,
    pub auth: Arc<AuthService<SeaOrmAuthRepository>>,
}

#[derive(Serialize, utoipa::ToSchema)]
pub struct MeOutput { pub user_id: Uuid, pub email: String, pub name: String }

#[derive(Serialize, utoipa::ToSchema)]
pub struct LoginOutput { pub user_id: Uuid, pub email: String, pub name: String, pub token: String, pub expires_at: i64 }

impl From<AuthUser> for MeOutput {
    fn from(u: AuthUser) -> Self { Self { user_id: u.id, email: u.email, name: u.name } }
}

fn session_cookie(token: String) -> Cookie<'static> {
    let mut cookie = Cookie::new(AUTH_COOKIE, token);
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_secure(false);
    cookie.set_same_site(SameSite::Lax);
    cookie
}

/// Token from `Authorization: Bearer`, falling back to the `auth_token` cookie.
fn extract_token(headers: &axum::http::HeaderMap, jar: &CookieJar) -> Result<String, AuthError> {
    if let Some(h) = headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        return match h.strip_prefix("Bearer ") {
            Some(t) if !t.trim().is_empty() => Ok(t.trim().to_string()),
            _ => Err(AuthError::TokenError("expected Bearer token".into())),
        };
    }
    jar.get(AUTH_COOKIE)
        .map(|c| c.value().to_string())
        .filter(|t| !t.is_empty())
        .ok_or(AuthError::MissingToken)
}

#[utoipa::path(post, path = "/auth/login", tag = "auth", request_body = crate::openapi::LoginRequest, responses((status = 200, description = "Logged In", body = LoginOutput), (status = 401, description = "Unauthorized")))]
pub async fn login(State(state): State<ServerState>, jar: CookieJar, ApiJson(input): ApiJson<LoginInput>) -> Result<(CookieJar, Json<LoginOutput>), JsonApiError> {
    let session = state.auth.login(input).await?;
    let user = session.user;
    let jar = jar.add(session_cookie(session.token.clone()));
    let out = LoginOutput { user_id: user.id, email: user.email, name: user.name, token: session.token, expires_at: session.expires_at };
    Ok((jar, Json(out)))
}

#[utoipa::path(post, path = "/auth/logout", tag = "auth", responses((status = 204, description = "Logged Out")))]
pub async fn logout(jar: CookieJar) -> (CookieJar, StatusCode) {
    let jar = jar.remove(Cookie::build(AUTH_COOKIE).path("/"));
    (jar, StatusCode::NO_CONTENT)
}

#[utoipa::path(get, path = "/auth/me", tag = "auth", responses((status = 200, description = "Current admin", body = MeOutput), (status = 401, description = "Unauthorized")))]
pub async fn me(State(state): State<ServerState>, jar: CookieJar, headers: axum::http::HeaderMap) -> Result<Json<MeOutput>, JsonApiError> {
    let token = extract_token(&headers, &jar)?;
    let user = state.auth.current_user(&token).await?;
    Ok(Json(user.into()))
}

/// Guard for `/admin/*`: a missing or invalid token is a 401. Valid claims
/// are attached to the request for handlers that want them.
pub async fn require_admin(
    State(state): State<ServerState>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Result<Response, JsonApiError> {
    let path = req.uri().path().to_string();
    let token = extract_token(req.headers(), &jar).map_err(|e| {
        warn!(%path, "admin request without token");
        JsonApiError::from(e)
    })?;
    let claims: Claims = state.auth.verify(&token).map_err(|e| {
        warn!(%path, error = %e, "token validation failed");
        JsonApiError::from(e)
    })?;
    info!(%path, user_id = %claims.uid, "admin request");
    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}
