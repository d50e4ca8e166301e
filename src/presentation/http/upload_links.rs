use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{delete, get, post},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::application::dto::upload_links::UploadLinkItemDto;
use crate::application::identity::UploaderIdentity;
use crate::application::use_cases::upload_links::UploadLinkError;
use crate::application::use_cases::upload_links::create_upload_link::{
    CreateUploadLink, CreateUploadLinkRequest,
};
use crate::application::use_cases::upload_links::delete_upload_link::DeleteUploadLink;
use crate::application::use_cases::upload_links::get_upload_url::{GetUploadUrl, UploadUrlRequest};
use crate::application::use_cases::upload_links::list_upload_links::ListUploadLinks;
use crate::application::use_cases::upload_links::set_anonymous_email::{
    SetAnonymousEmail, session_email,
};
use crate::application::use_cases::upload_links::verify_password::{
    PasswordCheck, VerifyUploadLinkPassword, is_unlocked,
};
use crate::bootstrap::app_context::AppContext;
use crate::bootstrap::config::Config;
use crate::presentation::http::auth::{self, Bearer};
use crate::presentation::http::extractors::AjaxRequest;
use crate::presentation::http::session::{self, SessionCookie};

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/ajax/u/d/:token/upload/", get(get_file_upload_url_ul))
        .route(
            "/api/upload-links",
            post(create_upload_link).get(list_upload_links),
        )
        .route("/api/upload-links/:token", delete(delete_upload_link))
        .route(
            "/api/upload-links/:token/password",
            post(check_upload_link_password),
        )
        .route(
            "/api/upload-links/:token/anonymous-email",
            post(set_anonymous_email),
        )
        .with_state(ctx)
}

fn upload_link_url(cfg: &Config, token: &str) -> String {
    format!("{}/u/d/{}/", cfg.site_root.trim_end_matches('/'), token)
}

fn require_user(cfg: &Config, bearer: Result<Bearer, StatusCode>) -> Result<String, UploadLinkError> {
    let bearer = bearer.map_err(|_| UploadLinkError::Unauthorized)?;
    auth::validate_bearer(cfg, bearer).map_err(|_| UploadLinkError::Unauthorized)
}

#[derive(Debug, Deserialize)]
pub struct UploadUrlQuery {
    pub r: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UploadUrlResponse {
    pub url: String,
}

#[utoipa::path(
    get,
    path = "/ajax/u/d/{token}/upload/",
    tag = "Upload Links",
    params(
        ("token" = String, Path, description = "Upload link token"),
        ("r" = String, Query, description = "Repository id the link points into"),
        ("X-Requested-With" = String, Header, description = "Must be XMLHttpRequest"),
    ),
    responses(
        (status = 200, description = "Upload URL issued", body = UploadUrlResponse),
        (status = 400, body = crate::presentation::http::error::ErrorResponse),
        (status = 403, body = crate::presentation::http::error::ErrorResponse),
        (status = 404, body = crate::presentation::http::error::ErrorResponse),
        (status = 500, body = crate::presentation::http::error::ErrorResponse),
    )
)]
pub async fn get_file_upload_url_ul(
    State(ctx): State<AppContext>,
    _ajax: AjaxRequest,
    bearer: Option<Bearer>,
    cookie: SessionCookie,
    Path(token): Path<String>,
    Query(q): Query<UploadUrlQuery>,
) -> Result<Json<UploadUrlResponse>, UploadLinkError> {
    let username = auth::optional_username(&ctx.cfg, bearer);
    let sessions = ctx.session_store();
    let session = session::load_session(sessions.as_ref(), &cookie)
        .await?
        .unwrap_or_default();
    let identity = UploaderIdentity::resolve(username, session_email(&session));

    let repo = ctx.upload_link_repo();
    let issuer = ctx.token_issuer();
    let license = ctx.license();
    let uc = GetUploadUrl {
        repo: repo.as_ref(),
        issuer: issuer.as_ref(),
        license: license.as_ref(),
        virus_check_enabled: ctx.cfg.enable_upload_link_virus_check,
        file_server_root: &ctx.cfg.file_server_root,
    };
    let res = uc
        .execute(UploadUrlRequest {
            token: &token,
            repo_id: q.r.as_deref(),
            identity: &identity,
            unlocked: is_unlocked(&session, &token),
        })
        .await?;
    Ok(Json(UploadUrlResponse { url: res.url }))
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateUploadLinkBody {
    pub repo_id: String,
    pub path: String,
    pub password: Option<String>,
    pub expire_days: Option<i64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UploadLinkItem {
    pub token: String,
    pub link: String,
    pub repo_id: String,
    pub path: String,
    pub is_encrypted: bool,
    pub expire_date: Option<chrono::DateTime<chrono::Utc>>,
    pub is_expired: bool,
    pub ctime: chrono::DateTime<chrono::Utc>,
}

impl UploadLinkItem {
    fn from_dto(cfg: &Config, d: UploadLinkItemDto) -> Self {
        UploadLinkItem {
            link: upload_link_url(cfg, &d.token),
            token: d.token,
            repo_id: d.repo_id,
            path: d.path,
            is_encrypted: d.is_encrypted,
            expire_date: d.expire_date,
            is_expired: d.is_expired,
            ctime: d.ctime,
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/upload-links",
    tag = "Upload Links",
    request_body = CreateUploadLinkBody,
    responses(
        (status = 200, description = "Upload link created", body = UploadLinkItem),
        (status = 400, body = crate::presentation::http::error::ErrorResponse),
        (status = 401, body = crate::presentation::http::error::ErrorResponse),
    )
)]
pub async fn create_upload_link(
    State(ctx): State<AppContext>,
    bearer: Result<Bearer, StatusCode>,
    Json(body): Json<CreateUploadLinkBody>,
) -> Result<Json<UploadLinkItem>, UploadLinkError> {
    let username = require_user(&ctx.cfg, bearer)?;
    let repo = ctx.upload_link_repo();
    let uc = CreateUploadLink {
        repo: repo.as_ref(),
        password_min_length: ctx.cfg.share_link_password_min_length,
        expire_days_max: ctx.cfg.share_link_expire_days_max,
    };
    let req = CreateUploadLinkRequest {
        repo_id: body.repo_id,
        path: body.path,
        password: body.password.filter(|p| !p.is_empty()),
        expire_days: body.expire_days,
    };
    let link = uc.execute(&username, &req).await?;
    Ok(Json(UploadLinkItem::from_dto(&ctx.cfg, link.into())))
}

#[utoipa::path(
    get,
    path = "/api/upload-links",
    tag = "Upload Links",
    responses(
        (status = 200, body = [UploadLinkItem]),
        (status = 401, body = crate::presentation::http::error::ErrorResponse),
    )
)]
pub async fn list_upload_links(
    State(ctx): State<AppContext>,
    bearer: Result<Bearer, StatusCode>,
) -> Result<Json<Vec<UploadLinkItem>>, UploadLinkError> {
    let username = require_user(&ctx.cfg, bearer)?;
    let repo = ctx.upload_link_repo();
    let uc = ListUploadLinks {
        repo: repo.as_ref(),
    };
    let items = uc
        .execute(&username)
        .await?
        .into_iter()
        .map(|d| UploadLinkItem::from_dto(&ctx.cfg, d))
        .collect();
    Ok(Json(items))
}

#[utoipa::path(
    delete,
    path = "/api/upload-links/{token}",
    tag = "Upload Links",
    params(("token" = String, Path, description = "Upload link token")),
    responses(
        (status = 204, description = "Upload link deleted"),
        (status = 404, body = crate::presentation::http::error::ErrorResponse),
    )
)]
pub async fn delete_upload_link(
    State(ctx): State<AppContext>,
    bearer: Result<Bearer, StatusCode>,
    Path(token): Path<String>,
) -> Result<StatusCode, UploadLinkError> {
    let username = require_user(&ctx.cfg, bearer)?;
    let repo = ctx.upload_link_repo();
    let uc = DeleteUploadLink {
        repo: repo.as_ref(),
    };
    if uc.execute(&username, &token).await? {
        tracing::info!(token = %token, "upload_link_deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(UploadLinkError::NotFound)
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PasswordBody {
    pub password: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AnonymousEmailBody {
    pub email: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SuccessResponse {
    pub success: bool,
}

#[utoipa::path(
    post,
    path = "/api/upload-links/{token}/password",
    tag = "Upload Links",
    params(("token" = String, Path, description = "Upload link token")),
    request_body = PasswordBody,
    responses(
        (status = 200, description = "Link unlocked for this session", body = SuccessResponse),
        (status = 403, body = crate::presentation::http::error::ErrorResponse),
        (status = 404, body = crate::presentation::http::error::ErrorResponse),
    )
)]
pub async fn check_upload_link_password(
    State(ctx): State<AppContext>,
    cookie: SessionCookie,
    Path(token): Path<String>,
    Json(body): Json<PasswordBody>,
) -> Result<(HeaderMap, Json<SuccessResponse>), UploadLinkError> {
    let sessions = ctx.session_store();
    let mut session = session::load_or_start(sessions.as_ref(), &cookie).await?;
    let repo = ctx.upload_link_repo();
    let uc = VerifyUploadLinkPassword {
        repo: repo.as_ref(),
    };
    let headers = match uc.execute(&token, &body.password, &mut session.data).await? {
        PasswordCheck::NotRequired => HeaderMap::new(),
        PasswordCheck::Verified => session::persist(sessions.as_ref(), &ctx.cfg, &session).await?,
    };
    Ok((headers, Json(SuccessResponse { success: true })))
}

#[utoipa::path(
    post,
    path = "/api/upload-links/{token}/anonymous-email",
    tag = "Upload Links",
    params(("token" = String, Path, description = "Upload link token")),
    request_body = AnonymousEmailBody,
    responses(
        (status = 200, description = "Email recorded in session", body = SuccessResponse),
        (status = 400, body = crate::presentation::http::error::ErrorResponse),
        (status = 404, body = crate::presentation::http::error::ErrorResponse),
    )
)]
pub async fn set_anonymous_email(
    State(ctx): State<AppContext>,
    cookie: SessionCookie,
    Path(token): Path<String>,
    Json(body): Json<AnonymousEmailBody>,
) -> Result<(HeaderMap, Json<SuccessResponse>), UploadLinkError> {
    let sessions = ctx.session_store();
    let mut session = session::load_or_start(sessions.as_ref(), &cookie).await?;
    let repo = ctx.upload_link_repo();
    let uc = SetAnonymousEmail {
        repo: repo.as_ref(),
    };
    uc.execute(&token, &body.email, &mut session.data).await?;
    let headers = session::persist(sessions.as_ref(), &ctx.cfg, &session).await?;
    Ok((headers, Json(SuccessResponse { success: true })))
}
