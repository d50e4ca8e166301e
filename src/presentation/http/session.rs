use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, HeaderValue, request::Parts};
use rand::Rng;
use rand::distributions::Alphanumeric;

use crate::application::ports::session_store::{SessionData, SessionStore};
use crate::bootstrap::config::Config;
use crate::presentation::http::auth::get_cookie;

pub const SESSION_COOKIE: &str = "sessionid";
const SESSION_KEY_LEN: usize = 32;

/// Raw value of the `sessionid` cookie, if the client sent one.
pub struct SessionCookie(pub Option<String>);

#[axum::async_trait]
impl<S> FromRequestParts<S> for SessionCookie
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let key = parts
            .headers
            .get(axum::http::header::COOKIE)
            .and_then(|v| v.to_str().ok())
            .and_then(|hdr| get_cookie(hdr, SESSION_COOKIE))
            .filter(|k| !k.is_empty());
        Ok(SessionCookie(key))
    }
}

pub struct Session {
    pub key: String,
    pub data: SessionData,
}

fn new_session_key() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SESSION_KEY_LEN)
        .map(|c| char::from(c).to_ascii_lowercase())
        .collect()
}

pub async fn load_session<S: SessionStore + ?Sized>(
    store: &S,
    cookie: &SessionCookie,
) -> anyhow::Result<Option<SessionData>> {
    match cookie.0.as_deref() {
        Some(key) => store.load(key).await,
        None => Ok(None),
    }
}

/// Loads the caller's session, or starts a fresh one under a new key.
pub async fn load_or_start<S: SessionStore + ?Sized>(
    store: &S,
    cookie: &SessionCookie,
) -> anyhow::Result<Session> {
    if let Some(key) = cookie.0.as_deref() {
        if let Some(data) = store.load(key).await? {
            return Ok(Session {
                key: key.to_string(),
                data,
            });
        }
    }
    Ok(Session {
        key: new_session_key(),
        data: SessionData::new(),
    })
}

fn build_session_cookie(key: &str, max_age_secs: i64, secure: bool) -> String {
    let secure_attr = if secure { "; Secure" } else { "" };
    format!(
        "{}={}; HttpOnly{}; Path=/; Max-Age={}; SameSite=Lax",
        SESSION_COOKIE,
        key,
        secure_attr,
        max_age_secs.max(0)
    )
}

/// Saves the session and returns the `Set-Cookie` header refreshing it.
pub async fn persist<S: SessionStore + ?Sized>(
    store: &S,
    cfg: &Config,
    session: &Session,
) -> anyhow::Result<HeaderMap> {
    let expire_date = chrono::Utc::now() + chrono::Duration::seconds(cfg.session_cookie_age_secs);
    store.save(&session.key, &session.data, expire_date).await?;

    let secure = cfg.site_root.starts_with("https://");
    let cookie = build_session_cookie(&session.key, cfg.session_cookie_age_secs, secure);
    let mut headers = HeaderMap::new();
    headers.insert(axum::http::header::SET_COOKIE, HeaderValue::from_str(&cookie)?);
    Ok(headers)
}
