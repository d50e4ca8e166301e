use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordVerifier},
};

use crate::application::ports::session_store::{SessionData, UNLOCKED_UPLOAD_LINKS_KEY};
use crate::application::ports::upload_link_repository::UploadLinkRepository;
use crate::application::use_cases::upload_links::UploadLinkError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordCheck {
    NotRequired,
    Verified,
}

pub struct VerifyUploadLinkPassword<'a, R: UploadLinkRepository + ?Sized> {
    pub repo: &'a R,
}

pub fn is_unlocked(session: &SessionData, token: &str) -> bool {
    session
        .get(UNLOCKED_UPLOAD_LINKS_KEY)
        .and_then(|v| v.as_array())
        .map(|tokens| tokens.iter().any(|t| t.as_str() == Some(token)))
        .unwrap_or(false)
}

fn mark_unlocked(session: &mut SessionData, token: &str) {
    if is_unlocked(session, token) {
        return;
    }
    let entry = session
        .entry(UNLOCKED_UPLOAD_LINKS_KEY)
        .or_insert_with(|| serde_json::Value::Array(Vec::new()));
    match entry.as_array_mut() {
        Some(tokens) => tokens.push(token.into()),
        None => *entry = serde_json::json!([token]),
    }
}

impl<'a, R: UploadLinkRepository + ?Sized> VerifyUploadLinkPassword<'a, R> {
    pub async fn execute(
        &self,
        token: &str,
        password: &str,
        session: &mut SessionData,
    ) -> Result<PasswordCheck, UploadLinkError> {
        let link = self
            .repo
            .get_by_token(token)
            .await?
            .filter(|l| !l.is_expired())
            .ok_or(UploadLinkError::NotFound)?;
        let Some(hash) = link.password_hash.as_deref() else {
            return Ok(PasswordCheck::NotRequired);
        };
        let parsed = PasswordHash::new(hash).map_err(|e| anyhow::anyhow!(e.to_string()))?;
        if Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_err()
        {
            return Err(UploadLinkError::PermissionDenied);
        }
        mark_unlocked(session, token);
        Ok(PasswordCheck::Verified)
    }
}
