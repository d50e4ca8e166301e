use argon2::{
    Argon2,
    password_hash::{PasswordHasher, SaltString},
};
use password_hash::rand_core::OsRng;
use uuid::Uuid;

use crate::application::ports::upload_link_repository::{NewUploadLink, UploadLinkRepository};
use crate::application::use_cases::upload_links::UploadLinkError;
use crate::domain::upload_links::UploadLinkShare;

const TOKEN_LENGTH: usize = 20;

pub struct CreateUploadLink<'a, R: UploadLinkRepository + ?Sized> {
    pub repo: &'a R,
    pub password_min_length: usize,
    pub expire_days_max: i64,
}

#[derive(Debug, Clone)]
pub struct CreateUploadLinkRequest {
    pub repo_id: String,
    pub path: String,
    pub password: Option<String>,
    pub expire_days: Option<i64>,
}

/// Directory paths are stored with a trailing slash, `/` for the library root.
pub fn normalize_dir_path(path: &str) -> String {
    let trimmed = path.trim().trim_end_matches('/');
    format!("{}/", trimmed)
}

impl<'a, R: UploadLinkRepository + ?Sized> CreateUploadLink<'a, R> {
    pub async fn execute(
        &self,
        username: &str,
        req: &CreateUploadLinkRequest,
    ) -> Result<UploadLinkShare, UploadLinkError> {
        let repo_id = req.repo_id.trim();
        if repo_id.is_empty() {
            return Err(UploadLinkError::BadRequest("repo_id invalid.".into()));
        }
        if !req.path.starts_with('/') {
            return Err(UploadLinkError::BadRequest("path invalid.".into()));
        }

        let password_hash = match req.password.as_deref() {
            None => None,
            Some(p) if p.chars().count() < self.password_min_length => {
                return Err(UploadLinkError::BadRequest(format!(
                    "Password is too short, at least {} characters.",
                    self.password_min_length
                )));
            }
            Some(p) => {
                let salt = SaltString::generate(&mut OsRng);
                let hash = Argon2::default()
                    .hash_password(p.as_bytes(), &salt)
                    .map_err(|e| anyhow::anyhow!(e.to_string()))?
                    .to_string();
                Some(hash)
            }
        };

        let expire_date = match req.expire_days {
            None => None,
            Some(d) if d < 1 || d > self.expire_days_max => {
                return Err(UploadLinkError::BadRequest(format!(
                    "expire_days should be between 1 and {}.",
                    self.expire_days_max
                )));
            }
            Some(d) => Some(chrono::Utc::now() + chrono::Duration::days(d)),
        };

        let mut token = Uuid::new_v4().simple().to_string();
        token.truncate(TOKEN_LENGTH);

        let link = NewUploadLink {
            token,
            username: username.to_string(),
            repo_id: repo_id.to_string(),
            path: normalize_dir_path(&req.path),
            password_hash,
            expire_date,
        };
        let created = self
            .repo
            .create_upload_link(&link)
            .await
            .map_err(|err| err.context(format!("create_upload_link failed for repo {repo_id}")))?;
        tracing::info!(token = %created.token, repo_id = %created.repo_id, "upload_link_created");
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::InMemoryUploadLinks;

    fn uc(repo: &InMemoryUploadLinks) -> CreateUploadLink<'_, InMemoryUploadLinks> {
        CreateUploadLink {
            repo,
            password_min_length: 8,
            expire_days_max: 30,
        }
    }

    fn req(path: &str) -> CreateUploadLinkRequest {
        CreateUploadLinkRequest {
            repo_id: "repo-1".into(),
            path: path.into(),
            password: None,
            expire_days: None,
        }
    }

    #[tokio::test]
    async fn creates_link_with_short_hex_token() {
        let repo = InMemoryUploadLinks::default();
        let link = uc(&repo).execute("owner@example.com", &req("/folder")).await.unwrap();
        assert_eq!(link.token.len(), 20);
        assert!(link.token.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(link.path, "/folder/");
        assert_eq!(link.username, "owner@example.com");
        assert!(link.password_hash.is_none());
        assert!(link.expire_date.is_none());
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn rejects_relative_path() {
        let repo = InMemoryUploadLinks::default();
        let err = uc(&repo).execute("u", &req("folder")).await.unwrap_err();
        assert!(matches!(err, UploadLinkError::BadRequest(_)));
    }

    #[tokio::test]
    async fn hashes_password_and_enforces_min_length() {
        let repo = InMemoryUploadLinks::default();
        let mut r = req("/");
        r.password = Some("short".into());
        let err = uc(&repo).execute("u", &r).await.unwrap_err();
        assert!(matches!(err, UploadLinkError::BadRequest(_)));

        r.password = Some("long-enough".into());
        let link = uc(&repo).execute("u", &r).await.unwrap();
        let hash = link.password_hash.unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(!hash.contains("long-enough"));
    }

    #[tokio::test]
    async fn expire_days_must_be_in_range() {
        let repo = InMemoryUploadLinks::default();
        let mut r = req("/");
        for bad in [0, -1, 31] {
            r.expire_days = Some(bad);
            assert!(uc(&repo).execute("u", &r).await.is_err(), "{bad}");
        }
        r.expire_days = Some(7);
        let link = uc(&repo).execute("u", &r).await.unwrap();
        let exp = link.expire_date.unwrap();
        assert!(exp > chrono::Utc::now() + chrono::Duration::days(6));
    }

    #[test]
    fn normalizes_directory_paths() {
        assert_eq!(normalize_dir_path("/"), "/");
        assert_eq!(normalize_dir_path("/a/b"), "/a/b/");
        assert_eq!(normalize_dir_path("/a/b//"), "/a/b/");
    }
}
