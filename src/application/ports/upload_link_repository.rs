use async_trait::async_trait;

use crate::domain::upload_links::UploadLinkShare;

#[derive(Debug, Clone)]
pub struct NewUploadLink {
    pub token: String,
    pub username: String,
    pub repo_id: String,
    pub path: String,
    pub password_hash: Option<String>,
    pub expire_date: Option<chrono::DateTime<chrono::Utc>>,
}

#[async_trait]
pub trait UploadLinkRepository: Send + Sync {
    async fn create_upload_link(&self, link: &NewUploadLink) -> anyhow::Result<UploadLinkShare>;

    /// Returns the link regardless of expiry; callers decide how to treat expired links.
    async fn get_by_token(&self, token: &str) -> anyhow::Result<Option<UploadLinkShare>>;

    async fn list_by_owner(&self, username: &str) -> anyhow::Result<Vec<UploadLinkShare>>;

    async fn delete_upload_link(&self, username: &str, token: &str) -> anyhow::Result<bool>;
}
