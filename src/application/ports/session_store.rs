use async_trait::async_trait;

pub type SessionData = serde_json::Map<String, serde_json::Value>;

pub const ANONYMOUS_EMAIL_KEY: &str = "anonymous_email";
pub const UNLOCKED_UPLOAD_LINKS_KEY: &str = "upload_link_unlocked";

#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Expired sessions load as `None`.
    async fn load(&self, session_key: &str) -> anyhow::Result<Option<SessionData>>;

    async fn save(
        &self,
        session_key: &str,
        data: &SessionData,
        expire_date: chrono::DateTime<chrono::Utc>,
    ) -> anyhow::Result<()>;
}
