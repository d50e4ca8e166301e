use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct UploadLinkShare {
    pub id: Uuid,
    pub token: String,
    /// Owner of the link; uploads land in their library.
    pub username: String,
    pub repo_id: String,
    pub path: String,
    /// argon2 PHC string
    pub password_hash: Option<String>,
    pub expire_date: Option<chrono::DateTime<chrono::Utc>>,
    pub ctime: chrono::DateTime<chrono::Utc>,
}

impl UploadLinkShare {
    pub fn is_expired_at(&self, now: chrono::DateTime<chrono::Utc>) -> bool {
        matches!(self.expire_date, Some(exp) if exp < now)
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(chrono::Utc::now())
    }

    pub fn is_encrypted(&self) -> bool {
        self.password_hash.is_some()
    }
}
