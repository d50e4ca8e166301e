use crate::domain::upload_links::UploadLinkShare;

#[derive(Debug, Clone)]
pub struct UploadUrlDto {
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct UploadLinkItemDto {
    pub token: String,
    pub repo_id: String,
    pub path: String,
    pub is_encrypted: bool,
    pub expire_date: Option<chrono::DateTime<chrono::Utc>>,
    pub is_expired: bool,
    pub ctime: chrono::DateTime<chrono::Utc>,
}

impl From<UploadLinkShare> for UploadLinkItemDto {
    fn from(l: UploadLinkShare) -> Self {
        let is_expired = l.is_expired();
        let is_encrypted = l.is_encrypted();
        UploadLinkItemDto {
            token: l.token,
            repo_id: l.repo_id,
            path: l.path,
            is_encrypted,
            expire_date: l.expire_date,
            is_expired,
            ctime: l.ctime,
        }
    }
}
