pub mod create_upload_link;
pub mod delete_upload_link;
pub mod get_upload_url;
pub mod list_upload_links;
pub mod set_anonymous_email;
pub mod verify_password;

#[derive(Debug, thiserror::Error)]
pub enum UploadLinkError {
    #[error("Upload link not found.")]
    NotFound,
    #[error("{0}")]
    BadRequest(String),
    #[error("Permission denied")]
    PermissionDenied,
    #[error("Authentication required")]
    Unauthorized,
    #[error("Internal Server Error")]
    Internal(#[from] anyhow::Error),
}
