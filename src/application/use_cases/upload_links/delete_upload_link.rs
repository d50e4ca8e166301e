use crate::application::ports::upload_link_repository::UploadLinkRepository;

pub struct DeleteUploadLink<'a, R: UploadLinkRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: UploadLinkRepository + ?Sized> DeleteUploadLink<'a, R> {
    pub async fn execute(&self, username: &str, token: &str) -> anyhow::Result<bool> {
        self.repo.delete_upload_link(username, token).await
    }
}
