use crate::application::dto::upload_links::UploadLinkItemDto;
use crate::application::ports::upload_link_repository::UploadLinkRepository;

pub struct ListUploadLinks<'a, R: UploadLinkRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: UploadLinkRepository + ?Sized> ListUploadLinks<'a, R> {
    pub async fn execute(&self, username: &str) -> anyhow::Result<Vec<UploadLinkItemDto>> {
        let rows = self.repo.list_by_owner(username).await?;
        Ok(rows.into_iter().map(UploadLinkItemDto::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{InMemoryUploadLinks, upload_link};

    #[tokio::test]
    async fn lists_only_the_owners_links_newest_first() {
        let repo = InMemoryUploadLinks::default();
        let mut older = upload_link("a", "r");
        older.ctime = chrono::Utc::now() - chrono::Duration::hours(1);
        repo.insert(older);
        repo.insert(upload_link("b", "r"));
        let mut foreign = upload_link("c", "r");
        foreign.username = "someone@else.com".into();
        repo.insert(foreign);

        let items = ListUploadLinks { repo: &repo }
            .execute("owner@example.com")
            .await
            .unwrap();
        let tokens: Vec<_> = items.iter().map(|i| i.token.as_str()).collect();
        assert_eq!(tokens, ["b", "a"]);
    }
}
