use once_cell::sync::Lazy;
use regex::Regex;

use crate::application::ports::session_store::{ANONYMOUS_EMAIL_KEY, SessionData};
use crate::application::ports::upload_link_repository::UploadLinkRepository;
use crate::application::use_cases::upload_links::UploadLinkError;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)+$").expect("valid email regex")
});

pub struct SetAnonymousEmail<'a, R: UploadLinkRepository + ?Sized> {
    pub repo: &'a R,
}

pub fn session_email(session: &SessionData) -> Option<String> {
    session
        .get(ANONYMOUS_EMAIL_KEY)
        .and_then(|v| v.as_str())
        .map(str::to_string)
}

impl<'a, R: UploadLinkRepository + ?Sized> SetAnonymousEmail<'a, R> {
    pub async fn execute(
        &self,
        token: &str,
        email: &str,
        session: &mut SessionData,
    ) -> Result<String, UploadLinkError> {
        self.repo
            .get_by_token(token)
            .await?
            .filter(|l| !l.is_expired())
            .ok_or(UploadLinkError::NotFound)?;
        let email = email.trim();
        if !EMAIL_RE.is_match(email) {
            return Err(UploadLinkError::BadRequest("email invalid.".into()));
        }
        session.insert(ANONYMOUS_EMAIL_KEY.to_string(), email.into());
        Ok(email.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{InMemoryUploadLinks, upload_link};

    #[tokio::test]
    async fn stores_trimmed_email_in_session() {
        let repo = InMemoryUploadLinks::default();
        repo.insert(upload_link("tok", "r"));
        let mut session = SessionData::new();
        let email = SetAnonymousEmail { repo: &repo }
            .execute("tok", "  anonymous@email.com ", &mut session)
            .await
            .unwrap();
        assert_eq!(email, "anonymous@email.com");
        assert_eq!(session_email(&session).as_deref(), Some("anonymous@email.com"));
    }

    #[tokio::test]
    async fn rejects_malformed_email() {
        let repo = InMemoryUploadLinks::default();
        repo.insert(upload_link("tok", "r"));
        let mut session = SessionData::new();
        for bad in ["", "no-at-sign", "a@b", "a b@c.com"] {
            let err = SetAnonymousEmail { repo: &repo }
                .execute("tok", bad, &mut session)
                .await
                .unwrap_err();
            assert!(matches!(err, UploadLinkError::BadRequest(_)), "{bad}");
        }
        assert!(session_email(&session).is_none());
    }

    #[tokio::test]
    async fn unknown_link_is_not_found() {
        let repo = InMemoryUploadLinks::default();
        let mut session = SessionData::new();
        let err = SetAnonymousEmail { repo: &repo }
            .execute("missing", "a@b.com", &mut session)
            .await
            .unwrap_err();
        assert!(matches!(err, UploadLinkError::NotFound));
    }
}
