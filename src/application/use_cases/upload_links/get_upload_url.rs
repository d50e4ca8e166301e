use crate::application::dto::upload_links::UploadUrlDto;
use crate::application::identity::UploaderIdentity;
use crate::application::ports::fileserver_token_port::{AccessTokenRequest, FileserverTokenIssuer};
use crate::application::ports::license_port::LicensePort;
use crate::application::ports::upload_link_repository::UploadLinkRepository;
use crate::application::use_cases::upload_links::UploadLinkError;

pub const UPLOAD_OP: &str = "upload";
const AJAX_UPLOAD_ENDPOINT: &str = "upload-aj";

pub struct GetUploadUrl<'a, R, T, L>
where
    R: UploadLinkRepository + ?Sized,
    T: FileserverTokenIssuer + ?Sized,
    L: LicensePort + ?Sized,
{
    pub repo: &'a R,
    pub issuer: &'a T,
    pub license: &'a L,
    pub virus_check_enabled: bool,
    pub file_server_root: &'a str,
}

pub struct UploadUrlRequest<'r> {
    pub token: &'r str,
    pub repo_id: Option<&'r str>,
    pub identity: &'r UploaderIdentity,
    /// The session has passed the link's password check.
    pub unlocked: bool,
}

pub fn gen_file_upload_url(file_server_root: &str, token: &str, endpoint: &str) -> String {
    format!(
        "{}/{}/{}",
        file_server_root.trim_end_matches('/'),
        endpoint,
        token
    )
}

impl<'a, R, T, L> GetUploadUrl<'a, R, T, L>
where
    R: UploadLinkRepository + ?Sized,
    T: FileserverTokenIssuer + ?Sized,
    L: LicensePort + ?Sized,
{
    pub async fn execute(&self, req: UploadUrlRequest<'_>) -> Result<UploadUrlDto, UploadLinkError> {
        let repo_id = req
            .repo_id
            .filter(|r| !r.is_empty())
            .ok_or_else(|| UploadLinkError::BadRequest("Argument missing: r".into()))?;

        let link = self
            .repo
            .get_by_token(req.token)
            .await?
            .filter(|l| !l.is_expired())
            .ok_or(UploadLinkError::NotFound)?;

        if link.repo_id != repo_id {
            tracing::debug!(token = %req.token, repo_id = %repo_id, "upload_link_repo_mismatch");
            return Err(UploadLinkError::PermissionDenied);
        }
        if link.is_encrypted() && !req.unlocked {
            return Err(UploadLinkError::PermissionDenied);
        }

        let check_virus = (self.license.is_pro_version() && self.virus_check_enabled).then_some(true);
        let token_req = AccessTokenRequest {
            repo_id: repo_id.to_string(),
            obj_id: req.identity.to_payload()?,
            op: UPLOAD_OP.to_string(),
            username: String::new(),
            use_onetime: false,
            check_virus,
        };

        let token = self
            .issuer
            .get_fileserver_access_token(&token_req)
            .await
            .map_err(|err| {
                UploadLinkError::Internal(err.context(format!(
                    "get_fileserver_access_token failed for repo {repo_id}"
                )))
            })?;
        if token.is_empty() {
            return Err(UploadLinkError::Internal(anyhow::anyhow!(
                "file server returned an empty access token for repo {repo_id}"
            )));
        }

        Ok(UploadUrlDto {
            url: gen_file_upload_url(self.file_server_root, &token, AJAX_UPLOAD_ENDPOINT),
        })
    }
}
