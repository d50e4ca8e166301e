use async_trait::async_trait;

/// Arguments of a file-server access token request.
///
/// `check_virus` is tri-state on purpose: `None` means the flag is left out of
/// the outbound call entirely, which the file server treats differently from
/// an explicit `false`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessTokenRequest {
    pub repo_id: String,
    pub obj_id: String,
    pub op: String,
    pub username: String,
    pub use_onetime: bool,
    pub check_virus: Option<bool>,
}

#[async_trait]
pub trait FileserverTokenIssuer: Send + Sync {
    async fn get_fileserver_access_token(&self, req: &AccessTokenRequest)
    -> anyhow::Result<String>;
}
