use std::sync::Arc;

use crate::application::ports::fileserver_token_port::FileserverTokenIssuer;
use crate::application::ports::license_port::LicensePort;
use crate::application::ports::session_store::SessionStore;
use crate::application::ports::upload_link_repository::UploadLinkRepository;
use crate::bootstrap::config::Config;

#[derive(Clone)]
pub struct AppContext {
    pub cfg: Config,
    services: Arc<AppServices>,
}

#[derive(Clone)]
pub struct AppServices {
    upload_link_repo: Arc<dyn UploadLinkRepository>,
    session_store: Arc<dyn SessionStore>,
    token_issuer: Arc<dyn FileserverTokenIssuer>,
    license: Arc<dyn LicensePort>,
}

impl AppServices {
    pub fn new(
        upload_link_repo: Arc<dyn UploadLinkRepository>,
        session_store: Arc<dyn SessionStore>,
        token_issuer: Arc<dyn FileserverTokenIssuer>,
        license: Arc<dyn LicensePort>,
    ) -> Self {
        Self {
            upload_link_repo,
            session_store,
            token_issuer,
            license,
        }
    }
}

impl AppContext {
    pub fn new(cfg: Config, services: AppServices) -> Self {
        Self {
            cfg,
            services: Arc::new(services),
        }
    }

    pub fn upload_link_repo(&self) -> Arc<dyn UploadLinkRepository> {
        self.services.upload_link_repo.clone()
    }

    pub fn session_store(&self) -> Arc<dyn SessionStore> {
        self.services.session_store.clone()
    }

    pub fn token_issuer(&self) -> Arc<dyn FileserverTokenIssuer> {
        self.services.token_issuer.clone()
    }

    pub fn license(&self) -> Arc<dyn LicensePort> {
        self.services.license.clone()
    }
}
