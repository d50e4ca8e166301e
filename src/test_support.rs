// In-memory port implementations shared by unit and router tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use uuid::Uuid;

use crate::application::ports::fileserver_token_port::{AccessTokenRequest, FileserverTokenIssuer};
use crate::application::ports::license_port::LicensePort;
use crate::application::ports::session_store::{SessionData, SessionStore};
use crate::application::ports::upload_link_repository::{NewUploadLink, UploadLinkRepository};
use crate::bootstrap::app_context::{AppContext, AppServices};
use crate::bootstrap::config::Config;
use crate::domain::upload_links::UploadLinkShare;

pub const TEST_JWT_SECRET: &str = "test-secret-for-unit-tests";

#[derive(Default)]
pub struct InMemoryUploadLinks {
    links: Mutex<Vec<UploadLinkShare>>,
}

impl InMemoryUploadLinks {
    pub fn insert(&self, link: UploadLinkShare) {
        self.links.lock().unwrap().push(link);
    }

    pub fn len(&self) -> usize {
        self.links.lock().unwrap().len()
    }
}

#[async_trait]
impl UploadLinkRepository for InMemoryUploadLinks {
    async fn create_upload_link(&self, link: &NewUploadLink) -> anyhow::Result<UploadLinkShare> {
        let mut links = self.links.lock().unwrap();
        if links.iter().any(|l| l.token == link.token) {
            anyhow::bail!("duplicate token");
        }
        let row = UploadLinkShare {
            id: Uuid::new_v4(),
            token: link.token.clone(),
            username: link.username.clone(),
            repo_id: link.repo_id.clone(),
            path: link.path.clone(),
            password_hash: link.password_hash.clone(),
            expire_date: link.expire_date,
            ctime: chrono::Utc::now(),
        };
        links.push(row.clone());
        Ok(row)
    }

    async fn get_by_token(&self, token: &str) -> anyhow::Result<Option<UploadLinkShare>> {
        Ok(self
            .links
            .lock()
            .unwrap()
            .iter()
            .find(|l| l.token == token)
            .cloned())
    }

    async fn list_by_owner(&self, username: &str) -> anyhow::Result<Vec<UploadLinkShare>> {
        let mut rows: Vec<_> = self
            .links
            .lock()
            .unwrap()
            .iter()
            .filter(|l| l.username == username)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.ctime.cmp(&a.ctime));
        Ok(rows)
    }

    async fn delete_upload_link(&self, username: &str, token: &str) -> anyhow::Result<bool> {
        let mut links = self.links.lock().unwrap();
        let before = links.len();
        links.retain(|l| !(l.username == username && l.token == token));
        Ok(links.len() != before)
    }
}

#[derive(Default)]
pub struct InMemorySessions {
    rows: Mutex<HashMap<String, SessionData>>,
}

impl InMemorySessions {
    pub fn put(&self, key: &str, data: SessionData) {
        self.rows.lock().unwrap().insert(key.to_string(), data);
    }

    pub fn get(&self, key: &str) -> Option<SessionData> {
        self.rows.lock().unwrap().get(key).cloned()
    }
}

#[async_trait]
impl SessionStore for InMemorySessions {
    async fn load(&self, session_key: &str) -> anyhow::Result<Option<SessionData>> {
        Ok(self.get(session_key))
    }

    async fn save(
        &self,
        session_key: &str,
        data: &SessionData,
        _expire_date: chrono::DateTime<chrono::Utc>,
    ) -> anyhow::Result<()> {
        self.put(session_key, data.clone());
        Ok(())
    }
}

/// Returns a fixed token and remembers every request it was given.
pub struct RecordingTokenIssuer {
    token: String,
    fail: bool,
    calls: Mutex<Vec<AccessTokenRequest>>,
}

impl RecordingTokenIssuer {
    pub fn returning(token: &str) -> Self {
        Self {
            token: token.to_string(),
            fail: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            token: String::new(),
            fail: true,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn last_call(&self) -> Option<AccessTokenRequest> {
        self.calls.lock().unwrap().last().cloned()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl FileserverTokenIssuer for RecordingTokenIssuer {
    async fn get_fileserver_access_token(
        &self,
        req: &AccessTokenRequest,
    ) -> anyhow::Result<String> {
        self.calls.lock().unwrap().push(req.clone());
        if self.fail {
            anyhow::bail!("rpc error: connection refused");
        }
        Ok(self.token.clone())
    }
}

pub struct FixedLicense(pub bool);

impl LicensePort for FixedLicense {
    fn is_pro_version(&self) -> bool {
        self.0
    }
}

pub fn test_config() -> Config {
    Config {
        api_port: 0,
        frontend_url: None,
        database_url: "postgres://localhost/unused".into(),
        jwt_secret_pem: TEST_JWT_SECRET.into(),
        site_root: "http://seahub.test".into(),
        file_server_root: "http://seahub.test/seafhttp".into(),
        seafile_rpc_url: "http://127.0.0.1:8082/rpc".into(),
        seafile_rpc_secret: None,
        fileserver_rpc_timeout_secs: 10,
        enable_upload_link_virus_check: false,
        is_pro_version: false,
        share_link_password_min_length: 8,
        share_link_expire_days_max: 365,
        session_cookie_age_secs: 3600,
        is_production: false,
    }
}

pub fn upload_link(token: &str, repo_id: &str) -> UploadLinkShare {
    UploadLinkShare {
        id: Uuid::new_v4(),
        token: token.to_string(),
        username: "owner@example.com".into(),
        repo_id: repo_id.to_string(),
        path: "/folder/".into(),
        password_hash: None,
        expire_date: None,
        ctime: chrono::Utc::now(),
    }
}

pub fn hash_password(password: &str) -> String {
    use argon2::{
        Argon2,
        password_hash::{PasswordHasher, SaltString},
    };
    use password_hash::rand_core::OsRng;
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .unwrap()
        .to_string()
}

pub fn bearer_for(username: &str) -> String {
    use jsonwebtoken::{EncodingKey, Header};
    let exp = chrono::Utc::now().timestamp() as usize + 3600;
    let claims = crate::presentation::http::auth::Claims {
        sub: username.to_string(),
        exp,
    };
    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
    )
    .unwrap()
}

pub struct TestApp {
    pub ctx: AppContext,
    pub links: Arc<InMemoryUploadLinks>,
    pub sessions: Arc<InMemorySessions>,
    pub issuer: Arc<RecordingTokenIssuer>,
}

impl TestApp {
    pub fn new(cfg: Config, issuer: RecordingTokenIssuer, pro: bool) -> Self {
        let links = Arc::new(InMemoryUploadLinks::default());
        let sessions = Arc::new(InMemorySessions::default());
        let issuer = Arc::new(issuer);
        let services = AppServices::new(
            links.clone(),
            sessions.clone(),
            issuer.clone(),
            Arc::new(FixedLicense(pro)),
        );
        Self {
            ctx: AppContext::new(cfg, services),
            links,
            sessions,
            issuer,
        }
    }
}
