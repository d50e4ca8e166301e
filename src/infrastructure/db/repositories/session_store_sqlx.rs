use async_trait::async_trait;
use sqlx::types::Json;

use crate::application::ports::session_store::{SessionData, SessionStore};
use crate::infrastructure::db::PgPool;

pub struct SqlxSessionStore {
    pub pool: PgPool,
}

impl SqlxSessionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn clear_expired(&self) -> anyhow::Result<u64> {
        let res = sqlx::query("DELETE FROM sessions WHERE expire_date < now()")
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected())
    }
}

#[async_trait]
impl SessionStore for SqlxSessionStore {
    async fn load(&self, session_key: &str) -> anyhow::Result<Option<SessionData>> {
        let data: Option<Json<SessionData>> = sqlx::query_scalar(
            "SELECT session_data FROM sessions WHERE session_key = $1 AND expire_date > now()",
        )
        .bind(session_key)
        .fetch_optional(&self.pool)
        .await?;
        Ok(data.map(|Json(d)| d))
    }

    async fn save(
        &self,
        session_key: &str,
        data: &SessionData,
        expire_date: chrono::DateTime<chrono::Utc>,
    ) -> anyhow::Result<()> {
        sqlx::query(
            r#"INSERT INTO sessions (session_key, session_data, expire_date) VALUES ($1, $2, $3)
               ON CONFLICT (session_key)
               DO UPDATE SET session_data = EXCLUDED.session_data, expire_date = EXCLUDED.expire_date"#,
        )
        .bind(session_key)
        .bind(Json(data))
        .bind(expire_date)
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}
