use async_trait::async_trait;
use sqlx::Row;
use sqlx::postgres::PgRow;

use crate::application::ports::upload_link_repository::{NewUploadLink, UploadLinkRepository};
use crate::domain::upload_links::UploadLinkShare;
use crate::infrastructure::db::PgPool;

const COLUMNS: &str =
    "id, token, username, repo_id, path, password_hash, expire_date, ctime";

pub struct SqlxUploadLinkRepository {
    pub pool: PgPool,
}

impl SqlxUploadLinkRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_row(r: PgRow) -> UploadLinkShare {
    UploadLinkShare {
        id: r.get("id"),
        token: r.get("token"),
        username: r.get("username"),
        repo_id: r.get("repo_id"),
        path: r.get("path"),
        password_hash: r.try_get::<Option<String>, _>("password_hash").ok().flatten(),
        expire_date: r
            .try_get::<Option<chrono::DateTime<chrono::Utc>>, _>("expire_date")
            .ok()
            .flatten(),
        ctime: r.get("ctime"),
    }
}

#[async_trait]
impl UploadLinkRepository for SqlxUploadLinkRepository {
    async fn create_upload_link(&self, link: &NewUploadLink) -> anyhow::Result<UploadLinkShare> {
        let sql = format!(
            "INSERT INTO upload_link_shares (token, username, repo_id, path, password_hash, expire_date)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query(&sql)
            .bind(&link.token)
            .bind(&link.username)
            .bind(&link.repo_id)
            .bind(&link.path)
            .bind(link.password_hash.as_deref())
            .bind(link.expire_date)
            .fetch_one(&self.pool)
            .await?;
        Ok(map_row(row))
    }

    async fn get_by_token(&self, token: &str) -> anyhow::Result<Option<UploadLinkShare>> {
        let sql = format!("SELECT {COLUMNS} FROM upload_link_shares WHERE token = $1");
        let row = sqlx::query(&sql)
            .bind(token)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(map_row))
    }

    async fn list_by_owner(&self, username: &str) -> anyhow::Result<Vec<UploadLinkShare>> {
        let sql = format!(
            "SELECT {COLUMNS} FROM upload_link_shares WHERE username = $1 ORDER BY ctime DESC"
        );
        let rows = sqlx::query(&sql)
            .bind(username)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(map_row).collect())
    }

    async fn delete_upload_link(&self, username: &str, token: &str) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM upload_link_shares WHERE token = $1 AND username = $2")
            .bind(token)
            .bind(username)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}
