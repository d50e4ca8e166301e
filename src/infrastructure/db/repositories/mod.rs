pub mod session_store_sqlx;
pub mod upload_link_repository_sqlx;
