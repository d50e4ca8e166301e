pub mod auth;
pub mod error;
pub mod extractors;
pub mod health;
pub mod session;
pub mod upload_links;
