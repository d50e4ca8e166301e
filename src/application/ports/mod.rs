pub mod fileserver_token_port;
pub mod license_port;
pub mod session_store;
pub mod upload_link_repository;
