pub mod db;
pub mod fileserver;
pub mod license;
