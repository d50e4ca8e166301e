pub mod upload_links;
