pub mod upload_link;

pub use upload_link::UploadLinkShare;
