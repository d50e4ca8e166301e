pub trait LicensePort: Send + Sync {
    fn is_pro_version(&self) -> bool;
}
