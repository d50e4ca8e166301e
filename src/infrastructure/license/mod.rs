use crate::application::ports::license_port::LicensePort;

/// License tier taken from deployment configuration.
pub struct ConfigLicense {
    pub pro: bool,
}

impl LicensePort for ConfigLicense {
    fn is_pro_version(&self) -> bool {
        self.pro
    }
}
