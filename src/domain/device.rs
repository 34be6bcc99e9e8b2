// Device identity domain model
use serde::{Deserialize, Serialize};

/// Read-only identity snapshot reported by the device.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceInfo {
    pub version: String,
    pub cores: u32,
}

impl DeviceInfo {
    pub fn new(version: String, cores: u32) -> Self {
        Self { version, cores }
    }

    /// True while the identity fields still hold their empty defaults.
    pub fn is_unknown(&self) -> bool {
        self.version.is_empty() && self.cores == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_unknown() {
        assert!(DeviceInfo::default().is_unknown());
        assert!(!DeviceInfo::new("v5.1.2".to_string(), 2).is_unknown());
    }

    #[test]
    fn test_deserialize_device_payload() {
        let info: DeviceInfo = serde_json::from_str(r#"{"version":"v5.1.2","cores":2}"#).unwrap();
        assert_eq!(info, DeviceInfo::new("v5.1.2".to_string(), 2));
    }
}
