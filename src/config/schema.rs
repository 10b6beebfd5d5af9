//! KDL schema for `folio.kdl`.
//!
//! ```kdl
//! // Server settings, all optional
//! host "0.0.0.0"
//! port 3000
//! max-upload-mb 100
//! ```

use crate::{Error, Result};
use kdl::KdlDocument;
use std::fs;
use std::path::{Path, PathBuf};

/// Config file name, looked up in the portfolio root.
pub const CONFIG_FILE: &str = "folio.kdl";

/// Settings read from `folio.kdl`. Unset values fall through to defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FolioConfig {
    /// Address to bind (e.g., "127.0.0.1")
    pub host: Option<String>,

    /// Port to listen on
    pub port: Option<u16>,

    /// Largest accepted request body, in MiB
    pub max_upload_mb: Option<u64>,
}

impl FolioConfig {
    /// Create an empty config with no values set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Path of the config file for a portfolio root.
    pub fn path(root: &Path) -> PathBuf {
        root.join(CONFIG_FILE)
    }

    /// Validate the config values.
    ///
    /// Returns an error message if any value is invalid.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.port == Some(0) {
            return Err("port must be 1-65535, got 0".to_string());
        }
        if self.max_upload_mb == Some(0) {
            return Err("max-upload-mb must be at least 1".to_string());
        }
        if let Some(ref host) = self.host {
            if host.trim().is_empty() {
                return Err("host must not be empty".to_string());
            }
        }
        Ok(())
    }

    /// Parse config from a KDL document.
    ///
    /// Unknown nodes and values of the wrong type are ignored.
    pub fn from_kdl(doc: &KdlDocument) -> Self {
        let mut config = Self::new();

        if let Some(node) = doc.get("host") {
            if let Some(entry) = node.entries().first() {
                if let Some(s) = entry.value().as_string() {
                    config.host = Some(s.to_string());
                }
            }
        }

        if let Some(node) = doc.get("port") {
            if let Some(entry) = node.entries().first() {
                if let Some(i) = entry.value().as_integer() {
                    config.port = u16::try_from(i).ok();
                }
            }
        }

        if let Some(node) = doc.get("max-upload-mb") {
            if let Some(entry) = node.entries().first() {
                if let Some(i) = entry.value().as_integer() {
                    config.max_upload_mb = u64::try_from(i).ok();
                }
            }
        }

        config
    }

    /// Load `folio.kdl` from `root`. A missing file yields an empty config.
    pub fn load(root: &Path) -> Result<Self> {
        let path = Self::path(root);
        if !path.exists() {
            return Ok(Self::new());
        }
        let content = fs::read_to_string(&path)?;
        let doc: KdlDocument = content
            .parse()
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        let config = Self::from_kdl(&doc);
        config
            .validate()
            .map_err(|e| Error::InvalidInput(format!("{}: {}", path.display(), e)))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::TestEnv;

    #[test]
    fn test_config_default() {
        let config = FolioConfig::default();
        assert!(config.host.is_none());
        assert!(config.port.is_none());
        assert!(config.max_upload_mb.is_none());
    }

    #[test]
    fn test_config_from_kdl_empty() {
        let doc = KdlDocument::new();
        assert_eq!(FolioConfig::from_kdl(&doc), FolioConfig::default());
    }

    #[test]
    fn test_config_from_kdl_all_values() {
        let kdl = "host \"127.0.0.1\"\nport 8080\nmax-upload-mb 25\n";
        let doc: KdlDocument = kdl.parse().unwrap();
        let config = FolioConfig::from_kdl(&doc);
        assert_eq!(config.host.as_deref(), Some("127.0.0.1"));
        assert_eq!(config.port, Some(8080));
        assert_eq!(config.max_upload_mb, Some(25));
    }

    #[test]
    fn test_config_from_kdl_wrong_types_ignored() {
        let kdl = "host 5\nport \"eighty\"\nmax-upload-mb -3\n";
        let doc: KdlDocument = kdl.parse().unwrap();
        assert_eq!(FolioConfig::from_kdl(&doc), FolioConfig::default());
    }

    #[test]
    fn test_config_from_kdl_port_out_of_range() {
        let doc: KdlDocument = "port 70000".parse().unwrap();
        assert_eq!(FolioConfig::from_kdl(&doc).port, None);
    }

    #[test]
    fn test_config_validate() {
        assert!(FolioConfig::default().validate().is_ok());
        let config = FolioConfig {
            port: Some(0),
            ..Default::default()
        };
        assert!(config.validate().is_err());
        let config = FolioConfig {
            max_upload_mb: Some(0),
            ..Default::default()
        };
        assert!(config.validate().is_err());
        let config = FolioConfig {
            host: Some("  ".to_string()),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let env = TestEnv::new();
        assert_eq!(FolioConfig::load(env.path()).unwrap(), FolioConfig::default());
    }

    #[test]
    fn test_load_unparseable_file_errors() {
        let env = TestEnv::new();
        fs::write(env.path().join(CONFIG_FILE), "port {{{").unwrap();
        assert!(matches!(FolioConfig::load(env.path()), Err(Error::Config(_))));
    }

    #[test]
    fn test_load_invalid_value_errors() {
        let env = TestEnv::new();
        fs::write(env.path().join(CONFIG_FILE), "port 0").unwrap();
        assert!(matches!(
            FolioConfig::load(env.path()),
            Err(Error::InvalidInput(_))
        ));
    }
}
