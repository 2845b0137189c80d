use serde::Deserialize;
use std::path::Path;

use crate::error::{Error, Result};

/// Optional settings, read from a TOML file.
///
/// ```toml
/// domain = "lan"
/// log_level = "info"
/// ```
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Suffix appended to every hostname in the hosts file.
    pub domain: String,
    /// Default tracing filter when neither `RUST_LOG` nor `--log-level` is given.
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            domain: "local".to_string(),
            log_level: "warn".to_string(),
        }
    }
}

impl Settings {
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| Error::ReadConfig {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let settings = Settings::from_toml("").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.domain, "local");
        assert_eq!(settings.log_level, "warn");
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let settings = Settings::from_toml("domain = \"lan\"").unwrap();
        assert_eq!(settings.domain, "lan");
        assert_eq!(settings.log_level, "warn");
    }

    #[test]
    fn unknown_key_is_rejected() {
        let err = Settings::from_toml("domian = \"lan\"").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn missing_file_names_the_path() {
        let err = Settings::load("/nonexistent/leasetab.toml").unwrap_err();
        assert!(matches!(err, Error::ReadConfig { .. }));
        assert!(err.to_string().contains("/nonexistent/leasetab.toml"));
    }
}
