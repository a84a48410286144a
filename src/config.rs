//! Manager configuration.

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "config")]
use crate::error::{DiError, DiResult};

/// Settings for [`DiManager::start`](crate::DiManager::start).
///
/// # Examples
///
/// ```rust
/// use workbench_di::ManagerConfig;
///
/// let config = ManagerConfig::new("viewer::components").debug(true);
/// assert_eq!(config.package_prefix, "viewer::components");
/// assert!(config.debug);
/// assert!(!config.eager);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(default))]
pub struct ManagerConfig {
    /// Module path whose components are managed; empty means every entry
    pub package_prefix: String,
    /// Log lifecycle events and component resolutions
    pub debug: bool,
    /// Construct components when their injector is created instead of on first use
    pub eager: bool,
}

impl ManagerConfig {
    pub fn new(package_prefix: impl Into<String>) -> Self {
        Self {
            package_prefix: package_prefix.into(),
            ..Self::default()
        }
    }

    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn eager(mut self, eager: bool) -> Self {
        self.eager = eager;
        self
    }

    /// Parses a configuration from JSON. Missing fields keep their defaults.
    ///
    /// ```rust
    /// use workbench_di::ManagerConfig;
    ///
    /// let config = ManagerConfig::from_json_str(r#"{ "package_prefix": "viewer", "eager": true }"#).unwrap();
    /// assert_eq!(config, ManagerConfig::new("viewer").eager(true));
    /// ```
    #[cfg(feature = "config")]
    pub fn from_json_str(json: &str) -> DiResult<Self> {
        serde_json::from_str(json).map_err(|e| DiError::InvalidConfig(e.to_string()))
    }

    /// Reads and parses a JSON configuration file.
    #[cfg(feature = "config")]
    pub fn from_json_file(path: impl AsRef<std::path::Path>) -> DiResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| DiError::InvalidConfig(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&content)
    }
}
