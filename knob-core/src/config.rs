//! Root directory configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::{Error, Result};

/// Default mount point of sysfs
pub const DEFAULT_SYS_ROOT: &str = "/sys";

/// Default mount point of procfs
pub const DEFAULT_PROC_ROOT: &str = "/proc";

/// Root directories every control-file path is built from
///
/// Built once at startup (defaults, then a config file, then flags) and
/// handed to a [`PathResolver`](crate::PathResolver). Nothing mutates it
/// afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RootConfig {
    /// Where sysfs is mounted
    pub sys_root: PathBuf,

    /// Where procfs is mounted
    pub proc_root: PathBuf,
}

impl Default for RootConfig {
    fn default() -> Self {
        Self {
            sys_root: PathBuf::from(DEFAULT_SYS_ROOT),
            proc_root: PathBuf::from(DEFAULT_PROC_ROOT),
        }
    }
}

impl RootConfig {
    /// Create a configuration pointing at the host's real mounts
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the sysfs root
    #[must_use]
    pub fn with_sys_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.sys_root = root.into();
        self
    }

    /// Set the procfs root
    #[must_use]
    pub fn with_proc_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.proc_root = root.into();
        self
    }

    /// Load a configuration from a JSON document
    ///
    /// Missing keys keep their defaults.
    ///
    /// # Errors
    /// Returns error if the file cannot be read or is not valid JSON
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;

        let config: Self = serde_json::from_str(&content).map_err(|e| Error::InvalidConfig {
            message: format!("{}: {}", path.display(), e),
        })?;

        tracing::debug!(
            sys_root = %config.sys_root.display(),
            proc_root = %config.proc_root.display(),
            "Loaded root configuration"
        );

        Ok(config)
    }
}
