//! Kernel feature identifiers and their logical state

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// Sysctl switching group-identity scheduling
pub const KERNEL_SCHED_GROUP_IDENTITY_ENABLE: &str = "kernel/sched_group_identity_enabled";

/// Sysctl switching core scheduling
pub const KERNEL_SCHED_CORE: &str = "kernel/sched_core";

/// A named binary scheduling feature backed by one sysctl
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KernelFeature {
    /// Group-identity scheduling
    #[serde(rename = "group-identity")]
    SchedGroupIdentity,
    /// Core scheduling
    #[serde(rename = "core-sched")]
    SchedCore,
}

impl KernelFeature {
    /// Every feature known to this build
    pub const ALL: [Self; 2] = [Self::SchedGroupIdentity, Self::SchedCore];

    /// Sysctl name relative to the sysctl tree
    #[must_use]
    pub const fn sysctl(self) -> &'static str {
        match self {
            Self::SchedGroupIdentity => KERNEL_SCHED_GROUP_IDENTITY_ENABLE,
            Self::SchedCore => KERNEL_SCHED_CORE,
        }
    }

    /// Short name used in logs and on the command line
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SchedGroupIdentity => "group-identity",
            Self::SchedCore => "core-sched",
        }
    }
}

impl fmt::Display for KernelFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KernelFeature {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|f| f.as_str() == s || f.sysctl() == s)
            .ok_or_else(|| Error::InvalidConfig {
                message: format!(
                    "unknown kernel feature {s:?} (expected one of: group-identity, core-sched)"
                ),
            })
    }
}

/// Logical state of a kernel feature
///
/// Maps to `1`/`0` at the sysctl boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeatureState {
    /// Sysctl value `1`
    Enabled,
    /// Sysctl value `0`
    Disabled,
}

impl FeatureState {
    /// Raw sysctl value for this state
    #[must_use]
    pub const fn as_value(self) -> i64 {
        match self {
            Self::Enabled => 1,
            Self::Disabled => 0,
        }
    }

    /// Interpret a raw sysctl value; only `1` counts as enabled
    #[must_use]
    pub const fn from_value(value: i64) -> Self {
        if value == 1 { Self::Enabled } else { Self::Disabled }
    }

    /// Whether this is [`FeatureState::Enabled`]
    #[must_use]
    pub const fn is_enabled(self) -> bool {
        matches!(self, Self::Enabled)
    }
}

impl From<bool> for FeatureState {
    fn from(enable: bool) -> Self {
        if enable { Self::Enabled } else { Self::Disabled }
    }
}

impl fmt::Display for FeatureState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Enabled => f.write_str("enabled"),
            Self::Disabled => f.write_str("disabled"),
        }
    }
}
