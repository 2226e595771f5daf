//! CPU cache descriptor parsing
//!
//! `lscpu -e=CACHE` prints one colon-separated token per logical CPU, one
//! field per cache level: `L1d:L1i:L2:L3`. L1 and L2 are treated as private
//! to the core, so the first field identifies both. Some hosts print fewer
//! fields (no L3 under qemu-kvm) or a bare `-` (no cache information at all,
//! seen on some arm64 machines).
//!
//! The same parser handles every shape, so one build serves all targets.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use knob_core::{Error, Result};

/// Placeholder `lscpu` prints when it knows nothing about caches
pub const NO_CACHE_INFO: &str = "-";

/// Normalized cache identity of one logical CPU
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CacheInfo {
    /// Shared identity of the (private) L1 and L2 caches
    pub l1l2_id: String,

    /// L3 cache id, `0` when the host has none or does not say
    pub l3_id: i32,
}

impl CacheInfo {
    /// Parse one descriptor, see [`get_cache_info`]
    ///
    /// # Errors
    /// Returns `Error::InvalidCacheInfo` for fewer than three fields and
    /// `Error::CacheId` for a non-numeric L3 field
    pub fn parse(descriptor: &str) -> Result<Self> {
        let s = descriptor.trim();
        if s == NO_CACHE_INFO {
            return Ok(Self {
                l1l2_id: "0".to_string(),
                l3_id: 0,
            });
        }

        let fields: Vec<&str> = s.split(':').collect();
        if fields.len() < 3 {
            return Err(Error::InvalidCacheInfo {
                descriptor: descriptor.to_string(),
            });
        }

        let l1l2_id = fields[0].to_string();
        let Some(l3) = fields.get(3) else {
            return Ok(Self { l1l2_id, l3_id: 0 });
        };

        let l3_id = l3.parse::<i32>().map_err(|source| Error::CacheId {
            descriptor: descriptor.to_string(),
            source,
        })?;

        Ok(Self { l1l2_id, l3_id })
    }
}

impl FromStr for CacheInfo {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for CacheInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "l1l2={} l3={}", self.l1l2_id, self.l3_id)
    }
}

/// Split an `lscpu` cache descriptor into its L1/L2 and L3 identities
///
/// # Errors
/// See [`CacheInfo::parse`]
pub fn get_cache_info(descriptor: &str) -> Result<(String, i32)> {
    CacheInfo::parse(descriptor).map(|info| (info.l1l2_id, info.l3_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_cache_info() {
        assert_eq!(get_cache_info("-").unwrap(), ("0".to_string(), 0));
        assert_eq!(get_cache_info("  -\n").unwrap(), ("0".to_string(), 0));
    }

    #[test]
    fn test_without_l3() {
        assert_eq!(get_cache_info("0:0:0").unwrap(), ("0".to_string(), 0));
        assert_eq!(get_cache_info("5:5:5").unwrap(), ("5".to_string(), 0));
    }

    #[test]
    fn test_with_l3() {
        assert_eq!(get_cache_info("0:0:0:3").unwrap(), ("0".to_string(), 3));
        assert_eq!(get_cache_info("12:12:12:1").unwrap(), ("12".to_string(), 1));
        assert_eq!(get_cache_info(" 7:7:7:0 ").unwrap(), ("7".to_string(), 0));
    }

    #[test]
    fn test_extra_fields_ignored() {
        assert_eq!(get_cache_info("2:2:2:1:9").unwrap(), ("2".to_string(), 1));
    }

    #[test]
    fn test_l1_l2_distinct_reports_first_field() {
        // L1 and L2 are assumed to share the core's identity
        assert_eq!(get_cache_info("4:4:2:0").unwrap(), ("4".to_string(), 0));
    }

    #[test]
    fn test_too_few_fields() {
        let err = get_cache_info("0:0").unwrap_err();
        assert!(matches!(err, Error::InvalidCacheInfo { ref descriptor } if descriptor == "0:0"));
        assert_eq!(err.to_string(), "invalid cache info 0:0");

        assert!(matches!(
            get_cache_info(""),
            Err(Error::InvalidCacheInfo { .. })
        ));
    }

    #[test]
    fn test_non_numeric_l3() {
        assert!(matches!(
            get_cache_info("0:0:0:x"),
            Err(Error::CacheId { .. })
        ));
        assert!(matches!(
            get_cache_info("0:0:0:"),
            Err(Error::CacheId { .. })
        ));
    }

    #[test]
    fn test_l3_out_of_range() {
        assert!(matches!(
            get_cache_info("0:0:0:4294967296"),
            Err(Error::CacheId { .. })
        ));
        assert_eq!(get_cache_info("0:0:0:-1").unwrap(), ("0".to_string(), -1));
    }

    #[test]
    fn test_from_str() {
        let info: CacheInfo = "1:1:1:0".parse().unwrap();
        assert_eq!(
            info,
            CacheInfo {
                l1l2_id: "1".to_string(),
                l3_id: 0
            }
        );
        assert_eq!(info.to_string(), "l1l2=1 l3=0");
    }
}
