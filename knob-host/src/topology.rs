//! Per-CPU topology from `lscpu -e`
//!
//! ```text
//! CPU NODE SOCKET CORE L1d:L1i:L2:L3 ONLINE
//!   0    0      0    0 0:0:0:0          yes
//!   1    0      0    1 1:1:1:0          yes
//! ```
//!
//! A `-` in a numeric column means the kernel did not report it and is read
//! as `0`.

use serde::{Deserialize, Serialize};
use std::io;
use std::process::Command;

use knob_core::{Error, Result};
use tracing::debug;

use crate::cache::CacheInfo;

/// Columns requested from `lscpu`, in the order they are parsed
pub const LSCPU_COLUMNS: &str = "CPU,NODE,SOCKET,CORE,CACHE,ONLINE";

const COLUMN_COUNT: usize = 6;

/// One row of the topology table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CpuInfo {
    /// Logical CPU id
    pub cpu: i32,
    /// NUMA node
    pub node: i32,
    /// Physical package
    pub socket: i32,
    /// Core within the package
    pub core: i32,
    /// Normalized cache identity
    pub cache: CacheInfo,
    /// Whether the CPU is online
    pub online: bool,
}

/// Parse `lscpu -e=CPU,NODE,SOCKET,CORE,CACHE,ONLINE` output
///
/// The header, if present as the first non-blank line, is skipped. Blank
/// lines are ignored.
///
/// # Errors
/// Returns error if a row has too few columns, a non-numeric id, or an
/// invalid cache descriptor
pub fn parse_cpu_table(output: &str) -> Result<Vec<CpuInfo>> {
    let mut cpus = Vec::new();
    let mut header_checked = false;

    for (lineno, line) in output.lines().enumerate() {
        let columns: Vec<&str> = line.split_whitespace().collect();
        if columns.is_empty() {
            continue;
        }

        // Only the first non-blank line may be the header
        if !header_checked {
            header_checked = true;
            if columns[0] == "CPU" {
                continue;
            }
        }

        if columns.len() < COLUMN_COUNT {
            return Err(Error::InvalidConfig {
                message: format!(
                    "lscpu line {}: expected {} columns, got {}",
                    lineno + 1,
                    COLUMN_COUNT,
                    columns.len()
                ),
            });
        }

        cpus.push(CpuInfo {
            cpu: parse_id(columns[0], "CPU", lineno)?,
            node: parse_id(columns[1], "NODE", lineno)?,
            socket: parse_id(columns[2], "SOCKET", lineno)?,
            core: parse_id(columns[3], "CORE", lineno)?,
            cache: CacheInfo::parse(columns[4])?,
            online: columns[5] == "yes",
        });
    }

    Ok(cpus)
}

fn parse_id(value: &str, column: &str, lineno: usize) -> Result<i32> {
    if value == "-" {
        return Ok(0);
    }

    value.parse().map_err(|e| Error::InvalidConfig {
        message: format!("lscpu line {}: bad {} {:?}: {}", lineno + 1, column, value, e),
    })
}

/// Runs `lscpu` and parses its per-CPU table
#[derive(Debug, Clone)]
pub struct LscpuTopology {
    program: String,
}

impl Default for LscpuTopology {
    fn default() -> Self {
        Self {
            program: "lscpu".to_string(),
        }
    }
}

impl LscpuTopology {
    /// Use the `lscpu` found on `PATH`
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific `lscpu` binary
    #[must_use]
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Enumerate logical CPUs
    ///
    /// # Errors
    /// Returns `Error::Io` if `lscpu` cannot be run or fails, and a parse
    /// error if its output is malformed
    pub fn discover(&self) -> Result<Vec<CpuInfo>> {
        let output = Command::new(&self.program)
            .arg(format!("-e={LSCPU_COLUMNS}"))
            .output()?;

        if !output.status.success() {
            return Err(io::Error::other(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ))
            .into());
        }

        let cpus = parse_cpu_table(&String::from_utf8_lossy(&output.stdout))?;
        debug!(cpus = cpus.len(), "Discovered CPU topology");

        Ok(cpus)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const X86_OUTPUT: &str = "\
CPU NODE SOCKET CORE L1d:L1i:L2:L3 ONLINE
  0    0      0    0 0:0:0:0          yes
  1    0      0    1 1:1:1:0          yes
  2    1      1    2 2:2:2:1          yes
  3    1      1    3 3:3:3:1          no
";

    const ARM64_OUTPUT: &str = "\
CPU NODE SOCKET CORE CACHE ONLINE
 0    0      0    0 -        yes
 1    0      0    1 -        yes
";

    #[test]
    fn test_parse_x86() {
        let cpus = parse_cpu_table(X86_OUTPUT).unwrap();
        assert_eq!(cpus.len(), 4);

        assert_eq!(cpus[2].cpu, 2);
        assert_eq!(cpus[2].node, 1);
        assert_eq!(cpus[2].socket, 1);
        assert_eq!(cpus[2].cache.l1l2_id, "2");
        assert_eq!(cpus[2].cache.l3_id, 1);
        assert!(!cpus[3].online);
    }

    #[test]
    fn test_parse_arm64_without_cache() {
        let cpus = parse_cpu_table(ARM64_OUTPUT).unwrap();
        assert_eq!(cpus.len(), 2);
        assert_eq!(cpus[1].core, 1);
        assert_eq!(cpus[1].cache, CacheInfo { l1l2_id: "0".to_string(), l3_id: 0 });
    }

    #[test]
    fn test_parse_header_after_blank_lines() {
        let cpus = parse_cpu_table(&format!("\n  \n{X86_OUTPUT}")).unwrap();
        assert_eq!(cpus.len(), 4);
        assert_eq!(cpus[0].cpu, 0);
    }

    #[test]
    fn test_parse_header_only_first() {
        let table = "CPU NODE SOCKET CORE CACHE ONLINE\nCPU NODE SOCKET CORE CACHE ONLINE\n";
        assert!(matches!(
            parse_cpu_table(table),
            Err(Error::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_parse_missing_node() {
        let cpus = parse_cpu_table("0 - 0 0 0:0:0 yes\n").unwrap();
        assert_eq!(cpus[0].node, 0);
        assert_eq!(cpus[0].cache.l3_id, 0);
    }

    #[test]
    fn test_parse_short_row() {
        assert!(matches!(
            parse_cpu_table("0 0 0 0 yes\n"),
            Err(Error::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_parse_bad_cache() {
        assert!(matches!(
            parse_cpu_table("0 0 0 0 0:0 yes\n"),
            Err(Error::InvalidCacheInfo { .. })
        ));
    }

    #[test]
    fn test_missing_lscpu() {
        let err = LscpuTopology::with_program("knob-no-such-lscpu")
            .discover()
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
