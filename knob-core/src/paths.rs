//! Control-file path resolution
//!
//! Every function here is a pure join of a fixed sub-path onto one of the
//! configured roots. Nothing touches the filesystem; callers that open the
//! resulting paths are the ones that can fail.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::RootConfig;

/// Sysctl tree under the proc root
pub const SYSCTL_SUB_DIR: &str = "sys";
/// Kernel command line under the proc root
pub const KERNEL_CMDLINE_FILE_NAME: &str = "cmdline";
/// CPU info under the proc root
pub const PROC_CPU_INFO_NAME: &str = "cpuinfo";
/// Per-node memory info file name
pub const PROC_MEM_INFO_NAME: &str = "meminfo";
/// Per-node hugepage directory name
pub const HUGEPAGE_DIR: &str = "hugepages";
/// Hugepage count file name
pub const NR_HUGEPAGES: &str = "nr_hugepages";

/// NUMA node devices under the sys root
pub const SYS_NUMA_SUB_DIR: &str = "bus/node/devices";
/// PCI devices under the sys root
pub const SYS_PCI_DEVICE_DIR: &str = "bus/pci/devices";
/// SMT state under the sys root
pub const SYS_CPU_SMT_ACTIVE_SUB_PATH: &str = "devices/system/cpu/smt/active";
/// Intel P-state turbo switch under the sys root
pub const SYS_INTEL_PSTATE_NO_TURBO_SUB_PATH: &str = "devices/system/cpu/intel_pstate/no_turbo";

/// Resolves control-file paths from a [`RootConfig`]
///
/// Cloning is cheap; all clones share the same configuration.
#[derive(Debug, Clone, Default)]
pub struct PathResolver {
    config: Arc<RootConfig>,
}

impl PathResolver {
    /// Create a resolver owning the given configuration
    #[must_use]
    pub fn new(config: RootConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// The configuration this resolver was built from
    #[must_use]
    pub fn config(&self) -> &RootConfig {
        &self.config
    }

    /// `<sys>`
    #[must_use]
    pub fn sys_root(&self) -> &Path {
        &self.config.sys_root
    }

    /// `<proc>`
    #[must_use]
    pub fn proc_root(&self) -> &Path {
        &self.config.proc_root
    }

    /// `<sys>/bus/node/devices`
    #[must_use]
    pub fn sys_numa_dir(&self) -> PathBuf {
        self.config.sys_root.join(SYS_NUMA_SUB_DIR)
    }

    /// `<sys>/bus/node/devices/<node>/meminfo`
    #[must_use]
    pub fn numa_meminfo_path(&self, node: &str) -> PathBuf {
        self.numa_node_dir(node).join(PROC_MEM_INFO_NAME)
    }

    /// `<sys>/bus/node/devices/<node>/hugepages`
    #[must_use]
    pub fn numa_hugepages_dir(&self, node: &str) -> PathBuf {
        self.numa_node_dir(node).join(HUGEPAGE_DIR)
    }

    /// `<sys>/bus/node/devices/<node>/hugepages/<page>/nr_hugepages`
    #[must_use]
    pub fn numa_hugepages_nr_path(&self, node: &str, page: &str) -> PathBuf {
        self.numa_hugepages_dir(node)
            .join(relative(page))
            .join(NR_HUGEPAGES)
    }

    /// `<proc>/cpuinfo`
    #[must_use]
    pub fn cpuinfo_path(&self) -> PathBuf {
        self.config.proc_root.join(PROC_CPU_INFO_NAME)
    }

    /// `<proc>/cmdline`
    #[must_use]
    pub fn kernel_cmdline_path(&self) -> PathBuf {
        self.config.proc_root.join(KERNEL_CMDLINE_FILE_NAME)
    }

    /// `<sys>/devices/system/cpu/smt/active`
    #[must_use]
    pub fn smt_active_path(&self) -> PathBuf {
        self.config.sys_root.join(SYS_CPU_SMT_ACTIVE_SUB_PATH)
    }

    /// `<sys>/devices/system/cpu/intel_pstate/no_turbo`
    #[must_use]
    pub fn intel_pstate_no_turbo_path(&self) -> PathBuf {
        self.config.sys_root.join(SYS_INTEL_PSTATE_NO_TURBO_SUB_PATH)
    }

    /// `<sys>/bus/pci/devices`
    #[must_use]
    pub fn pci_device_dir(&self) -> PathBuf {
        self.config.sys_root.join(SYS_PCI_DEVICE_DIR)
    }

    /// `<proc>/sys/<name>`, the control file of a sysctl
    #[must_use]
    pub fn proc_sys_file_path(&self, name: &str) -> PathBuf {
        self.config
            .proc_root
            .join(SYSCTL_SUB_DIR)
            .join(relative(name))
    }

    fn numa_node_dir(&self, node: &str) -> PathBuf {
        self.sys_numa_dir().join(relative(node))
    }
}

// `Path::join` replaces the base when handed an absolute path.
fn relative(suffix: &str) -> &str {
    suffix.trim_start_matches('/')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> PathResolver {
        PathResolver::new(
            RootConfig::new()
                .with_sys_root("/host/sys")
                .with_proc_root("/host/proc"),
        )
    }

    #[test]
    fn test_sysctl_path() {
        assert_eq!(
            resolver().proc_sys_file_path("kernel/sched_core"),
            PathBuf::from("/host/proc/sys/kernel/sched_core")
        );
    }

    #[test]
    fn test_leading_slash_stays_under_root() {
        assert_eq!(
            resolver().proc_sys_file_path("/kernel/sched_core"),
            PathBuf::from("/host/proc/sys/kernel/sched_core")
        );
        assert_eq!(
            resolver().numa_meminfo_path("/node0"),
            PathBuf::from("/host/sys/bus/node/devices/node0/meminfo")
        );
    }

    #[test]
    fn test_numa_paths() {
        let r = resolver();
        assert_eq!(r.sys_numa_dir(), PathBuf::from("/host/sys/bus/node/devices"));
        assert_eq!(
            r.numa_hugepages_dir("node1"),
            PathBuf::from("/host/sys/bus/node/devices/node1/hugepages")
        );
        assert_eq!(
            r.numa_hugepages_nr_path("node1", "hugepages-2048kB"),
            PathBuf::from("/host/sys/bus/node/devices/node1/hugepages/hugepages-2048kB/nr_hugepages")
        );
    }

    #[test]
    fn test_fixed_paths() {
        let r = resolver();
        assert_eq!(r.cpuinfo_path(), PathBuf::from("/host/proc/cpuinfo"));
        assert_eq!(r.kernel_cmdline_path(), PathBuf::from("/host/proc/cmdline"));
        assert_eq!(
            r.smt_active_path(),
            PathBuf::from("/host/sys/devices/system/cpu/smt/active")
        );
        assert_eq!(
            r.intel_pstate_no_turbo_path(),
            PathBuf::from("/host/sys/devices/system/cpu/intel_pstate/no_turbo")
        );
        assert_eq!(r.pci_device_dir(), PathBuf::from("/host/sys/bus/pci/devices"));
    }

    #[test]
    fn test_default_roots() {
        let r = PathResolver::default();
        assert_eq!(r.sys_root(), Path::new("/sys"));
        assert_eq!(r.proc_root(), Path::new("/proc"));
    }
}
