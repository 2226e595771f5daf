//! Sysctl backend reading and writing files under `<proc>/sys`

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::os::unix::fs::OpenOptionsExt;
use std::path::PathBuf;

use knob_core::{Error, PathResolver, Result};
use nix::sys::stat::Mode;
use tracing::{debug, trace};

use crate::backend::Sysctl;

/// Production sysctl backend
///
/// Each call is one blocking read or write of the resolved control file;
/// nothing is cached and nothing is retried.
#[derive(Debug, Clone, Default)]
pub struct ProcSysctl {
    paths: PathResolver,
}

impl ProcSysctl {
    /// Create a backend resolving names with `paths`
    #[must_use]
    pub const fn new(paths: PathResolver) -> Self {
        Self { paths }
    }

    /// Control file backing `name`
    #[must_use]
    pub fn path(&self, name: &str) -> PathBuf {
        self.paths.proc_sys_file_path(name)
    }

    /// Owner read-write, group read, nothing for others
    fn file_mode() -> u32 {
        (Mode::S_IRUSR | Mode::S_IWUSR | Mode::S_IRGRP).bits()
    }
}

impl Sysctl for ProcSysctl {
    fn get(&self, name: &str) -> Result<i64> {
        let path = self.path(name);
        let content = fs::read_to_string(&path)?;
        let trimmed = content.trim_matches(|c: char| c == ' ' || c == '\n');

        let value = trimmed.parse::<i64>().map_err(|source| Error::Parse {
            name: name.to_string(),
            value: trimmed.to_string(),
            source,
        })?;

        trace!(name, value, path = %path.display(), "Read sysctl");

        Ok(value)
    }

    fn set(&self, name: &str, value: i64) -> Result<()> {
        let path = self.path(name);

        debug!(name, value, path = %path.display(), "Writing sysctl");

        // Mode only applies if the file gets created; procfs entries keep theirs
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(Self::file_mode())
            .open(&path)?;
        file.write_all(value.to_string().as_bytes())?;

        Ok(())
    }

    fn exists(&self, name: &str) -> bool {
        self.path(name).exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use knob_core::RootConfig;
    use std::os::unix::fs::PermissionsExt;

    fn fake_proc() -> (tempfile::TempDir, ProcSysctl) {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("sys/kernel")).unwrap();
        let sysctl = ProcSysctl::new(PathResolver::new(
            RootConfig::new().with_proc_root(dir.path()),
        ));
        (dir, sysctl)
    }

    #[test]
    fn test_get_trims_newline() {
        let (dir, sysctl) = fake_proc();
        fs::write(dir.path().join("sys/kernel/sched_core"), "1\n").unwrap();

        assert_eq!(sysctl.get("kernel/sched_core").unwrap(), 1);
    }

    #[test]
    fn test_get_signed() {
        let (dir, sysctl) = fake_proc();
        fs::write(dir.path().join("sys/kernel/perf_event_paranoid"), " -1 \n").unwrap();

        assert_eq!(sysctl.get("kernel/perf_event_paranoid").unwrap(), -1);
    }

    #[test]
    fn test_get_not_integer() {
        let (dir, sysctl) = fake_proc();
        fs::write(dir.path().join("sys/kernel/sched_core"), "on\n").unwrap();

        let err = sysctl.get("kernel/sched_core").unwrap_err();
        match err {
            Error::Parse { name, value, .. } => {
                assert_eq!(name, "kernel/sched_core");
                assert_eq!(value, "on");
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_get_missing() {
        let (_dir, sysctl) = fake_proc();

        let err = sysctl.get("kernel/sched_core").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_set_writes_without_newline() {
        let (dir, sysctl) = fake_proc();
        let file = dir.path().join("sys/kernel/sched_core");
        fs::write(&file, "0\n").unwrap();

        sysctl.set("kernel/sched_core", 1).unwrap();
        assert_eq!(fs::read_to_string(&file).unwrap(), "1");
    }

    #[test]
    fn test_set_creates_with_restricted_mode() {
        let (dir, sysctl) = fake_proc();

        sysctl.set("kernel/new_knob", 42).unwrap();

        let meta = fs::metadata(dir.path().join("sys/kernel/new_knob")).unwrap();
        // umask can only clear bits, never add world access
        assert_eq!(meta.permissions().mode() & 0o007, 0);
        assert_eq!(meta.permissions().mode() & 0o111, 0);
    }

    #[test]
    fn test_set_missing_directory() {
        let (_dir, sysctl) = fake_proc();

        let err = sysctl.set("net/core/somaxconn", 1024).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_exists() {
        let (dir, sysctl) = fake_proc();
        fs::write(dir.path().join("sys/kernel/sched_core"), "0").unwrap();

        assert!(sysctl.exists("kernel/sched_core"));
        assert!(!sysctl.exists("kernel/sched_group_identity_enabled"));
    }
}
