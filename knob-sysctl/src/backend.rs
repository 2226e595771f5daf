//! Sysctl backend trait for pluggable implementations

use std::collections::HashMap;
use std::io;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use knob_core::Result;

/// Read and write access to integer-valued kernel tunables
///
/// Implementations:
/// - [`ProcSysctl`](crate::ProcSysctl) - files under `<proc>/sys`
/// - [`MockSysctl`] - in-memory table for tests
///
/// Values are never cached: every `get` reflects the live state and every
/// `set` performs exactly one write.
pub trait Sysctl: Send + Sync {
    /// Read the current value of `name`
    ///
    /// # Errors
    /// Returns `Error::Io` if the tunable cannot be read and `Error::Parse`
    /// if its content is not a base-10 integer
    fn get(&self, name: &str) -> Result<i64>;

    /// Write `value` to `name`
    ///
    /// # Errors
    /// Returns `Error::Io` on any write failure
    fn set(&self, name: &str, value: i64) -> Result<()>;

    /// Whether `name` exists on this kernel
    ///
    /// Absence is an answer, not a failure.
    fn exists(&self, name: &str) -> bool;
}

impl<S: Sysctl + ?Sized> Sysctl for Arc<S> {
    fn get(&self, name: &str) -> Result<i64> {
        (**self).get(name)
    }

    fn set(&self, name: &str, value: i64) -> Result<()> {
        (**self).set(name, value)
    }

    fn exists(&self, name: &str) -> bool {
        (**self).exists(name)
    }
}

/// Mock sysctl table for testing (doesn't touch the filesystem)
///
/// # Example
/// ```
/// use knob_sysctl::{MockSysctl, Sysctl};
///
/// let sysctl = MockSysctl::new().with_value("kernel/sched_core", 0);
///
/// sysctl.set("kernel/sched_core", 1).unwrap();
/// assert_eq!(sysctl.get("kernel/sched_core").unwrap(), 1);
/// assert_eq!(sysctl.write_count(), 1);
/// ```
#[derive(Clone, Default)]
pub struct MockSysctl {
    state: Arc<Mutex<MockState>>,
}

#[derive(Default)]
struct MockState {
    values: HashMap<String, i64>,
    reads: usize,
    writes: usize,
    read_only: bool,
}

impl MockSysctl {
    /// Create an empty table
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a tunable (not counted as a write)
    #[must_use]
    pub fn with_value(self, name: impl Into<String>, value: i64) -> Self {
        self.lock().values.insert(name.into(), value);
        self
    }

    /// Reject every write with `PermissionDenied`, like a read-only mount
    #[must_use]
    pub fn read_only(self) -> Self {
        self.lock().read_only = true;
        self
    }

    /// Current raw value of a tunable, bypassing the counters
    #[must_use]
    pub fn value(&self, name: &str) -> Option<i64> {
        self.lock().values.get(name).copied()
    }

    /// Number of `get` calls made
    #[must_use]
    pub fn read_count(&self) -> usize {
        self.lock().reads
    }

    /// Number of `set` calls that reached the table
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.lock().writes
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for MockSysctl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockSysctl").finish_non_exhaustive()
    }
}

impl Sysctl for MockSysctl {
    fn get(&self, name: &str) -> Result<i64> {
        let mut state = self.lock();
        state.reads += 1;

        let value = state
            .values
            .get(name)
            .copied()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, name.to_string()))?;

        tracing::trace!(name, value, "Mock: Read sysctl");

        Ok(value)
    }

    fn set(&self, name: &str, value: i64) -> Result<()> {
        let mut state = self.lock();

        if state.read_only {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, name.to_string()).into());
        }

        // The kernel only accepts writes to tunables it already exposes
        let slot = state
            .values
            .get_mut(name)
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, name.to_string()))?;
        *slot = value;
        state.writes += 1;

        tracing::debug!(name, value, "Mock: Wrote sysctl");

        Ok(())
    }

    fn exists(&self, name: &str) -> bool {
        self.lock().values.contains_key(name)
    }
}
