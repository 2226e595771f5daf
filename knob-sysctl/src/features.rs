//! Idempotent enable/disable of binary kernel scheduling features
//!
//! # Concurrency
//!
//! [`FeatureToggle::set_enabled`] is a read-then-write with no locking. It is
//! only correct while a single writer owns each feature; deployments
//! designate one agent process as that writer. Other writers (or the kernel
//! itself) racing with it make the last write win.

use knob_core::{Error, FeatureAction, FeatureState, KernelFeature, Result};
use serde::Serialize;
use tracing::{debug, info};

use crate::backend::Sysctl;

/// Snapshot of one feature, as reported by [`FeatureToggle::status`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeatureStatus {
    /// Which feature
    pub feature: KernelFeature,

    /// Whether the kernel exposes the tunable
    pub supported: bool,

    /// Current state, `None` if unsupported or unreadable
    pub state: Option<FeatureState>,
}

/// Enable/disable semantics for [`KernelFeature`]s on top of a [`Sysctl`]
///
/// # Example
/// ```
/// use knob_sysctl::{FeatureToggle, KernelFeature, MockSysctl};
///
/// let sysctl = MockSysctl::new().with_value("kernel/sched_core", 0);
/// let toggle = FeatureToggle::new(sysctl.clone());
///
/// toggle.set_enabled(KernelFeature::SchedCore, true).unwrap();
/// toggle.set_enabled(KernelFeature::SchedCore, true).unwrap();
///
/// assert!(toggle.enabled(KernelFeature::SchedCore).unwrap());
/// assert_eq!(sysctl.write_count(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct FeatureToggle<S> {
    sysctl: S,
}

impl<S: Sysctl> FeatureToggle<S> {
    /// Wrap a sysctl backend
    pub const fn new(sysctl: S) -> Self {
        Self { sysctl }
    }

    /// The underlying backend
    pub const fn sysctl(&self) -> &S {
        &self.sysctl
    }

    /// Whether this kernel build exposes `feature` at all
    ///
    /// Only probes for the control file; never reads it.
    pub fn is_supported(&self, feature: KernelFeature) -> bool {
        self.sysctl.exists(feature.sysctl())
    }

    /// Current state of `feature`
    ///
    /// `1` reads as enabled and every other value as disabled.
    ///
    /// # Errors
    /// Returns `Error::Feature` with [`FeatureAction::Get`] wrapping the
    /// sysctl read or parse failure
    pub fn state(&self, feature: KernelFeature) -> Result<FeatureState> {
        let value = self
            .sysctl
            .get(feature.sysctl())
            .map_err(|e| wrap(feature, FeatureAction::Get, e))?;

        Ok(FeatureState::from_value(value))
    }

    /// Whether `feature` is currently enabled
    ///
    /// # Errors
    /// Same as [`state`](Self::state)
    pub fn enabled(&self, feature: KernelFeature) -> Result<bool> {
        self.state(feature).map(FeatureState::is_enabled)
    }

    /// Bring `feature` to the requested state
    ///
    /// Reads first and skips the write entirely when the kernel already
    /// holds the desired value, so repeated calls write at most once.
    ///
    /// # Errors
    /// Returns `Error::Feature` with [`FeatureAction::Get`] if the current
    /// value cannot be read, or [`FeatureAction::Set`] if the write fails
    pub fn set_enabled(&self, feature: KernelFeature, enable: bool) -> Result<()> {
        let current = self
            .sysctl
            .get(feature.sysctl())
            .map_err(|e| wrap(feature, FeatureAction::Get, e))?;

        let desired = FeatureState::from(enable);
        if current == desired.as_value() {
            debug!(%feature, state = %desired, "Sysctl already in desired state, skipping");
            return Ok(());
        }

        self.sysctl
            .set(feature.sysctl(), desired.as_value())
            .map_err(|e| wrap(feature, FeatureAction::Set, e))?;

        info!(%feature, from = current, to = desired.as_value(), "Kernel feature switched");

        Ok(())
    }

    /// Support and state of every known feature
    ///
    /// Read failures on supported features are logged and reported as an
    /// unknown state rather than aborting the whole report.
    pub fn status(&self) -> Vec<FeatureStatus> {
        KernelFeature::ALL
            .into_iter()
            .map(|feature| {
                let supported = self.is_supported(feature);
                let state = if supported {
                    match self.state(feature) {
                        Ok(state) => Some(state),
                        Err(e) => {
                            debug!(%feature, error = %e, "Could not read feature state");
                            None
                        }
                    }
                } else {
                    None
                };

                FeatureStatus {
                    feature,
                    supported,
                    state,
                }
            })
            .collect()
    }
}

fn wrap(feature: KernelFeature, action: FeatureAction, source: Error) -> Error {
    Error::Feature {
        feature: feature.to_string(),
        action,
        source: Box::new(source),
    }
}
