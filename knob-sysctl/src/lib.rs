//! Integer sysctl access with pluggable backends
//!
//! This crate provides a trait-based abstraction over the kernel's sysctl
//! tree, a production implementation backed by files under `<proc>/sys`, an
//! in-memory implementation for tests, and idempotent enable/disable
//! semantics for binary scheduling features layered on top.

#![warn(missing_docs, clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::missing_panics_doc)]

pub mod backend;
pub mod features;
pub mod procfs;

pub use backend::{MockSysctl, Sysctl};
pub use features::{FeatureStatus, FeatureToggle};
pub use procfs::ProcSysctl;

// Re-export commonly used types
pub use knob_core::{FeatureState, KernelFeature};
