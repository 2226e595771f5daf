//! Knob Core - Foundation types, errors, and path resolution
//!
//! This crate provides the shared abstractions used by the sysctl, host and
//! CLI crates: the error type, the immutable root configuration and the pure
//! functions that turn it into control-file paths.

#![warn(missing_docs, clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod error;
pub mod paths;
pub mod types;

pub use config::RootConfig;
pub use error::{Error, FeatureAction, Result};
pub use paths::PathResolver;
pub use types::{FeatureState, KernelFeature};
