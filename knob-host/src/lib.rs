//! Host characteristics discovered once at startup
//!
//! - [`jiffies`] - the kernel's clock tick duration, used to turn CPU
//!   accounting ticks into wall-clock time
//! - [`cache`] - normalizing `lscpu` cache descriptors
//! - [`topology`] - the per-CPU `lscpu` table built on top of it

#![warn(missing_docs, clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::missing_panics_doc)]

pub mod cache;
pub mod jiffies;
pub mod topology;

pub use cache::{CacheInfo, get_cache_info};
pub use jiffies::{
    JiffyCalibrator, Jiffies, get_period_ticks, host_jiffies, init_host_jiffies,
};
pub use topology::{CpuInfo, LscpuTopology, parse_cpu_table};
