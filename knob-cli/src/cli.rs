//! CLI argument definitions

use clap::{Args, Parser, Subcommand};
use knob_core::KernelFeature;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "knob")]
#[command(about = "Inspect and tune Linux kernel scheduling controls", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub roots: RootArgs,

    #[command(subcommand)]
    pub command: Commands,
}

// Where procfs and sysfs live
#[derive(Args)]
pub struct RootArgs {
    /// JSON file with `sysRoot` / `procRoot`
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// sysfs mount point (overrides the config file)
    #[arg(long, global = true)]
    pub sys_root: Option<PathBuf>,

    /// procfs mount point (overrides the config file)
    #[arg(long, global = true)]
    pub proc_root: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Read or write an integer sysctl
    Sysctl {
        #[command(subcommand)]
        action: SysctlAction,
    },

    /// Inspect or switch kernel scheduling features
    Feature {
        #[command(subcommand)]
        action: FeatureAction,
    },

    /// Calibrate and print the kernel clock tick
    Jiffies {
        /// Give up on `getconf` after this many milliseconds
        #[arg(long, default_value = "2000")]
        timeout_ms: u64,
    },

    /// Parse one lscpu cache descriptor (e.g. 0:0:0:1)
    Cache {
        /// Descriptor from the CACHE column
        #[arg(allow_hyphen_values = true)]
        descriptor: String,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Show per-CPU topology from lscpu
    Topology {
        /// Parse saved `lscpu -e` output instead of running lscpu
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Print the resolved control-file paths
    Paths,

    /// Show version information
    Version,
}

#[derive(Subcommand)]
pub enum SysctlAction {
    /// Print the current value
    Get {
        /// Sysctl name, e.g. kernel/sched_core
        name: String,
    },

    /// Write a new value
    Set {
        /// Sysctl name, e.g. kernel/sched_core
        name: String,

        /// Integer value
        #[arg(allow_negative_numbers = true)]
        value: i64,
    },
}

#[derive(Subcommand)]
pub enum FeatureAction {
    /// Show support and state of every feature
    Status,

    /// Enable a feature (no write if already enabled)
    Enable {
        /// group-identity or core-sched
        feature: KernelFeature,
    },

    /// Disable a feature (no write if already disabled)
    Disable {
        /// group-identity or core-sched
        feature: KernelFeature,
    },
}
