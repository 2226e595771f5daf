use anyhow::{Context, Result};
use knob_core::{PathResolver, RootConfig};

use crate::cli::{Cli, Commands, RootArgs};

pub mod cache;
pub mod feature;
pub mod jiffies;
pub mod paths;
pub mod sysctl;
pub mod topology;

/// Dispatch command to appropriate handler
pub async fn dispatch(cli: Cli) -> Result<()> {
    // Roots are fixed from here on
    let resolver = PathResolver::new(root_config(&cli.roots)?);

    match cli.command {
        Commands::Sysctl { action } => sysctl::execute(resolver, action),

        Commands::Feature { action } => feature::execute(resolver, action),

        Commands::Jiffies { timeout_ms } => {
            jiffies::execute(std::time::Duration::from_millis(timeout_ms)).await
        }

        Commands::Cache { descriptor, json } => cache::execute(&descriptor, json),

        Commands::Topology { input, json } => topology::execute(input, json).await,

        Commands::Paths => {
            paths::execute(&resolver);
            Ok(())
        }

        Commands::Version => {
            print_version();
            Ok(())
        }
    }
}

/// Defaults, then the config file, then explicit flags
fn root_config(args: &RootArgs) -> Result<RootConfig> {
    let mut config = match &args.config {
        Some(file) => RootConfig::from_json_file(file)
            .with_context(|| format!("Failed to load config {}", file.display()))?,
        None => RootConfig::default(),
    };

    if let Some(sys_root) = &args.sys_root {
        config = config.with_sys_root(sys_root);
    }
    if let Some(proc_root) = &args.proc_root {
        config = config.with_proc_root(proc_root);
    }

    tracing::debug!(
        sys_root = %config.sys_root.display(),
        proc_root = %config.proc_root.display(),
        "Using roots"
    );

    Ok(config)
}

fn print_version() {
    println!("knob {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("Features:");
    println!("  • Integer sysctl get/set");
    println!("  • Idempotent scheduler feature toggles (group-identity, core-sched)");
    println!("  • Clock tick calibration");
    println!("  • lscpu cache topology parsing");
}
