//! Sysctl command implementation

use anyhow::{Context, Result};
use knob_core::PathResolver;
use knob_sysctl::{ProcSysctl, Sysctl};

use crate::cli::SysctlAction;

pub fn execute(paths: PathResolver, action: SysctlAction) -> Result<()> {
    let sysctl = ProcSysctl::new(paths);

    match action {
        SysctlAction::Get { name } => {
            let value = sysctl
                .get(&name)
                .with_context(|| format!("Failed to read {}", sysctl.path(&name).display()))?;
            println!("{value}");
        }
        SysctlAction::Set { name, value } => {
            tracing::info!(name = %name, value, "Setting sysctl");
            sysctl
                .set(&name, value)
                .with_context(|| format!("Failed to write {}", sysctl.path(&name).display()))?;
        }
    }

    Ok(())
}
