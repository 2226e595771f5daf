//! Feature command implementation

use anyhow::Result;
use knob_core::PathResolver;
use knob_sysctl::{FeatureToggle, ProcSysctl};

use crate::cli::FeatureAction;

pub fn execute(paths: PathResolver, action: FeatureAction) -> Result<()> {
    let toggle = FeatureToggle::new(ProcSysctl::new(paths));

    match action {
        FeatureAction::Status => {
            println!("{:<16} {:<10} STATE", "FEATURE", "SUPPORTED");
            for status in toggle.status() {
                let state = status
                    .state
                    .map_or_else(|| "-".to_string(), |s| s.to_string());
                let supported = if status.supported { "yes" } else { "no" };
                println!("{:<16} {:<10} {}", status.feature, supported, state);
            }
        }
        FeatureAction::Enable { feature } => {
            toggle.set_enabled(feature, true)?;
            println!("{feature}: enabled");
        }
        FeatureAction::Disable { feature } => {
            toggle.set_enabled(feature, false)?;
            println!("{feature}: disabled");
        }
    }

    Ok(())
}
