//! Cache command implementation

use anyhow::{Context, Result};
use knob_host::CacheInfo;

pub fn execute(descriptor: &str, json: bool) -> Result<()> {
    let info = CacheInfo::parse(descriptor)?;

    if json {
        println!(
            "{}",
            serde_json::to_string(&info).context("Failed to encode cache info")?
        );
    } else {
        println!("L1/L2 id:  {}", info.l1l2_id);
        println!("L3 id:     {}", info.l3_id);
    }

    Ok(())
}
