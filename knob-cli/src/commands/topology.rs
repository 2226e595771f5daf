//! Topology command implementation

use anyhow::{Context, Result};
use knob_host::{CpuInfo, LscpuTopology, parse_cpu_table};
use std::path::PathBuf;

pub async fn execute(input: Option<PathBuf>, json: bool) -> Result<()> {
    let cpus = match input {
        Some(file) => {
            let content = tokio::fs::read_to_string(&file)
                .await
                .with_context(|| format!("Failed to read {}", file.display()))?;
            parse_cpu_table(&content)?
        }
        None => tokio::task::spawn_blocking(|| LscpuTopology::new().discover())
            .await
            .context("Topology task panicked")?
            .context("Failed to run lscpu")?,
    };

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&cpus).context("Failed to encode topology")?
        );
    } else {
        print_table(&cpus);
    }

    Ok(())
}

fn print_table(cpus: &[CpuInfo]) {
    println!(
        "{:>4} {:>5} {:>7} {:>5} {:>6} {:>4} {:>7}",
        "CPU", "NODE", "SOCKET", "CORE", "L1/L2", "L3", "ONLINE"
    );
    println!("{:-<44}", "");
    for cpu in cpus {
        println!(
            "{:>4} {:>5} {:>7} {:>5} {:>6} {:>4} {:>7}",
            cpu.cpu,
            cpu.node,
            cpu.socket,
            cpu.core,
            cpu.cache.l1l2_id,
            cpu.cache.l3_id,
            if cpu.online { "yes" } else { "no" }
        );
    }
}
