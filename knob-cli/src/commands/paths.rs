//! Paths command implementation

use knob_core::{KernelFeature, PathResolver};

pub fn execute(paths: &PathResolver) {
    println!("{:<24} {}", "sys root", paths.sys_root().display());
    println!("{:<24} {}", "proc root", paths.proc_root().display());
    println!("{:-<60}", "");
    println!("{:<24} {}", "numa nodes", paths.sys_numa_dir().display());
    println!("{:<24} {}", "pci devices", paths.pci_device_dir().display());
    println!("{:<24} {}", "cpuinfo", paths.cpuinfo_path().display());
    println!("{:<24} {}", "kernel cmdline", paths.kernel_cmdline_path().display());
    println!("{:<24} {}", "smt active", paths.smt_active_path().display());
    println!(
        "{:<24} {}",
        "intel pstate no_turbo",
        paths.intel_pstate_no_turbo_path().display()
    );
    for feature in KernelFeature::ALL {
        println!(
            "{:<24} {}",
            feature.as_str(),
            paths.proc_sys_file_path(feature.sysctl()).display()
        );
    }
}
