//! Jiffies command implementation
//!
//! Runs the calibration command asynchronously so it can be bounded by a
//! timeout; the child is killed if it does not answer in time.

use anyhow::Result;
use knob_core::Error;
use knob_host::{JiffyCalibrator, Jiffies};
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;

pub async fn execute(limit: Duration) -> Result<()> {
    let (jiffies, calibrated) = calibrate(&JiffyCalibrator::new(), limit).await;

    let tick = jiffies.as_duration();
    println!("Clock tick:  {tick:?}");
    println!("Frequency:   {} Hz", Duration::from_secs(1).as_nanos() / tick.as_nanos());
    println!(
        "Source:      {}",
        if calibrated { "getconf CLK_TCK" } else { "default" }
    );

    Ok(())
}

/// Returns the tick and whether it came from the host rather than the default
pub async fn calibrate(calibrator: &JiffyCalibrator, limit: Duration) -> (Jiffies, bool) {
    let mut command = Command::from(calibrator.command());
    command.kill_on_drop(true);

    let result = match timeout(limit, command.output()).await {
        Ok(output) => calibrator.parse_output(output),
        Err(_) => Err(Error::Calibration {
            message: format!("{} timed out after {:?}", calibrator.program(), limit),
        }),
    };

    let calibrated = result.is_ok();
    (JiffyCalibrator::or_default(result), calibrated)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_calibrate_parses_output() {
        let calibrator = JiffyCalibrator::with_command("echo", ["1000"]);
        let (jiffies, calibrated) = calibrate(&calibrator, Duration::from_secs(5)).await;

        assert!(calibrated);
        assert_eq!(jiffies.as_duration(), Duration::from_millis(1));
    }

    #[tokio::test]
    async fn test_calibrate_fractional_output() {
        let calibrator = JiffyCalibrator::with_command("echo", ["250.0"]);
        let (jiffies, calibrated) = calibrate(&calibrator, Duration::from_secs(5)).await;

        assert!(calibrated);
        assert_eq!(jiffies.as_duration(), Duration::from_millis(4));
    }

    #[tokio::test]
    async fn test_calibrate_unparsable_output() {
        let calibrator = JiffyCalibrator::with_command("echo", ["undefined"]);
        let (jiffies, calibrated) = calibrate(&calibrator, Duration::from_secs(5)).await;

        assert!(!calibrated);
        assert_eq!(jiffies, Jiffies::DEFAULT);
    }

    #[tokio::test]
    async fn test_calibrate_times_out() {
        let calibrator = JiffyCalibrator::with_command("sleep", ["10"]);
        let (jiffies, calibrated) = calibrate(&calibrator, Duration::from_millis(100)).await;

        assert!(!calibrated);
        assert_eq!(jiffies, Jiffies::DEFAULT);
    }

    #[tokio::test]
    async fn test_calibrate_missing_command() {
        let calibrator = JiffyCalibrator::with_command("knob-no-such-getconf", ["CLK_TCK"]);
        let (jiffies, calibrated) = calibrate(&calibrator, Duration::from_secs(5)).await;

        assert!(!calibrated);
        assert_eq!(jiffies, Jiffies::DEFAULT);
    }
}
