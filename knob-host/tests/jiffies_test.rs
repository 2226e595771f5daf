use std::time::{Duration, Instant};

use knob_host::*;

// The host tick is process-wide, so everything touching it lives in one test
#[test]
fn test_host_jiffies_init_once() {
    let start = Instant::now();
    let end = start + Duration::from_millis(100);

    // Before calibration the 100 Hz default applies
    assert_eq!(host_jiffies(), Jiffies::DEFAULT);
    assert!((get_period_ticks(start, end) - 10.0).abs() < f64::EPSILON);

    let calibrated = Jiffies::from_ticks_per_second(1000).unwrap();
    assert!(init_host_jiffies(calibrated));
    assert_eq!(host_jiffies(), calibrated);
    assert!((get_period_ticks(start, end) - 100.0).abs() < f64::EPSILON);

    // Later writers are ignored
    assert!(!init_host_jiffies(Jiffies::DEFAULT));
    assert_eq!(host_jiffies(), calibrated);
}

#[test]
fn test_calibration_never_fails() {
    // Whatever the host has, calibrate() yields a usable tick
    let jiffies = JiffyCalibrator::new().calibrate();
    assert!(jiffies.as_duration() > Duration::ZERO);
}
