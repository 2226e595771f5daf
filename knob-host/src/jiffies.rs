//! Clock tick ("jiffy") calibration
//!
//! The tick duration is asked from `getconf CLK_TCK` once at startup. When
//! that fails for any reason the host is assumed to run at 100 Hz.

use std::io;
use std::process::{Command, Output};
use std::sync::OnceLock;
use std::time::{Duration, Instant};

use knob_core::{Error, Result};
use tracing::debug;

/// Process-wide calibrated tick, written at most once
static HOST_JIFFIES: OnceLock<Jiffies> = OnceLock::new();

/// Duration of one kernel clock tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Jiffies(Duration);

impl Jiffies {
    /// 10ms, the tick of a 100 Hz kernel
    pub const DEFAULT: Self = Self(Duration::from_millis(10));

    /// Tick duration for a clock running at `ticks` per second
    ///
    /// # Errors
    /// Returns error if `ticks` is zero
    pub fn from_ticks_per_second(ticks: u64) -> Result<Self> {
        if ticks == 0 {
            return Err(Error::Calibration {
                message: "clock reports zero ticks per second".to_string(),
            });
        }

        let nanos = 1_000_000_000 / ticks;
        if nanos == 0 {
            return Err(Error::Calibration {
                message: format!("{ticks} ticks per second is below nanosecond resolution"),
            });
        }

        Ok(Self(Duration::from_nanos(nanos)))
    }

    /// Parse the output of `getconf CLK_TCK`: one decimal number
    ///
    /// Fractional rates are truncated to whole ticks per second.
    ///
    /// # Errors
    /// Returns error if the trimmed output is not a number of at least one
    /// tick per second
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn from_clk_tck_output(output: &str) -> Result<Self> {
        let trimmed = output.trim();
        let ticks = trimmed.parse::<f64>().map_err(|e| Error::Calibration {
            message: format!("unexpected CLK_TCK output {trimmed:?}: {e}"),
        })?;

        if !ticks.is_finite() || ticks < 0.0 {
            return Err(Error::Calibration {
                message: format!("unexpected CLK_TCK output {trimmed:?}"),
            });
        }

        // Saturating cast; zero is rejected below
        Self::from_ticks_per_second(ticks.trunc() as u64)
    }

    /// Length of one tick
    #[must_use]
    pub const fn as_duration(self) -> Duration {
        self.0
    }

    /// Ticks elapsed between `start` and `end`
    ///
    /// Negative when `end` precedes `start`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn period_ticks(self, start: Instant, end: Instant) -> f64 {
        let tick = self.0.as_nanos() as f64;

        match end.checked_duration_since(start) {
            Some(elapsed) => elapsed.as_nanos() as f64 / tick,
            None => -(start.duration_since(end).as_nanos() as f64) / tick,
        }
    }
}

impl Default for Jiffies {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Runs the host command that reports ticks per second
#[derive(Debug, Clone)]
pub struct JiffyCalibrator {
    program: String,
    args: Vec<String>,
}

impl Default for JiffyCalibrator {
    fn default() -> Self {
        Self {
            program: "getconf".to_string(),
            args: vec!["CLK_TCK".to_string()],
        }
    }
}

impl JiffyCalibrator {
    /// Calibrator running `getconf CLK_TCK`
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Calibrator running an arbitrary command instead
    #[must_use]
    pub fn with_command<I, A>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Program that will be executed
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments passed to the program
    #[must_use]
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// The calibration command, ready to spawn
    ///
    /// Callers that need a timeout can convert it into an async command and
    /// hand the result to [`parse_output`](Self::parse_output).
    #[must_use]
    pub fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        command
    }

    /// Interpret the result of running [`command`](Self::command)
    ///
    /// # Errors
    /// Returns error if the command could not be run, exited unsuccessfully,
    /// or printed anything but a tick rate
    pub fn parse_output(&self, output: io::Result<Output>) -> Result<Jiffies> {
        let output = output.map_err(|e| Error::Calibration {
            message: format!("cannot run {}: {}", self.program, e),
        })?;

        if !output.status.success() {
            return Err(Error::Calibration {
                message: format!("{} exited with {}", self.program, output.status),
            });
        }

        Jiffies::from_clk_tck_output(&String::from_utf8_lossy(&output.stdout))
    }

    /// Run the command and parse its output
    ///
    /// Blocks until the command exits; no timeout is applied.
    ///
    /// # Errors
    /// See [`parse_output`](Self::parse_output)
    pub fn try_calibrate(&self) -> Result<Jiffies> {
        self.parse_output(self.command().output())
    }

    /// Like [`try_calibrate`](Self::try_calibrate), falling back to
    /// [`Jiffies::DEFAULT`] on any failure
    #[must_use]
    pub fn calibrate(&self) -> Jiffies {
        Self::or_default(self.try_calibrate())
    }

    /// Resolve a calibration attempt, falling back to [`Jiffies::DEFAULT`]
    ///
    /// The failure is logged and never returned.
    #[must_use]
    pub fn or_default(result: Result<Jiffies>) -> Jiffies {
        match result {
            Ok(jiffies) => {
                debug!(tick = ?jiffies.as_duration(), "Calibrated clock tick");
                jiffies
            }
            Err(e) => {
                debug!(error = %e, "Clock tick calibration failed, using default");
                Jiffies::DEFAULT
            }
        }
    }
}

/// Install the process-wide tick duration
///
/// Must run before any concurrent reader starts. Only the first call takes
/// effect; returns `false` if a value was already installed.
pub fn init_host_jiffies(jiffies: Jiffies) -> bool {
    let installed = HOST_JIFFIES.set(jiffies).is_ok();
    if !installed {
        debug!("Host jiffies already initialized, ignoring");
    }
    installed
}

/// The installed tick duration, or [`Jiffies::DEFAULT`] if none was
#[must_use]
pub fn host_jiffies() -> Jiffies {
    HOST_JIFFIES.get().copied().unwrap_or_default()
}

/// Ticks elapsed between `start` and `end` at the host tick rate
#[must_use]
pub fn get_period_ticks(start: Instant, end: Instant) -> f64 {
    host_jiffies().period_ticks(start, end)
}
