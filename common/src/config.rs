use std::time::Duration;

use anyhow::ensure;

pub const DEFAULT_MIN_MTU: u32 = 1280;
pub const DEFAULT_MAX_MTU: u32 = 1500;
pub const DEFAULT_STEP: u32 = 10;
pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 5;

/// Tuning knobs for one optimization run.
///
/// The defaults reproduce the tool's historical behavior; every field can be
/// overridden from the command line.
#[derive(Debug, Clone)]
pub struct Config {
    /// Lower bound of the search range, inclusive.
    pub min_mtu: u32,
    /// Upper bound of the search range, inclusive.
    pub max_mtu: u32,
    /// Decrement between candidates in auto mode.
    pub step: u32,
    /// Attempts per candidate (probe and write each get their own budget).
    pub max_retries: u32,
    /// Timeout handed to the reachability probe.
    pub probe_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            min_mtu: DEFAULT_MIN_MTU,
            max_mtu: DEFAULT_MAX_MTU,
            step: DEFAULT_STEP,
            max_retries: DEFAULT_MAX_RETRIES,
            probe_timeout: Duration::from_secs(DEFAULT_PROBE_TIMEOUT_SECS),
        }
    }
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        ensure!(
            self.min_mtu <= self.max_mtu,
            "min MTU {} exceeds max MTU {}",
            self.min_mtu,
            self.max_mtu
        );
        ensure!(self.step >= 1, "step must be at least 1");
        ensure!(self.max_retries >= 1, "max retries must be at least 1");
        ensure!(
            self.probe_timeout >= Duration::from_secs(1),
            "probe timeout must be at least one second"
        );
        Ok(())
    }
}
