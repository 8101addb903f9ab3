pub mod optimize;

use std::time::Duration;

use clap::Parser;

use mtune_common::config::{self, Config};

/// Discovers a usable MTU for a VPN interface and applies it.
///
/// Auto mode (the default) probes downward from the interface's current MTU;
/// `--custom` asserts one specific value instead.
#[derive(Parser, Debug)]
#[command(name = "mtune", version, about = "VPN MTU optimization tool")]
pub struct CommandLine {
    /// Set one specific MTU value instead of searching
    #[arg(long, value_name = "MTU")]
    pub custom: Option<u32>,

    /// Interface to tune, skipping VPN interface detection
    #[arg(long, value_name = "NAME")]
    pub iface: Option<String>,

    /// Decrement between candidates in auto mode
    #[arg(long, default_value_t = config::DEFAULT_STEP)]
    pub step: u32,

    /// Lower bound of the search range
    #[arg(long, default_value_t = config::DEFAULT_MIN_MTU)]
    pub min_mtu: u32,

    /// Upper bound of the search range
    #[arg(long, default_value_t = config::DEFAULT_MAX_MTU)]
    pub max_mtu: u32,

    /// Attempts per candidate before giving up on it
    #[arg(long, default_value_t = config::DEFAULT_MAX_RETRIES)]
    pub max_retries: u32,

    /// Per-probe timeout in seconds
    #[arg(long, value_name = "SECS", default_value_t = config::DEFAULT_PROBE_TIMEOUT_SECS)]
    pub probe_timeout: u64,

    /// Suppress the startup banner
    #[arg(long)]
    pub no_banner: bool,
}

impl CommandLine {
    pub fn to_config(&self) -> Config {
        Config {
            min_mtu: self.min_mtu,
            max_mtu: self.max_mtu,
            step: self.step,
            max_retries: self.max_retries,
            probe_timeout: Duration::from_secs(self.probe_timeout),
        }
    }
}
