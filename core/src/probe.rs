use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, warn};

use mtune_common::config::Config;
use mtune_common::probing::Prober;

/// Destination the echo probes are sent to.
pub const PROBE_HOST: &str = "google.com";
/// Echo requests per probe; the ping facility decides the aggregate verdict.
pub const PROBE_COUNT: u32 = 3;
/// IP (20) plus ICMP (8) header bytes on top of the echo payload.
const HEADER_OVERHEAD: u32 = 28;

/// Probes reachability by shelling out to the system `ping` with
/// fragmentation disabled, so a probe fails exactly when the candidate
/// exceeds the path's real MTU.
pub struct PingProber {
    host: String,
    timeout: Duration,
}

impl PingProber {
    pub fn new(cfg: &Config) -> Self {
        Self {
            host: PROBE_HOST.to_string(),
            timeout: cfg.probe_timeout,
        }
    }
}

/// Echo payload carrying a candidate MTU on the wire.
fn payload_for(mtu: u32) -> u32 {
    mtu.saturating_sub(HEADER_OVERHEAD)
}

#[async_trait]
impl Prober for PingProber {
    async fn probe(&self, mtu: u32) -> bool {
        let payload = payload_for(mtu);
        let mut cmd = platform::ping(&self.host, payload, self.timeout);
        cmd.stdout(Stdio::null()).stderr(Stdio::null());
        debug!("probing {} with a {payload}-byte payload", self.host);
        match cmd.status().await {
            Ok(status) => status.success(),
            Err(err) => {
                warn!("could not run ping: {err}");
                false
            }
        }
    }
}

#[cfg(target_os = "linux")]
mod platform {
    use super::*;

    pub fn ping(host: &str, payload: u32, timeout: Duration) -> Command {
        let mut cmd = Command::new("ping");
        cmd.arg("-c")
            .arg(PROBE_COUNT.to_string())
            .arg("-W")
            .arg(timeout.as_secs().to_string())
            .arg("-M")
            .arg("do")
            .arg("-s")
            .arg(payload.to_string())
            .arg(host);
        cmd
    }
}

#[cfg(target_os = "macos")]
mod platform {
    use super::*;

    // BSD ping has no `-M do`; oversized non-fragmenting probes still fail.
    pub fn ping(host: &str, payload: u32, timeout: Duration) -> Command {
        let mut cmd = Command::new("ping");
        cmd.arg("-c")
            .arg(PROBE_COUNT.to_string())
            .arg("-W")
            .arg(timeout.as_secs().to_string())
            .arg("-s")
            .arg(payload.to_string())
            .arg(host);
        cmd
    }
}
