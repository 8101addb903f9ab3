use std::process::Stdio;

use anyhow::{Context, Result, ensure};
use async_trait::async_trait;
use pnet::datalink::{self, NetworkInterface};
use tracing::debug;

use mtune_common::system::LinkRepository;

/// OS-backed implementation of the link port.
///
/// Interface enumeration goes through `pnet`; the MTU itself is read from
/// the platform's native source and written through its standard link
/// configuration command. Writes last as long as the link does: recreating
/// the interface (e.g. reconnecting the VPN) resets the value.
pub struct OsLinkRepo;

#[async_trait]
impl LinkRepository for OsLinkRepo {
    fn interfaces(&self) -> Vec<NetworkInterface> {
        datalink::interfaces()
    }

    async fn read_mtu(&self, iface: &str) -> Result<u32> {
        platform::read_mtu(iface).await
    }

    async fn write_mtu(&self, iface: &str, mtu: u32) -> Result<()> {
        platform::write_mtu(iface, mtu).await
    }
}

/// Runs a link configuration command, discarding output. A non-zero exit is
/// an error; so is a missing binary.
async fn run_link_command(program: &str, args: &[&str]) -> Result<()> {
    debug!("running {program} {}", args.join(" "));
    let status = tokio::process::Command::new(program)
        .args(args)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .await
        .with_context(|| format!("failed to run {program}"))?;
    ensure!(status.success(), "{program} exited with {status}");
    Ok(())
}

#[cfg(target_os = "linux")]
mod platform {
    use super::*;

    pub async fn read_mtu(iface: &str) -> Result<u32> {
        let path = format!("/sys/class/net/{iface}/mtu");
        let raw = tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("reading {path}"))?;
        parse_mtu(&raw).with_context(|| format!("unexpected contents in {path}"))
    }

    pub async fn write_mtu(iface: &str, mtu: u32) -> Result<()> {
        run_link_command("ip", &["link", "set", "dev", iface, "mtu", &mtu.to_string()]).await
    }

    pub(super) fn parse_mtu(raw: &str) -> Result<u32> {
        Ok(raw.trim().parse()?)
    }
}

#[cfg(target_os = "macos")]
mod platform {
    use super::*;

    pub async fn read_mtu(iface: &str) -> Result<u32> {
        let output = tokio::process::Command::new("ifconfig")
            .arg(iface)
            .output()
            .await
            .context("failed to run ifconfig")?;
        ensure!(
            output.status.success(),
            "ifconfig {iface} exited with {}",
            output.status
        );
        let stdout = String::from_utf8_lossy(&output.stdout);
        parse_ifconfig_mtu(&stdout)
            .with_context(|| format!("no mtu field in ifconfig output for {iface}"))
    }

    pub async fn write_mtu(iface: &str, mtu: u32) -> Result<()> {
        run_link_command("ifconfig", &[iface, "mtu", &mtu.to_string()]).await
    }

    pub(super) fn parse_ifconfig_mtu(output: &str) -> Option<u32> {
        output
            .split_whitespace()
            .skip_while(|token| *token != "mtu")
            .nth(1)?
            .parse()
            .ok()
    }
}
