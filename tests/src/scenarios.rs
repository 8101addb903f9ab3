//! Full-pipeline scenarios: detection, MTU read, engine run — everything a
//! real invocation does short of touching the OS, against a simulated host
//! whose path MTU is known.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use pnet::datalink::NetworkInterface;

use mtune_common::cancel::CancelToken;
use mtune_common::config::Config;
use mtune_common::error::OptimizeError;
use mtune_common::network::detect;
use mtune_common::probing::Prober;
use mtune_common::system::LinkRepository;
use mtune_core::engine::MtuOptimizer;

const IFF_UP: u32 = 1;

fn mock_interface(name: &str, flags: u32) -> NetworkInterface {
    NetworkInterface {
        name: name.to_string(),
        description: String::new(),
        index: 0,
        mac: None,
        ips: vec![],
        flags,
    }
}

/// A host with one VPN tunnel whose path supports packets up to `path_mtu`.
/// Writes mutate the simulated interface, so a second run starts from
/// whatever the first one applied.
struct SimulatedHost {
    interfaces: Vec<NetworkInterface>,
    configured_mtu: Mutex<u32>,
    path_mtu: u32,
}

impl SimulatedHost {
    fn new(configured_mtu: u32, path_mtu: u32) -> Arc<Self> {
        Arc::new(Self {
            interfaces: vec![
                mock_interface("lo", IFF_UP | (1 << 3)),
                mock_interface("eth0", IFF_UP),
                mock_interface("tun0", IFF_UP),
            ],
            configured_mtu: Mutex::new(configured_mtu),
            path_mtu,
        })
    }

    fn configured_mtu(&self) -> u32 {
        *self.configured_mtu.lock().unwrap()
    }
}

#[async_trait]
impl LinkRepository for SimulatedHost {
    fn interfaces(&self) -> Vec<NetworkInterface> {
        self.interfaces.clone()
    }

    async fn read_mtu(&self, iface: &str) -> anyhow::Result<u32> {
        anyhow::ensure!(
            self.interfaces.iter().any(|i| i.name == iface),
            "no such interface: {iface}"
        );
        Ok(self.configured_mtu())
    }

    async fn write_mtu(&self, iface: &str, mtu: u32) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.interfaces.iter().any(|i| i.name == iface),
            "no such interface: {iface}"
        );
        *self.configured_mtu.lock().unwrap() = mtu;
        Ok(())
    }
}

#[async_trait]
impl Prober for SimulatedHost {
    async fn probe(&self, mtu: u32) -> bool {
        mtu <= self.path_mtu
    }
}

/// Local handle over the shared host, so the boxed trait objects the engine
/// holds can alias the same `SimulatedHost` as the test. The orphan rule
/// forbids implementing the foreign ports directly for `Arc<SimulatedHost>`,
/// so this newtype carries the impls and delegates to the shared host.
struct HostHandle(Arc<SimulatedHost>);

#[async_trait]
impl LinkRepository for HostHandle {
    fn interfaces(&self) -> Vec<NetworkInterface> {
        self.0.interfaces()
    }

    async fn read_mtu(&self, iface: &str) -> anyhow::Result<u32> {
        self.0.read_mtu(iface).await
    }

    async fn write_mtu(&self, iface: &str, mtu: u32) -> anyhow::Result<()> {
        self.0.write_mtu(iface, mtu).await
    }
}

#[async_trait]
impl Prober for HostHandle {
    async fn probe(&self, mtu: u32) -> bool {
        self.0.probe(mtu).await
    }
}

async fn run_auto(host: &Arc<SimulatedHost>) -> Result<u32, OptimizeError> {
    let iface = detect::detect_vpn_interface(&host.interfaces())
        .map(|i| i.name.clone())
        .expect("the simulated host has a VPN interface");
    assert_eq!(iface, "tun0");

    let current = host.read_mtu(&iface).await.expect("interface exists");
    let optimizer = MtuOptimizer::new(
        Box::new(HostHandle(host.clone())),
        Box::new(HostHandle(host.clone())),
        Config::default(),
        CancelToken::new(),
    );
    optimizer.search(&iface, current).await
}

#[tokio::test(start_paused = true)]
async fn auto_run_lands_on_the_highest_working_candidate() {
    let host = SimulatedHost::new(1500, 1436);

    let applied = run_auto(&host).await.expect("a working MTU exists");

    // 1500, 1490, ... fail until the first candidate at or below the path
    // MTU, which is 1430.
    assert_eq!(applied, 1430);
    assert_eq!(host.configured_mtu(), 1430);
}

#[tokio::test(start_paused = true)]
async fn back_to_back_runs_agree() {
    let host = SimulatedHost::new(1500, 1436);

    let first = run_auto(&host).await.expect("first run finds an MTU");
    // The second run starts from the MTU the first one applied.
    let second = run_auto(&host).await.expect("second run finds an MTU");

    assert_eq!(first, 1430);
    assert_eq!(second, 1430);
    assert_eq!(host.configured_mtu(), 1430);
}

#[tokio::test(start_paused = true)]
async fn dead_path_exhausts_the_whole_range() {
    let host = SimulatedHost::new(1500, 0);

    let result = run_auto(&host).await;

    assert_eq!(result, Err(OptimizeError::SearchExhausted { min_mtu: 1280 }));
    assert_eq!(host.configured_mtu(), 1500, "nothing was ever written");
}

#[tokio::test(start_paused = true)]
async fn custom_run_asserts_and_verifies_one_value() {
    let host = SimulatedHost::new(1500, 1436);
    let optimizer = MtuOptimizer::new(
        Box::new(HostHandle(host.clone())),
        Box::new(HostHandle(host.clone())),
        Config::default(),
        CancelToken::new(),
    );

    let applied = optimizer.apply_custom("tun0", 1400).await.expect("1400 fits the path");

    assert_eq!(applied, 1400);
    assert_eq!(host.configured_mtu(), 1400);
}

#[tokio::test(start_paused = true)]
async fn custom_run_leaves_unverified_value_behind_on_failure() {
    // Write-before-probe: a custom value wider than the path is written to
    // the interface and stays there after the run fails.
    let host = SimulatedHost::new(1500, 1300);
    let optimizer = MtuOptimizer::new(
        Box::new(HostHandle(host.clone())),
        Box::new(HostHandle(host.clone())),
        Config::default(),
        CancelToken::new(),
    );

    let result = optimizer.apply_custom("tun0", 1400).await;

    assert_eq!(
        result,
        Err(OptimizeError::CustomExhausted {
            mtu: 1400,
            attempts: 3,
        })
    );
    assert_eq!(host.configured_mtu(), 1400);
}
