use async_trait::async_trait;
use pnet::datalink::NetworkInterface;

/// Everything the tool needs from the host's link layer: enumeration plus
/// per-interface MTU read and write. Platform-specific implementations are
/// selected at startup; the engine only ever sees this trait.
#[async_trait]
pub trait LinkRepository: Send + Sync {
    /// All interfaces currently known to the OS, in enumeration order.
    fn interfaces(&self) -> Vec<NetworkInterface>;

    /// The interface's currently configured MTU.
    async fn read_mtu(&self, iface: &str) -> anyhow::Result<u32>;

    /// Asks the OS to set the interface's MTU. Requires elevated privilege;
    /// a permission failure comes back as an error, never a panic.
    async fn write_mtu(&self, iface: &str, mtu: u32) -> anyhow::Result<()>;
}
