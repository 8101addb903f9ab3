use async_trait::async_trait;

/// Reachability check for one candidate MTU.
///
/// Implementations send a fixed number of non-fragmenting echo requests to a
/// fixed destination and report aggregate success. Outcomes are a property of
/// the moment, not of the interface: identical calls may disagree between
/// runs, so results must never be cached.
#[async_trait]
pub trait Prober: Send + Sync {
    async fn probe(&self, mtu: u32) -> bool;
}
