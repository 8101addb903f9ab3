//! The MTU optimization engine.
//!
//! Turns "current MTU, a probing primitive and a setting primitive" into a
//! verified, applied MTU value. Two modes: custom (assert one user-chosen
//! value) and auto (walk downward from the current MTU until a candidate
//! both answers probes and can be written). Both run strictly sequentially
//! and observe the cancellation token at every loop boundary.

use std::time::Duration;

use tracing::{info, warn};

use mtune_common::cancel::CancelToken;
use mtune_common::config::Config;
use mtune_common::error::OptimizeError;
use mtune_common::probing::Prober;
use mtune_common::system::LinkRepository;

/// Backoff between retry attempts, for probes and writes alike.
const RETRY_DELAY: Duration = Duration::from_secs(1);

/// Decides which MTU ends up on the interface.
///
/// Owns no OS knowledge: everything arrives through the [`LinkRepository`]
/// and [`Prober`] ports, so the decision procedure can be exercised against
/// stubs.
pub struct MtuOptimizer {
    link: Box<dyn LinkRepository>,
    prober: Box<dyn Prober>,
    cfg: Config,
    cancel: CancelToken,
}

impl MtuOptimizer {
    pub fn new(
        link: Box<dyn LinkRepository>,
        prober: Box<dyn Prober>,
        cfg: Config,
        cancel: CancelToken,
    ) -> Self {
        Self {
            link,
            prober,
            cfg,
            cancel,
        }
    }

    /// Custom mode: assert one user-chosen MTU and verify it.
    ///
    /// The value is re-written on every attempt even though it does not
    /// change; an external actor may have reset the interface in between.
    /// Note the ordering: the write happens before the probe, so a run that
    /// ultimately fails can leave the interface holding the unverified value.
    pub async fn apply_custom(&self, iface: &str, mtu: u32) -> Result<u32, OptimizeError> {
        if mtu < self.cfg.min_mtu || mtu > self.cfg.max_mtu {
            return Err(OptimizeError::MtuOutOfRange {
                value: mtu,
                min: self.cfg.min_mtu,
                max: self.cfg.max_mtu,
            });
        }

        let mut attempt = 0;
        while attempt < self.cfg.max_retries {
            if self.cancel.is_cancelled() {
                return Err(OptimizeError::Cancelled);
            }
            match self.link.write_mtu(iface, mtu).await {
                Ok(()) => {
                    if self.prober.probe(mtu).await {
                        info!("Successfully set and verified MTU {mtu}");
                        return Ok(mtu);
                    }
                    warn!("MTU {mtu} set but probe failed");
                }
                Err(err) => warn!("failed to set MTU {mtu}: {err:#}"),
            }
            attempt += 1;
            if attempt < self.cfg.max_retries {
                tokio::time::sleep(RETRY_DELAY).await;
                info!("Retrying ({}/{})", attempt + 1, self.cfg.max_retries);
            }
        }
        Err(OptimizeError::CustomExhausted {
            mtu,
            attempts: self.cfg.max_retries,
        })
    }

    /// Auto mode: walk candidates downward from `current` until one both
    /// answers probes and can be applied.
    ///
    /// The walk is a linear decrement, not a bisection: reachability is not
    /// guaranteed monotonic in the candidate size, so every step is tested
    /// in order.
    pub async fn search(&self, iface: &str, current: u32) -> Result<u32, OptimizeError> {
        let start = current.min(self.cfg.max_mtu);
        if start < current {
            info!("Current MTU {current} is above the search ceiling, starting at {start}");
        }
        info!("Optimizing MTU (testing from {start} down to {})", self.cfg.min_mtu);

        let mut mtu = start;
        while mtu >= self.cfg.min_mtu {
            if self.cancel.is_cancelled() {
                return Err(OptimizeError::Cancelled);
            }
            if self.probe_with_retries(mtu).await? {
                return self.apply_verified(iface, mtu).await;
            }
            info!("MTU {mtu} failed");
            match mtu.checked_sub(self.cfg.step) {
                Some(next) => mtu = next,
                None => break,
            }
        }
        Err(OptimizeError::SearchExhausted {
            min_mtu: self.cfg.min_mtu,
        })
    }

    /// Probes one candidate up to the retry bound. Probing is cheap and
    /// non-destructive, so it is retried eagerly before any write happens.
    async fn probe_with_retries(&self, mtu: u32) -> Result<bool, OptimizeError> {
        info!("Testing MTU {mtu}");
        let mut attempt = 0;
        while attempt < self.cfg.max_retries {
            if self.cancel.is_cancelled() {
                return Err(OptimizeError::Cancelled);
            }
            if self.prober.probe(mtu).await {
                return Ok(true);
            }
            if attempt + 1 < self.cfg.max_retries {
                tokio::time::sleep(RETRY_DELAY).await;
            }
            attempt += 1;
        }
        Ok(false)
    }

    /// The candidate answered a probe; now make the write stick. Write
    /// failures (privilege, IPC) get their own retry budget, separate from
    /// connectivity failures. A candidate that probes fine but cannot be
    /// written ends the run: resuming the scan below it would only apply a
    /// smaller value than one already known to work.
    async fn apply_verified(&self, iface: &str, mtu: u32) -> Result<u32, OptimizeError> {
        info!("MTU {mtu} verified, applying");
        let mut attempt = 0;
        while attempt < self.cfg.max_retries {
            if self.cancel.is_cancelled() {
                return Err(OptimizeError::Cancelled);
            }
            match self.link.write_mtu(iface, mtu).await {
                Ok(()) => {
                    info!("Successfully set MTU to {mtu}");
                    return Ok(mtu);
                }
                Err(err) => warn!("failed to set MTU {mtu}: {err:#}"),
            }
            attempt += 1;
            if attempt < self.cfg.max_retries {
                tokio::time::sleep(RETRY_DELAY).await;
                info!("Retrying set ({}/{})", attempt + 1, self.cfg.max_retries);
            }
        }
        Err(OptimizeError::WriteExhausted {
            mtu,
            attempts: self.cfg.max_retries,
        })
    }
}
