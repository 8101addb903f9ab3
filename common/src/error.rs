use thiserror::Error;

/// Terminal outcomes of an optimization run.
///
/// Transient probe and write failures never surface here; the engine retries
/// them internally and only reports once a bound is exhausted.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OptimizeError {
    /// The user asked for a value outside the configured range. Fatal input
    /// error, nothing is retried and no collaborator is invoked.
    #[error("invalid MTU value {value}: must be between {min} and {max}")]
    MtuOutOfRange { value: u32, min: u32, max: u32 },

    /// Custom mode ran out of attempts without a verified set-and-probe.
    #[error("MTU {mtu} could not be set and verified after {attempts} attempts")]
    CustomExhausted { mtu: u32, attempts: u32 },

    /// A candidate answered probes but the interface would not take it.
    #[error("MTU {mtu} answered probes but could not be applied after {attempts} attempts")]
    WriteExhausted { mtu: u32, attempts: u32 },

    /// Auto mode walked the whole range without a single working candidate.
    #[error("no working MTU found at or above {min_mtu}")]
    SearchExhausted { min_mtu: u32 },

    /// The run was interrupted. Not a verdict on the search itself.
    #[error("run cancelled before completion")]
    Cancelled,
}
