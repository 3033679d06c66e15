// # DNS-01 Solver Trait
//
// The lifecycle contract a hosting framework (a cert-manager webhook, an
// ACME client hook, ...) drives: initialize once, then present and clean
// up challenges, possibly concurrently.

use async_trait::async_trait;

use crate::config::SolverConfig;
use crate::types::ChallengeRequest;

/// Trait for DNS-01 challenge solvers
///
/// # Concurrency
///
/// `present` and `cleanup` take `&self` and may be called concurrently for
/// unrelated or identical challenges. Implementations must not rely on
/// in-process locking for correctness.
#[async_trait]
pub trait Dns01Solver: Send + Sync {
    /// Static identifier of this solver
    fn name(&self) -> &'static str;

    /// Validate configuration and prepare the record client
    ///
    /// Missing credentials are fatal. Diagnostics performed here (such as
    /// listing zones) are best-effort and never fail the call.
    async fn initialize(&mut self, config: &SolverConfig) -> Result<(), crate::Error>;

    /// Publish the TXT record for a challenge
    async fn present(&self, challenge: &ChallengeRequest) -> Result<(), crate::Error>;

    /// Remove the TXT record for a challenge
    async fn cleanup(&self, challenge: &ChallengeRequest) -> Result<(), crate::Error>;
}
