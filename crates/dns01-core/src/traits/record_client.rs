// # Record Client Trait
//
// Defines the capability surface the challenge solver needs from a DNS
// provider: a login/logout session plus zone and record operations.
//
// ## Implementations
//
// - INWX JSON-RPC: `dns01-provider-inwx` crate
// - In-memory: `dns01_core::client::MemoryRecordClient`
//
// ## Usage
//
// ```rust,ignore
// use dns01_core::{CreateRecordRequest, RecordClient};
//
// async fn provision(client: &dyn RecordClient) -> dns01_core::Result<()> {
//     client.login().await?;
//     let result = client
//         .create_record(&CreateRecordRequest::txt("example.com", "_acme-challenge", "tok", 60))
//         .await;
//     client.logout().await?;
//     result
// }
// ```

use async_trait::async_trait;

use crate::config::ProviderConfig;
use crate::types::{CreateRecordRequest, LoginInfo, Record};
use std::sync::Arc;

/// Trait for DNS provider record clients
///
/// The solver depends only on this contract, never on a concrete provider,
/// so reconciliation logic can be exercised without network access.
///
/// # Thread Safety
///
/// Implementations must be thread-safe: the solver may drive several
/// `present` / `cleanup` calls concurrently against one client.
///
/// # Sessions
///
/// `login` must be called before any other operation and is paired with
/// exactly one `logout`, including when the bracketed operation fails.
/// Overlapping login/logout pairs from concurrent callers must not end
/// each other's session; providers with one session per client share it
/// through [`crate::session::SharedSession`].
///
/// # Retries
///
/// Implementations never retry. Failures are returned as-is and the
/// caller decides what to do with them.
#[async_trait]
pub trait RecordClient: Send + Sync {
    /// Open a session
    ///
    /// # Returns
    ///
    /// - `Ok(LoginInfo)`: Session established
    /// - `Err(Error::Authentication)`: Credentials rejected or session refused
    async fn login(&self) -> Result<LoginInfo, crate::Error>;

    /// Close the session opened by [`RecordClient::login`]
    async fn logout(&self) -> Result<(), crate::Error>;

    /// List every zone the account administers
    ///
    /// Implementations backed by a paginated API must walk all pages and
    /// may serve results from a time-bounded cache (see [`crate::ZoneCache`]).
    async fn list_zones(&self) -> Result<Vec<String>, crate::Error>;

    /// List the records of one zone
    ///
    /// Always live: cleanup correctness depends on a fresh view.
    async fn list_records(&self, zone: &str) -> Result<Vec<Record>, crate::Error>;

    /// Create a record
    ///
    /// # Returns
    ///
    /// - `Ok(())`: Record created
    /// - `Err(Error::AlreadyExists)`: The provider already holds an identical record
    /// - `Err(Error)`: Any other failure
    async fn create_record(&self, request: &CreateRecordRequest) -> Result<(), crate::Error>;

    /// Delete a record by its provider-assigned identifier
    async fn delete_record(&self, record_id: &str) -> Result<(), crate::Error>;

    /// Get the provider name (for logging/debugging)
    fn provider_name(&self) -> &'static str;
}

/// Helper trait for constructing record clients from configuration
pub trait RecordClientFactory: Send + Sync {
    /// Create a RecordClient instance from configuration
    ///
    /// # Parameters
    ///
    /// - `config`: Provider configuration
    /// - `zone_cache_ttl`: How long a zone listing may be served from cache
    fn create(
        &self,
        config: &ProviderConfig,
        zone_cache_ttl: std::time::Duration,
    ) -> Result<Arc<dyn RecordClient>, crate::Error>;
}
