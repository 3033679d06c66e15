//! Challenge solver
//!
//! The solver turns one `present` / `cleanup` call into exactly one
//! login → record operation → logout sequence against a [`RecordClient`].
//!
//! ## Session Bracket
//!
//! ```text
//! Idle ──login ok──► SessionOpen ──operation──► OperationDone ──logout──► SessionClosed
//!   │                                     (ok or err)            (failure only logged)
//!   └──login err──► return error, no record touched
//! ```
//!
//! ## Reconciliation
//!
//! - **present**: create the TXT record; a provider "already exists" answer
//!   counts as success.
//! - **cleanup**: list the zone live, delete the first TXT record whose name
//!   *and* content match the challenge; nothing matching is a no-op.
//!
//! Two challenges for the same FQDN with different keys produce two
//! records, and each cleanup removes only its own. There is no in-process
//! locking: the provider is the only party with a consistent view of the
//! zone, so duplicate detection is left to it.

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error, info, warn};

use crate::config::SolverConfig;
use crate::error::{Error, Result};
use crate::traits::{Dns01Solver, RecordClient, RecordClientFactory};
use crate::types::{ChallengeRequest, CreateRecordRequest, DEFAULT_RECORD_TTL};

/// Static identifier reported through [`Dns01Solver::name`]
pub const SOLVER_NAME: &str = "inwx";

/// Strip exactly one trailing dot from a DNS name
pub fn normalize_name(name: &str) -> &str {
    name.strip_suffix('.').unwrap_or(name)
}

/// Compute the record name of `fqdn` relative to `zone`
///
/// Both inputs must already be normalized. The apex yields an empty name.
/// `zone` is expected to be the owning zone of `fqdn`; if it is not, `fqdn`
/// comes back unchanged.
///
/// ```
/// use dns01_core::derive_relative_name;
///
/// assert_eq!(derive_relative_name("_acme-challenge.sub.example.com", "example.com"), "_acme-challenge.sub");
/// assert_eq!(derive_relative_name("example.com", "example.com"), "");
/// ```
pub fn derive_relative_name(fqdn: &str, zone: &str) -> String {
    if fqdn == zone {
        return String::new();
    }

    fqdn.strip_suffix(zone)
        .and_then(|prefix| prefix.strip_suffix('.'))
        .unwrap_or(fqdn)
        .to_string()
}

/// DNS-01 solver over any [`RecordClient`]
///
/// Holds no state across invocations beyond what the client caches, so a
/// single instance can be shared through `Arc` by concurrent callers.
pub struct ChallengeSolver {
    /// Record client, set at construction or by `initialize`
    client: Option<Arc<dyn RecordClient>>,

    /// Builds the client during `initialize`
    factory: Option<Box<dyn RecordClientFactory>>,

    /// TTL of created challenge records
    record_ttl: u32,
}

impl ChallengeSolver {
    /// Create a solver whose client is built by `factory` on `initialize`
    pub fn new(factory: Box<dyn RecordClientFactory>) -> Self {
        Self {
            client: None,
            factory: Some(factory),
            record_ttl: DEFAULT_RECORD_TTL,
        }
    }

    /// Create a solver bound to an existing client
    ///
    /// No `initialize` call is needed before `present` / `cleanup`.
    pub fn with_client(client: Arc<dyn RecordClient>) -> Self {
        Self {
            client: Some(client),
            factory: None,
            record_ttl: DEFAULT_RECORD_TTL,
        }
    }

    /// Override the TTL of created records
    pub fn with_record_ttl(mut self, record_ttl: u32) -> Self {
        self.record_ttl = record_ttl;
        self
    }

    pub fn record_ttl(&self) -> u32 {
        self.record_ttl
    }

    fn client(&self) -> Result<&dyn RecordClient> {
        self.client.as_deref().ok_or(Error::NotInitialized)
    }

    /// Run `operation` inside a login/logout bracket
    ///
    /// A login failure is returned before `operation` runs. Logout is
    /// attempted whatever `operation` returned; its own failure is logged
    /// and never replaces the operation's result.
    async fn in_session<T, F, Fut>(&self, client: &dyn RecordClient, operation: F) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let session = client.login().await?;
        debug!(
            "Session opened with {} (customer: {:?})",
            client.provider_name(),
            session.customer_id
        );

        let result = operation().await;

        match client.logout().await {
            Ok(()) => debug!("Session closed with {}", client.provider_name()),
            Err(e) => error!("Failed to logout from {}: {}", client.provider_name(), e),
        }

        result
    }

    async fn create_challenge_record(
        &self,
        client: &dyn RecordClient,
        fqdn: &str,
        zone: &str,
        key: &str,
    ) -> Result<()> {
        let name = derive_relative_name(fqdn, zone);
        let request = CreateRecordRequest::txt(zone, name, key, self.record_ttl);

        match client.create_record(&request).await {
            Ok(()) => {
                info!(fqdn = %fqdn, zone = %zone, "Created TXT record");
                Ok(())
            }
            Err(e) if e.is_already_exists() => {
                info!(fqdn = %fqdn, zone = %zone, "TXT record already exists, skipping");
                Ok(())
            }
            Err(e) => Err(Error::create_record(fqdn, zone, e)),
        }
    }

    async fn delete_challenge_record(
        &self,
        client: &dyn RecordClient,
        fqdn: &str,
        zone: &str,
        key: &str,
    ) -> Result<()> {
        let records = client
            .list_records(zone)
            .await
            .map_err(|e| Error::list_records(zone, e))?;

        let name = derive_relative_name(fqdn, zone);

        let Some(record) = records.iter().find(|r| r.is_challenge(&name, key)) else {
            info!(fqdn = %fqdn, zone = %zone, "No matching TXT record found to delete");
            return Ok(());
        };

        client
            .delete_record(&record.id)
            .await
            .map_err(|e| Error::delete_record(&record.id, e))?;

        info!(fqdn = %fqdn, zone = %zone, id = %record.id, "Deleted TXT record");
        Ok(())
    }

    /// Best-effort startup diagnostic: log which zones the account can manage
    async fn log_zone_inventory(&self, client: &dyn RecordClient) {
        match self.in_session(client, || client.list_zones()).await {
            Ok(zones) => info!(
                "{} zones available ({}): {}",
                client.provider_name(),
                zones.len(),
                zones.join(", ")
            ),
            Err(e) if e.is_auth() => error!("Startup: failed to login to {}: {}", client.provider_name(), e),
            Err(e) => error!("Startup: failed to list zones: {}", e),
        }
    }
}

impl std::fmt::Debug for ChallengeSolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChallengeSolver")
            .field(
                "provider",
                &self.client.as_ref().map(|c| c.provider_name()),
            )
            .field("record_ttl", &self.record_ttl)
            .finish()
    }
}

#[async_trait]
impl Dns01Solver for ChallengeSolver {
    fn name(&self) -> &'static str {
        SOLVER_NAME
    }

    async fn initialize(&mut self, config: &SolverConfig) -> Result<()> {
        config.validate()?;
        self.record_ttl = config.record_ttl;

        if let Some(factory) = &self.factory {
            self.client = Some(factory.create(&config.provider, config.zone_cache_ttl())?);
        } else if self.client.is_some() {
            warn!("Solver already has a record client, keeping it");
        }

        let client = self.client()?;
        info!(
            "Initialized {} solver (provider: {}, record TTL: {}s)",
            SOLVER_NAME,
            client.provider_name(),
            self.record_ttl
        );

        self.log_zone_inventory(client).await;
        Ok(())
    }

    async fn present(&self, challenge: &ChallengeRequest) -> Result<()> {
        let zone = normalize_name(&challenge.resolved_zone);
        let fqdn = normalize_name(&challenge.resolved_fqdn);
        let client = self.client()?;

        info!(fqdn = %fqdn, zone = %zone, "Presenting ACME challenge");

        self.in_session(client, || {
            self.create_challenge_record(client, fqdn, zone, &challenge.key)
        })
        .await
    }

    async fn cleanup(&self, challenge: &ChallengeRequest) -> Result<()> {
        let zone = normalize_name(&challenge.resolved_zone);
        let fqdn = normalize_name(&challenge.resolved_fqdn);
        let client = self.client()?;

        info!(fqdn = %fqdn, zone = %zone, "Cleaning up ACME challenge");

        self.in_session(client, || {
            self.delete_challenge_record(client, fqdn, zone, &challenge.key)
        })
        .await
    }
}
