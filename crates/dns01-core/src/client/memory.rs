// # Memory Record Client
//
// In-memory implementation of RecordClient.
//
// ## Purpose
//
// Stands in for a live provider in tests and local experiments. It behaves
// like the real API where the solver's correctness depends on it:
//
// - The "server" holds a single session per client, the way a cookie jar
//   does: a second remote login replaces it and a remote logout ends it
//   for every caller, so the client shares it through `SharedSession`
// - Every operation except `login` requires an open session
// - Creating a record identical to an existing one (name, type, content)
//   fails with `Error::AlreadyExists` and code 2302
// - Record identifiers are assigned by the client, never by the caller
//
// ## Crash Behavior
//
// - All zones and records are lost when the client is dropped

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::{Error, OBJECT_EXISTS_CODE};
use crate::session::SharedSession;
use crate::traits::RecordClient;
use crate::types::{CreateRecordRequest, LoginInfo, Record, RecordType};

#[derive(Debug, Default)]
struct MemoryState {
    zones: BTreeMap<String, Vec<Record>>,
    next_id: u64,
    /// Identifier of the live server-side session, if any
    session: Option<u64>,
    next_session: u64,
}

#[derive(Debug, Default)]
struct CallCounters {
    logins: AtomicUsize,
    logouts: AtomicUsize,
    zone_listings: AtomicUsize,
    remote_logins: AtomicUsize,
}

/// In-memory record client
///
/// Cloning shares state, so a test can hand one clone to the solver and
/// inspect the other.
///
/// # Example
///
/// ```rust,no_run
/// use dns01_core::client::MemoryRecordClient;
/// use dns01_core::traits::RecordClient;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let client = MemoryRecordClient::new();
///     client.create_zone("example.com").await;
///
///     client.login().await?;
///     let records = client.list_records("example.com").await?;
///     assert!(records.is_empty());
///     client.logout().await?;
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryRecordClient {
    inner: Arc<RwLock<MemoryState>>,
    session: Arc<SharedSession>,
    counters: Arc<CallCounters>,
}

impl MemoryRecordClient {
    /// Create a client with no zones
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an empty zone (no-op if it already exists)
    pub async fn create_zone(&self, zone: &str) {
        let mut guard = self.inner.write().await;
        guard.zones.entry(zone.to_string()).or_default();
    }

    /// Seed a record without a session, returning its identifier
    pub async fn insert_record(
        &self,
        zone: &str,
        name: &str,
        record_type: RecordType,
        content: &str,
    ) -> String {
        let mut guard = self.inner.write().await;
        guard.next_id += 1;
        let id = guard.next_id.to_string();
        guard.zones.entry(zone.to_string()).or_default().push(Record {
            id: id.clone(),
            zone: zone.to_string(),
            name: name.to_string(),
            record_type,
            content: content.to_string(),
            ttl: 3600,
        });
        id
    }

    /// Snapshot of a zone's records, without a session
    pub async fn records(&self, zone: &str) -> Vec<Record> {
        let guard = self.inner.read().await;
        guard.zones.get(zone).cloned().unwrap_or_default()
    }

    /// Number of callers currently holding the session
    pub async fn open_sessions(&self) -> usize {
        self.session.holders().await
    }

    /// Number of sessions actually opened on the "server"
    pub fn remote_login_count(&self) -> usize {
        self.counters.remote_logins.load(Ordering::SeqCst)
    }

    /// End the server-side session behind the callers' backs
    ///
    /// Models a provider-side timeout: holders keep believing they are
    /// logged in, but every operation is rejected until the next remote login.
    pub async fn expire_session(&self) {
        self.inner.write().await.session = None;
    }

    /// Number of `login` calls so far
    pub fn login_count(&self) -> usize {
        self.counters.logins.load(Ordering::SeqCst)
    }

    /// Number of `logout` calls so far
    pub fn logout_count(&self) -> usize {
        self.counters.logouts.load(Ordering::SeqCst)
    }

    /// Number of `list_zones` calls so far
    pub fn zone_listing_count(&self) -> usize {
        self.counters.zone_listings.load(Ordering::SeqCst)
    }

    fn require_session(state: &MemoryState) -> Result<(), Error> {
        if state.session.is_none() {
            return Err(Error::auth("not logged in"));
        }
        Ok(())
    }

    async fn open_remote_session(&self) -> Result<LoginInfo, Error> {
        self.counters.remote_logins.fetch_add(1, Ordering::SeqCst);
        let mut guard = self.inner.write().await;
        guard.next_session += 1;
        guard.session = Some(guard.next_session);
        Ok(LoginInfo::default())
    }

    async fn close_remote_session(&self) -> Result<(), Error> {
        let mut guard = self.inner.write().await;
        Self::require_session(&guard)?;
        guard.session = None;
        Ok(())
    }
}

#[async_trait]
impl RecordClient for MemoryRecordClient {
    async fn login(&self) -> Result<LoginInfo, Error> {
        self.counters.logins.fetch_add(1, Ordering::SeqCst);
        self.session.acquire(|| self.open_remote_session()).await
    }

    async fn logout(&self) -> Result<(), Error> {
        self.counters.logouts.fetch_add(1, Ordering::SeqCst);
        self.session.release(|| self.close_remote_session()).await
    }

    async fn list_zones(&self) -> Result<Vec<String>, Error> {
        self.counters.zone_listings.fetch_add(1, Ordering::SeqCst);
        let guard = self.inner.read().await;
        Self::require_session(&guard)?;
        Ok(guard.zones.keys().cloned().collect())
    }

    async fn list_records(&self, zone: &str) -> Result<Vec<Record>, Error> {
        let guard = self.inner.read().await;
        Self::require_session(&guard)?;
        guard
            .zones
            .get(zone)
            .cloned()
            .ok_or_else(|| Error::provider("memory", format!("zone not found: {zone}")))
    }

    async fn create_record(&self, request: &CreateRecordRequest) -> Result<(), Error> {
        let mut guard = self.inner.write().await;
        Self::require_session(&guard)?;

        let records = guard.zones.get(&request.zone).ok_or_else(|| {
            Error::provider("memory", format!("zone not found: {}", request.zone))
        })?;

        let duplicate = records.iter().any(|r| {
            r.name == request.name
                && r.record_type == request.record_type
                && r.content == request.content
        });
        if duplicate {
            return Err(Error::already_exists(OBJECT_EXISTS_CODE, "Object exists"));
        }

        guard.next_id += 1;
        let record = Record {
            id: guard.next_id.to_string(),
            zone: request.zone.clone(),
            name: request.name.clone(),
            record_type: request.record_type.clone(),
            content: request.content.clone(),
            ttl: request.ttl,
        };
        if let Some(records) = guard.zones.get_mut(&request.zone) {
            records.push(record);
        }

        Ok(())
    }

    async fn delete_record(&self, record_id: &str) -> Result<(), Error> {
        let mut guard = self.inner.write().await;
        Self::require_session(&guard)?;

        for records in guard.zones.values_mut() {
            if let Some(pos) = records.iter().position(|r| r.id == record_id) {
                records.remove(pos);
                return Ok(());
            }
        }

        Err(Error::provider(
            "memory",
            format!("record not found: {record_id}"),
        ))
    }

    fn provider_name(&self) -> &'static str {
        "memory"
    }
}
