//! Test doubles and common utilities for solver contract tests
//!
//! These doubles wrap the in-memory client with fault injection and call
//! recording so tests can assert on session bracketing and error paths.

#![allow(dead_code)]

use async_trait::async_trait;
use dns01_core::client::MemoryRecordClient;
use dns01_core::config::ProviderConfig;
use dns01_core::error::{Error, Result};
use dns01_core::traits::{RecordClient, RecordClientFactory, ZonePage, ZonePager};
use dns01_core::types::{ChallengeRequest, CreateRecordRequest, LoginInfo, Record};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Operations a [`FlakyClient`] can be told to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Login,
    Logout,
    ListZones,
    ListRecords,
    Create,
    Delete,
}

/// A MemoryRecordClient with switchable failures and a call log
#[derive(Clone)]
pub struct FlakyClient {
    pub inner: MemoryRecordClient,
    failing: Arc<Mutex<Vec<Op>>>,
    delays: Arc<Mutex<Vec<(Op, Duration)>>>,
    calls: Arc<Mutex<Vec<Op>>>,
}

impl FlakyClient {
    pub fn new(inner: MemoryRecordClient) -> Self {
        Self {
            inner,
            failing: Arc::new(Mutex::new(Vec::new())),
            delays: Arc::new(Mutex::new(Vec::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Make every subsequent call of `op` fail
    pub fn fail(&self, op: Op) {
        self.failing.lock().unwrap().push(op);
    }

    /// Hold every subsequent call of `op` for `delay` before it runs
    pub fn delay(&self, op: Op, delay: Duration) {
        self.delays.lock().unwrap().push((op, delay));
    }

    /// Operations invoked so far, in order
    pub fn calls(&self) -> Vec<Op> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, op: Op) -> usize {
        self.calls().iter().filter(|c| **c == op).count()
    }

    async fn enter(&self, op: Op) -> Result<()> {
        let delay = self
            .delays
            .lock()
            .unwrap()
            .iter()
            .find(|(delayed, _)| *delayed == op)
            .map(|(_, delay)| *delay);
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        self.calls.lock().unwrap().push(op);
        if self.failing.lock().unwrap().contains(&op) {
            return Err(match op {
                Op::Login | Op::Logout => Error::auth(format!("injected {op:?} failure")),
                _ => Error::provider("flaky", format!("injected {op:?} failure")),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl RecordClient for FlakyClient {
    async fn login(&self) -> Result<LoginInfo> {
        self.enter(Op::Login).await?;
        self.inner.login().await
    }

    async fn logout(&self) -> Result<()> {
        self.enter(Op::Logout).await?;
        self.inner.logout().await
    }

    async fn list_zones(&self) -> Result<Vec<String>> {
        self.enter(Op::ListZones).await?;
        self.inner.list_zones().await
    }

    async fn list_records(&self, zone: &str) -> Result<Vec<Record>> {
        self.enter(Op::ListRecords).await?;
        self.inner.list_records(zone).await
    }

    async fn create_record(&self, request: &CreateRecordRequest) -> Result<()> {
        self.enter(Op::Create).await?;
        self.inner.create_record(request).await
    }

    async fn delete_record(&self, record_id: &str) -> Result<()> {
        self.enter(Op::Delete).await?;
        self.inner.delete_record(record_id).await
    }

    fn provider_name(&self) -> &'static str {
        "flaky"
    }
}

/// Factory handing out a pre-built client
pub struct FixedFactory {
    client: Arc<dyn RecordClient>,
    pub created: Arc<AtomicUsize>,
}

impl FixedFactory {
    pub fn new(client: Arc<dyn RecordClient>) -> Self {
        Self {
            client,
            created: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl RecordClientFactory for FixedFactory {
    fn create(
        &self,
        _config: &ProviderConfig,
        _zone_cache_ttl: Duration,
    ) -> Result<Arc<dyn RecordClient>> {
        self.created.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::clone(&self.client))
    }
}

/// A zone pager over `total` synthetic zones that counts page fetches
pub struct CountingPager {
    total: usize,
    fetches: AtomicUsize,
    failing_page: Option<u32>,
    fail: AtomicBool,
}

impl CountingPager {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            fetches: AtomicUsize::new(0),
            failing_page: None,
            fail: AtomicBool::new(false),
        }
    }

    /// Fail whenever `page` is requested
    pub fn failing_on(mut self, page: u32) -> Self {
        self.failing_page = Some(page);
        self
    }

    /// Toggle failure of every page
    pub fn set_failing(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Number of page fetches issued so far
    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ZonePager for CountingPager {
    async fn fetch_zone_page(&self, page: u32, page_limit: u32) -> Result<ZonePage> {
        self.fetches.fetch_add(1, Ordering::SeqCst);

        if self.fail.load(Ordering::SeqCst) || self.failing_page == Some(page) {
            return Err(Error::http("connection reset by peer"));
        }

        let start = (page as usize - 1) * page_limit as usize;
        let end = (start + page_limit as usize).min(self.total);
        let zones = (start..end).map(|i| format!("zone{i:04}.example")).collect();

        Ok(ZonePage {
            zones,
            total: self.total,
        })
    }
}

/// Challenge for `_acme-challenge.<prefix>example.com.` in zone `example.com.`
pub fn challenge(prefix: &str, key: &str) -> ChallengeRequest {
    ChallengeRequest::new(
        format!("_acme-challenge.{prefix}example.com."),
        "example.com.",
        key,
    )
}

/// A memory client with the `example.com` zone already present
pub async fn client_with_zone() -> MemoryRecordClient {
    let client = MemoryRecordClient::new();
    client.create_zone("example.com").await;
    client
}

/// Minimal valid solver configuration
pub fn test_config() -> dns01_core::config::SolverConfig {
    dns01_core::config::SolverConfig::new(ProviderConfig::Inwx {
        username: "test-user".to_string(),
        password: "test-password".to_string(),
        sandbox: true,
    })
}
