// # INWX Record Client
//
// This crate provides the live INWX implementation of `RecordClient` for
// the DNS-01 responder.
//
// ## Behavior
//
// - One JSON-RPC call per trait method (zone listing: one call per page)
// - Session established by `account.login` and kept in the HTTP cookie store
// - One cookie jar means one session per client: overlapping callers share
//   it through `SharedSession` (login on first holder, logout on last)
// - Zone listings cached for a fixed TTL through `dns01_core::ZoneCache`
// - Record listings always live
// - "Object exists" (code 2302) surfaces as `Error::AlreadyExists`
// - NO retry logic: failures are returned to the solver as-is
//
// ## Security Requirements
//
// - Password NEVER appears in logs or Debug output
// - Provider MUST fail fast if credentials are empty
//
// ## API Reference
//
// - DomRobot JSON-RPC: https://www.inwx.com/en/help/apidoc
// - Production: `https://api.domrobot.com/jsonrpc/`
// - Sandbox (OTE): `https://api.ote.domrobot.com/jsonrpc/`

mod wire;

use async_trait::async_trait;
use dns01_core::config::ProviderConfig;
use dns01_core::session::SharedSession;
use dns01_core::traits::{RecordClient, RecordClientFactory, ZonePage, ZonePager};
use dns01_core::types::{CreateRecordRequest, LoginInfo, Record};
use dns01_core::zones::{ZONE_CACHE_TTL, ZoneCache};
use dns01_core::{Error, Result};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;

use wire::{DomRobotResponse, LoginData, NameserverInfo, NameserverList, id_param};

/// Production DomRobot JSON-RPC endpoint
pub const INWX_API_PRODUCTION: &str = "https://api.domrobot.com/jsonrpc/";

/// Sandbox (OTE) DomRobot JSON-RPC endpoint
pub const INWX_API_SANDBOX: &str = "https://api.ote.domrobot.com/jsonrpc/";

/// Default HTTP timeout for API requests (30 seconds)
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Live INWX record client
///
/// # Sessions
///
/// The session cookie lives in the client's single cookie jar, so all
/// callers of one instance ride on the same session. `login` only reaches
/// the API for the first concurrent holder and `logout` only for the last.
///
/// # Security
///
/// The Debug implementation intentionally does NOT expose the password.
pub struct InwxClient {
    /// Account user name
    username: String,

    /// Account password
    /// ⚠️ NEVER log this value
    password: String,

    /// JSON-RPC endpoint (production or sandbox)
    endpoint: String,

    /// HTTP client with cookie store
    http: reqwest::Client,

    /// Zone inventory cache
    zone_cache: ZoneCache,

    /// The cookie-jar session shared by overlapping callers
    session: SharedSession,
}

// Custom Debug implementation that hides the password
impl std::fmt::Debug for InwxClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InwxClient")
            .field("username", &self.username)
            .field("password", &"<REDACTED>")
            .field("endpoint", &self.endpoint)
            .field("zone_cache", &self.zone_cache)
            .field("session", &self.session)
            .finish()
    }
}

impl InwxClient {
    /// Create a new INWX client
    ///
    /// # Parameters
    ///
    /// - `username` / `password`: Account credentials
    /// - `sandbox`: If true, talk to the OTE test system instead of production
    pub fn new(
        username: impl Into<String>,
        password: impl Into<String>,
        sandbox: bool,
    ) -> Result<Self> {
        let endpoint = if sandbox {
            INWX_API_SANDBOX
        } else {
            INWX_API_PRODUCTION
        };
        Self::with_endpoint(username, password, endpoint)
    }

    /// Create a client against an explicit endpoint
    pub fn with_endpoint(
        username: impl Into<String>,
        password: impl Into<String>,
        endpoint: impl Into<String>,
    ) -> Result<Self> {
        let username = username.into();
        let password = password.into();

        if username.is_empty() || password.is_empty() {
            return Err(Error::config("INWX username and password cannot be empty"));
        }

        let http = reqwest::Client::builder()
            .timeout(DEFAULT_HTTP_TIMEOUT)
            .cookie_store(true)
            .build()
            .map_err(|e| Error::http(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            username,
            password,
            endpoint: endpoint.into(),
            http,
            zone_cache: ZoneCache::new(ZONE_CACHE_TTL),
            session: SharedSession::new(),
        })
    }

    /// Override how long zone listings are cached
    pub fn with_zone_cache_ttl(mut self, ttl: Duration) -> Self {
        self.zone_cache = ZoneCache::new(ttl);
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn is_sandbox(&self) -> bool {
        self.endpoint == INWX_API_SANDBOX
    }

    /// Issue one JSON-RPC call and return its `resData`
    async fn call(&self, method: &str, params: Value) -> Result<Value> {
        tracing::debug!("INWX call: {}", method);

        let response = self
            .http
            .post(&self.endpoint)
            .json(&json!({ "method": method, "params": params }))
            .send()
            .await
            .map_err(|e| Error::http(format!("{method}: request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            return Err(Error::http(format!(
                "{method}: unexpected HTTP status {status}: {error_text}"
            )));
        }

        let envelope: DomRobotResponse = response
            .json()
            .await
            .map_err(|e| Error::http(format!("{method}: failed to parse response: {e}")))?;

        tracing::debug!("INWX {} answered code {}", method, envelope.code);
        envelope.into_result()
    }

    /// Issue a call and decode its `resData` into `T`
    async fn call_typed<T: DeserializeOwned>(&self, method: &str, params: Value) -> Result<T> {
        let data = self.call(method, params).await?;
        Ok(serde_json::from_value(data)?)
    }

    /// Remote `account.login`; the session cookie lands in the jar
    async fn open_session(&self) -> Result<LoginInfo> {
        let data: LoginData = self
            .call_typed(
                "account.login",
                json!({ "user": self.username, "pass": self.password, "lang": "en" }),
            )
            .await
            .map_err(|e| Error::auth(format!("failed to login to INWX: {e}")))?;

        if data.requires_second_factor() {
            if let Err(e) = self.call("account.logout", json!({})).await {
                tracing::debug!("Logout after refused login failed: {}", e);
            }
            return Err(Error::auth(
                "account requires two-factor authentication, which is not supported",
            ));
        }

        Ok(LoginInfo {
            customer_id: data.customer_id,
            account_id: data.account_id,
        })
    }

    /// Remote `account.logout`
    async fn close_session(&self) -> Result<()> {
        self.call("account.logout", json!({}))
            .await
            .map_err(|e| Error::auth(format!("failed to logout from INWX: {e}")))?;
        Ok(())
    }
}

#[async_trait]
impl ZonePager for InwxClient {
    async fn fetch_zone_page(&self, page: u32, page_limit: u32) -> Result<ZonePage> {
        let list: NameserverList = self
            .call_typed(
                "nameserver.list",
                json!({ "domain": "*", "page": page, "pagelimit": page_limit }),
            )
            .await?;

        Ok(ZonePage {
            zones: list.domains.into_iter().map(|d| d.domain).collect(),
            total: list.count,
        })
    }
}

#[async_trait]
impl RecordClient for InwxClient {
    async fn login(&self) -> Result<LoginInfo> {
        self.session.acquire(|| self.open_session()).await
    }

    async fn logout(&self) -> Result<()> {
        self.session.release(|| self.close_session()).await
    }

    async fn list_zones(&self) -> Result<Vec<String>> {
        self.zone_cache.get_or_refresh(self).await
    }

    async fn list_records(&self, zone: &str) -> Result<Vec<Record>> {
        let info: NameserverInfo = self
            .call_typed("nameserver.info", json!({ "domain": zone }))
            .await?;

        Ok(info
            .record
            .into_iter()
            .map(|r| r.into_record(zone))
            .collect())
    }

    async fn create_record(&self, request: &CreateRecordRequest) -> Result<()> {
        self.call(
            "nameserver.createRecord",
            json!({
                "domain": request.zone,
                "name": request.name,
                "type": request.record_type.as_str(),
                "content": request.content,
                "ttl": request.ttl,
            }),
        )
        .await?;
        Ok(())
    }

    async fn delete_record(&self, record_id: &str) -> Result<()> {
        self.call("nameserver.deleteRecord", json!({ "id": id_param(record_id) }))
            .await?;
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "inwx"
    }
}

/// Factory for creating INWX clients
pub struct InwxClientFactory;

impl RecordClientFactory for InwxClientFactory {
    fn create(
        &self,
        config: &ProviderConfig,
        zone_cache_ttl: Duration,
    ) -> Result<Arc<dyn RecordClient>> {
        match config {
            ProviderConfig::Inwx {
                username,
                password,
                sandbox,
            } => {
                if *sandbox {
                    tracing::warn!("INWX client running against the OTE sandbox");
                }

                let client = InwxClient::new(username.clone(), password.clone(), *sandbox)?
                    .with_zone_cache_ttl(zone_cache_ttl);
                Ok(Arc::new(client))
            }
        }
    }
}
