//! DomRobot JSON-RPC test server
//!
//! A wiremock responder that behaves like the INWX API wherever the client
//! depends on it:
//!
//! - `account.login` checks credentials and sets a fresh session cookie
//! - One active session per account: a new login replaces it, a logout
//!   ends it for everybody holding the cookie
//! - Every other method requires the active session cookie (code 2200)
//! - Duplicate records answer 2302, unknown objects 2303, bad ids 2005
//!
//! Every request is logged with the session it carried.

#![allow(dead_code)]

use dns01_provider_inwx::InwxClient;
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

pub const USERNAME: &str = "test-user";
pub const PASSWORD: &str = "test-pass";
pub const CUSTOMER_ID: i64 = 4711;

const SESSION_COOKIE: &str = "domrobot";

/// One request as seen by the server
#[derive(Debug, Clone)]
pub struct Call {
    pub method: String,
    pub params: Value,
    pub session: Option<String>,
    pub authorized: bool,
}

#[derive(Debug, Clone)]
struct StoredRecord {
    id: i64,
    zone: String,
    /// Fully qualified, the way the API lists names
    name: String,
    record_type: String,
    content: String,
    ttl: u64,
}

#[derive(Debug, Default)]
struct State {
    zones: Vec<String>,
    records: Vec<StoredRecord>,
    next_id: i64,
    next_session: u32,
    active_session: Option<String>,
    second_factor: Option<String>,
    delays: BTreeMap<String, Duration>,
    calls: Vec<Call>,
}

/// Shared handle to the fake API; clones see the same state
#[derive(Clone, Default)]
pub struct DomRobot {
    state: Arc<Mutex<State>>,
}

impl DomRobot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_zones<I, S>(self, zones: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.state
            .lock()
            .unwrap()
            .zones
            .extend(zones.into_iter().map(Into::into));
        self
    }

    /// Make `account.login` report an active second factor
    pub fn with_second_factor(self, kind: &str) -> Self {
        self.state.lock().unwrap().second_factor = Some(kind.to_string());
        self
    }

    /// Delay every answer to `rpc_method`
    pub fn delay(&self, rpc_method: &str, delay: Duration) {
        self.state
            .lock()
            .unwrap()
            .delays
            .insert(rpc_method.to_string(), delay);
    }

    /// Seed a record by relative name, returning its id
    pub fn add_record(&self, zone: &str, name: &str, record_type: &str, content: &str) -> i64 {
        let mut state = self.state.lock().unwrap();
        state.next_id += 1;
        let id = state.next_id;
        state.records.push(StoredRecord {
            id,
            zone: zone.to_string(),
            name: full_name(name, zone),
            record_type: record_type.to_string(),
            content: content.to_string(),
            ttl: 3600,
        });
        id
    }

    /// Contents of the TXT records stored for `zone`, sorted
    pub fn txt_contents(&self, zone: &str) -> Vec<String> {
        let state = self.state.lock().unwrap();
        let mut contents: Vec<String> = state
            .records
            .iter()
            .filter(|r| r.zone == zone && r.record_type == "TXT")
            .map(|r| r.content.clone())
            .collect();
        contents.sort();
        contents
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn calls_to(&self, rpc_method: &str) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| c.method == rpc_method)
            .collect()
    }

    pub fn methods(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.method).collect()
    }

    pub fn count(&self, rpc_method: &str) -> usize {
        self.calls_to(rpc_method).len()
    }

    /// Requests refused because they carried no valid session
    pub fn rejected(&self) -> Vec<Call> {
        self.calls().into_iter().filter(|c| !c.authorized).collect()
    }

    /// Start a server answering `POST /jsonrpc/` with this fake
    pub async fn start(&self) -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/jsonrpc/"))
            .respond_with(self.clone())
            .mount(&server)
            .await;
        server
    }
}

impl Respond for DomRobot {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let body: Value = serde_json::from_slice(&request.body).unwrap_or(Value::Null);
        let rpc_method = body["method"].as_str().unwrap_or_default().to_string();
        let params = body["params"].clone();
        let session = session_cookie(request);

        let mut state = self.state.lock().unwrap();
        let authorized = rpc_method == "account.login"
            || (session.is_some() && session == state.active_session);

        state.calls.push(Call {
            method: rpc_method.clone(),
            params: params.clone(),
            session,
            authorized,
        });

        let template = if authorized {
            state.handle(&rpc_method, &params)
        } else {
            answer(2200, "Authentication error", None)
        };

        match state.delays.get(&rpc_method) {
            Some(delay) => template.set_delay(*delay),
            None => template,
        }
    }
}

impl State {
    fn handle(&mut self, rpc_method: &str, params: &Value) -> ResponseTemplate {
        match rpc_method {
            "account.login" => self.login(params),
            "account.logout" => {
                self.active_session = None;
                answer(1500, "Command completed successfully; ending session", None)
            }
            "nameserver.list" => self.list(params),
            "nameserver.info" => self.info(params),
            "nameserver.createRecord" => self.create(params),
            "nameserver.deleteRecord" => self.delete(params),
            _ => answer(2400, "Invalid command name", None),
        }
    }

    fn login(&mut self, params: &Value) -> ResponseTemplate {
        if params["user"] != USERNAME || params["pass"] != PASSWORD {
            return answer(2200, "Authentication error", None);
        }

        self.next_session += 1;
        let session = format!("s{}", self.next_session);
        self.active_session = Some(session.clone());

        let tfa = self.second_factor.clone().unwrap_or_else(|| "0".to_string());
        answer(
            1000,
            "Command completed successfully",
            Some(json!({ "customerId": CUSTOMER_ID, "accountId": 1, "tfa": tfa })),
        )
        .insert_header(
            "set-cookie",
            format!("{SESSION_COOKIE}={session}; Path=/").as_str(),
        )
    }

    fn list(&self, params: &Value) -> ResponseTemplate {
        let (Some(page), Some(limit)) = (params["page"].as_u64(), params["pagelimit"].as_u64())
        else {
            return answer(2003, "Required parameter missing", None);
        };
        if params["domain"] != "*" || page == 0 {
            return answer(2005, "Parameter value syntax error", None);
        }

        let start = ((page - 1) * limit) as usize;
        let domains: Vec<Value> = self
            .zones
            .iter()
            .skip(start)
            .take(limit as usize)
            .enumerate()
            .map(|(i, zone)| json!({ "roId": start + i + 1, "domain": zone }))
            .collect();

        answer(
            1000,
            "Command completed successfully",
            Some(json!({ "count": self.zones.len(), "domains": domains })),
        )
    }

    fn info(&self, params: &Value) -> ResponseTemplate {
        let zone = params["domain"].as_str().unwrap_or_default();
        if !self.zones.iter().any(|z| z == zone) {
            return answer(2303, "Object does not exist", None);
        }

        let records: Vec<Value> = self
            .records
            .iter()
            .filter(|r| r.zone == zone)
            .map(|r| {
                json!({
                    "id": r.id,
                    "name": r.name,
                    "type": r.record_type,
                    "content": r.content,
                    "ttl": r.ttl,
                    "prio": 0
                })
            })
            .collect();

        answer(
            1000,
            "Command completed successfully",
            Some(json!({ "domain": zone, "record": records })),
        )
    }

    fn create(&mut self, params: &Value) -> ResponseTemplate {
        let zone = params["domain"].as_str().unwrap_or_default().to_string();
        if !self.zones.contains(&zone) {
            return answer(2303, "Object does not exist", None);
        }

        let name = full_name(params["name"].as_str().unwrap_or_default(), &zone);
        let record_type = params["type"].as_str().unwrap_or_default().to_string();
        let content = params["content"].as_str().unwrap_or_default().to_string();

        let duplicate = self.records.iter().any(|r| {
            r.zone == zone && r.name == name && r.record_type == record_type && r.content == content
        });
        if duplicate {
            return answer(2302, "Object exists", None);
        }

        self.next_id += 1;
        let id = self.next_id;
        self.records.push(StoredRecord {
            id,
            zone,
            name,
            record_type,
            content,
            ttl: params["ttl"].as_u64().unwrap_or(3600),
        });

        answer(1000, "Command completed successfully", Some(json!({ "id": id })))
    }

    fn delete(&mut self, params: &Value) -> ResponseTemplate {
        let Some(id) = params["id"].as_i64() else {
            return answer(2005, "Parameter value syntax error", None);
        };

        match self.records.iter().position(|r| r.id == id) {
            Some(pos) => {
                self.records.remove(pos);
                answer(1000, "Command completed successfully", None)
            }
            None => answer(2303, "Object does not exist", None),
        }
    }
}

fn answer(code: i64, msg: &str, res_data: Option<Value>) -> ResponseTemplate {
    let mut body = json!({ "code": code, "msg": msg });
    if let Some(data) = res_data {
        body["resData"] = data;
    }
    ResponseTemplate::new(200).set_body_json(body)
}

fn full_name(name: &str, zone: &str) -> String {
    if name.is_empty() {
        zone.to_string()
    } else {
        format!("{name}.{zone}")
    }
}

fn session_cookie(request: &Request) -> Option<String> {
    let header = request.headers.get("cookie")?.to_str().ok()?;
    header
        .split(';')
        .map(str::trim)
        .find_map(|pair| pair.strip_prefix("domrobot="))
        .map(str::to_string)
}

/// JSON-RPC endpoint of a running server
pub fn endpoint(server: &MockServer) -> String {
    format!("{}/jsonrpc/", server.uri())
}

/// Client with the fake's valid credentials
pub fn client_for(server: &MockServer) -> InwxClient {
    InwxClient::with_endpoint(USERNAME, PASSWORD, endpoint(server)).unwrap()
}
