//! DomRobot JSON-RPC wire types
//!
//! Every call answers with the same envelope:
//!
//! ```json
//! { "code": 1000, "msg": "Command completed successfully", "resData": { ... } }
//! ```
//!
//! Codes below 2000 are successes (1500 is the logout acknowledgement).

use dns01_core::types::{Record, RecordType};
use dns01_core::{Error, OBJECT_EXISTS_CODE, Result};
use serde::Deserialize;
use serde_json::Value;

/// First code that denotes a failure
const FIRST_ERROR_CODE: i64 = 2000;

/// Response envelope shared by all methods
#[derive(Debug, Deserialize)]
pub(crate) struct DomRobotResponse {
    pub code: i64,
    #[serde(default)]
    pub msg: String,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(rename = "resData", default)]
    pub res_data: Option<Value>,
}

impl DomRobotResponse {
    /// Turn the envelope into its `resData` payload or a typed error
    pub fn into_result(self) -> Result<Value> {
        if self.code < FIRST_ERROR_CODE {
            return Ok(self.res_data.unwrap_or(Value::Null));
        }

        if self.code == OBJECT_EXISTS_CODE {
            return Err(Error::already_exists(self.code, self.msg));
        }

        let message = match self.reason {
            Some(reason) if !reason.is_empty() => {
                format!("{} (code {}): {}", self.msg, self.code, reason)
            }
            _ => format!("{} (code {})", self.msg, self.code),
        };
        Err(Error::provider("inwx", message))
    }
}

/// `account.login` payload
#[derive(Debug, Deserialize)]
pub(crate) struct LoginData {
    #[serde(rename = "customerId", default)]
    pub customer_id: Option<i64>,
    #[serde(rename = "accountId", default)]
    pub account_id: Option<i64>,
    #[serde(default)]
    pub tfa: Value,
}

impl LoginData {
    /// Whether the account demands a second factor before it can be used
    pub fn requires_second_factor(&self) -> bool {
        match &self.tfa {
            Value::Null => false,
            Value::String(s) => !s.is_empty() && s != "0",
            Value::Number(n) => n.as_i64() != Some(0),
            Value::Bool(b) => *b,
            _ => true,
        }
    }
}

/// `nameserver.list` payload
#[derive(Debug, Deserialize)]
pub(crate) struct NameserverList {
    #[serde(default)]
    pub count: usize,
    #[serde(default)]
    pub domains: Vec<NameserverDomain>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct NameserverDomain {
    pub domain: String,
}

/// `nameserver.info` payload
#[derive(Debug, Deserialize)]
pub(crate) struct NameserverInfo {
    #[serde(default)]
    pub record: Vec<NameserverRecord>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct NameserverRecord {
    pub id: Value,
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub ttl: u32,
}

impl NameserverRecord {
    pub fn into_record(self, zone: &str) -> Record {
        Record {
            id: id_to_string(&self.id),
            zone: zone.to_string(),
            name: full_name_to_relative(&self.name, zone),
            record_type: RecordType::from(self.record_type.as_str()),
            content: self.content,
            ttl: self.ttl,
        }
    }
}

/// Record ids arrive as numbers but are opaque strings to callers
pub(crate) fn id_to_string(id: &Value) -> String {
    match id {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Send numeric ids back as numbers, anything else verbatim
pub(crate) fn id_param(record_id: &str) -> Value {
    match record_id.parse::<i64>() {
        Ok(n) => Value::from(n),
        Err(_) => Value::from(record_id),
    }
}

/// Convert a record name as listed by the API to a zone-relative name
///
/// The API may report names fully qualified ("_acme-challenge.example.com")
/// or relative; both map to "_acme-challenge". The apex maps to "".
pub(crate) fn full_name_to_relative(name: &str, zone: &str) -> String {
    let name = name.strip_suffix('.').unwrap_or(name);

    if name == zone || name == "@" {
        String::new()
    } else if let Some(prefix) = name.strip_suffix(&format!(".{zone}")) {
        prefix.to_string()
    } else {
        name.to_string()
    }
}
