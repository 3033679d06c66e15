//! Domain types shared by the solver and record clients

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default TTL (seconds) for challenge records
pub const DEFAULT_RECORD_TTL: u32 = 60;

/// A DNS-01 challenge handed to the solver by the hosting framework
///
/// Both names carry a trailing dot, e.g. `_acme-challenge.example.com.`
/// and `example.com.`. `key` is the TXT content and the only thing that
/// tells two concurrent challenges for the same FQDN apart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeRequest {
    #[serde(rename = "resolvedFQDN")]
    pub resolved_fqdn: String,
    #[serde(rename = "resolvedZone")]
    pub resolved_zone: String,
    pub key: String,
}

impl ChallengeRequest {
    pub fn new(
        resolved_fqdn: impl Into<String>,
        resolved_zone: impl Into<String>,
        key: impl Into<String>,
    ) -> Self {
        Self {
            resolved_fqdn: resolved_fqdn.into(),
            resolved_zone: resolved_zone.into(),
            key: key.into(),
        }
    }
}

/// DNS record type as reported by the provider
///
/// Only TXT records are ever created or deleted; everything else is
/// carried through verbatim so listings stay lossless.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RecordType {
    Txt,
    Other(String),
}

impl RecordType {
    pub fn as_str(&self) -> &str {
        match self {
            RecordType::Txt => "TXT",
            RecordType::Other(other) => other,
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("TXT") {
            Ok(RecordType::Txt)
        } else {
            Ok(RecordType::Other(s.to_ascii_uppercase()))
        }
    }
}

impl From<&str> for RecordType {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(record_type) => record_type,
            Err(never) => match never {},
        }
    }
}

impl Serialize for RecordType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for RecordType {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(RecordType::from(raw.as_str()))
    }
}

/// A record as listed by the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Provider-assigned identifier
    pub id: String,
    /// Owning zone, without trailing dot
    pub zone: String,
    /// Name relative to the zone; empty string is the apex
    pub name: String,
    pub record_type: RecordType,
    pub content: String,
    pub ttl: u32,
}

impl Record {
    /// Whether this record is the TXT record for `name` carrying `content`
    ///
    /// Name, type and content must all match. Matching on name alone would
    /// let one challenge's cleanup remove a sibling challenge's record.
    pub fn is_challenge(&self, name: &str, content: &str) -> bool {
        self.record_type == RecordType::Txt && self.name == name && self.content == content
    }
}

/// Parameters for creating a record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateRecordRequest {
    pub zone: String,
    pub name: String,
    pub record_type: RecordType,
    pub content: String,
    pub ttl: u32,
}

impl CreateRecordRequest {
    /// Build a TXT record request
    pub fn txt(
        zone: impl Into<String>,
        name: impl Into<String>,
        content: impl Into<String>,
        ttl: u32,
    ) -> Self {
        Self {
            zone: zone.into(),
            name: name.into(),
            record_type: RecordType::Txt,
            content: content.into(),
            ttl,
        }
    }
}

/// What the provider tells us about a freshly opened session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginInfo {
    pub customer_id: Option<i64>,
    pub account_id: Option<i64>,
}
