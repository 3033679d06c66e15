//! Error types for the DNS-01 responder
//!
//! This module defines all error types used throughout the crate.

use thiserror::Error;

/// Result type alias for DNS-01 operations
pub type Result<T> = std::result::Result<T, Error>;

/// Provider conflict code for "object exists" (INWX code 2302)
pub const OBJECT_EXISTS_CODE: i64 = 2302;

/// Core error type for the DNS-01 responder
#[derive(Error, Debug)]
pub enum Error {
    /// Login or logout failed
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// The provider rejected a create because an identical record exists
    #[error("Record already exists (code {code}): {message}")]
    AlreadyExists {
        /// Provider-specific conflict code
        code: i64,
        /// Provider message
        message: String,
    },

    /// Generic provider-side failure
    #[error("Provider error ({provider}): {message}")]
    Provider {
        /// Provider name
        provider: String,
        /// Error message
        message: String,
    },

    /// HTTP transport errors
    #[error("HTTP error: {0}")]
    Http(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A single page of the zone listing failed
    #[error("failed to list nameserver zones (page {page}): {source}")]
    ZonePage {
        /// 1-based page number that failed
        page: u32,
        #[source]
        source: Box<Error>,
    },

    /// Listing the records of a zone failed
    #[error("failed to get records for zone {zone}: {source}")]
    ListRecords {
        zone: String,
        #[source]
        source: Box<Error>,
    },

    /// Creating the challenge record failed
    #[error("failed to create TXT record for {fqdn} in zone {zone}: {source}")]
    CreateRecord {
        fqdn: String,
        zone: String,
        #[source]
        source: Box<Error>,
    },

    /// Deleting the challenge record failed
    #[error("failed to delete TXT record {record_id}: {source}")]
    DeleteRecord {
        record_id: String,
        #[source]
        source: Box<Error>,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// The solver was used before a record client was configured
    #[error("solver is not initialized: no record client configured")]
    NotInitialized,
}

impl Error {
    /// Create an authentication error
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Authentication(msg.into())
    }

    /// Create an "already exists" error carrying the provider's conflict code
    pub fn already_exists(code: i64, message: impl Into<String>) -> Self {
        Self::AlreadyExists {
            code,
            message: message.into(),
        }
    }

    /// Create a provider-specific error
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create an HTTP error
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn zone_page(page: u32, source: Error) -> Self {
        Self::ZonePage {
            page,
            source: Box::new(source),
        }
    }

    pub fn list_records(zone: impl Into<String>, source: Error) -> Self {
        Self::ListRecords {
            zone: zone.into(),
            source: Box::new(source),
        }
    }

    pub fn create_record(fqdn: impl Into<String>, zone: impl Into<String>, source: Error) -> Self {
        Self::CreateRecord {
            fqdn: fqdn.into(),
            zone: zone.into(),
            source: Box::new(source),
        }
    }

    pub fn delete_record(record_id: impl Into<String>, source: Error) -> Self {
        Self::DeleteRecord {
            record_id: record_id.into(),
            source: Box::new(source),
        }
    }

    /// Whether this is a create-time conflict the solver may treat as success
    pub fn is_already_exists(&self) -> bool {
        matches!(self, Self::AlreadyExists { .. })
    }

    /// Whether this is an authentication failure
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Authentication(_))
    }
}
