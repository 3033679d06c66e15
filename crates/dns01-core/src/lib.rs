// # dns01-core
//
// Core library for the INWX ACME DNS-01 challenge responder.
//
// ## Architecture Overview
//
// - **RecordClient**: Trait over the DNS provider's record-management API
// - **ZonePager / ZoneCache**: Paginated zone inventory with a time-bounded cache
// - **SharedSession**: One provider session shared by overlapping callers
// - **ChallengeSolver**: Session-scoped Present / CleanUp reconciliation
// - **MemoryRecordClient**: In-memory client for tests and embedders
//
// ## Design Principles
//
// 1. **Separation of Concerns**: Reconciliation logic never talks to the network directly
// 2. **Scoped Sessions**: Every operation is bracketed by login/logout, logout always runs
// 3. **Idempotency**: Duplicate creates and missing records are not errors
// 4. **Provider is the source of truth**: No client-side locking around record creation

pub mod traits;
pub mod types;
pub mod zones;
pub mod session;
pub mod solver;
pub mod config;
pub mod error;
pub mod client;

// Re-export core types for convenience
pub use traits::{Dns01Solver, RecordClient, RecordClientFactory, ZonePage, ZonePager};
pub use types::{ChallengeRequest, CreateRecordRequest, LoginInfo, Record, RecordType};
pub use zones::{ZoneCache, fetch_all_zones};
pub use session::SharedSession;
pub use solver::{ChallengeSolver, derive_relative_name, normalize_name};
pub use config::{ProviderConfig, SolverConfig};
pub use error::{Error, OBJECT_EXISTS_CODE, Result};
pub use client::MemoryRecordClient;
