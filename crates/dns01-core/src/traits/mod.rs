//! Core traits for the DNS-01 responder
//!
//! - [`RecordClient`]: Provider capability surface (session, zones, records)
//! - [`ZonePager`]: Single-page zone listing used by the zone cache
//! - [`Dns01Solver`]: Lifecycle contract driven by the hosting framework

pub mod record_client;
pub mod zone_pager;
pub mod solver;

pub use record_client::{RecordClient, RecordClientFactory};
pub use zone_pager::{ZonePage, ZonePager};
pub use solver::Dns01Solver;
