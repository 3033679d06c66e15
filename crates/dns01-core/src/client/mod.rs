//! Record client implementations shipped with the core
//!
//! Live provider clients live in their own crates.

pub mod memory;

pub use memory::MemoryRecordClient;
