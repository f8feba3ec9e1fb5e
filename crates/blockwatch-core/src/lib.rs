//! blockwatch-core: shared vocabulary for the BlockWatch transaction watcher.
//!
//! # Architecture
//!
//! ```text
//! ChainClient ──▶ SyncEngine ──commit_block──▶ Storage ◀── BlockParser ◀── REST
//!  (rpc crate)    (sync crate)               (registry)   (query facade)
//! ```
//!
//! This crate holds the pieces every other crate agrees on: the data model,
//! the two capability traits ([`Storage`], [`ChainClient`]) and the error type.

pub mod address;
pub mod client;
pub mod config;
pub mod cursor;
pub mod error;
pub mod hex;
pub mod state;
pub mod storage;
pub mod types;

pub use address::Address;
pub use client::ChainClient;
pub use config::{CatchUpMode, ReorgPolicy, SyncConfig};
pub use cursor::SyncCursor;
pub use error::SyncError;
pub use state::{EngineState, StopReason};
pub use storage::Storage;
pub use types::{BlockPayload, BlockSummary, Transaction};
