//! blockwatch-sync: the block synchronization engine.
//!
//! # Per-tick flow
//!
//! ```text
//! head_block_number ─▶ pick target block(s) ─▶ block_by_number
//!        ─▶ continuity check (refetch cursor block) ─▶ extract transactions
//!        ─▶ Storage::commit_block (store + advance, one lock) ─▶ advance cursor
//! ```
//!
//! [`SyncEngine`] owns the loop, [`BlockParser`] is the synchronous query
//! facade handed to API layers.

pub mod builder;
pub mod engine;
pub mod extract;
pub mod metrics;
pub mod parser;

#[cfg(test)]
mod mock;

pub use builder::SyncEngineBuilder;
pub use engine::{SyncEngine, SyncHandle, TickOutcome};
pub use metrics::{MetricsHandle, SyncMetrics};
pub use parser::{BlockParser, Parser};
