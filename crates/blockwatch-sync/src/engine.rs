//! The sync engine: polls the node and commits watched transactions.
//!
//! # Iteration
//! 1. Ask the node for its head block number.
//! 2. Nothing new (head == cursor) → idle tick. Head behind cursor → skip.
//! 3. Fetch the target block: the head itself ([`CatchUpMode::JumpToHead`]) or
//!    every block after the cursor ([`CatchUpMode::Sequential`]).
//! 4. Refetch the cursor block and verify the chain still contains it.
//! 5. Extract transactions and commit them with the cursor advance.
//!
//! Failures abandon the iteration without moving the cursor; the next tick
//! retries. A failed continuity check is fatal under [`ReorgPolicy::Halt`].

use std::ops::RangeInclusive;
use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn, Instrument, Span};

use blockwatch_core::client::ChainClient;
use blockwatch_core::config::{CatchUpMode, ReorgPolicy, SyncConfig};
use blockwatch_core::cursor::SyncCursor;
use blockwatch_core::error::SyncError;
use blockwatch_core::state::{EngineState, StopReason};
use blockwatch_core::storage::Storage;
use blockwatch_core::types::BlockSummary;

use crate::extract::extract_transactions;
use crate::metrics::MetricsHandle;
use crate::parser::BlockParser;

/// What a single poll iteration did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// The node has no block past the cursor.
    Idle { head: i64 },
    /// The node reports a head below the cursor; nothing was done.
    Behind { head: i64, cursor: i64 },
    /// One or more blocks were committed.
    Processed {
        blocks: u64,
        matched: usize,
        cursor: i64,
    },
}

/// Block synchronization engine.
///
/// Created `Idle`; [`SyncEngine::start`] consumes it and runs the loop on a
/// Tokio task, so a stopped engine can never be restarted.
pub struct SyncEngine<C> {
    config: SyncConfig,
    client: C,
    storage: Arc<dyn Storage>,
    cursor: SyncCursor,
    state: watch::Sender<EngineState>,
    metrics: MetricsHandle,
    span: Span,
}

impl<C: ChainClient> SyncEngine<C> {
    pub fn new(config: SyncConfig, client: C, storage: Arc<dyn Storage>) -> Self {
        let span = tracing::info_span!("sync", chain = %config.chain);
        Self {
            config,
            client,
            storage,
            cursor: SyncCursor::new(),
            state: watch::channel(EngineState::Idle).0,
            metrics: MetricsHandle::new(),
            span,
        }
    }

    /// Replace the span the loop's log events are recorded under.
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn cursor(&self) -> &SyncCursor {
        &self.cursor
    }

    pub fn state(&self) -> EngineState {
        self.state.borrow().clone()
    }

    pub fn metrics(&self) -> MetricsHandle {
        self.metrics.clone()
    }

    /// Build the query facade over this engine's registry and state.
    pub fn parser(&self) -> BlockParser {
        BlockParser::new(
            Arc::clone(&self.storage),
            self.state.subscribe(),
            self.metrics.clone(),
        )
    }

    /// Run one poll iteration.
    pub async fn tick(&mut self) -> Result<TickOutcome, SyncError> {
        let head = self.client.head_block_number().await?;

        if !self.cursor.is_unset() {
            let cursor = self.cursor.block_number;
            if head == cursor {
                return Ok(TickOutcome::Idle { head });
            }
            if head < cursor {
                warn!(head, cursor, "node head is behind the cursor; skipping");
                return Ok(TickOutcome::Behind { head, cursor });
            }
        }

        let targets = self.targets(head);
        if targets.is_empty() {
            return Ok(TickOutcome::Idle { head });
        }

        let mut blocks = 0;
        let mut matched = 0;
        for number in targets {
            matched += self.process_block(number).await?;
            blocks += 1;
        }

        Ok(TickOutcome::Processed {
            blocks,
            matched,
            cursor: self.cursor.block_number,
        })
    }

    fn targets(&self, head: i64) -> RangeInclusive<i64> {
        match self.config.catch_up {
            CatchUpMode::JumpToHead => head..=head,
            CatchUpMode::Sequential => {
                let from = if self.cursor.is_unset() {
                    self.config.start_block.unwrap_or(head)
                } else {
                    self.cursor.next_block()
                };
                let cap =
                    i64::try_from(self.config.max_blocks_per_tick.max(1)).unwrap_or(i64::MAX);
                let to = head.min(from.saturating_add(cap - 1));
                from..=to
            }
        }
    }

    /// Fetch, verify and commit one block. Returns the number of registry
    /// entries appended.
    async fn process_block(&mut self, number: i64) -> Result<usize, SyncError> {
        let payload = self.client.block_by_number(number).await?;
        let block = payload.summary()?;
        if block.number != number {
            return Err(SyncError::Decode(format!(
                "requested block {number}, node returned {}",
                block.number
            )));
        }

        if !self.cursor.is_unset() {
            self.verify_continuity(&block).await?;
        }

        let extracted = extract_transactions(&payload);

        // No await between commit and cursor advance: cancellation can drop
        // this future before the commit, never in between.
        let matched = self
            .storage
            .commit_block(block.number, &extracted.transactions);
        self.cursor.advance(block.number, block.hash.clone());

        self.metrics.record(|m| {
            m.blocks_processed += 1;
            m.transactions_seen += block.tx_count as u64;
            m.transactions_matched += matched as u64;
            m.transactions_skipped += extracted.skipped as u64;
            m.last_block_at = Some(chrono::Utc::now().timestamp());
        });

        debug!(
            block = block.number,
            hash = %block.hash,
            txs = block.tx_count,
            matched,
            skipped = extracted.skipped,
            "block committed"
        );
        Ok(matched)
    }

    /// Check that the cursor block is still canonical and, for a direct
    /// successor, that `block` builds on it.
    async fn verify_continuity(&mut self, block: &BlockSummary) -> Result<(), SyncError> {
        let cursor_number = self.cursor.block_number;
        let canonical = self.client.block_by_number(cursor_number).await?.summary()?;

        let recorded = self.cursor.block_hash.clone().unwrap_or_default();
        let mismatch = if recorded != canonical.hash {
            Some((recorded, canonical.hash.clone()))
        } else if block.number == cursor_number + 1 && !block.extends(&canonical) {
            Some((canonical.hash.clone(), block.parent_hash.clone()))
        } else {
            None
        };

        let Some((expected, actual)) = mismatch else {
            return Ok(());
        };

        self.metrics.record(|m| m.reorgs_detected += 1);
        let err = SyncError::ReorgDetected {
            block_number: cursor_number,
            expected,
            actual,
        };

        match self.config.reorg_policy {
            ReorgPolicy::Halt => Err(err),
            ReorgPolicy::Resume => {
                warn!(
                    error = %err,
                    next = block.number,
                    "reorg detected; continuing from new block"
                );
                Ok(())
            }
        }
    }

    /// Run the poll loop until `cancel` fires or a fatal reorg is detected.
    pub async fn run(mut self, cancel: CancellationToken) -> Result<(), SyncError> {
        let span = self.span.clone();
        self.run_loop(cancel).instrument(span).await
    }

    async fn run_loop(&mut self, cancel: CancellationToken) -> Result<(), SyncError> {
        self.state.send_replace(EngineState::Running);
        info!(
            interval_ms = self.config.poll_interval_ms,
            catch_up = ?self.config.catch_up,
            reorg_policy = ?self.config.reorg_policy,
            "sync engine started"
        );

        let mut interval = time::interval(self.config.poll_interval());
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                _ = interval.tick() => {}
            }

            let result = tokio::select! {
                biased;
                _ = cancel.cancelled() => break,
                res = self.tick() => res,
            };

            match result {
                Ok(outcome) => {
                    self.metrics.record(|m| {
                        m.ticks += 1;
                        if matches!(outcome, TickOutcome::Idle { .. }) {
                            m.idle_ticks += 1;
                        }
                    });
                    if let TickOutcome::Processed { cursor, matched, .. } = outcome {
                        info!(block = cursor, matched, "synced");
                    }
                }
                Err(SyncError::ReorgDetected {
                    block_number,
                    expected,
                    actual,
                }) => {
                    error!(
                        block = block_number,
                        %expected,
                        %actual,
                        "chain continuity broken; stopping sync engine"
                    );
                    let reason = StopReason::ReorgDetected {
                        block_number,
                        expected: expected.clone(),
                        actual: actual.clone(),
                    };
                    self.state.send_replace(EngineState::Stopped { reason });
                    return Err(SyncError::ReorgDetected {
                        block_number,
                        expected,
                        actual,
                    });
                }
                Err(e) => {
                    self.metrics.record(|m| m.failed_ticks += 1);
                    warn!(
                        error = %e,
                        cursor = self.cursor.block_number,
                        "sync iteration failed; retrying next tick"
                    );
                }
            }
        }

        self.state.send_replace(EngineState::Stopped {
            reason: StopReason::Requested,
        });
        info!(cursor = self.cursor.block_number, "sync engine stopped");
        Ok(())
    }
}

impl<C: ChainClient + 'static> SyncEngine<C> {
    /// Move the engine onto a background task. `cancel` is the stop signal.
    pub fn start(self, cancel: CancellationToken) -> SyncHandle {
        let state = self.state.subscribe();
        let task = tokio::spawn(self.run(cancel.clone()));
        SyncHandle {
            cancel,
            task,
            state,
        }
    }
}

/// Handle to a running engine.
pub struct SyncHandle {
    cancel: CancellationToken,
    task: JoinHandle<Result<(), SyncError>>,
    state: watch::Receiver<EngineState>,
}

impl SyncHandle {
    /// Raise the stop signal. The loop exits at its next await point.
    pub fn stop(&self) {
        self.cancel.cancel();
    }

    pub fn state(&self) -> EngineState {
        self.state.borrow().clone()
    }

    /// Wait until the engine reaches `Stopped` and return that state.
    ///
    /// A task that exits without publishing a terminal state (a panic)
    /// yields `Stopped { reason: Aborted }`.
    pub async fn stopped(&mut self) -> EngineState {
        match self.state.wait_for(EngineState::is_stopped).await {
            Ok(state) => state.clone(),
            Err(_) => EngineState::Stopped {
                reason: StopReason::Aborted,
            },
        }
    }

    /// Await the task's result.
    pub async fn join(self) -> Result<(), SyncError> {
        match self.task.await {
            Ok(result) => result,
            Err(e) => Err(SyncError::Aborted(e.to_string())),
        }
    }

    /// Stop the engine and await its result.
    pub async fn shutdown(self) -> Result<(), SyncError> {
        self.stop();
        self.join().await
    }
}
