//! Engine lifecycle states.

use serde::{Deserialize, Serialize};

/// Runtime state of the sync engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum EngineState {
    /// Constructed, not yet started.
    Idle,
    /// Poll loop active.
    Running,
    /// Loop exited. Terminal; a fresh engine is required to resume.
    Stopped { reason: StopReason },
}

/// Why the engine stopped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StopReason {
    /// The stop signal was raised.
    Requested,
    /// The previously processed block is no longer canonical.
    ReorgDetected {
        block_number: i64,
        expected: String,
        actual: String,
    },
    /// The engine task exited without reporting a state, e.g. it panicked.
    Aborted,
}

impl EngineState {
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running)
    }

    pub fn is_stopped(&self) -> bool {
        matches!(self, Self::Stopped { .. })
    }
}

impl std::fmt::Display for EngineState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Running => write!(f, "running"),
            Self::Stopped {
                reason: StopReason::Requested,
            } => write!(f, "stopped"),
            Self::Stopped {
                reason: StopReason::ReorgDetected { block_number, .. },
            } => write!(f, "stopped (reorg at block {block_number})"),
            Self::Stopped {
                reason: StopReason::Aborted,
            } => write!(f, "stopped (aborted)"),
        }
    }
}
