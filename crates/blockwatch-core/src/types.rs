//! Shared types for the sync pipeline.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::SyncError;
use crate::hex::parse_hex_i64;

// ─── Transaction ──────────────────────────────────────────────────────────────

/// A transaction touching at least one watched address.
///
/// Immutable once produced by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Transaction hash (`0x…`).
    pub hash: String,
    /// Sender address, normalized.
    pub from: String,
    /// Recipient address, normalized. `None` for contract creation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    /// Transferred amount exactly as reported by the node (usually hex wei).
    pub value: String,
    /// Number of the block that included the transaction.
    pub block_number: i64,
}

impl Transaction {
    /// Returns `true` if `address` is the sender or the recipient.
    pub fn touches(&self, address: &str) -> bool {
        self.from == address || self.to.as_deref() == Some(address)
    }
}

// ─── BlockPayload ─────────────────────────────────────────────────────────────

/// A block as returned by `eth_getBlockByNumber(n, true)`.
///
/// Numeric fields stay hex-encoded; transaction objects stay raw so that one
/// malformed entry cannot poison the rest of the block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockPayload {
    /// Block number as a hex quantity (`0x…`).
    pub number: String,
    /// Block hash (`0x…`).
    pub hash: String,
    /// Parent block hash (`0x…`).
    pub parent_hash: String,
    /// Full transaction objects in block order.
    #[serde(default)]
    pub transactions: Vec<Value>,
}

impl BlockPayload {
    /// Decode the header fields into a [`BlockSummary`].
    pub fn summary(&self) -> Result<BlockSummary, SyncError> {
        Ok(BlockSummary {
            number: parse_hex_i64(&self.number)?,
            hash: self.hash.clone(),
            parent_hash: self.parent_hash.clone(),
            tx_count: self.transactions.len(),
        })
    }
}

// ─── BlockSummary ─────────────────────────────────────────────────────────────

/// Decoded block header: enough for the engine to track continuity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockSummary {
    pub number: i64,
    pub hash: String,
    pub parent_hash: String,
    pub tx_count: usize,
}

impl BlockSummary {
    /// Returns `true` if `parent` is the direct parent of `self`.
    pub fn extends(&self, parent: &BlockSummary) -> bool {
        self.number == parent.number + 1 && self.parent_hash == parent.hash
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn transaction_json_shape() {
        let tx = Transaction {
            hash: "0xabc".into(),
            from: "0x1".into(),
            to: None,
            value: "100".into(),
            block_number: 5,
        };
        let v = serde_json::to_value(&tx).unwrap();
        assert_eq!(v["blockNumber"], 5);
        assert!(v.get("to").is_none(), "contract creation omits `to`");
        assert!(tx.touches("0x1"));
        assert!(!tx.touches("0x2"));
    }

    #[test]
    fn payload_from_node_json() {
        let raw = json!({
            "number": "0x10",
            "hash": "0xbbb",
            "parentHash": "0xaaa",
            "timestamp": "0x0",
            "transactions": [{"hash": "0x1"}, {"hash": "0x2"}]
        });
        let payload: BlockPayload = serde_json::from_value(raw).unwrap();
        let summary = payload.summary().unwrap();
        assert_eq!(summary.number, 16);
        assert_eq!(summary.parent_hash, "0xaaa");
        assert_eq!(summary.tx_count, 2);
    }

    #[test]
    fn payload_with_bad_number_fails_to_decode() {
        let payload = BlockPayload {
            number: "sixteen".into(),
            hash: "0xbbb".into(),
            parent_hash: "0xaaa".into(),
            transactions: vec![],
        };
        assert!(matches!(payload.summary(), Err(SyncError::Decode(_))));
    }

    #[test]
    fn block_extends_parent() {
        let parent = BlockSummary {
            number: 100,
            hash: "0xaaa".into(),
            parent_hash: "0x000".into(),
            tx_count: 5,
        };
        let child = BlockSummary {
            number: 101,
            hash: "0xbbb".into(),
            parent_hash: "0xaaa".into(),
            tx_count: 3,
        };
        assert!(child.extends(&parent));
        assert!(!parent.extends(&child));
    }
}
