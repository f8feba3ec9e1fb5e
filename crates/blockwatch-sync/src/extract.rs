//! Transaction extraction from raw block payloads.
//!
//! Each transaction object is decoded on its own. A malformed entry is
//! skipped and counted; it never aborts the rest of the block.

use serde_json::{Map, Value};

use blockwatch_core::address::Address;
use blockwatch_core::error::SyncError;
use blockwatch_core::hex::parse_hex_i64;
use blockwatch_core::types::{BlockPayload, Transaction};

/// Result of extracting a block's transactions.
#[derive(Debug, Default)]
pub struct Extracted {
    /// Well-formed transactions in block order.
    pub transactions: Vec<Transaction>,
    /// Entries that failed to decode.
    pub skipped: usize,
}

/// Decode every transaction object in `block`.
pub fn extract_transactions(block: &BlockPayload) -> Extracted {
    let mut out = Extracted {
        transactions: Vec::with_capacity(block.transactions.len()),
        skipped: 0,
    };

    for (index, raw) in block.transactions.iter().enumerate() {
        match decode_transaction(raw) {
            Ok(tx) => out.transactions.push(tx),
            Err(e) => {
                tracing::warn!(
                    block = %block.number,
                    index,
                    error = %e,
                    "skipping malformed transaction"
                );
                out.skipped += 1;
            }
        }
    }
    out
}

/// Decode a single transaction object from `eth_getBlockByNumber`.
pub fn decode_transaction(raw: &Value) -> Result<Transaction, SyncError> {
    let obj = raw
        .as_object()
        .ok_or_else(|| SyncError::Decode("transaction is not an object".into()))?;

    let hash = str_field(obj, "hash")?.to_string();
    let from = Address::parse(str_field(obj, "from")?)
        .map_err(|e| SyncError::Decode(format!("bad `from`: {e}")))?;
    let to = match obj.get("to") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(
            Address::parse(s).map_err(|e| SyncError::Decode(format!("bad `to`: {e}")))?,
        ),
        Some(other) => return Err(SyncError::Decode(format!("bad `to`: {other}"))),
    };
    let value = str_field(obj, "value")?.to_string();
    let block_number = parse_hex_i64(str_field(obj, "blockNumber")?)?;

    Ok(Transaction {
        hash,
        from: from.into_string(),
        to: to.map(Address::into_string),
        value,
        block_number,
    })
}

fn str_field<'a>(obj: &'a Map<String, Value>, name: &str) -> Result<&'a str, SyncError> {
    obj.get(name)
        .and_then(Value::as_str)
        .ok_or_else(|| SyncError::Decode(format!("missing or non-string `{name}`")))
}
