//! Hex quantity decoding for JSON-RPC numeric fields.

use crate::error::SyncError;

/// Decode a `0x`-prefixed hex quantity into an `i64`.
///
/// Rejects a missing prefix, an empty digit string, non-hex characters, and
/// values above `i64::MAX`.
pub fn parse_hex_i64(s: &str) -> Result<i64, SyncError> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .ok_or_else(|| SyncError::Decode(format!("missing 0x prefix in {s:?}")))?;

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(SyncError::Decode(format!("invalid hex quantity {s:?}")));
    }

    i64::from_str_radix(digits, 16)
        .map_err(|e| SyncError::Decode(format!("hex quantity {s:?} out of range: {e}")))
}

/// Encode a block number as a JSON-RPC hex quantity.
pub fn to_hex_quantity(n: i64) -> String {
    format!("0x{n:x}")
}
