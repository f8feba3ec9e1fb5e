//! Watched address normalization.

use std::fmt;

use serde::Serialize;

use crate::error::SyncError;

/// A normalized hex address: lowercase, `0x`-prefixed.
///
/// Input may omit the prefix and use any case. No length or checksum
/// validation is performed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    /// Parse and normalize an address string.
    pub fn parse(raw: &str) -> Result<Self, SyncError> {
        let trimmed = raw.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);

        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(SyncError::InvalidAddress(raw.to_string()));
        }

        Ok(Self(format!("0x{}", digits.to_ascii_lowercase())))
    }

    /// The normalized string form.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Address {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Address {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_case_and_prefix() {
        let a = Address::parse("0x1A3F").unwrap();
        assert_eq!(a.as_str(), "0x1a3f");
        assert_eq!(Address::parse("1a3f").unwrap(), a);
        assert_eq!(Address::parse("0X1a3F").unwrap(), a);
    }

    #[test]
    fn rejects_non_hex() {
        assert_eq!(
            Address::parse("0xG"),
            Err(SyncError::InvalidAddress("0xG".into()))
        );
        assert!(Address::parse("").is_err());
        assert!(Address::parse("0x").is_err());
        assert!(Address::parse("0x12 34").is_err());
    }

    #[test]
    fn serializes_as_plain_string() {
        let a = Address::parse("0xAbC").unwrap();
        assert_eq!(serde_json::to_string(&a).unwrap(), "\"0xabc\"");
    }
}
