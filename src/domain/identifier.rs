//! Identifier value types.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::FormatKind;

/// Length of a seller token in hex characters.
pub const SELLER_TOKEN_LEN: usize = 10;

/// An issued order number.
///
/// Opaque to callers; use [`OrderNumber::as_str`] or `Display` to store or show it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderNumber(String);

impl OrderNumber {
    pub(crate) const fn new(value: String) -> Self {
        Self(value)
    }

    /// Borrow the identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Take the identifier text.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for OrderNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for OrderNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<OrderNumber> for String {
    fn from(value: OrderNumber) -> Self {
        value.0
    }
}

/// Stable token derived from a seller id.
///
/// The first five bytes of the SHA-256 digest of the trimmed seller id,
/// upper-case hex. The same seller always yields the same token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SellerToken(String);

impl SellerToken {
    /// Derive the token for `seller_id`.
    ///
    /// Returns `None` when the id is empty or whitespace only.
    #[must_use]
    pub fn from_seller_id(seller_id: &str) -> Option<Self> {
        let trimmed = seller_id.trim();
        if trimmed.is_empty() {
            return None;
        }
        let digest = Sha256::digest(trimmed.as_bytes());
        Some(Self(hex::encode_upper(&digest[..SELLER_TOKEN_LEN / 2])))
    }

    /// Accept an already-encoded token as it appears inside an identifier.
    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        let well_formed = token.len() == SELLER_TOKEN_LEN
            && token
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'A'..=b'F').contains(&b));
        well_formed.then(|| Self(token.to_string()))
    }

    /// Token text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SellerToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fields recovered from a well-formed identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedOrderNumber {
    /// Format the candidate matched.
    pub kind: FormatKind,
    /// Brand prefix as written.
    pub prefix: String,
    /// Seller token, business identifiers only.
    pub seller: Option<SellerToken>,
    /// Calendar day encoded in the identifier.
    pub date: NaiveDate,
    /// Hour and minute, detailed identifiers with time only.
    pub time: Option<NaiveTime>,
    /// Sequence value.
    pub sequence: u64,
    /// Number of digits the sequence was written with.
    pub sequence_digits: usize,
}
