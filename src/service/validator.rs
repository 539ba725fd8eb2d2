//! Order number validation.
//!
//! Validity is a property of shape alone: nothing here looks at sequence
//! counters or at whether an identifier was actually issued.

use crate::domain::{FormatKind, ParsedOrderNumber};

/// Decode `candidate` against `kind`, or against every catalog format when
/// `kind` is `None` (first match wins; formats do not overlap).
#[must_use]
pub fn parse(candidate: &str, kind: Option<FormatKind>) -> Option<ParsedOrderNumber> {
    match kind {
        Some(kind) => kind.decode(candidate),
        None => FormatKind::ALL
            .into_iter()
            .find_map(|kind| kind.decode(candidate)),
    }
}

/// Check whether `candidate` is a well-formed order number.
#[must_use]
pub fn validate(candidate: &str, kind: Option<FormatKind>) -> bool {
    parse(candidate, kind).is_some()
}
