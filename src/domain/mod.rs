//! Domain models for order numbers.
//!
//! This module contains the format catalog, the caller-facing configuration,
//! identifier value types and sequence bookkeeping types.

pub mod config;
pub mod format;
pub mod identifier;
pub mod sequence;

pub use config::{DEFAULT_PREFIX, IdentifierConfig, MAX_SEQUENCE_LENGTH, ResolvedConfig};
pub use format::{FormatDescriptor, FormatKind, Layout, MAX_PREFIX_LEN, all, describe};
pub use identifier::{OrderNumber, ParsedOrderNumber, SELLER_TOKEN_LEN, SellerToken};
pub use sequence::{
    MAX_SEQUENCE_DIGITS, MAX_SEQUENCE_VALUE, SequenceRange, SequenceState, day_key,
};
