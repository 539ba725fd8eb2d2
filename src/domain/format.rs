//! Identifier format catalog.
//!
//! Every supported layout is described once here: its template, the
//! regular-expression-equivalent shape rule, and the encode/decode pair used
//! by the generator and the validator respectively.
//!
//! | Kind       | Shape                                   | Example                       |
//! |------------|-----------------------------------------|-------------------------------|
//! | `standard` | `PREFIX-YYYYMMDD-NNNN`                  | `RB-20240601-0001`            |
//! | `compact`  | `PREFIXYYMMDDNNN`                       | `RB240601001`                 |
//! | `detailed` | `PREFIX-YYYY-MM-DD[-HH-MM]-NNNN`        | `RB-2024-06-01-14-30-0001`    |
//! | `business` | `PREFIX-SSSSSSSSSS-YYYYMMDD-NNNN`       | `RB-3F9A0C21B7-20240601-0001` |

use std::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use super::identifier::{ParsedOrderNumber, SellerToken};
use super::sequence::MAX_SEQUENCE_DIGITS;

/// Longest prefix kept after normalization.
pub const MAX_PREFIX_LEN: usize = 16;

/// Supported identifier layouts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormatKind {
    /// `PREFIX-YYYYMMDD-NNNN`
    #[default]
    Standard,
    /// `PREFIXYYMMDDNNN`
    Compact,
    /// `PREFIX-YYYY-MM-DD-NNNN`, optionally with `-HH-MM` before the sequence.
    Detailed,
    /// `PREFIX-<seller token>-YYYYMMDD-NNNN`
    Business,
}

impl FormatKind {
    /// Every catalog entry, in display order.
    pub const ALL: [Self; 4] = [Self::Standard, Self::Compact, Self::Detailed, Self::Business];

    /// Lowercase name used in configuration and on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Compact => "compact",
            Self::Detailed => "detailed",
            Self::Business => "business",
        }
    }

    /// Sequence width used when the caller does not pick one.
    #[must_use]
    pub const fn default_sequence_length(self) -> usize {
        match self {
            Self::Compact => 3,
            Self::Standard | Self::Detailed | Self::Business => 4,
        }
    }

    /// Catalog entry for this format.
    #[must_use]
    pub const fn descriptor(self) -> FormatDescriptor {
        match self {
            Self::Standard => FormatDescriptor {
                kind: self,
                template: "PREFIX-YYYYMMDD-NNNN",
                pattern: "^[A-Za-z]{1,16}-[0-9]{8}-[0-9]{1,19}$",
                description: "Brand prefix, full date and daily sequence separated by dashes",
                example: "RB-20240601-0001",
            },
            Self::Compact => FormatDescriptor {
                kind: self,
                template: "PREFIXYYMMDDNNN",
                pattern: "^[A-Za-z]{1,16}[0-9]{6}[0-9]{1,19}$",
                description: "Separator-free form with a two-digit year, for labels and SMS",
                example: "RB240601001",
            },
            Self::Detailed => FormatDescriptor {
                kind: self,
                template: "PREFIX-YYYY-MM-DD-HH-MM-NNNN",
                pattern: "^[A-Za-z]{1,16}-[0-9]{4}-[0-9]{2}-[0-9]{2}(-[0-9]{2}-[0-9]{2})?-[0-9]{1,19}$",
                description: "Dash-separated date fields, optionally followed by hour and minute",
                example: "RB-2024-06-01-14-30-0001",
            },
            Self::Business => FormatDescriptor {
                kind: self,
                template: "PREFIX-SSSSSSSSSS-YYYYMMDD-NNNN",
                pattern: "^[A-Za-z]{1,16}-[0-9A-F]{10}-[0-9]{8}-[0-9]{1,19}$",
                description: "Standard layout with a seller token, traceable to the originating seller",
                example: "RB-3F9A0C21B7-20240601-0001",
            },
        }
    }

    /// Decode `candidate` against this format.
    ///
    /// Returns `None` for anything that does not match the full string.
    #[must_use]
    pub fn decode(self, candidate: &str) -> Option<ParsedOrderNumber> {
        match self {
            Self::Standard => decode_standard(candidate),
            Self::Compact => decode_compact(candidate),
            Self::Detailed => decode_detailed(candidate),
            Self::Business => decode_business(candidate),
        }
    }
}

impl std::fmt::Display for FormatKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FormatKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!("unknown format '{s}', expected one of: standard, compact, detailed, business")
            })
    }
}

/// Human-facing description of a catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FormatDescriptor {
    /// Format this entry describes.
    pub kind: FormatKind,
    /// Field layout.
    pub template: &'static str,
    /// Equivalent regular expression for the shape rule.
    ///
    /// The decoder additionally requires date fields to form a real calendar date.
    pub pattern: &'static str,
    /// One-line description.
    pub description: &'static str,
    /// Sample identifier.
    pub example: &'static str,
}

/// Look up the catalog entry for `kind`.
#[must_use]
pub const fn describe(kind: FormatKind) -> FormatDescriptor {
    kind.descriptor()
}

/// All catalog entries.
#[must_use]
pub fn all() -> Vec<FormatDescriptor> {
    FormatKind::ALL.iter().map(|kind| kind.descriptor()).collect()
}

/// A format resolved for rendering, carrying the data only some layouts need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Layout {
    /// See [`FormatKind::Standard`].
    Standard,
    /// See [`FormatKind::Compact`].
    Compact,
    /// See [`FormatKind::Detailed`].
    Detailed {
        /// Emit hour and minute after the date.
        include_time: bool,
    },
    /// See [`FormatKind::Business`].
    Business {
        /// Token identifying the originating seller.
        seller: SellerToken,
    },
}

impl Layout {
    /// Catalog kind of this layout.
    #[must_use]
    pub const fn kind(&self) -> FormatKind {
        match self {
            Self::Standard => FormatKind::Standard,
            Self::Compact => FormatKind::Compact,
            Self::Detailed { .. } => FormatKind::Detailed,
            Self::Business { .. } => FormatKind::Business,
        }
    }

    /// Render an identifier.
    ///
    /// `sequence` is zero-padded to `width`; a value with more digits than
    /// `width` keeps all of its digits.
    #[must_use]
    pub fn encode(&self, prefix: &str, at: NaiveDateTime, sequence: u64, width: usize) -> String {
        let seq = format!("{sequence:0width$}");
        match self {
            Self::Standard => format!("{prefix}-{}-{seq}", at.format("%Y%m%d")),
            Self::Compact => format!("{prefix}{}{seq}", at.format("%y%m%d")),
            Self::Detailed {
                include_time: false,
            } => format!("{prefix}-{}-{seq}", at.format("%Y-%m-%d")),
            Self::Detailed { include_time: true } => {
                format!("{prefix}-{}-{seq}", at.format("%Y-%m-%d-%H-%M"))
            }
            Self::Business { seller } => {
                format!("{prefix}-{seller}-{}-{seq}", at.format("%Y%m%d"))
            }
        }
    }
}

fn decode_standard(candidate: &str) -> Option<ParsedOrderNumber> {
    let [prefix, date, seq] = split_fields::<3>(candidate)?;
    Some(ParsedOrderNumber {
        kind: FormatKind::Standard,
        prefix: parse_prefix(prefix)?,
        seller: None,
        date: parse_date8(date)?,
        time: None,
        sequence: parse_sequence(seq)?,
        sequence_digits: seq.len(),
    })
}

fn decode_compact(candidate: &str) -> Option<ParsedOrderNumber> {
    let split = candidate.find(|c: char| !c.is_ascii_alphabetic())?;
    let (prefix, rest) = candidate.split_at(split);
    if rest.len() < 7 || !rest.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let (date, seq) = rest.split_at(6);
    let year = 2000 + i32::try_from(parse_fixed(&date[0..2], 2)?).ok()?;
    Some(ParsedOrderNumber {
        kind: FormatKind::Compact,
        prefix: parse_prefix(prefix)?,
        seller: None,
        date: NaiveDate::from_ymd_opt(
            year,
            parse_fixed(&date[2..4], 2)?,
            parse_fixed(&date[4..6], 2)?,
        )?,
        time: None,
        sequence: parse_sequence(seq)?,
        sequence_digits: seq.len(),
    })
}

fn decode_detailed(candidate: &str) -> Option<ParsedOrderNumber> {
    let fields: Vec<&str> = candidate.split('-').collect();
    let (prefix, year, month, day, time, seq) = match fields.as_slice() {
        [prefix, year, month, day, seq] => (*prefix, *year, *month, *day, None, *seq),
        [prefix, year, month, day, hour, minute, seq] => (
            *prefix,
            *year,
            *month,
            *day,
            Some(NaiveTime::from_hms_opt(
                parse_fixed(hour, 2)?,
                parse_fixed(minute, 2)?,
                0,
            )?),
            *seq,
        ),
        _ => return None,
    };
    Some(ParsedOrderNumber {
        kind: FormatKind::Detailed,
        prefix: parse_prefix(prefix)?,
        seller: None,
        date: NaiveDate::from_ymd_opt(
            i32::try_from(parse_fixed(year, 4)?).ok()?,
            parse_fixed(month, 2)?,
            parse_fixed(day, 2)?,
        )?,
        time,
        sequence: parse_sequence(seq)?,
        sequence_digits: seq.len(),
    })
}

fn decode_business(candidate: &str) -> Option<ParsedOrderNumber> {
    let [prefix, seller, date, seq] = split_fields::<4>(candidate)?;
    Some(ParsedOrderNumber {
        kind: FormatKind::Business,
        prefix: parse_prefix(prefix)?,
        seller: Some(SellerToken::parse(seller)?),
        date: parse_date8(date)?,
        time: None,
        sequence: parse_sequence(seq)?,
        sequence_digits: seq.len(),
    })
}

/// Split on `-` into exactly `N` fields.
fn split_fields<const N: usize>(candidate: &str) -> Option<[&str; N]> {
    let fields: Vec<&str> = candidate.split('-').collect();
    fields.try_into().ok()
}

fn parse_prefix(field: &str) -> Option<String> {
    ((1..=MAX_PREFIX_LEN).contains(&field.len()) && field.bytes().all(|b| b.is_ascii_alphabetic()))
        .then(|| field.to_string())
}

/// Parse a field of exactly `width` ASCII digits.
fn parse_fixed(field: &str, width: usize) -> Option<u32> {
    if field.len() != width || !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    field.parse().ok()
}

/// Parse `YYYYMMDD` into a calendar date.
fn parse_date8(field: &str) -> Option<NaiveDate> {
    if field.len() != 8 || !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDate::from_ymd_opt(
        i32::try_from(parse_fixed(field.get(0..4)?, 4)?).ok()?,
        parse_fixed(field.get(4..6)?, 2)?,
        parse_fixed(field.get(6..8)?, 2)?,
    )
}

fn parse_sequence(field: &str) -> Option<u64> {
    if !(1..=MAX_SEQUENCE_DIGITS).contains(&field.len())
        || !field.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }
    field.parse().ok()
}
