//! Identifier generation parameters.
//!
//! [`IdentifierConfig`] is what callers (and the `[generator]` configuration
//! section) supply; every field is optional. [`IdentifierConfig::resolve`]
//! layers it over a set of defaults and normalizes out-of-range values.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::format::{FormatKind, MAX_PREFIX_LEN};

/// Brand prefix used when none is configured.
pub const DEFAULT_PREFIX: &str = "RB";

/// Widest sequence field a caller may request.
pub const MAX_SEQUENCE_LENGTH: usize = 10;

/// Caller-supplied generation parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifierConfig {
    /// Identifier layout. Defaults to `standard`.
    #[serde(default)]
    pub format: Option<FormatKind>,

    /// Brand prefix. Defaults to `RB`.
    #[serde(default)]
    pub prefix: Option<String>,

    /// Digits reserved for the daily sequence.
    ///
    /// Defaults to the format's own width (3 for compact, 4 otherwise).
    /// Clamped to `1..=10`; negative values are rejected.
    #[serde(default)]
    pub sequence_length: Option<i64>,

    /// Encode hour and minute (detailed format only).
    #[serde(default)]
    pub include_time: Option<bool>,
}

impl IdentifierConfig {
    /// Configuration for a given format with every other field defaulted.
    #[must_use]
    pub fn for_format(format: FormatKind) -> Self {
        Self {
            format: Some(format),
            ..Self::default()
        }
    }

    /// Set the prefix.
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Set the sequence length.
    #[must_use]
    pub const fn with_sequence_length(mut self, length: i64) -> Self {
        self.sequence_length = Some(length);
        self
    }

    /// Set whether the detailed format carries the time.
    #[must_use]
    pub const fn with_time(mut self, include_time: bool) -> Self {
        self.include_time = Some(include_time);
        self
    }

    /// Resolve against `defaults`, then against the built-in defaults.
    ///
    /// Clamping and prefix truncation are silent. Only inputs that cannot be
    /// normalized are reported.
    ///
    /// # Errors
    ///
    /// Returns an error for a negative sequence length or a prefix containing
    /// anything other than ASCII letters.
    pub fn resolve(&self, defaults: &Self) -> Result<ResolvedConfig, String> {
        let format = self.format.or(defaults.format).unwrap_or_default();

        let prefix = normalize_prefix(
            self.prefix
                .as_deref()
                .filter(|p| !p.trim().is_empty())
                .or_else(|| defaults.prefix.as_deref().filter(|p| !p.trim().is_empty()))
                .unwrap_or(DEFAULT_PREFIX),
        )?;

        let sequence_length = match self.sequence_length.or(defaults.sequence_length) {
            None => format.default_sequence_length(),
            Some(n) if n < 0 => {
                return Err(format!("sequence_length cannot be negative, got {n}"));
            }
            Some(n) => {
                let clamped = usize::try_from(n)
                    .unwrap_or(MAX_SEQUENCE_LENGTH)
                    .clamp(1, MAX_SEQUENCE_LENGTH);
                if i64::try_from(clamped).ok() != Some(n) {
                    debug!(requested = n, used = clamped, "Clamped sequence length");
                }
                clamped
            }
        };

        let include_time = self
            .include_time
            .or(defaults.include_time)
            .unwrap_or(false);

        Ok(ResolvedConfig {
            format,
            prefix,
            sequence_length,
            include_time,
        })
    }
}

/// Fully-defaulted, normalized configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// Identifier layout.
    pub format: FormatKind,
    /// Upper-case ASCII prefix, 1 to 16 letters.
    pub prefix: String,
    /// Zero-padding width of the sequence field, 1 to 10.
    pub sequence_length: usize,
    /// Encode hour and minute (detailed only).
    pub include_time: bool,
}

/// Trim, upper-case and truncate a prefix.
fn normalize_prefix(raw: &str) -> Result<String, String> {
    let trimmed = raw.trim();
    if let Some(bad) = trimmed.chars().find(|c| !c.is_ascii_alphabetic()) {
        return Err(format!(
            "prefix may only contain ASCII letters, found {bad:?} in {trimmed:?}"
        ));
    }

    let prefix: String = trimmed
        .chars()
        .take(MAX_PREFIX_LEN)
        .map(|c| c.to_ascii_uppercase())
        .collect();
    if prefix.len() < trimmed.len() {
        debug!(
            requested = trimmed.len(),
            used = MAX_PREFIX_LEN,
            "Truncated prefix"
        );
    }
    Ok(prefix)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolve(config: &IdentifierConfig) -> Result<ResolvedConfig, String> {
        config.resolve(&IdentifierConfig::default())
    }

    #[test]
    fn test_defaults() {
        let resolved = resolve(&IdentifierConfig::default()).unwrap();
        assert_eq!(resolved.format, FormatKind::Standard);
        assert_eq!(resolved.prefix, "RB");
        assert_eq!(resolved.sequence_length, 4);
        assert!(!resolved.include_time);
    }

    #[test]
    fn test_compact_default_width() {
        let resolved = resolve(&IdentifierConfig::for_format(FormatKind::Compact)).unwrap();
        assert_eq!(resolved.sequence_length, 3);
    }

    #[test]
    fn test_sequence_length_clamped() {
        let resolved = resolve(&IdentifierConfig::default().with_sequence_length(50)).unwrap();
        assert_eq!(resolved.sequence_length, 10);

        let resolved = resolve(&IdentifierConfig::default().with_sequence_length(0)).unwrap();
        assert_eq!(resolved.sequence_length, 1);

        let resolved =
            resolve(&IdentifierConfig::default().with_sequence_length(i64::MAX)).unwrap();
        assert_eq!(resolved.sequence_length, 10);
    }

    #[test]
    fn test_negative_sequence_length_rejected() {
        let err = resolve(&IdentifierConfig::default().with_sequence_length(-1)).unwrap_err();
        assert!(err.contains("negative"));
    }

    #[test]
    fn test_prefix_normalization() {
        let resolved = resolve(&IdentifierConfig::default().with_prefix(" shp ")).unwrap();
        assert_eq!(resolved.prefix, "SHP");

        let resolved = resolve(&IdentifierConfig::default().with_prefix("A".repeat(50))).unwrap();
        assert_eq!(resolved.prefix, "A".repeat(MAX_PREFIX_LEN));

        let resolved = resolve(&IdentifierConfig::default().with_prefix("   ")).unwrap();
        assert_eq!(resolved.prefix, DEFAULT_PREFIX);
    }

    #[test]
    fn test_prefix_with_illegal_characters_rejected() {
        assert!(resolve(&IdentifierConfig::default().with_prefix("R-B")).is_err());
        assert!(resolve(&IdentifierConfig::default().with_prefix("RB1")).is_err());
        assert!(resolve(&IdentifierConfig::default().with_prefix("RÉ")).is_err());
    }

    #[test]
    fn test_caller_overrides_defaults() {
        let defaults = IdentifierConfig {
            format: Some(FormatKind::Detailed),
            prefix: Some("SHIP".to_string()),
            sequence_length: Some(6),
            include_time: Some(true),
        };

        let resolved = IdentifierConfig::default().resolve(&defaults).unwrap();
        assert_eq!(resolved.format, FormatKind::Detailed);
        assert_eq!(resolved.prefix, "SHIP");
        assert_eq!(resolved.sequence_length, 6);
        assert!(resolved.include_time);

        let resolved = IdentifierConfig::for_format(FormatKind::Compact)
            .with_prefix("RB")
            .resolve(&defaults)
            .unwrap();
        assert_eq!(resolved.format, FormatKind::Compact);
        assert_eq!(resolved.prefix, "RB");
        assert_eq!(resolved.sequence_length, 6);
    }
}
