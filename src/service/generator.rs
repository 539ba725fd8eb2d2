//! Order number generation.
//!
//! [`OrderNumberService`] owns its sequence store and clock, so every host
//! (or test) decides where counters live and what "now" means.

use std::num::NonZeroU32;
use std::sync::Arc;

use chrono::NaiveDateTime;
use metrics::counter;
use tracing::{debug, warn};

use crate::clock::{Clock, SystemClock};
use crate::config::AppConfig;
use crate::domain::{
    FormatKind, IdentifierConfig, Layout, OrderNumber, ParsedOrderNumber, ResolvedConfig,
    SellerToken, day_key,
};
use crate::error::{AppError, Result};
use crate::service::validator;
use crate::storage::{MemorySequenceStore, SequenceStore, create_store};

/// Generates and validates order numbers.
pub struct OrderNumberService {
    /// Day counters.
    store: Arc<dyn SequenceStore>,
    /// Time source.
    clock: Arc<dyn Clock>,
    /// Applied under every caller config.
    defaults: IdentifierConfig,
}

impl OrderNumberService {
    /// Create a service over an explicit store and clock.
    pub fn new(store: Arc<dyn SequenceStore>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            defaults: IdentifierConfig::default(),
        }
    }

    /// In-memory counters and the local system clock.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(MemorySequenceStore::new()),
            Arc::new(SystemClock::default()),
        )
    }

    /// Build the service described by the application configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the sequence store cannot be initialized.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let store = create_store(&config.storage)?;
        let clock = Arc::new(SystemClock::new(config.clock.time_reference));
        Ok(Self::new(store, clock).with_defaults(config.generator.clone()))
    }

    /// Replace the defaults applied under caller configs.
    #[must_use]
    pub fn with_defaults(mut self, defaults: IdentifierConfig) -> Self {
        self.defaults = defaults;
        self
    }

    /// Name of the backing sequence store.
    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        self.store.backend_name()
    }

    /// Generate one order number.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if the config cannot be normalized,
    /// `InvalidSellerReference` if it asks for the business format (use
    /// [`Self::generate_business`]), or a storage error.
    pub fn generate(&self, config: Option<&IdentifierConfig>) -> Result<OrderNumber> {
        let (resolved, layout) = self.plain_layout(config)?;
        self.issue(&resolved, &layout, NonZeroU32::MIN)?
            .pop()
            .ok_or_else(|| AppError::SequenceExhausted("empty reservation".to_string()))
    }

    /// Generate `count` order numbers from one contiguous sequence block.
    ///
    /// # Errors
    ///
    /// Same as [`Self::generate`].
    pub fn generate_batch(
        &self,
        config: Option<&IdentifierConfig>,
        count: u32,
    ) -> Result<Vec<OrderNumber>> {
        let Some(count) = NonZeroU32::new(count) else {
            return Ok(Vec::new());
        };
        let (resolved, layout) = self.plain_layout(config)?;
        self.issue(&resolved, &layout, count)
    }

    /// Generate an order number traceable to `seller_id`.
    ///
    /// The business layout is always used; any other `format` in `config` is ignored.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSellerReference` for an empty or whitespace-only seller
    /// id, `InvalidConfiguration` if the config cannot be normalized, or a
    /// storage error.
    pub fn generate_business(
        &self,
        seller_id: &str,
        config: Option<&IdentifierConfig>,
    ) -> Result<OrderNumber> {
        self.generate_business_batch(seller_id, config, 1)?
            .pop()
            .ok_or_else(|| AppError::SequenceExhausted("empty reservation".to_string()))
    }

    /// Generate `count` business order numbers for one seller.
    ///
    /// # Errors
    ///
    /// Same as [`Self::generate_business`].
    pub fn generate_business_batch(
        &self,
        seller_id: &str,
        config: Option<&IdentifierConfig>,
        count: u32,
    ) -> Result<Vec<OrderNumber>> {
        let seller = SellerToken::from_seller_id(seller_id).ok_or_else(|| {
            AppError::InvalidSellerReference("seller id cannot be empty".to_string())
        })?;

        let mut config = config.cloned().unwrap_or_default();
        if let Some(requested) = config.format.filter(|f| *f != FormatKind::Business) {
            debug!(%requested, "Business generation ignores requested format");
        }
        config.format = Some(FormatKind::Business);
        let resolved = self.resolve(Some(&config))?;

        let Some(count) = NonZeroU32::new(count) else {
            return Ok(Vec::new());
        };
        self.issue(&resolved, &Layout::Business { seller }, count)
    }

    /// Check `candidate` against one format, or any format when `kind` is `None`.
    #[must_use]
    pub fn validate(&self, candidate: &str, kind: Option<FormatKind>) -> bool {
        validator::validate(candidate, kind)
    }

    /// Decode `candidate`; see [`validator::parse`].
    #[must_use]
    pub fn parse(&self, candidate: &str, kind: Option<FormatKind>) -> Option<ParsedOrderNumber> {
        validator::parse(candidate, kind)
    }

    fn resolve(&self, config: Option<&IdentifierConfig>) -> Result<ResolvedConfig> {
        config
            .unwrap_or(&IdentifierConfig::default())
            .resolve(&self.defaults)
            .map_err(AppError::InvalidConfiguration)
    }

    /// Resolve a config for a layout that needs no seller.
    fn plain_layout(&self, config: Option<&IdentifierConfig>) -> Result<(ResolvedConfig, Layout)> {
        let resolved = self.resolve(config)?;
        let layout = match resolved.format {
            FormatKind::Standard => Layout::Standard,
            FormatKind::Compact => Layout::Compact,
            FormatKind::Detailed => Layout::Detailed {
                include_time: resolved.include_time,
            },
            FormatKind::Business => {
                return Err(AppError::InvalidSellerReference(
                    "business identifiers require a seller id".to_string(),
                ));
            }
        };
        Ok((resolved, layout))
    }

    /// Reserve sequence values for today and render them.
    fn issue(
        &self,
        resolved: &ResolvedConfig,
        layout: &Layout,
        count: NonZeroU32,
    ) -> Result<Vec<OrderNumber>> {
        let now: NaiveDateTime = self.clock.now();
        let key = day_key(now.date());
        let range = self.store.reserve(&key, count)?;

        let width = resolved.sequence_length;
        let ids: Vec<OrderNumber> = range
            .into_iter()
            .map(|sequence| {
                if digit_count(sequence) > width {
                    warn!(
                        day = %key,
                        sequence,
                        width,
                        "Sequence wider than configured length, widening field"
                    );
                    counter!("order_number_sequence_widened_total").increment(1);
                }
                OrderNumber::new(layout.encode(&resolved.prefix, now, sequence, width))
            })
            .collect();

        counter!("order_numbers_generated_total", "format" => layout.kind().as_str())
            .increment(range.count());
        debug!(
            format = %layout.kind(),
            day = %key,
            first = range.start,
            last = range.end,
            "Issued order numbers"
        );

        Ok(ids)
    }
}

impl std::fmt::Debug for OrderNumberService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderNumberService")
            .field("backend", &self.store.backend_name())
            .field("defaults", &self.defaults)
            .finish_non_exhaustive()
    }
}

const fn digit_count(value: u64) -> usize {
    match value.checked_ilog10() {
        Some(log) => log as usize + 1,
        None => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use chrono::{Duration, NaiveDate};
    use std::collections::HashSet;

    fn june_first(hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 1)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn create_test_service() -> (OrderNumberService, Arc<FixedClock>) {
        let clock = Arc::new(FixedClock::new(june_first(14, 30)));
        let service = OrderNumberService::new(Arc::new(MemorySequenceStore::new()), clock.clone());
        (service, clock)
    }

    #[test]
    fn test_standard_scenario() {
        let (service, _clock) = create_test_service();
        let config = IdentifierConfig::for_format(FormatKind::Standard).with_prefix("RB");

        let first = service.generate(Some(&config)).unwrap();
        let second = service.generate(Some(&config)).unwrap();
        assert_eq!(first.as_str(), "RB-20240601-0001");
        assert_eq!(second.as_str(), "RB-20240601-0002");
    }

    #[test]
    fn test_default_config_is_standard_rb() {
        let (service, _clock) = create_test_service();
        let id = service.generate(None).unwrap();
        assert_eq!(id.as_str(), "RB-20240601-0001");
    }

    #[test]
    fn test_each_format_renders() {
        let (service, _clock) = create_test_service();

        let compact = service
            .generate(Some(&IdentifierConfig::for_format(FormatKind::Compact)))
            .unwrap();
        assert_eq!(compact.as_str(), "RB240601001");

        let detailed = service
            .generate(Some(&IdentifierConfig::for_format(FormatKind::Detailed)))
            .unwrap();
        assert_eq!(detailed.as_str(), "RB-2024-06-01-0002");

        let detailed_time = service
            .generate(Some(
                &IdentifierConfig::for_format(FormatKind::Detailed).with_time(true),
            ))
            .unwrap();
        assert_eq!(detailed_time.as_str(), "RB-2024-06-01-14-30-0003");
    }

    #[test]
    fn test_counter_is_shared_across_formats_and_resets_per_day() {
        let (service, clock) = create_test_service();

        service.generate(None).unwrap();
        service
            .generate(Some(&IdentifierConfig::for_format(FormatKind::Compact)))
            .unwrap();
        assert_eq!(
            service.generate(None).unwrap().as_str(),
            "RB-20240601-0003"
        );

        clock.advance(Duration::days(1));
        assert_eq!(
            service.generate(None).unwrap().as_str(),
            "RB-20240602-0001"
        );
    }

    #[test]
    fn test_business_identifier() {
        let (service, _clock) = create_test_service();

        let a = service.generate_business("seller001", None).unwrap();
        let b = service.generate_business("seller002", None).unwrap();
        let a2 = service.generate_business("seller001", None).unwrap();

        assert!(a.as_str().contains("20240601"));
        assert_ne!(a, b);

        let token = SellerToken::from_seller_id("seller001").unwrap();
        assert_eq!(a.as_str(), format!("RB-{token}-20240601-0001"));
        assert_eq!(a2.as_str(), format!("RB-{token}-20240601-0003"));
    }

    #[test]
    fn test_business_rejects_blank_seller() {
        let (service, _clock) = create_test_service();

        assert!(matches!(
            service.generate_business("", None),
            Err(AppError::InvalidSellerReference(_))
        ));
        assert!(matches!(
            service.generate_business("   ", None),
            Err(AppError::InvalidSellerReference(_))
        ));
    }

    #[test]
    fn test_business_format_without_seller_is_rejected() {
        let (service, _clock) = create_test_service();
        let config = IdentifierConfig::for_format(FormatKind::Business);
        assert!(matches!(
            service.generate(Some(&config)),
            Err(AppError::InvalidSellerReference(_))
        ));
    }

    #[test]
    fn test_business_ignores_requested_format() {
        let (service, _clock) = create_test_service();
        let config = IdentifierConfig::for_format(FormatKind::Compact);
        let id = service.generate_business("seller001", Some(&config)).unwrap();
        assert!(service.validate(id.as_str(), Some(FormatKind::Business)));
    }

    #[test]
    fn test_invalid_configuration_reported() {
        let (service, _clock) = create_test_service();
        let config = IdentifierConfig::default().with_sequence_length(-3);
        assert!(matches!(
            service.generate(Some(&config)),
            Err(AppError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_bounds_are_normalized() {
        let (service, _clock) = create_test_service();
        let config = IdentifierConfig::default()
            .with_prefix("A".repeat(50))
            .with_sequence_length(50);

        let id = service.generate(Some(&config)).unwrap();
        assert_eq!(id.as_str(), "AAAAAAAAAAAAAAAA-20240601-0000000001");
        assert!(service.validate(id.as_str(), None));
    }

    #[test]
    fn test_sequence_widens_instead_of_wrapping() {
        let (service, _clock) = create_test_service();
        let config = IdentifierConfig::default().with_sequence_length(1);

        let ids = service.generate_batch(Some(&config), 10).unwrap();
        assert_eq!(ids[8].as_str(), "RB-20240601-9");
        assert_eq!(ids[9].as_str(), "RB-20240601-10");
        assert!(service.validate(ids[9].as_str(), Some(FormatKind::Standard)));
    }

    #[test]
    fn test_batch_is_contiguous_and_unique() {
        let (service, _clock) = create_test_service();

        let ids = service.generate_batch(None, 100).unwrap();
        let unique: HashSet<&str> = ids.iter().map(OrderNumber::as_str).collect();
        assert_eq!(unique.len(), 100);
        assert_eq!(ids[0].as_str(), "RB-20240601-0001");
        assert_eq!(ids[99].as_str(), "RB-20240601-0100");

        assert!(service.generate_batch(None, 0).unwrap().is_empty());
    }

    #[test]
    fn test_service_defaults_apply() {
        let (service, _clock) = create_test_service();
        let service = service.with_defaults(
            IdentifierConfig::for_format(FormatKind::Compact).with_prefix("SHP"),
        );

        assert_eq!(service.generate(None).unwrap().as_str(), "SHP240601001");

        let standard = IdentifierConfig::for_format(FormatKind::Standard);
        assert_eq!(
            service.generate(Some(&standard)).unwrap().as_str(),
            "SHP-20240601-0002"
        );
    }

    #[test]
    fn test_digit_count() {
        assert_eq!(digit_count(0), 1);
        assert_eq!(digit_count(9), 1);
        assert_eq!(digit_count(10), 2);
        assert_eq!(digit_count(u64::MAX), 20);
    }
}
