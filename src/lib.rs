//! # Order IDs
//!
//! Generation and validation of the externally visible order numbers used by
//! the shipping platform's admin, seller and customer portals.
//!
//! - **Format catalog**: `standard`, `compact`, `detailed` and `business` layouts
//! - **Generator**: prefix + date + per-day sequence, unique for the life of the counters
//! - **Validator**: stateless full-string shape check, inverse of the generator
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                          Identifier Engine                           │
//! ├─────────────────────────────────────────────────────────────────────┤
//! │  ┌─────────────┐  ┌─────────────┐  ┌─────────────┐  ┌────────────┐ │
//! │  │  Facade /   │  │   Service   │  │   Storage   │  │  Domain    │ │
//! │  │  CLI        │→ │   Layer     │→ │   Layer     │  │  Catalog   │ │
//! │  └─────────────┘  └─────────────┘  └─────────────┘  └────────────┘ │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ```
//! use order_ids::{FormatKind, IdentifierConfig, generate_order_number, validate_order_number};
//!
//! let config = IdentifierConfig::for_format(FormatKind::Compact);
//! let id = generate_order_number(Some(&config)).unwrap();
//! assert!(validate_order_number(&id, Some(FormatKind::Compact)));
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![forbid(unsafe_code)]

pub mod cli;
pub mod clock;
pub mod config;
pub mod domain;
pub mod error;
pub mod service;
pub mod storage;

use std::process::ExitCode;
use std::sync::LazyLock;

use clap::Parser;
use tracing::{debug, info};

use crate::cli::Cli;
use crate::config::AppConfig;

pub use crate::domain::{FormatDescriptor, FormatKind, IdentifierConfig, OrderNumber};
pub use crate::error::{AppError, Result};
pub use crate::service::OrderNumberService;

/// Process-wide engine behind the free functions below.
static DEFAULT_SERVICE: LazyLock<OrderNumberService> = LazyLock::new(OrderNumberService::in_memory);

/// Generate an order number with the process-wide engine.
///
/// # Errors
///
/// Returns `InvalidConfiguration` if `config` cannot be normalized, or
/// `InvalidSellerReference` if it asks for the business format.
pub fn generate_order_number(config: Option<&IdentifierConfig>) -> Result<String> {
    DEFAULT_SERVICE.generate(config).map(OrderNumber::into_string)
}

/// Generate a business order number for `seller_id` with the process-wide engine.
///
/// # Errors
///
/// Returns `InvalidSellerReference` for an empty or whitespace-only seller id,
/// or `InvalidConfiguration` if `config` cannot be normalized.
pub fn generate_business_order_number(
    seller_id: &str,
    config: Option<&IdentifierConfig>,
) -> Result<String> {
    DEFAULT_SERVICE
        .generate_business(seller_id, config)
        .map(OrderNumber::into_string)
}

/// Check whether `candidate` is a well-formed order number.
#[must_use]
pub fn validate_order_number(candidate: &str, kind: Option<FormatKind>) -> bool {
    service::validate(candidate, kind)
}

/// Catalog of supported formats, for help and demo screens.
#[must_use]
pub fn get_suggested_formats() -> Vec<FormatDescriptor> {
    domain::all()
}

/// Run the `order-ids` command line tool.
///
/// This function:
/// 1. Parses arguments
/// 2. Loads configuration from `.env`, files and environment
/// 3. Initializes logging
/// 4. Builds the engine over the configured sequence store
/// 5. Executes the subcommand
///
/// # Errors
///
/// Returns an error if:
/// - Configuration cannot be loaded
/// - The sequence store fails to initialize
/// - Generation fails
pub fn run() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Load configuration
    if let Err(err) = dotenvy::dotenv()
        && !err.not_found()
    {
        return Err(err.into());
    }
    let config = AppConfig::load()?;

    // Initialize logging
    init_logging(&config);

    info!(version = env!("CARGO_PKG_VERSION"), "Starting order-ids");

    let service = OrderNumberService::from_config(&config)?;
    debug!(backend = service.backend_name(), "Engine ready");

    let mut stdout = std::io::stdout().lock();
    cli.command.execute(&service, &mut stdout)
}

/// Initialize logging based on configuration.
///
/// Logs go to stderr so command output stays clean.
fn init_logging(config: &AppConfig) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.observability.log_level));

    let subscriber = tracing_subscriber::registry().with(filter);

    if config.observability.log_format == "json" {
        subscriber
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        subscriber
            .with(fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
