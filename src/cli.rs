//! Command-line interface.
//!
//! A thin demo/help front end over [`OrderNumberService`]: list the catalog,
//! issue identifiers, check candidates.

use std::io::Write;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};

use crate::domain::{FormatKind, IdentifierConfig, OrderNumber, all};
use crate::service::OrderNumberService;

/// Largest `--count` accepted in one invocation.
pub const MAX_BATCH_COUNT: i64 = 10_000;

/// Top-level CLI parser for `order-ids`.
#[derive(Debug, Parser)]
#[command(name = "order-ids", version, about = "Generate and validate order numbers")]
pub struct Cli {
    /// The command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the supported identifier formats.
    Formats {
        /// Print as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Generate order numbers.
    Generate(GenerateArgs),
    /// Generate order numbers traceable to a seller.
    Business {
        /// Seller account id.
        seller_id: String,
        #[command(flatten)]
        args: GenerateArgs,
    },
    /// Check whether a string is a well-formed order number.
    Validate {
        /// Candidate identifier.
        candidate: String,
        /// Only accept this format.
        #[arg(long)]
        format: Option<FormatKind>,
    },
}

/// Generation options shared by `generate` and `business`.
#[derive(Debug, Clone, Args)]
pub struct GenerateArgs {
    /// Identifier format.
    #[arg(long)]
    pub format: Option<FormatKind>,
    /// Brand prefix.
    #[arg(long)]
    pub prefix: Option<String>,
    /// Digits reserved for the daily sequence.
    #[arg(long, allow_negative_numbers = true)]
    pub sequence_length: Option<i64>,
    /// Include hour and minute (detailed format).
    #[arg(long)]
    pub include_time: bool,
    /// Number of identifiers to generate.
    #[arg(
        long,
        default_value_t = 1,
        value_parser = clap::value_parser!(u32).range(1..=MAX_BATCH_COUNT)
    )]
    pub count: u32,
}

impl GenerateArgs {
    fn to_config(&self) -> IdentifierConfig {
        IdentifierConfig {
            format: self.format,
            prefix: self.prefix.clone(),
            sequence_length: self.sequence_length,
            include_time: self.include_time.then_some(true),
        }
    }
}

impl Command {
    /// Run the command, writing results to `out`.
    ///
    /// # Errors
    ///
    /// Returns an error if generation fails or `out` cannot be written.
    pub fn execute(
        &self,
        service: &OrderNumberService,
        out: &mut impl Write,
    ) -> anyhow::Result<ExitCode> {
        match self {
            Self::Formats { json } => {
                let formats = all();
                if *json {
                    writeln!(out, "{}", serde_json::to_string_pretty(&formats)?)?;
                } else {
                    for format in formats {
                        writeln!(
                            out,
                            "{:<9} {:<30} {:<28} {}",
                            format.kind.as_str(),
                            format.template,
                            format.example,
                            format.description
                        )?;
                    }
                }
                Ok(ExitCode::SUCCESS)
            }
            Self::Generate(args) => {
                let ids = service.generate_batch(Some(&args.to_config()), args.count)?;
                write_ids(out, &ids)?;
                Ok(ExitCode::SUCCESS)
            }
            Self::Business { seller_id, args } => {
                let ids =
                    service.generate_business_batch(seller_id, Some(&args.to_config()), args.count)?;
                write_ids(out, &ids)?;
                Ok(ExitCode::SUCCESS)
            }
            Self::Validate { candidate, format } => {
                match service.parse(candidate, *format) {
                    Some(parsed) => {
                        writeln!(out, "valid {}", parsed.kind)?;
                        Ok(ExitCode::SUCCESS)
                    }
                    None => {
                        writeln!(out, "invalid")?;
                        Ok(ExitCode::FAILURE)
                    }
                }
            }
        }
    }
}

fn write_ids(out: &mut impl Write, ids: &[OrderNumber]) -> std::io::Result<()> {
    for id in ids {
        writeln!(out, "{id}")?;
    }
    Ok(())
}
