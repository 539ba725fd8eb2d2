//! `order-ids` entry point.
//!
//! Loads configuration, builds the engine over the configured sequence store
//! and runs one subcommand.

use std::process::ExitCode;

use order_ids::error::AppError;
use order_ids::run;

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => {
            match err.downcast_ref::<AppError>() {
                Some(app) => {
                    let code = app.error_code();
                    eprintln!("error {code} ({}): {app}", code.category());
                }
                None => eprintln!("error: {err:#}"),
            }
            ExitCode::FAILURE
        }
    }
}
