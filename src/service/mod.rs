//! Service layer module.
//!
//! Contains the order number generator and the stateless validator.

pub mod generator;
pub mod validator;

pub use generator::OrderNumberService;
pub use validator::{parse, validate};
