//! Storage layer module.
//!
//! This module provides a trait-based sequence store so the generator can run
//! on in-memory counters or on counters persisted to disk.

pub mod factory;
pub mod file;
pub mod memory;
pub mod traits;

pub use factory::create_store;
pub use file::FileSequenceStore;
pub use memory::MemorySequenceStore;
pub use traits::SequenceStore;
