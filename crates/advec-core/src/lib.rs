#![forbid(unsafe_code)]
//! advec-core: shared error types and growth configuration.
//!
//! The allocation and element-lifecycle logic lives in `advec-mem` and
//! `advec-vec`. This crate only carries the vocabulary they share so callers
//! can name errors and policies without pulling in any `unsafe` code.

pub mod config;
pub mod error;
pub mod prelude;

pub use config::GrowthPolicy;
pub use error::{AllocationError, Error, Result};
