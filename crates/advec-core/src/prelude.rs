//! Convenient re-exports for downstream crates.

pub use crate::config::GrowthPolicy;
pub use crate::error::{AllocationError, Error, Result};
