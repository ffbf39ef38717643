//! Growth configuration that downstream crates can serialize/deserialize.

use serde::{Deserialize, Serialize};

use crate::error::{AllocationError, Error, Result};

/// How a `DynamicArray` picks its next capacity when a push or insert finds
/// the buffer full.
///
/// The default is the classic doubling rule, `max(1, len * 2)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrowthPolicy {
    /// Multiplier applied to the current length on growth. Must be >= 2 so
    /// appends stay amortized O(1).
    pub factor: usize,

    /// Capacity used when growing from empty. Must be >= 1.
    pub min_capacity: usize,
}

impl GrowthPolicy {
    pub const DEFAULT_FACTOR: usize = 2;
    pub const DEFAULT_MIN_CAPACITY: usize = 1;

    pub const fn doubling() -> Self {
        Self {
            factor: Self::DEFAULT_FACTOR,
            min_capacity: Self::DEFAULT_MIN_CAPACITY,
        }
    }

    /// Reject policies that would stall growth or make it quadratic.
    pub fn validate(&self) -> Result<()> {
        if self.factor < 2 {
            return Err(Error::Config(format!(
                "growth factor must be at least 2, got {}",
                self.factor
            )));
        }
        if self.min_capacity == 0 {
            return Err(Error::Config("min_capacity must be at least 1".into()));
        }
        Ok(())
    }

    /// Capacity to grow to when `len` slots are all occupied.
    pub fn next_capacity(&self, len: usize) -> std::result::Result<usize, AllocationError> {
        let grown = len
            .checked_mul(self.factor)
            .ok_or(AllocationError::CapacityOverflow { requested: len })?;
        Ok(grown.max(self.min_capacity))
    }
}

impl Default for GrowthPolicy {
    fn default() -> Self {
        Self::doubling()
    }
}
