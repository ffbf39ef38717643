//! Lightweight per-container growth tracking.
//!
//! Keep this cheap: plain counters, no atomics. A container is only ever
//! touched by one owner at a time.

/// Counters describing how a single container has grown over its lifetime.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct GrowthStats {
    reallocations: usize,
    relocated: usize,
    peak_capacity: usize,
}

impl GrowthStats {
    pub const fn new() -> Self {
        Self {
            reallocations: 0,
            relocated: 0,
            peak_capacity: 0,
        }
    }

    /// Record that the container moved to a larger buffer, carrying
    /// `relocated` live elements over from the old one.
    pub fn record_reallocation(
        &mut self,
        old_capacity: usize,
        new_capacity: usize,
        relocated: usize,
    ) {
        self.reallocations += 1;
        self.relocated += relocated;
        self.record_capacity(new_capacity);
        #[cfg(feature = "tracing")]
        tracing::trace!(
            old_capacity,
            new_capacity,
            relocated,
            total_relocated = self.relocated,
            "buffer reallocated"
        );
        #[cfg(not(feature = "tracing"))]
        let _ = old_capacity;
    }

    /// Record a capacity the container now holds; updates peak if higher.
    pub fn record_capacity(&mut self, capacity: usize) {
        self.peak_capacity = self.peak_capacity.max(capacity);
    }

    /// Number of times a new buffer replaced the old one.
    pub fn reallocations(&self) -> usize {
        self.reallocations
    }

    /// Total elements moved or copied between buffers across all reallocations.
    pub fn relocated(&self) -> usize {
        self.relocated
    }

    pub fn peak_capacity(&self) -> usize {
        self.peak_capacity
    }
}
