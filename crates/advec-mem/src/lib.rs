//! advec-mem: raw slot storage and growth tracking.
//!
//! [`RawBuffer`] owns an uninitialized region sized for a fixed number of
//! `T` slots and knows nothing about which of them hold live values. The
//! typed layer above (`advec-vec`) decides when a slot is constructed or
//! destroyed, and does so only through the in-place primitives exposed here.

pub mod raw;
pub mod tracking;

pub use advec_core::AllocationError;
pub use raw::RawBuffer;
pub use tracking::GrowthStats;
