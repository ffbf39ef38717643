//! advec-vec: a growable contiguous array with explicit element lifecycles.
//!
//! [`DynamicArray<T>`] owns one [`advec_mem::RawBuffer<T>`] plus a live
//! count. Slots `[0, len)` hold constructed values; slots `[len, capacity)`
//! are raw storage. Every capacity change allocates a fresh buffer,
//! constructs or relocates values into it one element at a time, and only
//! then gives up the old buffer.
//!
//! Failure model:
//! - Allocation failure is returned as [`AllocationError`] before anything
//!   is mutated.
//! - A panic while constructing a value (`Default`, `Clone`, or an emplace
//!   closure) on a growth path leaves the array exactly as it was.

pub mod array;
mod guard;
mod impls;
pub mod iter;

pub use advec_core::{AllocationError, Error, GrowthPolicy};
pub use advec_mem::GrowthStats;
pub use array::DynamicArray;
pub use iter::IntoIter;
