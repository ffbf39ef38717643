//! advec: a growable contiguous array that keeps raw memory ownership and
//! element lifetime apart.
//!
//! Layers, leaf first:
//! - [`RawBuffer`] (`advec-mem`): an uninitialized region of `capacity` slots.
//! - [`DynamicArray`] (`advec-vec`): one `RawBuffer` plus a live count, with
//!   every construction, relocation and destruction spelled out.
//!
//! ```
//! use advec::DynamicArray;
//!
//! let mut a = DynamicArray::new();
//! a.push_back(1).unwrap();
//! a.push_back(2).unwrap();
//! a.insert(1, 5).unwrap();
//! a.erase(0);
//! a.pop_back();
//! assert_eq!(a.as_slice(), &[5]);
//! ```

pub use advec_core::{config, error, AllocationError, Error, GrowthPolicy, Result};
pub use advec_mem::{GrowthStats, RawBuffer};
pub use advec_vec::{DynamicArray, IntoIter};

pub mod prelude {
    //! Convenient re-exports for downstream crates.
    pub use advec_core::prelude::*;
    pub use advec_vec::DynamicArray;
}
