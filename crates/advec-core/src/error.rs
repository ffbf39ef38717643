use std::alloc::Layout;

use thiserror::Error;

/// Canonical result for core.
pub type Result<T> = std::result::Result<T, Error>;

/// Failure to obtain a memory region for a requested element capacity.
///
/// Always raised before any destructive mutation, so the container that
/// asked for the region is left exactly as it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AllocationError {
    /// The byte size of the request does not fit a valid layout, or the
    /// growth arithmetic itself overflowed.
    #[error("capacity overflow: cannot lay out {requested} elements")]
    CapacityOverflow { requested: usize },

    /// The global allocator returned null.
    #[error("out of memory: failed to allocate {bytes} bytes (align {align})")]
    OutOfMemory { bytes: usize, align: usize },
}

impl AllocationError {
    /// Build an `OutOfMemory` error for the layout the allocator refused.
    pub fn out_of_memory(layout: Layout) -> Self {
        AllocationError::OutOfMemory {
            bytes: layout.size(),
            align: layout.align(),
        }
    }

    /// Escalate for call sites that cannot return an error (`Clone`,
    /// `Extend`, ...). Mirrors what `Vec` does on the same failures.
    pub fn raise(self) -> ! {
        match self {
            AllocationError::CapacityOverflow { .. } => panic!("capacity overflow"),
            AllocationError::OutOfMemory { bytes, align } => {
                match Layout::from_size_align(bytes, align) {
                    Ok(layout) => std::alloc::handle_alloc_error(layout),
                    Err(_) => panic!("{self}"),
                }
            }
        }
    }
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("allocation error: {0}")]
    Alloc(#[from] AllocationError),

    #[error("Invalid configuration: {0}")]
    Config(String),
}
