//! Uninitialized, exclusively owned slot storage.
//!
//! A [`RawBuffer<T>`] is an arena of `capacity` slots of `T`. It allocates
//! once, never constructs or destroys anything on its own, and releases the
//! region on drop without running any element destructor. Whoever owns the
//! buffer is responsible for tracking which slots are live.
//!
//! Crossing the raw/typed boundary always goes through the explicit
//! in-place primitives ([`RawBuffer::write`], [`RawBuffer::read`],
//! [`RawBuffer::drop_in_place`], [`RawBuffer::drop_range`]). They are
//! `unsafe` because the buffer cannot check liveness for the caller.

use std::alloc::{self, Layout};
use std::fmt;
use std::marker::PhantomData;
use std::mem::{self, MaybeUninit};
use std::ptr::{self, NonNull};
use std::slice;

use advec_core::AllocationError;

/// Raw storage for `capacity` values of `T`, none of which are live.
///
/// `capacity == 0` is the empty state: no allocation is held and the
/// pointer is dangling. Zero-sized `T` never touches the allocator; the
/// requested capacity is simply recorded.
pub struct RawBuffer<T> {
    ptr: NonNull<T>,
    capacity: usize,
    _marker: PhantomData<T>,
}

// SAFETY: the buffer exclusively owns its region, same as `Box<[T]>`.
unsafe impl<T: Send> Send for RawBuffer<T> {}
// SAFETY: shared access only hands out `&MaybeUninit<T>` / `&T`.
unsafe impl<T: Sync> Sync for RawBuffer<T> {}

impl<T> RawBuffer<T> {
    const IS_ZST: bool = mem::size_of::<T>() == 0;

    /// The empty state. Never allocates.
    pub const fn new() -> Self {
        Self {
            ptr: NonNull::dangling(),
            capacity: 0,
            _marker: PhantomData,
        }
    }

    /// Allocate room for `capacity` slots without constructing any of them.
    ///
    /// `capacity == 0` yields the empty state without calling the
    /// allocator. On failure nothing is held.
    pub fn with_capacity(capacity: usize) -> Result<Self, AllocationError> {
        if capacity == 0 {
            return Ok(Self::new());
        }
        if Self::IS_ZST {
            return Ok(Self {
                ptr: NonNull::dangling(),
                capacity,
                _marker: PhantomData,
            });
        }

        let layout = Layout::array::<T>(capacity)
            .map_err(|_| AllocationError::CapacityOverflow { requested: capacity })?;
        // SAFETY: layout has non-zero size (capacity > 0 and T is not zero-sized).
        let raw = unsafe { alloc::alloc(layout) };
        let ptr = NonNull::new(raw.cast::<T>())
            .ok_or_else(|| AllocationError::out_of_memory(layout))?;

        #[cfg(feature = "tracing")]
        tracing::trace!(capacity, bytes = layout.size(), "raw buffer allocated");

        Ok(Self {
            ptr,
            capacity,
            _marker: PhantomData,
        })
    }

    /// Number of `T` slots the region can hold.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// True when no region is held.
    #[inline]
    pub fn is_empty_state(&self) -> bool {
        self.capacity == 0
    }

    /// Transfer ownership out, leaving `self` in the empty state.
    pub fn take(&mut self) -> Self {
        mem::replace(self, Self::new())
    }

    /// Exchange regions and capacities with `other`. O(1).
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(&mut self.ptr, &mut other.ptr);
        mem::swap(&mut self.capacity, &mut other.capacity);
    }

    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.ptr.as_ptr()
    }

    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.ptr.as_ptr()
    }

    /// Address of slot `offset`. The past-the-end address (`offset ==
    /// capacity`) is allowed for pointer arithmetic but must never be
    /// dereferenced.
    #[inline]
    pub fn address_at(&self, offset: usize) -> *const T {
        debug_assert!(offset <= self.capacity, "offset {offset} past end of buffer");
        self.ptr.as_ptr().wrapping_add(offset)
    }

    /// Mutable counterpart of [`RawBuffer::address_at`].
    #[inline]
    pub fn address_at_mut(&mut self, offset: usize) -> *mut T {
        debug_assert!(offset <= self.capacity, "offset {offset} past end of buffer");
        self.ptr.as_ptr().wrapping_add(offset)
    }

    /// Every slot, viewed as possibly-uninitialized storage.
    pub fn as_uninit_slice(&self) -> &[MaybeUninit<T>] {
        // SAFETY: ptr is non-null and aligned; the region spans `capacity`
        // slots (or is dangling with capacity 0 / zero-sized T).
        // `MaybeUninit<T>` has no validity requirement.
        unsafe { slice::from_raw_parts(self.ptr.as_ptr().cast(), self.capacity) }
    }

    pub fn as_uninit_slice_mut(&mut self) -> &mut [MaybeUninit<T>] {
        // SAFETY: as above, and `&mut self` guarantees exclusivity.
        unsafe { slice::from_raw_parts_mut(self.ptr.as_ptr().cast(), self.capacity) }
    }

    /// Storage of slot `index`. The caller decides whether it is live.
    ///
    /// # Panics
    ///
    /// Panics if `index >= capacity`.
    pub fn slot(&self, index: usize) -> &MaybeUninit<T> {
        &self.as_uninit_slice()[index]
    }

    /// Mutable storage of slot `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= capacity`.
    pub fn slot_mut(&mut self, index: usize) -> &mut MaybeUninit<T> {
        &mut self.as_uninit_slice_mut()[index]
    }

    /// Construct `value` in slot `index` and return a reference to it.
    ///
    /// # Safety
    ///
    /// `index < capacity`, and the slot must not hold a live value (it
    /// would be leaked, not dropped).
    #[inline]
    pub unsafe fn write(&mut self, index: usize, value: T) -> &mut T {
        debug_assert!(index < self.capacity, "write to slot {index} of {}", self.capacity);
        let slot = self.ptr.as_ptr().add(index);
        ptr::write(slot, value);
        &mut *slot
    }

    /// Move the value out of slot `index`; the slot is dead afterwards.
    ///
    /// # Safety
    ///
    /// `index < capacity` and the slot holds a live value. The caller must
    /// not read or drop that slot again until it is rewritten.
    #[inline]
    pub unsafe fn read(&self, index: usize) -> T {
        debug_assert!(index < self.capacity, "read from slot {index} of {}", self.capacity);
        ptr::read(self.ptr.as_ptr().add(index))
    }

    /// # Safety
    ///
    /// `index < capacity` and the slot holds a live value.
    #[inline]
    pub unsafe fn assume_init_ref(&self, index: usize) -> &T {
        debug_assert!(index < self.capacity);
        &*self.ptr.as_ptr().add(index)
    }

    /// # Safety
    ///
    /// `index < capacity` and the slot holds a live value.
    #[inline]
    pub unsafe fn assume_init_mut(&mut self, index: usize) -> &mut T {
        debug_assert!(index < self.capacity);
        &mut *self.ptr.as_ptr().add(index)
    }

    /// Destroy the value in slot `index`, leaving the slot dead.
    ///
    /// # Safety
    ///
    /// `index < capacity` and the slot holds a live value.
    #[inline]
    pub unsafe fn drop_in_place(&mut self, index: usize) {
        debug_assert!(index < self.capacity);
        ptr::drop_in_place(self.ptr.as_ptr().add(index));
    }

    /// Destroy slots `[start, start + len)` in index order.
    ///
    /// # Safety
    ///
    /// `start + len <= capacity` and every slot in the range is live.
    pub unsafe fn drop_range(&mut self, start: usize, len: usize) {
        debug_assert!(start + len <= self.capacity);
        if len == 0 {
            return;
        }
        let base = self.ptr.as_ptr().add(start);
        ptr::drop_in_place(ptr::slice_from_raw_parts_mut(base, len));
    }

    /// View the live prefix `[0, len)` as a slice.
    ///
    /// # Safety
    ///
    /// `len <= capacity` and every slot in the prefix is live.
    #[inline]
    pub unsafe fn as_slice(&self, len: usize) -> &[T] {
        debug_assert!(len <= self.capacity);
        slice::from_raw_parts(self.ptr.as_ptr(), len)
    }

    /// View slots `[start, start + len)` as a slice. Slots outside the
    /// range may be dead.
    ///
    /// # Safety
    ///
    /// `start + len <= capacity` and every slot in the range is live.
    #[inline]
    pub unsafe fn range_slice(&self, start: usize, len: usize) -> &[T] {
        debug_assert!(start + len <= self.capacity);
        slice::from_raw_parts(self.ptr.as_ptr().add(start), len)
    }

    /// # Safety
    ///
    /// `len <= capacity` and every slot in the prefix is live.
    #[inline]
    pub unsafe fn as_mut_slice(&mut self, len: usize) -> &mut [T] {
        debug_assert!(len <= self.capacity);
        slice::from_raw_parts_mut(self.ptr.as_ptr(), len)
    }
}

impl<T> Default for RawBuffer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for RawBuffer<T> {
    /// Releases the region only. Live values inside (if any) are the
    /// owner's problem and are not dropped here.
    fn drop(&mut self) {
        if Self::IS_ZST || self.capacity == 0 {
            return;
        }
        if let Ok(layout) = Layout::array::<T>(self.capacity) {
            // SAFETY: ptr was returned by `alloc::alloc` with this exact layout.
            unsafe { alloc::dealloc(self.ptr.as_ptr().cast(), layout) };
            #[cfg(feature = "tracing")]
            tracing::trace!(capacity = self.capacity, "raw buffer released");
        }
    }
}

impl<T> fmt::Debug for RawBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawBuffer")
            .field("ptr", &self.ptr)
            .field("capacity", &self.capacity)
            .finish()
    }
}
