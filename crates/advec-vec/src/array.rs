//! The typed array over a [`RawBuffer`].
//!
//! Invariant: slots `[0, len)` of `storage` hold live values in order,
//! slots `[len, capacity)` are dead. Every method below keeps `len` in step
//! with what is actually constructed, including on unwind.

use std::mem;

use advec_core::{AllocationError, Error, GrowthPolicy};
use advec_mem::{GrowthStats, RawBuffer};

use crate::guard::InitGuard;

/// Growable, contiguous, exclusively owned sequence of `T`.
///
/// Positions are offsets from the start of the live range. Any operation
/// that reallocates or shifts elements invalidates references and raw
/// pointers previously taken into the array.
pub struct DynamicArray<T> {
    storage: RawBuffer<T>,
    len: usize,
    policy: GrowthPolicy,
    stats: GrowthStats,
}

/// Move `count` live values from `src[src_start..]` into `dst[dst_start..]`.
///
/// Relocation is one element at a time, never a block copy of the region.
/// A Rust move cannot fail, so moving is always the safe relocation
/// strategy: the source slots become dead, nothing needs to be destroyed.
///
/// # Safety
///
/// The source range is live and in bounds; the destination range is dead
/// and in bounds.
unsafe fn relocate<T>(
    src: &RawBuffer<T>,
    src_start: usize,
    dst: &mut RawBuffer<T>,
    dst_start: usize,
    count: usize,
) {
    for i in 0..count {
        dst.write(dst_start + i, src.read(src_start + i));
    }
}

impl<T> DynamicArray<T> {
    /// Empty array. Does not allocate.
    pub const fn new() -> Self {
        Self {
            storage: RawBuffer::new(),
            len: 0,
            policy: GrowthPolicy::doubling(),
            stats: GrowthStats::new(),
        }
    }

    /// Empty array that grows according to `policy`.
    pub fn with_policy(policy: GrowthPolicy) -> Result<Self, Error> {
        policy.validate()?;
        #[cfg(feature = "tracing")]
        tracing::debug!(
            factor = policy.factor,
            min_capacity = policy.min_capacity,
            "custom growth policy"
        );
        let mut array = Self::new();
        array.policy = policy;
        Ok(array)
    }

    /// Empty array with room for `capacity` elements.
    pub fn with_capacity(capacity: usize) -> Result<Self, AllocationError> {
        Ok(Self::from_parts(RawBuffer::with_capacity(capacity)?, 0))
    }

    /// Array of `len` default-constructed elements, capacity exactly `len`.
    pub fn with_len(len: usize) -> Result<Self, AllocationError>
    where
        T: Default,
    {
        let mut storage = RawBuffer::with_capacity(len)?;
        let mut guard = InitGuard::new(&mut storage, 0);
        for _ in 0..len {
            guard.push(T::default());
        }
        guard.finish();
        Ok(Self::from_parts(storage, len))
    }

    /// Copy of `items` with capacity exactly `items.len()`.
    pub fn from_slice(items: &[T]) -> Result<Self, AllocationError>
    where
        T: Clone,
    {
        let mut storage = RawBuffer::with_capacity(items.len())?;
        let mut guard = InitGuard::new(&mut storage, 0);
        for item in items {
            guard.push(item.clone());
        }
        guard.finish();
        Ok(Self::from_parts(storage, items.len()))
    }

    /// Deep copy. Capacity of the copy equals `self.len()`; the growth
    /// policy carries over, the stats start fresh.
    pub fn try_clone(&self) -> Result<Self, AllocationError>
    where
        T: Clone,
    {
        let mut copy = Self::from_slice(self.as_slice())?;
        copy.policy = self.policy;
        Ok(copy)
    }

    fn from_parts(storage: RawBuffer<T>, len: usize) -> Self {
        debug_assert!(len <= storage.capacity());
        let mut stats = GrowthStats::new();
        stats.record_capacity(storage.capacity());
        Self {
            storage,
            len,
            policy: GrowthPolicy::doubling(),
            stats,
        }
    }

    /// Move the contents out, leaving `self` empty with no allocation.
    pub fn take(&mut self) -> Self {
        mem::take(self)
    }

    /// Copy-assign from `rhs`.
    ///
    /// When `rhs` does not fit in the current capacity a complete copy is
    /// built first and swapped in, so a failure leaves `self` untouched.
    /// Otherwise the current buffer is reused: the common prefix is
    /// assigned element-wise, then the surplus on our side is destroyed or
    /// the surplus on `rhs`'s side is cloned into the free slots.
    pub fn assign_from(&mut self, rhs: &Self) -> Result<(), AllocationError>
    where
        T: Clone,
    {
        if rhs.len > self.capacity() {
            #[cfg(feature = "tracing")]
            tracing::trace!(len = self.len, rhs_len = rhs.len, "copy-assign via temporary");
            let mut copy = Self::from_slice(rhs.as_slice())?;
            let old_capacity = self.capacity();
            self.storage.swap(&mut copy.storage);
            mem::swap(&mut self.len, &mut copy.len);
            self.stats.record_reallocation(old_capacity, self.capacity(), 0);
            // `copy` now owns our previous elements and drops them.
            return Ok(());
        }

        let common = self.len.min(rhs.len);
        self.as_mut_slice()[..common].clone_from_slice(&rhs.as_slice()[..common]);
        if self.len > rhs.len {
            self.truncate(rhs.len);
        } else {
            for item in &rhs.as_slice()[common..] {
                let value = item.clone();
                // SAFETY: len < rhs.len <= capacity, slot `len` is dead.
                unsafe {
                    self.storage.write(self.len, value);
                }
                self.len += 1;
            }
        }
        Ok(())
    }

    /// Ensure capacity is at least `new_capacity` (a total, not an
    /// increment). No-op if it already is. Live values are moved into
    /// the new buffer; on allocation failure nothing changes.
    pub fn reserve(&mut self, new_capacity: usize) -> Result<(), AllocationError> {
        if new_capacity <= self.capacity() {
            return Ok(());
        }
        let mut fresh = RawBuffer::with_capacity(new_capacity)?;
        // SAFETY: [0, len) is live here, and fresh is dead with capacity > len.
        unsafe { relocate(&self.storage, 0, &mut fresh, 0, self.len) };
        self.adopt(fresh);
        Ok(())
    }

    /// Replace the storage with `fresh`, whose `[0, len)` (plus any newly
    /// emplaced slot) has already been filled. The old region holds only
    /// moved-from slots at this point and is released without drops.
    fn adopt(&mut self, mut fresh: RawBuffer<T>) {
        let old_capacity = self.storage.capacity();
        self.storage.swap(&mut fresh);
        self.stats
            .record_reallocation(old_capacity, self.storage.capacity(), self.len);
    }

    /// Grow or shrink to `new_len`, default-constructing new elements.
    pub fn resize(&mut self, new_len: usize) -> Result<(), AllocationError>
    where
        T: Default,
    {
        self.resize_with(new_len, T::default)
    }

    /// Grow or shrink to `new_len`, filling new slots with `f()`.
    ///
    /// Growing reserves exactly `new_len` first.
    pub fn resize_with<F>(&mut self, new_len: usize, mut f: F) -> Result<(), AllocationError>
    where
        F: FnMut() -> T,
    {
        if new_len == self.len {
            return Ok(());
        }
        if new_len < self.len {
            self.truncate(new_len);
            return Ok(());
        }
        self.reserve(new_len)?;
        while self.len < new_len {
            let value = f();
            // SAFETY: len < new_len <= capacity, slot `len` is dead.
            unsafe {
                self.storage.write(self.len, value);
            }
            self.len += 1;
        }
        Ok(())
    }

    /// Destroy `[new_len, len)` in index order. No-op if `new_len >= len`.
    pub fn truncate(&mut self, new_len: usize) {
        if new_len >= self.len {
            return;
        }
        let tail = self.len - new_len;
        // Shrink first so a panicking destructor can't cause a double drop.
        self.len = new_len;
        // SAFETY: those slots were live and are no longer counted.
        unsafe { self.storage.drop_range(new_len, tail) };
    }

    /// Destroy every element; capacity is kept.
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    /// Append `value`.
    ///
    /// On `Err` the array is unchanged and `value` has already been
    /// dropped. Use [`DynamicArray::emplace_back`] to build the value only
    /// once the slot is secured.
    pub fn push_back(&mut self, value: T) -> Result<(), AllocationError> {
        self.emplace_back(|| value).map(|_| ())
    }

    /// Append the value produced by `make`, constructing it directly in its
    /// final slot, and return a reference to it.
    ///
    /// When the buffer is full, the new buffer is allocated and the new
    /// value is built in it before any existing element is relocated, so an
    /// allocation failure or a panic in `make` leaves `self` as it was.
    pub fn emplace_back<F>(&mut self, make: F) -> Result<&mut T, AllocationError>
    where
        F: FnOnce() -> T,
    {
        let index = self.len;
        if self.len == self.capacity() {
            let new_capacity = self.policy.next_capacity(self.len)?;
            let mut fresh = RawBuffer::with_capacity(new_capacity)?;
            // SAFETY: index = len < new_capacity; fresh has no live slots,
            // and [0, len) of storage is live.
            unsafe {
                fresh.write(index, make());
                relocate(&self.storage, 0, &mut fresh, 0, self.len);
            }
            self.adopt(fresh);
        } else {
            let value = make();
            // SAFETY: len < capacity, slot `len` is dead.
            unsafe {
                self.storage.write(index, value);
            }
        }
        self.len += 1;
        // SAFETY: slot `index` was just constructed.
        Ok(unsafe { self.storage.assume_init_mut(index) })
    }

    /// Insert `value` at `offset`, shifting `[offset, len)` one slot right.
    /// Returns `offset`.
    ///
    /// # Panics
    ///
    /// Panics if `offset > len`.
    pub fn insert(&mut self, offset: usize, value: T) -> Result<usize, AllocationError> {
        self.emplace(offset, || value)
    }

    /// Insert the value produced by `make` at `offset`. Returns `offset`.
    ///
    /// # Panics
    ///
    /// Panics if `offset > len`.
    pub fn emplace<F>(&mut self, offset: usize, make: F) -> Result<usize, AllocationError>
    where
        F: FnOnce() -> T,
    {
        assert!(
            offset <= self.len,
            "insertion offset {offset} out of bounds (len {})",
            self.len
        );
        if offset == self.len {
            self.emplace_back(make)?;
            return Ok(offset);
        }

        if self.len == self.capacity() {
            let new_capacity = self.policy.next_capacity(self.len)?;
            let mut fresh = RawBuffer::with_capacity(new_capacity)?;
            // SAFETY: the target slot and the two relocated ranges are
            // disjoint, dead in `fresh`, and within new_capacity > len.
            unsafe {
                fresh.write(offset, make());
                relocate(&self.storage, 0, &mut fresh, 0, offset);
                relocate(&self.storage, offset, &mut fresh, offset + 1, self.len - offset);
            }
            self.adopt(fresh);
        } else {
            let value = make();
            let last = self.len - 1;
            // SAFETY: offset < len < capacity. Slot `len` is dead and gets
            // the old last element; then [offset, last) moves right back to
            // front so no live value is overwritten before it is read.
            unsafe {
                let tail = self.storage.read(last);
                self.storage.write(self.len, tail);
                for i in (offset..last).rev() {
                    let moved = self.storage.read(i);
                    self.storage.write(i + 1, moved);
                }
                // Slot `offset` was moved out of above; write, don't assign.
                self.storage.write(offset, value);
            }
        }
        self.len += 1;
        Ok(offset)
    }

    /// Remove and return the element at `offset`, shifting the rest left.
    ///
    /// # Panics
    ///
    /// Panics if `offset >= len`.
    pub fn remove(&mut self, offset: usize) -> T {
        assert!(
            offset < self.len,
            "removal offset {offset} out of bounds (len {})",
            self.len
        );
        // SAFETY: offset < len. Each slot is read before it is overwritten,
        // front to back, and the vacated last slot is dropped from the count.
        unsafe {
            let removed = self.storage.read(offset);
            for i in offset + 1..self.len {
                let moved = self.storage.read(i);
                self.storage.write(i - 1, moved);
            }
            self.len -= 1;
            removed
        }
    }

    /// Destroy the element at `offset`. Returns the offset, which now holds
    /// the element that followed it (or equals `len` if it was the last).
    ///
    /// # Panics
    ///
    /// Panics if `offset >= len`.
    pub fn erase(&mut self, offset: usize) -> usize {
        drop(self.remove(offset));
        offset
    }

    /// Destroy the last element.
    ///
    /// Calling this on an empty array is a caller bug: it trips a debug
    /// assertion and is a no-op in release builds.
    pub fn pop_back(&mut self) {
        debug_assert!(self.len > 0, "pop_back on empty DynamicArray");
        if self.len == 0 {
            return;
        }
        self.len -= 1;
        // SAFETY: the old last slot was live and is no longer counted.
        unsafe { self.storage.drop_in_place(self.len) };
    }

    /// Remove and return the last element, if any.
    pub fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        // SAFETY: as in `pop_back`, but ownership moves to the caller.
        Some(unsafe { self.storage.read(self.len) })
    }

    /// Exchange the complete state with `other`. O(1).
    pub fn swap(&mut self, other: &mut Self) {
        self.storage.swap(&mut other.storage);
        mem::swap(&mut self.len, &mut other.len);
        mem::swap(&mut self.policy, &mut other.policy);
        mem::swap(&mut self.stats, &mut other.stats);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.storage.capacity()
    }

    pub fn policy(&self) -> GrowthPolicy {
        self.policy
    }

    pub fn stats(&self) -> &GrowthStats {
        &self.stats
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: [0, len) is live.
        unsafe { self.storage.as_slice(self.len) }
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: [0, len) is live.
        unsafe { self.storage.as_mut_slice(self.len) }
    }

    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.storage.as_ptr()
    }

    /// Hand the raw storage and live count to the owning iterator.
    pub(crate) fn into_raw_parts(self) -> (RawBuffer<T>, usize) {
        let mut this = mem::ManuallyDrop::new(self);
        let len = this.len;
        (this.storage.take(), len)
    }
}

impl<T> Drop for DynamicArray<T> {
    fn drop(&mut self) {
        // SAFETY: [0, len) is live; the buffer itself is released by
        // RawBuffer's own Drop afterwards.
        unsafe { self.storage.drop_range(0, self.len) }
    }
}
