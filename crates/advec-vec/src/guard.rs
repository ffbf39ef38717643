//! Drop guard for ranges that are being constructed.

use std::mem;

use advec_mem::RawBuffer;

/// Tracks a prefix of slots constructed from `start` onwards. If the guard
/// is dropped without [`InitGuard::finish`] (i.e. a constructor panicked),
/// the values built so far are destroyed and the buffer is left with no
/// live slots in the range.
pub(crate) struct InitGuard<'a, T> {
    buf: &'a mut RawBuffer<T>,
    start: usize,
    initialized: usize,
}

impl<'a, T> InitGuard<'a, T> {
    pub(crate) fn new(buf: &'a mut RawBuffer<T>, start: usize) -> Self {
        Self {
            buf,
            start,
            initialized: 0,
        }
    }

    /// Construct `value` in the next slot of the range.
    pub(crate) fn push(&mut self, value: T) {
        let slot = self.start + self.initialized;
        assert!(slot < self.buf.capacity(), "InitGuard overran its buffer");
        // SAFETY: slot is in bounds and past every slot this guard has
        // constructed, so it is dead.
        unsafe {
            self.buf.write(slot, value);
        }
        self.initialized += 1;
    }

    /// Disarm the guard; the constructed slots now belong to the caller.
    pub(crate) fn finish(self) -> usize {
        let n = self.initialized;
        mem::forget(self);
        n
    }
}

impl<T> Drop for InitGuard<'_, T> {
    fn drop(&mut self) {
        // SAFETY: exactly `initialized` slots from `start` were constructed.
        unsafe { self.buf.drop_range(self.start, self.initialized) }
    }
}
