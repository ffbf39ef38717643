//! Owning iterator.

use std::fmt;
use std::iter::FusedIterator;

use advec_mem::RawBuffer;

use crate::array::DynamicArray;

/// Iterator that moves elements out of a [`DynamicArray`].
///
/// Owns the array's buffer; slots `[start, end)` are still live. Whatever
/// is not consumed is dropped with the iterator.
pub struct IntoIter<T> {
    buf: RawBuffer<T>,
    start: usize,
    end: usize,
}

impl<T> IntoIter<T> {
    /// Elements not yet yielded.
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: [start, end) is live; slots before `start` were moved out
        // and are not covered by the slice.
        unsafe { self.buf.range_slice(self.start, self.end - self.start) }
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.start == self.end {
            return None;
        }
        let index = self.start;
        self.start += 1;
        // SAFETY: index was live and is now outside [start, end).
        Some(unsafe { self.buf.read(index) })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.end - self.start;
        (n, Some(n))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        if self.start == self.end {
            return None;
        }
        self.end -= 1;
        // SAFETY: the old last live slot, now outside [start, end).
        Some(unsafe { self.buf.read(self.end) })
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for IntoIter<T> {}

impl<T> Drop for IntoIter<T> {
    fn drop(&mut self) {
        let remaining = self.end - self.start;
        // Mark everything consumed first so a panicking destructor can't
        // lead to a second drop of the same slot.
        let start = self.start;
        self.start = self.end;
        // SAFETY: [start, start + remaining) was live.
        unsafe { self.buf.drop_range(start, remaining) }
    }
}

impl<T: fmt::Debug> fmt::Debug for IntoIter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.as_slice()).finish()
    }
}

impl<T> IntoIterator for DynamicArray<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        let (buf, len) = self.into_raw_parts();
        IntoIter {
            buf,
            start: 0,
            end: len,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    #[test]
    fn yields_from_both_ends() {
        let a = DynamicArray::from_slice(&[1, 2, 3, 4]).unwrap();
        let mut it = a.into_iter();
        assert_eq!(it.len(), 4);
        assert_eq!(it.next(), Some(1));
        assert_eq!(it.next_back(), Some(4));
        assert_eq!(it.as_slice(), &[2, 3]);
        assert_eq!(it.collect::<Vec<_>>(), vec![2, 3]);
    }

    #[test]
    fn remaining_view_after_consuming_owned_values() {
        let a = DynamicArray::from_slice(&[
            Box::new(1),
            Box::new(2),
            Box::new(3),
            Box::new(4),
        ])
        .unwrap();
        let mut it = a.into_iter();
        assert_eq!(it.next(), Some(Box::new(1)));
        assert_eq!(it.as_slice(), &[Box::new(2), Box::new(3), Box::new(4)]);
        assert_eq!(it.next_back(), Some(Box::new(4)));
        assert_eq!(it.as_slice(), &[Box::new(2), Box::new(3)]);
        assert_eq!(format!("{it:?}"), "IntoIter([2, 3])");
        it.next();
        it.next();
        assert!(it.as_slice().is_empty());
    }

    #[test]
    fn dropping_early_releases_the_rest() {
        let shared = Rc::new(());
        let items = [shared.clone(), shared.clone(), shared.clone()];
        let a = DynamicArray::from_slice(&items).unwrap();
        drop(items);
        assert_eq!(Rc::strong_count(&shared), 4);
        let mut it = a.into_iter();
        let first = it.next();
        drop(it);
        assert_eq!(Rc::strong_count(&shared), 2);
        drop(first);
        assert_eq!(Rc::strong_count(&shared), 1);
    }
}
