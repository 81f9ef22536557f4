// This file is part of Mini.

// Mini is free software: you can redistribute it and/or modify it under the terms of the GNU General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
//
// Mini is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the GNU General Public License for more details.

use std::{
    iter::{Chain, Copied},
    ops::{Index, Range},
    slice,
};

/// Number of slots a new [GapBuffer] starts with, and the granularity the gap grows by.
pub const ALLOC_CHUNK: usize = 256;

/// A contiguous, growable gap buffer holding elements of type T.
///
/// The storage is laid out as `[pre-gap elements | gap | post-gap elements]`. Indices used by the
/// public API are always *logical*: they skip over the gap, so index `0` is the first element and
/// `len()` is one past the last one no matter where the gap currently sits.
///
/// # Examples
/// ```
/// use mini_gap::GapBuffer;
///
/// let mut buffer = GapBuffer::new();
///
/// buffer.insert_slice(0, b"held");
/// buffer.insert_slice(2, b"llo wor");
///
/// assert_eq!(buffer.to_vec(), b"hello world");
/// assert_eq!(buffer.gap_start(), 9);
///
/// let removed = buffer.remove_range(0..6);
/// assert_eq!(removed, b"hello ");
/// assert_eq!(buffer.to_vec(), b"world");
/// ```
///
/// # Gap
///
/// The gap occupies the physical slots `[gap_start, gap_end)`. The following always holds:
///
/// ```text
/// 0 <= gap_start <= gap_end <= capacity
/// len == capacity - (gap_end - gap_start)
/// ```
///
/// A logical index `i` lives at physical slot `i` when `i < gap_start` and at
/// `i + (gap_end - gap_start)` otherwise.
///
/// Every insertion or removal first moves the gap to the edit point with
/// [move_gap_to](GapBuffer::move_gap_to). That costs O(|gap_start - index|) element copies done as
/// one block move, and nothing at all when the gap is already there (sequential typing).
#[derive(Clone, Debug)]
pub struct GapBuffer<T> {
    data: Vec<T>,
    gap_start: usize,
    gap_end: usize,
}

impl<T> GapBuffer<T>
where
    T: Copy + Default,
{
    /// Creates a new empty GapBuffer with [ALLOC_CHUNK] slots, all of them gap.
    ///
    /// ### Examples
    /// ```
    /// use mini_gap::{GapBuffer, ALLOC_CHUNK};
    ///
    /// let buffer = GapBuffer::<u8>::new();
    ///
    /// assert_eq!(buffer.len(), 0);
    /// assert_eq!(buffer.capacity(), ALLOC_CHUNK);
    /// assert_eq!(buffer.gap_start(), 0);
    /// assert_eq!(buffer.gap_end(), ALLOC_CHUNK);
    /// ```
    pub fn new() -> Self {
        Self::with_capacity(ALLOC_CHUNK)
    }

    /// Creates a new empty GapBuffer whose gap spans `capacity` slots.
    ///
    /// ### Examples
    /// ```
    /// use mini_gap::GapBuffer;
    ///
    /// let buffer = GapBuffer::<u8>::with_capacity(4);
    ///
    /// assert_eq!(buffer.capacity(), 4);
    /// assert_eq!(buffer.gap_len(), 4);
    /// ```
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: vec![T::default(); capacity],
            gap_start: 0,
            gap_end: capacity,
        }
    }

    /// Reallocates the storage with `extra` more slots, all of which join the gap. The post-gap
    /// elements are shifted to the new end of the storage so the gap stays contiguous and in
    /// place.
    ///
    /// ### Examples
    /// ```
    /// use mini_gap::GapBuffer;
    ///
    /// let mut buffer = GapBuffer::from(*b"ab");
    /// buffer.move_gap_to(1);
    /// buffer.grow(3);
    ///
    /// assert_eq!(buffer.capacity(), 5);
    /// assert_eq!(buffer.gap_start(), 1);
    /// assert_eq!(buffer.gap_end(), 4);
    /// assert_eq!(buffer.to_vec(), b"ab");
    /// ```
    pub fn grow(&mut self, extra: usize) {
        if extra == 0 {
            return;
        }

        let old_capacity = self.data.len();
        self.data.resize(old_capacity + extra, T::default());
        self.data
            .copy_within(self.gap_end..old_capacity, self.gap_end + extra);
        self.gap_end += extra;

        debug_assert!(self.gap_start <= self.gap_end && self.gap_end <= self.data.len());
    }

    /// Moves the gap so that it starts at logical `index`. Only the elements between the old and
    /// the new split point are copied, with a single block move.
    ///
    /// Panics if `index` is strictly greater than the length of the buffer.
    ///
    /// ### Examples
    /// ```
    /// use mini_gap::GapBuffer;
    ///
    /// let mut buffer = GapBuffer::from(*b"abcd");
    /// assert_eq!(buffer.gap_start(), 4);
    ///
    /// buffer.move_gap_to(1);
    /// assert_eq!(buffer.gap_start(), 1);
    /// assert_eq!(buffer.as_slices(), (&b"a"[..], &b"bcd"[..]));
    ///
    /// buffer.move_gap_to(3);
    /// assert_eq!(buffer.as_slices(), (&b"abc"[..], &b"d"[..]));
    /// ```
    pub fn move_gap_to(&mut self, index: usize) {
        if index > self.len() {
            panic!(
                "Expected gap index ({}) for move_gap_to to be within the bounds of GapBuffer (len: {})",
                index,
                self.len()
            );
        }

        if index < self.gap_start {
            let shift = self.gap_start - index;
            self.data
                .copy_within(index..self.gap_start, self.gap_end - shift);
            self.gap_start = index;
            self.gap_end -= shift;
        } else if index > self.gap_start {
            let shift = index - self.gap_start;
            self.data
                .copy_within(self.gap_end..self.gap_end + shift, self.gap_start);
            self.gap_start += shift;
            self.gap_end += shift;
        }
    }

    /// Inserts `items` so that the first of them lands at logical `index`. Grows the storage by
    /// whole [ALLOC_CHUNK]s when the gap is too small. Inserting an empty slice does nothing.
    ///
    /// Panics if `index` is strictly greater than the length of the buffer.
    ///
    /// ### Examples
    /// ```
    /// use mini_gap::{GapBuffer, ALLOC_CHUNK};
    ///
    /// let mut buffer = GapBuffer::with_capacity(2);
    /// buffer.insert_slice(0, &[1, 2, 3]);
    /// buffer.insert_slice(0, &[0]);
    ///
    /// assert_eq!(buffer.to_vec(), [0, 1, 2, 3]);
    /// assert_eq!(buffer.capacity(), 2 + ALLOC_CHUNK);
    /// assert_eq!(buffer.gap_start(), 1);
    /// ```
    pub fn insert_slice(&mut self, index: usize, items: &[T]) {
        if items.is_empty() {
            return;
        }

        if self.gap_len() < items.len() {
            let missing = items.len() - self.gap_len();
            self.grow(missing.div_ceil(ALLOC_CHUNK) * ALLOC_CHUNK);
        }

        self.move_gap_to(index);
        self.data[self.gap_start..self.gap_start + items.len()].copy_from_slice(items);
        self.gap_start += items.len();
    }

    /// Removes the elements in the logical `range` and returns them. The gap ends up at
    /// `range.start` and simply widens over the removed slots.
    ///
    /// Panics if the range is inverted or reaches past the end of the buffer.
    ///
    /// ### Examples
    /// ```
    /// use mini_gap::GapBuffer;
    ///
    /// let mut buffer = GapBuffer::from(vec![0, 1, 2, 3, 4]);
    ///
    /// assert_eq!(buffer.remove_range(1..3), [1, 2]);
    /// assert_eq!(buffer.to_vec(), [0, 3, 4]);
    /// assert_eq!(buffer.gap_start(), 1);
    ///
    /// assert!(buffer.remove_range(2..2).is_empty());
    /// ```
    pub fn remove_range(&mut self, range: Range<usize>) -> Vec<T> {
        if range.start > range.end || range.end > self.len() {
            panic!(
                "Expected range ({:?}) for remove_range to be within the bounds of GapBuffer (len: {})",
                range,
                self.len()
            );
        }

        self.move_gap_to(range.start);
        let count = range.end - range.start;
        let removed = self.data[self.gap_end..self.gap_end + count].to_vec();
        self.gap_end += count;

        removed
    }

    /// Drops every element. The capacity is kept and becomes one big gap.
    ///
    /// ### Examples
    /// ```
    /// use mini_gap::GapBuffer;
    ///
    /// let mut buffer = GapBuffer::from([1, 2, 3]);
    /// buffer.clear();
    ///
    /// assert!(buffer.is_empty());
    /// assert_eq!(buffer.gap_len(), buffer.capacity());
    /// ```
    pub fn clear(&mut self) {
        self.gap_start = 0;
        self.gap_end = self.data.len();
    }

    /// Returns a copy of the logical content, gap removed.
    pub fn to_vec(&self) -> Vec<T> {
        let (before, after) = self.as_slices();
        let mut content = Vec::with_capacity(self.len());
        content.extend_from_slice(before);
        content.extend_from_slice(after);
        content
    }
}

impl<T> GapBuffer<T> {
    /// Returns the number of elements currently stored, gap excluded.
    pub fn len(&self) -> usize {
        self.data.len() - self.gap_len()
    }

    /// Returns true when no element is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the number of physical slots, gap included.
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Returns the first physical slot of the gap.
    pub fn gap_start(&self) -> usize {
        self.gap_start
    }

    /// Returns the first physical slot after the gap.
    pub fn gap_end(&self) -> usize {
        self.gap_end
    }

    /// Returns the number of free slots in the gap.
    pub fn gap_len(&self) -> usize {
        self.gap_end - self.gap_start
    }

    /// Translates a logical index into the physical slot that holds it.
    ///
    /// ### Examples
    /// ```
    /// use mini_gap::GapBuffer;
    ///
    /// let mut buffer = GapBuffer::with_capacity(8);
    /// buffer.insert_slice(0, b"abcd");
    /// buffer.move_gap_to(2);
    ///
    /// assert_eq!(buffer.physical_index(1), 1);
    /// assert_eq!(buffer.physical_index(2), 6);
    /// ```
    pub fn physical_index(&self, index: usize) -> usize {
        if index < self.gap_start {
            index
        } else {
            index + self.gap_len()
        }
    }

    /// Returns a reference to the element at logical `index`, or None if index is out of bounds.
    ///
    /// ### Examples
    /// ```
    /// use mini_gap::GapBuffer;
    ///
    /// let mut buffer = GapBuffer::from([0, 1, 2, 3]);
    /// buffer.move_gap_to(2);
    ///
    /// assert_eq!(buffer.get(2), Some(&2));
    /// assert_eq!(buffer.get(4), None);
    /// ```
    pub fn get(&self, index: usize) -> Option<&T> {
        if index >= self.len() {
            None
        } else {
            self.data.get(self.physical_index(index))
        }
    }

    /// Returns the two physical spans holding content: everything before the gap, then everything
    /// after it. Writing both in order reproduces the content.
    pub fn as_slices(&self) -> (&[T], &[T]) {
        (
            &self.data[..self.gap_start],
            &self.data[self.gap_end..],
        )
    }

    /// Returns an iterator over the content in logical order.
    ///
    /// ### Examples
    /// ```
    /// use mini_gap::GapBuffer;
    ///
    /// let mut buffer = GapBuffer::from([0, 1, 2]);
    /// buffer.move_gap_to(1);
    ///
    /// let collected: Vec<_> = buffer.iter().collect();
    /// assert_eq!(collected, [&0, &1, &2]);
    /// ```
    pub fn iter(&self) -> impl Iterator<Item = &'_ T> + '_ {
        let (before, after) = self.as_slices();
        before.iter().chain(after.iter())
    }
}

impl<T> Default for GapBuffer<T>
where
    T: Copy + Default,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Index<usize> for GapBuffer<T> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        self.get(index).expect("Out of bounds index provided to GapBuffer")
    }
}

impl<T> From<Vec<T>> for GapBuffer<T> {
    fn from(value: Vec<T>) -> Self {
        let len = value.len();
        Self {
            data: value,
            gap_start: len,
            gap_end: len,
        }
    }
}

impl<T> From<&[T]> for GapBuffer<T>
where
    T: Clone,
{
    fn from(value: &[T]) -> Self {
        Self::from(value.to_vec())
    }
}

impl<T, const N: usize> From<[T; N]> for GapBuffer<T> {
    fn from(value: [T; N]) -> Self {
        Self::from(Vec::from(value))
    }
}

impl<'a, T> IntoIterator for &'a GapBuffer<T>
where
    T: Copy,
{
    type Item = T;

    type IntoIter = Chain<Copied<slice::Iter<'a, T>>, Copied<slice::Iter<'a, T>>>;

    fn into_iter(self) -> Self::IntoIter {
        let (before, after) = self.as_slices();
        before.iter().copied().chain(after.iter().copied())
    }
}
