//! # Growable Buffer
//!
//! Contiguous, reallocating buffer with amortized doubling growth.

use bytemuck::Zeroable;

/// Capacity of a buffer after its first growth.
pub const INITIAL_CAPACITY: usize = 10;

/// A growable contiguous buffer of plain values.
///
/// The buffer tracks two sizes:
/// - `capacity`: number of zero-initialized slots currently allocated
/// - `len`: number of slots in use (the prefix `[0, len)`)
///
/// Slots in `[len, capacity)` are always initialized. Slots exposed by
/// growth are zero-filled; slots left behind by `remove_unordered` or
/// `reset_count` keep their stale contents until overwritten.
///
/// # Example
///
/// ```rust
/// use secs_core::GrowBuffer;
///
/// let mut ids: GrowBuffer<u32> = GrowBuffer::new();
/// ids.append(7);
/// ids.append(9);
/// ids.append(11);
///
/// // Swap-with-last removal
/// assert_eq!(ids.remove_unordered(0), 7);
/// assert_eq!(ids.as_slice(), &[11, 9]);
/// ```
#[derive(Clone, Debug, Default)]
pub struct GrowBuffer<T> {
    /// Backing slots. `items.len()` is the logical capacity.
    items: Vec<T>,
    /// Number of slots in use.
    count: usize,
}

impl<T: Zeroable + Copy> GrowBuffer<T> {
    /// Creates an empty buffer without allocating.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            items: Vec::new(),
            count: 0,
        }
    }

    /// Creates an empty buffer that can hold at least `capacity` values
    /// before reallocating.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let mut buffer = Self::new();
        buffer.reserve(capacity);
        buffer
    }

    /// Grows the capacity to at least `min_capacity`.
    ///
    /// Growth starts at [`INITIAL_CAPACITY`] and doubles until the request
    /// is covered. Newly exposed slots are zero-filled. Never shrinks.
    pub fn reserve(&mut self, min_capacity: usize) {
        let old_capacity = self.items.len();
        if min_capacity <= old_capacity {
            return;
        }

        let mut capacity = if old_capacity == 0 {
            INITIAL_CAPACITY
        } else {
            old_capacity
        };
        while capacity < min_capacity {
            capacity *= 2;
        }

        self.items.resize(capacity, T::zeroed());
    }

    /// Appends a value, growing the buffer if it is full.
    #[inline]
    pub fn append(&mut self, value: T) {
        self.reserve(self.count + 1);
        self.items[self.count] = value;
        self.count += 1;
    }

    /// Removes the value at `index` by moving the last value into its slot.
    ///
    /// Returns the removed value. Order is not preserved.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not below the current length.
    #[inline]
    pub fn remove_unordered(&mut self, index: usize) -> T {
        assert!(
            index < self.count,
            "GrowBuffer::remove_unordered: index {index} out of bounds (len {})",
            self.count
        );
        let removed = self.items[index];
        self.count -= 1;
        self.items[index] = self.items[self.count];
        removed
    }

    /// Releases the allocation. Length and capacity become zero.
    pub fn free(&mut self) {
        self.items = Vec::new();
        self.count = 0;
    }

    /// Sets the length to zero while keeping the allocation.
    #[inline]
    pub fn reset_count(&mut self) {
        self.count = 0;
    }

    /// Returns the number of values in use.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.count
    }

    /// Returns true if no values are in use.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Returns the number of allocated slots.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.items.len()
    }

    /// Returns the values in use.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.items[..self.count]
    }

    /// Returns the values in use, mutably.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.items[..self.count]
    }

    /// Returns the value at `index` if it is in use.
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.as_slice().get(index)
    }

    /// Returns the value at `index` mutably if it is in use.
    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.as_mut_slice().get_mut(index)
    }

    /// Returns the last value in use.
    #[inline]
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.as_slice().last()
    }

    /// Iterates over the values in use.
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    /// Returns every allocated slot, including those past `len`.
    #[inline]
    pub(crate) fn slots(&self) -> &[T] {
        &self.items
    }

    /// Returns every allocated slot mutably, including those past `len`.
    #[inline]
    pub(crate) fn slots_mut(&mut self) -> &mut [T] {
        &mut self.items
    }
}
