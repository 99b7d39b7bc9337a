//! # Component Type Registry
//!
//! Assigns each registered component type a single-bit mask and records the
//! size of its records. Maps a single-bit mask back to the index of the pool
//! that stores that type.

use tracing::debug;

use super::mask::ComponentMask;

/// Entries in the bit lookup table. Entry 0 is the zero-mask sentinel.
const LOOKUP_LEN: usize = ComponentMask::BITS as usize;

/// Maximum number of component types a registry can hold.
///
/// One table slot is reserved for the zero-mask sentinel, leaving one fewer
/// type than there are bits in a mask.
pub const MAX_COMPONENT_TYPES: usize = LOOKUP_LEN - 1;

/// Builds the sorted table `[0, 1 << 0, 1 << 1, ..., 1 << 62]`.
const fn build_lookup_table() -> [u64; LOOKUP_LEN] {
    let mut table = [0u64; LOOKUP_LEN];
    let mut slot = 1;
    while slot < LOOKUP_LEN {
        table[slot] = 1 << (slot - 1);
        slot += 1;
    }
    table
}

/// Registry of component types for one world.
///
/// Registration hands out bits in order: the first type gets `1 << 0`, the
/// second `1 << 1`, and so on. The pool index of a type equals its bit
/// position.
///
/// # Example
///
/// ```rust
/// use secs_core::TypeRegistry;
///
/// let mut registry = TypeRegistry::new();
/// let a = registry.register(4);
/// let b = registry.register(8);
///
/// assert_eq!(a.bits(), 0b01);
/// assert_eq!(b.bits(), 0b10);
/// assert_eq!(registry.lookup(b), 1);
/// assert_eq!(registry.record_size(b), 8);
/// ```
#[derive(Clone, Debug)]
pub struct TypeRegistry {
    /// Bit handed to the next registration.
    cursor: u64,
    /// Record size per registered type, indexed by bit position.
    record_sizes: Vec<usize>,
    /// Sorted powers of two for bit -> index lookup.
    table: [u64; LOOKUP_LEN],
}

impl TypeRegistry {
    /// Creates an empty registry. The cursor starts at the first bit.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cursor: 1,
            record_sizes: Vec::new(),
            table: build_lookup_table(),
        }
    }

    /// Registers a component type whose records are `record_size` bytes.
    ///
    /// Returns the type's single-bit mask.
    ///
    /// # Panics
    ///
    /// Panics if [`MAX_COMPONENT_TYPES`] types are already registered.
    pub fn register(&mut self, record_size: usize) -> ComponentMask {
        assert!(
            self.record_sizes.len() < MAX_COMPONENT_TYPES,
            "TypeRegistry::register: capacity exceeded, at most {MAX_COMPONENT_TYPES} component types"
        );

        let bit = ComponentMask::from_bits(self.cursor);
        self.record_sizes.push(record_size);
        self.cursor <<= 1;

        debug!(bit = bit.bits(), record_size, "registered component type");
        bit
    }

    /// Returns the pool index for a registered type.
    ///
    /// Binary search over the sorted power-of-two table, O(log width).
    ///
    /// # Panics
    ///
    /// `bit` must have exactly one bit set and name a registered type.
    /// Passing an OR of several type bits is a caller error and panics;
    /// combined fetches are never served through this path.
    #[must_use]
    pub fn lookup(&self, bit: ComponentMask) -> usize {
        assert!(
            bit.is_single(),
            "TypeRegistry::lookup: mask {bit} must have exactly one bit set"
        );

        let index = match self.table.binary_search(&bit.bits()) {
            Ok(slot) => slot - 1,
            Err(_) => usize::MAX,
        };
        assert!(
            index < self.record_sizes.len(),
            "TypeRegistry::lookup: component {bit} is not registered"
        );
        index
    }

    /// Returns the record size registered for `bit`.
    ///
    /// # Panics
    ///
    /// Same contract as [`lookup`](Self::lookup).
    #[must_use]
    pub fn record_size(&self, bit: ComponentMask) -> usize {
        self.record_sizes[self.lookup(bit)]
    }

    /// Returns the number of registered types.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.record_sizes.len()
    }

    /// Returns true if no type is registered.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.record_sizes.is_empty()
    }

    /// Returns the OR of every registered bit.
    #[inline]
    #[must_use]
    pub const fn registered(&self) -> ComponentMask {
        ComponentMask::from_bits(self.cursor - 1)
    }

    /// Forgets every registration and rewinds the cursor to the first bit.
    pub fn clear(&mut self) {
        self.cursor = 1;
        self.record_sizes = Vec::new();
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}
