//! # Component Pool
//!
//! Sparse-set storage for one component type.
//!
//! ```text
//! sparse[entity] ──► dense slot ──► record bytes (stride = record size)
//! owners[slot]   ──► entity
//! ```
//!
//! - Lookup is O(1): entity mask test, then one sparse read
//! - Insert appends to the dense records
//! - Remove moves the last record into the vacated slot (swap-remove)
//!
//! Records are type-erased bytes. Dense storage is a buffer of 16-byte
//! aligned blocks and records are packed with a stride equal to their size,
//! so a record of size `n` always starts on a multiple of `n`. Since a type's
//! size is a multiple of its alignment, every record is correctly aligned
//! for any component of that size (up to [`MAX_COMPONENT_ALIGN`]).

use bytemuck::{Pod, Zeroable};

use super::component::{check_layout, Component, MAX_COMPONENT_ALIGN};
use super::entity::EntityId;
use super::mask::ComponentMask;
use crate::memory::GrowBuffer;

/// Aligned storage unit for dense record bytes.
#[derive(Clone, Copy, Pod, Zeroable)]
#[repr(C, align(16))]
struct Block([u8; MAX_COMPONENT_ALIGN]);

/// Number of blocks needed to hold `bytes` bytes.
#[inline]
const fn blocks_for(bytes: usize) -> usize {
    bytes.div_ceil(MAX_COMPONENT_ALIGN)
}

/// Storage for every record of one registered component type.
///
/// The pool does not own entity masks. Mutating operations receive the
/// entity's mask from the [`World`](super::World) and keep this type's bit
/// in it consistent with the pool contents:
///
/// for every entity `e` whose mask contains [`bit`](Self::bit),
/// `sparse[e]` is a valid dense slot and `owners[sparse[e]] == e`.
pub struct ComponentPool {
    /// The type's single-bit mask.
    bit: ComponentMask,
    /// Bytes per record.
    record_size: usize,
    /// Record bytes, addressed through the full allocated capacity.
    dense: GrowBuffer<Block>,
    /// Owning entity of each dense slot. Its length is the record count.
    owners: GrowBuffer<EntityId>,
    /// Dense slot of each entity, indexed by entity id.
    sparse: GrowBuffer<usize>,
}

impl ComponentPool {
    /// Creates an empty pool for the type `bit` with `record_size`-byte records.
    ///
    /// `capacity` records are reserved up front.
    #[must_use]
    pub(crate) fn new(bit: ComponentMask, record_size: usize, capacity: usize) -> Self {
        let mut pool = Self {
            bit,
            record_size,
            dense: GrowBuffer::new(),
            owners: GrowBuffer::new(),
            sparse: GrowBuffer::new(),
        };
        if capacity > 0 {
            pool.owners.reserve(capacity);
            pool.dense.reserve(blocks_for(capacity * record_size));
        }
        pool
    }

    /// Returns the type's single-bit mask.
    #[inline]
    #[must_use]
    pub const fn bit(&self) -> ComponentMask {
        self.bit
    }

    /// Returns the size of one record in bytes.
    #[inline]
    #[must_use]
    pub const fn record_size(&self) -> usize {
        self.record_size
    }

    /// Returns the number of entities carrying this type.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.owners.len()
    }

    /// Returns true if no entity carries this type.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.owners.is_empty()
    }

    /// Returns the entities carrying this type, in dense order.
    ///
    /// Dense order is not stable across removals.
    #[inline]
    #[must_use]
    pub fn entities(&self) -> &[EntityId] {
        self.owners.as_slice()
    }

    /// Iterates over `(entity, record bytes)` pairs in dense order.
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, &[u8])> + '_ {
        self.owners
            .iter()
            .enumerate()
            .map(move |(slot, &entity)| (entity, self.record(slot)))
    }

    /// Inserts or overwrites the record of `entity`.
    ///
    /// If `mask` already contains this type the record is overwritten in
    /// place. Otherwise the sparse index grows to cover `entity` (new slots
    /// zero-filled), the record is appended to the dense storage and this
    /// type's bit is set in `mask`.
    ///
    /// # Panics
    ///
    /// Panics if `bytes` is not exactly one record long.
    pub(crate) fn insert(&mut self, entity: EntityId, mask: &mut ComponentMask, bytes: &[u8]) {
        assert_eq!(
            bytes.len(),
            self.record_size,
            "ComponentPool::insert: record for component {} must be {} bytes",
            self.bit,
            self.record_size
        );

        if mask.contains(self.bit) {
            let slot = self.sparse.as_slice()[entity.index()];
            self.record_mut(slot).copy_from_slice(bytes);
            return;
        }

        while self.sparse.len() <= entity.index() {
            self.sparse.append(0);
        }

        let slot = self.owners.len();
        self.sparse.as_mut_slice()[entity.index()] = slot;
        self.owners.append(entity);
        self.dense.reserve(blocks_for((slot + 1) * self.record_size));
        self.record_mut(slot).copy_from_slice(bytes);

        mask.insert(self.bit);
    }

    /// Removes the record of `entity`. No-op if `mask` lacks this type.
    ///
    /// Clears this type's bit in `mask`, then swap-removes: the last dense
    /// record moves into the vacated slot and its owner's sparse entry is
    /// repointed. The removed entity's sparse entry is zeroed.
    pub(crate) fn remove(&mut self, entity: EntityId, mask: &mut ComponentMask) {
        if !mask.contains(self.bit) {
            return;
        }
        mask.remove(self.bit);

        let slot = self.sparse.as_slice()[entity.index()];
        let last = self.owners.len() - 1;
        if slot != last {
            let size = self.record_size;
            let bytes: &mut [u8] = bytemuck::cast_slice_mut(self.dense.slots_mut());
            bytes.copy_within(last * size..(last + 1) * size, slot * size);
        }

        let removed = self.owners.remove_unordered(slot);
        debug_assert_eq!(removed, entity, "dense owner out of sync");

        let sparse = self.sparse.as_mut_slice();
        if let Some(&moved) = self.owners.get(slot) {
            sparse[moved.index()] = slot;
        }
        sparse[entity.index()] = 0;
    }

    /// Returns the record bytes of `entity`, or `None` if `mask` lacks this type.
    #[must_use]
    pub fn get(&self, entity: EntityId, mask: ComponentMask) -> Option<&[u8]> {
        if !mask.contains(self.bit) {
            return None;
        }
        let slot = *self.sparse.get(entity.index())?;
        Some(self.record(slot))
    }

    /// Returns the record bytes of `entity` mutably, or `None` if `mask` lacks
    /// this type.
    pub fn get_mut(&mut self, entity: EntityId, mask: ComponentMask) -> Option<&mut [u8]> {
        if !mask.contains(self.bit) {
            return None;
        }
        let slot = *self.sparse.get(entity.index())?;
        Some(self.record_mut(slot))
    }

    /// Typed view of [`get`](Self::get).
    ///
    /// # Panics
    ///
    /// Panics if `T` does not match the registered record size.
    #[must_use]
    pub fn get_as<T: Component>(&self, entity: EntityId, mask: ComponentMask) -> Option<&T> {
        check_layout::<T>(self.record_size);
        self.get(entity, mask).map(bytemuck::from_bytes)
    }

    /// Typed view of [`get_mut`](Self::get_mut).
    ///
    /// # Panics
    ///
    /// Panics if `T` does not match the registered record size.
    pub fn get_as_mut<T: Component>(
        &mut self,
        entity: EntityId,
        mask: ComponentMask,
    ) -> Option<&mut T> {
        check_layout::<T>(self.record_size);
        self.get_mut(entity, mask).map(bytemuck::from_bytes_mut)
    }

    /// Empties the pool, keeping its allocations.
    pub(crate) fn reset(&mut self) {
        self.dense.reset_count();
        self.owners.reset_count();
        self.sparse.reset_count();
    }

    /// Releases every allocation of the pool.
    pub(crate) fn free(&mut self) {
        self.dense.free();
        self.owners.free();
        self.sparse.free();
    }

    #[inline]
    fn record(&self, slot: usize) -> &[u8] {
        let start = slot * self.record_size;
        let bytes: &[u8] = bytemuck::cast_slice(self.dense.slots());
        &bytes[start..start + self.record_size]
    }

    #[inline]
    fn record_mut(&mut self, slot: usize) -> &mut [u8] {
        let start = slot * self.record_size;
        let bytes: &mut [u8] = bytemuck::cast_slice_mut(self.dense.slots_mut());
        &mut bytes[start..start + self.record_size]
    }
}

impl std::fmt::Debug for ComponentPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentPool")
            .field("bit", &self.bit)
            .field("record_size", &self.record_size)
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}
