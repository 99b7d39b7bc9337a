//! # Entity Management
//!
//! Entities are plain integer handles. An id is drawn from a monotonically
//! increasing counter unless a despawned id is waiting to be recycled.

use bytemuck::{Pod, Zeroable};

/// Unique identifier for a live entity within one [`World`](super::World).
///
/// The value doubles as the index into the world's mask array and every
/// pool's sparse array. Ids carry no generation: once despawned, an id may
/// be handed out again by a later spawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Pod, Zeroable)]
#[repr(transparent)]
pub struct EntityId(u32);

impl EntityId {
    /// Creates an entity id from its raw value.
    #[inline]
    #[must_use]
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw id value.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Returns the id as an index into per-entity arrays.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_id_index() {
        let id = EntityId::new(12345);
        assert_eq!(id.raw(), 12345);
        assert_eq!(id.index(), 12345);
    }

    #[test]
    fn test_entity_id_ordering() {
        assert!(EntityId::new(1) < EntityId::new(2));
        assert_eq!(EntityId::default(), EntityId::new(0));
    }

    #[test]
    fn test_entity_id_display() {
        assert_eq!(EntityId::new(123).to_string(), "Entity(123)");
    }
}
