//! # ECS World
//!
//! The central container for entities and component pools.
//!
//! Entity ids move through three states:
//!
//! ```text
//! unallocated ──spawn──► live ──despawn──► dead ──spawn──► live
//! ```
//!
//! Dead ids wait on a free list and are handed out again before the id
//! counter advances.
//!
//! `reset` rewinds the counter but not the allocated range: ids handed out
//! before a reset still read as dead entities with empty masks.

use tracing::{debug, trace};

use super::component::{check_layout, Component};
use super::entity::EntityId;
use super::mask::ComponentMask;
use super::pool::ComponentPool;
use super::query::{Query, QueryIter};
use super::registry::TypeRegistry;
use crate::config::WorldConfig;
use crate::memory::GrowBuffer;

/// The ECS World - owner of every entity and component record.
///
/// # Contract violations
///
/// Misuse of the registration protocol panics instead of returning errors:
/// - registering more than [`MAX_COMPONENT_TYPES`](super::MAX_COMPONENT_TYPES) types
/// - using an entity id outside the allocated range ("entity not found")
/// - passing a combined mask to a single-type operation
/// - despawning an id that is already dead
///
/// A missing component is not an error: getters return `None`.
///
/// # Example
///
/// ```rust
/// use secs_core::{Query, World};
///
/// let mut world = World::new();
/// let health = world.register_component::<f32>();
/// let armor = world.register_component::<u32>();
///
/// let player = world.spawn();
/// let crate_ = world.spawn();
/// world.insert_component(player, health, 100.0f32);
/// world.insert_component(crate_, armor, 3u32);
///
/// assert_eq!(world.get_component::<f32>(player, health), Some(&100.0));
/// assert_eq!(world.get_component::<f32>(crate_, health), None);
///
/// let alive: Vec<_> = world.query(Query::new().with(health)).collect();
/// assert_eq!(alive, vec![player]);
/// ```
pub struct World {
    /// Component mask per entity id.
    masks: GrowBuffer<ComponentMask>,
    /// Liveness per entity id.
    alive: GrowBuffer<bool>,
    /// Despawned ids waiting for reuse.
    dead: GrowBuffer<EntityId>,
    /// Next id handed out when the dead list is empty.
    next_id: u32,
    /// Ids below this were allocated at some point since the last `free`.
    /// Slots in `[masks.len(), allocated)` are zeroed and belong to ids
    /// issued before a reset.
    allocated: usize,
    /// Bit assignment and record sizes.
    registry: TypeRegistry,
    /// One pool per registered type, indexed by bit position.
    pools: Vec<ComponentPool>,
    /// Initial capacities used by `init` and `register`.
    config: WorldConfig,
}

impl World {
    /// Creates an empty world with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(&WorldConfig::default())
    }

    /// Creates an empty world, reserving the capacities in `config`.
    #[must_use]
    pub fn with_config(config: &WorldConfig) -> Self {
        let mut world = Self {
            masks: GrowBuffer::new(),
            alive: GrowBuffer::new(),
            dead: GrowBuffer::new(),
            next_id: 0,
            allocated: 0,
            registry: TypeRegistry::new(),
            pools: Vec::new(),
            config: config.clone(),
        };
        world.reserve_initial();
        world
    }

    /// Zeroes all state and rewinds the registration cursor.
    ///
    /// Use after [`free`](Self::free) to bring the world back into service.
    pub fn init(&mut self) {
        self.free();
        self.reserve_initial();
        debug!("world initialized");
    }

    fn reserve_initial(&mut self) {
        if self.config.initial_entity_capacity > 0 {
            self.masks.reserve(self.config.initial_entity_capacity);
            self.alive.reserve(self.config.initial_entity_capacity);
        }
        if self.config.initial_dead_capacity > 0 {
            self.dead.reserve(self.config.initial_dead_capacity);
        }
    }

    // =========================================================================
    // Registration
    // =========================================================================

    /// Registers a component type with `record_size`-byte records.
    ///
    /// Returns the type's single-bit mask. Must be called before any entity
    /// carries the type.
    ///
    /// # Panics
    ///
    /// Panics when the mask width is exhausted.
    pub fn register(&mut self, record_size: usize) -> ComponentMask {
        let bit = self.registry.register(record_size);
        self.pools.push(ComponentPool::new(
            bit,
            record_size,
            self.config.initial_pool_capacity,
        ));
        bit
    }

    /// Registers `T` as a component type. Records are `size_of::<T>()` bytes.
    ///
    /// # Panics
    ///
    /// Panics when the mask width is exhausted or `T` is over-aligned.
    pub fn register_component<T: Component>(&mut self) -> ComponentMask {
        check_layout::<T>(std::mem::size_of::<T>());
        self.register(std::mem::size_of::<T>())
    }

    /// Returns the type registry.
    #[inline]
    #[must_use]
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Returns the number of registered component types.
    #[inline]
    #[must_use]
    pub fn registered_types(&self) -> usize {
        self.registry.len()
    }

    // =========================================================================
    // Entity lifecycle
    // =========================================================================

    /// Spawns an entity with no components.
    ///
    /// Recycles the most recently despawned id if one is available,
    /// otherwise allocates the next sequential id.
    ///
    /// # Panics
    ///
    /// Panics if the `u32` id space is exhausted.
    pub fn spawn(&mut self) -> EntityId {
        if !self.dead.is_empty() {
            let id = self.dead.remove_unordered(self.dead.len() - 1);
            self.masks.as_mut_slice()[id.index()] = ComponentMask::EMPTY;
            self.alive.as_mut_slice()[id.index()] = true;
            trace!(entity = id.raw(), "spawned recycled entity");
            return id;
        }

        assert!(self.next_id < u32::MAX, "World::spawn: entity id space exhausted");
        let id = EntityId::new(self.next_id);
        self.next_id += 1;
        self.masks.append(ComponentMask::EMPTY);
        self.alive.append(true);
        self.allocated = self.allocated.max(self.masks.len());

        trace!(entity = id.raw(), "spawned entity");
        id
    }

    /// Despawns `id`: removes every component, clears its mask and queues
    /// the id for reuse.
    ///
    /// # Panics
    ///
    /// Panics if `id` was never allocated or is already dead.
    pub fn despawn(&mut self, id: EntityId) {
        self.check_entity(id, "despawn");
        assert!(
            self.alive.slots()[id.index()],
            "World::despawn: {id} is already dead"
        );

        let mask = &mut self.masks.slots_mut()[id.index()];
        for bit in mask.iter_bits() {
            let index = self.registry.lookup(bit);
            self.pools[index].remove(id, mask);
        }
        *mask = ComponentMask::EMPTY;

        self.alive.as_mut_slice()[id.index()] = false;
        self.dead.append(id);
        trace!(entity = id.raw(), "despawned entity");
    }

    /// Returns true if `id` is allocated and not despawned.
    #[inline]
    #[must_use]
    pub fn is_alive(&self, id: EntityId) -> bool {
        self.alive.get(id.index()).copied().unwrap_or(false)
    }

    /// Returns the number of live entities.
    #[inline]
    #[must_use]
    pub fn alive_count(&self) -> usize {
        self.masks.len() - self.dead.len()
    }

    /// Returns the number of ids ever allocated (live or dead).
    #[inline]
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.masks.len()
    }

    /// Returns the number of dead ids waiting for reuse.
    #[inline]
    #[must_use]
    pub fn dead_count(&self) -> usize {
        self.dead.len()
    }

    /// Returns the component mask of `id`. Empty for dead ids.
    ///
    /// # Panics
    ///
    /// Panics if `id` was never allocated.
    #[must_use]
    pub fn mask_of(&self, id: EntityId) -> ComponentMask {
        self.check_entity(id, "mask_of");
        self.masks.slots()[id.index()]
    }

    /// Returns the mask of every id issued since the last reset, indexed
    /// by id.
    ///
    /// Dead ids have an empty mask.
    #[inline]
    #[must_use]
    pub fn entity_masks(&self) -> &[ComponentMask] {
        self.masks.as_slice()
    }

    // =========================================================================
    // Components
    // =========================================================================

    /// Attaches the record `bytes` of type `bit` to `id`, overwriting any
    /// existing record of that type.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not live, `bit` is not a single registered type,
    /// or `bytes` is not exactly one record long.
    pub fn insert(&mut self, id: EntityId, bit: ComponentMask, bytes: &[u8]) {
        self.check_live(id, "insert");
        let index = self.registry.lookup(bit);
        let mask = &mut self.masks.as_mut_slice()[id.index()];
        self.pools[index].insert(id, mask, bytes);
    }

    /// Typed form of [`insert`](Self::insert).
    ///
    /// # Panics
    ///
    /// As [`insert`](Self::insert); also if `T` does not match the
    /// registered record size.
    pub fn insert_component<T: Component>(&mut self, id: EntityId, bit: ComponentMask, value: T) {
        check_layout::<T>(self.registry.record_size(bit));
        self.insert(id, bit, bytemuck::bytes_of(&value));
    }

    /// Detaches type `bit` from `id`. No-op if `id` does not carry it.
    ///
    /// # Panics
    ///
    /// Panics if `id` was never allocated or `bit` is not a single
    /// registered type.
    pub fn remove(&mut self, id: EntityId, bit: ComponentMask) {
        self.check_entity(id, "remove");
        let index = self.registry.lookup(bit);
        let mask = &mut self.masks.slots_mut()[id.index()];
        self.pools[index].remove(id, mask);
    }

    /// Returns true if `id` carries every type in `mask`.
    ///
    /// # Panics
    ///
    /// Panics if `id` was never allocated ("entity not found").
    #[must_use]
    pub fn has(&self, id: EntityId, mask: ComponentMask) -> bool {
        self.check_entity(id, "has");
        self.masks.slots()[id.index()].contains(mask)
    }

    /// Exact complement of [`has`](Self::has).
    ///
    /// # Panics
    ///
    /// Panics if `id` was never allocated ("entity not found").
    #[must_use]
    pub fn has_not(&self, id: EntityId, mask: ComponentMask) -> bool {
        !self.has(id, mask)
    }

    /// Returns the record bytes of type `bit` on `id`, or `None` if absent.
    ///
    /// # Panics
    ///
    /// Panics if `id` was never allocated or `bit` is not a single
    /// registered type.
    #[must_use]
    pub fn get(&self, id: EntityId, bit: ComponentMask) -> Option<&[u8]> {
        let (index, mask) = self.resolve(id, bit, "get");
        self.pools[index].get(id, mask)
    }

    /// Mutable form of [`get`](Self::get).
    ///
    /// # Panics
    ///
    /// As [`get`](Self::get).
    pub fn get_mut(&mut self, id: EntityId, bit: ComponentMask) -> Option<&mut [u8]> {
        let (index, mask) = self.resolve(id, bit, "get_mut");
        self.pools[index].get_mut(id, mask)
    }

    /// Typed form of [`get`](Self::get).
    ///
    /// # Panics
    ///
    /// As [`get`](Self::get); also if `T` does not match the registered
    /// record size.
    #[must_use]
    pub fn get_component<T: Component>(&self, id: EntityId, bit: ComponentMask) -> Option<&T> {
        let (index, mask) = self.resolve(id, bit, "get_component");
        self.pools[index].get_as(id, mask)
    }

    /// Typed form of [`get_mut`](Self::get_mut).
    ///
    /// # Panics
    ///
    /// As [`get_component`](Self::get_component).
    pub fn get_component_mut<T: Component>(
        &mut self,
        id: EntityId,
        bit: ComponentMask,
    ) -> Option<&mut T> {
        let (index, mask) = self.resolve(id, bit, "get_component_mut");
        self.pools[index].get_as_mut(id, mask)
    }

    /// Returns the pool storing type `bit`.
    ///
    /// # Panics
    ///
    /// Panics if `bit` is not a single registered type.
    #[must_use]
    pub fn pool(&self, bit: ComponentMask) -> &ComponentPool {
        &self.pools[self.registry.lookup(bit)]
    }

    /// Returns the number of entities carrying type `bit`.
    ///
    /// # Panics
    ///
    /// Panics if `bit` is not a single registered type.
    #[must_use]
    pub fn component_count(&self, bit: ComponentMask) -> usize {
        self.pool(bit).len()
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Starts an iteration over the ids whose masks match `query`.
    #[must_use]
    pub fn query(&self, query: Query) -> QueryIter<'_> {
        QueryIter::new(self, query)
    }

    // =========================================================================
    // Bulk state
    // =========================================================================

    /// Clears every entity and component, keeping registrations and
    /// allocations.
    ///
    /// Ids restart from zero. Ids issued before the reset stay in range
    /// as dead ids with empty masks until they are handed out again.
    pub fn reset(&mut self) {
        self.masks.slots_mut()[..self.allocated].fill(ComponentMask::EMPTY);
        self.alive.slots_mut()[..self.allocated].fill(false);
        self.masks.reset_count();
        self.alive.reset_count();
        self.dead.reset_count();
        self.next_id = 0;
        for pool in &mut self.pools {
            pool.reset();
        }
        debug!(types = self.registry.len(), "world reset");
    }

    /// Releases every buffer and forgets every registration.
    ///
    /// The world is empty afterwards; call [`init`](Self::init) to restore
    /// the configured capacities.
    pub fn free(&mut self) {
        self.masks.free();
        self.alive.free();
        self.dead.free();
        self.next_id = 0;
        self.allocated = 0;
        for pool in &mut self.pools {
            pool.free();
        }
        self.pools = Vec::new();
        self.registry.clear();
        debug!("world freed");
    }

    // =========================================================================
    // Contract checks
    // =========================================================================

    #[inline]
    fn check_entity(&self, id: EntityId, operation: &str) {
        assert!(
            id.index() < self.allocated,
            "World::{operation}: entity not found: {id}"
        );
    }

    #[inline]
    fn check_live(&self, id: EntityId, operation: &str) {
        self.check_entity(id, operation);
        assert!(
            self.alive.slots()[id.index()],
            "World::{operation}: entity not found: {id} is dead"
        );
    }

    /// Resolves `bit` to a pool index and reads the mask of `id`.
    #[inline]
    fn resolve(&self, id: EntityId, bit: ComponentMask, operation: &str) -> (usize, ComponentMask) {
        self.check_entity(id, operation);
        let index = self.registry.lookup(bit);
        (index, self.masks.slots()[id.index()])
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for World {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("World")
            .field("entities", &self.masks.len())
            .field("alive", &self.alive_count())
            .field("pools", &self.pools)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_world_creation() {
        let world = World::new();
        assert_eq!(world.alive_count(), 0);
        assert_eq!(world.entity_count(), 0);
        assert_eq!(world.registered_types(), 0);
    }

    #[test]
    fn test_spawn_sequential_ids() {
        let mut world = World::new();
        let ids: Vec<u32> = (0..5).map(|_| world.spawn().raw()).collect();
        assert_eq!(ids, vec![0, 1, 2, 3, 4]);
        assert_eq!(world.alive_count(), 5);
    }

    #[test]
    fn test_spawn_despawn_recycles() {
        let mut world = World::new();

        let a = world.spawn();
        let b = world.spawn();
        let c = world.spawn();

        world.despawn(b);
        assert!(!world.is_alive(b));
        assert_eq!(world.alive_count(), 2);
        assert_eq!(world.dead_count(), 1);

        // Dead ids are reused before the counter advances
        let x = world.spawn();
        assert_eq!(x, b);
        assert!(world.is_alive(x));

        let y = world.spawn();
        assert!(y > c);
        assert_ne!(y, a);
    }

    #[test]
    fn test_despawn_removes_components() {
        let mut world = World::new();
        let a = world.register_component::<u32>();
        let b = world.register_component::<u64>();

        let e = world.spawn();
        let other = world.spawn();
        world.insert_component(e, a, 1u32);
        world.insert_component(e, b, 2u64);
        world.insert_component(other, a, 3u32);

        world.despawn(e);
        assert_eq!(world.mask_of(e), ComponentMask::EMPTY);
        assert!(world.has_not(e, a));
        assert!(world.has_not(e, b));
        assert_eq!(world.component_count(a), 1);
        assert_eq!(world.component_count(b), 0);
        assert_eq!(world.get_component::<u32>(other, a), Some(&3));
    }

    #[test]
    fn test_recycled_id_starts_empty() {
        let mut world = World::new();
        let a = world.register_component::<u32>();

        let e = world.spawn();
        world.insert_component(e, a, 5u32);
        world.despawn(e);

        let recycled = world.spawn();
        assert_eq!(recycled, e);
        assert_eq!(world.mask_of(recycled), ComponentMask::EMPTY);
        assert_eq!(world.get_component::<u32>(recycled, a), None);
    }

    #[test]
    #[should_panic(expected = "already dead")]
    fn test_double_despawn() {
        let mut world = World::new();
        let e = world.spawn();
        world.despawn(e);
        world.despawn(e);
    }

    #[test]
    #[should_panic(expected = "entity not found")]
    fn test_despawn_unknown_entity() {
        let mut world = World::new();
        world.despawn(EntityId::new(3));
    }

    #[test]
    #[should_panic(expected = "entity not found")]
    fn test_has_unknown_entity() {
        let world = World::new();
        let _ = world.has(EntityId::new(0), ComponentMask::from_bits(1));
    }

    #[test]
    #[should_panic(expected = "entity not found")]
    fn test_insert_on_dead_entity() {
        let mut world = World::new();
        let a = world.register_component::<u32>();
        let e = world.spawn();
        world.despawn(e);
        world.insert_component(e, a, 1u32);
    }

    #[test]
    #[should_panic(expected = "exactly one bit")]
    fn test_get_with_combined_mask() {
        let mut world = World::new();
        let a = world.register_component::<u32>();
        let b = world.register_component::<u32>();
        let e = world.spawn();
        let _ = world.get(e, a | b);
    }

    #[test]
    fn test_has_combined_mask() {
        let mut world = World::new();
        let a = world.register_component::<u8>();
        let b = world.register_component::<u8>();
        let e = world.spawn();
        world.insert_component(e, a, 1u8);

        assert!(world.has(e, a));
        assert!(!world.has(e, a | b));
        world.insert_component(e, b, 2u8);
        assert!(world.has(e, a | b));
    }

    #[test]
    fn test_get_mut_writes_through() {
        let mut world = World::new();
        let a = world.register_component::<[f32; 2]>();
        let e = world.spawn();
        world.insert_component(e, a, [1.0f32, 2.0]);

        if let Some(value) = world.get_component_mut::<[f32; 2]>(e, a) {
            value[1] = 5.0;
        }
        assert_eq!(world.get_component::<[f32; 2]>(e, a), Some(&[1.0, 5.0]));
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let mut world = World::new();
        let a = world.register_component::<u32>();
        let e = world.spawn();
        world.remove(e, a);
        assert!(world.has_not(e, a));
    }

    #[test]
    fn test_reset_keeps_registrations() {
        let mut world = World::new();
        let a = world.register_component::<u32>();
        for value in 0..10u32 {
            let e = world.spawn();
            world.insert_component(e, a, value);
        }

        world.reset();
        assert_eq!(world.entity_count(), 0);
        assert_eq!(world.registered_types(), 1);
        assert_eq!(world.component_count(a), 0);

        let e = world.spawn();
        assert_eq!(e, EntityId::new(0));
        assert!(world.has_not(e, a));
        world.insert_component(e, a, 42u32);
        assert_eq!(world.get_component::<u32>(e, a), Some(&42));
    }

    #[test]
    fn test_pre_reset_ids_read_as_empty() {
        let mut world = World::new();
        let a = world.register_component::<u32>();
        let e0 = world.spawn();
        let e1 = world.spawn();
        world.insert_component(e0, a, 1u32);
        world.insert_component(e1, a, 2u32);

        world.reset();
        assert!(!world.has(e0, a));
        assert!(!world.has(e1, a));
        assert!(world.has_not(e1, a));
        assert!(!world.is_alive(e1));
        assert_eq!(world.mask_of(e1), ComponentMask::EMPTY);
        assert_eq!(world.get_component::<u32>(e1, a), None);
        world.remove(e1, a);

        // Respawning reuses id 0; id 1 still reads as empty
        let fresh = world.spawn();
        assert_eq!(fresh, e0);
        world.insert_component(fresh, a, 7u32);
        assert!(world.has(fresh, a));
        assert!(!world.has(e1, a));
        assert_eq!(world.query(Query::new().with(a)).count(), 1);
    }

    #[test]
    #[should_panic(expected = "already dead")]
    fn test_despawn_pre_reset_id() {
        let mut world = World::new();
        let _ = world.spawn();
        let e = world.spawn();
        world.reset();
        world.despawn(e);
    }

    #[test]
    #[should_panic(expected = "entity not found")]
    fn test_insert_on_pre_reset_id() {
        let mut world = World::new();
        let a = world.register_component::<u32>();
        let e = world.spawn();
        world.reset();
        world.insert_component(e, a, 1u32);
    }

    #[test]
    fn test_spawn_pops_last_dead_id() {
        let mut world = World::new();
        let ids: Vec<EntityId> = (0..4).map(|_| world.spawn()).collect();
        world.despawn(ids[0]);
        world.despawn(ids[2]);
        world.despawn(ids[3]);

        assert_eq!(world.spawn(), ids[3]);
        assert_eq!(world.spawn(), ids[2]);
        assert_eq!(world.spawn(), ids[0]);
        assert_eq!(world.spawn(), EntityId::new(4));
        assert_eq!(world.dead_count(), 0);
    }

    #[test]
    fn test_free_then_init() {
        let mut world = World::new();
        let _ = world.register_component::<u32>();
        let _ = world.spawn();

        world.free();
        assert_eq!(world.registered_types(), 0);
        assert_eq!(world.entity_count(), 0);

        world.init();
        let a = world.register_component::<u64>();
        assert_eq!(a.bits(), 1);
        let e = world.spawn();
        world.insert_component(e, a, 7u64);
        assert_eq!(world.get_component::<u64>(e, a), Some(&7));
    }

    #[test]
    fn test_with_config_reserves() {
        let config = WorldConfig {
            initial_entity_capacity: 64,
            initial_pool_capacity: 32,
            initial_dead_capacity: 16,
        };
        let mut world = World::with_config(&config);
        let a = world.register_component::<u32>();
        assert!(world.masks.capacity() >= 64);
        assert!(world.dead.capacity() >= 16);
        assert!(world.pool(a).is_empty());
    }
}
