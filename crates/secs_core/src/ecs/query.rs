//! # Queries
//!
//! A query is an include mask and an exclude mask. Iteration scans entity
//! ids in ascending order and stops on each id whose mask contains every
//! included bit and none of the excluded bits. The test is on masks alone:
//! a dead id has an empty mask, so only a query with an empty include mask
//! visits it.
//!
//! Two iteration handles are provided:
//! - [`QueryCursor`]: position only, borrows the world per call. Lets the
//!   caller mutate components between steps and nest cursors freely.
//! - [`QueryIter`]: a cursor bound to `&World`, usable as an [`Iterator`].
//!
//! Pairwise iteration uses two cursors, resetting the inner one once per
//! outer step:
//!
//! ```rust
//! use secs_core::{Query, QueryCursor, World};
//!
//! let mut world = World::new();
//! let solid = world.register(0);
//! for _ in 0..3 {
//!     let e = world.spawn();
//!     world.insert(e, solid, &[]);
//! }
//!
//! let query = Query::new().with(solid);
//! let mut outer = QueryCursor::new(query);
//! let mut inner = QueryCursor::new(query);
//! let mut pairs = 0;
//! while outer.advance(&world) {
//!     inner.reset();
//!     while inner.advance(&world) {
//!         if inner.current() > outer.current() {
//!             pairs += 1;
//!         }
//!     }
//! }
//! assert_eq!(pairs, 3);
//! ```

use super::component::Component;
use super::entity::EntityId;
use super::mask::ComponentMask;
use super::world::World;

/// Include/exclude mask pair describing a component combination.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Query {
    /// Every one of these bits must be set.
    pub has: ComponentMask,
    /// None of these bits may be set.
    pub exclude: ComponentMask,
}

impl Query {
    /// Creates a query matching every allocated id, dead ones included.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            has: ComponentMask::EMPTY,
            exclude: ComponentMask::EMPTY,
        }
    }

    /// Creates a query from raw include and exclude masks.
    #[inline]
    #[must_use]
    pub const fn from_masks(has: ComponentMask, exclude: ComponentMask) -> Self {
        Self { has, exclude }
    }

    /// Adds `mask` to the include set.
    #[inline]
    #[must_use]
    pub const fn with(self, mask: ComponentMask) -> Self {
        Self {
            has: ComponentMask::from_bits(self.has.bits() | mask.bits()),
            exclude: self.exclude,
        }
    }

    /// Adds `mask` to the exclude set.
    #[inline]
    #[must_use]
    pub const fn without(self, mask: ComponentMask) -> Self {
        Self {
            has: self.has,
            exclude: ComponentMask::from_bits(self.exclude.bits() | mask.bits()),
        }
    }

    /// Returns true if an entity with `mask` satisfies the query.
    #[inline]
    #[must_use]
    pub const fn matches(self, mask: ComponentMask) -> bool {
        mask.contains(self.has) && !mask.intersects(self.exclude)
    }
}

/// Where a cursor stands in its pass over the entity range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CursorState {
    /// Not advanced yet, or reset. The next advance probes id 0.
    BeforeStart,
    /// Positioned on a matching entity.
    Matched,
    /// The pass ran off the end. Stays here until reset.
    Exhausted,
}

/// Position-only query cursor.
///
/// The cursor holds no reference to the world and no snapshot of its data:
/// every step reads the world's current masks. Mutating components of the
/// current entity between steps is fine; structural changes to entities not
/// yet visited may or may not be observed by the ongoing pass.
#[derive(Clone, Copy, Debug)]
pub struct QueryCursor {
    query: Query,
    position: usize,
    state: CursorState,
}

impl QueryCursor {
    /// Creates a cursor before the start of the entity range.
    #[inline]
    #[must_use]
    pub const fn new(query: Query) -> Self {
        Self {
            query,
            position: 0,
            state: CursorState::BeforeStart,
        }
    }

    /// Returns the query this cursor filters by.
    #[inline]
    #[must_use]
    pub const fn query(&self) -> Query {
        self.query
    }

    /// Returns the cursor state.
    #[inline]
    #[must_use]
    pub const fn state(&self) -> CursorState {
        self.state
    }

    /// Moves to the next id whose mask matches the query.
    ///
    /// Returns false, and becomes exhausted, when no entity past the
    /// current position matches.
    pub fn advance(&mut self, world: &World) -> bool {
        let masks = world.entity_masks();
        let mut position = match self.state {
            CursorState::BeforeStart => 0,
            CursorState::Matched => self.position + 1,
            CursorState::Exhausted => return false,
        };

        while position < masks.len() {
            if self.query.matches(masks[position]) {
                self.position = position;
                self.state = CursorState::Matched;
                return true;
            }
            position += 1;
        }

        self.position = masks.len();
        self.state = CursorState::Exhausted;
        false
    }

    /// Returns the entity the cursor is positioned on.
    ///
    /// # Panics
    ///
    /// Panics unless the last [`advance`](Self::advance) succeeded.
    #[inline]
    #[must_use]
    pub fn current(&self) -> EntityId {
        assert!(
            self.state == CursorState::Matched,
            "QueryCursor::current: cursor is not positioned on an entity ({:?})",
            self.state
        );
        EntityId::new(self.position as u32)
    }

    /// Rewinds to before the first entity for a fresh pass.
    #[inline]
    pub fn reset(&mut self) {
        self.position = 0;
        self.state = CursorState::BeforeStart;
    }

    /// Returns the record of type `bit` on the current entity.
    ///
    /// `bit` must be a single type bit; typically one already implied by
    /// the query's include mask.
    ///
    /// # Panics
    ///
    /// Panics if the cursor is not positioned or `bit` is not a single
    /// registered type.
    #[must_use]
    pub fn field<'w>(&self, world: &'w World, bit: ComponentMask) -> Option<&'w [u8]> {
        world.get(self.current(), bit)
    }

    /// Mutable form of [`field`](Self::field).
    ///
    /// # Panics
    ///
    /// As [`field`](Self::field).
    pub fn field_mut<'w>(&self, world: &'w mut World, bit: ComponentMask) -> Option<&'w mut [u8]> {
        world.get_mut(self.current(), bit)
    }

    /// Typed form of [`field`](Self::field).
    ///
    /// # Panics
    ///
    /// As [`field`](Self::field); also if `T` does not match the registered
    /// record size.
    #[must_use]
    pub fn field_as<'w, T: Component>(&self, world: &'w World, bit: ComponentMask) -> Option<&'w T> {
        world.get_component(self.current(), bit)
    }

    /// Typed form of [`field_mut`](Self::field_mut).
    ///
    /// # Panics
    ///
    /// As [`field_as`](Self::field_as).
    pub fn field_as_mut<'w, T: Component>(
        &self,
        world: &'w mut World,
        bit: ComponentMask,
    ) -> Option<&'w mut T> {
        world.get_component_mut(self.current(), bit)
    }
}

/// Query cursor bound to a world.
///
/// Created by [`World::query`]. Can be driven by hand with
/// [`advance`](Self::advance)/[`current`](Self::current) or consumed as an
/// iterator of entity ids.
///
/// Once exhausted it keeps returning `None` until [`reset`](Self::reset),
/// which starts a new pass from the first id.
#[derive(Clone, Debug)]
pub struct QueryIter<'w> {
    world: &'w World,
    cursor: QueryCursor,
}

impl<'w> QueryIter<'w> {
    /// Creates an iterator before the start of the entity range.
    #[inline]
    #[must_use]
    pub const fn new(world: &'w World, query: Query) -> Self {
        Self {
            world,
            cursor: QueryCursor::new(query),
        }
    }

    /// See [`QueryCursor::advance`].
    #[inline]
    pub fn advance(&mut self) -> bool {
        self.cursor.advance(self.world)
    }

    /// See [`QueryCursor::current`].
    #[inline]
    #[must_use]
    pub fn current(&self) -> EntityId {
        self.cursor.current()
    }

    /// Rewinds for a new pass. An exhausted iterator yields ids again.
    #[inline]
    pub fn reset(&mut self) {
        self.cursor.reset();
    }

    /// See [`QueryCursor::state`].
    #[inline]
    #[must_use]
    pub const fn state(&self) -> CursorState {
        self.cursor.state()
    }

    /// See [`QueryCursor::field`].
    #[inline]
    #[must_use]
    pub fn field(&self, bit: ComponentMask) -> Option<&'w [u8]> {
        self.cursor.field(self.world, bit)
    }

    /// See [`QueryCursor::field_as`].
    #[inline]
    #[must_use]
    pub fn field_as<T: Component>(&self, bit: ComponentMask) -> Option<&'w T> {
        self.cursor.field_as(self.world, bit)
    }
}

impl Iterator for QueryIter<'_> {
    type Item = EntityId;

    #[inline]
    fn next(&mut self) -> Option<EntityId> {
        if self.advance() {
            Some(self.current())
        } else {
            None
        }
    }
}
