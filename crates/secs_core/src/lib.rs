//! # SECS Core
//!
//! In-memory sparse-set storage for entity component records:
//! - Component types are registered at runtime and identified by one mask bit
//! - Each type owns a pool of fixed-size records (dense array + sparse index)
//! - Entity ids are recycled through a dead list
//! - Queries iterate entities by include/exclude masks
//!
//! ## Architecture Rules
//!
//! 1. **Single-threaded** - a world has one owner; there is no internal locking
//! 2. **Contract violations panic** - unknown entities, combined masks passed
//!    to single-type operations and registry overflow are caller bugs
//! 3. **Absence is normal** - a missing component is `None`, never an error
//!
//! ## Example
//!
//! ```rust
//! use secs_core::{Query, World};
//!
//! let mut world = World::new();
//! let a = world.register(4);
//! let b = world.register(8);
//!
//! let e0 = world.spawn();
//! let e1 = world.spawn();
//! world.insert(e0, a, &7u32.to_ne_bytes());
//! world.insert(e1, b, &2.5f64.to_ne_bytes());
//!
//! assert_eq!(world.get_component::<u32>(e0, a), Some(&7));
//! assert_eq!(world.get(e0, b), None);
//! assert_eq!(world.get(e1, a), None);
//! assert_eq!(world.get_component::<f64>(e1, b), Some(&2.5));
//!
//! let with_a: Vec<_> = world.query(Query::new().with(a)).collect();
//! assert_eq!(with_a, vec![e0]);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod ecs;
pub mod error;
pub mod memory;

pub use config::WorldConfig;
pub use ecs::{
    Component, ComponentMask, ComponentPool, CursorState, EntityId, Query, QueryCursor,
    QueryIter, TypeRegistry, World, MAX_COMPONENT_ALIGN, MAX_COMPONENT_TYPES,
};
pub use error::{SecsError, SecsResult};
pub use memory::{GrowBuffer, INITIAL_CAPACITY};
