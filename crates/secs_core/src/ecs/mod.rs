//! # Entity Component System
//!
//! Sparse-set storage addressed through component bitmasks.
//!
//! ## Design Philosophy
//!
//! - Each registered component type owns one bit of a 64-bit mask
//! - Each type owns one pool: dense packed records plus a sparse entity index
//! - Each entity's mask says which pools hold a record for it
//! - Queries scan entity masks; pools are only touched to fetch fields

mod component;
mod entity;
mod mask;
mod pool;
mod query;
mod registry;
mod world;

pub use component::{Component, MAX_COMPONENT_ALIGN};
pub use entity::EntityId;
pub use mask::ComponentMask;
pub use pool::ComponentPool;
pub use query::{CursorState, Query, QueryCursor, QueryIter};
pub use registry::{TypeRegistry, MAX_COMPONENT_TYPES};
pub use world::World;
