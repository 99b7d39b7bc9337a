//! # Memory Management
//!
//! Growable contiguous buffers backing every array in the storage engine.
//!
//! ## Design Philosophy
//!
//! One generic buffer type is written once and reused for every array:
//! - Entity masks, the dead-id list, pool sparse indices, pool owners
//! - Pool dense records (as 16-byte aligned blocks)
//!
//! Capacity only ever grows. Clearing keeps the allocation for reuse.

mod buffer;

pub use buffer::{GrowBuffer, INITIAL_CAPACITY};
