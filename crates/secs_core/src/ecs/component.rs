//! # Component System
//!
//! Components are fixed-size, plain-old-data records. Pools store them as
//! untyped bytes; the typed accessors reinterpret those bytes through
//! `bytemuck`, so any `Pod` type can be a component.

use bytemuck::Pod;

/// Largest alignment a component type may require.
///
/// Pool storage is built from blocks aligned to this boundary.
pub const MAX_COMPONENT_ALIGN: usize = 16;

/// Marker trait for typed component records.
///
/// Components must be:
/// - `Pod`: plain old data, any byte pattern of the right size is valid
/// - `'static`: no borrowed data
/// - aligned to at most [`MAX_COMPONENT_ALIGN`] bytes
///
/// Every such type implements `Component` automatically.
///
/// # Example
///
/// ```rust
/// use bytemuck::{Pod, Zeroable};
///
/// #[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
/// #[repr(C)]
/// struct Position {
///     x: f32,
///     y: f32,
/// }
///
/// fn assert_component<T: secs_core::Component>() {}
/// assert_component::<Position>();
/// ```
pub trait Component: Pod + 'static {}

impl<T: Pod + 'static> Component for T {}

/// Panics unless `T` can be stored in a pool with `record_size`-byte records.
#[inline]
pub(crate) fn check_layout<T: Component>(record_size: usize) {
    assert!(
        std::mem::align_of::<T>() <= MAX_COMPONENT_ALIGN,
        "component {} requires alignment {}, at most {MAX_COMPONENT_ALIGN} is supported",
        std::any::type_name::<T>(),
        std::mem::align_of::<T>()
    );
    assert_eq!(
        std::mem::size_of::<T>(),
        record_size,
        "component {} does not match the registered record size",
        std::any::type_name::<T>()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_layout_accepts_matching_size() {
        check_layout::<[f32; 3]>(12);
        check_layout::<u64>(8);
        check_layout::<()>(0);
    }

    #[test]
    #[should_panic(expected = "does not match the registered record size")]
    fn test_check_layout_rejects_size_mismatch() {
        check_layout::<u32>(8);
    }
}
