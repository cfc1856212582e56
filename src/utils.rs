//! Helper functions for the allocator. These are functions that don't
//! particularly belong to any concrete module of the program.

/// Rounds `value` up to the next multiple of `alignment`.
///
/// `alignment` must be a power of two. This is used to round large requests
/// up to a multiple of [`crate::kernel::page_size`].
pub(crate) fn align_up(value: usize, alignment: usize) -> usize {
    (value + alignment - 1) & !(alignment - 1)
}

/// Rounds `value` down to the previous multiple of `alignment`.
///
/// `alignment` must be a power of two. This is how we get from an arbitrary
/// pointer to the start of its containing page or block.
pub(crate) fn align_down(value: usize, alignment: usize) -> usize {
    value & !(alignment - 1)
}
