//! Size classification.
//!
//! Every small request is served from one of [`NUM_CLASSES`] segregated
//! lists, one per power-of-two block size between [`MIN_BLOCK_SIZE`] and
//! [`MAX_BLOCK_SIZE`]. Requests above [`MAX_BLOCK_SIZE`] bypass the lists
//! entirely and get their own dedicated mapping.

/// The smallest block size we hand out, in bytes.
pub(crate) const MIN_BLOCK_SIZE: usize = 16;

/// The largest block size served from the segregated lists, in bytes.
pub(crate) const MAX_BLOCK_SIZE: usize = 2048;

/// Number of size classes, one per power of two in
/// `MIN_BLOCK_SIZE..=MAX_BLOCK_SIZE`.
pub(crate) const NUM_CLASSES: usize = 8;

// log2(MIN_BLOCK_SIZE), subtracted so the smallest class lands on index 0.
const CLASS_SHIFT: u32 = MIN_BLOCK_SIZE.trailing_zeros();

const _: () = assert!(MIN_BLOCK_SIZE << (NUM_CLASSES - 1) == MAX_BLOCK_SIZE);

/// One of the eight supported block sizes, stored as its list index.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) struct SizeClass(usize);

impl SizeClass {
    /// Classifies a requested byte count.
    ///
    /// Returns `None` when the request exceeds [`MAX_BLOCK_SIZE`] and must be
    /// served by the large-object path. Otherwise the class's block size is
    /// the smallest power of two that covers the request, never below
    /// [`MIN_BLOCK_SIZE`].
    pub fn of(size: usize) -> Option<Self> {
        if size > MAX_BLOCK_SIZE {
            return None;
        }

        let block_size = size.max(MIN_BLOCK_SIZE).next_power_of_two();

        Some(Self::from_block_size(block_size))
    }

    /// Recovers the class from a block size read back out of a page header.
    pub fn from_block_size(block_size: usize) -> Self {
        debug_assert!(block_size.is_power_of_two());
        debug_assert!((MIN_BLOCK_SIZE..=MAX_BLOCK_SIZE).contains(&block_size));

        Self((block_size.trailing_zeros() - CLASS_SHIFT) as usize)
    }

    /// Index of this class in the free-list table, `0..NUM_CLASSES`.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }

    /// Block size of this class in bytes.
    #[inline]
    pub fn block_size(self) -> usize {
        MIN_BLOCK_SIZE << self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_requests_round_up_to_min() {
        for size in 0..=MIN_BLOCK_SIZE {
            let class = SizeClass::of(size).unwrap();
            assert_eq!(MIN_BLOCK_SIZE, class.block_size());
            assert_eq!(0, class.index());
        }
    }

    #[test]
    fn requests_round_up_to_next_power_of_two() {
        let cases = vec![
            (10, 16),
            (17, 32),
            (33, 64),
            (100, 128),
            (129, 256),
            (1000, 1024),
            (1025, 2048),
            (2048, 2048),
        ];

        for (size, expected) in cases {
            let class = SizeClass::of(size).unwrap();
            assert_eq!(expected, class.block_size(), "size {size}");
        }
    }

    #[test]
    fn exact_powers_of_two_keep_their_size() {
        for index in 0..NUM_CLASSES {
            let block_size = MIN_BLOCK_SIZE << index;
            let class = SizeClass::of(block_size).unwrap();
            assert_eq!(block_size, class.block_size());
            assert_eq!(index, class.index());
        }
    }

    #[test]
    fn oversized_requests_are_large() {
        assert!(SizeClass::of(MAX_BLOCK_SIZE + 1).is_none());
        assert!(SizeClass::of(1 << 20).is_none());
    }

    #[test]
    fn block_size_round_trips_through_class() {
        for index in 0..NUM_CLASSES {
            let block_size = MIN_BLOCK_SIZE << index;
            assert_eq!(index, SizeClass::from_block_size(block_size).index());
        }
    }
}
