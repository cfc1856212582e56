//! Page headers and the slab carving that backs the small-object path.
//!
//! Every page serving small allocations is carved into uniform blocks of one
//! size class. The first block-sized slot is reserved for the page header and
//! is never handed out; the remaining blocks cycle between the class's free
//! list and the caller.
//!
//! ```text
//! page base
//! |
//! v
//! +----------+----------+----------+----------+-     -+----------+
//! |  header  |  block 1 |  block 2 |  block 3 |  ...  | block n-1|
//! | tag      |          |          |          |       |          |
//! | blk size |          |          |          |       |          |
//! | next pg  |          |          |          |       |          |
//! +----------+----------+----------+----------+-     -+----------+
//! |<--------->
//!  block size            n = page_size / block_size
//! ```
//!
//! The headers of all carved pages are chained into a registry owned by the
//! allocator. Resolving a pointer walks that chain and compares page bases,
//! so memory the allocator does not own is never dereferenced, no matter what
//! the caller hands in. The tag stays in the header as a consistency check on
//! pages we already know are ours.

use std::ptr::NonNull;

use crate::class::{MIN_BLOCK_SIZE, SizeClass};
use crate::freelist::FreeList;
use crate::kernel::page_size;
use crate::utils::align_down;

/// Ownership tag written into every page header.
const MAGIC: u32 = 0x51AB_A10C;

/// Metadata stored in the first block-sized slot of a carved page.
pub(crate) struct PageHeader {
    /// Next page in the allocator's registry.
    next: Option<NonNull<PageHeader>>,
    /// Ownership tag, always [`MAGIC`].
    magic: u32,
    /// Size of every block on this page, in bytes.
    block_size: u32,
}

// The header has to fit in the reserved slot of the smallest class.
const _: () = assert!(size_of::<PageHeader>() <= MIN_BLOCK_SIZE);

impl PageHeader {
    /// Block size of the page this header describes.
    #[inline]
    pub fn block_size(&self) -> usize {
        self.block_size as usize
    }

    /// Base address of the page this header sits on.
    #[inline]
    pub fn base(&self) -> usize {
        self as *const PageHeader as usize
    }
}

/// Registry of every page carved by the allocator.
///
/// Pages are never unmapped, so this list only ever grows and its entries
/// stay valid for the rest of the process.
pub(crate) struct PageList {
    head: Option<NonNull<PageHeader>>,
    len: usize,
}

impl PageList {
    /// Creates a new empty registry.
    pub const fn new() -> Self {
        Self { head: None, len: 0 }
    }

    /// Number of pages carved so far.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Carves a fresh page for `class` and seeds `free_list` with its blocks.
    ///
    /// Block 0 becomes the page header and is chained into the registry.
    /// Blocks `1..n` are pushed in reverse so that block 1 ends up at the
    /// head of the list and is the first one handed out.
    ///
    /// # Safety
    ///
    /// `page` must be the base of a page-aligned, writable mapping of
    /// [`page_size`] bytes that the allocator has exclusive ownership of and
    /// that will never be unmapped.
    pub unsafe fn register(&mut self, page: NonNull<u8>, class: SizeClass, free_list: &mut FreeList) {
        let block_size = class.block_size();

        let header = page.cast::<PageHeader>();

        unsafe {
            header.as_ptr().write(PageHeader {
                next: self.head,
                magic: MAGIC,
                block_size: block_size as u32,
            });
        }

        self.head = Some(header);
        self.len += 1;

        let blocks = page_size() / block_size;

        unsafe {
            for i in (1..blocks).rev() {
                free_list.push(NonNull::new_unchecked(page.as_ptr().add(i * block_size)));
            }
        }
    }

    /// Resolves `ptr` to the header of its containing page, if that page was
    /// carved by this allocator.
    ///
    /// `ptr` may point anywhere inside a block, or at memory the allocator
    /// has never seen; unknown pointers resolve to `None` without ever being
    /// read through.
    pub fn resolve(&self, ptr: *const u8) -> Option<&PageHeader> {
        let base = align_down(ptr as usize, page_size());

        let mut current = self.head;

        while let Some(header) = current {
            if header.as_ptr() as usize == base {
                let header = unsafe { header.as_ref() };
                debug_assert_eq!(MAGIC, header.magic);

                return Some(header);
            }

            current = unsafe { header.as_ref().next };
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel;

    fn carved_page(class: SizeClass) -> (NonNull<u8>, PageList, FreeList) {
        let page = unsafe { kernel::request_memory(page_size()) }.unwrap();

        let mut pages = PageList::new();
        let mut free_list = FreeList::new();

        unsafe {
            pages.register(page, class, &mut free_list);
        }

        (page, pages, free_list)
    }

    #[test]
    fn carving_reserves_one_slot_for_the_header() {
        let class = SizeClass::of(32).unwrap();
        let (_, pages, mut free_list) = carved_page(class);

        assert_eq!(1, pages.len());

        let mut blocks = 0;
        while free_list.pop().is_some() {
            blocks += 1;
        }

        assert_eq!(page_size() / 32 - 1, blocks);
    }

    #[test]
    fn first_block_handed_out_sits_right_after_the_header() {
        let class = SizeClass::of(64).unwrap();
        let (page, _, mut free_list) = carved_page(class);

        let first = free_list.pop().unwrap();

        assert_eq!(unsafe { page.as_ptr().add(64) }, first.as_ptr());
    }

    #[test]
    fn pointers_into_the_page_resolve_to_its_header() {
        let class = SizeClass::of(128).unwrap();
        let (page, pages, _) = carved_page(class);

        // Block starts and interior positions both resolve.
        for offset in [128, 200, 256, page_size() - 1] {
            let ptr = unsafe { page.as_ptr().add(offset) };
            let header = pages.resolve(ptr).unwrap();

            assert_eq!(128, header.block_size());
            assert_eq!(page.as_ptr() as usize, header.base());
        }
    }

    #[test]
    fn unknown_pointers_do_not_resolve() {
        let class = SizeClass::of(16).unwrap();
        let (_, pages, _) = carved_page(class);

        let local = 0u64;

        assert!(pages.resolve(&local as *const u64 as *const u8).is_none());
        assert!(pages.resolve(std::ptr::null()).is_none());
    }

    #[test]
    fn registry_tracks_every_carved_page() {
        let class = SizeClass::of(256).unwrap();
        let (first, mut pages, mut free_list) = carved_page(class);

        let second = unsafe { kernel::request_memory(page_size()) }.unwrap();
        unsafe {
            pages.register(second, class, &mut free_list);
        }

        assert_eq!(2, pages.len());
        assert!(pages.resolve(first.as_ptr()).is_some());
        assert!(pages.resolve(second.as_ptr()).is_some());
    }
}
