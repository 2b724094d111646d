/*!
 * Raw Region
 * Owned, aligned block of bytes released on drop
 */

use super::types::{MemoryError, MemoryResult};
use crate::core::limits::align_up;
use std::alloc::{alloc, dealloc, Layout};
use std::ptr::NonNull;

/// Exclusively owned, aligned byte storage
///
/// # Invariants
///
/// - `base` was returned by the global allocator for `layout`
/// - `layout.size() > 0`
#[derive(Debug)]
pub(crate) struct RawRegion {
    base: NonNull<u8>,
    layout: Layout,
}

impl RawRegion {
    /// Allocate `size` bytes aligned to `alignment` (a power of two)
    pub(crate) fn new(size: usize, alignment: usize) -> MemoryResult<Self> {
        if size == 0 {
            return Err(MemoryError::InvalidCount {
                count: 0,
                reason: "zero-sized request",
            });
        }
        let layout = Layout::from_size_align(size, alignment).map_err(|_| {
            MemoryError::CapacityOverflow {
                count: size,
                element_size: 1,
            }
        })?;

        // Safety: layout is valid and non-zero
        let base = unsafe { alloc(layout) };
        let base = NonNull::new(base).ok_or(MemoryError::SystemOutOfMemory { size, alignment })?;

        Ok(Self { base, layout })
    }

    #[inline]
    pub(crate) fn base(&self) -> NonNull<u8> {
        self.base
    }

    #[inline]
    pub(crate) fn size(&self) -> usize {
        self.layout.size()
    }

    /// Pointer `offset` bytes into the region
    ///
    /// # Safety
    /// `offset` must be `<= self.size()`.
    #[inline]
    pub(crate) unsafe fn at(&self, offset: usize) -> NonNull<u8> {
        NonNull::new_unchecked(self.base.as_ptr().add(offset))
    }

    /// Smallest offset `>= offset` whose address is a multiple of `alignment`
    ///
    /// Equals `align_up(offset, alignment)` whenever `alignment` does not
    /// exceed the region's own alignment.
    #[inline]
    pub(crate) fn aligned_offset(&self, offset: usize, alignment: usize) -> Option<usize> {
        let base = self.base().as_ptr() as usize;
        let address = align_up(base.checked_add(offset)?, alignment)?;
        Some(address - base)
    }

    /// Byte offset of `ptr` inside the region, if it lies inside
    #[inline]
    pub(crate) fn offset_of(&self, ptr: *const u8) -> Option<usize> {
        let start = self.base.as_ptr() as usize;
        let addr = ptr as usize;
        (addr >= start && addr < start + self.size()).then(|| addr - start)
    }
}

impl Drop for RawRegion {
    fn drop(&mut self) {
        // Safety: base/layout pair came from `alloc` in `new`
        unsafe { dealloc(self.base.as_ptr(), self.layout) };
    }
}

// Safety: the region is plain owned bytes with no thread affinity
unsafe impl Send for RawRegion {}
