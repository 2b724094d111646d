/*!
 * Stack Allocator
 * Fixed-capacity LIFO bump allocator with marker/rewind
 */

use super::region::RawRegion;
use super::traits::{Allocator, Resettable};
use super::types::{bytes_for, check_alignment, AllocatorStats, MemoryError, MemoryResult};
use crate::core::limits::{align_up, DEFAULT_ALIGNMENT, STACK_DEFAULT_ELEMENTS};
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;
use std::mem;
use std::ptr::NonNull;

/// Snapshot of the stack top, restored by [`StackAllocator::rewind`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StackMarker(usize);

impl StackMarker {
    /// Byte offset of the top when the marker was taken
    #[inline]
    pub fn offset(self) -> usize {
        self.0
    }
}

/// Stack-discipline allocator
///
/// Requests are rounded up to the alignment and carved from a monotonic top.
/// Deallocating the most recent block pops it; any other deallocation is
/// ignored until a rewind or reset.
#[derive(Debug)]
pub struct StackAllocator<T> {
    region: RawRegion,
    top: usize,
    alignment: usize,
    stats: AllocatorStats,
    _marker: PhantomData<fn() -> T>,
}

impl<T> StackAllocator<T> {
    /// Stack of 1024 elements with the default 32-byte alignment
    pub fn new() -> MemoryResult<Self> {
        Self::with_capacity(STACK_DEFAULT_ELEMENTS)
    }

    pub fn with_capacity(elements: usize) -> MemoryResult<Self> {
        Self::with_config(elements, DEFAULT_ALIGNMENT)
    }

    pub fn with_config(elements: usize, alignment: usize) -> MemoryResult<Self> {
        let alignment = check_alignment(alignment)?.max(mem::align_of::<T>());
        let capacity = bytes_for::<T>(elements)?;
        let region = RawRegion::new(capacity, alignment)?;
        Ok(Self {
            region,
            top: 0,
            alignment,
            stats: AllocatorStats {
                capacity_bytes: capacity,
                ..Default::default()
            },
            _marker: PhantomData,
        })
    }

    /// Capture the current top
    #[inline]
    pub fn marker(&self) -> StackMarker {
        StackMarker(self.top)
    }

    /// Release everything allocated since `marker` was taken
    ///
    /// Markers above the current top (taken before an earlier rewind or
    /// reset) are ignored.
    pub fn rewind(&mut self, marker: StackMarker) {
        if marker.0 > self.top {
            tracing::debug!(marker = marker.0, top = self.top, "Ignoring stale stack marker");
            return;
        }
        self.stats.bytes_in_use = marker.0;
        self.top = marker.0;
    }

    #[inline]
    pub fn used(&self) -> usize {
        self.top
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.region.size()
    }

    /// Carve a block at the first address above the top aligned to `alignment`
    ///
    /// The gap below a raised-alignment block is not returned by popping the
    /// block; it is released by `rewind` or `reset`.
    fn push(&mut self, count: usize, alignment: usize) -> MemoryResult<NonNull<T>> {
        let padded = match self.padded(count) {
            Ok(padded) => padded,
            Err(e) => {
                self.stats.record_failure();
                return Err(e);
            }
        };

        let available = self.capacity() - self.top;
        let start = self
            .region
            .aligned_offset(self.top, alignment)
            .filter(|&start| start <= self.capacity() && padded <= self.capacity() - start);
        let Some(start) = start else {
            self.stats.record_failure();
            tracing::warn!(
                requested = padded,
                available,
                capacity = self.capacity(),
                "Stack allocator exhausted"
            );
            return Err(MemoryError::AllocationExhausted {
                requested: padded,
                available,
                capacity: self.capacity(),
            });
        };

        // Safety: start + padded <= capacity
        let ptr = unsafe { self.region.at(start) };
        self.stats.record_alloc(start + padded - self.top);
        self.top = start + padded;
        Ok(ptr.cast())
    }

    fn padded(&self, count: usize) -> MemoryResult<usize> {
        let bytes = bytes_for::<T>(count)?;
        if bytes == 0 {
            return Err(MemoryError::InvalidCount {
                count,
                reason: "zero-sized request",
            });
        }
        align_up(bytes, self.alignment).ok_or(MemoryError::CapacityOverflow {
            count,
            element_size: mem::size_of::<T>(),
        })
    }
}

impl<T> Allocator<T> for StackAllocator<T> {
    fn allocate(&mut self, count: usize) -> MemoryResult<NonNull<T>> {
        self.push(count, self.alignment)
    }

    fn allocate_aligned(&mut self, count: usize, alignment: usize) -> MemoryResult<NonNull<T>> {
        let alignment = check_alignment(alignment)?.max(self.alignment);
        self.push(count, alignment)
    }

    unsafe fn deallocate(&mut self, ptr: NonNull<T>, count: usize) {
        let Ok(padded) = self.padded(count) else {
            return;
        };
        let Some(offset) = self.region.offset_of(ptr.as_ptr().cast()) else {
            return;
        };
        if offset + padded == self.top {
            self.top = offset;
            self.stats.record_dealloc(padded);
        }
    }

    #[inline]
    fn alignment(&self) -> usize {
        self.alignment
    }

    #[inline]
    fn stats(&self) -> AllocatorStats {
        self.stats
    }

    fn fresh(&self) -> MemoryResult<Self> {
        Self::with_config(self.capacity() / mem::size_of::<T>().max(1), self.alignment)
    }
}

impl<T> Resettable for StackAllocator<T> {
    fn reset(&mut self) {
        self.top = 0;
        self.stats.record_reset();
    }
}

// Safety: the stack exclusively owns its region
unsafe impl<T> Send for StackAllocator<T> {}
