/*!
 * Bounded Arena
 * Fixed-capacity bump allocator released only by reset
 */

use super::region::RawRegion;
use super::traits::{Allocator, Resettable};
use super::types::{bytes_for, check_alignment, AllocatorStats, MemoryError, MemoryResult};
use crate::core::limits::{align_up, DEFAULT_ALIGNMENT};
use std::marker::PhantomData;
use std::mem;
use std::ptr::NonNull;

/// Bump allocator over storage for `N` elements of `T`
///
/// Allocation advances a monotonic offset; individual deallocation is a no-op.
/// The storage is heap-backed so pointers stay valid when the arena moves.
#[derive(Debug)]
pub struct BoundedArena<T, const N: usize> {
    region: RawRegion,
    offset: usize,
    alignment: usize,
    stats: AllocatorStats,
    _marker: PhantomData<fn() -> T>,
}

impl<T, const N: usize> BoundedArena<T, N> {
    /// Arena with the default 32-byte alignment
    pub fn new() -> MemoryResult<Self> {
        Self::with_alignment(DEFAULT_ALIGNMENT)
    }

    /// Arena with a custom alignment (power of two)
    pub fn with_alignment(alignment: usize) -> MemoryResult<Self> {
        let alignment = check_alignment(alignment)?.max(mem::align_of::<T>());
        let capacity = bytes_for::<T>(N)?;
        let region = RawRegion::new(capacity, alignment)?;
        Ok(Self {
            region,
            offset: 0,
            alignment,
            stats: AllocatorStats {
                capacity_bytes: capacity,
                ..Default::default()
            },
            _marker: PhantomData,
        })
    }

    /// Capacity in bytes
    #[inline]
    pub fn capacity(&self) -> usize {
        self.region.size()
    }

    /// Bytes consumed so far, padding included
    #[inline]
    pub fn used(&self) -> usize {
        self.offset
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.capacity() - self.offset
    }

    /// Carve `count` elements starting at the next address aligned to `alignment`
    ///
    /// The request size is padded to the arena alignment; any gap before the
    /// start stays consumed until `reset`.
    fn bump(&mut self, count: usize, alignment: usize) -> MemoryResult<NonNull<T>> {
        let bytes = bytes_for::<T>(count)?;
        if bytes == 0 {
            self.stats.record_failure();
            return Err(MemoryError::InvalidCount {
                count,
                reason: "zero-sized request",
            });
        }

        let start = self.region.aligned_offset(self.offset, alignment);
        let padded = align_up(bytes, self.alignment);
        let end = match (start, padded) {
            (Some(start), Some(padded)) => start.checked_add(padded),
            _ => None,
        };
        let (start, end) = match (start, end) {
            (Some(start), Some(end)) if end <= self.capacity() => (start, end),
            _ => return Err(self.exhausted(bytes)),
        };

        // Safety: start < end <= capacity
        let ptr = unsafe { self.region.at(start) };
        self.stats.record_alloc(end - self.offset);
        self.offset = end;
        Ok(ptr.cast())
    }

    fn exhausted(&mut self, requested: usize) -> MemoryError {
        self.stats.record_failure();
        tracing::warn!(
            requested,
            available = self.remaining(),
            capacity = self.capacity(),
            "Bounded arena exhausted"
        );
        MemoryError::AllocationExhausted {
            requested,
            available: self.remaining(),
            capacity: self.capacity(),
        }
    }
}

impl<T, const N: usize> Allocator<T> for BoundedArena<T, N> {
    fn allocate(&mut self, count: usize) -> MemoryResult<NonNull<T>> {
        self.bump(count, self.alignment)
    }

    fn allocate_aligned(&mut self, count: usize, alignment: usize) -> MemoryResult<NonNull<T>> {
        let alignment = check_alignment(alignment)?.max(self.alignment);
        self.bump(count, alignment)
    }

    #[inline]
    unsafe fn deallocate(&mut self, _ptr: NonNull<T>, _count: usize) {}

    #[inline]
    fn alignment(&self) -> usize {
        self.alignment
    }

    #[inline]
    fn stats(&self) -> AllocatorStats {
        self.stats
    }

    fn fresh(&self) -> MemoryResult<Self> {
        Self::with_alignment(self.alignment)
    }
}

impl<T, const N: usize> Resettable for BoundedArena<T, N> {
    fn reset(&mut self) {
        self.offset = 0;
        self.stats.record_reset();
    }
}
