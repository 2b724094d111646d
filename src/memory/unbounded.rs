/*!
 * Unbounded Arena
 * Chunked bump allocator that grows geometrically
 */

use super::region::RawRegion;
use super::traits::{Allocator, Resettable};
use super::types::{bytes_for, check_alignment, AllocatorStats, MemoryError, MemoryResult};
use crate::core::limits::{align_up, ARENA_ALIGNMENT, ARENA_INITIAL_ELEMENTS, ARENA_STRIPE, GOLDEN_RATIO};
use std::marker::PhantomData;
use std::mem;
use std::ptr::NonNull;

#[derive(Debug)]
struct Chunk {
    region: RawRegion,
    offset: usize,
}

/// Bump allocator over a growing chain of chunks
///
/// When the current chunk cannot fit a request, a new chunk of
/// `align_up(max(padded, floor(total * φ)), stripe)` bytes is appended, so
/// allocation never reports exhaustion. Individual deallocation is a no-op.
#[derive(Debug)]
pub struct UnboundedArena<T> {
    chunks: Vec<Chunk>,
    alignment: usize,
    stripe: usize,
    total_capacity: usize,
    stats: AllocatorStats,
    _marker: PhantomData<fn() -> T>,
}

impl<T> UnboundedArena<T> {
    /// Arena with 64-byte alignment, 4KB stripe and a 256-element first chunk
    pub fn new() -> MemoryResult<Self> {
        Self::with_config(ARENA_INITIAL_ELEMENTS, ARENA_ALIGNMENT, ARENA_STRIPE)
    }

    /// Arena with explicit initial size (elements), alignment and stripe
    ///
    /// Both `alignment` and `stripe` must be powers of two.
    pub fn with_config(initial_elements: usize, alignment: usize, stripe: usize) -> MemoryResult<Self> {
        let alignment = check_alignment(alignment)?.max(mem::align_of::<T>());
        let stripe = check_alignment(stripe)?;
        let initial = Self::chunk_size(bytes_for::<T>(initial_elements)?, stripe)?;

        let mut arena = Self {
            chunks: Vec::new(),
            alignment,
            stripe,
            total_capacity: 0,
            stats: AllocatorStats::default(),
            _marker: PhantomData,
        };
        arena.push_chunk(initial)?;
        Ok(arena)
    }

    /// Round a byte count up to the stripe, never below one stripe
    fn chunk_size(bytes: usize, stripe: usize) -> MemoryResult<usize> {
        align_up(bytes.max(1), stripe).ok_or(MemoryError::CapacityOverflow {
            count: bytes,
            element_size: 1,
        })
    }

    fn push_chunk(&mut self, size: usize) -> MemoryResult<()> {
        let region = RawRegion::new(size, self.alignment)?;
        self.total_capacity += size;
        self.stats.capacity_bytes = self.total_capacity;
        self.chunks.push(Chunk { region, offset: 0 });
        Ok(())
    }

    /// Size of the chunk appended when `padded` bytes do not fit
    fn growth_size(&self, padded: usize) -> MemoryResult<usize> {
        // f64 -> usize casts saturate
        let scaled = (self.total_capacity as f64 * GOLDEN_RATIO) as usize;
        Self::chunk_size(padded.max(scaled), self.stripe)
    }

    /// Number of chunks in the chain
    #[inline]
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Sum of every chunk size in bytes
    #[inline]
    pub fn total_capacity(&self) -> usize {
        self.total_capacity
    }

    /// Bytes used in the current chunk
    #[inline]
    pub fn current_offset(&self) -> usize {
        self.chunks.last().map_or(0, |c| c.offset)
    }

    fn try_allocate(&mut self, count: usize, alignment: usize) -> MemoryResult<NonNull<T>> {
        let bytes = bytes_for::<T>(count)?;
        if bytes == 0 {
            return Err(MemoryError::InvalidCount {
                count,
                reason: "zero-sized request",
            });
        }
        let overflow = MemoryError::CapacityOverflow {
            count,
            element_size: mem::size_of::<T>(),
        };
        let padded = align_up(bytes, self.alignment).ok_or(overflow.clone())?;

        let fits = self.chunks.last().and_then(|chunk| {
            let start = chunk.region.aligned_offset(chunk.offset, alignment)?;
            let end = start.checked_add(padded)?;
            (end <= chunk.region.size()).then_some(start)
        });

        let start = match fits {
            Some(start) => start,
            None => {
                // Chunks start on the arena alignment; a wider request may need a gap
                let slack = alignment - self.alignment;
                let size = self.growth_size(padded.checked_add(slack).ok_or(overflow.clone())?)?;
                tracing::debug!(
                    chunk_bytes = size,
                    total_bytes = self.total_capacity + size,
                    chunks = self.chunks.len() + 1,
                    "Unbounded arena growing"
                );
                self.push_chunk(size)?;
                self.chunks
                    .last()
                    .and_then(|chunk| chunk.region.aligned_offset(0, alignment))
                    .ok_or(overflow.clone())?
            }
        };

        let chunk = self.chunks.last_mut().ok_or(overflow)?;
        // Safety: start + padded <= chunk size
        let ptr = unsafe { chunk.region.at(start) };
        chunk.offset = start + padded;
        self.stats.record_alloc(padded);
        Ok(ptr.cast())
    }
}

impl<T> Allocator<T> for UnboundedArena<T> {
    fn allocate(&mut self, count: usize) -> MemoryResult<NonNull<T>> {
        self.try_allocate(count, self.alignment)
            .inspect_err(|_| self.stats.record_failure())
    }

    fn allocate_aligned(&mut self, count: usize, alignment: usize) -> MemoryResult<NonNull<T>> {
        let alignment = check_alignment(alignment)?.max(self.alignment);
        self.try_allocate(count, alignment)
            .inspect_err(|_| self.stats.record_failure())
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
        let first = self.chunks.first().map_or(self.stripe, |c| c.region.size());
        let mut arena = Self {
            chunks: Vec::new(),
            alignment: self.alignment,
            stripe: self.stripe,
            total_capacity: 0,
            stats: AllocatorStats::default(),
            _marker: PhantomData,
        };
        arena.push_chunk(first)?;
        Ok(arena)
    }
}

impl<T> Resettable for UnboundedArena<T> {
    /// Free every chunk but the first and rewind it
    fn reset(&mut self) {
        self.chunks.truncate(1);
        if let Some(head) = self.chunks.first_mut() {
            head.offset = 0;
            self.total_capacity = head.region.size();
        }
        self.stats.capacity_bytes = self.total_capacity;
        self.stats.record_reset();
    }
}
