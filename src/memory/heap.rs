/*!
 * Heap Allocator
 * Aligned global-heap strategy, the default backing of numeric buffers
 */

use super::traits::Allocator;
use super::types::{bytes_for, check_alignment, AllocatorStats, MemoryError, MemoryResult};
use crate::core::limits::BUFFER_ALIGNMENT;
use std::alloc::{alloc, dealloc, Layout};
use std::marker::PhantomData;
use std::mem;
use std::ptr::NonNull;

/// Global heap with a configurable minimum alignment
///
/// Every allocation is an individual `std::alloc` call, so deallocation order
/// is unconstrained and storage is returned immediately.
#[derive(Debug)]
pub struct HeapAllocator<T> {
    alignment: usize,
    stats: AllocatorStats,
    _marker: PhantomData<fn() -> T>,
}

impl<T> HeapAllocator<T> {
    /// Heap allocator aligned for every SIMD backend (64 bytes)
    pub fn new() -> Self {
        Self {
            alignment: BUFFER_ALIGNMENT.max(mem::align_of::<T>()),
            stats: AllocatorStats::default(),
            _marker: PhantomData,
        }
    }

    /// Heap allocator with a custom minimum alignment (power of two)
    pub fn with_alignment(alignment: usize) -> MemoryResult<Self> {
        let alignment = check_alignment(alignment)?.max(mem::align_of::<T>());
        Ok(Self {
            alignment,
            stats: AllocatorStats::default(),
            _marker: PhantomData,
        })
    }

    fn layout(&self, count: usize, alignment: usize) -> MemoryResult<Layout> {
        let size = bytes_for::<T>(count)?;
        if size == 0 {
            return Err(MemoryError::InvalidCount {
                count,
                reason: "zero-sized request",
            });
        }
        Layout::from_size_align(size, alignment.max(self.alignment)).map_err(|_| {
            MemoryError::CapacityOverflow {
                count,
                element_size: mem::size_of::<T>(),
            }
        })
    }
}

impl<T> Default for HeapAllocator<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for HeapAllocator<T> {
    /// Same alignment, fresh counters
    fn clone(&self) -> Self {
        Self {
            alignment: self.alignment,
            stats: AllocatorStats::default(),
            _marker: PhantomData,
        }
    }
}

impl<T> HeapAllocator<T> {
    fn allocate_layout(&mut self, layout: MemoryResult<Layout>) -> MemoryResult<NonNull<T>> {
        let layout = match layout {
            Ok(layout) => layout,
            Err(e) => {
                self.stats.record_failure();
                return Err(e);
            }
        };

        // Safety: layout has non-zero size
        let ptr = unsafe { alloc(layout) };
        match NonNull::new(ptr) {
            Some(ptr) => {
                self.stats.record_alloc(layout.size());
                self.stats.capacity_bytes = self.stats.bytes_in_use;
                Ok(ptr.cast())
            }
            None => {
                self.stats.record_failure();
                tracing::warn!(
                    size = layout.size(),
                    alignment = layout.align(),
                    "Heap allocation failed"
                );
                Err(MemoryError::SystemOutOfMemory {
                    size: layout.size(),
                    alignment: layout.align(),
                })
            }
        }
    }

    /// # Safety
    /// `ptr` must have been allocated with exactly `layout`.
    unsafe fn deallocate_layout(&mut self, ptr: NonNull<T>, layout: MemoryResult<Layout>) {
        // A layout that failed to build can never have been handed out
        let Ok(layout) = layout else {
            return;
        };
        dealloc(ptr.as_ptr().cast(), layout);
        self.stats.record_dealloc(layout.size());
        self.stats.capacity_bytes = self.stats.bytes_in_use;
    }
}

impl<T> Allocator<T> for HeapAllocator<T> {
    fn allocate(&mut self, count: usize) -> MemoryResult<NonNull<T>> {
        let layout = self.layout(count, self.alignment);
        self.allocate_layout(layout)
    }

    fn allocate_aligned(&mut self, count: usize, alignment: usize) -> MemoryResult<NonNull<T>> {
        let layout = check_alignment(alignment).and_then(|alignment| self.layout(count, alignment));
        self.allocate_layout(layout)
    }

    unsafe fn deallocate(&mut self, ptr: NonNull<T>, count: usize) {
        let layout = self.layout(count, self.alignment);
        self.deallocate_layout(ptr, layout);
    }

    unsafe fn deallocate_aligned(&mut self, ptr: NonNull<T>, count: usize, alignment: usize) {
        let layout = self.layout(count, alignment);
        self.deallocate_layout(ptr, layout);
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
        Ok(self.clone())
    }
}

// Safety: no storage is owned by the allocator itself
unsafe impl<T> Send for HeapAllocator<T> {}
