/*!
 * Memory Traits
 * Allocator capability contract shared by every strategy
 */

use super::types::{check_alignment, AllocatorStats, MemoryError, MemoryResult};
use std::ptr::{self, NonNull};

/// Allocator interface consumed by `NumericBuffer` and by any container that
/// wants arena, pool or stack behaviour instead of the global heap.
///
/// Strategies are single-owner: every method takes `&mut self` and no
/// implementation is `Sync`.
pub trait Allocator<T> {
    /// Allocate uninitialized storage for `count` elements
    ///
    /// The returned pointer is aligned to [`Allocator::alignment`] and stays
    /// valid until it is deallocated or the allocator is reset or dropped.
    fn allocate(&mut self, count: usize) -> MemoryResult<NonNull<T>>;

    /// Return storage obtained from [`Allocator::allocate`]
    ///
    /// Never fails. Bump strategies may ignore the call.
    ///
    /// # Safety
    /// `ptr` must come from `allocate(count)` on this same allocator, with the
    /// same `count`, and must not be used afterwards.
    unsafe fn deallocate(&mut self, ptr: NonNull<T>, count: usize);

    /// Allocate storage for `count` elements aligned to at least `alignment`
    ///
    /// Bump, stack and heap strategies raise the alignment of this one request.
    /// The default rejects storage below `alignment` with `AlignmentViolation`,
    /// which is what the pools do: their slot geometry is fixed at construction.
    fn allocate_aligned(&mut self, count: usize, alignment: usize) -> MemoryResult<NonNull<T>> {
        check_alignment(alignment)?;
        let ptr = self.allocate(count)?;
        let address = ptr.as_ptr() as usize;
        if address % alignment != 0 {
            // Safety: `ptr` was just allocated with `count`
            unsafe { self.deallocate(ptr, count) };
            return Err(MemoryError::AlignmentViolation { address, alignment });
        }
        Ok(ptr)
    }

    /// Return storage obtained from [`Allocator::allocate_aligned`]
    ///
    /// # Safety
    /// `ptr` must come from `allocate_aligned(count, alignment)` on this same
    /// allocator, with the same arguments, and must not be used afterwards.
    unsafe fn deallocate_aligned(&mut self, ptr: NonNull<T>, count: usize, alignment: usize) {
        let _ = alignment;
        self.deallocate(ptr, count);
    }

    /// Alignment guaranteed for every returned pointer
    fn alignment(&self) -> usize;

    /// Allocation counters
    fn stats(&self) -> AllocatorStats;

    /// Create an empty allocator with the same configuration
    fn fresh(&self) -> MemoryResult<Self>
    where
        Self: Sized;

    /// Move `value` into uninitialized storage
    ///
    /// # Safety
    /// `ptr` must be valid for writes and point to storage owned by this allocator.
    #[inline]
    unsafe fn construct(&mut self, ptr: NonNull<T>, value: T) {
        ptr.as_ptr().write(value);
    }

    /// Drop the value at `ptr` in place, leaving the storage allocated
    ///
    /// # Safety
    /// `ptr` must point to an initialized value that is not used afterwards.
    #[inline]
    unsafe fn destroy(&mut self, ptr: NonNull<T>) {
        ptr::drop_in_place(ptr.as_ptr());
    }
}

/// Strategies that release every allocation at once
pub trait Resettable {
    /// Invalidate every outstanding pointer and rewind to the empty state
    fn reset(&mut self);
}
