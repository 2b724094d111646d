/*!
 * Numeric Buffer
 * Growable, register-aligned vector of numeric elements over a pluggable allocator
 */

use crate::core::limits::{BUFFER_INITIAL_CAPACITY, BUFFER_RESIZE_GRANULE};
use crate::memory::{Allocator, HeapAllocator, MemoryError};
use crate::simd::{active_backend, wide_lanes, Element};
use miette::Diagnostic;
use std::fmt;
use std::ops::{Deref, DerefMut, Range};
use std::ptr::{self, NonNull};
use std::slice;
use thiserror::Error;

/// Buffer operation result
pub type BufferResult<T> = Result<T, BufferError>;

/// Buffer errors
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum BufferError {
    #[error("Index {index} out of range for buffer of length {len}")]
    #[diagnostic(
        code(buffer::index_out_of_range),
        help("Use an index below len(), or the unchecked accessors when the bound is already known.")
    )]
    IndexOutOfRange { index: usize, len: usize },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Memory(#[from] MemoryError),
}

/// Contiguous numeric storage aligned for the active SIMD backend
///
/// # Invariants
///
/// - `len <= cap`
/// - when `cap > 0`, `ptr` came from `alloc.allocate_aligned(cap, a)` with
///   `a = max(32, register bytes of the active backend)`
/// - when `cap == 0`, `ptr` is dangling and nothing is owned
///
/// Dereferences to `[T]`, so slice indexing, iteration and the batch
/// operations apply directly.
pub struct NumericBuffer<T: Element, A: Allocator<T> = HeapAllocator<T>> {
    ptr: NonNull<T>,
    len: usize,
    cap: usize,
    alloc: A,
}

impl<T: Element> NumericBuffer<T> {
    /// Empty buffer on the default 64-byte-aligned heap
    pub fn new() -> Self {
        Self::new_in(HeapAllocator::new())
    }

    /// Copy `values` into a new heap-backed buffer
    pub fn from_slice(values: &[T]) -> BufferResult<Self> {
        let mut buffer = Self::new();
        buffer.extend_from_slice(values)?;
        Ok(buffer)
    }

    /// Buffer of `len` zeroes
    pub fn with_len(len: usize) -> BufferResult<Self> {
        let mut buffer = Self::new();
        buffer.resize(len, T::ZERO)?;
        Ok(buffer)
    }

    /// Empty buffer with room for `capacity` elements
    pub fn with_capacity(capacity: usize) -> BufferResult<Self> {
        let mut buffer = Self::new();
        buffer.reserve(capacity)?;
        Ok(buffer)
    }
}

impl<T: Element, A: Allocator<T>> NumericBuffer<T, A> {
    /// Empty buffer over a caller-supplied allocator
    pub fn new_in(alloc: A) -> Self {
        Self {
            ptr: NonNull::dangling(),
            len: 0,
            cap: 0,
            alloc,
        }
    }

    /// Logical element count
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Alias of [`NumericBuffer::len`]
    #[inline]
    pub fn size(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Allocated element count
    #[inline]
    pub fn capacity(&self) -> usize {
        self.cap
    }

    /// Length rounded up to a whole number of wide registers
    #[inline]
    pub fn aligned_len(&self) -> usize {
        let lanes = wide_lanes(T::KIND);
        self.len.div_ceil(lanes) * lanes
    }

    #[inline]
    pub fn allocator(&self) -> &A {
        &self.alloc
    }

    /// Alignment this buffer guarantees for its storage
    #[inline]
    pub fn required_alignment() -> usize {
        active_backend().buffer_alignment()
    }

    /// Ensure capacity for at least `capacity` elements
    ///
    /// Never shrinks. Existing elements are preserved; the data pointer only
    /// changes when the capacity grows.
    pub fn reserve(&mut self, capacity: usize) -> BufferResult<()> {
        if capacity <= self.cap {
            return Ok(());
        }
        self.reallocate(capacity)
    }

    fn reallocate(&mut self, capacity: usize) -> BufferResult<()> {
        let alignment = Self::required_alignment();
        let fresh = self.alloc.allocate_aligned(capacity, alignment)?;

        if self.cap > 0 {
            // Safety: both regions hold at least `len` elements and do not overlap
            unsafe {
                ptr::copy_nonoverlapping(self.ptr.as_ptr(), fresh.as_ptr(), self.len);
                self.alloc.deallocate_aligned(self.ptr, self.cap, alignment);
            }
        }

        tracing::trace!(
            element = T::KIND.name(),
            old_capacity = self.cap,
            new_capacity = capacity,
            "Numeric buffer reallocated"
        );
        self.ptr = fresh;
        self.cap = capacity;
        Ok(())
    }

    /// Grow or shrink to `len` elements, filling new slots with `value`
    ///
    /// Growth rounds the capacity up to a multiple of 16 elements.
    pub fn resize(&mut self, len: usize, value: T) -> BufferResult<()> {
        if len > self.cap {
            let rounded = len
                .checked_next_multiple_of(BUFFER_RESIZE_GRANULE)
                .ok_or(MemoryError::CapacityOverflow {
                    count: len,
                    element_size: T::KIND.size(),
                })?;
            self.reallocate(rounded)?;
        }
        for i in self.len..len {
            // Safety: i < cap
            unsafe { self.alloc.construct(NonNull::new_unchecked(self.ptr.as_ptr().add(i)), value) };
        }
        self.len = len;
        Ok(())
    }

    /// Append one element, doubling the capacity when full
    pub fn push(&mut self, value: T) -> BufferResult<()> {
        if self.len == self.cap {
            let grown = if self.cap == 0 {
                BUFFER_INITIAL_CAPACITY
            } else {
                self.cap.checked_mul(2).ok_or(MemoryError::CapacityOverflow {
                    count: self.cap,
                    element_size: T::KIND.size(),
                })?
            };
            self.reallocate(grown)?;
        }
        // Safety: len < cap after growth
        unsafe {
            self.alloc
                .construct(NonNull::new_unchecked(self.ptr.as_ptr().add(self.len)), value)
        };
        self.len += 1;
        Ok(())
    }

    /// Alias of [`NumericBuffer::push`]
    #[inline]
    pub fn push_back(&mut self, value: T) -> BufferResult<()> {
        self.push(value)
    }

    /// Append every element of `values`
    pub fn extend_from_slice(&mut self, values: &[T]) -> BufferResult<()> {
        let needed = self.len.checked_add(values.len()).ok_or(MemoryError::CapacityOverflow {
            count: values.len(),
            element_size: T::KIND.size(),
        })?;
        self.reserve(needed)?;
        // Safety: capacity covers `needed`; `values` cannot alias owned storage mutably
        unsafe {
            ptr::copy_nonoverlapping(values.as_ptr(), self.ptr.as_ptr().add(self.len), values.len())
        };
        self.len = needed;
        Ok(())
    }

    pub fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        // Safety: index was initialized
        Some(unsafe { self.ptr.as_ptr().add(self.len).read() })
    }

    /// Drop every element, keeping the allocation
    #[inline]
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Bounds-checked element access
    pub fn at(&self, index: usize) -> BufferResult<&T> {
        self.as_slice().get(index).ok_or(BufferError::IndexOutOfRange {
            index,
            len: self.len,
        })
    }

    /// Bounds-checked mutable element access
    pub fn at_mut(&mut self, index: usize) -> BufferResult<&mut T> {
        let len = self.len;
        self.as_mut_slice()
            .get_mut(index)
            .ok_or(BufferError::IndexOutOfRange { index, len })
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        // Safety: ptr is valid (or dangling with len 0) for len initialized elements
        unsafe { slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // Safety: as above, and &mut self guarantees exclusivity
        unsafe { slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }

    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.ptr.as_ptr()
    }

    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.ptr.as_ptr()
    }

    /// Begin/end pointers of the initialized elements
    #[inline]
    pub fn as_ptr_range(&self) -> Range<*const T> {
        self.as_slice().as_ptr_range()
    }

    /// Independent copy with a fresh allocator of the same configuration
    pub fn try_clone(&self) -> BufferResult<Self> {
        let mut copy = Self::new_in(self.alloc.fresh()?);
        copy.extend_from_slice(self.as_slice())?;
        Ok(copy)
    }
}

impl<T: Element, A: Allocator<T>> Drop for NumericBuffer<T, A> {
    fn drop(&mut self) {
        if self.cap > 0 {
            // Safety: ptr/cap pair came from `allocate_aligned` on this allocator
            unsafe {
                self.alloc
                    .deallocate_aligned(self.ptr, self.cap, Self::required_alignment())
            };
        }
    }
}

impl<T: Element, A: Allocator<T>> Deref for NumericBuffer<T, A> {
    type Target = [T];

    #[inline]
    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T: Element, A: Allocator<T>> DerefMut for NumericBuffer<T, A> {
    #[inline]
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T: Element, A: Allocator<T> + Default> Default for NumericBuffer<T, A> {
    fn default() -> Self {
        Self::new_in(A::default())
    }
}

impl<T: Element> Clone for NumericBuffer<T> {
    /// # Panics
    /// When the heap cannot satisfy the copy, as `Vec::clone` does.
    fn clone(&self) -> Self {
        match self.try_clone() {
            Ok(copy) => copy,
            Err(e) => panic!("numeric buffer clone failed: {e}"),
        }
    }
}

impl<T: Element, A: Allocator<T>> fmt::Debug for NumericBuffer<T, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: Element, A: Allocator<T>, B: Allocator<T>> PartialEq<NumericBuffer<T, B>> for NumericBuffer<T, A> {
    fn eq(&self, other: &NumericBuffer<T, B>) -> bool {
        self.as_slice() == other.as_slice()
    }
}

impl<T: Element, A: Allocator<T>> PartialEq<[T]> for NumericBuffer<T, A> {
    fn eq(&self, other: &[T]) -> bool {
        self.as_slice() == other
    }
}

impl<'a, T: Element, A: Allocator<T>> IntoIterator for &'a NumericBuffer<T, A> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

// Safety: the buffer exclusively owns its storage and allocator
unsafe impl<T: Element, A: Allocator<T> + Send> Send for NumericBuffer<T, A> {}
unsafe impl<T: Element, A: Allocator<T> + Sync> Sync for NumericBuffer<T, A> {}
