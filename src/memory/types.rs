/*!
 * Memory Types
 * Common types for the allocator strategies
 */

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Memory operation result
pub type MemoryResult<T> = Result<T, MemoryError>;

/// Memory errors
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum MemoryError {
    #[error("Allocation exhausted: requested {requested} bytes, {available} of {capacity} bytes available")]
    #[diagnostic(
        code(memory::allocation_exhausted),
        help("The allocator has a fixed capacity. Reset it, rewind to a marker, or use an unbounded arena.")
    )]
    AllocationExhausted {
        requested: usize,
        available: usize,
        capacity: usize,
    },

    #[error("Invalid alignment {0}: alignment must be a non-zero power of two")]
    #[diagnostic(
        code(memory::invalid_alignment),
        help("Use 16, 32, 64 or another power of two.")
    )]
    InvalidAlignment(usize),

    #[error("Alignment violation: address 0x{address:x}, required alignment {alignment}")]
    #[diagnostic(
        code(memory::alignment_violation),
        help("The allocator returned storage that is not aligned for the active SIMD register width. Configure a larger alignment.")
    )]
    AlignmentViolation { address: usize, alignment: usize },

    #[error("Capacity overflow: {count} elements of {element_size} bytes does not fit in usize")]
    #[diagnostic(code(memory::capacity_overflow))]
    CapacityOverflow { count: usize, element_size: usize },

    #[error("Invalid element count {count}: {reason}")]
    #[diagnostic(
        code(memory::invalid_count),
        help("Pool allocators hand out exactly one element per call.")
    )]
    InvalidCount { count: usize, reason: &'static str },

    #[error("System allocator returned null for {size} bytes aligned to {alignment}")]
    #[diagnostic(code(memory::system_out_of_memory))]
    SystemOutOfMemory { size: usize, alignment: usize },
}

/// Allocation counters kept by every strategy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocatorStats {
    /// Successful `allocate` calls
    pub allocations: u64,
    /// `deallocate` calls that released storage
    pub deallocations: u64,
    /// `allocate` calls that returned an error
    pub failures: u64,
    /// Bytes currently handed out (including alignment padding)
    pub bytes_in_use: usize,
    /// High-water mark of `bytes_in_use`
    pub peak_bytes: usize,
    /// Bytes of storage owned by the allocator
    pub capacity_bytes: usize,
}

impl AllocatorStats {
    #[inline]
    pub(crate) fn record_alloc(&mut self, bytes: usize) {
        self.allocations += 1;
        self.bytes_in_use += bytes;
        if self.bytes_in_use > self.peak_bytes {
            self.peak_bytes = self.bytes_in_use;
        }
    }

    #[inline]
    pub(crate) fn record_dealloc(&mut self, bytes: usize) {
        self.deallocations += 1;
        self.bytes_in_use = self.bytes_in_use.saturating_sub(bytes);
    }

    #[inline]
    pub(crate) fn record_failure(&mut self) {
        self.failures += 1;
    }

    /// Bulk release (arena/stack `reset`)
    #[inline]
    pub(crate) fn record_reset(&mut self) {
        self.deallocations = self.deallocations.max(self.allocations);
        self.bytes_in_use = 0;
    }

    /// Fraction of owned storage currently handed out
    pub fn utilization(&self) -> f64 {
        if self.capacity_bytes == 0 {
            0.0
        } else {
            self.bytes_in_use as f64 / self.capacity_bytes as f64
        }
    }
}

/// Validate an alignment request
#[inline]
pub(crate) fn check_alignment(alignment: usize) -> MemoryResult<usize> {
    if alignment == 0 || !alignment.is_power_of_two() {
        return Err(MemoryError::InvalidAlignment(alignment));
    }
    Ok(alignment)
}

/// Byte size of `count` elements of `T`
#[inline]
pub(crate) fn bytes_for<T>(count: usize) -> MemoryResult<usize> {
    count
        .checked_mul(std::mem::size_of::<T>())
        .ok_or(MemoryError::CapacityOverflow {
            count,
            element_size: std::mem::size_of::<T>(),
        })
}
