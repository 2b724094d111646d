/*!
 * Limits and Constants
 *
 * Centralized location for alignments, register sizes, growth factors and
 * default capacities used by the allocators, buffers and SIMD backends.
 *
 * ## Conventions
 * - Values are grouped by domain (registers, allocators, buffers)
 * - Performance-critical constants are marked with [PERF]
 * - Constants that fix the arena growth curve are marked with [COMPAT]
 */

// =============================================================================
// SIMD REGISTERS
// =============================================================================

/// Narrow tier register width (AVX2)
pub const NARROW_REGISTER_BITS: usize = 256;

/// Wide tier register width (AVX-512)
pub const WIDE_REGISTER_BITS: usize = 512;

/// Narrow tier register size in bytes
pub const NARROW_REGISTER_BYTES: usize = NARROW_REGISTER_BITS / 8;

/// Wide tier register size in bytes
pub const WIDE_REGISTER_BYTES: usize = WIDE_REGISTER_BITS / 8;

/// Widest scalar element handled by the scalar backend (f64/i64/u64)
pub const SCALAR_REGISTER_BYTES: usize = 8;

// =============================================================================
// ALLOCATORS
// =============================================================================

/// Default alignment for every allocator strategy (32 bytes)
/// [PERF] Matches a narrow-tier register so aligned loads never fault
pub const DEFAULT_ALIGNMENT: usize = NARROW_REGISTER_BYTES;

/// Default alignment of the unbounded arena (one cache line)
pub const ARENA_ALIGNMENT: usize = 64;

/// Chunk sizes of the unbounded arena are rounded up to this stripe (4KB)
/// [PERF] Aligned with common page size
pub const ARENA_STRIPE: usize = 4096;

/// Initial unbounded arena chunk, in elements
pub const ARENA_INITIAL_ELEMENTS: usize = 256;

/// Growth factor applied to the total arena capacity when a chunk is exhausted
/// [COMPAT] Changing this changes every arena growth curve
pub const GOLDEN_RATIO: f64 = 1.618_033_988_749_895;

/// Blocks carved out of every slab by the block pool
pub const BLOCKS_PER_SLAB: usize = 64;

/// Slot count of the fixed pool
pub const FIXED_POOL_SLOTS: usize = 1024;

/// Stack allocator capacity, in elements
pub const STACK_DEFAULT_ELEMENTS: usize = 1024;

// =============================================================================
// NUMERIC BUFFERS
// =============================================================================

/// Alignment of the default heap allocator behind a numeric buffer (64 bytes)
/// Satisfies aligned loads on every backend, wide tier included
pub const BUFFER_ALIGNMENT: usize = WIDE_REGISTER_BYTES;

/// First capacity handed out by `push` on an empty buffer
/// [PERF] Large enough to fill at least one wide register for 32-bit lanes
pub const BUFFER_INITIAL_CAPACITY: usize = 16;

/// `resize` rounds new capacities up to a multiple of this many elements
pub const BUFFER_RESIZE_GRANULE: usize = 16;

/// Round `value` up to the next multiple of `alignment` (a power of two)
///
/// Returns `None` on overflow.
#[inline]
pub const fn align_up(value: usize, alignment: usize) -> Option<usize> {
    match value.checked_add(alignment - 1) {
        Some(v) => Some(v & !(alignment - 1)),
        None => None,
    }
}
