/*!
 * Spectra STL
 * Width-adaptive SIMD numeric buffers backed by arena, pool and stack allocators
 */

pub mod buffer;
pub mod core;
pub mod memory;
pub mod monitoring;
pub mod simd;

// Re-exports
pub use buffer::{BufferError, BufferResult, NumericBuffer};
pub use crate::core::errors::{SerializableError, SpectraError, SpectraResult};
pub use memory::{
    Allocator, AllocatorStats, BlockPool, BoundedArena, FixedPool, HeapAllocator, MemoryError,
    MemoryResult, Resettable, StackAllocator, StackMarker, UnboundedArena,
};
pub use monitoring::init_tracing;
pub use simd::{init_simd, Backend, Batch, Element, ElementKind, SimdError, SimdResult};
