/*!
 * Memory Module
 * Allocator contract and allocation strategies
 */

mod region;

pub mod bounded;
pub mod heap;
pub mod pool;
pub mod stack;
pub mod traits;
pub mod types;
pub mod unbounded;

// Re-export for convenience
pub use bounded::BoundedArena;
pub use heap::HeapAllocator;
pub use pool::{BlockPool, FixedPool};
pub use stack::{StackAllocator, StackMarker};
pub use traits::*;
pub use types::*;
pub use unbounded::UnboundedArena;
