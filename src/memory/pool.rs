/*!
 * Pool Allocators
 * Single-element free-list strategies: growing block pool and fixed pool
 */

use super::region::RawRegion;
use super::traits::Allocator;
use super::types::{check_alignment, AllocatorStats, MemoryError, MemoryResult};
use crate::core::limits::{align_up, BLOCKS_PER_SLAB, DEFAULT_ALIGNMENT, FIXED_POOL_SLOTS};
use std::marker::PhantomData;
use std::mem;
use std::ptr::NonNull;

type Link = Option<NonNull<u8>>;

/// Slot geometry shared by both pools
///
/// A free slot stores the next-free link in its first bytes, so a slot must
/// fit either a `T` or a link, aligned for both.
#[derive(Debug, Clone, Copy)]
struct SlotLayout {
    alignment: usize,
    stride: usize,
}

impl SlotLayout {
    fn new<T>(alignment: usize) -> MemoryResult<Self> {
        let alignment = check_alignment(alignment)?
            .max(mem::align_of::<T>())
            .max(mem::align_of::<Link>());
        let size = mem::size_of::<T>().max(mem::size_of::<Link>());
        let stride = align_up(size, alignment).ok_or(MemoryError::CapacityOverflow {
            count: 1,
            element_size: size,
        })?;
        Ok(Self { alignment, stride })
    }

    fn region_bytes(&self, slots: usize) -> MemoryResult<usize> {
        slots.checked_mul(self.stride).ok_or(MemoryError::CapacityOverflow {
            count: slots,
            element_size: self.stride,
        })
    }
}

/// Intrusive singly-linked free list threaded through unused slots
#[derive(Debug, Default)]
struct FreeList {
    head: Link,
    len: usize,
}

impl FreeList {
    /// Thread every slot of `region` onto the list, first slot at the head
    ///
    /// # Safety
    /// `region` must hold `slots` slots of `layout.stride` bytes, none in use.
    unsafe fn thread(&mut self, region: &RawRegion, slots: usize, layout: SlotLayout) {
        for i in (0..slots).rev() {
            self.push(region.at(i * layout.stride));
        }
    }

    /// # Safety
    /// `slot` must be an unused, link-aligned slot owned by the pool.
    #[inline]
    unsafe fn push(&mut self, slot: NonNull<u8>) {
        slot.cast::<Link>().as_ptr().write(self.head);
        self.head = Some(slot);
        self.len += 1;
    }

    #[inline]
    fn pop(&mut self) -> Option<NonNull<u8>> {
        let slot = self.head?;
        // Safety: every slot on the list holds a link written by `push`
        self.head = unsafe { slot.cast::<Link>().as_ptr().read() };
        self.len -= 1;
        Some(slot)
    }
}

fn single_unit(count: usize) -> MemoryResult<()> {
    if count == 1 {
        Ok(())
    } else {
        Err(MemoryError::InvalidCount {
            count,
            reason: "pool allocators serve exactly one element per call",
        })
    }
}

// =============================================================================
// BLOCK POOL
// =============================================================================

/// Slab allocator handing out one element per call
///
/// Storage grows one slab of 64 blocks at a time when the free list is empty.
/// Slabs are kept until the pool is dropped.
#[derive(Debug)]
pub struct BlockPool<T> {
    slabs: Vec<RawRegion>,
    free: FreeList,
    layout: SlotLayout,
    blocks_per_slab: usize,
    stats: AllocatorStats,
    _marker: PhantomData<fn() -> T>,
}

impl<T> BlockPool<T> {
    /// Pool with the default alignment and one pre-allocated slab
    pub fn new() -> MemoryResult<Self> {
        Self::with_config(BLOCKS_PER_SLAB, DEFAULT_ALIGNMENT)
    }

    pub fn with_config(blocks_per_slab: usize, alignment: usize) -> MemoryResult<Self> {
        if blocks_per_slab == 0 {
            return Err(MemoryError::InvalidCount {
                count: 0,
                reason: "a slab needs at least one block",
            });
        }
        let mut pool = Self {
            slabs: Vec::new(),
            free: FreeList::default(),
            layout: SlotLayout::new::<T>(alignment)?,
            blocks_per_slab,
            stats: AllocatorStats::default(),
            _marker: PhantomData,
        };
        pool.grow()?;
        Ok(pool)
    }

    fn grow(&mut self) -> MemoryResult<()> {
        let bytes = self.layout.region_bytes(self.blocks_per_slab)?;
        let slab = RawRegion::new(bytes, self.layout.alignment)?;
        // Safety: the slab is fresh and sized for blocks_per_slab slots
        unsafe { self.free.thread(&slab, self.blocks_per_slab, self.layout) };
        self.slabs.push(slab);
        self.stats.capacity_bytes += bytes;
        tracing::debug!(
            slabs = self.slabs.len(),
            block_bytes = self.layout.stride,
            "Block pool grew by one slab"
        );
        Ok(())
    }

    #[inline]
    pub fn slab_count(&self) -> usize {
        self.slabs.len()
    }

    /// Blocks currently on the free list
    #[inline]
    pub fn free_blocks(&self) -> usize {
        self.free.len
    }

    fn owns(&self, ptr: *const u8) -> bool {
        self.slabs.iter().any(|slab| slab.offset_of(ptr).is_some())
    }
}

impl<T> Allocator<T> for BlockPool<T> {
    fn allocate(&mut self, count: usize) -> MemoryResult<NonNull<T>> {
        if let Err(e) = single_unit(count) {
            self.stats.record_failure();
            return Err(e);
        }
        if self.free.head.is_none() {
            if let Err(e) = self.grow() {
                self.stats.record_failure();
                return Err(e);
            }
        }
        match self.free.pop() {
            Some(slot) => {
                self.stats.record_alloc(self.layout.stride);
                Ok(slot.cast())
            }
            None => {
                self.stats.record_failure();
                Err(MemoryError::AllocationExhausted {
                    requested: self.layout.stride,
                    available: 0,
                    capacity: self.stats.capacity_bytes,
                })
            }
        }
    }

    unsafe fn deallocate(&mut self, ptr: NonNull<T>, count: usize) {
        if count != 1 {
            return;
        }
        debug_assert!(self.owns(ptr.as_ptr().cast()), "block not owned by this pool");
        self.free.push(ptr.cast());
        self.stats.record_dealloc(self.layout.stride);
    }

    #[inline]
    fn alignment(&self) -> usize {
        self.layout.alignment
    }

    #[inline]
    fn stats(&self) -> AllocatorStats {
        self.stats
    }

    fn fresh(&self) -> MemoryResult<Self> {
        Self::with_config(self.blocks_per_slab, self.layout.alignment)
    }
}

// =============================================================================
// FIXED POOL
// =============================================================================

/// Pre-sized slot pool handing out one element per call, never grows
#[derive(Debug)]
pub struct FixedPool<T> {
    region: RawRegion,
    free: FreeList,
    layout: SlotLayout,
    slots: usize,
    stats: AllocatorStats,
    _marker: PhantomData<fn() -> T>,
}

impl<T> FixedPool<T> {
    /// Pool of 1024 slots with the default alignment
    pub fn new() -> MemoryResult<Self> {
        Self::with_config(FIXED_POOL_SLOTS, DEFAULT_ALIGNMENT)
    }

    pub fn with_config(slots: usize, alignment: usize) -> MemoryResult<Self> {
        let layout = SlotLayout::new::<T>(alignment)?;
        let bytes = layout.region_bytes(slots)?;
        let region = RawRegion::new(bytes, layout.alignment)?;
        let mut free = FreeList::default();
        // Safety: the region is fresh and sized for `slots` slots
        unsafe { free.thread(&region, slots, layout) };
        Ok(Self {
            region,
            free,
            layout,
            slots,
            stats: AllocatorStats {
                capacity_bytes: bytes,
                ..Default::default()
            },
            _marker: PhantomData,
        })
    }

    /// Total slot count
    #[inline]
    pub fn slots(&self) -> usize {
        self.slots
    }

    /// Slots currently free
    #[inline]
    pub fn available(&self) -> usize {
        self.free.len
    }
}

impl<T> Allocator<T> for FixedPool<T> {
    fn allocate(&mut self, count: usize) -> MemoryResult<NonNull<T>> {
        if let Err(e) = single_unit(count) {
            self.stats.record_failure();
            return Err(e);
        }
        match self.free.pop() {
            Some(slot) => {
                self.stats.record_alloc(self.layout.stride);
                Ok(slot.cast())
            }
            None => {
                self.stats.record_failure();
                tracing::warn!(slots = self.slots, "Fixed pool exhausted");
                Err(MemoryError::AllocationExhausted {
                    requested: self.layout.stride,
                    available: 0,
                    capacity: self.region.size(),
                })
            }
        }
    }

    unsafe fn deallocate(&mut self, ptr: NonNull<T>, count: usize) {
        if count != 1 {
            return;
        }
        debug_assert!(
            self.region.offset_of(ptr.as_ptr().cast()).is_some(),
            "slot not owned by this pool"
        );
        self.free.push(ptr.cast());
        self.stats.record_dealloc(self.layout.stride);
    }

    #[inline]
    fn alignment(&self) -> usize {
        self.layout.alignment
    }

    #[inline]
    fn stats(&self) -> AllocatorStats {
        self.stats
    }

    fn fresh(&self) -> MemoryResult<Self> {
        Self::with_config(self.slots, self.layout.alignment)
    }
}

// Safety: both pools exclusively own their slabs; links only point into them
unsafe impl<T> Send for BlockPool<T> {}
unsafe impl<T> Send for FixedPool<T> {}
