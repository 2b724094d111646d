/*!
 * Pool Tests
 * Block pool growth, fixed pool exhaustion, slot reuse across owners
 */

use spectra_stl::memory::{Allocator, BlockPool, FixedPool, MemoryError};
use std::collections::HashSet;
use std::ptr::NonNull;

#[derive(Debug, Clone, Copy, PartialEq)]
struct Particle {
    position: [f32; 3],
    mass: f64,
}

#[test]
fn test_block_pool_holds_structs() {
    let mut pool = BlockPool::<Particle>::new().unwrap();
    let mut live = Vec::new();
    for i in 0..200 {
        let slot = pool.allocate(1).unwrap();
        let particle = Particle {
            position: [i as f32, 0.0, -(i as f32)],
            mass: i as f64 * 0.5,
        };
        unsafe { pool.construct(slot, particle) };
        live.push((slot, particle));
    }
    assert_eq!(pool.slab_count(), 4);

    for (slot, particle) in &live {
        assert_eq!(unsafe { *slot.as_ptr() }, *particle);
    }

    let stats = pool.stats();
    assert_eq!(stats.allocations, 200);
    assert!(stats.peak_bytes >= 200 * std::mem::size_of::<Particle>());
}

#[test]
fn test_block_pool_recycles_before_growing() {
    let mut pool = BlockPool::<u64>::with_config(8, 16).unwrap();
    let slots: Vec<NonNull<u64>> = (0..8).map(|_| pool.allocate(1).unwrap()).collect();
    assert_eq!(pool.free_blocks(), 0);

    for &slot in &slots[..4] {
        unsafe { pool.deallocate(slot, 1) };
    }
    assert_eq!(pool.free_blocks(), 4);

    let reused: HashSet<usize> = (0..4)
        .map(|_| pool.allocate(1).unwrap().as_ptr() as usize)
        .collect();
    let released: HashSet<usize> = slots[..4].iter().map(|p| p.as_ptr() as usize).collect();
    assert_eq!(reused, released);
    assert_eq!(pool.slab_count(), 1);

    pool.allocate(1).unwrap();
    assert_eq!(pool.slab_count(), 2);
}

#[test]
fn test_block_pool_rejects_empty_slab() {
    assert!(matches!(
        BlockPool::<u8>::with_config(0, 8),
        Err(MemoryError::InvalidCount { count: 0, .. })
    ));
}

#[test]
fn test_fixed_pool_never_grows() {
    let mut pool = FixedPool::<f32>::with_config(16, 32).unwrap();
    assert_eq!(pool.slots(), 16);

    let slots: Vec<_> = (0..16).map(|_| pool.allocate(1).unwrap()).collect();
    assert!(slots.iter().all(|p| p.as_ptr() as usize % 32 == 0));

    let err = pool.allocate(1).unwrap_err();
    assert!(matches!(
        err,
        MemoryError::AllocationExhausted {
            requested: 32,
            available: 0,
            capacity: 512
        }
    ));
    assert_eq!(pool.stats().failures, 1);

    // Multi-element deallocation is ignored
    unsafe { pool.deallocate(slots[0], 3) };
    assert_eq!(pool.available(), 0);

    unsafe { pool.deallocate(slots[5], 1) };
    assert_eq!(pool.available(), 1);
    assert_eq!(pool.allocate(1).unwrap(), slots[5]);
}

#[test]
fn test_pool_moves_between_threads() {
    let mut pool = FixedPool::<u32>::with_config(4, 8).unwrap();
    let handle = std::thread::spawn(move || {
        let slot = pool.allocate(1).unwrap();
        unsafe { pool.construct(slot, 7) };
        let value = unsafe { *slot.as_ptr() };
        (pool.available(), value)
    });
    assert_eq!(handle.join().unwrap(), (3, 7));
}

#[test]
fn test_fresh_pool_shares_configuration() {
    let mut pool = FixedPool::<u16>::with_config(10, 64).unwrap();
    pool.allocate(1).unwrap();
    let copy = pool.fresh().unwrap();
    assert_eq!(copy.slots(), 10);
    assert_eq!(copy.available(), 10);
    assert_eq!(copy.alignment(), 64);
    assert_eq!(copy.stats().allocations, 0);
}
