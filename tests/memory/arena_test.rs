/*!
 * Arena Tests
 * Bounded and unbounded bump allocation, exhaustion and reset
 */

use pretty_assertions::assert_eq;
use spectra_stl::memory::{Allocator, BoundedArena, MemoryError, Resettable, UnboundedArena};

#[test]
fn test_bounded_arena_bump_and_exhaustion() {
    let mut arena = BoundedArena::<f32, 64>::new().expect("arena creation");
    assert_eq!(arena.capacity(), 256);
    assert_eq!(arena.alignment(), 32);

    // 40 bytes padded to 64
    let first = arena.allocate(10).unwrap();
    assert_eq!(arena.used(), 64);
    let second = arena.allocate(40).unwrap();
    assert_eq!(second.as_ptr() as usize - first.as_ptr() as usize, 64);
    assert_eq!(arena.used(), 224);

    arena.allocate(8).unwrap();
    assert_eq!(arena.remaining(), 0);

    let err = arena.allocate(1).unwrap_err();
    assert_eq!(
        err,
        MemoryError::AllocationExhausted {
            requested: 4,
            available: 0,
            capacity: 256
        }
    );
    assert_eq!(arena.used(), 256);
    assert_eq!(arena.stats().failures, 1);
    assert_eq!(arena.stats().allocations, 3);
}

#[test]
fn test_bounded_arena_storage_is_writable() {
    let mut arena = BoundedArena::<u64, 32>::with_alignment(64).unwrap();
    let ptr = arena.allocate(16).unwrap();
    assert_eq!(ptr.as_ptr() as usize % 64, 0);

    unsafe {
        for i in 0..16 {
            arena.construct(std::ptr::NonNull::new_unchecked(ptr.as_ptr().add(i)), i as u64 * 3);
        }
        let values = std::slice::from_raw_parts(ptr.as_ptr(), 16);
        assert_eq!(values[15], 45);
        assert_eq!(values.iter().sum::<u64>(), 360);
    }
}

#[test]
fn test_bounded_arena_reset_reuses_storage() {
    let mut arena = BoundedArena::<u8, 128>::new().unwrap();
    let first = arena.allocate(100).unwrap();
    assert!(arena.allocate(100).is_err());

    arena.reset();
    assert_eq!(arena.used(), 0);
    assert_eq!(arena.stats().bytes_in_use, 0);
    assert_eq!(arena.allocate(100).unwrap(), first);
}

#[test]
fn test_bounded_arena_rejects_bad_requests() {
    let mut arena = BoundedArena::<u32, 16>::new().unwrap();
    assert!(matches!(arena.allocate(0), Err(MemoryError::InvalidCount { count: 0, .. })));
    assert!(matches!(
        arena.allocate(usize::MAX),
        Err(MemoryError::CapacityOverflow { .. })
    ));
    assert!(matches!(
        BoundedArena::<u32, 16>::with_alignment(48),
        Err(MemoryError::InvalidAlignment(48))
    ));
}

#[test]
fn test_unbounded_arena_grows_by_golden_ratio() {
    let mut arena = UnboundedArena::<f64>::new().unwrap();
    assert_eq!(arena.total_capacity(), 4096);

    arena.allocate(512).unwrap();
    assert_eq!(arena.chunk_count(), 1);

    arena.allocate(1).unwrap();
    assert_eq!(arena.chunk_count(), 2);
    assert_eq!(arena.total_capacity(), 4096 + 8192);

    // floor(12288 * φ) = 19882 rounds to 20480
    arena.allocate(1024).unwrap();
    assert_eq!(arena.chunk_count(), 3);
    assert_eq!(arena.total_capacity(), 4096 + 8192 + 20480);
}

#[test]
fn test_unbounded_arena_never_exhausts() {
    let mut arena = UnboundedArena::<u32>::with_config(16, 32, 256).unwrap();
    let mut pointers = Vec::new();
    for i in 0..500 {
        let ptr = arena.allocate(i % 37 + 1).unwrap();
        assert_eq!(ptr.as_ptr() as usize % 32, 0);
        unsafe { arena.construct(ptr, i as u32) };
        pointers.push((ptr, i as u32));
    }
    // Earlier chunks stay valid while later ones are appended
    for (ptr, value) in pointers {
        assert_eq!(unsafe { *ptr.as_ptr() }, value);
    }
    assert!(arena.chunk_count() > 1);
    assert_eq!(arena.stats().failures, 0);
}

#[test]
fn test_unbounded_arena_reset_and_fresh() {
    let mut arena = UnboundedArena::<u16>::with_config(64, 64, 1024).unwrap();
    for _ in 0..50 {
        arena.allocate(100).unwrap();
    }
    let copy = arena.fresh().unwrap();
    assert_eq!(copy.chunk_count(), 1);
    assert_eq!(copy.total_capacity(), 1024);
    assert_eq!(copy.alignment(), 64);

    arena.reset();
    assert_eq!(arena.chunk_count(), 1);
    assert_eq!(arena.current_offset(), 0);
    assert_eq!(arena.stats().capacity_bytes, 1024);
}
