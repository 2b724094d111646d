/*!
 * Allocator-backed Buffer Tests
 * NumericBuffer over arena, stack and heap strategies feeding batch operations
 */

use spectra_stl::memory::{
    Allocator, BoundedArena, HeapAllocator, MemoryError, StackAllocator, UnboundedArena,
};
use spectra_stl::simd::Batch;
use spectra_stl::{BufferError, NumericBuffer};

#[test]
fn test_arena_buffer_feeds_batch_operations() {
    let arena = UnboundedArena::<f32>::with_config(256, 64, 4096).unwrap();
    let mut dest = NumericBuffer::new_in(arena);
    dest.resize(100, 2.0).unwrap();

    let mut src = NumericBuffer::new_in(UnboundedArena::<f32>::new().unwrap());
    src.resize(100, 3.0).unwrap();

    let batch = Batch::active();
    batch.multiply(&mut dest, &src).unwrap();
    assert!(dest.iter().all(|&v| v == 6.0));
    assert_eq!(batch.dot_product(&dest, &src).unwrap(), 1800.0);
}

#[test]
fn test_default_strategies_meet_backend_alignment() {
    let required = NumericBuffer::<u8>::required_alignment();

    let mut bytes = NumericBuffer::new_in(BoundedArena::<u8, 4096>::new().unwrap());
    bytes.push(0).unwrap();
    assert_eq!(bytes.as_ptr() as usize % required, 0);
    for i in 1..100u8 {
        bytes.push(i).unwrap();
        assert_eq!(bytes.as_ptr() as usize % required, 0);
    }

    let mut floats = NumericBuffer::new_in(StackAllocator::<f32>::new().unwrap());
    for i in 0..200 {
        floats.push(i as f32).unwrap();
        assert_eq!(floats.as_ptr() as usize % required, 0);
    }

    let mut ones = NumericBuffer::new_in(UnboundedArena::<f32>::new().unwrap());
    ones.resize(200, 1.0).unwrap();
    Batch::active().add(&mut floats, &ones).unwrap();
    assert_eq!(floats[0], 1.0);
    assert_eq!(floats[199], 200.0);
}

#[test]
fn test_bounded_arena_buffer_exhaustion() {
    let arena = BoundedArena::<i32, 64>::with_alignment(64).unwrap();
    let mut buffer = NumericBuffer::new_in(arena);

    // 16 -> 32 -> 64 element requests consume 64 + 128 bytes of 256
    for i in 0..32 {
        buffer.push(i).unwrap();
    }
    let err = buffer.push(32).unwrap_err();
    assert!(matches!(
        err,
        BufferError::Memory(MemoryError::AllocationExhausted { .. })
    ));
    assert_eq!(buffer.len(), 32);
    assert_eq!(buffer[31], 31);
}

#[test]
fn test_stack_buffer_growth_buries_old_block() {
    let stack = StackAllocator::<u64>::with_config(512, 64).unwrap();
    let mut buffer = NumericBuffer::new_in(stack);
    buffer.extend_from_slice(&[1, 2, 3, 4]).unwrap();
    assert_eq!(buffer.allocator().used(), 64);

    // Growing pops the old block only when it is on top, so usage never shrinks here
    buffer.reserve(64).unwrap();
    assert_eq!(buffer.as_slice(), &[1, 2, 3, 4]);
    assert_eq!(buffer.allocator().used(), 64 + 512);
}

#[test]
fn test_try_clone_uses_fresh_allocator() {
    let heap = HeapAllocator::<f64>::with_alignment(128).unwrap();
    let mut buffer = NumericBuffer::new_in(heap);
    buffer.extend_from_slice(&[1.0, 2.0]).unwrap();

    let copy = buffer.try_clone().unwrap();
    assert_eq!(copy.allocator().alignment(), 128);
    assert_eq!(copy.as_ptr() as usize % 128, 0);
    assert_eq!(copy.allocator().stats().allocations, 1);
    assert_eq!(copy, buffer);
}

#[test]
fn test_heap_buffer_stats_track_growth() {
    let mut buffer = NumericBuffer::<u8>::new();
    for i in 0..=255u8 {
        buffer.push(i).unwrap();
    }
    let stats = buffer.allocator().stats();
    // 16, 32, 64, 128, 256
    assert_eq!(stats.allocations, 5);
    assert_eq!(stats.deallocations, 4);
    assert_eq!(stats.bytes_in_use, 256);
}
