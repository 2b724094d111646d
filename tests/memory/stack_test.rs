/*!
 * Stack Allocator Tests
 * LIFO deallocation, markers, and nested scratch scopes
 */

use spectra_stl::memory::{Allocator, MemoryError, Resettable, StackAllocator, StackMarker};

#[test]
fn test_nested_scopes_with_markers() {
    let mut stack = StackAllocator::<f32>::with_capacity(256).unwrap();
    assert_eq!(stack.capacity(), 1024);

    let outer = stack.marker();
    stack.allocate(10).unwrap();
    let inner = stack.marker();
    assert_eq!(inner.offset(), 64);

    stack.allocate(100).unwrap();
    stack.allocate(3).unwrap();
    assert_eq!(stack.used(), 64 + 416 + 32);

    stack.rewind(inner);
    assert_eq!(stack.used(), 64);
    stack.rewind(outer);
    assert_eq!(stack.used(), 0);

    // A marker taken above the current top is ignored
    stack.rewind(inner);
    assert_eq!(stack.used(), 0);
}

#[test]
fn test_only_top_block_is_released() {
    let mut stack = StackAllocator::<u64>::with_config(64, 16).unwrap();
    let a = stack.allocate(2).unwrap();
    let b = stack.allocate(2).unwrap();
    assert_eq!(stack.used(), 32);

    unsafe { stack.deallocate(a, 2) };
    assert_eq!(stack.used(), 32, "non-top deallocation ignored");

    unsafe { stack.deallocate(b, 2) };
    assert_eq!(stack.used(), 16);
    unsafe { stack.deallocate(a, 2) };
    assert_eq!(stack.used(), 0);
    assert_eq!(stack.stats().deallocations, 2);
}

#[test]
fn test_exhaustion_reports_padded_request() {
    let mut stack = StackAllocator::<u8>::with_config(100, 32).unwrap();
    stack.allocate(64).unwrap();
    let err = stack.allocate(33).unwrap_err();
    assert_eq!(
        err,
        MemoryError::AllocationExhausted {
            requested: 64,
            available: 36,
            capacity: 100
        }
    );
    assert_eq!(stack.used(), 64);
}

#[test]
fn test_reset_discards_everything() {
    let mut stack = StackAllocator::<i32>::new().unwrap();
    let first = stack.allocate(5).unwrap();
    stack.allocate(500).unwrap();
    stack.reset();
    assert_eq!(stack.used(), 0);
    assert_eq!(stack.stats().bytes_in_use, 0);
    assert_eq!(stack.allocate(5).unwrap(), first);
}

#[test]
fn test_marker_serializes_as_offset() {
    let mut stack = StackAllocator::<u8>::with_capacity(128).unwrap();
    stack.allocate(1).unwrap();
    let marker = stack.marker();
    let json = serde_json::to_string(&marker).unwrap();
    assert_eq!(json, "32");
    let restored: StackMarker = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, marker);
}
