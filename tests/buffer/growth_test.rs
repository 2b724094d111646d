/*!
 * Buffer Growth Tests
 * Capacity policy, alignment guarantee and element access
 */

use pretty_assertions::assert_eq;
use spectra_stl::{Allocator, BufferError, NumericBuffer};

#[test]
fn test_storage_meets_required_alignment() {
    let required = NumericBuffer::<f32>::required_alignment();
    assert!(required >= 32);
    assert!(required.is_power_of_two());

    let mut buffer = NumericBuffer::<f32>::new();
    for i in 0..1000 {
        buffer.push(i as f32).unwrap();
        assert_eq!(buffer.as_ptr() as usize % required, 0);
    }
}

#[test]
fn test_push_doubles_from_sixteen() {
    let mut buffer = NumericBuffer::<u32>::new();
    let mut capacities = Vec::new();
    for i in 0..100 {
        buffer.push_back(i).unwrap();
        if capacities.last() != Some(&buffer.capacity()) {
            capacities.push(buffer.capacity());
        }
    }
    assert_eq!(capacities, vec![16, 32, 64, 128]);
    assert_eq!(buffer.size(), 100);
    assert_eq!(buffer[99], 99);
}

#[test]
fn test_resize_grows_and_shrinks() {
    let mut buffer = NumericBuffer::<i16>::with_len(5).unwrap();
    assert_eq!(buffer.as_slice(), &[0; 5]);
    assert_eq!(buffer.capacity(), 16);

    buffer.resize(40, -3).unwrap();
    assert_eq!(buffer.capacity(), 48);
    assert_eq!(buffer.len(), 40);
    assert!(buffer[5..].iter().all(|&v| v == -3));

    buffer.resize(2, 7).unwrap();
    assert_eq!(buffer.len(), 2);
    assert_eq!(buffer.capacity(), 48);
}

#[test]
fn test_reserve_preserves_contents() {
    let mut buffer = NumericBuffer::from_slice(&[1.5f64, 2.5, 3.5]).unwrap();
    buffer.reserve(2).unwrap();
    assert_eq!(buffer.capacity(), 3);

    buffer.reserve(500).unwrap();
    assert_eq!(buffer.capacity(), 500);
    assert_eq!(buffer.as_slice(), &[1.5, 2.5, 3.5]);
}

#[test]
fn test_reserve_then_push_never_reallocates() {
    let mut buffer = NumericBuffer::<f64>::new();
    buffer.reserve(37).unwrap();
    let storage = buffer.as_ptr();
    for i in 0..37 {
        buffer.push_back(i as f64).unwrap();
        assert_eq!(buffer.as_ptr(), storage);
        assert_eq!(buffer.capacity(), 37);
    }
    assert_eq!(buffer.allocator().stats().allocations, 1);

    // The next push is the first to grow
    buffer.push(37.0).unwrap();
    assert_eq!(buffer.capacity(), 74);
    assert_eq!(buffer.allocator().stats().allocations, 2);
}

#[test]
fn test_with_capacity_and_clear() {
    let mut buffer = NumericBuffer::<u8>::with_capacity(64).unwrap();
    assert!(buffer.is_empty());
    buffer.extend_from_slice(&[9; 64]).unwrap();
    assert_eq!(buffer.capacity(), 64);

    let before = buffer.as_ptr();
    buffer.clear();
    assert!(buffer.is_empty());
    assert_eq!(buffer.as_ptr(), before);
    assert_eq!(buffer.pop(), None);
}

#[test]
fn test_bounds_checked_access() {
    let mut buffer = NumericBuffer::from_slice(&[10i64, 20, 30]).unwrap();
    assert_eq!(*buffer.at(2).unwrap(), 30);
    *buffer.at_mut(1).unwrap() += 5;
    assert_eq!(buffer[1], 25);
    assert_eq!(
        buffer.at_mut(3).unwrap_err(),
        BufferError::IndexOutOfRange { index: 3, len: 3 }
    );
}

#[test]
fn test_iteration_and_pointer_range() {
    let buffer = NumericBuffer::from_slice(&[1u16, 2, 3, 4]).unwrap();
    let total: u16 = (&buffer).into_iter().sum();
    assert_eq!(total, 10);

    let range = buffer.as_ptr_range();
    assert_eq!(
        (range.end as usize - range.start as usize) / std::mem::size_of::<u16>(),
        4
    );
}

#[test]
fn test_clone_and_equality() {
    let original = NumericBuffer::from_slice(&[0.25f32, 0.5, 0.75]).unwrap();
    let copy = original.clone();
    assert_eq!(original, copy);
    assert!(original == [0.25f32, 0.5, 0.75][..]);
    assert_eq!(format!("{copy:?}"), "[0.25, 0.5, 0.75]");
}

#[test]
fn test_aligned_len_rounds_to_wide_register() {
    // 64-byte registers: 16 f32 or 64 u8 per step
    assert_eq!(NumericBuffer::<f32>::with_len(1).unwrap().aligned_len(), 16);
    assert_eq!(NumericBuffer::<f32>::with_len(16).unwrap().aligned_len(), 16);
    assert_eq!(NumericBuffer::<u8>::with_len(65).unwrap().aligned_len(), 128);
}
