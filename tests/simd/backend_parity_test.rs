/*!
 * Backend Parity Tests
 * Every available backend must match a per-element reference, tails included
 */

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use spectra_stl::simd::{capabilities, Batch, Element, SimdResult};
use spectra_stl::NumericBuffer;

/// Lengths straddling every lane count (1, 4, 8, 16, 32, 64)
const SIZES: [usize; 9] = [0, 1, 7, 8, 15, 16, 17, 64, 65];

fn batches() -> Vec<Batch> {
    capabilities()
        .available_backends()
        .into_iter()
        .map(|backend| Batch::on(backend).expect("listed backend is available"))
        .collect()
}

fn aligned<T: Element>(values: &[T]) -> NumericBuffer<T> {
    NumericBuffer::from_slice(values).expect("buffer allocation")
}

fn check_binary<T: Element>(
    batch: Batch,
    name: &str,
    a: &[T],
    b: &[T],
    op: impl Fn(&Batch, &mut [T], &[T]) -> SimdResult<()>,
    reference: impl Fn(T, T) -> T,
) {
    let mut dest = aligned(a);
    let src = aligned(b);
    op(&batch, dest.as_mut_slice(), src.as_slice())
        .unwrap_or_else(|e| panic!("{name} on {}: {e}", batch.backend()));

    let expected: Vec<T> = a.iter().zip(b).map(|(&x, &y)| reference(x, y)).collect();
    assert_eq!(
        dest.as_slice(),
        expected.as_slice(),
        "{name} on {} with n = {}",
        batch.backend(),
        a.len()
    );
}

macro_rules! integer_parity {
    ($name:ident, $t:ty, $seed:expr) => {
        #[test]
        fn $name() {
            let mut rng = StdRng::seed_from_u64($seed);
            for batch in batches() {
                for &n in &SIZES {
                    let a: Vec<$t> = (0..n).map(|_| rng.gen()).collect();
                    let b: Vec<$t> = (0..n).map(|_| rng.gen()).collect();

                    check_binary(batch, "add", &a, &b, Batch::add::<$t>, |x: $t, y| x.wrapping_add(y));
                    check_binary(batch, "subtract", &a, &b, Batch::subtract::<$t>, |x: $t, y| {
                        x.wrapping_sub(y)
                    });
                    check_binary(batch, "multiply", &a, &b, Batch::multiply::<$t>, |x: $t, y| {
                        x.wrapping_mul(y)
                    });
                    check_binary(batch, "min", &a, &b, Batch::min::<$t>, |x: $t, y| x.min(y));
                    check_binary(batch, "max", &a, &b, Batch::max::<$t>, |x: $t, y| x.max(y));

                    let expected = a
                        .iter()
                        .zip(&b)
                        .fold(0 as $t, |acc, (&x, &y)| acc.wrapping_add(x.wrapping_mul(y)));
                    let (da, db) = (aligned(&a), aligned(&b));
                    assert_eq!(
                        batch.dot_product(&da, &db).unwrap(),
                        expected,
                        "dot_product on {} with n = {}",
                        batch.backend(),
                        n
                    );
                }
            }
        }
    };
}

integer_parity!(test_i8_parity, i8, 0x1001);
integer_parity!(test_i16_parity, i16, 0x1002);
integer_parity!(test_i32_parity, i32, 0x1003);
integer_parity!(test_i64_parity, i64, 0x1004);
integer_parity!(test_u8_parity, u8, 0x1005);
integer_parity!(test_u16_parity, u16, 0x1006);
integer_parity!(test_u32_parity, u32, 0x1007);
integer_parity!(test_u64_parity, u64, 0x1008);

macro_rules! signed_abs_parity {
    ($name:ident, $t:ty) => {
        #[test]
        fn $name() {
            let mut rng = StdRng::seed_from_u64(0x2001);
            for batch in batches() {
                for &n in &SIZES {
                    let mut values: Vec<$t> = (0..n).map(|_| rng.gen()).collect();
                    if let Some(first) = values.first_mut() {
                        *first = <$t>::MIN;
                    }
                    let mut dest = aligned(&values);
                    batch.abs(&mut dest).unwrap();

                    let expected: Vec<$t> = values.iter().map(|v| v.wrapping_abs()).collect();
                    assert_eq!(dest.as_slice(), expected.as_slice(), "abs on {}", batch.backend());
                    if n > 0 {
                        assert_eq!(dest[0], <$t>::MIN);
                    }
                }
            }
        }
    };
}

signed_abs_parity!(test_i8_abs_parity, i8);
signed_abs_parity!(test_i16_abs_parity, i16);
signed_abs_parity!(test_i32_abs_parity, i32);
signed_abs_parity!(test_i64_abs_parity, i64);

macro_rules! float_parity {
    ($name:ident, $t:ty, $seed:expr) => {
        #[test]
        fn $name() {
            let mut rng = StdRng::seed_from_u64($seed);
            for batch in batches() {
                for &n in &SIZES {
                    let a: Vec<$t> = (0..n).map(|_| rng.gen_range(-100.0..100.0)).collect();
                    let b: Vec<$t> = (0..n)
                        .map(|_| {
                            let magnitude: $t = rng.gen_range(0.5..50.0);
                            if rng.gen() {
                                magnitude
                            } else {
                                -magnitude
                            }
                        })
                        .collect();
                    let c: Vec<$t> = (0..n).map(|_| rng.gen_range(-10.0..10.0)).collect();

                    check_binary(batch, "add", &a, &b, Batch::add::<$t>, |x: $t, y| x + y);
                    check_binary(batch, "subtract", &a, &b, Batch::subtract::<$t>, |x: $t, y| x - y);
                    check_binary(batch, "multiply", &a, &b, Batch::multiply::<$t>, |x: $t, y| x * y);
                    check_binary(batch, "divide", &a, &b, Batch::divide::<$t>, |x: $t, y| x / y);
                    check_binary(batch, "min", &a, &b, Batch::min::<$t>, |x: $t, y| {
                        if x < y {
                            x
                        } else {
                            y
                        }
                    });
                    check_binary(batch, "max", &a, &b, Batch::max::<$t>, |x: $t, y| {
                        if x > y {
                            x
                        } else {
                            y
                        }
                    });

                    let mut dest = aligned(&a);
                    batch.abs(&mut dest).unwrap();
                    let expected: Vec<$t> = a.iter().map(|v| v.abs()).collect();
                    assert_eq!(dest.as_slice(), expected.as_slice(), "abs on {}", batch.backend());

                    let positive: Vec<$t> = b.iter().map(|v| v.abs()).collect();
                    let mut dest = aligned(&positive);
                    batch.sqrt(&mut dest).unwrap();
                    let expected: Vec<$t> = positive.iter().map(|v| v.sqrt()).collect();
                    assert_eq!(dest.as_slice(), expected.as_slice(), "sqrt on {}", batch.backend());

                    let mut dest = aligned(&a);
                    let (fb, fc) = (aligned(&b), aligned(&c));
                    batch.fmadd(&mut dest, &fb, &fc).unwrap();
                    let expected: Vec<$t> = a
                        .iter()
                        .zip(b.iter().zip(&c))
                        .map(|(&acc, (&x, &y))| x.mul_add(y, acc))
                        .collect();
                    assert_eq!(dest.as_slice(), expected.as_slice(), "fmadd on {}", batch.backend());
                }
            }
        }
    };
}

float_parity!(test_f32_parity, f32, 0x3001);
float_parity!(test_f64_parity, f64, 0x3002);

macro_rules! float_dot {
    ($name:ident, $t:ty, $tolerance:expr) => {
        #[test]
        fn $name() {
            let mut rng = StdRng::seed_from_u64(0x4001);
            for batch in batches() {
                for &n in &SIZES {
                    // Small integers keep every partial sum exact, so any grouping agrees
                    let a: Vec<$t> = (0..n).map(|_| rng.gen_range(-8i32..=8) as $t).collect();
                    let b: Vec<$t> = (0..n).map(|_| rng.gen_range(-8i32..=8) as $t).collect();
                    let expected: $t = a.iter().zip(&b).map(|(x, y)| x * y).sum();
                    let (da, db) = (aligned(&a), aligned(&b));
                    assert_eq!(batch.dot_product(&da, &db).unwrap(), expected);

                    let a: Vec<$t> = (0..n).map(|_| rng.gen_range(-1.0..1.0)).collect();
                    let b: Vec<$t> = (0..n).map(|_| rng.gen_range(-1.0..1.0)).collect();
                    let exact: f64 = a.iter().zip(&b).map(|(&x, &y)| x as f64 * y as f64).sum();
                    let scale: f64 = a.iter().zip(&b).map(|(&x, &y)| (x as f64 * y as f64).abs()).sum();
                    let (da, db) = (aligned(&a), aligned(&b));
                    let got = batch.dot_product(&da, &db).unwrap() as f64;
                    assert!(
                        (got - exact).abs() <= $tolerance * (scale + 1.0),
                        "dot_product on {} with n = {}: {got} vs {exact}",
                        batch.backend(),
                        n
                    );
                }
            }
        }
    };
}

float_dot!(test_f32_dot_product, f32, 1e-5);
float_dot!(test_f64_dot_product, f64, 1e-12);

/// Lane-wise fused accumulation, lanes reduced in order, remainder added unfused
macro_rules! fused_dot_reference {
    ($name:ident, $t:ty) => {
        fn $name(a: &[$t], b: &[$t], lanes: usize) -> $t {
            let bulk = a.len() - a.len() % lanes;
            let mut acc = vec![0.0 as $t; lanes];
            for (i, (&x, &y)) in a[..bulk].iter().zip(&b[..bulk]).enumerate() {
                acc[i % lanes] = x.mul_add(y, acc[i % lanes]);
            }
            let mut total: $t = 0.0;
            for lane in acc {
                total += lane;
            }
            for (&x, &y) in a[bulk..].iter().zip(&b[bulk..]) {
                total += x * y;
            }
            total
        }
    };
}

fused_dot_reference!(fused_dot_f32, f32);
fused_dot_reference!(fused_dot_f64, f64);

macro_rules! float_dot_bits {
    ($name:ident, $t:ty, $reference:ident, $seed:expr) => {
        #[test]
        fn $name() {
            let mut rng = StdRng::seed_from_u64($seed);
            for batch in batches() {
                let lanes = batch.lanes::<$t>();
                for n in SIZES.into_iter().chain([1000]) {
                    let a: Vec<$t> = (0..n).map(|_| rng.gen_range(-100.0..100.0)).collect();
                    let b: Vec<$t> = (0..n).map(|_| rng.gen_range(-100.0..100.0)).collect();
                    let (da, db) = (aligned(&a), aligned(&b));
                    let got = batch.dot_product(&da, &db).unwrap();
                    let expected = $reference(&a, &b, lanes);
                    assert_eq!(
                        got.to_bits(),
                        expected.to_bits(),
                        "dot_product on {} with n = {}: {got} vs {expected}",
                        batch.backend(),
                        n
                    );
                }
            }
        }
    };
}

float_dot_bits!(test_f32_dot_product_matches_lane_fma_bits, f32, fused_dot_f32, 0x4002);
float_dot_bits!(test_f64_dot_product_matches_lane_fma_bits, f64, fused_dot_f64, 0x4003);

#[test]
fn test_dot_product_groups_by_lane() {
    // f32 spacing at 1e8 is 8, so 1e8 + 1 rounds back to 1e8
    for batch in batches() {
        let lanes = batch.lanes::<f32>();
        let mut a = vec![0.0f32; (lanes * 2).max(3)];
        a[0] = 1.0e8;
        a[1] = 1.0;
        let cancel = if lanes > 1 { lanes } else { 2 };
        a[cancel] = -1.0e8;
        let b = vec![1.0f32; a.len()];
        let (da, db) = (aligned(&a), aligned(&b));
        let dot = batch.dot_product(&da, &db).unwrap();

        if lanes > 1 {
            // Lane 0 cancels to zero while lane 1 keeps the 1
            assert_eq!(dot, 1.0, "backend {}", batch.backend());
        } else {
            assert_eq!(dot, 0.0);
        }
    }
}

#[test]
fn test_free_functions_use_active_backend() {
    let mut a = aligned(&[1i32, 2, 3, 4, 5, 6, 7, 8, 9]);
    let b = aligned(&[9i32, 8, 7, 6, 5, 4, 3, 2, 1]);
    spectra_stl::simd::add(&mut a, &b).unwrap();
    assert!(a.iter().all(|&v| v == 10));
    assert_eq!(spectra_stl::simd::dot_product(&a, &b).unwrap(), 450);
}

#[test]
fn test_empty_operands() {
    for batch in batches() {
        let mut empty = NumericBuffer::<f64>::new();
        let other = NumericBuffer::<f64>::new();
        batch.add(&mut empty, &other).unwrap();
        batch.sqrt(&mut empty).unwrap();
        assert_eq!(batch.dot_product(&empty, &other).unwrap(), 0.0);
        assert_eq!(batch.dot_product::<u16>(&[], &[]).unwrap(), 0);
    }
}
