/*!
 * Generic Loop Kernels
 *
 * Bulk loop over whole registers followed by a scalar remainder using the
 * element lane methods. Marked `#[inline(always)]` so each backend wrapper
 * compiles them under its own target features.
 */

use crate::simd::element::{Element, FloatElement, SignedElement};
use crate::simd::ops::{VectorAbs, VectorFloat, VectorOps};

/// 64-byte spill slot for horizontal reductions
#[repr(C, align(64))]
struct Spill([u8; 64]);

macro_rules! binary_kernel {
    ($name:ident, $vop:ident, $lane:ident) => {
        /// `dest[i] = dest[i] op src[i]` for `i < len`
        #[inline(always)]
        pub(crate) unsafe fn $name<T: Element, B: VectorOps<T>>(dest: *mut T, src: *const T, len: usize) {
            let bulk = len - len % B::LANES;
            let mut i = 0;
            while i < bulk {
                let a = B::load(dest.add(i));
                let b = B::load(src.add(i));
                B::store(dest.add(i), B::$vop(a, b));
                i += B::LANES;
            }
            while i < len {
                *dest.add(i) = (*dest.add(i)).$lane(*src.add(i));
                i += 1;
            }
        }
    };
}

binary_kernel!(add, add, lane_add);
binary_kernel!(sub, sub, lane_sub);
binary_kernel!(mul, mul, lane_mul);
binary_kernel!(min, min, lane_min);
binary_kernel!(max, max, lane_max);

#[inline(always)]
pub(crate) unsafe fn div<T: FloatElement, B: VectorFloat<T>>(dest: *mut T, src: *const T, len: usize) {
    let bulk = len - len % B::LANES;
    let mut i = 0;
    while i < bulk {
        let a = B::load(dest.add(i));
        let b = B::load(src.add(i));
        B::store(dest.add(i), B::div(a, b));
        i += B::LANES;
    }
    while i < len {
        *dest.add(i) = (*dest.add(i)).lane_div(*src.add(i));
        i += 1;
    }
}

#[inline(always)]
pub(crate) unsafe fn abs<T: SignedElement, B: VectorAbs<T>>(dest: *mut T, len: usize) {
    let bulk = len - len % B::LANES;
    let mut i = 0;
    while i < bulk {
        B::store(dest.add(i), B::abs(B::load(dest.add(i))));
        i += B::LANES;
    }
    while i < len {
        *dest.add(i) = (*dest.add(i)).lane_abs();
        i += 1;
    }
}

#[inline(always)]
pub(crate) unsafe fn sqrt<T: FloatElement, B: VectorFloat<T>>(dest: *mut T, len: usize) {
    let bulk = len - len % B::LANES;
    let mut i = 0;
    while i < bulk {
        B::store(dest.add(i), B::sqrt(B::load(dest.add(i))));
        i += B::LANES;
    }
    while i < len {
        *dest.add(i) = (*dest.add(i)).lane_sqrt();
        i += 1;
    }
}

/// `dest[i] = a[i] * b[i] + dest[i]`, fused in both loops
#[inline(always)]
pub(crate) unsafe fn fmadd<T: FloatElement, B: VectorFloat<T>>(
    dest: *mut T,
    a: *const T,
    b: *const T,
    len: usize,
) {
    let bulk = len - len % B::LANES;
    let mut i = 0;
    while i < bulk {
        let va = B::load(a.add(i));
        let vb = B::load(b.add(i));
        let vd = B::load(dest.add(i));
        B::store(dest.add(i), B::fmadd(va, vb, vd));
        i += B::LANES;
    }
    while i < len {
        *dest.add(i) = (*a.add(i)).lane_fma(*b.add(i), *dest.add(i));
        i += 1;
    }
}

/// Sum the lanes of `acc` from lane 0 upwards, starting at zero
#[inline(always)]
unsafe fn reduce<T: Element, B: VectorOps<T>>(acc: B::Reg) -> T {
    let mut spill = Spill([0; 64]);
    let lanes = spill.0.as_mut_ptr() as *mut T;
    B::store(lanes, acc);
    let mut total = T::ZERO;
    for lane in 0..B::LANES {
        total = total.lane_add(*lanes.add(lane));
    }
    total
}

/// Float dot product: fused accumulation, one reduction, plain remainder
#[inline(always)]
pub(crate) unsafe fn dot_fused<T: FloatElement, B: VectorFloat<T>>(
    a: *const T,
    b: *const T,
    len: usize,
) -> T {
    let bulk = len - len % B::LANES;
    let mut acc = B::zero();
    let mut i = 0;
    while i < bulk {
        acc = B::fmadd(B::load(a.add(i)), B::load(b.add(i)), acc);
        i += B::LANES;
    }
    let mut result = reduce::<T, B>(acc);
    while i < len {
        result = result.lane_add((*a.add(i)).lane_mul(*b.add(i)));
        i += 1;
    }
    result
}

/// Integer dot product in the element width, wrapping
#[inline(always)]
pub(crate) unsafe fn dot_wrapping<T: Element, B: VectorOps<T>>(
    a: *const T,
    b: *const T,
    len: usize,
) -> T {
    let bulk = len - len % B::LANES;
    let mut acc = B::zero();
    let mut i = 0;
    while i < bulk {
        acc = B::add(acc, B::mul(B::load(a.add(i)), B::load(b.add(i))));
        i += B::LANES;
    }
    let mut result = reduce::<T, B>(acc);
    while i < len {
        result = result.lane_add((*a.add(i)).lane_mul(*b.add(i)));
        i += 1;
    }
    result
}
