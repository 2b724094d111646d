/*!
 * Scalar Backend
 * One-lane catalog built on the element lane methods
 */

use super::{Scalar, VectorAbs, VectorFloat, VectorOps};
use crate::simd::element::{Element, FloatElement, SignedElement};

impl<T: Element> VectorOps<T> for Scalar {
    type Reg = T;
    const LANES: usize = 1;

    #[inline(always)]
    unsafe fn load(ptr: *const T) -> T {
        ptr.read()
    }

    #[inline(always)]
    unsafe fn store(ptr: *mut T, v: T) {
        ptr.write(v)
    }

    #[inline(always)]
    unsafe fn zero() -> T {
        T::ZERO
    }

    #[inline(always)]
    unsafe fn add(a: T, b: T) -> T {
        a.lane_add(b)
    }

    #[inline(always)]
    unsafe fn sub(a: T, b: T) -> T {
        a.lane_sub(b)
    }

    #[inline(always)]
    unsafe fn mul(a: T, b: T) -> T {
        a.lane_mul(b)
    }

    #[inline(always)]
    unsafe fn min(a: T, b: T) -> T {
        a.lane_min(b)
    }

    #[inline(always)]
    unsafe fn max(a: T, b: T) -> T {
        a.lane_max(b)
    }
}

impl<T: SignedElement> VectorAbs<T> for Scalar {
    #[inline(always)]
    unsafe fn abs(a: T) -> T {
        a.lane_abs()
    }
}

impl<T: FloatElement> VectorFloat<T> for Scalar {
    #[inline(always)]
    unsafe fn div(a: T, b: T) -> T {
        a.lane_div(b)
    }

    #[inline(always)]
    unsafe fn sqrt(a: T) -> T {
        a.lane_sqrt()
    }

    #[inline(always)]
    unsafe fn rsqrt(a: T) -> T {
        T::ONE.lane_div(a.lane_sqrt())
    }

    #[inline(always)]
    unsafe fn fmadd(a: T, b: T, c: T) -> T {
        a.lane_fma(b, c)
    }

    #[inline(always)]
    unsafe fn fmsub(a: T, b: T, c: T) -> T {
        a.lane_fma(b, c.lane_neg())
    }

    #[inline(always)]
    unsafe fn fnmadd(a: T, b: T, c: T) -> T {
        a.lane_neg().lane_fma(b, c)
    }
}
