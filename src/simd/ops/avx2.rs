/*!
 * Narrow Backend
 * 256-bit catalog on AVX2 + FMA
 *
 * Gaps in the instruction set are emulated:
 * - 8-bit multiply through 16-bit lanes (even/odd bytes, low-byte repack)
 * - 64-bit multiply from 32x32 partial products
 * - 64-bit min/max/abs through compare + blend (sign bias for unsigned)
 */

use super::{Avx2, VectorAbs, VectorFloat, VectorOps};
use std::arch::x86_64::*;

// =============================================================================
// EMULATED INTEGER OPERATIONS
// =============================================================================

/// Low byte of each 8-bit product
#[inline(always)]
unsafe fn mullo_epi8(a: __m256i, b: __m256i) -> __m256i {
    let even = _mm256_mullo_epi16(a, b);
    let odd = _mm256_mullo_epi16(_mm256_srli_epi16(a, 8), _mm256_srli_epi16(b, 8));
    let low_bytes = _mm256_set1_epi16(0x00FF);
    _mm256_or_si256(
        _mm256_slli_epi16(odd, 8),
        _mm256_and_si256(even, low_bytes),
    )
}

/// Low 64 bits of each 64-bit product
#[inline(always)]
unsafe fn mullo_epi64(a: __m256i, b: __m256i) -> __m256i {
    let lo = _mm256_mul_epu32(a, b);
    let a_hi = _mm256_srli_epi64(a, 32);
    let b_hi = _mm256_srli_epi64(b, 32);
    let cross = _mm256_add_epi64(_mm256_mul_epu32(a, b_hi), _mm256_mul_epu32(a_hi, b));
    _mm256_add_epi64(lo, _mm256_slli_epi64(cross, 32))
}

#[inline(always)]
unsafe fn min_epi64(a: __m256i, b: __m256i) -> __m256i {
    // b where a > b
    _mm256_blendv_epi8(a, b, _mm256_cmpgt_epi64(a, b))
}

#[inline(always)]
unsafe fn max_epi64(a: __m256i, b: __m256i) -> __m256i {
    _mm256_blendv_epi8(b, a, _mm256_cmpgt_epi64(a, b))
}

/// Unsigned compare via signed compare of sign-flipped operands
#[inline(always)]
unsafe fn cmpgt_epu64(a: __m256i, b: __m256i) -> __m256i {
    let bias = _mm256_set1_epi64x(i64::MIN);
    _mm256_cmpgt_epi64(_mm256_xor_si256(a, bias), _mm256_xor_si256(b, bias))
}

#[inline(always)]
unsafe fn min_epu64(a: __m256i, b: __m256i) -> __m256i {
    _mm256_blendv_epi8(a, b, cmpgt_epu64(a, b))
}

#[inline(always)]
unsafe fn max_epu64(a: __m256i, b: __m256i) -> __m256i {
    _mm256_blendv_epi8(b, a, cmpgt_epu64(a, b))
}

#[inline(always)]
unsafe fn abs_epi64(a: __m256i) -> __m256i {
    let negative = _mm256_cmpgt_epi64(_mm256_setzero_si256(), a);
    _mm256_sub_epi64(_mm256_xor_si256(a, negative), negative)
}

// =============================================================================
// CATALOG
// =============================================================================

macro_rules! int_ops {
    ($t:ty, $lanes:expr, $add:ident, $sub:ident, $mul:ident, $min:ident, $max:ident) => {
        impl VectorOps<$t> for Avx2 {
            type Reg = __m256i;
            const LANES: usize = $lanes;

            #[inline(always)]
            unsafe fn load(ptr: *const $t) -> __m256i {
                _mm256_load_si256(ptr as *const __m256i)
            }
            #[inline(always)]
            unsafe fn store(ptr: *mut $t, v: __m256i) {
                _mm256_store_si256(ptr as *mut __m256i, v)
            }
            #[inline(always)]
            unsafe fn zero() -> __m256i {
                _mm256_setzero_si256()
            }
            #[inline(always)]
            unsafe fn add(a: __m256i, b: __m256i) -> __m256i {
                $add(a, b)
            }
            #[inline(always)]
            unsafe fn sub(a: __m256i, b: __m256i) -> __m256i {
                $sub(a, b)
            }
            #[inline(always)]
            unsafe fn mul(a: __m256i, b: __m256i) -> __m256i {
                $mul(a, b)
            }
            #[inline(always)]
            unsafe fn min(a: __m256i, b: __m256i) -> __m256i {
                $min(a, b)
            }
            #[inline(always)]
            unsafe fn max(a: __m256i, b: __m256i) -> __m256i {
                $max(a, b)
            }
        }
    };
}

macro_rules! int_abs {
    ($t:ty, $abs:ident) => {
        impl VectorAbs<$t> for Avx2 {
            #[inline(always)]
            unsafe fn abs(a: __m256i) -> __m256i {
                $abs(a)
            }
        }
    };
}

int_ops!(i8, 32, _mm256_add_epi8, _mm256_sub_epi8, mullo_epi8, _mm256_min_epi8, _mm256_max_epi8);
int_ops!(u8, 32, _mm256_add_epi8, _mm256_sub_epi8, mullo_epi8, _mm256_min_epu8, _mm256_max_epu8);
int_ops!(i16, 16, _mm256_add_epi16, _mm256_sub_epi16, _mm256_mullo_epi16, _mm256_min_epi16, _mm256_max_epi16);
int_ops!(u16, 16, _mm256_add_epi16, _mm256_sub_epi16, _mm256_mullo_epi16, _mm256_min_epu16, _mm256_max_epu16);
int_ops!(i32, 8, _mm256_add_epi32, _mm256_sub_epi32, _mm256_mullo_epi32, _mm256_min_epi32, _mm256_max_epi32);
int_ops!(u32, 8, _mm256_add_epi32, _mm256_sub_epi32, _mm256_mullo_epi32, _mm256_min_epu32, _mm256_max_epu32);
int_ops!(i64, 4, _mm256_add_epi64, _mm256_sub_epi64, mullo_epi64, min_epi64, max_epi64);
int_ops!(u64, 4, _mm256_add_epi64, _mm256_sub_epi64, mullo_epi64, min_epu64, max_epu64);

int_abs!(i8, _mm256_abs_epi8);
int_abs!(i16, _mm256_abs_epi16);
int_abs!(i32, _mm256_abs_epi32);
int_abs!(i64, abs_epi64);

impl VectorOps<f32> for Avx2 {
    type Reg = __m256;
    const LANES: usize = 8;

    #[inline(always)]
    unsafe fn load(ptr: *const f32) -> __m256 {
        _mm256_load_ps(ptr)
    }
    #[inline(always)]
    unsafe fn store(ptr: *mut f32, v: __m256) {
        _mm256_store_ps(ptr, v)
    }
    #[inline(always)]
    unsafe fn zero() -> __m256 {
        _mm256_setzero_ps()
    }
    #[inline(always)]
    unsafe fn add(a: __m256, b: __m256) -> __m256 {
        _mm256_add_ps(a, b)
    }
    #[inline(always)]
    unsafe fn sub(a: __m256, b: __m256) -> __m256 {
        _mm256_sub_ps(a, b)
    }
    #[inline(always)]
    unsafe fn mul(a: __m256, b: __m256) -> __m256 {
        _mm256_mul_ps(a, b)
    }
    #[inline(always)]
    unsafe fn min(a: __m256, b: __m256) -> __m256 {
        _mm256_min_ps(a, b)
    }
    #[inline(always)]
    unsafe fn max(a: __m256, b: __m256) -> __m256 {
        _mm256_max_ps(a, b)
    }
}

impl VectorAbs<f32> for Avx2 {
    #[inline(always)]
    unsafe fn abs(a: __m256) -> __m256 {
        // Clear the sign bit
        _mm256_andnot_ps(_mm256_set1_ps(-0.0), a)
    }
}

impl VectorFloat<f32> for Avx2 {
    #[inline(always)]
    unsafe fn div(a: __m256, b: __m256) -> __m256 {
        _mm256_div_ps(a, b)
    }
    #[inline(always)]
    unsafe fn sqrt(a: __m256) -> __m256 {
        _mm256_sqrt_ps(a)
    }
    #[inline(always)]
    unsafe fn rsqrt(a: __m256) -> __m256 {
        _mm256_rsqrt_ps(a)
    }
    #[inline(always)]
    unsafe fn fmadd(a: __m256, b: __m256, c: __m256) -> __m256 {
        _mm256_fmadd_ps(a, b, c)
    }
    #[inline(always)]
    unsafe fn fmsub(a: __m256, b: __m256, c: __m256) -> __m256 {
        _mm256_fmsub_ps(a, b, c)
    }
    #[inline(always)]
    unsafe fn fnmadd(a: __m256, b: __m256, c: __m256) -> __m256 {
        _mm256_fnmadd_ps(a, b, c)
    }
}

impl VectorOps<f64> for Avx2 {
    type Reg = __m256d;
    const LANES: usize = 4;

    #[inline(always)]
    unsafe fn load(ptr: *const f64) -> __m256d {
        _mm256_load_pd(ptr)
    }
    #[inline(always)]
    unsafe fn store(ptr: *mut f64, v: __m256d) {
        _mm256_store_pd(ptr, v)
    }
    #[inline(always)]
    unsafe fn zero() -> __m256d {
        _mm256_setzero_pd()
    }
    #[inline(always)]
    unsafe fn add(a: __m256d, b: __m256d) -> __m256d {
        _mm256_add_pd(a, b)
    }
    #[inline(always)]
    unsafe fn sub(a: __m256d, b: __m256d) -> __m256d {
        _mm256_sub_pd(a, b)
    }
    #[inline(always)]
    unsafe fn mul(a: __m256d, b: __m256d) -> __m256d {
        _mm256_mul_pd(a, b)
    }
    #[inline(always)]
    unsafe fn min(a: __m256d, b: __m256d) -> __m256d {
        _mm256_min_pd(a, b)
    }
    #[inline(always)]
    unsafe fn max(a: __m256d, b: __m256d) -> __m256d {
        _mm256_max_pd(a, b)
    }
}

impl VectorAbs<f64> for Avx2 {
    #[inline(always)]
    unsafe fn abs(a: __m256d) -> __m256d {
        _mm256_andnot_pd(_mm256_set1_pd(-0.0), a)
    }
}

impl VectorFloat<f64> for Avx2 {
    #[inline(always)]
    unsafe fn div(a: __m256d, b: __m256d) -> __m256d {
        _mm256_div_pd(a, b)
    }
    #[inline(always)]
    unsafe fn sqrt(a: __m256d) -> __m256d {
        _mm256_sqrt_pd(a)
    }
    #[inline(always)]
    unsafe fn rsqrt(a: __m256d) -> __m256d {
        // No packed-double estimate below AVX-512
        _mm256_div_pd(_mm256_set1_pd(1.0), _mm256_sqrt_pd(a))
    }
    #[inline(always)]
    unsafe fn fmadd(a: __m256d, b: __m256d, c: __m256d) -> __m256d {
        _mm256_fmadd_pd(a, b, c)
    }
    #[inline(always)]
    unsafe fn fmsub(a: __m256d, b: __m256d, c: __m256d) -> __m256d {
        _mm256_fmsub_pd(a, b, c)
    }
    #[inline(always)]
    unsafe fn fnmadd(a: __m256d, b: __m256d, c: __m256d) -> __m256d {
        _mm256_fnmadd_pd(a, b, c)
    }
}
