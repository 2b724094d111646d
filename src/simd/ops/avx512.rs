/*!
 * Wide Backend
 * 512-bit catalog on AVX-512 F/BW/DQ
 *
 * Native instructions cover every operation except the 8-bit multiply,
 * which uses the same even/odd 16-bit repack as the narrow tier.
 */

use super::{Avx512, VectorAbs, VectorFloat, VectorOps};
use std::arch::x86_64::*;

/// Low byte of each 8-bit product
#[inline(always)]
unsafe fn mullo_epi8(a: __m512i, b: __m512i) -> __m512i {
    let even = _mm512_mullo_epi16(a, b);
    let odd = _mm512_mullo_epi16(_mm512_srli_epi16(a, 8), _mm512_srli_epi16(b, 8));
    _mm512_or_si512(
        _mm512_slli_epi16(odd, 8),
        _mm512_and_si512(even, _mm512_set1_epi16(0x00FF)),
    )
}

macro_rules! int_ops {
    ($t:ty, $lanes:expr, $add:ident, $sub:ident, $mul:ident, $min:ident, $max:ident) => {
        impl VectorOps<$t> for Avx512 {
            type Reg = __m512i;
            const LANES: usize = $lanes;

            #[inline(always)]
            unsafe fn load(ptr: *const $t) -> __m512i {
                _mm512_load_epi32(ptr as *const i32)
            }
            #[inline(always)]
            unsafe fn store(ptr: *mut $t, v: __m512i) {
                _mm512_store_epi32(ptr as *mut i32, v)
            }
            #[inline(always)]
            unsafe fn zero() -> __m512i {
                _mm512_setzero_si512()
            }
            #[inline(always)]
            unsafe fn add(a: __m512i, b: __m512i) -> __m512i {
                $add(a, b)
            }
            #[inline(always)]
            unsafe fn sub(a: __m512i, b: __m512i) -> __m512i {
                $sub(a, b)
            }
            #[inline(always)]
            unsafe fn mul(a: __m512i, b: __m512i) -> __m512i {
                $mul(a, b)
            }
            #[inline(always)]
            unsafe fn min(a: __m512i, b: __m512i) -> __m512i {
                $min(a, b)
            }
            #[inline(always)]
            unsafe fn max(a: __m512i, b: __m512i) -> __m512i {
                $max(a, b)
            }
        }
    };
}

macro_rules! int_abs {
    ($t:ty, $abs:ident) => {
        impl VectorAbs<$t> for Avx512 {
            #[inline(always)]
            unsafe fn abs(a: __m512i) -> __m512i {
                $abs(a)
            }
        }
    };
}

macro_rules! float_ops {
    (
        $t:ty, $reg:ty, $lanes:expr,
        load: $load:ident, store: $store:ident, zero: $zero:ident,
        add: $add:ident, sub: $sub:ident, mul: $mul:ident, min: $min:ident, max: $max:ident,
        abs: $abs:ident, div: $div:ident, sqrt: $sqrt:ident, rsqrt: $rsqrt:ident,
        fmadd: $fmadd:ident, fmsub: $fmsub:ident, fnmadd: $fnmadd:ident
    ) => {
        impl VectorOps<$t> for Avx512 {
            type Reg = $reg;
            const LANES: usize = $lanes;

            #[inline(always)]
            unsafe fn load(ptr: *const $t) -> $reg {
                $load(ptr)
            }
            #[inline(always)]
            unsafe fn store(ptr: *mut $t, v: $reg) {
                $store(ptr, v)
            }
            #[inline(always)]
            unsafe fn zero() -> $reg {
                $zero()
            }
            #[inline(always)]
            unsafe fn add(a: $reg, b: $reg) -> $reg {
                $add(a, b)
            }
            #[inline(always)]
            unsafe fn sub(a: $reg, b: $reg) -> $reg {
                $sub(a, b)
            }
            #[inline(always)]
            unsafe fn mul(a: $reg, b: $reg) -> $reg {
                $mul(a, b)
            }
            #[inline(always)]
            unsafe fn min(a: $reg, b: $reg) -> $reg {
                $min(a, b)
            }
            #[inline(always)]
            unsafe fn max(a: $reg, b: $reg) -> $reg {
                $max(a, b)
            }
        }

        impl VectorAbs<$t> for Avx512 {
            #[inline(always)]
            unsafe fn abs(a: $reg) -> $reg {
                $abs(a)
            }
        }

        impl VectorFloat<$t> for Avx512 {
            #[inline(always)]
            unsafe fn div(a: $reg, b: $reg) -> $reg {
                $div(a, b)
            }
            #[inline(always)]
            unsafe fn sqrt(a: $reg) -> $reg {
                $sqrt(a)
            }
            #[inline(always)]
            unsafe fn rsqrt(a: $reg) -> $reg {
                $rsqrt(a)
            }
            #[inline(always)]
            unsafe fn fmadd(a: $reg, b: $reg, c: $reg) -> $reg {
                $fmadd(a, b, c)
            }
            #[inline(always)]
            unsafe fn fmsub(a: $reg, b: $reg, c: $reg) -> $reg {
                $fmsub(a, b, c)
            }
            #[inline(always)]
            unsafe fn fnmadd(a: $reg, b: $reg, c: $reg) -> $reg {
                $fnmadd(a, b, c)
            }
        }
    };
}

int_ops!(i8, 64, _mm512_add_epi8, _mm512_sub_epi8, mullo_epi8, _mm512_min_epi8, _mm512_max_epi8);
int_ops!(u8, 64, _mm512_add_epi8, _mm512_sub_epi8, mullo_epi8, _mm512_min_epu8, _mm512_max_epu8);
int_ops!(i16, 32, _mm512_add_epi16, _mm512_sub_epi16, _mm512_mullo_epi16, _mm512_min_epi16, _mm512_max_epi16);
int_ops!(u16, 32, _mm512_add_epi16, _mm512_sub_epi16, _mm512_mullo_epi16, _mm512_min_epu16, _mm512_max_epu16);
int_ops!(i32, 16, _mm512_add_epi32, _mm512_sub_epi32, _mm512_mullo_epi32, _mm512_min_epi32, _mm512_max_epi32);
int_ops!(u32, 16, _mm512_add_epi32, _mm512_sub_epi32, _mm512_mullo_epi32, _mm512_min_epu32, _mm512_max_epu32);
int_ops!(i64, 8, _mm512_add_epi64, _mm512_sub_epi64, _mm512_mullo_epi64, _mm512_min_epi64, _mm512_max_epi64);
int_ops!(u64, 8, _mm512_add_epi64, _mm512_sub_epi64, _mm512_mullo_epi64, _mm512_min_epu64, _mm512_max_epu64);

int_abs!(i8, _mm512_abs_epi8);
int_abs!(i16, _mm512_abs_epi16);
int_abs!(i32, _mm512_abs_epi32);
int_abs!(i64, _mm512_abs_epi64);

float_ops!(
    f32, __m512, 16,
    load: _mm512_load_ps, store: _mm512_store_ps, zero: _mm512_setzero_ps,
    add: _mm512_add_ps, sub: _mm512_sub_ps, mul: _mm512_mul_ps, min: _mm512_min_ps, max: _mm512_max_ps,
    abs: _mm512_abs_ps, div: _mm512_div_ps, sqrt: _mm512_sqrt_ps, rsqrt: _mm512_rsqrt14_ps,
    fmadd: _mm512_fmadd_ps, fmsub: _mm512_fmsub_ps, fnmadd: _mm512_fnmadd_ps
);

float_ops!(
    f64, __m512d, 8,
    load: _mm512_load_pd, store: _mm512_store_pd, zero: _mm512_setzero_pd,
    add: _mm512_add_pd, sub: _mm512_sub_pd, mul: _mm512_mul_pd, min: _mm512_min_pd, max: _mm512_max_pd,
    abs: _mm512_abs_pd, div: _mm512_div_pd, sqrt: _mm512_sqrt_pd, rsqrt: _mm512_rsqrt14_pd,
    fmadd: _mm512_fmadd_pd, fmsub: _mm512_fmsub_pd, fnmadd: _mm512_fnmadd_pd
);
