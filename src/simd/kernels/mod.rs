/*!
 * Kernel Dispatch Tables
 *
 * One static table per (backend, element type). Each entry is a thin
 * wrapper compiled with the backend's target features around a generic loop
 * kernel. Operations a type does not support are `None`.
 */

pub(crate) mod generic;
pub(crate) mod scalar;

#[cfg(target_arch = "x86_64")]
pub(crate) mod avx2;

#[cfg(all(target_arch = "x86_64", feature = "avx512"))]
pub(crate) mod avx512;

use super::platform::Backend;

/// `dest[i] = dest[i] op src[i]`
pub(crate) type BinaryKernel<T> = unsafe fn(dest: *mut T, src: *const T, len: usize);

/// `dest[i] = op(dest[i])`
pub(crate) type UnaryKernel<T> = unsafe fn(dest: *mut T, len: usize);

/// `dest[i] = a[i] * b[i] + dest[i]`
pub(crate) type TernaryKernel<T> = unsafe fn(dest: *mut T, a: *const T, b: *const T, len: usize);

pub(crate) type DotKernel<T> = unsafe fn(a: *const T, b: *const T, len: usize) -> T;

/// Kernels of one backend for one element type
pub struct KernelTable<T: 'static> {
    pub(crate) backend: Backend,
    pub(crate) lanes: usize,
    pub(crate) add: BinaryKernel<T>,
    pub(crate) sub: BinaryKernel<T>,
    pub(crate) mul: BinaryKernel<T>,
    pub(crate) min: BinaryKernel<T>,
    pub(crate) max: BinaryKernel<T>,
    pub(crate) div: Option<BinaryKernel<T>>,
    pub(crate) abs: Option<UnaryKernel<T>>,
    pub(crate) sqrt: Option<UnaryKernel<T>>,
    pub(crate) fmadd: Option<TernaryKernel<T>>,
    pub(crate) dot: DotKernel<T>,
}

/// Build the ten static tables of one backend
///
/// Every wrapper carries the given attributes (the backend's
/// `#[target_feature]`), so the inlined generic loop and the register
/// operations compile for that instruction set.
macro_rules! kernel_tables {
    (@common $backend:ty, $t:ty $(, #[$feat:meta])*) => {
        $(#[$feat])*
        unsafe fn add(d: *mut $t, s: *const $t, n: usize) {
            $crate::simd::kernels::generic::add::<$t, $backend>(d, s, n)
        }
        $(#[$feat])*
        unsafe fn sub(d: *mut $t, s: *const $t, n: usize) {
            $crate::simd::kernels::generic::sub::<$t, $backend>(d, s, n)
        }
        $(#[$feat])*
        unsafe fn mul(d: *mut $t, s: *const $t, n: usize) {
            $crate::simd::kernels::generic::mul::<$t, $backend>(d, s, n)
        }
        $(#[$feat])*
        unsafe fn min(d: *mut $t, s: *const $t, n: usize) {
            $crate::simd::kernels::generic::min::<$t, $backend>(d, s, n)
        }
        $(#[$feat])*
        unsafe fn max(d: *mut $t, s: *const $t, n: usize) {
            $crate::simd::kernels::generic::max::<$t, $backend>(d, s, n)
        }
    };

    (@abs $backend:ty, $t:ty $(, #[$feat:meta])*) => {
        $(#[$feat])*
        unsafe fn abs(d: *mut $t, n: usize) {
            $crate::simd::kernels::generic::abs::<$t, $backend>(d, n)
        }
    };

    (@float $backend:ty, $tier:expr, $t:ty, $table:ident $(, #[$feat:meta])*) => {
        pub(crate) static $table: $crate::simd::kernels::KernelTable<$t> = {
            kernel_tables!(@common $backend, $t $(, #[$feat])*);
            kernel_tables!(@abs $backend, $t $(, #[$feat])*);
            $(#[$feat])*
            unsafe fn div(d: *mut $t, s: *const $t, n: usize) {
                $crate::simd::kernels::generic::div::<$t, $backend>(d, s, n)
            }
            $(#[$feat])*
            unsafe fn sqrt(d: *mut $t, n: usize) {
                $crate::simd::kernels::generic::sqrt::<$t, $backend>(d, n)
            }
            $(#[$feat])*
            unsafe fn fmadd(d: *mut $t, a: *const $t, b: *const $t, n: usize) {
                $crate::simd::kernels::generic::fmadd::<$t, $backend>(d, a, b, n)
            }
            $(#[$feat])*
            unsafe fn dot(a: *const $t, b: *const $t, n: usize) -> $t {
                $crate::simd::kernels::generic::dot_fused::<$t, $backend>(a, b, n)
            }
            $crate::simd::kernels::KernelTable {
                backend: $tier,
                lanes: <$backend as $crate::simd::ops::VectorOps<$t>>::LANES,
                add,
                sub,
                mul,
                min,
                max,
                div: Some(div),
                abs: Some(abs),
                sqrt: Some(sqrt),
                fmadd: Some(fmadd),
                dot,
            }
        };
    };

    (@signed $backend:ty, $tier:expr, $t:ty, $table:ident $(, #[$feat:meta])*) => {
        pub(crate) static $table: $crate::simd::kernels::KernelTable<$t> = {
            kernel_tables!(@common $backend, $t $(, #[$feat])*);
            kernel_tables!(@abs $backend, $t $(, #[$feat])*);
            $(#[$feat])*
            unsafe fn dot(a: *const $t, b: *const $t, n: usize) -> $t {
                $crate::simd::kernels::generic::dot_wrapping::<$t, $backend>(a, b, n)
            }
            $crate::simd::kernels::KernelTable {
                backend: $tier,
                lanes: <$backend as $crate::simd::ops::VectorOps<$t>>::LANES,
                add,
                sub,
                mul,
                min,
                max,
                div: None,
                abs: Some(abs),
                sqrt: None,
                fmadd: None,
                dot,
            }
        };
    };

    (@unsigned $backend:ty, $tier:expr, $t:ty, $table:ident $(, #[$feat:meta])*) => {
        pub(crate) static $table: $crate::simd::kernels::KernelTable<$t> = {
            kernel_tables!(@common $backend, $t $(, #[$feat])*);
            $(#[$feat])*
            unsafe fn dot(a: *const $t, b: *const $t, n: usize) -> $t {
                $crate::simd::kernels::generic::dot_wrapping::<$t, $backend>(a, b, n)
            }
            $crate::simd::kernels::KernelTable {
                backend: $tier,
                lanes: <$backend as $crate::simd::ops::VectorOps<$t>>::LANES,
                add,
                sub,
                mul,
                min,
                max,
                div: None,
                abs: None,
                sqrt: None,
                fmadd: None,
                dot,
            }
        };
    };

    ($backend:ty, $tier:expr $(, #[$feat:meta])*) => {
        kernel_tables!(@float $backend, $tier, f32, F32 $(, #[$feat])*);
        kernel_tables!(@float $backend, $tier, f64, F64 $(, #[$feat])*);
        kernel_tables!(@signed $backend, $tier, i8, I8 $(, #[$feat])*);
        kernel_tables!(@signed $backend, $tier, i16, I16 $(, #[$feat])*);
        kernel_tables!(@signed $backend, $tier, i32, I32 $(, #[$feat])*);
        kernel_tables!(@signed $backend, $tier, i64, I64 $(, #[$feat])*);
        kernel_tables!(@unsigned $backend, $tier, u8, U8 $(, #[$feat])*);
        kernel_tables!(@unsigned $backend, $tier, u16, U16 $(, #[$feat])*);
        kernel_tables!(@unsigned $backend, $tier, u32, U32 $(, #[$feat])*);
        kernel_tables!(@unsigned $backend, $tier, u64, U64 $(, #[$feat])*);
    };
}

pub(crate) use kernel_tables;
