/*!
 * Vector Operation Catalog
 *
 * Per-backend register operations. One marker type per backend implements
 * the catalog for every element type it handles; capabilities a type lacks
 * (integer division, unsigned abs) are simply missing impls, so asking for
 * them does not type-check.
 *
 * All methods are `unsafe`: the caller guarantees the CPU supports the
 * backend's instruction set, and loads/stores require register-aligned
 * pointers.
 */

mod scalar;

#[cfg(target_arch = "x86_64")]
mod avx2;

#[cfg(all(target_arch = "x86_64", feature = "avx512"))]
mod avx512;

use super::element::Element;

/// Portable one-lane backend
#[derive(Debug, Clone, Copy, Default)]
pub struct Scalar;

/// 256-bit backend (AVX2 + FMA)
#[cfg(target_arch = "x86_64")]
#[derive(Debug, Clone, Copy, Default)]
pub struct Avx2;

/// 512-bit backend (AVX-512 F/BW/DQ)
#[cfg(all(target_arch = "x86_64", feature = "avx512"))]
#[derive(Debug, Clone, Copy, Default)]
pub struct Avx512;

/// Core register operations available for every element type
pub trait VectorOps<T: Element> {
    /// Register holding `LANES` elements
    type Reg: Copy;

    /// Elements per register
    const LANES: usize;

    /// Aligned load of `LANES` elements
    ///
    /// # Safety
    /// `ptr` must be aligned to the register width and valid for `LANES` reads.
    unsafe fn load(ptr: *const T) -> Self::Reg;

    /// Aligned store of `LANES` elements
    ///
    /// # Safety
    /// `ptr` must be aligned to the register width and valid for `LANES` writes.
    unsafe fn store(ptr: *mut T, v: Self::Reg);

    /// # Safety
    /// CPU must support the backend.
    unsafe fn zero() -> Self::Reg;

    /// Lane-wise `a + b` (wrapping for integers)
    ///
    /// # Safety
    /// CPU must support the backend.
    unsafe fn add(a: Self::Reg, b: Self::Reg) -> Self::Reg;

    /// # Safety
    /// CPU must support the backend.
    unsafe fn sub(a: Self::Reg, b: Self::Reg) -> Self::Reg;

    /// Lane-wise product, low bits kept for integers
    ///
    /// # Safety
    /// CPU must support the backend.
    unsafe fn mul(a: Self::Reg, b: Self::Reg) -> Self::Reg;

    /// Lane-wise `a < b ? a : b`
    ///
    /// # Safety
    /// CPU must support the backend.
    unsafe fn min(a: Self::Reg, b: Self::Reg) -> Self::Reg;

    /// Lane-wise `a > b ? a : b`
    ///
    /// # Safety
    /// CPU must support the backend.
    unsafe fn max(a: Self::Reg, b: Self::Reg) -> Self::Reg;
}

/// Absolute value, floats and signed integers only
pub trait VectorAbs<T: Element>: VectorOps<T> {
    /// # Safety
    /// CPU must support the backend.
    unsafe fn abs(a: Self::Reg) -> Self::Reg;
}

/// Floating-point operations
pub trait VectorFloat<T: Element>: VectorAbs<T> {
    /// # Safety
    /// CPU must support the backend.
    unsafe fn div(a: Self::Reg, b: Self::Reg) -> Self::Reg;

    /// # Safety
    /// CPU must support the backend.
    unsafe fn sqrt(a: Self::Reg) -> Self::Reg;

    /// Approximate `1 / sqrt(a)`; precision depends on the backend
    ///
    /// # Safety
    /// CPU must support the backend.
    unsafe fn rsqrt(a: Self::Reg) -> Self::Reg;

    /// Fused `a * b + c`
    ///
    /// # Safety
    /// CPU must support the backend.
    unsafe fn fmadd(a: Self::Reg, b: Self::Reg, c: Self::Reg) -> Self::Reg;

    /// Fused `a * b - c`
    ///
    /// # Safety
    /// CPU must support the backend.
    unsafe fn fmsub(a: Self::Reg, b: Self::Reg, c: Self::Reg) -> Self::Reg;

    /// Fused `c - a * b`
    ///
    /// # Safety
    /// CPU must support the backend.
    unsafe fn fnmadd(a: Self::Reg, b: Self::Reg, c: Self::Reg) -> Self::Reg;
}
