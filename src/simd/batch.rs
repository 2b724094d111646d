/*!
 * Batch Operations
 *
 * Element-wise arithmetic, reductions and fused multiply-add over whole
 * buffers. Each call runs `floor(n / L) * L` elements through the selected
 * backend's registers and the remaining `n mod L` through the identical
 * scalar lane operation, so results match a per-element loop exactly
 * (dot products excepted, see [`Batch::dot_product`]).
 *
 * Operands are plain slices; `NumericBuffer` dereferences to one. Every
 * check (element type, lengths, register alignment) runs before the first
 * write, so an error leaves all operands unchanged.
 */

use super::element::{sealed::Sealed, Element};
use super::kernels::{BinaryKernel, KernelTable};
use super::platform::Backend;
use super::types::{SimdError, SimdResult};
use crate::monitoring::span_operation;

/// Batch executor bound to one backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Batch {
    backend: Backend,
}

impl Batch {
    /// Executor on the backend selected at startup
    pub fn active() -> Self {
        Self {
            backend: super::active_backend(),
        }
    }

    /// Executor on an explicit backend
    ///
    /// Fails with `BackendUnavailable` when the CPU (or the build) lacks it.
    pub fn on(backend: Backend) -> SimdResult<Self> {
        if super::capabilities().supports(backend) {
            Ok(Self { backend })
        } else {
            Err(SimdError::BackendUnavailable { backend })
        }
    }

    #[inline]
    pub fn backend(&self) -> Backend {
        self.backend
    }

    /// Elements of `T` per vector step
    #[inline]
    pub fn lanes<T: Element>(&self) -> usize {
        self.table::<T>().lanes
    }

    // =========================================================================
    // CHECKS
    // =========================================================================

    #[inline]
    fn table<T: Element>(&self) -> &'static KernelTable<T> {
        let table = <T as Sealed>::kernels(self.backend);
        debug_assert_eq!(table.backend, self.backend, "kernel table for the wrong backend");
        table
    }

    fn check_aligned<T: Element>(&self, operation: &'static str, operand: &[T]) -> SimdResult<()> {
        if operand.is_empty() {
            return Ok(());
        }
        let alignment = self.backend.operand_alignment(T::KIND);
        let address = operand.as_ptr() as usize;
        if address % alignment != 0 {
            return Err(SimdError::AlignmentViolation {
                operation,
                address,
                alignment,
                backend: self.backend,
            });
        }
        Ok(())
    }

    fn check_len(operation: &'static str, expected: usize, actual: usize) -> SimdResult<()> {
        if expected != actual {
            return Err(SimdError::SizeMismatch {
                operation,
                expected,
                actual,
            });
        }
        Ok(())
    }

    fn unsupported<T: Element>(operation: &'static str) -> SimdError {
        SimdError::TypeUnsupported {
            operation,
            kind: T::KIND,
        }
    }

    fn traced<R>(
        &self,
        operation: &'static str,
        elements: usize,
        run: impl FnOnce() -> SimdResult<R>,
    ) -> SimdResult<R> {
        let span = span_operation(operation, self.backend.name(), elements);
        let _entered = span.enter();
        let result = run();
        match &result {
            Ok(_) => span.record_result(true),
            Err(e) => span.record_error(e),
        }
        result
    }

    fn binary<T: Element>(
        &self,
        operation: &'static str,
        dest: &mut [T],
        src: &[T],
        kernel: BinaryKernel<T>,
    ) -> SimdResult<()> {
        self.traced(operation, dest.len(), || {
            Self::check_len(operation, dest.len(), src.len())?;
            self.check_aligned(operation, dest)?;
            self.check_aligned(operation, src)?;
            // Safety: backend verified available, lengths equal, operands aligned
            unsafe { kernel(dest.as_mut_ptr(), src.as_ptr(), dest.len()) };
            Ok(())
        })
    }

    // =========================================================================
    // OPERATIONS
    // =========================================================================

    /// `dest[i] = dest[i] + src[i]`, wrapping for integers
    pub fn add<T: Element>(&self, dest: &mut [T], src: &[T]) -> SimdResult<()> {
        self.binary("add", dest, src, self.table::<T>().add)
    }

    /// `dest[i] = dest[i] - src[i]`, wrapping for integers
    pub fn subtract<T: Element>(&self, dest: &mut [T], src: &[T]) -> SimdResult<()> {
        self.binary("subtract", dest, src, self.table::<T>().sub)
    }

    /// `dest[i] = dest[i] * src[i]`, low bits for integers
    pub fn multiply<T: Element>(&self, dest: &mut [T], src: &[T]) -> SimdResult<()> {
        self.binary("multiply", dest, src, self.table::<T>().mul)
    }

    /// `dest[i] = dest[i] < src[i] ? dest[i] : src[i]`
    pub fn min<T: Element>(&self, dest: &mut [T], src: &[T]) -> SimdResult<()> {
        self.binary("min", dest, src, self.table::<T>().min)
    }

    /// `dest[i] = dest[i] > src[i] ? dest[i] : src[i]`
    pub fn max<T: Element>(&self, dest: &mut [T], src: &[T]) -> SimdResult<()> {
        self.binary("max", dest, src, self.table::<T>().max)
    }

    /// `dest[i] = dest[i] / src[i]`, floats only
    pub fn divide<T: Element>(&self, dest: &mut [T], src: &[T]) -> SimdResult<()> {
        let kernel = self.table::<T>().div.ok_or_else(|| Self::unsupported::<T>("divide"))?;
        self.binary("divide", dest, src, kernel)
    }

    /// `dest[i] = |dest[i]|`, floats and signed integers only
    ///
    /// Signed integer `MIN` stays `MIN`.
    pub fn abs<T: Element>(&self, dest: &mut [T]) -> SimdResult<()> {
        let kernel = self.table::<T>().abs.ok_or_else(|| Self::unsupported::<T>("abs"))?;
        self.traced("abs", dest.len(), || {
            self.check_aligned("abs", dest)?;
            // Safety: backend verified available, operand aligned
            unsafe { kernel(dest.as_mut_ptr(), dest.len()) };
            Ok(())
        })
    }

    /// `dest[i] = sqrt(dest[i])`, floats only
    pub fn sqrt<T: Element>(&self, dest: &mut [T]) -> SimdResult<()> {
        let kernel = self.table::<T>().sqrt.ok_or_else(|| Self::unsupported::<T>("sqrt"))?;
        self.traced("sqrt", dest.len(), || {
            self.check_aligned("sqrt", dest)?;
            // Safety: backend verified available, operand aligned
            unsafe { kernel(dest.as_mut_ptr(), dest.len()) };
            Ok(())
        })
    }

    /// Sum of `a[i] * b[i]`
    ///
    /// Floats accumulate with fused multiply-add into one register, reduce
    /// its lanes left to right once, then add the remainder products one at
    /// a time. The grouping therefore depends on the backend's lane count.
    /// Integers accumulate in the element width, wrapping.
    pub fn dot_product<T: Element>(&self, a: &[T], b: &[T]) -> SimdResult<T> {
        let kernel = self.table::<T>().dot;
        self.traced("dot_product", a.len(), || {
            Self::check_len("dot_product", a.len(), b.len())?;
            self.check_aligned("dot_product", a)?;
            self.check_aligned("dot_product", b)?;
            // Safety: backend verified available, lengths equal, operands aligned
            Ok(unsafe { kernel(a.as_ptr(), b.as_ptr(), a.len()) })
        })
    }

    /// `dest[i] = a[i] * b[i] + dest[i]` with one rounding, floats only
    pub fn fmadd<T: Element>(&self, dest: &mut [T], a: &[T], b: &[T]) -> SimdResult<()> {
        let kernel = self.table::<T>().fmadd.ok_or_else(|| Self::unsupported::<T>("fmadd"))?;
        self.traced("fmadd", dest.len(), || {
            Self::check_len("fmadd", dest.len(), a.len())?;
            Self::check_len("fmadd", dest.len(), b.len())?;
            self.check_aligned("fmadd", dest)?;
            self.check_aligned("fmadd", a)?;
            self.check_aligned("fmadd", b)?;
            // Safety: backend verified available, lengths equal, operands aligned
            unsafe { kernel(dest.as_mut_ptr(), a.as_ptr(), b.as_ptr(), dest.len()) };
            Ok(())
        })
    }
}

impl Default for Batch {
    fn default() -> Self {
        Self::active()
    }
}

// =============================================================================
// ACTIVE-BACKEND SHORTHANDS
// =============================================================================

/// [`Batch::add`] on the active backend
pub fn add<T: Element>(dest: &mut [T], src: &[T]) -> SimdResult<()> {
    Batch::active().add(dest, src)
}

/// [`Batch::subtract`] on the active backend
pub fn subtract<T: Element>(dest: &mut [T], src: &[T]) -> SimdResult<()> {
    Batch::active().subtract(dest, src)
}

/// [`Batch::multiply`] on the active backend
pub fn multiply<T: Element>(dest: &mut [T], src: &[T]) -> SimdResult<()> {
    Batch::active().multiply(dest, src)
}

/// [`Batch::min`] on the active backend
pub fn min<T: Element>(dest: &mut [T], src: &[T]) -> SimdResult<()> {
    Batch::active().min(dest, src)
}

/// [`Batch::max`] on the active backend
pub fn max<T: Element>(dest: &mut [T], src: &[T]) -> SimdResult<()> {
    Batch::active().max(dest, src)
}

/// [`Batch::divide`] on the active backend
pub fn divide<T: Element>(dest: &mut [T], src: &[T]) -> SimdResult<()> {
    Batch::active().divide(dest, src)
}

/// [`Batch::abs`] on the active backend
pub fn abs<T: Element>(dest: &mut [T]) -> SimdResult<()> {
    Batch::active().abs(dest)
}

/// [`Batch::sqrt`] on the active backend
pub fn sqrt<T: Element>(dest: &mut [T]) -> SimdResult<()> {
    Batch::active().sqrt(dest)
}

/// [`Batch::dot_product`] on the active backend
pub fn dot_product<T: Element>(a: &[T], b: &[T]) -> SimdResult<T> {
    Batch::active().dot_product(a, b)
}

/// [`Batch::fmadd`] on the active backend
pub fn fmadd<T: Element>(dest: &mut [T], a: &[T], b: &[T]) -> SimdResult<()> {
    Batch::active().fmadd(dest, a, b)
}
