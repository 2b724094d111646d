/*!
 * SIMD Types
 * Errors reported by batch operations
 */

use super::element::ElementKind;
use super::platform::Backend;
use miette::Diagnostic;
use thiserror::Error;

/// Batch operation result
pub type SimdResult<T> = Result<T, SimdError>;

/// Batch operation errors
///
/// Every check runs before the first write, so an error leaves all operands
/// untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum SimdError {
    #[error("Size mismatch in {operation}: expected {expected} elements, got {actual}")]
    #[diagnostic(
        code(simd::size_mismatch),
        help("Every operand of a batch operation must have the same length.")
    )]
    SizeMismatch {
        operation: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("{operation} is not supported for element type {kind}")]
    #[diagnostic(
        code(simd::type_unsupported),
        help("divide, sqrt and fmadd need f32/f64; abs needs a float or signed integer type.")
    )]
    TypeUnsupported {
        operation: &'static str,
        kind: ElementKind,
    },

    #[error("Operand of {operation} at 0x{address:x} is not aligned to {alignment} bytes for the {backend} backend")]
    #[diagnostic(
        code(simd::alignment_violation),
        help("Allocate operands through NumericBuffer or an allocator aligned to the register width.")
    )]
    AlignmentViolation {
        operation: &'static str,
        address: usize,
        alignment: usize,
        backend: Backend,
    },

    #[error("The {backend} backend is not available on this CPU")]
    #[diagnostic(
        code(simd::backend_unavailable),
        help("Use Batch::active() or one of SimdCapabilities::available_backends().")
    )]
    BackendUnavailable { backend: Backend },
}
