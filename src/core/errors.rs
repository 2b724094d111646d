/*!
 * Error Types
 * Unified error handling with thiserror, miette, and serde support
 */

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use crate::buffer::BufferError;
pub use crate::memory::MemoryError;
pub use crate::simd::SimdError;

/// Unified error type with miette diagnostics
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum SpectraError {
    #[error("SIMD error: {0}")]
    #[diagnostic(transparent)]
    Simd(#[from] SimdError),

    #[error("Memory error: {0}")]
    #[diagnostic(transparent)]
    Memory(#[from] MemoryError),

    #[error("Buffer error: {0}")]
    #[diagnostic(transparent)]
    Buffer(#[from] BufferError),
}

impl SpectraError {
    /// Stable snake_case category name
    pub fn error_type(&self) -> &'static str {
        match self {
            SpectraError::Simd(SimdError::SizeMismatch { .. }) => "size_mismatch",
            SpectraError::Simd(SimdError::TypeUnsupported { .. }) => "type_unsupported",
            SpectraError::Simd(SimdError::AlignmentViolation { .. })
            | SpectraError::Memory(MemoryError::AlignmentViolation { .. })
            | SpectraError::Memory(MemoryError::InvalidAlignment(_)) => "alignment_violation",
            SpectraError::Simd(SimdError::BackendUnavailable { .. }) => "backend_unavailable",
            SpectraError::Memory(MemoryError::AllocationExhausted { .. }) => "allocation_exhausted",
            SpectraError::Memory(_) => "memory_error",
            SpectraError::Buffer(BufferError::IndexOutOfRange { .. }) => "index_out_of_range",
            SpectraError::Buffer(BufferError::Memory(inner)) => {
                SpectraError::Memory(inner.clone()).error_type()
            }
        }
    }
}

/// Serializable error representation for reports and logs
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct SerializableError {
    pub error_type: String,
    pub message: String,
}

impl From<&SpectraError> for SerializableError {
    fn from(err: &SpectraError) -> Self {
        Self {
            error_type: err.error_type().to_string(),
            message: err.to_string(),
        }
    }
}

impl From<SpectraError> for SerializableError {
    fn from(err: SpectraError) -> Self {
        Self::from(&err)
    }
}

/// Result type for crate operations
pub type SpectraResult<T> = std::result::Result<T, SpectraError>;
