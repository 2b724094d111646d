/*!
 * Scalar Kernels
 * Portable tables, always available
 */

use super::kernel_tables;
use crate::simd::ops::Scalar;
use crate::simd::platform::Backend;

kernel_tables!(Scalar, Backend::Scalar);
