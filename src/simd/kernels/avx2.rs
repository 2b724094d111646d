/*!
 * Narrow Kernels
 * 256-bit tables compiled for AVX2 + FMA
 */

use super::kernel_tables;
use crate::simd::ops::Avx2;
use crate::simd::platform::Backend;

kernel_tables!(Avx2, Backend::Narrow, #[target_feature(enable = "avx2,fma")]);
