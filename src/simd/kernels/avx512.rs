/*!
 * Wide Kernels
 * 512-bit tables compiled for AVX-512 F/BW/DQ
 */

use super::kernel_tables;
use crate::simd::ops::Avx512;
use crate::simd::platform::Backend;

kernel_tables!(
    Avx512,
    Backend::Wide,
    #[target_feature(enable = "avx512f,avx512bw,avx512dq,fma")]
);
