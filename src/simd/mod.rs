/*!
 * SIMD Numeric Operations
 *
 * Width-adaptive arithmetic over numeric slices with a portable scalar
 * fallback, a 256-bit tier (AVX2 + FMA) and a 512-bit tier
 * (AVX-512 F/BW/DQ). The CPU is probed once; the widest supported backend
 * not above the `SPECTRA_SIMD_BACKEND` cap serves every batch operation.
 */

mod element;
mod kernels;
mod lanes;
mod ops;
mod platform;

pub mod batch;
pub mod config;
pub mod types;

// Element model
pub use element::{Element, ElementKind, FloatElement, SignedElement};

// Lane widths
pub use lanes::{lanes_of, narrow_lanes, tier_lanes, wide_lanes, LaneWidth, Tier};
pub use lanes::{NARROW_REGISTER_BITS, WIDE_REGISTER_BITS};

// Operation catalog
#[cfg(target_arch = "x86_64")]
pub use ops::Avx2;
#[cfg(all(target_arch = "x86_64", feature = "avx512"))]
pub use ops::Avx512;
pub use ops::{Scalar, VectorAbs, VectorFloat, VectorOps};

// CPU detection
pub use platform::{detect_simd_support, Backend, SimdCapabilities};

// Batch operations
pub use batch::{
    abs, add, divide, dot_product, fmadd, max, min, multiply, sqrt, subtract, Batch,
};
pub use config::{BackendPreference, SimdConfig, BACKEND_ENV};
pub use types::{SimdError, SimdResult};

use std::sync::OnceLock;

/// Global SIMD capabilities
static SIMD_CAPS: OnceLock<SimdCapabilities> = OnceLock::new();

/// Backend chosen at startup
static ACTIVE_BACKEND: OnceLock<Backend> = OnceLock::new();

/// Initialize SIMD capabilities detection and backend selection
pub fn init_simd() -> &'static SimdCapabilities {
    let caps = SIMD_CAPS.get_or_init(|| {
        let caps = platform::detect_simd_support();
        tracing::info!(
            avx2 = caps.avx2,
            fma = caps.fma,
            avx512f = caps.avx512f,
            avx512bw = caps.avx512bw,
            avx512dq = caps.avx512dq,
            neon = caps.neon,
            max_vector_bytes = caps.max_vector_bytes(),
            "SIMD capabilities detected"
        );
        caps
    });
    active_backend();
    caps
}

/// Get SIMD capabilities
pub fn capabilities() -> &'static SimdCapabilities {
    SIMD_CAPS.get_or_init(platform::detect_simd_support)
}

/// Backend used by the free batch functions and [`Batch::active`]
pub fn active_backend() -> Backend {
    *ACTIVE_BACKEND.get_or_init(|| {
        let config = SimdConfig::from_env();
        let caps = capabilities();
        let backend = config.select(caps);
        tracing::info!(
            backend = %backend,
            preference = ?config.preference,
            register_bytes = backend.register_bytes(),
            "SIMD backend selected"
        );
        backend
    })
}
