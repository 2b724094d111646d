/*!
 * Platform-specific SIMD Detection
 * Detects available instruction sets and maps them to backends
 */

use super::element::ElementKind;
use super::lanes::{tier_lanes, Tier};
use crate::core::limits::{
    DEFAULT_ALIGNMENT, NARROW_REGISTER_BYTES, SCALAR_REGISTER_BYTES, WIDE_REGISTER_BYTES,
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// SIMD capabilities available on the platform
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimdCapabilities {
    /// AVX2 support (x86_64)
    pub avx2: bool,
    /// FMA3 support (x86_64)
    pub fma: bool,
    /// AVX-512 Foundation (x86_64)
    pub avx512f: bool,
    /// AVX-512 Byte and Word (x86_64)
    pub avx512bw: bool,
    /// AVX-512 Doubleword and Quadword (x86_64)
    pub avx512dq: bool,
    /// NEON support (ARM); reported only, served by the scalar backend
    pub neon: bool,
}

impl SimdCapabilities {
    /// Narrow tier needs AVX2 plus FMA
    #[inline]
    pub fn has_narrow(&self) -> bool {
        cfg!(target_arch = "x86_64") && self.avx2 && self.fma
    }

    /// Wide tier needs F, BW and DQ, and the `avx512` feature compiled in
    #[inline]
    pub fn has_wide(&self) -> bool {
        cfg!(all(target_arch = "x86_64", feature = "avx512"))
            && self.avx512f
            && self.avx512bw
            && self.avx512dq
    }

    /// Whether `backend` can run on this CPU
    pub fn supports(&self, backend: Backend) -> bool {
        match backend {
            Backend::Scalar => true,
            Backend::Narrow => self.has_narrow(),
            Backend::Wide => self.has_wide(),
        }
    }

    /// Widest backend this CPU runs
    pub fn best_backend(&self) -> Backend {
        self.best_backend_up_to(Backend::Wide)
    }

    /// Widest available backend not wider than `cap`
    pub fn best_backend_up_to(&self, cap: Backend) -> Backend {
        Backend::ALL
            .into_iter()
            .rev()
            .find(|&b| b <= cap && self.supports(b))
            .unwrap_or(Backend::Scalar)
    }

    /// Every backend this CPU runs, narrowest first
    pub fn available_backends(&self) -> Vec<Backend> {
        Backend::ALL
            .into_iter()
            .filter(|&b| self.supports(b))
            .collect()
    }

    /// Register size of the widest backend
    pub fn max_vector_bytes(&self) -> usize {
        self.best_backend().register_bytes()
    }
}

/// Detect available SIMD instruction sets
pub fn detect_simd_support() -> SimdCapabilities {
    #[cfg(target_arch = "x86_64")]
    {
        SimdCapabilities {
            avx2: is_x86_feature_detected!("avx2"),
            fma: is_x86_feature_detected!("fma"),
            avx512f: is_x86_feature_detected!("avx512f"),
            avx512bw: is_x86_feature_detected!("avx512bw"),
            avx512dq: is_x86_feature_detected!("avx512dq"),
            neon: false,
        }
    }

    #[cfg(target_arch = "aarch64")]
    {
        SimdCapabilities {
            neon: std::arch::is_aarch64_feature_detected!("neon"),
            ..Default::default()
        }
    }

    #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
    {
        SimdCapabilities::default()
    }
}

/// Execution backend, ordered narrowest to widest
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Portable one-lane fallback
    Scalar,
    /// 256-bit registers (AVX2 + FMA)
    Narrow,
    /// 512-bit registers (AVX-512 F/BW/DQ)
    Wide,
}

impl Backend {
    pub const ALL: [Backend; 3] = [Self::Scalar, Self::Narrow, Self::Wide];

    /// Register tier, `None` for the scalar backend
    pub const fn tier(self) -> Option<Tier> {
        match self {
            Self::Scalar => None,
            Self::Narrow => Some(Tier::Narrow),
            Self::Wide => Some(Tier::Wide),
        }
    }

    pub const fn register_bytes(self) -> usize {
        match self {
            Self::Scalar => SCALAR_REGISTER_BYTES,
            Self::Narrow => NARROW_REGISTER_BYTES,
            Self::Wide => WIDE_REGISTER_BYTES,
        }
    }

    /// Lanes of `kind` processed per vector step
    pub const fn lanes(self, kind: ElementKind) -> usize {
        match self.tier() {
            Some(tier) => tier_lanes(kind, tier),
            None => 1,
        }
    }

    /// Alignment batch operands must satisfy on this backend
    ///
    /// The scalar backend only needs natural element alignment.
    pub const fn operand_alignment(self, kind: ElementKind) -> usize {
        match self {
            Self::Scalar => kind.size(),
            _ => self.register_bytes(),
        }
    }

    /// Alignment numeric buffers guarantee when this backend is active
    pub const fn buffer_alignment(self) -> usize {
        let bytes = self.register_bytes();
        if bytes > DEFAULT_ALIGNMENT {
            bytes
        } else {
            DEFAULT_ALIGNMENT
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Scalar => "scalar",
            Self::Narrow => "narrow",
            Self::Wide => "wide",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
