/*!
 * SIMD Configuration
 * Environment override for backend selection
 */

use super::platform::{Backend, SimdCapabilities};
use serde::{Deserialize, Serialize};

/// Environment variable capping the backend: `auto`, `scalar`, `narrow`, `wide`
pub const BACKEND_ENV: &str = "SPECTRA_SIMD_BACKEND";

/// Requested backend ceiling
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendPreference {
    /// Widest available backend
    #[default]
    Auto,
    Scalar,
    Narrow,
    Wide,
}

impl BackendPreference {
    /// Parse a preference, case-insensitive; `None` for unknown values
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "auto" => Some(Self::Auto),
            "scalar" => Some(Self::Scalar),
            "narrow" | "avx2" => Some(Self::Narrow),
            "wide" | "avx512" => Some(Self::Wide),
            _ => None,
        }
    }

    /// Widest backend this preference allows
    pub const fn cap(self) -> Backend {
        match self {
            Self::Auto | Self::Wide => Backend::Wide,
            Self::Narrow => Backend::Narrow,
            Self::Scalar => Backend::Scalar,
        }
    }
}

/// Backend selection settings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimdConfig {
    pub preference: BackendPreference,
}

impl SimdConfig {
    /// Read `SPECTRA_SIMD_BACKEND`
    pub fn from_env() -> Self {
        Self::from_value(std::env::var(BACKEND_ENV).ok().as_deref())
    }

    /// Build from a raw setting; unknown values fall back to `auto`
    pub fn from_value(value: Option<&str>) -> Self {
        let preference = match value {
            None => BackendPreference::Auto,
            Some(raw) => BackendPreference::parse(raw).unwrap_or_else(|| {
                tracing::warn!(
                    variable = BACKEND_ENV,
                    value = raw,
                    "Unknown SIMD backend, using auto"
                );
                BackendPreference::Auto
            }),
        };
        Self { preference }
    }

    /// Widest backend the CPU supports within the configured cap
    pub fn select(&self, caps: &SimdCapabilities) -> Backend {
        caps.best_backend_up_to(self.preference.cap())
    }
}
