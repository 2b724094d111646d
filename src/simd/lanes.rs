/*!
 * Lane Widths
 * Compile-time lane counts per element type and register tier
 */

use super::element::{Element, ElementKind};
use crate::core::limits::{NARROW_REGISTER_BYTES, WIDE_REGISTER_BYTES};
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

pub use crate::core::limits::{NARROW_REGISTER_BITS, WIDE_REGISTER_BITS};

/// Vector register tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// 256-bit registers
    Narrow,
    /// 512-bit registers
    Wide,
}

impl Tier {
    pub const fn register_bytes(self) -> usize {
        match self {
            Self::Narrow => NARROW_REGISTER_BYTES,
            Self::Wide => WIDE_REGISTER_BYTES,
        }
    }
}

/// Lanes of `kind` in a 256-bit register
#[inline]
pub const fn narrow_lanes(kind: ElementKind) -> usize {
    NARROW_REGISTER_BYTES / kind.size()
}

/// Lanes of `kind` in a 512-bit register
#[inline]
pub const fn wide_lanes(kind: ElementKind) -> usize {
    WIDE_REGISTER_BYTES / kind.size()
}

/// Lanes of `kind` in a register of `tier`
#[inline]
pub const fn tier_lanes(kind: ElementKind, tier: Tier) -> usize {
    tier.register_bytes() / kind.size()
}

/// Lane counts of `T` as associated constants
///
/// ```
/// use spectra_stl::simd::LaneWidth;
///
/// assert_eq!(LaneWidth::<f32>::NARROW, 8);
/// assert_eq!(LaneWidth::<u8>::WIDE, 64);
/// ```
pub struct LaneWidth<T>(PhantomData<T>);

impl<T: Element> LaneWidth<T> {
    pub const NARROW: usize = narrow_lanes(T::KIND);
    pub const WIDE: usize = wide_lanes(T::KIND);
}

/// Lanes of an arbitrary type, 0 for types with no SIMD support
pub fn lanes_of<T: 'static>(tier: Tier) -> usize {
    ElementKind::of::<T>().map_or(0, |kind| tier_lanes(kind, tier))
}
