/*!
 * Element Types
 * Numeric lane types accepted by buffers and batch operations
 *
 * The scalar lane methods define the exact per-element result every backend
 * must reproduce: integer arithmetic wraps, `min` is `a < b ? a : b` and
 * `max` is `a > b ? a : b` (matching the x86 min/max instructions, NaN
 * included).
 */

use super::kernels::{self, KernelTable};
use super::platform::Backend;
use serde::{Deserialize, Serialize};
use std::any::TypeId;
use std::fmt;

pub(crate) mod sealed {
    use super::{Backend, KernelTable};

    pub trait Sealed: Sized + 'static {
        /// Kernel table of a backend the caller has verified is available
        fn kernels(backend: Backend) -> &'static KernelTable<Self>;
    }
}

/// Runtime tag for the supported element types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    F32,
    F64,
    I8,
    I16,
    I32,
    I64,
    U8,
    U16,
    U32,
    U64,
}

impl ElementKind {
    pub const ALL: [ElementKind; 10] = [
        Self::F32,
        Self::F64,
        Self::I8,
        Self::I16,
        Self::I32,
        Self::I64,
        Self::U8,
        Self::U16,
        Self::U32,
        Self::U64,
    ];

    /// Size of one element in bytes
    pub const fn size(self) -> usize {
        match self {
            Self::I8 | Self::U8 => 1,
            Self::I16 | Self::U16 => 2,
            Self::F32 | Self::I32 | Self::U32 => 4,
            Self::F64 | Self::I64 | Self::U64 => 8,
        }
    }

    pub const fn is_float(self) -> bool {
        matches!(self, Self::F32 | Self::F64)
    }

    /// Floats and signed integers
    pub const fn is_signed(self) -> bool {
        !matches!(self, Self::U8 | Self::U16 | Self::U32 | Self::U64)
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::I8 => "i8",
            Self::I16 => "i16",
            Self::I32 => "i32",
            Self::I64 => "i64",
            Self::U8 => "u8",
            Self::U16 => "u16",
            Self::U32 => "u32",
            Self::U64 => "u64",
        }
    }

    /// Kind of an arbitrary type, `None` when it is not a supported element
    pub fn of<T: 'static>() -> Option<Self> {
        let id = TypeId::of::<T>();
        Self::ALL.into_iter().find(|kind| kind.type_id() == id)
    }

    fn type_id(self) -> TypeId {
        match self {
            Self::F32 => TypeId::of::<f32>(),
            Self::F64 => TypeId::of::<f64>(),
            Self::I8 => TypeId::of::<i8>(),
            Self::I16 => TypeId::of::<i16>(),
            Self::I32 => TypeId::of::<i32>(),
            Self::I64 => TypeId::of::<i64>(),
            Self::U8 => TypeId::of::<u8>(),
            Self::U16 => TypeId::of::<u16>(),
            Self::U32 => TypeId::of::<u32>(),
            Self::U64 => TypeId::of::<u64>(),
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Numeric lane type: `f32`, `f64`, `i8`..`i64`, `u8`..`u64`
///
/// Sealed; the set of element types is closed.
pub trait Element:
    sealed::Sealed + Copy + PartialEq + PartialOrd + Default + fmt::Debug + Send + Sync
{
    const KIND: ElementKind;
    const ZERO: Self;

    fn lane_add(self, rhs: Self) -> Self;
    fn lane_sub(self, rhs: Self) -> Self;
    fn lane_mul(self, rhs: Self) -> Self;
    fn lane_min(self, rhs: Self) -> Self;
    fn lane_max(self, rhs: Self) -> Self;
}

/// Element types with a meaningful absolute value (floats and signed integers)
pub trait SignedElement: Element {
    /// Absolute value; `MIN` of a signed integer maps to itself
    fn lane_abs(self) -> Self;
}

/// Floating-point element types
pub trait FloatElement: SignedElement {
    const ONE: Self;

    fn lane_div(self, rhs: Self) -> Self;
    fn lane_sqrt(self) -> Self;
    fn lane_neg(self) -> Self;
    /// `self * b + c` with a single rounding
    fn lane_fma(self, b: Self, c: Self) -> Self;
}

macro_rules! impl_sealed {
    ($t:ty, $table:ident) => {
        impl sealed::Sealed for $t {
            #[inline]
            fn kernels(backend: Backend) -> &'static KernelTable<Self> {
                match backend {
                    #[cfg(all(target_arch = "x86_64", feature = "avx512"))]
                    Backend::Wide => &kernels::avx512::$table,
                    #[cfg(target_arch = "x86_64")]
                    Backend::Narrow => &kernels::avx2::$table,
                    #[allow(unreachable_patterns)]
                    _ => &kernels::scalar::$table,
                }
            }
        }
    };
}

macro_rules! impl_float {
    ($t:ty, $kind:ident, $table:ident) => {
        impl_sealed!($t, $table);

        impl Element for $t {
            const KIND: ElementKind = ElementKind::$kind;
            const ZERO: Self = 0.0;

            #[inline(always)]
            fn lane_add(self, rhs: Self) -> Self {
                self + rhs
            }
            #[inline(always)]
            fn lane_sub(self, rhs: Self) -> Self {
                self - rhs
            }
            #[inline(always)]
            fn lane_mul(self, rhs: Self) -> Self {
                self * rhs
            }
            #[inline(always)]
            fn lane_min(self, rhs: Self) -> Self {
                if self < rhs {
                    self
                } else {
                    rhs
                }
            }
            #[inline(always)]
            fn lane_max(self, rhs: Self) -> Self {
                if self > rhs {
                    self
                } else {
                    rhs
                }
            }
        }

        impl SignedElement for $t {
            #[inline(always)]
            fn lane_abs(self) -> Self {
                self.abs()
            }
        }

        impl FloatElement for $t {
            const ONE: Self = 1.0;

            #[inline(always)]
            fn lane_div(self, rhs: Self) -> Self {
                self / rhs
            }
            #[inline(always)]
            fn lane_sqrt(self) -> Self {
                self.sqrt()
            }
            #[inline(always)]
            fn lane_neg(self) -> Self {
                -self
            }
            #[inline(always)]
            fn lane_fma(self, b: Self, c: Self) -> Self {
                self.mul_add(b, c)
            }
        }
    };
}

macro_rules! impl_int {
    ($t:ty, $kind:ident, $table:ident) => {
        impl_sealed!($t, $table);

        impl Element for $t {
            const KIND: ElementKind = ElementKind::$kind;
            const ZERO: Self = 0;

            #[inline(always)]
            fn lane_add(self, rhs: Self) -> Self {
                self.wrapping_add(rhs)
            }
            #[inline(always)]
            fn lane_sub(self, rhs: Self) -> Self {
                self.wrapping_sub(rhs)
            }
            #[inline(always)]
            fn lane_mul(self, rhs: Self) -> Self {
                self.wrapping_mul(rhs)
            }
            #[inline(always)]
            fn lane_min(self, rhs: Self) -> Self {
                if self < rhs {
                    self
                } else {
                    rhs
                }
            }
            #[inline(always)]
            fn lane_max(self, rhs: Self) -> Self {
                if self > rhs {
                    self
                } else {
                    rhs
                }
            }
        }
    };
}

macro_rules! impl_signed {
    ($($t:ty),*) => {
        $(
            impl SignedElement for $t {
                #[inline(always)]
                fn lane_abs(self) -> Self {
                    self.wrapping_abs()
                }
            }
        )*
    };
}

impl_float!(f32, F32, F32);
impl_float!(f64, F64, F64);
impl_int!(i8, I8, I8);
impl_int!(i16, I16, I16);
impl_int!(i32, I32, I32);
impl_int!(i64, I64, I64);
impl_int!(u8, U8, U8);
impl_int!(u16, U16, U16);
impl_int!(u32, U32, U32);
impl_int!(u64, U64, U64);
impl_signed!(i8, i16, i32, i64);
