//! crates/dbgline/src/gate.rs
//! Level gate deciding whether a statement emits.

use crate::config;

/// Integer types accepted as a message level.
///
/// Every primitive integer converts. Negative values become `0`, which never
/// emits, and values wider than 64 bits saturate.
pub trait IntoLevel {
    /// Converts `self` to the level compared against the threshold.
    fn into_level(self) -> u64;
}

macro_rules! impl_unsigned_level {
    ($($ty:ty),* $(,)?) => {
        $(
            impl IntoLevel for $ty {
                #[inline]
                fn into_level(self) -> u64 {
                    u64::try_from(self).unwrap_or(u64::MAX)
                }
            }
        )*
    };
}

macro_rules! impl_signed_level {
    ($($ty:ty),* $(,)?) => {
        $(
            impl IntoLevel for $ty {
                #[inline]
                fn into_level(self) -> u64 {
                    u64::try_from(self).unwrap_or(if self < 0 { 0 } else { u64::MAX })
                }
            }
        )*
    };
}

impl_unsigned_level!(u8, u16, u32, u64, u128, usize);
impl_signed_level!(i8, i16, i32, i64, i128, isize);

/// Returns `true` when a statement at `level` passes `threshold`.
///
/// Emission requires `0 < level <= threshold`: level `0` never emits, and a
/// threshold of `0` silences everything.
///
/// # Examples
///
/// ```
/// use dbgline::should_emit;
///
/// assert!(should_emit(1, 1));
/// assert!(!should_emit(0, 5));
/// assert!(!should_emit(3, 2));
/// ```
#[inline]
#[must_use]
pub const fn should_emit(level: u64, threshold: u32) -> bool {
    level > 0 && level <= threshold as u64
}

/// Applies [`should_emit`] to the current process-wide threshold.
#[inline]
pub fn enabled_for<L>(level: L) -> bool
where
    L: IntoLevel,
{
    should_emit(level.into_level(), config::verbosity())
}
