//! Scale adjustment helpers.
//!
//! Dividing an unscaled value by a power of ten with half-away-from-zero
//! rounding, and the conservative leading-zero estimate that picks
//! between the narrow and wide kernel paths.

use crate::int256::i256;
use crate::tables;

macro_rules! impl_scale_down_round {
    ($name:ident, $t:ty, $pow10:path) => {
        /// Divides `value` by `10^delta_scale`, truncating toward zero,
        /// or rounding half away from zero when `round` is set.
        pub(crate) fn $name(value: $t, delta_scale: i32, round: bool) -> $t {
            debug_assert!(delta_scale > 0);

            let multiplier = $pow10(delta_scale);
            debug_assert!(multiplier > 1 && multiplier % 2 == 0);
            let mut result = value / multiplier;
            if round {
                let remainder = value % multiplier;
                // 10^k is even for k >= 1, so halving it by a shift is
                // exact.
                if remainder.abs() >= (multiplier >> 1) {
                    // Truncation already moved the quotient toward
                    // zero; finish the half step away from zero, on the
                    // dividend's side of it.
                    result += if value < 0 { -1 } else { 1 };
                }
            }
            result
        }
    };
}

impl_scale_down_round!(scale_down_round32, i32, tables::pow10_32);
impl_scale_down_round!(scale_down_round64, i64, tables::pow10_64);
impl_scale_down_round!(scale_down_round128, i128, tables::pow10_128);

/// [`scale_down_round128`] over a 256-bit intermediate.
pub(crate) fn scale_down_round256(value: i256, delta_scale: i32, round: bool) -> i256 {
    debug_assert!(delta_scale > 0);

    let multiplier = tables::pow10_256(delta_scale);
    let (mut result, remainder) = value.div_rem(multiplier);
    if round {
        let half = multiplier.unsigned_abs().shr(1);
        if remainder.unsigned_abs().const_cmp(half) != core::cmp::Ordering::Less {
            let bias = if value.is_negative() { -1 } else { 1 };
            result = result.wrapping_add(i256::from_i128(bias));
        }
    }
    result
}

/// Returns a lower bound on the leading-zero count of a magnitude that
/// had `num_lz` leading zeros before being multiplied by
/// `10^scale_diff`.
pub(crate) fn min_leading_zeros_after_scaling(num_lz: i32, scale_diff: i32) -> i32 {
    debug_assert!(scale_diff >= 0);

    // lz(a * b) >= lz(a) - floor(log2(b)) - 1
    num_lz - tables::floor_log2_pow10(scale_diff) - 1
}

/// Returns a lower bound on the leading zeros `x` or `y` would have
/// after the lower-scaled one is scaled up to match the other.
///
/// Only ever used to choose between the narrow and wide kernel paths;
/// never for correctness.
pub(crate) fn min_leading_zeros(x: i128, x_scale: i32, y: i128, y_scale: i32) -> i32 {
    let mut x_lz = x.unsigned_abs().leading_zeros() as i32;
    let mut y_lz = y.unsigned_abs().leading_zeros() as i32;
    if x_scale < y_scale {
        x_lz = min_leading_zeros_after_scaling(x_lz, y_scale - x_scale);
    } else if x_scale > y_scale {
        y_lz = min_leading_zeros_after_scaling(y_lz, x_scale - y_scale);
    }
    x_lz.min(y_lz)
}
