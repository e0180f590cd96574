//! Arithmetic kernels for the 128-bit width.
//!
//! At precision 38 there is almost no headroom left in the storage
//! type, so every kernel here splits into a cheap path, taken when a
//! leading-zero estimate proves the intermediates fit in 128 bits, and
//! a wide path through either a whole/fraction decomposition or a
//! 256-bit intermediate.

use core::cmp::Ordering;

use crate::base::Dec128;
use crate::int256::i256;
use crate::scale;
use crate::tables;

impl Dec128 {
    /// Adds two values, producing a result of type
    /// `(result_precision, result_scale)`.
    ///
    /// Sets `overflow` when the sum does not fit `result_precision`
    /// digits. When the result scale is below the larger operand scale,
    /// the excess digits are divided away, rounding half away from zero
    /// if `round` is set.
    pub fn add(
        self,
        this_scale: i32,
        other: Self,
        other_scale: i32,
        result_precision: i32,
        result_scale: i32,
        round: bool,
        overflow: &mut bool,
    ) -> Self {
        if result_precision < tables::MAX_PRECISION {
            debug_assert_eq!(result_scale, this_scale.max(other_scale));
            let (x, y, ovf) =
                align_scales(self.value(), this_scale, other.value(), other_scale, result_precision);
            debug_assert!(!ovf, "scaling up cannot overflow below the max precision");
            return Self::new(x + y);
        }

        let min_lz =
            scale::min_leading_zeros(self.value(), this_scale, other.value(), other_scale);
        let result_scale_decrease = (this_scale - result_scale).max(other_scale - result_scale);
        debug_assert!(result_scale_decrease >= 0);

        // With at least three leading zeros on both (aligned) operands
        // the sum keeps at least two, and 2^126 - 1 < 10^38 - 1, so it
        // fits the storage type directly.
        const MIN_LZ: i32 = 3;
        if min_lz >= MIN_LZ {
            let (x, y, ovf) =
                align_scales(self.value(), this_scale, other.value(), other_scale, result_precision);
            debug_assert!(!ovf, "the leading-zero estimate ruled this out");
            debug_assert!(x.abs() <= tables::MAX_UNSCALED_DEC128 - y.abs());
            let mut sum = x + y;
            if result_scale_decrease > 0 {
                sum = scale::scale_down_round128(sum, result_scale_decrease, round);
            }
            return Self::new(sum);
        }

        let x = self.value();
        let y = other.value();
        let result = if x >= 0 && y >= 0 {
            add_by_parts(x, this_scale, y, other_scale, result_scale, round, overflow)
        } else if x <= 0 && y <= 0 {
            -add_by_parts(-x, this_scale, -y, other_scale, result_scale, round, overflow)
        } else {
            sub_by_parts(x, this_scale, y, other_scale, result_scale, round, overflow)
        };
        Self::new(result)
    }

    /// Subtracts `other` from `self`; addition of the negation.
    pub fn sub(
        self,
        this_scale: i32,
        other: Self,
        other_scale: i32,
        result_precision: i32,
        result_scale: i32,
        round: bool,
        overflow: &mut bool,
    ) -> Self {
        self.add(
            this_scale,
            -other,
            other_scale,
            result_precision,
            result_scale,
            round,
            overflow,
        )
    }

    /// Multiplies two values.
    ///
    /// The unscaled product carries scale `this_scale + other_scale`;
    /// the excess over `result_scale` is divided away, rounding half
    /// away from zero when `round` is set. Sets `overflow` when the
    /// result does not fit `result_precision` digits.
    pub fn mul(
        self,
        this_scale: i32,
        other: Self,
        other_scale: i32,
        result_precision: i32,
        result_scale: i32,
        round: bool,
        overflow: &mut bool,
    ) -> Self {
        let x = self.value();
        let y = other.value();
        // Zero also keeps the overflow pre-check below away from a
        // divide by zero.
        if x == 0 || y == 0 {
            return Self::new(0);
        }
        let delta_scale = this_scale + other_scale - result_scale;
        debug_assert!(delta_scale >= 0);

        let mut result: i128 = 0;
        let mut needs_wide = false;
        if result_precision == tables::MAX_PRECISION {
            let total_leading_zeros = x.unsigned_abs().leading_zeros()
                + y.unsigned_abs().leading_zeros();
            // Quick but conservative: some products flagged here would
            // still fit in 128 bits.
            needs_wide = total_leading_zeros <= 128;
            if needs_wide && delta_scale == 0 {
                if x.unsigned_abs() > (tables::MAX_UNSCALED_DEC128 / y.abs()) as u128 {
                    // Nothing gets scaled away, so a product past the
                    // cap is final.
                    *overflow = true;
                } else {
                    needs_wide = false;
                }
            }
        }
        if needs_wide {
            if delta_scale == 0 {
                debug_assert!(*overflow);
            } else {
                let intermediate = i256::widening_mul(x, y);
                let intermediate = scale::scale_down_round256(intermediate, delta_scale, round);
                result = intermediate.to_i128(tables::MAX_UNSCALED_DEC128, overflow);
            }
        } else if delta_scale == 0 {
            result = x * y;
            // The product fits 128 bits without fitting 38 digits,
            // e.g. (2^64 - 1) * (2^63 - 1).
            if result_precision == tables::MAX_PRECISION
                && result.unsigned_abs() > tables::MAX_UNSCALED_DEC128 as u128
            {
                *overflow = true;
            }
        } else if delta_scale <= 38 {
            result = x * y;
            result = scale::scale_down_round128(result, delta_scale, round);
            // Scaling down by at least one digit brings the largest
            // possible product back under the cap.
        } else {
            // Only (38,38) x (38,38) -> (38,37) lands here: the
            // product is 38 nines at the most, and scaling down by 39
            // leaves the top nine two digits below the last visible
            // one, so even rounding cannot save a digit. A multiplier
            // for 39 would not fit in 128 bits anyway.
            debug_assert_eq!(delta_scale, 39);
            debug_assert!(round);
            result = 0;
        }
        debug_assert!(
            *overflow || result.unsigned_abs() <= tables::MAX_UNSCALED_DEC128 as u128
        );
        Self::new(result)
    }

    /// Divides `self` by `other`, scaling the dividend up so the
    /// quotient lands on `result_scale`.
    ///
    /// Division by zero sets `is_nan` and returns zero. When `round`
    /// is set the quotient is rounded half away from zero. Sets
    /// `overflow` when the quotient does not fit `result_precision`
    /// digits.
    pub fn div(
        self,
        this_scale: i32,
        other: Self,
        other_scale: i32,
        result_precision: i32,
        result_scale: i32,
        round: bool,
        is_nan: &mut bool,
        overflow: &mut bool,
    ) -> Self {
        debug_assert!(result_scale + other_scale >= this_scale);

        if other.value() == 0 {
            *is_nan = true;
            return Self::new(0);
        }
        // Scaling the dividend up can spill far past 128 bits, so the
        // whole division runs over 256-bit intermediates.
        let scale_by = result_scale + other_scale - this_scale;
        debug_assert!(scale_by <= 76);
        let x = i256::from_i128(self.value()).wrapping_mul(tables::pow10_256(scale_by));
        let y = i256::from_i128(other.value());
        let (q, remainder) = x.div_rem(y);
        let mut r = q.to_i128(tables::MAX_UNSCALED_DEC128, overflow);
        if round {
            // The remainder's magnitude is under 2^127, so doubling it
            // stays well inside 256 bits.
            let doubled = remainder.wrapping_add(remainder);
            if doubled.unsigned_abs().const_cmp(y.unsigned_abs()) != Ordering::Less {
                // Truncation went toward zero; finish the half step in
                // the quotient's true direction.
                let bias = if (self.value() < 0) != (other.value() < 0) {
                    -1
                } else {
                    1
                };
                r = r.wrapping_add(bias);
            }
        }
        // The bias can push a borderline quotient past the cap.
        if result_precision == tables::MAX_PRECISION {
            *overflow |= r.unsigned_abs() > tables::MAX_UNSCALED_DEC128 as u128;
        }
        Self::new(r)
    }

    /// Returns `self mod other` at the larger of the two scales, with
    /// the sign of `self`.
    ///
    /// Division by zero sets `is_nan` and returns zero. The remainder
    /// always fits the result type; `overflow` is never set absent a
    /// caller contract violation.
    pub fn rem(
        self,
        this_scale: i32,
        other: Self,
        other_scale: i32,
        result_precision: i32,
        result_scale: i32,
        is_nan: &mut bool,
        overflow: &mut bool,
    ) -> Self {
        debug_assert_eq!(result_scale, this_scale.max(other_scale));

        if other.value() == 0 {
            *is_nan = true;
            return Self::new(0);
        }
        let mut ovf = false;
        let result;
        // Equal scales cannot overflow while aligning, and two spare
        // leading zeros absorb the worst-case scale-up; everything
        // else takes the 256-bit route.
        if result_precision < tables::MAX_PRECISION
            || this_scale == other_scale
            || scale::min_leading_zeros(self.value(), this_scale, other.value(), other_scale) >= 2
        {
            let (x, y, o) =
                align_scales(self.value(), this_scale, other.value(), other_scale, result_precision);
            ovf = o;
            result = x % y;
            debug_assert!(result.unsigned_abs() < y.unsigned_abs());
        } else {
            let mut x = i256::from_i128(self.value());
            let mut y = i256::from_i128(other.value());
            if this_scale < other_scale {
                x = x.wrapping_mul(tables::pow10_256(other_scale - this_scale));
            } else {
                y = y.wrapping_mul(tables::pow10_256(this_scale - other_scale));
            }
            let (_, intermediate) = x.div_rem(y);
            result = intermediate.to_i128(tables::MAX_UNSCALED_DEC128, &mut ovf);
        }
        // A remainder is always representable at the larger scale.
        debug_assert!(!ovf);
        *overflow |= ovf;
        Self::new(result)
    }

    /// Compares two values that may have different scales.
    ///
    /// Both sides widen to 256 bits before aligning, so the scale-up
    /// cannot overflow even at the maximum precision.
    pub fn compare(self, this_scale: i32, other: Self, other_scale: i32) -> Ordering {
        let mut x = i256::from_i128(self.value());
        let mut y = i256::from_i128(other.value());
        let delta_scale = this_scale - other_scale;
        if delta_scale > 0 {
            y = y.wrapping_mul(tables::pow10_256(delta_scale));
        } else if delta_scale < 0 {
            x = x.wrapping_mul(tables::pow10_256(-delta_scale));
        }
        x.const_cmp(y)
    }
}

/// Scales the lower-scaled operand up so both share a scale.
///
/// At the maximum precision the scaled operand can wrap, so the
/// candidate is tested against a precomputed quotient of the cap first;
/// on overflow the inputs are passed through untouched and the flag is
/// returned, never a wrapped product.
fn align_scales(
    x: i128,
    x_scale: i32,
    y: i128,
    y_scale: i32,
    result_precision: i32,
) -> (i128, i128, bool) {
    let delta_scale = x_scale - y_scale;
    if delta_scale == 0 {
        (x, y, false)
    } else if delta_scale > 0 {
        if result_precision == tables::MAX_PRECISION
            && tables::max128_quotient(delta_scale) < y.abs()
        {
            return (x, y, true);
        }
        (x, y * tables::pow10_128(delta_scale), false)
    } else {
        if result_precision == tables::MAX_PRECISION
            && tables::max128_quotient(-delta_scale) < x.abs()
        {
            return (x, y, true);
        }
        (x * tables::pow10_128(-delta_scale), y, false)
    }
}

/// Splits both operands into whole and fractional parts at their own
/// scales, then scales the lower-scaled fractional part up so both
/// fractions share `max(x_scale, y_scale)`.
fn split_at_scale(x: i128, x_scale: i32, y: i128, y_scale: i32) -> (i128, i128, i128, i128) {
    let x_whole = x / tables::pow10_128(x_scale);
    let y_whole = y / tables::pow10_128(y_scale);
    let mut x_frac = x % tables::pow10_128(x_scale);
    let mut y_frac = y % tables::pow10_128(y_scale);
    if x_scale < y_scale {
        x_frac *= tables::pow10_128(y_scale - x_scale);
    } else {
        y_frac *= tables::pow10_128(x_scale - y_scale);
    }
    (x_whole, x_frac, y_whole, y_frac)
}

/// Adds two non-negative values too large to add directly, carrying
/// between the fractional and whole halves explicitly.
fn add_by_parts(
    x: i128,
    x_scale: i32,
    y: i128,
    y_scale: i32,
    result_scale: i32,
    round: bool,
    overflow: &mut bool,
) -> i128 {
    debug_assert!(x >= 0 && y >= 0);

    let (x_whole, x_frac, y_whole, y_frac) = split_at_scale(x, x_scale, y, y_scale);
    debug_assert!(x_whole >= 0 && y_whole >= 0 && x_frac >= 0 && y_frac >= 0);

    let max_scale = x_scale.max(y_scale);
    let result_scale_decrease = max_scale - result_scale;
    debug_assert!(result_scale_decrease >= 0);

    // The fractions share scale max_scale, so their sum can overflow
    // that radix; push the excess into the whole part.
    let mut carry: i128 = 0;
    let mut right = if x_frac >= tables::pow10_128(max_scale) - y_frac {
        carry = 1;
        x_frac - tables::pow10_128(max_scale) + y_frac
    } else {
        x_frac + y_frac
    };
    if result_scale_decrease > 0 {
        right = scale::scale_down_round128(right, result_scale_decrease, round);
    }
    debug_assert!(right >= 0);
    // Rounding can lift `right` to exactly 10^result_scale. The
    // reconstruction below absorbs that the same way a carry would, so
    // it needs no special case.
    debug_assert!(right <= tables::pow10_128(result_scale));

    *overflow |= x_whole > tables::MAX_UNSCALED_DEC128 - y_whole - carry;
    let left = x_whole + y_whole + carry;

    let multiplier = tables::pow10_128(result_scale);
    if !*overflow && left > (tables::MAX_UNSCALED_DEC128 - right) / multiplier {
        *overflow = true;
    }
    // Wrapping: once overflow is flagged the value is unspecified.
    left.wrapping_mul(multiplier).wrapping_add(right)
}

/// Adds one positive and one negative value too large to handle
/// directly.
///
/// The whole and fractional sums can disagree in sign; a borrow of one
/// whole unit moves them onto the same side of zero before the
/// fraction is rescaled.
fn sub_by_parts(
    x: i128,
    x_scale: i32,
    y: i128,
    y_scale: i32,
    result_scale: i32,
    round: bool,
    overflow: &mut bool,
) -> i128 {
    debug_assert!(x != 0 && y != 0);
    debug_assert!((x > 0) != (y > 0));

    let (x_whole, x_frac, y_whole, y_frac) = split_at_scale(x, x_scale, y, y_scale);

    let max_scale = x_scale.max(y_scale);
    let result_scale_decrease = max_scale - result_scale;
    debug_assert!(result_scale_decrease >= 0);

    // Opposite signs keep both sums inside the cap.
    let mut right = x_frac + y_frac;
    let mut left = x_whole + y_whole;
    debug_assert!(right.abs() < tables::MAX_UNSCALED_DEC128);
    debug_assert!(left.abs() < tables::MAX_UNSCALED_DEC128);

    if left < 0 && right > 0 {
        left += 1;
        right -= tables::pow10_128(max_scale);
    } else if left > 0 && right < 0 {
        left -= 1;
        right += tables::pow10_128(max_scale);
    }
    // The borrow moved `left` toward zero.
    debug_assert!(left.abs() <= (x_whole + y_whole).abs());

    if result_scale_decrease > 0 {
        right = scale::scale_down_round128(right, result_scale_decrease, round);
    }
    debug_assert!(left == 0 || right == 0 || (left > 0) == (right > 0));
    // As in `add_by_parts`, rounding may lift `right` to exactly
    // 10^result_scale; reconstruction handles it as a carry.
    debug_assert!(right.abs() <= tables::pow10_128(result_scale));

    let multiplier = tables::pow10_128(result_scale);
    if left.abs() > (tables::MAX_UNSCALED_DEC128 - right.abs()) / multiplier {
        *overflow = true;
    }
    left.wrapping_mul(multiplier).wrapping_add(right)
}
