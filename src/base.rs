//! The decimal value types and their width-generic surface.
//!
//! `impl_dec!` expands the storage newtype plus every operation whose
//! shape is the same across widths: factories, integer and double
//! conversions, rescaling, formatting, and hashing.
//! `impl_narrow_arith!` expands the arithmetic kernels for the 4- and
//! 8-byte widths, which compute intermediates one width up and never
//! need 256 bits. The 16-byte kernels live in `dec128`.

use core::cmp::Ordering;

use crate::{scale, tables};

macro_rules! impl_to_int {
    ($($fn_name:ident => $int:ty),+ $(,)?) => {
        $(
        /// Converts to an integer by dividing away `scale` fractional
        /// digits, rounding half away from zero. Sets `overflow` when
        /// the rounded whole number does not fit the destination type.
        pub fn $fn_name(self, scale: i32, overflow: &mut bool) -> $int {
            debug_assert!(scale >= 0 && scale <= Self::MAX_PRECISION);

            let divisor = tables::pow10_128(scale);
            let v = self.0 as i128;
            let result = if divisor == 1 {
                v
            } else {
                let mut result = v / divisor;
                let remainder = v % divisor;
                // The divisor is a positive power of ten, so halving it
                // by a shift is exact.
                if remainder.abs() >= (divisor >> 1) {
                    // Push the truncated quotient the rest of the way,
                    // away from zero.
                    result += if v < 0 { -1 } else { 1 };
                }
                result
            };
            *overflow |= result > <$int>::MAX as i128 || result < <$int>::MIN as i128;
            result as $int
        }
        )+
    };
}

macro_rules! impl_dec {
    (
        name = $name:ident,
        storage = $storage:ty,
        max_precision = $max_precision:expr,
        max_unscaled = $max_unscaled:expr,
        pow10 = $pow10:path,
        doc = $doc:literal $(,)?
    ) => {
        #[doc = $doc]
        ///
        /// Precision and scale are not stored; they are supplied by the
        /// caller with each operation. The derived ordering and
        /// equality compare raw unscaled values and are therefore only
        /// meaningful between values that share a scale; use
        /// [`compare`][Self::compare] otherwise.
        #[derive(Copy, Clone, Default, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
        #[repr(transparent)]
        pub struct $name($storage);

        impl $name {
            /// The largest precision this storage width can hold.
            pub const MAX_PRECISION: i32 = $max_precision;

            /// The cap on the magnitude of the unscaled value,
            /// `10^MAX_PRECISION - 1`.
            pub const MAX_UNSCALED: $storage = $max_unscaled;

            /// Creates a value from its raw unscaled integer.
            pub const fn new(value: $storage) -> Self {
                Self(value)
            }

            /// Returns the raw unscaled integer.
            pub const fn value(self) -> $storage {
                self.0
            }

            /// Reports whether the value is zero at every scale.
            pub const fn is_zero(self) -> bool {
                self.0 == 0
            }

            /// Returns the absolute value. The scale is unchanged.
            pub const fn abs(self) -> Self {
                Self(self.0.abs())
            }

            /// Returns the digits to the left of the decimal point,
            /// truncated toward zero.
            pub fn whole_part(self, scale: i32) -> $storage {
                self.0 / $pow10(scale)
            }

            /// Returns the magnitude of the digits to the right of the
            /// decimal point.
            pub fn fractional_part(self, scale: i32) -> $storage {
                (self.0 % $pow10(scale)).abs()
            }

            /// Creates a value of type `(precision, scale)` from a
            /// double.
            ///
            /// The double is multiplied by `10^scale` and then either
            /// truncated toward zero or, when `round` is set, rounded
            /// half away from zero. Sets `overflow` when the scaled
            /// magnitude reaches `10^precision` or the input is NaN.
            ///
            /// Doubles carry fewer than 17 significant digits, so this
            /// conversion is lossy for larger precisions, and the
            /// scaling multiply itself can round.
            pub fn from_f64(
                precision: i32,
                scale: i32,
                d: f64,
                round: bool,
                overflow: &mut bool,
            ) -> Self {
                debug_assert!(precision >= 1 && precision <= Self::MAX_PRECISION);
                debug_assert!(scale >= 0 && scale <= precision);

                let mut d = d * 10f64.powi(scale);
                if round {
                    d = d.round();
                }
                let max_value = $pow10(precision) as f64;
                if d.is_nan() || d.abs() >= max_value {
                    *overflow = true;
                    return Self::new(0);
                }
                Self::new(d as $storage)
            }

            /// Creates a value of type `(precision, scale)` from an
            /// integer, scaling it up by `10^scale`. Sets `overflow`
            /// when the integer has more than `precision - scale`
            /// digits.
            pub fn from_i64(precision: i32, scale: i32, v: i64, overflow: &mut bool) -> Self {
                debug_assert!(precision >= 1 && precision <= Self::MAX_PRECISION);
                debug_assert!(scale >= 0 && scale <= precision);

                let max_value = tables::pow10_128(precision - scale);
                if (v as i128).abs() >= max_value {
                    *overflow = true;
                    return Self::new(0);
                }
                Self::new(((v as i128) * tables::pow10_128(scale)) as $storage)
            }

            impl_to_int! {
                to_i8 => i8,
                to_i16 => i16,
                to_i32 => i32,
                to_i64 => i64,
            }

            /// Rescales from `src_scale` to `dst_scale`, truncating any
            /// dropped fractional digits. Sets `overflow` when the
            /// result has more than `dst_precision` digits.
            pub fn scale_to(
                self,
                src_scale: i32,
                dst_scale: i32,
                dst_precision: i32,
                overflow: &mut bool,
            ) -> Self {
                debug_assert!(dst_precision >= 1 && dst_precision <= Self::MAX_PRECISION);

                let delta_scale = src_scale - dst_scale;
                let max_value = tables::pow10_128(dst_precision);
                let v = self.0 as i128;
                if delta_scale >= 0 {
                    let mut result = v;
                    if delta_scale != 0 {
                        result /= tables::pow10_128(delta_scale);
                    }
                    // Dropping digits can still leave too many for the
                    // destination precision, e.g. 100 as (3,0) -> (2,0).
                    *overflow |= result.abs() >= max_value;
                    Self::new(result as $storage)
                } else {
                    let multiplier = tables::pow10_128(-delta_scale);
                    *overflow |= v.abs() >= max_value / multiplier;
                    Self::new(v.wrapping_mul(multiplier) as $storage)
                }
            }

            /// Formats the value at `(precision, scale)`.
            ///
            /// The output carries exactly `scale` fractional digits
            /// when `scale > 0`, a lone `0` whole part when the value
            /// is purely fractional, and a leading `-` for negative
            /// values. No exponent form, no separators.
            pub fn to_string(self, precision: i32, scale: i32) -> String {
                debug_assert!(precision >= 1 && precision <= Self::MAX_PRECISION);
                debug_assert!(scale >= 0 && scale <= precision);

                let negative = self.0 < 0;
                let len = precision as usize
                    + (scale > 0) as usize            // decimal point
                    + (scale == precision) as usize   // leading zero
                    + negative as usize;              // sign
                let mut buf = vec![b'0'; len];

                // Fill from the right, one digit at a time, and worry
                // about the sign at the end.
                let first_digit = negative as usize;
                let mut last = len;
                let mut remaining = (self.0 as i128).unsigned_abs();
                if scale > 0 {
                    let mut remaining_scale = scale;
                    loop {
                        last -= 1;
                        buf[last] = b'0' + (remaining % 10) as u8;
                        remaining /= 10;
                        remaining_scale -= 1;
                        if remaining_scale == 0 {
                            break;
                        }
                    }
                    last -= 1;
                    buf[last] = b'.';
                    debug_assert!(last > first_digit, "no room left for the whole part");
                }
                let mut start = 0;
                loop {
                    last -= 1;
                    buf[last] = b'0' + (remaining % 10) as u8;
                    remaining /= 10;
                    if remaining == 0 {
                        if last > first_digit {
                            // Trim the surplus leading zeros.
                            start = last - first_digit;
                        }
                        break;
                    }
                    if last == first_digit {
                        break;
                    }
                }
                if negative {
                    buf[start] = b'-';
                }
                buf.drain(..start);
                // SAFETY: the buffer holds only ASCII digits, `.`, and
                // `-`.
                unsafe { String::from_utf8_unchecked(buf) }
            }

            /// Returns the value as a double. Lossy beyond the
            /// double's 53-bit significand.
            pub fn to_f64(self, scale: i32) -> f64 {
                self.0 as f64 / 10f64.powi(scale)
            }

            /// Hashes the raw little-endian storage bytes.
            pub fn hash(self, seed: u32) -> u32 {
                murmurhash3::murmurhash3_x86_32(&self.0.to_le_bytes(), seed)
            }
        }

        impl core::ops::Neg for $name {
            type Output = Self;

            fn neg(self) -> Self {
                Self(-self.0)
            }
        }
    };
}

macro_rules! impl_narrow_arith {
    (
        name = $name:ident,
        storage = $storage:ty,
        wide = $wide:ty,
        pow10 = $pow10:path,
        pow10_wide = $pow10_wide:path,
        scale_down_round = $sdr:path $(,)?
    ) => {
        impl $name {
            /// Scales the lower-scaled operand up so both share a
            /// scale. The caller's result type always has room for the
            /// scaled operand on this width.
            fn align_scales(
                x: $storage,
                x_scale: i32,
                y: $storage,
                y_scale: i32,
            ) -> ($storage, $storage) {
                let delta_scale = x_scale - y_scale;
                if delta_scale == 0 {
                    (x, y)
                } else if delta_scale > 0 {
                    (x, y * $pow10(delta_scale))
                } else {
                    (x * $pow10(-delta_scale), y)
                }
            }

            /// Adds two values of this width. The result scale must be
            /// the larger operand scale, so there is never anything to
            /// round away.
            pub fn add(
                self,
                this_scale: i32,
                other: Self,
                other_scale: i32,
                result_precision: i32,
                result_scale: i32,
                overflow: &mut bool,
            ) -> Self {
                debug_assert!(result_precision <= Self::MAX_PRECISION);
                debug_assert_eq!(result_scale, this_scale.max(other_scale));

                let (x, y) = Self::align_scales(self.0, this_scale, other.0, other_scale);
                let result = x + y;
                debug_assert!(
                    *overflow || result.unsigned_abs() as u128 <= Self::MAX_UNSCALED as u128,
                    "the caller's result type must fit the sum"
                );
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
                overflow: &mut bool,
            ) -> Self {
                self.add(
                    this_scale,
                    -other,
                    other_scale,
                    result_precision,
                    result_scale,
                    overflow,
                )
            }

            /// Multiplies two values of this width.
            ///
            /// The unscaled product has scale `this_scale +
            /// other_scale`; any excess over `result_scale` is divided
            /// away, rounding half away from zero when `round` is set.
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
                debug_assert!(result_precision <= Self::MAX_PRECISION);

                let x = self.0;
                let y = other.0;
                if x == 0 || y == 0 {
                    return Self::new(0);
                }
                let delta_scale = this_scale + other_scale - result_scale;
                debug_assert!(delta_scale >= 0);

                let mut result = x * y;
                if delta_scale > 0 {
                    result = $sdr(result, delta_scale, round);
                }
                debug_assert!(
                    *overflow || result.unsigned_abs() as u128 <= Self::MAX_UNSCALED as u128,
                    "the caller's result type must fit the product"
                );
                Self::new(result)
            }

            /// Divides `self` by `other`, scaling the dividend up so
            /// the quotient lands on `result_scale`. Division by zero
            /// sets `is_nan` and returns zero. When `round` is set the
            /// quotient is rounded half away from zero.
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
                debug_assert!(result_precision <= Self::MAX_PRECISION);
                debug_assert!(result_scale + other_scale >= this_scale);

                if other.0 == 0 {
                    *is_nan = true;
                    return Self::new(0);
                }
                // Intermediates blow up quickly; 128 bits is enough
                // headroom for both narrow widths.
                let scale_by = result_scale + other_scale - this_scale;
                debug_assert!(scale_by <= 38);
                let x = (self.0 as i128) * tables::pow10_128(scale_by);
                let y = other.0 as i128;
                let mut r = x / y;
                if round {
                    let remainder = x % y;
                    if (2 * remainder).abs() >= y.abs() {
                        // The caller chose the result scale so that the
                        // smallest non-zero dividend over the largest
                        // divisor still has a non-zero quotient.
                        debug_assert!(r != 0);
                        r += if r < 0 { -1 } else { 1 };
                    }
                }
                debug_assert!(
                    *overflow || r.unsigned_abs() <= Self::MAX_UNSCALED as u128,
                    "the caller's result type must fit the quotient"
                );
                Self::new(r as $storage)
            }

            /// Returns `self mod other` at the larger of the two
            /// scales, with the sign of `self`. Division by zero sets
            /// `is_nan` and returns zero. The remainder always fits;
            /// `overflow` is never set.
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
                debug_assert!(result_precision <= Self::MAX_PRECISION);
                debug_assert_eq!(result_scale, this_scale.max(other_scale));

                if other.0 == 0 {
                    *is_nan = true;
                    return Self::new(0);
                }
                let (x, y) = Self::align_scales(self.0, this_scale, other.0, other_scale);
                let result = x % y;
                debug_assert!(result.unsigned_abs() < y.unsigned_abs());
                debug_assert!(
                    *overflow || result.unsigned_abs() as u128 <= Self::MAX_UNSCALED as u128
                );
                Self::new(result)
            }

            /// Compares two values that may have different scales.
            ///
            /// The comparison widens one step, so scaling up cannot
            /// overflow.
            pub fn compare(self, this_scale: i32, other: Self, other_scale: i32) -> Ordering {
                let delta_scale = this_scale - other_scale;
                let mut x = self.0 as $wide;
                let mut y = other.0 as $wide;
                if delta_scale > 0 {
                    y *= $pow10_wide(delta_scale);
                } else if delta_scale < 0 {
                    x *= $pow10_wide(-delta_scale);
                }
                x.cmp(&y)
            }
        }
    };
}

impl_dec! {
    name = Dec32,
    storage = i32,
    max_precision = 9,
    max_unscaled = tables::MAX_UNSCALED_DEC32,
    pow10 = tables::pow10_32,
    doc = "A decimal value in 32-bit storage, holding precisions 1 through 9.",
}

impl_dec! {
    name = Dec64,
    storage = i64,
    max_precision = 18,
    max_unscaled = tables::MAX_UNSCALED_DEC64,
    pow10 = tables::pow10_64,
    doc = "A decimal value in 64-bit storage, holding precisions 10 through 18.",
}

impl_dec! {
    name = Dec128,
    storage = i128,
    max_precision = 38,
    max_unscaled = tables::MAX_UNSCALED_DEC128,
    pow10 = tables::pow10_128,
    doc = "A decimal value in 128-bit storage, holding precisions 19 through 38.",
}

impl_narrow_arith! {
    name = Dec32,
    storage = i32,
    wide = i64,
    pow10 = tables::pow10_32,
    pow10_wide = tables::pow10_64,
    scale_down_round = scale::scale_down_round32,
}

impl_narrow_arith! {
    name = Dec64,
    storage = i64,
    wide = i128,
    pow10 = tables::pow10_64,
    pow10_wide = tables::pow10_128,
    scale_down_round = scale::scale_down_round64,
}

// Width conversions. Scale is never altered: only the storage changes.

impl From<Dec32> for Dec64 {
    fn from(v: Dec32) -> Self {
        Self::new(v.value() as i64)
    }
}

impl From<Dec32> for Dec128 {
    fn from(v: Dec32) -> Self {
        Self::new(v.value() as i128)
    }
}

impl From<Dec64> for Dec128 {
    fn from(v: Dec64) -> Self {
        Self::new(v.value() as i128)
    }
}

impl Dec64 {
    /// Narrows to 32-bit storage, setting `overflow` when the value
    /// does not fit. The scale is unchanged.
    pub fn to_dec32(self, overflow: &mut bool) -> Dec32 {
        *overflow |= self.0.unsigned_abs() > i32::MAX as u64;
        Dec32::new(self.0 as i32)
    }
}

impl Dec128 {
    /// Narrows to 32-bit storage, setting `overflow` when the value
    /// does not fit. The scale is unchanged.
    pub fn to_dec32(self, overflow: &mut bool) -> Dec32 {
        *overflow |= self.0.unsigned_abs() > i32::MAX as u128;
        Dec32::new(self.0 as i32)
    }

    /// Narrows to 64-bit storage, setting `overflow` when the value
    /// does not fit. The scale is unchanged.
    pub fn to_dec64(self, overflow: &mut bool) -> Dec64 {
        *overflow |= self.0.unsigned_abs() > i64::MAX as u128;
        Dec64::new(self.0 as i64)
    }
}

#[cfg(test)]
mod tests {
    use num_bigint::BigInt;
    use rand::prelude::*;

    use super::*;

    #[test]
    fn test_from_i64_to_i64_round_trip() {
        let mut rng = thread_rng();
        for i in 0..10_000 {
            let mut overflow = false;

            let v = rng.gen_range(-999_999_999i64..=999_999_999);
            let d = Dec32::from_i64(9, 0, v, &mut overflow);
            assert_eq!(d.to_i64(0, &mut overflow), v, "#{i}");
            assert!(!overflow, "#{i}");

            let v = rng.gen_range(-(10i64.pow(18) - 1)..=10i64.pow(18) - 1);
            let d = Dec64::from_i64(18, 0, v, &mut overflow);
            assert_eq!(d.to_i64(0, &mut overflow), v, "#{i}");
            assert!(!overflow, "#{i}");

            let d = Dec128::from_i64(38, 0, v, &mut overflow);
            assert_eq!(d.to_i64(0, &mut overflow), v, "#{i}");
            assert!(!overflow, "#{i}");
        }
    }

    #[test]
    fn test_from_i64_scales_up() {
        let mut overflow = false;
        let d = Dec32::from_i64(5, 2, 123, &mut overflow);
        assert_eq!(d.value(), 12_300);
        assert!(!overflow);

        let d = Dec128::from_i64(38, 20, 42, &mut overflow);
        assert_eq!(d.value(), 42 * 10i128.pow(20));
        assert!(!overflow);
    }

    #[test]
    fn test_from_i64_overflow() {
        // The max for (precision 3, scale 1) is two whole digits.
        let mut overflow = false;
        let d = Dec32::from_i64(3, 1, 99, &mut overflow);
        assert_eq!(d.value(), 990);
        assert!(!overflow);

        let mut overflow = false;
        Dec32::from_i64(3, 1, 100, &mut overflow);
        assert!(overflow);

        let mut overflow = false;
        Dec32::from_i64(3, 1, -100, &mut overflow);
        assert!(overflow);

        // Overflow at a precision implies overflow at every smaller
        // precision with the same scale.
        for p in 1..=2 {
            let mut overflow = false;
            Dec32::from_i64(p, 1.min(p), 100, &mut overflow);
            assert!(overflow, "precision {p}");
        }
    }

    #[test]
    fn test_to_int_rounds_half_away_from_zero() {
        let mut overflow = false;
        assert_eq!(Dec64::new(14).to_i64(1, &mut overflow), 1);
        assert_eq!(Dec64::new(15).to_i64(1, &mut overflow), 2);
        assert_eq!(Dec64::new(25).to_i64(1, &mut overflow), 3);
        assert_eq!(Dec64::new(-14).to_i64(1, &mut overflow), -1);
        assert_eq!(Dec64::new(-15).to_i64(1, &mut overflow), -2);
        assert_eq!(Dec64::new(-25).to_i64(1, &mut overflow), -3);
        assert!(!overflow);
    }

    #[test]
    fn test_to_int_symmetry() {
        let mut rng = thread_rng();
        for i in 0..10_000 {
            let v = rng.gen_range(-(10i64.pow(18) - 1)..=10i64.pow(18) - 1);
            let s = rng.gen_range(0..=18);
            let mut overflow = false;
            let pos = Dec64::new(v).to_i64(s, &mut overflow);
            let neg = Dec64::new(-v).to_i64(s, &mut overflow);
            assert_eq!(pos + neg, 0, "#{i}: {v} at scale {s}");
            assert!(!overflow, "#{i}");
        }
    }

    #[test]
    fn test_to_int_narrow_destination_overflow() {
        let mut overflow = false;
        assert_eq!(Dec32::new(127).to_i8(0, &mut overflow), 127);
        assert!(!overflow);

        let mut overflow = false;
        Dec32::new(128).to_i8(0, &mut overflow);
        assert!(overflow);

        let mut overflow = false;
        assert_eq!(Dec32::new(-128).to_i8(0, &mut overflow), -128);
        assert!(!overflow);

        let mut overflow = false;
        Dec64::new(40_000).to_i16(0, &mut overflow);
        assert!(overflow);
    }

    #[test]
    fn test_from_f64_rounds() {
        // 1.005 is actually 1.00499999999999989... in binary, so the
        // scaled value 100.4999... rounds down to 100.
        let mut overflow = false;
        let d = Dec32::from_f64(5, 2, 1.005, true, &mut overflow);
        assert_eq!(d.value(), 100);
        assert!(!overflow);

        let d = Dec32::from_f64(5, 2, -1.005, true, &mut overflow);
        assert_eq!(d.value(), -100);
        assert!(!overflow);

        let d = Dec32::from_f64(5, 2, 1.25, true, &mut overflow);
        assert_eq!(d.value(), 125);
        assert!(!overflow);
    }

    #[test]
    fn test_from_f64_truncates() {
        let mut overflow = false;
        let d = Dec32::from_f64(5, 2, 999.999, false, &mut overflow);
        assert_eq!(d.value(), 99_999);
        assert!(!overflow);

        let d = Dec32::from_f64(5, 2, -999.999, false, &mut overflow);
        assert_eq!(d.value(), -99_999);
        assert!(!overflow);

        let d = Dec32::from_f64(5, 2, 1.999, false, &mut overflow);
        assert_eq!(d.value(), 199);
        assert!(!overflow);
    }

    #[test]
    fn test_from_f64_overflow_and_nan() {
        let mut overflow = false;
        Dec32::from_f64(5, 2, 1000.0, false, &mut overflow);
        assert!(overflow);

        let mut overflow = false;
        Dec32::from_f64(5, 2, -1000.0, false, &mut overflow);
        assert!(overflow);

        let mut overflow = false;
        Dec32::from_f64(5, 2, f64::NAN, true, &mut overflow);
        assert!(overflow);

        let mut overflow = false;
        Dec32::from_f64(5, 2, 999.99, false, &mut overflow);
        assert!(!overflow);
    }

    #[test]
    fn test_to_f64() {
        assert_eq!(Dec32::new(12_345).to_f64(2), 123.45);
        assert_eq!(Dec64::new(-5).to_f64(1), -0.5);
        assert_eq!(Dec128::new(0).to_f64(38), 0.0);
    }

    #[test]
    fn test_scale_to() {
        // Scaling down truncates.
        let mut overflow = false;
        let d = Dec32::new(123).scale_to(2, 1, 5, &mut overflow);
        assert_eq!(d.value(), 12);
        assert!(!overflow);

        // Scaling up multiplies.
        let mut overflow = false;
        let d = Dec32::new(12).scale_to(1, 3, 5, &mut overflow);
        assert_eq!(d.value(), 1200);
        assert!(!overflow);

        // Same scale, tighter precision: 100 as (3,0) does not fit
        // (2,0).
        let mut overflow = false;
        Dec32::new(100).scale_to(0, 0, 2, &mut overflow);
        assert!(overflow);

        // Scale-up overflow is caught before multiplying.
        let mut overflow = false;
        Dec128::new(tables::MAX_UNSCALED_DEC128).scale_to(0, 1, 38, &mut overflow);
        assert!(overflow);

        // Overflow at dst_precision implies overflow below it.
        for p in 1..=2 {
            let mut overflow = false;
            Dec32::new(100).scale_to(0, 0, p, &mut overflow);
            assert!(overflow, "precision {p}");
        }
    }

    #[test]
    fn test_to_string_scenarios() {
        assert_eq!(Dec32::new(-100).to_string(3, 3), "-0.100");
        assert_eq!(Dec32::new(0).to_string(1, 0), "0");
        assert_eq!(
            Dec128::new(1).to_string(38, 38),
            "0.00000000000000000000000000000000000001"
        );
        assert_eq!(Dec32::new(123).to_string(3, 0), "123");
        assert_eq!(Dec32::new(100).to_string(3, 2), "1.00");
        assert_eq!(Dec32::new(-5).to_string(3, 0), "-5");
        assert_eq!(Dec64::new(573).to_string(4, 2), "5.73");
        assert_eq!(Dec32::new(0).to_string(5, 2), "0.00");
        assert_eq!(
            Dec128::new(tables::MAX_UNSCALED_DEC128).to_string(38, 0),
            "99999999999999999999999999999999999999"
        );
    }

    #[test]
    fn test_to_string_matches_integer_formatting_at_scale_zero() {
        let mut buf = itoa::Buffer::new();
        let mut rng = thread_rng();
        for i in 0..10_000 {
            let v = rng.gen_range(-(10i64.pow(18) - 1)..=10i64.pow(18) - 1);
            let got = Dec64::new(v).to_string(18, 0);
            let want = buf.format(v);
            assert_eq!(got, want, "#{i}");
        }
    }

    fn parse_back(s: &str) -> (i128, usize) {
        let neg = s.starts_with('-');
        let t = s.trim_start_matches('-');
        let (whole, frac) = match t.split_once('.') {
            Some((w, f)) => (w, f),
            None => (t, ""),
        };
        let mut v: i128 = 0;
        for c in whole.bytes().chain(frac.bytes()) {
            assert!(c.is_ascii_digit());
            v = v * 10 + (c - b'0') as i128;
        }
        (if neg { -v } else { v }, frac.len())
    }

    #[test]
    fn test_to_string_round_trip() {
        let mut rng = thread_rng();
        for i in 0..10_000 {
            let precision = rng.gen_range(1..=38);
            let scale = rng.gen_range(0..=precision);
            let cap = 10i128.pow(precision as u32) - 1;
            let v = rng.gen_range(-cap..=cap);

            let s = Dec128::new(v).to_string(precision, scale);
            let (parsed, frac_digits) = parse_back(&s);
            assert_eq!(parsed, v, "#{i}: {s:?} at ({precision},{scale})");
            if scale > 0 {
                assert_eq!(frac_digits, scale as usize, "#{i}: {s:?}");
            }
            // No stray leading zeros: the whole part is either a lone
            // zero or starts with a non-zero digit.
            let t = s.trim_start_matches('-');
            let whole = t.split_once('.').map(|(w, _)| w).unwrap_or(t);
            assert!(whole == "0" || !whole.starts_with('0'), "#{i}: {s:?}");
        }
    }

    #[test]
    fn test_compare_same_width() {
        // 0.1 (1,1) vs 0.099.. variants across scales.
        assert_eq!(Dec32::new(1).compare(1, Dec32::new(9), 2), Ordering::Greater);
        assert_eq!(Dec32::new(1).compare(1, Dec32::new(10), 2), Ordering::Equal);
        assert_eq!(Dec32::new(1).compare(1, Dec32::new(11), 2), Ordering::Less);
        // The widened intermediate absorbs the largest scale-up.
        assert_eq!(
            Dec32::new(999_999_999).compare(0, Dec32::new(1), 9),
            Ordering::Greater
        );
        assert_eq!(
            Dec64::new(tables::MAX_UNSCALED_DEC64).compare(0, Dec64::new(1), 18),
            Ordering::Greater
        );
    }

    #[test]
    fn test_compare_agrees_with_rationals() {
        let mut rng = thread_rng();
        for i in 0..10_000 {
            let x = rng.gen_range(-(10i64.pow(18) - 1)..=10i64.pow(18) - 1);
            let y = rng.gen_range(-(10i64.pow(18) - 1)..=10i64.pow(18) - 1);
            let xs = rng.gen_range(0..=18);
            let ys = rng.gen_range(0..=18);

            let got = Dec64::new(x).compare(xs, Dec64::new(y), ys);
            // x / 10^xs vs y / 10^ys, cross-multiplied.
            let want = (BigInt::from(x) * big_pow10(ys)).cmp(&(BigInt::from(y) * big_pow10(xs)));
            assert_eq!(got, want, "#{i}: {x}e-{xs} vs {y}e-{ys}");

            // Antisymmetry.
            let flipped = Dec64::new(y).compare(ys, Dec64::new(x), xs);
            assert_eq!(got, flipped.reverse(), "#{i}");
        }
    }

    fn big_pow10(k: i32) -> BigInt {
        let mut p = BigInt::from(1);
        for _ in 0..k {
            p = p * BigInt::from(10);
        }
        p
    }

    #[test]
    fn test_add_aligns_scales() {
        // 1.23 + 4.5 at (4,2) = 5.73
        let mut overflow = false;
        let got = Dec32::new(123).add(2, Dec32::new(45), 1, 4, 2, &mut overflow);
        assert_eq!(got.value(), 573);
        assert!(!overflow);

        // Identity and commutativity. Operands stay small enough that
        // the aligned sum always fits precision 9.
        let mut rng = thread_rng();
        for i in 0..10_000 {
            let x = rng.gen_range(-4_999_999i32..=4_999_999);
            let y = rng.gen_range(-4_999_999i32..=4_999_999);
            let xs = rng.gen_range(0..=2);
            let ys = rng.gen_range(0..=2);
            let rs = xs.max(ys);

            let mut overflow = false;
            let xy = Dec32::new(x).add(xs, Dec32::new(y), ys, 9, rs, &mut overflow);
            let yx = Dec32::new(y).add(ys, Dec32::new(x), xs, 9, rs, &mut overflow);
            assert_eq!(xy, yx, "#{i}");
            assert!(!overflow, "#{i}");

            let id = Dec32::new(x).add(xs, Dec32::new(0), xs, 9, xs, &mut overflow);
            assert_eq!(id.value(), x, "#{i}");
        }
    }

    #[test]
    fn test_sub() {
        let mut overflow = false;
        let got = Dec32::new(573).sub(2, Dec32::new(45), 1, 4, 2, &mut overflow);
        assert_eq!(got.value(), 123);
        assert!(!overflow);
    }

    #[test]
    fn test_mul_narrow() {
        // 1.23 * 0.2 = 0.246 with no scale reduction.
        let mut overflow = false;
        let got = Dec32::new(123).mul(2, Dec32::new(2), 1, 6, 3, false, &mut overflow);
        assert_eq!(got.value(), 246);
        assert!(!overflow);

        // Scale reduction rounds when asked.
        let got = Dec32::new(123).mul(2, Dec32::new(2), 1, 6, 2, true, &mut overflow);
        assert_eq!(got.value(), 25);
        let got = Dec32::new(123).mul(2, Dec32::new(2), 1, 6, 2, false, &mut overflow);
        assert_eq!(got.value(), 24);
        assert!(!overflow);

        // Zero short-circuits.
        let got = Dec32::new(0).mul(2, Dec32::new(2), 1, 6, 3, false, &mut overflow);
        assert!(got.is_zero());
    }

    #[test]
    fn test_mul_by_one() {
        let mut rng = thread_rng();
        for i in 0..10_000 {
            let v = rng.gen_range(-(10i64.pow(12))..=10i64.pow(12));
            let s = rng.gen_range(0..=4);
            let one = Dec64::new(tables::pow10_64(s));

            let mut overflow = false;
            let got = Dec64::new(v).mul(2, one, s, 18, 2, true, &mut overflow);
            assert_eq!(got.value(), v, "#{i}");
            assert!(!overflow, "#{i}");
        }
    }

    #[test]
    fn test_div_narrow() {
        // 1 / 3 at (10,9), rounded: 0.333333333.
        let mut is_nan = false;
        let mut overflow = false;
        let got = Dec64::new(1).div(0, Dec64::new(3), 0, 10, 9, true, &mut is_nan, &mut overflow);
        assert_eq!(got.value(), 333_333_333);
        assert!(!is_nan);
        assert!(!overflow);

        // 2 / 3 rounds up.
        let got = Dec64::new(2).div(0, Dec64::new(3), 0, 10, 9, true, &mut is_nan, &mut overflow);
        assert_eq!(got.value(), 666_666_667);

        // Sign symmetry of the rounding bias.
        let got = Dec64::new(-2).div(0, Dec64::new(3), 0, 10, 9, true, &mut is_nan, &mut overflow);
        assert_eq!(got.value(), -666_666_667);
        let got = Dec64::new(2).div(0, Dec64::new(-3), 0, 10, 9, true, &mut is_nan, &mut overflow);
        assert_eq!(got.value(), -666_666_667);
        assert!(!is_nan);
        assert!(!overflow);
    }

    #[test]
    fn test_div_by_zero() {
        let mut is_nan = false;
        let mut overflow = false;
        let got = Dec32::new(5).div(0, Dec32::new(0), 0, 9, 2, true, &mut is_nan, &mut overflow);
        assert!(is_nan);
        assert!(got.is_zero());
        assert!(!overflow);
    }

    #[test]
    fn test_rem_narrow() {
        // 7.25 mod 2.1 = 0.95
        let mut is_nan = false;
        let mut overflow = false;
        let got = Dec32::new(725).rem(2, Dec32::new(21), 1, 3, 2, &mut is_nan, &mut overflow);
        assert_eq!(got.value(), 95);
        assert!(!is_nan);
        assert!(!overflow);

        // The sign follows the dividend.
        let got = Dec32::new(-725).rem(2, Dec32::new(21), 1, 3, 2, &mut is_nan, &mut overflow);
        assert_eq!(got.value(), -95);

        let mut is_nan = false;
        Dec32::new(7).rem(0, Dec32::new(0), 0, 1, 0, &mut is_nan, &mut overflow);
        assert!(is_nan);
    }

    #[test]
    fn test_width_conversions() {
        let mut overflow = false;
        assert_eq!(Dec64::from(Dec32::new(-42)).value(), -42);
        assert_eq!(Dec128::from(Dec32::new(7)).value(), 7);
        assert_eq!(Dec128::from(Dec64::new(1 << 40)).value(), 1 << 40);

        let got = Dec64::new(i32::MAX as i64).to_dec32(&mut overflow);
        assert_eq!(got.value(), i32::MAX);
        assert!(!overflow);

        let mut overflow = false;
        Dec64::new(i32::MAX as i64 + 1).to_dec32(&mut overflow);
        assert!(overflow);

        let mut overflow = false;
        Dec128::new(-(i64::MAX as i128) - 1).to_dec64(&mut overflow);
        assert!(overflow);

        let mut overflow = false;
        let got = Dec128::new(-(i64::MAX as i128)).to_dec64(&mut overflow);
        assert_eq!(got.value(), -i64::MAX);
        assert!(!overflow);
    }

    #[test]
    fn test_abs_neg_parts() {
        assert_eq!(Dec32::new(-725).abs().value(), 725);
        assert_eq!((-Dec32::new(-725)).value(), 725);
        assert_eq!(Dec32::new(-725).whole_part(2), -7);
        assert_eq!(Dec32::new(-725).fractional_part(2), 25);
        assert_eq!(Dec32::new(725).whole_part(2), 7);
        assert_eq!(Dec32::new(725).fractional_part(2), 25);
        assert!(Dec128::new(0).is_zero());
    }

    #[test]
    fn test_hash_is_deterministic() {
        let v = Dec128::new(123_456_789);
        assert_eq!(v.hash(0), v.hash(0));
        assert_eq!(v.hash(17), v.hash(17));
        let w = Dec32::new(42);
        assert_eq!(w.hash(0), Dec32::new(42).hash(0));
    }
}
