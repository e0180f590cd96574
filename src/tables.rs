//! Precomputed powers of ten and precision metadata.
//!
//! Every table is bounds-checked only in debug builds; callers always
//! validate the exponent first, so an out-of-domain index is a caller
//! bug rather than a runtime condition.

use crate::int256::i256;

/// The largest number of significant decimal digits any storage width
/// can carry.
pub const MAX_PRECISION: i32 = 38;

/// The magnitude cap on a [`Dec32`][crate::Dec32] unscaled value:
/// `10^9 - 1`.
pub const MAX_UNSCALED_DEC32: i32 = 999_999_999;

/// The magnitude cap on a [`Dec64`][crate::Dec64] unscaled value:
/// `10^18 - 1`.
pub const MAX_UNSCALED_DEC64: i64 = 999_999_999_999_999_999;

/// The magnitude cap on a [`Dec128`][crate::Dec128] unscaled value:
/// `10^38 - 1`.
pub const MAX_UNSCALED_DEC128: i128 = 99_999_999_999_999_999_999_999_999_999_999_999_999;

const POW10_32: [i32; 10] = {
    let mut tab = [0i32; 10];
    let mut i = 0;
    while i < tab.len() {
        tab[i] = 10i32.pow(i as u32);
        i += 1;
    }
    tab
};

const POW10_64: [i64; 19] = {
    let mut tab = [0i64; 19];
    let mut i = 0;
    while i < tab.len() {
        tab[i] = 10i64.pow(i as u32);
        i += 1;
    }
    tab
};

const POW10_128: [i128; 39] = {
    let mut tab = [0i128; 39];
    let mut i = 0;
    while i < tab.len() {
        tab[i] = 10i128.pow(i as u32);
        i += 1;
    }
    tab
};

const POW10_256: [i256; 77] = {
    let mut tab = [i256::ZERO; 77];
    let mut p = i256::ONE;
    let mut i = 0;
    while i < tab.len() {
        tab[i] = p;
        p = p.wrapping_mul(i256::TEN);
        i += 1;
    }
    tab
};

/// `floor(log2(10^d))` for `d` in `[0, 39]`.
const FLOOR_LOG2_POW10: [i32; 40] = [
    0, 3, 6, 9, 13, 16, 19, 23, 26, 29, 33, 36, 39, 43, 46, 49, 53, 56, 59, 63, 66, 69, 73, 76,
    79, 83, 86, 89, 93, 96, 99, 102, 106, 109, 112, 116, 119, 122, 126, 129,
];

/// `MAX_UNSCALED_DEC128 / 10^d`, truncated, for `d` in `[0, 38]`.
const MAX128_QUOTIENTS: [i128; 39] = {
    let mut tab = [0i128; 39];
    let mut i = 0;
    while i < tab.len() {
        tab[i] = MAX_UNSCALED_DEC128 / POW10_128[i];
        i += 1;
    }
    tab
};

/// Returns `10^k` as an `i32`. Valid for `k` in `[0, 9]`.
pub(crate) const fn pow10_32(k: i32) -> i32 {
    debug_assert!(k >= 0);
    POW10_32[k as usize]
}

/// Returns `10^k` as an `i64`. Valid for `k` in `[0, 18]`.
pub(crate) const fn pow10_64(k: i32) -> i64 {
    debug_assert!(k >= 0);
    POW10_64[k as usize]
}

/// Returns `10^k` as an `i128`. Valid for `k` in `[0, 38]`.
pub(crate) const fn pow10_128(k: i32) -> i128 {
    debug_assert!(k >= 0);
    POW10_128[k as usize]
}

/// Returns `10^k` as an `i256`. Valid for `k` in `[0, 76]`.
pub(crate) const fn pow10_256(k: i32) -> i256 {
    debug_assert!(k >= 0);
    POW10_256[k as usize]
}

/// Returns `floor(log2(10^d))`. Valid for `d` in `[0, 39]`.
pub(crate) const fn floor_log2_pow10(d: i32) -> i32 {
    debug_assert!(d >= 0);
    FLOOR_LOG2_POW10[d as usize]
}

/// Returns the largest magnitude that can still be multiplied by
/// `10^d` without exceeding [`MAX_UNSCALED_DEC128`]. Valid for `d` in
/// `[0, 38]`.
pub(crate) const fn max128_quotient(d: i32) -> i128 {
    debug_assert!(d >= 0);
    MAX128_QUOTIENTS[d as usize]
}

/// Returns the storage width in bytes that holds `precision` decimal
/// digits: 4, 8, or 16.
pub const fn precision_byte_width(precision: i32) -> usize {
    debug_assert!(precision >= 1 && precision <= MAX_PRECISION);
    if precision <= 9 {
        4
    } else if precision <= 18 {
        8
    } else {
        16
    }
}
