//! Exact arithmetic kernels for SQL-style fixed-precision decimals.
//!
//! A decimal value is a plain signed integer in one of three storage
//! widths ([`Dec32`], [`Dec64`], [`Dec128`]). Precision (total decimal
//! digits) and scale (fractional digits) are *not* stored in the value;
//! they are type metadata the caller supplies with every operation, and
//! the integer `v` at scale `s` represents the rational `v / 10^s`.
//!
//! The kernels are pure functions. Overflow and divide-by-zero are
//! reported through out-of-band `&mut bool` flags: a kernel only ever
//! writes `true`, so a caller can thread one flag through a whole
//! expression and check it once. On a flagged overflow the returned
//! value is unspecified.
//!
//! The caller is expected to have already chosen a valid result
//! precision and scale for each operation, the way a SQL frontend's
//! type promotion rules do. Violations of that contract are caught by
//! debug assertions, not by release-mode checks.
#![allow(clippy::too_many_arguments)]
#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![deny(unused_lifetimes)]

mod base;
mod dec128;
mod int256;
mod scale;
mod tables;

pub use base::{Dec128, Dec32, Dec64};
pub use tables::{
    precision_byte_width, MAX_PRECISION, MAX_UNSCALED_DEC128, MAX_UNSCALED_DEC32,
    MAX_UNSCALED_DEC64,
};
