// crates/evis-od/src/scaling.rs

//! Fixed-point to physical-unit conversion.
//!
//! Controllers publish physical values as integers in the unit's natural
//! precision (centi-amps, deci-volts, ...). The schema pairs each such field
//! with a unit and an integer divisor. A [`Quantity`] keeps the exact rational
//! `raw / factor`; rendering goes through [`Decimal`] so that power-of-ten
//! factors never introduce rounding.

use crate::error::ScaleError;
use alloc::sync::Arc;
use core::fmt;
use core::num::NonZeroU32;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// A scaled physical value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Quantity {
    raw: i64,
    factor: NonZeroU32,
    unit: Arc<str>,
}

impl Quantity {
    /// The raw fixed-point integer this quantity was built from.
    pub fn raw(&self) -> i64 {
        self.raw
    }

    pub fn factor(&self) -> NonZeroU32 {
        self.factor
    }

    pub fn unit(&self) -> &str {
        &self.unit
    }

    /// Exact value in physical units.
    ///
    /// Power-of-ten factors keep their scale, so raw 250 with factor 100
    /// renders as `2.50`.
    pub fn value(&self) -> Decimal {
        match decimal_exponent(self.factor.get()) {
            Some(scale) => Decimal::from_i128_with_scale(i128::from(self.raw), scale),
            None => (Decimal::from(self.raw) / Decimal::from(self.factor.get())).normalize(),
        }
    }

    /// Approximate value for consumers that work in floating point.
    pub fn to_f64(&self) -> f64 {
        self.raw as f64 / f64::from(self.factor.get())
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value(), self.unit)
    }
}

/// Converts a raw fixed-point integer into a physical quantity.
///
/// Negative raw values (signed temperatures, discharge currents) are kept as is.
pub fn scale(raw: i64, unit: Arc<str>, factor: NonZeroU32) -> Quantity {
    Quantity { raw, factor, unit }
}

/// Converts a physical value back into its raw fixed-point integer.
///
/// Rounds half away from zero, which is the inverse of [`scale`] for every
/// value it produces.
pub fn unscale(value: Decimal, factor: NonZeroU32) -> Result<i64, ScaleError> {
    value
        .checked_mul(Decimal::from(factor.get()))
        .map(|v| v.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|v| v.to_i64())
        .ok_or(ScaleError::Overflow)
}

/// Returns `k` when `factor == 10^k`.
fn decimal_exponent(factor: u32) -> Option<u32> {
    let mut remaining = factor;
    let mut exponent = 0;
    while remaining % 10 == 0 {
        remaining /= 10;
        exponent += 1;
    }
    (remaining == 1).then_some(exponent)
}
