//! # Rounding
//!
//! Bankers Rounding (round half to even) for both float → fixed-point
//! conversion and exact integer division.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │  BANKERS ROUNDING (Round Half to Even)                              │
//! │                                                                     │
//! │  Standard rounding always rounds 0.5 UP, causing systematic bias:  │
//! │    0.5 → 1, 1.5 → 2, 2.5 → 3, 3.5 → 4 (always up = +bias)         │
//! │                                                                     │
//! │  Bankers Rounding rounds 0.5 to nearest EVEN number:               │
//! │    0.5 → 0, 1.5 → 2, 2.5 → 2, 3.5 → 4 (alternates = no bias)      │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```

/// 2^63 as f64; any rounded value at or above it does not fit i64.
const I64_UPPER: f64 = 9_223_372_036_854_775_808.0;

/// Rounds a float to the nearest integer, ties to even, and converts it to i64.
///
/// Returns `None` for NaN, infinities, and values outside the i64 range.
pub(crate) fn round_half_even_to_i64(value: f64) -> Option<i64> {
    if !value.is_finite() {
        return None;
    }
    let rounded = value.round_ties_even();
    if rounded >= I64_UPPER || rounded < -I64_UPPER {
        return None;
    }
    Some(rounded as i64)
}

/// Divides `numerator` by a positive `denominator`, rounding ties to even.
///
/// Exact for every i128 input, unlike going through f64.
pub(crate) fn div_round_half_even(numerator: i128, denominator: i128) -> i128 {
    debug_assert!(denominator > 0);

    let quotient = numerator / denominator;
    let remainder = numerator % denominator;
    let twice = remainder.abs() * 2;

    if twice > denominator || (twice == denominator && quotient % 2 != 0) {
        quotient + numerator.signum()
    } else {
        quotient
    }
}

/// Returns 10^exponent, or `None` if it does not fit i64.
pub(crate) fn pow10(exponent: u32) -> Option<i64> {
    10_i64.checked_pow(exponent)
}

// =============================================================================
// Unit Tests
// =============================================================================
