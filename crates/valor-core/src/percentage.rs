//! # Percentage Module
//!
//! Non-negative fixed-point fractions stored in basis points.
//!
//! ## Why Basis Points?
//! ```text
//! 1 basis point = 0.01% = 1/10000
//!
//!   fraction   stored
//!   0.25   →   2500   (25%)
//!   0.155  →   1550   (15.5%)
//!   0.0825 →    825   (8.25%)
//! ```
//! Floats are only accepted at the edge (`from_fraction`) and rounded once,
//! ties to even. Everything after that is integer math.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::rounding::{div_round_half_even, round_half_even_to_i64};

/// Stored units per 1.0 (100%).
pub const BASIS_POINTS_SCALE: i64 = 10_000;

/// Largest accepted value in basis points (10^15, a fraction of 10^11).
///
/// Every value up to here survives `bps / 10000` as f64 and back exactly,
/// so the decimal-fraction exchange format is lossless.
pub const MAX_BASIS_POINTS: i64 = 1_000_000_000_000_000;

// =============================================================================
// Percentage
// =============================================================================

/// A non-negative percentage in basis points, at most [`MAX_BASIS_POINTS`].
///
/// `Discount` further caps its percentages at 100%.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, TS)]
#[ts(export)]
pub struct Percentage(#[ts(type = "number")] i64);

impl Percentage {
    /// 0%.
    pub const ZERO: Percentage = Percentage(0);

    /// 100%.
    pub const ONE_HUNDRED: Percentage = Percentage(BASIS_POINTS_SCALE);

    /// Creates a percentage from a decimal fraction (0.155 = 15.5%).
    ///
    /// The fraction is scaled by 10 000 and rounded half to even.
    ///
    /// ## Errors
    /// `Invalid` for negative, NaN, infinite, or out-of-range input.
    ///
    /// ## Example
    /// ```rust
    /// use valor_core::Percentage;
    ///
    /// assert_eq!(Percentage::from_fraction(0.155).unwrap().basis_points(), 1550);
    /// assert_eq!(Percentage::from_fraction(0.12345).unwrap().basis_points(), 1234);
    /// assert_eq!(Percentage::from_fraction(0.12355).unwrap().basis_points(), 1236);
    /// assert!(Percentage::from_fraction(-0.01).is_err());
    /// ```
    pub fn from_fraction(fraction: f64) -> CoreResult<Self> {
        if fraction.is_nan() {
            return Err(ValidationError::InvalidFormat {
                field: "percentage".to_string(),
                reason: "not a number".to_string(),
            }
            .into());
        }
        if fraction < 0.0 {
            return Err(ValidationError::Negative {
                field: "percentage".to_string(),
                value: fraction.to_string(),
            }
            .into());
        }

        round_half_even_to_i64(fraction * BASIS_POINTS_SCALE as f64)
            .filter(|scaled| *scaled <= MAX_BASIS_POINTS)
            .map(Percentage)
            .ok_or_else(|| out_of_range(fraction.to_string()))
    }

    /// Creates a percentage from basis points (825 = 8.25%).
    ///
    /// ## Errors
    /// `Invalid` for negative input or input above [`MAX_BASIS_POINTS`].
    pub fn from_basis_points(basis_points: i64) -> CoreResult<Self> {
        if basis_points < 0 {
            return Err(ValidationError::Negative {
                field: "percentage".to_string(),
                value: basis_points.to_string(),
            }
            .into());
        }
        if basis_points > MAX_BASIS_POINTS {
            return Err(out_of_range(Percentage(basis_points).as_f64().to_string()));
        }
        Ok(Percentage(basis_points))
    }

    /// Returns the stored value in basis points.
    #[inline]
    pub const fn basis_points(&self) -> i64 {
        self.0
    }

    /// Returns the decimal fraction (0.155 for 15.5%).
    #[inline]
    pub fn as_f64(&self) -> f64 {
        self.0 as f64 / BASIS_POINTS_SCALE as f64
    }

    /// Checks if the percentage is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Returns this percentage of `money`, in the same currency.
    ///
    /// Computed exactly as `amount × bps / 10000`, rounded half to even.
    ///
    /// ## Example
    /// ```rust
    /// use valor_core::{Currency, Money, Percentage};
    ///
    /// let price = Money::new(1000, Currency::Brl);
    /// let rate = Percentage::from_basis_points(825).unwrap();
    /// // 1000 × 8.25% = 82.5 → 82 (ties to even)
    /// assert_eq!(rate.apply_to(&price).unwrap().amount(), 82);
    /// ```
    pub fn apply_to(&self, money: &Money) -> CoreResult<Money> {
        let product = money.amount() as i128 * self.0 as i128;
        let amount = div_round_half_even(product, BASIS_POINTS_SCALE as i128);
        let amount = i64::try_from(amount).map_err(|_| CoreError::Overflow {
            operation: "apply percentage",
        })?;
        Ok(Money::new(amount, money.currency()))
    }
}

fn out_of_range(value: String) -> CoreError {
    ValidationError::OutOfRange {
        field: "percentage".to_string(),
        value,
        min: "0".to_string(),
        max: (MAX_BASIS_POINTS / BASIS_POINTS_SCALE).to_string(),
    }
    .into()
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Renders as a percent with trailing zeros trimmed, e.g. `15.5%`.
impl fmt::Display for Percentage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / 100;
        let hundredths = self.0 % 100;
        match hundredths {
            0 => write!(f, "{}%", whole),
            h if h % 10 == 0 => write!(f, "{}.{}%", whole, h / 10),
            h => write!(f, "{}.{:02}%", whole, h),
        }
    }
}

/// Exchange format is the decimal fraction (0.25 for 25%).
impl Serialize for Percentage {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(self.as_f64())
    }
}

impl<'de> Deserialize<'de> for Percentage {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let fraction = f64::deserialize(deserializer)?;
        Percentage::from_fraction(fraction).map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::currency::Currency;
    use crate::error::ErrorKind;

    fn brl(amount: i64) -> Money {
        Money::new(amount, Currency::Brl)
    }

    #[test]
    fn test_from_fraction_rounds_half_to_even() {
        assert_eq!(Percentage::from_fraction(0.12345).unwrap().basis_points(), 1234);
        assert_eq!(Percentage::from_fraction(0.12355).unwrap().basis_points(), 1236);
        assert_eq!(Percentage::from_fraction(0.155).unwrap().basis_points(), 1550);
        assert_eq!(Percentage::from_fraction(0.0).unwrap(), Percentage::ZERO);
        assert_eq!(Percentage::from_fraction(1.0).unwrap(), Percentage::ONE_HUNDRED);
    }

    #[test]
    fn test_from_fraction_rejects_bad_input() {
        let err = Percentage::from_fraction(-0.0001).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Invalid);
        assert!(Percentage::from_fraction(f64::NAN).is_err());
        assert!(Percentage::from_fraction(f64::INFINITY).is_err());
    }

    #[test]
    fn test_above_one_hundred_percent() {
        let p = Percentage::from_fraction(2.5).unwrap();
        assert_eq!(p.basis_points(), 25_000);
    }

    #[test]
    fn test_upper_bound() {
        let max = Percentage::from_fraction(1e11).unwrap();
        assert_eq!(max.basis_points(), MAX_BASIS_POINTS);

        let err = Percentage::from_fraction(1.000_000_1e11).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Invalid);

        let err = Percentage::from_basis_points(MAX_BASIS_POINTS + 1).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Invalid);
        assert!(Percentage::from_basis_points(i64::MAX).is_err());
    }

    #[test]
    fn test_from_basis_points() {
        assert_eq!(Percentage::from_basis_points(825).unwrap().basis_points(), 825);
        assert!(Percentage::from_basis_points(-1).is_err());
    }

    #[test]
    fn test_as_f64() {
        let p = Percentage::from_basis_points(1550).unwrap();
        assert!((p.as_f64() - 0.155).abs() < 1e-12);
    }

    #[test]
    fn test_apply_to() {
        let ten_percent = Percentage::from_basis_points(1000).unwrap();
        assert_eq!(ten_percent.apply_to(&brl(10000)).unwrap(), brl(1000));

        // 1000 × 8.25% = 82.5 → 82, 1010 × 8.25% = 83.325 → 83
        let rate = Percentage::from_basis_points(825).unwrap();
        assert_eq!(rate.apply_to(&brl(1000)).unwrap(), brl(82));
        assert_eq!(rate.apply_to(&brl(1010)).unwrap(), brl(83));

        // 30 × 5% = 1.5 → 2, 50 × 5% = 2.5 → 2
        let five = Percentage::from_basis_points(500).unwrap();
        assert_eq!(five.apply_to(&brl(30)).unwrap(), brl(2));
        assert_eq!(five.apply_to(&brl(50)).unwrap(), brl(2));
        assert_eq!(five.apply_to(&brl(-50)).unwrap(), brl(-2));
    }

    #[test]
    fn test_apply_to_keeps_currency() {
        let p = Percentage::from_basis_points(5000).unwrap();
        let usd = Money::new(100, Currency::Usd);
        assert_eq!(p.apply_to(&usd).unwrap().currency(), Currency::Usd);
    }

    #[test]
    fn test_apply_to_overflow() {
        let huge = Percentage::from_basis_points(MAX_BASIS_POINTS).unwrap();
        let err = huge.apply_to(&brl(i64::MAX)).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Internal);
    }

    #[test]
    fn test_ordering() {
        let low = Percentage::from_basis_points(100).unwrap();
        let high = Percentage::from_basis_points(200).unwrap();
        assert!(low < high);
        assert_eq!(low, Percentage::from_fraction(0.01).unwrap());
    }

    #[test]
    fn test_display() {
        assert_eq!(Percentage::from_basis_points(1550).unwrap().to_string(), "15.5%");
        assert_eq!(Percentage::from_basis_points(825).unwrap().to_string(), "8.25%");
        assert_eq!(Percentage::from_basis_points(2500).unwrap().to_string(), "25%");
        assert_eq!(Percentage::from_basis_points(5).unwrap().to_string(), "0.05%");
    }

    #[test]
    fn test_json() {
        let p = Percentage::from_basis_points(2500).unwrap();
        assert_eq!(serde_json::to_string(&p).unwrap(), "0.25");
        let back: Percentage = serde_json::from_str("0.25").unwrap();
        assert_eq!(back, p);
        assert!(serde_json::from_str::<Percentage>("-0.1").is_err());
    }

    #[test]
    fn test_json_is_lossless_at_the_bounds() {
        for bps in [1, MAX_BASIS_POINTS - 1, MAX_BASIS_POINTS] {
            let p = Percentage::from_basis_points(bps).unwrap();
            let json = serde_json::to_string(&p).unwrap();
            assert_eq!(serde_json::from_str::<Percentage>(&json).unwrap(), p);
        }
    }
}
