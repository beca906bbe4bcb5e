//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In floating point:                                                     │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  Naive split:                                                           │
//! │    R$10.00 / 3 = R$3.33 (×3 = R$9.99)  → Lost R$0.01!                  │
//! │                                                                         │
//! │  OUR SOLUTION: Integer minor units + fair split                         │
//! │    1000 / 3 = 333 remainder 1 → [334, 333, 333]  (sum = 1000)          │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use valor_core::currency::Currency;
//! use valor_core::money::Money;
//!
//! let price = Money::new(1099, Currency::Brl); // R$10.99
//! let total = price.add(&Money::new(500, Currency::Brl)).unwrap();
//! assert_eq!(total.amount(), 1599);
//!
//! // Different currencies never mix
//! assert!(price.add(&Money::new(500, Currency::Usd)).is_err());
//! ```

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::currency::Currency;
use crate::error::{CoreError, CoreResult, ValidationError};

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents for BRL/USD).
///
/// ## Design Decisions
/// - **i64 (signed)**: Allows negative values for refunds and differences
/// - **Currency is always valid**: the type system rules out unknown codes
/// - **No sentinel**: "no money assigned" is `Option<Money>::None`, so
///   `Money::zero(Currency::Brl)` always means a real zero in BRL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, TS)]
#[ts(export)]
pub struct Money {
    amount: i64,
    currency: Currency,
}

impl Money {
    /// Creates Money from minor units in an already-validated currency.
    ///
    /// ## Example
    /// ```rust
    /// use valor_core::{Currency, Money};
    ///
    /// let price = Money::new(1099, Currency::Usd); // $10.99
    /// assert_eq!(price.amount(), 1099);
    /// ```
    #[inline]
    pub const fn new(amount: i64, currency: Currency) -> Self {
        Money { amount, currency }
    }

    /// Creates Money from minor units and a raw currency code.
    ///
    /// ## Errors
    /// `Invalid` when the code is blank or not an accepted currency.
    ///
    /// ## Example
    /// ```rust
    /// use valor_core::Money;
    ///
    /// assert!(Money::parse(1000, "brl").is_ok());
    /// assert!(Money::parse(1000, "").is_err());
    /// assert!(Money::parse(1000, "XYZ").is_err());
    /// ```
    pub fn parse(amount: i64, currency_code: &str) -> CoreResult<Self> {
        let currency = currency_code.parse::<Currency>()?;
        Ok(Money::new(amount, currency))
    }

    /// Returns zero in the given currency.
    #[inline]
    pub const fn zero(currency: Currency) -> Self {
        Money::new(0, currency)
    }

    /// Returns the amount in minor units.
    #[inline]
    pub const fn amount(&self) -> i64 {
        self.amount
    }

    /// Returns the currency.
    #[inline]
    pub const fn currency(&self) -> Currency {
        self.currency
    }

    /// Checks if the amount is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.amount == 0
    }

    /// Checks if the amount is greater than zero.
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.amount > 0
    }

    /// Checks if the amount is less than zero.
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.amount < 0
    }

    /// Returns the absolute value.
    pub fn abs(&self) -> CoreResult<Self> {
        self.amount
            .checked_abs()
            .map(|amount| Money::new(amount, self.currency))
            .ok_or(CoreError::Overflow { operation: "abs" })
    }

    /// Returns the amount with its sign flipped.
    pub fn negate(&self) -> CoreResult<Self> {
        self.amount
            .checked_neg()
            .map(|amount| Money::new(amount, self.currency))
            .ok_or(CoreError::Overflow { operation: "negate" })
    }

    /// Adds two amounts in the same currency.
    ///
    /// ## Errors
    /// `DomainViolation` when the currencies differ.
    pub fn add(&self, other: &Money) -> CoreResult<Self> {
        self.ensure_same_currency("add", other)?;
        self.amount
            .checked_add(other.amount)
            .map(|amount| Money::new(amount, self.currency))
            .ok_or(CoreError::Overflow { operation: "add" })
    }

    /// Subtracts `other` from `self`. The result may be negative.
    ///
    /// ## Errors
    /// `DomainViolation` when the currencies differ.
    pub fn subtract(&self, other: &Money) -> CoreResult<Self> {
        self.ensure_same_currency("subtract", other)?;
        self.amount
            .checked_sub(other.amount)
            .map(|amount| Money::new(amount, self.currency))
            .ok_or(CoreError::Overflow {
                operation: "subtract",
            })
    }

    /// Multiplies the amount by an integer factor.
    ///
    /// ## Example
    /// ```rust
    /// use valor_core::{Currency, Money};
    ///
    /// let unit_price = Money::new(299, Currency::Usd);
    /// assert_eq!(unit_price.multiply(3).unwrap().amount(), 897);
    /// ```
    pub fn multiply(&self, factor: i64) -> CoreResult<Self> {
        self.amount
            .checked_mul(factor)
            .map(|amount| Money::new(amount, self.currency))
            .ok_or(CoreError::Overflow {
                operation: "multiply",
            })
    }

    /// Splits the amount into `parts` values that differ by at most one minor unit.
    ///
    /// ## Algorithm
    /// ```text
    /// 1000 split 3:  quotient 333, remainder 1
    ///                [333+1, 333, 333] = [334, 333, 333]
    ///
    /// -1000 split 3: quotient -333, remainder -1
    ///                [-333-1, -333, -333] = [-334, -333, -333]
    /// ```
    /// The remainder is handed out one unit at a time to the FIRST parts,
    /// so the parts always sum to the original amount.
    ///
    /// ## Errors
    /// `Invalid` when `parts` is zero.
    pub fn split(&self, parts: usize) -> CoreResult<Vec<Money>> {
        if parts == 0 {
            return Err(ValidationError::MustBePositive {
                field: "parts".to_string(),
                value: parts.to_string(),
            }
            .into());
        }

        // usize → i64 only fails on absurd part counts; report as overflow.
        let divisor = i64::try_from(parts).map_err(|_| CoreError::Overflow {
            operation: "split",
        })?;
        let quotient = self.amount / divisor;
        let remainder = self.amount % divisor;
        let step = remainder.signum();
        let extra = remainder.unsigned_abs() as usize;

        Ok((0..parts)
            .map(|index| {
                let amount = if index < extra { quotient + step } else { quotient };
                Money::new(amount, self.currency)
            })
            .collect())
    }

    /// Returns true if `self` is strictly greater than `other`.
    ///
    /// ## Errors
    /// `DomainViolation` when the currencies differ. Different currencies
    /// are never silently reported as "not greater".
    pub fn greater_than(&self, other: &Money) -> CoreResult<bool> {
        self.ensure_same_currency("compare", other)?;
        Ok(self.amount > other.amount)
    }

    /// Returns true if `self` is strictly less than `other`.
    ///
    /// ## Errors
    /// `DomainViolation` when the currencies differ.
    pub fn less_than(&self, other: &Money) -> CoreResult<bool> {
        self.ensure_same_currency("compare", other)?;
        Ok(self.amount < other.amount)
    }

    /// Returns the amount in major units as a float.
    ///
    /// Display only. Financial logic must never depend on this value.
    #[inline]
    pub fn as_f64(&self) -> f64 {
        self.amount as f64 / 100.0
    }

    fn ensure_same_currency(&self, operation: &'static str, other: &Money) -> CoreResult<()> {
        if self.currency != other.currency {
            return Err(CoreError::CurrencyMismatch {
                operation,
                left: self.currency,
                right: other.currency,
            });
        }
        Ok(())
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Debug-friendly rendering, e.g. `BRL 10.99` or `USD -5.50`.
///
/// Use frontend formatting for actual UI display to handle localization.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.amount < 0 { "-" } else { "" };
        let magnitude = self.amount.unsigned_abs();
        write!(
            f,
            "{} {}{}.{:02}",
            self.currency,
            sign,
            magnitude / 100,
            magnitude % 100
        )
    }
}

/// Wire shape for decoding; `Currency` re-validates the code.
#[derive(Deserialize)]
struct MoneyPayload {
    amount: i64,
    currency: Currency,
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let payload = MoneyPayload::deserialize(deserializer)?;
        Ok(Money::new(payload.amount, payload.currency))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    fn brl(amount: i64) -> Money {
        Money::new(amount, Currency::Brl)
    }

    #[test]
    fn test_parse() {
        let money = Money::parse(1099, " brl ").unwrap();
        assert_eq!(money, brl(1099));

        assert_eq!(Money::parse(1, "").unwrap_err().kind(), ErrorKind::Invalid);
        assert_eq!(Money::parse(1, "XYZ").unwrap_err().kind(), ErrorKind::Invalid);
    }

    #[test]
    fn test_display() {
        assert_eq!(brl(1099).to_string(), "BRL 10.99");
        assert_eq!(Money::new(500, Currency::Usd).to_string(), "USD 5.00");
        assert_eq!(brl(-550).to_string(), "BRL -5.50");
        assert_eq!(brl(-5).to_string(), "BRL -0.05");
        assert_eq!(brl(0).to_string(), "BRL 0.00");
    }

    #[test]
    fn test_add_and_subtract() {
        assert_eq!(brl(1000).add(&brl(500)).unwrap(), brl(1500));
        assert_eq!(brl(500).subtract(&brl(1000)).unwrap(), brl(-500));
    }

    #[test]
    fn test_currency_mismatch_is_domain_violation() {
        let usd = Money::new(500, Currency::Usd);

        let err = brl(1000).add(&usd).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DomainViolation);
        assert!(matches!(
            err,
            CoreError::CurrencyMismatch {
                operation: "add",
                left: Currency::Brl,
                right: Currency::Usd
            }
        ));

        assert_eq!(
            brl(1000).subtract(&usd).unwrap_err().kind(),
            ErrorKind::DomainViolation
        );
        assert_eq!(
            brl(1000).greater_than(&usd).unwrap_err().kind(),
            ErrorKind::DomainViolation
        );
        assert_eq!(
            brl(1000).less_than(&usd).unwrap_err().kind(),
            ErrorKind::DomainViolation
        );
    }

    #[test]
    fn test_comparisons() {
        assert!(brl(1000).greater_than(&brl(999)).unwrap());
        assert!(!brl(1000).greater_than(&brl(1000)).unwrap());
        assert!(brl(999).less_than(&brl(1000)).unwrap());
        assert!(!brl(1000).less_than(&brl(1000)).unwrap());
    }

    #[test]
    fn test_multiply() {
        assert_eq!(brl(299).multiply(3).unwrap(), brl(897));
        assert_eq!(brl(299).multiply(-1).unwrap(), brl(-299));
        assert_eq!(
            brl(i64::MAX).multiply(2).unwrap_err().kind(),
            ErrorKind::Internal
        );
    }

    #[test]
    fn test_overflow_is_reported() {
        let err = brl(i64::MAX).add(&brl(1)).unwrap_err();
        assert!(matches!(err, CoreError::Overflow { operation: "add" }));
        assert!(brl(i64::MIN).negate().is_err());
        assert!(brl(i64::MIN).abs().is_err());
    }

    #[test]
    fn test_split_gives_remainder_to_first_parts() {
        let parts = brl(1000).split(3).unwrap();
        assert_eq!(parts, vec![brl(334), brl(333), brl(333)]);

        let parts = brl(1001).split(4).unwrap();
        assert_eq!(parts, vec![brl(251), brl(250), brl(250), brl(250)]);

        let parts = brl(1002).split(4).unwrap();
        assert_eq!(parts, vec![brl(251), brl(251), brl(250), brl(250)]);
    }

    #[test]
    fn test_split_negative_amount() {
        let parts = brl(-1000).split(3).unwrap();
        assert_eq!(parts, vec![brl(-334), brl(-333), brl(-333)]);
    }

    #[test]
    fn test_split_more_parts_than_units() {
        let parts = brl(2).split(5).unwrap();
        assert_eq!(parts, vec![brl(1), brl(1), brl(0), brl(0), brl(0)]);
    }

    #[test]
    fn test_split_zero_parts_is_invalid() {
        let err = brl(1000).split(0).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Invalid);
    }

    /// The naive `amount / n` loses a cent; split never does.
    #[test]
    fn test_split_never_loses_a_cent() {
        let ten = brl(1000);
        let naive = brl(1000 / 3).multiply(3).unwrap();
        assert_eq!(ten.subtract(&naive).unwrap(), brl(1));

        let total = ten
            .split(3)
            .unwrap()
            .iter()
            .try_fold(Money::zero(Currency::Brl), |acc, part| acc.add(part))
            .unwrap();
        assert_eq!(total, ten);
    }

    #[test]
    fn test_as_f64() {
        assert!((brl(1099).as_f64() - 10.99).abs() < 1e-9);
    }

    #[test]
    fn test_zero_in_currency_is_not_absent() {
        let zero = Money::zero(Currency::Brl);
        assert!(zero.is_zero());
        assert_eq!(zero.currency(), Currency::Brl);

        let absent: Option<Money> = None;
        assert_ne!(absent, Some(zero));
    }

    #[test]
    fn test_sign_checks() {
        assert!(brl(100).is_positive());
        assert!(brl(-100).is_negative());
        assert!(!brl(0).is_positive() && !brl(0).is_negative());
    }

    #[test]
    fn test_equality_includes_currency() {
        assert_ne!(brl(100), Money::new(100, Currency::Usd));
    }

    #[test]
    fn test_json() {
        let json = serde_json::to_value(brl(1031)).unwrap();
        assert_eq!(json, serde_json::json!({ "amount": 1031, "currency": "BRL" }));

        let back: Money = serde_json::from_value(json).unwrap();
        assert_eq!(back, brl(1031));

        let unknown = serde_json::json!({ "amount": 1, "currency": "XYZ" });
        assert!(serde_json::from_value::<Money>(unknown).is_err());

        let blank = serde_json::json!({ "amount": 1, "currency": "" });
        assert!(serde_json::from_value::<Money>(blank).is_err());
    }
}
