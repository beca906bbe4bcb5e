//! # Discount Module
//!
//! A discount is either a fixed amount of money or a percentage of the price.
//!
//! ## Applying a Discount
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  price R$100.00                                                         │
//! │     │                                                                   │
//! │     ├── Fixed(R$15.00)   ──► 10000 - 1500            = R$85.00         │
//! │     ├── Fixed(R$120.00)  ──► 10000 - 12000 = -2000   → R$0.00 (floor)  │
//! │     ├── Percentage(10%)  ──► 10000 - round(10000×10%) = R$90.00        │
//! │     └── None             ──► R$100.00 (identity)                       │
//! │                                                                         │
//! │  A discount never produces a negative price.                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! "No discount" is `Option<Discount>::None`, distinct from a fixed discount
//! of R$0.00.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::percentage::Percentage;

// =============================================================================
// Discount
// =============================================================================

/// A validated discount. Build it with [`Discount::new_fixed`] or
/// [`Discount::new_percentage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "DiscountPayload", try_from = "DiscountPayload")]
pub struct Discount(DiscountKind);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum DiscountKind {
    Fixed(Money),
    Percentage(Percentage),
}

/// Which flavour of discount this is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiscountType {
    Fixed,
    Percentage,
}

impl Discount {
    /// Creates a fixed-amount discount.
    ///
    /// ## Errors
    /// `Invalid` when `amount` is negative. Zero is allowed.
    pub fn new_fixed(amount: Money) -> CoreResult<Self> {
        if amount.is_negative() {
            return Err(ValidationError::Negative {
                field: "discount".to_string(),
                value: amount.to_string(),
            }
            .into());
        }
        Ok(Discount(DiscountKind::Fixed(amount)))
    }

    /// Creates a percentage discount between 0% and 100% inclusive.
    ///
    /// ## Errors
    /// `Invalid` when `rate` is above 100%.
    ///
    /// ## Example
    /// ```rust
    /// use valor_core::{Discount, Percentage};
    ///
    /// assert!(Discount::new_percentage(Percentage::from_fraction(0.15).unwrap()).is_ok());
    /// assert!(Discount::new_percentage(Percentage::from_fraction(1.01).unwrap()).is_err());
    /// ```
    pub fn new_percentage(rate: Percentage) -> CoreResult<Self> {
        if rate > Percentage::ONE_HUNDRED {
            return Err(ValidationError::OutOfRange {
                field: "discount".to_string(),
                value: rate.to_string(),
                min: Percentage::ZERO.to_string(),
                max: Percentage::ONE_HUNDRED.to_string(),
            }
            .into());
        }
        Ok(Discount(DiscountKind::Percentage(rate)))
    }

    /// Returns whether this is a fixed or percentage discount.
    pub fn discount_type(&self) -> DiscountType {
        match self.0 {
            DiscountKind::Fixed(_) => DiscountType::Fixed,
            DiscountKind::Percentage(_) => DiscountType::Percentage,
        }
    }

    /// Returns the fixed amount, if this is a fixed discount.
    pub fn fixed_amount(&self) -> Option<Money> {
        match self.0 {
            DiscountKind::Fixed(amount) => Some(amount),
            DiscountKind::Percentage(_) => None,
        }
    }

    /// Returns the rate, if this is a percentage discount.
    pub fn rate(&self) -> Option<Percentage> {
        match self.0 {
            DiscountKind::Fixed(_) => None,
            DiscountKind::Percentage(rate) => Some(rate),
        }
    }

    /// Returns the discounted price, floored at zero.
    ///
    /// ## Errors
    /// `DomainViolation` when a fixed discount's currency differs from the price's.
    ///
    /// ## Example
    /// ```rust
    /// use valor_core::{Currency, Discount, Money};
    ///
    /// let coupon = Discount::new_fixed(Money::new(12000, Currency::Brl)).unwrap();
    /// let price = Money::new(10000, Currency::Brl);
    /// assert_eq!(coupon.apply_to(&price).unwrap(), Money::zero(Currency::Brl));
    /// ```
    pub fn apply_to(&self, price: &Money) -> CoreResult<Money> {
        let discounted = match self.0 {
            DiscountKind::Fixed(amount) => {
                if amount.currency() != price.currency() {
                    return Err(CoreError::CurrencyMismatch {
                        operation: "apply discount",
                        left: amount.currency(),
                        right: price.currency(),
                    });
                }
                price.subtract(&amount)?
            }
            DiscountKind::Percentage(rate) => price.subtract(&rate.apply_to(price)?)?,
        };

        if discounted.is_negative() {
            return Ok(Money::zero(price.currency()));
        }
        Ok(discounted)
    }

    /// Applies an optional discount; `None` returns the price unchanged.
    pub fn apply_optional(discount: Option<&Discount>, price: &Money) -> CoreResult<Money> {
        match discount {
            Some(discount) => discount.apply_to(price),
            None => Ok(*price),
        }
    }

    /// Returns how much this discount takes off `price` (after the zero floor).
    pub fn amount_off(&self, price: &Money) -> CoreResult<Money> {
        price.subtract(&self.apply_to(price)?)
    }
}

// =============================================================================
// Exchange Format
// =============================================================================

/// JSON shape of a discount.
///
/// ```text
/// { "type": "fixed",      "value": { "amount": 1500, "currency": "BRL" } }
/// { "type": "percentage", "value": 0.15 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum DiscountPayload {
    Fixed(Money),
    Percentage(Percentage),
}

impl From<Discount> for DiscountPayload {
    fn from(discount: Discount) -> Self {
        match discount.0 {
            DiscountKind::Fixed(amount) => DiscountPayload::Fixed(amount),
            DiscountKind::Percentage(rate) => DiscountPayload::Percentage(rate),
        }
    }
}

impl TryFrom<DiscountPayload> for Discount {
    type Error = CoreError;

    fn try_from(payload: DiscountPayload) -> Result<Self, Self::Error> {
        match payload {
            DiscountPayload::Fixed(amount) => Discount::new_fixed(amount),
            DiscountPayload::Percentage(rate) => Discount::new_percentage(rate),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
