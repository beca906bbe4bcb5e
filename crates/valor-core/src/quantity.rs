//! # Quantity Module
//!
//! Unit-aware, fixed-point quantities (1.570 KG, 12 UN, 0.25 L).
//!
//! ## Storage
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Quantity::new(1.57, "kg", Some(2))                                     │
//! │                                                                         │
//! │    unit      = "KG"    (must be registered right now)                  │
//! │    precision = 2       (decimal digits, default 3)                     │
//! │    scaled    = round_half_even(1.57 × 10²) = 157                       │
//! │                                                                         │
//! │  value = scaled / 10^precision = 1.57                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Two quantities combine only when unit AND precision match exactly.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};
use tracing::debug;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::rounding::{pow10, round_half_even_to_i64};
use crate::unit::{Unit, UnitRegistry};

/// Precision used when a constructor is not given one.
pub const DEFAULT_PRECISION: u32 = 3;

/// Largest precision whose scale factor (10^18) fits in i64.
pub const MAX_PRECISION: u32 = 18;

static CURRENT_DEFAULT_PRECISION: AtomicU32 = AtomicU32::new(DEFAULT_PRECISION);

/// Returns the process-wide default precision.
pub fn default_precision() -> u32 {
    CURRENT_DEFAULT_PRECISION.load(Ordering::Relaxed)
}

/// Changes the process-wide default precision.
///
/// ## Errors
/// `Invalid` when `precision` exceeds [`MAX_PRECISION`].
pub fn set_default_precision(precision: u32) -> CoreResult<()> {
    scale_factor(precision)?;
    CURRENT_DEFAULT_PRECISION.store(precision, Ordering::Relaxed);
    debug!(precision, "Default quantity precision updated");
    Ok(())
}

fn scale_factor(precision: u32) -> CoreResult<i64> {
    pow10(precision).ok_or_else(|| {
        ValidationError::OutOfRange {
            field: "precision".to_string(),
            value: precision.to_string(),
            min: "0".to_string(),
            max: MAX_PRECISION.to_string(),
        }
        .into()
    })
}

// =============================================================================
// Quantity
// =============================================================================

/// A measured amount: scaled integer magnitude, unit, and precision.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "QuantityPayload", try_from = "QuantityPayload")]
pub struct Quantity {
    scaled: i64,
    unit: Unit,
    precision: u32,
}

impl Quantity {
    /// Creates a quantity, validating the unit against the global registry.
    ///
    /// `precision` falls back to [`default_precision`] when `None`.
    ///
    /// ## Errors
    /// `Invalid` when the unit is not registered, the precision is above
    /// [`MAX_PRECISION`], or the value is not finite or does not fit.
    ///
    /// ## Example
    /// ```rust
    /// use valor_core::quantity::Quantity;
    /// use valor_core::unit::UnitRegistry;
    ///
    /// UnitRegistry::global().register(["KG"]);
    /// let q = Quantity::new(1.57, "kg", Some(2)).unwrap();
    /// assert_eq!(q.scaled(), 157);
    /// assert_eq!(q.unit().as_str(), "KG");
    /// ```
    pub fn new(value: f64, unit: impl AsRef<str>, precision: Option<u32>) -> CoreResult<Self> {
        Quantity::new_in(UnitRegistry::global(), value, unit, precision)
    }

    /// Creates a quantity, validating the unit against `registry`.
    pub fn new_in(
        registry: &UnitRegistry,
        value: f64,
        unit: impl AsRef<str>,
        precision: Option<u32>,
    ) -> CoreResult<Self> {
        let unit = Unit::parse_in(registry, unit.as_ref())?;
        let precision = precision.unwrap_or_else(default_precision);
        let factor = scale_factor(precision)?;

        if !value.is_finite() {
            return Err(ValidationError::InvalidFormat {
                field: "quantity".to_string(),
                reason: format!("{} is not a finite number", value),
            }
            .into());
        }

        let scaled = round_half_even_to_i64(value * factor as f64).ok_or_else(|| {
            ValidationError::OutOfRange {
                field: "quantity".to_string(),
                value: value.to_string(),
                min: (i64::MIN as f64 / factor as f64).to_string(),
                max: (i64::MAX as f64 / factor as f64).to_string(),
            }
        })?;

        Ok(Quantity {
            scaled,
            unit,
            precision,
        })
    }

    /// Rebuilds a quantity from its persisted scaled integer.
    ///
    /// The unit is still checked against the global registry.
    pub fn from_scaled(scaled: i64, unit: impl AsRef<str>, precision: u32) -> CoreResult<Self> {
        let unit = Unit::parse(unit.as_ref())?;
        scale_factor(precision)?;
        Ok(Quantity {
            scaled,
            unit,
            precision,
        })
    }

    /// Returns the scaled integer magnitude.
    #[inline]
    pub const fn scaled(&self) -> i64 {
        self.scaled
    }

    /// Returns the unit.
    #[inline]
    pub fn unit(&self) -> &Unit {
        &self.unit
    }

    /// Returns the number of decimal digits.
    #[inline]
    pub const fn precision(&self) -> u32 {
        self.precision
    }

    /// Checks if the magnitude is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.scaled == 0
    }

    /// Returns `scaled / 10^precision`.
    pub fn as_f64(&self) -> f64 {
        // precision was bounded at construction, so 10^precision fits
        self.scaled as f64 / 10_f64.powi(self.precision as i32)
    }

    /// Adds two quantities with the same unit and precision.
    ///
    /// ## Errors
    /// - `DomainViolation` (`UnitMismatch`) when units differ
    /// - `DomainViolation` (`PrecisionMismatch`) when precisions differ
    pub fn add(&self, other: &Quantity) -> CoreResult<Self> {
        self.ensure_compatible("add", other)?;
        let scaled = self
            .scaled
            .checked_add(other.scaled)
            .ok_or(CoreError::Overflow { operation: "add" })?;
        Ok(self.with_scaled(scaled))
    }

    /// Subtracts `other` from `self`. Same rules as [`Quantity::add`].
    pub fn subtract(&self, other: &Quantity) -> CoreResult<Self> {
        self.ensure_compatible("subtract", other)?;
        let scaled = self
            .scaled
            .checked_sub(other.scaled)
            .ok_or(CoreError::Overflow {
                operation: "subtract",
            })?;
        Ok(self.with_scaled(scaled))
    }

    /// Prices this quantity: `round_half_even(value × price.amount)`.
    ///
    /// The result is in the price's currency. A zero price returns zero
    /// without multiplying. The unit is not consulted.
    ///
    /// ## Example
    /// ```rust
    /// use valor_core::{Currency, Money, Quantity, UnitRegistry};
    ///
    /// UnitRegistry::global().register(["KG"]);
    /// let weight = Quantity::new(1.57, "KG", Some(2)).unwrap();
    /// let per_kg = Money::new(1031, Currency::Brl); // R$10.31
    ///
    /// // 1.57 × 1031 = 1618.67 → 1619
    /// let total = weight.multiply_by_money(&per_kg).unwrap();
    /// assert_eq!(total, Money::new(1619, Currency::Brl));
    /// ```
    pub fn multiply_by_money(&self, price_per_unit: &Money) -> CoreResult<Money> {
        if price_per_unit.is_zero() {
            return Ok(Money::zero(price_per_unit.currency()));
        }

        let amount = round_half_even_to_i64(self.as_f64() * price_per_unit.amount() as f64)
            .ok_or(CoreError::Overflow {
                operation: "multiply by money",
            })?;
        Ok(Money::new(amount, price_per_unit.currency()))
    }

    fn with_scaled(&self, scaled: i64) -> Self {
        Quantity {
            scaled,
            unit: self.unit.clone(),
            precision: self.precision,
        }
    }

    fn ensure_compatible(&self, operation: &'static str, other: &Quantity) -> CoreResult<()> {
        if self.unit != other.unit {
            return Err(CoreError::UnitMismatch {
                operation,
                left: self.unit.to_string(),
                right: other.unit.to_string(),
            });
        }
        if self.precision != other.precision {
            return Err(CoreError::PrecisionMismatch {
                operation,
                left: self.precision,
                right: other.precision,
            });
        }
        Ok(())
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.*} {}",
            self.precision as usize,
            self.as_f64(),
            self.unit
        )
    }
}

// =============================================================================
// Exchange Format
// =============================================================================

/// JSON shape of a quantity.
///
/// ```text
/// { "value": 1.57, "scaled": 157, "unit": "KG", "precision": 2 }
/// ```
///
/// `scaled` is the exact magnitude and wins when present; `value` alone is
/// accepted from producers that only know the decimal. `precision` is signed
/// on the wire so a negative value decodes into a validation error instead
/// of a type error.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct QuantityPayload {
    pub value: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub scaled: Option<i64>,
    pub unit: String,
    pub precision: i64,
}

impl From<Quantity> for QuantityPayload {
    fn from(quantity: Quantity) -> Self {
        QuantityPayload {
            value: quantity.as_f64(),
            scaled: Some(quantity.scaled),
            unit: quantity.unit.to_string(),
            precision: i64::from(quantity.precision),
        }
    }
}

impl TryFrom<QuantityPayload> for Quantity {
    type Error = CoreError;

    fn try_from(payload: QuantityPayload) -> Result<Self, Self::Error> {
        if payload.precision < 0 {
            return Err(ValidationError::Negative {
                field: "precision".to_string(),
                value: payload.precision.to_string(),
            }
            .into());
        }
        let precision = u32::try_from(payload.precision).map_err(|_| {
            ValidationError::OutOfRange {
                field: "precision".to_string(),
                value: payload.precision.to_string(),
                min: "0".to_string(),
                max: MAX_PRECISION.to_string(),
            }
        })?;
        match payload.scaled {
            Some(scaled) => Quantity::from_scaled(scaled, &payload.unit, precision),
            None => Quantity::new(payload.value, &payload.unit, Some(precision)),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
