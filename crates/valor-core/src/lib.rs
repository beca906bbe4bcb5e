//! # valor-core: Always-Valid Monetary and Quantity Values
//!
//! Immutable domain primitives that replace raw integers and strings. Once a
//! value exists it has passed validation; every operation returns a new value.
//!
//! ## Dependency Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   ┌───────────┐   ┌────────────┐   ┌──────────────────┐                │
//! │   │ currency  │   │ percentage │   │ unit (registry)  │   leaves       │
//! │   └─────┬─────┘   └─────┬──────┘   └────────┬─────────┘                │
//! │         │               │                   │                          │
//! │   ┌─────▼─────┐         │                   │                          │
//! │   │   money   │◄────────┤                   │                          │
//! │   └─────┬─────┘         │                   │                          │
//! │         │               │                   │                          │
//! │   ┌─────▼───────────────▼──┐   ┌────────────▼──────┐                   │
//! │   │       discount         │   │     quantity      │◄── money         │
//! │   └────────────────────────┘   └───────────────────┘                   │
//! │                                                                         │
//! │   NO I/O • NO ASYNC • PURE FUNCTIONS (registry writes aside)           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`currency`] - Closed set of accepted currency codes
//! - [`money`] - Integer minor units paired with a Currency
//! - [`percentage`] - Basis-point percentages with Bankers Rounding
//! - [`unit`] - Unit symbols and the process-wide registry
//! - [`quantity`] - Fixed-point quantities with a unit and precision
//! - [`discount`] - Fixed or percentage discounts, floored at zero
//! - [`config`] - Start-up configuration (TOML + environment)
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Integer Money**: All monetary values are minor units (i64)
//! 2. **Bankers Rounding**: Every float → integer step rounds half to even
//! 3. **No Sentinels**: "absent" is `Option::None`, never a zero value
//! 4. **Explicit Errors**: All failures are typed results, never panics
//!
//! ## Example Usage
//!
//! ```rust
//! use valor_core::{Currency, Discount, Money, Percentage, Quantity, UnitRegistry};
//!
//! UnitRegistry::global().register(["KG"]);
//!
//! let per_kg = Money::new(1031, Currency::Brl);
//! let weight = Quantity::new(1.57, "KG", Some(2)).unwrap();
//! let price = weight.multiply_by_money(&per_kg).unwrap();
//! assert_eq!(price.amount(), 1619);
//!
//! let promo = Discount::new_percentage(Percentage::from_fraction(0.10).unwrap()).unwrap();
//! let to_pay = promo.apply_to(&price).unwrap();
//! assert_eq!(to_pay.amount(), 1457); // 1619 - round(161.9)
//!
//! let shares = to_pay.split(3).unwrap();
//! assert_eq!(shares.iter().map(Money::amount).sum::<i64>(), 1457);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod currency;
pub mod discount;
pub mod error;
pub mod money;
pub mod percentage;
pub mod quantity;
pub mod unit;

mod rounding;

#[cfg(feature = "sqlx")]
pub mod persistence;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use valor_core::Money` instead of
// `use valor_core::money::Money`

pub use config::{ConfigError, ValorConfig};
pub use currency::Currency;
pub use discount::{Discount, DiscountType};
pub use error::{CoreError, CoreResult, ErrorKind, ValidationError};
pub use money::Money;
pub use percentage::Percentage;
pub use quantity::Quantity;
pub use unit::{Unit, UnitRegistry};
