//! # Currency Module
//!
//! A closed set of ISO 4217 codes accepted by the system.
//!
//! ## Empty vs. Unknown
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Currency::parse(input)                                                 │
//! │                                                                         │
//! │   "brl " ──► trim + uppercase ──► "BRL" ──► Ok(Some(Currency::Brl))    │
//! │   "   "  ──► blank             ─────────► Ok(None)   (no currency)     │
//! │   "XYZ"  ──► not in allow-list ─────────► Err(Invalid, value="XYZ")    │
//! │                                                                         │
//! │  "No currency assigned" is Option::None, never a Currency value.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};

// =============================================================================
// Currency
// =============================================================================

/// A validated three-letter currency code.
///
/// Holding a `Currency` proves the code is on the allow-list, so `Money`
/// never re-validates it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// Brazilian real.
    Brl,
    /// US dollar.
    Usd,
    /// Euro.
    Eur,
    /// Pound sterling.
    Gbp,
    /// Japanese yen.
    Jpy,
    /// Swiss franc.
    Chf,
    /// Canadian dollar.
    Cad,
    /// Australian dollar.
    Aud,
    /// Chinese yuan.
    Cny,
    /// Argentine peso.
    Ars,
    /// Chilean peso.
    Clp,
    /// Mexican peso.
    Mxn,
}

impl Currency {
    /// Every accepted currency, in declaration order.
    pub const ALL: [Currency; 12] = [
        Currency::Brl,
        Currency::Usd,
        Currency::Eur,
        Currency::Gbp,
        Currency::Jpy,
        Currency::Chf,
        Currency::Cad,
        Currency::Aud,
        Currency::Cny,
        Currency::Ars,
        Currency::Clp,
        Currency::Mxn,
    ];

    /// Parses a currency code, treating blank input as "no currency".
    ///
    /// ## Example
    /// ```rust
    /// use valor_core::currency::Currency;
    ///
    /// assert_eq!(Currency::parse(" brl ").unwrap(), Some(Currency::Brl));
    /// assert_eq!(Currency::parse("").unwrap(), None);
    /// assert!(Currency::parse("XYZ").is_err());
    /// ```
    pub fn parse(code: &str) -> CoreResult<Option<Currency>> {
        let normalized = code.trim().to_uppercase();
        if normalized.is_empty() {
            return Ok(None);
        }

        Currency::ALL
            .into_iter()
            .find(|currency| currency.code() == normalized)
            .map(Some)
            .ok_or_else(|| {
                ValidationError::NotAllowed {
                    field: "currency".to_string(),
                    value: code.to_string(),
                    allowed: Currency::ALL.iter().map(|c| c.code().to_string()).collect(),
                }
                .into()
            })
    }

    /// Returns true if `code` names an accepted currency (blank is not valid).
    pub fn is_valid_code(code: &str) -> bool {
        matches!(Currency::parse(code), Ok(Some(_)))
    }

    /// Returns the three-letter code.
    pub const fn code(&self) -> &'static str {
        match self {
            Currency::Brl => "BRL",
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
            Currency::Jpy => "JPY",
            Currency::Chf => "CHF",
            Currency::Cad => "CAD",
            Currency::Aud => "AUD",
            Currency::Cny => "CNY",
            Currency::Ars => "ARS",
            Currency::Clp => "CLP",
            Currency::Mxn => "MXN",
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Strict parsing: a concrete Currency is requested, so blank input is an error.
impl FromStr for Currency {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Currency::parse(s)?.ok_or_else(|| {
            ValidationError::Required {
                field: "currency".to_string(),
            }
            .into()
        })
    }
}

impl<'de> Deserialize<'de> for Currency {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let code = String::deserialize(deserializer)?;
        code.parse().map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
