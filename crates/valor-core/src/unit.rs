//! # Unit Module
//!
//! Measurement-unit symbols and the registry that decides which are allowed.
//!
//! ## Registry Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Start-up                      Runtime                                  │
//! │  ────────                      ───────                                  │
//! │  ValorConfig::apply()          Quantity::new(1.5, "kg", None)           │
//! │    └─► registry.register(...)    └─► registry.is_valid("KG")  (read)   │
//! │                                                                         │
//! │  Writes take the write lock; lookups share the read lock.              │
//! │  Validity is checked at the moment of use, never cached.               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Unregistering a symbol makes `Unit::is_valid` return false for it, but
//! quantities already built with that unit stay as they are.

use parking_lot::RwLock;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::LazyLock;
use tracing::debug;
use ts_rs::TS;

use crate::error::{CoreResult, ValidationError};

/// Process-wide registry shared by `Unit::parse`, `Quantity::new` and serde.
static GLOBAL_REGISTRY: LazyLock<UnitRegistry> = LazyLock::new(UnitRegistry::new);

fn normalize(symbol: &str) -> String {
    symbol.trim().to_uppercase()
}

// =============================================================================
// Unit Registry
// =============================================================================

/// A thread-safe allow-list of normalized unit symbols.
///
/// Use [`UnitRegistry::global`] for the process-wide instance, or create a
/// local one and pass it to [`Quantity::new_in`](crate::quantity::Quantity::new_in).
#[derive(Debug, Default)]
pub struct UnitRegistry {
    symbols: RwLock<BTreeSet<String>>,
}

impl UnitRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the process-wide registry.
    pub fn global() -> &'static UnitRegistry {
        &GLOBAL_REGISTRY
    }

    /// Registers symbols after trimming and upper-casing them.
    ///
    /// Blank symbols are skipped. Registering a known symbol again is a no-op.
    ///
    /// ## Example
    /// ```rust
    /// use valor_core::unit::UnitRegistry;
    ///
    /// let registry = UnitRegistry::new();
    /// registry.register(["kg", " l ", ""]);
    /// assert!(registry.is_valid("KG"));
    /// assert!(registry.is_valid("l"));
    /// assert_eq!(registry.symbols(), vec!["KG", "L"]);
    /// ```
    pub fn register<I, S>(&self, symbols: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut guard = self.symbols.write();
        for symbol in symbols {
            let normalized = normalize(symbol.as_ref());
            if normalized.is_empty() {
                continue;
            }
            if guard.insert(normalized.clone()) {
                debug!(unit = %normalized, "Unit registered");
            }
        }
    }

    /// Removes symbols from the registry. Unknown symbols are ignored.
    pub fn unregister<I, S>(&self, symbols: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut guard = self.symbols.write();
        for symbol in symbols {
            let normalized = normalize(symbol.as_ref());
            if guard.remove(&normalized) {
                debug!(unit = %normalized, "Unit unregistered");
            }
        }
    }

    /// Removes every symbol.
    pub fn clear(&self) {
        let mut guard = self.symbols.write();
        debug!(count = guard.len(), "Unit registry cleared");
        guard.clear();
    }

    /// Returns true if the normalized symbol is currently registered.
    pub fn is_valid(&self, symbol: &str) -> bool {
        let normalized = normalize(symbol);
        !normalized.is_empty() && self.symbols.read().contains(&normalized)
    }

    /// Returns a sorted snapshot of the registered symbols.
    pub fn symbols(&self) -> Vec<String> {
        self.symbols.read().iter().cloned().collect()
    }
}

// =============================================================================
// Unit
// =============================================================================

/// A normalized unit symbol such as `KG`, `L` or `UN`.
///
/// Never blank. `Unit::new` only normalizes; registry membership is checked
/// by [`Unit::parse`], [`Unit::is_valid`], and by `Quantity` at construction.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, TS)]
#[ts(export)]
pub struct Unit(String);

impl Unit {
    /// Normalizes a symbol without checking the registry.
    ///
    /// Returns `None` for a blank symbol.
    pub fn new(symbol: &str) -> Option<Self> {
        let normalized = normalize(symbol);
        (!normalized.is_empty()).then_some(Unit(normalized))
    }

    /// Normalizes a symbol and checks it against the global registry.
    ///
    /// ## Errors
    /// `Invalid` when the symbol is blank or not registered.
    pub fn parse(symbol: &str) -> CoreResult<Self> {
        Unit::parse_in(UnitRegistry::global(), symbol)
    }

    /// Normalizes a symbol and checks it against `registry`.
    pub fn parse_in(registry: &UnitRegistry, symbol: &str) -> CoreResult<Self> {
        let unit = Unit::new(symbol).ok_or_else(|| ValidationError::Required {
            field: "unit".to_string(),
        })?;
        if !registry.is_valid(&unit.0) {
            return Err(ValidationError::NotRegistered {
                field: "unit".to_string(),
                value: unit.0,
            }
            .into());
        }
        Ok(unit)
    }

    /// Returns the normalized symbol.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the symbol is in the global registry right now.
    pub fn is_valid(&self) -> bool {
        UnitRegistry::global().is_valid(&self.0)
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Unit {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for Unit {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let symbol = String::deserialize(deserializer)?;
        Unit::parse(&symbol).map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CoreError, ErrorKind};

    #[test]
    fn test_register_normalizes_and_skips_blanks() {
        let registry = UnitRegistry::new();
        registry.register(["  kg ", "", "   ", "m2"]);
        assert_eq!(registry.symbols(), vec!["KG", "M2"]);
        assert!(registry.is_valid("kg"));
        assert!(!registry.is_valid(""));
    }

    #[test]
    fn test_register_is_idempotent() {
        let registry = UnitRegistry::new();
        registry.register(["KG"]);
        registry.register(["kg", "KG"]);
        assert!(registry.is_valid("KG"));
        assert_eq!(registry.symbols().len(), 1);
    }

    #[test]
    fn test_unregister_and_clear() {
        let registry = UnitRegistry::new();
        registry.register(["KG", "L", "UN"]);

        registry.unregister(["l", "NOPE"]);
        assert!(!registry.is_valid("L"));
        assert!(registry.is_valid("KG"));

        registry.clear();
        assert!(registry.symbols().is_empty());
        assert!(!registry.is_valid("KG"));
    }

    #[test]
    fn test_parse_in() {
        let registry = UnitRegistry::new();
        registry.register(["KG"]);

        assert_eq!(Unit::parse_in(&registry, " kg").unwrap().as_str(), "KG");

        let err = Unit::parse_in(&registry, "LB").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Invalid);
        assert!(err.context().contains(&("value", "LB".to_string())));

        let err = Unit::parse_in(&registry, "  ").unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::Required { .. })
        ));
    }

    #[test]
    fn test_new_rejects_blank() {
        assert_eq!(Unit::new(" kg ").unwrap().as_str(), "KG");
        assert!(Unit::new("").is_none());
        assert!(Unit::new("   ").is_none());
    }

    #[test]
    fn test_validity_is_checked_at_use() {
        let registry = UnitRegistry::global();
        registry.register(["UNIT-TEST-RETRO"]);

        let unit = Unit::parse("unit-test-retro").unwrap();
        assert!(unit.is_valid());

        registry.unregister(["UNIT-TEST-RETRO"]);
        assert!(!unit.is_valid());
        assert_eq!(unit.as_str(), "UNIT-TEST-RETRO");
    }

    #[test]
    fn test_json() {
        UnitRegistry::global().register(["UNIT-TEST-JSON"]);
        let unit = Unit::parse("UNIT-TEST-JSON").unwrap();

        let json = serde_json::to_string(&unit).unwrap();
        assert_eq!(json, "\"UNIT-TEST-JSON\"");
        assert_eq!(serde_json::from_str::<Unit>(&json).unwrap(), unit);
        assert!(serde_json::from_str::<Unit>("\"UNIT-TEST-NEVER-REGISTERED\"").is_err());
    }
}
