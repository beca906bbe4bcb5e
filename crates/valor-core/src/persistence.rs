//! # Database Encoding (feature = "sqlx")
//!
//! sqlx `Type`/`Encode`/`Decode` impls for SQLite. Pure data conversion; no
//! queries run here.
//!
//! ## Column Mapping
//! ```text
//! ┌──────────────┬──────────┬───────────────────────────────────────────────┐
//! │ Type         │ Column   │ Notes                                         │
//! ├──────────────┼──────────┼───────────────────────────────────────────────┤
//! │ Currency     │ TEXT     │ "BRL"; Option<Currency>::None → NULL          │
//! │ Unit         │ TEXT     │ "KG";  decode re-checks the global registry   │
//! │ Percentage   │ INTEGER  │ basis points                                  │
//! │ Money        │ INTEGER  │ amount only (encode); currency is its own col │
//! │ Quantity     │ INTEGER  │ scaled only (encode); rebuild via from_scaled │
//! │ Discount     │ TEXT     │ JSON blob, decode re-validates                │
//! └──────────────┴──────────┴───────────────────────────────────────────────┘
//! ```
//!
//! Money and Quantity span several columns, so rows rebuild them with
//! `Money::new(row.amount, row.currency)` and `Quantity::from_scaled(..)`.

use sqlx::encode::IsNull;
use sqlx::error::BoxDynError;
use sqlx::sqlite::{Sqlite, SqliteTypeInfo};
use sqlx::{Database, Decode, Encode, Type};

use crate::currency::Currency;
use crate::discount::Discount;
use crate::money::Money;
use crate::percentage::Percentage;
use crate::quantity::Quantity;
use crate::unit::Unit;

type ArgumentBuffer<'q> = <Sqlite as Database>::ArgumentBuffer<'q>;
type ValueRef<'r> = <Sqlite as Database>::ValueRef<'r>;

// =============================================================================
// Text Columns
// =============================================================================

impl Type<Sqlite> for Currency {
    fn type_info() -> SqliteTypeInfo {
        <str as Type<Sqlite>>::type_info()
    }

    fn compatible(ty: &SqliteTypeInfo) -> bool {
        <str as Type<Sqlite>>::compatible(ty)
    }
}

impl<'q> Encode<'q, Sqlite> for Currency {
    fn encode_by_ref(&self, buf: &mut ArgumentBuffer<'q>) -> Result<IsNull, BoxDynError> {
        <&str as Encode<'q, Sqlite>>::encode(self.code(), buf)
    }
}

impl<'r> Decode<'r, Sqlite> for Currency {
    fn decode(value: ValueRef<'r>) -> Result<Self, BoxDynError> {
        let code = <&str as Decode<'r, Sqlite>>::decode(value)?;
        Ok(code.parse::<Currency>()?)
    }
}

impl Type<Sqlite> for Unit {
    fn type_info() -> SqliteTypeInfo {
        <str as Type<Sqlite>>::type_info()
    }

    fn compatible(ty: &SqliteTypeInfo) -> bool {
        <str as Type<Sqlite>>::compatible(ty)
    }
}

impl<'q> Encode<'q, Sqlite> for Unit {
    fn encode_by_ref(&self, buf: &mut ArgumentBuffer<'q>) -> Result<IsNull, BoxDynError> {
        <String as Encode<'q, Sqlite>>::encode(self.as_str().to_string(), buf)
    }
}

impl<'r> Decode<'r, Sqlite> for Unit {
    fn decode(value: ValueRef<'r>) -> Result<Self, BoxDynError> {
        let symbol = <&str as Decode<'r, Sqlite>>::decode(value)?;
        Ok(Unit::parse(symbol)?)
    }
}

/// Stored as the exchange-format JSON.
impl Type<Sqlite> for Discount {
    fn type_info() -> SqliteTypeInfo {
        <str as Type<Sqlite>>::type_info()
    }

    fn compatible(ty: &SqliteTypeInfo) -> bool {
        <str as Type<Sqlite>>::compatible(ty)
    }
}

impl<'q> Encode<'q, Sqlite> for Discount {
    fn encode_by_ref(&self, buf: &mut ArgumentBuffer<'q>) -> Result<IsNull, BoxDynError> {
        let json = serde_json::to_string(self)?;
        <String as Encode<'q, Sqlite>>::encode(json, buf)
    }
}

impl<'r> Decode<'r, Sqlite> for Discount {
    fn decode(value: ValueRef<'r>) -> Result<Self, BoxDynError> {
        let json = <&str as Decode<'r, Sqlite>>::decode(value)?;
        Ok(serde_json::from_str(json)?)
    }
}

// =============================================================================
// Integer Columns
// =============================================================================

impl Type<Sqlite> for Percentage {
    fn type_info() -> SqliteTypeInfo {
        <i64 as Type<Sqlite>>::type_info()
    }

    fn compatible(ty: &SqliteTypeInfo) -> bool {
        <i64 as Type<Sqlite>>::compatible(ty)
    }
}

impl<'q> Encode<'q, Sqlite> for Percentage {
    fn encode_by_ref(&self, buf: &mut ArgumentBuffer<'q>) -> Result<IsNull, BoxDynError> {
        <i64 as Encode<'q, Sqlite>>::encode(self.basis_points(), buf)
    }
}

impl<'r> Decode<'r, Sqlite> for Percentage {
    fn decode(value: ValueRef<'r>) -> Result<Self, BoxDynError> {
        let basis_points = <i64 as Decode<'r, Sqlite>>::decode(value)?;
        Ok(Percentage::from_basis_points(basis_points)?)
    }
}

impl Type<Sqlite> for Money {
    fn type_info() -> SqliteTypeInfo {
        <i64 as Type<Sqlite>>::type_info()
    }

    fn compatible(ty: &SqliteTypeInfo) -> bool {
        <i64 as Type<Sqlite>>::compatible(ty)
    }
}

impl<'q> Encode<'q, Sqlite> for Money {
    fn encode_by_ref(&self, buf: &mut ArgumentBuffer<'q>) -> Result<IsNull, BoxDynError> {
        <i64 as Encode<'q, Sqlite>>::encode(self.amount(), buf)
    }
}

impl Type<Sqlite> for Quantity {
    fn type_info() -> SqliteTypeInfo {
        <i64 as Type<Sqlite>>::type_info()
    }

    fn compatible(ty: &SqliteTypeInfo) -> bool {
        <i64 as Type<Sqlite>>::compatible(ty)
    }
}

impl<'q> Encode<'q, Sqlite> for Quantity {
    fn encode_by_ref(&self, buf: &mut ArgumentBuffer<'q>) -> Result<IsNull, BoxDynError> {
        <i64 as Encode<'q, Sqlite>>::encode(self.scaled(), buf)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(all(test, feature = "sqlx"))]
mod tests {
    use super::*;
    use crate::unit::UnitRegistry;
    use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

    /// In-memory databases live per connection, so the pool holds exactly one.
    async fn memory_pool() -> SqlitePool {
        SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_absent_currency_is_null() {
        let pool = memory_pool().await;

        let is_null: i64 = sqlx::query_scalar("SELECT ? IS NULL")
            .bind(None::<Currency>)
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(is_null, 1);

        let stored: String = sqlx::query_scalar("SELECT ?")
            .bind(Some(Currency::Brl))
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(stored, "BRL");

        let back: Option<Currency> = sqlx::query_scalar("SELECT NULL")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(back, None);
    }

    #[tokio::test]
    async fn test_decode_revalidates() {
        let pool = memory_pool().await;
        UnitRegistry::global().register(["DB-KG"]);

        let currency: Currency = sqlx::query_scalar("SELECT 'USD'")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(currency, Currency::Usd);
        assert!(sqlx::query_scalar::<_, Currency>("SELECT 'XYZ'")
            .fetch_one(&pool)
            .await
            .is_err());

        let unit: Unit = sqlx::query_scalar("SELECT 'db-kg'")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(unit.as_str(), "DB-KG");
        assert!(sqlx::query_scalar::<_, Unit>("SELECT 'DB-NEVER-REGISTERED'")
            .fetch_one(&pool)
            .await
            .is_err());

        let rate: Percentage = sqlx::query_scalar("SELECT 825")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(rate.basis_points(), 825);
        assert!(sqlx::query_scalar::<_, Percentage>("SELECT -5")
            .fetch_one(&pool)
            .await
            .is_err());

        let bad_discount = r#"{"type":"percentage","value":1.5}"#;
        assert!(sqlx::query_scalar::<_, Discount>("SELECT ?")
            .bind(bad_discount)
            .fetch_one(&pool)
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_row_round_trip() {
        let pool = memory_pool().await;
        UnitRegistry::global().register(["DB-L"]);

        sqlx::query(
            "CREATE TABLE line_items (
                amount INTEGER NOT NULL,
                currency TEXT,
                quantity INTEGER NOT NULL,
                unit TEXT NOT NULL,
                precision INTEGER NOT NULL,
                tax_rate INTEGER NOT NULL,
                discount TEXT NOT NULL
            )",
        )
        .execute(&pool)
        .await
        .unwrap();

        let price = Money::new(1031, Currency::Brl);
        let quantity = Quantity::from_scaled(2345, "DB-L", 3).unwrap();
        let tax_rate = Percentage::from_basis_points(825).unwrap();
        let discount = Discount::new_fixed(Money::new(150, Currency::Brl)).unwrap();

        sqlx::query("INSERT INTO line_items VALUES (?, ?, ?, ?, ?, ?, ?)")
            .bind(price)
            .bind(price.currency())
            .bind(quantity.clone())
            .bind(quantity.unit().clone())
            .bind(i64::from(quantity.precision()))
            .bind(tax_rate)
            .bind(discount)
            .execute(&pool)
            .await
            .unwrap();

        let (amount, currency, scaled, unit, precision, rate, stored_discount): (
            i64,
            Currency,
            i64,
            Unit,
            i64,
            Percentage,
            Discount,
        ) = sqlx::query_as("SELECT * FROM line_items")
            .fetch_one(&pool)
            .await
            .unwrap();

        assert_eq!(Money::new(amount, currency), price);
        let precision = u32::try_from(precision).unwrap();
        assert_eq!(Quantity::from_scaled(scaled, &unit, precision).unwrap(), quantity);
        assert_eq!(rate, tax_rate);
        assert_eq!(stored_discount, discount);
    }

    #[tokio::test]
    async fn test_discount_is_stored_as_json() {
        let pool = memory_pool().await;
        let rate = Percentage::from_basis_points(1500).unwrap();
        let discount = Discount::new_percentage(rate).unwrap();

        let stored: String = sqlx::query_scalar("SELECT ?")
            .bind(discount)
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(stored, r#"{"type":"percentage","value":0.15}"#);
    }
}
