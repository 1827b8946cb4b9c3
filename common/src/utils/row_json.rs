//! Row to JSON conversion.
//!
//! Rows of any shape are turned into JSON objects keyed by column name, in
//! column order. Values the conversion cannot decode become `null`.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::{Map, Value};
use sqlx::postgres::PgRow;
use sqlx::sqlite::SqliteRow;
use sqlx::{Column, FromRow, Row, TypeInfo, ValueRef};

/// A result row as a JSON object.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct JsonRecord(pub Map<String, Value>);

impl JsonRecord {
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.0.get(column)
    }
}

impl<'r> FromRow<'r, PgRow> for JsonRecord {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let mut map = Map::with_capacity(row.len());
        for (idx, column) in row.columns().iter().enumerate() {
            map.insert(
                column.name().to_string(),
                pg_value(row, idx, column.type_info().name()),
            );
        }
        Ok(Self(map))
    }
}

impl<'r> FromRow<'r, SqliteRow> for JsonRecord {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        let mut map = Map::with_capacity(row.len());
        for (idx, column) in row.columns().iter().enumerate() {
            map.insert(column.name().to_string(), sqlite_value(row, idx));
        }
        Ok(Self(map))
    }
}

fn pg_value(row: &PgRow, idx: usize, type_name: &str) -> Value {
    match row.try_get_raw(idx) {
        Ok(raw) if !raw.is_null() => {}
        _ => return Value::Null,
    }

    let decoded = match type_name {
        "BOOL" => row.try_get::<bool, _>(idx).map(Value::from),
        "INT2" => row.try_get::<i16, _>(idx).map(Value::from),
        "INT4" => row.try_get::<i32, _>(idx).map(Value::from),
        "INT8" => row.try_get::<i64, _>(idx).map(Value::from),
        "FLOAT4" => row.try_get::<f32, _>(idx).map(|v| Value::from(f64::from(v))),
        "FLOAT8" => row.try_get::<f64, _>(idx).map(Value::from),
        "NUMERIC" => row.try_get::<Decimal, _>(idx).map(decimal_value),
        "JSON" | "JSONB" => row.try_get::<Value, _>(idx),
        "UUID" => row
            .try_get::<uuid::Uuid, _>(idx)
            .map(|v| Value::from(v.to_string())),
        "DATE" => row
            .try_get::<chrono::NaiveDate, _>(idx)
            .map(|v| Value::from(v.format("%Y-%m-%d").to_string())),
        "TIME" => row
            .try_get::<chrono::NaiveTime, _>(idx)
            .map(|v| Value::from(v.format("%H:%M:%S%.f").to_string())),
        "TIMESTAMP" => row
            .try_get::<chrono::NaiveDateTime, _>(idx)
            .map(|v| Value::from(v.format("%Y-%m-%dT%H:%M:%S%.f").to_string())),
        "TIMESTAMPTZ" => row
            .try_get::<chrono::DateTime<chrono::Utc>, _>(idx)
            .map(|v| Value::from(v.to_rfc3339())),
        "BYTEA" => row
            .try_get::<Vec<u8>, _>(idx)
            .map(|v| Value::from(String::from_utf8_lossy(&v).into_owned())),
        _ => row.try_get::<String, _>(idx).map(Value::from),
    };

    decoded.unwrap_or_else(|e| {
        tracing::debug!(column = idx, type_name, error = %e, "column value not representable as JSON");
        Value::Null
    })
}

/// Whole decimals become integers, fractional ones floats. A value that
/// would not survive the trip through `f64` is kept as its exact text.
fn decimal_value(d: Decimal) -> Value {
    if d.scale() == 0 {
        if let Some(i) = d.to_i64() {
            return Value::from(i);
        }
    }
    match d.to_f64() {
        Some(f) if f.to_string().parse::<Decimal>().ok() == Some(d) => Value::from(f),
        _ => Value::from(d.to_string()),
    }
}

fn sqlite_value(row: &SqliteRow, idx: usize) -> Value {
    // SQLite is dynamically typed, so go by the storage class of the value
    // rather than the declared column type.
    let storage = match row.try_get_raw(idx) {
        Ok(raw) if raw.is_null() => return Value::Null,
        Ok(raw) => raw.type_info().name().to_string(),
        Err(_) => return Value::Null,
    };

    let decoded = match storage.as_str() {
        "INTEGER" | "INT4" | "INT8" | "BIGINT" => row.try_get::<i64, _>(idx).map(Value::from),
        "REAL" | "FLOAT" | "DOUBLE" => row.try_get::<f64, _>(idx).map(Value::from),
        "BOOLEAN" => row.try_get::<bool, _>(idx).map(Value::from),
        "BLOB" => row
            .try_get::<Vec<u8>, _>(idx)
            .map(|v| Value::from(String::from_utf8_lossy(&v).into_owned())),
        _ => row.try_get::<String, _>(idx).map(Value::from),
    };

    decoded.unwrap_or_else(|e| {
        tracing::debug!(column = idx, storage = %storage, error = %e, "column value not representable as JSON");
        Value::Null
    })
}
