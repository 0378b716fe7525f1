use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use model::{
    core::value::Value,
    records::row::{FieldValue, RowData},
};
use rust_decimal::Decimal;
use std::str::FromStr;
use tokio_postgres::{Row, types::FromSqlOwned};
use tracing::warn;
use uuid::Uuid;

pub fn to_row_data(table: &str, row: &Row) -> RowData {
    let field_values = row
        .columns()
        .iter()
        .enumerate()
        .map(|(idx, column)| {
            FieldValue::new(column.name(), cell_value(row, idx, column.type_().name()))
        })
        .collect();

    RowData::new(table, field_values)
}

fn cell_value(row: &Row, idx: usize, type_name: &str) -> Value {
    match type_name {
        "bool" => get(row, idx, Value::Boolean),
        "int2" => get(row, idx, |v: i16| Value::Int(v as i64)),
        "int4" => get(row, idx, |v: i32| Value::Int(v as i64)),
        "int8" => get(row, idx, Value::Int),
        "float4" => get(row, idx, |v: f32| Value::Float(v as f64)),
        "float8" => get(row, idx, Value::Float),
        "numeric" => get(row, idx, |v: Decimal| {
            BigDecimal::from_str(&v.to_string())
                .map(Value::Decimal)
                .unwrap_or_else(|_| Value::String(v.to_string()))
        }),
        "uuid" => get::<Uuid, _>(row, idx, Value::Uuid),
        "bytea" => get(row, idx, Value::Bytes),
        "date" => get::<NaiveDate, _>(row, idx, Value::Date),
        "time" => get::<NaiveTime, _>(row, idx, Value::Time),
        "timestamp" => get::<NaiveDateTime, _>(row, idx, Value::DateTime),
        "timestamptz" => get::<DateTime<Utc>, _>(row, idx, Value::Timestamp),
        "json" | "jsonb" => get(row, idx, |v: serde_json::Value| Value::String(v.to_string())),
        _ => get(row, idx, Value::String),
    }
}

fn get<T, F>(row: &Row, idx: usize, map: F) -> Value
where
    T: FromSqlOwned,
    F: FnOnce(T) -> Value,
{
    match row.try_get::<_, Option<T>>(idx) {
        Ok(Some(v)) => map(v),
        Ok(None) => Value::Null,
        Err(err) => {
            let column = row.columns().get(idx).map(|c| c.name()).unwrap_or("?");
            warn!(%err, column, "Unsupported Postgres column value, replaced by NULL");
            Value::Null
        }
    }
}

