use bigdecimal::{BigDecimal, num_bigint::BigInt};
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use model::{
    core::value::Value,
    records::row::{FieldValue, RowData},
};
use tiberius::{Row, numeric::Numeric};
use tracing::warn;
use uuid::Uuid;

pub fn to_row_data(table: &str, row: &Row) -> RowData {
    let field_values = row
        .columns()
        .iter()
        .enumerate()
        .map(|(idx, column)| FieldValue::new(column.name(), cell_value(row, idx)))
        .collect();

    RowData::new(table, field_values)
}

/// Tries one Rust type against the cell. A type mismatch is an `Err` and
/// falls through to the next type; `Ok(None)` means the column has this
/// type and holds SQL NULL.
macro_rules! try_cell {
    ($row:expr, $idx:expr, $ty:ty, $map:expr) => {
        match $row.try_get::<$ty, _>($idx) {
            Ok(Some(v)) => return $map(v),
            Ok(None) => return Value::Null,
            Err(_) => {}
        }
    };
}

fn cell_value(row: &Row, idx: usize) -> Value {
    try_cell!(row, idx, bool, Value::Boolean);
    try_cell!(row, idx, u8, |v: u8| Value::Int(v as i64));
    try_cell!(row, idx, i16, |v: i16| Value::Int(v as i64));
    try_cell!(row, idx, i32, |v: i32| Value::Int(v as i64));
    try_cell!(row, idx, i64, Value::Int);
    try_cell!(row, idx, f32, |v: f32| Value::Float(v as f64));
    try_cell!(row, idx, f64, Value::Float);
    try_cell!(row, idx, Numeric, numeric_value);
    try_cell!(row, idx, &str, |v: &str| Value::String(v.to_string()));
    try_cell!(row, idx, Uuid, Value::Uuid);
    try_cell!(row, idx, NaiveDateTime, Value::DateTime);
    try_cell!(row, idx, NaiveDate, Value::Date);
    try_cell!(row, idx, NaiveTime, Value::Time);
    try_cell!(row, idx, DateTime<FixedOffset>, |v: DateTime<FixedOffset>| {
        Value::Timestamp(v.with_timezone(&Utc))
    });
    try_cell!(row, idx, &[u8], |v: &[u8]| Value::Bytes(v.to_vec()));

    if let Some(column) = row.columns().get(idx) {
        warn!(
            column = column.name(),
            column_type = ?column.column_type(),
            "Unsupported SQL Server column type, value replaced by NULL"
        );
    }
    Value::Null
}

/// Built from the raw digits and scale. `Numeric`'s own `Display` splits
/// the sign across both halves of a negative value.
fn numeric_value(v: Numeric) -> Value {
    Value::Decimal(BigDecimal::new(BigInt::from(v.value()), v.scale() as i64))
}
