use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M:%S";
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Fractional seconds at 100 ns resolution, trailing zeros trimmed, empty
/// for whole seconds. SQL Server rejects literals with more than 7 digits.
fn fraction(nanos: u32) -> String {
    let ticks = (nanos % 1_000_000_000) / 100;
    if ticks == 0 {
        return String::new();
    }
    let digits = format!("{ticks:07}");
    format!(".{}", digits.trim_end_matches('0'))
}

/// A single dynamically-typed column value as returned by a source store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Value {
    Null,
    Boolean(bool),
    Int(i64),
    Float(f64),
    Decimal(BigDecimal),
    String(String),
    Uuid(Uuid),
    Bytes(Vec<u8>),
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(NaiveDateTime),
    Timestamp(DateTime<Utc>),
}

impl Value {
    /// Untyped text form of the value, used when the value has to travel
    /// inside a quoted SQL literal. `None` for `Null` and raw bytes.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Value::Null => None,
            Value::Boolean(v) => Some(if *v { "1" } else { "0" }.to_string()),
            Value::Int(v) => Some(v.to_string()),
            Value::Float(v) => Some(v.to_string()),
            Value::Decimal(v) => Some(v.to_plain_string()),
            Value::String(v) => Some(v.clone()),
            Value::Uuid(v) => Some(v.hyphenated().to_string()),
            Value::Bytes(_) => None,
            Value::Date(v) => Some(v.format(DATE_FORMAT).to_string()),
            Value::Time(v) => Some(format!(
                "{}{}",
                v.format(TIME_FORMAT),
                fraction(v.nanosecond())
            )),
            Value::DateTime(v) => Some(format!(
                "{}{}",
                v.format(DATETIME_FORMAT),
                fraction(v.nanosecond())
            )),
            Value::Timestamp(v) => Some(format!(
                "{}{}+00:00",
                v.format(DATETIME_FORMAT),
                fraction(v.nanosecond())
            )),
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            Value::Boolean(v) => Some(*v as i64),
            Value::String(v) => v.parse().ok(),
            _ => None,
        }
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(v) => Value::Boolean(v),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(v) => Value::Int(v),
                None => n.as_f64().map(Value::Float).unwrap_or(Value::Null),
            },
            serde_json::Value::String(v) => Value::String(v),
            other => Value::String(other.to_string()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "NULL"),
            Value::Bytes(v) => {
                write!(f, "0x")?;
                for byte in v {
                    write!(f, "{byte:02X}")?;
                }
                Ok(())
            }
            other => write!(f, "{}", other.as_text().unwrap_or_default()),
        }
    }
}
