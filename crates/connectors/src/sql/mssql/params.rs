use model::core::value::Value;
use std::borrow::Cow;
use tiberius::{ColumnData, ToSql};

/// Owned parameter bound as a typed TDS value, never spliced into SQL text.
///
/// Temporal values use the native TDS 7.3 types so no fraction digits are
/// lost or overflowed in a text round trip. Decimals travel as text and are
/// converted by the server to the column's precision.
pub struct MsSqlParam(pub Value);

impl ToSql for MsSqlParam {
    fn to_sql(&self) -> ColumnData<'_> {
        match &self.0 {
            Value::Null => ColumnData::String(None),
            Value::Boolean(v) => ColumnData::Bit(Some(*v)),
            Value::Int(v) => ColumnData::I64(Some(*v)),
            Value::Float(v) => ColumnData::F64(Some(*v)),
            Value::Decimal(v) => ColumnData::String(Some(Cow::Owned(v.to_plain_string()))),
            Value::String(v) => ColumnData::String(Some(Cow::Borrowed(v.as_str()))),
            Value::Uuid(v) => ColumnData::Guid(Some(*v)),
            Value::Bytes(v) => ColumnData::Binary(Some(Cow::Borrowed(v.as_slice()))),
            Value::Date(v) => v.to_sql(),
            Value::Time(v) => v.to_sql(),
            Value::DateTime(v) => v.to_sql(),
            Value::Timestamp(v) => v.to_sql(),
        }
    }
}

pub struct MsSqlParamStore {
    pub params: Vec<MsSqlParam>,
}

impl MsSqlParamStore {
    pub fn from_values(values: Vec<Value>) -> Self {
        Self {
            params: values.into_iter().map(MsSqlParam).collect(),
        }
    }

    pub fn as_refs(&self) -> Vec<&dyn ToSql> {
        self.params.iter().map(|p| p as &dyn ToSql).collect()
    }
}
