use crate::core::value::Value;
use serde::{Deserialize, Serialize};

/// Column that carries the ordering contract for paginated reads.
pub const ID_COLUMN: &str = "Id";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldValue {
    pub name: String,
    pub value: Value,
}

impl FieldValue {
    pub fn new(name: impl Into<String>, value: Value) -> Self {
        FieldValue {
            name: name.into(),
            value,
        }
    }
}

/// One source record. Field order is the column order returned by the source.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RowData {
    pub entity: String,
    pub field_values: Vec<FieldValue>,
}

impl RowData {
    pub fn new(entity: &str, field_values: Vec<FieldValue>) -> Self {
        RowData {
            entity: entity.to_string(),
            field_values,
        }
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.field_values
            .iter()
            .find(|f| f.name.eq_ignore_ascii_case(field))
    }

    pub fn get_value(&self, field: &str) -> Value {
        self.get(field)
            .map(|f| f.value.clone())
            .unwrap_or(Value::Null)
    }

    pub fn id(&self) -> Value {
        self.get_value(ID_COLUMN)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.field_values.iter().map(|f| f.name.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.field_values.iter().map(|f| &f.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_is_case_insensitive() {
        let row = RowData::new(
            "Users",
            vec![
                FieldValue::new("ID", Value::Int(3)),
                FieldValue::new("Name", Value::String("Ann".into())),
            ],
        );

        assert_eq!(row.id(), Value::Int(3));
        assert_eq!(row.get_value("name"), Value::String("Ann".into()));
        assert_eq!(row.get_value("missing"), Value::Null);
        assert_eq!(row.columns().collect::<Vec<_>>(), vec!["ID", "Name"]);
    }
}
