use crate::quoting::quote_value_string;
use chrono::{NaiveDate, NaiveDateTime};

/// A single generated column value, carrying just enough type information to
/// render the exact literal that reaches the store.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Integer(i64),
    /// Always rendered with two decimal places, the scale of every
    /// currency-shaped column in the generated schemas.
    Numeric(f64),
    Text(String),
    Bool(bool),
    Date(NaiveDate),
    Timestamp(NaiveDateTime),
}

impl SqlValue {
    /// Appends the value to `sql` as a literal.
    pub fn write_literal(&self, sql: &mut String) {
        match self {
            SqlValue::Integer(value) => sql.push_str(&value.to_string()),
            SqlValue::Numeric(value) => sql.push_str(&format!("{:.2}", value)),
            SqlValue::Text(value) => sql.push_str(&quote_value_string(value)),
            SqlValue::Bool(value) => sql.push_str(if *value { "true" } else { "false" }),
            SqlValue::Date(value) => sql.push_str(&format!("'{}'", value.format("%Y-%m-%d"))),
            SqlValue::Timestamp(value) => {
                sql.push_str(&format!("'{}'", value.format("%Y-%m-%d %H:%M:%S")))
            }
        }
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        SqlValue::Integer(value)
    }
}

impl From<i32> for SqlValue {
    fn from(value: i32) -> Self {
        SqlValue::Integer(value as i64)
    }
}

impl From<f64> for SqlValue {
    fn from(value: f64) -> Self {
        SqlValue::Numeric(value)
    }
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::Text(value)
    }
}

impl From<&str> for SqlValue {
    fn from(value: &str) -> Self {
        SqlValue::Text(value.to_string())
    }
}

impl From<bool> for SqlValue {
    fn from(value: bool) -> Self {
        SqlValue::Bool(value)
    }
}

impl From<NaiveDate> for SqlValue {
    fn from(value: NaiveDate) -> Self {
        SqlValue::Date(value)
    }
}

impl From<NaiveDateTime> for SqlValue {
    fn from(value: NaiveDateTime) -> Self {
        SqlValue::Timestamp(value)
    }
}
