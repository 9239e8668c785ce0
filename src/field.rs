use odbc_sys::{Date, Timestamp};

use crate::{ColumnDescription, DataType, Nullability};

/// An application level value of a single parameter in a single row.
#[derive(Clone, Debug, PartialEq)]
pub enum Field {
    Integer(i64),
    Floating(f64),
    Boolean(bool),
    Text(String),
    Date(Date),
    Timestamp(Timestamp),
}

impl Field {
    /// Name of the variant, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Field::Integer(_) => "integer",
            Field::Floating(_) => "floating point",
            Field::Boolean(_) => "boolean",
            Field::Text(_) => "text",
            Field::Date(_) => "date",
            Field::Timestamp(_) => "timestamp",
        }
    }
}

impl From<i64> for Field {
    fn from(value: i64) -> Self {
        Field::Integer(value)
    }
}

impl From<f64> for Field {
    fn from(value: f64) -> Self {
        Field::Floating(value)
    }
}

impl From<bool> for Field {
    fn from(value: bool) -> Self {
        Field::Boolean(value)
    }
}

impl From<&str> for Field {
    fn from(value: &str) -> Self {
        Field::Text(value.to_owned())
    }
}

impl From<String> for Field {
    fn from(value: String) -> Self {
        Field::Text(value)
    }
}

impl From<Date> for Field {
    fn from(value: Date) -> Self {
        Field::Date(value)
    }
}

impl From<Timestamp> for Field {
    fn from(value: Timestamp) -> Self {
        Field::Timestamp(value)
    }
}

impl ColumnDescription {
    /// Smallest description able to hold `field`. Used to rebind a parameter after observing a
    /// value which does not fit into the buffer currently bound. Text is described by its length
    /// in bytes.
    pub fn from_field(field: &Field) -> Self {
        let data_type = match field {
            Field::Integer(_) => DataType::Bigint,
            Field::Floating(_) => DataType::Double,
            Field::Boolean(_) => DataType::Bit,
            Field::Text(text) => DataType::Varchar { length: text.len() },
            Field::Date(_) => DataType::Date,
            Field::Timestamp(_) => DataType::Timestamp { precision: 6 },
        };
        ColumnDescription::new(data_type, Nullability::Nullable)
    }
}
