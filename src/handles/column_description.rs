use log::warn;

use super::data_type::DataType;

/// Indication of whether a parameter is nullable or not.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Default)]
pub enum Nullability {
    /// Indicates that we do not know whether the parameter is nullable or not.
    #[default]
    Unknown,
    /// The parameter may hold NULL values.
    Nullable,
    /// The parameter can not hold NULL values.
    NoNulls,
}

impl Nullability {
    /// Construct a new instance from a `Nullability` new type constant. Values outside of the
    /// ODBC constants are treated as [`Nullability::Unknown`].
    pub fn new(nullability: odbc_sys::Nullability) -> Self {
        match nullability {
            odbc_sys::Nullability::UNKNOWN => Nullability::Unknown,
            odbc_sys::Nullability::NO_NULLS => Nullability::NoNulls,
            odbc_sys::Nullability::NULLABLE => Nullability::Nullable,
            other => {
                warn!("Driver reported invalid nullability {}. Assuming unknown.", other.0);
                Nullability::Unknown
            }
        }
    }
}

/// Describes the type and attributes of a statement parameter, as reported by `SQLDescribeParam`
/// or supplied by the application. Immutable value type.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Default)]
pub struct ColumnDescription {
    /// Type code, together with declared size and decimal digits.
    pub data_type: DataType,
    /// Indicates whether the parameter is nullable or not.
    pub nullability: Nullability,
}

impl ColumnDescription {
    pub fn new(data_type: DataType, nullability: Nullability) -> Self {
        Self {
            data_type,
            nullability,
        }
    }

    /// `true` if the parameter is `Nullable` or it is not know whether it is nullable. `false`
    /// if and only if the parameter is `NoNulls`.
    pub fn could_be_nullable(&self) -> bool {
        match self.nullability {
            Nullability::Nullable | Nullability::Unknown => true,
            Nullability::NoNulls => false,
        }
    }
}
