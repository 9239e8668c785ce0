use odbc_sys::{SqlDataType, ULen};

/// Enumeration over valid SQL Data Types supported by ODBC. Combines the type code reported by
/// `SQLDescribeParam` with the column size and decimal digits which are meaningful for it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum DataType {
    /// The type is not known.
    #[default]
    Unknown,
    /// `Char(n)`. Character string of fixed length.
    Char {
        /// Column size in characters (excluding terminating zero).
        length: ULen,
    },
    /// `Varchar(n)`. Variable length character string.
    Varchar {
        /// Maximum length of the character string (excluding terminating zero).
        length: ULen,
    },
    /// `LongVarchar`. Drivers usually report a very large or no length at all for these.
    LongVarchar {
        /// Maximum length of the character string (excluding terminating zero).
        length: ULen,
    },
    /// `NChar(n)`. Fixed length UTF-16 string.
    WChar {
        /// Column size in characters (excluding terminating zero).
        length: ULen,
    },
    /// `NVarchar(n)`. Variable length UTF-16 string.
    WVarchar {
        /// Maximum length of the string in characters (excluding terminating zero).
        length: ULen,
    },
    /// `NText`, `NVarchar(MAX)` and friends.
    WLongVarchar {
        /// Maximum length of the string in characters (excluding terminating zero).
        length: ULen,
    },
    /// `Numeric(p,s)`. Signed, exact, numeric value with a precision p and scale s.
    Numeric {
        /// Total number of digits.
        precision: ULen,
        /// Number of decimal digits.
        scale: i16,
    },
    /// `Decimal(p,s)`. Signed, exact, numeric value with a precision of at least p and scale s.
    Decimal {
        /// Total number of digits.
        precision: ULen,
        /// Number of decimal digits.
        scale: i16,
    },
    /// `TINYINT`. 8 Bit integer
    Tinyint,
    /// `Smallint`. 16 Bit Integer
    SmallInt,
    /// `Integer`. 32 Bit Integer
    Integer,
    /// `BIGINT`. 64 Bit Integer
    Bigint,
    /// `Real`. Binary precision 24.
    Real,
    /// `Float(p)`. Binary precision of at least p, driver defined.
    Float,
    /// `Double Precision`. Binary precision 53.
    Double,
    /// `BIT`. Single bit binary data.
    Bit,
    /// `Date`. Year, month, and day fields.
    Date,
    /// `Time`. Hour, minute, and second fields. Precision indicates the seconds precision.
    Time { precision: i16 },
    /// `Timestamp`. Year, month, day, hour, minute, and second fields.
    Timestamp { precision: i16 },
    /// The driver returned a type, but it is not among the other types of these enumeration.
    Other {
        /// Type of the parameter
        data_type: SqlDataType,
        /// Size of the parameter
        column_size: ULen,
        decimal_digits: i16,
    },
}

impl DataType {
    /// Maps the output of `SQLDescribeParam` to a variant.
    pub fn new(data_type: SqlDataType, column_size: ULen, decimal_digits: i16) -> Self {
        match data_type {
            SqlDataType::UNKNOWN_TYPE => DataType::Unknown,
            SqlDataType::CHAR => DataType::Char {
                length: column_size,
            },
            SqlDataType::VARCHAR => DataType::Varchar {
                length: column_size,
            },
            SqlDataType::EXT_LONG_VARCHAR => DataType::LongVarchar {
                length: column_size,
            },
            SqlDataType::EXT_W_CHAR => DataType::WChar {
                length: column_size,
            },
            SqlDataType::EXT_W_VARCHAR => DataType::WVarchar {
                length: column_size,
            },
            SqlDataType::EXT_W_LONG_VARCHAR => DataType::WLongVarchar {
                length: column_size,
            },
            SqlDataType::NUMERIC => DataType::Numeric {
                precision: column_size,
                scale: decimal_digits,
            },
            SqlDataType::DECIMAL => DataType::Decimal {
                precision: column_size,
                scale: decimal_digits,
            },
            SqlDataType::EXT_TINY_INT => DataType::Tinyint,
            SqlDataType::SMALLINT => DataType::SmallInt,
            SqlDataType::INTEGER => DataType::Integer,
            SqlDataType::EXT_BIG_INT => DataType::Bigint,
            SqlDataType::REAL => DataType::Real,
            SqlDataType::FLOAT => DataType::Float,
            SqlDataType::DOUBLE => DataType::Double,
            SqlDataType::EXT_BIT => DataType::Bit,
            SqlDataType::DATE => DataType::Date,
            SqlDataType::TIME => DataType::Time {
                precision: decimal_digits,
            },
            SqlDataType::TIMESTAMP => DataType::Timestamp {
                precision: decimal_digits,
            },
            other => DataType::Other {
                data_type: other,
                column_size,
                decimal_digits,
            },
        }
    }

    /// The SQL data type code as used by ODBC.
    pub fn data_type(&self) -> SqlDataType {
        match self {
            DataType::Unknown => SqlDataType::UNKNOWN_TYPE,
            DataType::Char { .. } => SqlDataType::CHAR,
            DataType::Varchar { .. } => SqlDataType::VARCHAR,
            DataType::LongVarchar { .. } => SqlDataType::EXT_LONG_VARCHAR,
            DataType::WChar { .. } => SqlDataType::EXT_W_CHAR,
            DataType::WVarchar { .. } => SqlDataType::EXT_W_VARCHAR,
            DataType::WLongVarchar { .. } => SqlDataType::EXT_W_LONG_VARCHAR,
            DataType::Numeric { .. } => SqlDataType::NUMERIC,
            DataType::Decimal { .. } => SqlDataType::DECIMAL,
            DataType::Tinyint => SqlDataType::EXT_TINY_INT,
            DataType::SmallInt => SqlDataType::SMALLINT,
            DataType::Integer => SqlDataType::INTEGER,
            DataType::Bigint => SqlDataType::EXT_BIG_INT,
            DataType::Real => SqlDataType::REAL,
            DataType::Float => SqlDataType::FLOAT,
            DataType::Double => SqlDataType::DOUBLE,
            DataType::Bit => SqlDataType::EXT_BIT,
            DataType::Date => SqlDataType::DATE,
            DataType::Time { .. } => SqlDataType::TIME,
            DataType::Timestamp { .. } => SqlDataType::TIMESTAMP,
            DataType::Other { data_type, .. } => *data_type,
        }
    }

    /// Declared size. Number of characters for text, number of digits for exact numerics and
    /// zero for everything else, unless the driver told us otherwise (`Other`).
    pub fn column_size(&self) -> ULen {
        match self {
            DataType::Char { length }
            | DataType::Varchar { length }
            | DataType::LongVarchar { length }
            | DataType::WChar { length }
            | DataType::WVarchar { length }
            | DataType::WLongVarchar { length } => *length,
            DataType::Numeric { precision, .. } | DataType::Decimal { precision, .. } => *precision,
            DataType::Other { column_size, .. } => *column_size,
            _ => 0,
        }
    }

    /// Number of decimal digits (scale) for exact numerics, fractional seconds precision for
    /// time and timestamp. Zero otherwise.
    pub fn decimal_digits(&self) -> i16 {
        match self {
            DataType::Numeric { scale, .. } | DataType::Decimal { scale, .. } => *scale,
            DataType::Time { precision } | DataType::Timestamp { precision } => *precision,
            DataType::Other { decimal_digits, .. } => *decimal_digits,
            _ => 0,
        }
    }
}
