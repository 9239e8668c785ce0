use std::mem::size_of;

use odbc_sys::{CDataType, Date, Timestamp};

use crate::DataType;

/// Declared fractional seconds precision when binding timestamps. Microseconds are supported by
/// most data sources and still fit into the fraction field of the timestamp struct.
const TIMESTAMP_PRECISION: i16 = 6;

/// Exact numerics up to this precision (and without a scale) are bound as 64 Bit integers.
const MAX_INTEGER_PRECISION: usize = 18;

/// Native representation of the values held by a parameter buffer. The set of representations is
/// closed, every SQL type a parameter may have is mapped to one of these.
///
/// While related to the [`crate::DataType`] of the parameter, the buffer kind does not describe
/// the type of the data source but the format the values are represented in memory.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BufferKind {
    /// Narrow text with binary length of up to `max_str_len` bytes.
    Text {
        /// Maximum string length. Terminating zero is excluded, i.e. memory for it will be
        /// implicitly allocated.
        max_str_len: usize,
    },
    /// UTF-16 text of up to `max_str_len` characters (code units).
    WText {
        /// Maximum string length in UTF-16 code units. Terminating zero is excluded.
        max_str_len: usize,
    },
    /// Signed 64 Bit integer. Used for all integer types.
    I64,
    /// 64 bit floating point. Used for all approximate numerics.
    F64,
    /// Can either be zero or one
    Bit,
    /// Describes a buffer holding [`odbc_sys::Date`] values.
    Date,
    /// Describes a buffer holding [`odbc_sys::Timestamp`] values.
    Timestamp,
}

impl BufferKind {
    /// Describe a buffer which fits best the SQL Data Type. `None` if there is no buffer for it.
    ///
    /// If `prefer_unicode` is `true`, narrow text types are represented as UTF-16 text.
    pub fn from_data_type(data_type: DataType, prefer_unicode: bool) -> Option<Self> {
        let kind = match data_type {
            DataType::Tinyint | DataType::SmallInt | DataType::Integer | DataType::Bigint => {
                BufferKind::I64
            }
            DataType::Numeric { precision, scale } | DataType::Decimal { precision, scale }
                if scale == 0 && precision <= MAX_INTEGER_PRECISION =>
            {
                BufferKind::I64
            }
            // Room for sign and decimal point.
            DataType::Numeric { precision, .. } | DataType::Decimal { precision, .. } => {
                text(precision.saturating_add(2), prefer_unicode)
            }
            DataType::Real | DataType::Float | DataType::Double => BufferKind::F64,
            DataType::Bit => BufferKind::Bit,
            DataType::Date => BufferKind::Date,
            DataType::Timestamp { .. } => BufferKind::Timestamp,
            DataType::Char { length }
            | DataType::Varchar { length }
            | DataType::LongVarchar { length } => text(length, prefer_unicode),
            DataType::WChar { length }
            | DataType::WVarchar { length }
            | DataType::WLongVarchar { length } => BufferKind::WText { max_str_len: length },
            DataType::Unknown | DataType::Time { .. } | DataType::Other { .. } => return None,
        };
        Some(kind)
    }

    /// Combines a newly resolved candidate (`self`) with the kind currently bound (`current`).
    ///
    /// Text keeps the larger of both maximum lengths, so capacity never shrinks. If either side is
    /// wide text, so is the result. Fixed sized kinds are determined by the kind alone. A
    /// candidate of another kind replaces the current one.
    pub fn merge(self, current: Option<BufferKind>) -> BufferKind {
        match (self, current) {
            (
                BufferKind::Text { max_str_len },
                Some(BufferKind::Text {
                    max_str_len: current,
                }),
            ) => BufferKind::Text {
                max_str_len: max_str_len.max(current),
            },
            (
                BufferKind::Text { max_str_len } | BufferKind::WText { max_str_len },
                Some(BufferKind::Text {
                    max_str_len: current,
                })
                | Some(BufferKind::WText {
                    max_str_len: current,
                }),
            ) => BufferKind::WText {
                max_str_len: max_str_len.max(current),
            },
            (candidate, _) => candidate,
        }
    }

    /// Caps the maximum string length of text kinds at `limit`. Fixed sized kinds are returned
    /// unchanged.
    pub fn limit_str_len(self, limit: usize) -> BufferKind {
        match self {
            BufferKind::Text { max_str_len } => BufferKind::Text {
                max_str_len: max_str_len.min(limit),
            },
            BufferKind::WText { max_str_len } => BufferKind::WText {
                max_str_len: max_str_len.min(limit),
            },
            other => other,
        }
    }

    /// Size of a single element in the buffer in bytes (stride). Text elements include room for
    /// the terminating zero. `None` on overflow.
    pub fn element_size(self) -> Option<usize> {
        match self {
            BufferKind::Text { max_str_len } => max_str_len.checked_add(1),
            BufferKind::WText { max_str_len } => max_str_len
                .checked_add(1)
                .and_then(|n| n.checked_mul(size_of::<u16>())),
            BufferKind::I64 => Some(size_of::<i64>()),
            BufferKind::F64 => Some(size_of::<f64>()),
            BufferKind::Bit => Some(size_of::<u8>()),
            BufferKind::Date => Some(size_of::<Date>()),
            BufferKind::Timestamp => Some(size_of::<Timestamp>()),
        }
    }

    /// `true` for the variable sized, string-like kinds.
    pub fn is_text(self) -> bool {
        matches!(self, BufferKind::Text { .. } | BufferKind::WText { .. })
    }

    /// C data type the buffer is bound with.
    pub fn cdata_type(self) -> CDataType {
        match self {
            BufferKind::Text { .. } => CDataType::Char,
            BufferKind::WText { .. } => CDataType::WChar,
            BufferKind::I64 => CDataType::SBigInt,
            BufferKind::F64 => CDataType::Double,
            BufferKind::Bit => CDataType::Bit,
            BufferKind::Date => CDataType::TypeDate,
            BufferKind::Timestamp => CDataType::TypeTimestamp,
        }
    }

    /// SQL data type the buffer is bound as. Together with [`Self::cdata_type`] this tells the
    /// driver which conversion to apply.
    pub fn data_type(self) -> DataType {
        match self {
            BufferKind::Text { max_str_len } => DataType::Varchar {
                length: max_str_len,
            },
            BufferKind::WText { max_str_len } => DataType::WVarchar {
                length: max_str_len,
            },
            BufferKind::I64 => DataType::Bigint,
            BufferKind::F64 => DataType::Double,
            BufferKind::Bit => DataType::Bit,
            BufferKind::Date => DataType::Date,
            BufferKind::Timestamp => DataType::Timestamp {
                precision: TIMESTAMP_PRECISION,
            },
        }
    }

    /// Column size passed to `SQLBindParameter`. Drivers reject a column size of zero for text,
    /// even if we only ever send empty strings.
    pub fn column_size(self) -> usize {
        match self {
            BufferKind::Text { max_str_len } | BufferKind::WText { max_str_len } => {
                max_str_len.max(1)
            }
            BufferKind::I64 => 19,
            BufferKind::F64 => 15,
            BufferKind::Bit => 1,
            // yyyy-mm-dd
            BufferKind::Date => 10,
            // yyyy-mm-dd hh:mm:ss.ffffff
            BufferKind::Timestamp => 20 + TIMESTAMP_PRECISION as usize,
        }
    }

    /// Decimal digits passed to `SQLBindParameter`.
    pub fn decimal_digits(self) -> i16 {
        match self {
            BufferKind::Timestamp => TIMESTAMP_PRECISION,
            _ => 0,
        }
    }
}

fn text(max_str_len: usize, prefer_unicode: bool) -> BufferKind {
    if prefer_unicode {
        BufferKind::WText { max_str_len }
    } else {
        BufferKind::Text { max_str_len }
    }
}
