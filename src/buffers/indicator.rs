use odbc_sys::{Len, NULL_DATA};

/// Indicates existence and length of a parameter value.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Indicator {
    /// Value is `NULL`.
    Null,
    /// Value exists. For text this is the length in bytes, excluding the terminating zero. For
    /// fixed sized values this is the size of the value.
    Length(usize),
}

impl Indicator {
    /// Creates an indicator from an indicator value as used by the ODBC C API.
    ///
    /// Any other negative value than [`NULL_DATA`] is never written by a parameter buffer, so it
    /// is treated the same as `NULL`.
    pub fn from_isize(indicator: Len) -> Self {
        match usize::try_from(indicator) {
            Ok(len) => Indicator::Length(len),
            Err(_) => Indicator::Null,
        }
    }

    /// Creates an indicator value as required by the ODBC C API.
    pub fn to_isize(self) -> Len {
        match self {
            Indicator::Null => NULL_DATA,
            Indicator::Length(len) => len.try_into().unwrap_or(Len::MAX),
        }
    }

    /// Only `true` if the indicator is the equivalent to [`odbc_sys::NULL_DATA`].
    pub fn is_null(self) -> bool {
        matches!(self, Indicator::Null)
    }

    /// If the indicator is [`Indicator::Length`] this is [`Some`].
    pub fn length(self) -> Option<usize> {
        if let Indicator::Length(len) = self {
            Some(len)
        } else {
            None
        }
    }
}
