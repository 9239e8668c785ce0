use super::{
    SqlChar,
    as_handle::AsHandle,
    buffer::{clamp_small_int, mut_buf_ptr},
};
use odbc_sys::{SQLGetDiagRecW, SQLSTATE_SIZE, SqlReturn};
use std::fmt;
use widestring::U16Str;

/// Five character SQLSTATE code of a diagnostic record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct State(pub [u8; SQLSTATE_SIZE]);

impl State {
    /// Given the specified Attribute value, an invalid value was specified in ValuePtr. Some
    /// drivers report this if the parameter set size is larger than they can handle.
    pub const INVALID_ATTRIBUTE_VALUE: State = State(*b"HY024");
    /// An invalid data type has been bound to a statement.
    pub const INVALID_SQL_DATA_TYPE: State = State(*b"HY004");
    /// The driver does not support describing parameters.
    pub const OPTIONAL_FEATURE_NOT_IMPLEMENTED: State = State(*b"HYC00");
    /// String or binary data would have been truncated.
    pub const STRING_DATA_RIGHT_TRUNCATION: State = State(*b"01004");

    /// State as written by `SQLGetDiagRecW`: wide characters followed by a terminating zero.
    pub fn from_chars_with_nul(code: &[SqlChar; SQLSTATE_SIZE + 1]) -> Self {
        State(std::array::from_fn(|index| code[index] as u8))
    }

    /// SQLSTATE codes are ASCII. A malformed code from a broken driver is shown as `?????`.
    pub fn as_str(&self) -> &str {
        std::str::from_utf8(&self.0).unwrap_or("?????")
    }
}

/// Result of [`Diagnostics::diagnostic_record`].
#[derive(Debug, Clone, Copy)]
pub struct DiagnosticResult {
    /// A five-character SQLSTATE code for the diagnostic record.
    pub state: State,
    /// Native error code specific to the data source.
    pub native_error: i32,
    /// The length of the diagnostic message reported by ODBC (excluding the terminating zero).
    pub text_length: i16,
}

/// Report diagnostics from the last call to an ODBC function using a handle.
pub trait Diagnostics {
    /// Returns the current values of multiple fields of a diagnostic record that contains error,
    /// warning, and status information.
    ///
    /// * `rec_number` - Status records are numbered from 1.
    /// * `message_text` - Buffer the message is written to. If it is too small the message is
    ///   truncated, which can be detected by comparing its length with
    ///   [`DiagnosticResult::text_length`].
    ///
    /// `None` if there is no record with this number.
    fn diagnostic_record(
        &self,
        rec_number: i16,
        message_text: &mut [SqlChar],
    ) -> Option<DiagnosticResult>;

    /// Like [`Self::diagnostic_record`], but grows `message_text` and asks again if the message
    /// did not fit. Afterwards `message_text` holds exactly the message.
    fn diagnostic_record_vec(
        &self,
        rec_number: i16,
        message_text: &mut Vec<SqlChar>,
    ) -> Option<DiagnosticResult> {
        message_text.resize(message_text.capacity().max(1), 0);
        let mut result = self.diagnostic_record(rec_number, message_text)?;
        let reported = usize::try_from(result.text_length).unwrap_or(0);
        if reported >= message_text.len() {
            // Terminating zero is not part of the reported length.
            message_text.resize(reported + 1, 0);
            result = self.diagnostic_record(rec_number, message_text)?;
        }
        // Some drivers report the length of the buffer rather than the message and pad with zeroes.
        let length = message_text[..reported.min(message_text.len())]
            .iter()
            .rposition(|&c| c != 0)
            .map_or(0, |last| last + 1);
        message_text.truncate(length);
        Some(result)
    }
}

impl<T: AsHandle + ?Sized> Diagnostics for T {
    fn diagnostic_record(
        &self,
        rec_number: i16,
        message_text: &mut [SqlChar],
    ) -> Option<DiagnosticResult> {
        assert!(rec_number > 0, "Diagnostic records are numbered from 1.");
        let mut state = [0; SQLSTATE_SIZE + 1];
        let mut native_error = 0;
        let mut text_length = 0;
        let ret = unsafe {
            SQLGetDiagRecW(
                self.handle_type(),
                self.as_handle(),
                rec_number,
                state.as_mut_ptr(),
                &mut native_error,
                mut_buf_ptr(message_text),
                clamp_small_int(message_text.len()),
                &mut text_length,
            )
        };

        match ret {
            // Truncated messages are reported with `SUCCESS_WITH_INFO`.
            SqlReturn::SUCCESS | SqlReturn::SUCCESS_WITH_INFO => Some(DiagnosticResult {
                state: State::from_chars_with_nul(&state),
                native_error,
                text_length,
            }),
            SqlReturn::NO_DATA => None,
            unexpected => panic!("SQLGetDiagRecW returned {unexpected:?} for record {rec_number}."),
        }
    }
}

/// Owned diagnostic record, attached to [`crate::Error::Diagnostics`]. Displays state, native
/// error and message.
#[derive(Default, Clone)]
pub struct Record {
    pub state: State,
    /// Error code specific to the data source.
    pub native_error: i32,
    /// Buffer containing the error message, without terminating zero.
    pub message: Vec<SqlChar>,
}

impl Record {
    /// Empty record. Messages up to `capacity` characters are fetched without reallocating.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            message: Vec::with_capacity(capacity),
            ..Default::default()
        }
    }

    /// Overwrites this record with record `record_number` of `handle`. `false` if there is no
    /// such record, in which case `self` is left in an unspecified state.
    pub fn fill_from(&mut self, handle: &(impl Diagnostics + ?Sized), record_number: i16) -> bool {
        let Some(result) = handle.diagnostic_record_vec(record_number, &mut self.message) else {
            return false;
        };
        self.state = result.state;
        self.native_error = result.native_error;
        true
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "State: {}, Native error: {}, Message: {}",
            self.state.as_str(),
            self.native_error,
            U16Str::from_slice(&self.message).to_string_lossy(),
        )
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
