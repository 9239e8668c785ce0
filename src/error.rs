use thiserror::Error as ThisError;

use crate::{
    DataType,
    buffers::BufferKind,
    handles::{Diagnostics, Record as DiagnosticRecord, SqlResult, log_diagnostics},
};

#[derive(Debug, ThisError)]
/// Error type used by bound parameter sets. Violations of the calling contract are reported the
/// same way as errors emitted by the ODBC driver.
pub enum Error {
    /// This should never happen, given that ODBC driver manager and ODBC driver do not have any
    /// Bugs. Since we may link vs a bunch of these, better to be on the safe side.
    #[error(
        "No Diagnostics available. The ODBC function call to {function} returned an error. Sadly \
        neither the ODBC driver manager, nor the driver were polite enough to leave a diagnostic \
        record specifying what exactly went wrong."
    )]
    NoDiagnostics {
        /// ODBC API call which returned error without producing a diagnostic record.
        function: &'static str,
    },
    /// SQL Error had been returned by a low level ODBC function call. A Diagnostic record is
    /// obtained and associated with this error.
    #[error("ODBC emitted an error calling '{function}':\n{record}")]
    Diagnostics {
        /// Diagnostic record returned by the ODBC driver manager
        record: DiagnosticRecord,
        /// ODBC API call which produced the diagnostic record
        function: &'static str,
    },
    /// More rows have been requested for a single execution than the parameter buffers can hold.
    #[error(
        "Tried to execute a batch of {num_rows} parameter sets, but the bound buffers only have \
        room for {batch_capacity}."
    )]
    BatchTooLarge { num_rows: usize, batch_capacity: usize },
    /// A parameter set must be able to hold at least one row.
    #[error("The batch capacity of a bound parameter set must be at least one.")]
    InvalidBatchCapacity,
    /// Index passed to rebind is not smaller than the number of parameters.
    #[error(
        "Parameter index {index} is out of range. The statement has {num_parameters} parameters \
        (indices are zero based)."
    )]
    InvalidParameterIndex { index: usize, num_parameters: usize },
    /// A row passed to a bulk inserter does not have one field for each parameter.
    #[error("Row has {actual} fields, but the statement has {expected} parameters.")]
    InvalidRowLength { expected: usize, actual: usize },
    /// There is no buffer representation for the SQL type of the parameter.
    #[error(
        "Parameter {parameter_number} is of type {data_type:?}, which can not be bound to a \
        parameter buffer."
    )]
    UnsupportedParameterType {
        /// One based parameter number.
        parameter_number: u16,
        data_type: DataType,
    },
    /// A value has been written into a buffer holding another type.
    #[error("A {field} value can not be written into a parameter buffer of kind {kind:?}.")]
    FieldTypeMismatch {
        /// Name of the field variant.
        field: &'static str,
        kind: BufferKind,
    },
    #[error(
        "A value of {length} bytes (or characters for wide text) is too large to be written into \
        a parameter buffer with a maximum string length of {max_str_len}."
    )]
    TooLargeValueForBuffer { length: usize, max_str_len: usize },
    #[error(
        "There is not enough memory to allocate a parameter buffer. Number of elements requested \
        for the buffer: {num_elements}; Size needed to hold the largest possible element: \
        {element_size}."
    )]
    TooLargeBufferSize {
        num_elements: usize,
        /// `usize::MAX` is used if the element size itself overflows.
        element_size: usize,
    },
}

// Define that here rather than in `sql_result` mod to keep the `handles` module entirely agnostic
// about the top level `Error` type.
impl<T> SqlResult<T> {
    /// [`Self::Success`] and [`Self::SuccessWithInfo`] are mapped to Ok. In case of
    /// [`Self::SuccessWithInfo`] any diagnostics are logged. [`Self::Error`] is mapped to error.
    /// [`Self::NoData`] is mapped to `no_data`, if there is one and panics otherwise.
    pub fn into_result_with(
        self,
        handle: &(impl Diagnostics + ?Sized),
        no_data: Option<T>,
    ) -> Result<T, Error> {
        match self {
            // The function has been executed successfully. Holds result.
            SqlResult::Success(value) => Ok(value),
            // The function has been executed successfully. There have been warnings. Holds result.
            SqlResult::SuccessWithInfo(value) => {
                log_diagnostics(handle);
                Ok(value)
            }
            SqlResult::Error { function } => {
                let mut record = DiagnosticRecord::with_capacity(512);
                if record.fill_from(handle, 1) {
                    log_diagnostics(handle);
                    Err(Error::Diagnostics { record, function })
                } else {
                    Err(Error::NoDiagnostics { function })
                }
            }
            SqlResult::NoData => {
                Ok(no_data.expect("Unexepcted SQL_NO_DATA returned by ODBC function"))
            }
        }
    }

    /// Like [`Self::into_result_with`], for functions which never return `SQL_NO_DATA`.
    pub fn into_result(self, handle: &(impl Diagnostics + ?Sized)) -> Result<T, Error> {
        self.into_result_with(handle, None)
    }
}
