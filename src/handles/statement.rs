use super::{
    ColumnDescription, DataType, Nullability,
    as_handle::AsHandle,
    buffer::{buf_ptr, clamp_int},
    sql_result::{ExtSqlReturn, SqlResult},
};
use odbc_sys::{
    CDataType, FreeStmtOption, HDbc, HStmt, Handle, HandleType, Len, ParamType, Pointer,
    SQLBindParameter, SQLDescribeParam, SQLExecute, SQLFreeStmt, SQLNumParams, SQLPrepareW,
    SQLSetStmtAttrW, SqlDataType, StatementAttribute, ULen,
};
use std::{marker::PhantomData, ptr::null_mut};
use widestring::U16Str;

/// Wraps a valid (i.e. successfully allocated) ODBC statement handle. The handle is borrowed: it
/// is allocated and freed by whoever owns the connection, this type only issues calls on it.
pub struct StatementImpl<'s> {
    parent: PhantomData<&'s HDbc>,
    handle: HStmt,
}

unsafe impl AsHandle for StatementImpl<'_> {
    fn as_handle(&self) -> Handle {
        self.handle.as_handle()
    }

    fn handle_type(&self) -> HandleType {
        HandleType::Stmt
    }
}

impl StatementImpl<'_> {
    /// # Safety
    ///
    /// `handle` must be a valid (successfully allocated) statement handle, which outlives the
    /// returned instance.
    pub unsafe fn new(handle: HStmt) -> Self {
        Self {
            handle,
            parent: PhantomData,
        }
    }

    /// The raw underlying statement handle.
    pub fn as_sys(&self) -> HStmt {
        self.handle
    }

    /// Send an SQL statement to the data source for preparation. To include a parameter marker,
    /// the application embeds a question mark (?) into the SQL string at the appropriate position.
    pub fn prepare(&mut self, statement_text: &U16Str) -> SqlResult<()> {
        unsafe {
            SQLPrepareW(
                self.handle,
                buf_ptr(statement_text.as_slice()),
                clamp_int(statement_text.len()),
            )
        }
        .into_sql_result("SQLPrepareW")
    }

    /// Number of parameter markers in the prepared statement.
    pub fn num_params(&self) -> SqlResult<u16> {
        let mut out: i16 = 0;
        unsafe { SQLNumParams(self.handle, &mut out) }
            .into_sql_result("SQLNumParams")
            .on_success(|| out.try_into().unwrap_or(0))
    }

    /// Describe the parameter marker at `parameter_number`. Numbering starts with `1`.
    pub fn describe_param(&self, parameter_number: u16) -> SqlResult<ColumnDescription> {
        let mut data_type = SqlDataType::UNKNOWN_TYPE;
        let mut parameter_size = 0;
        let mut decimal_digits = 0;
        let mut nullable = odbc_sys::Nullability::UNKNOWN;
        unsafe {
            SQLDescribeParam(
                self.handle,
                parameter_number,
                &mut data_type,
                &mut parameter_size,
                &mut decimal_digits,
                &mut nullable,
            )
        }
        .into_sql_result("SQLDescribeParam")
        .on_success(|| ColumnDescription {
            data_type: DataType::new(data_type, parameter_size, decimal_digits),
            nullability: Nullability::new(nullable),
        })
    }

    /// Binds an input buffer to a parameter marker in an SQL statement.
    ///
    /// See <https://docs.microsoft.com/en-us/sql/odbc/reference/syntax/sqlbindparameter-function>.
    ///
    /// # Safety
    ///
    /// `value` must hold at least paramset size elements of `buffer_length` bytes each and
    /// `indicator` at least paramset size elements. Both must stay valid until they are either
    /// rebound or the parameters are reset.
    #[allow(clippy::too_many_arguments)]
    pub unsafe fn bind_input_parameter(
        &mut self,
        parameter_number: u16,
        value_type: CDataType,
        parameter_type: SqlDataType,
        column_size: ULen,
        decimal_digits: i16,
        value: Pointer,
        buffer_length: Len,
        indicator: *mut Len,
    ) -> SqlResult<()> {
        unsafe {
            SQLBindParameter(
                self.handle,
                parameter_number,
                ParamType::Input,
                value_type,
                parameter_type,
                column_size,
                decimal_digits,
                value,
                buffer_length,
                indicator,
            )
        }
        .into_sql_result("SQLBindParameter")
    }

    /// Number of rows in the parameter array submitted by the next call to [`Self::execute`].
    ///
    /// # Safety
    ///
    /// All bound parameter buffers must hold at least `size` elements.
    pub unsafe fn set_paramset_size(&mut self, size: usize) -> SqlResult<()> {
        assert!(size > 0);
        unsafe {
            SQLSetStmtAttrW(
                self.handle,
                StatementAttribute::ParamsetSize,
                size as Pointer,
                0,
            )
        }
        .into_sql_result("SQLSetStmtAttrW")
    }

    /// Bind an integer the driver writes the number of processed parameter sets into during
    /// execution.
    ///
    /// # Safety
    ///
    /// `processed` must not be moved and remain valid, as long as it remains bound to the
    /// statement.
    pub unsafe fn set_params_processed_ptr(&mut self, processed: *mut ULen) -> SqlResult<()> {
        unsafe {
            SQLSetStmtAttrW(
                self.handle,
                StatementAttribute::ParamsProcessedPtr,
                processed as Pointer,
                0,
            )
        }
        .into_sql_result("SQLSetStmtAttrW")
    }

    /// Executes a statement prepared by `prepare`, using the current contents of the bound
    /// parameter buffers.
    ///
    /// # Safety
    ///
    /// All bound buffers and the processed count pointer must be valid.
    pub unsafe fn execute(&mut self) -> SqlResult<()> {
        unsafe { SQLExecute(self.handle) }.into_sql_result("SQLExecute")
    }

    /// Release all parameter buffers bound by `bind_input_parameter` and forget the processed
    /// count pointer.
    pub fn reset_parameters(&mut self) -> SqlResult<()> {
        let result = unsafe { SQLFreeStmt(self.handle, FreeStmtOption::ResetParams) }
            .into_sql_result("SQLFreeStmt");
        if result.is_err() {
            return result;
        }
        unsafe {
            SQLSetStmtAttrW(
                self.handle,
                StatementAttribute::ParamsProcessedPtr,
                null_mut(),
                0,
            )
        }
        .into_sql_result("SQLSetStmtAttrW")
    }
}

#[cfg(test)]
mod tests {
    use std::ptr::null_mut;

    use odbc_sys::{HStmt, Handle, HandleType};

    use super::{AsHandle, StatementImpl};

    #[test]
    fn statement_handle_is_passed_on_unchanged() {
        let mut marker = 0u8;
        let raw = HStmt(&mut marker as *mut u8 as *mut _);

        let statement = unsafe { StatementImpl::new(raw) };

        assert_eq!(raw, statement.as_sys());
        assert_eq!(Handle(raw.0), statement.as_handle());
        assert_eq!(HandleType::Stmt, statement.handle_type());
    }

    #[test]
    fn null_statement_handle() {
        let statement = unsafe { StatementImpl::new(HStmt(null_mut())) };
        assert_eq!(Handle::null(), statement.as_handle());
    }
}
