use crate::{
    ColumnDescription, Error,
    buffers::ParameterBuffer,
    handles::{SqlResult, StatementImpl},
};

/// Pure queries about the parameter markers of a prepared statement.
pub trait DescribeParameters {
    /// Number of parameter markers in the prepared statement.
    fn num_params(&self) -> Result<u16, Error>;

    /// Type, size and nullability of a parameter, as suggested by the driver.
    ///
    /// * `parameter_number`: Numbering starts with `1`.
    fn describe_param(&self, parameter_number: u16) -> Result<ColumnDescription, Error>;
}

/// Effectful operations of a prepared statement needed to execute parameter arrays. The split
/// from [`DescribeParameters`] makes it explicit which calls change the state of the statement.
pub trait BindParameters: DescribeParameters {
    /// Registers `buffer` as the input parameter array for `parameter_number`, replacing any
    /// buffer previously bound to it.
    ///
    /// # Safety
    ///
    /// `buffer` must neither be dropped nor reallocated while it is bound. Moving the
    /// `ParameterBuffer` value is fine, since its memory lives on the heap.
    unsafe fn bind_input_parameter(
        &mut self,
        parameter_number: u16,
        buffer: &mut ParameterBuffer,
    ) -> Result<(), Error>;

    /// Number of rows in the parameter arrays used by the next execution.
    ///
    /// # Safety
    ///
    /// All bound buffers must hold at least `size` elements.
    unsafe fn set_paramset_size(&mut self, size: usize) -> Result<(), Error>;

    /// Installs the location the statement writes the number of processed rows to, during
    /// execution.
    ///
    /// # Safety
    ///
    /// `processed` must stay valid and must not move as long as it is installed.
    unsafe fn set_params_processed_ptr(&mut self, processed: *mut usize) -> Result<(), Error>;

    /// Executes the prepared statement with the current contents of the bound buffers. Blocks
    /// until the data source is done. Writes the number of processed rows through the pointer
    /// installed with [`Self::set_params_processed_ptr`] before returning.
    ///
    /// # Safety
    ///
    /// Bound buffers and processed pointer must be valid.
    unsafe fn execute(&mut self) -> Result<(), Error>;

    /// Unbinds all parameter buffers and the processed pointer.
    fn reset_parameters(&mut self) -> Result<(), Error>;
}

impl DescribeParameters for StatementImpl<'_> {
    fn num_params(&self) -> Result<u16, Error> {
        self.num_params().into_result(self)
    }

    fn describe_param(&self, parameter_number: u16) -> Result<ColumnDescription, Error> {
        self.describe_param(parameter_number).into_result(self)
    }
}

impl BindParameters for StatementImpl<'_> {
    unsafe fn bind_input_parameter(
        &mut self,
        parameter_number: u16,
        buffer: &mut ParameterBuffer,
    ) -> Result<(), Error> {
        let args = buffer.bind_args();
        let result = unsafe {
            StatementImpl::bind_input_parameter(
                self,
                parameter_number,
                args.value_type,
                args.parameter_type,
                args.column_size,
                args.decimal_digits,
                args.value,
                args.buffer_length,
                args.indicator,
            )
        };
        result.into_result(self)
    }

    unsafe fn set_paramset_size(&mut self, size: usize) -> Result<(), Error> {
        unsafe { StatementImpl::set_paramset_size(self, size) }.into_result(self)
    }

    unsafe fn set_params_processed_ptr(&mut self, processed: *mut usize) -> Result<(), Error> {
        unsafe { StatementImpl::set_params_processed_ptr(self, processed) }.into_result(self)
    }

    unsafe fn execute(&mut self) -> Result<(), Error> {
        // A searched update or delete which did not affect any row yields `SQL_NO_DATA`. This is
        // no error; the processed count has been written nevertheless.
        let result: SqlResult<()> = unsafe { StatementImpl::execute(self) };
        result.into_result_with(self, Some(()))
    }

    fn reset_parameters(&mut self) -> Result<(), Error> {
        StatementImpl::reset_parameters(self).into_result(self)
    }
}

impl<S> DescribeParameters for &mut S
where
    S: DescribeParameters + ?Sized,
{
    fn num_params(&self) -> Result<u16, Error> {
        (**self).num_params()
    }

    fn describe_param(&self, parameter_number: u16) -> Result<ColumnDescription, Error> {
        (**self).describe_param(parameter_number)
    }
}

impl<S> BindParameters for &mut S
where
    S: BindParameters + ?Sized,
{
    unsafe fn bind_input_parameter(
        &mut self,
        parameter_number: u16,
        buffer: &mut ParameterBuffer,
    ) -> Result<(), Error> {
        unsafe { (**self).bind_input_parameter(parameter_number, buffer) }
    }

    unsafe fn set_paramset_size(&mut self, size: usize) -> Result<(), Error> {
        unsafe { (**self).set_paramset_size(size) }
    }

    unsafe fn set_params_processed_ptr(&mut self, processed: *mut usize) -> Result<(), Error> {
        unsafe { (**self).set_params_processed_ptr(processed) }
    }

    unsafe fn execute(&mut self) -> Result<(), Error> {
        unsafe { (**self).execute() }
    }

    fn reset_parameters(&mut self) -> Result<(), Error> {
        (**self).reset_parameters()
    }
}
