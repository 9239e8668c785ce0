#![allow(dead_code)]

use std::cell::Cell;

use odbc_bound_params::{
    BindParameters, ColumnDescription, DataType, DescribeParameters, Error, Nullability,
    buffers::{BufferKind, ParameterBuffer},
    sys::{CDataType, SqlDataType},
};

/// Set environment to something like `RUST_LOG=odbc_bound_params=trace cargo test` to see the
/// bindings and batches of a test.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub const INT_DESCRIPTION: ColumnDescription = ColumnDescription {
    data_type: DataType::Bigint,
    nullability: Nullability::Nullable,
};

pub const fn varchar(length: usize) -> ColumnDescription {
    ColumnDescription {
        data_type: DataType::Varchar { length },
        nullability: Nullability::Nullable,
    }
}

pub const fn nvarchar(length: usize) -> ColumnDescription {
    ColumnDescription {
        data_type: DataType::WVarchar { length },
        nullability: Nullability::Nullable,
    }
}

/// A call issued to [`MockStatement`], which changed its state.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Bind {
        parameter_number: u16,
        value_type: CDataType,
        parameter_type: SqlDataType,
        kind: BufferKind,
        number_of_elements: usize,
    },
    SetParamsetSize(usize),
    SetParamsProcessedPtr,
    Execute,
    ResetParameters,
}

/// What the statement reports back through the processed pointer during execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Processing {
    /// Report all submitted rows as processed.
    All,
    /// Report a fixed number of rows as processed.
    Only(usize),
    /// Fail the execution with an error.
    Fail,
}

/// Stands in for a prepared statement. Parameters are described by `descriptions`, and all calls
/// changing the state of the statement are recorded.
pub struct MockStatement {
    pub descriptions: Vec<ColumnDescription>,
    pub calls: Vec<Call>,
    pub processing: Cell<Processing>,
    /// Binding this parameter number fails.
    pub fail_binding: Option<u16>,
    /// Resetting the parameter bindings fails.
    pub fail_reset: bool,
    paramset_size: usize,
    processed: *mut usize,
}

impl MockStatement {
    pub fn new(descriptions: Vec<ColumnDescription>) -> Self {
        Self {
            descriptions,
            calls: Vec::new(),
            processing: Cell::new(Processing::All),
            fail_binding: None,
            fail_reset: false,
            paramset_size: 0,
            processed: std::ptr::null_mut(),
        }
    }

    /// A statement without any parameters.
    pub fn without_parameters() -> Self {
        Self::new(Vec::new())
    }

    /// All binding calls in the order they have been issued.
    pub fn bind_calls(&self) -> Vec<Call> {
        self.calls
            .iter()
            .filter(|call| matches!(call, Call::Bind { .. }))
            .cloned()
            .collect()
    }

    /// Every recorded call, except the binding ones.
    pub fn execution_calls(&self) -> Vec<Call> {
        self.calls
            .iter()
            .filter(|call| !matches!(call, Call::Bind { .. }))
            .cloned()
            .collect()
    }
}

impl DescribeParameters for MockStatement {
    fn num_params(&self) -> Result<u16, Error> {
        Ok(self.descriptions.len() as u16)
    }

    fn describe_param(&self, parameter_number: u16) -> Result<ColumnDescription, Error> {
        Ok(self.descriptions[parameter_number as usize - 1])
    }
}

impl BindParameters for MockStatement {
    unsafe fn bind_input_parameter(
        &mut self,
        parameter_number: u16,
        buffer: &mut ParameterBuffer,
    ) -> Result<(), Error> {
        if self.fail_binding == Some(parameter_number) {
            return Err(Error::NoDiagnostics {
                function: "SQLBindParameter",
            });
        }
        let args = buffer.bind_args();
        self.calls.push(Call::Bind {
            parameter_number,
            value_type: args.value_type,
            parameter_type: args.parameter_type,
            kind: buffer.kind(),
            number_of_elements: buffer.number_of_elements(),
        });
        Ok(())
    }

    unsafe fn set_paramset_size(&mut self, size: usize) -> Result<(), Error> {
        self.paramset_size = size;
        self.calls.push(Call::SetParamsetSize(size));
        Ok(())
    }

    unsafe fn set_params_processed_ptr(&mut self, processed: *mut usize) -> Result<(), Error> {
        self.processed = processed;
        self.calls.push(Call::SetParamsProcessedPtr);
        Ok(())
    }

    unsafe fn execute(&mut self) -> Result<(), Error> {
        self.calls.push(Call::Execute);
        let processed = match self.processing.get() {
            Processing::All => self.paramset_size,
            Processing::Only(n) => n,
            Processing::Fail => {
                return Err(Error::NoDiagnostics {
                    function: "SQLExecute",
                });
            }
        };
        unsafe { *self.processed = processed };
        Ok(())
    }

    fn reset_parameters(&mut self) -> Result<(), Error> {
        if self.fail_reset {
            return Err(Error::NoDiagnostics {
                function: "SQLFreeStmt",
            });
        }
        self.processed = std::ptr::null_mut();
        self.calls.push(Call::ResetParameters);
        Ok(())
    }
}
