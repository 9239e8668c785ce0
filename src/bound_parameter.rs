use log::debug;

use crate::{
    ColumnDescription, Error, Field, Nullability,
    buffers::{BufferKind, ParameterBuffer},
    statement::BindParameters,
};

/// A parameter buffer bound to a parameter marker of a statement.
///
/// Owns its buffer exclusively. Dropping a bound parameter frees the buffer, so it must either
/// be replaced by another binding for the same parameter number or the parameters of the
/// statement must be reset before.
#[derive(Debug)]
pub struct BoundParameter {
    parameter_number: u16,
    nullability: Nullability,
    buffer: ParameterBuffer,
}

impl BoundParameter {
    /// Allocates a buffer with room for `batch_capacity` elements of `kind` and binds it to
    /// `parameter_number` (one based).
    ///
    /// # Safety
    ///
    /// The returned instance must not be dropped while `statement` may still use the binding.
    pub unsafe fn new(
        statement: &mut impl BindParameters,
        parameter_number: u16,
        kind: BufferKind,
        nullability: Nullability,
        batch_capacity: usize,
    ) -> Result<Self, Error> {
        let mut buffer = ParameterBuffer::new(kind, batch_capacity)?;
        debug!(
            "Binding parameter {parameter_number} as {kind:?} with {} bytes per element.",
            buffer.capacity_per_element()
        );
        unsafe { statement.bind_input_parameter(parameter_number, &mut buffer)? };
        Ok(Self {
            parameter_number,
            nullability,
            buffer,
        })
    }

    /// One based position of the parameter marker in the statement.
    pub fn parameter_number(&self) -> u16 {
        self.parameter_number
    }

    /// The resolved description the buffer has been sized for.
    pub fn description(&self) -> ColumnDescription {
        ColumnDescription::new(self.buffer.kind().data_type(), self.nullability)
    }

    /// Buffer holding the values sent for this parameter.
    pub fn buffer(&self) -> &ParameterBuffer {
        &self.buffer
    }

    /// Packs `field` into row `row_index` of the buffer. See [`ParameterBuffer::set_field`].
    ///
    /// Mutable access to the buffer itself is not handed out, since replacing it would leave a
    /// dangling binding behind.
    pub fn set_field(&mut self, row_index: usize, field: Option<&Field>) -> Result<(), Error> {
        self.buffer.set_field(row_index, field)
    }
}
