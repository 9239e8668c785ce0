use crate::{
    BoundParameterSet, ColumnDescription, Error, Field, statement::BindParameters,
};

/// Sends rows of application values to the data source in batches, using a
/// [`BoundParameterSet`]. Contrary to its name any statement with parameters can be executed, not
/// only `INSERT`, however inserting large amounts of data is the primary intended use case.
///
/// Rows are appended one at a time. Once the buffers are full, the batch is executed. Should a
/// value not fit into the buffer bound to its parameter (text too long, or a value of another
/// kind), the rows appended so far are executed and a larger buffer is bound.
pub struct BulkInserter<S: BindParameters> {
    parameters: BoundParameterSet<S>,
    /// Number of rows written into the buffers, but not executed yet.
    num_rows: usize,
}

impl<S> BulkInserter<S>
where
    S: BindParameters,
{
    pub fn new(parameters: BoundParameterSet<S>) -> Self {
        Self {
            parameters,
            num_rows: 0,
        }
    }

    /// Appends a row with one field for each parameter. `None` is `NULL`.
    pub fn append(&mut self, row: &[Option<Field>]) -> Result<(), Error> {
        let expected = self.parameters.num_parameters();
        if row.len() != expected {
            return Err(Error::InvalidRowLength {
                expected,
                actual: row.len(),
            });
        }
        if self.num_rows == self.parameters.batch_capacity() {
            self.flush()?;
        }

        for (index, field) in row.iter().enumerate() {
            let Some(field) = field else {
                continue;
            };
            let description = ColumnDescription::from_field(field);
            let current = self.parameters.parameters()[index].buffer().kind();
            if self.parameters.required_kind(index, &description)? != current {
                // Rebinding discards the values in the current buffer, so send them first.
                self.flush()?;
                self.parameters.rebind(index, &description)?;
            }
        }

        for (index, field) in row.iter().enumerate() {
            self.parameters
                .set_field(index, self.num_rows, field.as_ref())?;
        }
        self.num_rows += 1;
        Ok(())
    }

    /// Executes all rows appended since the last flush. Does nothing if there are none.
    ///
    /// Should the execution fail, the rows are kept, so the application may decide whether to
    /// [`Self::clear`] them or to try again.
    pub fn flush(&mut self) -> Result<(), Error> {
        self.parameters.execute_batch(self.num_rows)?;
        self.num_rows = 0;
        Ok(())
    }

    /// Discards all rows appended since the last flush.
    pub fn clear(&mut self) {
        self.num_rows = 0;
    }

    /// Number of rows appended, but not executed yet.
    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    /// Rows confirmed as processed by the data source so far. See
    /// [`BoundParameterSet::transferred_sets`].
    pub fn transferred_sets(&self) -> usize {
        self.parameters.transferred_sets()
    }

    pub fn parameter_set(&self) -> &BoundParameterSet<S> {
        &self.parameters
    }

    /// Rows appended since the last flush are discarded.
    pub fn into_parameter_set(self) -> BoundParameterSet<S> {
        self.parameters
    }
}
