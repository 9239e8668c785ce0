use log::{debug, error, trace, warn};

use crate::{
    BoundParameter, ColumnDescription, Error, Field,
    buffers::BufferKind,
    statement::BindParameters,
};

/// Controls how parameter descriptions are turned into buffers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BindOptions {
    /// Bind all text parameters as UTF-16 (`WCHAR`), even if the driver suggests narrow
    /// characters. Default is `false`.
    pub prefer_unicode: bool,
    /// Upper bound for the length of text buffers allocated from the suggestions of the driver
    /// during construction. Some drivers report huge or placeholder sizes (e.g. for
    /// `VARCHAR(MAX)`). Larger values can still be sent after a [`BoundParameterSet::rebind`],
    /// which is never limited. `None` (default) uses the suggestions as they are.
    pub max_initial_string_length: Option<usize>,
}

/// Buffers bound to all parameters of a prepared statement, so it can be executed with batches of
/// parameter sets. Keeps track of the number of rows the data source confirmed to have
/// processed.
///
/// Binding buffers is expensive, so they are reused for each batch. Values of the next batch are
/// written into the buffers already bound, using [`Self::set_field`], before calling
/// [`Self::execute_batch`].
///
/// Dropping the set resets the parameter bindings of the statement before the buffers are freed.
pub struct BoundParameterSet<S: BindParameters> {
    statement: S,
    options: BindOptions,
    /// Maximum number of rows in each batch. Every buffer has room for exactly this many
    /// elements.
    batch_capacity: usize,
    parameters: Vec<BoundParameter>,
    /// Sum of processed rows reported by the statement. Never larger than the sum of submitted
    /// rows.
    transferred_sets: usize,
    /// The statement writes the number of rows processed by the last execution in here. Boxed, so
    /// the installed address stays valid if `self` is moved.
    processed: Box<usize>,
}

impl<S> BoundParameterSet<S>
where
    S: BindParameters,
{
    /// Binds a buffer with room for `batch_capacity` rows to each parameter of `statement`.
    /// Buffers are sized according to the descriptions the driver reports for each parameter.
    pub fn new(statement: S, batch_capacity: usize) -> Result<Self, Error> {
        Self::with_options(statement, batch_capacity, BindOptions::default())
    }

    /// Like [`Self::new`] with control over how descriptions are mapped to buffers.
    pub fn with_options(
        statement: S,
        batch_capacity: usize,
        options: BindOptions,
    ) -> Result<Self, Error> {
        if batch_capacity == 0 {
            return Err(Error::InvalidBatchCapacity);
        }
        let num_params = statement.num_params()?;
        // Constructed before anything is bound, so parameters bound so far are reset again, should
        // we return early.
        let mut set = Self {
            statement,
            options,
            batch_capacity,
            parameters: Vec::with_capacity(num_params.into()),
            transferred_sets: 0,
            processed: Box::new(0),
        };
        for parameter_number in 1..=num_params {
            let description = set.statement.describe_param(parameter_number)?;
            let mut kind = set.resolve(parameter_number, &description)?;
            if let Some(limit) = options.max_initial_string_length {
                kind = kind.limit_str_len(limit);
            }
            let parameter = unsafe {
                BoundParameter::new(
                    &mut set.statement,
                    parameter_number,
                    kind.merge(None),
                    description.nullability,
                    batch_capacity,
                )?
            };
            set.parameters.push(parameter);
        }
        Ok(set)
    }

    /// Replaces the buffer bound to the parameter at `index` (zero based) with one sized for
    /// `description`. Text buffers never shrink: the new buffer has room for the larger of the
    /// maximum string lengths of `description` and the current buffer, and stays wide if either
    /// of them is wide. A description of another kind (e.g. an integer for a text parameter)
    /// replaces the current kind.
    ///
    /// Values written into the previous buffer are lost.
    pub fn rebind(&mut self, index: usize, description: &ColumnDescription) -> Result<(), Error> {
        let current = self.parameter(index)?;
        let parameter_number = current.parameter_number();
        let current_kind = current.buffer().kind();
        let kind = self.required_kind(index, description)?;
        if std::mem::discriminant(&kind) != std::mem::discriminant(&current_kind) {
            debug!("Parameter {parameter_number} changes from {current_kind:?} to {kind:?}.");
        }
        let parameter = unsafe {
            BoundParameter::new(
                &mut self.statement,
                parameter_number,
                kind,
                description.nullability,
                self.batch_capacity,
            )?
        };
        // The statement now points to the new buffer, so it is safe to free the old one.
        self.parameters[index] = parameter;
        Ok(())
    }

    /// Executes the statement with the first `num_rows` rows of the bound buffers and adds the
    /// number of rows the data source reports as processed to [`Self::transferred_sets`].
    ///
    /// An empty batch is not sent to the data source at all. Fails with
    /// [`Error::BatchTooLarge`] if `num_rows` is larger than the batch capacity, without calling
    /// the statement. If the statement fails, the transferred sets are not changed.
    pub fn execute_batch(&mut self, num_rows: usize) -> Result<(), Error> {
        if num_rows > self.batch_capacity {
            return Err(Error::BatchTooLarge {
                num_rows,
                batch_capacity: self.batch_capacity,
            });
        }
        if num_rows == 0 {
            return Ok(());
        }
        *self.processed = 0;
        unsafe {
            // Every buffer has been allocated with `batch_capacity` elements.
            self.statement.set_paramset_size(num_rows)?;
            self.statement
                .set_params_processed_ptr(&mut *self.processed as *mut usize)?;
            self.statement.execute()?;
        }
        let processed = *self.processed;
        trace!("Executed batch of {num_rows} parameter sets. Processed: {processed}.");
        if processed < num_rows {
            warn!(
                "Only {processed} of {num_rows} parameter sets have been processed by the data \
                source."
            );
        } else if processed > num_rows {
            warn!(
                "Data source claims to have processed {processed} parameter sets, but only \
                {num_rows} have been submitted."
            );
        }
        self.transferred_sets += processed.min(num_rows);
        Ok(())
    }

    /// Packs `field` into row `row_index` of the buffer bound to the parameter at
    /// `column_index`. `None` is `NULL`.
    ///
    /// # Panics
    ///
    /// If `row_index` is not smaller than the batch capacity.
    pub fn set_field(
        &mut self,
        column_index: usize,
        row_index: usize,
        field: Option<&Field>,
    ) -> Result<(), Error> {
        let num_parameters = self.parameters.len();
        self.parameters
            .get_mut(column_index)
            .ok_or(Error::InvalidParameterIndex {
                index: column_index,
                num_parameters,
            })?
            .set_field(row_index, field)
    }

    /// Bound parameters in order of their parameter number. Index `0` holds parameter `1`.
    pub fn parameters(&self) -> &[BoundParameter] {
        &self.parameters
    }

    /// Number of parameters of the statement.
    pub fn num_parameters(&self) -> usize {
        self.parameters.len()
    }

    /// Maximum number of rows in a single batch.
    pub fn batch_capacity(&self) -> usize {
        self.batch_capacity
    }

    /// Sum of rows the data source reported as processed over all batches executed so far. May
    /// be smaller than the number of rows submitted, if the data source stopped processing a
    /// batch early.
    pub fn transferred_sets(&self) -> usize {
        self.transferred_sets
    }

    /// Options the set has been constructed with.
    pub fn options(&self) -> &BindOptions {
        &self.options
    }

    /// The statement the parameters are bound to.
    pub fn statement(&self) -> &S {
        &self.statement
    }

    /// Kind of the buffer which would be bound, if the parameter at `index` is rebound with
    /// `description`.
    pub(crate) fn required_kind(
        &self,
        index: usize,
        description: &ColumnDescription,
    ) -> Result<BufferKind, Error> {
        let current = self.parameter(index)?;
        let candidate = self.resolve(current.parameter_number(), description)?;
        Ok(candidate.merge(Some(current.buffer().kind())))
    }

    fn parameter(&self, index: usize) -> Result<&BoundParameter, Error> {
        self.parameters
            .get(index)
            .ok_or(Error::InvalidParameterIndex {
                index,
                num_parameters: self.parameters.len(),
            })
    }

    fn resolve(
        &self,
        parameter_number: u16,
        description: &ColumnDescription,
    ) -> Result<BufferKind, Error> {
        BufferKind::from_data_type(description.data_type, self.options.prefer_unicode).ok_or(
            Error::UnsupportedParameterType {
                parameter_number,
                data_type: description.data_type,
            },
        )
    }
}

impl<S> Drop for BoundParameterSet<S>
where
    S: BindParameters,
{
    fn drop(&mut self) {
        if let Err(e) = self.statement.reset_parameters() {
            // Avoid panicking in drop.
            error!("Failed to reset the parameters bound to a statement: {e}");
        }
    }
}
