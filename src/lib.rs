//! # Bound parameter sets
//!
//! ODBC allows executing a prepared statement with whole arrays of parameters at once, which is
//! way faster than executing it once for each row. The price is that every parameter must be
//! bound to a pre-allocated buffer with a fixed element size and a fixed number of elements,
//! described by the type codes of the ODBC C API. This crate manages these buffers:
//!
//! * [`BoundParameterSet`] asks the statement to describe its parameters and binds one buffer for
//!   each of them, with room for a fixed number of rows (the batch capacity).
//! * Values are packed into the buffers using [`BoundParameterSet::set_field`].
//! * A buffer too small for a value can be replaced using [`BoundParameterSet::rebind`]. Text
//!   buffers never shrink.
//! * [`BoundParameterSet::execute_batch`] executes the statement with the first `n` rows of the
//!   buffers and accumulates the number of rows the data source reports as processed.
//! * [`BulkInserter`] puts it all together, taking care of flushing and rebinding while rows are
//!   appended one at a time.
//!
//! Allocating, connecting and preparing statements is left to the application (e.g. using
//! `odbc-api`). Any statement implementing [`BindParameters`] can be used, including a
//! [`handles::StatementImpl`] wrapping a raw statement handle.
//!
//! ```
//! use odbc_bound_params::{BoundParameterSet, BulkInserter, Error, Field, handles::StatementImpl};
//!
//! /// `statement` is expected to be prepared with e.g.
//! /// `INSERT INTO Birthdays (name, year) VALUES (?, ?)`.
//! fn insert_birth_years(
//!     statement: &mut StatementImpl<'_>,
//!     birthdays: &[(&str, i64)],
//! ) -> Result<usize, Error> {
//!     let parameters = BoundParameterSet::new(statement, 1000)?;
//!     let mut inserter = BulkInserter::new(parameters);
//!     for &(name, year) in birthdays {
//!         inserter.append(&[Some(Field::from(name)), Some(Field::Integer(year))])?;
//!     }
//!     inserter.flush()?;
//!     Ok(inserter.transferred_sets())
//! }
//! ```

mod bound_parameter;
mod bound_parameter_set;
mod bulk_inserter;
mod error;
mod field;
mod statement;

pub mod buffers;
pub mod handles;

pub use self::{
    bound_parameter::BoundParameter,
    bound_parameter_set::{BindOptions, BoundParameterSet},
    bulk_inserter::BulkInserter,
    error::Error,
    field::Field,
    handles::{ColumnDescription, DataType, Nullability},
    statement::{BindParameters, DescribeParameters},
};
// Reexports
/// Reexports `odbc-sys` as sys to enable applications to always use the same version as this crate.
pub use odbc_sys as sys;
pub use widestring::{U16Str, U16String};
