//! Provides basic abstraction over a valid (i.e. allocated) ODBC statement handle.
//!
//! Two decisions are already baked into this module:
//!
//! * Treat warnings by logging them with `log`.
//! * Use the Unicode (wide) variants of the ODBC API.

mod as_handle;
mod buffer;
mod column_description;
mod data_type;
mod diagnostics;
mod logging;
mod sql_result;
mod statement;

pub use {
    as_handle::AsHandle,
    column_description::{ColumnDescription, Nullability},
    data_type::DataType,
    diagnostics::{DiagnosticResult, Diagnostics, Record, State},
    logging::log_diagnostics,
    sql_result::{ExtSqlReturn, SqlResult},
    statement::StatementImpl,
};

/// Character type used to exchange text with the ODBC driver manager. Since we use the wide
/// function calls this is UTF-16.
pub type SqlChar = u16;
