use odbc_sys::{Handle, HandleType};

/// Anything wrapping a raw ODBC handle diagnostics can be read from. Within this crate this is
/// the statement handle parameters are bound to, yet diagnostics are fetched the same way for any
/// handle type.
///
/// # Safety
///
/// `as_handle` must return a valid handle of the kind reported by `handle_type`.
pub unsafe trait AsHandle {
    /// Raw handle passed to the ODBC C API.
    fn as_handle(&self) -> Handle;

    /// Kind of the handle returned by `as_handle`. A method, so the trait stays object safe.
    fn handle_type(&self) -> HandleType;
}
