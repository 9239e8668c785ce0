use std::{
    cmp::min,
    ptr::{null, null_mut},
};

/// Clamps a usize between `0` and `i16::MAX`.
pub fn clamp_small_int(n: usize) -> i16 {
    min(n, i16::MAX as usize) as i16
}

/// Clamps a usize between `0` and `i32::MAX`.
pub fn clamp_int(n: usize) -> i32 {
    min(n, i32::MAX as usize) as i32
}

/// Returns a pointer suitable to be passed as an output buffer to ODBC functions. Most notably it
/// will return NULL for empty buffers.
pub fn mut_buf_ptr<T>(buffer: &mut [T]) -> *mut T {
    if buffer.is_empty() {
        null_mut()
    } else {
        buffer.as_mut_ptr()
    }
}

/// Returns a pointer suitable to be passed as an input buffer to ODBC functions. Most notably it
/// will return NULL for empty buffers.
pub fn buf_ptr<T>(buffer: &[T]) -> *const T {
    if buffer.is_empty() {
        null()
    } else {
        buffer.as_ptr()
    }
}

#[cfg(test)]
mod tests {
    use super::{buf_ptr, clamp_int, clamp_small_int};

    #[test]
    fn clamp_values_exceeding_small_int() {
        assert_eq!(clamp_small_int(42), 42);
        assert_eq!(clamp_small_int(usize::MAX), i16::MAX);
        assert_eq!(clamp_int(usize::MAX), i32::MAX);
    }

    #[test]
    fn empty_buffer_is_passed_as_null() {
        let empty: [u16; 0] = [];
        assert!(buf_ptr(&empty).is_null());
        assert!(!buf_ptr(&[1u16]).is_null());
    }
}
