use std::{cmp::min, mem::size_of};

use odbc_sys::{CDataType, Date, Len, NULL_DATA, Pointer, SqlDataType, Timestamp, ULen};

use crate::{Error, Field};

use super::{BufferKind, Indicator};

/// Arguments passed to `SQLBindParameter` when binding a [`ParameterBuffer`].
#[derive(Debug, Clone, Copy)]
pub struct BindParameterArgs {
    /// The C data type of the values in the buffer. The driver converts from this type.
    pub value_type: CDataType,
    /// SQL type the values are converted to.
    pub parameter_type: SqlDataType,
    pub column_size: ULen,
    pub decimal_digits: i16,
    /// Start address of the value buffer.
    pub value: Pointer,
    /// Stride of the value buffer in bytes.
    pub buffer_length: Len,
    /// Start address of the indicator buffer. Holds one indicator for each element.
    pub indicator: *mut Len,
}

/// Values of a parameter buffer. One variant for each [`BufferKind`].
#[derive(Debug)]
enum Values {
    /// `max_str_len + 1` bytes per element.
    Text(Vec<u8>),
    /// `max_str_len + 1` code units per element.
    WText(Vec<u16>),
    I64(Vec<i64>),
    F64(Vec<f64>),
    Bit(Vec<u8>),
    Date(Vec<Date>),
    Timestamp(Vec<Timestamp>),
}

/// A fixed capacity, fixed stride buffer holding the values of one parameter for every row of a
/// batch, together with an indicator for each row.
///
/// Both capacity per element and number of elements are fixed for the lifetime of the buffer. In
/// order to hold larger values, a new buffer must be allocated and bound. All indicators start out
/// as `NULL`, so every element is valid to be sent to the data source, even before it is written.
#[derive(Debug)]
pub struct ParameterBuffer {
    kind: BufferKind,
    values: Values,
    indicators: Vec<Len>,
}

impl ParameterBuffer {
    /// Allocates a buffer for `number_of_elements` values of `kind`.
    ///
    /// Fails with [`Error::TooLargeBufferSize`] if the total size of the buffer could not be
    /// represented.
    pub fn new(kind: BufferKind, number_of_elements: usize) -> Result<Self, Error> {
        let too_large = |element_size| Error::TooLargeBufferSize {
            num_elements: number_of_elements,
            element_size,
        };
        let element_size = kind.element_size().ok_or_else(|| too_large(usize::MAX))?;
        // Total size in bytes must fit into an isize, or we would violate the invariants of `Vec`.
        element_size
            .checked_mul(number_of_elements)
            .filter(|&total| total <= isize::MAX as usize)
            .ok_or_else(|| too_large(element_size))?;

        let values = match kind {
            BufferKind::Text { max_str_len } => {
                Values::Text(vec![0; (max_str_len + 1) * number_of_elements])
            }
            BufferKind::WText { max_str_len } => {
                Values::WText(vec![0; (max_str_len + 1) * number_of_elements])
            }
            BufferKind::I64 => Values::I64(vec![0; number_of_elements]),
            BufferKind::F64 => Values::F64(vec![0.; number_of_elements]),
            BufferKind::Bit => Values::Bit(vec![0; number_of_elements]),
            BufferKind::Date => Values::Date(vec![Date::default(); number_of_elements]),
            BufferKind::Timestamp => {
                Values::Timestamp(vec![Timestamp::default(); number_of_elements])
            }
        };

        Ok(Self {
            kind,
            values,
            indicators: vec![NULL_DATA; number_of_elements],
        })
    }

    /// Native representation of the elements.
    pub fn kind(&self) -> BufferKind {
        self.kind
    }

    /// Size of each element in bytes. For text this includes the terminating zero.
    pub fn capacity_per_element(&self) -> usize {
        // Checked at construction
        self.kind.element_size().unwrap_or(usize::MAX)
    }

    /// Maximum number of rows the buffer can hold.
    pub fn number_of_elements(&self) -> usize {
        self.indicators.len()
    }

    /// Indicators of all elements in the buffer.
    pub fn indicators(&self) -> &[Len] {
        &self.indicators
    }

    /// Indicator of the element at `row_index`.
    ///
    /// # Panics
    ///
    /// If `row_index` is not smaller than [`Self::number_of_elements`].
    pub fn indicator_at(&self, row_index: usize) -> Indicator {
        Indicator::from_isize(self.indicators[row_index])
    }

    /// Writes `field` into the element at `row_index`. `None` writes `NULL`.
    ///
    /// Fails if the field does not match the kind of the buffer, or if text is larger than the
    /// maximum string length. In case of an error the element is left unchanged.
    ///
    /// # Panics
    ///
    /// If `row_index` is not smaller than [`Self::number_of_elements`].
    pub fn set_field(&mut self, row_index: usize, field: Option<&Field>) -> Result<(), Error> {
        let Some(field) = field else {
            self.indicators[row_index] = NULL_DATA;
            return Ok(());
        };
        let kind = self.kind;
        let element_size = self.capacity_per_element();
        let indicator = match (&mut self.values, field) {
            (Values::I64(values), Field::Integer(value)) => {
                values[row_index] = *value;
                size_of::<i64>()
            }
            (Values::F64(values), Field::Floating(value)) => {
                values[row_index] = *value;
                size_of::<f64>()
            }
            (Values::Bit(values), Field::Boolean(value)) => {
                values[row_index] = u8::from(*value);
                size_of::<u8>()
            }
            (Values::Date(values), Field::Date(value)) => {
                values[row_index] = *value;
                size_of::<Date>()
            }
            (Values::Timestamp(values), Field::Timestamp(value)) => {
                values[row_index] = *value;
                size_of::<Timestamp>()
            }
            (Values::Text(values), Field::Text(text)) => {
                let bytes = text.as_bytes();
                write_terminated(values, element_size, row_index, bytes)?;
                bytes.len()
            }
            (Values::WText(values), Field::Text(text)) => {
                let units: Vec<u16> = text.encode_utf16().collect();
                let stride = element_size / size_of::<u16>();
                write_terminated(values, stride, row_index, &units)?;
                // Length indicators are in bytes, not characters.
                units.len() * size_of::<u16>()
            }
            (_, field) => {
                return Err(Error::FieldTypeMismatch {
                    field: field.type_name(),
                    kind,
                });
            }
        };
        self.indicators[row_index] = Indicator::Length(indicator).to_isize();
        Ok(())
    }

    /// Reads the element at `row_index` back. `None` if it is `NULL`. Text which is not valid
    /// UTF-8 (or UTF-16) is converted lossy.
    ///
    /// # Panics
    ///
    /// If `row_index` is not smaller than [`Self::number_of_elements`].
    pub fn field_at(&self, row_index: usize) -> Option<Field> {
        let length = self.indicator_at(row_index).length()?;
        let field = match &self.values {
            Values::I64(values) => Field::Integer(values[row_index]),
            Values::F64(values) => Field::Floating(values[row_index]),
            Values::Bit(values) => Field::Boolean(values[row_index] != 0),
            Values::Date(values) => Field::Date(values[row_index]),
            Values::Timestamp(values) => Field::Timestamp(values[row_index]),
            Values::Text(values) => {
                let stride = self.capacity_per_element();
                let offset = row_index * stride;
                let length = min(length, stride - 1);
                Field::Text(String::from_utf8_lossy(&values[offset..offset + length]).into_owned())
            }
            Values::WText(values) => {
                let stride = self.capacity_per_element() / size_of::<u16>();
                let offset = row_index * stride;
                let length = min(length / size_of::<u16>(), stride - 1);
                Field::Text(String::from_utf16_lossy(&values[offset..offset + length]))
            }
        };
        Some(field)
    }

    /// Arguments to bind this buffer as an input parameter array.
    ///
    /// The pointers stay valid as long as the buffer is not dropped. They do not change if the
    /// buffer is moved, since the memory is allocated on the heap.
    pub fn bind_args(&mut self) -> BindParameterArgs {
        let value = match &mut self.values {
            Values::Text(values) => values.as_mut_ptr() as Pointer,
            Values::WText(values) => values.as_mut_ptr() as Pointer,
            Values::I64(values) => values.as_mut_ptr() as Pointer,
            Values::F64(values) => values.as_mut_ptr() as Pointer,
            Values::Bit(values) => values.as_mut_ptr() as Pointer,
            Values::Date(values) => values.as_mut_ptr() as Pointer,
            Values::Timestamp(values) => values.as_mut_ptr() as Pointer,
        };
        BindParameterArgs {
            value_type: self.kind.cdata_type(),
            parameter_type: self.kind.data_type().data_type(),
            column_size: self.kind.column_size(),
            decimal_digits: self.kind.decimal_digits(),
            value,
            buffer_length: self.capacity_per_element().try_into().unwrap_or(Len::MAX),
            indicator: self.indicators.as_mut_ptr(),
        }
    }
}

/// Copies `text` into the element at `row_index` of a buffer with `stride` characters per
/// element, followed by a terminating zero. The last character of each element is reserved for
/// the terminating zero.
fn write_terminated<C>(
    values: &mut [C],
    stride: usize,
    row_index: usize,
    text: &[C],
) -> Result<(), Error>
where
    C: Copy + Default,
{
    let max_str_len = stride - 1;
    if text.len() > max_str_len {
        return Err(Error::TooLargeValueForBuffer {
            length: text.len(),
            max_str_len,
        });
    }
    let offset = row_index * stride;
    values[offset..offset + text.len()].copy_from_slice(text);
    values[offset + text.len()] = C::default();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::ParameterBuffer;
    use crate::{
        Error, Field,
        buffers::{BufferKind, Indicator},
    };
    use odbc_sys::{CDataType, Date, NULL_DATA, SqlDataType};

    #[test]
    fn all_elements_start_out_null() {
        let buffer = ParameterBuffer::new(BufferKind::I64, 42).unwrap();
        assert_eq!(42, buffer.number_of_elements());
        assert!(buffer.indicators().iter().all(|&ind| ind == NULL_DATA));
        assert_eq!(None, buffer.field_at(41));
    }

    #[test]
    fn text_capacity_includes_terminating_zero() {
        let buffer = ParameterBuffer::new(BufferKind::Text { max_str_len: 7 }, 3).unwrap();
        assert_eq!(8, buffer.capacity_per_element());
    }

    #[test]
    fn write_and_read_text() {
        let mut buffer = ParameterBuffer::new(BufferKind::Text { max_str_len: 5 }, 2).unwrap();

        buffer.set_field(0, Some(&Field::from("Hello"))).unwrap();
        buffer.set_field(1, Some(&Field::from("Hi"))).unwrap();

        assert_eq!(Indicator::Length(5), buffer.indicator_at(0));
        assert_eq!(Some(Field::from("Hello")), buffer.field_at(0));
        assert_eq!(Some(Field::from("Hi")), buffer.field_at(1));
    }

    #[test]
    fn wide_text_indicator_is_in_bytes() {
        let mut buffer = ParameterBuffer::new(BufferKind::WText { max_str_len: 5 }, 1).unwrap();

        buffer.set_field(0, Some(&Field::from("Löwe"))).unwrap();

        assert_eq!(12, buffer.capacity_per_element());
        assert_eq!(Indicator::Length(8), buffer.indicator_at(0));
        assert_eq!(Some(Field::from("Löwe")), buffer.field_at(0));
    }

    #[test]
    fn too_long_text_leaves_element_unchanged() {
        let mut buffer = ParameterBuffer::new(BufferKind::Text { max_str_len: 3 }, 1).unwrap();
        buffer.set_field(0, Some(&Field::from("abc"))).unwrap();

        let result = buffer.set_field(0, Some(&Field::from("abcd")));

        assert!(matches!(
            result,
            Err(Error::TooLargeValueForBuffer {
                length: 4,
                max_str_len: 3
            })
        ));
        assert_eq!(Some(Field::from("abc")), buffer.field_at(0));
    }

    #[test]
    fn mismatched_field_is_rejected() {
        let mut buffer = ParameterBuffer::new(BufferKind::I64, 1).unwrap();

        let result = buffer.set_field(0, Some(&Field::Floating(1.5)));

        assert!(matches!(
            result,
            Err(Error::FieldTypeMismatch {
                kind: BufferKind::I64,
                ..
            })
        ));
        assert!(buffer.indicator_at(0).is_null());
    }

    #[test]
    fn write_null_after_value() {
        let mut buffer = ParameterBuffer::new(BufferKind::Date, 1).unwrap();
        let date = Date {
            year: 2020,
            month: 2,
            day: 29,
        };
        buffer.set_field(0, Some(&Field::Date(date))).unwrap();
        assert_eq!(Some(Field::Date(date)), buffer.field_at(0));

        buffer.set_field(0, None).unwrap();

        assert_eq!(None, buffer.field_at(0));
    }

    #[test]
    fn bind_args_describe_buffer() {
        let mut buffer = ParameterBuffer::new(BufferKind::Text { max_str_len: 16 }, 10).unwrap();

        let args = buffer.bind_args();

        assert_eq!(CDataType::Char, args.value_type);
        assert_eq!(SqlDataType::VARCHAR, args.parameter_type);
        assert_eq!(16, args.column_size);
        assert_eq!(17, args.buffer_length);
        assert!(!args.value.is_null());
        assert!(!args.indicator.is_null());
    }

    #[test]
    fn overflowing_buffer_size_is_an_error() {
        let result = ParameterBuffer::new(BufferKind::Text { max_str_len: usize::MAX / 2 }, 4);
        assert!(matches!(result, Err(Error::TooLargeBufferSize { .. })));
    }
}
