mod common;

use anyhow::Error as AnyError;
use common::{
    Call, INT_DESCRIPTION, MockStatement, Processing, init_logging, nvarchar, varchar,
};
use odbc_bound_params::{BoundParameterSet, BulkInserter, Error, Field, buffers::BufferKind};

fn text(value: &str) -> Option<Field> {
    Some(Field::from(value))
}

fn int(value: i64) -> Option<Field> {
    Some(Field::Integer(value))
}

#[test]
fn flush_once_buffers_are_full() -> Result<(), AnyError> {
    init_logging();
    let statement = MockStatement::new(vec![varchar(3), INT_DESCRIPTION]);
    let parameters = BoundParameterSet::new(statement, 2)?;
    let mut inserter = BulkInserter::new(parameters);

    inserter.append(&[text("abc"), int(1)])?;
    inserter.append(&[text("de"), int(2)])?;
    assert!(inserter.parameter_set().statement().execution_calls().is_empty());
    assert_eq!(2, inserter.num_rows());

    inserter.append(&[text("f"), int(3)])?;

    assert_eq!(2, inserter.transferred_sets());
    assert_eq!(1, inserter.num_rows());
    let parameters = inserter.parameter_set().parameters();
    assert_eq!(Some(Field::from("f")), parameters[0].buffer().field_at(0));
    assert_eq!(Some(Field::Integer(3)), parameters[1].buffer().field_at(0));
    Ok(())
}

#[test]
fn flush_executes_pending_rows() -> Result<(), AnyError> {
    init_logging();
    let statement = MockStatement::new(vec![INT_DESCRIPTION]);
    let parameters = BoundParameterSet::new(statement, 10)?;
    let mut inserter = BulkInserter::new(parameters);

    for i in 0..3 {
        inserter.append(&[int(i)])?;
    }
    inserter.flush()?;

    assert_eq!(
        vec![
            Call::SetParamsetSize(3),
            Call::SetParamsProcessedPtr,
            Call::Execute
        ],
        inserter.parameter_set().statement().execution_calls()
    );
    assert_eq!(3, inserter.transferred_sets());
    assert_eq!(0, inserter.num_rows());
    Ok(())
}

#[test]
fn flush_without_rows_does_not_execute() -> Result<(), AnyError> {
    init_logging();
    let statement = MockStatement::new(vec![INT_DESCRIPTION]);
    let parameters = BoundParameterSet::new(statement, 10)?;
    let mut inserter = BulkInserter::new(parameters);

    inserter.flush()?;

    assert!(inserter.parameter_set().statement().execution_calls().is_empty());
    Ok(())
}

#[test]
fn text_too_long_for_buffer_triggers_rebind() -> Result<(), AnyError> {
    init_logging();
    let statement = MockStatement::new(vec![varchar(3)]);
    let parameters = BoundParameterSet::new(statement, 10)?;
    let mut inserter = BulkInserter::new(parameters);

    inserter.append(&[text("abc")])?;
    inserter.append(&[text("abcdef")])?;

    let parameter_set = inserter.parameter_set();
    // Row appended before the rebind has been sent first.
    assert_eq!(
        vec![
            Call::SetParamsetSize(1),
            Call::SetParamsProcessedPtr,
            Call::Execute
        ],
        parameter_set.statement().execution_calls()
    );
    let bind_calls = parameter_set.statement().bind_calls();
    assert_eq!(2, bind_calls.len());
    assert!(matches!(
        bind_calls[1],
        Call::Bind {
            parameter_number: 1,
            kind: BufferKind::Text { max_str_len: 6 },
            number_of_elements: 10,
            ..
        }
    ));
    let buffer = parameter_set.parameters()[0].buffer();
    assert_eq!(7, buffer.capacity_per_element());
    assert_eq!(Some(Field::from("abcdef")), buffer.field_at(0));
    assert_eq!(1, inserter.num_rows());
    assert_eq!(1, inserter.transferred_sets());
    Ok(())
}

#[test]
fn shorter_text_and_null_do_not_rebind() -> Result<(), AnyError> {
    init_logging();
    let statement = MockStatement::new(vec![varchar(5)]);
    let parameters = BoundParameterSet::new(statement, 10)?;
    let mut inserter = BulkInserter::new(parameters);

    inserter.append(&[text("Hello")])?;
    inserter.append(&[text("Hi")])?;
    inserter.append(&[None])?;

    let parameter_set = inserter.parameter_set();
    assert_eq!(1, parameter_set.statement().bind_calls().len());
    assert!(parameter_set.statement().execution_calls().is_empty());
    let buffer = parameter_set.parameters()[0].buffer();
    assert_eq!(Some(Field::from("Hi")), buffer.field_at(1));
    assert_eq!(None, buffer.field_at(2));
    Ok(())
}

#[test]
fn short_text_fits_into_wide_parameter() -> Result<(), AnyError> {
    init_logging();
    let statement = MockStatement::new(vec![nvarchar(50)]);
    let parameters = BoundParameterSet::new(statement, 4)?;
    let mut inserter = BulkInserter::new(parameters);

    inserter.append(&[text("abc")])?;

    let parameter_set = inserter.parameter_set();
    assert_eq!(1, parameter_set.statement().bind_calls().len());
    assert!(parameter_set.statement().execution_calls().is_empty());
    let buffer = parameter_set.parameters()[0].buffer();
    assert_eq!(BufferKind::WText { max_str_len: 50 }, buffer.kind());
    assert_eq!(102, buffer.capacity_per_element());
    assert_eq!(Some(Field::from("abc")), buffer.field_at(0));
    Ok(())
}

#[test]
fn long_text_grows_wide_parameter_and_keeps_it_wide() -> Result<(), AnyError> {
    init_logging();
    let statement = MockStatement::new(vec![nvarchar(3)]);
    let parameters = BoundParameterSet::new(statement, 4)?;
    let mut inserter = BulkInserter::new(parameters);

    inserter.append(&[text("Löwe")])?;
    inserter.append(&[text("Tiger!")])?;

    let buffer = inserter.parameter_set().parameters()[0].buffer();
    assert_eq!(BufferKind::WText { max_str_len: 6 }, buffer.kind());
    assert_eq!(Some(Field::from("Tiger!")), buffer.field_at(0));
    assert_eq!(1, inserter.transferred_sets());
    Ok(())
}

#[test]
fn value_of_other_kind_rebinds_parameter() -> Result<(), AnyError> {
    init_logging();
    let statement = MockStatement::new(vec![varchar(5)]);
    let parameters = BoundParameterSet::new(statement, 10)?;
    let mut inserter = BulkInserter::new(parameters);

    inserter.append(&[int(42)])?;

    let parameter = &inserter.parameter_set().parameters()[0];
    assert_eq!(BufferKind::I64, parameter.buffer().kind());
    assert_eq!(Some(Field::Integer(42)), parameter.buffer().field_at(0));
    Ok(())
}

#[test]
fn row_with_wrong_number_of_fields() -> Result<(), AnyError> {
    init_logging();
    let statement = MockStatement::new(vec![varchar(5), INT_DESCRIPTION]);
    let parameters = BoundParameterSet::new(statement, 10)?;
    let mut inserter = BulkInserter::new(parameters);

    let result = inserter.append(&[text("Hello")]);

    assert!(matches!(
        result,
        Err(Error::InvalidRowLength {
            expected: 2,
            actual: 1
        })
    ));
    assert_eq!(0, inserter.num_rows());
    Ok(())
}

#[test]
fn failed_flush_keeps_rows() -> Result<(), AnyError> {
    init_logging();
    let statement = MockStatement::new(vec![INT_DESCRIPTION]);
    let parameters = BoundParameterSet::new(statement, 10)?;
    let mut inserter = BulkInserter::new(parameters);
    inserter.append(&[int(1)])?;
    inserter.append(&[int(2)])?;
    inserter
        .parameter_set()
        .statement()
        .processing
        .set(Processing::Fail);

    assert!(inserter.flush().is_err());
    assert_eq!(2, inserter.num_rows());

    inserter.clear();
    assert_eq!(0, inserter.num_rows());
    assert_eq!(0, inserter.transferred_sets());
    Ok(())
}

#[test]
fn into_parameter_set_hands_back_bindings() -> Result<(), AnyError> {
    init_logging();
    let statement = MockStatement::new(vec![INT_DESCRIPTION]);
    let parameters = BoundParameterSet::new(statement, 4)?;
    let mut inserter = BulkInserter::new(parameters);
    inserter.append(&[int(7)])?;
    inserter.flush()?;

    let parameters = inserter.into_parameter_set();

    assert_eq!(1, parameters.transferred_sets());
    assert_eq!(4, parameters.batch_capacity());
    Ok(())
}
