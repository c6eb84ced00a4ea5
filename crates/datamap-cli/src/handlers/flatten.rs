//! Flatten command handler

use super::input::Input;
use crate::cli::FlattenArgs;
use crate::error::{Error, Result};
use crate::output::OutputWriter;
use datamap_core::{flatten_with, CamelCaseMerge, DelimitedMerge, Error as CoreError, KeyMergeStrategy};
use serde_json::Value;

/// Handle the flatten command
pub fn handle_flatten(args: FlattenArgs, output: OutputWriter) -> Result<()> {
    if args.separator.as_deref() == Some("") {
        return Err(Error::invalid_args("--separator must not be empty"));
    }
    let input = Input::from_arg(args.input.as_deref());
    let data = input.read_document()?;

    let flattened = match &args.separator {
        Some(separator) => flatten_value(&data, &DelimitedMerge::new(separator.as_str()))?,
        None => flatten_value(&data, &CamelCaseMerge)?,
    };

    let mut output = match &args.output_file {
        Some(path) => output.to_file(path)?,
        None => output,
    };
    output.data(&flattened)?;

    if let Some(path) = &args.output_file {
        output.success(&format!("✓ Wrote flattened records to {}", path.display()));
    }
    Ok(())
}

/// Flatten an object, or each object of an array
pub fn flatten_value(data: &Value, strategy: &dyn KeyMergeStrategy) -> Result<Value> {
    match data {
        Value::Object(record) => Ok(Value::Object(flatten_with(record, None, strategy))),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Object(record) => Ok(Value::Object(flatten_with(record, None, strategy))),
                other => Err(CoreError::invalid_argument(other, "an object").into()),
            })
            .collect::<Result<Vec<_>>>()
            .map(Value::Array),
        other => Err(CoreError::invalid_argument(other, "an object or an array").into()),
    }
}
