/*!
# Parquet export for extracted samples

This module writes an [`Extract`] to a Parquet file. Enable via the `parquet` feature.
*/

use std::error::Error;
use std::fs::File;
use std::sync::Arc;

use arrow::{
    array::{ArrayRef, Float64Builder},
    datatypes::{DataType, Field, Schema},
    record_batch::RecordBatch,
};
use parquet::{arrow::ArrowWriter, file::properties::WriterProperties};

use crate::extract::Extract;

/// Saves an extract as a Parquet file with one Float64 column per flattened
/// parameter element, named with the sampler's dot-indexed convention.
///
/// # Arguments
///
/// * `extract` - The shaped samples to write, as returned by the readers.
/// * `filename` - The path to the Parquet file to create.
///
/// # Returns
///
/// Returns `Ok(())` if the file was written successfully. Otherwise,
/// returns an error wrapped in `Box<dyn Error>`.
pub fn save_parquet<T: Into<f64> + Copy>(
    extract: &Extract<T>,
    filename: &str,
) -> Result<(), Box<dyn Error>> {
    let mut names: Vec<String> = Vec::new();
    let mut columns = Vec::new();
    for (base, param) in extract {
        names.extend(param.flat_names(base));
        columns.extend(param.flat_views());
    }

    let fields: Vec<Field> = names
        .iter()
        .map(|name| Field::new(name.as_str(), DataType::Float64, false))
        .collect();
    let schema = Arc::new(Schema::new(fields));

    let mut arrays: Vec<ArrayRef> = Vec::with_capacity(columns.len());
    for column in &columns {
        let mut builder = Float64Builder::new();
        for value in column.iter() {
            builder.append_value((*value).into());
        }
        arrays.push(Arc::new(builder.finish()) as ArrayRef);
    }

    let record_batch = RecordBatch::try_new(schema.clone(), arrays)?;

    let file = File::create(filename)?;
    let props = WriterProperties::builder().build();
    let mut writer = ArrowWriter::try_new(file, schema.clone(), Some(props))?;
    writer.write(&record_batch)?;
    writer.close()?;

    Ok(())
}
