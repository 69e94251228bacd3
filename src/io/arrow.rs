/*!
# Arrow export for extracted samples

This module writes an [`Extract`] to an Apache Arrow (IPC) file. Enable via the `arrow` feature.
*/

use std::error::Error;
use std::fs::File;
use std::sync::Arc;

use arrow::{
    array::{ArrayRef, Float64Builder},
    datatypes::{DataType, Field, Schema},
    ipc::writer::FileWriter,
    record_batch::RecordBatch,
};

use crate::extract::Extract;

/// Saves an extract as an Arrow IPC file with one Float64 column per
/// flattened parameter element, named with the sampler's dot-indexed
/// convention.
///
/// # Arguments
///
/// * `extract` - The shaped samples to write, as returned by the readers.
/// * `filename` - The path to the Arrow (IPC) file to create.
///
/// # Type Parameters
///
/// * `T` - Must implement `Into<f64> + Copy`. Each value is stored as f64.
pub fn save_arrow<T: Into<f64> + Copy>(
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
    let mut writer = FileWriter::try_new(file, &schema)?;
    writer.write(&record_batch)?;
    writer.finish()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::Param;
    use arrow::{array::Float64Array, ipc::reader::FileReader};
    use ndarray::{arr1, arr2};
    use tempfile::NamedTempFile;

    #[test]
    fn test_save_arrow_round_trip() -> Result<(), Box<dyn Error>> {
        let mut extract = Extract::new();
        extract.insert("mu".to_string(), Param::Scalar(arr1(&[0.5, 0.6])));
        extract.insert(
            "sigma".to_string(),
            Param::Vector(arr2(&[[1.0, 1.1], [2.0, 2.1]])),
        );
        let file = NamedTempFile::new()?;
        let filename = file.path().to_str().unwrap();

        save_arrow(&extract, filename)?;

        let file = File::open(filename)?;
        let mut reader = FileReader::try_new(file, None)?;
        let batch = reader.next().expect("No record batch found")?.clone();
        assert!(reader.next().is_none(), "Expected only one batch");

        assert_eq!(batch.num_rows(), 2);
        assert_eq!(batch.num_columns(), 3);
        assert_eq!(batch.schema().field(1).name(), "sigma.1");

        let sigma2 = batch
            .column(2)
            .as_any()
            .downcast_ref::<Float64Array>()
            .unwrap();
        assert!((sigma2.value(1) - 2.1).abs() < f64::EPSILON);

        Ok(())
    }
}
