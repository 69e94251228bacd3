/*!
# CSV export for extracted samples

This module writes an [`Extract`] back to a flattened CSV file. Enable via the `csv` feature.
*/

use std::error::Error;
use std::fs::File;

use csv::Writer;

use crate::extract::Extract;

/**
Saves an extract as a CSV file with one flattened column per parameter element.

The header row repeats the dot-indexed naming convention of the sampler
(`mu`, `sigma.1`, `beta.2.1`, ...), in extract order, and each subsequent row
holds one draw across all columns.

# Arguments

* `extract` - The shaped samples to write, as returned by the readers.
* `filename` - The file path where the CSV data will be written.

# Returns

Returns `Ok(())` if successful, or an error if any I/O or CSV formatting
issue occurs.

# Examples

```rust
use ndarray::arr1;
use stan_extract::extract::{Extract, Param};
use stan_extract::io::csv::save_csv;

let mut extract = Extract::new();
extract.insert("mu".to_string(), Param::Scalar(arr1(&[0.1, 0.2])));
save_csv(&extract, "/tmp/extract.csv").expect("Expecting saving data to succeed");
```
*/
pub fn save_csv<T: std::fmt::Display + Copy>(
    extract: &Extract<T>,
    filename: &str,
) -> Result<(), Box<dyn Error>> {
    let mut wtr = Writer::from_writer(File::create(filename)?);

    let mut names: Vec<String> = Vec::new();
    let mut columns = Vec::new();
    for (base, param) in extract {
        names.extend(param.flat_names(base));
        columns.extend(param.flat_views());
    }
    wtr.write_record(&names)?;

    let nsamples = columns.first().map_or(0, |column| column.len());
    for sample in 0..nsamples {
        let row: Vec<String> = columns
            .iter()
            .map(|column| column[sample].to_string())
            .collect();
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}
