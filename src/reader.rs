//! Readers for sampler output files: one CSV file per chain, with a comment
//! preamble, a flattened header line, and one data row per draw.

use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;
use std::str::FromStr;

use log::{debug, trace};
use ndarray::{s, Array2};
use num_traits::Float;

use crate::error::ReadError;
use crate::extract::{Extract, Param};
use crate::header;
use crate::metadata::{self, Attributes, MetadataParser};

/// Comment line marking the end of the warm-up phase in a chain file.
const ADAPTATION_SENTINEL: &str = "# Adaptation terminated";

/// Iteration-count attribute of variational output.
const OUTPUT_SAMPLES: &str = "output_samples";
/// Per-chain sampling counts of MCMC output.
const NUM_SAMPLES: &str = "num_samples";
const NUM_WARMUP: &str = "num_warmup";

/// Reads one variational output file.
///
/// The preamble yields the attributes, the first non-comment line the
/// header, and `output_samples` the number of draws. The first data row is
/// the posterior-mean summary; with `include_summary` it becomes draw 0,
/// otherwise it is consumed from the stream and discarded.
///
/// # Examples
///
/// ```no_run
/// use stan_extract::reader::read_single_chain;
///
/// let (extract, attributes) = read_single_chain::<f64, _>("output.csv", false)?;
/// println!("algorithm: {:?}", attributes.get("algorithm"));
/// for (name, param) in &extract {
///     println!("{name}: {:?}", param.shape());
/// }
/// # Ok::<(), stan_extract::error::ReadError>(())
/// ```
pub fn read_single_chain<T, P>(
    path: P,
    include_summary: bool,
) -> Result<(Extract<T>, Attributes), ReadError>
where
    T: Float + FromStr,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let parser = MetadataParser::default();
    let (attributes, header, lines) = read_preamble(path, &parser)?;

    let niter = metadata::require_int(&attributes, OUTPUT_SAMPLES)?;
    let nrows = if include_summary { niter + 1 } else { niter };
    debug!(
        "{}: {} columns, {} draws",
        path.display(),
        header.len(),
        nrows
    );

    let mut draws = Array2::<T>::zeros((nrows, header.len()));
    let mut cursor = 0usize;
    let mut summary_pending = !include_summary;
    for line in lines {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        if summary_pending {
            // The summary row still occupies one line of input even when
            // excluded from the draws.
            summary_pending = false;
            continue;
        }
        if cursor == nrows {
            return Err(ReadError::DrawCountMismatch {
                expected: nrows,
                got: cursor + 1,
            });
        }
        let fields: Vec<&str> = line.trim().split(',').collect();
        store_row(&mut draws, cursor, &fields)?;
        cursor += 1;
    }
    if cursor != nrows {
        return Err(ReadError::DrawCountMismatch {
            expected: nrows,
            got: cursor,
        });
    }

    let extract = scatter(&draws, &header)?;
    Ok((extract, attributes))
}

/// Reads one MCMC output file per chain and concatenates the draws along the
/// sample axis, chain 0 first.
///
/// Attributes and header come from the first file only; the remaining files
/// are assumed to share them. Each chain contributes `num_samples` draws,
/// plus `num_warmup` when `include_warmup` is set and the file carries its
/// warm-up phase. Warm-up rows are recognized by position: everything before
/// the adaptation sentinel comment belongs to warm-up.
pub fn read_multi_chain<T, P>(
    paths: &[P],
    include_warmup: bool,
) -> Result<(Extract<T>, Attributes), ReadError>
where
    T: Float + FromStr,
    P: AsRef<Path>,
{
    if paths.is_empty() {
        return Err(ReadError::InvalidInput("no chain files given".to_string()));
    }
    let parser = MetadataParser::default();
    let (attributes, header, _) = read_preamble(paths[0].as_ref(), &parser)?;

    let nsamples = metadata::require_int(&attributes, NUM_SAMPLES)?;
    let nwarmup = metadata::require_int(&attributes, NUM_WARMUP)?;
    let per_chain = if include_warmup {
        nsamples + nwarmup
    } else {
        nsamples
    };
    let total = per_chain * paths.len();
    debug!(
        "{} chains, {} columns, {} draws per chain",
        paths.len(),
        header.len(),
        per_chain
    );

    let mut draws = Array2::<T>::zeros((total, header.len()));
    let mut cursor = 0usize;
    for path in paths {
        let path = path.as_ref();
        trace!("reading chain file {}", path.display());
        let file = BufReader::new(File::open(path)?);
        let mut in_warmup = !include_warmup;
        let mut header_pending = true;
        for line in file.lines() {
            let line = line?;
            if parser.is_comment(&line) {
                if in_warmup && line.starts_with(ADAPTATION_SENTINEL) {
                    in_warmup = false;
                }
                continue;
            }
            if header_pending {
                // Every chain file repeats the header line.
                header_pending = false;
                continue;
            }
            let fields: Vec<&str> = line.trim().split(',').collect();
            if fields.len() <= 1 {
                // Trailing blank line or stray fragment.
                continue;
            }
            if in_warmup {
                // Warm-up rows are consumed from the stream but not kept.
                continue;
            }
            if cursor == total {
                return Err(ReadError::DrawCountMismatch {
                    expected: total,
                    got: cursor + 1,
                });
            }
            store_row(&mut draws, cursor, &fields)?;
            cursor += 1;
        }
    }
    if cursor != total {
        return Err(ReadError::DrawCountMismatch {
            expected: total,
            got: cursor,
        });
    }

    let extract = scatter(&draws, &header)?;
    Ok((extract, attributes))
}

/// Consumes a file's comment preamble and header line. Returns the parsed
/// attributes, the header fields, and the line iterator positioned at the
/// first data row.
fn read_preamble(
    path: &Path,
    parser: &MetadataParser,
) -> Result<(Attributes, Vec<String>, Lines<BufReader<File>>), ReadError> {
    if path.as_os_str().is_empty() {
        return Err(ReadError::InvalidInput("empty path".to_string()));
    }
    let mut lines = BufReader::new(File::open(path)?).lines();

    let mut attributes = Attributes::new();
    let mut header: Vec<String> = Vec::new();
    for line in &mut lines {
        let line = line?;
        if parser.is_comment(&line) {
            if let Some((key, value)) = parser.parse_line(&line)? {
                attributes.insert(key, value);
            }
            continue;
        }
        header = line.trim().split(',').map(str::to_string).collect();
        break;
    }
    if header.is_empty() {
        return Err(ReadError::InvalidInput(format!(
            "{}: no header line found",
            path.display()
        )));
    }
    Ok((attributes, header, lines))
}

/// Parses one comma-split data row into row `row` of the draws buffer.
fn store_row<T>(draws: &mut Array2<T>, row: usize, fields: &[&str]) -> Result<(), ReadError>
where
    T: Float + FromStr,
{
    let expected = draws.ncols();
    if fields.len() != expected {
        return Err(ReadError::RowWidth {
            row,
            expected,
            got: fields.len(),
        });
    }
    for (slot, field) in draws.row_mut(row).iter_mut().zip(fields) {
        *slot = field.parse::<T>().map_err(|_| ReadError::InvalidNumber {
            row,
            value: (*field).to_string(),
        })?;
    }
    Ok(())
}

/// Scatters the flat draws buffer into shaped per-parameter containers.
///
/// Allocation happens through [`header::group`], so the extract the caller
/// sees is fully populated or not returned at all.
fn scatter<T: Float>(draws: &Array2<T>, header: &[String]) -> Result<Extract<T>, ReadError> {
    let (mut extract, layout) = header::group(header, draws.nrows())?;
    for (position, name) in header.iter().enumerate() {
        let slot = layout.get(name).ok_or_else(|| ReadError::UnknownBase {
            column: name.clone(),
        })?;
        let column = draws.column(position);
        let param = extract
            .get_mut(&slot.base)
            .ok_or_else(|| ReadError::UnknownBase {
                column: name.clone(),
            })?;
        match (param, slot.index.as_slice()) {
            (Param::Scalar(samples), []) => samples.assign(&column),
            (Param::Vector(samples), &[i]) => samples.row_mut(i).assign(&column),
            (Param::Matrix(samples), &[i, j]) => samples.slice_mut(s![i, j, ..]).assign(&column),
            _ => {
                return Err(ReadError::UnknownBase {
                    column: name.clone(),
                })
            }
        }
    }
    Ok(extract)
}
