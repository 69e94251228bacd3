//! Grouping of flattened, dot-indexed column names back into shaped parameters.
//!
//! A sampler writes the elements of a multi-dimensional parameter as one CSV
//! column each, named `base`, `base.i`, or `base.i.j` with 1-based indices.
//! This module recovers the base parameters, infers their extents, and maps
//! every flattened column to the element slot it fills.

use std::collections::HashMap;

use indexmap::IndexSet;
use ndarray::{Array1, Array2, Array3};
use num_traits::Float;

use crate::error::ReadError;
use crate::extract::{Extract, Param};

/// Where one flattened column lands: its base parameter and the zero-based
/// element indices inside that parameter's container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSlot {
    pub base: String,
    pub index: Vec<usize>,
}

/// Mapping from flattened column name to its [`ColumnSlot`].
pub type ColumnLayout = HashMap<String, ColumnSlot>;

/// Splits `column` against `base`, anchored on a literal dot or end of
/// string immediately after the base name. Returns the 1-based indices, or
/// `None` if the column does not belong to `base`. The anchor is what keeps
/// `sigma` from claiming `sigma_sq.1`.
fn index_suffix(column: &str, base: &str) -> Option<Vec<usize>> {
    let rest = column.strip_prefix(base)?;
    if rest.is_empty() {
        return Some(Vec::new());
    }
    let rest = rest.strip_prefix('.')?;
    rest.split('.')
        .map(|segment| match segment.parse::<usize>() {
            Ok(index) if index >= 1 => Some(index),
            _ => None,
        })
        .collect()
}

/// Groups a file header into zero-filled parameter containers and the layout
/// used to scatter flat columns into them.
///
/// Base names keep their first-seen header order, which fixes the iteration
/// order of the returned [`Extract`]. Extents are the per-dimension maximum
/// over all matching columns, so a header whose columns arrive out of order
/// still yields the full container.
pub fn group<T: Float>(
    header: &[String],
    nsamples: usize,
) -> Result<(Extract<T>, ColumnLayout), ReadError> {
    let bases: IndexSet<&str> = header
        .iter()
        .map(|name| name.split('.').next().unwrap_or(name.as_str()))
        .collect();

    let mut extract = Extract::new();
    let mut layout = ColumnLayout::new();
    let mut claimed = vec![false; header.len()];

    for base in bases {
        let mut rank: Option<usize> = None;
        let mut extents: Vec<usize> = Vec::new();
        let mut members: Vec<(usize, Vec<usize>)> = Vec::new();

        for (position, name) in header.iter().enumerate() {
            let Some(index) = index_suffix(name, base) else {
                continue;
            };
            if index.len() > 2 {
                return Err(ReadError::Dimension {
                    name: base.to_string(),
                    rank: index.len(),
                });
            }
            match rank {
                None => {
                    rank = Some(index.len());
                    extents = index.clone();
                }
                Some(r) if r == index.len() => {
                    for (extent, i) in extents.iter_mut().zip(&index) {
                        *extent = (*extent).max(*i);
                    }
                }
                Some(_) => {
                    return Err(ReadError::Dimension {
                        name: base.to_string(),
                        rank: index.len(),
                    });
                }
            }
            members.push((position, index));
            claimed[position] = true;
        }

        let param = match (rank, extents.as_slice()) {
            (Some(0), _) => Param::Scalar(Array1::zeros(nsamples)),
            (Some(1), &[extent]) => Param::Vector(Array2::zeros((extent, nsamples))),
            (Some(2), &[rows, cols]) => Param::Matrix(Array3::zeros((rows, cols, nsamples))),
            // No column matched this base; the claimed check below reports
            // the offending column.
            _ => continue,
        };

        for (position, index) in members {
            layout.insert(
                header[position].clone(),
                ColumnSlot {
                    base: base.to_string(),
                    index: index.iter().map(|i| i - 1).collect(),
                },
            );
        }
        extract.insert(base.to_string(), param);
    }

    if let Some(position) = claimed.iter().position(|&c| !c) {
        return Err(ReadError::UnknownBase {
            column: header[position].clone(),
        });
    }

    Ok((extract, layout))
}
