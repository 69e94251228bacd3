//! Shaped sample containers and the extract mapping returned by the readers.

use indexmap::IndexMap;
use ndarray::{s, Array1, Array2, Array3, ArrayView1};

/// All draws of one named parameter, shaped as the model declared it.
///
/// The trailing axis is always the sample axis, so a scalar holds a plain
/// sample sequence, a length-`k` vector holds `k` such sequences, and a
/// matrix holds one per element. Scalars are rebindable whole-container
/// slots rather than cells inside a larger array, which is why this is a
/// variant and not a single dynamic-rank array type.
#[derive(Debug, Clone, PartialEq)]
pub enum Param<T> {
    /// Shape `(nsamples,)`.
    Scalar(Array1<T>),
    /// Shape `(extent, nsamples)`.
    Vector(Array2<T>),
    /// Shape `(rows, cols, nsamples)`.
    Matrix(Array3<T>),
}

/// Ordered mapping from base parameter name to its reconstructed samples.
///
/// Iteration order follows first appearance in the file header.
pub type Extract<T> = IndexMap<String, Param<T>>;

impl<T> Param<T> {
    /// Full shape including the trailing sample axis.
    pub fn shape(&self) -> &[usize] {
        match self {
            Param::Scalar(samples) => samples.shape(),
            Param::Vector(samples) => samples.shape(),
            Param::Matrix(samples) => samples.shape(),
        }
    }

    /// Number of draws stored per element.
    pub fn nsamples(&self) -> usize {
        match self.shape().last() {
            Some(&n) => n,
            None => 0,
        }
    }

    pub fn as_scalar(&self) -> Option<&Array1<T>> {
        match self {
            Param::Scalar(samples) => Some(samples),
            _ => None,
        }
    }

    pub fn as_vector(&self) -> Option<&Array2<T>> {
        match self {
            Param::Vector(samples) => Some(samples),
            _ => None,
        }
    }

    pub fn as_matrix(&self) -> Option<&Array3<T>> {
        match self {
            Param::Matrix(samples) => Some(samples),
            _ => None,
        }
    }

    /// Flattened 1-based column names for this parameter, slowest index
    /// first, matching the order the sampler writes them in.
    pub fn flat_names(&self, base: &str) -> Vec<String> {
        match self {
            Param::Scalar(_) => vec![base.to_string()],
            Param::Vector(samples) => (1..=samples.nrows())
                .map(|i| format!("{}.{}", base, i))
                .collect(),
            Param::Matrix(samples) => {
                let (rows, cols) = (samples.shape()[0], samples.shape()[1]);
                let mut names = Vec::with_capacity(rows * cols);
                for i in 1..=rows {
                    for j in 1..=cols {
                        names.push(format!("{}.{}.{}", base, i, j));
                    }
                }
                names
            }
        }
    }

    /// Per-column sample views in the same order as [`Param::flat_names`].
    pub fn flat_views(&self) -> Vec<ArrayView1<'_, T>> {
        match self {
            Param::Scalar(samples) => vec![samples.view()],
            Param::Vector(samples) => samples.outer_iter().collect(),
            Param::Matrix(samples) => {
                let (rows, cols) = (samples.shape()[0], samples.shape()[1]);
                let mut views = Vec::with_capacity(rows * cols);
                for i in 0..rows {
                    for j in 0..cols {
                        views.push(samples.slice(s![i, j, ..]));
                    }
                }
                views
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{arr1, arr2, arr3};

    #[test]
    fn test_shape_and_nsamples() {
        let scalar = Param::Scalar(arr1(&[1.0, 2.0, 3.0]));
        assert_eq!(scalar.shape(), &[3]);
        assert_eq!(scalar.nsamples(), 3);

        let matrix = Param::Matrix(Array3::<f64>::zeros((2, 2, 4)));
        assert_eq!(matrix.shape(), &[2, 2, 4]);
        assert_eq!(matrix.nsamples(), 4);
    }

    #[test]
    fn test_accessors() {
        let vector = Param::Vector(arr2(&[[1.0, 2.0], [3.0, 4.0]]));
        assert!(vector.as_vector().is_some());
        assert!(vector.as_scalar().is_none());
        assert!(vector.as_matrix().is_none());
    }

    #[test]
    fn test_flat_names_row_major() {
        let matrix = Param::Matrix(Array3::<f64>::zeros((2, 2, 1)));
        assert_eq!(
            matrix.flat_names("beta"),
            vec!["beta.1.1", "beta.1.2", "beta.2.1", "beta.2.2"]
        );
    }

    #[test]
    fn test_flat_views_align_with_names() {
        let matrix = Param::Matrix(arr3(&[
            [[11.0], [12.0]], //
            [[21.0], [22.0]],
        ]));
        let views = matrix.flat_views();
        assert_eq!(views.len(), 4);
        // beta.2.1 is third in row-major order
        assert_eq!(views[2][0], 21.0);
    }
}
