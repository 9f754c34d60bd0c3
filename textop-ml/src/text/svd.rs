//! Truncated SVD of a dense document matrix.

use nalgebra::DMatrix;
use ndarray::{Array1, Array2, ArrayView1, ArrayViewMut1};

/// Singular values at or below this fraction of the largest are treated as zero.
const RANK_TOLERANCE: f64 = 1e-10;

/// Right singular vectors of a dense row matrix, without centering.
#[derive(Debug, Clone)]
pub struct TruncatedSvd {
    /// `n_components x n_features`, one component per row.
    components: Array2<f64>,
    singular_values: Array1<f64>,
}

impl TruncatedSvd {
    /// Fit `n_components` components to the rows of `data`.
    ///
    /// Components are ordered by decreasing singular value. Those beyond the
    /// numerical rank of the data are all-zero.
    pub fn fit(data: &Array2<f64>, n_components: usize) -> Self {
        let (n_samples, n_features) = data.dim();
        let mut components = Array2::zeros((n_components, n_features));
        let mut singular_values = Array1::zeros(n_components);

        if n_samples == 0 || n_features == 0 {
            return Self {
                components,
                singular_values,
            };
        }

        let matrix = DMatrix::from_fn(n_samples, n_features, |i, j| data[[i, j]]);
        let svd = matrix.svd(false, true);
        let Some(v_t) = svd.v_t else {
            return Self {
                components,
                singular_values,
            };
        };

        let sigma = &svd.singular_values;
        let mut order: Vec<usize> = (0..sigma.len()).collect();
        order.sort_by(|&a, &b| sigma[b].total_cmp(&sigma[a]));
        let floor = sigma.iter().copied().fold(0.0f64, f64::max) * RANK_TOLERANCE;

        for (k, &idx) in order.iter().take(n_components).enumerate() {
            if sigma[idx].is_nan() || sigma[idx] <= floor {
                continue;
            }
            let mut row = components.row_mut(k);
            for (j, value) in row.iter_mut().enumerate() {
                *value = v_t[(idx, j)];
            }
            flip_sign(row);
            singular_values[k] = sigma[idx];
        }

        Self {
            components,
            singular_values,
        }
    }

    pub fn n_components(&self) -> usize {
        self.components.nrows()
    }

    pub fn singular_values(&self) -> &Array1<f64> {
        &self.singular_values
    }

    /// Project one row onto the components.
    pub fn project(&self, row: ArrayView1<f64>) -> Array1<f64> {
        self.components.dot(&row)
    }
}

/// Make the largest-magnitude entry positive.
fn flip_sign(mut v: ArrayViewMut1<f64>) {
    let pivot = v
        .iter()
        .copied()
        .fold(0.0f64, |acc, x| if x.abs() > acc.abs() { x } else { acc });
    if pivot < 0.0 {
        v.mapv_inplace(|x| -x);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_rank_one_matrix() {
        let data = array![[1.0, 2.0], [2.0, 4.0], [3.0, 6.0]];
        let svd = TruncatedSvd::fit(&data, 2);
        let inv = 1.0 / 5.0f64.sqrt();
        assert!((svd.components[[0, 0]] - inv).abs() < 1e-9);
        assert!((svd.components[[0, 1]] - 2.0 * inv).abs() < 1e-9);
        // sqrt(1 + 4 + 9) * sqrt(1 + 4)
        assert!((svd.singular_values()[0] - 70.0f64.sqrt()).abs() < 1e-9);
        assert!(svd.components.row(1).iter().all(|v| *v == 0.0));
        assert_eq!(svd.singular_values()[1], 0.0);
    }

    #[test]
    fn test_components_sorted_and_sign_flipped() {
        let data = array![[0.0, 0.0, -1.0], [0.0, -2.0, 0.0], [-3.0, 0.0, 0.0]];
        let svd = TruncatedSvd::fit(&data, 3);
        let sv = svd.singular_values();
        assert!((sv[0] - 3.0).abs() < 1e-9);
        assert!((sv[1] - 2.0).abs() < 1e-9);
        assert!((sv[2] - 1.0).abs() < 1e-9);
        assert!((svd.components[[0, 0]] - 1.0).abs() < 1e-9);
        assert!((svd.components[[1, 1]] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_fewer_samples_than_components() {
        let data = array![[1.0, 0.0, 0.0, 0.0]];
        let svd = TruncatedSvd::fit(&data, 3);
        assert_eq!(svd.n_components(), 3);
        let projected = svd.project(array![2.0, 5.0, 0.0, 0.0].view());
        assert_eq!(projected.len(), 3);
        assert!((projected[0] - 2.0).abs() < 1e-9);
        assert_eq!(projected[1], 0.0);
    }

    #[test]
    fn test_all_zero_input() {
        let data = Array2::<f64>::zeros((4, 3));
        let svd = TruncatedSvd::fit(&data, 2);
        assert_eq!(svd.n_components(), 2);
        assert!(svd.project(array![1.0, 1.0, 1.0].view()).iter().all(|v| *v == 0.0));
    }
}
