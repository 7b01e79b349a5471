//! Numeric backend interop.
//! Optional exports of the reward matrix and utility tables to ndarray/nalgebra,
//! gated behind feature flags. Illegal transitions become `-inf`.

// ndarray interop
#[cfg(feature = "ndarray")]
pub mod ndarray_impl {
    use ndarray::{Array1, Array2};

    use crate::envs::RewardMatrix;

    impl RewardMatrix {
        /// Dense `n x n` array of rewards with `-inf` for illegal transitions.
        pub fn to_ndarray(&self) -> Array2<f64> {
            let n = self.len();
            Array2::from_shape_fn((n, n), |(i, j)| self.reward_or_neg_inf(i, j))
        }
    }

    /// Utility table as an `ndarray::Array1`.
    pub fn utility_to_ndarray(utility: &[f64]) -> Array1<f64> {
        Array1::from_vec(utility.to_vec())
    }
}

// nalgebra interop
#[cfg(feature = "nalgebra")]
pub mod nalgebra_impl {
    use nalgebra::{DMatrix, DVector};

    use crate::envs::RewardMatrix;

    impl RewardMatrix {
        /// Dense `n x n` matrix of rewards with `-inf` for illegal transitions.
        pub fn to_nalgebra(&self) -> DMatrix<f64> {
            let n = self.len();
            DMatrix::from_fn(n, n, |i, j| self.reward_or_neg_inf(i, j))
        }
    }

    /// Utility table as an `nalgebra::DVector`.
    pub fn utility_to_nalgebra(utility: &[f64]) -> DVector<f64> {
        DVector::from_column_slice(utility)
    }
}


#[cfg(all(test, feature = "nalgebra"))]
mod nalgebra_tests {
    use crate::envs::{RewardMatrix, STEP_REWARD};

    #[test]
    fn exports_step_edges() {
        let m = RewardMatrix::for_grid(2, 3, &[]).to_nalgebra();
        assert_eq!(m.nrows(), 4);
        assert_eq!(m[(0, 1)], STEP_REWARD);
        assert_eq!(m[(1, 2)], f64::NEG_INFINITY);
    }
}
