use super::{Element, Matrix};

/// Determinant, adjoint and inverse by cofactor (Laplace) expansion.
///
/// Expansion is recursive and runs in factorial time, so it is only meant for
/// matrices of a few rows (layer-sized).
impl<T: Element> Matrix<T> {
    fn assert_square(&self, op: &str) {
        assert!(
            self.is_square(),
            "{}: {}x{} matrix is not square",
            op,
            self.rows,
            self.columns
        );
    }

    /// Returns matrix without column `col` and row `row`.
    ///
    /// # Panics
    /// If `col` or `row` is out of range.
    ///
    /// # Examples
    /// ```
    /// # use spnnet::matrix::Matrix;
    /// let m = Matrix::from_values(3, 3, vec![1, 2, 3, 4, 5, 6, 7, 8, 9]);
    /// assert_eq!(m.cofactor(1, 0).values(), &[4, 6, 7, 9]);
    /// ```
    pub fn cofactor(&self, col: usize, row: usize) -> Matrix<T> {
        assert!(
            col < self.columns && row < self.rows,
            "cofactor: ({}, {}) is out of {}x{} matrix",
            col,
            row,
            self.rows,
            self.columns
        );

        let values = self
            .values
            .chunks(self.columns)
            .enumerate()
            .filter(|&(y, _)| y != row)
            .flat_map(|(_, line)| {
                line.iter()
                    .enumerate()
                    .filter(|&(x, _)| x != col)
                    .map(|(_, &v)| v)
            })
            .collect();

        Matrix {
            columns: self.columns - 1,
            rows: self.rows - 1,
            values,
        }
    }

    /// Determinant, expanded along row 0 with alternating sign starting at `+`.
    ///
    /// The empty (0x0) matrix has determinant one.
    ///
    /// # Panics
    /// If matrix is not square.
    ///
    /// # Examples
    /// ```
    /// # use spnnet::matrix::Matrix;
    /// let m = Matrix::from_values(3, 3, vec![1, 2, 3, 0, 1, 4, 5, 6, 0]);
    /// assert_eq!(m.determinant(), 1);
    /// ```
    pub fn determinant(&self) -> T {
        self.assert_square("determinant");

        match self.rows {
            0 => T::one(),
            1 => self.values[0],
            _ => {
                let mut output = T::zero();
                let mut sign = T::one();
                for x in 0..self.columns {
                    output = output + sign * self.at(x, 0) * self.cofactor(x, 0).determinant();
                    sign = -sign;
                }
                output
            }
        }
    }

    /// Adjoint (adjugate) matrix.
    ///
    /// The sign of each cofactor determinant flips once per cell while walking the
    /// matrix in row-major order. For odd sizes this is the usual `(-1)^(x+y)`
    /// checkerboard; for even sizes rows after the first start with the opposite sign.
    ///
    /// # Panics
    /// If matrix is not square.
    pub fn adjoint(&self) -> Matrix<T> {
        self.assert_square("adjoint");

        let mut output = Matrix::new(self.columns, self.rows);
        let mut sign = T::one();
        for y in 0..self.rows {
            for x in 0..self.columns {
                *output.at_mut(x, y) = sign * self.cofactor(x, y).determinant();
                sign = -sign;
            }
        }
        output.transpose()
    }

    /// Adjoint divided by determinant.
    ///
    /// Singular input is not detected: floats end up with non-finite values and
    /// integers panic on division by zero. Use `checked_inverse` to get `None` instead.
    ///
    /// # Panics
    /// If matrix is not square.
    pub fn inverse(&self) -> Matrix<T> {
        let factor = self.determinant();
        self.adjoint().apply_function(|v| v / factor)
    }

    /// Same as `inverse`, but returns `None` for a zero determinant.
    ///
    /// # Examples
    /// ```
    /// # use spnnet::matrix::Matrix;
    /// let singular = Matrix::from_values(2, 2, vec![1.0, 2.0, 2.0, 4.0]);
    /// assert!(singular.checked_inverse().is_none());
    /// ```
    pub fn checked_inverse(&self) -> Option<Matrix<T>> {
        let factor = self.determinant();
        if factor == T::zero() {
            return None;
        }
        Some(self.adjoint().apply_function(|v| v / factor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::collection::vec;
    use proptest::prelude::*;

    fn known() -> Matrix<i64> {
        // | 1 2 3 |
        // | 0 1 4 |
        // | 5 6 0 |
        Matrix::from_values(3, 3, vec![1, 2, 3, 0, 1, 4, 5, 6, 0])
    }

    fn assert_close(a: &Matrix<f64>, b: &Matrix<f64>, tolerance: f64) {
        assert_eq!((a.columns(), a.rows()), (b.columns(), b.rows()));
        for (x, y) in a.values().iter().zip(b.values()) {
            assert!((x - y).abs() <= tolerance, "{}\nvs\n{}", a, b);
        }
    }

    #[test]
    fn cofactor_skips_row_and_column() {
        let c = known().cofactor(0, 1);
        assert_eq!((c.columns(), c.rows()), (2, 2));
        assert_eq!(c.values(), &[2, 3, 6, 0]);
    }

    #[test]
    #[should_panic(expected = "cofactor")]
    fn cofactor_rejects_out_of_range() {
        known().cofactor(3, 0);
    }

    #[test]
    fn determinant_of_known_matrix() {
        assert_eq!(known().determinant(), 1);

        let floats: Matrix<f64> =
            Matrix::from_values(3, 3, vec![1.0, 2.0, 3.0, 0.0, 1.0, 4.0, 5.0, 6.0, 0.0]);
        assert_eq!(floats.determinant(), 1.0);
    }

    #[test]
    fn determinant_small_cases() {
        assert_eq!(Matrix::from_values(1, 1, vec![-7]).determinant(), -7);
        assert_eq!(Matrix::from_values(2, 2, vec![4, 7, 2, 6]).determinant(), 10);
        assert_eq!(Matrix::<i32>::new(0, 0).determinant(), 1);
    }

    #[test]
    #[should_panic(expected = "not square")]
    fn determinant_rejects_non_square() {
        Matrix::<f64>::new(3, 2).determinant();
    }

    #[test]
    fn inverse_of_known_matrix() {
        assert_eq!(
            known().inverse().values(),
            &[-24, 18, 5, 20, -15, -4, -5, 4, 1]
        );
        assert_eq!(known().multiply(&known().inverse()), Matrix::identity(3));
    }

    #[test]
    fn adjoint_sign_runs_per_cell() {
        // Row-major walk gives + - + - over the cells of a 2x2 matrix,
        // so the second row does not restart the checkerboard.
        let m = Matrix::from_values(2, 2, vec![4, 7, 2, 6]);
        assert_eq!(m.adjoint().values(), &[6, 7, -2, -4]);

        let inv = Matrix::from_values(2, 2, vec![4.0f64, 7.0, 2.0, 6.0]).inverse();
        assert_eq!(inv.values(), &[0.6, 0.7, -0.2, -0.4]);
    }

    #[test]
    fn one_by_one_inverse() {
        let m = Matrix::from_values(1, 1, vec![5.0f64]);
        assert_eq!(m.adjoint().values(), &[1.0]);
        assert_eq!(m.inverse().values(), &[0.2]);
    }

    #[test]
    fn singular_inverse() {
        let m: Matrix<f64> =
            Matrix::from_values(3, 3, vec![1.0, 2.0, 3.0, 2.0, 4.0, 6.0, 0.0, 1.0, 1.0]);
        assert_eq!(m.determinant(), 0.0);
        assert!(m.inverse().values().iter().any(|v| !v.is_finite()));
        assert!(m.checked_inverse().is_none());
        assert!(known().checked_inverse().is_some());
    }

    fn matrix(columns: usize, rows: usize) -> impl Strategy<Value = Matrix<i64>> {
        vec(-9i64..10, columns * rows).prop_map(move |v| Matrix::from_values(columns, rows, v))
    }

    fn any_matrix() -> impl Strategy<Value = Matrix<i64>> {
        (1usize..6, 1usize..6).prop_flat_map(|(c, r)| matrix(c, r))
    }

    /// Diagonally dominant, hence invertible, 3x3 matrix.
    fn invertible() -> impl Strategy<Value = Matrix<f64>> {
        vec(-5.0f64..5.0, 9).prop_map(|v| {
            let mut m = Matrix::from_values(3, 3, v);
            for i in 0..3 {
                *m.at_mut(i, i) += 20.0;
            }
            m
        })
    }

    proptest! {
        #[test]
        fn prop_transpose_twice_is_identity(m in any_matrix()) {
            prop_assert_eq!(m.transpose().transpose(), m);
        }

        #[test]
        fn prop_identity_determinant_is_one(size in 1usize..7) {
            prop_assert_eq!(Matrix::<f64>::identity(size).determinant(), 1.0);
            prop_assert_eq!(Matrix::<i64>::identity(size).determinant(), 1);
        }

        #[test]
        fn prop_multiply_is_associative(
            (a, b, c) in (1usize..5, 1usize..5, 1usize..5, 1usize..5)
                .prop_flat_map(|(n, k, l, m)| (matrix(k, n), matrix(l, k), matrix(m, l)))
        ) {
            prop_assert_eq!(a.multiply(&b).multiply(&c), a.multiply(&b.multiply(&c)));
        }

        #[test]
        fn prop_inverse_gives_identity(m in invertible()) {
            assert_close(&m.multiply(&m.inverse()), &Matrix::identity(3), 1e-9);
        }

        #[test]
        fn prop_determinant_of_transpose(m in (1usize..5).prop_flat_map(|n| matrix(n, n))) {
            prop_assert_eq!(m.transpose().determinant(), m.determinant());
        }
    }
}
