//! Generic dense matrix with the algebra needed by the feedforward network

mod linalg;

use num_traits::Num;
use std::{fmt, ops};

/// Numeric type a `Matrix` can hold.
///
/// Anything with `+ - * /`, zero, one and negation qualifies: `f32`, `f64`
/// and the signed integers.
pub trait Element: Copy + Num + ops::Neg<Output = Self> {}

impl<T> Element for T where T: Copy + Num + ops::Neg<Output = T> {}

/// Rectangular matrix.
///
/// Values are stored flat in row-major order, so the element at column `col`
/// and row `row` lives at `row * columns + col`.
/// Every operation returns a freshly allocated matrix, operands are never modified.
/// The only in-place operation is `+=` (`AddAssign`).
///
/// Shape preconditions (mismatched `add`, `multiply`, non-square `determinant`, ...)
/// are programming errors and panic.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix<T> {
    columns: usize,
    rows: usize,
    values: Box<[T]>,
}

impl<T: Element> Matrix<T> {
    /// Returns zero-filled matrix with given amount of `columns` and `rows`.
    ///
    /// # Examples
    /// ```
    /// # use spnnet::matrix::Matrix;
    /// let m: Matrix<f64> = Matrix::new(3, 2);
    /// assert_eq!(m.values(), &[0.0; 6]);
    /// ```
    pub fn new(columns: usize, rows: usize) -> Self {
        Matrix {
            columns,
            rows,
            values: vec![T::zero(); columns * rows].into_boxed_slice(),
        }
    }

    /// Builds matrix from row-major `values`.
    ///
    /// # Panics
    /// If `values.len()` is not `columns * rows`.
    ///
    /// # Examples
    /// ```
    /// # use spnnet::matrix::Matrix;
    /// // | 1 2 3 |
    /// // | 4 5 6 |
    /// let m = Matrix::from_values(3, 2, vec![1, 2, 3, 4, 5, 6]);
    /// assert_eq!(m.at(0, 1), 4);
    /// ```
    pub fn from_values(columns: usize, rows: usize, values: Vec<T>) -> Self {
        assert_eq!(
            values.len(),
            columns * rows,
            "{}x{} matrix needs {} values, but got {}",
            rows,
            columns,
            columns * rows,
            values.len()
        );

        Matrix {
            columns,
            rows,
            values: values.into_boxed_slice(),
        }
    }

    /// Builds a single row matrix (1 x N) holding `values`.
    pub fn row_vector(values: &[T]) -> Self {
        Matrix {
            columns: values.len(),
            rows: 1,
            values: values.into(),
        }
    }

    /// Square matrix with ones on its diagonal.
    pub fn identity(size: usize) -> Self {
        let mut output = Matrix::new(size, size);
        for i in 0..size {
            *output.at_mut(i, i) = T::one();
        }
        output
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Row-major values.
    pub fn values(&self) -> &[T] {
        &self.values
    }

    pub fn into_values(self) -> Vec<T> {
        self.values.into_vec()
    }

    pub fn is_square(&self) -> bool {
        self.rows == self.columns
    }

    fn index(&self, col: usize, row: usize) -> usize {
        assert!(
            col < self.columns && row < self.rows,
            "({}, {}) is out of {}x{} matrix",
            col,
            row,
            self.rows,
            self.columns
        );
        row * self.columns + col
    }

    /// Element at column `col` and row `row`.
    pub fn at(&self, col: usize, row: usize) -> T {
        self.values[self.index(col, row)]
    }

    /// Mutable reference to the element at column `col` and row `row`.
    pub fn at_mut(&mut self, col: usize, row: usize) -> &mut T {
        let i = self.index(col, row);
        &mut self.values[i]
    }

    fn assert_same_shape(&self, other: &Matrix<T>, op: &str) {
        assert!(
            self.rows == other.rows && self.columns == other.columns,
            "{}: shapes differ, {}x{} vs {}x{}",
            op,
            self.rows,
            self.columns,
            other.rows,
            other.columns
        );
    }

    /// Builds same shaped matrix combining elements of `self` and `other` pairwise.
    fn zip_with(&self, other: &Matrix<T>, f: impl Fn(T, T) -> T) -> Matrix<T> {
        Matrix {
            columns: self.columns,
            rows: self.rows,
            values: self
                .values
                .iter()
                .zip(other.values.iter())
                .map(|(&a, &b)| f(a, b))
                .collect(),
        }
    }

    /// Flips the sign of every element.
    pub fn negate(&self) -> Matrix<T> {
        self.apply_function(|v| -v)
    }

    /// Matrix product `self * other`.
    ///
    /// The result has `self.rows()` rows and `other.columns()` columns.
    ///
    /// # Panics
    /// If `self.columns() != other.rows()`.
    ///
    /// # Examples
    /// ```
    /// # use spnnet::matrix::Matrix;
    /// let a = Matrix::from_values(2, 1, vec![1, 2]);
    /// let b = Matrix::from_values(2, 2, vec![3, 4, 5, 6]);
    /// assert_eq!(a.multiply(&b).values(), &[13, 16]);
    /// ```
    pub fn multiply(&self, other: &Matrix<T>) -> Matrix<T> {
        assert_eq!(
            self.columns, other.rows,
            "multiply: {}x{} by {}x{}",
            self.rows, self.columns, other.rows, other.columns
        );

        let mut output = Matrix::new(other.columns, self.rows);
        for y in 0..output.rows {
            for x in 0..output.columns {
                let mut result = T::zero();
                for k in 0..self.columns {
                    result = result + self.at(k, y) * other.at(x, k);
                }
                *output.at_mut(x, y) = result;
            }
        }
        output
    }

    /// Elementwise (Hadamard) product.
    ///
    /// # Panics
    /// If shapes differ.
    pub fn multiply_elementwise(&self, other: &Matrix<T>) -> Matrix<T> {
        self.assert_same_shape(other, "multiply_elementwise");
        self.zip_with(other, |a, b| a * b)
    }

    /// Elementwise sum.
    ///
    /// # Panics
    /// If shapes differ.
    pub fn add(&self, other: &Matrix<T>) -> Matrix<T> {
        self.assert_same_shape(other, "add");
        self.zip_with(other, |a, b| a + b)
    }

    /// Returns matrix with `f` applied to every element.
    ///
    /// # Examples
    /// ```
    /// # use spnnet::matrix::Matrix;
    /// let m = Matrix::from_values(2, 1, vec![1.0, 4.0]);
    /// assert_eq!(m.apply_function(f64::sqrt).values(), &[1.0, 2.0]);
    /// ```
    pub fn apply_function(&self, mut f: impl FnMut(T) -> T) -> Matrix<T> {
        Matrix {
            columns: self.columns,
            rows: self.rows,
            values: self.values.iter().map(|&v| f(v)).collect(),
        }
    }

    pub fn multiply_scalar(&self, s: T) -> Matrix<T> {
        self.apply_function(|v| v * s)
    }

    pub fn add_scalar(&self, s: T) -> Matrix<T> {
        self.apply_function(|v| v + s)
    }

    /// Returns matrix with rows and columns swapped.
    pub fn transpose(&self) -> Matrix<T> {
        let mut output = Matrix::new(self.rows, self.columns);
        for y in 0..self.rows {
            for x in 0..self.columns {
                *output.at_mut(y, x) = self.at(x, y);
            }
        }
        output
    }
}

impl<T: Element> ops::AddAssign<&Matrix<T>> for Matrix<T> {
    /// In-place elementwise sum.
    ///
    /// # Panics
    /// If shapes differ.
    fn add_assign(&mut self, other: &Matrix<T>) {
        self.assert_same_shape(other, "add_assign");
        for (a, &b) in self.values.iter_mut().zip(other.values.iter()) {
            *a = *a + b;
        }
    }
}

impl<T: fmt::Display> fmt::Display for Matrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.columns == 0 {
            return Ok(());
        }
        for row in self.values.chunks(self.columns) {
            for v in row {
                write!(f, "{:>10} ", v)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Matrix<i64> {
        // | 1 2 3 |
        // | 4 5 6 |
        Matrix::from_values(3, 2, vec![1, 2, 3, 4, 5, 6])
    }

    #[test]
    fn at_is_column_then_row() {
        let mut m = sample();
        assert_eq!(m.at(2, 0), 3);
        assert_eq!(m.at(0, 1), 4);

        *m.at_mut(1, 1) = 50;
        assert_eq!(m.values(), &[1, 2, 3, 4, 50, 6]);
    }

    #[test]
    #[should_panic(expected = "needs 6 values")]
    fn from_values_checks_length() {
        Matrix::from_values(3, 2, vec![1, 2, 3]);
    }

    #[test]
    fn negate_keeps_shape() {
        let m = sample().negate();
        assert_eq!((m.columns(), m.rows()), (3, 2));
        assert_eq!(m.values(), &[-1, -2, -3, -4, -5, -6]);
    }

    #[test]
    fn multiply_gives_rows_by_other_columns() {
        // | 1 2 |
        // | 3 4 |
        // | 5 6 |
        let b = Matrix::from_values(2, 3, vec![1, 2, 3, 4, 5, 6]);
        let p = sample().multiply(&b);
        assert_eq!((p.columns(), p.rows()), (2, 2));
        assert_eq!(p.values(), &[22, 28, 49, 64]);
    }

    #[test]
    #[should_panic(expected = "multiply")]
    fn multiply_rejects_nonconformant() {
        sample().multiply(&sample());
    }

    #[test]
    fn elementwise_ops() {
        let m = sample();
        assert_eq!(m.add(&m).values(), &[2, 4, 6, 8, 10, 12]);
        assert_eq!(m.multiply_elementwise(&m).values(), &[1, 4, 9, 16, 25, 36]);
        assert_eq!(m.multiply_scalar(3).values(), &[3, 6, 9, 12, 15, 18]);
        assert_eq!(m.add_scalar(-1).values(), &[0, 1, 2, 3, 4, 5]);
    }

    #[test]
    #[should_panic(expected = "add: shapes differ")]
    fn add_rejects_other_shape() {
        sample().add(&sample().transpose());
    }

    #[test]
    fn add_assign_updates_in_place() {
        let mut m = sample();
        m += &Matrix::from_values(3, 2, vec![1; 6]);
        assert_eq!(m.values(), &[2, 3, 4, 5, 6, 7]);
    }

    #[test]
    fn transpose_swaps_axes() {
        let t = sample().transpose();
        assert_eq!((t.columns(), t.rows()), (2, 3));
        assert_eq!(t.values(), &[1, 4, 2, 5, 3, 6]);
        assert_eq!(t.transpose(), sample());
    }

    #[test]
    fn identity_and_row_vector() {
        assert_eq!(Matrix::<i32>::identity(2).values(), &[1, 0, 0, 1]);
        let r = Matrix::row_vector(&[0.5, 0.25]);
        assert_eq!((r.columns(), r.rows()), (2, 1));
    }

    #[test]
    fn display_right_aligns_rows() {
        let m = Matrix::from_values(2, 1, vec![1, -20]);
        assert_eq!(m.to_string(), "         1        -20 \n");
    }
}
