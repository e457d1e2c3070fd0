use rand::prelude::*;
use rand_distr::StandardNormal;
use std::fmt;
use std::ops::{Index, IndexMut, Mul};

use crate::error::{Error, Result};

/// Dense, row-major 2-D matrix of `f64`.
///
/// The shape is fixed once constructed; binary element-wise operations
/// require identical shapes and return [`Error::ShapeMismatch`] otherwise.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Builds a matrix from nested rows. The outer length is the row count
    /// and the first row fixes the column count, so `[[], []]` is 2x0 and an
    /// empty input is 0x0.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Matrix> {
        let cols = rows.first().map_or(0, Vec::len);

        let mut data = Vec::with_capacity(rows.len() * cols);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != cols {
                return Err(Error::Ragged {
                    row: i,
                    expected: cols,
                    found: row.len(),
                });
            }
            data.extend_from_slice(row);
        }

        Ok(Matrix {
            rows: rows.len(),
            cols,
            data,
        })
    }

    /// Wraps a flat row-major buffer.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f64>) -> Result<Matrix> {
        if data.len() != rows * cols {
            return Err(Error::ShapeMismatch {
                op: "from_vec",
                left: (rows, cols),
                right: (1, data.len()),
            });
        }
        Ok(Matrix { rows, cols, data })
    }

    /// Uniform i.i.d. samples in [-1, 1).
    pub fn random(rows: usize, cols: usize) -> Matrix {
        Matrix::random_with_rng(rows, cols, &mut rand::thread_rng())
    }

    pub fn random_with_rng<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Matrix {
        let data = (0..rows * cols)
            .map(|_| rng.gen_range(-1.0..1.0))
            .collect();
        Matrix { rows, cols, data }
    }

    /// He initialization: samples from N(0, sqrt(2 / rows)).
    ///
    /// Weights are laid out `(fan_in, fan_out)`, so `rows` is the fan-in.
    /// Recommended before ReLU layers.
    pub fn he(rows: usize, cols: usize) -> Matrix {
        Matrix::he_with_rng(rows, cols, &mut rand::thread_rng())
    }

    pub fn he_with_rng<R: Rng + ?Sized>(rows: usize, cols: usize, rng: &mut R) -> Matrix {
        if rows == 0 {
            return Matrix::zeros(rows, cols);
        }
        let std_dev = (2.0 / rows as f64).sqrt();
        let data = (0..rows * cols)
            .map(|_| rng.sample::<f64, _>(StandardNormal) * std_dev)
            .collect();
        Matrix { rows, cols, data }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Row-major view of every element.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Borrow row `r`. Panics when `r >= rows`, like indexing.
    pub fn row(&self, r: usize) -> &[f64] {
        assert!(r < self.rows, "row {} out of range for {} rows", r, self.rows);
        &self.data[r * self.cols..(r + 1) * self.cols]
    }

    pub fn row_mut(&mut self, r: usize) -> &mut [f64] {
        assert!(r < self.rows, "row {} out of range for {} rows", r, self.rows);
        &mut self.data[r * self.cols..(r + 1) * self.cols]
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[f64]> + '_ {
        (0..self.rows).map(move |r| &self.data[r * self.cols..(r + 1) * self.cols])
    }

    pub fn get(&self, row: usize, col: usize) -> Result<f64> {
        self.offset(row, col).map(|i| self.data[i])
    }

    pub fn set(&mut self, row: usize, col: usize, value: f64) -> Result<()> {
        let i = self.offset(row, col)?;
        self.data[i] = value;
        Ok(())
    }

    fn offset(&self, row: usize, col: usize) -> Result<usize> {
        if row >= self.rows || col >= self.cols {
            return Err(Error::IndexOutOfRange {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(row * self.cols + col)
    }

    fn ensure_same_shape(&self, other: &Matrix, op: &'static str) -> Result<()> {
        if self.shape() != other.shape() {
            return Err(Error::ShapeMismatch {
                op,
                left: self.shape(),
                right: other.shape(),
            });
        }
        Ok(())
    }

    /// Standard matrix product `a · b`. O(rows · cols · inner).
    pub fn multiply(a: &Matrix, b: &Matrix) -> Result<Matrix> {
        if a.cols != b.rows {
            return Err(Error::ShapeMismatch {
                op: "multiply",
                left: a.shape(),
                right: b.shape(),
            });
        }

        let mut res = Matrix::zeros(a.rows, b.cols);
        for i in 0..a.rows {
            for k in 0..a.cols {
                let lhs = a.data[i * a.cols + k];
                let b_row = &b.data[k * b.cols..(k + 1) * b.cols];
                let out = &mut res.data[i * b.cols..(i + 1) * b.cols];
                for (o, &r) in out.iter_mut().zip(b_row) {
                    *o += lhs * r;
                }
            }
        }

        Ok(res)
    }

    pub fn add(&self, other: &Matrix) -> Result<Matrix> {
        self.ensure_same_shape(other, "add")?;
        let data = self.data.iter().zip(&other.data).map(|(a, b)| a + b).collect();
        Ok(Matrix { rows: self.rows, cols: self.cols, data })
    }

    pub fn sub(&self, other: &Matrix) -> Result<Matrix> {
        self.ensure_same_shape(other, "sub")?;
        let data = self.data.iter().zip(&other.data).map(|(a, b)| a - b).collect();
        Ok(Matrix { rows: self.rows, cols: self.cols, data })
    }

    pub fn scale(&self, scalar: f64) -> Matrix {
        let data = self.data.iter().map(|x| x * scalar).collect();
        Matrix { rows: self.rows, cols: self.cols, data }
    }

    /// In-place Hadamard product.
    pub fn element_multiply(&mut self, other: &Matrix) -> Result<()> {
        self.ensure_same_shape(other, "element_multiply")?;
        for (a, b) in self.data.iter_mut().zip(&other.data) {
            *a *= b;
        }
        Ok(())
    }

    /// In-place element-wise division.
    ///
    /// NOTE: a zero divisor writes 0 at that position instead of producing
    /// an infinity. Adam relies on this; it can also hide a genuine
    /// division-by-zero elsewhere, so keep it in mind when debugging.
    pub fn element_divide(&mut self, other: &Matrix) -> Result<()> {
        self.ensure_same_shape(other, "element_divide")?;
        for (a, &b) in self.data.iter_mut().zip(&other.data) {
            *a = if b == 0.0 { 0.0 } else { *a / b };
        }
        Ok(())
    }

    /// In-place square root. Negative entries become NaN.
    pub fn element_sqrt(&mut self) {
        for x in &mut self.data {
            *x = x.sqrt();
        }
    }

    pub fn transpose(&self) -> Matrix {
        let mut res = Matrix::zeros(self.cols, self.rows);

        for i in 0..self.rows {
            for j in 0..self.cols {
                res.data[j * self.rows + i] = self.data[i * self.cols + j];
            }
        }

        res
    }

    /// Applies `functor` to every element in place.
    pub fn map<F>(&mut self, functor: F)
    where
        F: Fn(f64) -> f64,
    {
        for x in &mut self.data {
            *x = functor(*x);
        }
    }

    /// Copies rows `[start_row, end_row)` into a new matrix.
    pub fn slice(&self, start_row: usize, end_row: usize) -> Result<Matrix> {
        if end_row > self.rows || start_row >= end_row {
            return Err(Error::InvalidSlice {
                start: start_row,
                end: end_row,
                rows: self.rows,
            });
        }
        Ok(Matrix {
            rows: end_row - start_row,
            cols: self.cols,
            data: self.data[start_row * self.cols..end_row * self.cols].to_vec(),
        })
    }

    /// Gradient-descent primitive: `self -= gradient * learning_rate`.
    pub fn update(&mut self, gradient: &Matrix, learning_rate: f64) -> Result<()> {
        self.ensure_same_shape(gradient, "update")?;
        for (w, g) in self.data.iter_mut().zip(&gradient.data) {
            *w -= g * learning_rate;
        }
        Ok(())
    }

    /// Adds the `1 x cols` row vector `row` to every row.
    pub fn add_row_broadcast(&mut self, row: &Matrix) -> Result<()> {
        if row.rows != 1 || row.cols != self.cols {
            return Err(Error::ShapeMismatch {
                op: "add_row_broadcast",
                left: self.shape(),
                right: row.shape(),
            });
        }
        if self.cols == 0 {
            return Ok(());
        }
        for chunk in self.data.chunks_mut(self.cols) {
            for (x, b) in chunk.iter_mut().zip(&row.data) {
                *x += b;
            }
        }
        Ok(())
    }

    /// Column sums as a `1 x cols` row vector.
    pub fn sum_columns(&self) -> Matrix {
        let mut res = Matrix::zeros(1, self.cols);
        for row in self.iter_rows() {
            for (acc, x) in res.data.iter_mut().zip(row) {
                *acc += x;
            }
        }
        res
    }

    pub fn sum(&self) -> f64 {
        self.data.iter().sum()
    }

    /// Index of the largest value in row `r` (first one on ties).
    /// `None` for an out-of-range row or a zero-column matrix.
    pub fn argmax_row(&self, r: usize) -> Option<usize> {
        if r >= self.rows {
            return None;
        }
        self.row(r)
            .iter()
            .enumerate()
            .fold(None, |best: Option<(usize, f64)>, (j, &v)| match best {
                Some((_, bv)) if bv >= v => best,
                _ => Some((j, v)),
            })
            .map(|(j, _)| j)
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f64;

    fn index(&self, (row, col): (usize, usize)) -> &f64 {
        match self.offset(row, col) {
            Ok(i) => &self.data[i],
            Err(e) => panic!("{}", e),
        }
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut f64 {
        match self.offset(row, col) {
            Ok(i) => &mut self.data[i],
            Err(e) => panic!("{}", e),
        }
    }
}

impl Mul<f64> for &Matrix {
    type Output = Matrix;

    fn mul(self, rhs: f64) -> Matrix {
        self.scale(rhs)
    }
}

impl Mul<f64> for Matrix {
    type Output = Matrix;

    fn mul(mut self, rhs: f64) -> Matrix {
        self.map(|x| x * rhs);
        self
    }
}

/// Tab-separated rows, one per line.
impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.iter_rows() {
            for x in row {
                write!(f, "{}\t", x)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;

    fn m(rows: Vec<Vec<f64>>) -> Matrix {
        Matrix::from_rows(rows).unwrap()
    }

    #[test]
    fn from_rows_empty_is_zero_by_zero() {
        assert_eq!(m(vec![]).shape(), (0, 0));
        assert_eq!(m(vec![vec![]; 3]).shape(), (3, 0));
    }

    #[test]
    fn from_rows_rejects_ragged_input() {
        let err = Matrix::from_rows(vec![vec![1.0, 2.0], vec![3.0]]).unwrap_err();
        assert!(matches!(err, Error::Ragged { row: 1, expected: 2, found: 1 }));

        let err = Matrix::from_rows(vec![vec![], vec![1.0]]).unwrap_err();
        assert!(matches!(err, Error::Ragged { row: 1, expected: 0, found: 1 }));
    }

    #[test]
    fn element_access_is_range_checked() {
        let mut a = m(vec![vec![1.0, 2.0], vec![3.0, 4.0]]);
        assert_eq!(a.get(1, 0).unwrap(), 3.0);
        a.set(0, 1, 9.0).unwrap();
        assert_eq!(a[(0, 1)], 9.0);
        assert!(matches!(a.get(2, 0), Err(Error::IndexOutOfRange { .. })));
        assert!(matches!(a.get(0, 2), Err(Error::IndexOutOfRange { .. })));
    }

    #[test]
    #[should_panic]
    fn index_out_of_range_panics() {
        let a = Matrix::zeros(2, 2);
        let _ = a[(2, 0)];
    }

    #[test]
    fn multiply_shapes_and_values() {
        let a = m(vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]);
        let b = m(vec![vec![7.0, 8.0], vec![9.0, 10.0], vec![11.0, 12.0]]);
        let c = Matrix::multiply(&a, &b).unwrap();
        assert_eq!(c.shape(), (2, 2));
        assert_eq!(c, m(vec![vec![58.0, 64.0], vec![139.0, 154.0]]));
    }

    #[test]
    fn multiply_propagates_non_finite_values_through_zeros() {
        let a = m(vec![vec![0.0, 1.0]]);
        let b = m(vec![vec![f64::INFINITY], vec![2.0]]);
        assert!(Matrix::multiply(&a, &b).unwrap()[(0, 0)].is_nan());

        let b = m(vec![vec![f64::NAN], vec![2.0]]);
        assert!(Matrix::multiply(&a, &b).unwrap()[(0, 0)].is_nan());
    }

    #[test]
    fn multiply_rejects_incompatible_inner_dimension() {
        let a = Matrix::zeros(2, 3);
        let b = Matrix::zeros(2, 3);
        assert!(matches!(
            Matrix::multiply(&a, &b),
            Err(Error::ShapeMismatch { op: "multiply", .. })
        ));
    }

    #[test]
    fn add_sub_require_same_shape() {
        let a = m(vec![vec![1.0, 2.0]]);
        let b = m(vec![vec![0.5, 0.5]]);
        assert_eq!(a.add(&b).unwrap(), m(vec![vec![1.5, 2.5]]));
        assert_eq!(a.sub(&b).unwrap(), m(vec![vec![0.5, 1.5]]));
        assert!(a.add(&Matrix::zeros(2, 1)).is_err());
        assert!(a.sub(&Matrix::zeros(1, 3)).is_err());
    }

    #[test]
    fn scalar_mul_operator() {
        let a = m(vec![vec![1.0, -2.0]]);
        assert_eq!(&a * 3.0, m(vec![vec![3.0, -6.0]]));
        assert_eq!(a * 0.5, m(vec![vec![0.5, -1.0]]));
    }

    #[test]
    fn element_divide_by_zero_yields_zero() {
        let mut a = m(vec![vec![4.0, 3.0, -2.0]]);
        a.element_divide(&m(vec![vec![2.0, 0.0, 4.0]])).unwrap();
        assert_eq!(a, m(vec![vec![2.0, 0.0, -0.5]]));
    }

    #[test]
    fn element_multiply_and_sqrt() {
        let mut a = m(vec![vec![2.0, 3.0]]);
        a.element_multiply(&m(vec![vec![8.0, 3.0]])).unwrap();
        a.element_sqrt();
        assert_eq!(a, m(vec![vec![4.0, 3.0]]));

        let mut neg = m(vec![vec![-1.0]]);
        neg.element_sqrt();
        assert!(neg[(0, 0)].is_nan());
    }

    #[test]
    fn transpose_twice_is_identity() {
        let mut rng = StdRng::seed_from_u64(7);
        let a = Matrix::random_with_rng(3, 5, &mut rng);
        let t = a.transpose();
        assert_eq!(t.shape(), (5, 3));
        assert_eq!(t[(4, 2)], a[(2, 4)]);
        assert_eq!(t.transpose(), a);
    }

    #[test]
    fn slice_full_range_is_identity() {
        let a = m(vec![vec![1.0], vec![2.0], vec![3.0]]);
        assert_eq!(a.slice(0, a.rows()).unwrap(), a);
        assert_eq!(a.slice(1, 3).unwrap(), m(vec![vec![2.0], vec![3.0]]));
    }

    #[test]
    fn slice_rejects_bad_ranges() {
        let a = Matrix::zeros(3, 2);
        assert!(matches!(a.slice(0, 4), Err(Error::InvalidSlice { .. })));
        assert!(matches!(a.slice(2, 2), Err(Error::InvalidSlice { .. })));
        assert!(matches!(a.slice(3, 1), Err(Error::InvalidSlice { .. })));
    }

    #[test]
    fn update_subtracts_scaled_gradient() {
        let mut w = m(vec![vec![1.0, 1.0]]);
        w.update(&m(vec![vec![2.0, -4.0]]), 0.5).unwrap();
        assert_eq!(w, m(vec![vec![0.0, 3.0]]));
        assert!(w.update(&Matrix::zeros(2, 2), 0.1).is_err());
    }

    #[test]
    fn map_is_in_place() {
        let mut a = m(vec![vec![1.0, 4.0]]);
        a.map(|x| x * x);
        assert_eq!(a, m(vec![vec![1.0, 16.0]]));
    }

    #[test]
    fn random_is_within_unit_interval() {
        let mut rng = StdRng::seed_from_u64(1);
        let a = Matrix::random_with_rng(20, 20, &mut rng);
        assert!(a.as_slice().iter().all(|&x| (-1.0..1.0).contains(&x)));
    }

    #[test]
    fn he_uses_fan_in_rows_for_scale() {
        let mut rng = StdRng::seed_from_u64(3);
        let a = Matrix::he_with_rng(200, 100, &mut rng);
        let n = a.as_slice().len() as f64;
        let mean = a.sum() / n;
        let var = a.as_slice().iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
        assert!(mean.abs() < 0.01);
        assert!((var - 0.01).abs() < 0.001, "variance {}", var);
    }

    #[test]
    fn broadcast_and_column_sums() {
        let mut a = Matrix::zeros(2, 3);
        a.add_row_broadcast(&m(vec![vec![1.0, 2.0, 3.0]])).unwrap();
        assert_eq!(a.sum_columns(), m(vec![vec![2.0, 4.0, 6.0]]));
        assert!(a.add_row_broadcast(&Matrix::zeros(1, 2)).is_err());
    }

    #[test]
    fn argmax_prefers_first_maximum() {
        let a = m(vec![vec![0.1, 0.7, 0.7], vec![-3.0, -2.0, -5.0]]);
        assert_eq!(a.argmax_row(0), Some(1));
        assert_eq!(a.argmax_row(1), Some(1));
        assert_eq!(a.argmax_row(2), None);
    }
}
