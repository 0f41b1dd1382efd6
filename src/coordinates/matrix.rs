//! 3×3 matrices for frame rotations
//!
//! `Matrix33` keeps a single nalgebra `Matrix3<f64>` as its storage. Row and
//! column views are read out of that storage when asked for, so the two views
//! can never disagree.

use nalgebra::Matrix3;

use super::cartesian::Cartesian3;

/// A 3×3 linear map acting on [`Cartesian3`] vectors
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix33 {
    inner: Matrix3<f64>,
}

impl Matrix33 {
    /// The identity map
    pub fn identity() -> Self {
        Self {
            inner: Matrix3::identity(),
        }
    }

    /// Builds a matrix whose rows are the given vectors
    pub fn from_rows(rows: [Cartesian3; 3]) -> Self {
        let [a, b, c] = rows;
        Self {
            inner: Matrix3::new(a.x, a.y, a.z, b.x, b.y, b.z, c.x, c.y, c.z),
        }
    }

    /// Builds a matrix whose columns are the given vectors
    ///
    /// # Examples
    ///
    /// ```rust
    /// use selenofield::coordinates::{Cartesian3, Matrix33};
    ///
    /// let m = Matrix33::from_columns([
    ///     Cartesian3::new(0.0, 1.0, 0.0),
    ///     Cartesian3::new(-1.0, 0.0, 0.0),
    ///     Cartesian3::new(0.0, 0.0, 1.0),
    /// ]);
    /// let rotated = m.times(&Cartesian3::new(1.0, 0.0, 0.0));
    /// assert_eq!(rotated, Cartesian3::new(0.0, 1.0, 0.0));
    /// ```
    pub fn from_columns(cols: [Cartesian3; 3]) -> Self {
        Self {
            inner: Matrix3::from_columns(&[
                cols[0].to_vector3(),
                cols[1].to_vector3(),
                cols[2].to_vector3(),
            ]),
        }
    }

    /// Element at row `i`, column `j`
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.inner[(i, j)]
    }

    /// Sets the element at row `i`, column `j`
    pub fn set(&mut self, i: usize, j: usize, value: f64) {
        self.inner[(i, j)] = value;
    }

    /// Row `i` as a vector
    pub fn row(&self, i: usize) -> Cartesian3 {
        Cartesian3::new(self.inner[(i, 0)], self.inner[(i, 1)], self.inner[(i, 2)])
    }

    /// Column `j` as a vector
    pub fn column(&self, j: usize) -> Cartesian3 {
        Cartesian3::from_vector3(self.inner.column(j).into_owned())
    }

    /// All three rows
    pub fn rows(&self) -> [Cartesian3; 3] {
        [self.row(0), self.row(1), self.row(2)]
    }

    /// All three columns
    pub fn columns(&self) -> [Cartesian3; 3] {
        [self.column(0), self.column(1), self.column(2)]
    }

    /// The transposed matrix
    pub fn transpose(&self) -> Self {
        Self {
            inner: self.inner.transpose(),
        }
    }

    /// Matrix × vector
    pub fn times(&self, v: &Cartesian3) -> Cartesian3 {
        Cartesian3::from_vector3(self.inner * v.to_vector3())
    }

    /// Matrix × matrix, `self · other`
    pub fn times_matrix(&self, other: &Matrix33) -> Matrix33 {
        Self {
            inner: self.inner * other.inner,
        }
    }

    /// Borrow the underlying nalgebra matrix
    pub fn as_matrix3(&self) -> &Matrix3<f64> {
        &self.inner
    }
}

impl From<Matrix3<f64>> for Matrix33 {
    fn from(inner: Matrix3<f64>) -> Self {
        Self { inner }
    }
}

impl std::ops::Mul<Cartesian3> for Matrix33 {
    type Output = Cartesian3;

    fn mul(self, v: Cartesian3) -> Cartesian3 {
        self.times(&v)
    }
}

impl std::ops::Mul for Matrix33 {
    type Output = Matrix33;

    fn mul(self, other: Matrix33) -> Matrix33 {
        self.times_matrix(&other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample() -> Matrix33 {
        Matrix33::from_rows([
            Cartesian3::new(1.0, 2.0, 3.0),
            Cartesian3::new(4.0, 5.0, 6.0),
            Cartesian3::new(7.0, 8.0, 10.0),
        ])
    }

    #[test]
    fn test_rows_and_columns_agree() {
        let m = sample();
        for i in 0..3 {
            for j in 0..3 {
                assert_eq!(m.row(i).get(j), m.column(j).get(i));
                assert_eq!(m.get(i, j), m.row(i).get(j));
            }
        }
    }

    #[test]
    fn test_from_columns_is_transpose_of_from_rows() {
        let rows = sample().rows();
        assert_eq!(Matrix33::from_columns(rows), sample().transpose());
    }

    #[test]
    fn test_set_updates_both_views() {
        let mut m = sample();
        m.set(0, 2, -9.0);
        assert_eq!(m.row(0).z, -9.0);
        assert_eq!(m.column(2).x, -9.0);
    }

    #[test]
    fn test_matrix_vector_product() {
        let m = sample();
        let v = Cartesian3::new(1.0, 0.0, -1.0);
        let product = m.times(&v);
        assert_eq!(product, Cartesian3::new(-2.0, -2.0, -3.0));
        assert_eq!(m * v, product);
    }

    #[test]
    fn test_matrix_matrix_product() {
        let m = sample();
        let id = Matrix33::identity();
        assert_eq!(m.times_matrix(&id), m);
        assert_eq!(id * m, m);

        let mt_m = m.transpose() * m;
        // A^T A is symmetric
        for i in 0..3 {
            for j in 0..3 {
                assert_relative_eq!(mt_m.get(i, j), mt_m.get(j, i));
            }
        }
        assert_relative_eq!(mt_m.get(0, 0), 66.0);
    }

    #[test]
    fn test_transpose_of_rotation_is_inverse() {
        let angle: f64 = 0.3;
        let rot = Matrix33::from_rows([
            Cartesian3::new(angle.cos(), -angle.sin(), 0.0),
            Cartesian3::new(angle.sin(), angle.cos(), 0.0),
            Cartesian3::new(0.0, 0.0, 1.0),
        ]);
        let product = rot.transpose() * rot;
        for i in 0..3 {
            for j in 0..3 {
                let expected = if i == j { 1.0 } else { 0.0 };
                assert!((product.get(i, j) - expected).abs() < 1e-15);
            }
        }
    }
}
