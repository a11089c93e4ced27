use crate::core::error::{MathError, MathResult};
use crate::core::matrix_inverse;
use nalgebra::DMatrix;
use rayon::prelude::*;
use std::fmt;
use std::ops::{Add, Index, IndexMut, Mul, Sub};

/// 元素相等比较使用的固定容差
pub const TOLERANCE: f64 = 1e-9;

/// 行主序的稠密矩阵，尺寸在构造时固定
#[derive(Debug, Clone)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// 创建全零矩阵
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// 从二维字面量数组构造
    pub fn from_rows<const R: usize, const C: usize>(rows: [[f64; C]; R]) -> Self {
        Self {
            rows: R,
            cols: C,
            data: rows.iter().flat_map(|row| row.iter().copied()).collect(),
        }
    }

    /// 从行主序缓冲区构造，长度必须等于 rows * cols
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f64>) -> MathResult<Self> {
        if data.len() != rows * cols {
            return Err(MathError::InvalidShape {
                expected: format!("{} elements for {}x{}", rows * cols, rows, cols),
                actual: format!("{} elements", data.len()),
            });
        }
        Ok(Self { rows, cols, data })
    }

    pub fn identity(n: usize) -> Self {
        let mut m = Self::new(n, n);
        for i in 0..n {
            m[(i, i)] = 1.0;
        }
        m
    }

    /// 深拷贝
    pub fn duplicate(&self) -> Self {
        self.clone()
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// 按行主序返回底层数据
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    pub fn try_get(&self, row: usize, col: usize) -> Option<f64> {
        (row < self.rows && col < self.cols).then(|| self.data[row * self.cols + col])
    }

    /// 交换两行（分解时的行置换）
    pub fn swap_row(&mut self, i: usize, j: usize) {
        if i == j {
            return;
        }
        for c in 0..self.cols {
            self.data.swap(i * self.cols + c, j * self.cols + c);
        }
    }

    pub fn transpose(&self) -> Self {
        let mut t = Self::new(self.cols, self.rows);
        for r in 0..self.rows {
            for c in 0..self.cols {
                t[(c, r)] = self[(r, c)];
            }
        }
        t
    }

    fn check_same_shape(&self, other: &Matrix, operation: &'static str) -> MathResult<()> {
        if self.rows != other.rows || self.cols != other.cols {
            return Err(MathError::DimensionMismatch {
                operation,
                left_rows: self.rows,
                left_cols: self.cols,
                right_rows: other.rows,
                right_cols: other.cols,
            });
        }
        Ok(())
    }

    fn check_inner(&self, other: &Matrix) -> MathResult<()> {
        if self.cols != other.rows {
            return Err(MathError::ColumnRowMismatch {
                left_cols: self.cols,
                right_rows: other.rows,
            });
        }
        Ok(())
    }

    /// 逐元素相加
    pub fn try_add(&self, other: &Matrix) -> MathResult<Matrix> {
        self.check_same_shape(other, "addition")?;
        let data = self
            .data
            .iter()
            .zip(&other.data)
            .map(|(a, b)| a + b)
            .collect();
        Ok(Self {
            rows: self.rows,
            cols: self.cols,
            data,
        })
    }

    /// 逐元素相减
    pub fn try_sub(&self, other: &Matrix) -> MathResult<Matrix> {
        self.check_same_shape(other, "subtraction")?;
        let data = self
            .data
            .iter()
            .zip(&other.data)
            .map(|(a, b)| a - b)
            .collect();
        Ok(Self {
            rows: self.rows,
            cols: self.cols,
            data,
        })
    }

    /// 朴素三重循环矩阵乘法
    pub fn try_mul(&self, other: &Matrix) -> MathResult<Matrix> {
        self.check_inner(other)?;
        let mut out = Self::new(self.rows, other.cols);
        for i in 0..self.rows {
            for j in 0..other.cols {
                let mut sum = 0.0;
                for k in 0..self.cols {
                    sum += self[(i, k)] * other[(k, j)];
                }
                out[(i, j)] = sum;
            }
        }
        Ok(out)
    }

    /// 按行并行的矩阵乘法，累加顺序与 `try_mul` 相同，结果逐位一致
    pub fn multiply_parallel(&self, other: &Matrix) -> MathResult<Matrix> {
        self.check_inner(other)?;
        let mut out = Self::new(self.rows, other.cols);
        if other.cols == 0 {
            return Ok(out);
        }
        out.data
            .par_chunks_mut(other.cols)
            .enumerate()
            .for_each(|(i, out_row)| {
                let lhs = self.row(i);
                for (j, cell) in out_row.iter_mut().enumerate() {
                    let mut sum = 0.0;
                    for (k, a) in lhs.iter().enumerate() {
                        sum += a * other.data[k * other.cols + j];
                    }
                    *cell = sum;
                }
            });
        Ok(out)
    }

    /// 在给定容差内逐元素比较
    pub fn approx_eq(&self, other: &Matrix, tolerance: f64) -> bool {
        self.rows == other.rows
            && self.cols == other.cols
            && self
                .data
                .iter()
                .zip(&other.data)
                .all(|(a, b)| (a - b).abs() <= tolerance)
    }

    pub fn inverse(&self) -> MathResult<Matrix> {
        matrix_inverse::inverse(self)
    }

    pub fn determinant(&self) -> MathResult<f64> {
        matrix_inverse::determinant(self)
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f64;

    fn index(&self, (row, col): (usize, usize)) -> &f64 {
        &self.data[row * self.cols + col]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut f64 {
        &mut self.data[row * self.cols + col]
    }
}

impl Add for &Matrix {
    type Output = MathResult<Matrix>;

    fn add(self, rhs: Self) -> Self::Output {
        self.try_add(rhs)
    }
}

impl Sub for &Matrix {
    type Output = MathResult<Matrix>;

    fn sub(self, rhs: Self) -> Self::Output {
        self.try_sub(rhs)
    }
}

impl Mul for &Matrix {
    type Output = MathResult<Matrix>;

    fn mul(self, rhs: Self) -> Self::Output {
        self.try_mul(rhs)
    }
}

impl PartialEq for Matrix {
    fn eq(&self, other: &Self) -> bool {
        self.approx_eq(other, TOLERANCE)
    }
}

impl fmt::Display for Matrix {
    /// 每行输出为 `a , b , c` 并以换行结尾
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..self.rows {
            let line = self
                .row(r)
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(" , ");
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

impl From<&DMatrix<f64>> for Matrix {
    fn from(m: &DMatrix<f64>) -> Self {
        let mut out = Matrix::new(m.nrows(), m.ncols());
        for r in 0..m.nrows() {
            for c in 0..m.ncols() {
                out[(r, c)] = m[(r, c)];
            }
        }
        out
    }
}

impl From<&Matrix> for DMatrix<f64> {
    fn from(m: &Matrix) -> Self {
        DMatrix::from_row_slice(m.rows, m.cols, &m.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn random_matrix(rng: &mut StdRng, rows: usize, cols: usize) -> Matrix {
        let data = (0..rows * cols)
            .map(|_| rng.random_range(-5.0..5.0))
            .collect();
        Matrix::from_vec(rows, cols, data).unwrap()
    }

    #[test]
    fn display_uses_comma_separated_rows() {
        let m = Matrix::from_rows([[8.0, 4.0], [3.0, 2.0]]);
        assert_eq!(m.to_string(), "8 , 4\n3 , 2\n");
    }

    #[test]
    fn add_and_subtract_elementwise() {
        let a = Matrix::from_rows([[8.0, 4.0], [3.0, 2.0]]);
        let b = Matrix::from_rows([[3.0, 5.0], [1.0, 2.0]]);

        assert_eq!((&a + &b).unwrap(), Matrix::from_rows([[11.0, 9.0], [4.0, 4.0]]));
        assert_eq!((&a - &b).unwrap(), Matrix::from_rows([[5.0, -1.0], [2.0, 0.0]]));
    }

    #[test]
    fn add_rejects_different_shapes() {
        let a = Matrix::new(2, 2);
        let b = Matrix::new(2, 3);
        assert!(matches!(
            &a + &b,
            Err(MathError::DimensionMismatch { operation: "addition", .. })
        ));
        assert!(matches!(
            &a - &b,
            Err(MathError::DimensionMismatch { operation: "subtraction", .. })
        ));
    }

    #[test]
    fn multiply_row_by_diagonal() {
        let v = Matrix::from_rows([[1.0, 1.0, 3.0, 1.0]]);
        let d = Matrix::from_rows([
            [320.0, 0.0, 0.0, 0.0],
            [0.0, 240.0, 0.0, 0.0],
            [0.0, 0.0, 0.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ]);
        let out = (&v * &d).unwrap();
        assert_eq!(out, Matrix::from_rows([[320.0, 240.0, 0.0, 1.0]]));
    }

    #[test]
    fn multiply_rotates_column() {
        let rot = Matrix::from_rows([[0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]]);
        let col = Matrix::from_rows([[1.0], [0.0], [0.0]]);
        assert_eq!((&rot * &col).unwrap(), Matrix::from_rows([[0.0], [1.0], [0.0]]));
    }

    #[test]
    fn multiply_rejects_inner_mismatch() {
        let a = Matrix::new(2, 3);
        let b = Matrix::new(2, 3);
        let err = (&a * &b).unwrap_err();
        assert_eq!(
            err,
            MathError::ColumnRowMismatch {
                left_cols: 3,
                right_rows: 2
            }
        );
        assert!(err.to_string().contains("number of columns of first"));
    }

    #[test]
    fn equality_uses_tolerance() {
        let a = Matrix::from_rows([[1.0, 2.0]]);
        let b = Matrix::from_rows([[1.0 + 1e-12, 2.0]]);
        let c = Matrix::from_rows([[1.001, 2.0]]);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, Matrix::from_rows([[1.0], [2.0]]));
    }

    #[test]
    fn swap_row_and_duplicate_are_independent() {
        let m = Matrix::from_rows([[1.0, 2.0], [3.0, 4.0]]);
        let mut copy = m.duplicate();
        copy.swap_row(0, 1);
        assert_eq!(copy, Matrix::from_rows([[3.0, 4.0], [1.0, 2.0]]));
        assert_eq!(m[(0, 0)], 1.0);
    }

    #[test]
    fn from_vec_checks_length() {
        assert!(Matrix::from_vec(2, 2, vec![1.0; 3]).is_err());
        assert!(Matrix::from_vec(2, 2, vec![1.0; 4]).is_ok());
    }

    #[test]
    fn identity_is_neutral() {
        let m = Matrix::from_rows([[2.0, -1.0, 0.5], [0.0, 3.0, 1.0], [4.0, 1.0, -2.0]]);
        assert_eq!((&m * &Matrix::identity(3)).unwrap(), m);
        assert_eq!((&Matrix::identity(3) * &m).unwrap(), m);
        assert_eq!(m.transpose().transpose(), m);
    }

    #[test]
    fn parallel_multiply_matches_naive_bit_for_bit() {
        let mut rng = StdRng::seed_from_u64(17);
        for _ in 0..20 {
            let a = random_matrix(&mut rng, 5, 7);
            let b = random_matrix(&mut rng, 7, 3);
            let naive = a.try_mul(&b).unwrap();
            let parallel = a.multiply_parallel(&b).unwrap();
            assert_eq!(naive.as_slice(), parallel.as_slice());
        }
    }

    #[test]
    fn multiply_is_associative_and_distributive() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..50 {
            let (n, m, p, q) = (
                rng.random_range(1..5),
                rng.random_range(1..5),
                rng.random_range(1..5),
                rng.random_range(1..5),
            );
            let a = random_matrix(&mut rng, n, m);
            let b = random_matrix(&mut rng, m, p);
            let c = random_matrix(&mut rng, p, q);
            let left = (&(&a * &b).unwrap() * &c).unwrap();
            let right = (&a * &(&b * &c).unwrap()).unwrap();
            assert!(left.approx_eq(&right, 1e-6));

            let d = random_matrix(&mut rng, m, p);
            let distributed = (&(&a * &b).unwrap() + &(&a * &d).unwrap()).unwrap();
            let factored = (&a * &(&b + &d).unwrap()).unwrap();
            assert!(distributed.approx_eq(&factored, 1e-6));
        }
    }

    #[test]
    fn nalgebra_conversion_keeps_layout() {
        let m = Matrix::from_rows([[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);
        let dm: DMatrix<f64> = (&m).into();
        assert_eq!(dm[(1, 0)], 4.0);
        assert_eq!(dm[(0, 2)], 3.0);
        assert_eq!(Matrix::from(&dm), m);
    }
}
