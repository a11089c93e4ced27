//! 基于 Doolittle LU 分解的行列式与逆矩阵

use crate::core::error::{MathError, MathResult};
use crate::core::matrix::Matrix;

/// 部分主元 LU 分解结果：L 与 U 合并存储在同一矩阵中，L 的单位对角线不存储
#[derive(Debug, Clone)]
pub struct LuDecomposition {
    /// 严格下三角部分为 L 的乘子，上三角（含对角线）为 U
    pub lu: Matrix,
    /// `permutation[r]` 为分解后第 r 行对应的原始行号
    pub permutation: Vec<usize>,
    /// 行交换奇偶性，+1 为偶数次交换，-1 为奇数次
    pub toggle: f64,
}

impl LuDecomposition {
    pub fn size(&self) -> usize {
        self.lu.rows()
    }

    /// 单位下三角矩阵 L
    pub fn lower(&self) -> Matrix {
        let n = self.size();
        let mut l = Matrix::identity(n);
        for i in 0..n {
            for j in 0..i {
                l[(i, j)] = self.lu[(i, j)];
            }
        }
        l
    }

    /// 上三角矩阵 U
    pub fn upper(&self) -> Matrix {
        let n = self.size();
        let mut u = Matrix::new(n, n);
        for i in 0..n {
            for j in i..n {
                u[(i, j)] = self.lu[(i, j)];
            }
        }
        u
    }

    /// toggle × U 对角线乘积
    pub fn determinant(&self) -> f64 {
        (0..self.size()).fold(self.toggle, |acc, i| acc * self.lu[(i, i)])
    }

    /// 求解 A·x = b：先按置换重排 b，再做前代与回代
    pub fn solve(&self, b: &[f64]) -> MathResult<Vec<f64>> {
        let n = self.size();
        if b.len() != n {
            return Err(MathError::InvalidShape {
                expected: format!("right-hand side of length {}", n),
                actual: format!("length {}", b.len()),
            });
        }
        if let Some(column) = (0..n).find(|&i| self.lu[(i, i)] == 0.0) {
            return Err(MathError::Singular { column });
        }

        let mut x: Vec<f64> = self.permutation.iter().map(|&p| b[p]).collect();

        for i in 1..n {
            let mut sum = x[i];
            for j in 0..i {
                sum -= self.lu[(i, j)] * x[j];
            }
            x[i] = sum;
        }

        for i in (0..n).rev() {
            let mut sum = x[i];
            for j in i + 1..n {
                sum -= self.lu[(i, j)] * x[j];
            }
            x[i] = sum / self.lu[(i, i)];
        }

        Ok(x)
    }
}

/// 部分主元 Doolittle 分解
///
/// 每列先选取对角线及以下绝对值最大的行作为主元；若交换后对角元仍为 0，
/// 则取其下方最后一个非零行交换进来，找不到时返回 [`MathError::Singular`]。
pub fn decompose(matrix: &Matrix) -> MathResult<LuDecomposition> {
    if !matrix.is_square() {
        return Err(MathError::NotSquare {
            rows: matrix.rows(),
            cols: matrix.cols(),
        });
    }

    let n = matrix.rows();
    let mut lu = matrix.duplicate();
    let mut permutation: Vec<usize> = (0..n).collect();
    let mut toggle = 1.0;

    for j in 0..n.saturating_sub(1) {
        let mut col_max = lu[(j, j)].abs();
        let mut pivot_row = j;
        for i in j + 1..n {
            if lu[(i, j)].abs() > col_max {
                col_max = lu[(i, j)].abs();
                pivot_row = i;
            }
        }

        if pivot_row != j {
            lu.swap_row(pivot_row, j);
            permutation.swap(pivot_row, j);
            toggle = -toggle;
        }

        if lu[(j, j)] == 0.0 {
            let good_row = (j + 1..n)
                .rev()
                .find(|&row| lu[(row, j)] != 0.0)
                .ok_or(MathError::Singular { column: j })?;
            lu.swap_row(good_row, j);
            permutation.swap(good_row, j);
            toggle = -toggle;
        }

        for i in j + 1..n {
            lu[(i, j)] /= lu[(j, j)];
            for k in j + 1..n {
                lu[(i, k)] -= lu[(i, j)] * lu[(j, k)];
            }
        }
    }

    Ok(LuDecomposition {
        lu,
        permutation,
        toggle,
    })
}

pub fn determinant(matrix: &Matrix) -> MathResult<f64> {
    Ok(decompose(matrix)?.determinant())
}

/// 对单位矩阵的每一列求解，结果写入逆矩阵对应列
pub fn inverse(matrix: &Matrix) -> MathResult<Matrix> {
    let lu = decompose(matrix)?;
    let n = lu.size();
    let mut result = Matrix::new(n, n);
    let mut unit = vec![0.0; n];

    for i in 0..n {
        unit.iter_mut().for_each(|v| *v = 0.0);
        unit[i] = 1.0;
        let column = lu.solve(&unit)?;
        for (j, value) in column.into_iter().enumerate() {
            result[(j, i)] = value;
        }
    }

    Ok(result)
}

/// 不带主元的 Doolittle 分解，返回 (L, U)
pub fn lu_decomposition(matrix: &Matrix) -> MathResult<(Matrix, Matrix)> {
    if !matrix.is_square() {
        return Err(MathError::NotSquare {
            rows: matrix.rows(),
            cols: matrix.cols(),
        });
    }

    let n = matrix.rows();
    let mut lower = Matrix::new(n, n);
    let mut upper = Matrix::new(n, n);

    for i in 0..n {
        for k in i..n {
            let sum: f64 = (0..i).map(|j| lower[(i, j)] * upper[(j, k)]).sum();
            upper[(i, k)] = matrix[(i, k)] - sum;
        }

        lower[(i, i)] = 1.0;
        for k in i + 1..n {
            if upper[(i, i)] == 0.0 {
                return Err(MathError::Singular { column: i });
            }
            let sum: f64 = (0..i).map(|j| lower[(k, j)] * upper[(j, i)]).sum();
            lower[(k, i)] = (matrix[(k, i)] - sum) / upper[(i, i)];
        }
    }

    Ok((lower, upper))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::DMatrix;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn sample_4x4() -> Matrix {
        Matrix::from_rows([
            [1.0, 2.0, 3.0, 0.0],
            [-4.0, 2.0, 2.0, 0.0],
            [1.0, 1.0, 1.0, 0.0],
            [2.0, 1.0, -1.0, 1.0],
        ])
    }

    #[test]
    fn determinant_of_known_matrices() {
        assert_relative_eq!(determinant(&sample_4x4()).unwrap(), -6.0, epsilon = 1e-9);
        let m = Matrix::from_rows([[1.0, 2.0], [-4.0, 2.0]]);
        assert_relative_eq!(m.determinant().unwrap(), 10.0, epsilon = 1e-9);
    }

    #[test]
    fn inverse_times_matrix_is_identity() {
        for m in [Matrix::from_rows([[8.0, 4.0], [3.0, 2.0]]), sample_4x4()] {
            let inv = inverse(&m).unwrap();
            let product = (&m * &inv).unwrap();
            assert!(product.approx_eq(&Matrix::identity(m.rows()), 1e-5));
        }
    }

    #[test]
    fn unpivoted_decomposition_of_reference_matrix() {
        let m = Matrix::from_rows([[2.0, -1.0, -2.0], [-4.0, 6.0, 3.0], [-4.0, -2.0, 8.0]]);
        let (lower, upper) = lu_decomposition(&m).unwrap();
        assert_eq!(
            lower,
            Matrix::from_rows([[1.0, 0.0, 0.0], [-2.0, 1.0, 0.0], [-2.0, -1.0, 1.0]])
        );
        assert_eq!(
            upper,
            Matrix::from_rows([[2.0, -1.0, -2.0], [0.0, 4.0, -1.0], [0.0, 0.0, 3.0]])
        );
        assert_eq!((&lower * &upper).unwrap(), m);
    }

    #[test]
    fn pivoted_factors_reproduce_permuted_rows() {
        let m = Matrix::from_rows([[2.0, -1.0, -2.0], [-4.0, 6.0, 3.0], [-4.0, -2.0, 8.0]]);
        let lu = decompose(&m).unwrap();
        let product = (&lu.lower() * &lu.upper()).unwrap();
        for (r, &orig) in lu.permutation.iter().enumerate() {
            for c in 0..3 {
                assert_relative_eq!(product[(r, c)], m[(orig, c)], epsilon = 1e-9);
            }
        }
        assert_relative_eq!(lu.determinant(), 24.0, epsilon = 1e-9);
    }

    #[test]
    fn zero_leading_entry_is_pivoted_away() {
        let m = Matrix::from_rows([[0.0, 1.0], [1.0, 0.0]]);
        let lu = decompose(&m).unwrap();
        assert_eq!(lu.toggle, -1.0);
        assert_relative_eq!(lu.determinant(), -1.0);
        assert_eq!(inverse(&m).unwrap(), m);
    }

    #[test]
    fn non_square_is_rejected() {
        let m = Matrix::new(2, 3);
        assert_eq!(
            decompose(&m).unwrap_err(),
            MathError::NotSquare { rows: 2, cols: 3 }
        );
        assert!(inverse(&m).is_err());
        assert!(determinant(&m).is_err());
        assert!(lu_decomposition(&m).is_err());
    }

    #[test]
    fn singular_matrices_fail_without_partial_result() {
        let zero_column = Matrix::from_rows([[0.0, 1.0], [0.0, 2.0]]);
        assert_eq!(
            inverse(&zero_column).unwrap_err(),
            MathError::Singular { column: 0 }
        );
        assert_eq!(
            determinant(&zero_column).unwrap_err(),
            MathError::Singular { column: 0 }
        );

        let rank_deficient = Matrix::from_rows([[1.0, 2.0], [2.0, 4.0]]);
        assert!(matches!(
            inverse(&rank_deficient),
            Err(MathError::Singular { .. })
        ));
        assert_relative_eq!(determinant(&rank_deficient).unwrap(), 0.0);
    }

    #[test]
    fn agrees_with_nalgebra_on_random_matrices() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..25 {
            let n = rng.random_range(2..6);
            let data: Vec<f64> = (0..n * n).map(|_| rng.random_range(-10.0..10.0)).collect();
            let m = Matrix::from_vec(n, n, data).unwrap();
            let oracle: DMatrix<f64> = (&m).into();

            let det = determinant(&m).unwrap();
            assert_relative_eq!(det, oracle.determinant(), epsilon = 1e-6, max_relative = 1e-9);

            if det.abs() > 1e-3 {
                let inv = inverse(&m).unwrap();
                let expected = Matrix::from(&oracle.try_inverse().unwrap());
                assert!(inv.approx_eq(&expected, 1e-6));
            }
        }
    }
}
