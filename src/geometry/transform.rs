use crate::core::error::MathResult;
use crate::core::matrix::Matrix;
use crate::geometry::vector::Vector3D;
use nalgebra::{Rotation3, Unit, Vector3};

/// 变换矩阵工厂，提供创建各种 4x4 齐次变换矩阵的静态方法
///
/// 全部矩阵采用行向量约定 `v' = v·M`：平移量位于最后一行，
/// 正弦项的位置与之对应。
pub struct TransformFactory;

impl TransformFactory {
    /// 创建绕X轴旋转的变换矩阵（角度制）
    pub fn rotate_x(angle_degrees: f64) -> Matrix {
        let (s, c) = angle_degrees.to_radians().sin_cos();
        Matrix::from_rows([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, c, s, 0.0],
            [0.0, -s, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// 创建绕Y轴旋转的变换矩阵（角度制）
    pub fn rotate_y(angle_degrees: f64) -> Matrix {
        let (s, c) = angle_degrees.to_radians().sin_cos();
        Matrix::from_rows([
            [c, 0.0, -s, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [s, 0.0, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// 创建绕Z轴旋转的变换矩阵（角度制）
    pub fn rotate_z(angle_degrees: f64) -> Matrix {
        let (s, c) = angle_degrees.to_radians().sin_cos();
        Matrix::from_rows([
            [c, s, 0.0, 0.0],
            [-s, c, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// 创建均匀缩放矩阵
    pub fn scale(factor: f64) -> Matrix {
        Self::scale_xyz(factor, factor, factor)
    }

    /// 创建非均匀缩放矩阵
    pub fn scale_xyz(sx: f64, sy: f64, sz: f64) -> Matrix {
        Matrix::from_rows([
            [sx, 0.0, 0.0, 0.0],
            [0.0, sy, 0.0, 0.0],
            [0.0, 0.0, sz, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn scale_vector(scale: &Vector3D) -> Matrix {
        Self::scale_xyz(scale.x, scale.y, scale.z)
    }

    /// 创建平移矩阵，平移分量写在最后一行
    pub fn translate(translation: &Vector3D) -> Matrix {
        let mut m = Matrix::identity(4);
        m[(3, 0)] = translation.x;
        m[(3, 1)] = translation.y;
        m[(3, 2)] = translation.z;
        m
    }

    /// 按 Z·Y·X 顺序组合的欧拉旋转，`rotation` 各分量为角度
    pub fn rotate_zyx(rotation: &Vector3D) -> MathResult<Matrix> {
        let zy = Self::rotate_z(rotation.z).try_mul(&Self::rotate_y(rotation.y))?;
        zy.try_mul(&Self::rotate_x(rotation.x))
    }

    /// 绕任意轴旋转（角度制，右手定则）；轴长度为 0 时返回单位矩阵
    pub fn rotate_axis(axis: &Vector3D, angle_degrees: f64) -> Matrix {
        let mut m = Matrix::identity(4);
        if axis.normalize() == Vector3D::ZERO {
            return m;
        }
        let axis = Unit::new_normalize(Vector3::from(*axis));
        let rotation = Rotation3::from_axis_angle(&axis, angle_degrees.to_radians());
        // nalgebra 为列向量约定，转置后写入
        let r = rotation.matrix();
        for row in 0..3 {
            for col in 0..3 {
                m[(row, col)] = r[(col, row)];
            }
        }
        m
    }

    // 以下直接作用于点

    pub fn rotate_vector_x(v: &Vector3D, angle_degrees: f64) -> MathResult<Vector3D> {
        v.transform(&Self::rotate_x(angle_degrees))
    }

    pub fn rotate_vector_y(v: &Vector3D, angle_degrees: f64) -> MathResult<Vector3D> {
        v.transform(&Self::rotate_y(angle_degrees))
    }

    pub fn rotate_vector_z(v: &Vector3D, angle_degrees: f64) -> MathResult<Vector3D> {
        v.transform(&Self::rotate_z(angle_degrees))
    }

    pub fn rotate_vector_axis(
        v: &Vector3D,
        axis: &Vector3D,
        angle_degrees: f64,
    ) -> MathResult<Vector3D> {
        v.transform(&Self::rotate_axis(axis, angle_degrees))
    }

    pub fn scale_point(v: &Vector3D, factor: f64) -> MathResult<Vector3D> {
        v.transform(&Self::scale(factor))
    }

    pub fn translate_point(v: &Vector3D, translation: &Vector3D) -> MathResult<Vector3D> {
        v.transform(&Self::translate(translation))
    }
}
