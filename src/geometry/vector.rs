use crate::core::error::{MathError, MathResult};
use crate::core::matrix::{Matrix, TOLERANCE};
use nalgebra::Vector3;
use std::fmt;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

/// 三维向量（值语义）
#[derive(Debug, Clone, Copy, Default)]
pub struct Vector3D {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// 二维向量
#[derive(Debug, Clone, Copy, Default)]
pub struct Vector2D {
    pub x: f64,
    pub y: f64,
}

/// 取整后的二维整数坐标
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Coordinate2D {
    pub x: i32,
    pub y: i32,
}

impl Vector3D {
    pub const ZERO: Vector3D = Vector3D::new(0.0, 0.0, 0.0);
    pub const UNIT: Vector3D = Vector3D::new(1.0, 1.0, 1.0);
    pub const X: Vector3D = Vector3D::new(1.0, 0.0, 0.0);
    pub const Y: Vector3D = Vector3D::new(0.0, 1.0, 0.0);
    pub const Z: Vector3D = Vector3D::new(0.0, 0.0, 1.0);

    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn dot(&self, other: &Vector3D) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    pub fn cross(&self, other: &Vector3D) -> Vector3D {
        Vector3D::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    pub fn length(&self) -> f64 {
        self.dot(self).sqrt()
    }

    /// 单位化；零长度向量返回零向量，不产生 NaN
    pub fn normalize(&self) -> Vector3D {
        let len = self.length();
        if len == 0.0 {
            return Vector3D::ZERO;
        }
        *self / len
    }

    /// 两向量夹角（弧度）
    pub fn angle(&self, other: &Vector3D) -> f64 {
        let cos = self.dot(other) / (self.length() * other.length());
        cos.clamp(-1.0, 1.0).acos()
    }

    pub fn rounded(&self) -> Vector3D {
        Vector3D::new(self.x.round(), self.y.round(), self.z.round())
    }

    /// 齐次行向量 `[x, y, z, 1]`
    pub fn to_row(&self) -> Matrix {
        Matrix::from_rows([[self.x, self.y, self.z, 1.0]])
    }

    /// 行向量约定下乘以 4x4 矩阵，返回变换后的 xyz 与 w
    pub fn transform_with_w(&self, m: &Matrix) -> MathResult<(Vector3D, f64)> {
        let row = self.to_row().try_mul(m)?;
        if row.cols() < 4 {
            return Err(MathError::InvalidShape {
                expected: "a 4-column transform".to_string(),
                actual: format!("{}x{}", m.rows(), m.cols()),
            });
        }
        Ok((
            Vector3D::new(row[(0, 0)], row[(0, 1)], row[(0, 2)]),
            row[(0, 3)],
        ))
    }

    /// `[x, y, z, 1]·M`，不做透视除法
    pub fn transform(&self, m: &Matrix) -> MathResult<Vector3D> {
        self.transform_with_w(m).map(|(v, _)| v)
    }
}

impl Vector2D {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn dot(&self, other: &Vector2D) -> f64 {
        self.x * other.x + self.y * other.y
    }

    pub fn length(&self) -> f64 {
        self.dot(self).sqrt()
    }

    pub fn normalize(&self) -> Vector2D {
        let len = self.length();
        if len == 0.0 {
            return Vector2D::default();
        }
        *self / len
    }

    pub fn angle(&self, other: &Vector2D) -> f64 {
        let cos = self.dot(other) / (self.length() * other.length());
        cos.clamp(-1.0, 1.0).acos()
    }
}

impl Coordinate2D {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// 行主序下标还原为坐标
    pub fn from_id(id: usize, width: usize) -> Self {
        Self {
            x: (id % width) as i32,
            y: (id / width) as i32,
        }
    }

    pub fn id(&self, width: usize) -> usize {
        self.y as usize * width + self.x as usize
    }
}

macro_rules! vector_ops {
    ($ty:ident { $($field:ident),+ }) => {
        impl Add for $ty {
            type Output = $ty;
            fn add(self, rhs: $ty) -> $ty {
                $ty { $($field: self.$field + rhs.$field),+ }
            }
        }

        impl Sub for $ty {
            type Output = $ty;
            fn sub(self, rhs: $ty) -> $ty {
                $ty { $($field: self.$field - rhs.$field),+ }
            }
        }

        impl AddAssign for $ty {
            fn add_assign(&mut self, rhs: $ty) {
                $(self.$field += rhs.$field;)+
            }
        }

        impl SubAssign for $ty {
            fn sub_assign(&mut self, rhs: $ty) {
                $(self.$field -= rhs.$field;)+
            }
        }

        impl Neg for $ty {
            type Output = $ty;
            fn neg(self) -> $ty {
                $ty { $($field: -self.$field),+ }
            }
        }

        impl Mul<f64> for $ty {
            type Output = $ty;
            fn mul(self, rhs: f64) -> $ty {
                $ty { $($field: self.$field * rhs),+ }
            }
        }

        impl Mul<$ty> for f64 {
            type Output = $ty;
            fn mul(self, rhs: $ty) -> $ty {
                rhs * self
            }
        }

        /// 两向量相乘为点积
        impl Mul for $ty {
            type Output = f64;
            fn mul(self, rhs: $ty) -> f64 {
                self.dot(&rhs)
            }
        }

        impl Div<f64> for $ty {
            type Output = $ty;
            fn div(self, rhs: f64) -> $ty {
                $ty { $($field: self.$field / rhs),+ }
            }
        }

        impl PartialEq for $ty {
            fn eq(&self, other: &Self) -> bool {
                $((self.$field - other.$field).abs() < TOLERANCE)&&+
            }
        }
    };
}

vector_ops!(Vector3D { x, y, z });
vector_ops!(Vector2D { x, y });

impl fmt::Display for Vector3D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "X: {} Y: {} Z: {}", self.x, self.y, self.z)
    }
}

impl fmt::Display for Vector2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "X: {} Y: {}", self.x, self.y)
    }
}

impl From<Vector3D> for Matrix {
    fn from(v: Vector3D) -> Self {
        v.to_row()
    }
}

impl TryFrom<&Matrix> for Vector3D {
    type Error = MathError;

    fn try_from(m: &Matrix) -> Result<Self, Self::Error> {
        if m.rows() != 1 || m.cols() < 3 {
            return Err(MathError::InvalidShape {
                expected: "1x3 or 1x4 row".to_string(),
                actual: format!("{}x{}", m.rows(), m.cols()),
            });
        }
        Ok(Vector3D::new(m[(0, 0)], m[(0, 1)], m[(0, 2)]))
    }
}

impl From<Vector3D> for Coordinate2D {
    fn from(v: Vector3D) -> Self {
        Coordinate2D::new(v.x.round() as i32, v.y.round() as i32)
    }
}

impl From<Vector2D> for Coordinate2D {
    fn from(v: Vector2D) -> Self {
        Coordinate2D::new(v.x.round() as i32, v.y.round() as i32)
    }
}

impl From<Vector3D> for Vector2D {
    fn from(v: Vector3D) -> Self {
        Vector2D::new(v.x, v.y)
    }
}

impl From<Vector3<f64>> for Vector3D {
    fn from(v: Vector3<f64>) -> Self {
        Vector3D::new(v.x, v.y, v.z)
    }
}

impl From<Vector3D> for Vector3<f64> {
    fn from(v: Vector3D) -> Self {
        Vector3::new(v.x, v.y, v.z)
    }
}
