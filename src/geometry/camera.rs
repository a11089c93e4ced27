use crate::core::error::MathResult;
use crate::core::matrix::Matrix;
use crate::geometry::transform::TransformFactory;
use crate::geometry::vector::Vector3D;
use crate::scene::transform::{CameraMode, Transform};
use std::fmt;
use std::str::FromStr;

/// |w| 小于该值时跳过透视除法
pub const W_EPSILON: f64 = 0.005;

/// 投影方式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProjectionMode {
    #[default]
    Perspective,
    Orthographic,
}

impl FromStr for ProjectionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "perspective" => Ok(ProjectionMode::Perspective),
            "orthographic" | "ortho" => Ok(ProjectionMode::Orthographic),
            other => Err(format!("未知的投影类型: {}", other)),
        }
    }
}

impl fmt::Display for ProjectionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectionMode::Perspective => write!(f, "perspective"),
            ProjectionMode::Orthographic => write!(f, "orthographic"),
        }
    }
}

/// 相机投影参数，负责模型/视图/投影三类矩阵
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// 视口宽度（像素）
    pub width: f64,
    /// 视口高度（像素）
    pub height: f64,
    /// 视场角（角度）
    pub fov: f64,
    /// 近裁剪平面距离
    pub near: f64,
    /// 远裁剪平面距离
    pub far: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            width: 640.0,
            height: 480.0,
            fov: 90.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl Camera {
    pub fn new(width: f64, height: f64, fov: f64, near: f64, far: f64) -> Self {
        Self {
            width,
            height,
            fov,
            near,
            far,
        }
    }

    /// 纵横比 A = height / width
    pub fn aspect(&self) -> f64 {
        self.height / self.width
    }

    /// 视场缩放 F = 1 / tan(fov / 2)
    pub fn fov_scale(&self) -> f64 {
        1.0 / (self.fov.to_radians() * 0.5).tan()
    }

    /// 深度缩放 Q = far / (far - near)
    pub fn depth_scale(&self) -> f64 {
        self.far / (self.far - self.near)
    }

    /// 模型矩阵 = Scale · (RotateZ · RotateY · RotateX) · Translate
    ///
    /// 行向量约定下先缩放、再旋转、最后平移；调换因子顺序会改变结果。
    pub fn model_matrix(object: &Transform) -> MathResult<Matrix> {
        let scale = TransformFactory::scale_vector(&object.scale);
        let rotation = TransformFactory::rotate_zyx(&object.rotation)?;
        let translation = TransformFactory::translate(&object.translation);
        scale.try_mul(&rotation)?.try_mul(&translation)
    }

    /// 相机到世界的矩阵，各行依次为 right / up / forward / position
    pub fn point_at(position: &Vector3D, target: &Vector3D, up: &Vector3D) -> Matrix {
        let forward = (*target - *position).normalize();
        let a = forward * up.dot(&forward);
        let mut new_up = (*up - a).normalize();
        if new_up == Vector3D::ZERO {
            // 视线与 up 平行，改用与视线最不平行的坐标轴
            let fallback = if forward.z.abs() < 0.9 {
                Vector3D::Z
            } else {
                Vector3D::X
            };
            new_up = (fallback - forward * fallback.dot(&forward)).normalize();
        }
        let right = new_up.cross(&forward);

        Matrix::from_rows([
            [right.x, right.y, right.z, 0.0],
            [new_up.x, new_up.y, new_up.z, 0.0],
            [forward.x, forward.y, forward.z, 0.0],
            [position.x, position.y, position.z, 1.0],
        ])
    }

    /// 视图矩阵：point_at 的逆
    ///
    /// Orbit 模式注视点为 position + 视线方向，LookAt 模式直接使用 target。
    pub fn view_matrix(camera: &Transform) -> MathResult<Matrix> {
        let target = match camera.camera_mode {
            CameraMode::Orbit => camera.position + camera.look_direction()?,
            CameraMode::LookAt => camera.target,
        };
        Self::point_at(&camera.position, &target, &camera.up).inverse()
    }

    /// 透视投影矩阵（未做透视除法）
    pub fn perspective_matrix(&self) -> Matrix {
        let a = self.aspect();
        let f = self.fov_scale();
        let q = self.depth_scale();
        Matrix::from_rows([
            [a * f, 0.0, 0.0, 0.0],
            [0.0, f, 0.0, 0.0],
            [0.0, 0.0, q, 1.0],
            [0.0, 0.0, -self.near * q, 0.0],
        ])
    }

    /// 正交投影矩阵：x 按纵横比缩放，y 直通，丢弃 z，w 固定为 1
    pub fn orthographic_matrix(&self) -> Matrix {
        Matrix::from_rows([
            [self.aspect(), 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 0.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// 透视投影并做透视除法；|w| < [`W_EPSILON`] 时跳过除法
    pub fn project_perspective(&self, point: &Vector3D) -> MathResult<Vector3D> {
        let (v, w) = point.transform_with_w(&self.perspective_matrix())?;
        if w.abs() < W_EPSILON {
            return Ok(v);
        }
        Ok(v / w)
    }

    pub fn project_orthographic(&self, point: &Vector3D) -> MathResult<Vector3D> {
        point.transform(&self.orthographic_matrix())
    }

    pub fn project(&self, point: &Vector3D, mode: ProjectionMode) -> MathResult<Vector3D> {
        match mode {
            ProjectionMode::Perspective => self.project_perspective(point),
            ProjectionMode::Orthographic => self.project_orthographic(point),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn model_matrix_translates_after_rotation() {
        let object = Transform::object(Vector3D::new(0.0, 0.0, 3.0), Vector3D::UNIT, Vector3D::ZERO);
        let model = Camera::model_matrix(&object).unwrap();
        let p = Vector3D::new(-1.0, -1.0, -1.0).transform(&model).unwrap();
        assert_eq!(p, Vector3D::new(-1.0, -1.0, 2.0));
    }

    #[test]
    fn model_matrix_scales_before_translation() {
        let object = Transform::object(
            Vector3D::new(1.0, 0.0, 0.0),
            Vector3D::new(2.0, 2.0, 2.0),
            Vector3D::new(0.0, 0.0, 90.0),
        );
        let model = Camera::model_matrix(&object).unwrap();
        let p = Vector3D::X.transform(&model).unwrap();
        // (1,0,0) -> 缩放 (2,0,0) -> 绕Z转 (0,2,0) -> 平移 (1,2,0)
        assert!((p - Vector3D::new(1.0, 2.0, 0.0)).length() < 1e-9);
    }

    #[test]
    fn identity_placement_gives_identity_view() {
        let view = Camera::view_matrix(&Transform::default()).unwrap();
        assert_eq!(view, Matrix::identity(4));

        let mut look_at = Transform::default();
        look_at.camera_mode = CameraMode::LookAt;
        assert_eq!(Camera::view_matrix(&look_at).unwrap(), Matrix::identity(4));
    }

    #[test]
    fn view_moves_camera_to_origin() {
        let camera =
            Transform::camera(Vector3D::new(2.0, 1.0, -4.0), Vector3D::new(2.0, 1.0, 0.0), CameraMode::LookAt)
                .unwrap();
        let view = Camera::view_matrix(&camera).unwrap();
        assert_eq!(camera.position.transform(&view).unwrap(), Vector3D::ZERO);
        assert_eq!(
            Vector3D::new(2.0, 1.0, 0.0).transform(&view).unwrap(),
            Vector3D::new(0.0, 0.0, 4.0)
        );
    }

    #[test]
    fn point_at_orthonormalizes_up() {
        let m = Camera::point_at(
            &Vector3D::ZERO,
            &Vector3D::new(0.0, 1.0, 1.0),
            &Vector3D::Y,
        );
        let up = Vector3D::new(m[(1, 0)], m[(1, 1)], m[(1, 2)]);
        let forward = Vector3D::new(m[(2, 0)], m[(2, 1)], m[(2, 2)]);
        assert_relative_eq!(up.dot(&forward), 0.0, epsilon = 1e-12);
        assert_relative_eq!(up.length(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn point_at_straight_down_stays_invertible() {
        let m = Camera::point_at(
            &Vector3D::new(0.0, 8.0, 3.5),
            &Vector3D::new(0.0, 0.0, 3.5),
            &Vector3D::Y,
        );
        let right = Vector3D::new(m[(0, 0)], m[(0, 1)], m[(0, 2)]);
        let up = Vector3D::new(m[(1, 0)], m[(1, 1)], m[(1, 2)]);
        let forward = Vector3D::new(m[(2, 0)], m[(2, 1)], m[(2, 2)]);
        assert_eq!(forward, Vector3D::new(0.0, -1.0, 0.0));
        assert_relative_eq!(up.length(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(up.dot(&forward), 0.0, epsilon = 1e-12);
        assert_relative_eq!(right.dot(&up.cross(&forward)), 1.0, epsilon = 1e-12);
        assert!(m.inverse().is_ok());
    }

    #[test]
    fn default_projection_constants() {
        let cam = Camera::default();
        assert_relative_eq!(cam.aspect(), 0.75);
        assert_relative_eq!(cam.fov_scale(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(cam.depth_scale(), 1000.0 / 999.9);
    }

    #[test]
    fn perspective_divides_by_depth() {
        let cam = Camera::default();
        let p = cam.project_perspective(&Vector3D::new(1.0, 1.0, 2.0)).unwrap();
        let q = cam.depth_scale();
        assert_relative_eq!(p.x, 0.375, epsilon = 1e-12);
        assert_relative_eq!(p.y, 0.5, epsilon = 1e-12);
        assert_relative_eq!(p.z, (2.0 - 0.1) * q / 2.0, epsilon = 1e-12);
    }

    #[test]
    fn perspective_skips_divide_near_zero_w() {
        let cam = Camera::default();
        let p = cam.project_perspective(&Vector3D::new(1.0, 1.0, 0.001)).unwrap();
        assert_relative_eq!(p.x, 0.75, epsilon = 1e-12);
        assert_relative_eq!(p.y, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn orthographic_drops_depth() {
        let cam = Camera::default();
        let p = cam
            .project(&Vector3D::new(2.0, -1.0, 7.0), ProjectionMode::Orthographic)
            .unwrap();
        assert_eq!(p, Vector3D::new(1.5, -1.0, 0.0));
    }

    #[test]
    fn parses_projection_mode() {
        assert_eq!(
            "Orthographic".parse::<ProjectionMode>().unwrap(),
            ProjectionMode::Orthographic
        );
        assert!("fisheye".parse::<ProjectionMode>().is_err());
    }
}
