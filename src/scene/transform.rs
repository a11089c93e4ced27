use crate::core::error::MathResult;
use crate::geometry::transform::TransformFactory;
use crate::geometry::vector::Vector3D;
use log::debug;
use std::fmt;
use std::str::FromStr;

/// 默认平移步长
pub const DEFAULT_MOVE_STEP: f64 = 0.05;
/// 默认旋转步长（角度）
pub const DEFAULT_ROTATE_STEP: f64 = 2.0;
/// 俯仰角上限（角度），避免视线与上方向重合
pub const PITCH_LIMIT: f64 = 89.0;

/// 相机范式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CameraMode {
    /// 由 yaw/pitch 决定视线方向，target 跟随 position
    #[default]
    Orbit,
    /// 固定注视 target 世界坐标点
    LookAt,
}

/// 离散的相机输入事件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraAction {
    Up,
    Down,
    Left,
    Right,
    RotateLeft,
    RotateRight,
    Forward,
    Back,
    PitchUp,
    PitchDown,
}

impl FromStr for CameraMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "orbit" => Ok(CameraMode::Orbit),
            "look_at" | "look-at" | "lookat" => Ok(CameraMode::LookAt),
            other => Err(format!("未知的相机模式: {}", other)),
        }
    }
}

impl fmt::Display for CameraMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CameraMode::Orbit => write!(f, "orbit"),
            CameraMode::LookAt => write!(f, "look_at"),
        }
    }
}

impl FromStr for CameraAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let action = match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "up" => CameraAction::Up,
            "down" => CameraAction::Down,
            "left" => CameraAction::Left,
            "right" => CameraAction::Right,
            "rotate_left" => CameraAction::RotateLeft,
            "rotate_right" => CameraAction::RotateRight,
            "forward" => CameraAction::Forward,
            "back" | "backward" => CameraAction::Back,
            "pitch_up" => CameraAction::PitchUp,
            "pitch_down" => CameraAction::PitchDown,
            other => return Err(format!("未知的相机动作: {}", other)),
        };
        Ok(action)
    }
}

impl CameraAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            CameraAction::Up => "up",
            CameraAction::Down => "down",
            CameraAction::Left => "left",
            CameraAction::Right => "right",
            CameraAction::RotateLeft => "rotate_left",
            CameraAction::RotateRight => "rotate_right",
            CameraAction::Forward => "forward",
            CameraAction::Back => "back",
            CameraAction::PitchUp => "pitch_up",
            CameraAction::PitchDown => "pitch_down",
        }
    }
}

impl fmt::Display for CameraAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 物体摆放与相机状态
///
/// 作为物体变换时只使用 `translation`、`rotation`（角度）与 `scale`；
/// 作为相机时使用 `position`、`target`、`up` 以及 yaw/pitch 派生出的基向量。
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// 相机位置（眼睛位置）
    pub position: Vector3D,
    /// 欧拉旋转角（角度制，按 Z·Y·X 组合）
    pub rotation: Vector3D,
    pub scale: Vector3D,
    pub translation: Vector3D,
    /// LookAt 模式下的注视点；Orbit 模式下为 position + 视线方向
    pub target: Vector3D,
    pub up: Vector3D,
    pub right: Vector3D,
    pub forward: Vector3D,
    /// 偏航角（角度）
    pub yaw: f64,
    /// 俯仰角（角度），限制在 ±89°
    pub pitch: f64,
    pub camera_mode: CameraMode,
    pub move_step: f64,
    pub rotate_step: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vector3D::ZERO,
            rotation: Vector3D::ZERO,
            scale: Vector3D::UNIT,
            translation: Vector3D::ZERO,
            target: Vector3D::Z,
            up: Vector3D::Y,
            right: Vector3D::X,
            forward: Vector3D::Z,
            yaw: 0.0,
            pitch: 0.0,
            camera_mode: CameraMode::Orbit,
            move_step: DEFAULT_MOVE_STEP,
            rotate_step: DEFAULT_ROTATE_STEP,
        }
    }
}

impl Transform {
    /// 物体摆放
    pub fn object(translation: Vector3D, scale: Vector3D, rotation: Vector3D) -> Self {
        Self {
            translation,
            scale,
            rotation,
            ..Default::default()
        }
    }

    /// 相机，基向量立即按模式更新
    pub fn camera(position: Vector3D, target: Vector3D, camera_mode: CameraMode) -> MathResult<Self> {
        let mut transform = Self {
            position,
            target,
            camera_mode,
            ..Default::default()
        };
        transform.update_basis()?;
        Ok(transform)
    }

    /// Orbit 模式的视线方向：`(0,0,1)·(RotateX(pitch)·RotateY(yaw))`
    pub fn look_direction(&self) -> MathResult<Vector3D> {
        let rotation =
            TransformFactory::rotate_x(self.pitch).try_mul(&TransformFactory::rotate_y(self.yaw))?;
        Vector3D::Z.transform(&rotation)
    }

    /// 重新计算 forward/right；Orbit 模式同时让 target 跟随视线
    pub fn update_basis(&mut self) -> MathResult<()> {
        match self.camera_mode {
            CameraMode::Orbit => {
                let look = self.look_direction()?;
                self.forward = look;
                self.target = self.position + look;
            }
            CameraMode::LookAt => {
                let forward = (self.target - self.position).normalize();
                if forward != Vector3D::ZERO {
                    self.forward = forward;
                }
            }
        }

        let right = self.up.cross(&self.forward).normalize();
        if right != Vector3D::ZERO {
            self.right = right;
        }
        Ok(())
    }

    pub fn set_camera_mode(&mut self, mode: CameraMode) -> MathResult<()> {
        self.camera_mode = mode;
        self.update_basis()
    }

    pub fn apply(&mut self, action: CameraAction) -> MathResult<()> {
        debug!("相机动作 {:?} ({} 模式)", action, self.camera_mode);
        match action {
            CameraAction::Up => self.up_camera(),
            CameraAction::Down => self.down_camera(),
            CameraAction::Left => self.left_camera(),
            CameraAction::Right => self.right_camera(),
            CameraAction::RotateLeft => self.left_rotate_camera(),
            CameraAction::RotateRight => self.right_rotate_camera(),
            CameraAction::Forward => self.move_forward(),
            CameraAction::Back => self.move_back(),
            CameraAction::PitchUp => self.pitch_camera(-self.rotate_step),
            CameraAction::PitchDown => self.pitch_camera(self.rotate_step),
        }
    }

    /// 平移相机；LookAt 模式下注视点不动，沿世界坐标轴移动
    fn shift(&mut self, orbit_axis: Vector3D, world_axis: Vector3D, sign: f64) -> MathResult<()> {
        let axis = match self.camera_mode {
            CameraMode::Orbit => orbit_axis,
            CameraMode::LookAt => world_axis,
        };
        self.position += axis * (self.move_step * sign);
        self.update_basis()
    }

    pub fn up_camera(&mut self) -> MathResult<()> {
        self.shift(self.up, Vector3D::Y, 1.0)
    }

    pub fn down_camera(&mut self) -> MathResult<()> {
        self.shift(self.up, Vector3D::Y, -1.0)
    }

    pub fn left_camera(&mut self) -> MathResult<()> {
        self.shift(self.right, Vector3D::X, -1.0)
    }

    pub fn right_camera(&mut self) -> MathResult<()> {
        self.shift(self.right, Vector3D::X, 1.0)
    }

    pub fn move_forward(&mut self) -> MathResult<()> {
        self.shift(self.forward, Vector3D::Z, 1.0)
    }

    pub fn move_back(&mut self) -> MathResult<()> {
        self.shift(self.forward, Vector3D::Z, -1.0)
    }

    pub fn left_rotate_camera(&mut self) -> MathResult<()> {
        self.yaw_camera(-self.rotate_step)
    }

    pub fn right_rotate_camera(&mut self) -> MathResult<()> {
        self.yaw_camera(self.rotate_step)
    }

    /// Orbit 模式改变偏航角；LookAt 模式绕 target 的竖直轴公转
    fn yaw_camera(&mut self, degrees: f64) -> MathResult<()> {
        match self.camera_mode {
            CameraMode::Orbit => {
                self.yaw = (self.yaw + degrees) % 360.0;
            }
            CameraMode::LookAt => {
                let offset = self.position - self.target;
                let rotated = TransformFactory::rotate_vector_y(&offset, degrees)?;
                self.position = self.target + rotated;
            }
        }
        self.update_basis()
    }

    /// 相机相对 target 的仰角（角度）
    fn elevation(&self, offset: &Vector3D) -> f64 {
        let sin = offset.normalize().dot(&self.up.normalize());
        sin.clamp(-1.0, 1.0).asin().to_degrees()
    }

    /// Orbit 模式改变俯仰角；LookAt 模式绕相机右轴公转，正角度抬高相机
    fn pitch_camera(&mut self, degrees: f64) -> MathResult<()> {
        match self.camera_mode {
            CameraMode::Orbit => {
                self.pitch = (self.pitch + degrees).clamp(-PITCH_LIMIT, PITCH_LIMIT);
            }
            CameraMode::LookAt => {
                let offset = self.position - self.target;
                if offset != Vector3D::ZERO {
                    // 仰角限制在 ±PITCH_LIMIT，不会越过 target 正上方
                    let current = self.elevation(&offset);
                    let next = (current + degrees).clamp(-PITCH_LIMIT, PITCH_LIMIT);
                    let axis = match self.up.cross(&-offset).normalize() {
                        v if v == Vector3D::ZERO => self.right,
                        v => v,
                    };
                    let rotated = TransformFactory::rotate_vector_axis(&offset, &axis, next - current)?;
                    self.position = self.target + rotated;
                }
            }
        }
        self.update_basis()
    }
}
