use crate::core::rasterizer::{RasterConfig, RenderObject};
use crate::geometry::camera::ProjectionMode;
use crate::geometry::triangle::cube_vertices;
use crate::geometry::vector::Vector3D;
use crate::scene::transform::{
    CameraAction, CameraMode, DEFAULT_MOVE_STEP, DEFAULT_ROTATE_STEP, Transform,
};

/// 所有可通过TOML配置的渲染参数（纯数据结构）
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSettings {
    // ===== 文件 =====
    /// 边数据输出路径（TOML），为空时只打印摘要
    pub output: Option<String>,

    // ===== 渲染 =====
    /// 视口宽度（像素）
    pub width: usize,
    /// 视口高度（像素）
    pub height: usize,
    pub projection: ProjectionMode,
    pub backface_culling: bool,
    pub use_multithreading: bool,

    // ===== 相机 =====
    pub camera_mode: CameraMode,
    /// 相机位置，格式 "x,y,z"
    pub camera_position: String,
    /// LookAt 模式的注视点，格式 "x,y,z"
    pub camera_target: String,
    pub camera_up: String,
    /// 偏航角（角度）
    pub camera_yaw: f64,
    /// 俯仰角（角度）
    pub camera_pitch: f64,
    /// 视场角（角度）
    pub fov: f64,
    pub near: f64,
    pub far: f64,
    pub move_step: f64,
    pub rotate_step: f64,
    /// 渲染前依次执行的相机动作
    pub moves: Vec<CameraAction>,

    // ===== 物体 =====
    pub object_translation: String,
    /// 欧拉角（角度），格式 "x,y,z"
    pub object_rotation: String,
    pub object_scale: String,

    // ===== 网格 =====
    /// 扁平顶点流；为空时使用单位立方体
    pub vertices: Option<Vec<Vector3D>>,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            output: None,
            width: 640,
            height: 480,
            projection: ProjectionMode::Perspective,
            backface_culling: true,
            use_multithreading: true,
            camera_mode: CameraMode::Orbit,
            camera_position: "0,0,0".to_string(),
            camera_target: "0,0,1".to_string(),
            camera_up: "0,1,0".to_string(),
            camera_yaw: 0.0,
            camera_pitch: 0.0,
            fov: 90.0,
            near: 0.1,
            far: 1000.0,
            move_step: DEFAULT_MOVE_STEP,
            rotate_step: DEFAULT_ROTATE_STEP,
            moves: Vec::new(),
            object_translation: "-0.5,-0.5,3".to_string(),
            object_rotation: "0,0,0".to_string(),
            object_scale: "1,1,1".to_string(),
            vertices: None,
        }
    }
}

impl RenderSettings {
    pub fn raster_config(&self) -> RasterConfig {
        RasterConfig {
            width: self.width,
            height: self.height,
            projection: self.projection,
            camera_mode: self.camera_mode,
            fov: self.fov,
            near: self.near,
            far: self.far,
            backface_culling: self.backface_culling,
            use_multithreading: self.use_multithreading,
        }
    }

    pub fn object_transform(&self) -> Result<Transform, String> {
        let translation = parse_vec3(&self.object_translation)
            .map_err(|e| format!("无效的物体平移: {}", e))?;
        let rotation =
            parse_vec3(&self.object_rotation).map_err(|e| format!("无效的物体旋转: {}", e))?;
        let scale = parse_vec3(&self.object_scale).map_err(|e| format!("无效的物体缩放: {}", e))?;
        Ok(Transform::object(translation, scale, rotation))
    }

    /// 构建相机并依次执行 `moves` 中的动作
    pub fn camera_transform(&self) -> Result<Transform, String> {
        let mut camera = Transform {
            position: parse_vec3(&self.camera_position)
                .map_err(|e| format!("无效的相机位置: {}", e))?,
            target: parse_vec3(&self.camera_target)
                .map_err(|e| format!("无效的相机注视点: {}", e))?,
            up: parse_vec3(&self.camera_up).map_err(|e| format!("无效的相机上方向: {}", e))?,
            yaw: self.camera_yaw,
            pitch: self.camera_pitch,
            camera_mode: self.camera_mode,
            move_step: self.move_step,
            rotate_step: self.rotate_step,
            ..Default::default()
        };
        camera.update_basis().map_err(|e| e.to_string())?;

        for action in &self.moves {
            camera.apply(*action).map_err(|e| e.to_string())?;
        }
        Ok(camera)
    }

    pub fn render_object(&self) -> Result<RenderObject, String> {
        let vertices = self.vertices.clone().unwrap_or_else(cube_vertices);
        Ok(RenderObject::from_vertices(&vertices, self.object_transform()?))
    }
}

/// 解析逗号分隔的三个浮点数
pub fn parse_vec3(s: &str) -> Result<Vector3D, String> {
    let parts: Vec<&str> = s.split(',').collect();
    if parts.len() != 3 {
        return Err(format!("需要3个逗号分隔的值: '{}'", s));
    }
    let mut values = [0.0; 3];
    for (value, part) in values.iter_mut().zip(&parts) {
        *value = part
            .trim()
            .parse::<f64>()
            .map_err(|e| format!("无效数字 '{}': {}", part, e))?;
    }
    Ok(Vector3D::new(values[0], values[1], values[2]))
}

/// 解析逗号分隔的相机动作列表，空串返回空列表
pub fn parse_moves(s: &str) -> Result<Vec<CameraAction>, String> {
    s.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| part.parse::<CameraAction>())
        .collect()
}
