use crate::geometry::camera::ProjectionMode;
use crate::geometry::vector::Vector3D;
use crate::io::render_settings::{RenderSettings, parse_moves};
use crate::scene::transform::{CameraAction, CameraMode};
use log::warn;
use std::path::Path;
use toml::Value;

/// TOML配置管理器 - 统一处理配置的读写
pub struct TomlConfigLoader;

impl TomlConfigLoader {
    /// 从TOML文件加载完整配置
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<RenderSettings, String> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| format!("读取配置文件失败: {}", e))?;

        Self::load_from_content(&content)
    }

    /// 从TOML内容字符串加载配置
    pub fn load_from_content(content: &str) -> Result<RenderSettings, String> {
        let toml_value: Value =
            toml::from_str(content).map_err(|e| format!("解析TOML失败: {}", e))?;

        Self::parse_toml_to_settings(toml_value)
    }

    /// 保存配置到TOML文件
    pub fn save_to_file<P: AsRef<Path>>(settings: &RenderSettings, path: P) -> Result<(), String> {
        let toml_content = Self::settings_to_toml(settings);
        std::fs::write(path, toml_content).map_err(|e| format!("写入配置文件失败: {}", e))
    }

    /// 生成示例配置：默认立方体场景，渲染前相机左转一步
    pub fn create_example_config<P: AsRef<Path>>(path: P) -> Result<(), String> {
        let settings = RenderSettings {
            output: Some("edges.toml".to_string()),
            moves: vec![CameraAction::RotateLeft],
            ..Default::default()
        };

        Self::save_to_file(&settings, path).map_err(|e| format!("创建示例配置失败: {}", e))
    }

    // ===== TOML -> RenderSettings 转换 =====

    fn parse_toml_to_settings(toml: Value) -> Result<RenderSettings, String> {
        let mut settings = RenderSettings::default();

        // [files] 部分
        if let Some(files) = toml.get("files").and_then(|v| v.as_table()) {
            if let Some(output) = files.get("output").and_then(|v| v.as_str()) {
                settings.output = Some(output.to_string());
            }
        }

        // [render] 部分
        if let Some(render) = toml.get("render").and_then(|v| v.as_table()) {
            Self::parse_render_section(&mut settings, render)?;
        }

        // [camera] 部分
        if let Some(camera) = toml.get("camera").and_then(|v| v.as_table()) {
            Self::parse_camera_section(&mut settings, camera)?;
        }

        // [object] 部分
        if let Some(object) = toml.get("object").and_then(|v| v.as_table()) {
            Self::parse_object_section(&mut settings, object)?;
        }

        // [mesh] 部分
        if let Some(mesh) = toml.get("mesh").and_then(|v| v.as_table()) {
            Self::parse_mesh_section(&mut settings, mesh)?;
        }

        Ok(settings)
    }

    // ===== 各个section的解析方法 =====

    fn parse_render_section(
        settings: &mut RenderSettings,
        render: &toml::Table,
    ) -> Result<(), String> {
        if let Some(width) = render.get("width").and_then(|v| v.as_integer()) {
            if width > 0 {
                settings.width = width as usize;
            } else {
                warn!("无效的视口宽度 {}, 使用默认值 {}", width, settings.width);
            }
        }
        if let Some(height) = render.get("height").and_then(|v| v.as_integer()) {
            if height > 0 {
                settings.height = height as usize;
            } else {
                warn!("无效的视口高度 {}, 使用默认值 {}", height, settings.height);
            }
        }
        if let Some(projection) = render.get("projection").and_then(|v| v.as_str()) {
            match projection.parse::<ProjectionMode>() {
                Ok(mode) => settings.projection = mode,
                Err(e) => warn!("{}, 使用默认值 {}", e, settings.projection),
            }
        }
        if let Some(backface_culling) = render.get("backface_culling").and_then(|v| v.as_bool()) {
            settings.backface_culling = backface_culling;
        }
        if let Some(use_multithreading) =
            render.get("use_multithreading").and_then(|v| v.as_bool())
        {
            settings.use_multithreading = use_multithreading;
        }
        Ok(())
    }

    fn parse_camera_section(
        settings: &mut RenderSettings,
        camera: &toml::Table,
    ) -> Result<(), String> {
        if let Some(mode) = camera.get("mode").and_then(|v| v.as_str()) {
            match mode.parse::<CameraMode>() {
                Ok(mode) => settings.camera_mode = mode,
                Err(e) => warn!("{}, 使用默认值 {}", e, settings.camera_mode),
            }
        }
        if let Some(position) = camera.get("position").and_then(|v| v.as_str()) {
            settings.camera_position = position.to_string();
        }
        if let Some(target) = camera.get("target").and_then(|v| v.as_str()) {
            settings.camera_target = target.to_string();
        }
        if let Some(up) = camera.get("up").and_then(|v| v.as_str()) {
            settings.camera_up = up.to_string();
        }
        if let Some(yaw) = camera.get("yaw").and_then(as_number) {
            settings.camera_yaw = yaw;
        }
        if let Some(pitch) = camera.get("pitch").and_then(as_number) {
            settings.camera_pitch = pitch;
        }
        if let Some(fov) = camera.get("fov").and_then(as_number) {
            if fov > 0.0 && fov < 180.0 {
                settings.fov = fov;
            } else {
                warn!("无效的视场角 {}, 使用默认值 {}", fov, settings.fov);
            }
        }
        if let Some(near) = camera.get("near").and_then(as_number) {
            settings.near = near;
        }
        if let Some(far) = camera.get("far").and_then(as_number) {
            settings.far = far;
        }
        if settings.far <= settings.near {
            return Err(format!(
                "远裁剪平面 ({}) 必须大于近裁剪平面 ({})",
                settings.far, settings.near
            ));
        }
        if let Some(move_step) = camera.get("move_step").and_then(as_number) {
            settings.move_step = move_step;
        }
        if let Some(rotate_step) = camera.get("rotate_step").and_then(as_number) {
            settings.rotate_step = rotate_step;
        }
        match camera.get("moves") {
            Some(Value::String(list)) => settings.moves = parse_moves(list)?,
            Some(Value::Array(items)) => {
                settings.moves = items
                    .iter()
                    .map(|item| {
                        item.as_str()
                            .ok_or_else(|| format!("相机动作必须是字符串: {}", item))?
                            .parse::<CameraAction>()
                    })
                    .collect::<Result<Vec<_>, String>>()?;
            }
            Some(other) => return Err(format!("无效的 moves 字段: {}", other)),
            None => {}
        }
        Ok(())
    }

    fn parse_object_section(
        settings: &mut RenderSettings,
        object: &toml::Table,
    ) -> Result<(), String> {
        if let Some(translation) = object.get("translation").and_then(|v| v.as_str()) {
            settings.object_translation = translation.to_string();
        }
        if let Some(rotation) = object.get("rotation").and_then(|v| v.as_str()) {
            settings.object_rotation = rotation.to_string();
        }
        if let Some(scale) = object.get("scale").and_then(|v| v.as_str()) {
            settings.object_scale = scale.to_string();
        }
        Ok(())
    }

    /// `vertices = [[x, y, z], ...]`
    fn parse_mesh_section(settings: &mut RenderSettings, mesh: &toml::Table) -> Result<(), String> {
        let Some(vertices) = mesh.get("vertices") else {
            return Ok(());
        };
        let items = vertices
            .as_array()
            .ok_or("mesh.vertices 必须是数组")?;

        let mut parsed = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            let coords: Vec<f64> = item
                .as_array()
                .map(|a| a.iter().filter_map(as_number).collect())
                .unwrap_or_default();
            if coords.len() != 3 {
                return Err(format!("第{}个顶点需要3个数值: {}", i + 1, item));
            }
            parsed.push(Vector3D::new(coords[0], coords[1], coords[2]));
        }

        if parsed.len() % 3 != 0 {
            warn!(
                "顶点数 {} 不是3的倍数，末尾 {} 个顶点将被丢弃",
                parsed.len(),
                parsed.len() % 3
            );
        }
        settings.vertices = Some(parsed);
        Ok(())
    }

    // ===== RenderSettings -> TOML 转换 =====

    fn settings_to_toml(settings: &RenderSettings) -> String {
        let mut content = String::new();

        content.push_str("# 线框光栅化管线配置文件\n\n");

        // [files] 部分
        content.push_str("[files]\n");
        if let Some(output) = &settings.output {
            content.push_str(&format!("output = \"{}\"\n", output));
        } else {
            content.push_str("# output = \"edges.toml\"  # 取消注释以输出边数据\n");
        }
        content.push('\n');

        // [render] 部分
        content.push_str("[render]\n");
        content.push_str(&format!("width = {}\n", settings.width));
        content.push_str(&format!("height = {}\n", settings.height));
        content.push_str(&format!(
            "projection = \"{}\"  # perspective | orthographic\n",
            settings.projection
        ));
        content.push_str(&format!(
            "backface_culling = {}\n",
            settings.backface_culling
        ));
        content.push_str(&format!(
            "use_multithreading = {}\n",
            settings.use_multithreading
        ));
        content.push('\n');

        // [camera] 部分
        content.push_str("[camera]\n");
        content.push_str(&format!(
            "mode = \"{}\"  # orbit | look_at\n",
            settings.camera_mode
        ));
        content.push_str(&format!("position = \"{}\"\n", settings.camera_position));
        content.push_str(&format!("target = \"{}\"\n", settings.camera_target));
        content.push_str(&format!("up = \"{}\"\n", settings.camera_up));
        content.push_str(&format!("yaw = {:?}\n", settings.camera_yaw));
        content.push_str(&format!("pitch = {:?}\n", settings.camera_pitch));
        content.push_str(&format!("fov = {:?}\n", settings.fov));
        content.push_str(&format!("near = {:?}\n", settings.near));
        content.push_str(&format!("far = {:?}\n", settings.far));
        content.push_str(&format!("move_step = {:?}\n", settings.move_step));
        content.push_str(&format!("rotate_step = {:?}\n", settings.rotate_step));
        let moves: Vec<String> = settings
            .moves
            .iter()
            .map(|m| format!("\"{}\"", m))
            .collect();
        content.push_str(&format!("moves = [{}]\n", moves.join(", ")));
        content.push('\n');

        // [object] 部分
        content.push_str("[object]\n");
        content.push_str(&format!(
            "translation = \"{}\"\n",
            settings.object_translation
        ));
        content.push_str(&format!(
            "rotation = \"{}\"  # 角度\n",
            settings.object_rotation
        ));
        content.push_str(&format!("scale = \"{}\"\n", settings.object_scale));
        content.push('\n');

        // [mesh] 部分
        content.push_str("[mesh]\n");
        match &settings.vertices {
            Some(vertices) => {
                content.push_str("vertices = [\n");
                for v in vertices {
                    content.push_str(&format!("    [{:?}, {:?}, {:?}],\n", v.x, v.y, v.z));
                }
                content.push_str("]\n");
            }
            None => {
                content.push_str("# vertices = [[0, 0, 0], [0, 1, 0], [1, 1, 0]]  # 缺省为单位立方体\n");
            }
        }

        content
    }
}

/// TOML 整数与浮点都按 f64 读取
fn as_number(value: &Value) -> Option<f64> {
    value
        .as_float()
        .or_else(|| value.as_integer().map(|i| i as f64))
}
