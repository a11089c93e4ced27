use crate::geometry::camera::ProjectionMode;
use crate::io::config_loader::TomlConfigLoader;
use crate::io::render_settings::{RenderSettings, parse_moves};
use crate::scene::transform::CameraMode;
use clap::Parser;
use log::info;

/// 极简CLI - 以配置文件为主，少量参数覆盖
#[derive(Parser, Debug)]
#[command(name = "wireraster")]
#[command(about = "TOML驱动的线框光栅化管线，输出屏幕空间三角形边")]
pub struct SimpleCli {
    /// 配置文件路径（TOML格式）
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<String>,

    /// 使用示例配置（临时创建并加载）
    #[arg(long)]
    pub use_example_config: bool,

    /// 使用正交投影
    #[arg(long)]
    pub orthographic: bool,

    /// 相机模式: orbit | look-at
    #[arg(long, value_name = "MODE")]
    pub camera_mode: Option<String>,

    /// 渲染前执行的相机动作，逗号分隔（如 up,rotate-left,forward）
    #[arg(long, value_name = "ACTIONS")]
    pub moves: Option<String>,

    /// 边数据输出文件（TOML）
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<String>,
}

impl SimpleCli {
    /// 解析命令行并返回最终的 RenderSettings
    pub fn process() -> Result<RenderSettings, String> {
        Self::parse().into_settings()
    }

    pub fn into_settings(self) -> Result<RenderSettings, String> {
        let mut settings = if self.use_example_config {
            let temp_config_path = "temp_example_config.toml";

            TomlConfigLoader::create_example_config(temp_config_path)
                .map_err(|e| format!("创建示例配置失败: {}", e))?;
            info!("已创建临时示例配置: {}", temp_config_path);

            TomlConfigLoader::load_from_file(temp_config_path)
                .map_err(|e| format!("加载示例配置失败: {}", e))?
        } else if let Some(config_path) = &self.config {
            info!("加载配置文件: {}", config_path);
            TomlConfigLoader::load_from_file(config_path)
                .map_err(|e| format!("配置文件加载失败: {}", e))?
        } else {
            info!("使用默认设置");
            RenderSettings::default()
        };

        // 命令行参数覆盖配置文件
        if self.orthographic {
            settings.projection = ProjectionMode::Orthographic;
        }
        if let Some(mode) = &self.camera_mode {
            settings.camera_mode = mode.parse::<CameraMode>()?;
        }
        if let Some(moves) = &self.moves {
            settings.moves = parse_moves(moves)?;
        }
        if self.output.is_some() {
            settings.output = self.output;
        }

        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::transform::CameraAction;

    #[test]
    fn flags_override_defaults() {
        let cli = SimpleCli::try_parse_from([
            "wireraster",
            "--orthographic",
            "--camera-mode",
            "look-at",
            "--moves",
            "up,rotate-left",
            "-o",
            "edges.toml",
        ])
        .unwrap();
        let settings = cli.into_settings().unwrap();
        assert_eq!(settings.projection, ProjectionMode::Orthographic);
        assert_eq!(settings.camera_mode, CameraMode::LookAt);
        assert_eq!(
            settings.moves,
            vec![CameraAction::Up, CameraAction::RotateLeft]
        );
        assert_eq!(settings.output.as_deref(), Some("edges.toml"));
    }

    #[test]
    fn unknown_mode_is_an_error() {
        let cli = SimpleCli::try_parse_from(["wireraster", "--camera-mode", "fly"]).unwrap();
        assert!(cli.into_settings().is_err());
    }

    #[test]
    fn no_flags_gives_defaults() {
        let cli = SimpleCli::try_parse_from(["wireraster"]).unwrap();
        assert_eq!(cli.into_settings().unwrap(), RenderSettings::default());
    }

    #[test]
    fn missing_config_file_is_reported() {
        let cli =
            SimpleCli::try_parse_from(["wireraster", "--config", "/nonexistent/wireraster.toml"])
                .unwrap();
        let err = cli.into_settings().unwrap_err();
        assert!(err.contains("配置文件加载失败"));
    }
}
