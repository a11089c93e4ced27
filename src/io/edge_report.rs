use crate::core::rasterizer::TriangleEdges;
use crate::geometry::vector::Vector3D;
use crate::io::render_settings::RenderSettings;
use serde::Serialize;
use std::path::Path;

/// 单条屏幕空间边
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeRecord {
    pub triangle: usize,
    pub from: [f64; 3],
    pub to: [f64; 3],
}

/// 一次渲染的边数据，交给外部画线器使用
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeReport {
    pub width: usize,
    pub height: usize,
    pub projection: String,
    pub camera_mode: String,
    pub triangle_count: usize,
    pub visible_count: usize,
    pub edges: Vec<EdgeRecord>,
}

fn to_array(v: &Vector3D) -> [f64; 3] {
    [v.x, v.y, v.z]
}

impl EdgeReport {
    pub fn new(settings: &RenderSettings, triangle_count: usize, visible: &[TriangleEdges]) -> Self {
        let edges = visible
            .iter()
            .flat_map(|tri| {
                tri.edges.iter().map(move |(from, to)| EdgeRecord {
                    triangle: tri.triangle_index,
                    from: to_array(from),
                    to: to_array(to),
                })
            })
            .collect();

        Self {
            width: settings.width,
            height: settings.height,
            projection: settings.projection.to_string(),
            camera_mode: settings.camera_mode.to_string(),
            triangle_count,
            visible_count: visible.len(),
            edges,
        }
    }

    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string(self).map_err(|e| format!("序列化边数据失败: {}", e))
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), String> {
        let content = self.to_toml()?;
        std::fs::write(path.as_ref(), content).map_err(|e| format!("写入边数据失败: {}", e))
    }
}
