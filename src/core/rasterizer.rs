use crate::core::error::MathResult;
use crate::geometry::camera::{Camera, ProjectionMode};
use crate::geometry::triangle::Triangle;
use crate::geometry::vector::Vector3D;
use crate::scene::transform::{CameraMode, Transform};
use log::debug;
use rayon::prelude::*;

/// 屏幕空间中的一条边（起点，终点），z 为透传深度
pub type Edge = (Vector3D, Vector3D);

/// 渲染管线配置
#[derive(Debug, Clone, PartialEq)]
pub struct RasterConfig {
    pub width: usize,
    pub height: usize,
    pub projection: ProjectionMode,
    pub camera_mode: CameraMode,
    /// 视场角（角度）
    pub fov: f64,
    pub near: f64,
    pub far: f64,
    pub backface_culling: bool,
    pub use_multithreading: bool,
}

impl Default for RasterConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            projection: ProjectionMode::Perspective,
            camera_mode: CameraMode::Orbit,
            fov: 90.0,
            near: 0.1,
            far: 1000.0,
            backface_culling: true,
            use_multithreading: true,
        }
    }
}

impl RasterConfig {
    pub fn camera(&self) -> Camera {
        Camera::new(
            self.width as f64,
            self.height as f64,
            self.fov,
            self.near,
            self.far,
        )
    }
}

/// 待渲染物体：物体空间三角形 + 摆放
#[derive(Debug, Clone)]
pub struct RenderObject {
    pub triangles: Vec<Triangle>,
    pub transform: Transform,
}

impl RenderObject {
    pub fn new(triangles: Vec<Triangle>, transform: Transform) -> Self {
        Self {
            triangles,
            transform,
        }
    }

    pub fn from_vertices(vertices: &[Vector3D], transform: Transform) -> Self {
        Self::new(Triangle::create_tri(vertices), transform)
    }
}

/// 一个未被剔除的三角形输出的三条边
#[derive(Debug, Clone, PartialEq)]
pub struct TriangleEdges {
    /// 在输入三角形列表中的下标
    pub triangle_index: usize,
    pub edges: [Edge; 3],
}

/// 逐三角形管线：物体 → 世界 → 视图 → 投影 → 光栅坐标 → 背面剔除 → 边
pub struct Rasterizer {
    config: RasterConfig,
    camera: Camera,
}

impl Rasterizer {
    pub fn new(config: RasterConfig) -> Self {
        let camera = config.camera();
        Self { config, camera }
    }

    pub fn config(&self) -> &RasterConfig {
        &self.config
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// 将物体全部三角形变换到 NDC（透视除法已在投影中完成）
    pub fn render(&self, object: &RenderObject, eye: &Transform) -> MathResult<Vec<Triangle>> {
        let model = Camera::model_matrix(&object.transform)?;
        let mut eye = eye.clone();
        eye.camera_mode = self.config.camera_mode;
        let view = Camera::view_matrix(&eye)?;
        let projection = self.config.projection;

        let project = |tri: &Triangle| -> MathResult<Triangle> {
            let mut out = *tri;
            for vertex in out.vertices.iter_mut() {
                let world = vertex.transform(&model)?;
                let viewed = world.transform(&view)?;
                *vertex = self.camera.project(&viewed, projection)?;
            }
            Ok(out)
        };

        if self.config.use_multithreading {
            object.triangles.par_iter().map(project).collect()
        } else {
            object.triangles.iter().map(project).collect()
        }
    }

    /// NDC 到像素坐标；y 取反后交给下游画线器再翻转，z 取反透传
    pub fn to_raster(&self, v: &Vector3D) -> Vector3D {
        let width = self.config.width as f64;
        let height = self.config.height as f64;
        Vector3D::new(
            (v.x + 1.0) * 0.5 * width,
            -(1.0 - (v.y + 1.0) * 0.5) * height,
            -v.z,
        )
    }

    /// 鞋带公式求有向面积（未除以 2），非负即视为背面
    pub fn is_backface(tri: &Triangle) -> bool {
        let n = tri.vertex_count();
        let sum: f64 = (0..n)
            .map(|i| {
                let a = tri[i];
                let b = tri[(i + 1) % n];
                a.x * b.y - a.y * b.x
            })
            .sum();
        sum >= 0.0
    }

    /// 按顶点顺序输出 (v0,v1) (v1,v2) (v2,v0)
    pub fn edges(tri: &Triangle) -> [Edge; 3] {
        [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])]
    }

    /// 完整管线，输出保持输入三角形顺序
    pub fn draw_edges(&self, object: &RenderObject, eye: &Transform) -> MathResult<Vec<TriangleEdges>> {
        let projected = self.render(object, eye)?;

        let to_edges = |(index, tri): (usize, &Triangle)| -> Option<TriangleEdges> {
            if self.config.backface_culling && Self::is_backface(tri) {
                return None;
            }
            let mut raster = *tri;
            for vertex in raster.vertices.iter_mut() {
                *vertex = self.to_raster(vertex);
            }
            Some(TriangleEdges {
                triangle_index: index,
                edges: Self::edges(&raster),
            })
        };

        let visible: Vec<TriangleEdges> = if self.config.use_multithreading {
            projected.par_iter().enumerate().filter_map(to_edges).collect()
        } else {
            projected.iter().enumerate().filter_map(to_edges).collect()
        };

        debug!(
            "渲染 {} 个三角形，剔除 {} 个",
            projected.len(),
            projected.len() - visible.len()
        );
        Ok(visible)
    }
}
