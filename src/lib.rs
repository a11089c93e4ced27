//! 软件三维变换与线框光栅化管线
//!
//! 行向量约定（`v' = v·M`）贯穿全部矩阵构造：平移位于最后一行。
//! 管线按 物体 → 世界 → 视图 → 投影 → 光栅 的顺序处理每个三角形，
//! 剔除背面后输出屏幕空间的边，供外部画线器使用。

pub mod core;
pub mod geometry;
pub mod io;
pub mod scene;

pub use crate::core::error::{MathError, MathResult};
pub use crate::core::matrix::Matrix;
pub use crate::core::rasterizer::{RasterConfig, Rasterizer, RenderObject, TriangleEdges};
pub use crate::geometry::camera::{Camera, ProjectionMode};
pub use crate::geometry::triangle::Triangle;
pub use crate::geometry::vector::{Coordinate2D, Vector2D, Vector3D};
pub use crate::scene::transform::{CameraAction, CameraMode, Transform};
