use crate::geometry::vector::{Coordinate2D, Vector3D};
use std::fmt;
use std::ops::{Index, IndexMut};

/// 三顶点图元，顶点顺序决定绕序与法线方向
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Triangle {
    pub vertices: [Vector3D; 3],
}

impl Triangle {
    pub const VERTEX_COUNT: usize = 3;

    pub fn new(v0: Vector3D, v1: Vector3D, v2: Vector3D) -> Self {
        Self {
            vertices: [v0, v1, v2],
        }
    }

    pub fn vertex_count(&self) -> usize {
        Self::VERTEX_COUNT
    }

    /// 外法线 normalize(cross(v1 - v0, v2 - v0))
    pub fn normal(&self) -> Vector3D {
        let u = self.vertices[1] - self.vertices[0];
        let v = self.vertices[2] - self.vertices[0];
        u.cross(&v).normalize()
    }

    /// 逆序顶点，翻转绕序
    pub fn reversed(&self) -> Self {
        Self::new(self.vertices[2], self.vertices[1], self.vertices[0])
    }

    /// 顶点取整后的二维坐标
    pub fn plot_point(&self, id: usize) -> Option<Coordinate2D> {
        self.vertices.get(id).map(|&v| Coordinate2D::from(v))
    }

    /// 按步长 3 把扁平顶点流分组为三角形（假定顺时针绕序），不足 3 个的尾部顶点丢弃
    pub fn create_tri(vertices: &[Vector3D]) -> Vec<Triangle> {
        vertices
            .chunks_exact(3)
            .map(|chunk| Triangle::new(chunk[0], chunk[1], chunk[2]))
            .collect()
    }
}

impl Index<usize> for Triangle {
    type Output = Vector3D;

    fn index(&self, i: usize) -> &Vector3D {
        &self.vertices[i]
    }
}

impl IndexMut<usize> for Triangle {
    fn index_mut(&mut self, i: usize) -> &mut Vector3D {
        &mut self.vertices[i]
    }
}

impl fmt::Display for Triangle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "1: {} 2: {} 3: {}",
            self.vertices[0], self.vertices[1], self.vertices[2]
        )
    }
}

/// 单位立方体的扁平顶点流，每面两个三角形，从外侧看为顺时针
pub fn cube_vertices() -> Vec<Vector3D> {
    const FACES: [[f64; 3]; 36] = [
        // 南 (z = 0)
        [0.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
        [1.0, 1.0, 0.0],
        [0.0, 0.0, 0.0],
        [1.0, 1.0, 0.0],
        [1.0, 0.0, 0.0],
        // 东 (x = 1)
        [1.0, 0.0, 0.0],
        [1.0, 1.0, 0.0],
        [1.0, 1.0, 1.0],
        [1.0, 0.0, 0.0],
        [1.0, 1.0, 1.0],
        [1.0, 0.0, 1.0],
        // 北 (z = 1)
        [1.0, 0.0, 1.0],
        [1.0, 1.0, 1.0],
        [0.0, 1.0, 1.0],
        [1.0, 0.0, 1.0],
        [0.0, 1.0, 1.0],
        [0.0, 0.0, 1.0],
        // 西 (x = 0)
        [0.0, 0.0, 1.0],
        [0.0, 1.0, 1.0],
        [0.0, 1.0, 0.0],
        [0.0, 0.0, 1.0],
        [0.0, 1.0, 0.0],
        [0.0, 0.0, 0.0],
        // 顶 (y = 1)
        [0.0, 1.0, 0.0],
        [0.0, 1.0, 1.0],
        [1.0, 1.0, 1.0],
        [0.0, 1.0, 0.0],
        [1.0, 1.0, 1.0],
        [1.0, 1.0, 0.0],
        // 底 (y = 0)
        [1.0, 0.0, 1.0],
        [0.0, 0.0, 1.0],
        [0.0, 0.0, 0.0],
        [1.0, 0.0, 1.0],
        [0.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
    ];
    FACES
        .iter()
        .map(|[x, y, z]| Vector3D::new(*x, *y, *z))
        .collect()
}
