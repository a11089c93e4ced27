// geometry/mod.rs
// 向量、变换矩阵、相机与三角形
pub mod camera;
pub mod transform;
pub mod triangle;
pub mod vector;
