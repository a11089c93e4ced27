pub mod error;
pub mod matrix;
pub mod matrix_inverse;
pub mod rasterizer;
