use thiserror::Error;

/// 矩阵/向量运算的领域错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error(
        "{operation} requires equal shapes, got {left_rows}x{left_cols} and {right_rows}x{right_cols}"
    )]
    DimensionMismatch {
        operation: &'static str,
        left_rows: usize,
        left_cols: usize,
        right_rows: usize,
        right_cols: usize,
    },
    #[error(
        "number of columns of first ({left_cols}) is not equal to the number of rows in the second matrix ({right_rows})"
    )]
    ColumnRowMismatch { left_cols: usize, right_rows: usize },
    #[error("attempt to decompose a non-square {rows}x{cols} matrix")]
    NotSquare { rows: usize, cols: usize },
    #[error("cannot use Doolittle's method: no non-zero pivot in column {column}")]
    Singular { column: usize },
    #[error("invalid shape: expected {expected}, got {actual}")]
    InvalidShape { expected: String, actual: String },
}

pub type MathResult<T> = Result<T, MathError>;
