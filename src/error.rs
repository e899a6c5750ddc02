use ilattice3::Point;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CaveGenError {
    #[error("invalid volume dimensions {width}x{height}x{depth}, all must be positive")]
    InvalidDimensions { width: i32, height: i32, depth: i32 },

    #[error("fill percent {0} is outside [0, 100]")]
    InvalidFillPercent(i32),

    #[error("room threshold size {0} is negative")]
    InvalidThreshold(i32),

    #[error("smoothing iteration count {0} is negative")]
    InvalidIterationCount(i32),

    #[error("point {point:?} is outside the volume")]
    OutOfBounds { point: Point },

    #[error("cell map has {actual} cells, expected {expected}")]
    CellMapLength { expected: usize, actual: usize },

    #[error("cell map value {value} at index {index} is not 0 or 1")]
    InvalidCellValue { index: usize, value: u8 },

    #[error("bad cave map spec: {0}")]
    Ron(#[from] ron::Error),
}

pub type Result<T> = std::result::Result<T, CaveGenError>;
