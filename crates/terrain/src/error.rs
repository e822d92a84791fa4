use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TerrainError {
    #[error("invalid heightfield geometry: {0}")]
    InvalidGeometry(&'static str),
    #[error("column {index} is outside a {ncol}-column heightfield")]
    ColumnOutOfRange { index: usize, ncol: usize },
    #[error("position x = {x} maps to column {index}, outside the heightfield")]
    PositionOutOfRange { x: f32, index: f32 },
    #[error("invalid terrain config: {0}")]
    InvalidConfig(String),
}
