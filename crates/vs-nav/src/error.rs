use thiserror::Error;

#[derive(Debug, Error)]
pub enum NavError {
    #[error("walkable area {index} has invalid bounds: min ({min_x}, {min_z}) max ({max_x}, {max_z})")]
    InvalidBounds {
        index: usize,
        min_x: f32,
        min_z: f32,
        max_x: f32,
        max_z: f32,
    },

    #[error("navigation area index {0} is out of range (max 31)")]
    AreaOutOfRange(u8),

    #[error("navigation surface has no walkable areas")]
    Empty,
}

pub type NavResult<T> = Result<T, NavError>;
