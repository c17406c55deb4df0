//! Configuration errors reported when an engine is built

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Grid must have a positive size, got {width}x{height}")]
    EmptyGrid { width: usize, height: usize },

    #[error("Cell size must be positive")]
    ZeroCellSize,

    #[error("Initial snake length must be at least 1")]
    EmptySnake,

    #[error("A snake of length {length} does not fit left of the center of a grid {width} cells wide")]
    SnakeDoesNotFit { width: usize, length: usize },

    #[error("Grid {width}x{height} leaves no free cell for food next to a snake of length {length}")]
    NoRoomForFood {
        width: usize,
        height: usize,
        length: usize,
    },

    #[error("Minimum tick interval must be positive")]
    ZeroMinSpeed,

    #[error("Initial tick interval {initial_ms}ms is below the minimum {min_ms}ms")]
    SpeedBelowMinimum { initial_ms: u64, min_ms: u64 },
}
