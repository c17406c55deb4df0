use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::error::ConfigError;

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Width of the game grid
    pub grid_width: usize,
    /// Height of the game grid
    pub grid_height: usize,
    /// Initial length of the snake
    pub initial_snake_length: usize,

    // Pacing
    /// Tick interval at the start of a game, in milliseconds
    pub initial_speed_ms: u64,
    /// Lower bound for the tick interval, in milliseconds
    pub min_speed_ms: u64,
    /// How much faster each food makes the game, in milliseconds
    pub speed_step_ms: u64,

    /// Points awarded per food
    pub score_per_food: u32,

    /// Delay between the collision and the game-over notification.
    /// Zero notifies synchronously from the colliding tick.
    pub game_over_delay_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 20,
            grid_height: 15,
            initial_snake_length: 3,
            initial_speed_ms: 150,
            min_speed_ms: 80,
            speed_step_ms: 2,
            score_per_food: 10,
            game_over_delay_ms: 300,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            grid_width: width,
            grid_height: height,
            ..Default::default()
        }
    }

    /// Derive the grid from a drawing surface measured in pixels.
    ///
    /// Partial cells at the right and bottom edges are dropped.
    pub fn from_surface(
        surface_width: usize,
        surface_height: usize,
        cell_size: usize,
    ) -> Result<Self, ConfigError> {
        if cell_size == 0 {
            return Err(ConfigError::ZeroCellSize);
        }
        let config = Self::new(surface_width / cell_size, surface_height / cell_size);
        config.validate()?;
        Ok(config)
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(10, 10)
    }

    /// Same configuration, but game over is reported from the colliding tick
    pub fn with_immediate_game_over(mut self) -> Self {
        self.game_over_delay_ms = 0;
        self
    }

    /// Number of cells on the grid
    pub fn area(&self) -> usize {
        self.grid_width * self.grid_height
    }

    pub fn game_over_delay(&self) -> Duration {
        Duration::from_millis(self.game_over_delay_ms)
    }

    /// Check that a game can be started with this configuration.
    ///
    /// The snake starts with its head on the center column and its body
    /// extending to the left, so the left half of the grid must hold it.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_width == 0 || self.grid_height == 0 {
            return Err(ConfigError::EmptyGrid {
                width: self.grid_width,
                height: self.grid_height,
            });
        }
        if self.initial_snake_length == 0 {
            return Err(ConfigError::EmptySnake);
        }
        if self.grid_width / 2 + 1 < self.initial_snake_length {
            return Err(ConfigError::SnakeDoesNotFit {
                width: self.grid_width,
                length: self.initial_snake_length,
            });
        }
        if self.area() <= self.initial_snake_length {
            return Err(ConfigError::NoRoomForFood {
                width: self.grid_width,
                height: self.grid_height,
                length: self.initial_snake_length,
            });
        }
        if self.min_speed_ms == 0 {
            return Err(ConfigError::ZeroMinSpeed);
        }
        if self.initial_speed_ms < self.min_speed_ms {
            return Err(ConfigError::SpeedBelowMinimum {
                initial_ms: self.initial_speed_ms,
                min_ms: self.min_speed_ms,
            });
        }
        Ok(())
    }
}
