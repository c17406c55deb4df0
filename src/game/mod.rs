//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! Time only enters through the [`TickScheduler`] port, so a game can be played
//! against the wall clock or stepped by hand.

pub mod config;
pub mod direction;
pub mod engine;
pub mod error;
pub mod scheduler;
pub mod state;
pub mod step;

// Re-export commonly used types
pub use config::GameConfig;
pub use direction::Direction;
pub use engine::{EngineStatus, GameEngine, GameOutcome, GameOverReport, Phase};
pub use error::ConfigError;
pub use scheduler::{ManualScheduler, RealtimeScheduler, TickHandle, TickScheduler};
pub use state::{CollisionType, GameState, Position, Snake};
pub use step::{StepInfo, StepResult};
