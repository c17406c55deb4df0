//! Grid Snake - a single-player snake game with a local score history
//!
//! This library provides:
//! - Core game logic driven through a scheduler port (game module)
//! - Local history of finished games (history module)
//! - TUI rendering and keyboard input (render, input modules)
//! - The interactive terminal session (modes module)

pub mod game;
pub mod history;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
