//! Pairflip - A terminal memory-matching card game
//!
//! Turn cards over two at a time and find every pair before
//! the move limit runs out.

pub mod config;
pub mod game;
pub mod ui;

// Re-export commonly used types
pub use config::GameConfig;
pub use game::{Game, GameState, Phase};
