//! Game module - Core game logic and state management

mod card;
mod settings;
mod state;
mod time;

pub use card::{
    is_valid_grid_size, pair_count, Board, Card, CardId, MAX_GRID_SIZE, MIN_GRID_SIZE,
};
pub use settings::{clamp_max_moves, parse_grid_size, parse_leading_int, parse_max_moves, GameError};
pub use state::{CardFace, ClickOutcome, Game, GameEvent, GameState, Phase};
pub use time::{RevealTimer, DEFAULT_REVEAL_DELAY};
