//! Game state machine
//!
//! `GameState` holds one board and its progress; every change goes through a
//! transition method that re-derives the won/over flags afterwards.
//! `Game` owns the current state together with the things that outlive a
//! single board: grid size, RNG, reveal delay and the pending reveal timer.

use std::collections::BTreeSet;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::SeedableRng;

use super::card::{is_valid_grid_size, Board, CardId};
use super::settings::{clamp_max_moves, GameError};
use super::time::{RevealTimer, DEFAULT_REVEAL_DELAY};
use crate::config::GameConfig;

/// Board-level phase, derived from the flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Playing,
    Won,
    Lost,
}

/// What a card currently shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardFace {
    Hidden,
    Flipped(u32),
    Solved(u32),
}

/// Result of a card click
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// Nothing changed
    Ignored,
    /// First card of an attempt turned over
    FirstFlip,
    /// The first card was clicked again and put back
    Cancelled,
    /// Second card matched the first
    Matched,
    /// Second card did not match; a reveal delay is now pending
    Mismatched,
}

/// Inputs the front end forwards to the engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    CardClicked(CardId),
    GridSizeChanged(u32),
    MaxMovesChanged(i64),
    Reset,
}

/// State of a single board
#[derive(Debug, Clone)]
pub struct GameState {
    board: Board,
    /// Face-up, unresolved cards in flip order
    flipped: Vec<CardId>,
    solved: BTreeSet<CardId>,
    moves: u32,
    /// 0 = unlimited
    max_moves: u32,
    won: bool,
    over: bool,
    input_locked: bool,
    /// Identifies this board among all boards dealt by one `Game`
    generation: u64,
}

impl GameState {
    /// Fresh state for a dealt board
    pub fn new(board: Board, max_moves: u32, generation: u64) -> Self {
        let mut state = Self {
            board,
            flipped: Vec::with_capacity(2),
            solved: BTreeSet::new(),
            moves: 0,
            max_moves,
            won: false,
            over: false,
            input_locked: false,
            generation,
        };
        state.refresh_flags();
        state
    }

    /// Handle a click on `card_id`
    pub fn on_card_click(&mut self, card_id: CardId) -> ClickOutcome {
        if self.input_locked || self.won || self.over {
            return ClickOutcome::Ignored;
        }
        if card_id >= self.board.len()
            || self.flipped.contains(&card_id)
            || self.solved.contains(&card_id)
        {
            return ClickOutcome::Ignored;
        }

        let outcome = match self.flipped.len() {
            0 => {
                self.flipped.push(card_id);
                ClickOutcome::FirstFlip
            }
            1 => {
                let first = self.flipped[0];
                if first == card_id {
                    self.flipped.clear();
                    self.input_locked = false;
                    ClickOutcome::Cancelled
                } else {
                    self.input_locked = true;
                    self.flipped.push(card_id);
                    self.moves += 1;

                    if self.board.is_pair(first, card_id) {
                        self.solved.insert(first);
                        self.solved.insert(card_id);
                        self.flipped.clear();
                        self.input_locked = false;
                        ClickOutcome::Matched
                    } else {
                        ClickOutcome::Mismatched
                    }
                }
            }
            // Two cards up means a reveal is pending and input is locked
            _ => ClickOutcome::Ignored,
        };

        self.refresh_flags();
        outcome
    }

    /// Hide a mismatched pair again. Returns false when `generation`
    /// belongs to an older board.
    pub fn clear_mismatch(&mut self, generation: u64) -> bool {
        if generation != self.generation {
            return false;
        }
        self.flipped.clear();
        self.input_locked = false;
        self.refresh_flags();
        true
    }

    /// Change the move limit without touching the board.
    /// Negative requests mean unlimited.
    pub fn set_max_moves(&mut self, max_moves: i64) {
        self.max_moves = clamp_max_moves(max_moves);
        self.refresh_flags();
    }

    /// Recompute derived flags. Win is checked first; a loss latches until
    /// the board is replaced.
    fn refresh_flags(&mut self) {
        self.won = !self.board.is_empty() && self.solved.len() == self.board.len();
        if self.max_moves > 0 && self.moves >= self.max_moves {
            self.over = true;
        }
    }

    pub fn phase(&self) -> Phase {
        if self.won {
            Phase::Won
        } else if self.over {
            Phase::Lost
        } else {
            Phase::Playing
        }
    }

    pub fn face(&self, card_id: CardId) -> CardFace {
        let Some(card) = self.board.get(card_id) else {
            return CardFace::Hidden;
        };
        if self.solved.contains(&card_id) {
            CardFace::Solved(card.value)
        } else if self.flipped.contains(&card_id) {
            CardFace::Flipped(card.value)
        } else {
            CardFace::Hidden
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn flipped(&self) -> &[CardId] {
        &self.flipped
    }

    pub fn solved(&self) -> &BTreeSet<CardId> {
        &self.solved
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn max_moves(&self) -> u32 {
        self.max_moves
    }

    pub fn is_won(&self) -> bool {
        self.won
    }

    pub fn is_over(&self) -> bool {
        self.over
    }

    pub fn is_input_locked(&self) -> bool {
        self.input_locked
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// The game engine
pub struct Game {
    state: GameState,
    grid_size: u32,
    reveal_delay: Duration,
    rng: StdRng,
    /// Pending mismatch reveal, if any
    reveal: Option<RevealTimer>,
    /// Generation handed to the next dealt board
    next_generation: u64,
}

impl Game {
    /// Create a game from startup configuration
    pub fn new(config: &GameConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(
            config.grid_size,
            config.max_moves,
            Duration::from_millis(config.reveal_delay_ms),
            rng,
        )
    }

    /// Create a reproducible game with the default reveal delay
    pub fn with_seed(grid_size: u32, max_moves: u32, seed: u64) -> Self {
        Self::with_rng(
            grid_size,
            max_moves,
            DEFAULT_REVEAL_DELAY,
            StdRng::seed_from_u64(seed),
        )
    }

    fn with_rng(grid_size: u32, max_moves: u32, reveal_delay: Duration, rng: StdRng) -> Self {
        let grid_size = if is_valid_grid_size(grid_size) {
            grid_size
        } else {
            log::warn!("Grid size {} out of range, using {}", grid_size, GameConfig::default().grid_size);
            GameConfig::default().grid_size
        };

        let mut game = Self {
            state: GameState::new(Board::default(), max_moves, 0),
            grid_size,
            reveal_delay,
            rng,
            reveal: None,
            next_generation: 1,
        };
        game.initialize();
        game
    }

    /// Deal a new board with the current grid size and move limit.
    /// Any pending reveal from the previous board is dropped.
    pub fn initialize(&mut self) {
        let generation = self.next_generation;
        self.next_generation += 1;

        if let Some(stale) = self.reveal.take() {
            log::debug!("Cancelled pending reveal for board {}", stale.generation());
        }

        let board = Board::deal(self.grid_size, &mut self.rng);
        log::info!(
            "New board {}: {}x{} grid, {} cards, max moves {}",
            generation,
            self.grid_size,
            self.grid_size,
            board.len(),
            self.state.max_moves()
        );
        self.state = GameState::new(board, self.state.max_moves(), generation);
    }

    /// Forward a card click; schedules the reveal on a mismatch
    pub fn on_card_click(&mut self, card_id: CardId) -> ClickOutcome {
        let was = self.state.phase();
        let outcome = self.state.on_card_click(card_id);

        match outcome {
            ClickOutcome::Ignored => log::debug!("Ignored click on card {}", card_id),
            ClickOutcome::FirstFlip => log::debug!("Flipped card {}", card_id),
            ClickOutcome::Cancelled => log::debug!("Put back card {}", card_id),
            ClickOutcome::Matched => log::debug!("Matched pair at move {}", self.state.moves()),
            ClickOutcome::Mismatched => {
                log::debug!("Mismatch at move {}", self.state.moves());
                self.reveal = Some(RevealTimer::new(self.state.generation(), self.reveal_delay));
            }
        }

        if was == Phase::Playing {
            self.log_phase_change();
        }
        outcome
    }

    /// Change the grid size; valid sizes deal a new board
    pub fn set_grid_size(&mut self, grid_size: u32) -> Result<(), GameError> {
        if !is_valid_grid_size(grid_size) {
            return Err(GameError::GridSizeOutOfRange { size: grid_size.into() });
        }
        if grid_size != self.grid_size {
            self.grid_size = grid_size;
            self.initialize();
        }
        Ok(())
    }

    /// Change the move limit on the current board
    pub fn set_max_moves(&mut self, max_moves: i64) {
        let was = self.state.phase();
        self.state.set_max_moves(max_moves);
        if was == Phase::Playing {
            self.log_phase_change();
        }
    }

    /// Advance time; fires the pending reveal once its delay has passed
    pub fn update(&mut self, delta: Duration) {
        let fired = match self.reveal.as_mut() {
            Some(timer) => timer.tick(delta),
            None => false,
        };
        if !fired {
            return;
        }

        if let Some(timer) = self.reveal.take() {
            if !self.state.clear_mismatch(timer.generation()) {
                log::debug!("Discarded stale reveal for board {}", timer.generation());
            }
        }
    }

    /// Dispatch a front-end event
    pub fn handle(&mut self, event: GameEvent) -> Result<(), GameError> {
        match event {
            GameEvent::CardClicked(id) => {
                self.on_card_click(id);
            }
            GameEvent::GridSizeChanged(size) => self.set_grid_size(size)?,
            GameEvent::MaxMovesChanged(max) => self.set_max_moves(max),
            GameEvent::Reset => self.initialize(),
        }
        Ok(())
    }

    fn log_phase_change(&self) {
        match self.state.phase() {
            Phase::Won => log::info!("Board {} won in {} moves", self.state.generation(), self.state.moves()),
            Phase::Lost => log::info!(
                "Board {} lost: {} of {} moves used",
                self.state.generation(),
                self.state.moves(),
                self.state.max_moves()
            ),
            Phase::Playing => {}
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn grid_size(&self) -> u32 {
        self.grid_size
    }

    pub fn reveal_pending(&self) -> bool {
        self.reveal.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DELAY: Duration = DEFAULT_REVEAL_DELAY;

    /// Find two positions holding the same value
    fn find_pair(state: &GameState) -> (CardId, CardId) {
        let cards = state.board().cards();
        for a in cards {
            if state.solved().contains(&a.id) {
                continue;
            }
            if let Some(b) = cards.iter().find(|b| b.id != a.id && b.value == a.value) {
                return (a.id, b.id);
            }
        }
        panic!("no unsolved pair left");
    }

    /// Find two positions holding different values
    fn find_mismatch(state: &GameState) -> (CardId, CardId) {
        let cards = state.board().cards();
        let a = cards[0];
        let b = cards.iter().find(|b| b.value != a.value).expect("board has at least two values");
        (a.id, b.id)
    }

    fn solve_all(game: &mut Game) {
        while !game.state().is_won() {
            let (a, b) = find_pair(game.state());
            game.on_card_click(a);
            game.on_card_click(b);
        }
    }

    #[test]
    fn test_first_flip_counts_no_move() {
        let mut game = Game::with_seed(4, 0, 1);
        assert_eq!(game.on_card_click(0), ClickOutcome::FirstFlip);
        assert_eq!(game.state().moves(), 0);
        assert_eq!(game.state().flipped(), &[0]);
        assert!(!game.state().is_input_locked());
    }

    #[test]
    fn test_same_card_twice_is_noop() {
        let mut game = Game::with_seed(4, 0, 1);
        game.on_card_click(3);
        assert_eq!(game.on_card_click(3), ClickOutcome::Ignored);
        assert_eq!(game.state().flipped(), &[3]);
        assert_eq!(game.state().moves(), 0);
    }

    #[test]
    fn test_out_of_range_click_ignored() {
        let mut game = Game::with_seed(2, 0, 1);
        assert_eq!(game.on_card_click(99), ClickOutcome::Ignored);
        assert!(game.state().flipped().is_empty());
    }

    #[test]
    fn test_match_unlocks_and_solves() {
        let mut game = Game::with_seed(4, 0, 5);
        let (a, b) = find_pair(game.state());

        game.on_card_click(a);
        assert_eq!(game.on_card_click(b), ClickOutcome::Matched);

        let state = game.state();
        assert_eq!(state.moves(), 1);
        assert_eq!(state.solved().len(), 2);
        assert!(state.flipped().is_empty());
        assert!(!state.is_input_locked());
        assert!(!game.reveal_pending());
        assert_eq!(state.face(a), CardFace::Solved(state.board().cards()[a].value));
    }

    #[test]
    fn test_mismatch_locks_until_reveal() {
        let mut game = Game::with_seed(4, 0, 5);
        let (a, b) = find_mismatch(game.state());
        let other = (0..game.state().board().len()).find(|&i| i != a && i != b).unwrap();

        game.on_card_click(a);
        assert_eq!(game.on_card_click(b), ClickOutcome::Mismatched);
        assert_eq!(game.state().moves(), 1);
        assert!(game.state().is_input_locked());
        assert_eq!(game.state().flipped(), &[a, b]);

        // Locked globally while the reveal is pending
        assert_eq!(game.on_card_click(other), ClickOutcome::Ignored);

        game.update(DELAY / 2);
        assert!(game.state().is_input_locked());

        game.update(DELAY / 2);
        assert!(!game.state().is_input_locked());
        assert!(game.state().flipped().is_empty());
        assert!(game.state().solved().is_empty());
        assert_eq!(game.state().face(a), CardFace::Hidden);
        assert_eq!(game.state().moves(), 1);
    }

    #[test]
    fn test_two_by_two_grid_has_two_pairs() {
        let mut game = Game::with_seed(2, 0, 9);
        assert_eq!(game.state().board().len(), 4);

        solve_all(&mut game);
        assert!(game.state().is_won());
        assert_eq!(game.state().moves(), 2);
    }

    #[test]
    fn test_single_pair_board_wins_after_one_move() {
        let mut state = GameState::new(Board::from_values(&[1, 1]), 0, 1);
        state.on_card_click(0);
        assert_eq!(state.on_card_click(1), ClickOutcome::Matched);
        assert!(state.is_won());
        assert_eq!(state.moves(), 1);
        assert_eq!(state.phase(), Phase::Won);
    }

    #[test]
    fn test_clicks_ignored_after_win() {
        let mut state = GameState::new(Board::from_values(&[1, 2, 2, 1]), 0, 1);
        state.on_card_click(0);
        state.on_card_click(3);
        state.on_card_click(1);
        state.on_card_click(2);
        assert!(state.is_won());
        assert_eq!(state.on_card_click(0), ClickOutcome::Ignored);
        assert_eq!(state.moves(), 2);
    }

    #[test]
    fn test_max_moves_loss() {
        let mut state = GameState::new(Board::from_values(&[1, 2, 3, 1, 2, 3]), 3, 1);
        for _ in 0..3 {
            state.on_card_click(0);
            state.on_card_click(1);
            assert!(state.clear_mismatch(1));
        }
        assert!(state.is_over());
        assert!(!state.is_won());
        assert_eq!(state.phase(), Phase::Lost);
        assert_eq!(state.on_card_click(0), ClickOutcome::Ignored);
    }

    #[test]
    fn test_winning_last_move_beats_limit() {
        let mut state = GameState::new(Board::from_values(&[1, 2, 1, 2]), 3, 1);
        state.on_card_click(0);
        state.on_card_click(1);
        state.clear_mismatch(1);
        state.on_card_click(0);
        state.on_card_click(2);
        state.on_card_click(1);
        state.on_card_click(3);

        assert_eq!(state.moves(), 3);
        assert!(state.is_won());
        assert!(state.is_over());
        assert_eq!(state.phase(), Phase::Won);
    }

    #[test]
    fn test_one_move_limit_on_four_by_four() {
        let mut game = Game::with_seed(4, 1, 11);
        let (a, b) = find_pair(game.state());
        game.on_card_click(a);
        game.on_card_click(b);

        let state = game.state();
        assert!(state.is_over());
        assert!(!state.is_won());
        assert_eq!(state.solved().len(), 2);
        assert_eq!(state.board().len(), 16);
    }

    #[test]
    fn test_lowering_limit_ends_game() {
        let mut game = Game::with_seed(4, 0, 2);
        let (a, b) = find_mismatch(game.state());
        game.on_card_click(a);
        game.on_card_click(b);
        game.update(DELAY);

        game.set_max_moves(1);
        assert!(game.state().is_over());
        assert_eq!(game.state().moves(), 1);
    }

    #[test]
    fn test_loss_latches_when_limit_raised() {
        let mut game = Game::with_seed(4, 1, 2);
        let (a, b) = find_mismatch(game.state());
        game.on_card_click(a);
        game.on_card_click(b);
        game.update(DELAY);
        assert!(game.state().is_over());

        game.set_max_moves(0);
        assert!(game.state().is_over());
        assert_eq!(game.state().max_moves(), 0);
    }

    #[test]
    fn test_negative_max_moves_clamped() {
        let mut game = Game::with_seed(4, 5, 2);
        game.set_max_moves(-4);
        assert_eq!(game.state().max_moves(), 0);
        assert!(!game.state().is_over());
    }

    #[test]
    fn test_set_max_moves_keeps_board() {
        let mut game = Game::with_seed(4, 0, 2);
        game.on_card_click(0);
        let board = game.state().board().clone();
        game.set_max_moves(10);
        assert_eq!(game.state().board(), &board);
        assert_eq!(game.state().flipped(), &[0]);
    }

    #[test]
    fn test_grid_size_rejected_out_of_range() {
        let mut game = Game::with_seed(4, 0, 2);
        let generation = game.state().generation();

        assert_eq!(game.set_grid_size(1), Err(GameError::GridSizeOutOfRange { size: 1 }));
        assert_eq!(game.set_grid_size(11), Err(GameError::GridSizeOutOfRange { size: 11 }));
        assert_eq!(game.grid_size(), 4);
        assert_eq!(game.state().generation(), generation);
    }

    #[test]
    fn test_grid_size_change_redeals() {
        let mut game = Game::with_seed(4, 3, 2);
        game.on_card_click(0);

        game.set_grid_size(3).unwrap();
        let state = game.state();
        assert_eq!(game.grid_size(), 3);
        assert_eq!(state.board().len(), 8);
        assert!(state.flipped().is_empty());
        assert_eq!(state.moves(), 0);
        assert_eq!(state.max_moves(), 3);
    }

    #[test]
    fn test_same_grid_size_keeps_board() {
        let mut game = Game::with_seed(4, 0, 2);
        game.on_card_click(0);
        let generation = game.state().generation();

        game.set_grid_size(4).unwrap();
        assert_eq!(game.state().generation(), generation);
        assert_eq!(game.state().flipped(), &[0]);
    }

    #[test]
    fn test_reset_cancels_pending_reveal() {
        let mut game = Game::with_seed(4, 0, 3);
        let (a, b) = find_mismatch(game.state());
        game.on_card_click(a);
        game.on_card_click(b);
        assert!(game.reveal_pending());

        game.handle(GameEvent::Reset).unwrap();
        assert!(!game.reveal_pending());

        game.on_card_click(0);
        game.update(DELAY * 2);
        assert_eq!(game.state().flipped(), &[0]);
        assert_eq!(game.state().moves(), 0);
    }

    #[test]
    fn test_stale_generation_is_discarded() {
        let mut state = GameState::new(Board::from_values(&[1, 2, 1, 2]), 0, 7);
        state.on_card_click(0);
        state.on_card_click(1);

        assert!(!state.clear_mismatch(6));
        assert!(state.is_input_locked());
        assert!(state.clear_mismatch(7));
        assert!(!state.is_input_locked());
    }

    #[test]
    fn test_handle_dispatch() {
        let mut game = Game::with_seed(4, 0, 4);
        game.handle(GameEvent::CardClicked(2)).unwrap();
        assert_eq!(game.state().flipped(), &[2]);

        game.handle(GameEvent::MaxMovesChanged(7)).unwrap();
        assert_eq!(game.state().max_moves(), 7);

        assert!(game.handle(GameEvent::GridSizeChanged(0)).is_err());
        game.handle(GameEvent::GridSizeChanged(6)).unwrap();
        assert_eq!(game.state().board().len(), 36);
        assert_eq!(game.state().max_moves(), 7);
    }

    #[test]
    fn test_config_seed_is_reproducible() {
        let config = GameConfig {
            seed: Some(99),
            ..GameConfig::default()
        };
        let a = Game::new(&config);
        let b = Game::new(&config);
        assert_eq!(a.state().board(), b.state().board());
    }
}
