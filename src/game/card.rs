//! Cards and board generation
//!
//! A board holds `pair_count * 2` cards laid out row by row on a square grid.
//! Each pair value appears exactly twice.

use rand::seq::SliceRandom;
use rand::Rng;

/// Position index of a card on the board
pub type CardId = usize;

/// Smallest accepted grid edge
pub const MIN_GRID_SIZE: u32 = 2;
/// Largest accepted grid edge
pub const MAX_GRID_SIZE: u32 = 10;

/// A single card
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Card {
    /// Stable position on the board
    pub id: CardId,
    /// Pair identifier, 1..=pair_count
    pub value: u32,
}

/// Number of pairs that fit on a `grid_size` x `grid_size` grid
pub fn pair_count(grid_size: u32) -> u32 {
    grid_size * grid_size / 2
}

/// Whether a grid size is inside the accepted range
pub fn is_valid_grid_size(grid_size: u32) -> bool {
    (MIN_GRID_SIZE..=MAX_GRID_SIZE).contains(&grid_size)
}

/// An immutable, shuffled set of cards
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Board {
    cards: Vec<Card>,
}

impl Board {
    /// Deal a fresh board for the given grid size.
    ///
    /// When `grid_size²` is odd the last grid cell stays empty.
    pub fn deal(grid_size: u32, rng: &mut impl Rng) -> Self {
        let pairs = pair_count(grid_size);
        let mut values: Vec<u32> = (1..=pairs).chain(1..=pairs).collect();
        values.shuffle(rng);

        let cards = values
            .into_iter()
            .enumerate()
            .map(|(id, value)| Card { id, value })
            .collect();

        Self { cards }
    }

    /// Build a board from explicit values in position order
    pub fn from_values(values: &[u32]) -> Self {
        Self {
            cards: values
                .iter()
                .enumerate()
                .map(|(id, &value)| Card { id, value })
                .collect(),
        }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn get(&self, id: CardId) -> Option<&Card> {
        self.cards.get(id)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Whether two positions hold the same pair value
    pub fn is_pair(&self, a: CardId, b: CardId) -> bool {
        match (self.get(a), self.get(b)) {
            (Some(a), Some(b)) => a.value == b.value,
            _ => false,
        }
    }
}
