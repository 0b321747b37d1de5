//! Card grid widget for ratatui
//!
//! Renders the board as a square grid of cards, one card per cell.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Widget},
};

use crate::game::{CardFace, CardId, GameState};

/// Columns taken by one card, including the gap to its right neighbour
pub const CELL_WIDTH: u16 = 6;
/// Rows taken by one card, including the gap below it
pub const CELL_HEIGHT: u16 = 2;
/// Visible width of a card face
const CARD_WIDTH: u16 = CELL_WIDTH - 1;

/// Grid cursor position
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GridCursor {
    pub x: u32,
    pub y: u32,
}

impl GridCursor {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Card under the cursor on a grid `grid_size` wide
    pub fn card_id(&self, grid_size: u32) -> CardId {
        (self.y * grid_size + self.x) as CardId
    }

    /// Point the cursor at a card
    pub fn set_card(&mut self, card_id: CardId, grid_size: u32) {
        let id = card_id as u32;
        self.x = id % grid_size;
        self.y = id / grid_size;
    }

    pub fn move_up(&mut self) {
        if self.y > 0 {
            self.y -= 1;
        }
    }

    pub fn move_down(&mut self, grid_size: u32, card_count: usize) {
        if self.y + 1 < grid_size && ((self.y + 1) * grid_size + self.x) < card_count as u32 {
            self.y += 1;
        }
    }

    pub fn move_left(&mut self) {
        if self.x > 0 {
            self.x -= 1;
        }
    }

    pub fn move_right(&mut self, grid_size: u32, card_count: usize) {
        if self.x + 1 < grid_size && (self.y * grid_size + self.x + 1) < card_count as u32 {
            self.x += 1;
        }
    }

    /// Pull the cursor back onto the board after the grid changed
    pub fn clamp(&mut self, grid_size: u32, card_count: usize) {
        if card_count == 0 {
            *self = Self::default();
            return;
        }
        self.x = self.x.min(grid_size - 1);
        self.y = self.y.min(grid_size - 1);
        if self.card_id(grid_size) >= card_count {
            self.set_card(card_count - 1, grid_size);
        }
    }
}

/// Size of the bordered area needed to draw a grid
pub fn grid_area_size(grid_size: u32) -> (u16, u16) {
    let n = grid_size as u16;
    // Drop the trailing gap, add the border
    (n * CELL_WIDTH - 1 + 2, n * CELL_HEIGHT - 1 + 2)
}

/// Card drawn at a terminal position inside `inner`, if any
pub fn card_at(inner: Rect, grid_size: u32, card_count: usize, column: u16, row: u16) -> Option<CardId> {
    if column < inner.x || row < inner.y {
        return None;
    }
    let dx = column - inner.x;
    let dy = row - inner.y;

    // Gaps between cards are not clickable
    if dx % CELL_WIDTH == CELL_WIDTH - 1 || dy % CELL_HEIGHT == CELL_HEIGHT - 1 {
        return None;
    }

    let x = (dx / CELL_WIDTH) as u32;
    let y = (dy / CELL_HEIGHT) as u32;
    if x >= grid_size || y >= grid_size {
        return None;
    }

    let id = GridCursor::new(x, y).card_id(grid_size);
    (id < card_count).then_some(id)
}

/// Widget for rendering the board
pub struct CardGridWidget<'a> {
    state: &'a GameState,
    grid_size: u32,
    cursor: Option<GridCursor>,
}

impl<'a> CardGridWidget<'a> {
    pub fn new(state: &'a GameState, grid_size: u32) -> Self {
        Self {
            state,
            grid_size,
            cursor: None,
        }
    }

    /// Highlight the card under the cursor
    pub fn cursor(mut self, cursor: Option<GridCursor>) -> Self {
        self.cursor = cursor;
        self
    }

    /// Label and style for one card
    fn card_style(&self, card_id: CardId) -> (String, Style) {
        let (label, style) = match self.state.face(card_id) {
            CardFace::Hidden => (
                "?".to_string(),
                Style::default().fg(Color::DarkGray).bg(Color::Gray),
            ),
            CardFace::Flipped(value) => (
                value.to_string(),
                Style::default().fg(Color::White).bg(Color::Blue).add_modifier(Modifier::BOLD),
            ),
            CardFace::Solved(value) => (
                value.to_string(),
                Style::default().fg(Color::White).bg(Color::Green).add_modifier(Modifier::BOLD),
            ),
        };

        let is_cursor = self
            .cursor
            .is_some_and(|c| c.card_id(self.grid_size) == card_id);
        let style = if is_cursor {
            style.add_modifier(Modifier::REVERSED)
        } else {
            style
        };

        (format!("{:^width$}", label, width = CARD_WIDTH as usize), style)
    }
}

impl<'a> Widget for CardGridWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Rgb(100, 100, 120)));

        let inner = block.inner(area);
        block.render(area, buf);

        for card in self.state.board().cards() {
            let x = (card.id as u32 % self.grid_size) as u16;
            let y = (card.id as u32 / self.grid_size) as u16;
            let cell_x = inner.x + x * CELL_WIDTH;
            let cell_y = inner.y + y * CELL_HEIGHT;

            if cell_x + CARD_WIDTH > inner.x + inner.width || cell_y >= inner.y + inner.height {
                continue;
            }

            let (label, style) = self.card_style(card.id);
            buf.set_string(cell_x, cell_y, label, style);
        }
    }
}
