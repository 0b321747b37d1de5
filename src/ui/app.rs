//! Main UI Application
//!
//! Draws the board and settings, and turns key and mouse input into
//! engine events.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::game::{parse_grid_size, parse_max_moves, Game, GameEvent, Phase};
use super::widgets::{
    card_at, grid_area_size, CardGridWidget, GridCursor, NumberField, NumberFieldWidget,
};

const GRID_FIELD_WIDTH: u16 = 24;
const MAX_FIELD_WIDTH: u16 = 32;
const BUTTON_WIDTH: u16 = 16;

/// Which control receives key input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Board,
    GridSize,
    MaxMoves,
    ResetButton,
}

impl Focus {
    fn next(self) -> Self {
        match self {
            Focus::Board => Focus::GridSize,
            Focus::GridSize => Focus::MaxMoves,
            Focus::MaxMoves => Focus::ResetButton,
            Focus::ResetButton => Focus::Board,
        }
    }

    fn prev(self) -> Self {
        match self {
            Focus::Board => Focus::ResetButton,
            Focus::GridSize => Focus::Board,
            Focus::MaxMoves => Focus::GridSize,
            Focus::ResetButton => Focus::MaxMoves,
        }
    }
}

/// Screen regions from the last frame, used for mouse hit testing
#[derive(Debug, Clone, Copy, Default)]
struct HitAreas {
    board_inner: Rect,
    grid_field: Rect,
    max_field: Rect,
    reset_button: Rect,
}

/// Main UI application
pub struct App {
    focus: Focus,
    cursor: GridCursor,
    grid_size_field: NumberField,
    max_moves_field: NumberField,
    areas: HitAreas,
}

impl App {
    pub fn new(game: &Game) -> Self {
        Self {
            focus: Focus::Board,
            cursor: GridCursor::default(),
            grid_size_field: NumberField::new(game.grid_size()),
            max_moves_field: NumberField::new(game.state().max_moves()),
            areas: HitAreas::default(),
        }
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn cursor(&self) -> GridCursor {
        self.cursor
    }

    /// Handle a key press. Returns true when the player wants to quit.
    pub fn handle_input(&mut self, key: KeyEvent, game: &mut Game) -> Result<bool> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Ok(true);
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return Ok(true),
            KeyCode::Char('r') => {
                self.reset(game);
                return Ok(false);
            }
            KeyCode::Tab => {
                self.set_focus(self.focus.next(), game);
                return Ok(false);
            }
            KeyCode::BackTab => {
                self.set_focus(self.focus.prev(), game);
                return Ok(false);
            }
            _ => {}
        }

        match self.focus {
            Focus::Board => self.handle_board_input(key, game),
            Focus::GridSize => self.handle_grid_size_input(key, game),
            Focus::MaxMoves => self.handle_max_moves_input(key, game),
            Focus::ResetButton => {
                if matches!(key.code, KeyCode::Enter | KeyCode::Char(' ')) {
                    self.reset(game);
                }
            }
        }
        Ok(false)
    }

    /// Handle a mouse event against the last rendered frame
    pub fn handle_mouse(&mut self, mouse: MouseEvent, game: &mut Game) {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }
        let pos = Position::new(mouse.column, mouse.row);

        if self.areas.board_inner.contains(pos) {
            let card_count = game.state().board().len();
            if let Some(id) = card_at(self.areas.board_inner, game.grid_size(), card_count, pos.x, pos.y) {
                self.set_focus(Focus::Board, game);
                self.cursor.set_card(id, game.grid_size());
                self.click_card(id, game);
            }
        } else if self.areas.grid_field.contains(pos) {
            self.set_focus(Focus::GridSize, game);
        } else if self.areas.max_field.contains(pos) {
            self.set_focus(Focus::MaxMoves, game);
        } else if self.areas.reset_button.contains(pos) {
            self.set_focus(Focus::ResetButton, game);
            self.reset(game);
        }
    }

    fn handle_board_input(&mut self, key: KeyEvent, game: &mut Game) {
        let grid_size = game.grid_size();
        let card_count = game.state().board().len();

        match key.code {
            KeyCode::Up | KeyCode::Char('k') => self.cursor.move_up(),
            KeyCode::Down | KeyCode::Char('j') => self.cursor.move_down(grid_size, card_count),
            KeyCode::Left | KeyCode::Char('h') => self.cursor.move_left(),
            KeyCode::Right | KeyCode::Char('l') => self.cursor.move_right(grid_size, card_count),
            KeyCode::Enter | KeyCode::Char(' ') => {
                let id = self.cursor.card_id(grid_size);
                self.click_card(id, game);
            }
            _ => {}
        }
    }

    fn handle_grid_size_input(&mut self, key: KeyEvent, game: &mut Game) {
        let edited = match key.code {
            KeyCode::Char(c) => self.grid_size_field.push(c),
            KeyCode::Backspace => self.grid_size_field.pop(),
            KeyCode::Up => {
                self.change_grid_size(game.grid_size() + 1, game);
                self.grid_size_field.set(game.grid_size());
                false
            }
            KeyCode::Down => {
                self.change_grid_size(game.grid_size().saturating_sub(1), game);
                self.grid_size_field.set(game.grid_size());
                false
            }
            _ => false,
        };

        if edited {
            match parse_grid_size(self.grid_size_field.text()) {
                Ok(size) => self.change_grid_size(size, game),
                Err(e) => log::debug!("Rejected grid size input: {}", e),
            }
        }
    }

    fn handle_max_moves_input(&mut self, key: KeyEvent, game: &mut Game) {
        let current = i64::from(game.state().max_moves());
        let edited = match key.code {
            KeyCode::Char(c) => self.max_moves_field.push(c),
            KeyCode::Backspace => self.max_moves_field.pop(),
            KeyCode::Up => {
                self.send(GameEvent::MaxMovesChanged(current + 1), game);
                self.max_moves_field.set(game.state().max_moves());
                false
            }
            KeyCode::Down => {
                self.send(GameEvent::MaxMovesChanged(current - 1), game);
                self.max_moves_field.set(game.state().max_moves());
                false
            }
            _ => false,
        };

        if edited {
            let max = parse_max_moves(self.max_moves_field.text());
            self.send(GameEvent::MaxMovesChanged(max), game);
        }
    }

    fn click_card(&mut self, id: usize, game: &mut Game) {
        self.send(GameEvent::CardClicked(id), game);
    }

    fn change_grid_size(&mut self, size: u32, game: &mut Game) {
        self.send(GameEvent::GridSizeChanged(size), game);
        self.cursor.clamp(game.grid_size(), game.state().board().len());
    }

    fn reset(&mut self, game: &mut Game) {
        self.send(GameEvent::Reset, game);
    }

    fn send(&mut self, event: GameEvent, game: &mut Game) {
        if let Err(e) = game.handle(event) {
            log::debug!("Rejected input: {}", e);
        }
    }

    /// Move focus, snapping any half-typed field back to the value in effect
    fn set_focus(&mut self, focus: Focus, game: &Game) {
        if focus == self.focus {
            return;
        }
        match self.focus {
            Focus::GridSize => self.grid_size_field.set(game.grid_size()),
            Focus::MaxMoves => self.max_moves_field.set(game.state().max_moves()),
            _ => {}
        }
        self.focus = focus;
    }

    /// Render the whole screen
    pub fn render(&mut self, frame: &mut Frame, game: &Game) {
        let area = frame.area();
        let state = game.state();
        let (board_w, board_h) = grid_area_size(game.grid_size());

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2), // Title
                Constraint::Length(3), // Inputs
                Constraint::Length(board_h),
                Constraint::Length(1), // Moves
                Constraint::Length(2), // Result
                Constraint::Length(3), // Button
                Constraint::Length(1), // Help
                Constraint::Min(0),
            ])
            .split(area);

        let title = Paragraph::new(Span::styled(
            "Memory Game",
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center);
        frame.render_widget(title, chunks[0]);

        self.render_inputs(frame, chunks[1]);

        let board_area = centered_width(chunks[2], board_w);
        let cursor = (self.focus == Focus::Board && state.phase() == Phase::Playing).then_some(self.cursor);
        frame.render_widget(CardGridWidget::new(state, game.grid_size()).cursor(cursor), board_area);
        self.areas.board_inner = Block::default().borders(Borders::ALL).inner(board_area);

        let limit = if state.max_moves() == 0 {
            "∞".to_string()
        } else {
            state.max_moves().to_string()
        };
        let moves = Paragraph::new(format!("Moves: {} / {}", state.moves(), limit))
            .alignment(Alignment::Center);
        frame.render_widget(moves, chunks[3]);

        let result = match state.phase() {
            Phase::Won => Some(Span::styled(
                "You Won!",
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            )),
            Phase::Lost => Some(Span::styled(
                "Game Over!",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )),
            Phase::Playing => None,
        };
        if let Some(span) = result {
            frame.render_widget(
                Paragraph::new(vec![Line::from(""), Line::from(span)]).alignment(Alignment::Center),
                chunks[4],
            );
        }

        let label = if state.phase() == Phase::Playing { "Reset" } else { "Play Again" };
        let button_style = if self.focus == Focus::ResetButton {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Green)
        };
        let button_area = centered_width(chunks[5], BUTTON_WIDTH);
        let button = Paragraph::new(label)
            .alignment(Alignment::Center)
            .style(button_style)
            .block(Block::default().borders(Borders::ALL).border_style(button_style));
        frame.render_widget(button, button_area);
        self.areas.reset_button = button_area;

        let help = Paragraph::new(Line::from(vec![
            Span::styled("Tab", Style::default().fg(Color::Yellow)),
            Span::styled(" focus  ", Style::default().fg(Color::DarkGray)),
            Span::styled("←↓↑→", Style::default().fg(Color::Yellow)),
            Span::styled(" move  ", Style::default().fg(Color::DarkGray)),
            Span::styled("Enter", Style::default().fg(Color::Yellow)),
            Span::styled(" flip  ", Style::default().fg(Color::DarkGray)),
            Span::styled("r", Style::default().fg(Color::Yellow)),
            Span::styled(" reset  ", Style::default().fg(Color::DarkGray)),
            Span::styled("q", Style::default().fg(Color::Yellow)),
            Span::styled(" quit", Style::default().fg(Color::DarkGray)),
        ]))
        .alignment(Alignment::Center);
        frame.render_widget(help, chunks[6]);
    }

    fn render_inputs(&mut self, frame: &mut Frame, area: Rect) {
        let row = centered_width(area, GRID_FIELD_WIDTH + 2 + MAX_FIELD_WIDTH);
        let cols = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(GRID_FIELD_WIDTH),
                Constraint::Length(2),
                Constraint::Length(MAX_FIELD_WIDTH),
            ])
            .split(row);

        frame.render_widget(
            NumberFieldWidget::new(&self.grid_size_field, "Grid Size: (max 10)")
                .focused(self.focus == Focus::GridSize),
            cols[0],
        );
        frame.render_widget(
            NumberFieldWidget::new(&self.max_moves_field, "Max Moves: (0 for unlimited)")
                .focused(self.focus == Focus::MaxMoves),
            cols[2],
        );

        self.areas.grid_field = cols[0];
        self.areas.max_field = cols[2];
    }
}

/// Horizontally center a column of `width` inside `r`
fn centered_width(r: Rect, width: u16) -> Rect {
    let width = width.min(r.width);
    Rect {
        x: r.x + (r.width - width) / 2,
        y: r.y,
        width,
        height: r.height,
    }
}
