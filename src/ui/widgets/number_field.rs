//! Editable numeric input field

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Paragraph, Widget},
};

/// Longest text a field accepts
const MAX_LEN: usize = 6;

/// Text buffer behind a numeric input
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NumberField {
    text: String,
}

impl NumberField {
    pub fn new(value: impl ToString) -> Self {
        Self {
            text: value.to_string(),
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replace the contents with a committed value
    pub fn set(&mut self, value: impl ToString) {
        self.text = value.to_string();
    }

    /// Append a typed character. Returns true if the text changed.
    pub fn push(&mut self, c: char) -> bool {
        let accepted = c.is_ascii_digit() || (c == '-' && self.text.is_empty());
        if accepted && self.text.len() < MAX_LEN {
            self.text.push(c);
            true
        } else {
            false
        }
    }

    /// Delete the last character. Returns true if the text changed.
    pub fn pop(&mut self) -> bool {
        self.text.pop().is_some()
    }
}

/// Widget for a labelled number field
pub struct NumberFieldWidget<'a> {
    field: &'a NumberField,
    label: &'a str,
    focused: bool,
}

impl<'a> NumberFieldWidget<'a> {
    pub fn new(field: &'a NumberField, label: &'a str) -> Self {
        Self {
            field,
            label,
            focused: false,
        }
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }
}

impl<'a> Widget for NumberFieldWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.focused {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Rgb(100, 100, 120))
        };

        let text = if self.focused {
            format!("{}_", self.field.text())
        } else {
            self.field.text().to_string()
        };

        Paragraph::new(text)
            .block(
                Block::default()
                    .title(self.label)
                    .borders(Borders::ALL)
                    .border_style(border_style),
            )
            .render(area, buf);
    }
}
