//! Player-editable settings
//!
//! Parsing and validation for the grid-size and max-moves inputs.

use thiserror::Error;

use super::card::{MAX_GRID_SIZE, MIN_GRID_SIZE};

/// Rejected setting changes
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("grid size {size} is outside {min}..={max}", min = MIN_GRID_SIZE, max = MAX_GRID_SIZE)]
    GridSizeOutOfRange { size: i64 },
    #[error("'{0}' is not a number")]
    NotANumber(String),
}

/// Read a leading integer the way a lenient number field does:
/// skips leading whitespace, accepts an optional sign, stops at the
/// first non-digit. `"12abc"` is 12, `"abc"` is nothing.
pub fn parse_leading_int(text: &str) -> Option<i64> {
    let trimmed = text.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits: &str = {
        let end = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        &rest[..end]
    };
    if digits.is_empty() {
        return None;
    }

    // Saturate absurdly long inputs instead of failing
    let magnitude = digits.parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

/// Parse a grid-size field. Only values in the accepted range pass.
pub fn parse_grid_size(text: &str) -> Result<u32, GameError> {
    let size = parse_leading_int(text).ok_or_else(|| GameError::NotANumber(text.to_string()))?;
    match u32::try_from(size) {
        Ok(size) if (MIN_GRID_SIZE..=MAX_GRID_SIZE).contains(&size) => Ok(size),
        _ => Err(GameError::GridSizeOutOfRange { size }),
    }
}

/// Parse a max-moves field. Anything that is not a non-negative number
/// means unlimited (0).
pub fn parse_max_moves(text: &str) -> i64 {
    parse_leading_int(text).unwrap_or(0)
}

/// Clamp a requested move limit into the accepted range
pub fn clamp_max_moves(max: i64) -> u32 {
    u32::try_from(max.max(0)).unwrap_or(u32::MAX)
}
