//! Small shared identifiers and enums used across the engine.

use std::fmt;

/// Fixed grid dimension; the engine only ever targets 5x5 puzzles.
pub const GRID_SIZE: usize = 5;

/// Minimum and maximum accepted theme-word / dictionary-entry length.
pub const MIN_WORD_LEN: usize = 2;
pub const MAX_WORD_LEN: usize = 5;

/// Wildcard glyph used in slot patterns for a not-yet-determined cell.
pub const WILDCARD: char = '.';

/// Index into a length bucket of the word arena. Only unique within a given word length.
pub type WordId = usize;

/// Index into a grid's slot arena, assigned when slots are enumerated for that grid.
pub type SlotId = usize;

/// Index into the flat crossing arena built alongside a grid's slots.
pub type CrossingId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde_derive::Serialize, serde_derive::Deserialize))]
pub enum Direction {
    Across,
    Down,
}

impl Direction {
    #[must_use]
    pub fn other(self) -> Direction {
        match self {
            Direction::Across => Direction::Down,
            Direction::Down => Direction::Across,
        }
    }

    /// Row/column delta for stepping one cell forward along this direction.
    #[must_use]
    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::Across => (0, 1),
            Direction::Down => (1, 0),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Across => write!(f, "across"),
            Direction::Down => write!(f, "down"),
        }
    }
}

/// Where a letter in a cell came from. The repair loop may only convert `Cell::Empty` cells to
/// black, never a cell carrying any source of letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde_derive::Serialize, serde_derive::Deserialize))]
pub enum CellSource {
    User,
    Auto,
    Theme,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_other_is_involution() {
        assert_eq!(Direction::Across.other(), Direction::Down);
        assert_eq!(Direction::Down.other(), Direction::Across);
        assert_eq!(Direction::Across.other().other(), Direction::Across);
    }

    #[test]
    fn direction_delta_matches_axis() {
        assert_eq!(Direction::Across.delta(), (0, 1));
        assert_eq!(Direction::Down.delta(), (1, 0));
    }
}
