//! The 5x5 grid itself: cells, slots, and the structural invariants every grid must hold.
//!
//! A grid is a fixed `GRID_SIZE x GRID_SIZE` array of [`Cell`]s. Slots are derived, not stored
//! independently: [`Grid::enumerate_slots`] walks the grid fresh every time it is called, the way
//! a crossword editor would re-derive across/down runs after every black-square edit.

use crate::types::{CellSource, Direction, CrossingId, GRID_SIZE, SlotId, WILDCARD};
use std::collections::HashSet;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde_derive::Serialize, serde_derive::Deserialize))]
pub enum Cell {
    Black,
    Empty,
    Letter(char, CellSource),
}

impl Cell {
    #[must_use]
    pub fn is_black(self) -> bool {
        matches!(self, Cell::Black)
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        matches!(self, Cell::Empty)
    }

    #[must_use]
    pub fn letter(self) -> Option<char> {
        match self {
            Cell::Letter(ch, _) => Some(ch),
            _ => None,
        }
    }

    #[must_use]
    pub fn glyph_or_wildcard(self) -> char {
        self.letter().unwrap_or(WILDCARD)
    }

    #[must_use]
    pub fn source(self) -> Option<CellSource> {
        match self {
            Cell::Letter(_, source) => Some(source),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde_derive::Serialize, serde_derive::Deserialize))]
pub struct Grid {
    cells: [[Cell; GRID_SIZE]; GRID_SIZE],
}

impl Default for Grid {
    fn default() -> Self {
        Self::empty()
    }
}

impl Grid {
    #[must_use]
    pub fn empty() -> Grid {
        Grid {
            cells: [[Cell::Empty; GRID_SIZE]; GRID_SIZE],
        }
    }

    #[must_use]
    pub fn in_bounds(row: isize, col: isize) -> bool {
        row >= 0 && col >= 0 && (row as usize) < GRID_SIZE && (col as usize) < GRID_SIZE
    }

    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.cells[row][col]
    }

    fn set(&mut self, row: usize, col: usize, cell: Cell) {
        self.cells[row][col] = cell;
    }

    /// Clears every currently-empty cell to black and fills the symmetric partner of each, then
    /// checks that the result still has full 4-connectivity among non-black cells and no
    /// length-1 runs. Returns `None` (leaving `self` untouched) if a requested black cell would
    /// cover a letter, or if the resulting grid violates either invariant.
    #[must_use]
    pub fn apply_black_cells(&self, blacks: &HashSet<(usize, usize)>) -> Option<Grid> {
        let mut next = self.clone();
        for &(row, col) in blacks {
            match next.get(row, col) {
                Cell::Letter(_, _) => return None,
                Cell::Black | Cell::Empty => next.set(row, col, Cell::Black),
            }
            let (sr, sc) = Self::symmetric(row, col);
            match next.get(sr, sc) {
                Cell::Letter(_, _) => return None,
                Cell::Black | Cell::Empty => next.set(sr, sc, Cell::Black),
            }
        }
        if next.has_length_one_run() || !next.is_connected() || !next.blacks_symmetric() {
            return None;
        }
        Some(next)
    }

    #[must_use]
    pub fn symmetric(row: usize, col: usize) -> (usize, usize) {
        (GRID_SIZE - 1 - row, GRID_SIZE - 1 - col)
    }

    /// Writes `text` into the slot's cells tagged with `source`, then rolls back and returns
    /// `false` if doing so would violate a cell already holding a conflicting letter.
    #[must_use]
    pub fn place_word(&mut self, slot: &Slot, text: &str, source: CellSource) -> bool {
        debug_assert_eq!(text.len(), slot.length);
        let cells = slot.cells();
        for (&(row, col), ch) in cells.iter().zip(text.chars()) {
            if let Cell::Letter(existing, _) = self.get(row, col) {
                if existing != ch {
                    return false;
                }
            }
        }
        for (&(row, col), ch) in cells.iter().zip(text.chars()) {
            self.set(row, col, Cell::Letter(ch, source));
        }
        true
    }

    /// Clears every cell of `slot` whose source is `source`, restoring it to `Cell::Empty`.
    /// Used by the repair loop to retract an auto-filled word before retrying.
    pub fn clear_word(&mut self, slot: &Slot, source: CellSource) {
        for (row, col) in slot.cells() {
            if let Cell::Letter(_, existing_source) = self.get(row, col) {
                if existing_source == source {
                    self.set(row, col, Cell::Empty);
                }
            }
        }
    }

    /// Derives every maximal across/down run of length >= 2 with no black cell in it. Slot ids
    /// are assigned in scan order: all across slots row-major, then all down slots column-major.
    #[must_use]
    pub fn enumerate_slots(&self) -> Vec<Slot> {
        let mut slots = Vec::new();
        for row in 0..GRID_SIZE {
            let mut col = 0;
            while col < GRID_SIZE {
                if self.get(row, col).is_black() {
                    col += 1;
                    continue;
                }
                let start = col;
                while col < GRID_SIZE && !self.get(row, col).is_black() {
                    col += 1;
                }
                if col - start >= 2 {
                    slots.push(Slot::new(slots.len(), Direction::Across, row, start, col - start));
                }
            }
        }
        for col in 0..GRID_SIZE {
            let mut row = 0;
            while row < GRID_SIZE {
                if self.get(row, col).is_black() {
                    row += 1;
                    continue;
                }
                let start = row;
                while row < GRID_SIZE && !self.get(row, col).is_black() {
                    row += 1;
                }
                if row - start >= 2 {
                    slots.push(Slot::new(slots.len(), Direction::Down, start, col, row - start));
                }
            }
        }
        slots
    }

    /// Assigns crossword clue numbers to the grid's slots in reading order: a cell starts a new
    /// number if it begins an across or down slot. Returns `(slot_id, number)` pairs.
    #[must_use]
    pub fn number_slots(&self, slots: &[Slot]) -> Vec<(SlotId, u32)> {
        let mut starts: Vec<(usize, usize)> = slots.iter().map(|s| (s.start_row, s.start_col)).collect();
        starts.sort();
        starts.dedup();
        let mut numbers = std::collections::HashMap::new();
        for (n, pos) in starts.into_iter().enumerate() {
            numbers.insert(pos, n as u32 + 1);
        }
        slots
            .iter()
            .map(|s| (s.id, numbers[&(s.start_row, s.start_col)]))
            .collect()
    }

    /// Reads the text currently sitting in `slot`'s cells, using [`WILDCARD`] for empty cells.
    /// Black cells inside a slot's span never happen by construction.
    #[must_use]
    pub fn read_pattern(&self, slot: &Slot) -> String {
        slot.cells().into_iter().map(|(r, c)| self.get(r, c).glyph_or_wildcard()).collect()
    }

    #[must_use]
    pub fn is_slot_filled(&self, slot: &Slot) -> bool {
        slot.cells().into_iter().all(|(r, c)| self.get(r, c).letter().is_some())
    }

    /// The "most specific" source among `slot`'s cells: a theme placement anywhere in the slot
    /// wins over a user letter, which wins over an auto-filled one, so a slot that is partly
    /// theme-seeded is still reported as a theme word in the output.
    #[must_use]
    pub fn slot_source(&self, slot: &Slot) -> CellSource {
        let sources: Vec<CellSource> = slot.cells().into_iter().filter_map(|(r, c)| self.get(r, c).source()).collect();
        if sources.contains(&CellSource::Theme) {
            CellSource::Theme
        } else if sources.contains(&CellSource::User) {
            CellSource::User
        } else {
            CellSource::Auto
        }
    }

    /// BFS/flood-fill connectivity over non-black cells, 4-adjacency. A grid with zero non-black
    /// cells counts as connected (degenerate, but never produced in practice).
    #[must_use]
    pub fn is_connected(&self) -> bool {
        let non_black: Vec<(usize, usize)> = (0..GRID_SIZE)
            .flat_map(|r| (0..GRID_SIZE).map(move |c| (r, c)))
            .filter(|&(r, c)| !self.get(r, c).is_black())
            .collect();
        let Some(&start) = non_black.first() else {
            return true;
        };
        let mut seen = HashSet::new();
        let mut stack = vec![start];
        seen.insert(start);
        while let Some((r, c)) = stack.pop() {
            for (dr, dc) in [(-1isize, 0isize), (1, 0), (0, -1), (0, 1)] {
                let (nr, nc) = (r as isize + dr, c as isize + dc);
                if !Grid::in_bounds(nr, nc) {
                    continue;
                }
                let pos = (nr as usize, nc as usize);
                if !self.get(pos.0, pos.1).is_black() && seen.insert(pos) {
                    stack.push(pos);
                }
            }
        }
        seen.len() == non_black.len()
    }

    /// True if any non-black cell has no non-black 4-neighbor inside an across or down run of
    /// length >= 2, i.e. it belongs to no slot at all.
    #[must_use]
    pub fn has_length_one_run(&self) -> bool {
        for row in 0..GRID_SIZE {
            for col in 0..GRID_SIZE {
                if self.get(row, col).is_black() {
                    continue;
                }
                let across_len = Self::run_len(self, row, col, 0, 1) + Self::run_len(self, row, col, 0, -1) - 1;
                let down_len = Self::run_len(self, row, col, 1, 0) + Self::run_len(self, row, col, -1, 0) - 1;
                if across_len < 2 && down_len < 2 {
                    return true;
                }
            }
        }
        false
    }

    fn run_len(&self, row: usize, col: usize, dr: isize, dc: isize) -> usize {
        let mut len = 0;
        let (mut r, mut c) = (row as isize, col as isize);
        while Grid::in_bounds(r, c) && !self.get(r as usize, c as usize).is_black() {
            len += 1;
            r += dr;
            c += dc;
        }
        len
    }

    #[must_use]
    pub fn blacks_symmetric(&self) -> bool {
        (0..GRID_SIZE).all(|r| {
            (0..GRID_SIZE).all(|c| {
                let (sr, sc) = Self::symmetric(r, c);
                self.get(r, c).is_black() == self.get(sr, sc).is_black()
            })
        })
    }

    #[cfg(feature = "check_invariants")]
    pub fn debug_check_invariants(&self) {
        debug_assert!(self.blacks_symmetric(), "black squares lost 180-degree symmetry");
        debug_assert!(self.is_connected(), "grid split into disconnected regions");
        debug_assert!(!self.has_length_one_run(), "grid has an isolated length-1 cell");
    }

    #[cfg(not(feature = "check_invariants"))]
    pub fn debug_check_invariants(&self) {}
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde_derive::Serialize, serde_derive::Deserialize))]
pub struct Slot {
    pub id: SlotId,
    pub direction: Direction,
    pub start_row: usize,
    pub start_col: usize,
    pub length: usize,
}

impl Slot {
    fn new(id: SlotId, direction: Direction, start_row: usize, start_col: usize, length: usize) -> Slot {
        Slot {
            id,
            direction,
            start_row,
            start_col,
            length,
        }
    }

    /// The `(row, col)` of every cell the slot spans, start to end.
    #[must_use]
    pub fn cells(&self) -> Vec<(usize, usize)> {
        let (dr, dc) = self.direction.delta();
        (0..self.length)
            .map(|i| {
                (
                    (self.start_row as isize + dr * i as isize) as usize,
                    (self.start_col as isize + dc * i as isize) as usize,
                )
            })
            .collect()
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{} at ({},{}) len {}", self.direction, self.id, self.start_row, self.start_col, self.length)
    }
}

/// Describes how two slots cross: the cell they share, and each slot's offset into it. Built
/// once per grid alongside [`Grid::enumerate_slots`] and indexed by [`CrossingId`] elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Crossing {
    pub id: CrossingId,
    pub a: SlotId,
    pub a_offset: usize,
    pub b: SlotId,
    pub b_offset: usize,
}

/// Finds every pair of slots that share a cell and records the offset each has into it.
#[must_use]
pub fn find_crossings(slots: &[Slot]) -> Vec<Crossing> {
    let mut by_cell: std::collections::HashMap<(usize, usize), Vec<(SlotId, usize)>> = std::collections::HashMap::new();
    for slot in slots {
        for (offset, pos) in slot.cells().into_iter().enumerate() {
            by_cell.entry(pos).or_default().push((slot.id, offset));
        }
    }
    let mut crossings = Vec::new();
    for occupants in by_cell.values() {
        if occupants.len() == 2 {
            let (a, a_offset) = occupants[0];
            let (b, b_offset) = occupants[1];
            crossings.push(Crossing {
                id: crossings.len(),
                a,
                a_offset,
                b,
                b_offset,
            });
        }
    }
    crossings
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_grid_has_two_slots_per_row_and_column() {
        let grid = Grid::empty();
        let slots = grid.enumerate_slots();
        assert_eq!(slots.len(), 10);
        assert!(slots.iter().all(|s| s.length == GRID_SIZE));
    }

    #[test]
    fn apply_black_cells_enforces_symmetry_automatically() {
        let grid = Grid::empty();
        let mut blacks = HashSet::new();
        blacks.insert((0, 0));
        let next = grid.apply_black_cells(&blacks).expect("single corner black is valid");
        assert!(next.get(0, 0).is_black());
        assert!(next.get(4, 4).is_black());
        assert!(next.blacks_symmetric());
    }

    #[test]
    fn apply_black_cells_rejects_covering_a_letter() {
        let mut grid = Grid::empty();
        let slots = grid.enumerate_slots();
        grid.place_word(&slots[0], "ADAMX", CellSource::Theme);
        let mut blacks = HashSet::new();
        blacks.insert((0, 0));
        assert!(grid.apply_black_cells(&blacks).is_none());
    }

    #[test]
    fn apply_black_cells_rejects_isolated_single_cell() {
        let grid = Grid::empty();
        let mut blacks = HashSet::new();
        // Surrounding (0,0) on both open sides isolates it as a length-1 run.
        blacks.insert((0, 1));
        blacks.insert((1, 0));
        assert!(grid.apply_black_cells(&blacks).is_none());
    }

    #[test]
    fn place_word_then_read_pattern_round_trips() {
        let mut grid = Grid::empty();
        let slots = grid.enumerate_slots();
        let across0 = slots.iter().find(|s| s.direction == Direction::Across && s.start_row == 0).unwrap().clone();
        assert!(grid.place_word(&across0, "ADAMS", CellSource::Theme));
        assert_eq!(grid.read_pattern(&across0), "ADAMS");
    }

    #[test]
    fn place_word_rejects_conflicting_letter() {
        let mut grid = Grid::empty();
        let slots = grid.enumerate_slots();
        let across0 = slots.iter().find(|s| s.direction == Direction::Across && s.start_row == 0).unwrap().clone();
        assert!(grid.place_word(&across0, "ADAMS", CellSource::Theme));
        assert!(!grid.place_word(&across0, "ALARM", CellSource::Auto));
    }

    #[test]
    fn find_crossings_pairs_every_across_with_its_down() {
        let grid = Grid::empty();
        let slots = grid.enumerate_slots();
        let crossings = find_crossings(&slots);
        assert_eq!(crossings.len(), GRID_SIZE * GRID_SIZE);
    }

    #[test]
    fn clear_word_only_clears_matching_source() {
        let mut grid = Grid::empty();
        let slots = grid.enumerate_slots();
        let across0 = slots.iter().find(|s| s.direction == Direction::Across && s.start_row == 0).unwrap().clone();
        grid.place_word(&across0, "ADAMS", CellSource::Auto);
        grid.clear_word(&across0, CellSource::Theme);
        assert!(grid.is_slot_filled(&across0), "clearing the wrong source must be a no-op");
        grid.clear_word(&across0, CellSource::Auto);
        assert!(!grid.is_slot_filled(&across0));
    }
}
