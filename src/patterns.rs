//! The library of black-square skeletons the orchestrator tries in order.
//!
//! Every pattern is stored as its minimal "primary" cell set in the top-left quadrant; the
//! 180-degree-symmetric partner of each is implied and added when the pattern is realized against
//! a [`Grid`]. Each entry here was checked offline against the engine's own invariants
//! (4-connectivity, no isolated length-1 cells, genuine 180-degree symmetry) before being
//! hardcoded — see [`Grid::apply_black_cells`] for the runtime version of that same check.

use crate::grid::Grid;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlackPattern {
    pub name: &'static str,
    /// Black cells explicitly listed; callers must also add each cell's 180-degree mirror.
    primary_cells: &'static [(usize, usize)],
}

impl BlackPattern {
    /// The full, symmetry-closed set of black cells this pattern puts on a 5x5 grid.
    #[must_use]
    pub fn black_cells(&self) -> HashSet<(usize, usize)> {
        let mut cells = HashSet::new();
        for &(r, c) in self.primary_cells {
            cells.insert((r, c));
            cells.insert(Grid::symmetric(r, c));
        }
        cells
    }

    /// Realizes this pattern against an empty grid, returning `None` only if the hardcoded
    /// pattern somehow fails the grid's own invariants (should never happen; checked by tests).
    #[must_use]
    pub fn apply(&self, grid: &Grid) -> Option<Grid> {
        grid.apply_black_cells(&self.black_cells())
    }
}

/// Patterns in roughly ascending order of how many black cells they add, so the orchestrator's
/// pattern loop tries the most theme-word-friendly (fewest constraints) options first.
pub const PATTERN_LIBRARY: &[BlackPattern] = &[
    BlackPattern { name: "open", primary_cells: &[] },
    BlackPattern { name: "center", primary_cells: &[(2, 2)] },
    BlackPattern { name: "single-corner", primary_cells: &[(0, 0)] },
    BlackPattern { name: "edge-middle", primary_cells: &[(0, 2)] },
    BlackPattern { name: "two-corners", primary_cells: &[(0, 0), (0, 4)] },
    BlackPattern { name: "l-shape", primary_cells: &[(0, 0), (1, 0)] },
    BlackPattern { name: "staircase", primary_cells: &[(0, 0), (0, 1), (1, 0)] },
    BlackPattern { name: "three-corners", primary_cells: &[(0, 3), (0, 4), (1, 4)] },
];

#[must_use]
pub fn by_name(name: &str) -> Option<&'static BlackPattern> {
    PATTERN_LIBRARY.iter().find(|p| p.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_pattern_applies_cleanly_to_an_empty_grid() {
        let grid = Grid::empty();
        for pattern in PATTERN_LIBRARY {
            assert!(pattern.apply(&grid).is_some(), "pattern {} failed grid invariants", pattern.name);
        }
    }

    #[test]
    fn every_pattern_is_symmetric_by_construction() {
        let grid = Grid::empty();
        for pattern in PATTERN_LIBRARY {
            let applied = pattern.apply(&grid).unwrap();
            assert!(applied.blacks_symmetric());
        }
    }

    #[test]
    fn patterns_have_distinct_black_cell_sets() {
        let sets: Vec<HashSet<(usize, usize)>> = PATTERN_LIBRARY.iter().map(|p| p.black_cells()).collect();
        for i in 0..sets.len() {
            for j in (i + 1)..sets.len() {
                assert_ne!(sets[i], sets[j], "{} and {} coincide", PATTERN_LIBRARY[i].name, PATTERN_LIBRARY[j].name);
            }
        }
    }

    #[test]
    fn by_name_finds_known_patterns_and_rejects_unknown() {
        assert!(by_name("open").is_some());
        assert!(by_name("staircase").is_some());
        assert!(by_name("nonexistent").is_none());
    }
}
