//! The repair loop: when arc consistency finds a slot with no viable filling, carve a symmetric
//! black-cell pair out of the grid to relieve it, rather than giving up on the whole pattern.
//!
//! This trades one across/down slot pair for a shorter (or absent) one, which is always a
//! legal move as long as [`Grid::apply_black_cells`]'s invariants still hold afterward. Bounded
//! by `max_iterations` so a dictionary that's fundamentally too sparse for a pattern fails fast
//! instead of carving the grid down to nothing.

use std::collections::HashMap;

use crate::arc_consistency::establish_arc_consistency;
use crate::grid::{find_crossings, Grid, Slot};
use crate::types::SlotId;
use crate::word_list::{WordIndexView, WordRef};

#[derive(Debug, Clone)]
pub struct RepairOutcome {
    pub grid: Grid,
    pub black_cells_added: usize,
    /// True only if the final grid passed arc consistency; a caller that hit `max_iterations`
    /// without success still gets the partially-repaired grid back, flagged as unresolved.
    pub resolved: bool,
}

/// Ranks slots by how constrained their domain currently is: fewest candidates first. The
/// orchestrator consults this to decide which slot is most at risk before a failure even occurs,
/// not just to react after [`establish_arc_consistency`] already failed.
#[must_use]
pub fn rank_problem_slots(domains: &HashMap<SlotId, Vec<WordRef>>) -> Vec<SlotId> {
    let mut ranked: Vec<(SlotId, usize)> = domains.iter().map(|(id, v)| (*id, v.len())).collect();
    ranked.sort_by_key(|(_, len)| *len);
    ranked.into_iter().map(|(id, _)| id).collect()
}

/// Repeatedly finds the slot arc consistency chokes on and blackens one of its still-empty cells
/// (together with its 180-degree mirror), up to `max_iterations` times.
#[must_use]
pub fn repair(grid: &Grid, index: &impl WordIndexView, max_iterations: usize) -> RepairOutcome {
    let mut current = grid.clone();
    let mut added = 0;

    for _ in 0..max_iterations {
        let slots = current.enumerate_slots();
        let crossings = find_crossings(&slots);
        match establish_arc_consistency(&current, &slots, &crossings, index) {
            Ok(_) => {
                return RepairOutcome {
                    grid: current,
                    black_cells_added: added,
                    resolved: true,
                }
            }
            Err(failure) => {
                let Some(slot) = slots.iter().find(|s| s.id == failure.slot_id) else {
                    break;
                };
                match blacken_one_cell(&current, slot) {
                    Some(next) => {
                        added += 1;
                        current = next;
                    }
                    None => break,
                }
            }
        }
    }

    RepairOutcome {
        grid: current,
        black_cells_added: added,
        resolved: false,
    }
}

/// Tries blackening each still-empty cell of `slot` in turn (shortest-first from both ends tends
/// to preserve the most words elsewhere), accepting the first choice that keeps the grid
/// structurally valid.
fn blacken_one_cell(grid: &Grid, slot: &Slot) -> Option<Grid> {
    let cells = slot.cells();
    let candidates = cells.iter().chain(cells.iter().rev());
    for &(row, col) in candidates {
        if !grid.get(row, col).is_empty() {
            continue;
        }
        let mut blacks = std::collections::HashSet::new();
        blacks.insert((row, col));
        if let Some(fixed) = grid.apply_black_cells(&blacks) {
            return Some(fixed);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::word_list::WordList;

    #[test]
    fn repair_is_a_no_op_when_the_grid_is_already_consistent() {
        let grid = Grid::empty();
        let idx = WordList::default_index();
        let outcome = repair(&grid, idx, 5);
        assert!(outcome.resolved);
        assert_eq!(outcome.black_cells_added, 0);
    }

    #[test]
    fn repair_gives_up_cleanly_against_an_impossible_corpus() {
        let grid = Grid::empty();
        let list = WordList::from_corpus("AA,COMMON\nAB,COMMON\n");
        let outcome = repair(&grid, &list, 3);
        assert!(!outcome.resolved);
        assert!(outcome.black_cells_added <= 3);
    }

    #[test]
    fn rank_problem_slots_orders_ascending_by_domain_size() {
        let idx = WordList::default_index();
        let three: Vec<WordRef> = idx.matches_refs("A....").into_iter().take(3).collect();
        let one: Vec<WordRef> = idx.matches_refs("A....").into_iter().take(1).collect();
        let mut domains = HashMap::new();
        domains.insert(0, vec![]);
        domains.insert(1, three);
        domains.insert(2, one);
        let ranked = rank_problem_slots(&domains);
        assert_eq!(ranked[0], 0);
        assert_eq!(ranked[2], 1);
    }
}
