//! Arc consistency (AC-3) preprocessing over a grid's unfilled slots.
//!
//! Before the backtracking search commits to a single word per slot, we shrink every unfilled
//! slot's domain down to words that have *some* support at every crossing — words that could
//! never participate in any complete filling, because some cell they'd need a letter for has no
//! crossing word agreeing with it, are pruned up front. This is the classic unweighted AC-3 from
//! the literature, not the dom/wdeg-weighted variant some crossword solvers use: the spec calls
//! for arc consistency as a pruning pass ahead of backtracking, not as a search heuristic in its
//! own right, so we keep the simpler form here and leave variable-ordering weighting to
//! [`crate::backtracking_search`].

use crate::grid::{Crossing, Grid, Slot};
use crate::types::SlotId;
use crate::util::{build_glyph_counts_by_cell, glyph_index, GlyphCountsByCell};
use crate::word_list::{WordIndexView, WordRef};
use std::collections::{HashMap, VecDeque};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArcConsistencyFailure {
    /// The slot whose domain was pruned down to nothing.
    pub slot_id: SlotId,
}

#[derive(Debug, Clone)]
pub struct SlotDomain {
    pub slot_id: SlotId,
    pub length: usize,
    pub candidates: Vec<WordRef>,
    glyph_counts: GlyphCountsByCell,
}

impl SlotDomain {
    fn new(slot_id: SlotId, length: usize, candidates: Vec<WordRef>, index: &impl WordIndexView) -> SlotDomain {
        let words: Vec<_> = candidates.iter().map(|r| index.resolve(*r)).collect();
        let glyph_counts = build_glyph_counts_by_cell(words, length);
        SlotDomain {
            slot_id,
            length,
            candidates,
            glyph_counts,
        }
    }

    fn remove(&mut self, idx: usize, index: &impl WordIndexView) {
        let removed = self.candidates.swap_remove(idx);
        let word = index.resolve(removed);
        for (cell, ch) in word.text.chars().enumerate() {
            self.glyph_counts[cell][glyph_index(ch)] -= 1;
        }
    }

    fn has_support_at(&self, offset: usize, glyph: char) -> bool {
        self.glyph_counts[offset][glyph_index(glyph)] > 0
    }
}

struct Neighbor {
    slot: SlotId,
    self_offset: usize,
    other_offset: usize,
}

/// Runs AC-3 over every unfilled slot in `grid`, using `crossings` restricted to pairs where both
/// ends are unfilled (a crossing into an already-filled slot is already baked into the unfilled
/// slot's own pattern via [`Grid::read_pattern`], so it needs no separate arc).
pub fn establish_arc_consistency(
    grid: &Grid,
    slots: &[Slot],
    crossings: &[Crossing],
    index: &impl WordIndexView,
) -> Result<HashMap<SlotId, SlotDomain>, ArcConsistencyFailure> {
    let unfilled: Vec<&Slot> = slots.iter().filter(|s| !grid.is_slot_filled(s)).collect();

    let mut domains: HashMap<SlotId, SlotDomain> = HashMap::new();
    for slot in &unfilled {
        let pattern = grid.read_pattern(slot);
        let candidates = index.matches_refs(&pattern);
        if candidates.is_empty() {
            return Err(ArcConsistencyFailure { slot_id: slot.id });
        }
        domains.insert(slot.id, SlotDomain::new(slot.id, slot.length, candidates, index));
    }

    let unfilled_ids: std::collections::HashSet<SlotId> = unfilled.iter().map(|s| s.id).collect();
    let mut adjacency: HashMap<SlotId, Vec<Neighbor>> = HashMap::new();
    for crossing in crossings {
        if !unfilled_ids.contains(&crossing.a) || !unfilled_ids.contains(&crossing.b) {
            continue;
        }
        adjacency.entry(crossing.a).or_default().push(Neighbor {
            slot: crossing.b,
            self_offset: crossing.a_offset,
            other_offset: crossing.b_offset,
        });
        adjacency.entry(crossing.b).or_default().push(Neighbor {
            slot: crossing.a,
            self_offset: crossing.b_offset,
            other_offset: crossing.a_offset,
        });
    }

    let mut queue: VecDeque<(SlotId, SlotId, usize, usize)> = VecDeque::new();
    for (&from, neighbors) in &adjacency {
        for n in neighbors {
            queue.push_back((from, n.slot, n.self_offset, n.other_offset));
        }
    }

    while let Some((x, y, x_offset, y_offset)) = queue.pop_front() {
        if revise(&mut domains, x, y, x_offset, y_offset, index) {
            if domains[&x].candidates.is_empty() {
                return Err(ArcConsistencyFailure { slot_id: x });
            }
            if let Some(neighbors) = adjacency.get(&x) {
                for n in neighbors {
                    if n.slot != y {
                        queue.push_back((n.slot, x, n.other_offset, n.self_offset));
                    }
                }
            }
        }
    }

    Ok(domains)
}

/// Removes every candidate from `domains[x]` that has no supporting candidate in `domains[y]` at
/// the shared cell. Returns whether anything was removed.
fn revise(
    domains: &mut HashMap<SlotId, SlotDomain>,
    x: SlotId,
    y: SlotId,
    x_offset: usize,
    y_offset: usize,
    index: &impl WordIndexView,
) -> bool {
    let mut to_remove = Vec::new();
    {
        let domain_x = &domains[&x];
        let domain_y = &domains[&y];
        for (i, candidate) in domain_x.candidates.iter().enumerate() {
            let glyph = index.resolve(*candidate).text.chars().nth(x_offset).expect("offset within word length");
            if !domain_y.has_support_at(y_offset, glyph) {
                to_remove.push(i);
            }
        }
    }
    if to_remove.is_empty() {
        return false;
    }
    let domain_x = domains.get_mut(&x).expect("domain exists");
    // Remove highest indices first: SlotDomain::remove uses swap_remove.
    for &i in to_remove.iter().rev() {
        domain_x.remove(i, index);
    }
    true
}
