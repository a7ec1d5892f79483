//! Backtracking search over the slot domains arc consistency has already pruned.
//!
//! Variable ordering follows minimum-remaining-values with a degree tie-break (fewest candidates
//! left, and among ties, most crossings — the assignment most likely to constrain its neighbors
//! usefully). Value ordering favors thematic words over filler, with ties broken by a seeded
//! shuffle so repeated generation attempts over the same grid don't always produce the same fill.
//! Forward checking prunes neighbor domains on every tentative assignment and restores them
//! exactly on backtrack, the same incremental-domain discipline [`crate::arc_consistency`] uses.

use float_ord::FloatOrd;
use instant::Instant;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::{HashMap, HashSet};

use crate::grid::Crossing;
use crate::types::SlotId;
use crate::word_list::{WordIndexView, WordRef};

pub struct SearchOutcome {
    pub assignments: HashMap<SlotId, WordRef>,
}

pub enum SearchStatus {
    Solved(SearchOutcome),
    Exhausted,
    TimedOut,
}

/// Runs the search. `initial_domains` should come straight out of
/// [`crate::arc_consistency::establish_arc_consistency`] (one entry per unfilled slot). `bias`
/// controls how strongly value ordering favors thematic words over plain filler: `1.0` is full
/// class-weight ordering, `0.0` collapses every candidate to the same key so the seeded shuffle
/// alone decides order.
#[must_use]
pub fn search(
    initial_domains: &HashMap<SlotId, Vec<WordRef>>,
    crossings: &[Crossing],
    index: &impl WordIndexView,
    deadline: Option<Instant>,
    seed: u64,
    bias: f32,
) -> SearchStatus {
    let mut adjacency: HashMap<SlotId, Vec<(SlotId, usize, usize)>> = HashMap::new();
    for c in crossings {
        if !initial_domains.contains_key(&c.a) || !initial_domains.contains_key(&c.b) {
            continue;
        }
        adjacency.entry(c.a).or_default().push((c.b, c.a_offset, c.b_offset));
        adjacency.entry(c.b).or_default().push((c.a, c.b_offset, c.a_offset));
    }

    let mut domains = initial_domains.clone();
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut assignments = HashMap::new();
    let mut used_texts: HashSet<String> = HashSet::new();
    let bias = bias.clamp(0.0, 1.0);

    match backtrack(&mut domains, &adjacency, index, &mut assignments, &mut used_texts, &mut rng, deadline, bias) {
        Ok(true) => SearchStatus::Solved(SearchOutcome { assignments }),
        Ok(false) => SearchStatus::Exhausted,
        Err(()) => SearchStatus::TimedOut,
    }
}

#[allow(clippy::too_many_arguments)]
fn backtrack(
    domains: &mut HashMap<SlotId, Vec<WordRef>>,
    adjacency: &HashMap<SlotId, Vec<(SlotId, usize, usize)>>,
    index: &impl WordIndexView,
    assignments: &mut HashMap<SlotId, WordRef>,
    used_texts: &mut HashSet<String>,
    rng: &mut SmallRng,
    deadline: Option<Instant>,
    bias: f32,
) -> Result<bool, ()> {
    if let Some(dl) = deadline {
        if Instant::now() >= dl {
            return Err(());
        }
    }

    let unassigned: Vec<SlotId> = domains.keys().copied().filter(|id| !assignments.contains_key(id)).collect();
    let Some(&chosen) = unassigned
        .iter()
        .min_by_key(|&&id| {
            let domain_size = domains[&id].len();
            let degree = adjacency.get(&id).map_or(0, Vec::len);
            (domain_size, std::cmp::Reverse(degree))
        })
    else {
        return Ok(true);
    };

    let mut candidates = domains[&chosen].clone();
    candidates.shuffle(rng);
    candidates.sort_by_key(|c| {
        let weight = index.resolve(*c).class.weight();
        std::cmp::Reverse(FloatOrd(bias.mul_add(weight, 1.0 - bias)))
    });

    for candidate in candidates {
        let text = index.resolve(candidate).text.clone();
        if used_texts.contains(&text) {
            continue;
        }

        let mut removed: Vec<(SlotId, Vec<WordRef>)> = Vec::new();
        let mut dead_end = false;
        if let Some(neighbors) = adjacency.get(&chosen) {
            for &(neighbor, self_offset, other_offset) in neighbors {
                if assignments.contains_key(&neighbor) {
                    continue;
                }
                let glyph = text.chars().nth(self_offset).expect("offset within candidate length");
                let before = domains[&neighbor].clone();
                let after: Vec<WordRef> = before
                    .iter()
                    .copied()
                    .filter(|cand| index.resolve(*cand).text.chars().nth(other_offset) == Some(glyph))
                    .collect();
                if after.len() != before.len() {
                    let emptied = after.is_empty();
                    removed.push((neighbor, before));
                    domains.insert(neighbor, after);
                    if emptied {
                        dead_end = true;
                        break;
                    }
                }
            }
        }

        if !dead_end {
            assignments.insert(chosen, candidate);
            used_texts.insert(text.clone());
            match backtrack(domains, adjacency, index, assignments, used_texts, rng, deadline, bias) {
                Ok(true) => return Ok(true),
                Err(()) => {
                    assignments.remove(&chosen);
                    used_texts.remove(&text);
                    for (slot_id, before) in removed {
                        domains.insert(slot_id, before);
                    }
                    return Err(());
                }
                Ok(false) => {
                    assignments.remove(&chosen);
                    used_texts.remove(&text);
                }
            }
        }

        for (slot_id, before) in removed {
            domains.insert(slot_id, before);
        }
    }

    Ok(false)
}
