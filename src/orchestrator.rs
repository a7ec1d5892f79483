//! Ties every other module together into the one entry point callers actually use.
//!
//! A generation attempt runs in up to three phases:
//! 1. A "smart path": one plan-first pass, budgeted at roughly 40% of the overall time budget,
//!    that greedily seeds theme words onto slots by length before the filler ever runs, with no
//!    placer backtracking. If this alone clears the grid, it saves the rest of the pipeline.
//! 2. The ordinary pattern loop: try every black-square pattern (or the caller's chosen subset),
//!    placing theme words with the full friendliness/position-scoring placer, filling the rest
//!    from the dictionary, and repairing via black-cell insertion if arc consistency chokes. Up to
//!    5 successful fills are kept; a fill whose thematic fraction reaches 70% is returned
//!    immediately rather than searched past.
//! 3. If nothing in the pattern loop succeeded at all, up to three recovery attempts rerun the
//!    pattern loop with alternative theme-word orderings (as given, a seeded shuffle, and with the
//!    least-friendly word dropped), in case the default friendliness ordering itself was the
//!    problem.
//!
//! Across all three phases, the goal is "place as many theme words as will fit", not "place every
//! theme word or fail": an unplaceable word is deferred by the placer and surfaces afterward in
//! `unplaced_theme_words`, it never sinks the whole attempt.

use instant::Instant;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::collections::{HashMap, HashSet};
use std::time::Duration;

use crate::arc_consistency::establish_arc_consistency;
use crate::backtracking_search::{search, SearchStatus};
use crate::config::{validate_theme_words, GenerationOptions, ThemeWord, ValidatedThemeWords};
use crate::grid::{find_crossings, Cell, Grid, Slot};
use crate::patterns::{BlackPattern, PATTERN_LIBRARY};
use crate::repair::repair;
use crate::theme_placer::{friendliness_score, order_theme_words, place_ordered_theme_words, place_theme_words};
use crate::types::{CellSource, SlotId};
use crate::validator::check_strict;
use crate::word_list::{BoostedWordIndex, WordIndexView, WordList};
use crate::{GenerationResult, PlacedWord, Stats};

/// Thematic fraction at or above this is "excellent": the orchestrator returns immediately instead
/// of continuing to search for something marginally better.
const EXCELLENT_THEMATIC_FRACTION: f64 = 0.7;
/// At most this many successful fills are kept in memory at once.
const MAX_KEPT_CANDIDATES: usize = 5;
/// Share of the overall time budget given to the smart path's single pass.
const SMART_PATH_BUDGET_FRACTION: f64 = 0.4;

/// A completed, valid fill, scored for comparison against whatever else gets kept alongside it.
struct Candidate {
    grid: Grid,
    pattern_name: &'static str,
    repair_iterations: usize,
    thematic_fraction: f64,
    mean_weight: f64,
}

enum FillOutcome {
    Success(Grid),
    Partial(Grid),
}

/// The public generation entry point. See the module doc for the three-phase strategy.
#[must_use]
pub fn generate(options: &GenerationOptions) -> GenerationResult {
    let deadline = Instant::now() + options.time_budget;
    let validated = validate_theme_words(&options.theme_words);
    let base_index = WordList::default_index();
    let boost_texts: Vec<String> = validated.accepted.iter().filter(|t| t.boost).map(|t| t.text.clone()).collect();
    let index = BoostedWordIndex::new(base_index, &boost_texts);

    let patterns: Vec<&BlackPattern> = match &options.pattern_names {
        Some(names) => names.iter().filter_map(|n| crate::patterns::by_name(n)).collect(),
        None => PATTERN_LIBRARY.iter().collect(),
    };
    let theme_texts: Vec<&str> = validated.accepted.iter().map(|t| t.text.as_str()).collect();

    let mut patterns_tried = 0usize;
    let mut repair_iterations_total = 0usize;
    let mut candidates_generated = 0usize;
    let mut attempts = 0usize;
    let mut kept: Vec<Candidate> = Vec::new();
    let mut best_partial: Option<Grid> = None;

    let smart_deadline = {
        let budget_secs = (options.time_budget.as_secs_f64() * SMART_PATH_BUDGET_FRACTION).max(0.0);
        deadline.min(Instant::now() + Duration::from_secs_f64(budget_secs))
    };
    if let Some(candidate) = run_smart_path(
        &patterns,
        &theme_texts,
        &index,
        options,
        smart_deadline,
        &mut patterns_tried,
        &mut repair_iterations_total,
        &mut candidates_generated,
        &mut best_partial,
    ) {
        if candidate.thematic_fraction >= EXCELLENT_THEMATIC_FRACTION {
            return finish(Some(candidate), best_partial, patterns_tried, repair_iterations_total, candidates_generated, &validated);
        }
        keep_candidate(&mut kept, candidate);
    }

    'patterns: for pattern in &patterns {
        if Instant::now() >= deadline {
            break;
        }
        patterns_tried += 1;
        let Some(base_grid) = pattern.apply(&Grid::empty()) else {
            continue;
        };

        for retry in 0..max_retries_per_pattern(options) {
            if attempts >= options.max_candidates || Instant::now() >= deadline {
                break 'patterns;
            }
            attempts += 1;

            let mut grid = base_grid.clone();
            let _ = place_theme_words(&mut grid, &theme_texts, &index);

            let (outcome, repair_iterations) = attempt_fill(grid, &index, options, deadline, options.seed.wrapping_add(retry as u64));
            repair_iterations_total += repair_iterations;
            candidates_generated += 1;

            match outcome {
                FillOutcome::Success(filled) => {
                    let candidate = to_candidate(filled, pattern.name, repair_iterations, &index);
                    if candidate.thematic_fraction >= EXCELLENT_THEMATIC_FRACTION {
                        return finish(Some(candidate), best_partial, patterns_tried, repair_iterations_total, candidates_generated, &validated);
                    }
                    keep_candidate(&mut kept, candidate);
                }
                FillOutcome::Partial(partial) => {
                    if best_partial.is_none() {
                        best_partial = Some(partial);
                    }
                }
            }
        }
    }

    if kept.is_empty() {
        run_recovery_attempts(
            &patterns,
            &theme_texts,
            &index,
            options,
            deadline,
            &mut patterns_tried,
            &mut repair_iterations_total,
            &mut candidates_generated,
            &mut best_partial,
            &mut kept,
        );
    }

    let best = best_of(kept);
    finish(best, best_partial, patterns_tried, repair_iterations_total, candidates_generated, &validated)
}

/// Runs arc consistency, repair-on-failure, and the backtracking search over a single
/// theme-seeded grid, returning either a fully valid fill or the best partial state reached.
fn attempt_fill(grid: Grid, index: &impl WordIndexView, options: &GenerationOptions, deadline: Instant, seed: u64) -> (FillOutcome, usize) {
    let slots = grid.enumerate_slots();
    let crossings = find_crossings(&slots);
    let mut working_grid = grid.clone();
    let mut repair_iterations = 0;

    let domains = match establish_arc_consistency(&working_grid, &slots, &crossings, index) {
        Ok(domains) => domains,
        Err(_) => {
            let outcome = repair(&working_grid, index, options.max_repair_iterations);
            repair_iterations = outcome.black_cells_added;
            if !outcome.resolved {
                return (FillOutcome::Partial(outcome.grid), repair_iterations);
            }
            working_grid = outcome.grid;
            let slots2 = working_grid.enumerate_slots();
            let crossings2 = find_crossings(&slots2);
            match establish_arc_consistency(&working_grid, &slots2, &crossings2, index) {
                Ok(domains) => domains,
                Err(_) => return (FillOutcome::Partial(working_grid), repair_iterations),
            }
        }
    };

    let slots = working_grid.enumerate_slots();
    let crossings = find_crossings(&slots);
    let domain_map: HashMap<_, _> = domains.into_iter().map(|(k, v)| (k, v.candidates)).collect();
    let per_attempt_deadline = deadline.min(Instant::now() + per_attempt_budget(options));

    match search(&domain_map, &crossings, index, Some(per_attempt_deadline), seed, options.bias) {
        SearchStatus::Solved(outcome) => {
            for (slot_id, word_ref) in &outcome.assignments {
                let slot = slots.iter().find(|s| s.id == *slot_id).expect("assignment targets a real slot");
                let text = index.resolve(*word_ref).text.clone();
                let _ = working_grid.place_word(slot, &text, CellSource::Auto);
            }
            // The filler and placer both validate as they go, but repair's black-cell insertions
            // can shorten a slot into a run neither of them re-checked; gate once more here before
            // trusting the fill as a finished puzzle.
            if check_strict(&working_grid, &slots, index) {
                (FillOutcome::Success(working_grid), repair_iterations)
            } else {
                (FillOutcome::Partial(working_grid), repair_iterations)
            }
        }
        SearchStatus::Exhausted | SearchStatus::TimedOut => (FillOutcome::Partial(working_grid), repair_iterations),
    }
}

/// The smart path: a single pass, across patterns, that greedily seeds theme words onto slots by
/// length (maximizing overlap with whatever is already seeded) with no placer backtracking, then
/// fills normally. Bounded by `deadline`, which the caller sets to a fraction of the overall
/// budget rather than the whole thing.
#[allow(clippy::too_many_arguments)]
fn run_smart_path(
    patterns: &[&BlackPattern],
    theme_texts: &[&str],
    index: &impl WordIndexView,
    options: &GenerationOptions,
    deadline: Instant,
    patterns_tried: &mut usize,
    repair_iterations_total: &mut usize,
    candidates_generated: &mut usize,
    best_partial: &mut Option<Grid>,
) -> Option<Candidate> {
    if theme_texts.is_empty() {
        return None;
    }

    for pattern in patterns {
        if Instant::now() >= deadline {
            break;
        }
        *patterns_tried += 1;
        let Some(base_grid) = pattern.apply(&Grid::empty()) else {
            continue;
        };

        let mut grid = base_grid.clone();
        greedy_seed_theme_words(&mut grid, theme_texts);

        let (outcome, repair_iterations) = attempt_fill(grid, index, options, deadline, options.seed);
        *repair_iterations_total += repair_iterations;
        *candidates_generated += 1;

        match outcome {
            FillOutcome::Success(filled) => return Some(to_candidate(filled, pattern.name, repair_iterations, index)),
            FillOutcome::Partial(partial) => {
                if best_partial.is_none() {
                    *best_partial = Some(partial);
                }
            }
        }
    }
    None
}

/// Greedily assigns theme words (friendliest first) to same-length slots, preferring the slot that
/// would overlap the most already-placed theme letters. Skips a word outright rather than
/// backtrack once a slot has been claimed.
fn greedy_seed_theme_words(grid: &mut Grid, theme_texts: &[&str]) {
    let ordered = order_theme_words(theme_texts);
    let mut used_slots: HashSet<SlotId> = HashSet::new();

    for word in &ordered {
        let slots = grid.enumerate_slots();
        let mut candidates: Vec<&Slot> = slots.iter().filter(|s| s.length == word.len() && !used_slots.contains(&s.id)).collect();
        if candidates.is_empty() {
            continue;
        }
        candidates.sort_by_key(|s| std::cmp::Reverse(intersection_potential(grid, s, word)));

        for slot in candidates {
            let pattern = grid.read_pattern(slot);
            if crate::util::pattern_matches(&pattern, word) && grid.place_word(slot, word, CellSource::Theme) {
                used_slots.insert(slot.id);
                break;
            }
        }
    }
}

/// How many of `word`'s letters would land on a cell the grid already has a matching letter in.
fn intersection_potential(grid: &Grid, slot: &Slot, word: &str) -> usize {
    slot.cells()
        .into_iter()
        .zip(word.chars())
        .filter(|&((row, col), ch)| matches!(grid.get(row, col), Cell::Letter(existing, _) if existing == ch))
        .count()
}

/// Reruns the pattern loop up to three times with alternative theme-word orderings, only once the
/// default friendliness ordering failed to produce any successful fill at all: as given (identity),
/// a seeded shuffle, and with the single least-friendly word dropped entirely.
#[allow(clippy::too_many_arguments)]
fn run_recovery_attempts(
    patterns: &[&BlackPattern],
    theme_texts: &[&str],
    index: &impl WordIndexView,
    options: &GenerationOptions,
    deadline: Instant,
    patterns_tried: &mut usize,
    repair_iterations_total: &mut usize,
    candidates_generated: &mut usize,
    best_partial: &mut Option<Grid>,
    kept: &mut Vec<Candidate>,
) {
    if theme_texts.is_empty() {
        return;
    }

    for ordering in recovery_orderings(theme_texts, options.seed) {
        if Instant::now() >= deadline {
            break;
        }

        for pattern in patterns {
            if Instant::now() >= deadline {
                break;
            }
            *patterns_tried += 1;
            let Some(base_grid) = pattern.apply(&Grid::empty()) else {
                continue;
            };

            let mut grid = base_grid.clone();
            let _ = place_ordered_theme_words(&mut grid, &ordering, index);

            let (outcome, repair_iterations) = attempt_fill(grid, index, options, deadline, options.seed);
            *repair_iterations_total += repair_iterations;
            *candidates_generated += 1;

            match outcome {
                FillOutcome::Success(filled) => {
                    keep_candidate(kept, to_candidate(filled, pattern.name, repair_iterations, index));
                    break;
                }
                FillOutcome::Partial(partial) => {
                    if best_partial.is_none() {
                        *best_partial = Some(partial);
                    }
                }
            }
        }
    }
}

/// The three alternative theme-word orderings a recovery attempt tries in turn.
fn recovery_orderings(theme_texts: &[&str], seed: u64) -> Vec<Vec<String>> {
    let identity: Vec<String> = theme_texts.iter().map(|s| (*s).to_string()).collect();

    let mut shuffled = identity.clone();
    let mut rng = SmallRng::seed_from_u64(seed);
    shuffled.shuffle(&mut rng);

    let mut drop_least_friendly = identity.clone();
    if let Some((worst, _)) = drop_least_friendly.iter().enumerate().min_by_key(|(_, word)| friendliness_score(word)) {
        drop_least_friendly.remove(worst);
    }

    vec![identity, shuffled, drop_least_friendly]
}

fn max_retries_per_pattern(options: &GenerationOptions) -> usize {
    (options.max_candidates / PATTERN_LIBRARY.len().max(1)).max(1)
}

fn per_attempt_budget(options: &GenerationOptions) -> Duration {
    let denom = options.max_candidates.max(1) as u32;
    (options.time_budget / denom).max(Duration::from_millis(25))
}

fn to_candidate(grid: Grid, pattern_name: &'static str, repair_iterations: usize, index: &impl WordIndexView) -> Candidate {
    let thematic_fraction = compute_thematic_fraction(&grid, index);
    let mean_weight = compute_mean_weight(&grid, index);
    Candidate {
        grid,
        pattern_name,
        repair_iterations,
        thematic_fraction,
        mean_weight,
    }
}

/// Keeps `candidate` among the best [`MAX_KEPT_CANDIDATES`] seen so far, evicting the weakest kept
/// one (lowest thematic fraction, then lowest mean weight) once the pool is full.
fn keep_candidate(kept: &mut Vec<Candidate>, candidate: Candidate) {
    kept.push(candidate);
    if kept.len() > MAX_KEPT_CANDIDATES {
        let worst = kept
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| candidate_order(a, b))
            .map(|(i, _)| i)
            .expect("kept is nonempty right after a push");
        kept.remove(worst);
    }
}

/// The best of a (possibly empty) kept pool: highest thematic fraction, ties broken by mean weight.
fn best_of(kept: Vec<Candidate>) -> Option<Candidate> {
    kept.into_iter().max_by(candidate_order)
}

fn candidate_order(a: &Candidate, b: &Candidate) -> std::cmp::Ordering {
    a.thematic_fraction
        .partial_cmp(&b.thematic_fraction)
        .unwrap_or(std::cmp::Ordering::Equal)
        .then_with(|| a.mean_weight.partial_cmp(&b.mean_weight).unwrap_or(std::cmp::Ordering::Equal))
}

fn compute_thematic_fraction(grid: &Grid, index: &impl WordIndexView) -> f64 {
    let slots = grid.enumerate_slots();
    if slots.is_empty() {
        return 0.0;
    }
    let thematic = slots.iter().filter(|s| is_thematic_text(&grid.read_pattern(s), index)).count();
    thematic as f64 / slots.len() as f64
}

fn compute_mean_weight(grid: &Grid, index: &impl WordIndexView) -> f64 {
    let slots = grid.enumerate_slots();
    if slots.is_empty() {
        return 0.0;
    }
    let total: f64 = slots.iter().map(|s| f64::from(word_weight(&grid.read_pattern(s), index))).sum();
    total / slots.len() as f64
}

fn word_weight(text: &str, index: &impl WordIndexView) -> f32 {
    index
        .matches_refs(text)
        .into_iter()
        .find(|r| index.resolve(*r).text == text)
        .map_or(0.0, |r| index.resolve(r).class.weight())
}

fn is_thematic_text(text: &str, index: &impl WordIndexView) -> bool {
    index.matches_refs(text).into_iter().any(|r| index.resolve(r).text == text && index.resolve(r).class.is_thematic())
}

fn finish(
    best: Option<Candidate>,
    best_partial: Option<Grid>,
    patterns_tried: usize,
    repair_iterations: usize,
    candidates_generated: usize,
    validated: &ValidatedThemeWords,
) -> GenerationResult {
    let stats = Stats {
        patterns_tried,
        repair_iterations,
        candidates_generated,
    };
    let mut result = match best {
        Some(candidate) => to_result(candidate.grid, true, Some(candidate.pattern_name.to_string()), stats, &validated.accepted),
        None => to_result(best_partial.unwrap_or_else(Grid::empty), false, None, stats, &validated.accepted),
    };
    result.unplaced_theme_words.splice(0..0, validated.rejected.iter().cloned());
    result
}

fn to_result(grid: Grid, success: bool, pattern_name: Option<String>, stats: Stats, theme_words: &[ThemeWord]) -> GenerationResult {
    let slots = grid.enumerate_slots();
    let numbers: HashMap<_, _> = grid.number_slots(&slots).into_iter().collect();
    let black_cells: Vec<(usize, usize)> = (0..crate::types::GRID_SIZE)
        .flat_map(|r| (0..crate::types::GRID_SIZE).map(move |c| (r, c)))
        .filter(|&(r, c)| grid.get(r, c).is_black())
        .collect();
    let words: Vec<PlacedWord> = slots
        .iter()
        .map(|slot| {
            let text = grid.read_pattern(slot);
            PlacedWord {
                slot_id: slot.id,
                direction: slot.direction,
                row: slot.start_row,
                col: slot.start_col,
                length: slot.length,
                number: numbers.get(&slot.id).copied().unwrap_or(0),
                clue: theme_words.iter().find(|t| t.text == text).and_then(|t| t.clue.clone()),
                text,
                source: grid.slot_source(slot),
            }
        })
        .collect();

    let placed_texts: std::collections::HashSet<&str> = words.iter().map(|w| w.text.as_str()).collect();
    let unplaced_theme_words = theme_words.iter().filter(|t| !placed_texts.contains(t.text.as_str())).cloned().collect();

    GenerationResult {
        success,
        pattern_name,
        words,
        black_cells,
        unplaced_theme_words,
        stats,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_with_no_theme_words_fills_the_open_pattern() {
        let options = GenerationOptions {
            time_budget: Duration::from_secs(2),
            max_candidates: 8,
            ..GenerationOptions::default()
        };
        let result = generate(&options);
        assert!(result.success, "an unconstrained 5x5 grid should be fillable from the bundled dictionary");
        assert!(result.words.iter().all(|w| !w.text.contains('.')));
    }

    #[test]
    fn generate_places_a_requested_theme_word() {
        let options = GenerationOptions {
            theme_words: vec![ThemeWord::new("ISLAM")],
            time_budget: Duration::from_secs(2),
            max_candidates: 12,
            ..GenerationOptions::default()
        };
        let result = generate(&options);
        assert!(result.words.iter().any(|w| w.text == "ISLAM"));
    }

    #[test]
    fn an_unplaceable_theme_word_does_not_sink_the_rest() {
        let options = GenerationOptions {
            theme_words: vec![ThemeWord::new("ISLAM"), ThemeWord::new("MUHAMMAD")],
            time_budget: Duration::from_secs(2),
            max_candidates: 16,
            ..GenerationOptions::default()
        };
        let result = generate(&options);
        assert!(result.unplaced_theme_words.iter().any(|t| t.text == "MUHAMMAD"));
        // An 8-letter word can never fit a 5x5 grid, but that alone must not prevent a full,
        // successful fill with the other requested word placed.
        if result.success {
            assert!(result.words.iter().any(|w| w.text == "ISLAM"));
        }
    }

    #[test]
    fn invalid_theme_words_are_dropped_before_placement_is_even_attempted() {
        let options = GenerationOptions {
            theme_words: vec![ThemeWord::new("A"), ThemeWord::new("ISLAM")],
            time_budget: Duration::from_secs(2),
            max_candidates: 12,
            ..GenerationOptions::default()
        };
        let result = generate(&options);
        assert!(result.unplaced_theme_words.iter().any(|t| t.text == "A"));
    }

    #[test]
    fn duplicate_theme_words_are_rejected_keeping_the_first() {
        let options = GenerationOptions {
            theme_words: vec![ThemeWord::new("ISLAM").with_id("a"), ThemeWord::new("islam").with_id("b")],
            time_budget: Duration::from_secs(2),
            max_candidates: 12,
            ..GenerationOptions::default()
        };
        let result = generate(&options);
        assert!(result.unplaced_theme_words.iter().any(|t| t.id.as_deref() == Some("b")));
    }
}
