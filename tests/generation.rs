use pentacross_core::config::{GenerationOptions, ThemeWord};
use pentacross_core::generate;
use pentacross_core::types::GRID_SIZE;
use std::collections::HashSet;
use std::time::Duration;

#[test]
fn generates_a_complete_grid_with_no_theme_words() {
    let options = GenerationOptions {
        time_budget: Duration::from_secs(3),
        max_candidates: 16,
        ..GenerationOptions::default()
    };
    let result = generate(&options);
    assert!(result.success);
    assert!(!result.words.is_empty());
    for word in &result.words {
        assert!(!word.text.contains('.'), "word {} left unfilled", word.text);
    }
}

#[test]
fn places_requested_theme_words() {
    let options = GenerationOptions {
        theme_words: vec![ThemeWord::new("ISLAM"), ThemeWord::new("PEACE")],
        time_budget: Duration::from_secs(3),
        max_candidates: 32,
        ..GenerationOptions::default()
    };
    let result = generate(&options);
    let texts: HashSet<&str> = result.words.iter().map(|w| w.text.as_str()).collect();
    assert!(texts.contains("ISLAM"));
    assert!(texts.contains("PEACE"));
}

#[test]
fn black_cells_always_respect_180_degree_symmetry() {
    let options = GenerationOptions {
        theme_words: vec![ThemeWord::new("ARK")],
        time_budget: Duration::from_secs(3),
        max_candidates: 16,
        ..GenerationOptions::default()
    };
    let result = generate(&options);
    let cells: HashSet<(usize, usize)> = result.black_cells.iter().copied().collect();
    for &(r, c) in &cells {
        let mirror = (GRID_SIZE - 1 - r, GRID_SIZE - 1 - c);
        assert!(cells.contains(&mirror), "black cell ({r},{c}) has no symmetric partner");
    }
}

#[test]
fn successful_fills_never_repeat_a_word() {
    let options = GenerationOptions {
        theme_words: vec![ThemeWord::boosted("NILE")],
        time_budget: Duration::from_secs(3),
        max_candidates: 24,
        ..GenerationOptions::default()
    };
    let result = generate(&options);
    if result.success {
        let mut seen = HashSet::new();
        for word in &result.words {
            assert!(seen.insert(word.text.clone()), "word {} placed twice", word.text);
        }
    }
}

#[test]
fn an_oversized_theme_word_does_not_panic_and_reports_failure_or_drops_it() {
    let options = GenerationOptions {
        theme_words: vec![ThemeWord::new("MUHAMMAD")],
        time_budget: Duration::from_millis(500),
        max_candidates: 4,
        ..GenerationOptions::default()
    };
    let result = generate(&options);
    // An eight-letter word can never fit a 5x5 grid; generation must not panic, and must not
    // claim the word was placed.
    assert!(!result.words.iter().any(|w| w.text == "MUHAMMAD"));
}

#[test]
fn generation_result_round_trips_through_json() {
    let options = GenerationOptions {
        theme_words: vec![ThemeWord::new("ARK")],
        time_budget: Duration::from_secs(2),
        max_candidates: 12,
        ..GenerationOptions::default()
    };
    let result = generate(&options);
    let json = serde_json::to_string(&result).expect("GenerationResult must serialize");
    let round_tripped: pentacross_core::GenerationResult = serde_json::from_str(&json).expect("GenerationResult must deserialize");
    assert_eq!(result.success, round_tripped.success);
    assert_eq!(result.words, round_tripped.words);
    assert_eq!(result.black_cells, round_tripped.black_cells);
}

#[test]
fn a_placed_theme_words_clue_is_carried_through_verbatim() {
    let options = GenerationOptions {
        theme_words: vec![ThemeWord::new("ARK").with_clue("Noah's vessel")],
        time_budget: Duration::from_secs(2),
        max_candidates: 16,
        ..GenerationOptions::default()
    };
    let result = generate(&options);
    if result.words.iter().any(|w| w.text == "ARK") {
        let placed = result.words.iter().find(|w| w.text == "ARK").unwrap();
        assert_eq!(placed.clue.as_deref(), Some("Noah's vessel"));
    }
}

#[test]
fn an_unplaceable_theme_word_shows_up_in_unplaced_theme_words() {
    let options = GenerationOptions {
        theme_words: vec![ThemeWord::new("MUHAMMAD")],
        time_budget: Duration::from_millis(500),
        max_candidates: 4,
        ..GenerationOptions::default()
    };
    let result = generate(&options);
    assert!(result.unplaced_theme_words.iter().any(|t| t.text == "MUHAMMAD"));
}

#[test]
fn restricting_to_a_single_named_pattern_is_honored() {
    let options = GenerationOptions {
        pattern_names: Some(vec!["center".to_string()]),
        time_budget: Duration::from_secs(2),
        max_candidates: 8,
        ..GenerationOptions::default()
    };
    let result = generate(&options);
    if result.success {
        assert_eq!(result.pattern_name.as_deref(), Some("center"));
    }
}
