//! Generation request types: what the caller wants filled in, and how hard to try.

use std::time::Duration;

/// A theme word the caller wants to see in the finished puzzle.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde_derive::Serialize, serde_derive::Deserialize))]
pub struct ThemeWord {
    pub text: String,
    /// Opaque clue text, preserved verbatim from input to output. The engine never inspects it.
    pub clue: Option<String>,
    /// Caller-supplied identifier, echoed back on [`crate::PlacedWord`] and in
    /// `GenerationResult::unplaced_theme_words` so the caller can match a result back to its
    /// request without relying on text equality.
    pub id: Option<String>,
    /// If true, this word's text is also boosted to the top of the filler's own ranking wherever
    /// it could legally cross a theme slot, rather than only being placed once directly.
    pub boost: bool,
}

impl ThemeWord {
    #[must_use]
    pub fn new(text: impl Into<String>) -> ThemeWord {
        ThemeWord {
            text: text.into(),
            clue: None,
            id: None,
            boost: false,
        }
    }

    #[must_use]
    pub fn boosted(text: impl Into<String>) -> ThemeWord {
        ThemeWord {
            text: text.into(),
            clue: None,
            id: None,
            boost: true,
        }
    }

    #[must_use]
    pub fn with_clue(mut self, clue: impl Into<String>) -> ThemeWord {
        self.clue = Some(clue.into());
        self
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> ThemeWord {
        self.id = Some(id.into());
        self
    }
}

/// The result of normalizing a caller's theme-word request: words that survived validation
/// (uppercased, ready for placement), and words that were dropped along with the reason they
/// never got a chance at a slot.
pub(crate) struct ValidatedThemeWords {
    pub(crate) accepted: Vec<ThemeWord>,
    pub(crate) rejected: Vec<ThemeWord>,
}

/// Uppercases every theme word's text, drops any whose length isn't 2-5 or that contains a
/// non-letter character, and rejects duplicates (by normalized text, keeping the first
/// occurrence). Dropped words are returned separately rather than silently discarded, so the
/// caller can still report them in `unplaced_theme_words`.
pub(crate) fn validate_theme_words(theme_words: &[ThemeWord]) -> ValidatedThemeWords {
    let mut seen = std::collections::HashSet::new();
    let mut accepted = Vec::new();
    let mut rejected = Vec::new();

    for theme_word in theme_words {
        let upper = theme_word.text.to_ascii_uppercase();
        let well_formed = (2..=5).contains(&upper.len()) && upper.chars().all(|c| c.is_ascii_alphabetic());
        if !well_formed || !seen.insert(upper.clone()) {
            rejected.push(theme_word.clone());
            continue;
        }
        let mut normalized = theme_word.clone();
        normalized.text = upper;
        accepted.push(normalized);
    }

    ValidatedThemeWords { accepted, rejected }
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde_derive::Serialize, serde_derive::Deserialize))]
pub struct GenerationOptions {
    pub theme_words: Vec<ThemeWord>,
    /// Seeds the backtracking search's tie-break shuffles; same seed plus same inputs reproduces
    /// the same puzzle.
    pub seed: u64,
    /// Wall-clock budget for the whole generation attempt, across every pattern and retry.
    #[cfg_attr(feature = "serde", serde(skip, default = "default_time_budget"))]
    pub time_budget: Duration,
    /// How many distinct fill attempts (pattern x retry) to try before settling for the best
    /// candidate found so far.
    pub max_candidates: usize,
    /// Bound on repair-loop black-cell insertions per attempt.
    pub max_repair_iterations: usize,
    /// Restricts the pattern loop to these named patterns, in order, instead of the full library.
    pub pattern_names: Option<Vec<String>>,
    /// How strongly the filler's value ordering favors thematic words over plain filler, from
    /// `0.0` (ignore thematic weight entirely, pure seeded shuffle) to `1.0` (always try thematic
    /// words first). Clamped to `[0.0, 1.0]` before use.
    pub bias: f32,
}

fn default_time_budget() -> Duration {
    Duration::from_secs(5)
}

impl Default for GenerationOptions {
    fn default() -> Self {
        GenerationOptions {
            theme_words: Vec::new(),
            seed: 0,
            time_budget: default_time_budget(),
            max_candidates: 24,
            max_repair_iterations: 4,
            pattern_names: None,
            bias: 0.5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn theme_word_constructors_set_boost_flag() {
        assert!(!ThemeWord::new("ARK").boost);
        assert!(ThemeWord::boosted("ARK").boost);
    }

    #[test]
    fn clue_and_id_are_opaque_passthroughs() {
        let word = ThemeWord::new("ARK").with_clue("Noah's vessel").with_id("q7");
        assert_eq!(word.clue.as_deref(), Some("Noah's vessel"));
        assert_eq!(word.id.as_deref(), Some("q7"));
    }

    #[test]
    fn default_options_are_usable_out_of_the_box() {
        let options = GenerationOptions::default();
        assert!(options.max_candidates > 0);
        assert!(options.theme_words.is_empty());
    }

    #[test]
    fn validation_drops_over_long_and_under_long_words() {
        let words = vec![ThemeWord::new("A"), ThemeWord::new("MUHAMMAD"), ThemeWord::new("ARK")];
        let validated = validate_theme_words(&words);
        assert_eq!(validated.accepted.len(), 1);
        assert_eq!(validated.accepted[0].text, "ARK");
        assert_eq!(validated.rejected.len(), 2);
    }

    #[test]
    fn validation_drops_non_letter_text_and_uppercases_the_rest() {
        let words = vec![ThemeWord::new("ar3k"), ThemeWord::new("ark")];
        let validated = validate_theme_words(&words);
        assert_eq!(validated.accepted.len(), 1);
        assert_eq!(validated.accepted[0].text, "ARK");
        assert_eq!(validated.rejected.len(), 1);
    }

    #[test]
    fn validation_rejects_duplicates_keeping_the_first() {
        let words = vec![ThemeWord::new("ark").with_id("first"), ThemeWord::new("ARK").with_id("second")];
        let validated = validate_theme_words(&words);
        assert_eq!(validated.accepted.len(), 1);
        assert_eq!(validated.accepted[0].id.as_deref(), Some("first"));
        assert_eq!(validated.rejected.len(), 1);
        assert_eq!(validated.rejected[0].id.as_deref(), Some("second"));
    }
}
