//! The bundled dictionary: loading, weight classification, and pattern queries.
//!
//! The default word list is built once per process, behind a `lazy_static`, the same way the
//! teacher library builds its own static tables. After construction it is immutable; per-request
//! "boost" a caller wants (e.g. for theme words) is layered on top via [`BoostedWordIndex`] rather
//! than by mutating the shared instance.

use fancy_regex::Regex;
use lazy_static::lazy_static;
use std::collections::{HashMap, HashSet};

use crate::types::{WordId, MAX_WORD_LEN, MIN_WORD_LEN};
use crate::util::pattern_matches;

/// The bundled corpus, normalized once at process startup.
const BUNDLED_CORPUS: &str = include_str!("../resources/dictionary.txt");

/// A word's weight class. Ordering matters: `Ord` is used directly to rank candidates, highest
/// class first, so the declaration order below is also the priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde_derive::Serialize, serde_derive::Deserialize))]
pub enum WeightClass {
    Rare,
    Common,
    ThematicFiller,
    ThematicPrimary,
    /// Only ever produced by a [`BoostedWordIndex`]; never stored in the base word list.
    Boosted,
}

impl WeightClass {
    /// A numeric weight for averaging in generation stats. Kept separate from `Ord` so that the
    /// exact spacing between classes can change without disturbing comparisons elsewhere.
    #[must_use]
    pub fn weight(self) -> f32 {
        match self {
            WeightClass::Rare => 1.0,
            WeightClass::Common => 2.0,
            WeightClass::ThematicFiller => 3.0,
            WeightClass::ThematicPrimary => 4.0,
            WeightClass::Boosted => 5.0,
        }
    }

    fn from_corpus_label(label: &str) -> WeightClass {
        match label.trim().to_ascii_uppercase().as_str() {
            "PRIMARY" => WeightClass::ThematicPrimary,
            "FILLER" => WeightClass::ThematicFiller,
            "RARE" => WeightClass::Rare,
            _ => WeightClass::Common,
        }
    }

    #[must_use]
    pub fn is_thematic(self) -> bool {
        matches!(self, WeightClass::ThematicPrimary | WeightClass::ThematicFiller)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde_derive::Serialize, serde_derive::Deserialize))]
pub struct Word {
    pub text: String,
    pub length: usize,
    pub class: WeightClass,
}

/// A resolvable handle to one candidate word from a [`WordIndexView`]. Carries its own length so
/// callers can index straight into the right length bucket without extra bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WordRef {
    pub length: usize,
    pub id: WordId,
    boosted: bool,
}

/// The bundled dictionary. `words[length]` holds every retained word of that length; a `WordId` is
/// only meaningful paired with the length bucket it indexes into.
#[derive(Debug)]
pub struct WordList {
    pub words: Vec<Vec<Word>>,
    by_first_and_length: HashMap<(usize, char), Vec<WordId>>,
    text_set: HashSet<String>,
}

impl WordList {
    /// Parse a corpus of `WORD,CLASS` lines (one per row; `CLASS` optional, defaults to `COMMON`).
    /// Anything outside length 2-5, containing non-letters, or repeated is dropped.
    #[must_use]
    pub fn from_corpus(corpus: &str) -> WordList {
        lazy_static! {
            static ref VALID_WORD: Regex = Regex::new(r"^[A-Z]{2,5}$").expect("static pattern compiles");
        }

        let mut words: Vec<Vec<Word>> = vec![Vec::new(); MAX_WORD_LEN + 1];
        let mut by_first_and_length: HashMap<(usize, char), Vec<WordId>> = HashMap::new();
        let mut text_set = HashSet::new();

        for line in corpus.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut parts = line.splitn(2, ',');
            let Some(raw_text) = parts.next() else { continue };
            let text = raw_text.trim().to_ascii_uppercase();

            if !VALID_WORD.is_match(&text).unwrap_or(false) {
                continue;
            }
            if !text_set.insert(text.clone()) {
                continue;
            }

            let class = WeightClass::from_corpus_label(parts.next().unwrap_or("COMMON"));
            let length = text.len();
            let word_id = words[length].len();
            let first = text.chars().next().expect("non-empty after regex match");

            by_first_and_length.entry((length, first)).or_default().push(word_id);
            words[length].push(Word { text, length, class });
        }

        WordList { words, by_first_and_length, text_set }
    }

    /// The process-wide default dictionary, built once on first use.
    #[must_use]
    pub fn default_index() -> &'static WordList {
        &DEFAULT_WORD_LIST
    }

    #[must_use]
    pub fn contains(&self, word: &str) -> bool {
        self.text_set.contains(word)
    }

    #[must_use]
    pub fn by_length(&self, length: usize) -> &[Word] {
        self.words.get(length).map_or(&[], Vec::as_slice)
    }

    /// Every word id (within `pattern`'s length bucket) whose letters agree with `pattern` at every
    /// fixed position.
    #[must_use]
    pub fn matches(&self, pattern: &str) -> Vec<WordId> {
        let length = pattern.len();
        if !(MIN_WORD_LEN..=MAX_WORD_LEN).contains(&length) {
            return Vec::new();
        }
        let first = pattern.chars().next().expect("non-empty pattern");

        if first == crate::types::WILDCARD {
            (0..self.words[length].len())
                .filter(|&id| pattern_matches(pattern, &self.words[length][id].text))
                .collect()
        } else {
            self.by_first_and_length
                .get(&(length, first))
                .into_iter()
                .flatten()
                .copied()
                .filter(|&id| pattern_matches(pattern, &self.words[length][id].text))
                .collect()
        }
    }

    /// Same as [`Self::matches`], but descending by weight class, then ascending lexicographically
    /// within a class so that ties are broken deterministically.
    #[must_use]
    pub fn matches_sorted(&self, pattern: &str) -> Vec<WordId> {
        let length = pattern.len();
        let mut ids = self.matches(pattern);
        ids.sort_by(|&a, &b| {
            let wa = &self.words[length][a];
            let wb = &self.words[length][b];
            wb.class.cmp(&wa.class).then_with(|| wa.text.cmp(&wb.text))
        });
        ids
    }

    #[must_use]
    pub fn contains_any(&self, pattern: &str) -> bool {
        let length = pattern.len();
        if !(MIN_WORD_LEN..=MAX_WORD_LEN).contains(&length) {
            return false;
        }
        let first = pattern.chars().next().expect("non-empty pattern");
        if first == crate::types::WILDCARD {
            self.words[length].iter().any(|w| pattern_matches(pattern, &w.text))
        } else {
            self.by_first_and_length.get(&(length, first)).into_iter().flatten().any(|&id| {
                pattern_matches(pattern, &self.words[length][id].text)
            })
        }
    }
}

lazy_static! {
    static ref DEFAULT_WORD_LIST: WordList = WordList::from_corpus(BUNDLED_CORPUS);
}

/// Common surface implemented by both the plain [`WordList`] and a [`BoostedWordIndex`] layered on
/// top of one, so the filler and validator can stay agnostic of which they were handed.
pub trait WordIndexView {
    fn contains(&self, word: &str) -> bool;
    fn matches_refs(&self, pattern: &str) -> Vec<WordRef>;
    fn resolve(&self, word_ref: WordRef) -> &Word;

    fn matches_refs_sorted(&self, pattern: &str) -> Vec<WordRef> {
        let mut refs = self.matches_refs(pattern);
        refs.sort_by(|&a, &b| {
            let wa = self.resolve(a);
            let wb = self.resolve(b);
            wb.class.cmp(&wa.class).then_with(|| wa.text.cmp(&wb.text))
        });
        refs
    }

    fn contains_any(&self, pattern: &str) -> bool {
        !self.matches_refs(pattern).is_empty()
    }
}

impl WordIndexView for WordList {
    fn contains(&self, word: &str) -> bool {
        WordList::contains(self, word)
    }

    fn matches_refs(&self, pattern: &str) -> Vec<WordRef> {
        let length = pattern.len();
        self.matches(pattern)
            .into_iter()
            .map(|id| WordRef { length, id, boosted: false })
            .collect()
    }

    fn resolve(&self, word_ref: WordRef) -> &Word {
        &self.words[word_ref.length][word_ref.id]
    }

    fn contains_any(&self, pattern: &str) -> bool {
        WordList::contains_any(self, pattern)
    }
}

/// A per-request overlay that temporarily raises a set of words above every other weight class.
/// Words that were not already in the base dictionary are inserted for the overlay's lifetime only.
pub struct BoostedWordIndex<'a> {
    base: &'a WordList,
    boosted_texts: HashSet<String>,
    extra_words: Vec<Vec<Word>>,
}

impl<'a> BoostedWordIndex<'a> {
    #[must_use]
    pub fn new(base: &'a WordList, boost: &[String]) -> Self {
        let mut extra_words: Vec<Vec<Word>> = vec![Vec::new(); MAX_WORD_LEN + 1];
        let mut boosted_texts = HashSet::new();

        for raw in boost {
            let text = raw.to_ascii_uppercase();
            if !(MIN_WORD_LEN..=MAX_WORD_LEN).contains(&text.len()) {
                continue;
            }
            if !boosted_texts.insert(text.clone()) {
                continue;
            }
            if !base.contains(&text) {
                extra_words[text.len()].push(Word {
                    length: text.len(),
                    text,
                    class: WeightClass::Boosted,
                });
            }
        }

        BoostedWordIndex { base, boosted_texts, extra_words }
    }
}

impl WordIndexView for BoostedWordIndex<'_> {
    fn contains(&self, word: &str) -> bool {
        self.base.contains(word) || self.boosted_texts.contains(word)
    }

    fn matches_refs(&self, pattern: &str) -> Vec<WordRef> {
        let length = pattern.len();
        if !(MIN_WORD_LEN..=MAX_WORD_LEN).contains(&length) {
            return Vec::new();
        }

        let mut refs: Vec<WordRef> = self
            .base
            .matches(pattern)
            .into_iter()
            .map(|id| WordRef { length, id, boosted: false })
            .collect();

        refs.extend(
            self.extra_words[length]
                .iter()
                .enumerate()
                .filter(|(_, w)| pattern_matches(pattern, &w.text))
                .map(|(id, _)| WordRef { length, id, boosted: true }),
        );

        refs
    }

    fn resolve(&self, word_ref: WordRef) -> &Word {
        if word_ref.boosted {
            &self.extra_words[word_ref.length][word_ref.id]
        } else {
            &self.base.words[word_ref.length][word_ref.id]
        }
    }

    fn matches_refs_sorted(&self, pattern: &str) -> Vec<WordRef> {
        let mut refs = self.matches_refs(pattern);
        refs.sort_by(|&a, &b| {
            let wa = self.resolve(a);
            let wb = self.resolve(b);
            let class_a = if self.boosted_texts.contains(&wa.text) { WeightClass::Boosted } else { wa.class };
            let class_b = if self.boosted_texts.contains(&wb.text) { WeightClass::Boosted } else { wb.class };
            class_b.cmp(&class_a).then_with(|| wa.text.cmp(&wb.text))
        });
        refs
    }
}
