//! Small helpers shared by the arc-consistency and backtracking search modules.
//!
//! Both of those modules need to ask, cheaply and repeatedly, "does any word still in this slot's
//! domain place glyph G at cell position P?" Re-scanning the whole domain for that is wasteful once
//! domains number in the hundreds, so we keep a running per-cell letter histogram instead.

use crate::types::WILDCARD;
use crate::word_list::Word;

/// Per-cell letter-availability counts for the options currently live in a slot's domain. Index 0
/// corresponds to 'A', index 25 to 'Z'.
pub type GlyphCounts = [u32; 26];

/// One `GlyphCounts` per cell position in a slot.
pub type GlyphCountsByCell = Vec<GlyphCounts>;

#[must_use]
pub fn glyph_index(ch: char) -> usize {
    debug_assert!(ch.is_ascii_uppercase(), "expected an uppercase letter, got {ch:?}");
    (ch as u8 - b'A') as usize
}

#[must_use]
pub fn index_glyph(idx: usize) -> char {
    debug_assert!(idx < 26);
    (b'A' + idx as u8) as char
}

/// Build per-cell glyph counts for the given set of candidate words, all assumed to share
/// `length`. Used both to seed a slot's initial counts and to rebuild them after backtracking.
#[must_use]
pub fn build_glyph_counts_by_cell<'a>(
    words: impl IntoIterator<Item = &'a Word>,
    length: usize,
) -> GlyphCountsByCell {
    let mut counts = vec![[0u32; 26]; length];
    for word in words {
        for (cell_idx, ch) in word.text.chars().enumerate() {
            counts[cell_idx][glyph_index(ch)] += 1;
        }
    }
    counts
}

/// Does `pattern` (a length-L string over A-Z and [`WILDCARD`]) admit `word`? Both must already be
/// uppercase; non-matching lengths are simply not admitted.
#[must_use]
pub fn pattern_matches(pattern: &str, word: &str) -> bool {
    pattern.len() == word.len()
        && pattern
            .chars()
            .zip(word.chars())
            .all(|(p, w)| p == WILDCARD || p == w)
}
