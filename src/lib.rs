#![warn(clippy::pedantic)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::comparison_chain)]
#![allow(clippy::implicit_hasher)]
#![allow(clippy::match_on_vec_items)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::module_name_repetitions)]

//! A synthesis engine for 5x5 themed crossword puzzles: given a handful of theme words, lays out
//! black squares, places the theme words, and fills the rest of the grid from a weighted
//! dictionary using arc-consistency preprocessing and a backtracking search.
//!
//! [`generate`] is the entry point; everything else is exposed mainly so callers (and the
//! `pentacross_cli` binary) can drive the pipeline stage by stage when they want more control than
//! the default orchestration gives them.

pub mod arc_consistency;
pub mod backtracking_search;
pub mod config;
pub mod grid;
pub mod orchestrator;
pub mod patterns;
pub mod repair;
pub mod theme_placer;
pub mod types;
pub mod util;
pub mod validator;
pub mod word_list;

pub use config::{GenerationOptions, ThemeWord};
use types::{CellSource, Direction, SlotId};

/// One filled-in slot of the finished (or best-effort) grid.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde_derive::Serialize, serde_derive::Deserialize))]
pub struct PlacedWord {
    pub slot_id: SlotId,
    pub direction: Direction,
    pub row: usize,
    pub col: usize,
    pub length: usize,
    pub number: u32,
    /// The slot's current text; may contain [`types::WILDCARD`] characters if generation did not
    /// succeed and this is the best partial fill reached.
    pub text: String,
    pub source: CellSource,
    /// The clue carried over verbatim from the matching [`ThemeWord`], or `None` for filler.
    pub clue: Option<String>,
}

/// Bookkeeping about how much work generation did, independent of whether it succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde_derive::Serialize, serde_derive::Deserialize))]
pub struct Stats {
    pub patterns_tried: usize,
    pub repair_iterations: usize,
    pub candidates_generated: usize,
}

/// The result of a generation request. `success` is the only thing distinguishing a complete
/// puzzle from a best-effort partial fill; both shapes use the same fields, consistent with how
/// the rest of this engine treats outcomes as data rather than propagated errors.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde_derive::Serialize, serde_derive::Deserialize))]
pub struct GenerationResult {
    pub success: bool,
    pub pattern_name: Option<String>,
    pub words: Vec<PlacedWord>,
    pub black_cells: Vec<(usize, usize)>,
    /// Theme words from the request that never made it into the grid, in the same order they
    /// were supplied: words the placer deferred because nothing it tried validated, and words
    /// input validation dropped outright (wrong length, non-letter characters, duplicates). A
    /// successful grid can still carry a nonempty list here — the engine places as many theme
    /// words as it can, not all-or-nothing.
    pub unplaced_theme_words: Vec<ThemeWord>,
    pub stats: Stats,
}

/// Generates a 5x5 themed crossword from `options`. Always returns a result; check `success`
/// rather than matching on an error type. See [`orchestrator::generate`] for the full pipeline.
#[must_use]
pub fn generate(options: &GenerationOptions) -> GenerationResult {
    orchestrator::generate(options)
}
