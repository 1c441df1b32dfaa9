// This is a part of ascension-core.
// See README.md and LICENSE.txt for details.

//! The search engine (spec §1, §4.5-§4.8): literal/regex/Migemo pattern
//! compilation, a batch `TextSearcher`, and a live `IncrementalSearcher`.

pub mod document;
pub mod incremental;
pub mod pattern;
pub mod regex_adapter;
pub mod text_searcher;

pub use document::{Document, PlainTextDocument};
pub use incremental::{IncrementalCallback, IncrementalSearcher};
pub use pattern::{Direction, SearchOptions, SearchType, WholeMatch};
pub use text_searcher::{InteractiveReplacementAction, TextSearcher};
