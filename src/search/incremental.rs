// This is a part of ascension-core.
// See README.md and LICENSE.txt for details.

//! `IncrementalSearcher` (spec §4.8): live, per-keystroke search bound to a
//! document, with an undoable status/operation stack.
//!
//! No teacher counterpart exists (`xi-editor`'s `Find` has no undoable
//! keystroke stack), so this module is grounded directly in spec.md §4.8.
//!
//! Each `Status` frame carries a fixed `anchor` (the cursor position its
//! searches start from) alongside the `matched_region` that typing
//! mutates in place. Only [`IncrementalSearcher::next`] pushes a new frame
//! (spec: "push current Status frame; call update"), and it is the one
//! place a frame's anchor moves — to the end (forward) or start (backward)
//! of the previous frame's match, per spec §4.8's "`update` uses the top
//! `Status` frame as the cursor" rule. Typing keeps searching from the same
//! anchor as the pattern grows, so `undo` of a `Type` tag can restore the
//! exact prior match by snapshot rather than by re-deriving a cursor.

use crate::error::SearchError;
use crate::search::document::{Document, Region};
use crate::search::pattern::Direction;
use crate::search::text_searcher::TextSearcher;

/// Callback for non-fatal events during an interactive session (spec §4.8,
/// §7: "Bad regex ... surfaced to the callback as a non-fatal event in
/// incremental mode"). All methods are no-ops by default so a caller only
/// needs to override what it cares about.
pub trait IncrementalCallback {
    /// The pattern failed to compile as a regex.
    fn bad_regex(&mut self, _message: &str) {}
    /// The pattern compiled but is too complex to execute safely.
    fn complex_regex(&mut self) {}
    /// The session was aborted; `initial_position` is where `start` began.
    fn aborted(&mut self, _initial_position: usize) {}
}

#[derive(Debug, Clone, Copy)]
struct Status {
    anchor: usize,
    matched_region: Region,
    direction: Direction,
}

#[derive(Debug, Clone, Copy)]
enum Operation {
    /// One grapheme was appended to the pattern; undoing restores the
    /// frame exactly as it was before this keystroke.
    Type { prev_region: Region, prev_direction: Direction },
    /// `next` attempted a jump. `pushed` is `false` when the jump found no
    /// further match, so no frame was actually added (spec §4.8: "on
    /// failure, pop the frame"); undoing such a tag is then a no-op rather
    /// than an out-of-band stack pop.
    Jump { pushed: bool },
}

/// Live search session bound to a `document` and driven through a
/// `searcher`'s compiled-pattern cache (spec §4.8). Borrows both for the
/// lifetime of the session, matching spec §3's ownership rule ("must be
/// destroyed before or concurrently with the document it binds to").
pub struct IncrementalSearcher<'a, D: Document> {
    document: &'a mut D,
    searcher: &'a mut TextSearcher,
    status_stack: Vec<Status>,
    operation_stack: Vec<Operation>,
    pattern: String,
    initial_position: usize,
    running: bool,
    last_known_revision: u64,
    callback: Option<Box<dyn IncrementalCallback>>,
}

impl<'a, D: Document> IncrementalSearcher<'a, D> {
    /// Spec §4.8: "pushes an initial `Status{ matched_region = (from,
    /// from), direction }` frame; registers as a document ... listener."
    /// There is no dynamic listener registry in this crate (the `Document`
    /// collaborator is a narrow trait, §9's "explicit handle the searcher
    /// holds" design); external changes are instead detected by comparing
    /// `document.revision()` against the value observed at `start`, on
    /// every subsequent call that touches the document.
    pub fn start(
        document: &'a mut D,
        from: usize,
        searcher: &'a mut TextSearcher,
        direction: Direction,
        callback: Option<Box<dyn IncrementalCallback>>,
    ) -> Self {
        let last_known_revision = document.revision();
        log::debug!("incremental search started at {from}");
        IncrementalSearcher {
            document,
            searcher,
            status_stack: vec![Status { anchor: from, matched_region: (from, from), direction }],
            operation_stack: Vec::new(),
            pattern: String::new(),
            initial_position: from,
            running: true,
            last_known_revision,
            callback,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn can_undo(&self) -> bool {
        !self.operation_stack.is_empty()
    }

    pub fn direction(&self) -> Direction {
        self.top().direction
    }

    pub fn matched_region(&self) -> Region {
        self.top().matched_region
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    fn top(&self) -> Status {
        *self.status_stack.last().expect("status stack is never empty after start")
    }

    fn top_mut(&mut self) -> &mut Status {
        self.status_stack.last_mut().expect("status stack is never empty after start")
    }

    /// Any external document change aborts the session (spec §4.8: "any
    /// external document change aborts the session"). Called at the top of
    /// every operation that is about to touch the document.
    fn check_external_change(&mut self) -> bool {
        if !self.running {
            return true;
        }
        if self.document.revision() != self.last_known_revision {
            self.abort_internal();
            true
        } else {
            false
        }
    }

    fn abort_internal(&mut self) {
        self.running = false;
        if let Some(cb) = self.callback.as_deref_mut() {
            cb.aborted(self.initial_position);
        }
    }

    /// A caller-observed bookmark change also aborts the session (spec
    /// §4.8: "Bookmark change also aborts"). The crate has no bookmark
    /// collaborator (out of scope, §1), so this is the explicit hook a
    /// caller that does track bookmarks invokes.
    pub fn notify_bookmark_changed(&mut self) {
        if self.running {
            self.abort_internal();
        }
    }

    /// Searches for the current pattern starting at `anchor` in the
    /// current top frame's direction, and applies the result to the top
    /// frame's `matched_region` on success. Reports pattern-compilation
    /// failures to the callback without aborting the session (spec §7).
    /// Returns whether a match was found.
    fn run_search_from(&mut self, anchor: usize) -> bool {
        if self.check_external_change() {
            return false;
        }
        let direction = self.top().direction;
        let scope = (0, self.document.len());
        match self.searcher.search(self.document, anchor, scope, direction) {
            Ok(Some(region)) => {
                self.top_mut().matched_region = region;
                true
            }
            Ok(None) => {
                log::debug!("incremental search: no match for {:?} from {anchor}", self.pattern);
                false
            }
            Err(SearchError::BadRegex(message)) => {
                let complex = message.contains("exceeds") || message.contains("size_limit");
                if let Some(cb) = self.callback.as_deref_mut() {
                    if complex {
                        cb.complex_regex();
                    } else {
                        cb.bad_regex(&message);
                    }
                }
                false
            }
            Err(SearchError::ComplexRegex) => {
                if let Some(cb) = self.callback.as_deref_mut() {
                    cb.complex_regex();
                }
                false
            }
            Err(_) => false,
        }
    }

    /// Spec §4.8's `update` as invoked while typing: searches from the top
    /// frame's fixed anchor with the (now longer) pattern.
    fn update(&mut self) {
        let anchor = self.top().anchor;
        self.run_search_from(anchor);
    }

    /// Appends one code point to the pattern and re-runs `update` (spec
    /// §4.8). Pushes one `Type` tag carrying the frame snapshot needed to
    /// undo this keystroke exactly.
    pub fn add_character(&mut self, c: char) {
        if self.check_external_change() {
            return;
        }
        let prev = self.top();
        self.pattern.push(c);
        self.operation_stack.push(Operation::Type {
            prev_region: prev.matched_region,
            prev_direction: prev.direction,
        });
        self.update();
    }

    /// Spec §4.8: "one per code point for BMP; two for surrogate pairs
    /// treated as a single tag" — a Rust `char` already is one Unicode
    /// scalar value regardless of UTF-16 surrogate encoding, so iterating
    /// by `char` here naturally produces exactly one `Type` tag per scalar
    /// value, matching the spec's intent without special-casing surrogates.
    pub fn add_string(&mut self, s: &str) {
        for c in s.chars() {
            self.add_character(c);
        }
    }

    /// Spec §4.8: "push current `Status` frame; call `update`; on failure,
    /// pop the frame and push a `Jump` tag (so the next `update` does not
    /// retry the same miss)." The new frame's anchor moves to the end
    /// (forward) or start (backward) of the previous frame's match — this
    /// is the one point spec §4.8's "begins at its end"/"begins at its
    /// start" cursor rule governs a frame's anchor rather than a typing
    /// update's search origin.
    pub fn next(&mut self, direction: Direction) {
        if self.check_external_change() {
            return;
        }
        let prev = self.top();
        let new_anchor = match direction {
            Direction::Forward => prev.matched_region.1,
            Direction::Backward => prev.matched_region.0,
        };
        self.status_stack.push(Status {
            anchor: new_anchor,
            matched_region: (new_anchor, new_anchor),
            direction,
        });
        let found = self.run_search_from(new_anchor);
        if found {
            self.operation_stack.push(Operation::Jump { pushed: true });
        } else {
            self.status_stack.pop();
            self.operation_stack.push(Operation::Jump { pushed: false });
        }
    }

    /// Spec §4.8: pop the last `Type` or `Jump` tag. `Type` shortens the
    /// pattern by one grapheme and restores the exact prior frame; `Jump`
    /// pops the status frame it pushed, reverting the matched region and
    /// direction (a no-op for a `Jump` tag that found no match, since no
    /// frame was kept for it).
    pub fn undo(&mut self) {
        if self.check_external_change() {
            return;
        }
        match self.operation_stack.pop() {
            Some(Operation::Type { prev_region, prev_direction }) => {
                self.pattern.pop();
                let top = self.top_mut();
                top.matched_region = prev_region;
                top.direction = prev_direction;
            }
            Some(Operation::Jump { pushed: true }) => {
                if self.status_stack.len() > 1 {
                    self.status_stack.pop();
                }
            }
            Some(Operation::Jump { pushed: false }) | None => {}
        }
    }

    /// Spec §4.8: "clear operation history to the bottom frame."
    pub fn reset(&mut self) {
        if self.check_external_change() {
            return;
        }
        self.status_stack.truncate(1);
        self.operation_stack.clear();
        self.pattern.clear();
    }

    /// Spec §4.8: "persist the last non-empty pattern into the underlying
    /// `TextSearcher`'s MRU, unregister listeners."
    pub fn end(&mut self) {
        if !self.pattern.is_empty() {
            self.searcher.set_pattern(&self.pattern, true);
        }
        self.running = false;
        log::debug!("incremental search ended, pattern={:?}", self.pattern);
    }

    /// Spec §4.8: "same as `end` but invokes `callback.aborted(initial_
    /// position)`." Unlike `end`, the in-progress pattern is not persisted.
    pub fn abort(&mut self) {
        if self.running {
            self.abort_internal();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::document::PlainTextDocument;
    use crate::search::pattern::SearchOptions;

    fn searcher_for(options: SearchOptions) -> TextSearcher {
        let mut s = TextSearcher::new();
        s.set_options(options);
        s
    }

    #[test]
    fn typing_then_undoing_returns_to_start_state() {
        let mut doc = PlainTextDocument::new("xx ab yy ab zz");
        let mut searcher = searcher_for(SearchOptions::default());
        let mut inc = IncrementalSearcher::start(&mut doc, 0, &mut searcher, Direction::Forward, None);

        let start_region = inc.matched_region();
        inc.add_character('a');
        inc.add_character('b');
        assert_eq!(inc.pattern(), "ab");
        assert!(inc.can_undo());

        inc.undo();
        assert_eq!(inc.pattern(), "a");
        inc.undo();
        assert_eq!(inc.pattern(), "");
        assert_eq!(inc.matched_region(), start_region);
        assert!(!inc.can_undo());
    }

    #[test]
    fn matches_spec_worked_example() {
        // "ab" first occurs at [15,17) after position 10, per spec §8's
        // worked example; "a" alone first occurs at [15,16) (the same
        // occurrence's leading character).
        let text = "0123456789xxxxxab-----";
        let mut doc = PlainTextDocument::new(text);
        let mut searcher = searcher_for(SearchOptions::default());
        let mut inc = IncrementalSearcher::start(&mut doc, 10, &mut searcher, Direction::Forward, None);

        inc.add_character('a');
        inc.add_character('b');
        assert_eq!(inc.matched_region(), (15, 17));

        inc.undo();
        assert_eq!(inc.matched_region(), (15, 16));

        inc.undo();
        assert_eq!(inc.matched_region(), (10, 10));
    }

    #[test]
    fn next_pushes_a_frame_and_undo_reverts_it() {
        let mut doc = PlainTextDocument::new("ab cd ab ef ab");
        let mut searcher = searcher_for(SearchOptions::default());
        let mut inc = IncrementalSearcher::start(&mut doc, 0, &mut searcher, Direction::Forward, None);
        inc.add_character('a');
        inc.add_character('b');
        let first = inc.matched_region();

        inc.next(Direction::Forward);
        let second = inc.matched_region();
        assert_ne!(first, second);

        inc.undo();
        assert_eq!(inc.matched_region(), first);
    }

    #[test]
    fn next_with_no_further_match_leaves_state_unchanged() {
        let mut doc = PlainTextDocument::new("ab cd ef");
        let mut searcher = searcher_for(SearchOptions::default());
        let mut inc = IncrementalSearcher::start(&mut doc, 0, &mut searcher, Direction::Forward, None);
        inc.add_character('a');
        inc.add_character('b');
        let only_match = inc.matched_region();

        inc.next(Direction::Forward);
        assert_eq!(inc.matched_region(), only_match, "no further match, frame stays put");
        assert!(inc.can_undo());

        inc.undo();
        assert_eq!(inc.matched_region(), only_match);
    }

    #[test]
    fn end_persists_pattern_into_searcher_mru() {
        let mut doc = PlainTextDocument::new("hello world");
        let mut searcher = searcher_for(SearchOptions::default());
        {
            let mut inc = IncrementalSearcher::start(&mut doc, 0, &mut searcher, Direction::Forward, None);
            inc.add_string("wor");
            inc.end();
        }
        assert_eq!(searcher.num_stored_patterns(), 1);
        assert_eq!(searcher.pattern(), "wor");
    }

    struct RecordingCallback {
        aborted_at: Option<usize>,
    }

    impl IncrementalCallback for RecordingCallback {
        fn aborted(&mut self, initial_position: usize) {
            self.aborted_at = Some(initial_position);
        }
    }

    #[test]
    fn external_document_change_aborts_session() {
        let mut doc = PlainTextDocument::new("hello world");
        let mut searcher = searcher_for(SearchOptions::default());
        let cb = Box::new(RecordingCallback { aborted_at: None });
        let mut inc = IncrementalSearcher::start(&mut doc, 0, &mut searcher, Direction::Forward, Some(cb));
        inc.document.replace((0, 1), &['H']).unwrap();
        inc.add_character('x');
        assert!(!inc.is_running());
    }

    #[test]
    fn explicit_abort_invokes_callback_without_persisting_pattern() {
        let mut doc = PlainTextDocument::new("hello world");
        let mut searcher = searcher_for(SearchOptions::default());
        let cb = Box::new(RecordingCallback { aborted_at: None });
        let mut inc = IncrementalSearcher::start(&mut doc, 3, &mut searcher, Direction::Forward, Some(cb));
        inc.add_character('h');
        inc.abort();
        assert!(!inc.is_running());
        assert_eq!(searcher.num_stored_patterns(), 0);
    }
}
