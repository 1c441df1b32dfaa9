// This is a part of ascension-core.
// See README.md and LICENSE.txt for details.

//! `TextSearcher` (spec §4.7): a stateful, option-driven search/replace
//! facade over a [`Document`], combining the literal matcher
//! ([`crate::search::pattern`]) and the regex adapter
//! ([`crate::search::regex_adapter`]) behind one pattern cache.
//!
//! Grounded in `xi-editor`'s `Find` (`set_find`/`update_find`/
//! `next_occurrence`) for the "cache the compiled pattern, recompile lazily
//! on change" shape, generalized to spec §4.7's additions that `Find` does
//! not have: an MRU pattern/replacement history, explicit forward/backward
//! search, whole-match boundary enforcement, and callback-driven
//! replace-all with undo.

use std::collections::VecDeque;

use unicode_segmentation::UnicodeSegmentation;

use crate::error::SearchError;
use crate::search::document::{Document, Region};
use crate::search::pattern::{Direction, LiteralPattern, MigemoExpander, SearchOptions, SearchType, WholeMatch};
use crate::search::regex_adapter::CompiledRegex;

const DEFAULT_MAX_STORED_STRINGS: usize = 16;
const MIN_MAX_STORED_STRINGS: usize = 4;

/// The callback's verdict for one candidate replacement (spec §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractiveReplacementAction {
    Replace,
    Skip,
    ReplaceAll,
    ReplaceAndExit,
    Undo,
    Exit,
}

struct LastResult {
    region: Region,
    direction: Direction,
    document_revision: u64,
}

enum CompiledPattern {
    Literal(LiteralPattern),
    Regex(CompiledRegex),
    MigemoUnavailable,
}

pub struct TextSearcher {
    pattern_string: String,
    replacement_string: String,
    options: SearchOptions,
    pattern_history: VecDeque<String>,
    replacement_history: VecDeque<String>,
    max_stored_strings: usize,
    migemo_expander: Option<Box<dyn MigemoExpander>>,
    compiled: Option<CompiledPattern>,
    compiled_direction: Option<Direction>,
    last_result: Option<LastResult>,
}

impl Default for TextSearcher {
    fn default() -> Self {
        TextSearcher {
            pattern_string: String::new(),
            replacement_string: String::new(),
            options: SearchOptions::default(),
            pattern_history: VecDeque::new(),
            replacement_history: VecDeque::new(),
            max_stored_strings: DEFAULT_MAX_STORED_STRINGS,
            migemo_expander: None,
            compiled: None,
            compiled_direction: None,
            last_result: None,
        }
    }
}

impl TextSearcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_migemo_expander(expander: Box<dyn MigemoExpander>) -> Self {
        TextSearcher { migemo_expander: Some(expander), ..Self::default() }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern_string
    }

    pub fn replacement(&self) -> &str {
        &self.replacement_string
    }

    pub fn num_stored_patterns(&self) -> usize {
        self.pattern_history.len()
    }

    pub fn num_stored_replacements(&self) -> usize {
        self.replacement_history.len()
    }

    pub fn is_migemo_available(&self) -> bool {
        self.migemo_expander.is_some()
    }

    pub fn set_max_stored_strings(&mut self, n: usize) {
        self.max_stored_strings = n.max(MIN_MAX_STORED_STRINGS);
        truncate_mru(&mut self.pattern_history, self.max_stored_strings);
        truncate_mru(&mut self.replacement_history, self.max_stored_strings);
    }

    /// Spec §4.7: "pushes to MRU unless `remember=false`; invalidates the
    /// pattern cache."
    pub fn set_pattern(&mut self, pattern: &str, remember: bool) {
        if self.pattern_string != pattern {
            self.pattern_string = pattern.to_string();
            self.invalidate_cache();
        }
        if remember {
            push_mru(&mut self.pattern_history, pattern, self.max_stored_strings);
        }
    }

    pub fn set_replacement(&mut self, replacement: &str) {
        self.replacement_string = replacement.to_string();
        push_mru(&mut self.replacement_history, replacement, self.max_stored_strings);
    }

    pub fn set_options(&mut self, options: SearchOptions) {
        if self.options != options {
            self.options = options;
            self.invalidate_cache();
        }
    }

    fn invalidate_cache(&mut self) {
        self.compiled = None;
        self.compiled_direction = None;
        self.last_result = None;
    }

    fn ensure_compiled(&mut self, direction: Direction) -> Result<(), SearchError> {
        if self.compiled.is_some() && self.compiled_direction == Some(direction) {
            return Ok(());
        }
        let compiled = match self.options.search_type {
            SearchType::Literal => CompiledPattern::Literal(LiteralPattern::compile(
                &self.pattern_string,
                direction,
                self.options.case_sensitive,
            )),
            SearchType::Regex => {
                CompiledPattern::Regex(CompiledRegex::compile(&self.pattern_string, self.options.case_sensitive, false)?)
            }
            SearchType::Migemo => match &self.migemo_expander {
                Some(expander) => match expander.expand(&self.pattern_string) {
                    Some(expanded) => {
                        CompiledPattern::Regex(CompiledRegex::compile(&expanded, self.options.case_sensitive, false)?)
                    }
                    None => CompiledPattern::MigemoUnavailable,
                },
                None => CompiledPattern::MigemoUnavailable,
            },
        };
        self.compiled = Some(compiled);
        self.compiled_direction = Some(direction);
        Ok(())
    }

    fn boundary_ok(&self, text: &[char], region: Region) -> bool {
        match self.options.whole_match {
            WholeMatch::None => true,
            WholeMatch::GraphemeCluster => is_grapheme_boundary(text, region.0) && is_grapheme_boundary(text, region.1),
            WholeMatch::Word => is_word_boundary(text, region.0) && is_word_boundary(text, region.1),
        }
    }

    /// Spec §4.7's `search`: reuses the compiled pattern for `direction` if
    /// cached, otherwise (re)compiles; enforces whole-match boundaries by
    /// skipping past non-boundary matches.
    pub fn search<D: Document>(
        &mut self,
        document: &D,
        from: usize,
        scope: Region,
        direction: Direction,
    ) -> Result<Option<Region>, SearchError> {
        self.ensure_compiled(direction)?;
        let text = document.slice((0, document.len()));
        let result = match self.compiled.as_ref().unwrap() {
            CompiledPattern::Literal(pattern) => match direction {
                Direction::Forward => search_forward_literal(pattern, &text, from, scope, |r| self.boundary_ok(&text, r)),
                Direction::Backward => search_backward_literal(pattern, &text, from, scope, |r| self.boundary_ok(&text, r)),
            },
            CompiledPattern::Regex(regex) => {
                let haystack: String = text.iter().collect();
                match direction {
                    Direction::Forward => search_forward_regex(regex, &haystack, &text, from, scope, |r| self.boundary_ok(&text, r)),
                    Direction::Backward => search_backward_regex(regex, &haystack, &text, from, scope, |r| self.boundary_ok(&text, r)),
                }
            }
            CompiledPattern::MigemoUnavailable => None,
        };
        if let Some(region) = result {
            self.last_result = Some(LastResult { region, direction, document_revision: document.revision() });
        }
        Ok(result)
    }

    /// Spec §4.7's `replace_all`: forward iteration within `scope`,
    /// callback-driven, with an undo stack of applied replacements. Stops
    /// immediately if the document's revision changes for any reason other
    /// than this loop's own edits.
    pub fn replace_all<D: Document>(
        &mut self,
        document: &mut D,
        scope: Region,
        mut callback: Option<&mut dyn FnMut(Region, bool) -> InteractiveReplacementAction>,
    ) -> Result<usize, SearchError> {
        let replacement: Vec<char> = self.replacement_string.chars().collect();
        let mut count = 0usize;
        let mut undo_stack: Vec<(usize, usize)> = Vec::new();
        let mut cursor = scope.0;
        let mut expected_revision = document.revision();

        loop {
            if document.revision() != expected_revision {
                return Ok(count);
            }
            let found = self.search(document, cursor, scope, Direction::Forward)?;
            let Some(region) = found else { break };

            let action = match callback.as_deref_mut() {
                None => InteractiveReplacementAction::Replace,
                Some(cb) => cb(region, !undo_stack.is_empty()),
            };

            match action {
                InteractiveReplacementAction::Skip => {
                    cursor = region.1.max(region.0 + 1);
                }
                InteractiveReplacementAction::Exit => break,
                InteractiveReplacementAction::Undo => {
                    if let Some((begin, end)) = undo_stack.pop() {
                        if document.undo() {
                            count = count.saturating_sub(1);
                            cursor = begin;
                        }
                        let _ = end;
                    }
                }
                InteractiveReplacementAction::Replace
                | InteractiveReplacementAction::ReplaceAll
                | InteractiveReplacementAction::ReplaceAndExit => {
                    document.replace(region, &replacement)?;
                    expected_revision = document.revision();
                    let new_end = region.0 + replacement.len();
                    undo_stack.push((region.0, new_end));
                    count += 1;
                    cursor = new_end;
                    if matches!(action, InteractiveReplacementAction::ReplaceAndExit) {
                        break;
                    }
                    if matches!(action, InteractiveReplacementAction::ReplaceAll) {
                        callback = None;
                    }
                }
            }
        }
        Ok(count)
    }
}

fn truncate_mru(history: &mut VecDeque<String>, max: usize) {
    while history.len() > max {
        history.pop_back();
    }
}

fn push_mru(history: &mut VecDeque<String>, s: &str, max: usize) {
    history.retain(|existing| existing != s);
    history.push_front(s.to_string());
    truncate_mru(history, max);
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Word-break check (spec §4.7: "content-type-specific identifier
/// syntax"). This crate has no content-type registry (out of scope, §1),
/// so it uses the common identifier definition: alphanumeric plus `_`.
fn is_word_boundary(text: &[char], offset: usize) -> bool {
    if offset == 0 || offset == text.len() {
        return true;
    }
    is_word_char(text[offset - 1]) != is_word_char(text[offset])
}

/// Grapheme-cluster boundary check (spec §4.7, UAX #29) via
/// `unicode-segmentation`.
fn is_grapheme_boundary(text: &[char], offset: usize) -> bool {
    if offset == 0 || offset == text.len() {
        return true;
    }
    let byte_offset: usize = text[..offset].iter().map(|c| c.len_utf8()).sum();
    let s: String = text.iter().collect();
    s.grapheme_indices(true).any(|(i, _)| i == byte_offset)
}

fn search_forward_literal(
    pattern: &LiteralPattern,
    text: &[char],
    from: usize,
    scope: Region,
    boundary_ok: impl Fn(Region) -> bool,
) -> Option<Region> {
    let mut cursor = from.max(scope.0);
    while cursor <= scope.1 {
        let (start, end) = pattern.search_forward(text, cursor)?;
        if end > scope.1 {
            return None;
        }
        if boundary_ok((start, end)) {
            return Some((start, end));
        }
        cursor = start + 1;
    }
    None
}

fn search_backward_literal(
    pattern: &LiteralPattern,
    text: &[char],
    from: usize,
    scope: Region,
    boundary_ok: impl Fn(Region) -> bool,
) -> Option<Region> {
    let mut upto = from.min(scope.1);
    loop {
        let (start, end) = pattern.search_backward(text, upto)?;
        if start < scope.0 {
            return None;
        }
        if boundary_ok((start, end)) {
            return Some((start, end));
        }
        if end == 0 {
            return None;
        }
        upto = end - 1;
    }
}

fn char_offset_to_byte(text: &[char], offset: usize) -> usize {
    text[..offset].iter().map(|c| c.len_utf8()).sum()
}

fn byte_offset_to_char(text: &[char], byte_offset: usize) -> usize {
    let mut bytes = 0;
    for (i, c) in text.iter().enumerate() {
        if bytes == byte_offset {
            return i;
        }
        bytes += c.len_utf8();
    }
    text.len()
}

fn search_forward_regex(
    regex: &CompiledRegex,
    haystack: &str,
    text: &[char],
    from: usize,
    scope: Region,
    boundary_ok: impl Fn(Region) -> bool,
) -> Option<Region> {
    let scope_begin_byte = char_offset_to_byte(text, scope.0);
    let scope_end_byte = char_offset_to_byte(text, scope.1);
    let mut cursor_byte = char_offset_to_byte(text, from.max(scope.0));
    loop {
        let mut matcher = regex.matcher(haystack);
        matcher.region(cursor_byte, scope_end_byte.max(cursor_byte));
        let (start_b, end_b) = matcher.find()?;
        if start_b < scope_begin_byte {
            cursor_byte = start_b + 1;
            continue;
        }
        let region = (byte_offset_to_char(text, start_b), byte_offset_to_char(text, end_b));
        if boundary_ok(region) {
            return Some(region);
        }
        cursor_byte = start_b + 1;
    }
}

/// Backward regex search (spec §4.7): the engine is forward-only, so this
/// shrinks the matcher's region to `[scope.begin, probe]` and walks `probe`
/// backward from just before `from`, trying `lookingAt` at each step.
fn search_backward_regex(
    regex: &CompiledRegex,
    haystack: &str,
    text: &[char],
    from: usize,
    scope: Region,
    boundary_ok: impl Fn(Region) -> bool,
) -> Option<Region> {
    let scope_begin_byte = char_offset_to_byte(text, scope.0);
    let mut probe = from.min(text.len());
    while probe > scope.0 {
        probe -= 1;
        let probe_byte = char_offset_to_byte(text, probe);
        let mut matcher = regex.matcher(haystack);
        matcher.region(scope_begin_byte, probe_byte);
        // Try every starting offset within [scope_begin_byte, probe_byte],
        // closest to probe_byte first, since `lookingAt` only tests one
        // fixed start.
        let mut start_byte = probe_byte;
        loop {
            matcher.region(start_byte, probe_byte);
            if let Some((s, e)) = matcher.looking_at() {
                let region = (byte_offset_to_char(text, s), byte_offset_to_char(text, e));
                if boundary_ok(region) {
                    return Some(region);
                }
            }
            if start_byte == scope_begin_byte {
                break;
            }
            start_byte -= 1;
            while start_byte > scope_begin_byte && !haystack.is_char_boundary(start_byte) {
                start_byte -= 1;
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::document::PlainTextDocument;

    #[test]
    fn literal_forward_search_matches_spec_scenario() {
        let mut searcher = TextSearcher::new();
        searcher.set_options(SearchOptions { case_sensitive: false, ..SearchOptions::default() });
        searcher.set_pattern("abc", true);
        let doc = PlainTextDocument::new("xxABCyy");
        let region = searcher.search(&doc, 0, (0, doc.len()), Direction::Forward).unwrap();
        assert_eq!(region, Some((2, 5)));
    }

    #[test]
    fn mru_history_deduplicates_and_caps_at_max() {
        let mut searcher = TextSearcher::new();
        searcher.set_max_stored_strings(4);
        for p in ["a", "b", "c", "d", "e", "a"] {
            searcher.set_pattern(p, true);
        }
        assert_eq!(searcher.num_stored_patterns(), 4);
    }

    #[test]
    fn replace_all_without_callback_replaces_every_match() {
        let mut searcher = TextSearcher::new();
        searcher.set_pattern("a", true);
        searcher.set_replacement("X");
        let mut doc = PlainTextDocument::new("banana");
        let n = searcher.replace_all(&mut doc, (0, doc.len()), None).unwrap();
        assert_eq!(n, 3);
        assert_eq!(doc.as_string(), "bXnXnX");
    }

    #[test]
    fn replace_all_respects_skip_action() {
        let mut searcher = TextSearcher::new();
        searcher.set_pattern("a", true);
        searcher.set_replacement("X");
        let mut doc = PlainTextDocument::new("banana");
        let mut first = true;
        let mut cb = |_region: Region, _can_undo: bool| {
            if first {
                first = false;
                InteractiveReplacementAction::Skip
            } else {
                InteractiveReplacementAction::Replace
            }
        };
        let n = searcher.replace_all(&mut doc, (0, doc.len()), Some(&mut cb)).unwrap();
        assert_eq!(n, 2);
        assert_eq!(doc.as_string(), "banXnX");
    }

    #[test]
    fn word_boundary_rejects_partial_word_match() {
        let mut searcher = TextSearcher::new();
        searcher.set_options(SearchOptions { whole_match: WholeMatch::Word, ..SearchOptions::default() });
        searcher.set_pattern("cat", true);
        let doc = PlainTextDocument::new("concatenate cat");
        let region = searcher.search(&doc, 0, (0, doc.len()), Direction::Forward).unwrap();
        assert_eq!(region, Some((12, 15)));
    }
}
