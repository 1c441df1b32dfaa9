// This is a part of ascension-core.
// See README.md and LICENSE.txt for details.

//! The regex adapter (spec §4.6): wraps the `regex` crate behind a
//! region-restricted `Matcher`-style API, following `xi-editor`'s
//! `core-lib/src/find.rs` (`RegexBuilder::new(...).case_insensitive(...)`)
//! for how to drive `regex::RegexBuilder` from editor-level options.
//!
//! Unlike xi-editor's `Find` (forward-only, no backward search, no
//! replace-all), spec §4.7 needs backward search and replace-all; those are
//! built on top of this adapter rather than inside `regex` itself, since
//! the `regex` crate has no native backward-matching mode.

use crate::error::SearchError;
use regex::{Regex, RegexBuilder};

/// A compiled regular expression plus the region-restriction state spec
/// §4.6 models after Java's `Matcher` (`anchoring_bounds = false`,
/// `transparent_bounds = true`: `^`/`$` see the full haystack, but the
/// match body is only ever reported inside `region`).
pub struct CompiledRegex {
    inner: Regex,
}

impl CompiledRegex {
    /// Compiles `pattern`. `case_sensitive=false` requests full
    /// case-insensitive comparison; `extended_properties` enables `\p{...}`
    /// general-category and binary-property classes (the `regex` crate
    /// supports these natively via `unicode-perl`/`unicode` feature sets,
    /// already part of its default feature set).
    pub fn compile(
        pattern: &str,
        case_sensitive: bool,
        extended_properties: bool,
    ) -> Result<Self, SearchError> {
        let _ = extended_properties; // `\p{...}` classes are always available; `regex` enables them by default
        let mut builder = RegexBuilder::new(pattern);
        builder.case_insensitive(!case_sensitive);
        builder.unicode(true);
        builder.size_limit(10 * (1 << 20));
        let inner = builder.build().map_err(|e| SearchError::BadRegex(e.to_string()))?;
        Ok(CompiledRegex { inner })
    }

    /// Whether `haystack` matches `self` in its entirety.
    pub fn matches(&self, haystack: &str) -> bool {
        self.inner.find(haystack).map(|m| m.start() == 0 && m.end() == haystack.len()).unwrap_or(false)
    }

    /// Returns a region-restricted matcher over `haystack` (spec §4.6's
    /// `Matcher` handle).
    pub fn matcher<'a>(&'a self, haystack: &'a str) -> Matcher<'a> {
        Matcher { regex: &self.inner, haystack, region: 0..haystack.len() }
    }
}

/// A region-restricted search cursor over one haystack. `region` bounds
/// where a reported match's span must fall; the pattern body still sees
/// the full `haystack` so anchors and lookaround work across the boundary
/// (spec §4.6: "transparent_bounds = true").
pub struct Matcher<'a> {
    regex: &'a Regex,
    haystack: &'a str,
    region: std::ops::Range<usize>,
}

impl<'a> Matcher<'a> {
    /// Restricts subsequent searches to byte range `[begin, end)` of the
    /// original haystack.
    pub fn region(&mut self, begin: usize, end: usize) {
        self.region = begin..end;
    }

    /// Finds the next match whose span lies entirely within the current
    /// region, searching from `region.start` forward.
    pub fn find(&self) -> Option<(usize, usize)> {
        let mut at = self.region.start;
        while at <= self.haystack.len() {
            let m = self.regex.find_at(self.haystack, at)?;
            if m.end() <= self.region.end {
                return Some((m.start(), m.end()));
            }
            if m.start() >= self.region.end {
                return None;
            }
            // advance past a match that overruns the region; try the next
            // one starting just after this match's start, to make progress
            at = m.start() + 1;
        }
        None
    }

    /// Java-style `lookingAt`: does the pattern match starting exactly at
    /// `region.start` (not necessarily consuming the whole region)?
    pub fn looking_at(&self) -> Option<(usize, usize)> {
        let m = self.regex.find_at(self.haystack, self.region.start)?;
        if m.start() == self.region.start && m.end() <= self.region.end {
            Some((m.start(), m.end()))
        } else {
            None
        }
    }

    /// In-place replacement of the current region's match text (caller is
    /// expected to have already located `(begin, end)` via `find`).
    pub fn replace_in_place(&self, begin: usize, end: usize, replacement: &str) -> String {
        let mut out = String::with_capacity(self.haystack.len());
        out.push_str(&self.haystack[..begin]);
        out.push_str(replacement);
        out.push_str(&self.haystack[end..]);
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_insensitive_literal_matches() {
        let re = CompiledRegex::compile("abc", false, false).unwrap();
        let matcher = re.matcher("xxABCyy");
        assert_eq!(matcher.find(), Some((2, 5)));
    }

    #[test]
    fn region_restriction_excludes_out_of_bounds_match() {
        let re = CompiledRegex::compile("ab", true, false).unwrap();
        let mut matcher = re.matcher("ab cd ab ef");
        matcher.region(3, 6);
        assert_eq!(matcher.find(), None);
    }

    #[test]
    fn bad_pattern_reports_search_error() {
        let err = CompiledRegex::compile("(unclosed", true, false).unwrap_err();
        assert!(matches!(err, SearchError::BadRegex(_)));
    }
}
