// This is a part of ascension-core.
// See README.md and LICENSE.txt for details.

//! Core data model shared by the codec and search engines (spec §3).
//!
//! This is the Rust-ification of the teacher's `encoding-types` crate
//! (`src/types/lib.rs`): same processed/unprocessed/problem vocabulary, but
//! the conversion contract is buffer-capacity-aware (Java-NIO-style) rather
//! than growable-`Vec`-based, per the editor core's needs.

use std::fmt;

/// A Unicode scalar value, excluding surrogates. `char` already enforces
/// this in Rust, so `CodePoint` is just a thin alias used where the spec's
/// vocabulary ("code point", not "character") matters for clarity.
pub type CodePoint = char;

pub const REPLACEMENT_CHARACTER: char = '\u{FFFD}';
pub const ZERO_WIDTH_NON_JOINER: char = '\u{200C}';

/// A high surrogate code unit, `[0xD800, 0xDBFF]`.
#[inline]
pub fn is_high_surrogate(unit: u16) -> bool {
    (0xD800..=0xDBFF).contains(&unit)
}

/// A low surrogate code unit, `[0xDC00, 0xDFFF]`.
#[inline]
pub fn is_low_surrogate(unit: u16) -> bool {
    (0xDC00..=0xDFFF).contains(&unit)
}

/// The outcome of one `from_unicode`/`to_unicode` call (spec §3, §4.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionResult {
    /// The entire input was consumed and transformed.
    Completed,
    /// The output buffer filled before the input was exhausted. The caller
    /// may resume with a larger buffer; `bytes_written`/`units_written`
    /// reports exactly how much output was produced so far, and
    /// `units_consumed`/`bytes_consumed` reports exactly how much input was
    /// fully consumed.
    InsufficientBuffer,
    /// An input code point (encoding) or byte (decoding) has no mapping in
    /// this encoding, and the substitution policy is `Strict`.
    UnmappableCharacter,
    /// The input contains a byte sequence that cannot be a prefix of any
    /// valid sequence in this encoding.
    MalformedInput,
    /// The consumed tail of the input is an incomplete multi-code-point
    /// sequence (a lone high surrogate, or a base character that may still
    /// combine with a following combining mark). More input is required;
    /// this is not an error.
    CompletedPending,
}

impl ConversionResult {
    /// True for results that represent forward progress requiring no
    /// caller intervention beyond supplying more input/space.
    pub fn is_terminal_error(self) -> bool {
        matches!(
            self,
            ConversionResult::UnmappableCharacter | ConversionResult::MalformedInput
        )
    }
}

/// How an encoder/decoder should handle input with no mapping in the target
/// encoding (spec §3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubstitutionPolicy {
    /// Unmappable input is silently dropped.
    Ignore,
    /// Unmappable input is replaced with the encoding's substitution byte
    /// (encoding direction) or `U+FFFD` (decoding direction).
    Replace,
    /// Conversion halts with `ConversionResult::UnmappableCharacter`.
    Strict,
}

/// Result of one `Encoder::from_unicode` call: how much output was written
/// and how much input was consumed, alongside the `ConversionResult`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FromUnicodeResult {
    pub result: ConversionResult,
    pub bytes_written: usize,
    pub units_consumed: usize,
}

/// Result of one `Decoder::to_unicode` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToUnicodeResult {
    pub result: ConversionResult,
    pub units_written: usize,
    pub bytes_consumed: usize,
}

/// Bidirectional conversion contract (spec §4.1, §6).
///
/// Implementations are stateful (an `Encoder` may straddle designation
/// state, pending combining characters, or a lone surrogate across calls);
/// a fresh instance is produced per conversion session by the owning
/// `EncodingFactory`.
pub trait Encoder: Send {
    /// Converts as much of `input` (UTF-16 code units) as fits in `output`,
    /// applying `policy` to unmappable code points.
    fn from_unicode(
        &mut self,
        output: &mut [u8],
        input: &[u16],
        policy: SubstitutionPolicy,
    ) -> FromUnicodeResult;

    /// Signals end-of-input: flush any pending designation state (e.g. the
    /// ISO-2022-JP `ESC ( B` reset) into `output`. Returns how many bytes
    /// were written and the terminal result.
    fn finish(&mut self, output: &mut [u8]) -> FromUnicodeResult {
        FromUnicodeResult {
            result: ConversionResult::Completed,
            bytes_written: 0,
            units_consumed: 0,
        }
    }
}

/// Bidirectional conversion contract, decode direction.
pub trait Decoder: Send {
    fn to_unicode(
        &mut self,
        output: &mut [u16],
        input: &[u8],
        policy: SubstitutionPolicy,
        end_of_input: bool,
    ) -> ToUnicodeResult;
}

impl fmt::Display for ConversionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ConversionResult::Completed => "completed",
            ConversionResult::InsufficientBuffer => "insufficient buffer",
            ConversionResult::UnmappableCharacter => "unmappable character",
            ConversionResult::MalformedInput => "malformed input",
            ConversionResult::CompletedPending => "completed (pending)",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn surrogate_ranges() {
        assert!(is_high_surrogate(0xD800));
        assert!(is_high_surrogate(0xDBFF));
        assert!(!is_high_surrogate(0xDC00));
        assert!(is_low_surrogate(0xDC00));
        assert!(is_low_surrogate(0xDFFF));
        assert!(!is_low_surrogate(0xE000));
    }

    #[test]
    fn terminal_error_classification() {
        assert!(ConversionResult::UnmappableCharacter.is_terminal_error());
        assert!(ConversionResult::MalformedInput.is_terminal_error());
        assert!(!ConversionResult::CompletedPending.is_terminal_error());
        assert!(!ConversionResult::InsufficientBuffer.is_terminal_error());
    }
}
