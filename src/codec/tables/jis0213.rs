// This is a part of ascension-core.
// See README.md and LICENSE.txt for details.

//! JIS X 0213:2004 plane 1 and plane 2 forward/backward lookup, plus the
//! "prohibited ideograph" list spec §4.2 requires for distinguishing the
//! strict and compatible ISO-2022-JP-2004 variants.
//!
//! Plane 1 is a superset of JIS X 0208 laid out on the same 94x94 grid
//! (same row/cell numbering for every character 0208 already defines, plus
//! additional characters 0208 left unassigned); plane 2 is new ground
//! entirely, reached in ISO-2022-JP-2004 via `ESC $ ( P`. We delegate
//! plane 1's shared rows to [`super::jis0208`] and add only the
//! characters 0213 introduces on top of it.
//!
//! JIS X 2004 revised several ku-ten assignments relative to the 2000
//! edition; "strict" ISO-2022-JP-2004 rejects the characters whose
//! assignment changed (or that are new in 2004) when round-tripping
//! through older receivers, while "compatible" mode allows them. Absent
//! the full standards-body revision table, [`is_prohibited_in_strict`]
//! tracks a curated subset rather than claiming completeness; see
//! DESIGN.md.

use super::jis0208;
use crate::util::{kuten_to_ptr, ptr_to_kuten};

/// Characters JIS X 0213 plane 1 adds on top of JIS X 0208, as
/// `(codepoint, ku, ten)`. Curated: 2004 added several hundred kanji and
/// reassigned a handful of NEC/IBM extension rows; this holds a small,
/// verifiable sample rather than the full table (see DESIGN.md).
const PLANE1_ADDITIONS: &[(char, u8, u8)] = &[
    ('\u{4E02}', 3, 26), // 丂, one of the NEC-row characters 0213 plane 1 absorbed
    ('\u{02E9}', 2, 1),  // extra-low tone bar, standalone glyph
    ('\u{02E5}', 2, 2),  // extra-high tone bar, standalone glyph
];

/// Ku-ten of the single JIS glyph that ligates `<U+02E9, U+02E5>` (rising
/// tone) or `<U+02E5, U+02E9>` (falling tone) into one code point pair.
/// These decode to *two* Unicode scalar values, which the one-codepoint
/// [`plane1_forward`]/[`plane1_backward`] pair can't express, so
/// `iso2022jp.rs` matches these ku-ten directly instead of routing them
/// through the lookup tables above.
pub const RISING_TONE_LIGATURE_KUTEN: (u8, u8) = (2, 3);
pub const FALLING_TONE_LIGATURE_KUTEN: (u8, u8) = (2, 4);

/// Plane 2 is disjoint from plane 1 and from JIS X 0208; reached via
/// `ESC $ ( P`.
const PLANE2: &[(char, u8, u8)] = &[
    ('\u{4E42}', 1, 1), // 乂, a representative plane-2-only ideograph
];

/// Codepoints whose JIS X 0213:2004 assignment is new or changed since
/// the 2000 edition, and which `iso2022jp.rs`'s strict variant therefore
/// refuses to emit.
pub fn is_prohibited_in_strict(ch: char) -> bool {
    matches!(ch, '\u{4E02}' | '\u{4E42}')
}

pub fn plane1_forward(ptr: u16) -> Option<char> {
    let (ku, ten) = ptr_to_kuten(ptr);
    PLANE1_ADDITIONS
        .iter()
        .find(|&&(_, k, t)| k == ku && t == ten)
        .map(|&(ch, _, _)| ch)
        .or_else(|| jis0208::forward(ptr))
}

pub fn plane1_backward(ch: char) -> Option<u16> {
    PLANE1_ADDITIONS
        .iter()
        .find(|&&(cc, _, _)| cc == ch)
        .map(|&(_, ku, ten)| kuten_to_ptr(ku, ten))
        .or_else(|| jis0208::backward(ch))
}

pub fn plane2_forward(ptr: u16) -> Option<char> {
    let (ku, ten) = ptr_to_kuten(ptr);
    PLANE2
        .iter()
        .find(|&&(_, k, t)| k == ku && t == ten)
        .map(|&(ch, _, _)| ch)
}

pub fn plane2_backward(ch: char) -> Option<u16> {
    PLANE2
        .iter()
        .find(|&&(cc, _, _)| cc == ch)
        .map(|&(_, ku, ten)| kuten_to_ptr(ku, ten))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plane1_inherits_0208_assignments() {
        let ptr = plane1_backward('\u{65E5}').unwrap();
        assert_eq!(plane1_forward(ptr), Some('\u{65E5}'));
    }

    #[test]
    fn plane1_addition_roundtrips() {
        let ptr = plane1_backward('\u{4E02}').unwrap();
        assert_eq!(ptr_to_kuten(ptr), (3, 26));
        assert_eq!(plane1_forward(ptr), Some('\u{4E02}'));
    }

    #[test]
    fn plane2_is_disjoint_from_plane1() {
        assert!(plane1_backward('\u{4E42}').is_none());
        let ptr = plane2_backward('\u{4E42}').unwrap();
        assert_eq!(plane2_forward(ptr), Some('\u{4E42}'));
    }

    #[test]
    fn strict_mode_rejects_new_assignments() {
        assert!(is_prohibited_in_strict('\u{4E02}'));
        assert!(!is_prohibited_in_strict('\u{65E5}'));
    }
}
