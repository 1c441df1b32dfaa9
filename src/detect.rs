// This is a part of ascension-core.
// See README.md and LICENSE.txt for details.

//! JIS auto-detection (spec §4.4): given a byte buffer, pick the encoding
//! that accounts for the longest convertible prefix among Shift_JIS,
//! EUC-JP, and the ISO-2022-JP family, deferring to a full Unicode match
//! first.
//!
//! No teacher counterpart exists (the teacher has no detector at all); the
//! scoring loop is modeled on the same "greedy decode, count consumed
//! bytes" shape the `to_unicode` decoders in `codec::shift_jis`/`euc_jp`
//! already implement per-byte, just run to exhaustion instead of stopping
//! at the first buffer boundary.

use crate::codec::iso2022jp::{Iso2022JpDecoder, Variant};
use crate::codec::{euc_jp, shift_jis};
use crate::types::{ConversionResult, Decoder, SubstitutionPolicy};

/// One auto-detection outcome (spec §4.4: "mib, canonical_name,
/// convertible_byte_count").
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
    pub mib: u32,
    pub canonical_name: &'static str,
    pub convertible_byte_count: usize,
}

const ISO2022JP_VARIANTS: &[(Variant, &str, u32)] = &[
    (Variant::Jp, "ISO-2022-JP", 39),
    (Variant::Jp1, "ISO-2022-JP-1", 2040),
    (Variant::Jp2, "ISO-2022-JP-2", 2041),
    (Variant::Jp2004, "ISO-2022-JP-2004", 3000),
];

/// Counts how many leading bytes of `input` `decoder` can consume in
/// `Strict` mode before hitting a terminal error (spec §4.4's "scan
/// greedily, counting bytes consumed before an un-decodable sequence").
/// The output buffer is small and reused across iterations since only the
/// consumed-byte count matters here, not the decoded text.
fn greedy_score(mut decoder: impl Decoder, input: &[u8]) -> usize {
    let mut out = [0u16; 256];
    let mut consumed = 0;
    loop {
        let r = decoder.to_unicode(&mut out, &input[consumed..], SubstitutionPolicy::Strict, true);
        consumed += r.bytes_consumed;
        match r.result {
            ConversionResult::InsufficientBuffer if consumed < input.len() => continue,
            _ => break,
        }
    }
    consumed
}

fn is_valid_utf8(input: &[u8]) -> bool {
    std::str::from_utf8(input).is_ok()
}

/// Runs spec §4.4's algorithm: a full UTF-8 match wins outright; otherwise
/// the candidate (among Shift_JIS, Shift_JIS-2004, EUC-JP, EUC-JIS-2004,
/// and the ISO-2022-JP variants) with the longest convertible prefix wins,
/// ties broken by listing order (Shift_JIS family first, matching spec
/// §6's registration order).
pub fn detect(input: &[u8]) -> Detection {
    if is_valid_utf8(input) {
        return Detection {
            mib: 106,
            canonical_name: "UTF-8",
            convertible_byte_count: input.len(),
        };
    }

    let mut best = Detection {
        mib: 17,
        canonical_name: "Shift_JIS",
        convertible_byte_count: 0,
    };

    let candidates: Vec<(u32, &'static str, usize)> = vec![
        (17, "Shift_JIS", greedy_score(shift_jis::ShiftJisDecoder::jis_x_0208(), input)),
        (2024, "Shift_JIS-2004", greedy_score(shift_jis::ShiftJisDecoder::jis_x_0213(), input)),
        (18, "EUC-JP", greedy_score(euc_jp::EucJpDecoder::jis_x_0208(), input)),
        (2025, "EUC-JIS-2004", greedy_score(euc_jp::EucJpDecoder::jis_x_0213(), input)),
    ];
    for (mib, name, score) in candidates {
        if score > best.convertible_byte_count {
            best = Detection { mib, canonical_name: name, convertible_byte_count: score };
        }
    }

    // The ISO-2022-JP detector disambiguates by the tightest variant that
    // accepts the entire prefix (spec §4.4): try variants in increasing
    // permissiveness and keep the earliest one whose score matches the
    // input length, falling back to the loosest variant's score otherwise.
    let mut iso2022_best_score = 0;
    let mut iso2022_tightest: Option<(&'static str, u32)> = None;
    for &(variant, name, mib) in ISO2022JP_VARIANTS {
        let score = greedy_score(Iso2022JpDecoder::new(variant), input);
        if score > iso2022_best_score {
            iso2022_best_score = score;
        }
        if score == input.len() && iso2022_tightest.is_none() {
            iso2022_tightest = Some((name, mib));
        }
    }
    if iso2022_best_score > best.convertible_byte_count {
        let (name, mib) = iso2022_tightest.unwrap_or(("ISO-2022-JP-2", 2041));
        best = Detection { mib, canonical_name: name, convertible_byte_count: iso2022_best_score };
        log::debug!("auto-detect: selected {name} ({iso2022_best_score} of {} bytes)", input.len());
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_utf8_wins_outright() {
        let d = detect("こんにちは".as_bytes());
        assert_eq!(d.canonical_name, "UTF-8");
        assert_eq!(d.convertible_byte_count, "こんにちは".len());
    }

    #[test]
    fn iso2022jp_exact_match_is_selected() {
        // ESC $ B あ ESC ( B, valid only under ISO-2022-JP family, not UTF-8.
        let bytes: &[u8] = &[0x1b, b'$', b'B', 0x24, 0x22, 0x1b, b'(', b'B'];
        let d = detect(bytes);
        assert_eq!(d.canonical_name, "ISO-2022-JP");
        assert_eq!(d.convertible_byte_count, bytes.len());
    }

    #[test]
    fn shift_jis_kanji_outscores_euc_jp_misparse() {
        let bytes: &[u8] = &[0x93, 0xfa, 0x96, 0x7b]; // 日本, Shift_JIS
        let d = detect(bytes);
        assert_eq!(d.canonical_name, "Shift_JIS");
        assert_eq!(d.convertible_byte_count, 4);
    }
}
