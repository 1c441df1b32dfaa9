// This is a part of ascension-core.
// See README.md and LICENSE.txt for details.

//! Alias tables for the encodings this crate registers (spec §6).
//!
//! Grounded in the teacher's `label.rs`, which maps WHATWG labels to
//! encodings via one large `match` on a normalized (trimmed, lowercased)
//! string. We keep the same "one constant list of aliases per encoding"
//! shape, but expose it as data (`&'static [&'static str]`) that
//! `codec::register_builtin_encodings` feeds into
//! `registry::EncodingFactory`, rather than a closed match expression —
//! consistent with spec §4.1's registry being open to `register_factory`.

pub const SHIFT_JIS_ALIASES: &[&str] = &["MS_Kanji", "csShiftJIS", "shift-jis", "sjis"];
pub const SHIFT_JIS_2004_ALIASES: &[&str] = &["Shift_JIS-2004", "shift_jisx0213"];

pub const EUC_JP_ALIASES: &[&str] = &[
    "Extended_UNIX_Code_Packed_Format_for_Japanese",
    "csEUCPkdFmtJapanese",
    "euc-jp",
    "eucjp",
];
pub const EUC_JIS_2004_ALIASES: &[&str] = &["EUC-JIS-2004", "eucjis2004"];

pub const ISO_2022_JP_ALIASES: &[&str] = &["csISO2022JP", "iso2022jp"];
pub const ISO_2022_JP_1_ALIASES: &[&str] = &["iso2022jp1"];
pub const ISO_2022_JP_2_ALIASES: &[&str] = &["csISO2022JP2", "iso2022jp2"];
pub const ISO_2022_JP_2004_ALIASES: &[&str] = &["iso2022jp2004"];
pub const ISO_2022_JP_2004_STRICT_ALIASES: &[&str] = &["iso2022jp2004strict"];
pub const ISO_2022_JP_2004_COMPATIBLE_ALIASES: &[&str] = &["iso2022jp2004compatible"];

pub const JIS_AUTO_DETECT_ALIASES: &[&str] = &["jisautodetect"];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shift_jis_aliases_do_not_include_canonical_name() {
        assert!(!SHIFT_JIS_ALIASES.contains(&"Shift_JIS"));
    }
}
