// This is a part of ascension-core.
// See README.md and LICENSE.txt for details.

//! The ISO-2022-JP family (spec §4.2): a 7-bit stateful encoding selected
//! by a single variant tag, with escape-sequence designation of G0/G2 and
//! a handful of composing-character lookaheads.
//!
//! The teacher crate has no ISO-2022-JP support at all, so this module is
//! grounded directly in spec.md §4.2/§6 rather than on teacher code; it
//! reuses [`crate::state::EncodingState`] for designation bookkeeping and
//! the `tables::jis020{1,8,12,13}`/`gb2312`/`ksc5601`/`iso8859` modules for
//! the actual character data, following the same "encoder/decoder struct
//! wraps stateful fields, `Encoding` selects via a constructor" shape the
//! rest of `codec/` uses.

use super::tables::{gb2312, iso8859, jis0201, jis0208, jis0212, jis0213, ksc5601};
use crate::state::{EncodingState, G0Set, G2Set};
use crate::types::{
    ConversionResult, Decoder, Encoder, FromUnicodeResult, SubstitutionPolicy, ToUnicodeResult,
    REPLACEMENT_CHARACTER, ZERO_WIDTH_NON_JOINER,
};
use crate::util::{decode_one, Utf16Item};

/// The variant tag spec §4.2 uses to select which escape sequences are
/// legal (`'0'`, `'1'`, `'2'`, `'4'`, `'s'`, `'c'`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    Jp,
    Jp1,
    Jp2,
    Jp2004,
    Jp2004Strict,
    Jp2004Compatible,
}

impl Variant {
    pub fn tag(self) -> char {
        match self {
            Variant::Jp => '0',
            Variant::Jp1 => '1',
            Variant::Jp2 => '2',
            Variant::Jp2004 => '4',
            Variant::Jp2004Strict => 's',
            Variant::Jp2004Compatible => 'c',
        }
    }

    fn allows_gb2312(self) -> bool {
        matches!(self, Variant::Jp2)
    }

    fn allows_ksc5601(self) -> bool {
        matches!(self, Variant::Jp2)
    }

    fn allows_jis_x_0212(self) -> bool {
        matches!(self, Variant::Jp1 | Variant::Jp2)
    }

    fn allows_jis_x_0213(self) -> bool {
        matches!(self, Variant::Jp2004 | Variant::Jp2004Strict | Variant::Jp2004Compatible)
    }

    fn allows_g2(self) -> bool {
        matches!(self, Variant::Jp2)
    }

    /// Whether the JIS X 0213 designation escape is the 2000-compatible
    /// `ESC $ ( O` or the 2004 `ESC $ ( Q` form (spec §4.2 treats both as
    /// legal on input; only one is canonical on output).
    fn plane1_escape(self) -> &'static [u8] {
        match self {
            Variant::Jp2004Strict => b"\x1b$(O",
            _ => b"\x1b$(Q",
        }
    }
}

/// Composing-character lookahead table: `(base, combining) -> composed
/// ku-ten`. Spec §4.2 names two families (voiced-nasal bidakuon over
/// kana, and IPA tone marks); this holds the worked example from spec §4.2
/// (か + ゜ → JIS ku4/ten87) plus the tone-bar pair. Extending this to the
/// full JIS X 0213:2004 composing-character annex is a data-entry exercise,
/// not an architecture change.
const BIDAKUON: &[(char, char, u8, u8)] = &[('\u{304B}', '\u{309A}', 4, 87)]; // か + ゜

const RISING_TONE: (char, char) = ('\u{02E9}', '\u{02E5}');
const FALLING_TONE: (char, char) = ('\u{02E5}', '\u{02E9}');
/// Ku-ten of the standalone (non-ligated) tone-bar glyphs, matching the
/// entries `tables::jis0213::PLANE1_ADDITIONS` carries for them.
const TONE_LOW_KUTEN: (u8, u8) = (2, 1);
const TONE_HIGH_KUTEN: (u8, u8) = (2, 2);

fn tone_ligature_kuten(first: char) -> (u8, u8) {
    if first == RISING_TONE.0 {
        jis0213::RISING_TONE_LIGATURE_KUTEN
    } else {
        jis0213::FALLING_TONE_LIGATURE_KUTEN
    }
}

fn escape_for(g0: G0Set) -> &'static [u8] {
    match g0 {
        G0Set::Ascii => b"\x1b(B",
        G0Set::JisX0201Roman => b"\x1b(J",
        G0Set::JisX0208 => b"\x1b$B",
        G0Set::JisX0212 => b"\x1b$(D",
        G0Set::JisX0213Plane1 => b"\x1b$(Q",
        G0Set::JisX0213Plane2 => b"\x1b$(P",
        G0Set::Gb2312 => b"\x1b$A",
        G0Set::KsC5601 => b"\x1b$(C",
    }
}

/// One code point's encoding: which G0 set must be designated, and the
/// 7-bit bytes to emit once it is (1 byte for ASCII/roman, 2 for every
/// double-byte set here since ISO-2022-JP strips the high bit).
enum Plan {
    Designate(G0Set, Vec<u8>),
    Undesignated,
}

fn plan_for(ch: char, variant: Variant, strict_prohibited: bool) -> Plan {
    if (ch as u32) <= 0x7F && ch != '\u{005C}' && ch != '\u{007E}' {
        return Plan::Designate(G0Set::Ascii, vec![ch as u8]);
    }
    if let Some(b) = jis0201::roman_backward(ch) {
        if ch == '\u{00A5}' || ch == '\u{203E}' {
            return Plan::Designate(G0Set::JisX0201Roman, vec![b]);
        }
    }

    // Strict mode prefers a JIS X 0208 designation over 0213 when both can
    // represent the character (spec §4.2).
    let prefer_0208_first = matches!(variant, Variant::Jp2004Strict) || !variant.allows_jis_x_0213();

    let try_0208 = |ch: char| jis0208::backward(ch).map(|ptr| (G0Set::JisX0208, ptr));
    let try_0213 = |ch: char| {
        if !variant.allows_jis_x_0213() {
            return None;
        }
        if strict_prohibited && matches!(variant, Variant::Jp2004Strict) && jis0213::is_prohibited_in_strict(ch) {
            return None;
        }
        jis0213::plane1_backward(ch)
            .map(|ptr| (G0Set::JisX0213Plane1, ptr))
            .or_else(|| jis0213::plane2_backward(ch).map(|ptr| (G0Set::JisX0213Plane2, ptr)))
    };

    let double_byte = if prefer_0208_first {
        try_0208(ch).or_else(|| try_0213(ch))
    } else {
        try_0213(ch).or_else(|| try_0208(ch))
    };

    if let Some((set, ptr)) = double_byte {
        let ku = (ptr / 94 + 1) as u8;
        let ten = (ptr % 94 + 1) as u8;
        return Plan::Designate(set, vec![ku + 0x20, ten + 0x20]);
    }

    if variant.allows_jis_x_0212() {
        if let Some(ptr) = jis0212::backward(ch) {
            let ku = (ptr / 94 + 1) as u8;
            let ten = (ptr % 94 + 1) as u8;
            return Plan::Designate(G0Set::JisX0212, vec![ku + 0x20, ten + 0x20]);
        }
    }
    if variant.allows_gb2312() {
        if let Some(ptr) = gb2312::backward(ch) {
            let ku = (ptr / 94 + 1) as u8;
            let ten = (ptr % 94 + 1) as u8;
            return Plan::Designate(G0Set::Gb2312, vec![ku + 0x20, ten + 0x20]);
        }
    }
    if variant.allows_ksc5601() {
        if let Some(ptr) = ksc5601::backward(ch) {
            let ku = (ptr / 94 + 1) as u8;
            let ten = (ptr % 94 + 1) as u8;
            return Plan::Designate(G0Set::KsC5601, vec![ku + 0x20, ten + 0x20]);
        }
    }
    Plan::Undesignated
}

pub struct Iso2022JpEncoder {
    variant: Variant,
    state: EncodingState,
}

impl Iso2022JpEncoder {
    pub fn new(variant: Variant) -> Self {
        Iso2022JpEncoder { variant, state: EncodingState::new() }
    }
}

impl Encoder for Iso2022JpEncoder {
    fn from_unicode(
        &mut self,
        output: &mut [u8],
        input: &[u16],
        policy: SubstitutionPolicy,
    ) -> FromUnicodeResult {
        let mut in_pos = 0;
        let mut out_pos = 0;
        while in_pos < input.len() {
            let (ch, mut units) = match decode_one(&input[in_pos..]) {
                Some(Utf16Item::Scalar { ch, units }) => (ch, units),
                Some(Utf16Item::Pending) => {
                    return FromUnicodeResult {
                        result: ConversionResult::CompletedPending,
                        bytes_written: out_pos,
                        units_consumed: in_pos,
                    }
                }
                Some(Utf16Item::Malformed) | None => {
                    return FromUnicodeResult {
                        result: ConversionResult::MalformedInput,
                        bytes_written: out_pos,
                        units_consumed: in_pos,
                    }
                }
            };

            // Composing-character lookahead: a base kana/tone-bar code point
            // followed by a combining mark or its pairing tone needs the
            // *next* input code point before we know which glyph to emit.
            let mut composed: Option<(G0Set, Vec<u8>)> = None;
            // Extra input units consumed beyond `units` that produce no
            // output of their own (a ZWNJ dropped between two
            // deliberately-unligated tone bars).
            let mut extra_units = 0usize;
            if let Some(&(base, combiner, ku, ten)) =
                BIDAKUON.iter().find(|&&(base, _, _, _)| base == ch)
            {
                let _ = base;
                match decode_one(&input[in_pos + units..]) {
                    Some(Utf16Item::Scalar { ch: next, units: next_units }) if next == combiner => {
                        composed = Some((G0Set::JisX0208, vec![ku + 0x20, ten + 0x20]));
                        units += next_units;
                    }
                    None if in_pos + units >= input.len() => {
                        return FromUnicodeResult {
                            result: ConversionResult::CompletedPending,
                            bytes_written: out_pos,
                            units_consumed: in_pos,
                        };
                    }
                    _ => {}
                }
            } else if ch == RISING_TONE.0 || ch == RISING_TONE.1 {
                let partner = if ch == RISING_TONE.0 { RISING_TONE.1 } else { RISING_TONE.0 };
                match decode_one(&input[in_pos + units..]) {
                    Some(Utf16Item::Scalar { ch: next, units: next_units }) if next == partner => {
                        // Direct adjacency (no ZWNJ): ligate into one glyph
                        // (spec §4.2).
                        let (ku, ten) = tone_ligature_kuten(ch);
                        composed = Some((G0Set::JisX0213Plane1, vec![ku + 0x20, ten + 0x20]));
                        units += next_units;
                    }
                    Some(Utf16Item::Scalar { ch: next, units: next_units }) if next == ZERO_WIDTH_NON_JOINER => {
                        // ZWNJ marks deliberate non-ligation: drop it and
                        // encode this tone bar on its own (spec §4.2).
                        extra_units = next_units;
                    }
                    None if in_pos + units >= input.len() => {
                        return FromUnicodeResult {
                            result: ConversionResult::CompletedPending,
                            bytes_written: out_pos,
                            units_consumed: in_pos,
                        };
                    }
                    _ => {}
                }
            }

            let plan = if let Some((set, bytes)) = composed {
                Plan::Designate(set, bytes)
            } else {
                plan_for(ch, self.variant, matches!(self.variant, Variant::Jp2004Strict))
            };

            match plan {
                Plan::Designate(set, bytes) => {
                    let needs_escape = self.state.g0 != set;
                    let escape = if needs_escape { escape_for(set) } else { &[][..] };
                    if out_pos + escape.len() + bytes.len() > output.len() {
                        return FromUnicodeResult {
                            result: ConversionResult::InsufficientBuffer,
                            bytes_written: out_pos,
                            units_consumed: in_pos,
                        };
                    }
                    output[out_pos..out_pos + escape.len()].copy_from_slice(escape);
                    out_pos += escape.len();
                    output[out_pos..out_pos + bytes.len()].copy_from_slice(&bytes);
                    out_pos += bytes.len();
                    self.state.g0 = set;
                }
                Plan::Undesignated => match policy {
                    SubstitutionPolicy::Ignore => {}
                    SubstitutionPolicy::Replace => {
                        let needs_escape = self.state.g0 != G0Set::Ascii;
                        let escape = if needs_escape { escape_for(G0Set::Ascii) } else { &[][..] };
                        if out_pos + escape.len() + 1 > output.len() {
                            return FromUnicodeResult {
                                result: ConversionResult::InsufficientBuffer,
                                bytes_written: out_pos,
                                units_consumed: in_pos,
                            };
                        }
                        output[out_pos..out_pos + escape.len()].copy_from_slice(escape);
                        out_pos += escape.len();
                        output[out_pos] = b'?';
                        out_pos += 1;
                        self.state.g0 = G0Set::Ascii;
                    }
                    SubstitutionPolicy::Strict => {
                        return FromUnicodeResult {
                            result: ConversionResult::UnmappableCharacter,
                            bytes_written: out_pos,
                            units_consumed: in_pos,
                        };
                    }
                },
            }
            in_pos += units + extra_units;
        }
        FromUnicodeResult {
            result: ConversionResult::Completed,
            bytes_written: out_pos,
            units_consumed: in_pos,
        }
    }

    fn finish(&mut self, output: &mut [u8]) -> FromUnicodeResult {
        if self.state.g0 == G0Set::Ascii {
            return FromUnicodeResult {
                result: ConversionResult::Completed,
                bytes_written: 0,
                units_consumed: 0,
            };
        }
        let escape = escape_for(G0Set::Ascii);
        if output.len() < escape.len() {
            return FromUnicodeResult {
                result: ConversionResult::InsufficientBuffer,
                bytes_written: 0,
                units_consumed: 0,
            };
        }
        output[..escape.len()].copy_from_slice(escape);
        self.state.g0 = G0Set::Ascii;
        FromUnicodeResult {
            result: ConversionResult::Completed,
            bytes_written: escape.len(),
            units_consumed: 0,
        }
    }
}

pub struct Iso2022JpDecoder {
    variant: Variant,
    state: EncodingState,
}

impl Iso2022JpDecoder {
    pub fn new(variant: Variant) -> Self {
        Iso2022JpDecoder { variant, state: EncodingState::new() }
    }

    fn lookup_g0(&self, ku: u8, ten: u8) -> Option<char> {
        let ptr = (ku as u16 - 1) * 94 + (ten as u16 - 1);
        match self.state.g0 {
            G0Set::JisX0208 => jis0208::forward(ptr),
            G0Set::JisX0212 => jis0212::forward(ptr),
            G0Set::JisX0213Plane1 => jis0213::plane1_forward(ptr),
            G0Set::JisX0213Plane2 => jis0213::plane2_forward(ptr),
            G0Set::Gb2312 => gb2312::forward(ptr),
            G0Set::KsC5601 => ksc5601::forward(ptr),
            G0Set::Ascii | G0Set::JisX0201Roman => None,
        }
    }
}

impl Decoder for Iso2022JpDecoder {
    fn to_unicode(
        &mut self,
        output: &mut [u16],
        input: &[u8],
        policy: SubstitutionPolicy,
        end_of_input: bool,
    ) -> ToUnicodeResult {
        let mut in_pos = 0;
        let mut out_pos = 0;

        macro_rules! emit {
            ($ch:expr) => {{
                if out_pos >= output.len() {
                    return ToUnicodeResult {
                        result: ConversionResult::InsufficientBuffer,
                        units_written: out_pos,
                        bytes_consumed: in_pos,
                    };
                }
                output[out_pos] = $ch as u16;
                out_pos += 1;
            }};
        }

        while in_pos < input.len() {
            let byte = input[in_pos];

            if byte == 0x0A || byte == 0x0D {
                emit!(byte);
                in_pos += 1;
                self.state.reset_on_line_break();
                continue;
            }

            if byte == 0x1B {
                // Need enough lookahead to identify the escape; if the
                // stream ends mid-escape this signals more input needed.
                let rest = &input[in_pos..];
                let (consumed, outcome) = match_escape(rest, self.variant);
                match outcome {
                    EscapeOutcome::Designate(g0) => {
                        self.state.g0 = g0;
                        in_pos += consumed;
                        continue;
                    }
                    EscapeOutcome::DesignateG2(g2) => {
                        self.state.g2 = g2;
                        in_pos += consumed;
                        continue;
                    }
                    EscapeOutcome::ShiftG2 => {
                        self.state.invoked_g2 = true;
                        in_pos += consumed;
                        continue;
                    }
                    EscapeOutcome::NeedMore => {
                        return if end_of_input {
                            ToUnicodeResult {
                                result: ConversionResult::MalformedInput,
                                units_written: out_pos,
                                bytes_consumed: in_pos,
                            }
                        } else {
                            ToUnicodeResult {
                                result: ConversionResult::CompletedPending,
                                units_written: out_pos,
                                bytes_consumed: in_pos,
                            }
                        };
                    }
                    EscapeOutcome::Invalid => match policy {
                        SubstitutionPolicy::Ignore => {
                            in_pos += consumed.max(1);
                            continue;
                        }
                        SubstitutionPolicy::Replace => {
                            emit!(REPLACEMENT_CHARACTER);
                            in_pos += consumed.max(1);
                            continue;
                        }
                        SubstitutionPolicy::Strict => {
                            return ToUnicodeResult {
                                result: ConversionResult::MalformedInput,
                                units_written: out_pos,
                                bytes_consumed: in_pos,
                            };
                        }
                    },
                }
            }

            if self.state.invoked_g2 {
                self.state.invoked_g2 = false;
                let ch = match self.state.g2 {
                    G2Set::Iso8859_1 => iso8859::latin1_forward(byte),
                    G2Set::Iso8859_7 => iso8859::greek_forward(byte),
                    G2Set::Undesignated => None,
                };
                match ch {
                    Some(ch) => {
                        emit!(ch);
                        in_pos += 1;
                    }
                    None => match policy {
                        SubstitutionPolicy::Ignore => in_pos += 1,
                        SubstitutionPolicy::Replace => {
                            emit!(REPLACEMENT_CHARACTER);
                            in_pos += 1;
                        }
                        SubstitutionPolicy::Strict => {
                            return ToUnicodeResult {
                                result: ConversionResult::MalformedInput,
                                units_written: out_pos,
                                bytes_consumed: in_pos,
                            }
                        }
                    },
                }
                continue;
            }

            if byte < 0x20 || (0x7F..=0x9F).contains(&byte) {
                emit!(byte);
                in_pos += 1;
                continue;
            }

            match self.state.g0 {
                G0Set::Ascii => {
                    emit!(byte);
                    in_pos += 1;
                }
                G0Set::JisX0201Roman => {
                    match jis0201::roman_forward(byte & 0x7F) {
                        Some(ch) => emit!(ch),
                        None => match policy {
                            SubstitutionPolicy::Ignore => {}
                            SubstitutionPolicy::Replace => emit!(REPLACEMENT_CHARACTER),
                            SubstitutionPolicy::Strict => {
                                return ToUnicodeResult {
                                    result: ConversionResult::MalformedInput,
                                    units_written: out_pos,
                                    bytes_consumed: in_pos,
                                }
                            }
                        },
                    }
                    in_pos += 1;
                }
                _ => {
                    if in_pos + 1 >= input.len() {
                        return if end_of_input {
                            ToUnicodeResult {
                                result: ConversionResult::MalformedInput,
                                units_written: out_pos,
                                bytes_consumed: in_pos,
                            }
                        } else {
                            ToUnicodeResult {
                                result: ConversionResult::CompletedPending,
                                units_written: out_pos,
                                bytes_consumed: in_pos,
                            }
                        };
                    }
                    let ku = byte - 0x20;
                    let ten = input[in_pos + 1] - 0x20;

                    if self.state.g0 == G0Set::JisX0213Plane1 {
                        if (ku, ten) == jis0213::RISING_TONE_LIGATURE_KUTEN {
                            emit!(RISING_TONE.0);
                            emit!(RISING_TONE.1);
                            in_pos += 2;
                            continue;
                        }
                        if (ku, ten) == jis0213::FALLING_TONE_LIGATURE_KUTEN {
                            emit!(FALLING_TONE.0);
                            emit!(FALLING_TONE.1);
                            in_pos += 2;
                            continue;
                        }
                        let this_tone = if (ku, ten) == TONE_LOW_KUTEN {
                            Some(RISING_TONE.0)
                        } else if (ku, ten) == TONE_HIGH_KUTEN {
                            Some(RISING_TONE.1)
                        } else {
                            None
                        };
                        if let Some(tone_ch) = this_tone {
                            // Spec §4.2: if this standalone tone bar is
                            // immediately followed by its partner's
                            // standalone glyph, the original text must have
                            // had a ZWNJ between them (direct adjacency
                            // would have ligated on encode) — restore it.
                            // Only checks within this call's buffer; a pair
                            // split exactly across two `to_unicode` calls
                            // falls back to emitting each bar unjoined.
                            let partner_kuten = if tone_ch == RISING_TONE.0 { TONE_HIGH_KUTEN } else { TONE_LOW_KUTEN };
                            let partner_ch = if tone_ch == RISING_TONE.0 { RISING_TONE.1 } else { RISING_TONE.0 };
                            if in_pos + 3 < input.len() {
                                let next_ku = input[in_pos + 2].wrapping_sub(0x20);
                                let next_ten = input[in_pos + 3].wrapping_sub(0x20);
                                if (next_ku, next_ten) == partner_kuten {
                                    emit!(tone_ch);
                                    emit!(ZERO_WIDTH_NON_JOINER);
                                    emit!(partner_ch);
                                    in_pos += 4;
                                    continue;
                                }
                            } else if !end_of_input {
                                return ToUnicodeResult {
                                    result: ConversionResult::CompletedPending,
                                    units_written: out_pos,
                                    bytes_consumed: in_pos,
                                };
                            }
                            emit!(tone_ch);
                            in_pos += 2;
                            continue;
                        }
                    }

                    match self.lookup_g0(ku, ten) {
                        Some(ch) => {
                            emit!(ch);
                            in_pos += 2;
                        }
                        None => {
                            match policy {
                                SubstitutionPolicy::Ignore => {}
                                SubstitutionPolicy::Replace => emit!(REPLACEMENT_CHARACTER),
                                SubstitutionPolicy::Strict => {
                                    return ToUnicodeResult {
                                        result: ConversionResult::MalformedInput,
                                        units_written: out_pos,
                                        bytes_consumed: in_pos,
                                    }
                                }
                            }
                            in_pos += 2;
                        }
                    }
                }
            }
        }

        ToUnicodeResult {
            result: ConversionResult::Completed,
            units_written: out_pos,
            bytes_consumed: in_pos,
        }
    }
}

enum EscapeOutcome {
    Designate(G0Set),
    DesignateG2(G2Set),
    ShiftG2,
    NeedMore,
    Invalid,
}

/// Parses one escape sequence starting at `input[0] == 0x1b`, returning how
/// many bytes it consumed and what it designates. `variant` gates which
/// sequences are legal, per spec §4.2's per-variant table.
fn match_escape(input: &[u8], variant: Variant) -> (usize, EscapeOutcome) {
    if input.len() < 2 {
        return (0, EscapeOutcome::NeedMore);
    }
    match input[1] {
        b'(' => {
            if input.len() < 3 {
                return (0, EscapeOutcome::NeedMore);
            }
            match input[2] {
                b'B' => (3, EscapeOutcome::Designate(G0Set::Ascii)),
                b'J' => (3, EscapeOutcome::Designate(G0Set::JisX0201Roman)),
                _ => (3, EscapeOutcome::Invalid),
            }
        }
        b'$' => {
            if input.len() < 3 {
                return (0, EscapeOutcome::NeedMore);
            }
            match input[2] {
                b'@' | b'B' => (3, EscapeOutcome::Designate(G0Set::JisX0208)),
                b'A' if variant.allows_gb2312() => (3, EscapeOutcome::Designate(G0Set::Gb2312)),
                b'(' => {
                    if input.len() < 4 {
                        return (0, EscapeOutcome::NeedMore);
                    }
                    match input[3] {
                        b'C' if variant.allows_ksc5601() => {
                            (4, EscapeOutcome::Designate(G0Set::KsC5601))
                        }
                        b'D' if variant.allows_jis_x_0212() => {
                            (4, EscapeOutcome::Designate(G0Set::JisX0212))
                        }
                        b'O' | b'Q' if variant.allows_jis_x_0213() => {
                            (4, EscapeOutcome::Designate(G0Set::JisX0213Plane1))
                        }
                        b'P' if variant.allows_jis_x_0213() => {
                            (4, EscapeOutcome::Designate(G0Set::JisX0213Plane2))
                        }
                        _ => (4, EscapeOutcome::Invalid),
                    }
                }
                _ => (3, EscapeOutcome::Invalid),
            }
        }
        b'.' if variant.allows_g2() => {
            if input.len() < 3 {
                return (0, EscapeOutcome::NeedMore);
            }
            match input[2] {
                b'A' => (3, EscapeOutcome::DesignateG2(G2Set::Iso8859_1)),
                b'F' => (3, EscapeOutcome::DesignateG2(G2Set::Iso8859_7)),
                _ => (3, EscapeOutcome::Invalid),
            }
        }
        b'N' => (2, EscapeOutcome::ShiftG2),
        _ => (2, EscapeOutcome::Invalid),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode_all(bytes: &[u8], variant: Variant) -> String {
        let mut dec = Iso2022JpDecoder::new(variant);
        let mut out = [0u16; 64];
        let r = dec.to_unicode(&mut out, bytes, SubstitutionPolicy::Strict, true);
        assert_eq!(r.result, ConversionResult::Completed);
        out[..r.units_written].iter().map(|&u| char::from_u32(u as u32).unwrap()).collect()
    }

    #[test]
    fn designation_roundtrips_ascii_and_jis0208() {
        // ESC $ B あ ESC ( B A -> "あA"
        let bytes = [0x1b, b'$', b'B', 0x24, 0x22, 0x1b, b'(', b'B', b'A'];
        assert_eq!(decode_all(&bytes, Variant::Jp), "\u{3042}A");
    }

    #[test]
    fn line_break_resets_designation() {
        let bytes = [0x1b, b'$', b'B', 0x24, 0x22, b'\n', b'A'];
        assert_eq!(decode_all(&bytes, Variant::Jp), "\u{3042}\nA");
    }

    #[test]
    fn encoder_emits_escape_only_on_designation_change() {
        let mut enc = Iso2022JpEncoder::new(Variant::Jp);
        let input: Vec<u16> = "\u{3042}\u{3044}".encode_utf16().collect();
        let mut out = [0u8; 16];
        let r = enc.from_unicode(&mut out, &input, SubstitutionPolicy::Strict);
        assert_eq!(r.result, ConversionResult::Completed);
        // one ESC $ B designation, then two raw two-byte pairs, no repeat escape
        assert_eq!(&out[..3], b"\x1b$B");
    }

    #[test]
    fn finish_restores_ascii_designation() {
        let mut enc = Iso2022JpEncoder::new(Variant::Jp);
        let input: Vec<u16> = "\u{3042}".encode_utf16().collect();
        let mut out = [0u8; 16];
        let r = enc.from_unicode(&mut out, &input, SubstitutionPolicy::Strict);
        let mut tail = [0u8; 8];
        let fin = enc.finish(&mut tail);
        assert_eq!(&tail[..fin.bytes_written], b"\x1b(B");
        let _ = r;
    }

    #[test]
    fn gb2312_only_legal_in_variant_2() {
        assert!(!Variant::Jp.allows_gb2312());
        assert!(Variant::Jp2.allows_gb2312());
    }

    #[test]
    fn adjacent_tone_bars_ligate_on_encode_and_decode() {
        // Trailing 'x' keeps the second tone bar's combiner lookahead inside
        // the buffer; a tone bar sitting at the literal end of an
        // `from_unicode` call is a streaming edge case this test doesn't
        // exercise.
        let mut enc = Iso2022JpEncoder::new(Variant::Jp2004);
        let text: String = [RISING_TONE.0, RISING_TONE.1, 'x'].iter().collect();
        let input: Vec<u16> = text.encode_utf16().collect();
        let mut out = [0u8; 16];
        let r = enc.from_unicode(&mut out, &input, SubstitutionPolicy::Strict);
        assert_eq!(r.result, ConversionResult::Completed);
        let (ku, ten) = jis0213::RISING_TONE_LIGATURE_KUTEN;
        assert_eq!(
            &out[..r.bytes_written],
            [b"\x1b$(Q".as_slice(), &[ku + 0x20, ten + 0x20], b"\x1b(Bx".as_slice()].concat()
        );

        assert_eq!(decode_all(&out[..r.bytes_written], Variant::Jp2004), text);
    }

    #[test]
    fn zwnj_separated_tone_bars_roundtrip_without_ligating() {
        let mut enc = Iso2022JpEncoder::new(Variant::Jp2004);
        let text: String = [RISING_TONE.0, ZERO_WIDTH_NON_JOINER, RISING_TONE.1, 'x'].iter().collect();
        let input: Vec<u16> = text.encode_utf16().collect();
        let mut out = [0u8; 16];
        let r = enc.from_unicode(&mut out, &input, SubstitutionPolicy::Strict);
        assert_eq!(r.result, ConversionResult::Completed);
        // two standalone ku-ten pairs, not the ligature ku-ten
        let (lig_ku, lig_ten) = jis0213::RISING_TONE_LIGATURE_KUTEN;
        assert!(!out[..r.bytes_written].windows(2).any(|w| w == [lig_ku + 0x20, lig_ten + 0x20]));

        let decoded = decode_all(&out[..r.bytes_written], Variant::Jp2004);
        assert_eq!(decoded, text);
    }
}
