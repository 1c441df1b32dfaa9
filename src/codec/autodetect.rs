// This is a part of ascension-core.
// See README.md and LICENSE.txt for details.

//! The `JISAutoDetect` pseudo-encoding's decoder (spec §4.4, §6): registered
//! under the name `JISAutoDetect` like any other codec, but its decoder
//! delegates to whichever encoding `crate::detect::detect` picks.
//!
//! Detection needs the complete byte sequence to score candidates fairly
//! (spec §4.4 scores "a byte buffer", not a prefix), so unlike the other
//! decoders in this crate this one is necessarily buffered rather than
//! streaming: every call before `end_of_input` just appends to an internal
//! buffer and reports `CompletedPending`.

use std::collections::VecDeque;

use crate::codec::iso2022jp::{Iso2022JpEncoder, Variant};
use crate::detect;
use crate::registry;
use crate::types::{ConversionResult, Decoder, Encoder, SubstitutionPolicy, ToUnicodeResult};

pub struct JisAutoDetectDecoder {
    buffer: Vec<u8>,
    pending: VecDeque<u16>,
    decided: bool,
}

impl JisAutoDetectDecoder {
    pub fn new() -> Self {
        JisAutoDetectDecoder { buffer: Vec::new(), pending: VecDeque::new(), decided: false }
    }

    fn decide_and_decode(&mut self, policy: SubstitutionPolicy) {
        let detection = detect::detect(&self.buffer);
        log::debug!(
            "JISAutoDetect selected {} for {} buffered bytes",
            detection.canonical_name,
            self.buffer.len()
        );
        let mut decoder = registry::initialize()
            .for_name(detection.canonical_name)
            .map(|factory| factory.new_decoder())
            .unwrap_or_else(|| Box::new(crate::codec::ascii::AsciiDecoder));

        let mut out = [0u16; 1024];
        let mut consumed = 0;
        while consumed < self.buffer.len() {
            let r = decoder.to_unicode(&mut out, &self.buffer[consumed..], policy, true);
            self.pending.extend(out[..r.units_written].iter().copied());
            consumed += r.bytes_consumed;
            if r.bytes_consumed == 0 && r.units_written == 0 {
                break;
            }
        }
        self.decided = true;
    }
}

impl Default for JisAutoDetectDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for JisAutoDetectDecoder {
    fn to_unicode(
        &mut self,
        output: &mut [u16],
        input: &[u8],
        policy: SubstitutionPolicy,
        end_of_input: bool,
    ) -> ToUnicodeResult {
        if !self.decided {
            self.buffer.extend_from_slice(input);
            if !end_of_input {
                return ToUnicodeResult {
                    result: ConversionResult::CompletedPending,
                    units_written: 0,
                    bytes_consumed: input.len(),
                };
            }
            self.decide_and_decode(policy);
        }
        let n = output.len().min(self.pending.len());
        for slot in output.iter_mut().take(n) {
            *slot = self.pending.pop_front().expect("n bounded by pending.len()");
        }
        let result =
            if self.pending.is_empty() { ConversionResult::Completed } else { ConversionResult::InsufficientBuffer };
        ToUnicodeResult { result, units_written: n, bytes_consumed: input.len() }
    }
}

/// `JISAutoDetect`'s encoder: auto-detection is a decode-direction concept
/// (spec §4.4 never scores outgoing text), so encoding through this
/// pseudo-encoding falls back to plain ISO-2022-JP, matching how Java's own
/// `JISAutoDetect` charset provider treats the encode direction.
pub fn make_encoder() -> Box<dyn Encoder> {
    Box::new(Iso2022JpEncoder::new(Variant::Jp))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_and_decodes_shift_jis_bytes() {
        let mut decoder = JisAutoDetectDecoder::new();
        let input: &[u8] = &[0x93, 0xfa, 0x96, 0x7b]; // 日本, Shift_JIS
        let mut out = [0u16; 16];
        let r = decoder.to_unicode(&mut out, input, SubstitutionPolicy::Strict, true);
        assert_eq!(r.result, ConversionResult::Completed);
        let decoded: Vec<u16> = out[..r.units_written].to_vec();
        assert_eq!(String::from_utf16(&decoded).unwrap(), "日本");
    }

    #[test]
    fn buffers_across_calls_until_end_of_input() {
        let mut decoder = JisAutoDetectDecoder::new();
        let mut out = [0u16; 16];
        let r1 = decoder.to_unicode(&mut out, &[0x93], SubstitutionPolicy::Strict, false);
        assert_eq!(r1.result, ConversionResult::CompletedPending);
        assert_eq!(r1.units_written, 0);
        let r2 = decoder.to_unicode(&mut out, &[0xfa], SubstitutionPolicy::Strict, true);
        assert_eq!(r2.result, ConversionResult::Completed);
        assert_eq!(String::from_utf16(&out[..r2.units_written]).unwrap(), "日");
    }
}
