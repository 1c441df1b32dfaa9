// This is a part of ascension-core.
// See README.md and LICENSE.txt for details.

//! The Japanese encoding engine (spec §1, §4.1-§4.3): codec tables, the
//! per-encoding `Encoder`/`Decoder` implementations, and the
//! `register_builtin_encodings` installer `registry::initialize()` calls.

pub mod ascii;
pub mod autodetect;
pub mod euc_jp;
pub mod iso2022jp;
pub mod shift_jis;
pub mod tables;

use crate::registry::{CodecRegistry, EncodingFactory};
use crate::{label, types::{Decoder, Encoder}};
use iso2022jp::Variant;

/// Registers every encoding spec §6 names. Called exactly once, from
/// `registry::initialize()`.
pub fn register_builtin_encodings(registry: &CodecRegistry) {
    registry.register_factory(EncodingFactory {
        canonical_name: "US-ASCII",
        aliases: &["ASCII", "us-ascii", "ANSI_X3.4-1968"],
        mib: 3,
        title: "US-ASCII",
        max_bytes_per_char: 1,
        substitution_byte: b'?',
        make_encoder: || Box::new(ascii::AsciiEncoder) as Box<dyn Encoder>,
        make_decoder: || Box::new(ascii::AsciiDecoder) as Box<dyn Decoder>,
    });

    registry.register_factory(EncodingFactory {
        canonical_name: "Shift_JIS",
        aliases: label::SHIFT_JIS_ALIASES,
        mib: 17,
        title: "Shift_JIS",
        max_bytes_per_char: 2,
        substitution_byte: b'?',
        make_encoder: || Box::new(shift_jis::ShiftJisEncoder::jis_x_0208()) as Box<dyn Encoder>,
        make_decoder: || Box::new(shift_jis::ShiftJisDecoder::jis_x_0208()) as Box<dyn Decoder>,
    });

    registry.register_factory(EncodingFactory {
        canonical_name: "Shift_JIS-2004",
        aliases: label::SHIFT_JIS_2004_ALIASES,
        mib: 2024,
        title: "Shift_JIS-2004",
        max_bytes_per_char: 2,
        substitution_byte: b'?',
        make_encoder: || Box::new(shift_jis::ShiftJisEncoder::jis_x_0213()) as Box<dyn Encoder>,
        make_decoder: || Box::new(shift_jis::ShiftJisDecoder::jis_x_0213()) as Box<dyn Decoder>,
    });

    registry.register_factory(EncodingFactory {
        canonical_name: "EUC-JP",
        aliases: label::EUC_JP_ALIASES,
        mib: 18,
        title: "EUC-JP",
        max_bytes_per_char: 3,
        substitution_byte: b'?',
        make_encoder: || Box::new(euc_jp::EucJpEncoder::jis_x_0208()) as Box<dyn Encoder>,
        make_decoder: || Box::new(euc_jp::EucJpDecoder::jis_x_0208()) as Box<dyn Decoder>,
    });

    registry.register_factory(EncodingFactory {
        canonical_name: "EUC-JIS-2004",
        aliases: label::EUC_JIS_2004_ALIASES,
        mib: 2025,
        title: "EUC-JIS-2004",
        max_bytes_per_char: 3,
        substitution_byte: b'?',
        make_encoder: || Box::new(euc_jp::EucJpEncoder::jis_x_0213()) as Box<dyn Encoder>,
        make_decoder: || Box::new(euc_jp::EucJpDecoder::jis_x_0213()) as Box<dyn Decoder>,
    });

    register_iso2022jp_variant(
        registry,
        "ISO-2022-JP",
        label::ISO_2022_JP_ALIASES,
        39,
        Variant::Jp,
    );
    register_iso2022jp_variant(
        registry,
        "ISO-2022-JP-1",
        label::ISO_2022_JP_1_ALIASES,
        2040,
        Variant::Jp1,
    );
    register_iso2022jp_variant(
        registry,
        "ISO-2022-JP-2",
        label::ISO_2022_JP_2_ALIASES,
        2041,
        Variant::Jp2,
    );
    register_iso2022jp_variant(
        registry,
        "ISO-2022-JP-2004",
        label::ISO_2022_JP_2004_ALIASES,
        3000,
        Variant::Jp2004,
    );
    register_iso2022jp_variant(
        registry,
        "ISO-2022-JP-2004-Strict",
        label::ISO_2022_JP_2004_STRICT_ALIASES,
        3001,
        Variant::Jp2004Strict,
    );
    register_iso2022jp_variant(
        registry,
        "ISO-2022-JP-2004-Compatible",
        label::ISO_2022_JP_2004_COMPATIBLE_ALIASES,
        3002,
        Variant::Jp2004Compatible,
    );

    // Not an IANA-registered charset; MIB 3003 continues the 3000+ range
    // the JIS X 0213 variant encodings above already use for vendor
    // extensions without an assigned MIBenum.
    registry.register_factory(EncodingFactory {
        canonical_name: "JISAutoDetect",
        aliases: label::JIS_AUTO_DETECT_ALIASES,
        mib: 3003,
        title: "JIS Auto Detect",
        max_bytes_per_char: 4,
        substitution_byte: b'?',
        make_encoder: autodetect::make_encoder,
        make_decoder: || Box::new(autodetect::JisAutoDetectDecoder::new()) as Box<dyn Decoder>,
    });
}

fn register_iso2022jp_variant(
    registry: &CodecRegistry,
    canonical_name: &'static str,
    aliases: &'static [&'static str],
    mib: u32,
    variant: Variant,
) {
    // `make_encoder`/`make_decoder` are plain `fn() -> Box<dyn _>`, so the
    // variant has to be baked in per call site rather than captured; one
    // small wrapper function per variant keeps `EncodingFactory` a `Copy`able
    // set of function pointers instead of growing a closure-capturing
    // variant (spec §9: "avoid per-call allocation" extends to the factory
    // table itself, not just the lookup tables).
    let make_encoder: fn() -> Box<dyn Encoder> = match variant {
        Variant::Jp => || Box::new(iso2022jp::Iso2022JpEncoder::new(Variant::Jp)),
        Variant::Jp1 => || Box::new(iso2022jp::Iso2022JpEncoder::new(Variant::Jp1)),
        Variant::Jp2 => || Box::new(iso2022jp::Iso2022JpEncoder::new(Variant::Jp2)),
        Variant::Jp2004 => || Box::new(iso2022jp::Iso2022JpEncoder::new(Variant::Jp2004)),
        Variant::Jp2004Strict => {
            || Box::new(iso2022jp::Iso2022JpEncoder::new(Variant::Jp2004Strict))
        }
        Variant::Jp2004Compatible => {
            || Box::new(iso2022jp::Iso2022JpEncoder::new(Variant::Jp2004Compatible))
        }
    };
    let make_decoder: fn() -> Box<dyn Decoder> = match variant {
        Variant::Jp => || Box::new(iso2022jp::Iso2022JpDecoder::new(Variant::Jp)),
        Variant::Jp1 => || Box::new(iso2022jp::Iso2022JpDecoder::new(Variant::Jp1)),
        Variant::Jp2 => || Box::new(iso2022jp::Iso2022JpDecoder::new(Variant::Jp2)),
        Variant::Jp2004 => || Box::new(iso2022jp::Iso2022JpDecoder::new(Variant::Jp2004)),
        Variant::Jp2004Strict => {
            || Box::new(iso2022jp::Iso2022JpDecoder::new(Variant::Jp2004Strict))
        }
        Variant::Jp2004Compatible => {
            || Box::new(iso2022jp::Iso2022JpDecoder::new(Variant::Jp2004Compatible))
        }
    };
    registry.register_factory(EncodingFactory {
        canonical_name,
        aliases,
        mib,
        title: canonical_name,
        max_bytes_per_char: 4,
        substitution_byte: b'?',
        make_encoder,
        make_decoder,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SubstitutionPolicy;

    #[test]
    fn registers_every_spec_named_encoding() {
        let registry = CodecRegistry::default();
        register_builtin_encodings(&registry);
        for name in [
            "Shift_JIS",
            "Shift_JIS-2004",
            "EUC-JP",
            "EUC-JIS-2004",
            "ISO-2022-JP",
            "ISO-2022-JP-1",
            "ISO-2022-JP-2",
            "ISO-2022-JP-2004",
            "ISO-2022-JP-2004-Strict",
            "ISO-2022-JP-2004-Compatible",
            "JISAutoDetect",
        ] {
            assert!(registry.for_name(name).is_some(), "{name} not registered");
        }
    }

    #[test]
    fn shift_jis_factory_round_trips_through_registry() {
        let registry = CodecRegistry::default();
        register_builtin_encodings(&registry);
        let factory = registry.for_name("Shift_JIS").unwrap();
        let mut encoder = factory.new_encoder();
        let input: Vec<u16> = "A".encode_utf16().collect();
        let mut out = [0u8; 4];
        let r = encoder.from_unicode(&mut out, &input, SubstitutionPolicy::Strict);
        assert_eq!(r.bytes_written, 1);
        assert_eq!(out[0], b'A');
    }
}
