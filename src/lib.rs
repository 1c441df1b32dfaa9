// This is a part of ascension-core.
// See README.md and LICENSE.txt for details.

/*!

# ascension-core

The encoding and search engine at the heart of a text editor: bidirectional
conversion between Unicode and the Japanese `ISO-2022-JP`/`Shift_JIS`/`EUC-JP`
encoding families, plus a literal/regex/Migemo search engine with an
undoable, per-keystroke incremental mode.

## Codecs

Encodings are reached through a process-wide [`registry`], not through
static items: call [`registry::initialize`] once, then look a codec up by
its canonical name or alias via [`registry::CodecRegistry::for_name`], or by
its IANA MIB enum via [`registry::CodecRegistry::for_mib`].

```
use ascension_core::registry;
use ascension_core::types::SubstitutionPolicy;

let reg = registry::initialize();
let factory = reg.for_name("Shift_JIS").expect("Shift_JIS is always registered");
let mut encoder = factory.new_encoder();

let input: Vec<u16> = "日本".encode_utf16().collect();
let mut out = [0u8; 8];
let result = encoder.from_unicode(&mut out, &input, SubstitutionPolicy::Strict);
assert_eq!(&out[..result.bytes_written], &[0x93, 0xfa, 0x96, 0x7b]);
```

Bytes of unknown provenance go through [`detect::detect`] first, or through
the `JISAutoDetect` pseudo-encoding registered under that name, which
delegates to whichever candidate wins.

## Search

[`search::TextSearcher`] drives one-shot literal/regex search-and-replace
against anything implementing [`search::Document`]. [`search::IncrementalSearcher`]
wraps a `TextSearcher` in a live, per-keystroke session with its own
undoable status stack, for "search as you type" editor UIs.

*/

pub mod codec;
pub mod detect;
pub mod error;
pub mod label;
pub mod registry;
pub mod search;
pub mod state;
pub mod types;
mod util;

pub use error::{ConversionError, SearchError};
pub use registry::{CodecRegistry, EncodingFactory, Mib};
pub use types::{ConversionResult, Decoder, Encoder, SubstitutionPolicy};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_initializes_and_round_trips_ascii() {
        let reg = registry::initialize();
        let factory = reg.for_name("US-ASCII").expect("US-ASCII is always registered");
        let mut encoder = factory.new_encoder();
        let mut decoder = factory.new_decoder();

        let input: Vec<u16> = "Hello".encode_utf16().collect();
        let mut bytes = [0u8; 16];
        let enc = encoder.from_unicode(&mut bytes, &input, SubstitutionPolicy::Strict);
        assert_eq!(enc.result, ConversionResult::Completed);

        let mut units = [0u16; 16];
        let dec = decoder.to_unicode(&mut units, &bytes[..enc.bytes_written], SubstitutionPolicy::Strict, true);
        assert_eq!(dec.result, ConversionResult::Completed);
        assert_eq!(String::from_utf16(&units[..dec.units_written]).unwrap(), "Hello");
    }

    #[test]
    fn unknown_encoding_name_is_an_error() {
        let reg = registry::initialize();
        let err = reg.for_name_or_err("not-a-real-encoding").unwrap_err();
        assert!(matches!(err, ConversionError::UnknownEncoding(_)));
    }
}
