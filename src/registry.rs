// This is a part of ascension-core.
// See README.md and LICENSE.txt for details.

//! The Codec Registry (spec §4.1, §6, §9).
//!
//! The teacher keeps a fixed, closed set of encodings reachable only through
//! `encoding::all::*` static items or `label::encoding_from_whatwg_label`'s
//! giant `match`. spec.md §4.1 instead wants an explicit, *mutable*,
//! process-wide registry (`register_factory`, idempotent by name) — and §9's
//! Design Notes explicitly say to replace the teacher's "static installer at
//! module-load time" with explicit `initialize()`/`teardown()`. We do both:
//! `label.rs` keeps the teacher's alias-matching shape (grounded there) to
//! seed the registry's default aliases, while `CodecRegistry` itself is a
//! `HashMap` behind a `OnceLock<Mutex<_>>` rather than a static match.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};

use crate::error::ConversionError;
use crate::types::{Decoder, Encoder};

/// Numeric identifier assigned by IANA to a character encoding (spec
/// Glossary: "MIB enum").
pub type Mib = u32;

/// Immutable metadata plus factory functions for one registered encoding
/// (spec §3: "A named, registered codec").
pub struct EncodingFactory {
    pub canonical_name: &'static str,
    pub aliases: &'static [&'static str],
    pub mib: Mib,
    pub title: &'static str,
    pub max_bytes_per_char: usize,
    /// Fixed at registration time (spec §4.1): `0x3F` '?' for the JIS family.
    pub substitution_byte: u8,
    pub make_encoder: fn() -> Box<dyn Encoder>,
    pub make_decoder: fn() -> Box<dyn Decoder>,
}

impl EncodingFactory {
    pub fn new_encoder(&self) -> Box<dyn Encoder> {
        (self.make_encoder)()
    }

    pub fn new_decoder(&self) -> Box<dyn Decoder> {
        (self.make_decoder)()
    }
}

/// The process-wide codec registry (spec §4.1, §5, §9).
///
/// Registration is expected to complete (via [`initialize`]) before
/// concurrent lookups begin; after that the factory map is read far more
/// often than written, so lookups clone a cheap `Arc` rather than hold the
/// registration lock.
#[derive(Default)]
pub struct CodecRegistry {
    by_name: Mutex<HashMap<String, Arc<EncodingFactory>>>,
    by_mib: Mutex<HashMap<Mib, Arc<EncodingFactory>>>,
}

impl CodecRegistry {
    fn new() -> Self {
        CodecRegistry::default()
    }

    /// Registers a factory. Idempotent by canonical name: re-registering
    /// the same canonical name replaces the previous factory rather than
    /// erroring or duplicating (spec §4.1: "idempotent by canonical name").
    pub fn register_factory(&self, factory: EncodingFactory) {
        let canonical = factory.canonical_name;
        let mib = factory.mib;
        let arc = Arc::new(factory);

        let mut by_name = self.by_name.lock().unwrap();
        for alias in std::iter::once(canonical).chain(arc.aliases.iter().copied()) {
            by_name.insert(normalize_label(alias), arc.clone());
        }
        drop(by_name);

        self.by_mib.lock().unwrap().insert(mib, arc);
        log::debug!("registered codec '{}' (MIB {})", canonical, mib);
    }

    /// Case-insensitive, alias-aware lookup by name (spec §4.1).
    pub fn for_name(&self, name: &str) -> Option<Arc<EncodingFactory>> {
        self.by_name.lock().unwrap().get(&normalize_label(name)).cloned()
    }

    /// Lookup by IANA MIB enum (spec §4.1).
    pub fn for_mib(&self, mib: Mib) -> Option<Arc<EncodingFactory>> {
        self.by_mib.lock().unwrap().get(&mib).cloned()
    }

    pub fn for_name_or_err(&self, name: &str) -> Result<Arc<EncodingFactory>, ConversionError> {
        self.for_name(name)
            .ok_or_else(|| ConversionError::UnknownEncoding(name.to_string()))
    }

    /// Drops every registered factory. `std::sync::OnceLock` cannot itself
    /// be reset, so this empties the maps in place rather than un-
    /// initializing the process-wide registry; a subsequent `for_name`
    /// simply finds nothing until something re-registers.
    fn clear(&self) {
        self.by_name.lock().unwrap().clear();
        self.by_mib.lock().unwrap().clear();
    }
}

/// WHATWG-style label normalization (spec §4.1: "case-insensitive"), same
/// trim-and-lowercase shape as the teacher's
/// `label.trim_chars(...).to_ascii_lower()`.
fn normalize_label(label: &str) -> String {
    label
        .trim_matches(|c: char| matches!(c, ' ' | '\n' | '\r' | '\t' | '\x0C'))
        .to_ascii_lowercase()
}

static REGISTRY: OnceLock<CodecRegistry> = OnceLock::new();

/// Process-scope, one-time initialization (spec §9: replaces the teacher's
/// static-constructor-ordering installer). Safe to call more than once;
/// only the first call populates the registry.
pub fn initialize() -> &'static CodecRegistry {
    REGISTRY.get_or_init(|| {
        let registry = CodecRegistry::new();
        crate::codec::register_builtin_encodings(&registry);
        registry
    })
}

/// Returns the registry, panicking if [`initialize`] was never called.
/// Most callers should go through [`initialize`] instead; this is for code
/// that is certain setup already happened (e.g. deep inside the search
/// engine, which never constructs encodings itself).
pub fn registry() -> &'static CodecRegistry {
    REGISTRY.get().expect("codec registry not initialized; call registry::initialize() first")
}

/// Empties the process-wide registry's factory maps (spec §9's "explicit
/// `initialize`/`teardown`" pairing; see [`CodecRegistry::clear`] for why
/// this cannot literally un-initialize the backing `OnceLock`). A no-op if
/// [`initialize`] was never called.
pub fn teardown() {
    if let Some(registry) = REGISTRY.get() {
        registry.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_normalization_trims_and_lowercases() {
        assert_eq!(normalize_label(" Shift_JIS \r\n"), "shift_jis");
        assert_eq!(normalize_label("EUC-JP"), "euc-jp");
    }

    #[test]
    fn lookup_by_name_and_alias_and_mib() {
        let reg = initialize();
        let by_canonical = reg.for_name("Shift_JIS").expect("Shift_JIS registered");
        let by_alias = reg.for_name("ms_kanji").expect("MS_Kanji alias registered");
        assert_eq!(by_canonical.canonical_name, by_alias.canonical_name);
        let by_mib = reg.for_mib(by_canonical.mib).expect("mib lookup");
        assert_eq!(by_mib.canonical_name, "Shift_JIS");
    }

    #[test]
    fn unknown_name_is_none() {
        let reg = initialize();
        assert!(reg.for_name("definitely-not-an-encoding").is_none());
    }
}
