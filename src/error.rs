// This is a part of ascension-core.
// See README.md and LICENSE.txt for details.

//! Structured error types for the codec and search engines.
//!
//! The teacher crate (`rust-encoding`) reports codec failures as a bare
//! `CodecError { upto, cause: Cow<'static, str> }`. We keep that same
//! processed/unprocessed/problem vocabulary (see `types::ConversionResult`)
//! but give the *exceptional* paths — the ones that are not routine control
//! flow a caller branches on — a real `std::error::Error` type instead of a
//! string, using `thiserror`.

use thiserror::Error;

/// Errors that can escape the batch-level `Encoding` convenience API.
///
/// The low-level `Encoder`/`Decoder` contract (§4.1) never returns this: it
/// returns a `ConversionResult` that the caller inspects and resumes from.
/// This type exists for the handful of places conversion is genuinely
/// terminal from the caller's point of view (e.g. `Encoding::encode`/
/// `decode` convenience wrappers that don't want to hand back a half-filled
/// buffer).
#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("unmappable character at input offset {offset}")]
    UnmappableCharacter { offset: usize },
    #[error("malformed byte sequence at input offset {offset}")]
    MalformedInput { offset: usize },
    #[error("unknown encoding name or MIB: {0}")]
    UnknownEncoding(String),
}

/// Errors surfaced by the search engine's batch boundary (§7).
///
/// `Bad regex` in interactive mode is *not* represented here: per spec.md
/// §4.8/§7 it is delivered to the `IncrementalSearcher`'s callback as a
/// non-fatal event, not propagated as a `Result`.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("pattern failed to compile: {0}")]
    BadRegex(String),
    #[error("pattern compiled but is too complex to execute safely")]
    ComplexRegex,
    #[error("document rejected the edit (read-only)")]
    ReadOnlyDocument,
    #[error("document revision changed out from under the search")]
    RevisionMismatch,
}
