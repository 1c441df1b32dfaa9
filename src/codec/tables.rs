// This is a part of ascension-core.
// See README.md and LICENSE.txt for details.

//! Code point <-> JIS/GB2312/KS C 5601/ISO-8859 table modules (spec §3, §9:
//! "Shared mutable tables" — kept as static, read-only lookups, no per-call
//! allocation).

pub mod gb2312;
pub mod iso8859;
pub mod jis0201;
pub mod jis0208;
pub mod jis0212;
pub mod jis0213;
pub mod ksc5601;
