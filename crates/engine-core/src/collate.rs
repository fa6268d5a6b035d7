//! Ordering of key values, approximating the locale-aware comparison the
//! indexes are sorted with: accents folded, case ignored, then raw order as
//! a tie breaker.

use deunicode::deunicode;
use std::cmp::Ordering;

pub fn compare(a: &str, b: &str) -> Ordering {
    fold(a).cmp(&fold(b)).then_with(|| a.cmp(b))
}

fn fold(s: &str) -> String {
    deunicode(s).to_lowercase()
}

/// Position of a key's leading letter in the alphabet, `0..=25`.
///
/// Only the last non-empty path segment counts, so `/authors/smith` ranks
/// as `s`. Keys that don't start with an ASCII letter rank 0.
pub fn alphabet_rank(key: &str) -> u64 {
    let segment = key.split('/').rfind(|s| !s.is_empty()).unwrap_or("");
    match fold(segment).bytes().next() {
        Some(c @ b'a'..=b'z') => u64::from(c - b'a'),
        _ => 0,
    }
}
