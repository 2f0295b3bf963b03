//! Template model, placeholder extraction and substitution.
//!
//! Placeholders are delimited `${name}` with no nesting; extraction
//! deduplicates and sorts so every caller sees the same deterministic order.
//! Substitution is a single left-to-right pass that inserts bound values
//! verbatim and never re-scans inserted text, so a value may contain `/`,
//! `&`, `$` or even `${...}` without corrupting the output.

pub mod collect;
pub mod fetch;
pub mod session;

use std::collections::{BTreeMap, BTreeSet};

/// A fetched template. `raw_text` is never mutated after fetch; substitution
/// builds a new string.
#[derive(Debug, Clone)]
pub struct Template {
    pub id: String,
    pub source: String,
    pub raw_text: String,
}

/// Extract the unique placeholder names from `text`, sorted lexicographically.
///
/// A name is the maximal run of non-`}` characters between `${` and `}`.
/// Unterminated `${` is literal text and `${}` is ignored.
pub fn extract_placeholders(text: &str) -> BTreeSet<String> {
    let mut names = BTreeSet::new();
    let mut rest = text;
    while let Some(start) = rest.find("${") {
        let after = &rest[start + 2..];
        match after.find('}') {
            Some(end) => {
                let name = &after[..end];
                if !name.is_empty() {
                    names.insert(name.to_string());
                }
                rest = &after[end + 1..];
            }
            None => break,
        }
    }
    names
}

/// Replace every `${name}` occurrence with its bound value in one pass.
///
/// Completeness of `bindings` against the extracted placeholder set is the
/// caller's precondition; unbound placeholders pass through unchanged.
pub fn substitute(text: &str, bindings: &BTreeMap<String, String>) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find('}') {
            Some(end) => {
                let name = &after[..end];
                match bindings.get(name) {
                    Some(value) => out.push_str(value),
                    None => out.push_str(&rest[start..start + 2 + end + 1]),
                }
                rest = &after[end + 1..];
            }
            None => {
                // Unterminated delimiter: the remainder is literal.
                out.push_str(&rest[start..]);
                rest = "";
                break;
            }
        }
    }
    out.push_str(rest);
    out
}
