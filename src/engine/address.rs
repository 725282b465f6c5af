//! Free-text address canonicalization and street comparison.

const STOP_WORDS: [&str; 3] = ["house", "hse", "number"];
const NUMBER_PREFIX: &str = "no.";

/// Lower-case, drop house/number filler words and collapse whitespace.
///
/// Idempotent: normalizing an already normalized address returns it unchanged.
pub fn normalize_address(address: &str) -> String {
    let lowered = address.to_lowercase();
    let mut words = Vec::new();

    for token in lowered.split_whitespace() {
        // "no.7" and "no." both lose the prefix
        let mut token = token;
        while let Some(rest) = token.strip_prefix(NUMBER_PREFIX) {
            token = rest;
        }

        // keep a trailing comma when the word in front of it is dropped
        let word = token.trim_end_matches(',');
        let commas = &token[word.len()..];
        if STOP_WORDS.contains(&word) {
            if !commas.is_empty() {
                words.push(commas);
            }
            continue;
        }
        if !token.is_empty() {
            words.push(token);
        }
    }

    words.join(" ")
}

/// Street part of a normalized address: the text before the first comma,
/// without a leading house number.
pub fn street_name(normalized: &str) -> &str {
    let head = normalized.split(',').next().unwrap_or_default().trim();
    head.trim_start_matches(|c: char| c.is_ascii_digit()).trim()
}

/// Canonical street key of a raw address.
pub fn street_key(address: &str) -> String {
    street_name(&normalize_address(address)).to_string()
}

/// Fuzzy street comparison: equal streets, or one contained in the other.
///
/// Not transitive: "freedom way" matches both "freedom way east" and
/// "freedom way west", which do not match each other. An address without a
/// street never matches.
pub fn are_similar(a: &str, b: &str) -> bool {
    let a = street_key(a);
    let b = street_key(b);
    if a.is_empty() || b.is_empty() {
        return false;
    }
    a == b || a.contains(b.as_str()) || b.contains(a.as_str())
}

/// Decides whether two delivery addresses belong to the same street.
pub trait AddressMatcher {
    fn is_match(&self, a: &str, b: &str) -> bool;
}

/// The substring heuristic of [`are_similar`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SubstringStreetMatcher;

impl AddressMatcher for SubstringStreetMatcher {
    fn is_match(&self, a: &str, b: &str) -> bool {
        are_similar(a, b)
    }
}

/// Exact equality of [`street_key`]s, a true equivalence relation.
#[derive(Debug, Clone, Copy, Default)]
pub struct StreetKeyMatcher;

impl AddressMatcher for StreetKeyMatcher {
    fn is_match(&self, a: &str, b: &str) -> bool {
        let a = street_key(a);
        !a.is_empty() && a == street_key(b)
    }
}
