/*!
 * Literal name substitution applied to source text before translation.
 */

use super::NamePair;

/// Replace every occurrence of `needle` in `haystack` with `replacement`.
///
/// Plain substring matching: no word boundaries, no pattern syntax. An empty
/// needle leaves the text untouched.
pub fn replace_literal(haystack: &str, needle: &str, replacement: &str) -> String {
    if needle.is_empty() {
        return haystack.to_string();
    }
    haystack.replace(needle, replacement)
}

/// Apply `pairs` to `text`, longest `original` first.
///
/// Each pair is applied to the output of the previous one, so a shorter name can
/// still match inside an earlier replacement. Pairs with equal `original` length
/// keep their relative order, which preserves local-over-global precedence when
/// `pairs` is the effective glossary.
pub fn substitute(text: &str, pairs: &[NamePair]) -> String {
    let mut ordered: Vec<&NamePair> = pairs.iter().collect();
    ordered.sort_by(|a, b| b.original.chars().count().cmp(&a.original.chars().count()));

    ordered.into_iter().fold(text.to_string(), |acc, pair| {
        replace_literal(&acc, &pair.original, &pair.translated)
    })
}
