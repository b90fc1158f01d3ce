//! Term-frequency keyword derivation for text fragments
//!
//! Deterministic and pure: the same text and `top_n` always produce the same
//! ordered list. No external model involved.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// Characters stripped from both ends of a token before counting.
const EDGE_PUNCTUATION: &[char] = &[
    '.', ',', '!', '?', '(', ')', '[', ']', '{', '}', '"', '\'',
];

/// Tokens of this many characters or fewer never count as keywords.
const MAX_IGNORED_TOKEN_CHARS: usize = 3;

/// Derive up to `top_n` keywords from `text`, ranked by descending term
/// frequency. Ties keep first-occurrence order (stable sort).
pub fn extract_keywords(text: &str, top_n: usize) -> Vec<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut order: Vec<String> = Vec::new();

    for token in text.split_whitespace() {
        let lowered = token.to_lowercase();
        let word = lowered.trim_matches(|c| EDGE_PUNCTUATION.contains(&c));
        if word.chars().count() <= MAX_IGNORED_TOKEN_CHARS {
            continue;
        }
        match counts.entry(word.to_string()) {
            Entry::Occupied(mut entry) => *entry.get_mut() += 1,
            Entry::Vacant(entry) => {
                order.push(word.to_string());
                entry.insert(1);
            }
        }
    }

    // `order` preserves first occurrence; a stable sort on count keeps that
    // order among ties.
    let mut ranked: Vec<(String, usize)> = order
        .into_iter()
        .map(|word| {
            let count = counts[&word];
            (word, count)
        })
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(top_n);

    ranked.into_iter().map(|(word, _)| word).collect()
}
