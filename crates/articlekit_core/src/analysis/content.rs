//! Boundary-aware truncation and word-frequency ranking.
//!
//! # Invariants
//! - Lengths and cut positions are counted in characters, not bytes.
//! - Truncation never cuts inside a word; it cuts at a space or newline.
//! - Word ranking is by count, ties broken by first occurrence.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

/// A word is a maximal run of lowercase Latin letters; anything else separates.
static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-z]+").expect("valid word regex"));

/// Ranked word counts, most frequent first.
pub type WordCounts = IndexMap<String, usize>;

/// Returns `content` cut back to the last space or newline within
/// `n_characters + 1` characters.
///
/// Content no longer than `n_characters` is returned unchanged. When the
/// window holds no separator at all the result is empty.
pub fn short_introduction(content: &str, n_characters: usize) -> String {
    let window_end = match content.char_indices().nth(n_characters) {
        // Content has at most `n_characters` characters.
        None => return content.to_string(),
        Some((start, ch)) => start + ch.len_utf8(),
    };

    let window = &content[..window_end];
    // `None` orders below every `Some(index)`, so a missing separator loses.
    let cut = window.rfind(' ').max(window.rfind('\n'));
    match cut {
        Some(index) => window[..index].to_string(),
        None => String::new(),
    }
}

/// Returns the `n_words` most common words of `content`, case-insensitive.
///
/// Equal counts keep the order in which the words first appear.
pub fn most_common_words(content: &str, n_words: usize) -> WordCounts {
    if n_words == 0 {
        return WordCounts::new();
    }

    let lowered = content.to_lowercase();
    let mut positions: HashMap<&str, usize> = HashMap::new();
    let mut tallies: Vec<(&str, usize)> = Vec::new();
    for token in WORD_RE.find_iter(&lowered).map(|m| m.as_str()) {
        match positions.get(token) {
            Some(&slot) => tallies[slot].1 += 1,
            None => {
                positions.insert(token, tallies.len());
                tallies.push((token, 1));
            }
        }
    }

    // Stable sort keeps first-occurrence order among equal counts.
    tallies.sort_by(|left, right| right.1.cmp(&left.1));
    tallies
        .into_iter()
        .take(n_words)
        .map(|(word, count)| (word.to_string(), count))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{most_common_words, short_introduction};

    const EMPEROR: &str = "'But he has nothing at all on!' at last cried out all the people.";

    #[test]
    fn short_introduction_cuts_at_last_space() {
        assert_eq!(short_introduction(EMPEROR, 20), "'But he has nothing");
    }

    #[test]
    fn short_introduction_prefers_later_newline() {
        assert_eq!(
            short_introduction("see anything.\nHis whole", 16),
            "see anything."
        );
    }

    #[test]
    fn short_introduction_keeps_short_content() {
        assert_eq!(short_introduction("tiny", 4), "tiny");
        assert_eq!(short_introduction("tiny", 40), "tiny");
        assert_eq!(short_introduction("", 0), "");
    }

    #[test]
    fn short_introduction_truncates_one_character_over() {
        assert_eq!(short_introduction("ab cd", 4), "ab");
    }

    #[test]
    fn short_introduction_without_separator_is_empty() {
        assert_eq!(short_introduction("Magnificent", 5), "");
    }

    #[test]
    fn short_introduction_counts_characters_not_bytes() {
        assert_eq!(short_introduction("café au lait", 7), "café au");
        assert_eq!(short_introduction("naïve ok", 8), "naïve ok");
    }

    #[test]
    fn most_common_words_breaks_ties_by_first_occurrence() {
        let counts = most_common_words(EMPEROR, 5);
        let ranked: Vec<(&str, usize)> = counts.iter().map(|(w, c)| (w.as_str(), *c)).collect();
        assert_eq!(
            ranked,
            vec![("at", 2), ("all", 2), ("but", 1), ("he", 1), ("has", 1)]
        );
    }

    #[test]
    fn most_common_words_splits_on_non_letters() {
        let counts = most_common_words("'I know I'm not stupid,'", 3);
        let ranked: Vec<(&str, usize)> = counts.iter().map(|(w, c)| (w.as_str(), *c)).collect();
        assert_eq!(ranked, vec![("i", 2), ("know", 1), ("m", 1)]);
    }

    #[test]
    fn most_common_words_handles_zero_and_oversized_limits() {
        assert!(most_common_words("Am I a fool?", 0).is_empty());
        assert_eq!(most_common_words("All the town", 9372).len(), 3);
        assert!(most_common_words("123 !!! ---", 4).is_empty());
    }
}
