//! Uniqueness scoring with Jaccard similarity over word shingles.

use std::collections::HashSet;

/// Words per shingle.
pub const SHINGLE_SIZE: usize = 5;

/// Builds the set of contiguous `n`-word shingles of `text`.
///
/// Text is lowercased and punctuation becomes whitespace. A text with at
/// least one word but fewer than `n` yields a single shingle of all its words,
/// so any non-empty text is fully similar to itself.
pub fn shingles(text: &str, n: usize) -> HashSet<String> {
    let normalized: String = text
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { ' ' })
        .collect();
    let words: Vec<&str> = normalized.split_whitespace().collect();

    if words.is_empty() {
        return HashSet::new();
    }
    if words.len() < n {
        return HashSet::from([words.join(" ")]);
    }

    words.windows(n).map(|window| window.join(" ")).collect()
}

fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    if intersection == 0 {
        return 0.0;
    }
    let union = a.len() + b.len() - intersection;
    intersection as f64 / union as f64
}

/// Jaccard similarity of the two texts' shingle sets, in `[0, 1]`.
pub fn compute_similarity(text1: &str, text2: &str) -> f64 {
    jaccard(&shingles(text1, SHINGLE_SIZE), &shingles(text2, SHINGLE_SIZE))
}

/// `1 - max(similarity)` against every existing text; `1.0` for an empty corpus.
pub fn calculate_uniqueness_score<S: AsRef<str>>(draft_text: &str, existing_texts: &[S]) -> f64 {
    if existing_texts.is_empty() {
        return 1.0;
    }

    let draft = shingles(draft_text, SHINGLE_SIZE);
    let max_similarity = existing_texts
        .iter()
        .map(|existing| jaccard(&draft, &shingles(existing.as_ref(), SHINGLE_SIZE)))
        .fold(0.0_f64, f64::max);

    (1.0 - max_similarity).clamp(0.0, 1.0)
}
