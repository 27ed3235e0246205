use std::collections::HashSet;

use unicode_normalization::UnicodeNormalization;

/// NFKC-fold, lowercase and collapse runs of non-alphanumeric characters to
/// single spaces. Keeps Arabic and other non-ASCII letters intact.
pub fn normalize_text(input: &str) -> String {
    let folded: String = input.nfkc().collect::<String>().to_lowercase();

    let mut out = String::with_capacity(folded.len());
    let mut last_was_space = true;
    for ch in folded.chars() {
        if ch.is_alphanumeric() || ch == '+' || ch == '#' {
            out.push(ch);
            last_was_space = false;
        } else if !last_was_space {
            out.push(' ');
            last_was_space = true;
        }
    }

    out.trim_end().to_string()
}

pub fn tokens(input: &str) -> Vec<String> {
    normalize_text(input)
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

fn token_set(input: &str) -> HashSet<String> {
    tokens(input).into_iter().collect()
}

/// Split a comma-separated free-text list into trimmed, non-empty terms.
pub fn split_terms(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|term| !term.is_empty())
        .map(str::to_string)
        .collect()
}

/// Fraction of a term's tokens that appear in the text. "software engineer"
/// against "senior software engineer" covers 2/2 and scores 1.0.
fn term_coverage(term: &str, text_tokens: &HashSet<String>) -> f64 {
    let term_tokens = token_set(term);
    if term_tokens.is_empty() {
        return 0.0;
    }

    let matched = term_tokens
        .iter()
        .filter(|token| text_tokens.contains(*token))
        .count();
    matched as f64 / term_tokens.len() as f64
}

/// Best token coverage of any comma-separated term against the text.
/// Empty terms or empty text score 0.0.
pub fn best_term_coverage(terms_csv: &str, text: &str) -> f64 {
    let text_tokens = token_set(text);
    if text_tokens.is_empty() {
        return 0.0;
    }

    split_terms(terms_csv)
        .iter()
        .map(|term| term_coverage(term, &text_tokens))
        .fold(0.0, f64::max)
}

/// Fraction of the comma-separated terms mentioned in the text. Single-word
/// terms match on token membership; multi-word terms match as a normalized
/// substring so "machine learning" does not match a stray "learning".
pub fn mention_ratio(terms_csv: &str, text: &str) -> f64 {
    let terms = split_terms(terms_csv);
    if terms.is_empty() {
        return 0.0;
    }

    let normalized_text = normalize_text(text);
    if normalized_text.is_empty() {
        return 0.0;
    }
    let text_tokens: HashSet<String> = normalized_text
        .split_whitespace()
        .map(str::to_string)
        .collect();

    let mentioned = terms
        .iter()
        .filter(|term| {
            let normalized_term = normalize_text(term);
            if normalized_term.is_empty() {
                return false;
            }
            if normalized_term.contains(' ') {
                normalized_text.contains(&normalized_term)
            } else {
                text_tokens.contains(&normalized_term)
            }
        })
        .count();

    mentioned as f64 / terms.len() as f64
}

/// Jaccard overlap of the two token sets, used as a weak fallback signal.
pub fn token_overlap(a: &str, b: &str) -> f64 {
    let set_a = token_set(a);
    let set_b = token_set(b);
    if set_a.is_empty() || set_b.is_empty() {
        return 0.0;
    }

    let shared = set_a.intersection(&set_b).count();
    let union = set_a.union(&set_b).count();
    shared as f64 / union as f64
}
