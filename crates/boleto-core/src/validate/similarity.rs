//! Payer/recipient name comparison.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref PUNCTUATION: Regex = Regex::new(r"[^\w\s]").unwrap();
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}

fn fold_accent(c: char) -> char {
    match c {
        'Á' | 'À' | 'Ã' | 'Â' | 'Ä' => 'A',
        'É' | 'È' | 'Ê' | 'Ë' => 'E',
        'Í' | 'Ì' | 'Î' | 'Ï' => 'I',
        'Ó' | 'Ò' | 'Õ' | 'Ô' | 'Ö' => 'O',
        'Ú' | 'Ù' | 'Û' | 'Ü' => 'U',
        'Ç' => 'C',
        other => other,
    }
}

/// Normalize a name for comparison: uppercase, common Portuguese accents
/// folded, punctuation removed, whitespace collapsed.
pub fn normalize_name(name: &str) -> String {
    let folded: String = name.trim().to_uppercase().chars().map(fold_accent).collect();
    let stripped = PUNCTUATION.replace_all(&folded, "");
    WHITESPACE.replace_all(&stripped, " ").trim().to_string()
}

/// Similarity ratio in `[0, 1]`: twice the matched characters over the
/// total length, where matches are found by recursively taking the longest
/// common block (Ratcliff/Obershelp).
pub fn similarity_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }

    let matched = matched_chars(&a, &b, 0, a.len(), 0, b.len());
    2.0 * matched as f64 / total as f64
}

fn matched_chars(a: &[char], b: &[char], alo: usize, ahi: usize, blo: usize, bhi: usize) -> usize {
    let (i, j, k) = longest_match(a, b, alo, ahi, blo, bhi);
    if k == 0 {
        return 0;
    }

    let mut total = k;
    if alo < i && blo < j {
        total += matched_chars(a, b, alo, i, blo, j);
    }
    if i + k < ahi && j + k < bhi {
        total += matched_chars(a, b, i + k, ahi, j + k, bhi);
    }
    total
}

/// Longest common block in `a[alo..ahi]` and `b[blo..bhi]`.
///
/// Ties go to the block starting earliest in `a`, then earliest in `b`.
fn longest_match(
    a: &[char],
    b: &[char],
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let (mut best_i, mut best_j, mut best_k) = (alo, blo, 0);
    let mut prev = vec![0usize; b.len() + 1];

    for i in alo..ahi {
        let mut row = vec![0usize; b.len() + 1];
        for j in blo..bhi {
            if a[i] != b[j] {
                continue;
            }
            let k = prev[j] + 1;
            row[j + 1] = k;
            if k > best_k {
                best_i = i + 1 - k;
                best_j = j + 1 - k;
                best_k = k;
            }
        }
        prev = row;
    }

    (best_i, best_j, best_k)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_normalize_name() {
        assert_eq!(normalize_name("  Padaria São João, Ltda. "), "PADARIA SAO JOAO LTDA");
        assert_eq!(normalize_name("AÇOUGUE  BOI-GORDO"), "ACOUGUE BOIGORDO");
        assert_eq!(normalize_name("..."), "");
    }

    #[test]
    fn test_ratio_bounds() {
        assert_eq!(similarity_ratio("", ""), 1.0);
        assert_eq!(similarity_ratio("ABC", ""), 0.0);
        assert_eq!(similarity_ratio("ACME LTDA", "ACME LTDA"), 1.0);
        assert_eq!(similarity_ratio("ABC", "XYZ"), 0.0);
    }

    #[test]
    fn test_ratio_known_values() {
        // Longest block "BCD", then nothing left on either side that matches.
        assert_eq!(similarity_ratio("ABCD", "BCDA"), 0.75);
        assert_eq!(similarity_ratio("ABCD", "ABXD"), 0.75);
        let ratio = similarity_ratio("ACME COMERCIO LTDA", "ACME COMERCIO");
        assert!((ratio - 26.0 / 31.0).abs() < 1e-12);
    }
}
