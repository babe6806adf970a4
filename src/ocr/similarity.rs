use unicode_normalization::UnicodeNormalization;

/// Normalized edit-distance similarity in `[0, 1]`.
///
/// Both sides are NFKC-normalized (full-width/half-width forms fold
/// together), stripped of whitespace and lower-cased first. Two empty
/// strings are identical.
pub fn text_similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = normalize(a).chars().collect();
    let b: Vec<char> = normalize(b).chars().collect();

    let max_len = a.len().max(b.len());
    if max_len == 0 {
        return 1.0;
    }

    let dist = levenshtein(&a, &b) as f64;
    (1.0 - dist / max_len as f64).max(0.0)
}

pub fn normalize(s: &str) -> String {
    let mut normalized: String = s.nfkc().collect();
    normalized.retain(|c| !c.is_whitespace());
    normalized.to_lowercase()
}

fn levenshtein(a: &[char], b: &[char]) -> usize {
    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr: Vec<usize> = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let cost = usize::from(ca != cb);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}
