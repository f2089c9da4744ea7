//! Confidence scoring primitives shared by the path and field matchers
//!
//! All scores are in `[0, 1]`. String similarity is a normalized
//! Levenshtein distance; path similarity compares `/`-separated segments
//! position by position with extra credit for aligned `{param}` placeholders.

/// Score for two identical path segments
pub const EXACT_SEGMENT_SCORE: f64 = 1.0;
/// Score for two path-parameter placeholders at the same position
pub const PARAMETER_SEGMENT_SCORE: f64 = 0.8;
/// Score for two segments whose names are similar
pub const SIMILAR_SEGMENT_SCORE: f64 = 0.6;
/// Minimum string similarity for two segments to count as similar (exclusive)
pub const SIMILAR_SEGMENT_THRESHOLD: f64 = 0.7;

/// Clamp a confidence value into `[0, 1]`
///
/// NaN collapses to `0.0`.
pub fn clamp_confidence(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Calculate the Levenshtein distance between two strings
///
/// Unit cost for insertion, deletion and substitution, counted in chars.
pub fn levenshtein_distance(s1: &str, s2: &str) -> usize {
    let target: Vec<char> = s2.chars().collect();
    if target.is_empty() {
        return s1.chars().count();
    }

    // Two rolling rows over the target: `previous` holds distances for the
    // source prefix one char shorter than `current`.
    let mut previous: Vec<usize> = (0..=target.len()).collect();
    let mut current = vec![0usize; target.len() + 1];

    for (i, source_char) in s1.chars().enumerate() {
        current[0] = i + 1;
        for (j, target_char) in target.iter().enumerate() {
            let substitution = previous[j] + usize::from(source_char != *target_char);
            let deletion = previous[j + 1] + 1;
            let insertion = current[j] + 1;
            current[j + 1] = substitution.min(deletion).min(insertion);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[target.len()]
}

/// Case-insensitive normalized similarity of two strings
///
/// Identical strings score `1.0`; an empty string against a non-empty one
/// scores `0.0`; otherwise `1 - distance / max_len`.
pub fn string_similarity(a: &str, b: &str) -> f64 {
    if a == b {
        return 1.0;
    }
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let a = a.to_lowercase();
    let b = b.to_lowercase();
    let max_len = a.chars().count().max(b.chars().count());
    let distance = levenshtein_distance(&a, &b);

    clamp_confidence(1.0 - distance as f64 / max_len as f64)
}

/// Whether a path segment is a `{param}` placeholder
pub fn is_path_parameter(segment: &str) -> bool {
    segment.len() >= 2 && segment.starts_with('{') && segment.ends_with('}')
}

fn segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

fn segment_score(a: &str, b: &str) -> f64 {
    if a == b {
        EXACT_SEGMENT_SCORE
    } else if is_path_parameter(a) && is_path_parameter(b) {
        PARAMETER_SEGMENT_SCORE
    } else if string_similarity(a, b) > SIMILAR_SEGMENT_THRESHOLD {
        SIMILAR_SEGMENT_SCORE
    } else {
        0.0
    }
}

/// Composite similarity of two path templates
///
/// Segments are compared by index over the longer path; a segment missing
/// on one side compares as the empty string. Two paths without segments
/// (e.g. both `/`) are identical.
pub fn path_similarity(p1: &str, p2: &str) -> f64 {
    let segments1 = segments(p1);
    let segments2 = segments(p2);
    let max_len = segments1.len().max(segments2.len());

    if max_len == 0 {
        return 1.0;
    }

    let total: f64 = (0..max_len)
        .map(|i| {
            let a = segments1.get(i).copied().unwrap_or("");
            let b = segments2.get(i).copied().unwrap_or("");
            segment_score(a, b)
        })
        .sum();

    clamp_confidence(total / max_len as f64)
}
