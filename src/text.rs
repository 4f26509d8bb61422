// ✂️ Text Helpers - Punctuation normalization + edit distance
// Shared by the resolver, the action extractor and the reason synthesizer

// ============================================================================
// PUNCTUATION
// ============================================================================

/// Sentence punctuation that speech-to-text engines sprinkle into utterances.
/// ASCII and full-width CJK variants.
pub const SENTENCE_PUNCTUATION: [char; 7] = ['，', ',', '。', '？', '！', '?', '!'];

/// Check if a char is sentence punctuation
pub fn is_sentence_punctuation(c: char) -> bool {
    SENTENCE_PUNCTUATION.contains(&c)
}

/// Replace every sentence punctuation char with a single space
///
/// One char in, one char out: char offsets in the result line up with the input.
///
/// Example: "给萱萱加10分，因为她很棒！" → "给萱萱加10分 因为她很棒 "
pub fn normalize_punctuation(text: &str) -> String {
    text.chars()
        .map(|c| if is_sentence_punctuation(c) { ' ' } else { c })
        .collect()
}

/// Remove the first occurrence of `needle` from `haystack`
///
/// Empty needles leave the text untouched.
pub fn remove_first(haystack: &str, needle: &str) -> String {
    if needle.is_empty() {
        return haystack.to_string();
    }
    haystack.replacen(needle, "", 1)
}

/// `len` chars of `s` starting at char offset `start`
pub fn char_slice(s: &str, start: usize, len: usize) -> String {
    s.chars().skip(start).take(len).collect()
}

/// Number of chars (Unicode scalar values), which is what identifier lengths are measured in
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

// ============================================================================
// EDIT DISTANCE
// ============================================================================

/// Calculate Levenshtein distance between two char sequences
///
/// Levenshtein distance = minimum number of single-character edits
/// (insertions, deletions, substitutions) to change one string into another.
/// Works on chars, so "萱萱" vs "圈圈" is 2, not 6.
pub fn levenshtein_chars(a: &[char], b: &[char]) -> usize {
    let len1 = a.len();
    let len2 = b.len();

    if len1 == 0 {
        return len2;
    }
    if len2 == 0 {
        return len1;
    }

    // Two rolling rows instead of the full matrix
    let mut previous: Vec<usize> = (0..=len2).collect();
    let mut current = vec![0; len2 + 1];

    for i in 1..=len1 {
        current[0] = i;
        for j in 1..=len2 {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };

            current[j] = std::cmp::min(
                std::cmp::min(
                    previous[j] + 1,     // deletion
                    current[j - 1] + 1,  // insertion
                ),
                previous[j - 1] + cost,  // substitution
            );
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[len2]
}

/// Levenshtein distance between two strings
pub fn levenshtein_distance(s1: &str, s2: &str) -> usize {
    let a: Vec<char> = s1.chars().collect();
    let b: Vec<char> = s2.chars().collect();
    levenshtein_chars(&a, &b)
}

// ============================================================================
// TESTS
// ============================================================================
