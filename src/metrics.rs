/// Smallest elapsed time used in rate calculations, in seconds.
pub const MIN_ELAPSED_SECS: f64 = 0.01;

/// Levenshtein distance over Unicode scalar values with unit costs.
pub fn edit_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    // rolling rows of the (|a|+1) x (|b|+1) table
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            curr[j + 1] = if ca == cb {
                prev[j]
            } else {
                1 + prev[j].min(prev[j + 1]).min(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Similarity of `typed` to `reference` as a percentage in `[0, 100]`.
pub fn accuracy(reference: &str, typed: &str) -> f64 {
    let reference_len = reference.chars().count();
    if reference_len == 0 {
        return 100.0;
    }

    let max_len = reference_len.max(typed.chars().count()) as f64;
    let distance = edit_distance(reference, typed) as f64;

    ((max_len - distance) / max_len * 100.0).clamp(0.0, 100.0)
}

/// Number of whitespace separated words in `text`.
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

pub fn words_per_minute(text: &str, elapsed_secs: f64) -> u32 {
    per_minute(count_words(text), elapsed_secs)
}

pub fn sentences_per_minute(sentences_completed: usize, elapsed_secs: f64) -> u32 {
    per_minute(sentences_completed, elapsed_secs)
}

fn per_minute(count: usize, elapsed_secs: f64) -> u32 {
    let minutes = elapsed_secs.max(MIN_ELAPSED_SECS) / 60.0;
    // f64::round rounds half away from zero
    (count as f64 / minutes).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_edit_distance_identical() {
        assert_eq!(edit_distance("kitten", "kitten"), 0);
        assert_eq!(edit_distance("", ""), 0);
    }

    #[test]
    fn test_edit_distance_classic() {
        assert_eq!(edit_distance("kitten", "sitting"), 3);
        assert_eq!(edit_distance("flaw", "lawn"), 2);
        assert_eq!(edit_distance("cat", "bat"), 1);
    }

    #[test]
    fn test_edit_distance_against_empty() {
        assert_eq!(edit_distance("", "abc"), 3);
        assert_eq!(edit_distance("abcd", ""), 4);
    }

    #[test]
    fn test_edit_distance_counts_code_points() {
        assert_eq!(edit_distance("café", "cafe"), 1);
        assert_eq!(edit_distance("日本語", "日本"), 1);
    }

    #[test]
    fn test_accuracy_empty_reference() {
        assert_eq!(accuracy("", ""), 100.0);
        assert_eq!(accuracy("", "anything at all"), 100.0);
    }

    #[test]
    fn test_accuracy_exact_match() {
        assert_eq!(accuracy("The cat sat on the mat.", "The cat sat on the mat."), 100.0);
    }

    #[test]
    fn test_accuracy_single_substitution() {
        assert_abs_diff_eq!(accuracy("cat", "bat"), 200.0 / 3.0, epsilon = 1e-9);
    }

    #[test]
    fn test_accuracy_blank_typed() {
        assert_eq!(accuracy("hello", ""), 0.0);
    }

    #[test]
    fn test_accuracy_longer_typed_uses_max_len() {
        // 2 insertions over a max length of 5
        assert_abs_diff_eq!(accuracy("abc", "abcde"), 60.0, epsilon = 1e-9);
    }

    #[test]
    fn test_count_words() {
        assert_eq!(count_words(""), 0);
        assert_eq!(count_words("   \t "), 0);
        assert_eq!(count_words("one"), 1);
        assert_eq!(count_words("  one  two\tthree\n"), 3);
    }

    #[test]
    fn test_words_per_minute() {
        // 6 words in half a minute
        assert_eq!(words_per_minute("The cat sat on the mat.", 30.0), 12);
        assert_eq!(words_per_minute("", 30.0), 0);
    }

    #[test]
    fn test_words_per_minute_rounds_half_away_from_zero() {
        // 1 word over 24s = 2.5 wpm
        assert_eq!(words_per_minute("word", 24.0), 3);
    }

    #[test]
    fn test_rates_floor_elapsed() {
        assert_eq!(sentences_per_minute(1, 0.0), 6000);
        assert_eq!(words_per_minute("one", -3.0), 6000);
    }

    #[test]
    fn test_sentences_per_minute() {
        assert_eq!(sentences_per_minute(3, 60.0), 3);
        assert_eq!(sentences_per_minute(0, 10.0), 0);
        assert_eq!(sentences_per_minute(2, 90.0), 1);
    }
}
