//! Token normalization and edit distance.

/// Lowercase a word and keep only ASCII letters and digits.
pub fn normalize_token(word: &str) -> String {
    word.to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect()
}

/// Split `text` on whitespace and normalize each piece, dropping pieces that
/// normalize to nothing. Order is preserved.
pub fn tokenize(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split_whitespace()
        .map(normalize_token)
        .filter(|t| !t.is_empty())
}

/// Key used to look a displayed word up in the notes book: word characters
/// (`[A-Za-z0-9_]`) only, casing kept.
pub fn clean_word_key(word: &str) -> String {
    word.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect()
}

/// Character-level Levenshtein distance with unit costs.
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();

    if a.is_empty() {
        return b.len();
    }
    if b.is_empty() {
        return a.len();
    }

    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0usize; b.len() + 1];

    for (i, ca) in a.iter().enumerate() {
        curr[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let substitution = prev[j] + usize::from(ca != cb);
            let deletion = prev[j + 1] + 1;
            let insertion = curr[j] + 1;
            curr[j + 1] = substitution.min(deletion).min(insertion);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Edit distance still counted as a match for a token of `length` characters.
pub fn allowed_tolerance(length: usize) -> usize {
    match length {
        0..=4 => 1,
        5..=7 => 2,
        _ => 3,
    }
}

/// Whether two normalized tokens match, exactly or within typo tolerance.
/// Tolerance is taken from the longer of the two.
pub fn tokens_match(expected: &str, actual: &str) -> bool {
    if expected == actual {
        return true;
    }
    let longest = expected.chars().count().max(actual.chars().count());
    levenshtein(expected, actual) <= allowed_tolerance(longest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_punctuation_and_case() {
        assert_eq!(normalize_token("Fox."), "fox");
        assert_eq!(normalize_token("don't"), "dont");
        assert_eq!(normalize_token("Café"), "caf");
        assert_eq!(normalize_token("--"), "");
    }

    #[test]
    fn tokenize_drops_empty_pieces() {
        let tokens: Vec<String> = tokenize("  The  quick -- brown\tFOX!\n").collect();
        assert_eq!(tokens, vec!["the", "quick", "brown", "fox"]);
        assert_eq!(tokenize("").count(), 0);
        assert_eq!(tokenize("... !!! ?").count(), 0);
    }

    #[test]
    fn clean_key_keeps_underscores() {
        assert_eq!(clean_word_key("snake_case,"), "snake_case");
        assert_eq!(clean_word_key("Fox."), "Fox");
    }

    #[test]
    fn levenshtein_known_values() {
        assert_eq!(levenshtein("", ""), 0);
        assert_eq!(levenshtein("abc", ""), 3);
        assert_eq!(levenshtein("", "ab"), 2);
        assert_eq!(levenshtein("kitten", "sitting"), 3);
        assert_eq!(levenshtein("qick", "quick"), 1);
        assert_eq!(levenshtein("flaw", "lawn"), 2);
        assert_eq!(levenshtein("same", "same"), 0);
    }

    #[test]
    fn levenshtein_is_symmetric() {
        assert_eq!(levenshtein("beta", "gamma"), levenshtein("gamma", "beta"));
        assert_eq!(levenshtein("sunday", "saturday"), 3);
        assert_eq!(levenshtein("saturday", "sunday"), 3);
    }

    #[test]
    fn tolerance_boundaries() {
        assert_eq!(allowed_tolerance(0), 1);
        assert_eq!(allowed_tolerance(4), 1);
        assert_eq!(allowed_tolerance(5), 2);
        assert_eq!(allowed_tolerance(7), 2);
        assert_eq!(allowed_tolerance(8), 3);
        assert_eq!(allowed_tolerance(40), 3);
    }

    #[test]
    fn tokens_match_uses_longer_length() {
        // length 4: distance 1 ok, 2 not
        assert!(tokens_match("bird", "bard"));
        assert!(!tokens_match("bird", "bxxd"));
        // length 7: distance 2 ok, 3 not
        assert!(tokens_match("morning", "mornxxg"));
        assert!(!tokens_match("morning", "morxxxg"));
        // length 8: distance 3 ok, 4 not
        assert!(tokens_match("elephant", "elexxxnt"));
        assert!(!tokens_match("elephant", "elxxxxnt"));
        // "cat" vs "cats": longer is 4, distance 1
        assert!(tokens_match("cat", "cats"));
    }
}
