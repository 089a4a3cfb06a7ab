//! AMQP topic-exchange routing rules.
//!
//! Routing keys and binding patterns are dot-separated words. In a pattern,
//! `*` stands for exactly one word and `#` for zero or more words.

/// Whether `routing_key` is routed by a binding with `pattern`.
pub fn topic_matches(pattern: &str, routing_key: &str) -> bool {
    let pattern: Vec<&str> = pattern.split('.').collect();
    let key: Vec<&str> = routing_key.split('.').collect();
    match_words(&pattern, &key)
}

fn match_words(pattern: &[&str], key: &[&str]) -> bool {
    match pattern.split_first() {
        None => key.is_empty(),
        Some((&"#", rest)) => (0..=key.len()).any(|skip| match_words(rest, &key[skip..])),
        Some((&"*", rest)) => !key.is_empty() && match_words(rest, &key[1..]),
        Some((word, rest)) => key.first() == Some(word) && match_words(rest, &key[1..]),
    }
}

/// A binding pattern is valid when it has no empty words and wildcards only
/// appear as whole words.
pub fn is_valid_pattern(pattern: &str) -> bool {
    !pattern.is_empty()
        && pattern.split('.').all(|word| {
            !word.is_empty()
                && (word == "*" || word == "#" || !word.contains(['*', '#']))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match() {
        assert!(topic_matches("card.abc", "card.abc"));
        assert!(!topic_matches("card.abc", "card.abd"));
        assert!(!topic_matches("card.abc", "card.abc.x"));
    }

    #[test]
    fn test_star_matches_exactly_one_word() {
        assert!(topic_matches("card.*", "card.0d5a3f4e-8a2b-4c1d-9e6f-7a8b9c0d1e2f"));
        assert!(!topic_matches("card.*", "card"));
        assert!(!topic_matches("card.*", "card.a.b"));
        assert!(topic_matches("*.a", "card.a"));
    }

    #[test]
    fn test_hash_matches_zero_or_more_words() {
        assert!(topic_matches("card.#", "card"));
        assert!(topic_matches("card.#", "card.a"));
        assert!(topic_matches("card.#", "card.a.b.c"));
        assert!(!topic_matches("card.#", "photo.a"));
        assert!(topic_matches("#", "anything.at.all"));
        assert!(topic_matches("#.b", "a.b"));
        assert!(topic_matches("a.#.c", "a.c"));
        assert!(topic_matches("a.#.c", "a.x.y.c"));
        assert!(!topic_matches("a.#.c", "a.x.y"));
    }

    #[test]
    fn test_pattern_validation() {
        assert!(is_valid_pattern("card.#"));
        assert!(is_valid_pattern("card.*"));
        assert!(is_valid_pattern("card"));
        assert!(!is_valid_pattern(""));
        assert!(!is_valid_pattern("card..x"));
        assert!(!is_valid_pattern("card.#x"));
        assert!(!is_valid_pattern("car*"));
    }
}
