//! Text normalization and token matching for catalog search
//!
//! The matcher is index-free: the store walks the item/place/vehicle join
//! and this module decides, per candidate, whether every query token is a
//! substring of the combined normalized names.

/// Normalize text for matching: lower-case, fold `-`/`_` to spaces, drop
/// all other punctuation, collapse whitespace runs, trim the ends.
///
/// "Fire-Hose  Nozzle!" and "fire hose nozzle" normalize identically.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;

    for ch in text.chars() {
        let ch = match ch {
            '-' | '_' => ' ',
            other => other,
        };
        if ch.is_whitespace() {
            pending_space = true;
            continue;
        }
        if !ch.is_alphanumeric() {
            continue;
        }
        if pending_space && !out.is_empty() {
            out.push(' ');
        }
        pending_space = false;
        for lower in ch.to_lowercase() {
            out.push(lower);
        }
    }

    out
}

/// Split a raw query into normalized tokens. A blank query yields no
/// tokens, and a query with no tokens matches nothing.
pub fn tokens(query: &str) -> Vec<String> {
    normalize(query)
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// AND-of-substrings: every token must occur somewhere in the haystack.
/// Tokens are not anchored to word boundaries, so "fir" matches "fire".
pub fn matches_all(tokens: &[String], haystack: &str) -> bool {
    !tokens.is_empty() && tokens.iter().all(|token| haystack.contains(token.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_folds_hyphens_and_case() {
        insta::assert_snapshot!(normalize("Fire-Hose  Nozzle!"), @"fire hose nozzle");
        insta::assert_snapshot!(normalize("  Rear_Locker\t(left) "), @"rear locker left");
    }

    #[test]
    fn test_normalize_drops_other_punctuation_without_spacing() {
        assert_eq!(normalize("O'Neill"), "oneill");
        assert_eq!(normalize("4x4 / off-road"), "4x4 off road");
    }

    #[test]
    fn test_blank_query_has_no_tokens() {
        assert!(tokens("").is_empty());
        assert!(tokens("   \t ").is_empty());
        assert!(tokens("!!!").is_empty());
    }

    #[test]
    fn test_matches_all_requires_every_token() {
        let hay = format!(
            "{} {} {}",
            normalize("Fire-Hose Nozzle"),
            normalize("Rear Locker"),
            normalize("Engine 7")
        );
        assert!(matches_all(&tokens("fire hose"), &hay));
        assert!(matches_all(&tokens("hose nozzle"), &hay));
        assert!(matches_all(&tokens("fir"), &hay));
        assert!(!matches_all(&tokens("hose truck"), &hay));
        assert!(!matches_all(&tokens(""), &hay));
    }
}
