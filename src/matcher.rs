//! Approximate name matching for cross-provider identity resolution.
//!
//! Matching is bidirectional containment over normalized strings, so a
//! partial query ("Mahomes") finds "Patrick Mahomes" and an over-verbose
//! query still lands. Multi-match ambiguity is accepted; callers take the
//! first match in dataset order.

/// Trim and lowercase for comparison
pub fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Bidirectional containment match. An empty query matches every candidate;
/// callers must reject empty queries before invoking this.
pub fn matches(candidate: &str, query: &str) -> bool {
    let candidate = normalize(candidate);
    let query = normalize(query);
    candidate.contains(&query) || query.contains(&candidate)
}

/// Uppercase the first letter of each whitespace-separated word, used for
/// fallback display names synthesized from the raw query
pub fn title_case(raw: &str) -> String {
    raw.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_query_matches_full_name() {
        assert!(matches("Patrick Mahomes", "Mahomes"));
        assert!(matches("Patrick Mahomes", "patrick mahomes"));
        assert!(matches("Patrick Mahomes", "  MAHOMES  "));
    }

    #[test]
    fn verbose_query_matches_shorter_candidate() {
        assert!(matches("Mahomes", "Patrick Mahomes II"));
    }

    #[test]
    fn unrelated_names_do_not_match() {
        assert!(!matches("Patrick Mahomes", "Josh Allen"));
        assert!(!matches("Travis Kelce", "Kelc3"));
    }

    #[test]
    fn empty_query_matches_everything() {
        // Caller contract: empty queries must be rejected upstream
        assert!(matches("Anyone At All", ""));
    }

    #[test]
    fn title_case_normalizes_fallback_names() {
        assert_eq!(title_case("nonexistent player zzz"), "Nonexistent Player Zzz");
        assert_eq!(title_case("  single "), "Single");
        assert_eq!(title_case(""), "");
    }
}
