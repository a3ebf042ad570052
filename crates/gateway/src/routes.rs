//! The proxy allow-list.
//!
//! Kept as a data table rather than route registrations so the full set of
//! forwarded prefixes can be audited in one place. Evaluated first-match;
//! the prefixes are disjoint, so order only matters for readability.

/// Path prefixes forwarded verbatim to the backend origin. Everything else
/// falls through to the static SPA handler.
pub const API_PREFIXES: &[&str] = &[
    "/auth",
    "/campaigns",
    "/instagram",
    "/pitch",
    "/competitor",
    "/leads",
    "/simulator",
    "/intelligence",
    "/memory",
    "/images",
    "/health",
];

/// The first configured prefix the request path starts with, if any.
pub fn proxied_prefix(path: &str) -> Option<&'static str> {
    API_PREFIXES
        .iter()
        .find(|prefix| path.starts_with(**prefix))
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_prefix_matches_itself_and_subpaths() {
        for prefix in API_PREFIXES {
            assert_eq!(proxied_prefix(prefix), Some(*prefix));
            let subpath = format!("{}/anything/deeper?x=1", prefix);
            assert_eq!(proxied_prefix(&subpath), Some(*prefix));
        }
    }

    #[test]
    fn test_non_api_paths_do_not_match() {
        assert_eq!(proxied_prefix("/"), None);
        assert_eq!(proxied_prefix("/dashboard"), None);
        assert_eq!(proxied_prefix("/assets/index-abc123.js"), None);
        assert_eq!(proxied_prefix("/favicon.ico"), None);
    }

    #[test]
    fn test_first_match_wins() {
        // Disjoint prefixes, but the rule is still first-match.
        assert_eq!(proxied_prefix("/leads/score-batch"), Some("/leads"));
    }
}
