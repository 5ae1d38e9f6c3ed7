//! Path pattern matching for ignore paths
//!
//! Patterns are `/`-delimited segment sequences:
//! - a literal segment matches itself exactly (case-sensitive)
//! - `*` or `:name` matches any single segment
//! - a final `*` matches zero or more remaining segments
//!
//! No regex and no backtracking, so matching is linear in path length.

use std::borrow::Cow;

/// A single segment of a compiled pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Must equal the path segment exactly
    Literal(String),
    /// Matches any one path segment (`*` or `:name`)
    Placeholder(Option<String>),
}

impl Segment {
    fn parse(raw: &str) -> Self {
        if raw == "*" {
            Segment::Placeholder(None)
        } else if let Some(name) = raw.strip_prefix(':') {
            Segment::Placeholder(Some(name.to_string()))
        } else {
            Segment::Literal(raw.to_string())
        }
    }

    fn accepts(&self, part: &str) -> bool {
        match self {
            Segment::Literal(expected) => expected == part,
            Segment::Placeholder(_) => true,
        }
    }
}

/// Compiled path pattern
///
/// Compilation is total: every string yields a pattern. A pattern without a
/// leading `/` is compiled as if it had one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    source: String,
    segments: Vec<Segment>,
    trailing: bool,
}

impl PathPattern {
    /// Compile a pattern string
    pub fn compile(pattern: &str) -> Self {
        let rooted: Cow<'_, str> = if pattern.starts_with('/') {
            Cow::Borrowed(pattern)
        } else {
            Cow::Owned(format!("/{pattern}"))
        };

        let mut parts: Vec<&str> = rooted.split('/').collect();
        let trailing = parts.last() == Some(&"*");
        if trailing {
            parts.pop();
        }

        Self {
            source: pattern.to_string(),
            segments: parts.into_iter().map(Segment::parse).collect(),
            trailing,
        }
    }

    /// Check whether a request path matches this pattern
    ///
    /// Paths that are not rooted never match.
    pub fn matches(&self, path: &str) -> bool {
        if !path.starts_with('/') {
            return false;
        }

        let mut parts = path.split('/');
        for segment in &self.segments {
            match parts.next() {
                Some(part) if segment.accepts(part) => {}
                _ => return false,
            }
        }

        self.trailing || parts.next().is_none()
    }

    /// The pattern string this was compiled from
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Compiled segments, excluding a trailing `*`
    ///
    /// The root of a rooted pattern is an empty leading literal.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Whether the pattern ends in a multi-segment wildcard
    pub fn is_trailing(&self) -> bool {
        self.trailing
    }
}

/// Ordered set of compiled path patterns
#[derive(Debug, Clone, Default)]
pub struct PathPatternSet {
    patterns: Vec<PathPattern>,
}

impl PathPatternSet {
    /// Compile a list of pattern strings, preserving their order
    pub fn new(patterns: &[String]) -> Self {
        Self {
            patterns: patterns.iter().map(|p| PathPattern::compile(p)).collect(),
        }
    }

    /// Create an empty set (matches nothing)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Check if a path matches any pattern
    pub fn matches(&self, path: &str) -> bool {
        self.patterns.iter().any(|p| p.matches(path))
    }

    /// Check if a path matches any pattern, returning the first matching source
    pub fn find_match(&self, path: &str) -> Option<&str> {
        self.patterns
            .iter()
            .find(|p| p.matches(path))
            .map(PathPattern::source)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PathPattern> {
        self.patterns.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_compile_root_wildcard() {
        let pattern = PathPattern::compile("/*");
        assert!(pattern.is_trailing());
        assert_eq!(pattern.segments(), &[Segment::Literal(String::new())]);
    }

    #[test]
    fn test_compile_placeholders() {
        let pattern = PathPattern::compile("/users/:id/*/avatar");
        assert!(!pattern.is_trailing());
        assert_eq!(
            pattern.segments(),
            &[
                Segment::Literal(String::new()),
                Segment::Literal("users".to_string()),
                Segment::Placeholder(Some("id".to_string())),
                Segment::Placeholder(None),
                Segment::Literal("avatar".to_string()),
            ]
        );
    }

    #[test]
    fn test_compile_relative_pattern_is_rooted() {
        let relative = PathPattern::compile("health/*");
        let rooted = PathPattern::compile("/health/*");
        assert_eq!(relative.segments(), rooted.segments());
        assert_eq!(relative.source(), "health/*");
        assert!(relative.matches("/health/live"));
    }

    #[rstest]
    #[case("/some/path/here/*", "/some/path/here/do/some/stuff", true)]
    #[case("/some/path/here/*", "/some/path/here", true)]
    #[case("/some/path/here/*", "/some/path/here/", true)]
    #[case("/some/path/here/*", "/some/path", false)]
    #[case("/some/path/here/*", "/oh/noes/you/must/auth", false)]
    #[case("/*", "/", true)]
    #[case("/*", "/anything/at/all", true)]
    #[case("/health", "/health", true)]
    #[case("/health", "/health/", false)]
    #[case("/health", "/health/live", false)]
    #[case("/health", "/Health", false)]
    #[case("/users/*/avatar", "/users/42/avatar", true)]
    #[case("/users/*/avatar", "/users/42/43/avatar", false)]
    #[case("/users/:id", "/users/42", true)]
    #[case("/users/:id", "/users", false)]
    #[case("/a/*/c/*", "/a/b/c/d/e", true)]
    fn test_matches(#[case] pattern: &str, #[case] path: &str, #[case] expected: bool) {
        assert_eq!(PathPattern::compile(pattern).matches(path), expected);
    }

    #[test]
    fn test_unrooted_path_never_matches() {
        assert!(!PathPattern::compile("/*").matches(""));
        assert!(!PathPattern::compile("/*").matches("*"));
        assert!(!PathPattern::compile("health").matches("health"));
    }

    #[test]
    fn test_query_string_is_part_of_last_segment() {
        let pattern = PathPattern::compile("/health");
        assert!(!pattern.matches("/health?verbose=1"));
        assert!(PathPattern::compile("/health/*").matches("/health/x?verbose=1"));
    }

    #[test]
    fn test_empty_set() {
        let set = PathPatternSet::empty();
        assert!(set.is_empty());
        assert!(!set.matches("/anything"));
        assert_eq!(set.find_match("/anything"), None);
    }

    #[test]
    fn test_set_find_match_preserves_order() {
        let set = PathPatternSet::new(&["/public/*".to_string(), "/*".to_string()]);
        assert_eq!(set.len(), 2);
        assert_eq!(set.find_match("/public/logo.png"), Some("/public/*"));
        assert_eq!(set.find_match("/private"), Some("/*"));
    }
}
