//! Prefix matching implementation.

/// Result of a pattern match operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchResult {
    /// Full match found
    Match,
    /// No match
    NoMatch,
}

impl MatchResult {
    #[inline]
    pub fn is_match(self) -> bool {
        matches!(self, MatchResult::Match)
    }
}

/// A prefix compiled for repeated comparison against encoded public keys.
#[derive(Debug, Clone)]
pub struct Pattern {
    /// The prefix, folded to lowercase when matching ignores case
    prefix: String,
    /// Whether letter case is ignored
    ignore_case: bool,
}

impl Pattern {
    /// Creates a new prefix pattern.
    pub fn new(prefix: impl Into<String>, ignore_case: bool) -> Self {
        let prefix = prefix.into();
        let prefix = if ignore_case {
            prefix.to_ascii_lowercase()
        } else {
            prefix
        };

        Self { prefix, ignore_case }
    }

    /// Returns the (normalized) prefix.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Matches the leading characters of `candidate` against the prefix.
    ///
    /// Candidates shorter than the prefix never match.
    #[inline]
    pub fn matches(&self, candidate: &str) -> MatchResult {
        let slice = match candidate.get(..self.prefix.len()) {
            Some(slice) => slice,
            None => return MatchResult::NoMatch,
        };

        let matched = if self.ignore_case {
            slice.eq_ignore_ascii_case(&self.prefix)
        } else {
            slice == self.prefix
        };

        if matched {
            MatchResult::Match
        } else {
            MatchResult::NoMatch
        }
    }
}
