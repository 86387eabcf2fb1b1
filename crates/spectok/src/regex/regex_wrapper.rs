//! # Regex Wrapper
//! This modules provides mechanisms to mix `regex` and `fancy_regex` types.

use core::{fmt::Debug, ops::Range};

/// Error wrapper for regex patterns.
#[non_exhaustive]
#[derive(Clone, Debug)]
pub enum ErrorWrapper {
    /// Error from `regex`.
    Basic(regex::Error),

    /// Error from `fancy_regex`.
    Fancy(Box<fancy_regex::Error>),
}

impl From<regex::Error> for ErrorWrapper {
    fn from(err: regex::Error) -> Self {
        Self::Basic(err)
    }
}

impl From<fancy_regex::Error> for ErrorWrapper {
    fn from(err: fancy_regex::Error) -> Self {
        Self::Fancy(Box::new(err))
    }
}

impl core::fmt::Display for ErrorWrapper {
    fn fmt(
        &self,
        f: &mut core::fmt::Formatter<'_>,
    ) -> core::fmt::Result {
        match self {
            Self::Basic(err) => core::fmt::Display::fmt(err, f),
            Self::Fancy(err) => core::fmt::Display::fmt(err, f),
        }
    }
}

impl core::error::Error for ErrorWrapper {}

/// Const Regex Wrapper Pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ConstRegexWrapperPattern {
    /// This is a pattern for the `regex` crate.
    Basic(&'static str),

    /// This is a pattern for the `fancy_regex` crate.
    Fancy(&'static str),
}

impl ConstRegexWrapperPattern {
    /// Get the underlying regex pattern.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Basic(pattern) => pattern,
            Self::Fancy(pattern) => pattern,
        }
    }

    /// Convert to [`RegexWrapperPattern`]
    pub fn to_pattern(self) -> RegexWrapperPattern {
        self.into()
    }

    /// Compile the regex pattern into a [`RegexWrapper`].
    pub fn compile(&self) -> Result<RegexWrapper, ErrorWrapper> {
        RegexWrapperPattern::from(*self).compile()
    }
}

impl From<ConstRegexWrapperPattern> for RegexWrapperPattern {
    fn from(pattern: ConstRegexWrapperPattern) -> Self {
        use ConstRegexWrapperPattern::*;
        match pattern {
            Basic(pattern) => RegexWrapperPattern::Basic(pattern.to_string()),
            Fancy(pattern) => RegexWrapperPattern::Fancy(pattern.to_string()),
        }
    }
}

/// Label for regex patterns.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum RegexWrapperPattern {
    /// This is a pattern for the `regex` crate.
    Basic(String),

    /// This is a pattern for the `fancy_regex` crate.
    Fancy(String),

    /// This pattern will try the `regex` crate first,
    /// and fallback to `fancy_regex` if it fails.
    Adaptive(String),
}

impl From<&str> for RegexWrapperPattern {
    fn from(pattern: &str) -> Self {
        Self::Adaptive(pattern.to_string())
    }
}

impl From<String> for RegexWrapperPattern {
    fn from(pattern: String) -> Self {
        Self::Adaptive(pattern)
    }
}

impl RegexWrapperPattern {
    /// Get the underlying regex pattern.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Basic(pattern) => pattern,
            Self::Fancy(pattern) => pattern,
            Self::Adaptive(pattern) => pattern,
        }
    }

    /// Compile the regex pattern into a [`RegexWrapper`].
    pub fn compile(&self) -> Result<RegexWrapper, ErrorWrapper> {
        match self {
            Self::Basic(pattern) => regex::Regex::new(pattern)
                .map(RegexWrapper::from)
                .map_err(ErrorWrapper::from),
            Self::Fancy(pattern) => fancy_regex::Regex::new(pattern)
                .map(RegexWrapper::from)
                .map_err(ErrorWrapper::from),
            Self::Adaptive(pattern) => regex::Regex::new(pattern)
                .map(RegexWrapper::from)
                .or_else(|_| {
                    fancy_regex::Regex::new(pattern)
                        .map(RegexWrapper::from)
                        .map_err(ErrorWrapper::from)
                }),
        }
    }
}

/// Wrapper for compiled regex patterns.
#[derive(Debug, Clone)]
pub enum RegexWrapper {
    /// Wrapper for `regex::Regex`.
    Basic(regex::Regex),

    /// Wrapper for `fancy_regex::Regex`.
    Fancy(fancy_regex::Regex),
}

impl From<regex::Regex> for RegexWrapper {
    fn from(regex: regex::Regex) -> Self {
        Self::Basic(regex)
    }
}

impl From<fancy_regex::Regex> for RegexWrapper {
    fn from(regex: fancy_regex::Regex) -> Self {
        Self::Fancy(regex)
    }
}

impl RegexWrapper {
    /// Is this `Basic`?
    pub fn is_basic(&self) -> bool {
        matches!(self, Self::Basic(_))
    }

    /// Is this `Fancy`?
    pub fn is_fancy(&self) -> bool {
        matches!(self, Self::Fancy(_))
    }

    /// Get the underlying regex pattern.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Basic(regex) => regex.as_str(),
            Self::Fancy(regex) => regex.as_str(),
        }
    }

    /// Iterate over the byte ranges of all non-overlapping matches.
    ///
    /// ## Arguments
    /// * `haystack` - The string to search in.
    ///
    /// ## Returns
    /// A [`MatchRanges`] iterator over the matched ranges.
    pub fn find_ranges<'r, 'h>(
        &'r self,
        haystack: &'h str,
    ) -> MatchRanges<'r, 'h> {
        match self {
            Self::Basic(regex) => MatchRanges::Basic(regex.find_iter(haystack)),
            Self::Fancy(regex) => MatchRanges::Fancy(regex.find_iter(haystack)),
        }
    }
}

/// Iterator over the match ranges of a [`RegexWrapper`].
pub enum MatchRanges<'r, 'h> {
    /// Wrapper for `regex::Matches`.
    Basic(regex::Matches<'r, 'h>),

    /// Wrapper for `fancy_regex::Matches`.
    Fancy(fancy_regex::Matches<'r, 'h>),
}

impl Iterator for MatchRanges<'_, '_> {
    type Item = Range<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Self::Basic(matches) => matches.next().map(|m| m.range()),
            Self::Fancy(matches) => match matches.next()? {
                Ok(m) => Some(m.range()),
                Err(err) => {
                    // Backtrack limits end the scan; callers cover the tail.
                    log::warn!("regex scan aborted: {err}");
                    None
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adaptive_falls_up_to_fancy() {
        let basic = RegexWrapperPattern::from(r"\w+").compile().unwrap();
        assert!(basic.is_basic());
        assert_eq!(basic.as_str(), r"\w+");

        let fancy = RegexWrapperPattern::from(r"\s+(?!\S)").compile().unwrap();
        assert!(fancy.is_fancy());
    }

    #[test]
    fn test_basic_rejects_lookahead() {
        let pattern = RegexWrapperPattern::Basic(r"\s+(?!\S)".to_string());
        assert!(matches!(pattern.compile(), Err(ErrorWrapper::Basic(_))));
    }

    #[test]
    fn test_find_ranges() {
        let text = "ab  cd";
        for pattern in [
            RegexWrapperPattern::Basic(r"\w+".to_string()),
            RegexWrapperPattern::Fancy(r"\w+".to_string()),
        ] {
            let re = pattern.compile().unwrap();
            assert_eq!(re.find_ranges(text).collect::<Vec<_>>(), vec![0..2, 4..6]);
        }
    }

    #[test]
    fn test_const_pattern() {
        const P: ConstRegexWrapperPattern = ConstRegexWrapperPattern::Fancy(r"a(?=b)");
        assert_eq!(P.as_str(), "a(?=b)");
        assert_eq!(
            P.to_pattern(),
            RegexWrapperPattern::Fancy("a(?=b)".to_string())
        );
        assert!(P.compile().unwrap().is_fancy());
    }
}
