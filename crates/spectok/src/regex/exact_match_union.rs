//! Exact Match Union Patterns

use crate::regex::regex_wrapper::RegexWrapperPattern;

/// Create a union pattern of exact matches.
///
/// This will always be a [`RegexWrapperPattern::Basic`] variant.
/// Longer alternatives are tried first, so that a literal which is a prefix
/// of another literal never shadows it.
///
/// ## Arguments
/// * `alts` - A slice of string-like alternatives to union.
///
/// ## Returns
/// A new `RegexWrapperPattern::Basic` containing the union pattern.
pub fn exact_match_union_regex_pattern<S: AsRef<str>>(alts: &[S]) -> RegexWrapperPattern {
    let mut alts = alts.iter().map(|s| s.as_ref()).collect::<Vec<_>>();
    alts.sort_by_key(|s| core::cmp::Reverse(s.len()));

    let parts = alts.into_iter().map(regex::escape).collect::<Vec<_>>();
    RegexWrapperPattern::Basic(format!("({})", parts.join("|")))
}
